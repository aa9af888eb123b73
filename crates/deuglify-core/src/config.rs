use serde::{Deserialize, Serialize};

/// Options for one deuglify run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Run the expansion pass.
    pub expand: bool,

    /// Run the mangling pass.
    pub mangle: bool,

    /// Parse the input as an ECMAScript module.
    pub module: bool,

    /// Spaces per indentation level in generated code.
    pub indent: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            expand: true,
            mangle: true,
            module: false,
            indent: 2,
        }
    }
}

impl Config {
    /// Load a config from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_expand(mut self, expand: bool) -> Self {
        self.expand = expand;
        self
    }

    #[must_use]
    pub fn with_mangle(mut self, mangle: bool) -> Self {
        self.mangle = mangle;
        self
    }

    #[must_use]
    pub fn with_module(mut self, module: bool) -> Self {
        self.module = module;
        self
    }

    /// Set indentation width.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_runs_both_passes() {
        let config = Config::default();
        assert!(config.expand);
        assert!(config.mangle);
        assert!(!config.module);
        assert_eq!(config.indent, 2);
    }

    #[test]
    fn test_builders() {
        let config = Config::default()
            .with_expand(false)
            .with_mangle(false)
            .with_module(true)
            .with_indent(4);
        assert_eq!(
            config,
            Config {
                expand: false,
                mangle: false,
                module: true,
                indent: 4
            }
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = Config::from_json(r#"{"mangle": false}"#).unwrap();
        assert!(config.expand);
        assert!(!config.mangle);
        assert_eq!(config.indent, 2);
        assert!(Config::from_json("{").is_err());
    }
}
