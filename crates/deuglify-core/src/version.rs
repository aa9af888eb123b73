use crate::Config;

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version line naming the passes `config` enables and the parse goal,
/// e.g. `deuglify 0.2.0 (expand+mangle, script)`.
#[must_use]
pub fn version_string(config: &Config) -> String {
    let passes = match (config.expand, config.mangle) {
        (true, true) => "expand+mangle",
        (true, false) => "expand",
        (false, true) => "mangle",
        (false, false) => "print only",
    };
    let goal = if config.module { "module" } else { "script" };
    format!("deuglify {VERSION} ({passes}, {goal})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_version_string() {
        let vs = version_string(&Config::default());
        assert_eq!(vs, format!("deuglify {VERSION} (expand+mangle, script)"));
    }

    #[test]
    fn test_version_string_follows_config() {
        let config = Config::default().with_mangle(false).with_module(true);
        assert!(version_string(&config).ends_with("(expand, module)"));

        let config = Config::default().with_expand(false).with_mangle(false);
        assert!(version_string(&config).contains("(print only, script)"));
    }
}
