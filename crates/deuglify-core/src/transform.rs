//! The driver: parse, expand, mangle, generate.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::expand::{expand, ExpandStats};
use crate::mangle::{mangle, MangleOutcome};
use deuglify_parser::{Ast, Codegen, CodegenOptions, Parser, ParserOptions};
use tracing::debug;

/// What one transformation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformReport {
    /// `None` when expansion was turned off.
    pub expand: Option<ExpandStats>,
    pub mangle: MangleOutcome,
}

impl TransformReport {
    /// Messages meant for the user, such as why renaming was disabled.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<String> {
        match self.mangle {
            MangleOutcome::Disabled(construct) => vec![construct.to_string()],
            _ => Vec::new(),
        }
    }
}

/// Generated code plus the report that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub code: String,
    pub report: TransformReport,
}

/// Run the enabled passes over `ast`, expansion first.
pub fn transform(ast: &mut Ast, config: &Config) -> TransformReport {
    let expand = config.expand.then(|| expand(ast));
    let mangle = if config.mangle {
        mangle(ast)
    } else {
        MangleOutcome::Skipped
    };
    TransformReport { expand, mangle }
}

/// Parse `source`, transform it and generate code.
pub fn deuglify(source: &str, config: &Config) -> Result<Output> {
    let options = ParserOptions {
        module: config.module,
    };
    let mut ast = Parser::new(source, options)
        .parse()
        .map_err(|e| Error::from_parse(&e, source))?;
    debug!(statements = ast.stmts.len(), "parsed");

    let report = transform(&mut ast, config);
    let code = Codegen::new(&ast, CodegenOptions::with_indent_width(config.indent)).generate();
    Ok(Output { code, report })
}

/// [`deuglify`] with the default config, returning only the code.
pub fn deuglify_str(source: &str) -> Result<String> {
    deuglify(source, &Config::default()).map(|output| output.code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mangle::UnsafeConstruct;

    #[test]
    fn test_expands_then_mangles() {
        let code = deuglify_str("function f(a,b){return a&&b(),a?1:2}").unwrap();
        assert_eq!(
            code,
            "function f__q(a__w, b__e) {\n  if (a__w) {\n    b__e();\n  }\n  if (a__w) {\n    return 1;\n  }\n  return 2;\n}\n"
        );
    }

    #[test]
    fn test_split_declarations_are_renamed() {
        let code = deuglify_str("var a=1,b=!0;").unwrap();
        assert_eq!(code, "var a__q = 1;\nvar b__w = true;\n");
    }

    #[test]
    fn test_passes_can_be_disabled() {
        let source = "var a = 1, b = 2;";
        let config = Config::default().with_mangle(false);
        let output = deuglify(source, &config).unwrap();
        assert_eq!(output.code, "var a = 1;\nvar b = 2;\n");
        assert_eq!(output.report.mangle, MangleOutcome::Skipped);

        let config = Config::default().with_expand(false);
        let output = deuglify(source, &config).unwrap();
        assert_eq!(output.code, "var a__q = 1, b__w = 2;\n");
        assert_eq!(output.report.expand, None);
    }

    #[test]
    fn test_unsafe_construct_still_expands() {
        let output = deuglify("var a, b; eval(a);", &Config::default()).unwrap();
        assert_eq!(output.code, "var a;\nvar b;\neval(a);\n");
        assert_eq!(
            output.report.mangle,
            MangleOutcome::Disabled(UnsafeConstruct::DirectEval)
        );
        assert_eq!(
            output.report.diagnostics(),
            vec!["direct eval call detected, variable renaming disabled".to_string()]
        );
    }

    #[test]
    fn test_module_mode_and_indent() {
        let config = Config::default().with_module(true).with_indent(4);
        let output = deuglify("await x; if (y) z();", &config).unwrap();
        assert_eq!(output.code, "await x;\nif (y) {\n    z();\n}\n");
        assert!(deuglify("await x;", &Config::default()).is_err());
    }

    #[test]
    fn test_parse_error_reports_location() {
        let err = deuglify_str("var a = ;").unwrap_err();
        match err {
            Error::Parse { line, column, .. } => assert_eq!((line, column), (1, 9)),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
