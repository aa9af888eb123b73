//! Mangling pass: gives every single-character binding a unique name.
//!
//! A collection walk gathers every identifier text in the tree and looks for
//! constructs that hide references from static analysis. If none are found,
//! each one-character binding `x` becomes `x__<id>`, where `<id>` encodes a
//! counter shared across the whole pass.

use deuglify_parser::visit::{walk_expr, walk_stmt, Visit};
use deuglify_parser::{Ast, Expr, ExprKind, ScopeTree, Stmt, StmtKind};
use rustc_hash::FxHashSet;
use std::fmt;
use tracing::{debug, warn};

/// Joins the original name and its id.
pub const SEPARATOR: &str = "__";

const ALPHABET: &[u8; 52] = b"qwertyuiopasdfghjklzxcvbnmQWERTYUIOPASDFGHJKLZXCVBNM";

/// Encode `n` in the 52-letter alphabet, least significant digit first.
#[must_use]
pub fn short_id(mut n: usize) -> String {
    let base = ALPHABET.len();
    let mut id = String::new();
    loop {
        id.push(char::from(ALPHABET[n % base]));
        n /= base;
        if n == 0 {
            return id;
        }
    }
}

/// A construct that makes renaming unsafe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsafeConstruct {
    With,
    DirectEval,
}

impl fmt::Display for UnsafeConstruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::With => f.write_str("with statement detected, variable renaming disabled"),
            Self::DirectEval => {
                f.write_str("direct eval call detected, variable renaming disabled")
            }
        }
    }
}

/// Result of the mangling pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MangleOutcome {
    Renamed { bindings: usize, references: usize },
    Disabled(UnsafeConstruct),
    /// The pass was turned off.
    Skipped,
}

/// Identifier texts in use plus the first unsafe construct seen.
#[derive(Default)]
struct Collector {
    used: FxHashSet<String>,
    unsafe_construct: Option<UnsafeConstruct>,
}

impl Collector {
    fn flag(&mut self, construct: UnsafeConstruct) {
        self.unsafe_construct.get_or_insert(construct);
    }
}

impl Visit for Collector {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        if let StmtKind::With { .. } = stmt.kind {
            self.flag(UnsafeConstruct::With);
        }
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        if let ExprKind::Call { callee, .. } = &expr.kind {
            if callee.as_ident() == Some("eval") {
                self.flag(UnsafeConstruct::DirectEval);
            }
        }
        walk_expr(self, expr);
    }

    fn visit_ident(&mut self, name: &str) {
        if !self.used.contains(name) {
            self.used.insert(name.to_string());
        }
    }
}

/// Mints fresh names. The counter advances after every candidate.
struct NameGenerator {
    used: FxHashSet<String>,
    counter: usize,
}

impl NameGenerator {
    fn fresh(&mut self, original: &str) -> String {
        loop {
            let candidate = format!("{original}{SEPARATOR}{}", short_id(self.counter));
            self.counter += 1;
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

/// Rename every one-character binding in `ast`, unless a `with` statement or
/// a direct `eval` call is present.
pub fn mangle(ast: &mut Ast) -> MangleOutcome {
    let mut collector = Collector::default();
    deuglify_parser::visit::walk_ast(&mut collector, ast);
    if let Some(construct) = collector.unsafe_construct {
        warn!("{construct}");
        return MangleOutcome::Disabled(construct);
    }

    let mut tree = ScopeTree::build(ast);
    let mut names = NameGenerator {
        used: collector.used,
        counter: 0,
    };
    for scope in tree.ids() {
        let eligible: Vec<String> = tree
            .bindings(scope)
            .iter()
            .filter(|name| name.chars().count() == 1)
            .cloned()
            .collect();
        for name in eligible {
            let fresh = names.fresh(&name);
            tree.rename(scope, &name, fresh);
        }
    }

    let stats = tree.apply(ast);
    debug!(
        scopes = tree.len(),
        bindings = stats.bindings,
        references = stats.references,
        "mangling finished"
    );
    MangleOutcome::Renamed {
        bindings: stats.bindings,
        references: stats.references,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deuglify_parser::{generate, parse, parse_with, ParserOptions};

    fn mangle_source(source: &str) -> (String, MangleOutcome) {
        let mut ast = parse(source).unwrap();
        let outcome = mangle(&mut ast);
        (generate(&ast), outcome)
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id(0), "q");
        assert_eq!(short_id(1), "w");
        assert_eq!(short_id(51), "M");
        assert_eq!(short_id(52), "qw");
        assert_eq!(short_id(53), "ww");
        assert_eq!(short_id(52 * 52), "qqw");
    }

    #[test]
    fn test_renames_single_char_bindings() {
        let (code, outcome) = mangle_source("var a = 1, bb = 2; function f(b) { return a + b + bb; }");
        assert_eq!(
            code,
            "var a__q = 1, bb = 2;\nfunction f__w(b__e) {\n  return a__q + b__e + bb;\n}\n"
        );
        assert_eq!(
            outcome,
            MangleOutcome::Renamed {
                bindings: 3,
                references: 5
            }
        );
    }

    #[test]
    fn test_skips_names_already_in_use() {
        let (code, _) = mangle_source("var a = a__q; var b;");
        assert_eq!(code, "var a__w = a__q;\nvar b__e;\n");
    }

    #[test]
    fn test_property_names_count_as_used() {
        let (code, _) = mangle_source("var a = o.a__q;");
        assert_eq!(code, "var a__w = o.a__q;\n");
    }

    #[test]
    fn test_shadowed_bindings_get_distinct_names() {
        let (code, _) = mangle_source("var a; function f() { var a; a; } a;");
        assert_eq!(
            code,
            "var a__q;\nfunction f__w() {\n  var a__e;\n  a__e;\n}\na__q;\n"
        );
    }

    #[test]
    fn test_var_redeclaring_catch_param_stays_declared() {
        let (code, _) = mangle_source("try {} catch (a) { var a = 2; } a;");
        assert!(code.contains("catch (a__w) {\n  var a__w = 2;\n}"));
        assert!(code.ends_with("\na__w;\n"));

        let (code, _) = mangle_source(
            "function f() { try { throw 0; } catch (e) { var e = 1; } return e; }",
        );
        assert!(code.contains("catch (e__e) {\n    var e__e = 1;\n  }"));
        assert!(code.contains("return e__e;"));
    }

    #[test]
    fn test_globals_untouched() {
        let (code, outcome) = mangle_source("x = y + 1;");
        assert_eq!(code, "x = y + 1;\n");
        assert_eq!(
            outcome,
            MangleOutcome::Renamed {
                bindings: 0,
                references: 0
            }
        );
    }

    #[test]
    fn test_with_disables_renaming() {
        let (code, outcome) = mangle_source("var a; with (o) { a; }");
        assert_eq!(code, "var a;\nwith (o) {\n  a;\n}\n");
        assert_eq!(outcome, MangleOutcome::Disabled(UnsafeConstruct::With));
        assert_eq!(
            UnsafeConstruct::With.to_string(),
            "with statement detected, variable renaming disabled"
        );
    }

    #[test]
    fn test_eval_disables_renaming() {
        let (code, outcome) = mangle_source("function f(a) { eval('a'); }");
        assert_eq!(code, "function f(a) {\n  eval(\"a\");\n}\n");
        assert_eq!(outcome, MangleOutcome::Disabled(UnsafeConstruct::DirectEval));

        let (_, outcome) = mangle_source("function f(a) { eval?.('a'); }");
        assert_eq!(outcome, MangleOutcome::Disabled(UnsafeConstruct::DirectEval));
    }

    #[test]
    fn test_indirect_eval_not_detected() {
        let (_, outcome) = mangle_source("var e = eval; e('a');");
        assert_eq!(
            outcome,
            MangleOutcome::Renamed {
                bindings: 1,
                references: 2
            }
        );
    }

    #[test]
    fn test_module_exports_keep_names() {
        let mut ast = parse_with(
            "import { a } from 'm'; export const b = a;",
            ParserOptions { module: true },
        )
        .unwrap();
        mangle(&mut ast);
        assert_eq!(
            generate(&ast),
            "import { a as a__q } from \"m\";\nconst b__w = a__q;\nexport { b__w as b };\n"
        );
    }

    #[test]
    fn test_uniqueness_across_many_bindings() {
        let source: String = ('a'..='z').map(|c| format!("var {c}; function f{c}({c}) {{}}")).collect();
        let mut ast = parse(&source).unwrap();
        mangle(&mut ast);

        #[derive(Default)]
        struct Names(Vec<String>);
        impl Visit for Names {
            fn visit_ident(&mut self, name: &str) {
                self.0.push(name.to_string());
            }
        }
        let mut names = Names::default();
        deuglify_parser::visit::walk_ast(&mut names, &ast);
        let renamed: FxHashSet<&String> = names.0.iter().filter(|n| n.contains(SEPARATOR)).collect();
        // 26 globals plus 26 parameters, each declared once.
        assert_eq!(renamed.len(), 52);
    }
}
