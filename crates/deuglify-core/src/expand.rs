//! Expansion pass.
//!
//! Rewrites minifier-compacted forms into explicit statements in one
//! re-entrant walk: whenever a rule replaces a statement, the replacement is
//! expanded again before the walk moves on. Statement rules run on the way
//! down; the `for` initializer split runs on the way up, once the loop body
//! has been wrapped in a block.
//!
//! A "body" is the statement list of the program, a block, a function or a
//! `try` clause. `var` splitting and `return` decomposition only apply to
//! statements directly in a body.

use deuglify_parser::visit::Visit;
use deuglify_parser::*;
use rustc_hash::FxHashSet;
use tracing::debug;

/// What the pass rewrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpandStats {
    /// Statements replaced by one or more new statements.
    pub statements: usize,
    /// Single statements wrapped in a block.
    pub blocks: usize,
    /// `!<number>` literals folded to booleans.
    pub folds: usize,
}

/// Expand `ast` in place.
pub fn expand(ast: &mut Ast) -> ExpandStats {
    let mut expander = Expander::default();
    let stmts = std::mem::take(&mut ast.stmts);
    ast.stmts = expander.expand_body(stmts);
    debug!(
        statements = expander.stats.statements,
        blocks = expander.stats.blocks,
        folds = expander.stats.folds,
        "expansion finished"
    );
    expander.stats
}

#[derive(Default)]
struct Expander {
    stats: ExpandStats,
}

impl Expander {
    fn expand_body(&mut self, stmts: Vec<Stmt>) -> Vec<Stmt> {
        self.expand_list(stmts, true)
    }

    fn expand_list(&mut self, stmts: Vec<Stmt>, in_body: bool) -> Vec<Stmt> {
        let mut out = Vec::with_capacity(stmts.len());
        for stmt in stmts {
            out.extend(self.expand_stmt(stmt, in_body));
        }
        out
    }

    /// Expand a statement that must stay a single statement.
    fn expand_single(&mut self, stmt: Stmt) -> Stmt {
        let span = stmt.span;
        let out = self.expand_stmt(stmt, false);
        self.single_or_body(out, span)
    }

    /// Several statements in a single-statement position become a block.
    /// That block is a body, so body-only rules run over it again.
    fn single_or_body(&mut self, mut stmts: Vec<Stmt>, span: Span) -> Stmt {
        if stmts.len() == 1 {
            if let Some(stmt) = stmts.pop() {
                return stmt;
            }
        }
        Stmt::block(self.expand_body(stmts), span)
    }

    fn wrap_block(&mut self, stmt: Stmt) -> Stmt {
        if matches!(stmt.kind, StmtKind::Block(_)) {
            return stmt;
        }
        self.stats.blocks += 1;
        let span = stmt.span;
        Stmt::block(vec![stmt], span)
    }

    fn expand_stmt(&mut self, stmt: Stmt, in_body: bool) -> Vec<Stmt> {
        let span = stmt.span;
        match stmt.kind {
            StmtKind::Var {
                kind: VarKind::Var,
                decls,
            } if in_body && decls.len() > 1 => {
                self.stats.statements += 1;
                let mut out = Vec::with_capacity(decls.len());
                for decl in decls {
                    let span = decl.span;
                    let single = Stmt::new(
                        StmtKind::Var {
                            kind: VarKind::Var,
                            decls: vec![decl],
                        },
                        span,
                    );
                    out.extend(self.expand_stmt(single, in_body));
                }
                out
            }
            StmtKind::Var { kind, mut decls } => {
                self.expand_var_decls(&mut decls);
                vec![Stmt::new(StmtKind::Var { kind, decls }, span)]
            }
            StmtKind::Expr(expr) => self.expand_expr_stmt(expr, span, in_body),
            StmtKind::Return { arg: Some(arg) } if in_body => self.expand_return(arg, span),
            StmtKind::Return { arg } => {
                let arg = arg.map(|mut arg| {
                    self.expand_expr(&mut arg);
                    arg
                });
                vec![Stmt::new(StmtKind::Return { arg }, span)]
            }
            StmtKind::If {
                mut test,
                consequent,
                alternate,
            } => {
                self.expand_expr(&mut test);
                let consequent = self.wrap_block(*consequent);
                let consequent = Box::new(self.expand_single(consequent));
                let alternate = alternate.map(|alt| {
                    let alt = match alt.kind {
                        StmtKind::If { .. } => *alt,
                        _ => self.wrap_block(*alt),
                    };
                    Box::new(self.expand_single(alt))
                });
                vec![Stmt::new(
                    StmtKind::If {
                        test,
                        consequent,
                        alternate,
                    },
                    span,
                )]
            }
            StmtKind::For {
                init,
                test,
                update,
                body,
            } => self.expand_for(init, test, update, *body, span, in_body),
            StmtKind::ForIn {
                mut left,
                mut right,
                body,
            } => {
                let body = self.wrap_block(*body);
                self.expand_for_init(&mut left);
                self.expand_expr(&mut right);
                let body = Box::new(self.expand_single(body));
                vec![Stmt::new(StmtKind::ForIn { left, right, body }, span)]
            }
            StmtKind::ForOf {
                mut left,
                mut right,
                body,
                is_await,
            } => {
                let body = self.wrap_block(*body);
                self.expand_for_init(&mut left);
                self.expand_expr(&mut right);
                let body = Box::new(self.expand_single(body));
                vec![Stmt::new(
                    StmtKind::ForOf {
                        left,
                        right,
                        body,
                        is_await,
                    },
                    span,
                )]
            }
            StmtKind::While { mut test, body } => {
                let body = self.wrap_block(*body);
                self.expand_expr(&mut test);
                let body = Box::new(self.expand_single(body));
                vec![Stmt::new(StmtKind::While { test, body }, span)]
            }
            StmtKind::DoWhile { body, mut test } => {
                let body = Box::new(self.expand_single(*body));
                self.expand_expr(&mut test);
                vec![Stmt::new(StmtKind::DoWhile { body, test }, span)]
            }
            StmtKind::Block(stmts) => vec![Stmt::block(self.expand_body(stmts), span)],
            StmtKind::Function(mut func) => {
                self.expand_function(&mut func);
                vec![Stmt::new(StmtKind::Function(func), span)]
            }
            StmtKind::Class(mut class) => {
                self.expand_class(&mut class);
                vec![Stmt::new(StmtKind::Class(class), span)]
            }
            StmtKind::Switch {
                mut discriminant,
                mut cases,
            } => {
                self.expand_expr(&mut discriminant);
                for case in &mut cases {
                    if let Some(test) = &mut case.test {
                        self.expand_expr(test);
                    }
                    let consequent = std::mem::take(&mut case.consequent);
                    case.consequent = self.expand_list(consequent, false);
                }
                vec![Stmt::new(
                    StmtKind::Switch {
                        discriminant,
                        cases,
                    },
                    span,
                )]
            }
            StmtKind::Try {
                block,
                handler,
                finalizer,
            } => {
                let block = self.expand_body(block);
                let handler = handler.map(|mut catch| {
                    if let Some(param) = &mut catch.param {
                        self.expand_binding(param);
                    }
                    let body = std::mem::take(&mut catch.body);
                    catch.body = self.expand_body(body);
                    catch
                });
                let finalizer = finalizer.map(|fin| self.expand_body(fin));
                vec![Stmt::new(
                    StmtKind::Try {
                        block,
                        handler,
                        finalizer,
                    },
                    span,
                )]
            }
            StmtKind::Labeled { label, body } => {
                let is_for = matches!(body.kind, StmtKind::For { .. });
                let mut out = self.expand_stmt(*body, in_body && is_for);
                // A split loop keeps its label; the hoisted `var` goes first.
                if is_for {
                    if let Some(looped) = out.pop() {
                        out.push(Stmt::new(
                            StmtKind::Labeled {
                                label,
                                body: Box::new(looped),
                            },
                            span,
                        ));
                        return out;
                    }
                }
                let body = Box::new(self.single_or_body(out, span));
                vec![Stmt::new(StmtKind::Labeled { label, body }, span)]
            }
            StmtKind::With { mut object, body } => {
                self.expand_expr(&mut object);
                let body = Box::new(self.expand_single(*body));
                vec![Stmt::new(StmtKind::With { object, body }, span)]
            }
            StmtKind::Throw { mut arg } => {
                self.expand_expr(&mut arg);
                vec![Stmt::new(StmtKind::Throw { arg }, span)]
            }
            StmtKind::Export(mut export) => {
                match &mut *export {
                    ExportDecl::Default { expr, .. } => self.expand_expr(expr),
                    ExportDecl::DefaultDecl { decl, .. } | ExportDecl::Decl { decl, .. } => {
                        let inner = std::mem::replace(decl, Stmt::new(StmtKind::Empty, span));
                        *decl = self.expand_single(inner);
                    }
                    ExportDecl::Named { .. } | ExportDecl::All { .. } => {}
                }
                vec![Stmt::new(StmtKind::Export(export), span)]
            }
            kind @ (StmtKind::Import(_)
            | StmtKind::Empty
            | StmtKind::Debugger
            | StmtKind::Break { .. }
            | StmtKind::Continue { .. }) => vec![Stmt::new(kind, span)],
        }
    }

    /// Logical, conditional and sequence expression statements.
    fn expand_expr_stmt(&mut self, expr: Expr, span: Span, in_body: bool) -> Vec<Stmt> {
        let expr_span = expr.span;
        match expr.kind {
            ExprKind::Binary {
                op: op @ (BinaryOp::And | BinaryOp::Or),
                left,
                right,
            } => {
                self.stats.statements += 1;
                let test = if op == BinaryOp::And {
                    *left
                } else {
                    let left_span = left.span;
                    Expr::new(
                        ExprKind::Unary {
                            op: UnaryOp::Not,
                            arg: left,
                        },
                        left_span,
                    )
                };
                let consequent = Stmt::block(vec![Stmt::expr(*right)], span);
                let rewritten = Stmt::new(
                    StmtKind::If {
                        test,
                        consequent: Box::new(consequent),
                        alternate: None,
                    },
                    span,
                );
                self.expand_stmt(rewritten, in_body)
            }
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.stats.statements += 1;
                let rewritten = Stmt::new(
                    StmtKind::If {
                        test: *test,
                        consequent: Box::new(Stmt::block(vec![Stmt::expr(*consequent)], span)),
                        alternate: Some(Box::new(Stmt::block(
                            vec![Stmt::expr(*alternate)],
                            span,
                        ))),
                    },
                    span,
                );
                self.expand_stmt(rewritten, in_body)
            }
            ExprKind::Sequence(exprs) => {
                self.stats.statements += 1;
                let mut out = Vec::with_capacity(exprs.len());
                for e in exprs {
                    out.extend(self.expand_stmt(Stmt::expr(e), in_body));
                }
                out
            }
            kind => {
                let mut expr = Expr::new(kind, expr_span);
                self.expand_expr(&mut expr);
                vec![Stmt::new(StmtKind::Expr(expr), span)]
            }
        }
    }

    /// `return` directly in a body. `return a || b` is left as is.
    fn expand_return(&mut self, arg: Expr, span: Span) -> Vec<Stmt> {
        let ret = |arg: Expr| Stmt::new(StmtKind::Return { arg: Some(arg) }, span);
        let arg_span = arg.span;
        let rewritten = match arg.kind {
            ExprKind::Sequence(mut exprs) => match exprs.pop() {
                Some(last) => {
                    let mut stmts: Vec<Stmt> = exprs.into_iter().map(Stmt::expr).collect();
                    stmts.push(ret(last));
                    stmts
                }
                None => vec![Stmt::new(StmtKind::Return { arg: None }, span)],
            },
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => vec![
                Stmt::new(
                    StmtKind::If {
                        test: *test,
                        consequent: Box::new(Stmt::block(vec![ret(*consequent)], span)),
                        alternate: None,
                    },
                    span,
                ),
                ret(*alternate),
            ],
            ExprKind::Binary {
                op: BinaryOp::And,
                left,
                right,
            } => vec![
                Stmt::new(
                    StmtKind::If {
                        test: *left,
                        consequent: Box::new(Stmt::block(vec![ret(*right)], span)),
                        alternate: None,
                    },
                    span,
                ),
                ret(Expr::new(ExprKind::Bool(false), arg_span)),
            ],
            kind => {
                let mut arg = Expr::new(kind, arg_span);
                self.expand_expr(&mut arg);
                return vec![ret(arg)];
            }
        };
        self.stats.statements += 1;
        self.expand_list(rewritten, true)
    }

    fn expand_for(
        &mut self,
        mut init: Option<ForInit>,
        mut test: Option<Expr>,
        mut update: Option<Expr>,
        body: Stmt,
        span: Span,
        in_body: bool,
    ) -> Vec<Stmt> {
        let body = self.wrap_block(body);
        if let Some(init) = &mut init {
            self.expand_for_init(init);
        }
        if let Some(test) = &mut test {
            self.expand_expr(test);
        }
        if let Some(update) = &mut update {
            self.expand_expr(update);
        }
        let body = Box::new(self.expand_single(body));

        let hoisted = match &mut init {
            Some(ForInit::Var {
                kind: VarKind::Var,
                decls,
            }) if decls.len() > 1 => {
                let used = referenced_names(test.as_ref(), update.as_ref());
                let first_used = decls.iter().position(|decl| {
                    decl.binding
                        .bound_names()
                        .iter()
                        .any(|name| used.contains(*name))
                });
                match first_used {
                    Some(i) if i > 0 => Some(decls.drain(..i).collect::<Vec<_>>()),
                    _ => None,
                }
            }
            _ => None,
        };

        let looped = Stmt::new(
            StmtKind::For {
                init,
                test,
                update,
                body,
            },
            span,
        );
        match hoisted {
            Some(decls) => {
                self.stats.statements += 1;
                let var = Stmt::new(
                    StmtKind::Var {
                        kind: VarKind::Var,
                        decls,
                    },
                    span,
                );
                let mut out = self.expand_stmt(var, in_body);
                out.push(looped);
                out
            }
            None => vec![looped],
        }
    }

    fn expand_for_init(&mut self, init: &mut ForInit) {
        match init {
            ForInit::Var { decls, .. } => self.expand_var_decls(decls),
            ForInit::Expr(e) => self.expand_expr(e),
        }
    }

    fn expand_var_decls(&mut self, decls: &mut [VarDeclarator]) {
        for decl in decls {
            self.expand_binding(&mut decl.binding);
            if let Some(init) = &mut decl.init {
                self.expand_expr(init);
            }
        }
    }

    fn expand_binding(&mut self, binding: &mut Binding) {
        match &mut binding.kind {
            BindingKind::Ident { .. } => {}
            BindingKind::Array { elements } => {
                for elem in elements.iter_mut().flatten() {
                    self.expand_binding(&mut elem.binding);
                    if let Some(default) = &mut elem.default {
                        self.expand_expr(default);
                    }
                }
            }
            BindingKind::Object { properties } => {
                for prop in properties {
                    self.expand_property_key(&mut prop.key);
                    self.expand_binding(&mut prop.value);
                    if let Some(default) = &mut prop.default {
                        self.expand_expr(default);
                    }
                }
            }
        }
    }

    fn expand_params(&mut self, params: &mut [Param]) {
        for param in params {
            self.expand_binding(&mut param.binding);
            if let Some(default) = &mut param.default {
                self.expand_expr(default);
            }
        }
    }

    fn expand_function(&mut self, func: &mut Function) {
        self.expand_params(&mut func.params);
        let body = std::mem::take(&mut func.body);
        func.body = self.expand_body(body);
    }

    fn expand_property_key(&mut self, key: &mut PropertyKey) {
        if let PropertyKey::Computed(e) = key {
            self.expand_expr(e);
        }
    }

    fn expand_class(&mut self, class: &mut Class) {
        if let Some(super_class) = &mut class.super_class {
            self.expand_expr(super_class);
        }
        for member in &mut class.body {
            match &mut member.kind {
                ClassMemberKind::Method { key, value, .. } => {
                    self.expand_property_key(key);
                    self.expand_function(value);
                }
                ClassMemberKind::Property { key, value, .. } => {
                    self.expand_property_key(key);
                    if let Some(value) = value {
                        self.expand_expr(value);
                    }
                }
                ClassMemberKind::StaticBlock(stmts) => {
                    let body = std::mem::take(stmts);
                    *stmts = self.expand_list(body, false);
                }
                ClassMemberKind::Empty => {}
            }
        }
    }

    fn expand_expr(&mut self, expr: &mut Expr) {
        self.expand_expr_children(expr);
        if let ExprKind::Unary {
            op: UnaryOp::Not,
            arg,
        } = &expr.kind
        {
            if let ExprKind::Number(n) = arg.kind {
                expr.kind = ExprKind::Bool(n == 0.0 || n.is_nan());
                self.stats.folds += 1;
            }
        }
    }

    fn expand_expr_children(&mut self, expr: &mut Expr) {
        match &mut expr.kind {
            ExprKind::Function(func) => self.expand_function(func),
            ExprKind::Arrow(arrow) => {
                self.expand_params(&mut arrow.params);
                match &mut arrow.body {
                    ArrowBody::Expr(e) => self.expand_expr(e),
                    ArrowBody::Block(stmts) => {
                        let body = std::mem::take(stmts);
                        *stmts = self.expand_body(body);
                    }
                }
            }
            ExprKind::Class(class) => self.expand_class(class),
            ExprKind::Array(elements) => {
                for elem in elements.iter_mut().flatten() {
                    self.expand_expr(elem);
                }
            }
            ExprKind::Object(props) => {
                for prop in props {
                    self.expand_property_key(&mut prop.key);
                    self.expand_expr(&mut prop.value);
                }
            }
            ExprKind::Unary { arg, .. }
            | ExprKind::Update { arg, .. }
            | ExprKind::Spread(arg)
            | ExprKind::Await(arg)
            | ExprKind::Import(arg) => self.expand_expr(arg),
            ExprKind::Binary { left, right, .. } | ExprKind::Assign { left, right, .. } => {
                self.expand_expr(left);
                self.expand_expr(right);
            }
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.expand_expr(test);
                self.expand_expr(consequent);
                self.expand_expr(alternate);
            }
            ExprKind::Sequence(exprs) | ExprKind::Template { exprs, .. } => {
                for e in exprs {
                    self.expand_expr(e);
                }
            }
            ExprKind::Member {
                object, property, ..
            } => {
                self.expand_expr(object);
                if let MemberProp::Computed(e) = property {
                    self.expand_expr(e);
                }
            }
            ExprKind::Call { callee, args, .. } | ExprKind::New { callee, args } => {
                self.expand_expr(callee);
                for arg in args {
                    self.expand_expr(arg);
                }
            }
            ExprKind::TaggedTemplate { tag, quasi } => {
                self.expand_expr(tag);
                self.expand_expr(quasi);
            }
            ExprKind::Yield { arg, .. } => {
                if let Some(arg) = arg {
                    self.expand_expr(arg);
                }
            }
            ExprKind::Null
            | ExprKind::Bool(_)
            | ExprKind::Number(_)
            | ExprKind::BigInt(_)
            | ExprKind::String(_)
            | ExprKind::Regex { .. }
            | ExprKind::Ident(_)
            | ExprKind::PrivateName(_)
            | ExprKind::This
            | ExprKind::Super
            | ExprKind::MetaProperty { .. } => {}
        }
    }
}

/// Every identifier text in a `for` loop's test and update, property names
/// included.
fn referenced_names(test: Option<&Expr>, update: Option<&Expr>) -> FxHashSet<String> {
    #[derive(Default)]
    struct Names(FxHashSet<String>);

    impl Visit for Names {
        fn visit_ident(&mut self, name: &str) {
            self.0.insert(name.to_string());
        }
    }

    let mut names = Names::default();
    for expr in test.into_iter().chain(update) {
        names.visit_expr(expr);
    }
    names.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand_source(source: &str) -> String {
        let mut ast = parse(source).unwrap();
        expand(&mut ast);
        generate(&ast)
    }

    #[test]
    fn test_logical_statements_become_if() {
        assert_eq!(expand_source("a && b();"), "if (a) {\n  b();\n}\n");
        assert_eq!(expand_source("a || b();"), "if (!a) {\n  b();\n}\n");
    }

    #[test]
    fn test_nested_logical_left_alone() {
        assert_eq!(expand_source("x = a && b;"), "x = a && b;\n");
        assert_eq!(expand_source("f(a || b);"), "f(a || b);\n");
    }

    #[test]
    fn test_conditional_statement_becomes_if_else() {
        assert_eq!(
            expand_source("x ? a() : b();"),
            "if (x) {\n  a();\n} else {\n  b();\n}\n"
        );
    }

    #[test]
    fn test_nested_conditional_statements() {
        assert_eq!(
            expand_source("a ? b() : c ? d() : e();"),
            "if (a) {\n  b();\n} else {\n  if (c) {\n    d();\n  } else {\n    e();\n  }\n}\n"
        );
    }

    #[test]
    fn test_var_split_in_bodies_only() {
        assert_eq!(expand_source("var a = 1, b = 2;"), "var a = 1;\nvar b = 2;\n");
        assert_eq!(
            expand_source("function f() { var a, b; }"),
            "function f() {\n  var a;\n  var b;\n}\n"
        );
        assert_eq!(expand_source("let a = 1, b = 2;"), "let a = 1, b = 2;\n");
        assert_eq!(
            expand_source("switch (x) {\n  case 1:\n    var a, b;\n}"),
            "switch (x) {\n  case 1:\n    var a, b;\n}\n"
        );
    }

    #[test]
    fn test_not_number_folds() {
        assert_eq!(expand_source("x = !0; y = !1;"), "x = true;\ny = false;\n");
        assert_eq!(expand_source("f(!0.5, !a);"), "f(false, !a);\n");
    }

    #[test]
    fn test_sequence_statement_splits() {
        assert_eq!(expand_source("a(), b(), c();"), "a();\nb();\nc();\n");
        assert_eq!(
            expand_source("a && (b(), c());"),
            "if (a) {\n  b();\n  c();\n}\n"
        );
    }

    #[test]
    fn test_single_statement_position_gets_block() {
        assert_eq!(
            expand_source("do a(), b(); while (x);"),
            "do {\n  a();\n  b();\n} while (x);\n"
        );
    }

    #[test]
    fn test_bodies_wrapped_in_blocks() {
        assert_eq!(
            expand_source("if (a) b(); else c();"),
            "if (a) {\n  b();\n} else {\n  c();\n}\n"
        );
        assert_eq!(
            expand_source("if (a) b(); else if (c) d();"),
            "if (a) {\n  b();\n} else if (c) {\n  d();\n}\n"
        );
        assert_eq!(expand_source("while (a) b();"), "while (a) {\n  b();\n}\n");
        assert_eq!(
            expand_source("for (k in o) f(k);"),
            "for (k in o) {\n  f(k);\n}\n"
        );
        assert_eq!(
            expand_source("for (k of o) f(k);"),
            "for (k of o) {\n  f(k);\n}\n"
        );
    }

    #[test]
    fn test_return_sequence() {
        assert_eq!(
            expand_source("function f() { return (a(), b(), c()); }"),
            "function f() {\n  a();\n  b();\n  return c();\n}\n"
        );
    }

    #[test]
    fn test_return_conditional() {
        assert_eq!(
            expand_source("function f() { return a ? b : c; }"),
            "function f() {\n  if (a) {\n    return b;\n  }\n  return c;\n}\n"
        );
    }

    #[test]
    fn test_return_and_but_not_or() {
        assert_eq!(
            expand_source("function f() { return a && b; }"),
            "function f() {\n  if (a) {\n    return b;\n  }\n  return false;\n}\n"
        );
        assert_eq!(
            expand_source("function f() { return a || b; }"),
            "function f() {\n  return a || b;\n}\n"
        );
    }

    #[test]
    fn test_return_in_braceless_if_is_decomposed() {
        assert_eq!(
            expand_source("function f() { if (x) return a(), b; }"),
            "function f() {\n  if (x) {\n    a();\n    return b;\n  }\n}\n"
        );
    }

    #[test]
    fn test_for_init_split() {
        assert_eq!(
            expand_source("for (var j = 0, i = 0; i < 10; i++) use(j);"),
            "var j = 0;\nfor (var i = 0; i < 10; i++) {\n  use(j);\n}\n"
        );
    }

    #[test]
    fn test_for_init_no_split_when_first_used() {
        assert_eq!(
            expand_source("for (var i = 0, j = 0; i < 10; i++) use(j);"),
            "for (var i = 0, j = 0; i < 10; i++) {\n  use(j);\n}\n"
        );
        assert_eq!(
            expand_source("for (var a = 0, b = 0; ; ) x();"),
            "for (var a = 0, b = 0;;) {\n  x();\n}\n"
        );
    }

    #[test]
    fn test_for_init_hoisted_var_is_split() {
        assert_eq!(
            expand_source("for (var a = 1, b = 2, i = 0; i < n; i++) {}"),
            "var a = 1;\nvar b = 2;\nfor (var i = 0; i < n; i++) {}\n"
        );
    }

    #[test]
    fn test_for_init_counts_property_names() {
        assert_eq!(
            expand_source("for (var a = 0, j = 0; o.j; ) {}"),
            "var a = 0;\nfor (var j = 0; o.j;) {}\n"
        );
    }

    #[test]
    fn test_labeled_loop_split() {
        assert_eq!(
            expand_source("l: for (var a = 0, b = 0; b < 1; b++) x();"),
            "var a = 0;\nl: for (var b = 0; b < 1; b++) {\n  x();\n}\n"
        );
    }

    #[test]
    fn test_for_init_split_in_single_statement_position() {
        assert_eq!(
            expand_source("do for (var a = 0, b = 0, i = 0; i < 1; i++) x(); while (y);"),
            "do {\n  var a = 0;\n  var b = 0;\n  for (var i = 0; i < 1; i++) {\n    x();\n  }\n} while (y);\n"
        );
        assert_eq!(
            expand_source("with (o) for (var a = 0, b = 0, i = 0; i < 1; i++) x();"),
            "with (o) {\n  var a = 0;\n  var b = 0;\n  for (var i = 0; i < 1; i++) {\n    x();\n  }\n}\n"
        );
        assert_eq!(
            expand_source("do l: for (var a = 0, b = 0, i = 0; i < 1; i++) x(); while (y);"),
            "do {\n  var a = 0;\n  var b = 0;\n  l: for (var i = 0; i < 1; i++) {\n    x();\n  }\n} while (y);\n"
        );
    }

    #[test]
    fn test_descends_into_nested_functions() {
        assert_eq!(
            expand_source("f(function () { a && b(); }, () => { c || d(); });"),
            "f(function () {\n  if (a) {\n    b();\n  }\n}, () => {\n  if (!c) {\n    d();\n  }\n});\n"
        );
    }

    #[test]
    fn test_stats() {
        let mut ast = parse("a && b(); if (x) y(); z = !0;").unwrap();
        let stats = expand(&mut ast);
        assert_eq!(
            stats,
            ExpandStats {
                statements: 1,
                blocks: 1,
                folds: 1
            }
        );
    }

    #[test]
    fn test_idempotent() {
        let source = "var a = 1, b = 2; a ? b() : c && d(); for (var x = 0, i = 0; i < 3; i++) if (i) f(i), g(); function h() { return a, b ? c : !0; } do for (var a=0,b=0,i=0;i<1;i++); while(x); with (o) l: for (var a=0,b=0,i=0;i<1;i++) a(), b();";
        let mut once = parse(source).unwrap();
        expand(&mut once);
        let mut twice = once.clone();
        let stats = expand(&mut twice);
        assert_eq!(generate(&once), generate(&twice));
        assert_eq!(stats, ExpandStats::default());
    }
}
