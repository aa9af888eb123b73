//! JavaScript code generator.
//!
//! Converts an AST back to readable JavaScript source: one statement per
//! line, blocks opened on the same line, object literals one property per
//! line. Parentheses are derived from operator precedence, so the tree does
//! not need to remember where the input had them. Comments are not kept.

use crate::ast::*;

/// Code generation options.
#[derive(Debug, Clone)]
pub struct CodegenOptions {
    /// Indent string (default: two spaces).
    pub indent: String,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
        }
    }
}

impl CodegenOptions {
    /// Indent with `width` spaces.
    pub fn with_indent_width(width: usize) -> Self {
        Self {
            indent: " ".repeat(width),
        }
    }
}

// Precedence levels used for parenthesization.
const PREC_SEQUENCE: u8 = 0;
const PREC_ASSIGN: u8 = 1;
const PREC_CONDITIONAL: u8 = 2;
const PREC_NULLISH: u8 = 3;
const PREC_UNARY: u8 = 15;
const PREC_POSTFIX: u8 = 16;
const PREC_LHS: u8 = 17;
const PREC_CALL: u8 = 18;
const PREC_PRIMARY: u8 = 20;

/// The code generator.
pub struct Codegen<'a> {
    /// The AST to generate code from.
    ast: &'a Ast,
    /// Output buffer.
    output: String,
    /// Current indentation level.
    indent_level: usize,
    /// Indent string.
    indent_str: String,
    /// Inside a `for` initializer, where a bare `in` would be misread.
    forbid_in: bool,
}

impl<'a> Codegen<'a> {
    /// Create a new code generator.
    pub fn new(ast: &'a Ast, options: CodegenOptions) -> Self {
        Self {
            ast,
            output: String::with_capacity(ast.source.len() * 2),
            indent_level: 0,
            indent_str: options.indent,
            forbid_in: false,
        }
    }

    /// Generate JavaScript source code.
    pub fn generate(mut self) -> String {
        let ast = self.ast;
        self.emit_stmt_list(&ast.stmts);
        self.output
    }

    // =========================================================================
    // Output Helpers
    // =========================================================================

    fn emit(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn emit_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(&self.indent_str);
        }
    }

    fn emit_newline(&mut self) {
        self.output.push('\n');
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Emit a prefix operator, keeping `- -x` and `+ +x` apart.
    fn emit_prefix_op(&mut self, op: &str) {
        if let (Some(last), Some(first)) = (self.output.chars().last(), op.chars().next()) {
            if (first == '+' || first == '-') && last == first {
                self.output.push(' ');
            }
        }
        self.emit(op);
    }

    // =========================================================================
    // Statement Emission
    // =========================================================================

    fn emit_stmt_list(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.emit_indent();
            self.emit_stmt(stmt);
            self.emit_newline();
        }
    }

    fn emit_block(&mut self, stmts: &[Stmt]) {
        if stmts.is_empty() {
            self.emit("{}");
            return;
        }
        self.emit("{");
        self.emit_newline();
        self.indent();
        self.emit_stmt_list(stmts);
        self.dedent();
        self.emit_indent();
        self.emit("}");
    }

    /// Body of `if`, loops, `with` and labels.
    fn emit_body(&mut self, body: &Stmt) {
        match &body.kind {
            StmtKind::Empty => self.emit(";"),
            _ => {
                self.emit(" ");
                self.emit_stmt(body);
            }
        }
    }

    fn emit_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Var { kind, decls } => {
                self.emit_var_decl(*kind, decls);
                self.emit(";");
            }
            StmtKind::Function(func) => self.emit_function(func),
            StmtKind::Class(class) => self.emit_class(class),
            StmtKind::Block(stmts) => self.emit_block(stmts),
            StmtKind::If {
                test,
                consequent,
                alternate,
            } => {
                self.emit("if (");
                self.emit_expr(test);
                self.emit(")");
                match alternate {
                    Some(alt) => {
                        if ends_with_open_if(consequent) {
                            // Keep the `else` attached to this `if`.
                            self.emit(" ");
                            self.emit_block(std::slice::from_ref(&**consequent));
                        } else {
                            self.emit_body(consequent);
                        }
                        if matches!(consequent.kind, StmtKind::Block(_)) {
                            self.emit(" else");
                        } else {
                            self.emit_newline();
                            self.emit_indent();
                            self.emit("else");
                        }
                        self.emit_body(alt);
                    }
                    None => self.emit_body(consequent),
                }
            }
            StmtKind::Switch {
                discriminant,
                cases,
            } => {
                self.emit("switch (");
                self.emit_expr(discriminant);
                self.emit(") {");
                self.emit_newline();
                self.indent();
                for case in cases {
                    self.emit_indent();
                    match &case.test {
                        Some(test) => {
                            self.emit("case ");
                            self.emit_expr(test);
                            self.emit(":");
                        }
                        None => self.emit("default:"),
                    }
                    self.emit_newline();
                    self.indent();
                    self.emit_stmt_list(&case.consequent);
                    self.dedent();
                }
                self.dedent();
                self.emit_indent();
                self.emit("}");
            }
            StmtKind::For {
                init,
                test,
                update,
                body,
            } => {
                self.emit("for (");
                if let Some(init) = init {
                    self.emit_for_init(init);
                }
                self.emit(";");
                if let Some(test) = test {
                    self.emit(" ");
                    self.emit_expr(test);
                }
                self.emit(";");
                if let Some(update) = update {
                    self.emit(" ");
                    self.emit_expr(update);
                }
                self.emit(")");
                self.emit_body(body);
            }
            StmtKind::ForIn { left, right, body } => {
                self.emit("for (");
                self.emit_for_init(left);
                self.emit(" in ");
                self.emit_expr(right);
                self.emit(")");
                self.emit_body(body);
            }
            StmtKind::ForOf {
                left,
                right,
                body,
                is_await,
            } => {
                self.emit(if *is_await { "for await (" } else { "for (" });
                self.emit_for_init(left);
                self.emit(" of ");
                self.emit_expr_prec(right, PREC_ASSIGN);
                self.emit(")");
                self.emit_body(body);
            }
            StmtKind::While { test, body } => {
                self.emit("while (");
                self.emit_expr(test);
                self.emit(")");
                self.emit_body(body);
            }
            StmtKind::DoWhile { body, test } => {
                self.emit("do");
                self.emit_body(body);
                if matches!(body.kind, StmtKind::Block(_)) {
                    self.emit(" ");
                } else {
                    self.emit_newline();
                    self.emit_indent();
                }
                self.emit("while (");
                self.emit_expr(test);
                self.emit(");");
            }
            StmtKind::Break { label } => {
                self.emit("break");
                if let Some(label) = label {
                    self.emit(" ");
                    self.emit(label);
                }
                self.emit(";");
            }
            StmtKind::Continue { label } => {
                self.emit("continue");
                if let Some(label) = label {
                    self.emit(" ");
                    self.emit(label);
                }
                self.emit(";");
            }
            StmtKind::Return { arg } => {
                self.emit("return");
                if let Some(arg) = arg {
                    self.emit(" ");
                    self.emit_expr(arg);
                }
                self.emit(";");
            }
            StmtKind::Throw { arg } => {
                self.emit("throw ");
                self.emit_expr(arg);
                self.emit(";");
            }
            StmtKind::Try {
                block,
                handler,
                finalizer,
            } => {
                self.emit("try ");
                self.emit_block(block);
                if let Some(handler) = handler {
                    self.emit(" catch ");
                    if let Some(param) = &handler.param {
                        self.emit("(");
                        self.emit_binding(param);
                        self.emit(") ");
                    }
                    self.emit_block(&handler.body);
                }
                if let Some(finalizer) = finalizer {
                    self.emit(" finally ");
                    self.emit_block(finalizer);
                }
            }
            StmtKind::Labeled { label, body } => {
                self.emit(label);
                self.emit(":");
                self.emit_body(body);
            }
            StmtKind::Expr(expr) => {
                if starts_with_declaration_keyword(expr) {
                    self.emit("(");
                    self.emit_expr(expr);
                    self.emit(")");
                } else {
                    self.emit_expr(expr);
                }
                self.emit(";");
            }
            StmtKind::Empty => self.emit(";"),
            StmtKind::Debugger => self.emit("debugger;"),
            StmtKind::With { object, body } => {
                self.emit("with (");
                self.emit_expr(object);
                self.emit(")");
                self.emit_body(body);
            }
            StmtKind::Import(decl) => self.emit_import(decl),
            StmtKind::Export(decl) => self.emit_export(decl),
        }
    }

    fn emit_var_decl(&mut self, kind: VarKind, decls: &[VarDeclarator]) {
        self.emit(kind.as_str());
        self.emit(" ");
        for (i, decl) in decls.iter().enumerate() {
            if i > 0 {
                self.emit(", ");
            }
            self.emit_binding(&decl.binding);
            if let Some(init) = &decl.init {
                self.emit(" = ");
                self.emit_expr_prec(init, PREC_ASSIGN);
            }
        }
    }

    fn emit_for_init(&mut self, init: &ForInit) {
        let saved = self.forbid_in;
        self.forbid_in = true;
        match init {
            ForInit::Var { kind, decls } => self.emit_var_decl(*kind, decls),
            ForInit::Expr(expr) => {
                if expr.as_ident() == Some("let") || starts_with_let_member(expr) {
                    self.emit("(");
                    self.emit_expr(expr);
                    self.emit(")");
                } else {
                    self.emit_expr(expr);
                }
            }
        }
        self.forbid_in = saved;
    }

    fn emit_binding(&mut self, binding: &Binding) {
        match &binding.kind {
            BindingKind::Ident { name } => self.emit(name),
            BindingKind::Array { elements } => {
                self.emit("[");
                for (i, elem) in elements.iter().enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    if let Some(elem) = elem {
                        if elem.rest {
                            self.emit("...");
                        }
                        self.emit_binding(&elem.binding);
                        self.emit_default(elem.default.as_ref());
                    }
                }
                if matches!(elements.last(), Some(None)) {
                    self.emit(",");
                }
                self.emit("]");
            }
            BindingKind::Object { properties } => {
                if properties.is_empty() {
                    self.emit("{}");
                    return;
                }
                self.emit("{ ");
                for (i, prop) in properties.iter().enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    if prop.rest {
                        self.emit("...");
                        self.emit_binding(&prop.value);
                        continue;
                    }
                    let is_shorthand = match (&prop.key, &prop.value.kind) {
                        (PropertyKey::Ident(key), BindingKind::Ident { name }) => key == name,
                        _ => false,
                    };
                    if !is_shorthand {
                        self.emit_property_key(&prop.key);
                        self.emit(": ");
                    }
                    self.emit_binding(&prop.value);
                    self.emit_default(prop.default.as_ref());
                }
                self.emit(" }");
            }
        }
    }

    fn emit_default(&mut self, default: Option<&Expr>) {
        if let Some(default) = default {
            self.emit(" = ");
            self.emit_expr_prec(default, PREC_ASSIGN);
        }
    }

    fn emit_params(&mut self, params: &[Param]) {
        self.emit("(");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.emit(", ");
            }
            if param.rest {
                self.emit("...");
            }
            self.emit_binding(&param.binding);
            self.emit_default(param.default.as_ref());
        }
        self.emit(")");
    }

    fn emit_function(&mut self, func: &Function) {
        if func.is_async {
            self.emit("async ");
        }
        self.emit("function");
        if func.is_generator {
            self.emit("*");
        }
        self.emit(" ");
        if let Some(name) = &func.name {
            self.emit(name);
        }
        self.emit_params(&func.params);
        self.emit(" ");
        self.emit_block(&func.body);
    }

    fn emit_arrow(&mut self, arrow: &ArrowFunction) {
        if arrow.is_async {
            self.emit("async ");
        }
        let simple_param = match arrow.params.as_slice() {
            [param] => {
                !param.rest
                    && param.default.is_none()
                    && matches!(param.binding.kind, BindingKind::Ident { .. })
            }
            _ => false,
        };
        if simple_param && !arrow.is_async {
            self.emit_binding(&arrow.params[0].binding);
        } else {
            self.emit_params(&arrow.params);
        }
        self.emit(" => ");
        match &arrow.body {
            ArrowBody::Block(stmts) => self.emit_block(stmts),
            ArrowBody::Expr(expr) => {
                let saved = self.forbid_in;
                self.forbid_in = false;
                if starts_with_object(expr) {
                    self.emit("(");
                    self.emit_expr(expr);
                    self.emit(")");
                } else {
                    self.emit_expr_prec(expr, PREC_ASSIGN);
                }
                self.forbid_in = saved;
            }
        }
    }

    fn emit_class(&mut self, class: &Class) {
        self.emit("class");
        if let Some(name) = &class.name {
            self.emit(" ");
            self.emit(name);
        }
        if let Some(super_class) = &class.super_class {
            self.emit(" extends ");
            self.emit_expr_prec(super_class, PREC_LHS);
        }
        self.emit(" ");

        let members: Vec<&ClassMember> = class
            .body
            .iter()
            .filter(|m| !matches!(m.kind, ClassMemberKind::Empty))
            .collect();
        if members.is_empty() {
            self.emit("{}");
            return;
        }

        self.emit("{");
        self.emit_newline();
        self.indent();
        for member in members {
            self.emit_indent();
            self.emit_class_member(member);
            self.emit_newline();
        }
        self.dedent();
        self.emit_indent();
        self.emit("}");
    }

    fn emit_class_member(&mut self, member: &ClassMember) {
        match &member.kind {
            ClassMemberKind::Method {
                key,
                value,
                kind,
                is_static,
            } => {
                if *is_static {
                    self.emit("static ");
                }
                let prefix = match kind {
                    MethodKind::Get => Some("get "),
                    MethodKind::Set => Some("set "),
                    MethodKind::Method | MethodKind::Constructor => None,
                };
                self.emit_method(key, value, prefix);
            }
            ClassMemberKind::Property {
                key,
                value,
                is_static,
            } => {
                if *is_static {
                    self.emit("static ");
                }
                self.emit_property_key(key);
                if let Some(value) = value {
                    self.emit(" = ");
                    self.emit_expr_prec(value, PREC_ASSIGN);
                }
                self.emit(";");
            }
            ClassMemberKind::StaticBlock(stmts) => {
                self.emit("static ");
                self.emit_block(stmts);
            }
            ClassMemberKind::Empty => {}
        }
    }

    /// Method syntax shared by classes and object literals.
    fn emit_method(&mut self, key: &PropertyKey, func: &Function, prefix: Option<&str>) {
        if let Some(prefix) = prefix {
            self.emit(prefix);
        }
        if func.is_async {
            self.emit("async ");
        }
        if func.is_generator {
            self.emit("*");
        }
        self.emit_property_key(key);
        self.emit_params(&func.params);
        self.emit(" ");
        self.emit_block(&func.body);
    }

    fn emit_import(&mut self, decl: &ImportDecl) {
        self.emit("import ");
        if decl.specifiers.is_empty() {
            self.emit_string(&decl.source);
            self.emit(";");
            return;
        }

        let mut named = Vec::new();
        let mut wrote_any = false;
        for spec in &decl.specifiers {
            match spec {
                ImportSpecifier::Default { local, .. } => {
                    self.emit(local);
                    wrote_any = true;
                }
                ImportSpecifier::Namespace { local, .. } => {
                    if wrote_any {
                        self.emit(", ");
                    }
                    self.emit("* as ");
                    self.emit(local);
                    wrote_any = true;
                }
                ImportSpecifier::Named {
                    imported, local, ..
                } => named.push((imported, local)),
            }
        }
        if !named.is_empty() {
            if wrote_any {
                self.emit(", ");
            }
            self.emit("{ ");
            for (i, (imported, local)) in named.into_iter().enumerate() {
                if i > 0 {
                    self.emit(", ");
                }
                self.emit(imported);
                if imported != local {
                    self.emit(" as ");
                    self.emit(local);
                }
            }
            self.emit(" }");
        }
        self.emit(" from ");
        self.emit_string(&decl.source);
        self.emit(";");
    }

    fn emit_export(&mut self, decl: &ExportDecl) {
        self.emit("export ");
        match decl {
            ExportDecl::Named {
                specifiers, source, ..
            } => {
                if specifiers.is_empty() {
                    self.emit("{}");
                } else {
                    self.emit("{ ");
                    for (i, spec) in specifiers.iter().enumerate() {
                        if i > 0 {
                            self.emit(", ");
                        }
                        self.emit(&spec.local);
                        if spec.local != spec.exported {
                            self.emit(" as ");
                            self.emit(&spec.exported);
                        }
                    }
                    self.emit(" }");
                }
                if let Some(source) = source {
                    self.emit(" from ");
                    self.emit_string(source);
                }
                self.emit(";");
            }
            ExportDecl::Default { expr, .. } => {
                self.emit("default ");
                match &expr.kind {
                    ExprKind::Function(func) if func.name.is_none() => self.emit_function(func),
                    ExprKind::Class(class) if class.name.is_none() => self.emit_class(class),
                    _ => {
                        if starts_with_declaration_keyword(expr) {
                            self.emit("(");
                            self.emit_expr(expr);
                            self.emit(")");
                        } else {
                            self.emit_expr_prec(expr, PREC_ASSIGN);
                        }
                        self.emit(";");
                    }
                }
            }
            ExportDecl::DefaultDecl { decl, .. } => {
                self.emit("default ");
                self.emit_stmt(decl);
            }
            ExportDecl::Decl { decl, .. } => self.emit_stmt(decl),
            ExportDecl::All {
                exported, source, ..
            } => {
                self.emit("*");
                if let Some(exported) = exported {
                    self.emit(" as ");
                    self.emit(exported);
                }
                self.emit(" from ");
                self.emit_string(source);
                self.emit(";");
            }
        }
    }

    // =========================================================================
    // Expression Emission
    // =========================================================================

    fn emit_expr(&mut self, expr: &Expr) {
        self.emit_expr_prec(expr, PREC_SEQUENCE);
    }

    fn emit_expr_prec(&mut self, expr: &Expr, min_prec: u8) {
        let needs_parens = expr_prec(expr) < min_prec
            || (self.forbid_in && matches!(expr.kind, ExprKind::Binary { op: BinaryOp::In, .. }));
        if needs_parens {
            let saved = self.forbid_in;
            self.forbid_in = false;
            self.emit("(");
            self.emit_expr_inner(expr);
            self.emit(")");
            self.forbid_in = saved;
        } else {
            self.emit_expr_inner(expr);
        }
    }

    fn emit_expr_inner(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Null => self.emit("null"),
            ExprKind::Bool(b) => self.emit(if *b { "true" } else { "false" }),
            ExprKind::Number(n) => self.emit(&format_number(*n)),
            ExprKind::BigInt(digits) => {
                self.emit(digits);
                self.emit("n");
            }
            ExprKind::String(s) => self.emit_string(s),
            ExprKind::Regex { pattern, flags } => {
                self.emit("/");
                self.emit(pattern);
                self.emit("/");
                self.emit(flags);
            }
            ExprKind::Template { quasis, exprs } => self.emit_template(quasis, exprs),
            ExprKind::Ident(name) => self.emit(name),
            ExprKind::PrivateName(name) => {
                self.emit("#");
                self.emit(name);
            }
            ExprKind::This => self.emit("this"),
            ExprKind::Super => self.emit("super"),
            ExprKind::Array(elements) => {
                self.emit("[");
                for (i, elem) in elements.iter().enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    if let Some(elem) = elem {
                        self.emit_expr_prec(elem, PREC_ASSIGN);
                    }
                }
                if matches!(elements.last(), Some(None)) {
                    self.emit(",");
                }
                self.emit("]");
            }
            ExprKind::Object(properties) => {
                if properties.is_empty() {
                    self.emit("{}");
                    return;
                }
                let saved = self.forbid_in;
                self.forbid_in = false;
                self.emit("{");
                self.emit_newline();
                self.indent();
                for (i, prop) in properties.iter().enumerate() {
                    self.emit_indent();
                    self.emit_object_property(prop);
                    if i + 1 < properties.len() {
                        self.emit(",");
                    }
                    self.emit_newline();
                }
                self.dedent();
                self.emit_indent();
                self.emit("}");
                self.forbid_in = saved;
            }
            ExprKind::Function(func) => {
                let saved = self.forbid_in;
                self.forbid_in = false;
                self.emit_function(func);
                self.forbid_in = saved;
            }
            ExprKind::Arrow(arrow) => self.emit_arrow(arrow),
            ExprKind::Class(class) => {
                let saved = self.forbid_in;
                self.forbid_in = false;
                self.emit_class(class);
                self.forbid_in = saved;
            }
            ExprKind::Unary { op, arg } => {
                self.emit_prefix_op(op.as_str());
                if matches!(op, UnaryOp::Typeof | UnaryOp::Void | UnaryOp::Delete) {
                    self.emit(" ");
                }
                self.emit_expr_prec(arg, PREC_UNARY);
            }
            ExprKind::Binary { op, left, right } => {
                let prec = binary_prec(*op);
                let (left_min, right_min) = if *op == BinaryOp::Pow {
                    (PREC_POSTFIX, prec)
                } else {
                    (prec, prec + 1)
                };
                self.emit_binary_operand(*op, left, left_min);
                self.emit(" ");
                self.emit(op.as_str());
                self.emit(" ");
                self.emit_binary_operand(*op, right, right_min);
            }
            ExprKind::Assign { op, left, right } => {
                self.emit_expr_prec(left, PREC_LHS);
                self.emit(" ");
                self.emit(op.as_str());
                self.emit(" ");
                self.emit_expr_prec(right, PREC_ASSIGN);
            }
            ExprKind::Update { op, prefix, arg } => {
                if *prefix {
                    self.emit_prefix_op(op.as_str());
                    self.emit_expr_prec(arg, PREC_POSTFIX);
                } else {
                    self.emit_expr_prec(arg, PREC_LHS);
                    self.emit(op.as_str());
                }
            }
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.emit_expr_prec(test, PREC_NULLISH);
                self.emit(" ? ");
                let saved = self.forbid_in;
                self.forbid_in = false;
                self.emit_expr_prec(consequent, PREC_ASSIGN);
                self.forbid_in = saved;
                self.emit(" : ");
                self.emit_expr_prec(alternate, PREC_ASSIGN);
            }
            ExprKind::Sequence(exprs) => {
                for (i, e) in exprs.iter().enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    self.emit_expr_prec(e, PREC_ASSIGN);
                }
            }
            ExprKind::Member {
                object,
                property,
                optional,
            } => {
                if matches!(object.kind, ExprKind::Number(_)) {
                    self.emit("(");
                    self.emit_expr_inner(object);
                    self.emit(")");
                } else {
                    self.emit_expr_prec(object, PREC_LHS);
                }
                self.emit_member_prop(property, *optional);
            }
            ExprKind::Call {
                callee,
                args,
                optional,
            } => {
                self.emit_expr_prec(callee, PREC_LHS);
                if *optional {
                    self.emit("?.");
                }
                self.emit_args(args);
            }
            ExprKind::New { callee, args } => {
                self.emit("new ");
                if contains_call(callee) {
                    self.emit("(");
                    self.emit_expr(callee);
                    self.emit(")");
                } else {
                    self.emit_expr_prec(callee, PREC_CALL);
                }
                self.emit_args(args);
            }
            ExprKind::TaggedTemplate { tag, quasi } => {
                self.emit_expr_prec(tag, PREC_LHS);
                self.emit_expr_inner(quasi);
            }
            ExprKind::Spread(arg) => {
                self.emit("...");
                self.emit_expr_prec(arg, PREC_ASSIGN);
            }
            ExprKind::Yield { arg, delegate } => {
                self.emit("yield");
                if *delegate {
                    self.emit("*");
                }
                if let Some(arg) = arg {
                    self.emit(" ");
                    self.emit_expr_prec(arg, PREC_ASSIGN);
                }
            }
            ExprKind::Await(arg) => {
                self.emit("await ");
                self.emit_expr_prec(arg, PREC_UNARY);
            }
            ExprKind::Import(arg) => {
                self.emit("import(");
                self.emit_expr_prec(arg, PREC_ASSIGN);
                self.emit(")");
            }
            ExprKind::MetaProperty { meta, property } => {
                self.emit(meta);
                self.emit(".");
                self.emit(property);
            }
        }
    }

    /// `??` cannot be mixed with `||` or `&&` without parentheses.
    fn emit_binary_operand(&mut self, parent: BinaryOp, operand: &Expr, min_prec: u8) {
        let mixes_nullish = match &operand.kind {
            ExprKind::Binary { op, .. } => {
                (parent == BinaryOp::NullishCoalesce && matches!(op, BinaryOp::Or | BinaryOp::And))
                    || (matches!(parent, BinaryOp::Or | BinaryOp::And)
                        && *op == BinaryOp::NullishCoalesce)
            }
            _ => false,
        };
        if mixes_nullish {
            self.emit("(");
            self.emit_expr_inner(operand);
            self.emit(")");
        } else {
            self.emit_expr_prec(operand, min_prec);
        }
    }

    fn emit_member_prop(&mut self, property: &MemberProp, optional: bool) {
        match property {
            MemberProp::Ident(name) => {
                self.emit(if optional { "?." } else { "." });
                self.emit(name);
            }
            MemberProp::Private(name) => {
                self.emit(if optional { "?.#" } else { ".#" });
                self.emit(name);
            }
            MemberProp::Computed(expr) => {
                if optional {
                    self.emit("?.");
                }
                let saved = self.forbid_in;
                self.forbid_in = false;
                self.emit("[");
                self.emit_expr(expr);
                self.emit("]");
                self.forbid_in = saved;
            }
        }
    }

    fn emit_args(&mut self, args: &[Expr]) {
        let saved = self.forbid_in;
        self.forbid_in = false;
        self.emit("(");
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.emit(", ");
            }
            self.emit_expr_prec(arg, PREC_ASSIGN);
        }
        self.emit(")");
        self.forbid_in = saved;
    }

    fn emit_template(&mut self, quasis: &[String], exprs: &[Expr]) {
        let saved = self.forbid_in;
        self.forbid_in = false;
        self.emit("`");
        for (i, quasi) in quasis.iter().enumerate() {
            self.emit(quasi);
            if let Some(expr) = exprs.get(i) {
                self.emit("${");
                self.emit_expr(expr);
                self.emit("}");
            }
        }
        self.emit("`");
        self.forbid_in = saved;
    }

    fn emit_object_property(&mut self, prop: &Property) {
        match prop.kind {
            PropertyKind::Spread => {
                self.emit("...");
                self.emit_expr_prec(&prop.value, PREC_ASSIGN);
            }
            PropertyKind::Get | PropertyKind::Set | PropertyKind::Method => {
                let ExprKind::Function(func) = &prop.value.kind else {
                    self.emit_property_key(&prop.key);
                    self.emit(": ");
                    self.emit_expr_prec(&prop.value, PREC_ASSIGN);
                    return;
                };
                let prefix = match prop.kind {
                    PropertyKind::Get => Some("get "),
                    PropertyKind::Set => Some("set "),
                    _ => None,
                };
                self.emit_method(&prop.key, func, prefix);
            }
            PropertyKind::Init => {
                if let PropertyKey::Ident(key) = &prop.key {
                    match &prop.value.kind {
                        ExprKind::Ident(name) if name == key => {
                            self.emit(key);
                            return;
                        }
                        // `{ a = 1 }` inside an assignment pattern.
                        ExprKind::Assign {
                            op: AssignOp::Assign,
                            left,
                            right,
                        } if prop.shorthand && left.as_ident() == Some(key.as_str()) => {
                            self.emit(key);
                            self.emit(" = ");
                            self.emit_expr_prec(right, PREC_ASSIGN);
                            return;
                        }
                        _ => {}
                    }
                }
                self.emit_property_key(&prop.key);
                self.emit(": ");
                self.emit_expr_prec(&prop.value, PREC_ASSIGN);
            }
        }
    }

    fn emit_property_key(&mut self, key: &PropertyKey) {
        match key {
            PropertyKey::Ident(name) => self.emit(name),
            PropertyKey::String(s) => self.emit_string(s),
            PropertyKey::Number(n) => self.emit(&format_number(*n)),
            PropertyKey::BigInt(digits) => {
                self.emit(digits);
                self.emit("n");
            }
            PropertyKey::Private(name) => {
                self.emit("#");
                self.emit(name);
            }
            PropertyKey::Computed(expr) => {
                self.emit("[");
                self.emit_expr_prec(expr, PREC_ASSIGN);
                self.emit("]");
            }
        }
    }

    fn emit_string(&mut self, s: &str) {
        self.output.push('"');
        escape_string_into(&mut self.output, s);
        self.output.push('"');
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn expr_prec(expr: &Expr) -> u8 {
    match &expr.kind {
        ExprKind::Sequence(_) => PREC_SEQUENCE,
        ExprKind::Assign { .. }
        | ExprKind::Arrow(_)
        | ExprKind::Yield { .. }
        | ExprKind::Spread(_) => PREC_ASSIGN,
        ExprKind::Conditional { .. } => PREC_CONDITIONAL,
        ExprKind::Binary { op, .. } => binary_prec(*op),
        ExprKind::Unary { .. } | ExprKind::Await(_) => PREC_UNARY,
        ExprKind::Update { prefix: true, .. } => PREC_UNARY,
        ExprKind::Update { prefix: false, .. } => PREC_POSTFIX,
        ExprKind::Member { .. }
        | ExprKind::Call { .. }
        | ExprKind::New { .. }
        | ExprKind::TaggedTemplate { .. }
        | ExprKind::Import(_) => PREC_CALL,
        _ => PREC_PRIMARY,
    }
}

fn binary_prec(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::NullishCoalesce => PREC_NULLISH,
        BinaryOp::Or => 4,
        BinaryOp::And => 5,
        BinaryOp::BitOr => 6,
        BinaryOp::BitXor => 7,
        BinaryOp::BitAnd => 8,
        BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::StrictEq | BinaryOp::StrictNotEq => 9,
        BinaryOp::Lt
        | BinaryOp::LtEq
        | BinaryOp::Gt
        | BinaryOp::GtEq
        | BinaryOp::In
        | BinaryOp::Instanceof => 10,
        BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => 11,
        BinaryOp::Add | BinaryOp::Sub => 12,
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 13,
        BinaryOp::Pow => 14,
    }
}

/// The leftmost sub-expression, as it would appear first in the output
/// when no parentheses are added.
fn leftmost(expr: &Expr) -> &Expr {
    match &expr.kind {
        ExprKind::Sequence(exprs) => exprs.first().map_or(expr, leftmost),
        ExprKind::Assign { left, .. } => leftmost(left),
        ExprKind::Conditional { test, .. } => leftmost(test),
        ExprKind::Binary { left, .. } => leftmost(left),
        ExprKind::Update { prefix: false, arg, .. } => leftmost(arg),
        ExprKind::Member { object, .. } => leftmost(object),
        ExprKind::Call { callee, .. } => leftmost(callee),
        ExprKind::TaggedTemplate { tag, .. } => leftmost(tag),
        _ => expr,
    }
}

/// An expression statement must not begin with `{`, `function` or `class`.
fn starts_with_declaration_keyword(expr: &Expr) -> bool {
    matches!(
        leftmost(expr).kind,
        ExprKind::Object(_) | ExprKind::Function(_) | ExprKind::Class(_)
    ) || starts_with_let_member(expr)
}

/// `let[x]` at the start of a statement reads as a declaration.
fn starts_with_let_member(expr: &Expr) -> bool {
    fn walk(expr: &Expr) -> bool {
        match &expr.kind {
            ExprKind::Member {
                object,
                property: MemberProp::Computed(_),
                ..
            } if object.as_ident() == Some("let") => true,
            ExprKind::Sequence(exprs) => exprs.first().is_some_and(walk),
            ExprKind::Assign { left, .. } => walk(left),
            ExprKind::Conditional { test, .. } => walk(test),
            ExprKind::Binary { left, .. } => walk(left),
            ExprKind::Update { prefix: false, arg, .. } => walk(arg),
            ExprKind::Member { object, .. } => walk(object),
            ExprKind::Call { callee, .. } => walk(callee),
            ExprKind::TaggedTemplate { tag, .. } => walk(tag),
            _ => false,
        }
    }
    walk(expr)
}

/// An arrow body must not begin with `{`.
fn starts_with_object(expr: &Expr) -> bool {
    matches!(leftmost(expr).kind, ExprKind::Object(_))
}

/// A `new` callee with a call in its member chain needs parentheses, or the
/// call's arguments would be taken as the constructor's.
fn contains_call(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Call { .. } => true,
        ExprKind::Member {
            object, optional, ..
        } => *optional || contains_call(object),
        ExprKind::TaggedTemplate { tag, .. } => contains_call(tag),
        _ => false,
    }
}

/// Whether an `else` printed after `stmt` would bind to a nested `if`.
fn ends_with_open_if(stmt: &Stmt) -> bool {
    match &stmt.kind {
        StmtKind::If {
            alternate: None, ..
        } => true,
        StmtKind::If {
            alternate: Some(alt),
            ..
        } => ends_with_open_if(alt),
        StmtKind::For { body, .. }
        | StmtKind::ForIn { body, .. }
        | StmtKind::ForOf { body, .. }
        | StmtKind::While { body, .. }
        | StmtKind::With { body, .. }
        | StmtKind::Labeled { body, .. } => ends_with_open_if(body),
        _ => false,
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        // Only reachable from literals such as `1e999`.
        return "1e999".to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        let s = format!("{}", n);
        let exp = format!("{:e}", n);
        if exp.len() < s.len() {
            exp
        } else {
            s
        }
    }
}

fn escape_string_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\u{b}' => out.push_str("\\v"),
            '\0' => out.push_str("\\x00"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Parser, ParserOptions};

    fn roundtrip(source: &str) -> String {
        let ast = Parser::new(source, ParserOptions::default()).parse().unwrap();
        Codegen::new(&ast, CodegenOptions::default()).generate()
    }

    #[test]
    fn test_variable_declaration() {
        assert_eq!(roundtrip("let x = 1;"), "let x = 1;\n");
    }

    #[test]
    fn test_function_declaration() {
        assert_eq!(
            roundtrip("function foo(a,b){return a+b}"),
            "function foo(a, b) {\n  return a + b;\n}\n"
        );
    }

    #[test]
    fn test_if_else_chain() {
        assert_eq!(
            roundtrip("if(a){b()}else if(c){d()}else{e()}"),
            "if (a) {\n  b();\n} else if (c) {\n  d();\n} else {\n  e();\n}\n"
        );
    }

    #[test]
    fn test_object_literal_layout() {
        assert_eq!(roundtrip("x={a:1,b,c(){}}"), "x = {\n  a: 1,\n  b,\n  c() {}\n};\n");
        assert_eq!(roundtrip("x={}"), "x = {};\n");
    }

    #[test]
    fn test_precedence_parens() {
        assert_eq!(roundtrip("(a+b)*c"), "(a + b) * c;\n");
        assert_eq!(roundtrip("a+(b*c)"), "a + b * c;\n");
        assert_eq!(roundtrip("f((a,b))"), "f((a, b));\n");
        assert_eq!(roundtrip("(-a)**2"), "(-a) ** 2;\n");
        assert_eq!(roundtrip("a ?? (b || c)"), "a ?? (b || c);\n");
        assert_eq!(roundtrip("a-(-b)"), "a - -b;\n");
        assert_eq!(roundtrip("-(-a)"), "- -a;\n");
    }

    #[test]
    fn test_statement_start_parens() {
        assert_eq!(roundtrip("(function(){})()"), "(function () {}());\n");
        assert_eq!(roundtrip("({a}=b)"), "({\n  a\n} = b);\n");
        assert_eq!(roundtrip("x=()=>({})"), "x = () => ({});\n");
    }

    #[test]
    fn test_new_and_members() {
        assert_eq!(roundtrip("new (a())()"), "new (a())();\n");
        assert_eq!(roundtrip("new a.b"), "new a.b();\n");
        assert_eq!(roundtrip("1..toString()"), "(1).toString();\n");
    }

    #[test]
    fn test_for_in_init_parens() {
        assert_eq!(
            roundtrip("for(var i=(a in b);;);"),
            "for (var i = (a in b);;);\n"
        );
    }

    #[test]
    fn test_dangling_else() {
        let output = roundtrip("if (a) { if (b) c(); } else d();");
        let reparsed = roundtrip(&output);
        assert_eq!(output, reparsed);
        assert!(output.contains("} else d();"));
    }

    #[test]
    fn test_strings_and_templates() {
        assert_eq!(roundtrip("x='a\"b\\n'"), "x = \"a\\\"b\\n\";\n");
        assert_eq!(roundtrip("x=`a${b}\\n`"), "x = `a${b}\\n`;\n");
    }

    #[test]
    fn test_modules() {
        let source = "import a,{b as c}from'x';export{c as d};export default class{}";
        assert_eq!(
            roundtrip(source),
            "import a, { b as c } from \"x\";\nexport { c as d };\nexport default class {}\n"
        );
    }

    #[test]
    fn test_class_members() {
        assert_eq!(
            roundtrip("class A extends B{static x=1;#y;get z(){return 1}static{}}"),
            "class A extends B {\n  static x = 1;\n  #y;\n  get z() {\n    return 1;\n  }\n  static {}\n}\n"
        );
    }

    #[test]
    fn test_custom_indent() {
        let ast = Parser::new("if(a){b()}", ParserOptions::default()).parse().unwrap();
        let output = Codegen::new(&ast, CodegenOptions::with_indent_width(4)).generate();
        assert_eq!(output, "if (a) {\n    b();\n}\n");
    }
}
