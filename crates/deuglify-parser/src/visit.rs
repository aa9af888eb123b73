//! Read-only AST traversal.
//!
//! Implement [`Visit`] and override the hooks you care about; the default
//! methods call the matching `walk_*` function, which visits children in
//! source order. `visit_ident` sees every name in the tree: references,
//! declared names, property names, labels and module specifier names.

use crate::ast::*;

pub trait Visit {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    fn visit_binding(&mut self, binding: &Binding) {
        walk_binding(self, binding);
    }

    fn visit_function(&mut self, func: &Function) {
        walk_function(self, func);
    }

    fn visit_arrow(&mut self, arrow: &ArrowFunction) {
        walk_arrow(self, arrow);
    }

    fn visit_class(&mut self, class: &Class) {
        walk_class(self, class);
    }

    fn visit_ident(&mut self, _name: &str) {}
}

pub fn walk_ast<V: Visit + ?Sized>(v: &mut V, ast: &Ast) {
    for stmt in &ast.stmts {
        v.visit_stmt(stmt);
    }
}

fn walk_stmts<V: Visit + ?Sized>(v: &mut V, stmts: &[Stmt]) {
    for stmt in stmts {
        v.visit_stmt(stmt);
    }
}

fn walk_var_decls<V: Visit + ?Sized>(v: &mut V, decls: &[VarDeclarator]) {
    for decl in decls {
        v.visit_binding(&decl.binding);
        if let Some(init) = &decl.init {
            v.visit_expr(init);
        }
    }
}

fn walk_for_init<V: Visit + ?Sized>(v: &mut V, init: &ForInit) {
    match init {
        ForInit::Var { decls, .. } => walk_var_decls(v, decls),
        ForInit::Expr(expr) => v.visit_expr(expr),
    }
}

pub fn walk_stmt<V: Visit + ?Sized>(v: &mut V, stmt: &Stmt) {
    match &stmt.kind {
        StmtKind::Var { decls, .. } => walk_var_decls(v, decls),
        StmtKind::Function(func) => v.visit_function(func),
        StmtKind::Class(class) => v.visit_class(class),
        StmtKind::Block(stmts) => walk_stmts(v, stmts),
        StmtKind::If {
            test,
            consequent,
            alternate,
        } => {
            v.visit_expr(test);
            v.visit_stmt(consequent);
            if let Some(alt) = alternate {
                v.visit_stmt(alt);
            }
        }
        StmtKind::Switch {
            discriminant,
            cases,
        } => {
            v.visit_expr(discriminant);
            for case in cases {
                if let Some(test) = &case.test {
                    v.visit_expr(test);
                }
                walk_stmts(v, &case.consequent);
            }
        }
        StmtKind::For {
            init,
            test,
            update,
            body,
        } => {
            if let Some(init) = init {
                walk_for_init(v, init);
            }
            if let Some(test) = test {
                v.visit_expr(test);
            }
            if let Some(update) = update {
                v.visit_expr(update);
            }
            v.visit_stmt(body);
        }
        StmtKind::ForIn { left, right, body } | StmtKind::ForOf { left, right, body, .. } => {
            walk_for_init(v, left);
            v.visit_expr(right);
            v.visit_stmt(body);
        }
        StmtKind::While { test, body } => {
            v.visit_expr(test);
            v.visit_stmt(body);
        }
        StmtKind::DoWhile { body, test } => {
            v.visit_stmt(body);
            v.visit_expr(test);
        }
        StmtKind::Break { label } | StmtKind::Continue { label } => {
            if let Some(label) = label {
                v.visit_ident(label);
            }
        }
        StmtKind::Return { arg } => {
            if let Some(arg) = arg {
                v.visit_expr(arg);
            }
        }
        StmtKind::Throw { arg } => v.visit_expr(arg),
        StmtKind::Try {
            block,
            handler,
            finalizer,
        } => {
            walk_stmts(v, block);
            if let Some(handler) = handler {
                if let Some(param) = &handler.param {
                    v.visit_binding(param);
                }
                walk_stmts(v, &handler.body);
            }
            if let Some(finalizer) = finalizer {
                walk_stmts(v, finalizer);
            }
        }
        StmtKind::Labeled { label, body } => {
            v.visit_ident(label);
            v.visit_stmt(body);
        }
        StmtKind::Expr(expr) => v.visit_expr(expr),
        StmtKind::Empty | StmtKind::Debugger => {}
        StmtKind::With { object, body } => {
            v.visit_expr(object);
            v.visit_stmt(body);
        }
        StmtKind::Import(decl) => {
            for spec in &decl.specifiers {
                match spec {
                    ImportSpecifier::Default { local, .. }
                    | ImportSpecifier::Namespace { local, .. } => v.visit_ident(local),
                    ImportSpecifier::Named {
                        imported, local, ..
                    } => {
                        v.visit_ident(imported);
                        v.visit_ident(local);
                    }
                }
            }
        }
        StmtKind::Export(decl) => match &**decl {
            ExportDecl::Named { specifiers, .. } => {
                for spec in specifiers {
                    v.visit_ident(&spec.local);
                    v.visit_ident(&spec.exported);
                }
            }
            ExportDecl::Default { expr, .. } => v.visit_expr(expr),
            ExportDecl::DefaultDecl { decl, .. } | ExportDecl::Decl { decl, .. } => {
                v.visit_stmt(decl)
            }
            ExportDecl::All { exported, .. } => {
                if let Some(exported) = exported {
                    v.visit_ident(exported);
                }
            }
        },
    }
}

pub fn walk_expr<V: Visit + ?Sized>(v: &mut V, expr: &Expr) {
    match &expr.kind {
        ExprKind::Null
        | ExprKind::Bool(_)
        | ExprKind::Number(_)
        | ExprKind::BigInt(_)
        | ExprKind::String(_)
        | ExprKind::Regex { .. }
        | ExprKind::This
        | ExprKind::Super => {}
        ExprKind::Template { exprs, .. } => {
            for e in exprs {
                v.visit_expr(e);
            }
        }
        ExprKind::Ident(name) | ExprKind::PrivateName(name) => v.visit_ident(name),
        ExprKind::Array(elements) => {
            for elem in elements.iter().flatten() {
                v.visit_expr(elem);
            }
        }
        ExprKind::Object(properties) => {
            for prop in properties {
                walk_property_key(v, &prop.key);
                v.visit_expr(&prop.value);
            }
        }
        ExprKind::Function(func) => v.visit_function(func),
        ExprKind::Arrow(arrow) => v.visit_arrow(arrow),
        ExprKind::Class(class) => v.visit_class(class),
        ExprKind::Unary { arg, .. } | ExprKind::Update { arg, .. } => v.visit_expr(arg),
        ExprKind::Binary { left, right, .. } | ExprKind::Assign { left, right, .. } => {
            v.visit_expr(left);
            v.visit_expr(right);
        }
        ExprKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            v.visit_expr(test);
            v.visit_expr(consequent);
            v.visit_expr(alternate);
        }
        ExprKind::Sequence(exprs) => {
            for e in exprs {
                v.visit_expr(e);
            }
        }
        ExprKind::Member {
            object, property, ..
        } => {
            v.visit_expr(object);
            match property {
                MemberProp::Ident(name) | MemberProp::Private(name) => v.visit_ident(name),
                MemberProp::Computed(expr) => v.visit_expr(expr),
            }
        }
        ExprKind::Call { callee, args, .. } | ExprKind::New { callee, args } => {
            v.visit_expr(callee);
            for arg in args {
                v.visit_expr(arg);
            }
        }
        ExprKind::TaggedTemplate { tag, quasi } => {
            v.visit_expr(tag);
            v.visit_expr(quasi);
        }
        ExprKind::Spread(arg) | ExprKind::Await(arg) | ExprKind::Import(arg) => v.visit_expr(arg),
        ExprKind::Yield { arg, .. } => {
            if let Some(arg) = arg {
                v.visit_expr(arg);
            }
        }
        ExprKind::MetaProperty { meta, property } => {
            v.visit_ident(meta);
            v.visit_ident(property);
        }
    }
}

pub fn walk_property_key<V: Visit + ?Sized>(v: &mut V, key: &PropertyKey) {
    match key {
        PropertyKey::Ident(name) | PropertyKey::Private(name) => {
            if !name.is_empty() {
                v.visit_ident(name);
            }
        }
        PropertyKey::Computed(expr) => v.visit_expr(expr),
        PropertyKey::String(_) | PropertyKey::Number(_) | PropertyKey::BigInt(_) => {}
    }
}

pub fn walk_binding<V: Visit + ?Sized>(v: &mut V, binding: &Binding) {
    match &binding.kind {
        BindingKind::Ident { name } => v.visit_ident(name),
        BindingKind::Array { elements } => {
            for elem in elements.iter().flatten() {
                v.visit_binding(&elem.binding);
                if let Some(default) = &elem.default {
                    v.visit_expr(default);
                }
            }
        }
        BindingKind::Object { properties } => {
            for prop in properties {
                walk_property_key(v, &prop.key);
                v.visit_binding(&prop.value);
                if let Some(default) = &prop.default {
                    v.visit_expr(default);
                }
            }
        }
    }
}

fn walk_params<V: Visit + ?Sized>(v: &mut V, params: &[Param]) {
    for param in params {
        v.visit_binding(&param.binding);
        if let Some(default) = &param.default {
            v.visit_expr(default);
        }
    }
}

pub fn walk_function<V: Visit + ?Sized>(v: &mut V, func: &Function) {
    if let Some(name) = &func.name {
        v.visit_ident(name);
    }
    walk_params(v, &func.params);
    walk_stmts(v, &func.body);
}

pub fn walk_arrow<V: Visit + ?Sized>(v: &mut V, arrow: &ArrowFunction) {
    walk_params(v, &arrow.params);
    match &arrow.body {
        ArrowBody::Expr(expr) => v.visit_expr(expr),
        ArrowBody::Block(stmts) => walk_stmts(v, stmts),
    }
}

pub fn walk_class<V: Visit + ?Sized>(v: &mut V, class: &Class) {
    if let Some(name) = &class.name {
        v.visit_ident(name);
    }
    if let Some(super_class) = &class.super_class {
        v.visit_expr(super_class);
    }
    for member in &class.body {
        match &member.kind {
            ClassMemberKind::Method { key, value, .. } => {
                walk_property_key(v, key);
                v.visit_function(value);
            }
            ClassMemberKind::Property { key, value, .. } => {
                walk_property_key(v, key);
                if let Some(value) = value {
                    v.visit_expr(value);
                }
            }
            ClassMemberKind::StaticBlock(stmts) => walk_stmts(v, stmts),
            ClassMemberKind::Empty => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[derive(Default)]
    struct Names(Vec<String>);

    impl Visit for Names {
        fn visit_ident(&mut self, name: &str) {
            self.0.push(name.to_string());
        }
    }

    #[test]
    fn test_visits_every_name_in_order() {
        let ast = parse("var a = b.c; lbl: for (const {d, e: f} of g) break lbl;").unwrap();
        let mut names = Names::default();
        walk_ast(&mut names, &ast);
        assert_eq!(
            names.0,
            vec!["a", "b", "c", "lbl", "d", "d", "e", "f", "g", "lbl"]
        );
    }

    #[test]
    fn test_override_stops_descent() {
        struct TopLevelOnly(usize);
        impl Visit for TopLevelOnly {
            fn visit_function(&mut self, _func: &Function) {}
            fn visit_ident(&mut self, _name: &str) {
                self.0 += 1;
            }
        }

        let ast = parse("x; function f(y) { z; }").unwrap();
        let mut v = TopLevelOnly(0);
        walk_ast(&mut v, &ast);
        assert_eq!(v.0, 1);
    }
}
