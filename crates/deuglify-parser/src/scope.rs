//! Lexical scopes and binding renames.
//!
//! [`ScopeTree::build`] walks the AST once and records every scope with the
//! names it declares. Callers pick new names with [`ScopeTree::rename`], then
//! [`ScopeTree::apply`] rewrites the AST in a second walk that enters scopes
//! in exactly the order the first walk created them, resolving each
//! identifier through the scope chain.
//!
//! Property names, labels and the external names of imports and exports are
//! never renamed.

use crate::ast::*;
use rustc_hash::{FxHashMap, FxHashSet};

/// Index of a scope in its [`ScopeTree`].
pub type ScopeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Program,
    Function,
    Block,
    Catch,
    For,
    Switch,
    Class,
}

impl ScopeKind {
    /// `var` declarations hoist to the nearest scope of this kind.
    fn is_var_target(self) -> bool {
        matches!(self, ScopeKind::Program | ScopeKind::Function)
    }
}

#[derive(Debug)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    pub kind: ScopeKind,
    /// Declared names, in declaration order.
    pub bindings: Vec<String>,
    pub children: Vec<ScopeId>,
    declared: FxHashSet<String>,
    renames: FxHashMap<String, String>,
    /// Other scopes whose binding of the same name must keep the same text.
    linked: FxHashMap<String, Vec<ScopeId>>,
}

impl Scope {
    fn new(kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Self {
            parent,
            kind,
            bindings: Vec::new(),
            children: Vec::new(),
            declared: FxHashSet::default(),
            renames: FxHashMap::default(),
            linked: FxHashMap::default(),
        }
    }

    pub fn declares(&self, name: &str) -> bool {
        self.declared.contains(name)
    }
}

/// Counts reported by [`ScopeTree::apply`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenameStats {
    /// Bindings that received a new name.
    pub bindings: usize,
    /// Identifier occurrences rewritten, declarations included.
    pub references: usize,
}

/// Arena of scopes in pre-order; scope 0 is the program.
#[derive(Debug)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    /// Build the scope tree for `ast`.
    pub fn build(ast: &Ast) -> Self {
        let mut builder = ScopeBuilder {
            scopes: vec![Scope::new(ScopeKind::Program, None)],
        };
        builder.collect_stmts(&ast.stmts, ScopeTree::ROOT);
        Self {
            scopes: builder.scopes,
        }
    }

    pub const ROOT: ScopeId = 0;

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id]
    }

    /// All scope ids in creation (pre-order) order.
    pub fn ids(&self) -> std::ops::Range<ScopeId> {
        0..self.scopes.len()
    }

    /// Names declared by `scope`, in declaration order.
    pub fn bindings(&self, scope: ScopeId) -> &[String] {
        &self.scopes[scope].bindings
    }

    /// Record that the binding `old` owned by `scope` becomes `new`.
    ///
    /// A `var` redeclaring a catch parameter is linked to it; renaming either
    /// one renames both. Returns false, recording nothing, when `scope` does
    /// not itself declare `old`.
    pub fn rename(&mut self, scope: ScopeId, old: &str, new: impl Into<String>) -> bool {
        if !self.scopes.get(scope).is_some_and(|s| s.declares(old)) {
            return false;
        }
        let new = new.into();
        let mut pending = vec![scope];
        let mut seen = FxHashSet::default();
        while let Some(id) = pending.pop() {
            if !seen.insert(id) {
                continue;
            }
            let s = &mut self.scopes[id];
            s.renames.insert(old.to_string(), new.clone());
            if let Some(linked) = s.linked.get(old) {
                pending.extend(linked.iter().copied());
            }
        }
        true
    }

    /// The new name recorded for `name` in `scope`, if any.
    pub fn renamed(&self, scope: ScopeId, name: &str) -> Option<&str> {
        self.scopes[scope].renames.get(name).map(String::as_str)
    }

    /// The scope that declares `name` as seen from `scope`.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if self.scopes[id].declares(name) {
                return Some(id);
            }
            current = self.scopes[id].parent;
        }
        None
    }

    fn resolve_name(&self, name: &str, scope: ScopeId) -> Option<&str> {
        self.lookup(scope, name)
            .and_then(|id| self.scopes[id].renames.get(name))
            .map(String::as_str)
    }

    /// Rewrite every recorded rename into `ast`.
    pub fn apply(&self, ast: &mut Ast) -> RenameStats {
        let bindings = self.scopes.iter().map(|s| s.renames.len()).sum();
        if bindings == 0 {
            return RenameStats::default();
        }
        let mut renamer = Renamer {
            tree: self,
            scope_stack: vec![ScopeTree::ROOT],
            child_counters: vec![0],
            references: 0,
        };
        renamer.rename_stmt_list(&mut ast.stmts);
        RenameStats {
            bindings,
            references: renamer.references,
        }
    }
}

// =============================================================================
// Phase 1: Collect scopes and bindings
// =============================================================================

struct ScopeBuilder {
    scopes: Vec<Scope>,
}

impl ScopeBuilder {
    fn add_scope(&mut self, kind: ScopeKind, parent: ScopeId) -> ScopeId {
        let id = self.scopes.len();
        self.scopes.push(Scope::new(kind, Some(parent)));
        self.scopes[parent].children.push(id);
        id
    }

    /// Add a binding to a scope. For `var`, hoists to nearest function/program scope.
    fn add_binding(&mut self, name: &str, hoist: bool, scope: ScopeId) {
        let target = if hoist { self.hoist_target(scope) } else { scope };
        let s = &mut self.scopes[target];
        if s.declared.insert(name.to_string()) {
            s.bindings.push(name.to_string());
        }
        if target != scope {
            if let Some(shadow) = self.shadowing_scope(name, scope, target) {
                self.link(name, shadow, target);
            }
        }
    }

    /// The nearest scope between `scope` and `target` that already declares
    /// `name`. A hoisted declarator there is printed under that binding.
    fn shadowing_scope(&self, name: &str, scope: ScopeId, target: ScopeId) -> Option<ScopeId> {
        let mut current = scope;
        while current != target {
            if self.scopes[current].declares(name) {
                return Some(current);
            }
            current = self.scopes[current].parent?;
        }
        None
    }

    fn link(&mut self, name: &str, a: ScopeId, b: ScopeId) {
        for (from, to) in [(a, b), (b, a)] {
            let linked = self.scopes[from].linked.entry(name.to_string()).or_default();
            if !linked.contains(&to) {
                linked.push(to);
            }
        }
    }

    fn hoist_target(&self, scope: ScopeId) -> ScopeId {
        let mut current = scope;
        loop {
            if self.scopes[current].kind.is_var_target() {
                return current;
            }
            match self.scopes[current].parent {
                Some(p) => current = p,
                None => return current,
            }
        }
    }

    fn collect_stmts(&mut self, stmts: &[Stmt], scope: ScopeId) {
        for stmt in stmts {
            self.collect_stmt(stmt, scope);
        }
    }

    fn collect_var_decls(&mut self, kind: VarKind, decls: &[VarDeclarator], scope: ScopeId) {
        for decl in decls {
            self.collect_binding(&decl.binding, kind == VarKind::Var, scope);
            if let Some(init) = &decl.init {
                self.collect_expr(init, scope);
            }
        }
    }

    fn collect_for_init(&mut self, init: &ForInit, scope: ScopeId) {
        match init {
            ForInit::Var { kind, decls } => self.collect_var_decls(*kind, decls, scope),
            ForInit::Expr(e) => self.collect_expr(e, scope),
        }
    }

    fn collect_stmt(&mut self, stmt: &Stmt, scope: ScopeId) {
        match &stmt.kind {
            StmtKind::Var { kind, decls } => self.collect_var_decls(*kind, decls, scope),
            StmtKind::Function(f) => {
                // Functions nested in blocks are also visible function-wide.
                if let Some(name) = &f.name {
                    self.add_binding(name, true, scope);
                }
                self.collect_function(f, scope, false);
            }
            StmtKind::Class(c) => {
                if let Some(name) = &c.name {
                    self.add_binding(name, false, scope);
                }
                self.collect_class(c, scope, false);
            }
            StmtKind::Block(stmts) => {
                let block_scope = self.add_scope(ScopeKind::Block, scope);
                self.collect_stmts(stmts, block_scope);
            }
            StmtKind::If {
                test,
                consequent,
                alternate,
            } => {
                self.collect_expr(test, scope);
                self.collect_stmt(consequent, scope);
                if let Some(alt) = alternate {
                    self.collect_stmt(alt, scope);
                }
            }
            StmtKind::Switch {
                discriminant,
                cases,
            } => {
                self.collect_expr(discriminant, scope);
                let switch_scope = self.add_scope(ScopeKind::Switch, scope);
                for case in cases {
                    if let Some(test) = &case.test {
                        self.collect_expr(test, switch_scope);
                    }
                    self.collect_stmts(&case.consequent, switch_scope);
                }
            }
            StmtKind::For {
                init,
                test,
                update,
                body,
            } => {
                let for_scope = self.add_scope(ScopeKind::For, scope);
                if let Some(init) = init {
                    self.collect_for_init(init, for_scope);
                }
                if let Some(test) = test {
                    self.collect_expr(test, for_scope);
                }
                if let Some(update) = update {
                    self.collect_expr(update, for_scope);
                }
                self.collect_stmt(body, for_scope);
            }
            StmtKind::ForIn { left, right, body } | StmtKind::ForOf { left, right, body, .. } => {
                let for_scope = self.add_scope(ScopeKind::For, scope);
                self.collect_for_init(left, for_scope);
                self.collect_expr(right, for_scope);
                self.collect_stmt(body, for_scope);
            }
            StmtKind::While { test, body } => {
                self.collect_expr(test, scope);
                self.collect_stmt(body, scope);
            }
            StmtKind::DoWhile { body, test } => {
                self.collect_stmt(body, scope);
                self.collect_expr(test, scope);
            }
            StmtKind::Return { arg } => {
                if let Some(arg) = arg {
                    self.collect_expr(arg, scope);
                }
            }
            StmtKind::Throw { arg } => self.collect_expr(arg, scope),
            StmtKind::Try {
                block,
                handler,
                finalizer,
            } => {
                let try_scope = self.add_scope(ScopeKind::Block, scope);
                self.collect_stmts(block, try_scope);
                if let Some(catch) = handler {
                    let catch_scope = self.add_scope(ScopeKind::Catch, scope);
                    if let Some(param) = &catch.param {
                        self.collect_binding(param, false, catch_scope);
                    }
                    self.collect_stmts(&catch.body, catch_scope);
                }
                if let Some(fin) = finalizer {
                    let fin_scope = self.add_scope(ScopeKind::Block, scope);
                    self.collect_stmts(fin, fin_scope);
                }
            }
            StmtKind::Labeled { body, .. } => self.collect_stmt(body, scope),
            StmtKind::With { object, body } => {
                self.collect_expr(object, scope);
                self.collect_stmt(body, scope);
            }
            StmtKind::Expr(e) => self.collect_expr(e, scope),
            StmtKind::Import(decl) => {
                for spec in &decl.specifiers {
                    match spec {
                        ImportSpecifier::Default { local, .. }
                        | ImportSpecifier::Namespace { local, .. }
                        | ImportSpecifier::Named { local, .. } => {
                            self.add_binding(local, false, scope);
                        }
                    }
                }
            }
            StmtKind::Export(export) => match &**export {
                ExportDecl::Default { expr, .. } => self.collect_expr(expr, scope),
                ExportDecl::DefaultDecl { decl, .. } | ExportDecl::Decl { decl, .. } => {
                    self.collect_stmt(decl, scope)
                }
                ExportDecl::Named { .. } | ExportDecl::All { .. } => {}
            },
            StmtKind::Empty
            | StmtKind::Debugger
            | StmtKind::Break { .. }
            | StmtKind::Continue { .. } => {}
        }
    }

    fn collect_params(&mut self, params: &[Param], fn_scope: ScopeId) {
        for param in params {
            self.collect_binding(&param.binding, false, fn_scope);
            if let Some(default) = &param.default {
                self.collect_expr(default, fn_scope);
            }
        }
    }

    /// A function expression's own name is visible only inside it.
    fn collect_function(&mut self, f: &Function, parent: ScopeId, is_expr: bool) {
        let fn_scope = self.add_scope(ScopeKind::Function, parent);
        if is_expr {
            if let Some(name) = &f.name {
                self.add_binding(name, false, fn_scope);
            }
        }
        self.collect_params(&f.params, fn_scope);
        self.collect_stmts(&f.body, fn_scope);
    }

    fn collect_arrow(&mut self, arrow: &ArrowFunction, parent: ScopeId) {
        let fn_scope = self.add_scope(ScopeKind::Function, parent);
        self.collect_params(&arrow.params, fn_scope);
        match &arrow.body {
            ArrowBody::Expr(e) => self.collect_expr(e, fn_scope),
            ArrowBody::Block(stmts) => self.collect_stmts(stmts, fn_scope),
        }
    }

    fn collect_property_key(&mut self, key: &PropertyKey, scope: ScopeId) {
        if let PropertyKey::Computed(e) = key {
            self.collect_expr(e, scope);
        }
    }

    fn collect_class(&mut self, c: &Class, parent: ScopeId, is_expr: bool) {
        let class_scope = self.add_scope(ScopeKind::Class, parent);
        if is_expr {
            if let Some(name) = &c.name {
                self.add_binding(name, false, class_scope);
            }
        }
        if let Some(super_class) = &c.super_class {
            self.collect_expr(super_class, class_scope);
        }
        for member in &c.body {
            match &member.kind {
                ClassMemberKind::Method { key, value, .. } => {
                    self.collect_property_key(key, class_scope);
                    self.collect_function(value, class_scope, false);
                }
                ClassMemberKind::Property { key, value, .. } => {
                    self.collect_property_key(key, class_scope);
                    if let Some(v) = value {
                        self.collect_expr(v, class_scope);
                    }
                }
                ClassMemberKind::StaticBlock(stmts) => {
                    let block_scope = self.add_scope(ScopeKind::Function, class_scope);
                    self.collect_stmts(stmts, block_scope);
                }
                ClassMemberKind::Empty => {}
            }
        }
    }

    fn collect_binding(&mut self, binding: &Binding, hoist: bool, scope: ScopeId) {
        match &binding.kind {
            BindingKind::Ident { name } => self.add_binding(name, hoist, scope),
            BindingKind::Array { elements } => {
                for elem in elements.iter().flatten() {
                    self.collect_binding(&elem.binding, hoist, scope);
                    if let Some(default) = &elem.default {
                        self.collect_expr(default, scope);
                    }
                }
            }
            BindingKind::Object { properties } => {
                for prop in properties {
                    self.collect_property_key(&prop.key, scope);
                    self.collect_binding(&prop.value, hoist, scope);
                    if let Some(default) = &prop.default {
                        self.collect_expr(default, scope);
                    }
                }
            }
        }
    }

    fn collect_expr(&mut self, expr: &Expr, scope: ScopeId) {
        match &expr.kind {
            ExprKind::Function(f) => self.collect_function(f, scope, true),
            ExprKind::Arrow(arrow) => self.collect_arrow(arrow, scope),
            ExprKind::Class(c) => self.collect_class(c, scope, true),
            ExprKind::Array(elems) => {
                for elem in elems.iter().flatten() {
                    self.collect_expr(elem, scope);
                }
            }
            ExprKind::Object(props) => {
                for prop in props {
                    self.collect_property_key(&prop.key, scope);
                    self.collect_expr(&prop.value, scope);
                }
            }
            ExprKind::Unary { arg, .. }
            | ExprKind::Update { arg, .. }
            | ExprKind::Spread(arg)
            | ExprKind::Await(arg)
            | ExprKind::Import(arg) => self.collect_expr(arg, scope),
            ExprKind::Binary { left, right, .. } | ExprKind::Assign { left, right, .. } => {
                self.collect_expr(left, scope);
                self.collect_expr(right, scope);
            }
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.collect_expr(test, scope);
                self.collect_expr(consequent, scope);
                self.collect_expr(alternate, scope);
            }
            ExprKind::Sequence(exprs) | ExprKind::Template { exprs, .. } => {
                for e in exprs {
                    self.collect_expr(e, scope);
                }
            }
            ExprKind::Member {
                object, property, ..
            } => {
                self.collect_expr(object, scope);
                if let MemberProp::Computed(e) = property {
                    self.collect_expr(e, scope);
                }
            }
            ExprKind::Call { callee, args, .. } | ExprKind::New { callee, args } => {
                self.collect_expr(callee, scope);
                for arg in args {
                    self.collect_expr(arg, scope);
                }
            }
            ExprKind::TaggedTemplate { tag, quasi } => {
                self.collect_expr(tag, scope);
                self.collect_expr(quasi, scope);
            }
            ExprKind::Yield { arg, .. } => {
                if let Some(arg) = arg {
                    self.collect_expr(arg, scope);
                }
            }
            ExprKind::Ident(_)
            | ExprKind::PrivateName(_)
            | ExprKind::Null
            | ExprKind::Bool(_)
            | ExprKind::Number(_)
            | ExprKind::BigInt(_)
            | ExprKind::String(_)
            | ExprKind::Regex { .. }
            | ExprKind::This
            | ExprKind::Super
            | ExprKind::MetaProperty { .. } => {}
        }
    }
}

// =============================================================================
// Phase 2: Rename AST in-place
// =============================================================================

/// Walks the AST with a scope stack. The structure mirrors `ScopeBuilder`
/// so that `enter_scope` always lands on the scope created at the same node.
struct Renamer<'a> {
    tree: &'a ScopeTree,
    scope_stack: Vec<ScopeId>,
    /// Next child index within each scope on the stack.
    child_counters: Vec<usize>,
    references: usize,
}

impl<'a> Renamer<'a> {
    fn current_scope(&self) -> ScopeId {
        self.scope_stack.last().copied().unwrap_or(ScopeTree::ROOT)
    }

    fn enter_scope(&mut self) {
        let parent = self.current_scope();
        let child_idx = self.child_counters.last().copied().unwrap_or(0);
        let child = self.tree.scopes[parent].children[child_idx];
        if let Some(counter) = self.child_counters.last_mut() {
            *counter = child_idx + 1;
        }
        self.scope_stack.push(child);
        self.child_counters.push(0);
    }

    fn leave_scope(&mut self) {
        self.scope_stack.pop();
        self.child_counters.pop();
    }

    fn resolve(&self, name: &str) -> Option<String> {
        self.tree
            .resolve_name(name, self.current_scope())
            .map(str::to_string)
    }

    fn rename_ident(&mut self, name: &mut String) {
        if let Some(new) = self.resolve(name) {
            *name = new;
            self.references += 1;
        }
    }

    /// Rename a statement list, splitting renamed `export` declarations so
    /// the module keeps its export names.
    fn rename_stmt_list(&mut self, stmts: &mut Vec<Stmt>) {
        let mut i = 0;
        while i < stmts.len() {
            let before = exported_decl_names(&stmts[i]);
            self.rename_stmt(&mut stmts[i]);
            if let Some(before) = before {
                let after = exported_decl_names(&stmts[i]).unwrap_or_default();
                if before != after {
                    let split = split_export(stmts.remove(i), &before, &after);
                    for stmt in split {
                        stmts.insert(i, stmt);
                        i += 1;
                    }
                    continue;
                }
            }
            i += 1;
        }
    }

    fn rename_var_decls(&mut self, decls: &mut [VarDeclarator]) {
        for decl in decls {
            self.rename_binding(&mut decl.binding);
            if let Some(init) = &mut decl.init {
                self.rename_expr(init);
            }
        }
    }

    fn rename_for_init(&mut self, init: &mut ForInit) {
        match init {
            ForInit::Var { decls, .. } => self.rename_var_decls(decls),
            ForInit::Expr(e) => self.rename_expr(e),
        }
    }

    fn rename_stmt(&mut self, stmt: &mut Stmt) {
        match &mut stmt.kind {
            StmtKind::Var { decls, .. } => self.rename_var_decls(decls),
            StmtKind::Function(f) => {
                if let Some(name) = &mut f.name {
                    self.rename_ident(name);
                }
                self.rename_function(f, false);
            }
            StmtKind::Class(c) => {
                if let Some(name) = &mut c.name {
                    self.rename_ident(name);
                }
                self.rename_class(c, false);
            }
            StmtKind::Block(stmts) => {
                self.enter_scope();
                self.rename_stmt_list(stmts);
                self.leave_scope();
            }
            StmtKind::If {
                test,
                consequent,
                alternate,
            } => {
                self.rename_expr(test);
                self.rename_stmt(consequent);
                if let Some(alt) = alternate {
                    self.rename_stmt(alt);
                }
            }
            StmtKind::Switch {
                discriminant,
                cases,
            } => {
                self.rename_expr(discriminant);
                self.enter_scope();
                for case in cases {
                    if let Some(test) = &mut case.test {
                        self.rename_expr(test);
                    }
                    self.rename_stmt_list(&mut case.consequent);
                }
                self.leave_scope();
            }
            StmtKind::For {
                init,
                test,
                update,
                body,
            } => {
                self.enter_scope();
                if let Some(init) = init {
                    self.rename_for_init(init);
                }
                if let Some(test) = test {
                    self.rename_expr(test);
                }
                if let Some(update) = update {
                    self.rename_expr(update);
                }
                self.rename_stmt(body);
                self.leave_scope();
            }
            StmtKind::ForIn { left, right, body } | StmtKind::ForOf { left, right, body, .. } => {
                self.enter_scope();
                self.rename_for_init(left);
                self.rename_expr(right);
                self.rename_stmt(body);
                self.leave_scope();
            }
            StmtKind::While { test, body } => {
                self.rename_expr(test);
                self.rename_stmt(body);
            }
            StmtKind::DoWhile { body, test } => {
                self.rename_stmt(body);
                self.rename_expr(test);
            }
            StmtKind::Return { arg } => {
                if let Some(arg) = arg {
                    self.rename_expr(arg);
                }
            }
            StmtKind::Throw { arg } => self.rename_expr(arg),
            StmtKind::Try {
                block,
                handler,
                finalizer,
            } => {
                self.enter_scope();
                self.rename_stmt_list(block);
                self.leave_scope();
                if let Some(catch) = handler {
                    self.enter_scope();
                    if let Some(param) = &mut catch.param {
                        self.rename_binding(param);
                    }
                    self.rename_stmt_list(&mut catch.body);
                    self.leave_scope();
                }
                if let Some(fin) = finalizer {
                    self.enter_scope();
                    self.rename_stmt_list(fin);
                    self.leave_scope();
                }
            }
            StmtKind::Labeled { body, .. } => self.rename_stmt(body),
            StmtKind::With { object, body } => {
                self.rename_expr(object);
                self.rename_stmt(body);
            }
            StmtKind::Expr(e) => self.rename_expr(e),
            StmtKind::Import(decl) => {
                for spec in &mut decl.specifiers {
                    match spec {
                        ImportSpecifier::Default { local, .. }
                        | ImportSpecifier::Namespace { local, .. }
                        | ImportSpecifier::Named { local, .. } => self.rename_ident(local),
                    }
                }
            }
            StmtKind::Export(export) => match &mut **export {
                ExportDecl::Default { expr, .. } => self.rename_expr(expr),
                ExportDecl::DefaultDecl { decl, .. } | ExportDecl::Decl { decl, .. } => {
                    self.rename_stmt(decl)
                }
                ExportDecl::Named {
                    specifiers, source, ..
                } => {
                    // Re-exports name bindings of another module.
                    if source.is_none() {
                        for spec in specifiers {
                            self.rename_ident(&mut spec.local);
                        }
                    }
                }
                ExportDecl::All { .. } => {}
            },
            StmtKind::Empty
            | StmtKind::Debugger
            | StmtKind::Break { .. }
            | StmtKind::Continue { .. } => {}
        }
    }

    fn rename_params(&mut self, params: &mut [Param]) {
        for param in params {
            self.rename_binding(&mut param.binding);
            if let Some(default) = &mut param.default {
                self.rename_expr(default);
            }
        }
    }

    fn rename_function(&mut self, f: &mut Function, is_expr: bool) {
        self.enter_scope();
        if is_expr {
            if let Some(name) = &mut f.name {
                self.rename_ident(name);
            }
        }
        self.rename_params(&mut f.params);
        self.rename_stmt_list(&mut f.body);
        self.leave_scope();
    }

    fn rename_arrow(&mut self, arrow: &mut ArrowFunction) {
        self.enter_scope();
        self.rename_params(&mut arrow.params);
        match &mut arrow.body {
            ArrowBody::Expr(e) => self.rename_expr(e),
            ArrowBody::Block(stmts) => self.rename_stmt_list(stmts),
        }
        self.leave_scope();
    }

    fn rename_property_key(&mut self, key: &mut PropertyKey) {
        if let PropertyKey::Computed(e) = key {
            self.rename_expr(e);
        }
    }

    fn rename_class(&mut self, c: &mut Class, is_expr: bool) {
        self.enter_scope();
        if is_expr {
            if let Some(name) = &mut c.name {
                self.rename_ident(name);
            }
        }
        if let Some(super_class) = &mut c.super_class {
            self.rename_expr(super_class);
        }
        for member in &mut c.body {
            match &mut member.kind {
                ClassMemberKind::Method { key, value, .. } => {
                    self.rename_property_key(key);
                    self.rename_function(value, false);
                }
                ClassMemberKind::Property { key, value, .. } => {
                    self.rename_property_key(key);
                    if let Some(v) = value {
                        self.rename_expr(v);
                    }
                }
                ClassMemberKind::StaticBlock(stmts) => {
                    self.enter_scope();
                    self.rename_stmt_list(stmts);
                    self.leave_scope();
                }
                ClassMemberKind::Empty => {}
            }
        }
        self.leave_scope();
    }

    fn rename_binding(&mut self, binding: &mut Binding) {
        match &mut binding.kind {
            BindingKind::Ident { name } => self.rename_ident(name),
            BindingKind::Array { elements } => {
                for elem in elements.iter_mut().flatten() {
                    self.rename_binding(&mut elem.binding);
                    if let Some(default) = &mut elem.default {
                        self.rename_expr(default);
                    }
                }
            }
            BindingKind::Object { properties } => {
                for prop in properties {
                    self.rename_property_key(&mut prop.key);
                    // `{ a }` becomes `{ a: a__q }`; the key is a property name.
                    self.rename_binding(&mut prop.value);
                    if prop.shorthand {
                        prop.shorthand = matches!(
                            (&prop.key, &prop.value.kind),
                            (PropertyKey::Ident(key), BindingKind::Ident { name }) if key == name
                        );
                    }
                    if let Some(default) = &mut prop.default {
                        self.rename_expr(default);
                    }
                }
            }
        }
    }

    fn rename_expr(&mut self, expr: &mut Expr) {
        match &mut expr.kind {
            ExprKind::Ident(name) => self.rename_ident(name),
            ExprKind::Function(f) => self.rename_function(f, true),
            ExprKind::Arrow(arrow) => self.rename_arrow(arrow),
            ExprKind::Class(c) => self.rename_class(c, true),
            ExprKind::Array(elems) => {
                for elem in elems.iter_mut().flatten() {
                    self.rename_expr(elem);
                }
            }
            ExprKind::Object(props) => {
                for prop in props {
                    self.rename_property_key(&mut prop.key);
                    self.rename_expr(&mut prop.value);
                    if prop.shorthand {
                        prop.shorthand = shorthand_still_holds(&prop.key, &prop.value);
                    }
                }
            }
            ExprKind::Unary { arg, .. }
            | ExprKind::Update { arg, .. }
            | ExprKind::Spread(arg)
            | ExprKind::Await(arg)
            | ExprKind::Import(arg) => self.rename_expr(arg),
            ExprKind::Binary { left, right, .. } | ExprKind::Assign { left, right, .. } => {
                self.rename_expr(left);
                self.rename_expr(right);
            }
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.rename_expr(test);
                self.rename_expr(consequent);
                self.rename_expr(alternate);
            }
            ExprKind::Sequence(exprs) | ExprKind::Template { exprs, .. } => {
                for e in exprs {
                    self.rename_expr(e);
                }
            }
            ExprKind::Member {
                object, property, ..
            } => {
                self.rename_expr(object);
                // Only computed properties hold references; `obj.foo` stays.
                if let MemberProp::Computed(e) = property {
                    self.rename_expr(e);
                }
            }
            ExprKind::Call { callee, args, .. } | ExprKind::New { callee, args } => {
                self.rename_expr(callee);
                for arg in args {
                    self.rename_expr(arg);
                }
            }
            ExprKind::TaggedTemplate { tag, quasi } => {
                self.rename_expr(tag);
                self.rename_expr(quasi);
            }
            ExprKind::Yield { arg, .. } => {
                if let Some(arg) = arg {
                    self.rename_expr(arg);
                }
            }
            ExprKind::PrivateName(_)
            | ExprKind::Null
            | ExprKind::Bool(_)
            | ExprKind::Number(_)
            | ExprKind::BigInt(_)
            | ExprKind::String(_)
            | ExprKind::Regex { .. }
            | ExprKind::This
            | ExprKind::Super
            | ExprKind::MetaProperty { .. } => {}
        }
    }
}

/// A shorthand property `{ a }` (or `{ a = 1 }` in a pattern) stays
/// shorthand only while its value still reads the key's name.
fn shorthand_still_holds(key: &PropertyKey, value: &Expr) -> bool {
    let PropertyKey::Ident(key) = key else {
        return false;
    };
    match &value.kind {
        ExprKind::Ident(name) => name == key,
        ExprKind::Assign {
            op: AssignOp::Assign,
            left,
            ..
        } => left.as_ident() == Some(key.as_str()),
        _ => false,
    }
}

/// Names bound by an `export` declaration (`export var/let/const/function/class`).
fn exported_decl_names(stmt: &Stmt) -> Option<Vec<String>> {
    let StmtKind::Export(export) = &stmt.kind else {
        return None;
    };
    let ExportDecl::Decl { decl, .. } = &**export else {
        return None;
    };
    Some(decl_names(decl))
}

fn decl_names(decl: &Stmt) -> Vec<String> {
    match &decl.kind {
        StmtKind::Var { decls, .. } => decls
            .iter()
            .flat_map(|d| d.binding.bound_names())
            .map(str::to_string)
            .collect(),
        StmtKind::Function(f) => f.name.iter().cloned().collect(),
        StmtKind::Class(c) => c.name.iter().cloned().collect(),
        _ => Vec::new(),
    }
}

/// `export const a__q = 1` becomes `const a__q = 1; export { a__q as a };`.
fn split_export(stmt: Stmt, before: &[String], after: &[String]) -> Vec<Stmt> {
    let span = stmt.span;
    let decl = match stmt.kind {
        StmtKind::Export(export) => match *export {
            ExportDecl::Decl { decl, .. } => decl,
            other => return vec![Stmt::new(StmtKind::Export(Box::new(other)), span)],
        },
        kind => return vec![Stmt::new(kind, span)],
    };
    let specifiers = after
        .iter()
        .zip(before)
        .map(|(local, exported)| ExportSpecifier {
            local: local.clone(),
            exported: exported.clone(),
            span,
        })
        .collect();
    let named = ExportDecl::Named {
        specifiers,
        source: None,
        span,
    };
    vec![decl, Stmt::new(StmtKind::Export(Box::new(named)), span)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::{Codegen, CodegenOptions};
    use crate::parser::{parse, Parser, ParserOptions};

    fn generate(ast: &Ast) -> String {
        Codegen::new(ast, CodegenOptions::default()).generate()
    }

    /// Rename `old` to `new` in every scope that declares it.
    fn rename_everywhere(source: &str, old: &str, new: &str) -> String {
        let mut ast = parse(source).unwrap();
        let mut tree = ScopeTree::build(&ast);
        for id in tree.ids() {
            tree.rename(id, old, new);
        }
        tree.apply(&mut ast);
        generate(&ast)
    }

    #[test]
    fn test_var_hoists_to_function_scope() {
        let ast = parse("function f() { if (x) { var a = 1; let b = 2; } }").unwrap();
        let tree = ScopeTree::build(&ast);
        assert_eq!(tree.bindings(ScopeTree::ROOT), ["f"]);
        let fn_scope = tree.scope(ScopeTree::ROOT).children[0];
        assert_eq!(tree.scope(fn_scope).kind, ScopeKind::Function);
        assert_eq!(tree.bindings(fn_scope), ["a"]);
        let block = tree.scope(fn_scope).children[0];
        assert_eq!(tree.bindings(block), ["b"]);
    }

    #[test]
    fn test_bindings_in_declaration_order() {
        let ast = parse("var c; function b(a) {} let [d, {e}] = x; class A {}").unwrap();
        let tree = ScopeTree::build(&ast);
        assert_eq!(tree.bindings(ScopeTree::ROOT), ["c", "b", "d", "e", "A"]);
    }

    #[test]
    fn test_rename_only_owned_binding() {
        let ast = parse("var a; function f(b) {}").unwrap();
        let mut tree = ScopeTree::build(&ast);
        assert!(tree.rename(ScopeTree::ROOT, "a", "x"));
        assert!(!tree.rename(ScopeTree::ROOT, "b", "y"));
        assert_eq!(tree.renamed(ScopeTree::ROOT, "a"), Some("x"));
    }

    #[test]
    fn test_shadowed_binding_untouched() {
        let mut ast = parse("var a = 1; function f() { var a = 2; return a; } use(a);").unwrap();
        let mut tree = ScopeTree::build(&ast);
        tree.rename(ScopeTree::ROOT, "a", "outer");
        let stats = tree.apply(&mut ast);
        let out = generate(&ast);
        assert!(out.contains("var outer = 1;"));
        assert!(out.contains("var a = 2;"));
        assert!(out.contains("return a;"));
        assert!(out.contains("use(outer);"));
        assert_eq!(stats, RenameStats { bindings: 1, references: 2 });
    }

    #[test]
    fn test_properties_and_labels_untouched() {
        let out = rename_everywhere("var a = {a: 1}; a.a; a: for (;;) break a;", "a", "z");
        assert_eq!(
            out,
            "var z = {\n  a: 1\n};\nz.a;\na: for (;;) break a;\n"
        );
    }

    #[test]
    fn test_shorthand_expansion() {
        let out = rename_everywhere("var a; x = {a}; var {a: b, c} = y;", "a", "z");
        assert!(out.contains("x = {\n  a: z\n};"));
        let out = rename_everywhere("var c; var {a, c} = y;", "c", "z");
        assert!(out.contains("var { a, c: z } = y;"));
    }

    #[test]
    fn test_function_expression_name_scope() {
        let out = rename_everywhere("var g = function f() { return f; }; f();", "f", "h");
        assert!(out.contains("function h() {\n  return h;\n}"));
        assert!(out.contains("f();"));
    }

    #[test]
    fn test_class_expression_name_scope() {
        let out = rename_everywhere("x = class C { m() { return C; } }; C;", "C", "D");
        assert!(out.contains("class D {"));
        assert!(out.contains("return D;"));
        assert!(out.ends_with("C;\n"));
    }

    #[test]
    fn test_catch_and_for_scopes() {
        let out = rename_everywhere(
            "try {} catch (e) { e; } for (let e of x) e; e;",
            "e",
            "err",
        );
        assert!(out.contains("catch (err) {\n  err;\n}"));
        assert!(out.contains("for (let err of x) err;"));
        assert!(out.ends_with("\ne;\n"));
    }

    #[test]
    fn test_var_redeclaring_catch_param_shares_name() {
        let source = "try {} catch (a) { var a = 2; } a;";
        let mut ast = parse(source).unwrap();
        let mut tree = ScopeTree::build(&ast);
        assert!(tree.rename(ScopeTree::ROOT, "a", "outer"));
        let stats = tree.apply(&mut ast);
        let out = generate(&ast);
        assert!(out.contains("catch (outer) {\n  var outer = 2;\n}"));
        assert!(out.ends_with("\nouter;\n"));
        assert_eq!(stats, RenameStats { bindings: 2, references: 3 });

        let mut ast = parse(source).unwrap();
        let mut tree = ScopeTree::build(&ast);
        let catch_scope = tree
            .ids()
            .find(|&id| tree.scope(id).kind == ScopeKind::Catch)
            .unwrap();
        tree.rename(catch_scope, "a", "inner");
        assert_eq!(tree.renamed(ScopeTree::ROOT, "a"), Some("inner"));
        tree.apply(&mut ast);
        assert!(generate(&ast).ends_with("\ninner;\n"));
    }

    #[test]
    fn test_unrelated_catch_param_not_linked() {
        let mut ast = parse("var e; try {} catch (e) { e; } e;").unwrap();
        let mut tree = ScopeTree::build(&ast);
        tree.rename(ScopeTree::ROOT, "e", "outer");
        tree.apply(&mut ast);
        let out = generate(&ast);
        assert!(out.contains("catch (e) {\n  e;\n}"));
        assert!(out.ends_with("\nouter;\n"));
    }

    #[test]
    fn test_computed_keys_resolve_in_enclosing_scope() {
        let out = rename_everywhere("let k; class A { [k]() { let k; } }", "k", "key");
        assert!(out.contains("[key]() {\n    let key;\n  }"));
    }

    #[test]
    fn test_export_declaration_split() {
        let mut ast = Parser::new(
            "export const a = 1, b = 2; export function f() {} export { a as c };",
            ParserOptions { module: true },
        )
        .parse()
        .unwrap();
        let mut tree = ScopeTree::build(&ast);
        tree.rename(ScopeTree::ROOT, "a", "a2");
        tree.rename(ScopeTree::ROOT, "f", "f2");
        tree.apply(&mut ast);
        assert_eq!(
            generate(&ast),
            "const a2 = 1, b = 2;\nexport { a2 as a, b };\nfunction f2() {}\nexport { f2 as f };\nexport { a2 as c };\n"
        );
    }

    #[test]
    fn test_imports_keep_external_names() {
        let mut ast = Parser::new(
            "import d, { a, b as c } from 'm'; a(c, d);",
            ParserOptions { module: true },
        )
        .parse()
        .unwrap();
        let mut tree = ScopeTree::build(&ast);
        tree.rename(ScopeTree::ROOT, "a", "x");
        tree.rename(ScopeTree::ROOT, "d", "y");
        tree.apply(&mut ast);
        assert_eq!(
            generate(&ast),
            "import y, { a as x, b as c } from \"m\";\nx(c, y);\n"
        );
    }
}
