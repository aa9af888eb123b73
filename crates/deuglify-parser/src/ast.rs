//! AST node types for JavaScript.
//!
//! Everything is an Expression, Binding, or Statement. Nodes own their
//! children; passes that rewrite the tree take `&mut` access and replace
//! subtrees in place.

use crate::span::Span;

/// The root AST for a parsed module/script.
#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    /// All statements in the program.
    pub stmts: Vec<Stmt>,
    /// Source code the tree was parsed from.
    pub source: String,
}

impl Ast {
    /// Create a new AST.
    pub fn new(stmts: Vec<Stmt>, source: String) -> Self {
        Self { stmts, source }
    }
}

// =============================================================================
// Expressions
// =============================================================================

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// An identifier reference.
    pub fn ident(name: impl Into<String>, span: Span) -> Self {
        Self::new(ExprKind::Ident(name.into()), span)
    }

    /// Returns the name if this is a bare identifier.
    pub fn as_ident(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Ident(name) => Some(name),
            _ => None,
        }
    }
}

/// Expression kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    // === Literals ===
    Null,
    Bool(bool),
    Number(f64),
    /// BigInt literal digits (`10` for `10n`, `0xff` for `0xffn`)
    BigInt(String),
    /// String literal, escapes resolved
    String(String),
    /// Regular expression: `/pattern/flags`
    Regex { pattern: String, flags: String },
    /// Template literal. `quasis` holds raw text and always has one more
    /// element than `exprs`.
    Template { quasis: Vec<String>, exprs: Vec<Expr> },

    // === Identifiers ===
    Ident(String),
    /// `#x` on the left of `in`
    PrivateName(String),
    This,
    Super,

    // === Compound ===
    /// Array literal, holes are `None`: `[a, , b]`
    Array(Vec<Option<Expr>>),
    Object(Vec<Property>),
    Function(Box<Function>),
    Arrow(Box<ArrowFunction>),
    Class(Box<Class>),

    // === Operations ===
    /// Unary operation: `!x`, `-x`, `typeof x`
    Unary { op: UnaryOp, arg: Box<Expr> },
    /// Binary or logical operation: `a + b`, `a && b`
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Assignment: `a = b`, `a += b`. The left side may be a pattern
    /// written as an array or object literal.
    Assign {
        op: AssignOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Update expression: `++a`, `a++`
    Update {
        op: UpdateOp,
        prefix: bool,
        arg: Box<Expr>,
    },
    /// Conditional: `a ? b : c`
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    /// Sequence: `a, b, c`
    Sequence(Vec<Expr>),

    // === Member access and calls ===
    /// `a.b`, `a[b]`, `a.#b`; `optional` marks a `?.` link.
    Member {
        object: Box<Expr>,
        property: MemberProp,
        optional: bool,
    },
    /// `f(a, b)`; `optional` marks `f?.(a, b)`.
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        optional: bool,
    },
    /// New expression: `new Foo(a, b)`
    New { callee: Box<Expr>, args: Vec<Expr> },
    /// Tagged template: `` tag`template` ``; `quasi` is a `Template`.
    TaggedTemplate { tag: Box<Expr>, quasi: Box<Expr> },

    // === Special ===
    /// Spread element: `...arr`
    Spread(Box<Expr>),
    Yield {
        arg: Option<Box<Expr>>,
        delegate: bool,
    },
    Await(Box<Expr>),
    /// Dynamic import: `import(x)`
    Import(Box<Expr>),
    /// Meta property: `new.target`, `import.meta`
    MetaProperty { meta: String, property: String },
}

/// The property part of a member expression.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberProp {
    /// `a.b`
    Ident(String),
    /// `a.#b`
    Private(String),
    /// `a[b]`
    Computed(Box<Expr>),
}

// =============================================================================
// Statements
// =============================================================================

/// A statement node.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Wrap an expression in an expression statement.
    pub fn expr(expr: Expr) -> Self {
        let span = expr.span;
        Self::new(StmtKind::Expr(expr), span)
    }

    /// A block containing `stmts`.
    pub fn block(stmts: Vec<Stmt>, span: Span) -> Self {
        Self::new(StmtKind::Block(stmts), span)
    }
}

/// Statement kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    // === Declarations ===
    /// Variable declaration: `let x = 1`
    Var {
        kind: VarKind,
        decls: Vec<VarDeclarator>,
    },
    /// Function declaration: `function foo() {}`
    Function(Box<Function>),
    /// Class declaration: `class Foo {}`
    Class(Box<Class>),

    // === Control flow ===
    Block(Vec<Stmt>),
    If {
        test: Expr,
        consequent: Box<Stmt>,
        alternate: Option<Box<Stmt>>,
    },
    Switch {
        discriminant: Expr,
        cases: Vec<SwitchCase>,
    },
    For {
        init: Option<ForInit>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
    },
    ForIn {
        left: ForInit,
        right: Expr,
        body: Box<Stmt>,
    },
    ForOf {
        left: ForInit,
        right: Expr,
        body: Box<Stmt>,
        is_await: bool,
    },
    While { test: Expr, body: Box<Stmt> },
    DoWhile { body: Box<Stmt>, test: Expr },
    Break { label: Option<String> },
    Continue { label: Option<String> },
    Return { arg: Option<Expr> },
    Throw { arg: Expr },
    Try {
        block: Vec<Stmt>,
        handler: Option<CatchClause>,
        finalizer: Option<Vec<Stmt>>,
    },
    Labeled { label: String, body: Box<Stmt> },

    // === Other ===
    Expr(Expr),
    Empty,
    Debugger,
    With { object: Expr, body: Box<Stmt> },

    // === Modules ===
    Import(Box<ImportDecl>),
    Export(Box<ExportDecl>),
}

// =============================================================================
// Bindings (Patterns)
// =============================================================================

/// A binding pattern (used in variable declarations, parameters, etc.)
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub kind: BindingKind,
    pub span: Span,
}

impl Binding {
    pub fn new(kind: BindingKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// A plain identifier binding.
    pub fn ident(name: impl Into<String>, span: Span) -> Self {
        Self::new(BindingKind::Ident { name: name.into() }, span)
    }

    /// Every name this pattern declares, left to right.
    pub fn bound_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        match &self.kind {
            BindingKind::Ident { name } => out.push(name),
            BindingKind::Array { elements } => {
                for elem in elements.iter().flatten() {
                    elem.binding.collect_names(out);
                }
            }
            BindingKind::Object { properties } => {
                for prop in properties {
                    prop.value.collect_names(out);
                }
            }
        }
    }
}

/// Binding pattern kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingKind {
    /// Simple identifier: `x`
    Ident { name: String },
    /// Array pattern: `[a, b, ...rest]`
    Array {
        elements: Vec<Option<ArrayPatternElement>>,
    },
    /// Object pattern: `{a, b: c, ...rest}`
    Object {
        properties: Vec<ObjectPatternProperty>,
    },
}

/// Element in an array pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayPatternElement {
    pub binding: Binding,
    pub default: Option<Expr>,
    pub rest: bool,
}

/// Property in an object pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectPatternProperty {
    pub key: PropertyKey,
    pub value: Binding,
    pub default: Option<Expr>,
    /// `{a}` rather than `{a: a}`
    pub shorthand: bool,
    /// `{...rest}`; the key is unused.
    pub rest: bool,
}

// =============================================================================
// Operators
// =============================================================================

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Minus,  // -
    Plus,   // +
    Not,    // !
    BitNot, // ~
    Typeof, // typeof
    Void,   // void
    Delete, // delete
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Minus => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::Typeof => "typeof",
            UnaryOp::Void => "void",
            UnaryOp::Delete => "delete",
        }
    }
}

/// Binary and logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add, // +
    Sub, // -
    Mul, // *
    Div, // /
    Mod, // %
    Pow, // **

    // Comparison
    Eq,          // ==
    NotEq,       // !=
    StrictEq,    // ===
    StrictNotEq, // !==
    Lt,          // <
    LtEq,        // <=
    Gt,          // >
    GtEq,        // >=

    // Bitwise
    BitOr,  // |
    BitXor, // ^
    BitAnd, // &
    Shl,    // <<
    Shr,    // >>
    UShr,   // >>>

    // Logical
    And,             // &&
    Or,              // ||
    NullishCoalesce, // ??

    // Relational
    In,         // in
    Instanceof, // instanceof
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNotEq => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::BitAnd => "&",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::NullishCoalesce => "??",
            BinaryOp::In => "in",
            BinaryOp::Instanceof => "instanceof",
        }
    }

    /// `&&`, `||` and `??`.
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or | BinaryOp::NullishCoalesce)
    }
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,        // =
    AddAssign,     // +=
    SubAssign,     // -=
    MulAssign,     // *=
    DivAssign,     // /=
    ModAssign,     // %=
    PowAssign,     // **=
    ShlAssign,     // <<=
    ShrAssign,     // >>=
    UShrAssign,    // >>>=
    BitOrAssign,   // |=
    BitXorAssign,  // ^=
    BitAndAssign,  // &=
    AndAssign,     // &&=
    OrAssign,      // ||=
    NullishAssign, // ??=
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
            AssignOp::MulAssign => "*=",
            AssignOp::DivAssign => "/=",
            AssignOp::ModAssign => "%=",
            AssignOp::PowAssign => "**=",
            AssignOp::ShlAssign => "<<=",
            AssignOp::ShrAssign => ">>=",
            AssignOp::UShrAssign => ">>>=",
            AssignOp::BitOrAssign => "|=",
            AssignOp::BitXorAssign => "^=",
            AssignOp::BitAndAssign => "&=",
            AssignOp::AndAssign => "&&=",
            AssignOp::OrAssign => "||=",
            AssignOp::NullishAssign => "??=",
        }
    }
}

/// Update operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    Increment, // ++
    Decrement, // --
}

impl UpdateOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UpdateOp::Increment => "++",
            UpdateOp::Decrement => "--",
        }
    }
}

// =============================================================================
// Supporting Types
// =============================================================================

/// Variable declaration kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl VarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VarKind::Var => "var",
            VarKind::Let => "let",
            VarKind::Const => "const",
        }
    }
}

/// Variable declarator.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclarator {
    pub binding: Binding,
    pub init: Option<Expr>,
    pub span: Span,
}

/// Object literal member.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: PropertyKey,
    /// The value; for methods and accessors a `Function` expression, for
    /// spreads the spread argument.
    pub value: Expr,
    pub kind: PropertyKind,
    /// `{a}` rather than `{a: a}`
    pub shorthand: bool,
    pub span: Span,
}

/// Property key.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    Ident(String),
    String(String),
    Number(f64),
    BigInt(String),
    Private(String),
    Computed(Box<Expr>),
}

/// Property kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Init,
    Get,
    Set,
    Method,
    /// `{...obj}`; the key is unused.
    Spread,
}

/// Switch case.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// `None` for `default:`
    pub test: Option<Expr>,
    pub consequent: Vec<Stmt>,
    pub span: Span,
}

/// Catch clause.
#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub param: Option<Binding>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// For loop initializer, also the left side of `for-in` / `for-of`.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Var {
        kind: VarKind,
        decls: Vec<VarDeclarator>,
    },
    Expr(Expr),
}

// =============================================================================
// Functions and Classes
// =============================================================================

/// Function node (used for declarations, expressions, methods).
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Option<String>,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    pub is_async: bool,
    pub is_generator: bool,
    pub span: Span,
}

/// Arrow function node.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowFunction {
    pub params: Vec<Param>,
    pub body: ArrowBody,
    pub is_async: bool,
    pub span: Span,
}

/// Arrow function body.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    Expr(Box<Expr>),
    Block(Vec<Stmt>),
}

/// Function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub binding: Binding,
    pub default: Option<Expr>,
    pub rest: bool,
    pub span: Span,
}

/// Class node.
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: Option<String>,
    pub super_class: Option<Box<Expr>>,
    pub body: Vec<ClassMember>,
    pub span: Span,
}

/// Class member.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMember {
    pub kind: ClassMemberKind,
    pub span: Span,
}

/// Class member kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassMemberKind {
    /// Method: `foo() {}`
    Method {
        key: PropertyKey,
        value: Function,
        kind: MethodKind,
        is_static: bool,
    },
    /// Field: `foo = 1`
    Property {
        key: PropertyKey,
        value: Option<Expr>,
        is_static: bool,
    },
    /// Static block: `static { ... }`
    StaticBlock(Vec<Stmt>),
    /// Stray semicolon
    Empty,
}

/// Method kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Method,
    Get,
    Set,
    Constructor,
}

// =============================================================================
// Modules
// =============================================================================

/// Import declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub specifiers: Vec<ImportSpecifier>,
    pub source: String,
    pub span: Span,
}

/// Import specifier.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportSpecifier {
    /// Default import: `import foo from "mod"`
    Default { local: String, span: Span },
    /// Namespace import: `import * as foo from "mod"`
    Namespace { local: String, span: Span },
    /// Named import: `import { foo, bar as baz } from "mod"`
    Named {
        imported: String,
        local: String,
        span: Span,
    },
}

/// Export declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportDecl {
    /// Named export: `export { foo, bar }`
    Named {
        specifiers: Vec<ExportSpecifier>,
        source: Option<String>,
        span: Span,
    },
    /// Default export of an expression: `export default expr`
    Default { expr: Expr, span: Span },
    /// Default export of a named function or class declaration:
    /// `export default function foo() {}`
    DefaultDecl { decl: Stmt, span: Span },
    /// Declaration export: `export function foo() {}`
    Decl { decl: Stmt, span: Span },
    /// All export: `export * from "mod"`
    All {
        exported: Option<String>,
        source: String,
        span: Span,
    },
}

/// Export specifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSpecifier {
    pub local: String,
    pub exported: String,
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_names_of_nested_pattern() {
        let span = Span::default();
        let pattern = Binding::new(
            BindingKind::Object {
                properties: vec![
                    ObjectPatternProperty {
                        key: PropertyKey::Ident("a".into()),
                        value: Binding::ident("a", span),
                        default: None,
                        shorthand: true,
                        rest: false,
                    },
                    ObjectPatternProperty {
                        key: PropertyKey::Ident("b".into()),
                        value: Binding::new(
                            BindingKind::Array {
                                elements: vec![
                                    None,
                                    Some(ArrayPatternElement {
                                        binding: Binding::ident("c", span),
                                        default: None,
                                        rest: true,
                                    }),
                                ],
                            },
                            span,
                        ),
                        default: None,
                        shorthand: false,
                        rest: false,
                    },
                ],
            },
            span,
        );
        assert_eq!(pattern.bound_names(), vec!["a", "c"]);
    }
}
