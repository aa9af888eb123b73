//! deuglify-parser: JavaScript syntax tree, code generator and scope model
//!
//! # Design Principles
//!
//! 1. **Everything is an Expression, Binding, or Statement**
//!    - Expressions: `foo(1)`, `a + b`, `x.y`
//!    - Bindings: `a`, `[a, b]`, `{x: y}`
//!    - Statements: `let a = 1;`, `if (x) {}`, `return x;`
//!
//! 2. **Lexing on-demand**
//!    - Lexer is called during parsing, not upfront
//!    - Enables context-sensitive tokenization (regex vs division)
//!
//! 3. **Owned, mutable trees**
//!    - Rewriting passes take `&mut Ast` and replace nodes in place
//!    - `Visit` gives a read-only pre-order walk for analyses
//!
//! 4. **Two-pass renaming**
//!    - Pass 1: build the scope tree and record bindings
//!    - Pass 2: resolve every identifier through the scope chain and rename
//!
//! # Example
//!
//! ```
//! use deuglify_parser::{generate, parse};
//!
//! let ast = parse("const x=1+2").unwrap();
//! assert_eq!(generate(&ast), "const x = 1 + 2;\n");
//! ```

mod ast;
mod codegen;
mod lexer;
mod parser;
mod scope;
mod span;
mod token;
pub mod visit;

pub use ast::*;
pub use codegen::{Codegen, CodegenOptions};
pub use lexer::Lexer;
pub use parser::{ParseError, Parser, ParserOptions};
pub use scope::{RenameStats, Scope, ScopeId, ScopeKind, ScopeTree};
pub use span::{LineIndex, Span};
pub use token::{Token, TokenKind};
pub use visit::Visit;

/// Parse a script with default options.
pub fn parse(source: &str) -> Result<Ast, ParseError> {
    parser::parse(source)
}

/// Parse with explicit options.
pub fn parse_with(source: &str, options: ParserOptions) -> Result<Ast, ParseError> {
    Parser::new(source, options).parse()
}

/// Generate source text with default formatting.
pub fn generate(ast: &Ast) -> String {
    Codegen::new(ast, CodegenOptions::default()).generate()
}
