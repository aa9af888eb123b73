//! JavaScript parser.
//!
//! Uses a recursive descent parser with Pratt parsing for expressions.
//! Parse errors are fatal: the first one aborts the parse.

use crate::ast::*;
use crate::lexer::Lexer;
use crate::span::{LineIndex, Span};
use crate::token::{Token, TokenKind};

/// Parser configuration options.
#[derive(Debug, Clone, Default)]
pub struct ParserOptions {
    /// Parse as an ECMAScript module (enables top-level `await`).
    pub module: bool,
}

/// Parse error.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    /// 1-based line and column of the error within `source`.
    pub fn line_col(&self, source: &str) -> (u32, u32) {
        LineIndex::new(source).line_col(self.span.start)
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}",
            self.message, self.span.start, self.span.end
        )
    }
}

impl std::error::Error for ParseError {}

/// The parser.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    /// Current token.
    current: Token,
    /// End offset of the previously consumed token.
    prev_end: u32,
    options: ParserOptions,
    source: &'a str,
    /// When false, `in` is not parsed as a binary operator (for-in init).
    allow_in: bool,
    /// Inside an async function: `await` is an operator.
    in_async: bool,
    /// Inside a generator: `yield` is an operator.
    in_generator: bool,
    /// Inside any function body (top-level `await` detection).
    in_function: bool,
}

type PResult<T> = Result<T, ParseError>;

impl<'a> Parser<'a> {
    /// Create a new parser.
    pub fn new(source: &'a str, options: ParserOptions) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            prev_end: 0,
            options,
            source,
            allow_in: true,
            in_async: false,
            in_generator: false,
            in_function: false,
        }
    }

    /// Parse the entire source into an AST.
    pub fn parse(mut self) -> PResult<Ast> {
        let mut stmts = Vec::new();
        while !self.is_eof() {
            stmts.push(self.parse_stmt()?);
        }
        Ok(Ast::new(stmts, self.source.to_string()))
    }

    // =========================================================================
    // Token Handling
    // =========================================================================

    fn peek(&self) -> &TokenKind {
        &self.current.kind
    }

    /// Advance to the next token and return the previous.
    fn advance(&mut self) -> Token {
        self.prev_end = self.current.span.end;
        std::mem::replace(&mut self.current, self.lexer.next_token())
    }

    /// Check if the current token matches the given kind.
    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(kind)
    }

    fn check_ident(&self, name: &str) -> bool {
        self.peek().is_ident(name)
    }

    fn is_eof(&self) -> bool {
        matches!(self.peek(), TokenKind::Eof)
    }

    /// Consume a token if it matches, otherwise return an error.
    fn expect(&mut self, kind: &TokenKind) -> PResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else if let TokenKind::Invalid(message) = self.peek() {
            Err(ParseError::new(*message, self.current.span))
        } else {
            Err(ParseError::new(
                format!("Expected {:?}, got {:?}", kind, self.peek()),
                self.current.span,
            ))
        }
    }

    /// Consume a token if it matches, returning true if consumed.
    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Error for the current token.
    fn unexpected(&self) -> ParseError {
        match self.peek() {
            TokenKind::Invalid(message) => ParseError::new(*message, self.current.span),
            TokenKind::Eof => ParseError::new("Unexpected end of input", self.current.span),
            other => ParseError::new(format!("Unexpected token {other:?}"), self.current.span),
        }
    }

    /// The two tokens after the current one.
    fn peek2(&self) -> (Token, Token) {
        let mut lexer = self.lexer.clone();
        let first = lexer.next_token();
        let second = lexer.next_token();
        (first, second)
    }

    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.prev_end.max(start))
    }

    /// Consume a semicolon (with ASI support).
    fn expect_semicolon(&mut self) -> PResult<()> {
        if self.eat(&TokenKind::Semicolon) {
            return Ok(());
        }
        if self.check(&TokenKind::RBrace) || self.is_eof() || self.current.had_newline_before {
            return Ok(());
        }
        Err(match self.peek() {
            TokenKind::Invalid(_) => self.unexpected(),
            _ => ParseError::new("Expected semicolon", self.current.span),
        })
    }

    /// Run `f` with function-body context flags set, restoring them after.
    fn with_function_context<T>(
        &mut self,
        is_async: bool,
        is_generator: bool,
        f: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        let saved = (self.in_async, self.in_generator, self.in_function, self.allow_in);
        self.in_async = is_async;
        self.in_generator = is_generator;
        self.in_function = true;
        self.allow_in = true;
        let result = f(self);
        (self.in_async, self.in_generator, self.in_function, self.allow_in) = saved;
        result
    }

    fn await_is_operator(&self) -> bool {
        self.in_async || (self.options.module && !self.in_function)
    }

    // =========================================================================
    // Statement Parsing
    // =========================================================================

    /// Parse a statement.
    fn parse_stmt(&mut self) -> PResult<Stmt> {
        let start = self.current.span.start;

        match self.peek() {
            TokenKind::Var | TokenKind::Const => self.parse_var_decl(),
            TokenKind::Function => self.parse_function_decl(false),
            TokenKind::Class => self.parse_class_decl(),

            TokenKind::If => self.parse_if_stmt(),
            TokenKind::Switch => self.parse_switch_stmt(),
            TokenKind::For => self.parse_for_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::Do => self.parse_do_while_stmt(),
            TokenKind::Break | TokenKind::Continue => self.parse_jump_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Throw => self.parse_throw_stmt(),
            TokenKind::Try => self.parse_try_stmt(),
            TokenKind::With => self.parse_with_stmt(),
            TokenKind::Debugger => {
                self.advance();
                self.expect_semicolon()?;
                Ok(Stmt::new(StmtKind::Debugger, self.span_from(start)))
            }

            TokenKind::LBrace => {
                let stmts = self.parse_block()?;
                Ok(Stmt::block(stmts, self.span_from(start)))
            }
            TokenKind::Semicolon => {
                self.advance();
                Ok(Stmt::new(StmtKind::Empty, self.span_from(start)))
            }

            TokenKind::Import => {
                let (next, _) = self.peek2();
                if matches!(next.kind, TokenKind::LParen | TokenKind::Dot) {
                    self.parse_expr_stmt()
                } else {
                    self.parse_import_decl()
                }
            }
            TokenKind::Export => self.parse_export_decl(),

            TokenKind::Identifier(name) => {
                let name = name.clone();
                let (next, _) = self.peek2();
                match name.as_str() {
                    _ if matches!(next.kind, TokenKind::Colon) => self.parse_labeled_stmt(),
                    "let" if self.let_starts_declaration(&next) => self.parse_var_decl(),
                    "async"
                        if matches!(next.kind, TokenKind::Function) && !next.had_newline_before =>
                    {
                        self.advance();
                        self.parse_function_decl(true)
                    }
                    _ => self.parse_expr_stmt(),
                }
            }

            _ => self.parse_expr_stmt(),
        }
    }

    /// `let` followed by a binding starts a declaration; otherwise it is an
    /// identifier.
    fn let_starts_declaration(&self, next: &Token) -> bool {
        matches!(
            next.kind,
            TokenKind::Identifier(_) | TokenKind::LBracket | TokenKind::LBrace
        )
    }

    /// Parse `{ stmts }` and return the statements.
    fn parse_block(&mut self) -> PResult<Vec<Stmt>> {
        self.expect(&TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.is_eof() {
                return Err(self.unexpected());
            }
            stmts.push(self.parse_stmt()?);
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(stmts)
    }

    fn parse_labeled_stmt(&mut self) -> PResult<Stmt> {
        let start = self.current.span.start;
        let label = self.expect_identifier()?;
        self.expect(&TokenKind::Colon)?;
        let body = self.parse_stmt()?;
        Ok(Stmt::new(
            StmtKind::Labeled {
                label,
                body: Box::new(body),
            },
            self.span_from(start),
        ))
    }

    fn parse_var_kind(&mut self) -> PResult<VarKind> {
        let kind = match self.peek() {
            TokenKind::Var => VarKind::Var,
            TokenKind::Const => VarKind::Const,
            TokenKind::Identifier(name) if name == "let" => VarKind::Let,
            _ => return Err(self.unexpected()),
        };
        self.advance();
        Ok(kind)
    }

    /// Parse variable declaration.
    fn parse_var_decl(&mut self) -> PResult<Stmt> {
        let start = self.current.span.start;
        let kind = self.parse_var_kind()?;
        let decls = self.parse_var_declarators()?;
        self.expect_semicolon()?;
        Ok(Stmt::new(StmtKind::Var { kind, decls }, self.span_from(start)))
    }

    fn parse_var_declarators(&mut self) -> PResult<Vec<VarDeclarator>> {
        let mut decls = Vec::new();
        loop {
            decls.push(self.parse_var_declarator()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(decls)
    }

    /// Parse a variable declarator.
    fn parse_var_declarator(&mut self) -> PResult<VarDeclarator> {
        let start = self.current.span.start;
        let binding = self.parse_binding()?;
        let init = if self.eat(&TokenKind::Eq) {
            Some(self.parse_assign_expr()?)
        } else {
            None
        };
        Ok(VarDeclarator {
            binding,
            init,
            span: self.span_from(start),
        })
    }

    /// Parse a binding pattern.
    fn parse_binding(&mut self) -> PResult<Binding> {
        let start = self.current.span.start;
        match self.peek() {
            TokenKind::LBracket => self.parse_array_binding(),
            TokenKind::LBrace => self.parse_object_binding(),
            _ => {
                let name = self.expect_identifier()?;
                Ok(Binding::ident(name, self.span_from(start)))
            }
        }
    }

    fn parse_array_binding(&mut self) -> PResult<Binding> {
        let start = self.current.span.start;
        self.expect(&TokenKind::LBracket)?;

        let mut elements = Vec::new();
        while !self.check(&TokenKind::RBracket) {
            if self.eat(&TokenKind::Comma) {
                elements.push(None);
                continue;
            }
            let rest = self.eat(&TokenKind::Spread);
            let binding = self.parse_binding()?;
            let default = if !rest && self.eat(&TokenKind::Eq) {
                Some(self.parse_assign_expr()?)
            } else {
                None
            };
            elements.push(Some(ArrayPatternElement {
                binding,
                default,
                rest,
            }));
            if !self.check(&TokenKind::RBracket) {
                self.expect(&TokenKind::Comma)?;
            }
        }
        self.expect(&TokenKind::RBracket)?;

        Ok(Binding::new(
            BindingKind::Array { elements },
            self.span_from(start),
        ))
    }

    fn parse_object_binding(&mut self) -> PResult<Binding> {
        let start = self.current.span.start;
        self.expect(&TokenKind::LBrace)?;

        let mut properties = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.eat(&TokenKind::Spread) {
                let value = self.parse_binding()?;
                properties.push(ObjectPatternProperty {
                    key: PropertyKey::Ident(String::new()),
                    value,
                    default: None,
                    shorthand: false,
                    rest: true,
                });
            } else {
                let key_start = self.current.span.start;
                let key = self.parse_property_key()?;
                let (value, shorthand) = if self.eat(&TokenKind::Colon) {
                    (self.parse_binding()?, false)
                } else {
                    match &key {
                        PropertyKey::Ident(name) => {
                            (Binding::ident(name.clone(), self.span_from(key_start)), true)
                        }
                        _ => return Err(self.unexpected()),
                    }
                };
                let default = if self.eat(&TokenKind::Eq) {
                    Some(self.parse_assign_expr()?)
                } else {
                    None
                };
                properties.push(ObjectPatternProperty {
                    key,
                    value,
                    default,
                    shorthand,
                    rest: false,
                });
            }
            if !self.check(&TokenKind::RBrace) {
                self.expect(&TokenKind::Comma)?;
            }
        }
        self.expect(&TokenKind::RBrace)?;

        Ok(Binding::new(
            BindingKind::Object { properties },
            self.span_from(start),
        ))
    }

    fn parse_function_decl(&mut self, is_async: bool) -> PResult<Stmt> {
        let start = self.current.span.start;
        let func = self.parse_function(is_async, start)?;
        Ok(Stmt::new(
            StmtKind::Function(Box::new(func)),
            self.span_from(start),
        ))
    }

    /// Parse `function [*] [name] (params) { body }`. The current token is
    /// `function`; `async` has already been consumed.
    fn parse_function(&mut self, is_async: bool, start: u32) -> PResult<Function> {
        self.expect(&TokenKind::Function)?;
        let is_generator = self.eat(&TokenKind::Star);
        let name = if matches!(self.peek(), TokenKind::Identifier(_)) {
            Some(self.expect_identifier()?)
        } else {
            None
        };
        let (params, body) = self.parse_function_rest(is_async, is_generator)?;
        Ok(Function {
            name,
            params,
            body,
            is_async,
            is_generator,
            span: self.span_from(start),
        })
    }

    /// Parameters and body of a function or method.
    fn parse_function_rest(
        &mut self,
        is_async: bool,
        is_generator: bool,
    ) -> PResult<(Vec<Param>, Vec<Stmt>)> {
        self.with_function_context(is_async, is_generator, |p| {
            let params = p.parse_params()?;
            let body = p.parse_block()?;
            Ok((params, body))
        })
    }

    fn parse_params(&mut self) -> PResult<Vec<Param>> {
        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.check(&TokenKind::RParen) {
            let start = self.current.span.start;
            let rest = self.eat(&TokenKind::Spread);
            let binding = self.parse_binding()?;
            let default = if !rest && self.eat(&TokenKind::Eq) {
                Some(self.parse_assign_expr()?)
            } else {
                None
            };
            params.push(Param {
                binding,
                default,
                rest,
                span: self.span_from(start),
            });
            if !self.check(&TokenKind::RParen) {
                self.expect(&TokenKind::Comma)?;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(params)
    }

    fn parse_class_decl(&mut self) -> PResult<Stmt> {
        let start = self.current.span.start;
        let class = self.parse_class()?;
        Ok(Stmt::new(
            StmtKind::Class(Box::new(class)),
            self.span_from(start),
        ))
    }

    fn parse_class(&mut self) -> PResult<Class> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Class)?;

        let name = if matches!(self.peek(), TokenKind::Identifier(_)) {
            Some(self.expect_identifier()?)
        } else {
            None
        };
        let super_class = if self.eat(&TokenKind::Extends) {
            Some(Box::new(self.parse_lhs_expr()?))
        } else {
            None
        };

        self.expect(&TokenKind::LBrace)?;
        let mut body = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.is_eof() {
                return Err(self.unexpected());
            }
            body.push(self.parse_class_member()?);
        }
        self.expect(&TokenKind::RBrace)?;

        Ok(Class {
            name,
            super_class,
            body,
            span: self.span_from(start),
        })
    }

    /// A contextual modifier (`static`, `async`, `get`, `set`) is a modifier
    /// only when a member name follows it.
    fn is_modifier(&self, word: &str) -> bool {
        if !self.check_ident(word) {
            return false;
        }
        let (next, _) = self.peek2();
        if word == "async" && next.had_newline_before {
            return false;
        }
        !matches!(
            next.kind,
            TokenKind::LParen
                | TokenKind::Eq
                | TokenKind::Semicolon
                | TokenKind::RBrace
                | TokenKind::Comma
                | TokenKind::Colon
                | TokenKind::Eof
        )
    }

    fn parse_class_member(&mut self) -> PResult<ClassMember> {
        let start = self.current.span.start;

        if self.eat(&TokenKind::Semicolon) {
            return Ok(ClassMember {
                kind: ClassMemberKind::Empty,
                span: self.span_from(start),
            });
        }

        let mut is_static = false;
        if self.is_modifier("static") {
            self.advance();
            if self.check(&TokenKind::LBrace) {
                let body = self.with_function_context(false, false, Self::parse_block)?;
                return Ok(ClassMember {
                    kind: ClassMemberKind::StaticBlock(body),
                    span: self.span_from(start),
                });
            }
            is_static = true;
        }

        let is_async = self.is_modifier("async");
        if is_async {
            self.advance();
        }
        let is_generator = self.eat(&TokenKind::Star);

        let mut kind = MethodKind::Method;
        if !is_async && !is_generator {
            if self.is_modifier("get") {
                self.advance();
                kind = MethodKind::Get;
            } else if self.is_modifier("set") {
                self.advance();
                kind = MethodKind::Set;
            }
        }

        let key = self.parse_property_key()?;

        if self.check(&TokenKind::LParen) {
            let is_constructor = !is_static
                && kind == MethodKind::Method
                && matches!(&key, PropertyKey::Ident(n) | PropertyKey::String(n) if n == "constructor");
            if is_constructor {
                kind = MethodKind::Constructor;
            }
            let (params, body) = self.parse_function_rest(is_async, is_generator)?;
            let value = Function {
                name: None,
                params,
                body,
                is_async,
                is_generator,
                span: self.span_from(start),
            };
            return Ok(ClassMember {
                kind: ClassMemberKind::Method {
                    key,
                    value,
                    kind,
                    is_static,
                },
                span: self.span_from(start),
            });
        }

        let value = if self.eat(&TokenKind::Eq) {
            Some(self.with_function_context(false, false, Self::parse_assign_expr)?)
        } else {
            None
        };
        self.expect_semicolon()?;

        Ok(ClassMember {
            kind: ClassMemberKind::Property {
                key,
                value,
                is_static,
            },
            span: self.span_from(start),
        })
    }

    fn parse_property_key(&mut self) -> PResult<PropertyKey> {
        let key = match self.peek().clone() {
            TokenKind::Identifier(name) => PropertyKey::Ident(name),
            TokenKind::String(s) => PropertyKey::String(s),
            TokenKind::Number(n) => PropertyKey::Number(n),
            TokenKind::BigInt(b) => PropertyKey::BigInt(b),
            TokenKind::PrivateName(name) => PropertyKey::Private(name),
            TokenKind::LBracket => {
                self.advance();
                let saved = self.allow_in;
                self.allow_in = true;
                let expr = self.parse_assign_expr();
                self.allow_in = saved;
                let expr = expr?;
                self.expect(&TokenKind::RBracket)?;
                return Ok(PropertyKey::Computed(Box::new(expr)));
            }
            other => match other.keyword_str() {
                Some(kw) => PropertyKey::Ident(kw.to_string()),
                None => return Err(self.unexpected()),
            },
        };
        self.advance();
        Ok(key)
    }

    fn parse_if_stmt(&mut self) -> PResult<Stmt> {
        let start = self.current.span.start;
        self.expect(&TokenKind::If)?;
        let test = self.parse_paren_expr()?;
        let consequent = Box::new(self.parse_stmt()?);
        let alternate = if self.eat(&TokenKind::Else) {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };
        Ok(Stmt::new(
            StmtKind::If {
                test,
                consequent,
                alternate,
            },
            self.span_from(start),
        ))
    }

    fn parse_switch_stmt(&mut self) -> PResult<Stmt> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Switch)?;
        let discriminant = self.parse_paren_expr()?;

        self.expect(&TokenKind::LBrace)?;
        let mut cases = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            let case_start = self.current.span.start;
            let test = if self.eat(&TokenKind::Default) {
                None
            } else {
                self.expect(&TokenKind::Case)?;
                Some(self.parse_expr()?)
            };
            self.expect(&TokenKind::Colon)?;

            let mut consequent = Vec::new();
            while !matches!(
                self.peek(),
                TokenKind::Case | TokenKind::Default | TokenKind::RBrace
            ) {
                if self.is_eof() {
                    return Err(self.unexpected());
                }
                consequent.push(self.parse_stmt()?);
            }
            cases.push(SwitchCase {
                test,
                consequent,
                span: self.span_from(case_start),
            });
        }
        self.expect(&TokenKind::RBrace)?;

        Ok(Stmt::new(
            StmtKind::Switch {
                discriminant,
                cases,
            },
            self.span_from(start),
        ))
    }

    fn parse_for_stmt(&mut self) -> PResult<Stmt> {
        let start = self.current.span.start;
        self.expect(&TokenKind::For)?;
        let is_await = if self.check_ident("await") && self.await_is_operator() {
            self.advance();
            true
        } else {
            false
        };
        self.expect(&TokenKind::LParen)?;

        let saved_allow_in = self.allow_in;
        self.allow_in = false;
        let init = self.parse_for_init();
        self.allow_in = saved_allow_in;
        let init = init?;

        if let Some(left) = init {
            let single_decl = match &left {
                ForInit::Var { decls, .. } => decls.len() == 1,
                ForInit::Expr(_) => true,
            };
            if single_decl && self.eat(&TokenKind::In) {
                let right = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                let body = Box::new(self.parse_stmt()?);
                return Ok(Stmt::new(
                    StmtKind::ForIn { left, right, body },
                    self.span_from(start),
                ));
            }
            if single_decl && self.check_ident("of") {
                self.advance();
                let right = self.parse_assign_expr()?;
                self.expect(&TokenKind::RParen)?;
                let body = Box::new(self.parse_stmt()?);
                return Ok(Stmt::new(
                    StmtKind::ForOf {
                        left,
                        right,
                        body,
                        is_await,
                    },
                    self.span_from(start),
                ));
            }
            return self.finish_for_stmt(Some(left), start);
        }
        self.finish_for_stmt(None, start)
    }

    fn parse_for_init(&mut self) -> PResult<Option<ForInit>> {
        match self.peek() {
            TokenKind::Semicolon => Ok(None),
            TokenKind::Var | TokenKind::Const => {
                let kind = self.parse_var_kind()?;
                let decls = self.parse_var_declarators()?;
                Ok(Some(ForInit::Var { kind, decls }))
            }
            TokenKind::Identifier(name) if name == "let" => {
                let (next, _) = self.peek2();
                if self.let_starts_declaration(&next) {
                    let kind = self.parse_var_kind()?;
                    let decls = self.parse_var_declarators()?;
                    Ok(Some(ForInit::Var { kind, decls }))
                } else {
                    Ok(Some(ForInit::Expr(self.parse_expr()?)))
                }
            }
            _ => Ok(Some(ForInit::Expr(self.parse_expr()?))),
        }
    }

    fn finish_for_stmt(&mut self, init: Option<ForInit>, start: u32) -> PResult<Stmt> {
        self.expect(&TokenKind::Semicolon)?;
        let test = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(&TokenKind::Semicolon)?;
        let update = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(&TokenKind::RParen)?;
        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::new(
            StmtKind::For {
                init,
                test,
                update,
                body,
            },
            self.span_from(start),
        ))
    }

    fn parse_while_stmt(&mut self) -> PResult<Stmt> {
        let start = self.current.span.start;
        self.expect(&TokenKind::While)?;
        let test = self.parse_paren_expr()?;
        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::new(StmtKind::While { test, body }, self.span_from(start)))
    }

    fn parse_do_while_stmt(&mut self) -> PResult<Stmt> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Do)?;
        let body = Box::new(self.parse_stmt()?);
        self.expect(&TokenKind::While)?;
        let test = self.parse_paren_expr()?;
        // A semicolon after `do-while` is always optional.
        self.eat(&TokenKind::Semicolon);
        Ok(Stmt::new(
            StmtKind::DoWhile { body, test },
            self.span_from(start),
        ))
    }

    fn parse_jump_stmt(&mut self) -> PResult<Stmt> {
        let start = self.current.span.start;
        let is_break = self.check(&TokenKind::Break);
        self.advance();
        let label = match self.peek() {
            TokenKind::Identifier(_) if !self.current.had_newline_before => {
                Some(self.expect_identifier()?)
            }
            _ => None,
        };
        self.expect_semicolon()?;
        let kind = if is_break {
            StmtKind::Break { label }
        } else {
            StmtKind::Continue { label }
        };
        Ok(Stmt::new(kind, self.span_from(start)))
    }

    fn parse_return_stmt(&mut self) -> PResult<Stmt> {
        let start = self.current.span.start;
        if !self.in_function {
            return Err(ParseError::new("'return' outside of function", self.current.span));
        }
        self.expect(&TokenKind::Return)?;
        let arg = if self.check(&TokenKind::Semicolon)
            || self.check(&TokenKind::RBrace)
            || self.is_eof()
            || self.current.had_newline_before
        {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect_semicolon()?;
        Ok(Stmt::new(StmtKind::Return { arg }, self.span_from(start)))
    }

    fn parse_throw_stmt(&mut self) -> PResult<Stmt> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Throw)?;
        if self.current.had_newline_before {
            return Err(ParseError::new(
                "Illegal newline after throw",
                self.current.span,
            ));
        }
        let arg = self.parse_expr()?;
        self.expect_semicolon()?;
        Ok(Stmt::new(StmtKind::Throw { arg }, self.span_from(start)))
    }

    fn parse_try_stmt(&mut self) -> PResult<Stmt> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Try)?;
        let block = self.parse_block()?;

        let handler = if self.check(&TokenKind::Catch) {
            let catch_start = self.current.span.start;
            self.advance();
            let param = if self.eat(&TokenKind::LParen) {
                let binding = self.parse_binding()?;
                self.expect(&TokenKind::RParen)?;
                Some(binding)
            } else {
                None
            };
            let body = self.parse_block()?;
            Some(CatchClause {
                param,
                body,
                span: self.span_from(catch_start),
            })
        } else {
            None
        };

        let finalizer = if self.eat(&TokenKind::Finally) {
            Some(self.parse_block()?)
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            return Err(ParseError::new(
                "Missing catch or finally after try",
                self.current.span,
            ));
        }

        Ok(Stmt::new(
            StmtKind::Try {
                block,
                handler,
                finalizer,
            },
            self.span_from(start),
        ))
    }

    fn parse_with_stmt(&mut self) -> PResult<Stmt> {
        let start = self.current.span.start;
        self.expect(&TokenKind::With)?;
        let object = self.parse_paren_expr()?;
        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::new(
            StmtKind::With { object, body },
            self.span_from(start),
        ))
    }

    // =========================================================================
    // Module Declarations
    // =========================================================================

    fn parse_import_decl(&mut self) -> PResult<Stmt> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Import)?;

        let mut specifiers = Vec::new();

        if let TokenKind::String(source) = self.peek().clone() {
            self.advance();
            self.expect_semicolon()?;
            return Ok(self.import_stmt(specifiers, source, start));
        }

        if matches!(self.peek(), TokenKind::Identifier(_)) {
            let spec_start = self.current.span.start;
            let local = self.expect_identifier()?;
            specifiers.push(ImportSpecifier::Default {
                local,
                span: self.span_from(spec_start),
            });
            if !self.eat(&TokenKind::Comma) {
                return self.finish_import(specifiers, start);
            }
        }

        if self.eat(&TokenKind::Star) {
            let spec_start = self.prev_end;
            self.expect_contextual("as")?;
            let local = self.expect_identifier()?;
            specifiers.push(ImportSpecifier::Namespace {
                local,
                span: self.span_from(spec_start),
            });
        } else {
            self.expect(&TokenKind::LBrace)?;
            while !self.check(&TokenKind::RBrace) {
                let spec_start = self.current.span.start;
                let imported = self.expect_module_name()?;
                let local = if self.check_ident("as") {
                    self.advance();
                    self.expect_identifier()?
                } else {
                    imported.clone()
                };
                specifiers.push(ImportSpecifier::Named {
                    imported,
                    local,
                    span: self.span_from(spec_start),
                });
                if !self.check(&TokenKind::RBrace) {
                    self.expect(&TokenKind::Comma)?;
                }
            }
            self.expect(&TokenKind::RBrace)?;
        }

        self.finish_import(specifiers, start)
    }

    fn finish_import(&mut self, specifiers: Vec<ImportSpecifier>, start: u32) -> PResult<Stmt> {
        self.expect_contextual("from")?;
        let source = self.expect_string()?;
        self.expect_semicolon()?;
        Ok(self.import_stmt(specifiers, source, start))
    }

    fn import_stmt(&self, specifiers: Vec<ImportSpecifier>, source: String, start: u32) -> Stmt {
        let span = self.span_from(start);
        Stmt::new(
            StmtKind::Import(Box::new(ImportDecl {
                specifiers,
                source,
                span,
            })),
            span,
        )
    }

    fn parse_export_decl(&mut self) -> PResult<Stmt> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Export)?;

        let decl = match self.peek() {
            TokenKind::Default => {
                self.advance();
                self.parse_export_default(start)?
            }
            TokenKind::Star => {
                self.advance();
                let exported = if self.check_ident("as") {
                    self.advance();
                    Some(self.expect_module_name()?)
                } else {
                    None
                };
                self.expect_contextual("from")?;
                let source = self.expect_string()?;
                self.expect_semicolon()?;
                ExportDecl::All {
                    exported,
                    source,
                    span: self.span_from(start),
                }
            }
            TokenKind::LBrace => {
                self.advance();
                let mut specifiers = Vec::new();
                while !self.check(&TokenKind::RBrace) {
                    let spec_start = self.current.span.start;
                    let local = self.expect_module_name()?;
                    let exported = if self.check_ident("as") {
                        self.advance();
                        self.expect_module_name()?
                    } else {
                        local.clone()
                    };
                    specifiers.push(ExportSpecifier {
                        local,
                        exported,
                        span: self.span_from(spec_start),
                    });
                    if !self.check(&TokenKind::RBrace) {
                        self.expect(&TokenKind::Comma)?;
                    }
                }
                self.expect(&TokenKind::RBrace)?;
                let source = if self.check_ident("from") {
                    self.advance();
                    Some(self.expect_string()?)
                } else {
                    None
                };
                self.expect_semicolon()?;
                ExportDecl::Named {
                    specifiers,
                    source,
                    span: self.span_from(start),
                }
            }
            _ => {
                let decl = self.parse_stmt()?;
                if !matches!(
                    decl.kind,
                    StmtKind::Var { .. } | StmtKind::Function(_) | StmtKind::Class(_)
                ) {
                    return Err(ParseError::new("Expected declaration after export", decl.span));
                }
                ExportDecl::Decl {
                    decl,
                    span: self.span_from(start),
                }
            }
        };

        Ok(Stmt::new(
            StmtKind::Export(Box::new(decl)),
            self.span_from(start),
        ))
    }

    fn parse_export_default(&mut self, start: u32) -> PResult<ExportDecl> {
        let decl_start = self.current.span.start;
        let is_async_fn = self.check_ident("async") && {
            let (next, _) = self.peek2();
            matches!(next.kind, TokenKind::Function) && !next.had_newline_before
        };

        if is_async_fn || self.check(&TokenKind::Function) {
            if is_async_fn {
                self.advance();
            }
            let func = self.parse_function(is_async_fn, decl_start)?;
            let span = self.span_from(decl_start);
            return Ok(if func.name.is_some() {
                ExportDecl::DefaultDecl {
                    decl: Stmt::new(StmtKind::Function(Box::new(func)), span),
                    span: self.span_from(start),
                }
            } else {
                ExportDecl::Default {
                    expr: Expr::new(ExprKind::Function(Box::new(func)), span),
                    span: self.span_from(start),
                }
            });
        }

        if self.check(&TokenKind::Class) {
            let class = self.parse_class()?;
            let span = self.span_from(decl_start);
            return Ok(if class.name.is_some() {
                ExportDecl::DefaultDecl {
                    decl: Stmt::new(StmtKind::Class(Box::new(class)), span),
                    span: self.span_from(start),
                }
            } else {
                ExportDecl::Default {
                    expr: Expr::new(ExprKind::Class(Box::new(class)), span),
                    span: self.span_from(start),
                }
            });
        }

        let expr = self.parse_assign_expr()?;
        self.expect_semicolon()?;
        Ok(ExportDecl::Default {
            expr,
            span: self.span_from(start),
        })
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn expect_identifier(&mut self) -> PResult<String> {
        match self.peek() {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            TokenKind::Invalid(_) => Err(self.unexpected()),
            other => Err(ParseError::new(
                format!("Expected identifier, got {other:?}"),
                self.current.span,
            )),
        }
    }

    /// Names in import/export lists may be reserved words (`default`).
    fn expect_module_name(&mut self) -> PResult<String> {
        if let Some(kw) = self.peek().keyword_str() {
            self.advance();
            return Ok(kw.to_string());
        }
        self.expect_identifier()
    }

    fn expect_contextual(&mut self, word: &str) -> PResult<()> {
        if self.check_ident(word) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::new(
                format!("Expected '{word}', got {:?}", self.peek()),
                self.current.span,
            ))
        }
    }

    fn expect_string(&mut self) -> PResult<String> {
        match self.peek() {
            TokenKind::String(s) => {
                let s = s.clone();
                self.advance();
                Ok(s)
            }
            _ => Err(ParseError::new(
                format!("Expected string, got {:?}", self.peek()),
                self.current.span,
            )),
        }
    }

    fn parse_expr_stmt(&mut self) -> PResult<Stmt> {
        let start = self.current.span.start;
        let expr = self.parse_expr()?;
        self.expect_semicolon()?;
        Ok(Stmt::new(StmtKind::Expr(expr), self.span_from(start)))
    }

    /// `( expr )` as used by `if`, `while`, `switch` and `with`.
    fn parse_paren_expr(&mut self) -> PResult<Expr> {
        self.expect(&TokenKind::LParen)?;
        let saved = self.allow_in;
        self.allow_in = true;
        let expr = self.parse_expr();
        self.allow_in = saved;
        let expr = expr?;
        self.expect(&TokenKind::RParen)?;
        Ok(expr)
    }

    // =========================================================================
    // Expression Parsing (Pratt Parser)
    // =========================================================================

    /// Parse an expression (with comma operator). Sequences are flat.
    fn parse_expr(&mut self) -> PResult<Expr> {
        let start = self.current.span.start;
        let first = self.parse_assign_expr()?;
        if !self.check(&TokenKind::Comma) {
            return Ok(first);
        }

        let mut exprs = vec![first];
        while self.eat(&TokenKind::Comma) {
            exprs.push(self.parse_assign_expr()?);
        }
        Ok(Expr::new(ExprKind::Sequence(exprs), self.span_from(start)))
    }

    /// Parse an assignment expression.
    fn parse_assign_expr(&mut self) -> PResult<Expr> {
        let start = self.current.span.start;

        if let TokenKind::Identifier(name) = self.peek() {
            let (next, after) = self.peek2();

            // Single-param arrow: `x => expr`
            if matches!(next.kind, TokenKind::Arrow) {
                let name = name.clone();
                self.advance();
                let param = Param {
                    binding: Binding::ident(name, self.span_from(start)),
                    default: None,
                    rest: false,
                    span: self.span_from(start),
                };
                self.expect(&TokenKind::Arrow)?;
                return self.parse_arrow_body(vec![param], false, start);
            }

            // `async x => expr`
            if name == "async"
                && !next.had_newline_before
                && matches!(next.kind, TokenKind::Identifier(_))
                && matches!(after.kind, TokenKind::Arrow)
            {
                self.advance();
                let param_start = self.current.span.start;
                let name = self.expect_identifier()?;
                let param = Param {
                    binding: Binding::ident(name, self.span_from(param_start)),
                    default: None,
                    rest: false,
                    span: self.span_from(param_start),
                };
                self.expect(&TokenKind::Arrow)?;
                return self.parse_arrow_body(vec![param], true, start);
            }

            if name == "yield" && self.in_generator {
                return self.parse_yield_expr();
            }
        }

        let left = self.parse_conditional_expr()?;

        if let Some(op) = self.get_assign_op() {
            self.advance();
            let right = self.parse_assign_expr()?;
            return Ok(Expr::new(
                ExprKind::Assign {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                self.span_from(start),
            ));
        }

        Ok(left)
    }

    fn parse_yield_expr(&mut self) -> PResult<Expr> {
        let start = self.current.span.start;
        self.advance();
        let delegate = !self.current.had_newline_before && self.eat(&TokenKind::Star);
        let has_arg = delegate
            || !(self.current.had_newline_before
                || matches!(
                    self.peek(),
                    TokenKind::RParen
                        | TokenKind::RBracket
                        | TokenKind::RBrace
                        | TokenKind::Comma
                        | TokenKind::Semicolon
                        | TokenKind::Colon
                        | TokenKind::In
                        | TokenKind::Eof
                ));
        let arg = if has_arg {
            Some(Box::new(self.parse_assign_expr()?))
        } else {
            None
        };
        Ok(Expr::new(
            ExprKind::Yield { arg, delegate },
            self.span_from(start),
        ))
    }

    fn get_assign_op(&self) -> Option<AssignOp> {
        match self.peek() {
            TokenKind::Eq => Some(AssignOp::Assign),
            TokenKind::PlusEq => Some(AssignOp::AddAssign),
            TokenKind::MinusEq => Some(AssignOp::SubAssign),
            TokenKind::StarEq => Some(AssignOp::MulAssign),
            TokenKind::SlashEq => Some(AssignOp::DivAssign),
            TokenKind::PercentEq => Some(AssignOp::ModAssign),
            TokenKind::StarStarEq => Some(AssignOp::PowAssign),
            TokenKind::LtLtEq => Some(AssignOp::ShlAssign),
            TokenKind::GtGtEq => Some(AssignOp::ShrAssign),
            TokenKind::GtGtGtEq => Some(AssignOp::UShrAssign),
            TokenKind::PipeEq => Some(AssignOp::BitOrAssign),
            TokenKind::CaretEq => Some(AssignOp::BitXorAssign),
            TokenKind::AmpEq => Some(AssignOp::BitAndAssign),
            TokenKind::AmpAmpEq => Some(AssignOp::AndAssign),
            TokenKind::PipePipeEq => Some(AssignOp::OrAssign),
            TokenKind::QuestionQuestionEq => Some(AssignOp::NullishAssign),
            _ => None,
        }
    }

    /// Parse conditional expression (ternary).
    fn parse_conditional_expr(&mut self) -> PResult<Expr> {
        let start = self.current.span.start;
        let test = self.parse_binary_expr(0)?;

        if !self.eat(&TokenKind::Question) {
            return Ok(test);
        }

        // The middle operand always allows `in`.
        let saved = self.allow_in;
        self.allow_in = true;
        let consequent = self.parse_assign_expr();
        self.allow_in = saved;
        let consequent = consequent?;
        self.expect(&TokenKind::Colon)?;
        let alternate = self.parse_assign_expr()?;

        Ok(Expr::new(
            ExprKind::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
            self.span_from(start),
        ))
    }

    /// Parse binary expression using precedence climbing.
    fn parse_binary_expr(&mut self, min_prec: u8) -> PResult<Expr> {
        let start = self.current.span.start;
        let mut left = if let TokenKind::PrivateName(name) = self.peek() {
            // `#x in obj`
            let name = name.clone();
            self.advance();
            if !self.check(&TokenKind::In) {
                return Err(self.unexpected());
            }
            Expr::new(ExprKind::PrivateName(name), self.span_from(start))
        } else {
            self.parse_unary_expr()?
        };

        loop {
            let Some(prec) = self.peek().binary_precedence() else {
                break;
            };
            if prec < min_prec {
                break;
            }
            let Some(op) = self.get_binary_op() else {
                break;
            };

            let next_prec = if self.peek().is_right_associative() {
                prec
            } else {
                prec + 1
            };
            self.advance();
            let right = self.parse_binary_expr(next_prec)?;

            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                self.span_from(start),
            );
        }

        Ok(left)
    }

    fn get_binary_op(&self) -> Option<BinaryOp> {
        match self.peek() {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            TokenKind::Star => Some(BinaryOp::Mul),
            TokenKind::Slash => Some(BinaryOp::Div),
            TokenKind::Percent => Some(BinaryOp::Mod),
            TokenKind::StarStar => Some(BinaryOp::Pow),
            TokenKind::EqEq => Some(BinaryOp::Eq),
            TokenKind::BangEq => Some(BinaryOp::NotEq),
            TokenKind::EqEqEq => Some(BinaryOp::StrictEq),
            TokenKind::BangEqEq => Some(BinaryOp::StrictNotEq),
            TokenKind::Lt => Some(BinaryOp::Lt),
            TokenKind::LtEq => Some(BinaryOp::LtEq),
            TokenKind::Gt => Some(BinaryOp::Gt),
            TokenKind::GtEq => Some(BinaryOp::GtEq),
            TokenKind::Pipe => Some(BinaryOp::BitOr),
            TokenKind::Caret => Some(BinaryOp::BitXor),
            TokenKind::Amp => Some(BinaryOp::BitAnd),
            TokenKind::LtLt => Some(BinaryOp::Shl),
            TokenKind::GtGt => Some(BinaryOp::Shr),
            TokenKind::GtGtGt => Some(BinaryOp::UShr),
            TokenKind::AmpAmp => Some(BinaryOp::And),
            TokenKind::PipePipe => Some(BinaryOp::Or),
            TokenKind::QuestionQuestion => Some(BinaryOp::NullishCoalesce),
            TokenKind::In if self.allow_in => Some(BinaryOp::In),
            TokenKind::Instanceof => Some(BinaryOp::Instanceof),
            _ => None,
        }
    }

    /// Parse unary expression.
    fn parse_unary_expr(&mut self) -> PResult<Expr> {
        let start = self.current.span.start;

        let op = match self.peek() {
            TokenKind::Minus => Some(UnaryOp::Minus),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            TokenKind::Typeof => Some(UnaryOp::Typeof),
            TokenKind::Void => Some(UnaryOp::Void),
            TokenKind::Delete => Some(UnaryOp::Delete),
            _ => None,
        };

        if let Some(op) = op {
            self.advance();
            let arg = self.parse_unary_expr()?;
            return Ok(Expr::new(
                ExprKind::Unary {
                    op,
                    arg: Box::new(arg),
                },
                self.span_from(start),
            ));
        }

        if matches!(self.peek(), TokenKind::PlusPlus | TokenKind::MinusMinus) {
            let op = if self.check(&TokenKind::PlusPlus) {
                UpdateOp::Increment
            } else {
                UpdateOp::Decrement
            };
            self.advance();
            let arg = self.parse_unary_expr()?;
            return Ok(Expr::new(
                ExprKind::Update {
                    op,
                    prefix: true,
                    arg: Box::new(arg),
                },
                self.span_from(start),
            ));
        }

        if self.check_ident("await") && self.await_is_operator() {
            self.advance();
            let arg = self.parse_unary_expr()?;
            return Ok(Expr::new(
                ExprKind::Await(Box::new(arg)),
                self.span_from(start),
            ));
        }

        self.parse_postfix_expr()
    }

    /// Parse postfix `++` / `--`.
    fn parse_postfix_expr(&mut self) -> PResult<Expr> {
        let start = self.current.span.start;
        let expr = self.parse_lhs_expr()?;

        if matches!(self.peek(), TokenKind::PlusPlus | TokenKind::MinusMinus)
            && !self.current.had_newline_before
        {
            let op = if self.check(&TokenKind::PlusPlus) {
                UpdateOp::Increment
            } else {
                UpdateOp::Decrement
            };
            self.advance();
            return Ok(Expr::new(
                ExprKind::Update {
                    op,
                    prefix: false,
                    arg: Box::new(expr),
                },
                self.span_from(start),
            ));
        }

        Ok(expr)
    }

    /// Parse member accesses, calls and tagged templates.
    fn parse_lhs_expr(&mut self) -> PResult<Expr> {
        let start = self.current.span.start;
        let expr = if self.check(&TokenKind::New) {
            self.parse_new_expr()?
        } else {
            self.parse_primary_expr()?
        };
        self.parse_call_tail(expr, start, true)
    }

    /// Member, call, optional-chain and tagged-template suffixes. Calls are
    /// skipped when parsing a `new` callee.
    fn parse_call_tail(&mut self, mut expr: Expr, start: u32, allow_call: bool) -> PResult<Expr> {
        loop {
            match self.peek() {
                TokenKind::Dot => {
                    self.advance();
                    let property = self.parse_member_name()?;
                    expr = Expr::new(
                        ExprKind::Member {
                            object: Box::new(expr),
                            property,
                            optional: false,
                        },
                        self.span_from(start),
                    );
                }
                TokenKind::LBracket => {
                    self.advance();
                    let property = self.parse_computed_member()?;
                    expr = Expr::new(
                        ExprKind::Member {
                            object: Box::new(expr),
                            property,
                            optional: false,
                        },
                        self.span_from(start),
                    );
                }
                TokenKind::QuestionDot if allow_call => {
                    self.advance();
                    expr = match self.peek() {
                        TokenKind::LParen => {
                            let args = self.parse_arguments()?;
                            Expr::new(
                                ExprKind::Call {
                                    callee: Box::new(expr),
                                    args,
                                    optional: true,
                                },
                                self.span_from(start),
                            )
                        }
                        TokenKind::LBracket => {
                            self.advance();
                            let property = self.parse_computed_member()?;
                            Expr::new(
                                ExprKind::Member {
                                    object: Box::new(expr),
                                    property,
                                    optional: true,
                                },
                                self.span_from(start),
                            )
                        }
                        _ => {
                            let property = self.parse_member_name()?;
                            Expr::new(
                                ExprKind::Member {
                                    object: Box::new(expr),
                                    property,
                                    optional: true,
                                },
                                self.span_from(start),
                            )
                        }
                    };
                }
                TokenKind::LParen if allow_call => {
                    let args = self.parse_arguments()?;
                    expr = Expr::new(
                        ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                            optional: false,
                        },
                        self.span_from(start),
                    );
                }
                TokenKind::TemplateNoSub(_) | TokenKind::TemplateHead(_) => {
                    let quasi = self.parse_template_literal()?;
                    expr = Expr::new(
                        ExprKind::TaggedTemplate {
                            tag: Box::new(expr),
                            quasi: Box::new(quasi),
                        },
                        self.span_from(start),
                    );
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_member_name(&mut self) -> PResult<MemberProp> {
        let prop = match self.peek() {
            TokenKind::Identifier(name) => MemberProp::Ident(name.clone()),
            TokenKind::PrivateName(name) => MemberProp::Private(name.clone()),
            other => match other.keyword_str() {
                Some(kw) => MemberProp::Ident(kw.to_string()),
                None => return Err(self.unexpected()),
            },
        };
        self.advance();
        Ok(prop)
    }

    /// The inside of `[...]` after the opening bracket.
    fn parse_computed_member(&mut self) -> PResult<MemberProp> {
        let saved = self.allow_in;
        self.allow_in = true;
        let expr = self.parse_expr();
        self.allow_in = saved;
        let expr = expr?;
        self.expect(&TokenKind::RBracket)?;
        Ok(MemberProp::Computed(Box::new(expr)))
    }

    fn parse_new_expr(&mut self) -> PResult<Expr> {
        let start = self.current.span.start;
        self.expect(&TokenKind::New)?;

        if self.eat(&TokenKind::Dot) {
            let property = self.expect_identifier()?;
            return Ok(Expr::new(
                ExprKind::MetaProperty {
                    meta: "new".to_string(),
                    property,
                },
                self.span_from(start),
            ));
        }

        let callee_start = self.current.span.start;
        let callee = if self.check(&TokenKind::New) {
            self.parse_new_expr()?
        } else {
            self.parse_primary_expr()?
        };
        let callee = self.parse_call_tail(callee, callee_start, false)?;

        let args = if self.check(&TokenKind::LParen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };

        Ok(Expr::new(
            ExprKind::New {
                callee: Box::new(callee),
                args,
            },
            self.span_from(start),
        ))
    }

    fn parse_arguments(&mut self) -> PResult<Vec<Expr>> {
        self.expect(&TokenKind::LParen)?;
        let saved = self.allow_in;
        self.allow_in = true;
        let args = self.parse_arguments_inner();
        self.allow_in = saved;
        args
    }

    fn parse_arguments_inner(&mut self) -> PResult<Vec<Expr>> {
        let mut args = Vec::new();
        while !self.check(&TokenKind::RParen) {
            let start = self.current.span.start;
            if self.eat(&TokenKind::Spread) {
                let arg = self.parse_assign_expr()?;
                args.push(Expr::new(
                    ExprKind::Spread(Box::new(arg)),
                    self.span_from(start),
                ));
            } else {
                args.push(self.parse_assign_expr()?);
            }
            if !self.check(&TokenKind::RParen) {
                self.expect(&TokenKind::Comma)?;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(args)
    }

    fn parse_primary_expr(&mut self) -> PResult<Expr> {
        let start = self.current.span.start;

        let kind = match self.peek().clone() {
            TokenKind::Number(n) => {
                self.advance();
                ExprKind::Number(n)
            }
            TokenKind::String(s) => {
                self.advance();
                ExprKind::String(s)
            }
            TokenKind::BigInt(b) => {
                self.advance();
                ExprKind::BigInt(b)
            }
            TokenKind::True => {
                self.advance();
                ExprKind::Bool(true)
            }
            TokenKind::False => {
                self.advance();
                ExprKind::Bool(false)
            }
            TokenKind::Null => {
                self.advance();
                ExprKind::Null
            }
            TokenKind::This => {
                self.advance();
                ExprKind::This
            }
            TokenKind::Super => {
                self.advance();
                ExprKind::Super
            }
            TokenKind::Slash | TokenKind::SlashEq => {
                self.current = self
                    .lexer
                    .rescan_regex(start as usize, self.current.had_newline_before);
                match self.peek().clone() {
                    TokenKind::Regex { pattern, flags } => {
                        self.advance();
                        ExprKind::Regex { pattern, flags }
                    }
                    _ => return Err(self.unexpected()),
                }
            }
            TokenKind::TemplateNoSub(_) | TokenKind::TemplateHead(_) => {
                return self.parse_template_literal();
            }
            TokenKind::LBracket => return self.parse_array_literal(),
            TokenKind::LBrace => return self.parse_object_literal(),
            TokenKind::LParen => return self.parse_paren_or_arrow(),
            TokenKind::Function => {
                let func = self.parse_function(false, start)?;
                ExprKind::Function(Box::new(func))
            }
            TokenKind::Class => {
                let class = self.parse_class()?;
                ExprKind::Class(Box::new(class))
            }
            TokenKind::Import => {
                self.advance();
                if self.eat(&TokenKind::Dot) {
                    let property = self.expect_identifier()?;
                    ExprKind::MetaProperty {
                        meta: "import".to_string(),
                        property,
                    }
                } else {
                    self.expect(&TokenKind::LParen)?;
                    let saved = self.allow_in;
                    self.allow_in = true;
                    let arg = self.parse_assign_expr();
                    self.allow_in = saved;
                    let arg = arg?;
                    self.eat(&TokenKind::Comma);
                    self.expect(&TokenKind::RParen)?;
                    ExprKind::Import(Box::new(arg))
                }
            }
            TokenKind::Identifier(name) => {
                if name == "async" {
                    if let Some(expr) = self.parse_async_primary(start)? {
                        return Ok(expr);
                    }
                }
                self.advance();
                ExprKind::Ident(name)
            }
            _ => return Err(self.unexpected()),
        };

        Ok(Expr::new(kind, self.span_from(start)))
    }

    /// `async function`, `async (a) => b`, or a call to something named
    /// `async`. Returns `None` when `async` is a plain identifier.
    fn parse_async_primary(&mut self, start: u32) -> PResult<Option<Expr>> {
        let (next, _) = self.peek2();
        if next.had_newline_before {
            return Ok(None);
        }
        match next.kind {
            TokenKind::Function => {
                self.advance();
                let func = self.parse_function(true, start)?;
                Ok(Some(Expr::new(
                    ExprKind::Function(Box::new(func)),
                    self.span_from(start),
                )))
            }
            TokenKind::LParen => {
                self.advance();
                let args = self.parse_arguments()?;
                if self.check(&TokenKind::Arrow) && !self.current.had_newline_before {
                    self.advance();
                    let params = self.exprs_to_params(args)?;
                    return self.parse_arrow_body(params, true, start).map(Some);
                }
                let callee = Expr::ident("async", Span::new(start, start + 5));
                Ok(Some(Expr::new(
                    ExprKind::Call {
                        callee: Box::new(callee),
                        args,
                        optional: false,
                    },
                    self.span_from(start),
                )))
            }
            _ => Ok(None),
        }
    }

    fn parse_array_literal(&mut self) -> PResult<Expr> {
        let start = self.current.span.start;
        self.expect(&TokenKind::LBracket)?;
        let saved = self.allow_in;
        self.allow_in = true;

        let mut elements = Vec::new();
        let result = loop {
            if self.eat(&TokenKind::RBracket) {
                break Ok(());
            }
            if self.eat(&TokenKind::Comma) {
                elements.push(None);
                continue;
            }
            let elem_start = self.current.span.start;
            let elem = if self.eat(&TokenKind::Spread) {
                match self.parse_assign_expr() {
                    Ok(arg) => Expr::new(ExprKind::Spread(Box::new(arg)), self.span_from(elem_start)),
                    Err(e) => break Err(e),
                }
            } else {
                match self.parse_assign_expr() {
                    Ok(e) => e,
                    Err(e) => break Err(e),
                }
            };
            elements.push(Some(elem));
            if !self.check(&TokenKind::RBracket) {
                if let Err(e) = self.expect(&TokenKind::Comma) {
                    break Err(e);
                }
            }
        };

        self.allow_in = saved;
        result?;
        Ok(Expr::new(ExprKind::Array(elements), self.span_from(start)))
    }

    fn parse_object_literal(&mut self) -> PResult<Expr> {
        let start = self.current.span.start;
        self.expect(&TokenKind::LBrace)?;
        let saved = self.allow_in;
        self.allow_in = true;
        let properties = self.parse_object_properties();
        self.allow_in = saved;
        let properties = properties?;
        Ok(Expr::new(ExprKind::Object(properties), self.span_from(start)))
    }

    fn parse_object_properties(&mut self) -> PResult<Vec<Property>> {
        let mut properties = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            properties.push(self.parse_object_property()?);
            if !self.check(&TokenKind::RBrace) {
                self.expect(&TokenKind::Comma)?;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(properties)
    }

    fn parse_object_property(&mut self) -> PResult<Property> {
        let start = self.current.span.start;

        if self.eat(&TokenKind::Spread) {
            let value = self.parse_assign_expr()?;
            return Ok(Property {
                key: PropertyKey::Ident(String::new()),
                value,
                kind: PropertyKind::Spread,
                shorthand: false,
                span: self.span_from(start),
            });
        }

        let is_async = self.is_modifier("async");
        if is_async {
            self.advance();
        }
        let is_generator = self.eat(&TokenKind::Star);

        let mut kind = PropertyKind::Init;
        if !is_async && !is_generator {
            if self.is_modifier("get") {
                self.advance();
                kind = PropertyKind::Get;
            } else if self.is_modifier("set") {
                self.advance();
                kind = PropertyKind::Set;
            }
        }

        let key_start = self.current.span.start;
        let key = self.parse_property_key()?;

        if self.check(&TokenKind::LParen) || is_async || is_generator || kind != PropertyKind::Init {
            let (params, body) = self.parse_function_rest(is_async, is_generator)?;
            let func = Function {
                name: None,
                params,
                body,
                is_async,
                is_generator,
                span: self.span_from(key_start),
            };
            if kind == PropertyKind::Init {
                kind = PropertyKind::Method;
            }
            return Ok(Property {
                key,
                value: Expr::new(ExprKind::Function(Box::new(func)), self.span_from(key_start)),
                kind,
                shorthand: false,
                span: self.span_from(start),
            });
        }

        if self.eat(&TokenKind::Colon) {
            let value = self.parse_assign_expr()?;
            return Ok(Property {
                key,
                value,
                kind: PropertyKind::Init,
                shorthand: false,
                span: self.span_from(start),
            });
        }

        // Shorthand `{ a }`, or `{ a = 1 }` inside a destructuring target.
        let PropertyKey::Ident(name) = &key else {
            return Err(self.unexpected());
        };
        let mut value = Expr::ident(name.clone(), self.span_from(key_start));
        if self.eat(&TokenKind::Eq) {
            let default = self.parse_assign_expr()?;
            value = Expr::new(
                ExprKind::Assign {
                    op: AssignOp::Assign,
                    left: Box::new(value),
                    right: Box::new(default),
                },
                self.span_from(key_start),
            );
        }
        Ok(Property {
            key,
            value,
            kind: PropertyKind::Init,
            shorthand: true,
            span: self.span_from(start),
        })
    }

    /// Parse `( ... )` which is either a parenthesized expression or the
    /// parameter list of an arrow function.
    fn parse_paren_or_arrow(&mut self) -> PResult<Expr> {
        let start = self.current.span.start;
        self.expect(&TokenKind::LParen)?;
        let saved = self.allow_in;
        self.allow_in = true;
        let items = self.parse_paren_items();
        self.allow_in = saved;
        let (items, trailing_comma) = items?;

        if self.check(&TokenKind::Arrow) && !self.current.had_newline_before {
            self.advance();
            let params = self.exprs_to_params(items)?;
            return self.parse_arrow_body(params, false, start);
        }

        let invalid = items.is_empty()
            || trailing_comma
            || items.iter().any(|e| matches!(e.kind, ExprKind::Spread(_)));
        if invalid {
            return Err(ParseError::new(
                "Expected '=>' after arrow parameters",
                self.current.span,
            ));
        }

        let mut items = items;
        if items.len() == 1 {
            return Ok(items.remove(0));
        }
        let span = Span::new(items[0].span.start, items[items.len() - 1].span.end);
        Ok(Expr::new(ExprKind::Sequence(items), span))
    }

    /// Items between parentheses, plus whether a trailing comma was seen.
    fn parse_paren_items(&mut self) -> PResult<(Vec<Expr>, bool)> {
        let mut items = Vec::new();
        let mut trailing_comma = false;
        while !self.check(&TokenKind::RParen) {
            let start = self.current.span.start;
            if self.eat(&TokenKind::Spread) {
                let binding = self.parse_binding()?;
                let arg = binding_to_expr(binding);
                items.push(Expr::new(
                    ExprKind::Spread(Box::new(arg)),
                    self.span_from(start),
                ));
            } else {
                items.push(self.parse_assign_expr()?);
            }
            trailing_comma = false;
            if !self.check(&TokenKind::RParen) {
                self.expect(&TokenKind::Comma)?;
                trailing_comma = true;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok((items, trailing_comma))
    }

    fn parse_arrow_body(&mut self, params: Vec<Param>, is_async: bool, start: u32) -> PResult<Expr> {
        let body = if self.check(&TokenKind::LBrace) {
            ArrowBody::Block(self.with_function_context(is_async, false, Self::parse_block)?)
        } else {
            let allow_in = self.allow_in;
            let expr = self.with_function_context(is_async, false, |p| {
                p.allow_in = allow_in;
                p.parse_assign_expr()
            })?;
            ArrowBody::Expr(Box::new(expr))
        };

        Ok(Expr::new(
            ExprKind::Arrow(Box::new(ArrowFunction {
                params,
                body,
                is_async,
                span: self.span_from(start),
            })),
            self.span_from(start),
        ))
    }

    fn exprs_to_params(&self, exprs: Vec<Expr>) -> PResult<Vec<Param>> {
        exprs.into_iter().map(|e| self.expr_to_param(e)).collect()
    }

    /// Convert an expression to a parameter.
    fn expr_to_param(&self, expr: Expr) -> PResult<Param> {
        let span = expr.span;
        match expr.kind {
            ExprKind::Assign {
                op: AssignOp::Assign,
                left,
                right,
            } => Ok(Param {
                binding: self.expr_to_binding(*left)?,
                default: Some(*right),
                rest: false,
                span,
            }),
            ExprKind::Spread(arg) => Ok(Param {
                binding: self.expr_to_binding(*arg)?,
                default: None,
                rest: true,
                span,
            }),
            kind => Ok(Param {
                binding: self.expr_to_binding(Expr::new(kind, span))?,
                default: None,
                rest: false,
                span,
            }),
        }
    }

    /// Convert an expression to a binding pattern.
    fn expr_to_binding(&self, expr: Expr) -> PResult<Binding> {
        let span = expr.span;
        match expr.kind {
            ExprKind::Ident(name) => Ok(Binding::ident(name, span)),
            ExprKind::Array(elems) => {
                let mut elements = Vec::with_capacity(elems.len());
                for elem in elems {
                    let Some(elem) = elem else {
                        elements.push(None);
                        continue;
                    };
                    let element = match elem.kind {
                        ExprKind::Spread(inner) => ArrayPatternElement {
                            binding: self.expr_to_binding(*inner)?,
                            default: None,
                            rest: true,
                        },
                        ExprKind::Assign {
                            op: AssignOp::Assign,
                            left,
                            right,
                        } => ArrayPatternElement {
                            binding: self.expr_to_binding(*left)?,
                            default: Some(*right),
                            rest: false,
                        },
                        kind => ArrayPatternElement {
                            binding: self.expr_to_binding(Expr::new(kind, elem.span))?,
                            default: None,
                            rest: false,
                        },
                    };
                    elements.push(Some(element));
                }
                Ok(Binding::new(BindingKind::Array { elements }, span))
            }
            ExprKind::Object(props) => {
                let mut properties = Vec::with_capacity(props.len());
                for prop in props {
                    match prop.kind {
                        PropertyKind::Spread => properties.push(ObjectPatternProperty {
                            key: prop.key,
                            value: self.expr_to_binding(prop.value)?,
                            default: None,
                            shorthand: false,
                            rest: true,
                        }),
                        PropertyKind::Init => {
                            let (value, default) = match prop.value.kind {
                                ExprKind::Assign {
                                    op: AssignOp::Assign,
                                    left,
                                    right,
                                } => (self.expr_to_binding(*left)?, Some(*right)),
                                kind => (self.expr_to_binding(Expr::new(kind, prop.value.span))?, None),
                            };
                            properties.push(ObjectPatternProperty {
                                key: prop.key,
                                value,
                                default,
                                shorthand: prop.shorthand,
                                rest: false,
                            });
                        }
                        _ => {
                            return Err(ParseError::new(
                                "Invalid binding in object pattern",
                                prop.span,
                            ))
                        }
                    }
                }
                Ok(Binding::new(BindingKind::Object { properties }, span))
            }
            _ => Err(ParseError::new("Invalid binding pattern", span)),
        }
    }

    fn parse_template_literal(&mut self) -> PResult<Expr> {
        let start = self.current.span.start;
        let mut quasis = Vec::new();
        let mut exprs = Vec::new();

        match self.peek().clone() {
            TokenKind::TemplateNoSub(raw) => {
                self.advance();
                quasis.push(raw);
                return Ok(Expr::new(
                    ExprKind::Template { quasis, exprs },
                    self.span_from(start),
                ));
            }
            TokenKind::TemplateHead(raw) => {
                self.advance();
                quasis.push(raw);
            }
            _ => return Err(self.unexpected()),
        }

        let saved = self.allow_in;
        self.allow_in = true;
        let result = self.parse_template_spans(&mut quasis, &mut exprs);
        self.allow_in = saved;
        result?;

        Ok(Expr::new(
            ExprKind::Template { quasis, exprs },
            self.span_from(start),
        ))
    }

    fn parse_template_spans(&mut self, quasis: &mut Vec<String>, exprs: &mut Vec<Expr>) -> PResult<()> {
        loop {
            exprs.push(self.parse_expr()?);

            if !self.check(&TokenKind::RBrace) {
                return Err(ParseError::new(
                    "Expected '}' in template literal",
                    self.current.span,
                ));
            }
            // The lexer sits just past the `}`; read the next template part.
            self.current = self.lexer.scan_template_continuation();

            match self.peek().clone() {
                TokenKind::TemplateMiddle(raw) => {
                    self.advance();
                    quasis.push(raw);
                }
                TokenKind::TemplateTail(raw) => {
                    self.advance();
                    quasis.push(raw);
                    return Ok(());
                }
                _ => return Err(self.unexpected()),
            }
        }
    }
}

/// Rebuild an expression from a binding parsed after `...` in a
/// parenthesized list, so it can be converted back by `expr_to_param`.
fn binding_to_expr(binding: Binding) -> Expr {
    let span = binding.span;
    match binding.kind {
        BindingKind::Ident { name } => Expr::ident(name, span),
        BindingKind::Array { elements } => {
            let elems = elements
                .into_iter()
                .map(|elem| {
                    elem.map(|e| {
                        let inner = binding_to_expr(e.binding);
                        let inner_span = inner.span;
                        if e.rest {
                            Expr::new(ExprKind::Spread(Box::new(inner)), inner_span)
                        } else if let Some(default) = e.default {
                            Expr::new(
                                ExprKind::Assign {
                                    op: AssignOp::Assign,
                                    left: Box::new(inner),
                                    right: Box::new(default),
                                },
                                inner_span,
                            )
                        } else {
                            inner
                        }
                    })
                })
                .collect();
            Expr::new(ExprKind::Array(elems), span)
        }
        BindingKind::Object { properties } => {
            let props = properties
                .into_iter()
                .map(|p| {
                    let mut value = binding_to_expr(p.value);
                    let value_span = value.span;
                    if let Some(default) = p.default {
                        value = Expr::new(
                            ExprKind::Assign {
                                op: AssignOp::Assign,
                                left: Box::new(value),
                                right: Box::new(default),
                            },
                            value_span,
                        );
                    }
                    Property {
                        key: p.key,
                        value,
                        kind: if p.rest {
                            PropertyKind::Spread
                        } else {
                            PropertyKind::Init
                        },
                        shorthand: p.shorthand,
                        span: value_span,
                    }
                })
                .collect();
            Expr::new(ExprKind::Object(props), span)
        }
    }
}

/// Parse JavaScript source into an AST with default options.
pub fn parse(source: &str) -> Result<Ast, ParseError> {
    Parser::new(source, ParserOptions::default()).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(source: &str) -> Stmt {
        let mut ast = parse(source).unwrap();
        assert_eq!(ast.stmts.len(), 1, "expected one statement in {source:?}");
        ast.stmts.remove(0)
    }

    fn parse_expr(source: &str) -> Expr {
        match parse_one(source).kind {
            StmtKind::Expr(e) => e,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_variable_declaration() {
        let stmt = parse_one("var a = 1, b = 2;");
        let StmtKind::Var { kind, decls } = stmt.kind else {
            panic!("expected var");
        };
        assert_eq!(kind, VarKind::Var);
        assert_eq!(decls.len(), 2);
    }

    #[test]
    fn test_let_as_identifier_and_declaration() {
        assert!(matches!(parse_one("let x = 1;").kind, StmtKind::Var { kind: VarKind::Let, .. }));
        assert!(matches!(parse_one("let = 5;").kind, StmtKind::Expr(_)));
    }

    #[test]
    fn test_function_declaration() {
        let stmt = parse_one("function foo(a, b = 1, ...c) { return a + b; }");
        let StmtKind::Function(func) = stmt.kind else {
            panic!("expected function");
        };
        assert_eq!(func.name.as_deref(), Some("foo"));
        assert_eq!(func.params.len(), 3);
        assert!(func.params[2].rest);
    }

    #[test]
    fn test_sequence_is_flat() {
        let expr = parse_expr("a(), b(), c();");
        let ExprKind::Sequence(items) = expr.kind else {
            panic!("expected sequence");
        };
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn test_binary_precedence() {
        let expr = parse_expr("1 + 2 * 3;");
        let ExprKind::Binary { op, right, .. } = expr.kind else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::Add);
        assert!(matches!(right.kind, ExprKind::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn test_regex_in_operand_position() {
        let expr = parse_expr("x = a / b / /re/g.test(c);");
        let ExprKind::Assign { right, .. } = expr.kind else {
            panic!("expected assignment");
        };
        let ExprKind::Binary { right, .. } = right.kind else {
            panic!("expected division");
        };
        assert!(matches!(right.kind, ExprKind::Call { .. }));
    }

    #[test]
    fn test_arrow_functions() {
        for source in [
            "x => x;",
            "(a, b) => a + b;",
            "({a, b = 2}, [c], ...d) => a;",
            "async (a) => await a;",
            "async x => x;",
            "() => ({});",
        ] {
            let expr = parse_expr(source);
            assert!(matches!(expr.kind, ExprKind::Arrow(_)), "{source}");
        }
    }

    #[test]
    fn test_async_call_is_not_arrow() {
        let expr = parse_expr("async(1);");
        assert!(matches!(expr.kind, ExprKind::Call { .. }));
    }

    #[test]
    fn test_class_declaration() {
        let stmt = parse_one(
            "class Foo extends Bar { constructor() { super(); } static get x() { return 1 } #y = 2; static { init(); } }",
        );
        let StmtKind::Class(class) = stmt.kind else {
            panic!("expected class");
        };
        assert_eq!(class.body.len(), 4);
        assert!(matches!(
            class.body[0].kind,
            ClassMemberKind::Method { kind: MethodKind::Constructor, .. }
        ));
        assert!(matches!(
            class.body[1].kind,
            ClassMemberKind::Method { kind: MethodKind::Get, is_static: true, .. }
        ));
        assert!(matches!(class.body[3].kind, ClassMemberKind::StaticBlock(_)));
    }

    #[test]
    fn test_for_variants() {
        assert!(matches!(parse_one("for (var i = 0, j; i < 1; i++);").kind, StmtKind::For { .. }));
        assert!(matches!(parse_one("for (var k in o);").kind, StmtKind::ForIn { .. }));
        assert!(matches!(parse_one("for (const [k, v] of m);").kind, StmtKind::ForOf { .. }));
        assert!(matches!(parse_one("for (x of y);").kind, StmtKind::ForOf { .. }));
        assert!(matches!(parse_one("for (;;) break;").kind, StmtKind::For { init: None, .. }));
    }

    #[test]
    fn test_asi_and_restricted_productions() {
        let ast = parse("function f() { return\n1 }\na\n++b").unwrap();
        let StmtKind::Function(func) = &ast.stmts[0].kind else {
            panic!("expected function");
        };
        assert!(matches!(func.body[0].kind, StmtKind::Return { arg: None }));
        assert_eq!(ast.stmts.len(), 3);
    }

    #[test]
    fn test_template_literal() {
        let expr = parse_expr("`a${b}c${d}e`;");
        let ExprKind::Template { quasis, exprs } = expr.kind else {
            panic!("expected template");
        };
        assert_eq!(quasis, vec!["a", "c", "e"]);
        assert_eq!(exprs.len(), 2);
    }

    #[test]
    fn test_optional_chain() {
        let expr = parse_expr("a?.b?.[c]?.(d);");
        assert!(matches!(expr.kind, ExprKind::Call { optional: true, .. }));
    }

    #[test]
    fn test_new_with_member_callee() {
        let expr = parse_expr("new a.B(1).c;");
        let ExprKind::Member { object, .. } = expr.kind else {
            panic!("expected member");
        };
        assert!(matches!(object.kind, ExprKind::New { .. }));
    }

    #[test]
    fn test_labeled_statement() {
        assert!(matches!(
            parse_one("outer: for (;;) { break outer; }").kind,
            StmtKind::Labeled { .. }
        ));
    }

    #[test]
    fn test_modules() {
        let ast = parse(
            "import a, { b as c, default as d } from 'x';\nexport { c as default };\nexport const e = 1;\nexport default function f() {}",
        )
        .unwrap();
        assert_eq!(ast.stmts.len(), 4);
        let StmtKind::Export(decl) = &ast.stmts[3].kind else {
            panic!("expected export");
        };
        assert!(matches!(**decl, ExportDecl::DefaultDecl { .. }));
    }

    #[test]
    fn test_object_literal_members() {
        let expr = parse_expr("({ a, b: 1, [c]: 2, d() {}, get e() { return 1 }, ...f, if: 3 });");
        let ExprKind::Object(props) = expr.kind else {
            panic!("expected object");
        };
        assert_eq!(props.len(), 7);
        assert!(props[0].shorthand);
        assert_eq!(props[3].kind, PropertyKind::Method);
        assert_eq!(props[4].kind, PropertyKind::Get);
        assert_eq!(props[5].kind, PropertyKind::Spread);
    }

    #[test]
    fn test_generator_and_await_context() {
        let stmt = parse_one("function* g() { yield 1; yield* h(); }");
        let StmtKind::Function(func) = stmt.kind else {
            panic!("expected function");
        };
        assert!(func.is_generator);
        // Outside async functions `await` is an identifier.
        assert!(matches!(parse_expr("await;").kind, ExprKind::Ident(_)));
    }

    #[test]
    fn test_parse_error_reports_location() {
        let source = "var a = 1;\nvar = 2;";
        let err = parse(source).unwrap_err();
        assert_eq!(err.line_col(source).0, 2);
    }

    #[test]
    fn test_return_outside_function_is_error() {
        let err = parse("if (a) return;").unwrap_err();
        assert_eq!(err.message, "'return' outside of function");
        assert_eq!(err.span.start, 7);
        let err = Parser::new("return 1;", ParserOptions { module: true })
            .parse()
            .unwrap_err();
        assert_eq!(err.message, "'return' outside of function");
        assert!(parse("(() => { return; })(); function f() { if (a) return; }").is_ok());
    }

    #[test]
    fn test_unterminated_string_is_error() {
        let err = parse("var a = 'abc").unwrap_err();
        assert_eq!(err.message, "unterminated string literal");
    }
}
