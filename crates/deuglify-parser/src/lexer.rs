//! Lexer (tokenizer) for JavaScript.
//!
//! The lexer is called on demand by the parser. It never decides on its own
//! whether `/` starts a regular expression: the parser asks for a rescan
//! with [`Lexer::rescan_regex`] when a slash shows up in operand position.
//! Template continuations after `}` work the same way.

use crate::span::Span;
use crate::token::{keyword_from_str, Token, TokenKind};

/// The lexer state.
#[derive(Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    /// Current byte position.
    pos: usize,
    /// Start position of the current token.
    token_start: usize,
    /// A line terminator was skipped before the current token.
    newline_before: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        let mut lexer = Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            token_start: 0,
            newline_before: false,
        };
        lexer.skip_bom_and_hashbang();
        lexer
    }

    /// Get the current byte position.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Token {
        self.newline_before = false;
        self.skip_whitespace_and_comments();
        self.token_start = self.pos;

        if self.is_eof() {
            return self.make_token(TokenKind::Eof);
        }

        let ch = self.current();
        let kind = match ch {
            b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'$' | b'\\' => self.scan_identifier(),
            b'0'..=b'9' => self.scan_number(),
            b'"' | b'\'' => self.scan_string(ch),
            b'`' => {
                self.advance();
                self.scan_template_part(true)
            }
            b'#' => self.scan_private_name(),

            b'(' => self.single(TokenKind::LParen),
            b')' => self.single(TokenKind::RParen),
            b'{' => self.single(TokenKind::LBrace),
            b'}' => self.single(TokenKind::RBrace),
            b'[' => self.single(TokenKind::LBracket),
            b']' => self.single(TokenKind::RBracket),
            b';' => self.single(TokenKind::Semicolon),
            b',' => self.single(TokenKind::Comma),
            b':' => self.single(TokenKind::Colon),
            b'~' => self.single(TokenKind::Tilde),

            b'.' => self.scan_dot(),
            b'?' => self.scan_question(),
            b'+' => self.scan_plus(),
            b'-' => self.scan_minus(),
            b'*' => self.scan_star(),
            b'/' => self.scan_slash(),
            b'%' => self.scan_percent(),
            b'=' => self.scan_equals(),
            b'!' => self.scan_bang(),
            b'<' => self.scan_less_than(),
            b'>' => self.scan_greater_than(),
            b'&' => self.scan_ampersand(),
            b'|' => self.scan_pipe(),
            b'^' => self.scan_caret(),

            _ if ch >= 0x80 && self.current_char().is_some_and(is_id_start) => {
                self.scan_identifier()
            }
            _ => {
                self.advance_char();
                TokenKind::Invalid("unexpected character")
            }
        };

        self.make_token(kind)
    }

    /// Peek at the next token without consuming it.
    pub fn peek(&mut self) -> Token {
        let saved = self.clone();
        let token = self.next_token();
        *self = saved;
        token
    }

    /// Re-read the token starting at `start` as a regular expression literal.
    pub fn rescan_regex(&mut self, start: usize, had_newline_before: bool) -> Token {
        self.pos = start;
        self.token_start = start;
        self.newline_before = had_newline_before;
        let kind = self.scan_regex();
        self.make_token(kind)
    }

    /// Scan a template middle or tail. Called with the position just past
    /// the `}` that closed a substitution.
    pub fn scan_template_continuation(&mut self) -> Token {
        self.token_start = self.pos.saturating_sub(1);
        self.newline_before = false;
        let kind = self.scan_template_part(false);
        self.make_token(kind)
    }

    // === Helper methods ===

    fn is_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn current(&self) -> u8 {
        self.bytes.get(self.pos).copied().unwrap_or(0)
    }

    fn current_char(&self) -> Option<char> {
        self.source.get(self.pos..).and_then(|rest| rest.chars().next())
    }

    fn peek_char(&self) -> u8 {
        self.bytes.get(self.pos + 1).copied().unwrap_or(0)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    fn advance_char(&mut self) {
        self.pos += self.current_char().map_or(1, char::len_utf8);
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(
            kind,
            Span::new(self.token_start as u32, self.pos as u32),
            self.newline_before,
        )
    }

    fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.source[start..end]
    }

    // === Whitespace and comments ===

    fn skip_bom_and_hashbang(&mut self) {
        if self.source.starts_with('\u{FEFF}') {
            self.pos = '\u{FEFF}'.len_utf8();
        }
        if self.bytes[self.pos..].starts_with(b"#!") {
            self.skip_line_comment();
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.current() {
                b' ' | b'\t' | 0x0B | 0x0C => self.advance(),
                b'\r' | b'\n' => {
                    self.newline_before = true;
                    self.advance();
                }
                b'/' if self.peek_char() == b'/' => self.skip_line_comment(),
                b'/' if self.peek_char() == b'*' => self.skip_block_comment(),
                b'<' if self.bytes[self.pos..].starts_with(b"<!--") => self.skip_line_comment(),
                b'-' if self.newline_before && self.bytes[self.pos..].starts_with(b"-->") => {
                    self.skip_line_comment();
                }
                0x80.. => match self.current_char() {
                    Some('\u{2028}' | '\u{2029}') => {
                        self.newline_before = true;
                        self.advance_char();
                    }
                    Some(c) if is_unicode_space(c) => self.advance_char(),
                    _ => break,
                },
                _ => break,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while !self.is_eof() && !matches!(self.current(), b'\n' | b'\r') {
            if matches!(self.current_char(), Some('\u{2028}' | '\u{2029}')) {
                break;
            }
            self.advance_char();
        }
    }

    fn skip_block_comment(&mut self) {
        self.advance_n(2);
        while !self.is_eof() {
            match self.current() {
                b'*' if self.peek_char() == b'/' => {
                    self.advance_n(2);
                    return;
                }
                b'\n' | b'\r' => {
                    self.newline_before = true;
                    self.advance();
                }
                _ => self.advance_char(),
            }
        }
        // Unterminated block comments run to end of file; the parser then
        // sees Eof where it expected more input.
    }

    // === Token scanning ===

    fn scan_identifier(&mut self) -> TokenKind {
        let mut escaped: Option<String> = None;
        let mut run_start = self.pos;

        while !self.is_eof() {
            match self.current() {
                b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' | b'$' => self.advance(),
                b'\\' => {
                    let text = escaped.get_or_insert_with(String::new);
                    text.push_str(self.slice(run_start, self.pos));
                    self.advance();
                    if self.current() != b'u' {
                        return TokenKind::Invalid("invalid escape in identifier");
                    }
                    self.advance();
                    match self.scan_code_point() {
                        Some(c) if is_id_continue(c) => text.push(c),
                        _ => return TokenKind::Invalid("invalid escape in identifier"),
                    }
                    run_start = self.pos;
                }
                0x80.. => match self.current_char() {
                    Some(c) if is_id_continue(c) => self.advance_char(),
                    _ => break,
                },
                _ => break,
            }
        }

        match escaped {
            // Escaped identifiers are never keywords.
            Some(mut text) => {
                text.push_str(self.slice(run_start, self.pos));
                TokenKind::Identifier(text)
            }
            None => {
                let ident = self.slice(self.token_start, self.pos);
                keyword_from_str(ident).unwrap_or_else(|| TokenKind::Identifier(ident.to_string()))
            }
        }
    }

    fn scan_private_name(&mut self) -> TokenKind {
        self.advance();
        let start = self.pos;
        while !self.is_eof() {
            match self.current() {
                b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' | b'$' => self.advance(),
                0x80.. if self.current_char().is_some_and(is_id_continue) => self.advance_char(),
                _ => break,
            }
        }
        if start == self.pos {
            return TokenKind::Invalid("expected a name after '#'");
        }
        TokenKind::PrivateName(self.slice(start, self.pos).to_string())
    }

    fn scan_number(&mut self) -> TokenKind {
        if self.current() == b'0' {
            match self.peek_char() {
                b'x' | b'X' => return self.scan_radix_number(16),
                b'b' | b'B' => return self.scan_radix_number(2),
                b'o' | b'O' => return self.scan_radix_number(8),
                b'0'..=b'9' => return self.scan_legacy_octal(),
                _ => {}
            }
        }

        let start = self.pos;
        self.skip_digits();

        if self.current() == b'n' {
            self.advance();
            let digits = self.slice(start, self.pos - 1).replace('_', "");
            return TokenKind::BigInt(digits);
        }

        if self.current() == b'.' {
            self.advance();
            self.skip_digits();
        }
        self.scan_exponent_and_finish(start)
    }

    /// Fraction-only numbers such as `.5`, entered from `scan_dot`.
    fn scan_fraction(&mut self) -> TokenKind {
        let start = self.pos;
        self.advance();
        self.skip_digits();
        self.scan_exponent_and_finish(start)
    }

    fn scan_exponent_and_finish(&mut self, start: usize) -> TokenKind {
        if matches!(self.current(), b'e' | b'E') {
            self.advance();
            if matches!(self.current(), b'+' | b'-') {
                self.advance();
            }
            if !self.current().is_ascii_digit() {
                return TokenKind::Invalid("missing exponent digits");
            }
            self.skip_digits();
        }

        let text = self.slice(start, self.pos).replace('_', "");
        match text.parse::<f64>() {
            Ok(value) => TokenKind::Number(value),
            Err(_) => TokenKind::Invalid("malformed number"),
        }
    }

    fn skip_digits(&mut self) {
        while self.current().is_ascii_digit() || self.current() == b'_' {
            self.advance();
        }
    }

    fn scan_radix_number(&mut self, radix: u32) -> TokenKind {
        let start = self.pos;
        self.advance_n(2);
        let digits_start = self.pos;

        let mut value = 0f64;
        loop {
            let c = self.current();
            if c == b'_' {
                self.advance();
                continue;
            }
            match (c as char).to_digit(radix) {
                Some(d) => {
                    value = value * f64::from(radix) + f64::from(d);
                    self.advance();
                }
                None => break,
            }
        }

        if digits_start == self.pos {
            return TokenKind::Invalid("missing digits after radix prefix");
        }

        if self.current() == b'n' {
            self.advance();
            let digits = self.slice(start, self.pos - 1).replace('_', "");
            return TokenKind::BigInt(digits);
        }
        TokenKind::Number(value)
    }

    /// Sloppy-mode `017` (octal) and `019` (decimal) literals.
    fn scan_legacy_octal(&mut self) -> TokenKind {
        let start = self.pos;
        while self.current().is_ascii_digit() {
            self.advance();
        }
        let text = self.slice(start, self.pos);
        if text.bytes().all(|b| b <= b'7') {
            let value = text
                .bytes()
                .fold(0f64, |acc, b| acc * 8.0 + f64::from(b - b'0'));
            return TokenKind::Number(value);
        }
        if self.current() == b'.' {
            self.advance();
            self.skip_digits();
        }
        self.scan_exponent_and_finish(start)
    }

    fn scan_string(&mut self, quote: u8) -> TokenKind {
        self.advance();
        let mut value = String::new();
        let mut run_start = self.pos;

        loop {
            if self.is_eof() {
                return TokenKind::Invalid("unterminated string literal");
            }
            match self.current() {
                c if c == quote => {
                    value.push_str(self.slice(run_start, self.pos));
                    self.advance();
                    return TokenKind::String(value);
                }
                b'\\' => {
                    value.push_str(self.slice(run_start, self.pos));
                    self.advance();
                    if let Err(message) = self.scan_escape_sequence(&mut value) {
                        return TokenKind::Invalid(message);
                    }
                    run_start = self.pos;
                }
                b'\n' | b'\r' => return TokenKind::Invalid("unterminated string literal"),
                _ => self.advance_char(),
            }
        }
    }

    /// Append the character(s) an escape sequence stands for. The backslash
    /// has already been consumed.
    fn scan_escape_sequence(&mut self, out: &mut String) -> Result<(), &'static str> {
        let Some(ch) = self.current_char() else {
            return Err("unterminated string literal");
        };
        self.advance_char();

        match ch {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{C}'),
            'v' => out.push('\u{B}'),
            // Line continuations contribute nothing.
            '\n' | '\u{2028}' | '\u{2029}' => {}
            '\r' => {
                if self.current() == b'\n' {
                    self.advance();
                }
            }
            'x' => {
                let value = self.scan_hex_digits(2).ok_or("invalid hexadecimal escape")?;
                out.push(char::from_u32(value).unwrap_or('\u{FFFD}'));
            }
            'u' => {
                let c = self.scan_code_point().ok_or("invalid unicode escape")?;
                out.push(c);
            }
            '0'..='7' => {
                let mut value = ch as u32 - '0' as u32;
                let max_len = if ch <= '3' { 3 } else { 2 };
                let mut len = 1;
                while len < max_len && matches!(self.current(), b'0'..=b'7') {
                    value = value * 8 + u32::from(self.current() - b'0');
                    self.advance();
                    len += 1;
                }
                out.push(char::from_u32(value).unwrap_or('\u{FFFD}'));
            }
            other => out.push(other),
        }
        Ok(())
    }

    /// Scan the part of a `\u` escape after the `u`, combining a UTF-16
    /// surrogate pair written as two escapes into one character.
    fn scan_code_point(&mut self) -> Option<char> {
        let unit = if self.current() == b'{' {
            self.advance();
            let start = self.pos;
            while self.current().is_ascii_hexdigit() {
                self.advance();
            }
            let value = u32::from_str_radix(self.slice(start, self.pos), 16).ok()?;
            if self.current() != b'}' {
                return None;
            }
            self.advance();
            value
        } else {
            self.scan_hex_digits(4)?
        };

        if (0xD800..0xDC00).contains(&unit) && self.bytes[self.pos..].starts_with(b"\\u") {
            let saved = self.pos;
            self.advance_n(2);
            if let Some(low) = self.scan_hex_digits(4) {
                if (0xDC00..0xE000).contains(&low) {
                    let combined = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                    return char::from_u32(combined);
                }
            }
            self.pos = saved;
        }

        Some(char::from_u32(unit).unwrap_or('\u{FFFD}'))
    }

    fn scan_hex_digits(&mut self, len: usize) -> Option<u32> {
        let mut value = 0u32;
        for _ in 0..len {
            let digit = (self.current() as char).to_digit(16)?;
            value = value * 16 + digit;
            self.advance();
        }
        Some(value)
    }

    /// Scan template text up to the closing backtick or the next `${`.
    /// The raw source text is kept.
    fn scan_template_part(&mut self, head: bool) -> TokenKind {
        let start = self.pos;
        while !self.is_eof() {
            match self.current() {
                b'`' => {
                    let raw = self.slice(start, self.pos).to_string();
                    self.advance();
                    return if head {
                        TokenKind::TemplateNoSub(raw)
                    } else {
                        TokenKind::TemplateTail(raw)
                    };
                }
                b'$' if self.peek_char() == b'{' => {
                    let raw = self.slice(start, self.pos).to_string();
                    self.advance_n(2);
                    return if head {
                        TokenKind::TemplateHead(raw)
                    } else {
                        TokenKind::TemplateMiddle(raw)
                    };
                }
                b'\\' => {
                    self.advance();
                    if !self.is_eof() {
                        self.advance_char();
                    }
                }
                _ => self.advance_char(),
            }
        }
        TokenKind::Invalid("unterminated template literal")
    }

    fn scan_regex(&mut self) -> TokenKind {
        self.advance();
        let pattern_start = self.pos;

        let mut in_class = false;
        loop {
            if self.is_eof() {
                return TokenKind::Invalid("unterminated regular expression");
            }
            match self.current() {
                b'/' if !in_class => break,
                b'[' => {
                    in_class = true;
                    self.advance();
                }
                b']' => {
                    in_class = false;
                    self.advance();
                }
                b'\\' => {
                    self.advance();
                    if matches!(self.current(), b'\n' | b'\r') {
                        return TokenKind::Invalid("unterminated regular expression");
                    }
                    if !self.is_eof() {
                        self.advance_char();
                    }
                }
                b'\n' | b'\r' => return TokenKind::Invalid("unterminated regular expression"),
                _ => self.advance_char(),
            }
        }

        let pattern = self.slice(pattern_start, self.pos).to_string();
        self.advance();

        let flags_start = self.pos;
        while self.current().is_ascii_alphanumeric() {
            self.advance();
        }
        let flags = self.slice(flags_start, self.pos).to_string();

        TokenKind::Regex { pattern, flags }
    }

    // === Multi-character operators ===

    fn scan_dot(&mut self) -> TokenKind {
        if self.peek_char().is_ascii_digit() {
            return self.scan_fraction();
        }
        self.advance();
        if self.current() == b'.' && self.peek_char() == b'.' {
            self.advance_n(2);
            TokenKind::Spread
        } else {
            TokenKind::Dot
        }
    }

    fn scan_question(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'?' => {
                self.advance();
                if self.current() == b'=' {
                    self.advance();
                    TokenKind::QuestionQuestionEq
                } else {
                    TokenKind::QuestionQuestion
                }
            }
            // `a?.5:b` is a conditional, not an optional chain.
            b'.' if !self.peek_char().is_ascii_digit() => {
                self.advance();
                TokenKind::QuestionDot
            }
            _ => TokenKind::Question,
        }
    }

    fn scan_plus(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'+' => self.single(TokenKind::PlusPlus),
            b'=' => self.single(TokenKind::PlusEq),
            _ => TokenKind::Plus,
        }
    }

    fn scan_minus(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'-' => self.single(TokenKind::MinusMinus),
            b'=' => self.single(TokenKind::MinusEq),
            _ => TokenKind::Minus,
        }
    }

    fn scan_star(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'*' => {
                self.advance();
                if self.current() == b'=' {
                    self.single(TokenKind::StarStarEq)
                } else {
                    TokenKind::StarStar
                }
            }
            b'=' => self.single(TokenKind::StarEq),
            _ => TokenKind::Star,
        }
    }

    fn scan_slash(&mut self) -> TokenKind {
        self.advance();
        if self.current() == b'=' {
            self.single(TokenKind::SlashEq)
        } else {
            TokenKind::Slash
        }
    }

    fn scan_percent(&mut self) -> TokenKind {
        self.advance();
        if self.current() == b'=' {
            self.single(TokenKind::PercentEq)
        } else {
            TokenKind::Percent
        }
    }

    fn scan_equals(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'=' => {
                self.advance();
                if self.current() == b'=' {
                    self.single(TokenKind::EqEqEq)
                } else {
                    TokenKind::EqEq
                }
            }
            b'>' => self.single(TokenKind::Arrow),
            _ => TokenKind::Eq,
        }
    }

    fn scan_bang(&mut self) -> TokenKind {
        self.advance();
        if self.current() != b'=' {
            return TokenKind::Bang;
        }
        self.advance();
        if self.current() == b'=' {
            self.single(TokenKind::BangEqEq)
        } else {
            TokenKind::BangEq
        }
    }

    fn scan_less_than(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'<' => {
                self.advance();
                if self.current() == b'=' {
                    self.single(TokenKind::LtLtEq)
                } else {
                    TokenKind::LtLt
                }
            }
            b'=' => self.single(TokenKind::LtEq),
            _ => TokenKind::Lt,
        }
    }

    fn scan_greater_than(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'>' => {
                self.advance();
                match self.current() {
                    b'>' => {
                        self.advance();
                        if self.current() == b'=' {
                            self.single(TokenKind::GtGtGtEq)
                        } else {
                            TokenKind::GtGtGt
                        }
                    }
                    b'=' => self.single(TokenKind::GtGtEq),
                    _ => TokenKind::GtGt,
                }
            }
            b'=' => self.single(TokenKind::GtEq),
            _ => TokenKind::Gt,
        }
    }

    fn scan_ampersand(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'&' => {
                self.advance();
                if self.current() == b'=' {
                    self.single(TokenKind::AmpAmpEq)
                } else {
                    TokenKind::AmpAmp
                }
            }
            b'=' => self.single(TokenKind::AmpEq),
            _ => TokenKind::Amp,
        }
    }

    fn scan_pipe(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'|' => {
                self.advance();
                if self.current() == b'=' {
                    self.single(TokenKind::PipePipeEq)
                } else {
                    TokenKind::PipePipe
                }
            }
            b'=' => self.single(TokenKind::PipeEq),
            _ => TokenKind::Pipe,
        }
    }

    fn scan_caret(&mut self) -> TokenKind {
        self.advance();
        if self.current() == b'=' {
            self.single(TokenKind::CaretEq)
        } else {
            TokenKind::Caret
        }
    }
}

fn is_id_start(c: char) -> bool {
    c == '$' || c == '_' || c.is_alphabetic()
}

fn is_id_continue(c: char) -> bool {
    c == '$' || c == '_' || c == '\u{200C}' || c == '\u{200D}' || c.is_alphanumeric()
}

fn is_unicode_space(c: char) -> bool {
    matches!(
        c,
        '\u{A0}' | '\u{FEFF}' | '\u{1680}' | '\u{2000}'..='\u{200A}' | '\u{202F}' | '\u{205F}' | '\u{3000}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(source: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            if matches!(token.kind, TokenKind::Eof) {
                break;
            }
            tokens.push(token.kind);
        }
        tokens
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(
            tokenize("foo bar _baz $qux café"),
            vec![
                TokenKind::Identifier("foo".into()),
                TokenKind::Identifier("bar".into()),
                TokenKind::Identifier("_baz".into()),
                TokenKind::Identifier("$qux".into()),
                TokenKind::Identifier("café".into()),
            ]
        );
    }

    #[test]
    fn test_escaped_identifier() {
        assert_eq!(
            tokenize(r"\u0061b"),
            vec![TokenKind::Identifier("ab".into())]
        );
    }

    #[test]
    fn test_keywords_and_contextual_words() {
        assert_eq!(
            tokenize("const let var function async of"),
            vec![
                TokenKind::Const,
                TokenKind::Identifier("let".into()),
                TokenKind::Var,
                TokenKind::Function,
                TokenKind::Identifier("async".into()),
                TokenKind::Identifier("of".into()),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            tokenize("42 3.14 0xff 0b101 0o77 .5 1e3 1_000 017 1."),
            vec![
                TokenKind::Number(42.0),
                TokenKind::Number(3.14),
                TokenKind::Number(255.0),
                TokenKind::Number(5.0),
                TokenKind::Number(63.0),
                TokenKind::Number(0.5),
                TokenKind::Number(1000.0),
                TokenKind::Number(1000.0),
                TokenKind::Number(15.0),
                TokenKind::Number(1.0),
            ]
        );
    }

    #[test]
    fn test_member_on_number() {
        assert_eq!(
            tokenize("1..toString"),
            vec![
                TokenKind::Number(1.0),
                TokenKind::Dot,
                TokenKind::Identifier("toString".into()),
            ]
        );
    }

    #[test]
    fn test_bigint() {
        assert_eq!(
            tokenize("10n 0xffn"),
            vec![
                TokenKind::BigInt("10".into()),
                TokenKind::BigInt("0xff".into()),
            ]
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            tokenize(r#""hello" 'wörld' "a\nb" "\x41B\u{43}""#),
            vec![
                TokenKind::String("hello".into()),
                TokenKind::String("wörld".into()),
                TokenKind::String("a\nb".into()),
                TokenKind::String("ABC".into()),
            ]
        );
    }

    #[test]
    fn test_surrogate_pair_escape() {
        assert_eq!(
            tokenize(r#""\ud83d\ude00""#),
            vec![TokenKind::String("\u{1F600}".into())]
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert!(matches!(
            tokenize("\"abc")[0],
            TokenKind::Invalid(_)
        ));
    }

    #[test]
    fn test_slash_is_division_by_default() {
        assert_eq!(
            tokenize("a / b"),
            vec![
                TokenKind::Identifier("a".into()),
                TokenKind::Slash,
                TokenKind::Identifier("b".into()),
            ]
        );
    }

    #[test]
    fn test_rescan_regex() {
        let mut lexer = Lexer::new("/a[/]b/gi.test");
        let slash = lexer.next_token();
        assert_eq!(slash.kind, TokenKind::Slash);
        let regex = lexer.rescan_regex(slash.span.start as usize, false);
        assert_eq!(
            regex.kind,
            TokenKind::Regex {
                pattern: "a[/]b".into(),
                flags: "gi".into()
            }
        );
        assert_eq!(lexer.next_token().kind, TokenKind::Dot);
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            tokenize("?. ?? ??= **= >>>= &&= ||="),
            vec![
                TokenKind::QuestionDot,
                TokenKind::QuestionQuestion,
                TokenKind::QuestionQuestionEq,
                TokenKind::StarStarEq,
                TokenKind::GtGtGtEq,
                TokenKind::AmpAmpEq,
                TokenKind::PipePipeEq,
            ]
        );
    }

    #[test]
    fn test_conditional_with_fraction() {
        assert_eq!(
            tokenize("a?.5:b"),
            vec![
                TokenKind::Identifier("a".into()),
                TokenKind::Question,
                TokenKind::Number(0.5),
                TokenKind::Colon,
                TokenKind::Identifier("b".into()),
            ]
        );
    }

    #[test]
    fn test_comments_and_newlines() {
        let mut lexer = Lexer::new("a // line\nb /* x\n */ c /* d */ e");
        assert!(!lexer.next_token().had_newline_before);
        assert!(lexer.next_token().had_newline_before);
        assert!(lexer.next_token().had_newline_before);
        assert!(!lexer.next_token().had_newline_before);
    }

    #[test]
    fn test_hashbang() {
        assert_eq!(
            tokenize("#!/usr/bin/env node\nx"),
            vec![TokenKind::Identifier("x".into())]
        );
    }

    #[test]
    fn test_template_parts() {
        let mut lexer = Lexer::new("`a${b}c\\n`");
        assert_eq!(lexer.next_token().kind, TokenKind::TemplateHead("a".into()));
        assert_eq!(lexer.next_token().kind, TokenKind::Identifier("b".into()));
        assert_eq!(lexer.next_token().kind, TokenKind::RBrace);
        assert_eq!(
            lexer.scan_template_continuation().kind,
            TokenKind::TemplateTail("c\\n".into())
        );
    }

    #[test]
    fn test_private_name() {
        assert_eq!(
            tokenize("#x"),
            vec![TokenKind::PrivateName("x".into())]
        );
    }
}
