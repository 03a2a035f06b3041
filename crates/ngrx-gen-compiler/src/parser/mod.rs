mod declarations;
mod members;

use ngrx_gen_common::{DiagnosticBag, Position, Span};

use crate::ast::*;
use crate::lexer::token::{Token, TokenKind};

/// Recursive descent parser for the top level of a TypeScript file.
///
/// Class, interface and type alias declarations are parsed down to their
/// members; every other statement is skipped with balanced-delimiter
/// tracking and recorded only by its span. Nothing below the top level is
/// interpreted.
pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    diagnostics: DiagnosticBag,
}

impl<'src> Parser<'src> {
    /// `tokens` must come from lexing `source`; spans are used to slice it.
    pub fn new(source: &'src str, mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let end = Position {
                offset: source.len() as u32,
                ..Position::START
            };
            tokens.push(Token::eof(Span::new("", end, end)));
        }
        Self {
            source,
            tokens,
            pos: 0,
            diagnostics: DiagnosticBag::new(),
        }
    }

    /// Parse the entire token stream into a SourceFile.
    pub fn parse(mut self) -> (SourceFile, DiagnosticBag) {
        let file_name = self.current().span.file.clone();
        let start = self.current_span();
        let mut statements = Vec::new();

        while !self.is_at_end() {
            match self.parse_statement() {
                Some(stmt) => statements.push(stmt),
                None => {
                    // Error recovery: skip the rest of the broken statement
                    self.synchronize();
                }
            }
        }

        let span = start.merge(&self.current_span());
        let file = SourceFile {
            file_name,
            statements,
            span,
        };
        (file, self.diagnostics)
    }

    // ========================================================================
    // Token manipulation helpers
    // ========================================================================

    fn peek(&self) -> TokenKind {
        self.peek_at(0)
    }

    /// Peek at a token kind N positions ahead.
    fn peek_at(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    /// Lexeme of the current token.
    fn peek_lexeme(&self) -> &str {
        &self.current().lexeme
    }

    fn current(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    /// The token just consumed.
    fn previous(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1)]
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        self.previous()
    }

    /// Consume a token of the expected kind, or report an error.
    fn expect(&mut self, kind: TokenKind) -> Option<&Token> {
        if self.peek() == kind {
            self.advance();
            Some(self.previous())
        } else {
            let span = self.current_span();
            let message = format!("expected {:?}, found {}", kind, self.describe_current());
            self.diagnostics.error(message, span);
            None
        }
    }

    /// Consume if the current token matches, otherwise do nothing.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn is_at_end(&self) -> bool {
        self.peek() == TokenKind::Eof
    }

    fn current_span(&self) -> Span {
        self.current().span.clone()
    }

    fn previous_span(&self) -> Span {
        self.previous().span.clone()
    }

    /// Human-readable description of the current token for error messages.
    fn describe_current(&self) -> String {
        match self.peek() {
            TokenKind::Eof => "end of file".to_string(),
            TokenKind::StringLiteral => "string literal".to_string(),
            _ => format!("'{}'", self.peek_lexeme()),
        }
    }

    /// Source text from the start of `start` to the end of `end`.
    fn source_text(&self, start: &Span, end: &Span) -> &'src str {
        let range = start.start.offset as usize..end.end.offset as usize;
        self.source.get(range).unwrap_or_default()
    }

    // ========================================================================
    // Statement boundaries
    // ========================================================================

    /// True when a line break separates the previous token from the current
    /// one and neither side can continue an expression or type, i.e. where
    /// automatic semicolon insertion would end the statement.
    fn at_implicit_semicolon(&self) -> bool {
        if self.pos == 0 || self.is_at_end() {
            return false;
        }
        let prev = self.previous();
        let cur = self.current();
        cur.span.start.line > prev.span.end.line
            && !prev.kind.continues_expression()
            && !(cur.kind.continues_expression() && cur.kind != TokenKind::At)
    }

    /// True when the current token can begin a top-level statement.
    fn at_statement_start(&self) -> bool {
        match self.peek() {
            TokenKind::Export
            | TokenKind::Import
            | TokenKind::Class
            | TokenKind::Interface
            | TokenKind::Declare
            | TokenKind::Abstract
            | TokenKind::Const
            | TokenKind::Let
            | TokenKind::Var
            | TokenKind::Function
            | TokenKind::Enum
            | TokenKind::Namespace
            | TokenKind::At => true,
            TokenKind::Type => self.peek_at(1).is_identifier_like(),
            _ => false,
        }
    }

    /// Consume one statement that is not interpreted: up to a `;` at depth
    /// zero, or up to the next statement start after a line break or a
    /// closing brace. Always consumes at least one token.
    fn skip_statement(&mut self) {
        let start_pos = self.pos;
        let mut depth: u32 = 0;
        while !self.is_at_end() {
            if depth == 0 && self.pos > start_pos && self.at_statement_start() {
                let after_block = self.previous().kind == TokenKind::RightBrace;
                if after_block || self.at_implicit_semicolon() {
                    return;
                }
            }
            match self.peek() {
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => {
                    depth += 1
                }
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                    if depth == 0 {
                        let span = self.current_span();
                        let message = format!("unexpected {}", self.describe_current());
                        self.diagnostics.error(message, span);
                        self.advance();
                        return;
                    }
                    depth -= 1;
                }
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    return;
                }
                _ => {}
            }
            self.advance();
        }
    }

    /// Error recovery after a failed declaration.
    fn synchronize(&mut self) {
        self.skip_statement();
    }

    /// Consume a bracketed group starting at the current opener, through its
    /// matching closer.
    fn skip_balanced(&mut self) -> Option<()> {
        let open = self.current_span();
        let mut depth: u32 = 0;
        loop {
            match self.peek() {
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => {
                    depth += 1
                }
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.advance();
                        return Some(());
                    }
                }
                TokenKind::Eof => {
                    self.diagnostics.error("unclosed delimiter", open);
                    return None;
                }
                _ => {}
            }
            self.advance();
        }
    }

    /// Consume `<...>` type parameters or arguments, through the matching `>`.
    fn skip_angle_group(&mut self) -> Option<()> {
        let open = self.current_span();
        let mut angle: u32 = 0;
        loop {
            match self.peek() {
                TokenKind::Less => angle += 1,
                TokenKind::Greater => {
                    angle = angle.saturating_sub(1);
                    if angle == 0 {
                        self.advance();
                        return Some(());
                    }
                }
                TokenKind::Eof => {
                    self.diagnostics.error("unclosed '<'", open);
                    return None;
                }
                _ => {}
            }
            self.advance();
        }
    }
}
