use ngrx_gen_common::{DiagnosticBag, Position};

use super::cursor::Cursor;
use super::token::{Token, TokenKind};

/// Hand-written lexer for the TypeScript subset used by action files.
///
/// Covers identifiers and contextual keywords, string and template literals
/// (including nested `${...}` substitutions), numbers, regular expression
/// literals, every operator and delimiter, and line/block comments.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    diagnostics: DiagnosticBag,
    /// Kind of the last emitted token, used to tell `/` from a regex.
    last_kind: Option<TokenKind>,
    /// The last token was a word such as `return` that precedes an operand.
    after_operator_word: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str, file: impl Into<String>) -> Self {
        Self {
            cursor: Cursor::new(source, file),
            diagnostics: DiagnosticBag::new(),
            last_kind: None,
            after_operator_word: false,
        }
    }

    /// Tokenize the entire source, returning all tokens and diagnostics.
    pub fn tokenize(mut self) -> (Vec<Token>, DiagnosticBag) {
        self.skip_shebang();
        let mut tokens = Vec::new();
        loop {
            let Some(token) = self.next_token() else {
                continue;
            };
            let is_eof = token.kind == TokenKind::Eof;
            self.last_kind = Some(token.kind);
            self.after_operator_word =
                token.kind == TokenKind::Identifier && is_operator_word(&token.lexeme);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        (tokens, self.diagnostics)
    }

    /// Scan the next token. `None` means an invalid character was reported
    /// and skipped.
    fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace_and_comments();

        if self.cursor.is_eof() {
            let pos = self.cursor.position();
            return Some(Token::eof(self.cursor.span_from(pos)));
        }

        let start = self.cursor.position();
        let ch = self.cursor.advance()?;

        let token = match ch {
            // === Delimiters ===
            '(' => self.make_token(TokenKind::LeftParen, start),
            ')' => self.make_token(TokenKind::RightParen, start),
            '{' => self.make_token(TokenKind::LeftBrace, start),
            '}' => self.make_token(TokenKind::RightBrace, start),
            '[' => self.make_token(TokenKind::LeftBracket, start),
            ']' => self.make_token(TokenKind::RightBracket, start),
            ',' => self.make_token(TokenKind::Comma, start),
            ';' => self.make_token(TokenKind::Semicolon, start),
            ':' => self.make_token(TokenKind::Colon, start),
            '@' => self.make_token(TokenKind::At, start),
            '~' => self.make_token(TokenKind::Tilde, start),

            // === Operators (longest match) ===
            '=' => {
                if self.cursor.eat('=') {
                    self.cursor.eat('=');
                    self.make_token(TokenKind::EqualEqual, start)
                } else if self.cursor.eat('>') {
                    self.make_token(TokenKind::FatArrow, start)
                } else {
                    self.make_token(TokenKind::Equal, start)
                }
            }
            '!' => {
                if self.cursor.eat('=') {
                    self.cursor.eat('=');
                    self.make_token(TokenKind::BangEqual, start)
                } else {
                    self.make_token(TokenKind::Bang, start)
                }
            }
            '<' => {
                if self.cursor.eat_str("<=") || self.cursor.eat('<') || self.cursor.eat('=') {
                    self.make_token(TokenKind::OtherOperator, start)
                } else {
                    self.make_token(TokenKind::Less, start)
                }
            }
            // `>` is never combined so nested type arguments (`A<B<C>>`)
            // close one level per token.
            '>' => self.make_token(TokenKind::Greater, start),
            '&' => {
                if self.cursor.eat_str("&=") || self.cursor.eat('=') {
                    self.make_token(TokenKind::OtherOperator, start)
                } else if self.cursor.eat('&') {
                    self.make_token(TokenKind::AmpAmp, start)
                } else {
                    self.make_token(TokenKind::Amp, start)
                }
            }
            '|' => {
                if self.cursor.eat_str("|=") || self.cursor.eat('=') {
                    self.make_token(TokenKind::OtherOperator, start)
                } else if self.cursor.eat('|') {
                    self.make_token(TokenKind::PipePipe, start)
                } else {
                    self.make_token(TokenKind::Pipe, start)
                }
            }
            '?' => {
                if self.cursor.eat_str("?=") {
                    self.make_token(TokenKind::OtherOperator, start)
                } else if self.cursor.eat('?') {
                    self.make_token(TokenKind::QuestionQuestion, start)
                } else if self.cursor.peek() == Some('.')
                    && !self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit())
                {
                    self.cursor.advance();
                    self.make_token(TokenKind::QuestionDot, start)
                } else {
                    self.make_token(TokenKind::Question, start)
                }
            }
            '.' => {
                if self.cursor.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.scan_number(start)
                } else if self.cursor.eat_str("..") {
                    self.make_token(TokenKind::DotDotDot, start)
                } else {
                    self.make_token(TokenKind::Dot, start)
                }
            }
            '+' => self.arithmetic(TokenKind::Plus, '+', start),
            '-' => self.arithmetic(TokenKind::Minus, '-', start),
            '*' => {
                if self.cursor.eat_str("*=") || self.cursor.eat('*') || self.cursor.eat('=') {
                    self.make_token(TokenKind::OtherOperator, start)
                } else {
                    self.make_token(TokenKind::Star, start)
                }
            }
            '%' => self.compound(TokenKind::Percent, start),
            '^' => self.compound(TokenKind::Caret, start),
            '/' => {
                if self.regex_allowed() {
                    self.scan_regex(start)
                } else {
                    self.compound(TokenKind::Slash, start)
                }
            }

            // === Literals ===
            '\'' | '"' => self.scan_string(start, ch),
            '`' => self.scan_template(start),
            c if c.is_ascii_digit() => self.scan_number(start),

            // === Identifiers and keywords ===
            '#' if self.cursor.peek().is_some_and(is_ident_start) => {
                self.cursor.eat_while(is_ident_continue);
                let text = self.cursor.slice_from(start.offset);
                Token::new(TokenKind::PrivateName, text, self.cursor.span_from(start))
            }
            c if is_ident_start(c) => self.scan_identifier(start),

            _ => {
                let span = self.cursor.span_from(start);
                self.diagnostics
                    .error(format!("unexpected character '{}'", ch), span);
                return None;
            }
        };
        Some(token)
    }

    // ---------------------------------------------------------------
    // Whitespace & comments
    // ---------------------------------------------------------------

    fn skip_shebang(&mut self) {
        if self.cursor.eat_str("#!") {
            self.cursor.eat_while(|c| c != '\n');
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            // TypeScript also treats the BOM and NBSP as whitespace.
            self.cursor
                .eat_while(|c| c.is_whitespace() || c == '\u{feff}');

            if self.cursor.peek() == Some('/') {
                match self.cursor.peek_nth(1) {
                    Some('/') => {
                        self.cursor.eat_while(|c| c != '\n');
                        continue;
                    }
                    Some('*') => {
                        let start = self.cursor.position();
                        self.cursor.advance(); // /
                        self.cursor.advance(); // *
                        self.skip_block_comment(start);
                        continue;
                    }
                    _ => {}
                }
            }

            break;
        }
    }

    /// Block comments do not nest in TypeScript.
    fn skip_block_comment(&mut self, start: Position) {
        loop {
            match self.cursor.advance() {
                Some('*') if self.cursor.peek() == Some('/') => {
                    self.cursor.advance();
                    return;
                }
                Some(_) => {}
                None => {
                    let span = self.cursor.span_from(start);
                    self.diagnostics.error("unterminated block comment", span);
                    return;
                }
            }
        }
    }

    // ---------------------------------------------------------------
    // String scanning
    // ---------------------------------------------------------------

    /// Scan a `'...'` or `"..."` literal; the lexeme is the unescaped value.
    fn scan_string(&mut self, start: Position, quote: char) -> Token {
        let mut value = String::new();

        loop {
            match self.cursor.peek() {
                Some(c) if c == quote => {
                    self.cursor.advance();
                    break;
                }
                Some('\n') | None => {
                    let span = self.cursor.span_from(start);
                    self.diagnostics
                        .error("unterminated string literal", span.clone());
                    return Token::new(TokenKind::StringLiteral, value, span);
                }
                Some('\\') => {
                    self.cursor.advance();
                    self.scan_escape(&mut value, start);
                }
                Some(c) => {
                    self.cursor.advance();
                    value.push(c);
                }
            }
        }

        Token::new(TokenKind::StringLiteral, value, self.cursor.span_from(start))
    }

    /// Decode one escape sequence after the backslash.
    fn scan_escape(&mut self, value: &mut String, string_start: Position) {
        match self.cursor.advance() {
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some('r') => value.push('\r'),
            Some('b') => value.push('\u{8}'),
            Some('f') => value.push('\u{c}'),
            Some('v') => value.push('\u{b}'),
            Some('0') => value.push('\0'),
            // Line continuation.
            Some('\n') => {}
            Some('\r') => {
                self.cursor.eat('\n');
            }
            Some('x') => self.scan_hex_escape(value, 2, string_start),
            Some('u') => {
                if self.cursor.eat('{') {
                    let digits_start = self.cursor.position().offset;
                    self.cursor.eat_while(|c| c.is_ascii_hexdigit());
                    let digits = self.cursor.slice_from(digits_start);
                    let closed = self.cursor.eat('}');
                    match u32::from_str_radix(digits, 16).ok().and_then(char::from_u32) {
                        Some(c) if closed => value.push(c),
                        _ => {
                            let span = self.cursor.span_from(string_start);
                            self.diagnostics.error("invalid unicode escape", span);
                        }
                    }
                } else {
                    self.scan_hex_escape(value, 4, string_start);
                }
            }
            // Any other escaped character stands for itself.
            Some(c) => value.push(c),
            None => {}
        }
    }

    fn scan_hex_escape(&mut self, value: &mut String, digits: usize, string_start: Position) {
        let digits_start = self.cursor.position().offset;
        for _ in 0..digits {
            if self.cursor.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.cursor.advance();
            }
        }
        let text = self.cursor.slice_from(digits_start);
        match u32::from_str_radix(text, 16).ok().and_then(char::from_u32) {
            Some(c) if text.len() == digits => value.push(c),
            _ => {
                let span = self.cursor.span_from(string_start);
                self.diagnostics.error("invalid hexadecimal escape", span);
            }
        }
    }

    /// Scan a template literal after the opening backtick. The lexeme is the
    /// raw text between the backticks, substitutions included.
    fn scan_template(&mut self, start: Position) -> Token {
        let content_start = self.cursor.position().offset;
        if !self.skip_template_body() {
            let span = self.cursor.span_from(start);
            self.diagnostics
                .error("unterminated template literal", span.clone());
            let raw = self.cursor.slice_from(content_start);
            return Token::new(TokenKind::TemplateLiteral, raw, span);
        }
        // Exclude the closing backtick.
        let end = self.cursor.position().offset - 1;
        let raw = self.cursor.slice(content_start, end);
        Token::new(TokenKind::TemplateLiteral, raw, self.cursor.span_from(start))
    }

    /// Consume template text up to and including the closing backtick.
    /// Returns false at end of input.
    fn skip_template_body(&mut self) -> bool {
        loop {
            match self.cursor.advance() {
                Some('`') => return true,
                Some('\\') => {
                    self.cursor.advance();
                }
                Some('$') if self.cursor.peek() == Some('{') => {
                    self.cursor.advance();
                    if !self.skip_substitution() {
                        return false;
                    }
                }
                Some(_) => {}
                None => return false,
            }
        }
    }

    /// Consume a `${ ... }` substitution body, including nested literals.
    fn skip_substitution(&mut self) -> bool {
        let mut depth: u32 = 0;
        loop {
            match self.cursor.advance() {
                Some('{') => depth += 1,
                Some('}') if depth == 0 => return true,
                Some('}') => depth -= 1,
                Some(quote @ ('\'' | '"')) => loop {
                    match self.cursor.advance() {
                        Some('\\') => {
                            self.cursor.advance();
                        }
                        Some(c) if c == quote => break,
                        Some(_) => {}
                        None => return false,
                    }
                },
                Some('`') => {
                    if !self.skip_template_body() {
                        return false;
                    }
                }
                Some(_) => {}
                None => return false,
            }
        }
    }

    // ---------------------------------------------------------------
    // Regular expressions
    // ---------------------------------------------------------------

    /// A `/` starts a regex unless it follows something that ends an operand.
    fn regex_allowed(&self) -> bool {
        if self.after_operator_word {
            return true;
        }
        !matches!(
            self.last_kind,
            Some(
                TokenKind::Identifier
                    | TokenKind::PrivateName
                    | TokenKind::StringLiteral
                    | TokenKind::TemplateLiteral
                    | TokenKind::NumberLiteral
                    | TokenKind::RegexLiteral
                    | TokenKind::RightParen
                    | TokenKind::RightBracket
                    | TokenKind::RightBrace
            )
        )
    }

    fn scan_regex(&mut self, start: Position) -> Token {
        let mut in_class = false;
        loop {
            match self.cursor.peek() {
                Some('\n') | None => {
                    let span = self.cursor.span_from(start);
                    self.diagnostics
                        .error("unterminated regular expression literal", span.clone());
                    let text = self.cursor.slice_from(start.offset);
                    return Token::new(TokenKind::RegexLiteral, text, span);
                }
                Some('\\') => {
                    self.cursor.advance();
                    if self.cursor.peek() != Some('\n') {
                        self.cursor.advance();
                    }
                }
                Some('[') => {
                    in_class = true;
                    self.cursor.advance();
                }
                Some(']') => {
                    in_class = false;
                    self.cursor.advance();
                }
                Some('/') if !in_class => {
                    self.cursor.advance();
                    break;
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
        // Flags.
        self.cursor.eat_while(is_ident_continue);
        let text = self.cursor.slice_from(start.offset);
        Token::new(TokenKind::RegexLiteral, text, self.cursor.span_from(start))
    }

    // ---------------------------------------------------------------
    // Numbers, identifiers, operators
    // ---------------------------------------------------------------

    /// Numbers are not evaluated; hex, binary, octal, separators, exponents
    /// and bigint suffixes are all consumed as one lexeme.
    fn scan_number(&mut self, start: Position) -> Token {
        loop {
            self.cursor
                .eat_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
            // Signed exponent: `1e-7`.
            let text = self.cursor.slice_from(start.offset);
            let is_hex = text.starts_with("0x") || text.starts_with("0X");
            if !is_hex
                && (text.ends_with('e') || text.ends_with('E'))
                && matches!(self.cursor.peek(), Some('+' | '-'))
            {
                self.cursor.advance();
                continue;
            }
            break;
        }
        let text = self.cursor.slice_from(start.offset);
        Token::new(TokenKind::NumberLiteral, text, self.cursor.span_from(start))
    }

    fn scan_identifier(&mut self, start: Position) -> Token {
        self.cursor.eat_while(is_ident_continue);
        let text = self.cursor.slice_from(start.offset);
        let kind = TokenKind::keyword_from_str(text).unwrap_or(TokenKind::Identifier);
        Token::new(kind, text, self.cursor.span_from(start))
    }

    /// `+`, `++`, `+=` (and the same for `-`).
    fn arithmetic(&mut self, single: TokenKind, ch: char, start: Position) -> Token {
        if self.cursor.eat(ch) || self.cursor.eat('=') {
            self.make_token(TokenKind::OtherOperator, start)
        } else {
            self.make_token(single, start)
        }
    }

    /// An operator that may be followed by `=` for compound assignment.
    fn compound(&mut self, single: TokenKind, start: Position) -> Token {
        if self.cursor.eat('=') {
            self.make_token(TokenKind::OtherOperator, start)
        } else {
            self.make_token(single, start)
        }
    }

    fn make_token(&self, kind: TokenKind, start: Position) -> Token {
        let lexeme = self.cursor.slice_from(start.offset);
        Token::new(kind, lexeme, self.cursor.span_from(start))
    }
}

/// Words after which an expression starts.
fn is_operator_word(word: &str) -> bool {
    matches!(
        word,
        "return"
            | "typeof"
            | "instanceof"
            | "in"
            | "of"
            | "new"
            | "delete"
            | "void"
            | "throw"
            | "case"
            | "do"
            | "else"
            | "yield"
            | "await"
    )
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
