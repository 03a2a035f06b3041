use ngrx_gen_common::Span;
use std::fmt;

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Identifier text, or the unescaped value of a string literal.
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    pub fn eof(span: Span) -> Self {
        Self {
            kind: TokenKind::Eof,
            lexeme: String::new(),
            span,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.kind, self.lexeme)
    }
}

/// Token kinds of the TypeScript subset needed to find top-level declarations.
///
/// Keywords are contextual in TypeScript, so every keyword can also be used as
/// a property name; see [`TokenKind::is_identifier_like`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // === Literals ===
    StringLiteral,
    TemplateLiteral,
    NumberLiteral,
    RegexLiteral,

    // === Identifiers ===
    Identifier,
    /// `#name` private class member.
    PrivateName,

    // === Keywords ===
    Abstract,
    Class,
    Const,
    Constructor,
    Declare,
    Default,
    Enum,
    Export,
    Extends,
    Function,
    Implements,
    Import,
    Interface,
    Let,
    Module,
    Namespace,
    Private,
    Protected,
    Public,
    Readonly,
    Static,
    Type,
    Var,

    // === Operators ===
    Plus,          // +
    Minus,         // -
    Star,          // *
    Slash,         // /
    Percent,       // %
    Caret,         // ^
    Tilde,         // ~
    Bang,          // !
    Equal,         // =
    EqualEqual,    // == and ===
    BangEqual,     // != and !==
    Less,          // <
    Greater,       // >
    Amp,           // &
    AmpAmp,        // &&
    Pipe,          // |
    PipePipe,      // ||
    Question,      // ?
    QuestionDot,   // ?.
    QuestionQuestion, // ??
    FatArrow,      // =>
    Dot,           // .
    DotDotDot,     // ...
    At,            // @
    /// Compound assignment and the remaining multi-character operators
    /// (`+=`, `<=`, `++`, `**`, ...). The parser never needs to tell them apart.
    OtherOperator,

    // === Delimiters ===
    LeftParen,     // (
    RightParen,    // )
    LeftBrace,     // {
    RightBrace,    // }
    LeftBracket,   // [
    RightBracket,  // ]
    Comma,         // ,
    Semicolon,     // ;
    Colon,         // :

    // === Special ===
    Eof,
}

impl TokenKind {
    /// Try to match an identifier string to a keyword.
    pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
        match s {
            "abstract" => Some(TokenKind::Abstract),
            "class" => Some(TokenKind::Class),
            "const" => Some(TokenKind::Const),
            "constructor" => Some(TokenKind::Constructor),
            "declare" => Some(TokenKind::Declare),
            "default" => Some(TokenKind::Default),
            "enum" => Some(TokenKind::Enum),
            "export" => Some(TokenKind::Export),
            "extends" => Some(TokenKind::Extends),
            "function" => Some(TokenKind::Function),
            "implements" => Some(TokenKind::Implements),
            "import" => Some(TokenKind::Import),
            "interface" => Some(TokenKind::Interface),
            "let" => Some(TokenKind::Let),
            "module" => Some(TokenKind::Module),
            "namespace" => Some(TokenKind::Namespace),
            "private" => Some(TokenKind::Private),
            "protected" => Some(TokenKind::Protected),
            "public" => Some(TokenKind::Public),
            "readonly" => Some(TokenKind::Readonly),
            "static" => Some(TokenKind::Static),
            "type" => Some(TokenKind::Type),
            "var" => Some(TokenKind::Var),
            _ => None,
        }
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Abstract
                | TokenKind::Class
                | TokenKind::Const
                | TokenKind::Constructor
                | TokenKind::Declare
                | TokenKind::Default
                | TokenKind::Enum
                | TokenKind::Export
                | TokenKind::Extends
                | TokenKind::Function
                | TokenKind::Implements
                | TokenKind::Import
                | TokenKind::Interface
                | TokenKind::Let
                | TokenKind::Module
                | TokenKind::Namespace
                | TokenKind::Private
                | TokenKind::Protected
                | TokenKind::Public
                | TokenKind::Readonly
                | TokenKind::Static
                | TokenKind::Type
                | TokenKind::Var
        )
    }

    /// True for tokens usable as a property or type name.
    pub fn is_identifier_like(self) -> bool {
        self == TokenKind::Identifier || self.is_keyword()
    }

    /// True for tokens after which an expression or type must continue, so a
    /// line break cannot end the statement.
    pub fn continues_expression(self) -> bool {
        matches!(
            self,
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Percent
                | TokenKind::Caret
                | TokenKind::Tilde
                | TokenKind::Bang
                | TokenKind::Equal
                | TokenKind::EqualEqual
                | TokenKind::BangEqual
                | TokenKind::Less
                | TokenKind::Amp
                | TokenKind::AmpAmp
                | TokenKind::Pipe
                | TokenKind::PipePipe
                | TokenKind::Question
                | TokenKind::QuestionDot
                | TokenKind::QuestionQuestion
                | TokenKind::FatArrow
                | TokenKind::Dot
                | TokenKind::DotDotDot
                | TokenKind::OtherOperator
                | TokenKind::Comma
                | TokenKind::Colon
                | TokenKind::At
                | TokenKind::Extends
        )
    }
}
