use ngrx_gen_common::Span;

/// A type annotation, kept as source text plus the little structure the
/// extractor needs (e.g. `'[Truck] Load'`, `Truck[]`, `Partial<Item>`).
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAnnotation {
    pub kind: TypeKind,
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// String literal type: `'[Truck] Load'` (or a backtick literal without
    /// substitutions). Holds the unquoted value.
    StringLiteral(String),

    /// Anything else: references, unions, object types, functions, ...
    Other,
}

impl TypeAnnotation {
    /// The unquoted value when this is a string literal type.
    pub fn string_literal(&self) -> Option<&str> {
        match &self.kind {
            TypeKind::StringLiteral(value) => Some(value),
            _ => None,
        }
    }
}

/// A class property initializer: `= '[Truck] Load'`.
#[derive(Debug, Clone, PartialEq)]
pub struct Initializer {
    /// The unquoted value when the initializer is a single string literal.
    pub literal: Option<String>,
    pub text: String,
    pub span: Span,
}
