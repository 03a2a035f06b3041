pub mod ast;
pub mod codegen;
pub mod error;
pub mod extract;
pub mod lexer;
pub mod parser;

use ngrx_gen_common::DiagnosticBag;

pub use error::{DiscriminantError, GenerateError};

/// Lex and parse `source` into a syntax tree.
///
/// Lexer and parser diagnostics are returned together, lexer first. The
/// tree is always produced; callers decide whether errors are fatal.
pub fn parse(source: &str, file_name: &str) -> (ast::SourceFile, DiagnosticBag) {
    let (tokens, mut diagnostics) = lexer::Lexer::new(source, file_name).tokenize();
    tracing::debug!(file = file_name, tokens = tokens.len(), "lexed");

    let (file, parse_diags) = parser::Parser::new(source, tokens).parse();
    diagnostics.extend(parse_diags);
    tracing::debug!(
        file = file_name,
        statements = file.statements.len(),
        errors = diagnostics.error_count(),
        "parsed"
    );
    (file, diagnostics)
}
