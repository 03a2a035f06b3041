pub mod config;
pub mod errors;
pub mod span;

pub use config::{Config, ConfigError, FormatConfig, GenerateConfig, QuoteStyle};
pub use errors::{Diagnostic, DiagnosticBag, Severity};
pub use span::{Position, Span};
