use std::path::{Path, PathBuf};

use serde::Deserialize;

/// File name looked up next to (or above) the source file.
pub const CONFIG_FILE_NAME: &str = "ngrx-gen.toml";

/// The parsed `ngrx-gen.toml`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub generate: GenerateConfig,
    pub format: FormatConfig,
    /// Directory containing the config file, `None` for built-in defaults.
    pub root_dir: Option<PathBuf>,
}

/// `[generate]`: naming conventions of the extracted and generated code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateConfig {
    /// Heritage reference that marks a declaration as an action.
    pub marker: String,
    /// Appended to the PascalCase category to name the union alias.
    pub alias_suffix: String,
    /// Inserted between the base name and extension of generated files.
    pub output_suffix: String,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            marker: "Action".to_string(),
            alias_suffix: "Actions".to_string(),
            output_suffix: "generated".to_string(),
        }
    }
}

/// `[format]`: printer settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatConfig {
    pub quote: QuoteStyle,
    pub semicolons: bool,
    /// Statements longer than this are broken one item per line.
    pub line_width: Option<usize>,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            quote: QuoteStyle::Single,
            semicolons: true,
            line_width: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    #[default]
    Single,
    Double,
}

impl QuoteStyle {
    pub fn as_char(self) -> char {
        match self {
            QuoteStyle::Single => '\'',
            QuoteStyle::Double => '"',
        }
    }
}

/// Raw TOML structure for deserialization.
#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    generate: GenerateConfig,
    format: FormatConfig,
}

/// Errors that can occur when loading a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no {CONFIG_FILE_NAME} found (searched from {0})")]
    NotFound(String),
    #[error("failed to read {CONFIG_FILE_NAME}: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("invalid {CONFIG_FILE_NAME}: {0}")]
    ParseError(String),
    #[error("invalid {CONFIG_FILE_NAME}: [generate] marker '{0}' is not a valid type reference")]
    InvalidMarker(String),
    #[error("invalid {CONFIG_FILE_NAME}: [generate] alias_suffix '{0}' must contain only identifier characters")]
    InvalidAliasSuffix(String),
    #[error("invalid {CONFIG_FILE_NAME}: [generate] output_suffix '{0}' must be a non-empty file name segment")]
    InvalidOutputSuffix(String),
    #[error("invalid {CONFIG_FILE_NAME}: [format] line_width must be greater than zero")]
    InvalidLineWidth,
}

/// Walk up from `start_dir` looking for the config file.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load and validate a config file from a path.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let root_dir = path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    tracing::debug!(path = %path.display(), "loading config");
    parse_config(&content, Some(root_dir))
}

/// Parse and validate a config from a string.
pub fn parse_config(content: &str, root_dir: Option<PathBuf>) -> Result<Config, ConfigError> {
    let raw: RawConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    validate_generate(&raw.generate)?;
    if raw.format.line_width == Some(0) {
        return Err(ConfigError::InvalidLineWidth);
    }

    Ok(Config {
        generate: raw.generate,
        format: raw.format,
        root_dir,
    })
}

/// Find and load the config starting from a source file's directory.
pub fn find_and_load_config(source_file: &Path) -> Result<Config, ConfigError> {
    let start_dir = source_file.parent().unwrap_or_else(|| Path::new("."));
    let config_path = find_config(start_dir)
        .ok_or_else(|| ConfigError::NotFound(start_dir.display().to_string()))?;
    load_config(&config_path)
}

fn validate_generate(generate: &GenerateConfig) -> Result<(), ConfigError> {
    // Dotted references (`store.Action`) are compared textually.
    let marker_ok = !generate.marker.is_empty()
        && generate
            .marker
            .split('.')
            .all(is_identifier);
    if !marker_ok {
        return Err(ConfigError::InvalidMarker(generate.marker.clone()));
    }

    if !generate.alias_suffix.chars().all(is_identifier_char) {
        return Err(ConfigError::InvalidAliasSuffix(
            generate.alias_suffix.clone(),
        ));
    }

    let suffix = &generate.output_suffix;
    if suffix.is_empty() || suffix.contains(['/', '\\']) || suffix.starts_with('.') {
        return Err(ConfigError::InvalidOutputSuffix(suffix.clone()));
    }
    Ok(())
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => chars.all(is_identifier_char),
        _ => false,
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
