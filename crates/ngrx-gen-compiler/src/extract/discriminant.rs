use serde::Serialize;

use crate::error::DiscriminantError;

/// A discriminant split into its bracketed category and the action name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscriminantTag {
    pub category: String,
    pub name: String,
}

impl DiscriminantTag {
    /// The normalized discriminant, `[Category] Name`.
    pub fn canonical(&self) -> String {
        if self.name.is_empty() {
            format!("[{}]", self.category)
        } else {
            format!("[{}] {}", self.category, self.name)
        }
    }
}

/// Split `[Category] Name` into category and name.
///
/// `raw` may be a bare literal value (`[Truck] Load`) or the verbatim text of
/// a class member (`readonly type = '[Truck] Load';`). The category is the
/// text between the first `[` and the first `]` after it, kept as written.
/// The name is the trimmed rest with one trailing `;` removed and, when the
/// text before `[` ends with a quote, the matching closing quote removed.
pub fn parse_discriminant(raw: &str) -> Result<DiscriminantTag, DiscriminantError> {
    let open = raw.find('[').ok_or(DiscriminantError::MissingBrackets)?;
    let close = raw[open + 1..]
        .find(']')
        .map(|i| open + 1 + i)
        .ok_or(DiscriminantError::MissingBrackets)?;

    let category = &raw[open + 1..close];
    if category.trim().is_empty() {
        return Err(DiscriminantError::BlankCategory);
    }

    let mut name = raw[close + 1..].trim();
    if let Some(rest) = name.strip_suffix(';') {
        name = rest.trim_end();
    }
    let opening_quote = raw[..open]
        .chars()
        .next_back()
        .filter(|c| matches!(c, '\'' | '"' | '`'));
    if let Some(quote) = opening_quote {
        if let Some(rest) = name.strip_suffix(quote) {
            name = rest.trim_end();
        }
    }

    Ok(DiscriminantTag {
        category: category.to_string(),
        name: name.to_string(),
    })
}
