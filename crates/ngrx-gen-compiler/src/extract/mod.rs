pub mod classifier;
pub mod discriminant;
pub mod extractor;

pub use classifier::{classify, implements_marker, CandidateDeclaration};
pub use discriminant::{parse_discriminant, DiscriminantTag};
pub use extractor::{extract, ActionMetadataRecord, Field};

use crate::ast::SourceFile;
use crate::error::GenerateError;

/// Classify the file and extract every candidate, stopping at the first
/// failure. Records keep source order.
pub fn extract_actions(
    file: &SourceFile,
    marker: &str,
) -> Result<Vec<ActionMetadataRecord>, GenerateError> {
    classify(file, marker)
        .iter()
        .map(|candidate| extract(candidate, marker))
        .collect()
}
