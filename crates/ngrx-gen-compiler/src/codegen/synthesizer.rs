use ngrx_gen_common::GenerateConfig;

use crate::error::{DiscriminantError, GenerateError};
use crate::extract::{ActionMetadataRecord, Field};

use super::case::{camel_case, is_identifier, pascal_case};

// ============================================================================
// Artifacts
// ============================================================================

/// `import { A, B } from './module';`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub module_path: String,
    pub names: Vec<String>,
}

/// `export type Name = A | B;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAliasSpec {
    pub name: String,
    pub exported: bool,
    pub members: Vec<String>,
}

/// The generated actions file: one import and one union alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeArtifact {
    pub import: ImportSpec,
    pub alias: TypeAliasSpec,
}

/// One `case` of the reducer switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducerCase {
    /// The discriminant as declared, or `[Category] Name` when the
    /// declaration carries no single string literal.
    pub discriminant: String,
    pub declaration: String,
    pub fields: Vec<Field>,
}

/// The generated reducer skeleton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducerArtifact {
    pub import: ImportSpec,
    pub function_name: String,
    pub action_type: String,
    pub cases: Vec<ReducerCase>,
}

// ============================================================================
// Synthesizer
// ============================================================================

/// Builds output declarations from extracted metadata records.
pub struct Synthesizer<'c> {
    config: &'c GenerateConfig,
}

impl<'c> Synthesizer<'c> {
    pub fn new(config: &'c GenerateConfig) -> Self {
        Self { config }
    }

    /// Build the import and union alias for `records`, which come from the
    /// file named `file_name` in the same directory as the output.
    pub fn synthesize(
        &self,
        records: &[ActionMetadataRecord],
        file_name: &str,
    ) -> Result<CodeArtifact, GenerateError> {
        self.synthesize_importing(records, module_path(file_name))
    }

    /// Like [`Synthesizer::synthesize`], importing the declarations from
    /// `module_path` as given. Names keep input order and are not deduplicated.
    pub fn synthesize_importing(
        &self,
        records: &[ActionMetadataRecord],
        module_path: String,
    ) -> Result<CodeArtifact, GenerateError> {
        let first = self.check_categories(records)?;
        let alias_name = self.alias_name(first)?;
        let names: Vec<String> = records.iter().map(|r| r.declaration.clone()).collect();

        tracing::debug!(
            alias = %alias_name,
            members = names.len(),
            "synthesized union alias"
        );

        Ok(CodeArtifact {
            import: ImportSpec {
                module_path,
                names: names.clone(),
            },
            alias: TypeAliasSpec {
                name: alias_name,
                exported: true,
                members: names,
            },
        })
    }

    /// Build a reducer over the union alias of `artifact`, which is imported
    /// from the generated file named `actions_file_name`.
    pub fn synthesize_reducer(
        &self,
        artifact: &CodeArtifact,
        records: &[ActionMetadataRecord],
        actions_file_name: &str,
    ) -> Result<ReducerArtifact, GenerateError> {
        let first = self.check_categories(records)?;
        let function_name = format!("{}Reducer", camel_case(&first.tag.category));
        let cases = records
            .iter()
            .map(|record| ReducerCase {
                discriminant: record
                    .literal
                    .clone()
                    .unwrap_or_else(|| record.tag.canonical()),
                declaration: record.declaration.clone(),
                fields: record.fields.clone(),
            })
            .collect();

        tracing::debug!(function = %function_name, "synthesized reducer");

        Ok(ReducerArtifact {
            import: ImportSpec {
                module_path: module_path(actions_file_name),
                names: vec![artifact.alias.name.clone()],
            },
            function_name,
            action_type: artifact.alias.name.clone(),
            cases,
        })
    }

    /// The first record, once every record is known to share its category.
    fn check_categories<'r>(
        &self,
        records: &'r [ActionMetadataRecord],
    ) -> Result<&'r ActionMetadataRecord, GenerateError> {
        let first = records.first().ok_or_else(|| GenerateError::EmptyMetadata {
            marker: self.config.marker.clone(),
        })?;
        let expected = first.tag.category.trim();
        if let Some(other) = records
            .iter()
            .find(|r| r.tag.category.trim() != expected)
        {
            return Err(GenerateError::MixedCategories {
                declaration: other.declaration.clone(),
                found: other.tag.category.clone(),
                span: other.span.clone(),
                first_declaration: first.declaration.clone(),
                expected: first.tag.category.clone(),
                first_span: first.span.clone(),
            });
        }
        Ok(first)
    }

    fn alias_name(&self, first: &ActionMetadataRecord) -> Result<String, GenerateError> {
        let base = pascal_case(&first.tag.category);
        if !is_identifier(&base) {
            return Err(GenerateError::InvalidDiscriminantFormat {
                declaration: first.declaration.clone(),
                literal: first.raw_discriminant.clone(),
                reason: DiscriminantError::InvalidCategoryName,
                span: first.span.clone(),
            });
        }
        Ok(format!("{}{}", base, self.config.alias_suffix))
    }
}

/// `./` + the base name of `file_name` without its last extension.
pub fn module_path(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    let stem = match base.rfind('.') {
        Some(dot) if dot > 0 => &base[..dot],
        _ => base,
    };
    format!("./{stem}")
}
