use ngrx_gen_common::Span;
use serde::Serialize;

use crate::ast::{DeclarationKind, Member, MemberKind};
use crate::error::GenerateError;

use super::classifier::CandidateDeclaration;
use super::discriminant::{parse_discriminant, DiscriminantTag};

/// Name of the member that carries the discriminant literal.
pub const DISCRIMINANT_MEMBER: &str = "type";

/// A payload property of an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    pub optional: bool,
    /// Source text of the type annotation, when there is one.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_text: Option<String>,
}

/// Everything the synthesizer needs to know about one action declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionMetadataRecord {
    pub declaration: String,
    pub kind: DeclarationKind,
    /// The discriminant as found in the source: the literal value for
    /// interfaces, the whole member text for classes.
    pub raw_discriminant: String,
    pub tag: DiscriminantTag,
    /// The declared string value of the discriminant, byte for byte. `None`
    /// when the member carries no single string literal.
    #[serde(skip)]
    pub literal: Option<String>,
    /// Required fields first, then optional ones, each in source order.
    /// Always empty for classes.
    pub fields: Vec<Field>,
    #[serde(skip)]
    pub span: Span,
}

/// Build the metadata record of one candidate.
pub fn extract(
    candidate: &CandidateDeclaration<'_>,
    marker: &str,
) -> Result<ActionMetadataRecord, GenerateError> {
    let kind = candidate.kind();
    if kind == DeclarationKind::TypeAlias {
        return Err(GenerateError::UnsupportedDeclarationShape {
            declaration: candidate.name().to_string(),
            kind,
            marker: marker.to_string(),
            span: candidate.span().clone(),
        });
    }

    let discriminant = candidate
        .declaration()
        .property(DISCRIMINANT_MEMBER)
        .ok_or_else(|| GenerateError::MissingDiscriminant {
            declaration: candidate.name().to_string(),
            span: candidate.span().clone(),
        })?;

    let (raw_discriminant, fields) = match kind {
        DeclarationKind::Class => (discriminant.text.clone(), Vec::new()),
        _ => (literal_text(discriminant), partition_fields(candidate.members())),
    };

    let literal = declared_literal(discriminant);

    let tag = parse_discriminant(&raw_discriminant).map_err(|reason| {
        GenerateError::InvalidDiscriminantFormat {
            declaration: candidate.name().to_string(),
            literal: raw_discriminant.clone(),
            reason,
            span: discriminant.span.clone(),
        }
    })?;

    tracing::debug!(
        declaration = candidate.name(),
        category = %tag.category,
        name = %tag.name,
        fields = fields.len(),
        "extracted action"
    );

    Ok(ActionMetadataRecord {
        declaration: candidate.name().to_string(),
        kind,
        raw_discriminant,
        tag,
        literal,
        fields,
        span: candidate.span().clone(),
    })
}

/// The literal value of the discriminant's type, or its source text when it
/// is not a string literal.
fn literal_text(member: &Member) -> String {
    match &member.type_annotation {
        Some(annotation) => annotation
            .string_literal()
            .map(str::to_string)
            .unwrap_or_else(|| annotation.text.clone()),
        None => member.text.clone(),
    }
}

/// The string value a discriminant member declares, from its initializer for
/// class properties and from its literal type otherwise.
fn declared_literal(member: &Member) -> Option<String> {
    member
        .initializer
        .as_ref()
        .and_then(|init| init.literal.clone())
        .or_else(|| {
            member
                .type_annotation
                .as_ref()
                .and_then(|t| t.string_literal())
                .map(str::to_string)
        })
}

fn partition_fields(members: &[Member]) -> Vec<Field> {
    let (required, optional): (Vec<Field>, Vec<Field>) = members
        .iter()
        .filter(|m| m.kind == MemberKind::Property)
        .filter_map(|m| {
            let name = m.name.as_ref()?.as_str();
            (name != DISCRIMINANT_MEMBER).then(|| Field {
                name: name.to_string(),
                optional: m.optional,
                type_text: m.type_annotation.as_ref().map(|t| t.text.clone()),
            })
        })
        .partition(|field| !field.optional);
    required.into_iter().chain(optional).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::SourceFile;
    use crate::error::DiscriminantError;
    use crate::extract::classifier::classify;

    fn parse(source: &str) -> SourceFile {
        let (file, diags) = crate::parse(source, "truck.actions.ts");
        assert!(!diags.has_errors(), "{:?}", diags.diagnostics());
        file
    }

    fn extract_first(source: &str) -> Result<ActionMetadataRecord, GenerateError> {
        let file = parse(source);
        let candidates = classify(&file, "Action");
        extract(&candidates[0], "Action")
    }

    fn field_names(record: &ActionMetadataRecord) -> Vec<&str> {
        record.fields.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn interface_record() {
        let record = extract_first(
            r#"
            export interface GetTruckItemsSuccess extends Action {
                readonly type: '[Truck] Get Truck Items Success';
                items: Item[];
            }
            "#,
        )
        .unwrap();
        assert_eq!(record.declaration, "GetTruckItemsSuccess");
        assert_eq!(record.kind, DeclarationKind::Interface);
        assert_eq!(record.raw_discriminant, "[Truck] Get Truck Items Success");
        assert_eq!(record.tag.category, "Truck");
        assert_eq!(record.tag.name, "Get Truck Items Success");
        assert_eq!(
            record.fields,
            vec![Field {
                name: "items".to_string(),
                optional: false,
                type_text: Some("Item[]".to_string()),
            }]
        );
    }

    #[test]
    fn required_fields_precede_optional_fields() {
        let record = extract_first(
            r#"
            export interface Search extends Action {
                page?: number;
                type: '[Truck] Search';
                query: string;
                sort?: 'asc' | 'desc';
                limit: number;
                reset(): void;
            }
            "#,
        )
        .unwrap();
        assert_eq!(field_names(&record), vec!["query", "limit", "page", "sort"]);
        assert!(record.fields[2].optional);
    }

    #[test]
    fn class_keeps_member_text_and_no_fields() {
        let record = extract_first(
            r#"
            export class GetTruckItemsFail implements Action {
                readonly type = '[Truck] Get Truck Items Fail';
                constructor(public error: string) {}
            }
            "#,
        )
        .unwrap();
        assert_eq!(record.kind, DeclarationKind::Class);
        assert_eq!(
            record.raw_discriminant,
            "readonly type = '[Truck] Get Truck Items Fail';"
        );
        assert_eq!(record.tag.name, "Get Truck Items Fail");
        assert!(record.fields.is_empty());
    }

    #[test]
    fn missing_discriminant_names_declaration() {
        let err = extract_first("export interface Load extends Action { id: string }").unwrap_err();
        match err {
            GenerateError::MissingDiscriminant { declaration, .. } => {
                assert_eq!(declaration, "Load")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn type_method_is_not_a_discriminant() {
        let err = extract_first("export interface Load extends Action { type(): string; id: string }")
            .unwrap_err();
        assert!(matches!(err, GenerateError::MissingDiscriminant { .. }));

        let err = extract_first(
            "export class Load implements Action { type() { return '[Truck] Load'; } }",
        )
        .unwrap_err();
        assert!(matches!(err, GenerateError::MissingDiscriminant { .. }));
    }

    #[test]
    fn literal_keeps_declared_spacing() {
        let record = extract_first(
            "export class Load implements Action { readonly type = '[Truck]  Load Truck'; }",
        )
        .unwrap();
        assert_eq!(record.literal.as_deref(), Some("[Truck]  Load Truck"));
        assert_eq!(record.tag.canonical(), "[Truck] Load Truck");

        let record = extract_first(
            "export interface Load extends Action { readonly type: '[Truck]  Load Truck' }",
        )
        .unwrap();
        assert_eq!(record.literal.as_deref(), Some("[Truck]  Load Truck"));
    }

    #[test]
    fn non_literal_discriminant_fails_parsing() {
        let err =
            extract_first("export interface Load extends Action { type: typeof LOAD }").unwrap_err();
        match err {
            GenerateError::InvalidDiscriminantFormat {
                declaration,
                literal,
                reason,
                ..
            } => {
                assert_eq!(declaration, "Load");
                assert_eq!(literal, "typeof LOAD");
                assert_eq!(reason, DiscriminantError::MissingBrackets);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn blank_category_is_rejected() {
        let err = extract_first("export interface Load extends Action { type: '[] Load' }").unwrap_err();
        assert!(matches!(
            err,
            GenerateError::InvalidDiscriminantFormat {
                reason: DiscriminantError::BlankCategory,
                ..
            }
        ));
    }

    #[test]
    fn type_alias_is_unsupported() {
        let err = extract_first("export type Refresh = Action & { type: '[Truck] Refresh' };")
            .unwrap_err();
        assert!(matches!(
            err,
            GenerateError::UnsupportedDeclarationShape {
                kind: DeclarationKind::TypeAlias,
                ..
            }
        ));
    }

    #[test]
    fn record_serializes_without_span() {
        let record = extract_first(
            "export interface Load extends Action { type: '[Truck] Load'; id?: string }",
        )
        .unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "declaration": "Load",
                "kind": "interface",
                "rawDiscriminant": "[Truck] Load",
                "tag": { "category": "Truck", "name": "Load" },
                "fields": [{ "name": "id", "optional": true, "type": "string" }]
            })
        );
    }
}
