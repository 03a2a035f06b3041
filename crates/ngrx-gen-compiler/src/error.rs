use ngrx_gen_common::{Diagnostic, Span};

use crate::ast::DeclarationKind;

/// Why a discriminant literal could not be split into category and name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DiscriminantError {
    #[error("expected '[Category] Name'")]
    MissingBrackets,
    #[error("the category between '[' and ']' is blank")]
    BlankCategory,
    #[error("the category does not produce a valid type name")]
    InvalidCategoryName,
}

/// Fatal errors of the extraction and synthesis stages.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerateError {
    #[error("'{declaration}' has no 'type' member")]
    MissingDiscriminant { declaration: String, span: Span },

    #[error("invalid discriminant {literal:?} in '{declaration}': {reason}")]
    InvalidDiscriminantFormat {
        declaration: String,
        literal: String,
        reason: DiscriminantError,
        span: Span,
    },

    #[error("'{declaration}' references {marker} but is a {kind}; only classes and interfaces can be extracted")]
    UnsupportedDeclarationShape {
        declaration: String,
        kind: DeclarationKind,
        marker: String,
        span: Span,
    },

    #[error("no declarations reference {marker}")]
    EmptyMetadata { marker: String },

    #[error("'{declaration}' has category '{found}' but '{first_declaration}' has '{expected}'")]
    MixedCategories {
        declaration: String,
        found: String,
        span: Span,
        first_declaration: String,
        expected: String,
        first_span: Span,
    },
}

impl GenerateError {
    /// The source location of the offending declaration, if any.
    pub fn span(&self) -> Option<&Span> {
        match self {
            GenerateError::MissingDiscriminant { span, .. }
            | GenerateError::InvalidDiscriminantFormat { span, .. }
            | GenerateError::UnsupportedDeclarationShape { span, .. }
            | GenerateError::MixedCategories { span, .. } => Some(span),
            GenerateError::EmptyMetadata { .. } => None,
        }
    }

    /// Convert to a diagnostic for rendering alongside parser diagnostics.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diagnostic = Diagnostic::error(self.to_string());
        if let Some(span) = self.span() {
            diagnostic = diagnostic.with_span(span.clone());
        }
        match self {
            GenerateError::MissingDiscriminant { .. } => diagnostic
                .with_suggestion("add a discriminant such as `readonly type: '[Category] Name';`"),
            GenerateError::InvalidDiscriminantFormat { .. } => {
                diagnostic.with_suggestion("discriminants look like '[Category] Name'")
            }
            GenerateError::UnsupportedDeclarationShape { .. } => {
                diagnostic.with_suggestion("declare the action as an interface or a class")
            }
            GenerateError::EmptyMetadata { marker } => diagnostic.with_suggestion(format!(
                "declare actions with `extends {marker}` or `implements {marker}`"
            )),
            GenerateError::MixedCategories {
                first_declaration,
                first_span,
                ..
            } => diagnostic.with_related(
                first_span.clone(),
                format!("category set by '{first_declaration}'"),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ngrx_gen_common::Position;

    fn span() -> Span {
        let start = Position::START;
        let end = Position {
            line: 1,
            column: 10,
            offset: 9,
        };
        Span::new("truck.actions.ts", start, end)
    }

    #[test]
    fn missing_discriminant_names_declaration() {
        let err = GenerateError::MissingDiscriminant {
            declaration: "GetTruckItems".to_string(),
            span: span(),
        };
        assert_eq!(err.to_string(), "'GetTruckItems' has no 'type' member");
        let diag = err.to_diagnostic();
        assert!(diag.is_error());
        assert_eq!(diag.span, Some(span()));
        assert!(diag.suggestion.is_some());
    }

    #[test]
    fn invalid_discriminant_message() {
        let err = GenerateError::InvalidDiscriminantFormat {
            declaration: "Load".to_string(),
            literal: "Load Truck".to_string(),
            reason: DiscriminantError::MissingBrackets,
            span: span(),
        };
        assert_eq!(
            err.to_string(),
            "invalid discriminant \"Load Truck\" in 'Load': expected '[Category] Name'"
        );
    }

    #[test]
    fn unsupported_shape_message() {
        let err = GenerateError::UnsupportedDeclarationShape {
            declaration: "Refresh".to_string(),
            kind: DeclarationKind::TypeAlias,
            marker: "Action".to_string(),
            span: span(),
        };
        assert!(err.to_string().contains("is a type alias"));
    }

    #[test]
    fn empty_metadata_has_no_span() {
        let err = GenerateError::EmptyMetadata {
            marker: "Action".to_string(),
        };
        assert!(err.span().is_none());
        let diag = err.to_diagnostic();
        assert!(diag.span.is_none());
        assert_eq!(
            diag.suggestion.as_deref(),
            Some("declare actions with `extends Action` or `implements Action`")
        );
    }

    #[test]
    fn mixed_categories_points_at_first_declaration() {
        let err = GenerateError::MixedCategories {
            declaration: "LoadUser".to_string(),
            found: "User".to_string(),
            span: span(),
            first_declaration: "LoadTruck".to_string(),
            expected: "Truck".to_string(),
            first_span: span(),
        };
        let diag = err.to_diagnostic();
        assert_eq!(diag.related.len(), 1);
        assert_eq!(diag.related[0].message, "category set by 'LoadTruck'");
    }
}
