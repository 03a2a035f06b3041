use ngrx_gen_common::Span;

use crate::ast::{Declaration, DeclarationKind, Member, SourceFile};

/// A top-level declaration whose heritage references the marker contract.
#[derive(Debug, Clone, Copy)]
pub struct CandidateDeclaration<'a> {
    declaration: &'a Declaration,
}

impl<'a> CandidateDeclaration<'a> {
    pub fn name(&self) -> &'a str {
        &self.declaration.name
    }

    pub fn kind(&self) -> DeclarationKind {
        self.declaration.kind
    }

    pub fn members(&self) -> &'a [Member] {
        &self.declaration.members
    }

    pub fn span(&self) -> &'a Span {
        &self.declaration.span
    }

    pub fn declaration(&self) -> &'a Declaration {
        self.declaration
    }
}

/// True when `extends`, `implements` or a type alias intersection names
/// `marker` exactly. Qualified references only match a qualified marker.
pub fn implements_marker(declaration: &Declaration, marker: &str) -> bool {
    declaration
        .heritage_types()
        .any(|reference| reference.expression == marker)
}

/// Collect the top-level declarations that reference `marker`, in source
/// order. An empty result is not an error here.
pub fn classify<'a>(file: &'a SourceFile, marker: &str) -> Vec<CandidateDeclaration<'a>> {
    let candidates: Vec<_> = file
        .declarations()
        .filter(|decl| implements_marker(decl, marker))
        .map(|declaration| CandidateDeclaration { declaration })
        .collect();
    tracing::debug!(
        file = %file.file_name,
        marker,
        candidates = candidates.len(),
        "classified declarations"
    );
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> SourceFile {
        let (file, diags) = crate::parse(source, "truck.actions.ts");
        assert!(!diags.has_errors(), "{:?}", diags.diagnostics());
        file
    }

    fn candidate_names(source: &str, marker: &str) -> Vec<String> {
        let file = parse(source);
        classify(&file, marker)
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    }

    #[test]
    fn matches_extends_and_implements_in_order() {
        let names = candidate_names(
            r#"
            import { Action } from '@ngrx/store';
            export class LoadTruck implements Action { readonly type = '[Truck] Load'; }
            export interface Base { id: string }
            export interface GetTruckItems extends Base, Action { type: '[Truck] Get Truck Items' }
            export type Refresh = Action & { type: '[Truck] Refresh' };
            "#,
            "Action",
        );
        assert_eq!(names, vec!["LoadTruck", "GetTruckItems", "Refresh"]);
    }

    #[test]
    fn name_match_is_textual() {
        let source = r#"
            export interface A extends store.Action { type: '[A] a' }
            export interface B extends Action<string> { type: '[A] b' }
            export interface C extends ActionCreator { type: '[A] c' }
        "#;
        assert_eq!(candidate_names(source, "Action"), vec!["B"]);
        assert_eq!(candidate_names(source, "store.Action"), vec!["A"]);
    }

    #[test]
    fn unmarked_and_nested_declarations_are_ignored() {
        let names = candidate_names(
            r#"
            export interface State { items: string[] }
            export class Service { load() { class Inner implements Action {} } }
            export namespace Legacy { export interface Old extends Action { type: '[A] old' } }
            "#,
            "Action",
        );
        assert!(names.is_empty());
    }

    #[test]
    fn candidate_exposes_declaration_shape() {
        let file = parse("export interface Load extends Action { type: '[Truck] Load'; id: string }");
        let candidates = classify(&file, "Action");
        assert_eq!(candidates.len(), 1);
        let candidate = candidates[0];
        assert_eq!(candidate.kind(), DeclarationKind::Interface);
        assert_eq!(candidate.members().len(), 2);
        assert_eq!(candidate.span().start.line, 1);
        assert!(candidate.declaration().is_exported);
    }

    #[test]
    fn empty_file_has_no_candidates() {
        assert!(candidate_names("", "Action").is_empty());
    }
}
