use ngrx_gen_common::Span;
use serde::Serialize;

use super::types::{Initializer, TypeAnnotation};

// ============================================================================
// Source file (top-level)
// ============================================================================

/// A parsed source file: its top-level statements in source order.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub file_name: String,
    pub statements: Vec<Statement>,
    pub span: Span,
}

impl SourceFile {
    /// Class, interface and type alias declarations, in source order.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.statements.iter().filter_map(|stmt| match stmt {
            Statement::Declaration(decl) => Some(decl),
            Statement::Other(_) => None,
        })
    }
}

/// A top-level statement.
#[derive(Debug, Clone)]
pub enum Statement {
    Declaration(Declaration),
    /// Imports, functions, variables, enums, namespaces, ... Only the
    /// extent is recorded.
    Other(Span),
}

// ============================================================================
// Declarations
// ============================================================================

/// The declaration shapes the parser understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclarationKind {
    Class,
    Interface,
    TypeAlias,
}

impl std::fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DeclarationKind::Class => "class",
            DeclarationKind::Interface => "interface",
            DeclarationKind::TypeAlias => "type alias",
        };
        f.write_str(name)
    }
}

/// A class, interface or type alias declaration.
///
/// ```typescript
/// @Injectable()
/// export abstract class LoadTruck extends Base<Truck> implements Action { ... }
/// export interface GetTruckItems extends Action { ... }
/// export type RefreshTruck = Action & { ... };
/// ```
#[derive(Debug, Clone)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub name: String,
    pub name_span: Span,
    pub decorators: Vec<Decorator>,
    pub heritage: Vec<HeritageClause>,
    pub members: Vec<Member>,
    pub is_exported: bool,
    pub is_default: bool,
    pub is_declare: bool,
    pub is_abstract: bool,
    pub span: Span,
}

impl Declaration {
    /// Every type referenced from `extends` / `implements` clauses (or the
    /// intersection of a type alias), in source order.
    pub fn heritage_types(&self) -> impl Iterator<Item = &TypeReference> {
        self.heritage.iter().flat_map(|clause| clause.types.iter())
    }

    /// First property member with the given name; methods, accessors and
    /// signatures are not considered.
    pub fn property(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| {
            m.kind == MemberKind::Property && m.name.as_ref().is_some_and(|n| n.as_str() == name)
        })
    }
}

/// A decorator: `@Injectable()`; only the callee name is kept.
#[derive(Debug, Clone)]
pub struct Decorator {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeritageKeyword {
    Extends,
    Implements,
    /// Constituents of a type alias intersection: `type A = Action & {...}`.
    Intersection,
}

/// `extends A, B` / `implements C`.
#[derive(Debug, Clone)]
pub struct HeritageClause {
    pub keyword: HeritageKeyword,
    pub types: Vec<TypeReference>,
    pub span: Span,
}

/// One entry of a heritage clause: `Action`, `fromStore.Action`,
/// `Base<Truck>`, `Mixin(Base)`.
#[derive(Debug, Clone)]
pub struct TypeReference {
    /// Source text of the referenced expression, without type arguments.
    pub expression: String,
    /// Source text of the type arguments including the angle brackets.
    pub type_arguments: Option<String>,
    pub span: Span,
}

// ============================================================================
// Members
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Property,
    Method,
    Constructor,
    /// `get name()` / `set name(v)`.
    Accessor,
    /// `[key: string]: T`.
    IndexSignature,
    /// `(x: T): R` or `new (x: T): R` inside an interface.
    CallSignature,
    /// `static { ... }` inside a class.
    StaticBlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberModifier {
    Public,
    Private,
    Protected,
    Static,
    Readonly,
    Abstract,
    Declare,
    Override,
    Accessor,
    Async,
}

/// The name of a class or interface member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyName {
    Identifier(String),
    /// `'quoted-name': T`; holds the unquoted value.
    String(String),
    Number(String),
    /// `#secret`.
    Private(String),
    /// `[Symbol.iterator]`; holds the bracketed source text.
    Computed(String),
}

impl PropertyName {
    pub fn as_str(&self) -> &str {
        match self {
            PropertyName::Identifier(s)
            | PropertyName::String(s)
            | PropertyName::Number(s)
            | PropertyName::Private(s)
            | PropertyName::Computed(s) => s,
        }
    }
}

/// A class element or interface type member.
#[derive(Debug, Clone)]
pub struct Member {
    pub kind: MemberKind,
    pub name: Option<PropertyName>,
    pub modifiers: Vec<MemberModifier>,
    /// Marked with `?`.
    pub optional: bool,
    pub type_annotation: Option<TypeAnnotation>,
    pub initializer: Option<Initializer>,
    /// Verbatim source text, including a trailing `;` when present.
    pub text: String,
    pub span: Span,
}

impl Member {
    pub fn has_modifier(&self, modifier: MemberModifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}
