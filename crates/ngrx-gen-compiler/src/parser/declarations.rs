use ngrx_gen_common::Span;

use crate::ast::*;
use crate::lexer::token::TokenKind;

use super::members::MemberContext;
use super::Parser;

/// `export`, `default`, `declare`, `abstract` seen before a declaration.
#[derive(Debug, Default, Clone, Copy)]
struct DeclarationModifiers {
    is_exported: bool,
    is_default: bool,
    is_declare: bool,
    is_abstract: bool,
}

impl<'src> Parser<'src> {
    /// Parse one top-level statement.
    pub(super) fn parse_statement(&mut self) -> Option<Statement> {
        let start = self.current_span();
        let decorators = self.parse_decorators()?;
        let modifiers = self.parse_declaration_modifiers();

        let decl = match self.peek() {
            TokenKind::Class => self.parse_class_decl(start, decorators, modifiers)?,
            TokenKind::Interface if self.peek_at(1).is_identifier_like() => {
                self.parse_interface_decl(start, decorators, modifiers)?
            }
            TokenKind::Type if self.peek_at(1).is_identifier_like() => {
                self.parse_type_alias_decl(start, decorators, modifiers)?
            }
            _ => {
                if let Some(first) = decorators.first() {
                    self.diagnostics.warning(
                        "decorators are only meaningful on class declarations",
                        first.span.clone(),
                    );
                }
                self.skip_statement();
                return Some(Statement::Other(start.merge(&self.previous_span())));
            }
        };
        Some(Statement::Declaration(decl))
    }

    fn parse_declaration_modifiers(&mut self) -> DeclarationModifiers {
        let mut modifiers = DeclarationModifiers::default();
        loop {
            match self.peek() {
                TokenKind::Export => modifiers.is_exported = true,
                TokenKind::Default if modifiers.is_exported => modifiers.is_default = true,
                // `declare` and `abstract` are also valid identifiers.
                TokenKind::Declare if self.peek_at(1).is_identifier_like() => {
                    modifiers.is_declare = true
                }
                TokenKind::Abstract if self.peek_at(1) == TokenKind::Class => {
                    modifiers.is_abstract = true
                }
                _ => break,
            }
            self.advance();
        }
        modifiers
    }

    // ========================================================================
    // Decorators: @name, @a.b, @name(args)
    // ========================================================================

    pub(super) fn parse_decorators(&mut self) -> Option<Vec<Decorator>> {
        let mut decorators = Vec::new();
        while self.peek() == TokenKind::At {
            decorators.push(self.parse_decorator()?);
        }
        Some(decorators)
    }

    fn parse_decorator(&mut self) -> Option<Decorator> {
        let start = self.current_span();
        self.expect(TokenKind::At)?;

        let name = if self.peek() == TokenKind::LeftParen {
            // `@(expr)`
            let open = self.current_span();
            self.skip_balanced()?;
            self.source_text(&open, &self.previous_span()).to_string()
        } else {
            self.parse_qualified_name("decorator name")?
        };

        if self.peek() == TokenKind::LeftParen {
            self.skip_balanced()?;
        }

        let span = start.merge(&self.previous_span());
        Some(Decorator { name, span })
    }

    /// `a`, `a.b.c`
    fn parse_qualified_name(&mut self, what: &str) -> Option<String> {
        if !self.peek().is_identifier_like() {
            let span = self.current_span();
            let message = format!("expected {}, found {}", what, self.describe_current());
            self.diagnostics.error(message, span);
            return None;
        }
        let mut name = self.advance().lexeme.clone();
        while self.peek() == TokenKind::Dot && self.peek_at(1).is_identifier_like() {
            self.advance();
            name.push('.');
            name.push_str(&self.advance().lexeme);
        }
        Some(name)
    }

    // ========================================================================
    // Class declaration
    // ========================================================================

    /// `[abstract] class Name<T> extends Base implements A, B { members }`
    fn parse_class_decl(
        &mut self,
        start: Span,
        decorators: Vec<Decorator>,
        modifiers: DeclarationModifiers,
    ) -> Option<Declaration> {
        self.expect(TokenKind::Class)?;

        let (name, name_span) = if self.at_declaration_name() {
            let token = self.advance();
            (token.lexeme.clone(), token.span.clone())
        } else if modifiers.is_default {
            // `export default class implements Action { ... }`
            ("default".to_string(), self.previous_span())
        } else {
            let span = self.current_span();
            let message = format!("expected class name, found {}", self.describe_current());
            self.diagnostics.error(message, span);
            return None;
        };

        if self.peek() == TokenKind::Less {
            self.skip_angle_group()?;
        }
        let heritage = self.parse_heritage_clauses()?;
        let members = self.parse_members(MemberContext::Class)?;

        let span = start.merge(&self.previous_span());
        Some(Declaration {
            kind: DeclarationKind::Class,
            name,
            name_span,
            decorators,
            heritage,
            members,
            is_exported: modifiers.is_exported,
            is_default: modifiers.is_default,
            is_declare: modifiers.is_declare,
            is_abstract: modifiers.is_abstract,
            span,
        })
    }

    // ========================================================================
    // Interface declaration
    // ========================================================================

    /// `interface Name<T> extends A, B { members }`
    fn parse_interface_decl(
        &mut self,
        start: Span,
        decorators: Vec<Decorator>,
        modifiers: DeclarationModifiers,
    ) -> Option<Declaration> {
        self.expect(TokenKind::Interface)?;

        if !self.at_declaration_name() {
            let span = self.current_span();
            let message = format!(
                "expected interface name, found {}",
                self.describe_current()
            );
            self.diagnostics.error(message, span);
            return None;
        }
        let token = self.advance();
        let (name, name_span) = (token.lexeme.clone(), token.span.clone());

        if self.peek() == TokenKind::Less {
            self.skip_angle_group()?;
        }
        let heritage = self.parse_heritage_clauses()?;
        if let Some(clause) = heritage
            .iter()
            .find(|c| c.keyword == HeritageKeyword::Implements)
        {
            self.diagnostics.error(
                "interfaces cannot implement types; use 'extends'",
                clause.span.clone(),
            );
        }
        let members = self.parse_members(MemberContext::Interface)?;

        let span = start.merge(&self.previous_span());
        Some(Declaration {
            kind: DeclarationKind::Interface,
            name,
            name_span,
            decorators,
            heritage,
            members,
            is_exported: modifiers.is_exported,
            is_default: modifiers.is_default,
            is_declare: modifiers.is_declare,
            is_abstract: false,
            span,
        })
    }

    /// Names may be contextual keywords, but not the heritage keywords that
    /// could follow an omitted name.
    fn at_declaration_name(&self) -> bool {
        self.peek().is_identifier_like()
            && !matches!(self.peek(), TokenKind::Extends | TokenKind::Implements)
    }

    // ========================================================================
    // Heritage clauses
    // ========================================================================

    fn parse_heritage_clauses(&mut self) -> Option<Vec<HeritageClause>> {
        let mut clauses = Vec::new();
        loop {
            let keyword = match self.peek() {
                TokenKind::Extends => HeritageKeyword::Extends,
                TokenKind::Implements => HeritageKeyword::Implements,
                _ => break,
            };
            let start = self.current_span();
            self.advance();

            let mut types = Vec::new();
            loop {
                types.push(self.parse_type_reference()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }

            let span = start.merge(&self.previous_span());
            clauses.push(HeritageClause {
                keyword,
                types,
                span,
            });
        }
        Some(clauses)
    }

    /// `Action`, `store.Action`, `Base<T>`, `Mixin(Base)`
    fn parse_type_reference(&mut self) -> Option<TypeReference> {
        let start = self.current_span();
        self.parse_qualified_name("type name")?;
        // Class heritage may be a call expression.
        if self.peek() == TokenKind::LeftParen {
            self.skip_balanced()?;
        }
        let expression = self.source_text(&start, &self.previous_span()).to_string();

        let type_arguments = if self.peek() == TokenKind::Less {
            let open = self.current_span();
            self.skip_angle_group()?;
            Some(self.source_text(&open, &self.previous_span()).to_string())
        } else {
            None
        };

        let span = start.merge(&self.previous_span());
        Some(TypeReference {
            expression,
            type_arguments,
            span,
        })
    }

    // ========================================================================
    // Type alias declaration
    // ========================================================================

    /// `type Name<T> = A & B & { members };`
    ///
    /// Named constituents of a top-level intersection become the heritage and
    /// object type constituents contribute members. Any other shape of type
    /// (unions, conditionals, mapped types, ...) yields neither.
    fn parse_type_alias_decl(
        &mut self,
        start: Span,
        decorators: Vec<Decorator>,
        modifiers: DeclarationModifiers,
    ) -> Option<Declaration> {
        self.expect(TokenKind::Type)?;
        let token = self.advance();
        let (name, name_span) = (token.lexeme.clone(), token.span.clone());

        if self.peek() == TokenKind::Less {
            self.skip_angle_group()?;
        }
        self.expect(TokenKind::Equal)?;

        let body_start = self.current_span();
        let mut types = Vec::new();
        let mut members = Vec::new();
        let mut is_intersection = true;

        self.eat(TokenKind::Amp);
        loop {
            match self.peek() {
                TokenKind::LeftBrace => {
                    members.extend(self.parse_members(MemberContext::Interface)?);
                }
                kind if kind.is_identifier_like() => {
                    types.push(self.parse_type_reference()?);
                }
                _ => is_intersection = false,
            }
            if !is_intersection || self.at_alias_end() {
                break;
            }
            if !self.eat(TokenKind::Amp) {
                is_intersection = false;
                break;
            }
        }

        if !is_intersection {
            self.skip_alias_rest();
            types.clear();
            members.clear();
        }
        let body_span = body_start.merge(&self.previous_span());
        self.eat(TokenKind::Semicolon);

        let heritage = if types.is_empty() {
            Vec::new()
        } else {
            vec![HeritageClause {
                keyword: HeritageKeyword::Intersection,
                types,
                span: body_span,
            }]
        };

        let span = start.merge(&self.previous_span());
        Some(Declaration {
            kind: DeclarationKind::TypeAlias,
            name,
            name_span,
            decorators,
            heritage,
            members,
            is_exported: modifiers.is_exported,
            is_default: modifiers.is_default,
            is_declare: modifiers.is_declare,
            is_abstract: false,
            span,
        })
    }

    fn at_alias_end(&self) -> bool {
        matches!(
            self.peek(),
            TokenKind::Semicolon | TokenKind::RightBrace | TokenKind::Eof
        ) || self.at_implicit_semicolon()
    }

    /// Skip the remainder of a type alias body we do not interpret.
    fn skip_alias_rest(&mut self) {
        let mut depth: u32 = 0;
        while !self.is_at_end() {
            if depth == 0 && self.at_alias_end() {
                return;
            }
            match self.peek() {
                TokenKind::LeftParen
                | TokenKind::LeftBracket
                | TokenKind::LeftBrace
                | TokenKind::Less => depth += 1,
                TokenKind::RightParen
                | TokenKind::RightBracket
                | TokenKind::RightBrace
                | TokenKind::Greater => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.advance();
        }
    }
}
