use crate::ast::*;
use crate::lexer::token::{Token, TokenKind};

use super::Parser;

/// Where a member list appears; classes allow decorators, initializers and
/// bodies, interfaces (and object types) do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MemberContext {
    Class,
    Interface,
}

impl<'src> Parser<'src> {
    /// Parse `{ member* }`, recovering from broken members one at a time.
    pub(super) fn parse_members(&mut self, context: MemberContext) -> Option<Vec<Member>> {
        self.expect(TokenKind::LeftBrace)?;

        let mut members = Vec::new();
        while !matches!(self.peek(), TokenKind::RightBrace | TokenKind::Eof) {
            if self.eat(TokenKind::Semicolon) || self.eat(TokenKind::Comma) {
                continue;
            }
            let before = self.pos;
            match self.parse_member(context) {
                Some(member) => members.push(member),
                None => self.recover_member(before),
            }
        }

        self.expect(TokenKind::RightBrace)?;
        Some(members)
    }

    fn parse_member(&mut self, context: MemberContext) -> Option<Member> {
        let start = self.current_span();
        if context == MemberContext::Class {
            self.parse_decorators()?;
        }
        let modifiers = self.parse_member_modifiers();

        // `static { ... }`
        if context == MemberContext::Class
            && self.peek() == TokenKind::LeftBrace
            && modifiers == [MemberModifier::Static]
        {
            self.skip_balanced()?;
            return Some(self.finish_member(
                start,
                MemberKind::StaticBlock,
                None,
                modifiers,
                false,
                None,
                None,
            ));
        }

        // Signatures without a name: `(x: T): R`, `new (x: T): R`
        let is_construct_signature = self.peek() == TokenKind::Identifier
            && self.peek_lexeme() == "new"
            && matches!(self.peek_at(1), TokenKind::LeftParen | TokenKind::Less);
        if is_construct_signature || matches!(self.peek(), TokenKind::LeftParen | TokenKind::Less)
        {
            if is_construct_signature {
                self.advance();
            }
            self.skip_signature(context)?;
            return Some(self.finish_member(
                start,
                MemberKind::CallSignature,
                None,
                modifiers,
                false,
                None,
                None,
            ));
        }

        // `[key: string]: T`
        if self.peek() == TokenKind::LeftBracket
            && self.peek_at(1).is_identifier_like()
            && self.peek_at(2) == TokenKind::Colon
        {
            self.skip_balanced()?;
            let type_annotation = if self.eat(TokenKind::Colon) {
                Some(self.parse_type_annotation(false)?)
            } else {
                None
            };
            return Some(self.finish_member(
                start,
                MemberKind::IndexSignature,
                None,
                modifiers,
                false,
                type_annotation,
                None,
            ));
        }

        let mut kind = MemberKind::Property;
        let is_accessor = self.peek() == TokenKind::Identifier
            && matches!(self.peek_lexeme(), "get" | "set")
            && starts_property_name(self.peek_at(1));
        if is_accessor {
            self.advance();
            kind = MemberKind::Accessor;
        } else if self.eat(TokenKind::Star) {
            kind = MemberKind::Method;
        }

        let name = self.parse_property_name()?;
        if context == MemberContext::Class
            && kind == MemberKind::Property
            && name == PropertyName::Identifier("constructor".to_string())
            && self.peek() == TokenKind::LeftParen
        {
            kind = MemberKind::Constructor;
        }

        let optional = self.eat(TokenKind::Question);
        // Definite assignment: `name!: T`
        self.eat(TokenKind::Bang);

        let mut type_annotation = None;
        let mut initializer = None;
        if matches!(self.peek(), TokenKind::LeftParen | TokenKind::Less) {
            if kind == MemberKind::Property {
                kind = MemberKind::Method;
            }
            self.skip_signature(context)?;
            if context == MemberContext::Class && self.peek() == TokenKind::LeftBrace {
                self.skip_balanced()?;
            }
        } else {
            if self.eat(TokenKind::Colon) {
                type_annotation = Some(self.parse_type_annotation(false)?);
            }
            if context == MemberContext::Class && self.eat(TokenKind::Equal) {
                initializer = Some(self.parse_initializer()?);
            }
        }

        Some(self.finish_member(
            start,
            kind,
            Some(name),
            modifiers,
            optional,
            type_annotation,
            initializer,
        ))
    }

    /// Build the member; a directly following `;` is part of its text.
    #[allow(clippy::too_many_arguments)]
    fn finish_member(
        &mut self,
        start: ngrx_gen_common::Span,
        kind: MemberKind,
        name: Option<PropertyName>,
        modifiers: Vec<MemberModifier>,
        optional: bool,
        type_annotation: Option<TypeAnnotation>,
        initializer: Option<Initializer>,
    ) -> Member {
        self.eat(TokenKind::Semicolon);
        let end = self.previous_span();
        let span = start.merge(&end);
        let text = self.source_text(&start, &end).to_string();
        Member {
            kind,
            name,
            modifiers,
            optional,
            type_annotation,
            initializer,
            text,
            span,
        }
    }

    fn parse_member_modifiers(&mut self) -> Vec<MemberModifier> {
        let mut modifiers = Vec::new();
        loop {
            let modifier = match self.peek() {
                TokenKind::Public => MemberModifier::Public,
                TokenKind::Private => MemberModifier::Private,
                TokenKind::Protected => MemberModifier::Protected,
                TokenKind::Static => MemberModifier::Static,
                TokenKind::Readonly => MemberModifier::Readonly,
                TokenKind::Abstract => MemberModifier::Abstract,
                TokenKind::Declare => MemberModifier::Declare,
                TokenKind::Identifier => match self.peek_lexeme() {
                    "override" => MemberModifier::Override,
                    "accessor" => MemberModifier::Accessor,
                    "async" => MemberModifier::Async,
                    _ => break,
                },
                _ => break,
            };
            // `readonly: boolean` and `static()` use the keyword as a name.
            let next = self.peek_at(1);
            let is_static_block = modifier == MemberModifier::Static && next == TokenKind::LeftBrace;
            if !(starts_property_name(next) || next == TokenKind::Star || is_static_block) {
                break;
            }
            modifiers.push(modifier);
            self.advance();
        }
        modifiers
    }

    fn parse_property_name(&mut self) -> Option<PropertyName> {
        let lexeme = self.peek_lexeme().to_string();
        let name = match self.peek() {
            kind if kind.is_identifier_like() => PropertyName::Identifier(lexeme),
            TokenKind::StringLiteral => PropertyName::String(lexeme),
            TokenKind::NumberLiteral => PropertyName::Number(lexeme),
            TokenKind::PrivateName => PropertyName::Private(lexeme),
            TokenKind::LeftBracket => {
                let open = self.current_span();
                self.skip_balanced()?;
                let text = self.source_text(&open, &self.previous_span());
                return Some(PropertyName::Computed(text.to_string()));
            }
            _ => {
                let span = self.current_span();
                let message = format!("expected member name, found {}", self.describe_current());
                self.diagnostics.error(message, span);
                return None;
            }
        };
        self.advance();
        Some(name)
    }

    /// `<T>(params): ReturnType`; a class method body is left in place.
    fn skip_signature(&mut self, context: MemberContext) -> Option<()> {
        if self.peek() == TokenKind::Less {
            self.skip_angle_group()?;
        }
        if self.peek() != TokenKind::LeftParen {
            self.expect(TokenKind::LeftParen)?;
        }
        self.skip_balanced()?;
        if self.eat(TokenKind::Colon) {
            self.parse_type_annotation(context == MemberContext::Class)?;
        }
        Some(())
    }

    /// Parse a type up to the end of the member. `stop_at_body` ends it at a
    /// `{` that follows at least one type token (a method body).
    pub(super) fn parse_type_annotation(&mut self, stop_at_body: bool) -> Option<TypeAnnotation> {
        let start_pos = self.pos;
        let start = self.current_span();
        let mut depth: u32 = 0;
        let mut angle: u32 = 0;

        while !self.is_at_end() {
            let kind = self.peek();
            if depth == 0 && angle == 0 {
                let terminates = matches!(
                    kind,
                    TokenKind::Semicolon
                        | TokenKind::Comma
                        | TokenKind::Equal
                        | TokenKind::RightBrace
                        | TokenKind::RightParen
                        | TokenKind::RightBracket
                );
                let ends_after_type = self.pos > start_pos
                    && ((stop_at_body && kind == TokenKind::LeftBrace)
                        || self.at_implicit_semicolon());
                if terminates || ends_after_type {
                    break;
                }
            }
            match kind {
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => {
                    depth += 1
                }
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                    depth = depth.saturating_sub(1)
                }
                TokenKind::Less => angle += 1,
                TokenKind::Greater => angle = angle.saturating_sub(1),
                _ => {}
            }
            self.advance();
        }

        if self.pos == start_pos {
            let message = format!("expected type, found {}", self.describe_current());
            self.diagnostics.error(message, start);
            return None;
        }

        let end = self.previous_span();
        let kind = classify_type(&self.tokens[start_pos..self.pos]);
        Some(TypeAnnotation {
            kind,
            text: self.source_text(&start, &end).to_string(),
            span: start.merge(&end),
        })
    }

    /// Parse a property initializer expression up to the end of the member.
    fn parse_initializer(&mut self) -> Option<Initializer> {
        let start_pos = self.pos;
        let start = self.current_span();
        let mut depth: u32 = 0;

        while !self.is_at_end() {
            let kind = self.peek();
            if depth == 0 {
                let terminates = matches!(
                    kind,
                    TokenKind::Semicolon
                        | TokenKind::Comma
                        | TokenKind::RightBrace
                        | TokenKind::RightParen
                        | TokenKind::RightBracket
                );
                if terminates || (self.pos > start_pos && self.at_implicit_semicolon()) {
                    break;
                }
            }
            match kind {
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => {
                    depth += 1
                }
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            self.advance();
        }

        if self.pos == start_pos {
            let message = format!("expected initializer, found {}", self.describe_current());
            self.diagnostics.error(message, start);
            return None;
        }

        let end = self.previous_span();
        Some(Initializer {
            literal: literal_value(&self.tokens[start_pos..self.pos]),
            text: self.source_text(&start, &end).to_string(),
            span: start.merge(&end),
        })
    }

    /// Skip the rest of a member that failed to parse. Stops before the
    /// closing `}` of the body and always makes progress.
    fn recover_member(&mut self, before: usize) {
        let mut depth: u32 = 0;
        while !self.is_at_end() {
            let kind = self.peek();
            if depth == 0 {
                if kind == TokenKind::RightBrace {
                    break;
                }
                if matches!(kind, TokenKind::Semicolon | TokenKind::Comma) {
                    self.advance();
                    break;
                }
                if self.pos > before && self.at_implicit_semicolon() {
                    break;
                }
            }
            match kind {
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => {
                    depth += 1
                }
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            self.advance();
        }
        if self.pos == before && !matches!(self.peek(), TokenKind::RightBrace | TokenKind::Eof) {
            self.advance();
        }
    }
}

fn starts_property_name(kind: TokenKind) -> bool {
    kind.is_identifier_like()
        || matches!(
            kind,
            TokenKind::StringLiteral
                | TokenKind::NumberLiteral
                | TokenKind::PrivateName
                | TokenKind::LeftBracket
        )
}

/// The unquoted value of a lone string literal, optionally `as const`.
fn literal_value(tokens: &[Token]) -> Option<String> {
    let literal = match tokens {
        [single] => single,
        [single, as_kw, konst]
            if as_kw.lexeme == "as" && konst.kind == TokenKind::Const =>
        {
            single
        }
        _ => return None,
    };
    match literal.kind {
        TokenKind::StringLiteral => Some(literal.lexeme.clone()),
        TokenKind::TemplateLiteral if !literal.lexeme.contains("${") => {
            Some(literal.lexeme.clone())
        }
        _ => None,
    }
}

fn classify_type(tokens: &[Token]) -> TypeKind {
    match literal_value(tokens) {
        Some(value) => TypeKind::StringLiteral(value),
        None => TypeKind::Other,
    }
}
