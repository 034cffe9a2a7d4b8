//! Typed parse errors.
//!
//! Every grammar step returns `Result<_, ErrorKind>`; the parser attaches the
//! scanner position when the error crosses the [`Parser::parse`] boundary and
//! keeps the first one as its sticky error.
//!
//! [`Parser::parse`]: crate::grammar::parser::Parser::parse

use std::collections::BTreeMap;

use goml_diagnostics::{Diagnostic, LineIndex, Span, codes};
use thiserror::Error;

/// Malformed tag structure.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElementError {
    /// Input ended inside a tag.
    #[error("input ends inside a tag")]
    Incomplete,
    /// `/` not directly followed by `>`.
    #[error("expected `>` after `/`")]
    AfterSlash,
    /// Something other than whitespace, `/` or `>` after an element name.
    #[error("unexpected character after element name")]
    AfterIdent,
    /// No identifier where an element or attribute name must start.
    #[error("expected an identifier")]
    Identifier,
    /// Closing tag without a matching open element.
    #[error("closing tag has no matching open element")]
    ExtraClosure,
    /// Elements nested deeper than [`MAX_DEPTH`](crate::MAX_DEPTH).
    #[error("elements are nested more than {} levels deep", crate::MAX_DEPTH)]
    TooDeep,
}

/// Malformed attribute.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeError {
    /// Unexpected character directly after an attribute name.
    #[error("expected `=`, whitespace, `/` or `>` after attribute name")]
    Assignment,
    /// Input ended right after `=`.
    #[error("input ends before the attribute value")]
    Incomplete,
    /// Value does not start with `"`, `[` or `{`.
    #[error("attribute value must start with `\"`, `[` or `{{`")]
    ValueStart,
    /// Padding or doubled separator inside a list.
    #[error("list values are separated by exactly one space")]
    ExtraSpace,
    /// List never closed.
    #[error("list is missing its closing `]`")]
    ListIncomplete,
    /// Unexpected character between list values.
    #[error("unexpected character between list values")]
    BetweenByte,
}

/// Misuse of prefab definitions or placeholders.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrefabError {
    /// `<!name ...>` carries attributes.
    #[error("prefab definitions cannot carry attributes")]
    Attributes,
    /// A prefab with this name already exists.
    #[error("prefab `{0}` is already defined")]
    Shadow(String),
    /// Placeholder outside of a prefab definition.
    #[error("placeholder used outside of a prefab definition")]
    Outside,
    /// Placeholder name is empty or not closed by `}`.
    #[error("malformed placeholder identifier")]
    Ident,
}

/// Malformed escape sequence inside a string.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EscapeError {
    /// A digit that is not valid for the escape's base.
    #[error("illegal digit in escape sequence")]
    Illegal,
    /// Input or string ended inside the escape.
    #[error("incomplete escape sequence")]
    Incomplete,
    /// Value out of range for the escape.
    #[error("escape value out of range")]
    Overflow,
    /// Unknown escape character.
    #[error("unknown escape character")]
    InvalidIdent,
}

/// What went wrong, without position.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// Tag structure error.
    #[error(transparent)]
    Element(#[from] ElementError),
    /// Attribute error.
    #[error(transparent)]
    Attribute(#[from] AttributeError),
    /// Prefab error.
    #[error(transparent)]
    Prefab(#[from] PrefabError),
    /// Escape error.
    #[error(transparent)]
    Escape(#[from] EscapeError),
    /// Element name is neither defined nor a prefab.
    #[error("unknown element `{0}`")]
    Unknown(String),
    /// String literal not terminated before end of input.
    #[error("string is not terminated")]
    StringNotTerminated,
    /// Input is not valid UTF-8.
    #[error("invalid UTF-8 sequence")]
    InvalidEncoding,
}

impl ErrorKind {
    /// Stable diagnostic code for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Element(e) => match e {
                ElementError::Incomplete => codes::ELEMENT_INCOMPLETE,
                ElementError::AfterSlash => codes::ELEMENT_AFTER_SLASH,
                ElementError::AfterIdent => codes::ELEMENT_AFTER_IDENT,
                ElementError::Identifier => codes::ELEMENT_IDENTIFIER,
                ElementError::ExtraClosure => codes::ELEMENT_EXTRA_CLOSURE,
                ElementError::TooDeep => codes::ELEMENT_TOO_DEEP,
            },
            ErrorKind::Attribute(e) => match e {
                AttributeError::Assignment => codes::ATTRIBUTE_ASSIGNMENT,
                AttributeError::Incomplete => codes::ATTRIBUTE_INCOMPLETE,
                AttributeError::ValueStart => codes::ATTRIBUTE_VALUE_START,
                AttributeError::ExtraSpace => codes::ATTRIBUTE_EXTRA_SPACE,
                AttributeError::ListIncomplete => codes::ATTRIBUTE_LIST_INCOMPLETE,
                AttributeError::BetweenByte => codes::ATTRIBUTE_BETWEEN_BYTE,
            },
            ErrorKind::Prefab(e) => match e {
                PrefabError::Attributes => codes::PREFAB_ATTRIBUTES,
                PrefabError::Shadow(_) => codes::PREFAB_SHADOW,
                PrefabError::Outside => codes::PREFAB_OUTSIDE,
                PrefabError::Ident => codes::PREFAB_IDENT,
            },
            ErrorKind::Escape(e) => match e {
                EscapeError::Illegal => codes::ESCAPE_ILLEGAL,
                EscapeError::Incomplete => codes::ESCAPE_INCOMPLETE,
                EscapeError::Overflow => codes::ESCAPE_OVERFLOW,
                EscapeError::InvalidIdent => codes::ESCAPE_INVALID_IDENT,
            },
            ErrorKind::Unknown(_) => codes::UNKNOWN_IDENTIFIER,
            ErrorKind::StringNotTerminated => codes::STRING_NOT_TERMINATED,
            ErrorKind::InvalidEncoding => codes::INVALID_ENCODING,
        }
    }
}

/// A positioned parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at byte {}", .span.start)]
pub struct ParseError {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Bytes of the character the scanner stopped on (empty at end of input).
    pub span: Span,
    /// Lossy excerpt of the input starting at `span.start`.
    pub window: String,
}

impl ParseError {
    /// Stable diagnostic code.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Convert into a [`Diagnostic`], adding 1-based `line`/`column` context
    /// computed from `index`.
    pub fn to_diagnostic(&self, index: &LineIndex) -> Diagnostic {
        let (line, col) = index.line_col(self.span.start);
        let mut ctx = BTreeMap::from([
            ("line".to_string(), (line + 1).to_string()),
            ("column".to_string(), (col + 1).to_string()),
        ]);
        if !self.window.is_empty() {
            ctx.insert("near".into(), self.window.clone());
        }
        match &self.kind {
            ErrorKind::Unknown(name) => {
                ctx.insert("element".into(), name.clone());
            }
            ErrorKind::Prefab(PrefabError::Shadow(name)) => {
                ctx.insert("prefab".into(), name.clone());
            }
            _ => {}
        }
        Diagnostic::error(self.code(), self.kind.to_string(), Some(self.span)).with_context(ctx)
    }
}
