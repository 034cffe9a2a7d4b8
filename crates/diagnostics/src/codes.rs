//! Diagnostic ID constants.
//!
//! Codes are grouped by the stage that reports them:
//! `GOML1xxx` tag structure, `GOML2xxx` attributes, `GOML3xxx` prefabs,
//! `GOML4xxx` strings and escapes, `GOML5xxx` name resolution,
//! `GOML6xxx` formatting.

// ── Tag structure ───────────────────────────────────────────────────────

/// Input ended inside a tag, after `<`, `<!`, a name or an attribute.
pub const ELEMENT_INCOMPLETE: &str = "GOML1001";
/// `/` inside a tag was not followed by `>`.
pub const ELEMENT_AFTER_SLASH: &str = "GOML1002";
/// Unexpected character after an element name.
pub const ELEMENT_AFTER_IDENT: &str = "GOML1003";
/// `<` was not followed by an element name.
pub const ELEMENT_IDENTIFIER: &str = "GOML1004";
/// A closing tag with no matching open element.
pub const ELEMENT_EXTRA_CLOSURE: &str = "GOML1005";
/// Elements nested past the parser's depth limit.
pub const ELEMENT_TOO_DEEP: &str = "GOML1006";

// ── Attributes ──────────────────────────────────────────────────────────

/// Unexpected character after an attribute name or value.
pub const ATTRIBUTE_ASSIGNMENT: &str = "GOML2001";
/// Input ended right after `=`.
pub const ATTRIBUTE_INCOMPLETE: &str = "GOML2002";
/// `=` was followed by something other than `"`, `[` or `{`.
pub const ATTRIBUTE_VALUE_START: &str = "GOML2003";
/// Extra whitespace inside a list value.
pub const ATTRIBUTE_EXTRA_SPACE: &str = "GOML2004";
/// A list value was never closed with `]`.
pub const ATTRIBUTE_LIST_INCOMPLETE: &str = "GOML2005";
/// Unexpected character between list values.
pub const ATTRIBUTE_BETWEEN_BYTE: &str = "GOML2006";

// ── Prefabs ─────────────────────────────────────────────────────────────

/// A prefab definition tag carries attributes.
pub const PREFAB_ATTRIBUTES: &str = "GOML3001";
/// A prefab name was defined twice.
pub const PREFAB_SHADOW: &str = "GOML3002";
/// A placeholder was used outside of a prefab definition.
pub const PREFAB_OUTSIDE: &str = "GOML3003";
/// A placeholder inside a prefab body has a malformed name.
pub const PREFAB_IDENT: &str = "GOML3004";

// ── Strings and escapes ─────────────────────────────────────────────────

/// A non-digit inside a numeric escape.
pub const ESCAPE_ILLEGAL: &str = "GOML4001";
/// Input ended inside an escape sequence.
pub const ESCAPE_INCOMPLETE: &str = "GOML4002";
/// A numeric escape denotes a value out of range.
pub const ESCAPE_OVERFLOW: &str = "GOML4003";
/// Unknown escape character after `\`.
pub const ESCAPE_INVALID_IDENT: &str = "GOML4004";
/// A string literal was never terminated.
pub const STRING_NOT_TERMINATED: &str = "GOML4005";
/// The input is not valid UTF-8.
pub const INVALID_ENCODING: &str = "GOML4006";

// ── Names ───────────────────────────────────────────────────────────────

/// Element name is neither a registered definition nor a prefab.
pub const UNKNOWN_IDENTIFIER: &str = "GOML5001";

// ── Formatting ──────────────────────────────────────────────────────────

/// Formatted output would not parse back to the same document.
pub const FORMAT_UNSTABLE: &str = "GOML6001";

/// Every known code paired with its long-form explanation.
pub(crate) const EXPLANATIONS: &[(&str, &str)] = &[
    (
        ELEMENT_INCOMPLETE,
        "The input ends inside a tag: after `<` or `<!`, after the element name, or among its attributes. Complete the tag with `>` or `/>`, or remove the stray bracket.",
    ),
    (
        ELEMENT_AFTER_SLASH,
        "A `/` inside a tag must be immediately followed by `>` (`<div/>`, `</>`, `<!/>`).",
    ),
    (
        ELEMENT_AFTER_IDENT,
        "After an element name only whitespace, `/` or `>` may follow.",
    ),
    (
        ELEMENT_IDENTIFIER,
        "An element name must directly follow `<` or `<!`; whitespace is not allowed there.",
    ),
    (
        ELEMENT_EXTRA_CLOSURE,
        "A closing tag was found but no matching element is open. `</>` closes the innermost element, `<!/>` the innermost prefab definition.",
    ),
    (
        ELEMENT_TOO_DEEP,
        "Elements are nested deeper than the parser accepts, counting the nodes a prefab expands into. Flatten the document.",
    ),
    (
        ATTRIBUTE_ASSIGNMENT,
        "An attribute name must be followed by `=`, whitespace, `/` or `>`, and a value by whitespace, `/` or `>`.",
    ),
    (
        ATTRIBUTE_INCOMPLETE,
        "The input ends right after `=`; an attribute value is missing.",
    ),
    (
        ATTRIBUTE_VALUE_START,
        "An attribute value must start with `\"` (string), `[` (list) or `{` (placeholder).",
    ),
    (
        ATTRIBUTE_EXTRA_SPACE,
        "List values are separated by exactly one space and may not be padded: `[\"a\" \"b\"]`.",
    ),
    (
        ATTRIBUTE_LIST_INCOMPLETE,
        "A list value was opened with `[` but never closed with `]`.",
    ),
    (
        ATTRIBUTE_BETWEEN_BYTE,
        "Inside a list only quoted strings and `{placeholder}` values are allowed, separated by single spaces.",
    ),
    (
        PREFAB_ATTRIBUTES,
        "A prefab definition `<!name>` cannot carry attributes; bindings come from the usage tag.",
    ),
    (
        PREFAB_SHADOW,
        "A prefab with this name is already defined. Clear the prefab table or choose another name.",
    ),
    (
        PREFAB_OUTSIDE,
        "`{placeholder}` values are only legal inside a `<!name> ... <!/>` definition. Write `{{` for a literal brace.",
    ),
    (
        PREFAB_IDENT,
        "A placeholder must be a non-empty identifier enclosed in braces: `{name}`.",
    ),
    (
        ESCAPE_ILLEGAL,
        "A numeric escape contains a character that is not a valid digit for its base.",
    ),
    (
        ESCAPE_INCOMPLETE,
        "The input ends inside an escape sequence.",
    ),
    (
        ESCAPE_OVERFLOW,
        "A numeric escape is out of range: octal escapes stop at \\377 and unicode escapes must name a valid code point.",
    ),
    (
        ESCAPE_INVALID_IDENT,
        "Unknown escape. Supported: \\a \\b \\v \\n \\r \\t \\f \\\\ \\\" \\NNN \\xHH \\uHHHH \\UHHHHHHHH.",
    ),
    (
        STRING_NOT_TERMINATED,
        "A string literal is missing its closing quote.",
    ),
    (
        INVALID_ENCODING,
        "The input contains a byte sequence that is not valid UTF-8.",
    ),
    (
        UNKNOWN_IDENTIFIER,
        "The element name is not a registered definition and no prefab with that name exists.",
    ),
    (
        FORMAT_UNSTABLE,
        "The document has no canonical form that parses back to the same tree. Adjacent text nodes produced by prefabs merge, empty text nodes vanish, and an element sharing its name with a prefab may be read as a usage. The file was left unchanged.",
    ),
];
