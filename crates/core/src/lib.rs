//! goml core library.
//!
//! Parses goml markup into an element tree, expanding prefab templates
//! (`<!name> ... <!/>`) as their usage tags are met. The main entry points
//! are [`Parser`] for repeated parsing against a shared registry,
//! [`parse_with_definitions`] for one-shot parsing with diagnostics, and
//! [`emit_document`] for formatted output.

#![warn(missing_docs)]

/// Typed parse errors.
pub mod error;
/// goml grammar: scanner, decoder, parser, prefab engine, and emitter.
pub mod grammar;
/// LIFO helper used by the parser.
pub mod stack;

// ── Convenience re-exports ──────────────────────────────────────────────────
// Flat imports for the most common entry points. The full module paths
// remain available for less common types.

// Parser
pub use grammar::parser::{MAX_DEPTH, ParseResult, Parser, parse_with_definitions};

// Tree
pub use grammar::ast::{Attributes, Element, ROOT, SlotPosition, SlotRecord, TEXT};

// Errors
pub use error::{AttributeError, ElementError, ErrorKind, EscapeError, ParseError, PrefabError};

// Emitter
pub use grammar::emit::{EmitConfig, Indent, emit_document, emit_goml, emit_prefab, emit_prefabs};

// Diagnostics (re-exported from the diagnostics crate)
pub use goml_diagnostics::{Diagnostic, Severity, Span, codes};

// Serialization helpers
pub use grammar::dump::to_pretty_json;
