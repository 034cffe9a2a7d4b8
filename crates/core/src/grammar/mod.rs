/// Element tree types.
pub mod ast;
/// String literal and text decoding.
pub mod decoder;
/// JSON serialization helpers for the tree.
pub mod dump;
/// goml emitter: converts a tree back to formatted markup.
pub mod emit;
/// goml parser: builds the element tree and captures prefabs.
pub mod parser;
/// Prefab instantiation.
pub mod prefab;
/// UTF-8 code point scanner.
pub mod scanner;
