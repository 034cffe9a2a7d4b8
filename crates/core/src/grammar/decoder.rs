//! String literal and text-run decoding.
//!
//! The decoder reads from the scanner's current position up to a terminator,
//! resolving escapes and normalizing whitespace. Placeholders (`{name}`) are
//! not resolved here: in prefab mode they are reported back with the byte
//! offset where the bound value belongs, and outside prefab mode they are an
//! error.

use super::scanner::Scanner;
use crate::error::{ErrorKind, EscapeError, PrefabError};

/// Where a decoded run ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// A quoted literal closed by this character, which is consumed.
    Quote(char),
    /// Bare text between tags: stops before `<` or at end of input.
    Text,
}

impl Terminator {
    fn matches(self, c: char) -> bool {
        match self {
            Terminator::Quote(q) => c == q,
            Terminator::Text => c == '<',
        }
    }
}

/// Decoding options.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// End of the run.
    pub terminator: Terminator,
    /// Fold runs of literal whitespace into one space. For [`Terminator::Text`]
    /// a trailing run is dropped entirely.
    pub collapse: bool,
    /// Accept `{name}` placeholders (inside a prefab definition).
    pub placeholders: bool,
}

/// A decoded run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoded {
    /// Decoded text with placeholders removed.
    pub text: String,
    /// Placeholder names with the byte offset into `text` where each sits.
    pub placeholders: Vec<(String, usize)>,
}

/// Decode a run starting at the scanner's current code point.
///
/// For [`Terminator::Quote`] the opening quote must already be consumed and
/// the closing quote is consumed on success.
pub fn decode(scanner: &mut Scanner, opts: DecodeOptions) -> Result<Decoded, ErrorKind> {
    let mut out = Decoded::default();
    // A literal whitespace run waiting to be written as one space.
    let mut pending_space = false;

    loop {
        let Some(c) = scanner.current() else {
            match opts.terminator {
                Terminator::Text => break,
                Terminator::Quote(_) => return Err(ErrorKind::StringNotTerminated),
            }
        };
        if opts.terminator.matches(c) {
            if let Terminator::Quote(_) = opts.terminator {
                scanner.advance()?;
            }
            break;
        }

        let is_space = matches!(c, ' ' | '\t' | '\r' | '\n');
        if is_space {
            scanner.advance()?;
            if opts.collapse {
                pending_space = true;
            } else {
                out.text.push(' ');
            }
            continue;
        }
        if pending_space {
            out.text.push(' ');
            pending_space = false;
        }

        match c {
            '\\' => {
                scanner.advance()?;
                let ch = escape(scanner, opts.terminator)?;
                out.text.push(ch);
            }
            '{' => {
                scanner.advance()?;
                if scanner.at('{') {
                    scanner.advance()?;
                    out.text.push('{');
                } else if !opts.placeholders {
                    return Err(PrefabError::Outside.into());
                } else {
                    let name = placeholder(scanner).map_err(|e| {
                        if scanner.at_end() {
                            ErrorKind::StringNotTerminated
                        } else {
                            e
                        }
                    })?;
                    out.placeholders.push((name, out.text.len()));
                }
            }
            other => {
                scanner.advance()?;
                out.text.push(other);
            }
        }
    }

    if pending_space && opts.terminator != Terminator::Text {
        out.text.push(' ');
    }
    Ok(out)
}

/// Read `name}` after an opening `{` and return `name`.
pub(crate) fn placeholder(scanner: &mut Scanner) -> Result<String, ErrorKind> {
    let name = scanner.identifier()?;
    if name.is_empty() || !scanner.at('}') {
        return Err(PrefabError::Ident.into());
    }
    scanner.advance()?;
    Ok(name)
}

/// Decode one escape; the scanner sits on the character after `\`.
fn escape(scanner: &mut Scanner, terminator: Terminator) -> Result<char, ErrorKind> {
    let Some(c) = scanner.current() else {
        return Err(EscapeError::Incomplete.into());
    };
    let simple = match c {
        'a' => Some('\x07'),
        'b' => Some('\x08'),
        'v' => Some('\x0B'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        'f' => Some('\x0C'),
        '\\' => Some('\\'),
        '"' => Some('"'),
        _ => None,
    };
    if let Some(ch) = simple {
        scanner.advance()?;
        return Ok(ch);
    }

    let (digits, radix, max) = match c {
        '0'..='7' => (3, 8, 0o377),
        'x' => (2, 16, 0xFF),
        'u' => (4, 16, u32::from(char::MAX)),
        'U' => (8, 16, u32::from(char::MAX)),
        _ => return Err(EscapeError::InvalidIdent.into()),
    };
    if radix == 16 {
        scanner.advance()?;
    }

    let mut value: u32 = 0;
    for _ in 0..digits {
        let Some(d) = scanner.current().filter(|d| !terminator.matches(*d)) else {
            return Err(EscapeError::Incomplete.into());
        };
        let Some(digit) = d.to_digit(radix) else {
            return Err(EscapeError::Illegal.into());
        };
        value = value * radix + digit;
        scanner.advance()?;
    }
    if value > max {
        return Err(EscapeError::Overflow.into());
    }
    char::from_u32(value).ok_or_else(|| EscapeError::Overflow.into())
}
