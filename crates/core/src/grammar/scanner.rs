use crate::error::ErrorKind;

/// Code-point cursor over an owned byte buffer.
///
/// The cursor is not primed: call [`Scanner::advance`] once to load the first
/// code point. End of input is reported as `None` from [`Scanner::current`],
/// never as an error.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    input: Vec<u8>,
    /// Byte offset of `current`.
    offset: usize,
    /// Byte offset of the code point after `current`.
    next: usize,
    current: Option<char>,
}

impl Scanner {
    /// Create a scanner over `input`.
    pub fn new(input: impl Into<Vec<u8>>) -> Self {
        Self {
            input: input.into(),
            offset: 0,
            next: 0,
            current: None,
        }
    }

    /// Move to the next code point and return it.
    ///
    /// On a malformed UTF-8 sequence the cursor stays on the offending byte
    /// and [`ErrorKind::InvalidEncoding`] is returned.
    pub fn advance(&mut self) -> Result<Option<char>, ErrorKind> {
        self.offset = self.next;
        let rest = &self.input[self.next..];
        let Some(&lead) = rest.first() else {
            self.current = None;
            return Ok(None);
        };
        let ch = rest
            .get(..sequence_len(lead))
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
            .and_then(|s| s.chars().next());
        match ch {
            Some(c) => {
                self.next += c.len_utf8();
                self.current = Some(c);
                Ok(Some(c))
            }
            None => {
                self.current = None;
                Err(ErrorKind::InvalidEncoding)
            }
        }
    }

    /// Current code point, `None` at end of input.
    pub fn current(&self) -> Option<char> {
        self.current
    }

    /// Whether the cursor sits on `c`.
    pub fn at(&self, c: char) -> bool {
        self.current == Some(c)
    }

    /// Whether the whole buffer has been consumed.
    pub fn at_end(&self) -> bool {
        self.current.is_none()
    }

    /// Byte offset of the current code point (buffer length at end of input).
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Byte length of the current code point (0 at end of input).
    pub fn current_len(&self) -> usize {
        self.next - self.offset
    }

    /// Raw bytes from the current code point on.
    pub fn rest(&self) -> &[u8] {
        &self.input[self.offset.min(self.input.len())..]
    }

    /// The whole buffer.
    pub fn input(&self) -> &[u8] {
        &self.input
    }

    /// Move back to the start of the buffer, unprimed.
    pub fn rewind(&mut self) {
        self.offset = 0;
        self.next = 0;
        self.current = None;
    }

    /// Advance past any whitespace.
    pub fn skip_whitespace(&mut self) -> Result<(), ErrorKind> {
        while self.current.is_some_and(char::is_whitespace) {
            self.advance()?;
        }
        Ok(())
    }

    /// Consume identifier characters and return them (possibly empty).
    pub fn identifier(&mut self) -> Result<String, ErrorKind> {
        let mut ident = String::new();
        while let Some(c) = self.current.filter(|c| is_ident_char(*c)) {
            ident.push(c);
            self.advance()?;
        }
        Ok(ident)
    }
}

/// Expected byte length of a UTF-8 sequence from its lead byte; 0 for bytes
/// that cannot start a sequence.
fn sequence_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 0,
    }
}

/// Characters that may start an identifier.
pub fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Characters that may continue an identifier.
pub fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}
