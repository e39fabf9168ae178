//! Low-level byte cursor for bytecode decoding.
//!
//! [`crate::bytecode::parser::Parser`] holds a borrowed byte slice and a position. Every read is
//! bounds-checked and fails with [`crate::Error::OutOfBounds`] instead of panicking, which lets the
//! decoder turn an over-read into a precise [`crate::Error::TruncatedOperand`].
//!
//! # Examples
//!
//! ```rust
//! use evmscope::Parser;
//!
//! let data = [0x61, 0x01, 0x02];
//! let mut parser = Parser::new(&data);
//!
//! assert_eq!(parser.read_u8()?, 0x61);
//! assert_eq!(parser.read_bytes(2)?, &[0x01, 0x02]);
//! assert!(!parser.has_more_data());
//! # Ok::<(), evmscope::Error>(())
//! ```

use crate::{Error::OutOfBounds, Result};

/// A cursor over a byte slice.
///
/// The parser never copies the underlying data; slices returned by
/// [`Parser::read_bytes`] borrow from the original buffer.
#[derive(Debug, Clone)]
pub struct Parser<'a> {
    /// The binary data being parsed
    data: &'a [u8],
    /// Current position within the data buffer
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`Parser`] positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Returns the length of the underlying data buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the parser has no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if there is more data available to parse.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use evmscope::Parser;
    /// let data = [0x01, 0x02];
    /// let mut parser = Parser::new(&data);
    /// assert!(parser.has_more_data());
    ///
    /// parser.read_bytes(2)?;
    /// assert!(!parser.has_more_data());
    /// # Ok::<(), evmscope::Error>(())
    /// ```
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Get the current position of the parser within the data buffer.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Number of bytes between the current position and the end of the buffer.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Get access to the underlying data buffer.
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Peek at the next byte without advancing the position.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if position is at or beyond the data length.
    pub fn peek_byte(&self) -> Result<u8> {
        if self.position >= self.data.len() {
            return Err(OutOfBounds);
        }
        Ok(self.data[self.position])
    }

    /// Read a single byte and advance by one.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if no byte is left.
    pub fn read_u8(&mut self) -> Result<u8> {
        let byte = self.peek_byte()?;
        self.position += 1;
        Ok(byte)
    }

    /// Read exactly `count` bytes and advance past them.
    ///
    /// On failure the position is left unchanged.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `count` bytes remain.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        if count > self.remaining() {
            return Err(OutOfBounds);
        }

        let start = self.position;
        self.position += count;
        Ok(&self.data[start..self.position])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_sequence() {
        let data = [0x60, 0x80, 0x60, 0x40];
        let mut parser = Parser::new(&data);

        assert_eq!(parser.len(), 4);
        assert_eq!(parser.read_u8().unwrap(), 0x60);
        assert_eq!(parser.read_bytes(1).unwrap(), &[0x80]);
        assert_eq!(parser.pos(), 2);
        assert_eq!(parser.remaining(), 2);
        assert_eq!(parser.peek_byte().unwrap(), 0x60);
        assert_eq!(parser.pos(), 2);
    }

    #[test]
    fn read_past_end() {
        let data = [0x61, 0x01];
        let mut parser = Parser::new(&data);

        parser.read_u8().unwrap();
        assert!(matches!(parser.read_bytes(2), Err(OutOfBounds)));
        // Failed reads do not move the cursor
        assert_eq!(parser.pos(), 1);
        assert_eq!(parser.read_bytes(1).unwrap(), &[0x01]);
        assert!(matches!(parser.read_u8(), Err(OutOfBounds)));
        assert!(matches!(parser.peek_byte(), Err(OutOfBounds)));
    }

    #[test]
    fn empty_buffer() {
        let parser = Parser::new(&[]);
        assert!(parser.is_empty());
        assert!(!parser.has_more_data());
        assert_eq!(parser.remaining(), 0);
    }

    #[test]
    fn zero_length_read() {
        let mut parser = Parser::new(&[]);
        assert_eq!(parser.read_bytes(0).unwrap(), &[] as &[u8]);
    }
}
