//! Owned EVM bytecode and hex conversion.
//!
//! Every input to the decoder, whether typed on the command line, read from a file or returned by
//! a node, arrives as a `0x`-prefixed hex string. [`Bytecode`] validates that text once and owns
//! the resulting bytes; decoding then works on a plain byte slice through
//! [`crate::bytecode::parser::Parser`].
//!
//! Accepted input:
//! - a `0x` or `0X` prefix, which is mandatory
//! - an even number of hex digits in either case (zero digits is valid, empty code)
//! - leading and trailing whitespace, which is ignored (files usually end with a newline)
//!
//! # Examples
//!
//! ```rust
//! use evmscope::Bytecode;
//!
//! let code = Bytecode::from_hex("0x6080604052\n")?;
//! assert_eq!(code.as_bytes(), &[0x60, 0x80, 0x60, 0x40, 0x52]);
//! assert_eq!(code.to_string(), "0x6080604052");
//! # Ok::<(), evmscope::Error>(())
//! ```

pub mod parser;

use std::fmt;

use crate::Result;

/// Validated, owned bytecode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bytecode {
    data: Vec<u8>,
}

impl Bytecode {
    /// Parse a `0x`-prefixed hex string.
    ///
    /// # Errors
    /// Returns [`crate::Error::MalformedHex`] if the prefix is missing, the digit count is odd,
    /// or a character is not a hex digit.
    pub fn from_hex(text: &str) -> Result<Self> {
        let text = text.trim();
        let Some(digits) = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
        else {
            return Err(malformed_hex!("missing 0x prefix"));
        };

        let data = hex::decode(digits).map_err(|err| match err {
            hex::FromHexError::InvalidHexCharacter { c, index } => {
                malformed_hex!("invalid character {:?} at position {}", c, index + 2)
            }
            hex::FromHexError::OddLength => {
                malformed_hex!("odd number of hex digits ({})", digits.len())
            }
            other => malformed_hex!(other),
        })?;

        Ok(Bytecode { data })
    }

    /// Wrap raw bytes.
    #[must_use]
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Bytecode { data }
    }

    /// The raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume and return the raw bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Number of bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` for empty code (`0x`).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl AsRef<[u8]> for Bytecode {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl From<Vec<u8>> for Bytecode {
    fn from(data: Vec<u8>) -> Self {
        Bytecode { data }
    }
}

impl fmt::Display for Bytecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.data))
    }
}
