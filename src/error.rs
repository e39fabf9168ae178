use thiserror::Error;

macro_rules! malformed_hex {
    // Single string version
    ($msg:expr) => {
        crate::Error::MalformedHex {
            message: $msg.to_string(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::MalformedHex {
            message: format!($fmt, $($arg)*),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Decoding itself has exactly two failure modes, malformed hex input and a truncated
/// operand. Unknown opcodes are not errors; they decode to a `MISSING` instruction. The
/// remaining variants belong to the bytecode sources and are passed through unchanged.
///
/// # Error Categories
///
/// ## Decoding Errors
/// - [`Error::MalformedHex`] - Input is not `0x`-prefixed, even-length hex
/// - [`Error::TruncatedOperand`] - The stream ended inside an instruction's operand
/// - [`Error::OutOfBounds`] - Low-level cursor over-read
/// - [`Error::InvalidDefinition`] - A custom opcode table could not be built
///
/// ## Source Errors
/// - [`Error::FileError`] - Filesystem I/O errors
/// - [`Error::Utf8`] - A bytecode file was not valid UTF-8
/// - [`Error::InvalidAddress`] - A chain address could not be parsed
/// - [`Error::Config`] - Missing or unusable source configuration
/// - [`Error::Provider`] - Transport or JSON-RPC failure
///
/// # Examples
///
/// ```rust
/// use evmscope::{Disassembler, Error};
///
/// match Disassembler::new().disassemble("0x60") {
///     Err(Error::TruncatedOperand { pc, expected, available, .. }) => {
///         assert_eq!((pc, expected, available), (0, 1, 0));
///     }
///     other => panic!("unexpected result: {other:?}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    // Decoding errors
    /// The input is not a valid `0x`-prefixed hex string of whole bytes.
    ///
    /// Raised before any decoding begins, for a missing prefix, an odd number of digits or a
    /// character outside `[0-9a-fA-F]`.
    #[error("Malformed hex - {message}")]
    MalformedHex {
        /// The message to be printed for the MalformedHex error
        message: String,
    },

    /// The byte stream ended before an instruction's declared operand bytes were available.
    ///
    /// This is terminal for the decode pass under the default truncation policy.
    ///
    /// # Fields
    ///
    /// * `pc` - Offset of the opcode byte whose operand is incomplete
    /// * `opcode` - The opcode value
    /// * `mnemonic` - The opcode's mnemonic
    /// * `expected` - Operand bytes the opcode declares
    /// * `available` - Operand bytes that were left in the stream
    #[error("Truncated operand - {mnemonic} (0x{opcode:02x}) at pc 0x{pc:04x} expects {expected} operand bytes, {available} available")]
    TruncatedOperand {
        /// Offset of the opcode byte
        pc: usize,
        /// The opcode value
        opcode: u8,
        /// The opcode's mnemonic
        mnemonic: &'static str,
        /// Number of operand bytes the opcode declares
        expected: usize,
        /// Number of bytes that were left
        available: usize,
    },

    /// An out of bound access was attempted on the byte cursor.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// A custom opcode definition list could not be turned into a table.
    #[error("Invalid opcode definition - {0}")]
    InvalidDefinition(String),

    // Source errors
    /// File I/O error.
    ///
    /// Wraps standard I/O errors that can occur while reading a bytecode file.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// A bytecode file did not contain valid UTF-8 text.
    #[error("{0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The supplied account address is not 20 bytes of hex.
    #[error("Invalid address - {0}")]
    InvalidAddress(String),

    /// A bytecode source is missing required configuration, such as a node endpoint.
    #[error("Configuration error - {0}")]
    Config(String),

    /// The JSON-RPC endpoint could not be reached or answered with an error.
    #[error("Provider error - {0}")]
    Provider(String),
}
