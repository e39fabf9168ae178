//! Bytecode sources.
//!
//! A source produces the `0x`-prefixed hex text that [`crate::Disassembler::disassemble`]
//! consumes. Sources are the only part of the crate that performs I/O; their errors are passed
//! through as distinct [`crate::Error`] variants and never retried.
//!
//! - [`FileSource`] - Reads a UTF-8 text file
//! - [`ChainSource`] - Fetches deployed code from a JSON-RPC node with `eth_getCode`
//!
//! # Examples
//!
//! ```rust,no_run
//! use evmscope::{source::{BytecodeSource, FileSource}, Disassembler};
//!
//! let source = FileSource::new("contract.txt");
//! let code = source.load_bytecode()?;
//! let instructions = Disassembler::new().decode_bytes(code.as_bytes())?;
//! # Ok::<(), evmscope::Error>(())
//! ```

mod chain;
mod file;

pub use chain::{to_checksum_address, BlockTag, ChainConfig, ChainSource, DEFAULT_TIMEOUT};
pub use file::FileSource;

use crate::{Bytecode, Result};

/// Anything that can produce bytecode as hex text.
pub trait BytecodeSource {
    /// Short description of where the code comes from, used in log and error messages.
    fn describe(&self) -> String;

    /// Retrieve the raw hex text.
    ///
    /// # Errors
    /// Returns the source's I/O, configuration or provider error.
    fn load(&self) -> Result<String>;

    /// Retrieve and validate the bytecode.
    ///
    /// # Errors
    /// Returns the errors of [`BytecodeSource::load`], or [`crate::Error::MalformedHex`] if the
    /// text is not valid hex.
    fn load_bytecode(&self) -> Result<Bytecode> {
        Bytecode::from_hex(&self.load()?)
    }
}
