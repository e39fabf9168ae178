// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # evmscope
//!
//! [![License](https://img.shields.io/badge/license-Apache--2.0-blue.svg)](https://github.com/BinFlip/evmscope/blob/main/LICENSE-APACHE)
//!
//! A small, fast disassembler for Ethereum Virtual Machine bytecode. `evmscope` decodes a
//! `0x`-prefixed hex string into a linear list of instructions, each annotated with its program
//! counter, mnemonic and immediate operand, and renders them in the classic listing format.
//!
//! ## Features
//!
//! - **📦 Zero-copy decoding** - A bounds-checked cursor over the input bytes, no intermediate buffers
//! - **🔍 Complete opcode table** - All Cancun opcodes with operand width, stack effect and static gas
//! - **⚡ Lazy or eager** - Iterate instructions one by one or collect them into a `Vec`
//! - **🛡️ Precise errors** - Malformed input and truncated operands are reported with their position
//! - **🔗 Bytecode sources** - Read code from text files or fetch it from a JSON-RPC node
//!
//! ## Quick Start
//!
//! Add `evmscope` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! evmscope = "0.1"
//! ```
//!
//! ### Using the Prelude
//!
//! ```rust
//! use evmscope::prelude::*;
//!
//! let instructions = Disassembler::new().disassemble("0x6080604052")?;
//! for instruction in &instructions {
//!     println!("{instruction}");
//! }
//! # Ok::<(), evmscope::Error>(())
//! ```
//!
//! ### Unknown opcodes
//!
//! Bytes without an opcode assignment are not errors. They decode to a one-byte `MISSING`
//! instruction and decoding continues with the next byte:
//!
//! ```rust
//! use evmscope::Disassembler;
//!
//! let instructions = Disassembler::new().disassemble("0x0c00")?;
//! assert_eq!(instructions[0].to_string(), "0000: MISSING  ");
//! assert_eq!(instructions[1].to_string(), "0001: STOP     ");
//! # Ok::<(), evmscope::Error>(())
//! ```
//!
//! ### Fetching deployed code
//!
//! ```rust,no_run
//! use evmscope::prelude::*;
//!
//! let config = ChainConfig::from_endpoint(std::env::var("NODE_URL").ok())?;
//! let source = ChainSource::new(config, "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed")?;
//! let instructions = Disassembler::new().disassemble(&source.load()?)?;
//! println!("{}", evmscope::disassembler::listing(&instructions));
//! # Ok::<(), evmscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`bytecode`] - Hex validation, the owned [`Bytecode`] container and the [`Parser`] cursor
//! - [`disassembler`] - Opcode table, instruction model and decoder
//! - [`source`] - Bytecode retrieval from files and blockchain nodes
//! - [`Error`] and [`Result`] - Error handling

#[macro_use]
pub(crate) mod error;

#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// ```rust
/// use evmscope::prelude::*;
///
/// let code = Bytecode::from_hex("0x60016001")?;
/// let instructions = Disassembler::new().decode_bytes(code.as_bytes())?;
/// assert_eq!(instructions.len(), 2);
/// # Ok::<(), evmscope::Error>(())
/// ```
pub mod prelude;

/// Bytecode containers and low-level byte access.
///
/// [`Bytecode`] validates `0x`-prefixed hex once; [`Parser`] walks the resulting bytes.
pub mod bytecode;

/// EVM instruction decoding.
///
/// # Examples
///
/// ```rust
/// use evmscope::{disassembler::{decode_instruction, OpcodeTable}, Parser};
///
/// let bytecode = &[0x61, 0x01, 0x02]; // PUSH2 0x0102
/// let mut parser = Parser::new(bytecode);
/// let instruction = decode_instruction(&mut parser, OpcodeTable::standard(), 0)?;
///
/// println!("Mnemonic: {}", instruction.mnemonic);
/// println!("Operand: {:?}", instruction.operand_hex());
/// # Ok::<(), evmscope::Error>(())
/// ```
pub mod disassembler;

/// Where bytecode comes from.
///
/// Every source yields the same `0x`-prefixed hex text the decoder consumes.
pub mod source;

/// `evmscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
///
/// # Examples
///
/// ```rust
/// use evmscope::{Disassembler, Instruction, Result};
///
/// fn decode(hex: &str) -> Result<Vec<Instruction>> {
///     Disassembler::new().disassemble(hex)
/// }
/// # assert!(decode("0x00").is_ok());
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `evmscope` Error type
///
/// # Examples
///
/// ```rust
/// use evmscope::{Disassembler, Error};
///
/// match Disassembler::new().disassemble("0x61ff") {
///     Ok(instructions) => println!("{} instructions", instructions.len()),
///     Err(Error::TruncatedOperand { pc, mnemonic, .. }) => println!("{mnemonic} cut at {pc}"),
///     Err(Error::MalformedHex { message }) => println!("Malformed: {message}"),
///     Err(e) => println!("Error: {e}"),
/// }
/// ```
pub use error::Error;

/// Owned bytecode and the byte cursor used by the decoder.
pub use bytecode::{parser::Parser, Bytecode};

/// The decoder entry point and its output record.
pub use disassembler::{Disassembler, Instruction};

/// 256-bit unsigned integer used for operands (PUSH32 carries a full word).
pub use primitive_types::U256;
