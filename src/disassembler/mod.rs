//! EVM disassembler and instruction decoding engine.
//!
//! This module turns raw EVM bytecode into a linear list of instructions. It holds the opcode
//! metadata table, the instruction record with its text form, and the decoder that walks the byte
//! stream one opcode at a time.
//!
//! # Key Types
//! - [`OpcodeTable`] - Byte-indexed opcode metadata, with a shared [`OpcodeTable::standard`] set
//! - [`Instruction`] - A decoded instruction, or the `MISSING` sentinel for an unknown opcode
//! - [`Decoder`] - Lazy iterator over the instructions of a byte slice
//! - [`Disassembler`] - Table and configuration bound together, the usual entry point
//!
//! # Main Functions
//! - [`decode_instruction`] - Decode a single instruction
//! - [`decode_stream`] - Decode a complete byte slice
//! - [`listing`] - Render instructions as text, one per line
//!
//! # Example
//! ```rust
//! use evmscope::disassembler::{decode_stream, DecoderConfig, OpcodeTable};
//!
//! let code = &[0x60, 0x80, 0x60, 0x40, 0x52]; // PUSH1 0x80, PUSH1 0x40, MSTORE
//! let instructions = decode_stream(code, OpcodeTable::standard(), DecoderConfig::default())?;
//! assert_eq!(instructions[2].to_string(), "0004: MSTORE   ");
//! # Ok::<(), evmscope::Error>(())
//! ```

mod config;
mod decoder;
mod instruction;
mod instructions;

pub use config::{DecoderConfig, TruncationPolicy};
pub use decoder::{decode_instruction, decode_stream, listing, Decoder, Disassembler};
pub use instruction::{Instruction, InstructionCategory, StackBehavior, MNEMONIC_WIDTH};
pub use instructions::*;
