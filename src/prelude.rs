//! # evmscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the evmscope library.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all evmscope operations
pub use crate::Error;

/// The result type used throughout evmscope
pub use crate::Result;

/// 256-bit operand type
pub use crate::U256;

// ================================================================================================
// Input
// ================================================================================================

/// Validated bytecode and the cursor over it
pub use crate::{Bytecode, Parser};

/// Bytecode sources
pub use crate::source::{BlockTag, BytecodeSource, ChainConfig, ChainSource, FileSource};

// ================================================================================================
// Decoding
// ================================================================================================

/// Main entry point and its output
pub use crate::{Disassembler, Instruction};

/// Opcode metadata
pub use crate::disassembler::{OpcodeDefinition, OpcodeTable};

/// Instruction analysis helpers
pub use crate::disassembler::{InstructionCategory, StackBehavior};

/// Decoder configuration
pub use crate::disassembler::{DecoderConfig, TruncationPolicy};
