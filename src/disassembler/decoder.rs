//! EVM instruction decoding.
//!
//! Decoding is a single linear pass: read an opcode byte, resolve it in the
//! [`crate::disassembler::OpcodeTable`], read the immediate operand it declares, stamp the
//! program counter and advance by the instruction size. The pass is a pure function of the input
//! bytes and the table.
//!
//! # Example: Decoding a Single Instruction
//!
//! ```rust
//! use evmscope::{disassembler::{decode_instruction, OpcodeTable}, Parser};
//!
//! let code = [0x60, 0x80]; // PUSH1 0x80
//! let mut parser = Parser::new(&code);
//! let instr = decode_instruction(&mut parser, OpcodeTable::standard(), 0)?;
//! assert_eq!(instr.mnemonic, "PUSH1");
//! assert_eq!(instr.size(), 2);
//! # Ok::<(), evmscope::Error>(())
//! ```
//!
//! # Example: Decoding Lazily
//!
//! ```rust
//! use evmscope::Disassembler;
//!
//! let code = [0x60, 0x80, 0x60, 0x40, 0x52];
//! let disassembler = Disassembler::new();
//! for instruction in disassembler.decode(&code) {
//!     println!("{}", instruction?);
//! }
//! # Ok::<(), evmscope::Error>(())
//! ```

use std::iter::FusedIterator;

use log::{debug, warn};
use rayon::prelude::*;

use crate::{
    disassembler::{DecoderConfig, Instruction, OpcodeTable, TruncationPolicy},
    Bytecode, Error, Parser, Result,
};

/// Position of a [`Decoder`] in its pass.
#[derive(Debug)]
enum State {
    /// Between instructions, the pc is valid
    Scanning,
    /// One instruction resolved and waiting to be yielded
    Emitting(Instruction),
    /// Stream exhausted or pass failed
    Done,
}

/// A lazy decode pass over a byte slice.
///
/// Yields `Ok(instruction)` in strictly increasing pc order. A failure is yielded once as `Err`
/// and ends the sequence; with [`TruncationPolicy::Stop`] a truncated trailing operand ends the
/// sequence without an error instead.
#[derive(Debug)]
pub struct Decoder<'a> {
    parser: Parser<'a>,
    table: &'a OpcodeTable,
    config: DecoderConfig,
    pc: usize,
    state: State,
}

impl<'a> Decoder<'a> {
    /// Create a decoder positioned at pc 0.
    ///
    /// ## Arguments
    /// * 'data'    - The bytecode to decode
    /// * 'table'   - The opcode table used to resolve opcodes
    /// * 'config'  - Truncation handling
    #[must_use]
    pub fn new(data: &'a [u8], table: &'a OpcodeTable, config: DecoderConfig) -> Self {
        Decoder {
            parser: Parser::new(data),
            table,
            config,
            pc: 0,
            state: State::Scanning,
        }
    }

    /// The pc of the next instruction to be resolved.
    #[must_use]
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Returns `true` once the pass has ended.
    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self.state, State::Done)
    }

    /// Resolve the next instruction. `None` means the pass is over.
    fn scan(&mut self) -> Option<Result<Instruction>> {
        if !self.parser.has_more_data() {
            return None;
        }

        match decode_instruction(&mut self.parser, self.table, self.pc) {
            Ok(instruction) => {
                self.pc += instruction.size();
                Some(Ok(instruction))
            }
            Err(Error::TruncatedOperand {
                pc,
                mnemonic,
                expected,
                available,
                ..
            }) if self.config.truncation == TruncationPolicy::Stop => {
                warn!(
                    "dropping truncated {mnemonic} at pc 0x{pc:04x} ({available} of {expected} operand bytes)"
                );
                None
            }
            Err(err) => Some(Err(err)),
        }
    }
}

impl Iterator for Decoder<'_> {
    type Item = Result<Instruction>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match std::mem::replace(&mut self.state, State::Done) {
                State::Done => return None,
                State::Scanning => match self.scan()? {
                    Ok(instruction) => self.state = State::Emitting(instruction),
                    Err(err) => return Some(Err(err)),
                },
                State::Emitting(instruction) => {
                    self.state = State::Scanning;
                    return Some(Ok(instruction));
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.state {
            State::Done => (0, Some(0)),
            // Every instruction consumes at least one byte; a pending one adds itself
            State::Scanning => (0, Some(self.parser.remaining())),
            State::Emitting(_) => (1, Some(self.parser.remaining() + 1)),
        }
    }
}

impl FusedIterator for Decoder<'_> {}

/// Decodes a single EVM instruction from the current parser position.
///
/// The opcode byte is resolved in `table`; an opcode without entry becomes a `MISSING`
/// instruction of size 1. The parser is left positioned after the instruction.
///
/// # Arguments
///
/// * `parser` - A mutable parser positioned at an opcode byte
/// * `table` - The opcode table
/// * `pc` - The program counter assigned to the instruction
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if the parser is exhausted, or
/// [`crate::Error::TruncatedOperand`] if the operand is incomplete.
pub fn decode_instruction(
    parser: &mut Parser,
    table: &OpcodeTable,
    pc: usize,
) -> Result<Instruction> {
    let opcode = parser.read_u8()?;

    let mut instruction = match table.get(opcode) {
        Some(def) => Instruction::from_definition(def),
        None => {
            debug!("unknown opcode 0x{opcode:02x} at pc 0x{pc:04x}");
            Instruction::missing(opcode)
        }
    };

    instruction.pc = Some(pc);
    instruction.parse_operand(parser)?;

    Ok(instruction)
}

/// Decodes a complete byte slice into instructions.
///
/// # Errors
///
/// Returns [`crate::Error::TruncatedOperand`] if the final operand is incomplete and
/// `config.truncation` is [`TruncationPolicy::Error`].
pub fn decode_stream(
    data: &[u8],
    table: &OpcodeTable,
    config: DecoderConfig,
) -> Result<Vec<Instruction>> {
    Decoder::new(data, table, config).collect()
}

/// Joins the text form of `instructions`, one per line, with a trailing newline per line.
#[must_use]
pub fn listing(instructions: &[Instruction]) -> String {
    let mut text = String::new();
    for instruction in instructions {
        text.push_str(&instruction.render());
        text.push('\n');
    }
    text
}

/// Entry point binding an opcode table and a decoder configuration.
///
/// # Examples
///
/// ```rust
/// use evmscope::Disassembler;
///
/// let instructions = Disassembler::new().disassemble("0x6080604052")?;
/// let lines: Vec<String> = instructions.iter().map(ToString::to_string).collect();
/// assert_eq!(lines, ["0000: PUSH1     0x80", "0002: PUSH1     0x40", "0004: MSTORE   "]);
/// # Ok::<(), evmscope::Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Disassembler<'t> {
    table: &'t OpcodeTable,
    config: DecoderConfig,
}

impl Disassembler<'static> {
    /// Disassembler over the standard table with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Disassembler::with_table(OpcodeTable::standard())
    }
}

impl Default for Disassembler<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'t> Disassembler<'t> {
    /// Disassembler over a custom table.
    #[must_use]
    pub fn with_table(table: &'t OpcodeTable) -> Self {
        Disassembler {
            table,
            config: DecoderConfig::default(),
        }
    }

    /// Replace the decoder configuration.
    #[must_use]
    pub fn with_config(mut self, config: DecoderConfig) -> Self {
        self.config = config;
        self
    }

    /// The opcode table in use.
    #[must_use]
    pub fn table(&self) -> &'t OpcodeTable {
        self.table
    }

    /// The decoder configuration in use.
    #[must_use]
    pub fn config(&self) -> DecoderConfig {
        self.config
    }

    /// Start a lazy decode pass over raw bytes.
    pub fn decode<'a>(&self, data: &'a [u8]) -> Decoder<'a>
    where
        't: 'a,
    {
        Decoder::new(data, self.table, self.config)
    }

    /// Decode raw bytes into a list.
    ///
    /// # Errors
    /// See [`decode_stream`].
    pub fn decode_bytes(&self, data: &[u8]) -> Result<Vec<Instruction>> {
        decode_stream(data, self.table, self.config)
    }

    /// Decode a `0x`-prefixed hex string into a list.
    ///
    /// # Errors
    /// Returns [`crate::Error::MalformedHex`] for invalid input, before any decoding, or the
    /// errors of [`decode_stream`].
    pub fn disassemble(&self, hex: &str) -> Result<Vec<Instruction>> {
        let code = Bytecode::from_hex(hex)?;
        let instructions = self.decode_bytes(code.as_bytes())?;
        debug!(
            "decoded {} instructions from {} bytes",
            instructions.len(),
            code.len()
        );
        Ok(instructions)
    }

    /// Decode several independent hex inputs in parallel.
    ///
    /// Results are returned in input order; one failing input does not affect the others.
    pub fn disassemble_batch<S>(&self, inputs: &[S]) -> Vec<Result<Vec<Instruction>>>
    where
        S: AsRef<str> + Sync,
    {
        inputs
            .par_iter()
            .map(|hex| self.disassemble(hex.as_ref()))
            .collect()
    }
}
