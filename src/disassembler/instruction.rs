//! Decoded EVM instruction representation.
//!
//! An [`Instruction`] is a self-contained record: it copies every field it needs out of the
//! [`crate::disassembler::OpcodeDefinition`] that produced it, so instructions outlive the table
//! and never observe later changes to it. Unknown opcodes use the same record with the `MISSING`
//! sentinel definition instead of a separate type.
//!
//! # Text form
//!
//! [`Instruction`]'s `Display` implementation produces the classic listing line:
//!
//! ```text
//! 0060: PUSH1     0x80
//! 0062: MSTORE
//! ```
//!
//! The program counter is four lowercase hex digits (`????` when unset), the mnemonic occupies
//! exactly nine columns (padded or truncated), and the operand is printed with `2 * operand_bytes`
//! zero-padded hex digits.

use std::fmt;

use primitive_types::U256;
use strum::{Display, EnumCount, EnumIter};

use crate::{
    disassembler::instructions::{OpcodeDefinition, MAX_OPERAND_BYTES},
    Error::{InvalidDefinition, OutOfBounds, TruncatedOperand},
    Parser, Result,
};

/// Column width of the mnemonic in the text form.
pub const MNEMONIC_WIDTH: usize = 9;

/// Stack effect of an instruction.
///
/// Informational only. The decoder does not simulate the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StackBehavior {
    /// Number of items popped from stack
    pub pops: u8,
    /// Number of items pushed to stack
    pub pushes: u8,
    /// Net effect on stack depth (pushes - pops)
    pub net_effect: i16,
}

impl StackBehavior {
    /// Build from pop and push counts.
    #[must_use]
    pub fn new(pops: u8, pushes: u8) -> Self {
        StackBehavior {
            pops,
            pushes,
            net_effect: i16::from(pushes) - i16::from(pops),
        }
    }
}

/// Functional grouping of opcodes, following the opcode ranges of the instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumCount)]
pub enum InstructionCategory {
    /// Stop and arithmetic (0x00 - 0x0f)
    Arithmetic,
    /// Comparison and bitwise logic (0x10 - 0x1f)
    #[strum(to_string = "Comparison/Bitwise")]
    ComparisonBitwise,
    /// Keccak-256 (0x20 - 0x2f)
    Hashing,
    /// Environmental information (0x30 - 0x3f)
    Environment,
    /// Block information (0x40 - 0x4f)
    Block,
    /// Stack, memory, storage and flow (0x50 - 0x5e)
    #[strum(to_string = "Stack/Memory/Flow")]
    StackMemoryFlow,
    /// `PUSH0` - `PUSH32` (0x5f - 0x7f)
    Push,
    /// `DUP1` - `DUP16` (0x80 - 0x8f)
    Dup,
    /// `SWAP1` - `SWAP16` (0x90 - 0x9f)
    Swap,
    /// `LOG0` - `LOG4` (0xa0 - 0xaf)
    Log,
    /// Calls, creation, return and halting (0xf0 - 0xff)
    System,
    /// Opcode without a table entry, or in an unassigned range
    Unknown,
}

impl InstructionCategory {
    /// Category of an opcode byte.
    #[must_use]
    pub fn of(opcode: u8) -> Self {
        match opcode {
            0x00..=0x0f => InstructionCategory::Arithmetic,
            0x10..=0x1f => InstructionCategory::ComparisonBitwise,
            0x20..=0x2f => InstructionCategory::Hashing,
            0x30..=0x3f => InstructionCategory::Environment,
            0x40..=0x4f => InstructionCategory::Block,
            0x50..=0x5e => InstructionCategory::StackMemoryFlow,
            0x5f..=0x7f => InstructionCategory::Push,
            0x80..=0x8f => InstructionCategory::Dup,
            0x90..=0x9f => InstructionCategory::Swap,
            0xa0..=0xaf => InstructionCategory::Log,
            0xf0..=0xff => InstructionCategory::System,
            _ => InstructionCategory::Unknown,
        }
    }
}

/// One decoded instruction.
///
/// # Examples
///
/// ```rust
/// use evmscope::{disassembler::{Instruction, OpcodeTable}, Parser, U256};
///
/// let table = OpcodeTable::standard();
/// let mut instruction = Instruction::from_definition(table.get(0x61).unwrap());
///
/// let mut parser = Parser::new(&[0x01, 0x02]);
/// instruction.parse_operand(&mut parser)?;
///
/// assert_eq!(instruction.size(), 3);
/// assert_eq!(instruction.operand, Some(U256::from(0x0102)));
/// assert_eq!(instruction.to_string(), "????: PUSH2     0x0102");
/// # Ok::<(), evmscope::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Instruction {
    /// Offset of the opcode byte, assigned by the decoder
    pub pc: Option<usize>,
    /// The opcode byte
    pub opcode: u8,
    /// Mnemonic, or `MISSING` for an unknown opcode
    pub mnemonic: &'static str,
    /// Number of immediate bytes following the opcode
    pub operand_bytes: u8,
    /// How this instruction affects the stack
    pub stack_behavior: StackBehavior,
    /// Static gas cost
    pub gas: u32,
    /// Immediate operand, present only when `operand_bytes > 0`
    pub operand: Option<U256>,
    /// `true` when the opcode had no table entry
    pub missing: bool,
}

impl Instruction {
    /// Create an instruction from a table definition. `pc` and `operand` start unset.
    #[must_use]
    pub fn from_definition(def: &OpcodeDefinition) -> Self {
        Instruction {
            pc: None,
            opcode: def.opcode,
            mnemonic: def.name,
            operand_bytes: def.operand_bytes,
            stack_behavior: StackBehavior::new(def.pops, def.pushes),
            gas: def.gas,
            operand: None,
            missing: false,
        }
    }

    /// Create the `MISSING` sentinel for an opcode without table entry.
    #[must_use]
    pub fn missing(opcode: u8) -> Self {
        Instruction {
            missing: true,
            ..Self::from_definition(&OpcodeDefinition::missing(opcode))
        }
    }

    /// Size in bytes: the opcode plus its immediate operand.
    #[must_use]
    pub fn size(&self) -> usize {
        1 + usize::from(self.operand_bytes)
    }

    /// Consume the immediate operand from `parser`, most-significant byte first.
    ///
    /// Does nothing for instructions without operand bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedOperand`] if fewer than `operand_bytes` bytes remain. The
    /// parser is not advanced in that case and no operand is recorded.
    pub fn parse_operand(&mut self, parser: &mut Parser) -> Result<()> {
        if self.operand_bytes == 0 {
            return Ok(());
        }
        if self.operand_bytes > MAX_OPERAND_BYTES {
            return Err(InvalidDefinition(format!(
                "{} declares {} operand bytes",
                self.mnemonic, self.operand_bytes
            )));
        }

        let expected = usize::from(self.operand_bytes);
        match parser.read_bytes(expected) {
            Ok(bytes) => {
                self.operand = Some(U256::from_big_endian(bytes));
                Ok(())
            }
            Err(OutOfBounds) => Err(TruncatedOperand {
                pc: self.pc.unwrap_or_else(|| parser.pos().saturating_sub(1)),
                opcode: self.opcode,
                mnemonic: self.mnemonic,
                expected,
                available: parser.remaining(),
            }),
            Err(err) => Err(err),
        }
    }

    /// The definition this instruction was built from.
    #[must_use]
    pub fn definition(&self) -> OpcodeDefinition {
        OpcodeDefinition {
            opcode: self.opcode,
            name: self.mnemonic,
            operand_bytes: self.operand_bytes,
            pops: self.stack_behavior.pops,
            pushes: self.stack_behavior.pushes,
            gas: self.gas,
        }
    }

    /// `true` for the `MISSING` sentinel.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.missing
    }

    /// `true` for `PUSH1` - `PUSH32`.
    #[must_use]
    pub fn is_push(&self) -> bool {
        !self.missing && (0x60..=0x7f).contains(&self.opcode)
    }

    /// Functional category; always [`InstructionCategory::Unknown`] for `MISSING`.
    #[must_use]
    pub fn category(&self) -> InstructionCategory {
        if self.missing {
            InstructionCategory::Unknown
        } else {
            InstructionCategory::of(self.opcode)
        }
    }

    /// The operand as exactly `2 * operand_bytes` lowercase hex digits, without prefix.
    #[must_use]
    pub fn operand_hex(&self) -> Option<String> {
        let operand = self.operand?;
        let width = usize::from(self.operand_bytes.min(MAX_OPERAND_BYTES));

        let mut bytes = [0u8; 32];
        operand.to_big_endian(&mut bytes);
        Some(hex::encode(&bytes[32 - width..]))
    }

    /// The text form, identical to `to_string()`.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pc {
            Some(pc) => write!(f, "{pc:04x}:")?,
            None => write!(f, "????:")?,
        }

        let mnemonic: String = self.mnemonic.chars().take(MNEMONIC_WIDTH).collect();
        write!(f, " {:<width$}", mnemonic, width = MNEMONIC_WIDTH)?;

        if let Some(operand) = self.operand_hex() {
            write!(f, " 0x{operand}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{disassembler::OpcodeTable, Error};
    use strum::IntoEnumIterator;

    fn instruction(opcode: u8) -> Instruction {
        Instruction::from_definition(OpcodeTable::standard().get(opcode).unwrap())
    }

    #[test]
    fn size_follows_operand_bytes() {
        assert_eq!(instruction(0x52).size(), 1); // MSTORE
        assert_eq!(instruction(0x60).size(), 2); // PUSH1
        assert_eq!(instruction(0x7f).size(), 33); // PUSH32
        assert_eq!(Instruction::missing(0xef).size(), 1);
    }

    #[test]
    fn parse_operand_big_endian() {
        let mut push2 = instruction(0x61);
        let mut parser = Parser::new(&[0x01, 0x02, 0xff]);

        push2.parse_operand(&mut parser).unwrap();

        assert_eq!(push2.operand, Some(U256::from(0x0102)));
        assert_eq!(parser.pos(), 2);
    }

    #[test]
    fn parse_operand_push32() {
        let data: Vec<u8> = (1..=32).collect();
        let mut push32 = instruction(0x7f);
        let mut parser = Parser::new(&data);

        push32.parse_operand(&mut parser).unwrap();

        assert_eq!(push32.operand, Some(U256::from_big_endian(&data)));
        assert_eq!(
            push32.operand_hex().unwrap(),
            "0102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f20"
        );
    }

    #[test]
    fn parse_operand_no_operand() {
        let mut add = instruction(0x01);
        let mut parser = Parser::new(&[0x60]);

        add.parse_operand(&mut parser).unwrap();

        assert_eq!(add.operand, None);
        assert_eq!(parser.pos(), 0);
    }

    #[test]
    fn parse_operand_truncated() {
        let mut push3 = instruction(0x62);
        push3.pc = Some(0x10);
        let mut parser = Parser::new(&[0xaa, 0xbb]);

        match push3.parse_operand(&mut parser) {
            Err(Error::TruncatedOperand {
                pc,
                opcode,
                mnemonic,
                expected,
                available,
            }) => {
                assert_eq!(pc, 0x10);
                assert_eq!(opcode, 0x62);
                assert_eq!(mnemonic, "PUSH3");
                assert_eq!(expected, 3);
                assert_eq!(available, 2);
            }
            other => panic!("Expected TruncatedOperand, got {other:?}"),
        }
        assert_eq!(push3.operand, None);
    }

    #[test]
    fn render_with_operand() {
        let mut push1 = instruction(0x60);
        push1.pc = Some(0x60);
        push1.operand = Some(U256::from(0x80));
        assert_eq!(push1.to_string(), "0060: PUSH1     0x80");
    }

    #[test]
    fn render_pads_operand() {
        let mut push4 = instruction(0x63);
        push4.pc = Some(0x1234);
        push4.operand = Some(U256::from(0x01));
        assert_eq!(push4.render(), "1234: PUSH4     0x00000001");

        let mut push1 = instruction(0x60);
        push1.pc = Some(0);
        push1.operand = Some(U256::zero());
        assert_eq!(push1.render(), "0000: PUSH1     0x00");
    }

    #[test]
    fn render_without_operand() {
        let mut mstore = instruction(0x52);
        mstore.pc = Some(4);
        assert_eq!(mstore.to_string(), "0004: MSTORE   ");
    }

    #[test]
    fn render_truncates_long_mnemonic() {
        let mut call = instruction(0xf4);
        call.pc = Some(0xabc);
        assert_eq!(call.to_string(), "0abc: DELEGATEC");
    }

    #[test]
    fn render_unset_pc() {
        assert_eq!(instruction(0x00).to_string(), "????: STOP     ");
    }

    #[test]
    fn render_wide_pc() {
        let mut stop = instruction(0x00);
        stop.pc = Some(0x12345);
        assert_eq!(stop.to_string(), "12345: STOP     ");
    }

    #[test]
    fn missing_sentinel() {
        let mut missing = Instruction::missing(0x0c);
        missing.pc = Some(7);

        assert!(missing.is_missing());
        assert_eq!(missing.opcode, 0x0c);
        assert_eq!(missing.mnemonic, "MISSING");
        assert_eq!(missing.stack_behavior, StackBehavior::default());
        assert_eq!(missing.gas, 0);
        assert_eq!(missing.category(), InstructionCategory::Unknown);
        assert_eq!(missing.to_string(), "0007: MISSING  ");
    }

    #[test]
    fn stack_behavior_net_effect() {
        assert_eq!(instruction(0x01).stack_behavior.net_effect, -1); // ADD
        assert_eq!(instruction(0x80).stack_behavior.net_effect, 1); // DUP1
        assert_eq!(instruction(0xa4).stack_behavior.net_effect, -6); // LOG4
    }

    #[test]
    fn definition_round_trip() {
        let def = *OpcodeTable::standard().get(0x55).unwrap();
        assert_eq!(Instruction::from_definition(&def).definition(), def);
    }

    #[test]
    fn categories() {
        assert_eq!(instruction(0x01).category(), InstructionCategory::Arithmetic);
        assert_eq!(instruction(0x5f).category(), InstructionCategory::Push);
        assert_eq!(instruction(0x5b).category(), InstructionCategory::StackMemoryFlow);
        assert_eq!(instruction(0xfe).category(), InstructionCategory::System);
        assert_eq!(InstructionCategory::of(0xb0), InstructionCategory::Unknown);
        assert!(instruction(0x60).is_push());
        assert!(!instruction(0x5f).is_push());

        assert_eq!(
            InstructionCategory::ComparisonBitwise.to_string(),
            "Comparison/Bitwise"
        );
        assert_eq!(InstructionCategory::iter().count(), InstructionCategory::COUNT);
    }
}
