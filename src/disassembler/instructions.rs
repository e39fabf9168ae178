//! The EVM opcode table.
//!
//! Every opcode the decoder understands is described by one [`OpcodeDefinition`]: mnemonic,
//! number of immediate operand bytes, stack effect and static gas cost. Definitions are plain data
//! in [`DEFINITIONS`], a flat list ordered by opcode value, and are indexed into an
//! [`OpcodeTable`] with one slot per byte value for O(1) lookup.
//!
//! The standard table covers the Cancun instruction set. Gas values are the static (minimum) cost
//! charged before any dynamic component such as memory expansion or cold account access; they are
//! informational only.
//!
//! # Examples
//!
//! ```rust
//! use evmscope::disassembler::OpcodeTable;
//!
//! let table = OpcodeTable::standard();
//! let push2 = table.get(0x61).unwrap();
//! assert_eq!(push2.name, "PUSH2");
//! assert_eq!(push2.operand_bytes, 2);
//!
//! // 0x0c is not assigned
//! assert!(table.get(0x0c).is_none());
//! ```

use std::sync::OnceLock;

use crate::{Error::InvalidDefinition, Result};

/// Mnemonic given to instructions whose opcode has no table entry.
pub const MISSING_MNEMONIC: &str = "MISSING";

/// Widest immediate operand an opcode may declare (`PUSH32`).
pub const MAX_OPERAND_BYTES: u8 = 32;

/// Static metadata for one opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpcodeDefinition {
    /// The opcode byte
    pub opcode: u8,
    /// Mnemonic, e.g. `PUSH1`
    pub name: &'static str,
    /// Number of immediate bytes following the opcode
    pub operand_bytes: u8,
    /// Stack items consumed
    pub pops: u8,
    /// Stack items produced
    pub pushes: u8,
    /// Static gas cost
    pub gas: u32,
}

impl OpcodeDefinition {
    /// Sentinel definition for an opcode without a table entry.
    ///
    /// Carries the raw opcode, the [`MISSING_MNEMONIC`] name and zero for every other field, so
    /// the resulting instruction always has size 1.
    #[must_use]
    pub const fn missing(opcode: u8) -> Self {
        OpcodeDefinition {
            opcode,
            name: MISSING_MNEMONIC,
            operand_bytes: 0,
            pops: 0,
            pushes: 0,
            gas: 0,
        }
    }
}

const fn op(
    opcode: u8,
    name: &'static str,
    operand_bytes: u8,
    pops: u8,
    pushes: u8,
    gas: u32,
) -> OpcodeDefinition {
    OpcodeDefinition {
        opcode,
        name,
        operand_bytes,
        pops,
        pushes,
        gas,
    }
}

/// The standard EVM definitions, ordered by opcode.
pub const DEFINITIONS: &[OpcodeDefinition] = &[
    // Stop and arithmetic
    op(0x00, "STOP", 0, 0, 0, 0),
    op(0x01, "ADD", 0, 2, 1, 3),
    op(0x02, "MUL", 0, 2, 1, 5),
    op(0x03, "SUB", 0, 2, 1, 3),
    op(0x04, "DIV", 0, 2, 1, 5),
    op(0x05, "SDIV", 0, 2, 1, 5),
    op(0x06, "MOD", 0, 2, 1, 5),
    op(0x07, "SMOD", 0, 2, 1, 5),
    op(0x08, "ADDMOD", 0, 3, 1, 8),
    op(0x09, "MULMOD", 0, 3, 1, 8),
    op(0x0a, "EXP", 0, 2, 1, 10),
    op(0x0b, "SIGNEXTEND", 0, 2, 1, 5),

    // Comparison and bitwise logic
    op(0x10, "LT", 0, 2, 1, 3),
    op(0x11, "GT", 0, 2, 1, 3),
    op(0x12, "SLT", 0, 2, 1, 3),
    op(0x13, "SGT", 0, 2, 1, 3),
    op(0x14, "EQ", 0, 2, 1, 3),
    op(0x15, "ISZERO", 0, 1, 1, 3),
    op(0x16, "AND", 0, 2, 1, 3),
    op(0x17, "OR", 0, 2, 1, 3),
    op(0x18, "XOR", 0, 2, 1, 3),
    op(0x19, "NOT", 0, 1, 1, 3),
    op(0x1a, "BYTE", 0, 2, 1, 3),
    op(0x1b, "SHL", 0, 2, 1, 3),
    op(0x1c, "SHR", 0, 2, 1, 3),
    op(0x1d, "SAR", 0, 2, 1, 3),

    // Hashing
    op(0x20, "KECCAK256", 0, 2, 1, 30),

    // Environmental information
    op(0x30, "ADDRESS", 0, 0, 1, 2),
    op(0x31, "BALANCE", 0, 1, 1, 100),
    op(0x32, "ORIGIN", 0, 0, 1, 2),
    op(0x33, "CALLER", 0, 0, 1, 2),
    op(0x34, "CALLVALUE", 0, 0, 1, 2),
    op(0x35, "CALLDATALOAD", 0, 1, 1, 3),
    op(0x36, "CALLDATASIZE", 0, 0, 1, 2),
    op(0x37, "CALLDATACOPY", 0, 3, 0, 3),
    op(0x38, "CODESIZE", 0, 0, 1, 2),
    op(0x39, "CODECOPY", 0, 3, 0, 3),
    op(0x3a, "GASPRICE", 0, 0, 1, 2),
    op(0x3b, "EXTCODESIZE", 0, 1, 1, 100),
    op(0x3c, "EXTCODECOPY", 0, 4, 0, 100),
    op(0x3d, "RETURNDATASIZE", 0, 0, 1, 2),
    op(0x3e, "RETURNDATACOPY", 0, 3, 0, 3),
    op(0x3f, "EXTCODEHASH", 0, 1, 1, 100),

    // Block information
    op(0x40, "BLOCKHASH", 0, 1, 1, 20),
    op(0x41, "COINBASE", 0, 0, 1, 2),
    op(0x42, "TIMESTAMP", 0, 0, 1, 2),
    op(0x43, "NUMBER", 0, 0, 1, 2),
    op(0x44, "PREVRANDAO", 0, 0, 1, 2),
    op(0x45, "GASLIMIT", 0, 0, 1, 2),
    op(0x46, "CHAINID", 0, 0, 1, 2),
    op(0x47, "SELFBALANCE", 0, 0, 1, 5),
    op(0x48, "BASEFEE", 0, 0, 1, 2),
    op(0x49, "BLOBHASH", 0, 1, 1, 3),
    op(0x4a, "BLOBBASEFEE", 0, 0, 1, 2),

    // Stack, memory, storage and flow
    op(0x50, "POP", 0, 1, 0, 2),
    op(0x51, "MLOAD", 0, 1, 1, 3),
    op(0x52, "MSTORE", 0, 2, 0, 3),
    op(0x53, "MSTORE8", 0, 2, 0, 3),
    op(0x54, "SLOAD", 0, 1, 1, 100),
    op(0x55, "SSTORE", 0, 2, 0, 100),
    op(0x56, "JUMP", 0, 1, 0, 8),
    op(0x57, "JUMPI", 0, 2, 0, 10),
    op(0x58, "PC", 0, 0, 1, 2),
    op(0x59, "MSIZE", 0, 0, 1, 2),
    op(0x5a, "GAS", 0, 0, 1, 2),
    op(0x5b, "JUMPDEST", 0, 0, 0, 1),
    op(0x5c, "TLOAD", 0, 1, 1, 100),
    op(0x5d, "TSTORE", 0, 2, 0, 100),
    op(0x5e, "MCOPY", 0, 3, 0, 3),
    op(0x5f, "PUSH0", 0, 0, 1, 2),

    // Push operations
    op(0x60, "PUSH1", 1, 0, 1, 3),
    op(0x61, "PUSH2", 2, 0, 1, 3),
    op(0x62, "PUSH3", 3, 0, 1, 3),
    op(0x63, "PUSH4", 4, 0, 1, 3),
    op(0x64, "PUSH5", 5, 0, 1, 3),
    op(0x65, "PUSH6", 6, 0, 1, 3),
    op(0x66, "PUSH7", 7, 0, 1, 3),
    op(0x67, "PUSH8", 8, 0, 1, 3),
    op(0x68, "PUSH9", 9, 0, 1, 3),
    op(0x69, "PUSH10", 10, 0, 1, 3),
    op(0x6a, "PUSH11", 11, 0, 1, 3),
    op(0x6b, "PUSH12", 12, 0, 1, 3),
    op(0x6c, "PUSH13", 13, 0, 1, 3),
    op(0x6d, "PUSH14", 14, 0, 1, 3),
    op(0x6e, "PUSH15", 15, 0, 1, 3),
    op(0x6f, "PUSH16", 16, 0, 1, 3),
    op(0x70, "PUSH17", 17, 0, 1, 3),
    op(0x71, "PUSH18", 18, 0, 1, 3),
    op(0x72, "PUSH19", 19, 0, 1, 3),
    op(0x73, "PUSH20", 20, 0, 1, 3),
    op(0x74, "PUSH21", 21, 0, 1, 3),
    op(0x75, "PUSH22", 22, 0, 1, 3),
    op(0x76, "PUSH23", 23, 0, 1, 3),
    op(0x77, "PUSH24", 24, 0, 1, 3),
    op(0x78, "PUSH25", 25, 0, 1, 3),
    op(0x79, "PUSH26", 26, 0, 1, 3),
    op(0x7a, "PUSH27", 27, 0, 1, 3),
    op(0x7b, "PUSH28", 28, 0, 1, 3),
    op(0x7c, "PUSH29", 29, 0, 1, 3),
    op(0x7d, "PUSH30", 30, 0, 1, 3),
    op(0x7e, "PUSH31", 31, 0, 1, 3),
    op(0x7f, "PUSH32", 32, 0, 1, 3),

    // Duplication operations
    op(0x80, "DUP1", 0, 1, 2, 3),
    op(0x81, "DUP2", 0, 2, 3, 3),
    op(0x82, "DUP3", 0, 3, 4, 3),
    op(0x83, "DUP4", 0, 4, 5, 3),
    op(0x84, "DUP5", 0, 5, 6, 3),
    op(0x85, "DUP6", 0, 6, 7, 3),
    op(0x86, "DUP7", 0, 7, 8, 3),
    op(0x87, "DUP8", 0, 8, 9, 3),
    op(0x88, "DUP9", 0, 9, 10, 3),
    op(0x89, "DUP10", 0, 10, 11, 3),
    op(0x8a, "DUP11", 0, 11, 12, 3),
    op(0x8b, "DUP12", 0, 12, 13, 3),
    op(0x8c, "DUP13", 0, 13, 14, 3),
    op(0x8d, "DUP14", 0, 14, 15, 3),
    op(0x8e, "DUP15", 0, 15, 16, 3),
    op(0x8f, "DUP16", 0, 16, 17, 3),

    // Exchange operations
    op(0x90, "SWAP1", 0, 2, 2, 3),
    op(0x91, "SWAP2", 0, 3, 3, 3),
    op(0x92, "SWAP3", 0, 4, 4, 3),
    op(0x93, "SWAP4", 0, 5, 5, 3),
    op(0x94, "SWAP5", 0, 6, 6, 3),
    op(0x95, "SWAP6", 0, 7, 7, 3),
    op(0x96, "SWAP7", 0, 8, 8, 3),
    op(0x97, "SWAP8", 0, 9, 9, 3),
    op(0x98, "SWAP9", 0, 10, 10, 3),
    op(0x99, "SWAP10", 0, 11, 11, 3),
    op(0x9a, "SWAP11", 0, 12, 12, 3),
    op(0x9b, "SWAP12", 0, 13, 13, 3),
    op(0x9c, "SWAP13", 0, 14, 14, 3),
    op(0x9d, "SWAP14", 0, 15, 15, 3),
    op(0x9e, "SWAP15", 0, 16, 16, 3),
    op(0x9f, "SWAP16", 0, 17, 17, 3),

    // Logging operations
    op(0xa0, "LOG0", 0, 2, 0, 375),
    op(0xa1, "LOG1", 0, 3, 0, 750),
    op(0xa2, "LOG2", 0, 4, 0, 1125),
    op(0xa3, "LOG3", 0, 5, 0, 1500),
    op(0xa4, "LOG4", 0, 6, 0, 1875),

    // System operations
    op(0xf0, "CREATE", 0, 3, 1, 32000),
    op(0xf1, "CALL", 0, 7, 1, 100),
    op(0xf2, "CALLCODE", 0, 7, 1, 100),
    op(0xf3, "RETURN", 0, 2, 0, 0),
    op(0xf4, "DELEGATECALL", 0, 6, 1, 100),
    op(0xf5, "CREATE2", 0, 4, 1, 32000),
    op(0xfa, "STATICCALL", 0, 6, 1, 100),
    op(0xfd, "REVERT", 0, 2, 0, 0),
    op(0xfe, "INVALID", 0, 0, 0, 0),
    op(0xff, "SELFDESTRUCT", 0, 1, 0, 5000),
];

/// Opcode to definition lookup, indexed by byte value.
///
/// The table is immutable once built and is `Send + Sync`, so a single instance is shared by
/// every decoder in the process.
#[derive(Debug, Clone)]
pub struct OpcodeTable {
    entries: [Option<OpcodeDefinition>; 256],
}

static STANDARD: OnceLock<OpcodeTable> = OnceLock::new();

impl OpcodeTable {
    /// The process-wide table built from [`DEFINITIONS`].
    #[must_use]
    pub fn standard() -> &'static OpcodeTable {
        STANDARD.get_or_init(|| Self::build(DEFINITIONS.iter().copied()))
    }

    /// Build a table from an arbitrary definition list.
    ///
    /// Duplicate opcodes are tolerated: when the list contains several definitions for the same
    /// byte, the last one wins silently.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidDefinition`] if a definition has an empty name or declares
    /// more than [`MAX_OPERAND_BYTES`] operand bytes.
    pub fn new<I>(definitions: I) -> Result<Self>
    where
        I: IntoIterator<Item = OpcodeDefinition>,
    {
        let definitions: Vec<OpcodeDefinition> = definitions.into_iter().collect();

        for def in &definitions {
            if def.name.is_empty() {
                return Err(InvalidDefinition(format!(
                    "opcode 0x{:02x} has an empty mnemonic",
                    def.opcode
                )));
            }
            if def.operand_bytes > MAX_OPERAND_BYTES {
                return Err(InvalidDefinition(format!(
                    "{} (0x{:02x}) declares {} operand bytes, at most {} are supported",
                    def.name, def.opcode, def.operand_bytes, MAX_OPERAND_BYTES
                )));
            }
        }

        Ok(Self::build(definitions))
    }

    fn build<I>(definitions: I) -> Self
    where
        I: IntoIterator<Item = OpcodeDefinition>,
    {
        let mut entries = [None; 256];
        for def in definitions {
            entries[usize::from(def.opcode)] = Some(def);
        }
        OpcodeTable { entries }
    }

    /// Look up an opcode.
    #[must_use]
    pub fn get(&self, opcode: u8) -> Option<&OpcodeDefinition> {
        self.entries[usize::from(opcode)].as_ref()
    }

    /// Look up a definition by mnemonic, ignoring ASCII case.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&OpcodeDefinition> {
        self.iter().find(|def| def.name.eq_ignore_ascii_case(name))
    }

    /// Number of defined opcodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_some()).count()
    }

    /// Returns `true` if no opcode is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(Option::is_none)
    }

    /// Iterate over the defined opcodes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &OpcodeDefinition> + '_ {
        self.entries.iter().filter_map(Option::as_ref)
    }
}
