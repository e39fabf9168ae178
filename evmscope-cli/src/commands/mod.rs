pub mod common;
pub mod disasm;
