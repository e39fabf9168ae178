//! Decoder configuration
//!
//! The only behavior a caller can tune is what happens when the byte stream ends in the middle of
//! an instruction's operand. Everything else about a decode pass is fixed by the input bytes and
//! the opcode table.

use strum::{Display, EnumIter, EnumString};

/// What the decoder does when the stream ends inside an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum TruncationPolicy {
    /// Fail the whole pass with [`crate::Error::TruncatedOperand`]
    #[default]
    Error,
    /// End the sequence after the last complete instruction and log a warning
    Stop,
}

/// Configuration for a decode pass
///
/// # Examples
///
/// ```rust
/// use evmscope::{disassembler::{DecoderConfig, TruncationPolicy}, Disassembler};
///
/// let lenient = Disassembler::new().with_config(DecoderConfig::lenient());
/// let instructions = lenient.disassemble("0x600160")?;
/// assert_eq!(instructions.len(), 1);
///
/// assert_eq!("stop".parse::<TruncationPolicy>().unwrap(), TruncationPolicy::Stop);
/// # Ok::<(), evmscope::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DecoderConfig {
    /// Handling of a truncated trailing operand
    pub truncation: TruncationPolicy,
}

impl DecoderConfig {
    /// Truncation is an error. This is the default.
    #[must_use]
    pub fn strict() -> Self {
        DecoderConfig {
            truncation: TruncationPolicy::Error,
        }
    }

    /// Truncation silently ends the sequence after the last complete instruction.
    #[must_use]
    pub fn lenient() -> Self {
        DecoderConfig {
            truncation: TruncationPolicy::Stop,
        }
    }

    /// Replace the truncation policy.
    #[must_use]
    pub fn with_truncation(mut self, truncation: TruncationPolicy) -> Self {
        self.truncation = truncation;
        self
    }
}
