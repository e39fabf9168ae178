use std::path::PathBuf;

use clap::{Args, Parser};
use evmscope::{disassembler::TruncationPolicy, source::BlockTag};

/// evmscope - EVM bytecode disassembler
#[derive(Debug, Parser)]
#[command(name = "evmscope", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(flatten)]
    pub chain: ChainOptions,

    /// What to do when the code ends inside an operand: error or stop.
    #[arg(long, value_name = "POLICY", default_value_t = TruncationPolicy::Error)]
    pub on_truncation: TruncationPolicy,
}

/// Where the bytecode comes from. Exactly one is required.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct InputArgs {
    /// Disassemble from 0x-prefixed hex text.
    #[arg(short, long, value_name = "HEX")]
    pub text: Option<String>,

    /// Disassemble from a file containing 0x-prefixed hex text.
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Disassemble the code deployed at a contract address.
    #[arg(short, long, value_name = "ADDRESS")]
    pub chain: Option<String>,
}

/// Output options.
#[derive(Debug, Args)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of listing lines.
    #[arg(long, conflicts_with = "table")]
    pub json: bool,

    /// Emit aligned columns with stack effect and gas.
    #[arg(long)]
    pub table: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Node connection settings, used with --chain.
#[derive(Debug, Args)]
pub struct ChainOptions {
    /// JSON-RPC endpoint of an Ethereum node.
    #[arg(long, env = "NODE_URL", value_name = "URL")]
    pub node_url: Option<String>,

    /// Block to read the code at: latest, pending, earliest, safe, finalized or a number.
    #[arg(long, value_name = "TAG", default_value_t = BlockTag::Latest)]
    pub block: BlockTag,

    /// Request timeout in seconds.
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub timeout: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn requires_one_input() {
        assert!(Cli::try_parse_from(["evmscope"]).is_err());
        assert!(Cli::try_parse_from(["evmscope", "-t", "0x00", "-f", "code.txt"]).is_err());

        let cli = Cli::try_parse_from(["evmscope", "-t", "0x6080"]).unwrap();
        assert_eq!(cli.input.text.as_deref(), Some("0x6080"));
        assert_eq!(cli.on_truncation, TruncationPolicy::Error);
    }

    #[test]
    fn chain_options() {
        let cli = Cli::try_parse_from([
            "evmscope",
            "--chain",
            "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed",
            "--node-url",
            "http://localhost:8545",
            "--block",
            "finalized",
            "--timeout",
            "5",
        ])
        .unwrap();

        assert_eq!(cli.chain.node_url.as_deref(), Some("http://localhost:8545"));
        assert_eq!(cli.chain.block, BlockTag::Finalized);
        assert_eq!(cli.chain.timeout, 5);
    }

    #[test]
    fn output_modes_conflict() {
        assert!(Cli::try_parse_from(["evmscope", "-t", "0x00", "--json", "--table"]).is_err());

        let cli = Cli::try_parse_from(["evmscope", "-t", "0x00", "--on-truncation", "stop"]).unwrap();
        assert_eq!(cli.on_truncation, TruncationPolicy::Stop);
    }
}
