use std::time::Duration;

use anyhow::Context;
use evmscope::source::{BytecodeSource, ChainConfig, ChainSource, FileSource};
use log::debug;

use crate::app::{ChainOptions, InputArgs};

/// The input mode chosen on the command line, for error messages.
pub fn input_mode(input: &InputArgs) -> &'static str {
    if input.file.is_some() {
        "--file"
    } else if input.chain.is_some() {
        "--chain"
    } else {
        "--text"
    }
}

/// Resolve the hex text for whichever input mode was given.
pub fn load_hex(input: &InputArgs, chain: &ChainOptions) -> anyhow::Result<String> {
    if let Some(text) = &input.text {
        return Ok(text.clone());
    }

    if let Some(path) = &input.file {
        let source = FileSource::new(path);
        debug!("loading {}", source.describe());
        return source
            .load()
            .with_context(|| format!("failed to read --file input: {}", path.display()));
    }

    if let Some(address) = &input.chain {
        let source = chain_source(address, chain)
            .with_context(|| format!("failed to set up --chain input: {address}"))?;
        debug!("loading {}", source.describe());
        return source
            .load()
            .with_context(|| format!("failed to fetch --chain input: {}", source.address()));
    }

    anyhow::bail!("one of --text, --file or --chain is required")
}

fn chain_source(address: &str, chain: &ChainOptions) -> evmscope::Result<ChainSource> {
    let config = ChainConfig::from_endpoint(chain.node_url.clone())?
        .with_timeout(Duration::from_secs(chain.timeout))
        .with_block(chain.block);
    ChainSource::new(config, address)
}
