//! Deployed bytecode from an Ethereum JSON-RPC node.
//!
//! [`ChainSource`] issues a single `eth_getCode` request over HTTP. The node answers with the
//! account's code as `0x`-prefixed hex, or plain `0x` for an account without code, which decodes
//! to an empty instruction list.
//!
//! The endpoint is explicit configuration in [`ChainConfig`]; this module never reads the process
//! environment itself.

use std::{fmt, str::FromStr, time::Duration};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

use crate::{
    source::BytecodeSource,
    Error::{Config, InvalidAddress, Provider},
    Result,
};

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Block at which the code is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockTag {
    /// The most recent block
    #[default]
    Latest,
    /// The pending state
    Pending,
    /// The genesis block
    Earliest,
    /// The latest safe head block
    Safe,
    /// The latest finalized block
    Finalized,
    /// A specific block height
    Number(u64),
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockTag::Latest => f.write_str("latest"),
            BlockTag::Pending => f.write_str("pending"),
            BlockTag::Earliest => f.write_str("earliest"),
            BlockTag::Safe => f.write_str("safe"),
            BlockTag::Finalized => f.write_str("finalized"),
            // JSON-RPC quantities are hex without leading zeros
            BlockTag::Number(number) => write!(f, "0x{number:x}"),
        }
    }
}

impl FromStr for BlockTag {
    type Err = crate::Error;

    /// Parses a tag name, a decimal block number or a `0x` hex block number.
    fn from_str(s: &str) -> Result<Self> {
        let tag = match s.trim().to_ascii_lowercase().as_str() {
            "latest" => BlockTag::Latest,
            "pending" => BlockTag::Pending,
            "earliest" => BlockTag::Earliest,
            "safe" => BlockTag::Safe,
            "finalized" => BlockTag::Finalized,
            other => {
                let number = match other.strip_prefix("0x") {
                    Some(digits) => u64::from_str_radix(digits, 16),
                    None => other.parse::<u64>(),
                };
                BlockTag::Number(
                    number.map_err(|_| Config(format!("invalid block tag '{s}'")))?,
                )
            }
        };
        Ok(tag)
    }
}

/// Connection settings for [`ChainSource`].
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use evmscope::source::{BlockTag, ChainConfig};
///
/// let config = ChainConfig::from_endpoint(Some("http://localhost:8545".to_string()))?
///     .with_timeout(Duration::from_secs(5))
///     .with_block(BlockTag::Finalized);
/// assert_eq!(config.endpoint, "http://localhost:8545");
///
/// assert!(ChainConfig::from_endpoint(None).is_err());
/// # Ok::<(), evmscope::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL
    pub endpoint: String,
    /// Timeout for the whole request
    pub timeout: Duration,
    /// Block at which code is read
    pub block: BlockTag,
}

impl ChainConfig {
    /// Configuration for `endpoint` with the default timeout at the latest block.
    ///
    /// # Errors
    /// Returns [`crate::Error::Config`] if `endpoint` is absent, blank or not an HTTP(S) URL.
    pub fn from_endpoint(endpoint: Option<String>) -> Result<Self> {
        let endpoint = endpoint
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| Config("no JSON-RPC endpoint configured (NODE_URL)".to_string()))?;

        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(Config(format!(
                "endpoint '{endpoint}' is not an http or https URL"
            )));
        }

        Ok(ChainConfig {
            endpoint,
            timeout: DEFAULT_TIMEOUT,
            block: BlockTag::default(),
        })
    }

    /// Replace the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the block tag.
    #[must_use]
    pub fn with_block(mut self, block: BlockTag) -> Self {
        self.block = block;
        self
    }
}

/// Validate a 20-byte account address and return its EIP-55 checksummed form.
///
/// The `0x` prefix is optional. All-lowercase and all-uppercase input is accepted as is; mixed-case
/// input must already carry the correct checksum.
///
/// # Examples
///
/// ```rust
/// use evmscope::source::to_checksum_address;
///
/// let address = to_checksum_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed")?;
/// assert_eq!(address, "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
/// # Ok::<(), evmscope::Error>(())
/// ```
///
/// # Errors
/// Returns [`crate::Error::InvalidAddress`] if the input is not 40 hex digits or a mixed-case
/// checksum does not match.
pub fn to_checksum_address(address: &str) -> Result<String> {
    let trimmed = address.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(InvalidAddress(format!(
            "'{address}' is not 20 bytes of hex"
        )));
    }

    let lower = digits.to_ascii_lowercase();
    let hash = Keccak256::digest(lower.as_bytes());

    let mut checksummed = String::with_capacity(42);
    checksummed.push_str("0x");
    for (index, c) in lower.chars().enumerate() {
        let byte = hash[index / 2];
        let nibble = if index % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            checksummed.push(c.to_ascii_uppercase());
        } else {
            checksummed.push(c);
        }
    }

    let mixed_case = digits.bytes().any(|b| b.is_ascii_lowercase())
        && digits.bytes().any(|b| b.is_ascii_uppercase());
    if mixed_case && checksummed[2..] != *digits {
        return Err(InvalidAddress(format!("'{address}' has an invalid checksum")));
    }

    Ok(checksummed)
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: (&'a str, String),
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// Build the JSON body of an `eth_getCode` request.
fn get_code_request(address: &str, block: BlockTag) -> Result<String> {
    let request = RpcRequest {
        jsonrpc: "2.0",
        id: 1,
        method: "eth_getCode",
        params: (address, block.to_string()),
    };

    serde_json::to_string(&request).map_err(|err| Provider(err.to_string()))
}

/// Extract the code from an `eth_getCode` response body.
fn parse_get_code_response(body: &str) -> Result<String> {
    let response: RpcResponse = serde_json::from_str(body)
        .map_err(|err| Provider(format!("invalid JSON-RPC response: {err}")))?;

    if let Some(error) = response.error {
        return Err(Provider(format!(
            "eth_getCode failed ({}): {}",
            error.code, error.message
        )));
    }

    response
        .result
        .ok_or_else(|| Provider("JSON-RPC response has neither result nor error".to_string()))
}

/// Code deployed at one account, fetched over JSON-RPC.
///
/// # Examples
///
/// ```rust,no_run
/// use evmscope::source::{BytecodeSource, ChainConfig, ChainSource};
///
/// let config = ChainConfig::from_endpoint(Some("https://rpc.example.org".to_string()))?;
/// let source = ChainSource::new(config, "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed")?;
/// let hex = source.load()?;
/// # Ok::<(), evmscope::Error>(())
/// ```
#[derive(Debug)]
pub struct ChainSource {
    config: ChainConfig,
    address: String,
    agent: ureq::Agent,
}

impl ChainSource {
    /// Source for the code at `address`.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidAddress`] if `address` is not a valid account address.
    pub fn new(config: ChainConfig, address: &str) -> Result<Self> {
        let address = to_checksum_address(address)?;
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();

        Ok(ChainSource {
            config,
            address,
            agent,
        })
    }

    /// The checksummed account address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The connection settings.
    #[must_use]
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }
}

impl BytecodeSource for ChainSource {
    fn describe(&self) -> String {
        format!("account {} at block {}", self.address, self.config.block)
    }

    fn load(&self) -> Result<String> {
        info!(
            "fetching code of {} from {}",
            self.address, self.config.endpoint
        );

        let body = get_code_request(&self.address, self.config.block)?;
        let response = self
            .agent
            .post(&self.config.endpoint)
            .set("Content-Type", "application/json")
            .send_string(&body)
            .map_err(|err| match err {
                ureq::Error::Status(status, _) => {
                    Provider(format!("{} answered HTTP {status}", self.config.endpoint))
                }
                ureq::Error::Transport(transport) => Provider(transport.to_string()),
            })?;

        let text = response
            .into_string()
            .map_err(|err| Provider(format!("reading response body: {err}")))?;
        let code = parse_get_code_response(&text)?;

        debug!(
            "received {} hex digits for {}",
            code.len().saturating_sub(2),
            self.address
        );
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn checksum_vectors() {
        let vectors = [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ];

        for expected in vectors {
            assert_eq!(to_checksum_address(expected).unwrap(), expected);
            assert_eq!(
                to_checksum_address(&expected.to_ascii_lowercase()).unwrap(),
                expected
            );
            assert_eq!(to_checksum_address(&expected[2..]).unwrap(), expected);
        }
    }

    #[test]
    fn checksum_uppercase_input() {
        let address = to_checksum_address("0x52908400098527886E0F7030069857D2E4169EE7").unwrap();
        assert_eq!(address, "0x52908400098527886E0F7030069857D2E4169EE7");
    }

    #[test]
    fn checksum_rejects_bad_input() {
        for bad in [
            "",
            "0x",
            "0x5aaeb6053f3e94c9b9a09f33669435e7ef1bea",
            "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaedaa",
            "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beazz",
            // Checksum with one letter flipped
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD",
        ] {
            assert!(
                matches!(to_checksum_address(bad), Err(Error::InvalidAddress(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn block_tags() {
        assert_eq!("latest".parse::<BlockTag>().unwrap(), BlockTag::Latest);
        assert_eq!("Finalized".parse::<BlockTag>().unwrap(), BlockTag::Finalized);
        assert_eq!("1000".parse::<BlockTag>().unwrap(), BlockTag::Number(1000));
        assert_eq!("0x3e8".parse::<BlockTag>().unwrap(), BlockTag::Number(1000));
        assert_eq!(BlockTag::Number(1000).to_string(), "0x3e8");
        assert_eq!(BlockTag::Safe.to_string(), "safe");
        assert!(matches!("soon".parse::<BlockTag>(), Err(Error::Config(_))));
    }

    #[test]
    fn config_requires_endpoint() {
        assert!(matches!(ChainConfig::from_endpoint(None), Err(Error::Config(_))));
        assert!(matches!(
            ChainConfig::from_endpoint(Some("  ".to_string())),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ChainConfig::from_endpoint(Some("localhost:8545".to_string())),
            Err(Error::Config(_))
        ));

        let config = ChainConfig::from_endpoint(Some(" http://127.0.0.1:8545 ".to_string())).unwrap();
        assert_eq!(config.endpoint, "http://127.0.0.1:8545");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.block, BlockTag::Latest);
    }

    #[test]
    fn request_body() {
        let body = get_code_request(
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            BlockTag::Latest,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["method"], "eth_getCode");
        assert_eq!(value["params"][0], "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
        assert_eq!(value["params"][1], "latest");
    }

    #[test]
    fn response_result() {
        let code = parse_get_code_response(r#"{"jsonrpc":"2.0","id":1,"result":"0x6080"}"#).unwrap();
        assert_eq!(code, "0x6080");

        let empty = parse_get_code_response(r#"{"jsonrpc":"2.0","id":1,"result":"0x"}"#).unwrap();
        assert_eq!(empty, "0x");
    }

    #[test]
    fn response_errors() {
        let rpc_error = parse_get_code_response(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32602,"message":"invalid address"}}"#,
        );
        match rpc_error {
            Err(Error::Provider(message)) => assert!(message.contains("invalid address")),
            other => panic!("Expected Provider, got {other:?}"),
        }

        assert!(matches!(
            parse_get_code_response("<html>bad gateway</html>"),
            Err(Error::Provider(_))
        ));
        assert!(matches!(
            parse_get_code_response(r#"{"jsonrpc":"2.0","id":1}"#),
            Err(Error::Provider(_))
        ));
    }

    #[test]
    fn source_checksums_address() {
        let config = ChainConfig::from_endpoint(Some("http://127.0.0.1:1".to_string())).unwrap();
        let source = ChainSource::new(config, "5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();

        assert_eq!(source.address(), "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
        assert_eq!(
            source.describe(),
            "account 0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed at block latest"
        );
    }

    #[test]
    fn source_rejects_invalid_address() {
        let config = ChainConfig::from_endpoint(Some("http://127.0.0.1:1".to_string())).unwrap();
        assert!(matches!(
            ChainSource::new(config, "0x1234"),
            Err(Error::InvalidAddress(_))
        ));
    }
}
