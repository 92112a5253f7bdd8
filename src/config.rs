use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};

/// Configuration for the indexer service.
/// This struct is used to deserialize the configuration from a TOML file.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct IndexerConfig {
    pub core: Core,
    pub rpc: Rpc,
    pub contracts: Contracts,
    #[serde(default)]
    pub signer: Signer,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Core {
    pub checkpoint_file: String,
    pub max_chunk_size: u64,
    /// Seconds to wait after a processed range before polling again.
    pub poll_interval: u64,
    /// Seconds to wait when caught up with the chain head.
    pub idle_interval: u64,
    /// Seconds to wait after a failed iteration before retrying.
    pub backoff_interval: u64,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Rpc {
    pub ethereum_rpc: String,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Contracts {
    /// Smart-wallet factory emitting WalletCreated events.
    pub wallet_factory: String,
    /// ERC-20 token contract whose Transfer events are watched.
    pub token: String,
    /// Path to the forwarder contract ABI JSON.
    pub forwarder_abi: String,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct Signer {
    pub private_key: Option<String>,
}

impl IndexerConfig {
    /// Loads indexer configuration from a TOML file. A missing or malformed
    /// file is a fatal startup error.
    pub fn from_toml(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .build()?;
        config.try_deserialize()
    }

    pub fn from_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::from_str(toml_str, config::FileFormat::Toml))
            .build()?;
        config.try_deserialize()
    }
}
