use std::env;

use tracing::info;
use tracing_subscriber::fmt;

use shareme_indexer::{
    chains::EthereumChain, checkpoint::CheckpointStore, config::IndexerConfig, indexer::Indexer,
};

fn arg_value(args: &[String], name: &str) -> Option<String> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt::init();
    let args: Vec<String> = env::args().collect();

    let config_path = arg_value(&args, "--config").unwrap_or_else(|| "config.toml".to_string());
    let start_block = arg_value(&args, "--start-block")
        .map(|v| v.parse::<u64>())
        .transpose()?;

    let mut config = IndexerConfig::from_toml(&config_path)?;
    if let Ok(key) = env::var("PRIVATE_KEY") {
        config.signer.private_key = Some(key);
    }
    info!(config = %config_path, "Loaded configuration");

    let chain = EthereumChain::new(
        &config.rpc.ethereum_rpc,
        &config.contracts.forwarder_abi,
        config.signer.private_key.clone(),
    )?;
    let store = CheckpointStore::load(&config.core.checkpoint_file)?;

    let mut indexer = Indexer::new(chain, store, &config, start_block)?;
    indexer.run().await
}
