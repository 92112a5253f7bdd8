use std::{str::FromStr, time::Duration};

use alloy::primitives::Address;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{error, info};

use crate::{
    chains::{ChainClient, ChainError},
    checkpoint::{CheckpointError, CheckpointStore},
    codec::{self, CodecError, TRANSFER_TOPIC, WALLET_CREATED_TOPIC},
    config::IndexerConfig,
    policy,
    types::BlockRange,
};

#[derive(Debug, Error)]
pub enum IndexerError {
    #[error(transparent)]
    Chain(#[from] ChainError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
}

/// Outcome of one loop iteration. The driver pattern-matches on this to
/// choose the next delay instead of catching exceptions around the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Caught up with the chain head; nothing to process yet.
    Idle { height: u64 },
    /// A full range was processed and the checkpoint persisted.
    Processed(BlockRange),
}

pub struct Indexer<C> {
    client: C,
    store: CheckpointStore,
    wallet_factory: Address,
    token: Address,
    max_chunk_size: u64,
    poll_interval: Duration,
    idle_interval: Duration,
    backoff_interval: Duration,
    from: u64,
}

impl<C: ChainClient> Indexer<C> {
    pub fn new(
        client: C,
        store: CheckpointStore,
        config: &IndexerConfig,
        start_block: Option<u64>,
    ) -> anyhow::Result<Self> {
        let wallet_factory = Address::from_str(&config.contracts.wallet_factory)?;
        let token = Address::from_str(&config.contracts.token)?;
        let from = start_block.unwrap_or(store.last_processed_block() + 1);

        Ok(Self {
            client,
            store,
            wallet_factory,
            token,
            max_chunk_size: config.core.max_chunk_size,
            poll_interval: Duration::from_secs(config.core.poll_interval),
            idle_interval: Duration::from_secs(config.core.idle_interval),
            backoff_interval: Duration::from_secs(config.core.backoff_interval),
            from,
        })
    }

    /// Next block the indexer will process.
    pub fn next_block(&self) -> u64 {
        self.from
    }

    /// Runs the polling loop until the process is terminated.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        info!(next_block = self.from, "Starting event listener");

        loop {
            match self.tick().await {
                Ok(Tick::Processed(_)) => {
                    sleep(self.poll_interval).await;
                }
                Ok(Tick::Idle { height }) => {
                    info!(
                        current = height,
                        next = self.from,
                        "Waiting for new blocks"
                    );
                    sleep(self.idle_interval).await;
                }
                Err(e) => {
                    // `from` is left untouched, so the failed range is
                    // retried in full on the next cycle.
                    error!(next_block = self.from, error = %e, "Iteration failed, backing off");
                    sleep(self.backoff_interval).await;
                }
            }
        }
    }

    /// One iteration: poll the head, process the next bounded range, persist
    /// the checkpoint. Returns `Idle` when caught up.
    pub async fn tick(&mut self) -> Result<Tick, IndexerError> {
        let height = self.client.current_height().await?;

        let Some(range) = BlockRange::next_chunk(self.from, height, self.max_chunk_size) else {
            return Ok(Tick::Idle { height });
        };

        info!(%range, "Processing blocks");
        self.process_range(range).await?;

        self.store.advance_to(range.to);
        self.store.save()?;
        self.from = range.to + 1;

        Ok(Tick::Processed(range))
    }

    /// WalletCreated insertions are fully applied before any Transfer is
    /// evaluated, so a wallet created earlier in the range gates transfers
    /// later in the same range.
    async fn process_range(&mut self, range: BlockRange) -> Result<(), IndexerError> {
        let wallet_logs = self
            .client
            .get_logs(self.wallet_factory, WALLET_CREATED_TOPIC, range)
            .await?;
        for log in &wallet_logs {
            let event = codec::decode_wallet_created(log)?;
            if self.store.add_to_whitelist(event.wallet) {
                info!(wallet = %event.wallet, "Added wallet to whitelist");
            }
        }

        let transfer_logs = self
            .client
            .get_logs(self.token, TRANSFER_TOPIC, range)
            .await?;
        for log in &transfer_logs {
            let event = codec::decode_transfer(log)?;
            policy::apply(&self.client, &event, self.store.whitelist()).await;
        }

        Ok(())
    }
}
