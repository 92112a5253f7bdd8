use alloy::{
    primitives::{Address, B256, TxHash, U256},
    rpc::types::Log,
};
use async_trait::async_trait;
use thiserror::Error;

use crate::types::BlockRange;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("rpc request failed: {0}")]
    Rpc(#[from] alloy::transports::TransportError),
    #[error("contract call failed: {0}")]
    Contract(#[from] alloy::contract::Error),
    #[error("invalid signing key: {0}")]
    Signer(#[from] alloy::signers::local::LocalSignerError),
}

/// Boundary to the blockchain node. One implementation talks to a real EVM
/// node; tests substitute a mock so the indexer loop can be driven without a
/// network.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Current chain head block number.
    async fn current_height(&self) -> Result<u64, ChainError>;

    /// Fetches logs emitted by `address` matching `topic0` within the
    /// inclusive `range`. The caller is responsible for keeping the range
    /// bounded; providers commonly reject oversized spans.
    async fn get_logs(
        &self,
        address: Address,
        topic0: B256,
        range: BlockRange,
    ) -> Result<Vec<Log>, ChainError>;

    /// Builds, signs, and broadcasts a `forwardTransfer(token, amount)` call
    /// against the `target` wallet contract. Returns `Ok(None)` without
    /// submitting when no usable signing key is configured, so partial dev
    /// setups do not crash the loop.
    async fn submit_forwarding_transaction(
        &self,
        target: Address,
        token: Address,
        amount: U256,
    ) -> Result<Option<TxHash>, ChainError>;
}
