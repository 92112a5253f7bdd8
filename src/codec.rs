use alloy::{
    primitives::{Address, B256, U256},
    rpc::types::Log,
    sol,
    sol_types::SolEvent,
};
use thiserror::Error;

sol! {
    /// Emitted by the smart-wallet factory when a new wallet is deployed.
    /// The wallet address is the second argument.
    #[derive(Debug)]
    event WalletCreated(address creator, address wallet);

    /// Standard ERC-20 Transfer event.
    #[derive(Debug)]
    event Transfer(address indexed from, address indexed to, uint256 value);
}

/// Topic identifying WalletCreated logs at the source.
pub const WALLET_CREATED_TOPIC: B256 = WalletCreated::SIGNATURE_HASH;
/// Topic identifying ERC-20 Transfer logs at the source.
pub const TRANSFER_TOPIC: B256 = Transfer::SIGNATURE_HASH;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletCreatedEvent {
    pub wallet: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferEvent {
    /// Token contract that emitted the log.
    pub token: Address,
    pub to: Address,
    pub value: U256,
}

#[derive(Debug, Error)]
pub enum CodecError {
    /// The caller routed a log here that was not filtered by the expected
    /// topic. This is a programming-contract violation, not chain noise.
    #[error("{event} log has topic {actual:?}, expected {expected}")]
    TopicMismatch {
        event: &'static str,
        expected: B256,
        actual: Option<B256>,
    },
    #[error("failed to decode {event} log: {source}")]
    Decode {
        event: &'static str,
        #[source]
        source: alloy::sol_types::Error,
    },
}

fn check_topic(log: &Log, event: &'static str, expected: B256) -> Result<(), CodecError> {
    match log.topic0() {
        Some(topic) if *topic == expected => Ok(()),
        other => Err(CodecError::TopicMismatch {
            event,
            expected,
            actual: other.copied(),
        }),
    }
}

pub fn decode_wallet_created(log: &Log) -> Result<WalletCreatedEvent, CodecError> {
    check_topic(log, "WalletCreated", WALLET_CREATED_TOPIC)?;
    let decoded = WalletCreated::decode_log(&log.inner).map_err(|source| CodecError::Decode {
        event: "WalletCreated",
        source,
    })?;
    Ok(WalletCreatedEvent {
        wallet: decoded.wallet,
    })
}

pub fn decode_transfer(log: &Log) -> Result<TransferEvent, CodecError> {
    check_topic(log, "Transfer", TRANSFER_TOPIC)?;
    let decoded = Transfer::decode_log(&log.inner).map_err(|source| CodecError::Decode {
        event: "Transfer",
        source,
    })?;
    Ok(TransferEvent {
        token: log.address(),
        to: decoded.to,
        value: decoded.value,
    })
}
