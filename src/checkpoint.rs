use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("checkpoint io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("checkpoint file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Durable indexer state: the whitelist of wallets eligible for forwarding
/// plus the watermark of the last fully processed block.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Checkpoint {
    #[serde(with = "checksummed")]
    pub allowed_addresses: BTreeSet<Address>,
    pub last_processed_block: u64,
}

/// Addresses are stored in EIP-55 checksummed form; parsing accepts any case.
mod checksummed {
    use super::*;
    use serde::{Deserializer, Serializer, de::Error as _, ser::SerializeSeq};

    pub fn serialize<S: Serializer>(
        set: &BTreeSet<Address>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(set.len()))?;
        for address in set {
            seq.serialize_element(&address.to_checksum(None))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeSet<Address>, D::Error> {
        let raw = Vec::<String>::deserialize(deserializer)?;
        raw.iter()
            .map(|s| s.parse::<Address>().map_err(D::Error::custom))
            .collect()
    }
}

/// File-backed store owning the checkpoint.
///
/// The on-disk representation is a single JSON record; every save is a full
/// rewrite through a temp file renamed into place, so a crash mid-write
/// leaves the previous valid state intact.
///
/// Single-writer contract: exactly one indexer process may use a given
/// checkpoint file at a time. Nothing here locks the file; running two
/// instances against the same path will race the watermark.
#[derive(Debug)]
pub struct CheckpointStore {
    path: PathBuf,
    checkpoint: Checkpoint,
}

impl CheckpointStore {
    /// Loads the checkpoint from `path`. An absent file yields the zero
    /// checkpoint; a present but unreadable or malformed file is an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, CheckpointError> {
        let path = path.into();
        let checkpoint = if path.exists() {
            serde_json::from_slice(&fs::read(&path)?)?
        } else {
            Checkpoint::default()
        };
        info!(
            last_processed_block = checkpoint.last_processed_block,
            whitelist_size = checkpoint.allowed_addresses.len(),
            "Loaded checkpoint"
        );
        Ok(Self { path, checkpoint })
    }

    pub fn save(&self) -> Result<(), CheckpointError> {
        let json = serde_json::to_vec_pretty(&self.checkpoint)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Inserts an address into the whitelist. Returns whether it was newly
    /// added; re-inserting is a no-op, which makes range replays safe.
    pub fn add_to_whitelist(&mut self, address: Address) -> bool {
        self.checkpoint.allowed_addresses.insert(address)
    }

    /// Advances the watermark. A lower value is ignored so the watermark is
    /// monotonically non-decreasing across saves.
    pub fn advance_to(&mut self, block: u64) {
        if block > self.checkpoint.last_processed_block {
            self.checkpoint.last_processed_block = block;
        }
    }

    pub fn last_processed_block(&self) -> u64 {
        self.checkpoint.last_processed_block
    }

    pub fn whitelist(&self) -> &BTreeSet<Address> {
        &self.checkpoint.allowed_addresses
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
