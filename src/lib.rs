pub mod chains;
pub mod checkpoint;
pub mod codec;
pub mod config;
pub mod indexer;
pub mod policy;
pub mod types;
