pub mod ethereum;
pub mod traits;

pub use ethereum::EthereumChain;
pub use traits::{ChainClient, ChainError};
