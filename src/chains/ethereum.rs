use std::{fs, str::FromStr};

use alloy::{
    contract::{ContractInstance, Interface},
    dyn_abi::DynSolValue,
    json_abi::JsonAbi,
    primitives::{Address, B256, TxHash, U256},
    providers::{Provider, ProviderBuilder, RootProvider},
    rpc::{
        client::RpcClient,
        types::{Filter, Log},
    },
    signers::local::LocalSigner,
    transports::http::Http,
};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use tracing::info;

use crate::{
    chains::traits::{ChainClient, ChainError},
    types::{BlockRange, EthereumClient},
};

/// Sentinel left in template configs; treated the same as no key at all.
const PLACEHOLDER_PRIVATE_KEY: &str = "your_private_key_here";

#[derive(Debug)]
pub struct EthereumChain {
    client: EthereumClient,
    rpc_url: Url,
    forwarder_interface: Interface,
    private_key: Option<String>,
}

impl EthereumChain {
    pub fn new(
        rpc_url: &str,
        forwarder_abi_path: &str,
        private_key: Option<String>,
    ) -> anyhow::Result<Self> {
        let rpc_url = Url::from_str(rpc_url)?;
        let transport = Http::new(rpc_url.clone());
        let client = RootProvider::new(RpcClient::new(transport, false));

        let forwarder_interface = Interface::new(load_abi(forwarder_abi_path)?);

        Ok(Self {
            client,
            rpc_url,
            forwarder_interface,
            private_key,
        })
    }

    fn signing_key(&self) -> Option<&str> {
        match self.private_key.as_deref() {
            Some(key) if !key.is_empty() && key != PLACEHOLDER_PRIVATE_KEY => Some(key),
            _ => None,
        }
    }
}

#[async_trait]
impl ChainClient for EthereumChain {
    async fn current_height(&self) -> Result<u64, ChainError> {
        Ok(self.client.get_block_number().await?)
    }

    async fn get_logs(
        &self,
        address: Address,
        topic0: B256,
        range: BlockRange,
    ) -> Result<Vec<Log>, ChainError> {
        let filter = Filter::new()
            .from_block(range.from)
            .to_block(range.to)
            .address(address)
            .event_signature(topic0);

        Ok(self.client.get_logs(&filter).await?)
    }

    async fn submit_forwarding_transaction(
        &self,
        target: Address,
        token: Address,
        amount: U256,
    ) -> Result<Option<TxHash>, ChainError> {
        let Some(key) = self.signing_key() else {
            info!(target_wallet = %target, "No signing key configured, skipping forwardTransfer");
            return Ok(None);
        };

        let signer = LocalSigner::from_str(key)?;
        let provider = ProviderBuilder::new()
            .wallet(signer)
            .connect_http(self.rpc_url.clone());
        let contract = ContractInstance::new(target, provider, self.forwarder_interface.clone());

        let pending = contract
            .function(
                "forwardTransfer",
                &[
                    DynSolValue::Address(token),
                    DynSolValue::Uint(amount, 256),
                ],
            )?
            .send()
            .await?;

        Ok(Some(*pending.tx_hash()))
    }
}

/// Loads the forwarder ABI from a contract artifact or a plain ABI array.
/// Failure here is a fatal startup error.
pub fn load_abi(path: &str) -> anyhow::Result<JsonAbi> {
    let abi_content = fs::read_to_string(path)?;
    let full_json: Value = serde_json::from_str(&abi_content)?;

    let abi_value = match &full_json {
        Value::Array(_) => full_json.clone(),
        Value::Object(obj) => obj
            .get("abi")
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Missing 'abi' field in contract artifact"))?,
        _ => return Err(anyhow::anyhow!("ABI file must be an array or artifact object")),
    };

    let json_abi: JsonAbi = serde_json::from_value(abi_value)?;
    Ok(json_abi)
}
