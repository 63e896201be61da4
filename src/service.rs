//! Client for the Safe Transaction Service REST API
//!
//! The service collects proposed transactions and owner confirmations
//! off-chain so that co-signers can discover and countersign them before
//! execution.

use alloy::primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chain::transaction_service_url;
use crate::error::{Error, Result};
use crate::types::{Operation, SafeTransactionData};

/// Service metadata returned by `/v1/about/`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub secure: Option<bool>,
}

/// One owner confirmation attached to a pending transaction
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    pub owner: Address,
    pub signature: Bytes,
    #[serde(default)]
    pub signature_type: Option<String>,
    #[serde(default)]
    pub submission_date: Option<String>,
}

/// A multisig transaction as reported by the service
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultisigTransaction {
    pub safe: Address,
    pub to: Address,
    pub value: U256,
    #[serde(default)]
    pub data: Option<Bytes>,
    pub operation: u8,
    pub safe_tx_gas: U256,
    pub base_gas: U256,
    pub gas_price: U256,
    pub gas_token: Address,
    pub refund_receiver: Address,
    pub nonce: u64,
    pub safe_tx_hash: B256,
    pub is_executed: bool,
    #[serde(default)]
    pub confirmations_required: Option<u64>,
    #[serde(default)]
    pub confirmations: Vec<Confirmation>,
}

#[derive(Debug, Clone, Deserialize)]
struct TransactionPage {
    #[serde(default)]
    results: Vec<MultisigTransaction>,
}

/// Body of the transaction proposal POST
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProposeTransactionBody {
    to: Address,
    value: U256,
    data: Option<Bytes>,
    operation: Operation,
    safe_tx_gas: U256,
    base_gas: U256,
    gas_price: U256,
    gas_token: Address,
    refund_receiver: Address,
    nonce: U256,
    contract_transaction_hash: B256,
    sender: Address,
    signature: Bytes,
    #[serde(skip_serializing_if = "Option::is_none")]
    origin: Option<String>,
}

#[derive(Debug, Serialize)]
struct ConfirmTransactionBody {
    signature: Bytes,
}

/// Optional list filters forwarded to the pending-transactions query
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Sort key, e.g. `-nonce` or `submissionDate`
    pub ordering: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Client for one chain's Safe Transaction Service instance.
pub struct SafeServiceClient {
    http: reqwest::Client,
    base_url: String,
}

impl SafeServiceClient {
    /// Creates a client for an explicit service URL
    pub fn new(service_url: impl Into<String>) -> Self {
        let base_url = service_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Creates a client for the hosted service of a known chain
    pub fn for_chain(chain_id: u64) -> Result<Self> {
        let url = transaction_service_url(chain_id).ok_or(Error::InvalidConfig(format!(
            "no hosted transaction service known for chain id {chain_id}"
        )))?;
        Ok(Self::new(url))
    }

    /// Returns the base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn handle<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Service {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }

    async fn handle_empty(response: reqwest::Response) -> Result<()> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Service {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    /// Fetches service metadata
    pub async fn about(&self) -> Result<ServiceInfo> {
        let url = format!("{}/v1/about/", self.base_url);
        let response = self.http.get(&url).send().await?;
        Self::handle(response).await
    }

    /// Proposes a transaction so other owners can confirm it.
    ///
    /// `safe_tx_hash` must be the EIP-712 transaction hash the service will
    /// recompute and verify; `signature` is the proposer's signature over it.
    pub async fn propose_transaction(
        &self,
        safe_address: Address,
        data: &SafeTransactionData,
        safe_tx_hash: B256,
        sender: Address,
        signature: Bytes,
        origin: Option<String>,
    ) -> Result<()> {
        let url = format!(
            "{}/v1/safes/{}/multisig-transactions/",
            self.base_url, safe_address
        );

        let body = ProposeTransactionBody {
            to: data.to,
            value: data.value,
            data: if data.data.is_empty() {
                None
            } else {
                Some(data.data.clone())
            },
            operation: data.operation,
            safe_tx_gas: data.safe_tx_gas,
            base_gas: data.base_gas,
            gas_price: data.gas_price,
            gas_token: data.gas_token,
            refund_receiver: data.refund_receiver,
            nonce: data.nonce_or_zero(),
            contract_transaction_hash: safe_tx_hash,
            sender,
            signature,
            origin,
        };

        debug!(safe = %safe_address, hash = %safe_tx_hash, "proposing transaction to service");

        let response = self.http.post(&url).json(&body).send().await?;
        Self::handle_empty(response).await
    }

    /// Lists transactions that are proposed but not yet executed.
    ///
    /// Always filters `executed=false` and `trusted=true`; `current_nonce`
    /// additionally hides stale entries below the Safe's nonce.
    pub async fn get_pending_transactions(
        &self,
        safe_address: Address,
        current_nonce: Option<u64>,
        options: &ListOptions,
    ) -> Result<Vec<MultisigTransaction>> {
        let url = format!(
            "{}/v1/safes/{}/multisig-transactions/",
            self.base_url, safe_address
        );

        let mut query: Vec<(&str, String)> = vec![
            ("executed", "false".to_string()),
            ("trusted", "true".to_string()),
        ];
        if let Some(nonce) = current_nonce {
            query.push(("nonce__gte", nonce.to_string()));
        }
        if let Some(ordering) = &options.ordering {
            query.push(("ordering", ordering.clone()));
        }
        if let Some(limit) = options.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset) = options.offset {
            query.push(("offset", offset.to_string()));
        }

        let response = self.http.get(&url).query(&query).send().await?;
        let page: TransactionPage = Self::handle(response).await?;
        Ok(page.results)
    }

    /// Adds a confirmation signature to an already proposed transaction
    pub async fn confirm_transaction(&self, safe_tx_hash: B256, signature: Bytes) -> Result<()> {
        let url = format!(
            "{}/v1/multisig-transactions/{}/confirmations/",
            self.base_url, safe_tx_hash
        );

        debug!(hash = %safe_tx_hash, "confirming transaction on service");

        let response = self
            .http
            .post(&url)
            .json(&ConfirmTransactionBody { signature })
            .send()
            .await?;
        Self::handle_empty(response).await
    }
}
