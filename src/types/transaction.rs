//! Safe transaction data model and per-owner signature collection

use std::collections::BTreeMap;

use alloy::primitives::{Address, Bytes, U256};

use super::Operation;
use crate::error::{Error, Result};
use crate::signing::encode_pre_validated_signature;

/// Parameters of one candidate Safe transaction.
///
/// The value is immutable once wrapped into a [`SafeTransaction`]; `nonce`
/// stays `None` until [`crate::Safe::create_transaction`] resolves it from
/// the chain (or the caller sets it explicitly, e.g. for rejections).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeTransactionData {
    /// Target address
    pub to: Address,
    /// Value to send (wei)
    pub value: U256,
    /// Calldata
    pub data: Bytes,
    /// Operation type
    pub operation: Operation,
    /// Gas limit for the inner Safe transaction
    pub safe_tx_gas: U256,
    /// Base gas (execution overhead)
    pub base_gas: U256,
    /// Gas price for refund calculation
    pub gas_price: U256,
    /// Token used for gas refund (address(0) for ETH)
    pub gas_token: Address,
    /// Address receiving the gas refund
    pub refund_receiver: Address,
    /// Safe nonce; must be resolved before hashing or signing
    pub nonce: Option<U256>,
}

impl SafeTransactionData {
    /// Creates transaction data with zeroed gas parameters and an unresolved nonce
    pub fn new(to: Address, value: U256, data: impl Into<Bytes>, operation: Operation) -> Self {
        Self {
            to,
            value,
            data: data.into(),
            operation,
            safe_tx_gas: U256::ZERO,
            base_gas: U256::ZERO,
            gas_price: U256::ZERO,
            gas_token: Address::ZERO,
            refund_receiver: Address::ZERO,
            nonce: None,
        }
    }

    /// Sets the safe transaction gas
    pub fn with_safe_tx_gas(mut self, gas: U256) -> Self {
        self.safe_tx_gas = gas;
        self
    }

    /// Sets the nonce explicitly
    pub fn with_nonce(mut self, nonce: U256) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Nonce used when hashing. Defaults to 0 when unresolved; the default
    /// exists for hashing only and must not be relied on for execution.
    pub fn nonce_or_zero(&self) -> U256 {
        self.nonce.unwrap_or(U256::ZERO)
    }
}

impl Default for SafeTransactionData {
    fn default() -> Self {
        Self::new(Address::ZERO, U256::ZERO, Bytes::new(), Operation::Call)
    }
}

/// A Safe transaction plus the signatures collected for it so far.
///
/// Signatures are keyed by owner address; re-adding for the same owner
/// overwrites. The map itself does not verify the signatures, it only
/// assembles them in the byte order the contract expects.
#[derive(Debug, Clone, Default)]
pub struct SafeTransaction {
    /// The transaction parameters
    pub data: SafeTransactionData,
    /// Owner address -> 65-byte r || s || v signature
    signatures: BTreeMap<Address, Bytes>,
}

impl SafeTransaction {
    /// Wraps transaction data with an empty signature set
    pub fn new(data: SafeTransactionData) -> Self {
        Self {
            data,
            signatures: BTreeMap::new(),
        }
    }

    /// Stores (or overwrites) the signature for an owner
    pub fn add_signature(&mut self, owner: Address, signature: impl Into<Bytes>) {
        self.signatures.insert(owner, signature.into());
    }

    /// Stores a pre-validated signature for an owner (r = owner, s = 0, v = 1).
    ///
    /// The contract trusts such a signature only if the owner has separately
    /// approved the transaction hash on-chain via `approveHash`.
    pub fn add_prevalidated_signature(&mut self, owner: Address) {
        self.signatures
            .insert(owner, encode_pre_validated_signature(owner));
    }

    /// Returns the number of collected signatures
    pub fn signature_count(&self) -> usize {
        self.signatures.len()
    }

    /// Returns the signature stored for an owner, if any
    pub fn signature_for(&self, owner: Address) -> Option<&Bytes> {
        self.signatures.get(&owner)
    }

    /// Concatenates all signatures ordered by ascending owner address.
    ///
    /// The Safe signature checker requires strictly increasing signer
    /// addresses; any other order reverts with GS024.
    pub fn sorted_signatures(&self) -> Bytes {
        let mut out = Vec::with_capacity(self.signatures.len() * 65);
        for sig in self.signatures.values() {
            out.extend_from_slice(sig);
        }
        Bytes::from(out)
    }
}

/// Configuration for deploying a new Safe
#[derive(Debug, Clone)]
pub struct SafeAccountConfig {
    /// Owner addresses (non-empty, unique)
    pub owners: Vec<Address>,
    /// Number of required confirmations (1..=owners.len())
    pub threshold: u64,
    /// Optional setup delegate call target
    pub to: Address,
    /// Optional setup delegate call data
    pub data: Bytes,
    /// Fallback handler contract
    pub fallback_handler: Address,
    /// Token used for the deployment payment (address(0) for ETH)
    pub payment_token: Address,
    /// Deployment payment amount
    pub payment: U256,
    /// Deployment payment receiver
    pub payment_receiver: Address,
}

impl SafeAccountConfig {
    /// Creates a deployment configuration, validating the owner set and
    /// threshold up front
    pub fn new(owners: Vec<Address>, threshold: u64) -> Result<Self> {
        if owners.is_empty() {
            return Err(Error::InvalidConfig("owners must not be empty".into()));
        }
        let mut seen = std::collections::HashSet::new();
        for owner in &owners {
            if !seen.insert(*owner) {
                return Err(Error::InvalidConfig(format!("duplicate owner {owner}")));
            }
        }
        if threshold == 0 || threshold as usize > owners.len() {
            return Err(Error::InvalidConfig(format!(
                "threshold {threshold} out of range for {} owners",
                owners.len()
            )));
        }

        Ok(Self {
            owners,
            threshold,
            to: Address::ZERO,
            data: Bytes::new(),
            fallback_handler: Address::ZERO,
            payment_token: Address::ZERO,
            payment: U256::ZERO,
            payment_receiver: Address::ZERO,
        })
    }

    /// Sets an optional delegate call executed during setup
    pub fn with_setup_call(mut self, to: Address, data: impl Into<Bytes>) -> Self {
        self.to = to;
        self.data = data.into();
        self
    }

    /// Sets the fallback handler
    pub fn with_fallback_handler(mut self, handler: Address) -> Self {
        self.fallback_handler = handler;
        self
    }

    /// Sets the deployment payment parameters
    pub fn with_payment(mut self, token: Address, payment: U256, receiver: Address) -> Self {
        self.payment_token = token;
        self.payment = payment;
        self.payment_receiver = receiver;
        self
    }
}
