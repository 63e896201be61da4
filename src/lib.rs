//! # safe-kit
//!
//! A Rust library for interacting with Safe smart accounts (v1.4.1 and
//! v1.3.0): transaction construction, EIP-712 hashing, multi-owner signature
//! collection, MultiSend batching, deterministic deployment, and the Safe
//! Transaction Service API.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use safe_kit::{Operation, Safe, SafeTransactionData, SigningMethod};
//! use alloy::primitives::{address, U256};
//!
//! // Connect to a deployed Safe
//! let safe = Safe::connect(provider, Some(signer), safe_address).await?;
//!
//! // Build, sign and execute a transfer
//! let mut tx = safe
//!     .create_native_transfer_transaction(recipient, U256::from(1_000_000_000_000_000u64))
//!     .await?;
//! safe.sign_transaction(&mut tx, SigningMethod::Eip712).await?;
//! let result = safe.execute_transaction(&tx).await?;
//! ```
//!
//! ## Deterministic deployment
//!
//! ```rust,ignore
//! use safe_kit::{SafeAccountConfig, SafeFactory};
//!
//! let factory = SafeFactory::connect(provider, Some(signer)).await?;
//! let config = SafeAccountConfig::new(vec![owner], 1)?;
//!
//! // The address is known before the deployment transaction lands
//! let predicted = factory.predict_address(&config, U256::ZERO).await?;
//! let safe = factory.deploy(&config, U256::ZERO).await?;
//! assert_eq!(safe.address(), predicted);
//! ```
//!
//! ## Multi-owner flow
//!
//! Signatures collect in ascending owner-address order, the layout the Safe
//! contract verifies. Owners on other machines coordinate through the
//! [`SafeServiceClient`].
//!
//! ```rust,ignore
//! let mut tx = safe.create_transaction(tx_data).await?;
//! safe.sign_transaction(&mut tx, SigningMethod::Eip712).await?;
//! tx.add_signature(other_owner, other_signature);
//! safe.execute_transaction(&tx).await?;
//! ```

pub mod chain;
pub mod contracts;
pub mod encoding;
pub mod error;
pub mod factory;
pub mod safe;
pub mod service;
pub mod signing;
pub mod types;

// Re-export main types at crate root
pub use chain::{chain_ids, transaction_service_url, ChainAddresses, ChainConfig};
pub use contracts::{
    IERC20, IERC721, IMultiSend, ISafe, ISafeProxyFactory, SENTINEL_ADDRESS,
};
pub use encoding::{
    build_typed_data, compute_domain_separator, compute_safe_transaction_hash,
    decode_multisend, encode_multisend,
};
pub use error::{Error, Result};
pub use factory::SafeFactory;
pub use safe::{previous_element, ExecutionResult, Safe};
pub use service::{ListOptions, MultisigTransaction, SafeServiceClient, ServiceInfo};
pub use signing::{encode_pre_validated_signature, SigningMethod};
pub use types::{Operation, SafeAccountConfig, SafeTransaction, SafeTransactionData};

// Re-export alloy types that are commonly used
pub use alloy::network::AnyNetwork;
pub use alloy::primitives::{Address, Bytes, B256, U256};
pub use alloy::providers::Provider;
