//! EIP-712 hashing and typed-data construction for Safe transactions
//!
//! The hash computed here must match the Safe contract's
//! `getTransactionHash` bit for bit; a single wrong byte produces a
//! signature the on-chain verifier rejects.

use alloy::primitives::{keccak256, Address, B256, U256};
use alloy::sol;
use alloy::sol_types::{eip712_domain, Eip712Domain};

use crate::contracts::{DOMAIN_SEPARATOR_TYPEHASH, SAFE_TX_TYPEHASH};
use crate::types::SafeTransactionData;

sol! {
    /// EIP-712 struct signed by Safe owners. Field order is fixed by the
    /// contract's SafeTx typehash.
    struct SafeTx {
        address to;
        uint256 value;
        bytes data;
        uint8 operation;
        uint256 safeTxGas;
        uint256 baseGas;
        uint256 gasPrice;
        address gasToken;
        address refundReceiver;
        uint256 nonce;
    }
}

/// Builds the EIP-712 document (domain + message) for a Safe transaction.
///
/// The domain carries only `chainId` and `verifyingContract`; Safe does not
/// use name/version fields. An unresolved nonce defaults to 0 for hashing
/// purposes only.
pub fn build_typed_data(
    tx: &SafeTransactionData,
    chain_id: u64,
    safe_address: Address,
) -> (SafeTx, Eip712Domain) {
    let message = SafeTx {
        to: tx.to,
        value: tx.value,
        data: tx.data.clone(),
        operation: tx.operation.as_u8(),
        safeTxGas: tx.safe_tx_gas,
        baseGas: tx.base_gas,
        gasPrice: tx.gas_price,
        gasToken: tx.gas_token,
        refundReceiver: tx.refund_receiver,
        nonce: tx.nonce_or_zero(),
    };

    let domain = eip712_domain! {
        chain_id: chain_id,
        verifying_contract: safe_address,
    };

    (message, domain)
}

/// Computes the domain separator for a Safe
///
/// domain_separator = keccak256(abi.encode(DOMAIN_SEPARATOR_TYPEHASH, chainId, safeAddress))
pub fn compute_domain_separator(chain_id: u64, safe_address: Address) -> B256 {
    let mut encoded = Vec::with_capacity(96);

    encoded.extend_from_slice(DOMAIN_SEPARATOR_TYPEHASH.as_slice());
    encoded.extend_from_slice(&U256::from(chain_id).to_be_bytes::<32>());

    let mut addr_bytes = [0u8; 32];
    addr_bytes[12..].copy_from_slice(safe_address.as_slice());
    encoded.extend_from_slice(&addr_bytes);

    keccak256(&encoded)
}

/// Computes the struct hash for SafeTx
///
/// safeTxHash = keccak256(abi.encode(
///     SAFE_TX_TYPEHASH,
///     to, value, keccak256(data), operation,
///     safeTxGas, baseGas, gasPrice, gasToken, refundReceiver, nonce
/// ))
pub fn compute_safe_tx_hash(tx: &SafeTransactionData) -> B256 {
    let mut encoded = Vec::with_capacity(352);

    encoded.extend_from_slice(SAFE_TX_TYPEHASH.as_slice());

    let mut to_bytes = [0u8; 32];
    to_bytes[12..].copy_from_slice(tx.to.as_slice());
    encoded.extend_from_slice(&to_bytes);

    encoded.extend_from_slice(&tx.value.to_be_bytes::<32>());

    // dynamic field: hashed, not inlined
    encoded.extend_from_slice(keccak256(&tx.data).as_slice());

    let mut op_bytes = [0u8; 32];
    op_bytes[31] = tx.operation.as_u8();
    encoded.extend_from_slice(&op_bytes);

    encoded.extend_from_slice(&tx.safe_tx_gas.to_be_bytes::<32>());
    encoded.extend_from_slice(&tx.base_gas.to_be_bytes::<32>());
    encoded.extend_from_slice(&tx.gas_price.to_be_bytes::<32>());

    let mut gas_token_bytes = [0u8; 32];
    gas_token_bytes[12..].copy_from_slice(tx.gas_token.as_slice());
    encoded.extend_from_slice(&gas_token_bytes);

    let mut refund_bytes = [0u8; 32];
    refund_bytes[12..].copy_from_slice(tx.refund_receiver.as_slice());
    encoded.extend_from_slice(&refund_bytes);

    encoded.extend_from_slice(&tx.nonce_or_zero().to_be_bytes::<32>());

    keccak256(&encoded)
}

/// Computes the final EIP-712 hash to sign
///
/// hash = keccak256("\x19\x01" || domainSeparator || safeTxHash)
pub fn compute_transaction_hash(domain_separator: B256, safe_tx_hash: B256) -> B256 {
    let mut encoded = Vec::with_capacity(66);

    encoded.extend_from_slice(&[0x19, 0x01]);
    encoded.extend_from_slice(domain_separator.as_slice());
    encoded.extend_from_slice(safe_tx_hash.as_slice());

    keccak256(&encoded)
}

/// Computes the complete transaction hash for signing
pub fn compute_safe_transaction_hash(
    chain_id: u64,
    safe_address: Address,
    tx: &SafeTransactionData,
) -> B256 {
    let domain_separator = compute_domain_separator(chain_id, safe_address);
    let safe_tx_hash = compute_safe_tx_hash(tx);
    compute_transaction_hash(domain_separator, safe_tx_hash)
}
