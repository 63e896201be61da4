//! MultiSend transaction encoding
//!
//! The MultiSend contract expects transactions to be encoded in a packed format:
//! - operation: 1 byte (0 = Call, 1 = DelegateCall)
//! - to: 20 bytes
//! - value: 32 bytes
//! - data length: 32 bytes
//! - data: variable length
//!
//! No padding, no separators, no terminator. Each sub-call carries its own
//! operation byte; it is independent of the DelegateCall flag on the wrapping
//! Safe transaction that invokes the MultiSend contract.

use alloy::primitives::{Address, Bytes, U256};

use crate::error::{Error, Result};
use crate::types::{Operation, SafeTransactionData};

/// Encodes a single transaction for MultiSend packed format
///
/// Format: operation (1 byte) | to (20 bytes) | value (32 bytes) | data length (32 bytes) | data
pub fn encode_transaction(tx: &SafeTransactionData) -> Vec<u8> {
    let data_len = tx.data.len();

    let mut encoded = Vec::with_capacity(85 + data_len);

    // Operation (1 byte)
    encoded.push(tx.operation.as_u8());

    // To address (20 bytes)
    encoded.extend_from_slice(tx.to.as_slice());

    // Value (32 bytes, big-endian)
    encoded.extend_from_slice(&tx.value.to_be_bytes::<32>());

    // Data length (32 bytes, big-endian)
    let mut data_len_bytes = [0u8; 32];
    data_len_bytes[24..].copy_from_slice(&(data_len as u64).to_be_bytes());
    encoded.extend_from_slice(&data_len_bytes);

    // Data
    encoded.extend_from_slice(&tx.data);

    encoded
}

/// Encodes an ordered sequence of transactions for MultiSend
pub fn encode_multisend(txs: &[SafeTransactionData]) -> Bytes {
    let mut encoded = Vec::new();

    for tx in txs {
        encoded.extend(encode_transaction(tx));
    }

    Bytes::from(encoded)
}

/// Decodes a MultiSend blob back into its sub-calls by walking the packed
/// layout. Fails on truncated input or an unknown operation byte.
pub fn decode_multisend(encoded: &[u8]) -> Result<Vec<SafeTransactionData>> {
    let mut txs = Vec::new();
    let mut offset = 0;

    while offset < encoded.len() {
        if encoded.len() - offset < 85 {
            return Err(Error::Encoding(format!(
                "truncated multisend entry at offset {offset}"
            )));
        }

        let operation = Operation::from_u8(encoded[offset]).ok_or_else(|| {
            Error::Encoding(format!("invalid operation byte {}", encoded[offset]))
        })?;
        offset += 1;

        let to = Address::from_slice(&encoded[offset..offset + 20]);
        offset += 20;

        let value = U256::from_be_slice(&encoded[offset..offset + 32]);
        offset += 32;

        let data_len = U256::from_be_slice(&encoded[offset..offset + 32]);
        offset += 32;

        let data_len = usize::try_from(data_len)
            .map_err(|_| Error::Encoding("data length exceeds usize".to_string()))?;
        if encoded.len() - offset < data_len {
            return Err(Error::Encoding(format!(
                "data length {data_len} exceeds remaining input"
            )));
        }

        let data = Bytes::copy_from_slice(&encoded[offset..offset + data_len]);
        offset += data_len;

        txs.push(SafeTransactionData::new(to, value, data, operation));
    }

    Ok(txs)
}
