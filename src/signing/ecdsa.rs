//! ECDSA signature generation and formatting for Safe transactions

use alloy::primitives::{Address, Bytes, B256};
use alloy::signers::Signer;

use crate::error::{Error, Result};

/// Signs a message hash and formats it for Safe
///
/// Safe expects signatures in the format: r (32 bytes) || s (32 bytes) || v (1 byte)
/// where v is adjusted to be 27 or 28
pub async fn sign_hash<S: Signer>(signer: &S, hash: B256) -> Result<Bytes> {
    let signature = signer.sign_hash(&hash).await?;

    let r = signature.r();
    let s = signature.s();

    // v is a bool (y_parity) in alloy - true means odd (28), false means even (27)
    let v_byte = if signature.v() { 28u8 } else { 27u8 };

    let mut sig_bytes = Vec::with_capacity(65);
    sig_bytes.extend_from_slice(&r.to_be_bytes::<32>());
    sig_bytes.extend_from_slice(&s.to_be_bytes::<32>());
    sig_bytes.push(v_byte);

    Ok(Bytes::from(sig_bytes))
}

/// Adjusts the recovery id of a 65-byte signature for the eth_sign path.
///
/// The Safe signature checker distinguishes typed-data signatures (v 27/28)
/// from personal-message signatures (v 31/32) by adding 4 to v. Only plain
/// ECDSA signatures can be adjusted; any other v is rejected.
pub fn eth_sign_adjust_v(signature: &[u8]) -> Result<Bytes> {
    if signature.len() != 65 {
        return Err(Error::Signing(format!(
            "Invalid signature length: expected 65, got {}",
            signature.len()
        )));
    }

    let v = signature[64];
    if !matches!(v, 27 | 28) {
        return Err(Error::Signing(format!(
            "Cannot apply eth_sign adjustment to signature with v = {v}"
        )));
    }

    let mut adjusted = signature.to_vec();
    adjusted[64] = v + 4;
    Ok(Bytes::from(adjusted))
}

/// Encodes a pre-validated signature for a given owner
///
/// r = owner address left-padded to 32 bytes, s = 0, v = 1. The contract
/// accepts it only for owners that approved the hash on-chain beforehand.
pub fn encode_pre_validated_signature(owner: Address) -> Bytes {
    let mut sig_bytes = Vec::with_capacity(65);

    // r = owner address (left-padded to 32 bytes)
    let mut r = [0u8; 32];
    r[12..].copy_from_slice(owner.as_slice());
    sig_bytes.extend_from_slice(&r);

    // s = 0 (32 bytes)
    sig_bytes.extend_from_slice(&[0u8; 32]);

    // v = 1 (indicates pre-validated signature)
    sig_bytes.push(1);

    Bytes::from(sig_bytes)
}

/// Validates that a signature is 65 bytes and has a valid v value
pub fn validate_signature(signature: &[u8]) -> Result<()> {
    if signature.len() != 65 {
        return Err(Error::Signing(format!(
            "Invalid signature length: expected 65, got {}",
            signature.len()
        )));
    }

    let v = signature[64];
    // Valid v values: 0, 1 (pre-validated), 27, 28 (ECDSA), 31, 32 (eth_sign)
    if !matches!(v, 0 | 1 | 27 | 28 | 31 | 32) {
        return Err(Error::Signing(format!("Invalid signature v value: {}", v)));
    }

    Ok(())
}
