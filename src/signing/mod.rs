//! Signature generation for Safe transactions

mod ecdsa;

pub use ecdsa::{
    encode_pre_validated_signature, eth_sign_adjust_v, sign_hash, validate_signature,
};

/// How a Safe transaction hash is signed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SigningMethod {
    /// EIP-712 typed data (default)
    #[default]
    Eip712,
    /// Legacy personal-message signing; the recovery id is shifted by 4 so
    /// the contract can tell the two apart
    EthSign,
}
