//! Encoding utilities for Safe transactions

mod eip712;
mod multisend;

pub use eip712::{
    build_typed_data, compute_domain_separator, compute_safe_transaction_hash,
    compute_safe_tx_hash, compute_transaction_hash, SafeTx,
};
pub use multisend::{decode_multisend, encode_multisend, encode_transaction};
