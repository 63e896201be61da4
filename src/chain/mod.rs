//! Chain configuration for Safe deployments

mod config;

pub use config::{chain_ids, transaction_service_url, ChainAddresses, ChainConfig};
