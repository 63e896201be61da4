//! Error types for safe-kit

use alloy::primitives::Address;
use thiserror::Error;

/// Result type alias for safe-kit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when interacting with Safe smart accounts
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to connect to the RPC provider
    #[error("Provider error: {0}")]
    Provider(String),

    /// Failed to fetch data from the blockchain
    #[error("Failed to fetch {what}: {reason}")]
    Fetch { what: &'static str, reason: String },

    /// Malformed or wrong-length address.
    ///
    /// Not produced by this crate (the typed API takes `Address` values);
    /// reserved for callers that parse user-supplied address strings.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Safe contract not deployed at the given address
    #[error("No contract code at {0}")]
    SafeNotDeployed(Address),

    /// The provider is connected to a different chain than expected
    #[error("Provider chain ID ({actual}) does not match expected chain ID ({expected})")]
    ChainIdMismatch { expected: u64, actual: u64 },

    /// Owner or module not present in the on-chain linked list
    #[error("{kind} {address} not found")]
    NotFound {
        kind: &'static str,
        address: Address,
    },

    /// Invalid deployment configuration (empty owners, threshold out of range)
    #[error("Invalid Safe configuration: {0}")]
    InvalidConfig(String),

    /// Operation requires a signing key but none is configured
    #[error("No signer configured")]
    NoSigner,

    /// Unknown signing method requested.
    ///
    /// Not produced by this crate (`SigningMethod` is a closed enum);
    /// reserved for callers that map method names from configuration.
    #[error("Unsupported signing method: {0}")]
    UnsupportedMethod(String),

    /// Safe transaction failed on-chain, with the revert reason translated
    /// through the GS error-code table when it matches
    #[error("{}{message}", code.map(|c| format!("{c}: ")).unwrap_or_default())]
    Transaction {
        code: Option<&'static str>,
        message: String,
    },

    /// Signature generation or validation failed
    #[error("Failed to sign: {0}")]
    Signing(String),

    /// Encoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Non-2xx response from the Safe Transaction Service
    #[error("Service error (status {status}): {body}")]
    Service { status: u16, body: String },
}

/// Known Safe contract error codes mapped to human-readable messages.
///
/// These are the `GSxxx` codes the Safe singleton reverts with.
pub const SAFE_ERRORS: &[(&str, &str)] = &[
    ("GS000", "Could not finish initialization"),
    ("GS001", "Threshold needs to be defined"),
    ("GS010", "Not enough gas to execute Safe transaction"),
    ("GS011", "Could not pay gas costs with ether"),
    ("GS012", "Could not pay gas costs with token"),
    ("GS013", "Safe transaction failed when gasPrice and safeTxGas were 0"),
    ("GS020", "Signatures data too short"),
    ("GS021", "Invalid signature provided"),
    ("GS022", "Invalid signature provided (duplicate)"),
    ("GS023", "Invalid signature provided (not owner)"),
    ("GS024", "Invalid signature provided (not sorted)"),
    ("GS025", "Invalid signature provided (v is 0)"),
    ("GS026", "Invalid signature provided (v > 30)"),
    ("GS030", "Only owners can approve a hash"),
    ("GS031", "Hash has already been approved"),
    ("GS100", "Modules have already been initialized"),
    ("GS130", "New owner cannot be the null address"),
];

/// Translates a raw revert/transport error string into `Error::Transaction`,
/// matching against the GS error-code table.
pub fn translate_contract_error(raw: impl ToString) -> Error {
    let raw = raw.to_string();
    for (code, message) in SAFE_ERRORS {
        if raw.contains(code) {
            return Error::Transaction {
                code: Some(code),
                message: (*message).to_string(),
            };
        }
    }
    Error::Transaction {
        code: None,
        message: raw,
    }
}

impl From<alloy::transports::RpcError<alloy::transports::TransportErrorKind>> for Error {
    fn from(err: alloy::transports::RpcError<alloy::transports::TransportErrorKind>) -> Self {
        Error::Provider(err.to_string())
    }
}

impl From<alloy::contract::Error> for Error {
    fn from(err: alloy::contract::Error) -> Self {
        Error::Provider(err.to_string())
    }
}

impl From<alloy::signers::Error> for Error {
    fn from(err: alloy::signers::Error) -> Self {
        Error::Signing(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Service {
            status: err.status().map(|s| s.as_u16()).unwrap_or(0),
            body: err.to_string(),
        }
    }
}
