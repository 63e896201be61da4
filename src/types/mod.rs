//! Type definitions for Safe transactions

mod operation;
mod transaction;

pub use operation::Operation;
pub use transaction::{SafeAccountConfig, SafeTransaction, SafeTransactionData};
