pub mod crypto;
pub mod error;
pub mod transaction;
pub mod transaction_kind;

pub use crypto::Keypair;
pub use error::TransactionError;
pub use transaction::Transaction;
pub use transaction_kind::TransactionKind;

/// Sentinel sender identity carried by ledger-minted reward transactions.
///
/// Not a real key: nothing can sign for it, and reward transactions are
/// authorized by the minting ledger rather than by signature.
pub const REWARD_SENDER: &str = "SYSTEM";
