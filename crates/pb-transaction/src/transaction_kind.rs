use serde::{Deserialize, Serialize};

/// Distinguishes user-issued transfers from ledger-minted rewards.
///
/// A `Transfer` must carry a valid Ed25519 signature before a ledger accepts
/// it. A `Reward` is authorized by the ledger that minted it and is never
/// independently signed or verified, so the signature exemption is explicit
/// in the type rather than an implicit bypass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    Transfer,
    Reward,
}
