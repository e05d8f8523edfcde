use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("transaction signature is missing or does not verify")]
    InvalidTransaction,

    #[error("reward transactions are minted by the ledger and cannot be submitted")]
    RewardNotSubmittable,

    #[error("mining stopped before a conforming hash was found")]
    MiningInterrupted,
}

/// A structural defect found while validating the chain, naming the failing
/// block and the check that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChainViolation {
    #[error("block {index} does not match its recorded hash")]
    TamperedBlock { index: u64 },

    #[error("block {index} is not linked to its predecessor's hash")]
    BrokenLinkage { index: u64 },

    #[error("block {index} does not follow its predecessor's index")]
    OutOfSequence { index: u64 },
}
