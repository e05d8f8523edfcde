use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("transaction has no sender identity")]
    MissingSender,

    #[error("reward transactions are pre-authorized and cannot be signed")]
    RewardNotSignable,
}
