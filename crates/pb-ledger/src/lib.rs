pub mod block;
pub mod error;
pub mod ledger;

pub use block::{Block, BlockBuilder};
pub use error::{ChainViolation, LedgerError};
pub use ledger::Ledger;

/// Amount credited to the miner after each successfully mined block.
pub const MINING_REWARD: u64 = 50;

/// Difficulty used by [`Ledger::default`]: the number of leading zero hex
/// digits a mined block hash must have.
pub const DEFAULT_DIFFICULTY: usize = 4;
