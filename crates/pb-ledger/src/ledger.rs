use pb_transaction::{Transaction, TransactionKind};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    block::{Block, BlockBuilder},
    error::{ChainViolation, LedgerError},
    DEFAULT_DIFFICULTY, MINING_REWARD,
};

/// The append-only chain of [`Block`]s plus the mempool of transactions
/// waiting to be mined.
///
/// Invariants maintained by this type:
/// - The chain always contains at least the genesis block.
/// - Every non-genesis block's `previous_hash` matches the hash of the
///   preceding block.
/// - Block indices are contiguous starting from 0.
///
/// The ledger exclusively owns both structures; single-threaded, synchronous
/// use is assumed throughout. Concurrent miners or submitters would need
/// mutual exclusion around every structural mutation plus a stop signal for
/// losing miners — neither is provided here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    chain: Vec<Block>,
    mempool: Vec<Transaction>,
    difficulty: usize,
    mining_reward: u64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(DEFAULT_DIFFICULTY)
    }
}

impl Ledger {
    /// Initialise a ledger with only the genesis block and an empty mempool.
    pub fn new(difficulty: usize) -> Self {
        Self {
            chain: vec![Block::genesis()],
            mempool: Vec::new(),
            difficulty,
            mining_reward: MINING_REWARD,
        }
    }

    /// Number of blocks in the chain (including genesis).
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// The most recent block.
    pub fn tip(&self) -> &Block {
        // Safety: always at least one block (genesis).
        self.chain.last().unwrap()
    }

    /// All blocks in the chain.
    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    /// Return a reference to a block by its index.
    pub fn get_block(&self, index: u64) -> Option<&Block> {
        self.chain.get(index as usize)
    }

    /// Transactions accepted but not yet mined into a block.
    pub fn pending(&self) -> &[Transaction] {
        &self.mempool
    }

    /// The number of leading zero hex digits required of mined block hashes.
    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    /// Amount credited to the miner per mined block.
    pub fn mining_reward(&self) -> u64 {
        self.mining_reward
    }

    /// Submit a transaction to the mempool.
    ///
    /// Rewards are rejected outright: only the ledger itself mints them,
    /// inside [`Ledger::mine_pending_transactions`]. Transfers must carry a
    /// valid signature. The mempool is unchanged on rejection; no balance
    /// check exists because there is no balance model.
    pub fn add_transaction(&mut self, tx: Transaction) -> Result<(), LedgerError> {
        if tx.kind == TransactionKind::Reward {
            return Err(LedgerError::RewardNotSubmittable);
        }
        if !tx.is_valid() {
            return Err(LedgerError::InvalidTransaction);
        }
        self.mempool.push(tx);
        Ok(())
    }

    /// Chain `builder` to the current tip, mine it, and append it.
    ///
    /// The builder's `previous_hash` is overwritten with the tip's hash —
    /// whatever the caller supplied, the new block extends the current tip.
    pub fn add_block(&mut self, mut builder: BlockBuilder) -> &Block {
        builder.previous_hash = self.tip().hash();
        let block = builder.mine(self.difficulty);
        info!("Block {} added to the chain", block.index());
        self.chain.push(block);
        self.chain.last().unwrap()
    }

    /// Mine the current mempool into a new block and credit `miner_address`.
    ///
    /// The mempool is drained into a block at the next index chained to the
    /// tip; the block is mined and appended; the mempool is then replaced
    /// with a single reward transaction (SYSTEM → `miner_address`) that will
    /// ride in the next mined block. The reward never passes the
    /// [`Ledger::add_transaction`] signature gate — it is minted here, under
    /// the ledger's own authority.
    pub fn mine_pending_transactions(&mut self, miner_address: &str) -> &Block {
        let transactions = std::mem::take(&mut self.mempool);
        let builder = BlockBuilder::new(self.chain.len() as u64, self.tip().hash(), transactions);
        let block = builder.mine(self.difficulty);
        info!("Block {} mined and added to the chain", block.index());
        self.chain.push(block);

        self.mempool = vec![Transaction::reward(miner_address, self.mining_reward)];
        self.chain.last().unwrap()
    }

    /// Walk adjacent block pairs and report the first violation found.
    ///
    /// Each non-genesis block is checked for linkage to its predecessor and
    /// for integrity of its stored hash; genesis itself is never checked
    /// against a predecessor. Validation runs only on demand — nothing
    /// checks the chain automatically on append.
    pub fn validate(&self) -> Result<(), ChainViolation> {
        for window in self.chain.windows(2) {
            if let Err(violation) = window[1].verify_against(&window[0]) {
                warn!("{violation}");
                return Err(violation);
            }
        }
        Ok(())
    }

    /// `true` when [`Ledger::validate`] finds no violation.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}
