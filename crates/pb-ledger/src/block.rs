use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use pb_transaction::Transaction;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::{ChainViolation, LedgerError};

/// How many nonces the mining loop tries between looks at the stop flag.
const STOP_CHECK_INTERVAL: u64 = 1024;

/// A block whose fields may still change: the under-construction phase.
///
/// The builder is where the proof-of-work search happens. Once a conforming
/// nonce is found the builder seals into an immutable [`Block`]; from then
/// on the block can only be read.
#[derive(Debug, Clone)]
pub struct BlockBuilder {
    /// Position the block will take in the chain.
    pub index: u64,

    /// Hash of the intended predecessor. A ledger overwrites this with its
    /// tip's hash on append, whatever the caller supplied.
    pub previous_hash: [u8; 32],

    /// Transactions to bundle, in final order — order affects the hash.
    pub transactions: Vec<Transaction>,

    /// Unix timestamp (seconds) of block creation.
    pub timestamp: i64,

    /// Proof-of-work search counter.
    pub nonce: u64,
}

impl BlockBuilder {
    /// Start a block at `index` chained to `previous_hash`, timestamped now.
    pub fn new(index: u64, previous_hash: [u8; 32], transactions: Vec<Transaction>) -> Self {
        Self {
            index,
            previous_hash,
            transactions,
            timestamp: Utc::now().timestamp(),
            nonce: 0,
        }
    }

    /// Compute the SHA-256 digest of the five header fields.
    ///
    /// The transaction sequence enters the digest through each transaction's
    /// recomputed payload digest, in order, so reordering or editing any
    /// bundled transaction changes the block hash.
    pub fn compute_hash(&self) -> [u8; 32] {
        block_digest(
            self.index,
            &self.previous_hash,
            &self.transactions,
            self.timestamp,
            self.nonce,
        )
    }

    /// Search for a nonce whose hash has `difficulty` leading zero hex
    /// digits, checking `stop` once per batch of nonce attempts.
    ///
    /// Returns [`LedgerError::MiningInterrupted`] when the flag is raised
    /// before a conforming nonce turns up; the partially-searched builder is
    /// discarded with it.
    pub fn mine_with_stop(
        mut self,
        difficulty: usize,
        stop: &AtomicBool,
    ) -> Result<Block, LedgerError> {
        let mut hash = self.compute_hash();
        while !meets_difficulty(&hash, difficulty) {
            if self.nonce % STOP_CHECK_INTERVAL == 0 && stop.load(Ordering::Relaxed) {
                return Err(LedgerError::MiningInterrupted);
            }
            self.nonce += 1;
            hash = self.compute_hash();
        }
        info!("Block mined: {}", hex::encode(hash));
        Ok(self.into_block(hash))
    }

    /// Search with no external stop condition.
    ///
    /// This is an unbounded blocking loop: it occupies the calling thread
    /// until a conforming nonce is found, which is only reasonable at low
    /// difficulty.
    pub fn mine(self, difficulty: usize) -> Block {
        let never = AtomicBool::new(false);
        self.mine_with_stop(difficulty, &never)
            .expect("mining without a stop flag cannot be interrupted")
    }

    /// Seal without mining. Only genesis skips the difficulty predicate.
    pub(crate) fn seal(self) -> Block {
        let hash = self.compute_hash();
        self.into_block(hash)
    }

    fn into_block(self, hash: [u8; 32]) -> Block {
        Block {
            index: self.index,
            previous_hash: self.previous_hash,
            transactions: self.transactions,
            timestamp: self.timestamp,
            nonce: self.nonce,
            hash,
        }
    }
}

/// A sealed block: immutable once mined (or, for genesis, sealed unmined).
///
/// The public API is read-only; any later mutation of a stored block must
/// surface through [`crate::Ledger::validate`] rather than be prevented at
/// runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub(crate) index: u64,
    pub(crate) previous_hash: [u8; 32],
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) timestamp: i64,
    pub(crate) nonce: u64,
    pub(crate) hash: [u8; 32],
}

impl Block {
    /// The fixed first block of every chain: index 0, all-zero previous
    /// hash, no transactions. Never mined — the difficulty predicate is not
    /// enforced on genesis.
    pub fn genesis() -> Self {
        BlockBuilder::new(0, [0u8; 32], Vec::new()).seal()
    }

    /// Sequential block height (genesis = 0).
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Hash of the preceding block. All-zero for genesis.
    pub fn previous_hash(&self) -> [u8; 32] {
        self.previous_hash
    }

    /// The transactions bundled in this block.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Unix timestamp (seconds) of block creation.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// The nonce the proof-of-work search settled on.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// The block's content hash, fixed at sealing time.
    pub fn hash(&self) -> [u8; 32] {
        self.hash
    }

    /// Hex-encoded block hash.
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Recompute the digest from the stored fields.
    ///
    /// Differs from [`Block::hash`] exactly when a field was mutated after
    /// sealing.
    pub fn compute_hash(&self) -> [u8; 32] {
        block_digest(
            self.index,
            &self.previous_hash,
            &self.transactions,
            self.timestamp,
            self.nonce,
        )
    }

    /// Structural check of this block against its predecessor: contiguous
    /// index, previous-hash linkage, then stored-hash integrity.
    ///
    /// Linkage is checked before integrity so that an overwritten
    /// `previous_hash` — which also perturbs the recomputed digest — is
    /// reported as the linkage break it is.
    pub fn verify_against(&self, prev: &Block) -> Result<(), ChainViolation> {
        if self.index != prev.index + 1 {
            return Err(ChainViolation::OutOfSequence { index: self.index });
        }
        if self.previous_hash != prev.hash {
            return Err(ChainViolation::BrokenLinkage { index: self.index });
        }
        if self.hash != self.compute_hash() {
            return Err(ChainViolation::TamperedBlock { index: self.index });
        }
        Ok(())
    }
}

/// SHA-256 over the five header fields, with the transaction sequence
/// represented by its count followed by each transaction's payload digest.
fn block_digest(
    index: u64,
    previous_hash: &[u8; 32],
    transactions: &[Transaction],
    timestamp: i64,
    nonce: u64,
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(index.to_le_bytes());
    hasher.update(previous_hash);
    hasher.update((transactions.len() as u64).to_le_bytes());
    for tx in transactions {
        hasher.update(tx.payload_digest());
    }
    hasher.update(timestamp.to_le_bytes());
    hasher.update(nonce.to_le_bytes());
    hasher.finalize().into()
}

/// Proof-of-work predicate: the first `difficulty` hex digits of the hash
/// are `'0'`, i.e. its leading `difficulty` nibbles are zero.
fn meets_difficulty(hash: &[u8; 32], difficulty: usize) -> bool {
    hash.iter()
        .flat_map(|byte| [byte >> 4, byte & 0x0f])
        .take(difficulty)
        .all(|nibble| nibble == 0)
}
