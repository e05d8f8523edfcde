use chrono::Utc;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{TransactionError, TransactionKind, REWARD_SENDER};

/// A single value-transfer record.
///
/// `hash` is a pure function of the four payload fields (sender, receiver,
/// amount, timestamp) and is computed eagerly at construction, independent of
/// whether the record has been authorized. Signing and verification operate
/// on those digest bytes. Mutating a payload field without recomputing the
/// hash leaves a record that chain validation will flag once it sits inside
/// a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// User transfer vs. ledger-minted reward.
    pub kind: TransactionKind,

    /// Hex-encoded Ed25519 verifying key of the sender, or [`REWARD_SENDER`]
    /// for rewards.
    pub sender: String,

    /// Hex-encoded Ed25519 verifying key of the receiver.
    pub receiver: String,

    /// Transferred amount. Recorded only — no balance model exists.
    pub amount: u64,

    /// Unix timestamp (seconds) when this transaction was created.
    pub timestamp: i64,

    /// Ed25519 signature over the payload digest. `None` until signed.
    pub signature: Option<Vec<u8>>,

    /// SHA-256 digest of (sender, receiver, amount, timestamp).
    pub hash: [u8; 32],
}

impl Transaction {
    /// Create an unsigned user transfer timestamped now.
    pub fn transfer(
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: u64,
    ) -> Self {
        Self::transfer_at(sender, receiver, amount, Utc::now().timestamp())
    }

    /// Create an unsigned user transfer with an explicit timestamp.
    pub fn transfer_at(
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: u64,
        timestamp: i64,
    ) -> Self {
        let sender = sender.into();
        let receiver = receiver.into();
        let hash = payload_digest(&sender, &receiver, amount, timestamp);
        Self {
            kind: TransactionKind::Transfer,
            sender,
            receiver,
            amount,
            timestamp,
            signature: None,
            hash,
        }
    }

    /// Mint a reward transaction, timestamped now.
    ///
    /// The sender is the [`REWARD_SENDER`] sentinel; the record stays
    /// unsigned and is accepted on the ledger's own authority.
    pub fn reward(receiver: impl Into<String>, amount: u64) -> Self {
        let receiver = receiver.into();
        let timestamp = Utc::now().timestamp();
        let hash = payload_digest(REWARD_SENDER, &receiver, amount, timestamp);
        Self {
            kind: TransactionKind::Reward,
            sender: REWARD_SENDER.to_string(),
            receiver,
            amount,
            timestamp,
            signature: None,
            hash,
        }
    }

    /// Recompute the payload digest from the stored fields.
    ///
    /// Equals `hash` unless a payload field was mutated after construction.
    /// Block hashing uses this recomputation so edits to a bundled
    /// transaction surface as a block-hash mismatch.
    pub fn payload_digest(&self) -> [u8; 32] {
        payload_digest(&self.sender, &self.receiver, self.amount, self.timestamp)
    }

    /// Hex-encoded content hash, useful for display and logging.
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Sign the content hash with `key`, storing the signature in place.
    ///
    /// Rewards cannot be signed — they are authorized by the minting ledger.
    /// A transaction with an empty sender identity cannot be signed either.
    pub fn sign(&mut self, key: &SigningKey) -> Result<(), TransactionError> {
        if self.kind == TransactionKind::Reward {
            return Err(TransactionError::RewardNotSignable);
        }
        if self.sender.is_empty() {
            return Err(TransactionError::MissingSender);
        }
        let signature = key.sign(&self.hash);
        self.signature = Some(signature.to_bytes().to_vec());
        Ok(())
    }

    /// Check whether this transaction is authorized.
    ///
    /// Rewards are valid by mint authority. Transfers are valid iff the
    /// stored signature verifies the content hash against the sender
    /// identity decoded as a verifying key. Absent signatures, malformed
    /// keys, and malformed signature bytes all count as invalid — nothing
    /// propagates past this boundary.
    pub fn is_valid(&self) -> bool {
        if self.kind == TransactionKind::Reward {
            return true;
        }
        let Some(signature) = &self.signature else {
            return false;
        };
        let Ok(key_bytes) = hex::decode(&self.sender) else {
            return false;
        };
        let Ok(key_array) = <[u8; 32]>::try_from(key_bytes.as_slice()) else {
            return false;
        };
        let Ok(verifying) = VerifyingKey::from_bytes(&key_array) else {
            return false;
        };
        let Ok(signature) = Signature::from_slice(signature) else {
            return false;
        };
        verifying.verify(&self.hash, &signature).is_ok()
    }
}

/// SHA-256 over a length-prefixed framing of the four payload fields.
///
/// Each variable-length field is preceded by its byte length so adjacent
/// fields can never be confused for one another.
fn payload_digest(sender: &str, receiver: &str, amount: u64, timestamp: i64) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update((sender.len() as u64).to_le_bytes());
    hasher.update(sender.as_bytes());
    hasher.update((receiver.len() as u64).to_le_bytes());
    hasher.update(receiver.as_bytes());
    hasher.update(amount.to_le_bytes());
    hasher.update(timestamp.to_le_bytes());
    hasher.finalize().into()
}
