/// Integration tests that wire both crates end-to-end.
///
/// These exercise the full data path through the public API only:
///   Keypair → signed Transaction → mempool → mined Block → validated chain
use std::sync::atomic::AtomicBool;

use pb_ledger::{BlockBuilder, Ledger, LedgerError, MINING_REWARD};
use pb_transaction::{Keypair, Transaction, TransactionKind, REWARD_SENDER};

#[test]
fn fresh_ledger_is_valid() {
    let ledger = Ledger::new(2);
    assert_eq!(ledger.len(), 1, "only genesis");
    assert!(ledger.is_valid());
}

#[test]
fn signed_transfer_to_mined_block_round_trip() {
    let alice = Keypair::generate();
    let bob = Keypair::generate();

    let mut ledger = Ledger::new(2);
    let mut tx = Transaction::transfer(alice.address(), bob.address(), 10);
    tx.sign(&alice.signing).expect("signing should succeed");
    assert!(tx.is_valid());

    ledger.add_transaction(tx).expect("submission should succeed");
    let block = ledger.mine_pending_transactions(&bob.address());
    assert_eq!(block.index(), 1);
    assert!(block.hash_hex().starts_with("00"), "difficulty 2 prefix");

    assert_eq!(ledger.len(), 2, "genesis + one mined block");
    assert!(ledger.is_valid());

    let pending = ledger.pending();
    assert_eq!(pending.len(), 1, "mempool replaced by the reward");
    assert_eq!(pending[0].kind, TransactionKind::Reward);
    assert_eq!(pending[0].sender, REWARD_SENDER);
    assert_eq!(pending[0].receiver, bob.address());
    assert_eq!(pending[0].amount, MINING_REWARD);
}

#[test]
fn unsigned_submission_is_rejected() {
    let alice = Keypair::generate();
    let mut ledger = Ledger::new(2);

    let tx = Transaction::transfer(alice.address(), "bob", 10);
    let err = ledger.add_transaction(tx).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidTransaction));
    assert!(ledger.pending().is_empty(), "mempool unchanged");
}

#[test]
fn foreign_signature_is_rejected() {
    let alice = Keypair::generate();
    let mallory = Keypair::generate();
    let mut ledger = Ledger::new(2);

    // Mallory signs a transfer that claims to come from Alice.
    let mut tx = Transaction::transfer(alice.address(), mallory.address(), 10);
    tx.sign(&mallory.signing).expect("signing itself succeeds");

    let err = ledger.add_transaction(tx).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidTransaction));
}

#[test]
fn rewards_only_enter_through_mining() {
    let mut ledger = Ledger::new(1);
    let err = ledger
        .add_transaction(Transaction::reward("miner", MINING_REWARD))
        .unwrap_err();
    assert!(matches!(err, LedgerError::RewardNotSubmittable));

    ledger.mine_pending_transactions("miner");
    assert_eq!(ledger.pending()[0].kind, TransactionKind::Reward);
}

#[test]
fn chain_grows_one_block_per_mining_cycle() {
    let mut ledger = Ledger::new(1);
    for expected_len in 2..5 {
        ledger.mine_pending_transactions("miner");
        assert_eq!(ledger.len(), expected_len);
    }
    assert!(ledger.is_valid());
}

#[test]
fn external_builder_is_rechained_to_the_tip() {
    let mut ledger = Ledger::new(1);
    let tip_hash = ledger.tip().hash();

    let builder = BlockBuilder::new(1, [0xabu8; 32], Vec::new());
    let block = ledger.add_block(builder);
    assert_eq!(block.previous_hash(), tip_hash);
    assert!(ledger.is_valid());
}

#[test]
fn pre_raised_stop_flag_interrupts_mining() {
    let stop = AtomicBool::new(true);
    let result = BlockBuilder::new(1, [0u8; 32], Vec::new()).mine_with_stop(64, &stop);
    assert!(matches!(result, Err(LedgerError::MiningInterrupted)));
}

#[test]
fn ledger_round_trips_through_json() {
    let alice = Keypair::generate();
    let mut ledger = Ledger::new(1);
    let mut tx = Transaction::transfer(alice.address(), "bob", 10);
    tx.sign(&alice.signing).unwrap();
    ledger.add_transaction(tx).unwrap();
    ledger.mine_pending_transactions("miner");

    let json = serde_json::to_string(&ledger).expect("serialize");
    let restored: Ledger = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(restored.len(), ledger.len());
    assert_eq!(restored.tip().hash(), ledger.tip().hash());
    assert!(restored.is_valid());
}
