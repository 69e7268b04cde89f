mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use assert_matches::assert_matches;
use ingl_core::OnboardError;
use ingl_solana_client::{Ledger, ProgramSlotRegistry, SlotState, SlotStore};
use solana_sdk::pubkey::Pubkey;

use common::{MemorySlotStore, MockLedger};

fn registry(ledger: &Arc<MockLedger>, store: &Arc<MemorySlotStore>) -> ProgramSlotRegistry {
    let ledger: Arc<dyn Ledger> = ledger.clone();
    let store: Arc<dyn SlotStore> = store.clone();
    ProgramSlotRegistry::new(store, ledger)
}

fn id(n: u8) -> Pubkey {
    Pubkey::new_from_array([n; 32])
}

#[tokio::test]
async fn configured_slot_is_never_returned() {
    let ledger = MockLedger::new();
    ledger.deploy_program(id(10));
    ledger.configure_program(&id(10));
    let store = MemorySlotStore::with_slots(&[id(10)]);

    let reg = registry(&ledger, &store);
    assert_eq!(reg.slot_state(&id(10)).await.unwrap(), SlotState::Configured);
    assert_eq!(reg.find_available().await.unwrap(), None);
}

#[tokio::test]
async fn store_order_wins_and_unusable_slots_are_skipped() {
    let ledger = MockLedger::new();
    // id(1) missing entirely
    ledger.put(id(2), false, vec![7]);
    ledger.deploy_program(id(3));
    ledger.deploy_program(id(4));
    let store = MemorySlotStore::with_slots(&[id(1), id(2), id(3), id(4)]);

    let reg = registry(&ledger, &store);
    let found = reg.find_available().await.unwrap().unwrap();
    assert_eq!(found.identity, id(3));

    let states: Vec<_> = reg.inspect().await.unwrap().into_iter().map(|s| s.state).collect();
    assert_eq!(
        states,
        vec![SlotState::Missing, SlotState::NotExecutable, SlotState::Available, SlotState::Available]
    );
}

#[tokio::test]
async fn marking_twice_is_harmless() {
    let ledger = MockLedger::new();
    let store = MemorySlotStore::with_slots(&[id(5)]);
    let reg = registry(&ledger, &store);

    reg.mark_used(&id(5)).await.unwrap();
    reg.mark_used(&id(5)).await.unwrap();
    assert!(store.snapshot()[0].used);
    assert_eq!(store.mark_calls().len(), 2);
}

#[tokio::test]
async fn claim_one_marks_what_it_returns() {
    let ledger = MockLedger::new();
    ledger.deploy_program(id(6));
    ledger.deploy_program(id(7));
    let store = MemorySlotStore::with_slots(&[id(6), id(7)]);
    let reg = registry(&ledger, &store);

    let first = reg.claim_one().await.unwrap();
    assert_eq!(first.identity, id(6));
    assert!(first.used);

    let second = reg.claim_one().await.unwrap();
    assert_eq!(second.identity, id(7));

    assert_matches!(reg.claim_one().await, Err(OnboardError::SlotExhausted));
    assert_eq!(store.mark_calls(), vec![id(6), id(7)]);
}

#[tokio::test]
async fn unreachable_store_is_registry_unavailable() {
    let ledger = MockLedger::new();
    let store = MemorySlotStore::with_slots(&[id(8)]);
    store.unavailable.store(true, Ordering::SeqCst);
    let reg = registry(&ledger, &store);

    let err = reg.find_available().await.unwrap_err();
    assert_matches!(err, OnboardError::RegistryUnavailable { .. });
    assert!(err.is_retryable());
}
