//! In-memory doubles for the ledger and the slot store.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use ingl_core::codec::schema::INIT_TAG;
use ingl_core::codec::{encode_registry_config, RegistryConfig};
use ingl_core::model::{RarityTier, RegistrationRecord, ValidatorProfile};
use ingl_core::{OnboardError, OnboardResult};
use ingl_solana_client::{
    derive_program_config, derive_registry_config,
    ExternalIds, Ledger, LedgerAccount, ProgramSlot, ProgramSlotRegistry, RegistrationWorkflow, SlotStore,
    TransactionSubmitter, WorkflowSettings,
};
use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::transaction::Transaction;

#[derive(Default)]
pub struct MockLedger {
    accounts: Mutex<HashMap<Pubkey, LedgerAccount>>,
    sent: Mutex<Vec<Transaction>>,
    reject: Mutex<Vec<Vec<u8>>>,
}

impl MockLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn put(&self, address: Pubkey, executable: bool, data: Vec<u8>) {
        self.accounts.lock().unwrap().insert(
            address,
            LedgerAccount { executable, data },
        );
    }

    pub fn deploy_program(&self, program: Pubkey) {
        self.put(program, true, vec![]);
    }

    pub fn configure_program(&self, program: &Pubkey) {
        let config = derive_program_config(program).unwrap();
        self.put(config.address, false, vec![1]);
    }

    pub fn init_registry(&self, registry_program: &Pubkey, counter: u32) {
        let addr = derive_registry_config(registry_program).unwrap().address;
        let data = encode_registry_config(&RegistryConfig {
            validation_phrase: 0x1234,
            validation_number: counter,
        })
        .unwrap();
        self.put(addr, false, data);
    }

    /// Reject any transaction carrying an instruction with exactly this data.
    pub fn reject_instruction_data(&self, data: Vec<u8>) {
        self.reject.lock().unwrap().push(data);
    }

    pub fn clear_rejections(&self) {
        self.reject.lock().unwrap().clear();
    }

    pub fn sent(&self) -> Vec<Transaction> {
        self.sent.lock().unwrap().clone()
    }

    pub fn config_exists(&self, program: &Pubkey) -> bool {
        let config = derive_program_config(program).unwrap().address;
        self.accounts.lock().unwrap().contains_key(&config)
    }

    fn is_program(&self, key: &Pubkey) -> bool {
        self.accounts
            .lock()
            .unwrap()
            .get(key)
            .map(|a| a.executable)
            .unwrap_or(false)
    }
}

/// Instructions of a sent transaction, decompiled.
pub fn instructions(tx: &Transaction) -> Vec<Instruction> {
    let keys = &tx.message.account_keys;
    tx.message
        .instructions
        .iter()
        .map(|ci| Instruction {
            program_id: keys[ci.program_id_index as usize],
            accounts: ci
                .accounts
                .iter()
                .map(|&i| solana_sdk::instruction::AccountMeta::new_readonly(keys[i as usize], false))
                .collect(),
            data: ci.data.clone(),
        })
        .collect()
}

#[async_trait]
impl Ledger for MockLedger {
    async fn get_account_info(&self, address: &Pubkey) -> Result<Option<LedgerAccount>> {
        Ok(self.accounts.lock().unwrap().get(address).cloned())
    }

    async fn latest_blockhash(&self) -> Result<Hash> {
        Ok(Hash::new_unique())
    }

    async fn send_and_confirm(&self, tx: &Transaction) -> Result<Signature> {
        let ixs = instructions(tx);
        {
            let reject = self.reject.lock().unwrap();
            if ixs.iter().any(|ix| reject.contains(&ix.data)) {
                return Err(anyhow!("Transaction simulation failed: custom program error: 0x1"));
            }
        }
        // An Ingl init creates the program's config account.
        for ix in &ixs {
            if self.is_program(&ix.program_id) && ix.data.first() == Some(&INIT_TAG) {
                if self.config_exists(&ix.program_id) {
                    return Err(anyhow!("custom program error: account already initialized"));
                }
                self.configure_program(&ix.program_id);
            }
        }
        self.sent.lock().unwrap().push(tx.clone());
        Ok(tx.signatures[0])
    }
}

#[derive(Default)]
pub struct MemorySlotStore {
    slots: Mutex<Vec<ProgramSlot>>,
    mark_calls: Mutex<Vec<Pubkey>>,
    find_calls: Mutex<usize>,
    pub fail_mark: AtomicBool,
    pub unavailable: AtomicBool,
}

impl MemorySlotStore {
    pub fn with_slots(ids: &[Pubkey]) -> Arc<Self> {
        let store = Self::default();
        *store.slots.lock().unwrap() = ids
            .iter()
            .map(|&identity| ProgramSlot { identity, used: false })
            .collect();
        Arc::new(store)
    }

    pub fn mark_calls(&self) -> Vec<Pubkey> {
        self.mark_calls.lock().unwrap().clone()
    }

    pub fn find_calls(&self) -> usize {
        *self.find_calls.lock().unwrap()
    }

    pub fn snapshot(&self) -> Vec<ProgramSlot> {
        self.slots.lock().unwrap().clone()
    }
}

#[async_trait]
impl SlotStore for MemorySlotStore {
    async fn find_unused(&self) -> OnboardResult<Vec<ProgramSlot>> {
        *self.find_calls.lock().unwrap() += 1;
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(OnboardError::registry_unavailable("connection refused"));
        }
        Ok(self.slots.lock().unwrap().iter().filter(|s| !s.used).copied().collect())
    }

    async fn mark_used(&self, identity: &Pubkey) -> OnboardResult<()> {
        self.mark_calls.lock().unwrap().push(*identity);
        if self.fail_mark.load(Ordering::SeqCst) {
            return Err(OnboardError::registry_unavailable("http 503 Service Unavailable"));
        }
        for slot in self.slots.lock().unwrap().iter_mut() {
            if slot.identity == *identity {
                slot.used = true;
            }
        }
        Ok(())
    }
}

pub fn external() -> ExternalIds {
    ExternalIds {
        registry_program: Pubkey::new_from_array([1; 32]),
        team: Pubkey::new_from_array([2; 32]),
    }
}

pub fn workflow(ledger: &Arc<MockLedger>, store: &Arc<MemorySlotStore>, capacity: u32) -> RegistrationWorkflow {
    let ledger_dyn: Arc<dyn Ledger> = ledger.clone();
    let registry = ProgramSlotRegistry::new(store.clone(), ledger_dyn.clone());
    let submitter = TransactionSubmitter::new(ledger_dyn.clone(), Arc::new(Keypair::new()));
    let settings = WorkflowSettings {
        external: external(),
        storage_capacity: capacity,
        compute_unit_limit: 400_000,
    };
    RegistrationWorkflow::new(registry, ledger_dyn, submitter, settings)
}

pub fn record(rarities: &[u8]) -> RegistrationRecord {
    RegistrationRecord {
        validator_id: Pubkey::new_from_array([42; 32]).to_string(),
        unit_backing: 1.5,
        max_primary_stake: 10_000.0,
        governance_expiration_days: 30,
        creator_royalties: 2.5,
        rarities: rarities.iter().map(|&r| tier(r)).collect(),
        profile: ValidatorProfile {
            validator_name: "alpha".to_string(),
            ..ValidatorProfile::default()
        },
    }
}

pub fn tier(rarity: u8) -> RarityTier {
    RarityTier {
        rarity,
        uris: vec![format!("https://arweave.net/tier-{rarity}-a"), format!("https://arweave.net/tier-{rarity}-b")],
    }
}
