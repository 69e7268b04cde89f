//! Program slot registry.
//!
//! Slots are pre-deployed Ingl programs waiting for their first `Init`. The
//! pool lives in an external document store (`SlotStore`); each document holds
//! a program id and a `used` flag.
//!
//! A slot is available when:
//! - the program account exists and is executable, and
//! - its config PDA does not exist yet.
//!
//! The flag alone is not trusted. A slot whose config account exists is never
//! handed out, even when the store still reports it unused; this is what
//! heals a lost `mark_used`.
//!
//! `claim_one` offers find-then-mark as one call. It is only as atomic as the
//! store: two callers can observe the same slot before either marks it, and
//! the on-chain `Init` (which fails against an existing config account) is the
//! final arbiter.

use std::sync::Arc;

use async_trait::async_trait;
use ingl_core::config::RegistryApiConfig;
use ingl_core::{OnboardError, OnboardResult};
use serde::{Deserialize, Serialize};
use serde_json::json;
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, info, warn};

use crate::ledger::Ledger;
use crate::pda;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramSlot {
    pub identity: Pubkey,
    pub used: bool,
}

/// External store holding the slot pool.
#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Slots flagged unused, in the store's insertion order.
    async fn find_unused(&self) -> OnboardResult<Vec<ProgramSlot>>;

    /// Flag `identity` as used. Marking an already-used slot is a no-op.
    async fn mark_used(&self, identity: &Pubkey) -> OnboardResult<()>;
}

/// Availability verdict for one candidate slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotState {
    Available,
    /// No program account at this identity.
    Missing,
    NotExecutable,
    /// Config PDA exists: the slot was initialized already.
    Configured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotStatus {
    pub slot: ProgramSlot,
    pub state: SlotState,
}

#[derive(Clone)]
pub struct ProgramSlotRegistry {
    store: Arc<dyn SlotStore>,
    ledger: Arc<dyn Ledger>,
}

impl ProgramSlotRegistry {
    pub fn new(store: Arc<dyn SlotStore>, ledger: Arc<dyn Ledger>) -> Self {
        Self { store, ledger }
    }

    /// Check the availability predicate for one program identity.
    pub async fn slot_state(&self, identity: &Pubkey) -> OnboardResult<SlotState> {
        let program = self
            .ledger
            .get_account_info(identity)
            .await
            .map_err(|e| OnboardError::ledger_unavailable(format!("{e:#}")))?;
        let Some(program) = program else {
            return Ok(SlotState::Missing);
        };
        if !program.executable {
            return Ok(SlotState::NotExecutable);
        }

        let config = pda::derive_program_config(identity)?;
        let existing = self
            .ledger
            .get_account_info(&config.address)
            .await
            .map_err(|e| OnboardError::ledger_unavailable(format!("{e:#}")))?;
        Ok(if existing.is_some() {
            SlotState::Configured
        } else {
            SlotState::Available
        })
    }

    /// First available slot in store order, or `None`.
    pub async fn find_available(&self) -> OnboardResult<Option<ProgramSlot>> {
        let candidates = self.store.find_unused().await?;
        debug!(candidates = candidates.len(), "scanning program slots");

        for slot in candidates {
            match self.slot_state(&slot.identity).await? {
                SlotState::Available => return Ok(Some(slot)),
                state => debug!(program = %slot.identity, ?state, "slot skipped"),
            }
        }
        Ok(None)
    }

    /// Verdict for every unused candidate, in store order.
    pub async fn inspect(&self) -> OnboardResult<Vec<SlotStatus>> {
        let candidates = self.store.find_unused().await?;
        let mut out = Vec::with_capacity(candidates.len());
        for slot in candidates {
            let state = self.slot_state(&slot.identity).await?;
            out.push(SlotStatus { slot, state });
        }
        Ok(out)
    }

    pub async fn mark_used(&self, identity: &Pubkey) -> OnboardResult<()> {
        self.store.mark_used(identity).await?;
        info!(program = %identity, "slot marked used");
        Ok(())
    }

    /// Find the first available slot and flag it used.
    pub async fn claim_one(&self) -> OnboardResult<ProgramSlot> {
        let slot = self.find_available().await?.ok_or(OnboardError::SlotExhausted)?;
        self.mark_used(&slot.identity).await?;
        Ok(ProgramSlot {
            identity: slot.identity,
            used: true,
        })
    }
}

/// `SlotStore` over a MongoDB-style data API (`/action/find`, `/action/updateOne`).
pub struct DataApiSlotStore {
    http: reqwest::Client,
    cfg: RegistryApiConfig,
}

#[derive(Debug, Deserialize)]
struct FindResponse {
    #[serde(default)]
    documents: Vec<SlotDocument>,
}

#[derive(Debug, Deserialize)]
struct SlotDocument {
    program: String,
    #[serde(rename = "Is_used", default)]
    is_used: bool,
}

impl DataApiSlotStore {
    pub fn new(cfg: RegistryApiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            cfg,
        }
    }

    fn action_url(&self, action: &str) -> String {
        format!("{}/action/{action}", self.cfg.endpoint.trim_end_matches('/'))
    }

    fn base_body(&self) -> serde_json::Value {
        json!({
            "dataSource": self.cfg.data_source,
            "database": self.cfg.database,
            "collection": self.cfg.collection,
        })
    }

    async fn post(&self, action: &str, body: serde_json::Value) -> OnboardResult<reqwest::Response> {
        let resp = self
            .http
            .post(self.action_url(action))
            .header("api-key", &self.cfg.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| OnboardError::registry_unavailable(format!("{action}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(OnboardError::registry_unavailable(format!("{action}: http {status}")));
        }
        Ok(resp)
    }
}

#[async_trait]
impl SlotStore for DataApiSlotStore {
    async fn find_unused(&self) -> OnboardResult<Vec<ProgramSlot>> {
        let mut body = self.base_body();
        body["filter"] = json!({ "Is_used": false });

        let found: FindResponse = self
            .post("find", body)
            .await?
            .json()
            .await
            .map_err(|e| OnboardError::registry_unavailable(format!("find: invalid response: {e}")))?;

        let mut slots = Vec::with_capacity(found.documents.len());
        for doc in found.documents {
            match doc.program.parse::<Pubkey>() {
                Ok(identity) => slots.push(ProgramSlot {
                    identity,
                    used: doc.is_used,
                }),
                Err(_) => warn!(program = %doc.program, "skipping slot document with invalid program id"),
            }
        }
        Ok(slots)
    }

    async fn mark_used(&self, identity: &Pubkey) -> OnboardResult<()> {
        let mut body = self.base_body();
        body["filter"] = json!({ "program": identity.to_string() });
        body["update"] = json!({ "$set": { "Is_used": true } });

        self.post("updateOne", body).await?;
        Ok(())
    }
}
