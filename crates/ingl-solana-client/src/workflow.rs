//! End-to-end validator registration.
//!
//! Stages, in order:
//!
//! ```text
//! Idle -> SlotClaiming -> AddressResolving -> Initializing -> SlotMarking
//!      -> UploadingMetadata -> Completed
//! ```
//!
//! Any stage can end the attempt with a `WorkflowFailure { stage, cause }`.
//! Nothing is retried here. Two outcomes leave on-chain state behind:
//! - a failed `mark_used` after a confirmed init is logged and tolerated; the
//!   availability predicate (config account exists) keeps the slot from being
//!   handed out again
//! - failed tier uploads after a confirmed init surface as `PartialUpload`;
//!   retry them with `upload_tiers`, not with a new registration

use std::fmt;
use std::sync::Arc;

use futures_util::future::join_all;
use ingl_core::codec::{decode_registry_config, encode_init, encode_upload};
use ingl_core::config::OnboardConfig;
use ingl_core::model::{validate_tiers, RarityTier, RegistrationRecord, TierFailure, TierUpload};
use ingl_core::storage::storage_bucket;
use ingl_core::{OnboardError, OnboardResult};
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::instructions::{build_init, build_upload, InitAccounts, UploadAccounts};
use crate::ledger::Ledger;
use crate::pda::{self, DerivedAddressSet, ExternalIds};
use crate::slots::ProgramSlotRegistry;
use crate::submitter::TransactionSubmitter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    Idle,
    SlotClaiming,
    AddressResolving,
    Initializing,
    SlotMarking,
    UploadingMetadata,
    Completed,
}

impl WorkflowStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::SlotClaiming => "slot_claiming",
            Self::AddressResolving => "address_resolving",
            Self::Initializing => "initializing",
            Self::SlotMarking => "slot_marking",
            Self::UploadingMetadata => "uploading_metadata",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal failure of one registration attempt.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("registration failed while {stage}: {cause}")]
pub struct WorkflowFailure {
    pub stage: WorkflowStage,
    #[source]
    pub cause: OnboardError,
}

/// Successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationReceipt {
    pub program: String,
    pub init_signature: String,
    pub upload_signatures: Vec<TierUpload>,
    pub storage_bucket: u32,
    /// False when the registry flag could not be set (tolerated).
    pub slot_marked: bool,
}

/// Parsed, validated settings the workflow runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowSettings {
    pub external: ExternalIds,
    pub storage_capacity: u32,
    pub compute_unit_limit: u32,
}

impl WorkflowSettings {
    pub fn from_config(cfg: &OnboardConfig) -> OnboardResult<Self> {
        Ok(Self {
            external: ExternalIds {
                registry_program: parse_pubkey("registry_program", &cfg.programs.registry_program)
                    .map_err(|e| OnboardError::config(e.to_string()))?,
                team: parse_pubkey("team", &cfg.programs.team).map_err(|e| OnboardError::config(e.to_string()))?,
            },
            storage_capacity: cfg.storage_capacity,
            compute_unit_limit: cfg.compute_unit_limit,
        })
    }
}

pub struct RegistrationWorkflow {
    registry: ProgramSlotRegistry,
    ledger: Arc<dyn Ledger>,
    submitter: TransactionSubmitter,
    settings: WorkflowSettings,
}

impl RegistrationWorkflow {
    pub fn new(
        registry: ProgramSlotRegistry,
        ledger: Arc<dyn Ledger>,
        submitter: TransactionSubmitter,
        settings: WorkflowSettings,
    ) -> Self {
        Self {
            registry,
            ledger,
            submitter,
            settings,
        }
    }

    pub fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    /// Run the full onboarding sequence for `record`.
    pub async fn register_validator(&self, record: &RegistrationRecord) -> Result<RegistrationReceipt, WorkflowFailure> {
        let span = info_span!("register_validator", validator = %record.validator_id);
        self.run(record).instrument(span).await
    }

    async fn run(&self, record: &RegistrationRecord) -> Result<RegistrationReceipt, WorkflowFailure> {
        use WorkflowStage::*;

        record.validate().map_err(fail(Idle))?;
        let validator = parse_pubkey("validator_id", &record.validator_id).map_err(fail(Idle))?;

        info!(stage = %SlotClaiming, "claiming program slot");
        let slot = self
            .registry
            .find_available()
            .await
            .map_err(fail(SlotClaiming))?
            .ok_or_else(|| fail(SlotClaiming)(OnboardError::SlotExhausted))?;
        let program = slot.identity;

        info!(stage = %AddressResolving, %program, "resolving addresses");
        let set = self.resolve_addresses(&program).await.map_err(fail(AddressResolving))?;

        info!(stage = %Initializing, %program, bucket = set.storage_bucket, "submitting init");
        let init_ix = encode_init(record)
            .and_then(|data| {
                let accounts = InitAccounts {
                    payer: self.submitter.payer(),
                    validator,
                    set: &set,
                };
                build_init(&program, &accounts, data)
            })
            .map_err(fail(Initializing))?;
        debug!(accounts = init_ix.accounts.len(), "init instruction built");
        let init_signature = self
            .submitter
            .submit(&[init_ix], self.settings.compute_unit_limit)
            .await
            .map_err(fail(Initializing))?
            .to_string();

        info!(stage = %SlotMarking, %program, signature = %init_signature, "init confirmed");
        let slot_marked = match self.registry.mark_used(&program).await {
            Ok(()) => true,
            Err(e) => {
                warn!(%program, error = %e, "program initialized but registry flag not set");
                false
            }
        };

        info!(stage = %UploadingMetadata, tiers = record.rarities.len(), "uploading rarity uris");
        let upload_signatures = match self.upload_tiers(&program, &record.rarities).await {
            Ok(sigs) => sigs,
            Err(OnboardError::PartialUpload { succeeded, failed, .. }) => {
                return Err(fail(UploadingMetadata)(OnboardError::PartialUpload {
                    init_signature: Some(init_signature),
                    succeeded,
                    failed,
                }))
            }
            Err(e) => return Err(fail(UploadingMetadata)(e)),
        };

        info!(stage = %Completed, %program, "validator registered");
        Ok(RegistrationReceipt {
            program: program.to_string(),
            init_signature,
            upload_signatures,
            storage_bucket: set.storage_bucket,
            slot_marked,
        })
    }

    /// Read the registry counter and derive every address `program` needs.
    pub async fn resolve_addresses(&self, program: &Pubkey) -> OnboardResult<DerivedAddressSet> {
        let bucket = current_storage_bucket(
            self.ledger.as_ref(),
            &self.settings.external.registry_program,
            self.settings.storage_capacity,
        )
        .await?;
        DerivedAddressSet::resolve(program, &self.settings.external, bucket)
    }

    /// Upload `tiers` to an initialized program, one transaction per tier, concurrently.
    ///
    /// Results keep tier order. Any failure yields `PartialUpload` with
    /// `init_signature: None`.
    pub async fn upload_tiers(&self, program: &Pubkey, tiers: &[RarityTier]) -> OnboardResult<Vec<TierUpload>> {
        validate_tiers(tiers)?;
        let accounts = UploadAccounts {
            payer: self.submitter.payer(),
            config: pda::derive_program_config(program)?.address,
            uris: pda::derive_uris(program)?.address,
        };

        let mut ixs = Vec::with_capacity(tiers.len());
        for tier in tiers {
            ixs.push(build_upload(program, &accounts, encode_upload(tier)?)?);
        }

        let limit = self.settings.compute_unit_limit;
        let results = join_all(ixs.iter().map(|ix| self.submitter.submit(std::slice::from_ref(ix), limit))).await;

        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        for (tier, result) in tiers.iter().zip(results) {
            match result {
                Ok(sig) => succeeded.push(TierUpload {
                    rarity: tier.rarity,
                    signature: sig.to_string(),
                }),
                Err(e) => {
                    warn!(rarity = tier.rarity, error = %e, "tier upload failed");
                    failed.push(TierFailure {
                        rarity: tier.rarity,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if failed.is_empty() {
            Ok(succeeded)
        } else {
            Err(OnboardError::PartialUpload {
                init_signature: None,
                succeeded,
                failed,
            })
        }
    }
}

/// Storage bucket the next registration lands in, from the registry counter.
pub async fn current_storage_bucket(
    ledger: &dyn Ledger,
    registry_program: &Pubkey,
    capacity: u32,
) -> OnboardResult<u32> {
    let registry_config = pda::derive_registry_config(registry_program)?;
    let account = ledger
        .get_account_info(&registry_config.address)
        .await
        .map_err(|e| OnboardError::ledger_unavailable(format!("{e:#}")))?
        .ok_or(OnboardError::RegistryUninitialized)?;

    let counter = decode_registry_config(&account.data)?.validation_number;
    let bucket = storage_bucket(counter, capacity)?;
    debug!(counter, bucket, "registry counter decoded");
    Ok(bucket)
}

fn fail(stage: WorkflowStage) -> impl Fn(OnboardError) -> WorkflowFailure {
    move |cause| WorkflowFailure { stage, cause }
}

fn parse_pubkey(field: &str, s: &str) -> OnboardResult<Pubkey> {
    s.trim()
        .parse()
        .map_err(|_| OnboardError::invalid_argument(format!("{field} is not a valid address: {s}")))
}
