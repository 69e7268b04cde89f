//! Error taxonomy for validator onboarding.
//!
//! Every layer (codec, derivation, builder, submitter, registry, workflow)
//! reports failures through `OnboardError`. Nothing here is retried
//! automatically; callers use `is_retryable()` and the structured payloads
//! (e.g. the succeeded/failed split of `PartialUpload`) to decide.

use thiserror::Error;

use crate::model::{TierFailure, TierUpload};

pub type OnboardResult<T> = Result<T, OnboardError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OnboardError {
    /// No pre-deployed program identity is currently usable.
    #[error("no predeployed program available")]
    SlotExhausted,

    /// The external program registry could not be reached or answered garbage.
    #[error("program registry unavailable: {reason}")]
    RegistryUnavailable { reason: String },

    /// The registry program's configuration account does not exist yet.
    #[error("validator registration not possible yet: registry config account missing")]
    RegistryUninitialized,

    /// A ledger read (account info) failed before anything was submitted.
    #[error("ledger unavailable: {reason}")]
    LedgerUnavailable { reason: String },

    #[error("account list mismatch: expected {expected} accounts, got {actual}")]
    AccountListMismatch { expected: usize, actual: usize },

    #[error("no valid program address for seed {seed:?}")]
    InvalidSeed { seed: String },

    #[error("malformed account data: {reason}")]
    MalformedAccount { reason: String },

    /// The ledger rejected the transaction or confirmation timed out.
    #[error("transaction submission failed: {reason}")]
    SubmissionFailed { reason: String },

    /// Init succeeded but some rarity tiers were not uploaded.
    #[error(
        "metadata upload incomplete: {} tier(s) uploaded, {} failed",
        .succeeded.len(),
        .failed.len()
    )]
    PartialUpload {
        init_signature: Option<String>,
        succeeded: Vec<TierUpload>,
        failed: Vec<TierFailure>,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl OnboardError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn malformed_account(reason: impl Into<String>) -> Self {
        Self::MalformedAccount {
            reason: reason.into(),
        }
    }

    pub fn registry_unavailable(reason: impl std::fmt::Display) -> Self {
        Self::RegistryUnavailable {
            reason: reason.to_string(),
        }
    }

    pub fn ledger_unavailable(reason: impl std::fmt::Display) -> Self {
        Self::LedgerUnavailable {
            reason: reason.to_string(),
        }
    }

    pub fn submission_failed(reason: impl std::fmt::Display) -> Self {
        Self::SubmissionFailed {
            reason: reason.to_string(),
        }
    }

    /// Stable machine-readable code, used in CLI output and logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SlotExhausted => "slot_exhausted",
            Self::RegistryUnavailable { .. } => "registry_unavailable",
            Self::RegistryUninitialized => "registry_uninitialized",
            Self::LedgerUnavailable { .. } => "ledger_unavailable",
            Self::AccountListMismatch { .. } => "account_list_mismatch",
            Self::InvalidSeed { .. } => "invalid_seed",
            Self::MalformedAccount { .. } => "malformed_account",
            Self::SubmissionFailed { .. } => "submission_failed",
            Self::PartialUpload { .. } => "partial_upload",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Config(_) => "config",
        }
    }

    /// Whether the caller may retry the same request later.
    ///
    /// Internal contract violations and hard preconditions are not retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::SlotExhausted
                | Self::RegistryUnavailable { .. }
                | Self::LedgerUnavailable { .. }
                | Self::SubmissionFailed { .. }
                | Self::PartialUpload { .. }
        )
    }
}
