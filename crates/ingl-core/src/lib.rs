//! ingl-core
//!
//! Core primitives for onboarding a validator onto an Ingl program slot:
//! - registration model (`RegistrationRecord`, `RarityTier`)
//! - typed error taxonomy shared by every layer
//! - versioned wire schema and payload codec for init/upload instructions
//! - storage bucket math for the external registry
//! - explicit configuration objects
//!
//! This crate performs no network or filesystem I/O and never reads the
//! environment. Ledger and registry access live in `ingl-solana-client`.

pub mod codec;
pub mod config;
pub mod errors;
pub mod model;
pub mod storage;
pub mod version;

pub use crate::errors::{OnboardError, OnboardResult};

/// Chain smallest-unit factor (lamports per SOL).
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Seconds in one day, used for every day-denominated duration.
pub const SECONDS_PER_DAY: u32 = 86_400;

/// Convenience re-exports.
pub mod prelude {
    pub use crate::codec::{decode_registry_config, encode_init, encode_upload, RegistryConfig};
    pub use crate::config::{validate_config, OnboardConfig};
    pub use crate::model::{RarityTier, RegistrationRecord, TierFailure, TierUpload};
    pub use crate::storage::storage_bucket;
    pub use crate::{OnboardError, OnboardResult};
}
