//! Configuration structures for validator onboarding.
//!
//! These are explicit, serializable objects. The core crate does not read
//! environment variables; the CLI assembles an `OnboardConfig` from its
//! environment and flags and passes it down.
//!
//! The signing keypair is not part of this struct. The binary loads it once at
//! startup and hands it to the submitter.

use serde::{Deserialize, Serialize};

use crate::errors::{OnboardError, OnboardResult};
use crate::storage::DEFAULT_STORAGE_CAPACITY;

/// Compute units requested for every init and upload transaction.
pub const DEFAULT_COMPUTE_UNIT_LIMIT: u32 = 400_000;

/// Global configuration container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardConfig {
    pub rpc_url: String,
    pub commitment: Commitment,
    pub registry_api: RegistryApiConfig,
    pub programs: ProgramsConfig,
    /// Registrations per storage bucket (K).
    pub storage_capacity: u32,
    pub compute_unit_limit: u32,
}

impl Default for OnboardConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.devnet.solana.com".to_string(),
            commitment: Commitment::Confirmed,
            registry_api: RegistryApiConfig::default(),
            programs: ProgramsConfig::default(),
            storage_capacity: DEFAULT_STORAGE_CAPACITY,
            compute_unit_limit: DEFAULT_COMPUTE_UNIT_LIMIT,
        }
    }
}

/// Document-store endpoint holding the pool of pre-deployed program slots.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryApiConfig {
    /// Base URL of the data API; actions are appended as `/action/<name>`.
    pub endpoint: String,
    /// Static credential sent as the `api-key` header.
    pub api_key: String,
    pub data_source: String,
    pub database: String,
    pub collection: String,
}

impl std::fmt::Debug for RegistryApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryApiConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("data_source", &self.data_source)
            .field("database", &self.database)
            .field("collection", &self.collection)
            .finish()
    }
}

impl Default for RegistryApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://data.mongodb-api.com/app/data-ywjjx/endpoint/data/v1".to_string(),
            api_key: String::new(),
            data_source: "Cluster0".to_string(),
            database: "programs".to_string(),
            collection: "program_list".to_string(),
        }
    }
}

/// Fixed external identities referenced by the init instruction (base58).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramsConfig {
    pub registry_program: String,
    pub team: String,
}

impl Default for ProgramsConfig {
    fn default() -> Self {
        Self {
            registry_program: "hcA6jYREUQoigHBwf1NRFP5RTpgELSY6UbynoySGhUH".to_string(),
            team: "EyZzbAQ1AB3PnqaSmoWNLAV7AUYQ8ddE1ovtwYPMyKZs".to_string(),
        }
    }
}

/// Ledger commitment used for reads and confirmations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn parse(s: &str) -> OnboardResult<Self> {
        match s {
            "processed" => Ok(Self::Processed),
            "confirmed" => Ok(Self::Confirmed),
            "finalized" => Ok(Self::Finalized),
            _ => Err(OnboardError::config(format!("unknown commitment: {s}"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::Confirmed => "confirmed",
            Self::Finalized => "finalized",
        }
    }
}

/// Validate a full configuration object.
pub fn validate_config(cfg: &OnboardConfig) -> OnboardResult<()> {
    if cfg.rpc_url.trim().is_empty() {
        return Err(OnboardError::config("rpc_url must not be empty"));
    }

    if cfg.registry_api.endpoint.trim().is_empty() {
        return Err(OnboardError::config("registry endpoint must not be empty"));
    }

    if cfg.registry_api.api_key.is_empty() {
        return Err(OnboardError::config("no registry API key found"));
    }

    if cfg.storage_capacity == 0 {
        return Err(OnboardError::config("storage_capacity must be greater than zero"));
    }

    if cfg.compute_unit_limit == 0 {
        return Err(OnboardError::config("compute_unit_limit must be greater than zero"));
    }

    if cfg.programs.registry_program.is_empty() || cfg.programs.team.is_empty() {
        return Err(OnboardError::config("registry program and team ids are required"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> OnboardConfig {
        let mut cfg = OnboardConfig::default();
        cfg.registry_api.api_key = "k".to_string();
        cfg
    }

    #[test]
    fn default_config_needs_api_key() {
        let cfg = OnboardConfig::default();
        assert!(validate_config(&cfg).is_err());
        validate_config(&configured()).unwrap();
    }

    #[test]
    fn zero_capacity_detected() {
        let mut cfg = configured();
        cfg.storage_capacity = 0;
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn debug_redacts_api_key() {
        let mut cfg = configured();
        cfg.registry_api.api_key = "super-secret".to_string();
        assert!(!format!("{cfg:?}").contains("super-secret"));
    }

    #[test]
    fn commitment_parse() {
        assert_eq!(Commitment::parse("finalized").unwrap(), Commitment::Finalized);
        assert_eq!(Commitment::Confirmed.as_str(), "confirmed");
        assert!(Commitment::parse("max").is_err());
    }
}
