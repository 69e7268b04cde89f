//! Startup configuration from the process environment.
//!
//! Variables:
//! - `INGL_RPC_URL`
//! - `INGL_COMMITMENT` (processed|confirmed|finalized)
//! - `REGISTRY_PROGRAMS_API_KEY` (required)
//! - `REGISTRY_PROGRAMS_ENDPOINT`
//! - `INGL_REGISTRY_PROGRAM_ID`, `INGL_TEAM_ID`
//! - `INGL_STORAGE_CAPACITY`, `INGL_COMPUTE_UNIT_LIMIT`
//! - `BACKEND_KEYPAIR` (JSON byte array)

use std::path::Path;

use ingl_core::config::{validate_config, Commitment, OnboardConfig};
use ingl_core::OnboardError;
use ingl_solana_client::keys;
use solana_sdk::signature::Keypair;
use thiserror::Error;

pub const KEYPAIR_VAR: &str = "BACKEND_KEYPAIR";

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("{var} is not a valid {expected}: {value}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("{0} is not set")]
    Missing(&'static str),

    #[error(transparent)]
    Onboard(#[from] OnboardError),
}

/// Build the configuration from `lookup`, then apply the RPC override.
pub fn load_config<F>(lookup: F, rpc_override: Option<&str>) -> Result<OnboardConfig, EnvError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = OnboardConfig::default();

    if let Some(v) = lookup("INGL_RPC_URL") {
        cfg.rpc_url = v;
    }
    if let Some(v) = rpc_override {
        cfg.rpc_url = v.to_string();
    }
    if let Some(v) = lookup("INGL_COMMITMENT") {
        cfg.commitment = Commitment::parse(&v)?;
    }

    cfg.registry_api.api_key = lookup("REGISTRY_PROGRAMS_API_KEY").ok_or(EnvError::Missing("REGISTRY_PROGRAMS_API_KEY"))?;
    if let Some(v) = lookup("REGISTRY_PROGRAMS_ENDPOINT") {
        cfg.registry_api.endpoint = v;
    }

    if let Some(v) = lookup("INGL_REGISTRY_PROGRAM_ID") {
        cfg.programs.registry_program = v;
    }
    if let Some(v) = lookup("INGL_TEAM_ID") {
        cfg.programs.team = v;
    }

    if let Some(v) = lookup("INGL_STORAGE_CAPACITY") {
        cfg.storage_capacity = parse_u32("INGL_STORAGE_CAPACITY", v)?;
    }
    if let Some(v) = lookup("INGL_COMPUTE_UNIT_LIMIT") {
        cfg.compute_unit_limit = parse_u32("INGL_COMPUTE_UNIT_LIMIT", v)?;
    }

    validate_config(&cfg)?;
    Ok(cfg)
}

pub fn load_config_from_env(rpc_override: Option<&str>) -> Result<OnboardConfig, EnvError> {
    load_config(|k| std::env::var(k).ok().filter(|v| !v.is_empty()), rpc_override)
}

/// Signing key from `--keypair <file>` or else `BACKEND_KEYPAIR`.
pub fn load_keypair(path: Option<&str>) -> Result<Keypair, EnvError> {
    if let Some(p) = path {
        return Ok(keys::keypair_from_file(Path::new(p))?);
    }
    let raw = std::env::var(KEYPAIR_VAR).map_err(|_| EnvError::Missing(KEYPAIR_VAR))?;
    Ok(keys::keypair_from_json(&raw)?)
}

fn parse_u32(var: &'static str, value: String) -> Result<u32, EnvError> {
    value.trim().parse().map_err(|_| EnvError::Invalid {
        var,
        expected: "unsigned integer",
        value,
    })
}
