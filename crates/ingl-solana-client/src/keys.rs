//! Signing key loading.
//!
//! The backend key is provided as a JSON array of 64 bytes (the format
//! written by `solana-keygen`). Errors never echo key material.

use std::path::Path;

use ingl_core::{OnboardError, OnboardResult};
use solana_sdk::signature::Keypair;

pub fn keypair_from_json(raw: &str) -> OnboardResult<Keypair> {
    let bytes: Vec<u8> = serde_json::from_str(raw.trim())
        .map_err(|_| OnboardError::config("signing key is not a JSON byte array"))?;
    if bytes.len() != 64 {
        return Err(OnboardError::config(format!(
            "signing key must be 64 bytes, got {}",
            bytes.len()
        )));
    }
    Keypair::from_bytes(&bytes).map_err(|_| OnboardError::config("signing key bytes are not a valid keypair"))
}

pub fn keypair_from_file(path: &Path) -> OnboardResult<Keypair> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| OnboardError::config(format!("read {}: {e}", path.display())))?;
    keypair_from_json(&raw)
}
