//! Registration model.
//!
//! `RegistrationRecord` is the caller-facing input of one onboarding attempt.
//! Field names on the wire (JSON) follow the registration form used by the
//! Ingl frontend, so records can be posted as-is.
//!
//! Amounts are kept in the caller's units (SOL, percent, days). Conversion to
//! on-chain units happens in `codec`; validation only checks that it will succeed.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::codec::{days_to_seconds, sol_to_lamports};
use crate::errors::{OnboardError, OnboardResult};

/// Rarity code as understood by the on-chain program.
pub type RarityCode = u8;

/// One metadata bucket: a rarity code plus its ordered asset locators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RarityTier {
    pub rarity: RarityCode,
    pub uris: Vec<String>,
}

/// Optional presentation and governance settings forwarded to the init payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorProfile {
    pub validator_name: String,
    pub website: String,
    pub twitter_handle: String,
    pub discord_invite: String,
    pub collection_uri: String,
    pub default_uri: String,
    /// Percent.
    pub init_commission: u8,
    /// Percent of rewards going to NFT holders.
    pub nft_holders_share: u8,
    /// Percent of votes needed for a governance proposal to pass.
    pub proposal_quorum: u8,
    /// Percent.
    pub initial_redemption_fee: u8,
    /// Days.
    pub redemption_fee_duration: u32,
    pub is_validator_id_switchable: bool,
    /// Display names, one per tier, in tier order. Empty means "use codes".
    pub rarity_names: Vec<String>,
}

impl Default for ValidatorProfile {
    fn default() -> Self {
        Self {
            validator_name: String::new(),
            website: String::new(),
            twitter_handle: String::new(),
            discord_invite: String::new(),
            collection_uri: String::new(),
            default_uri: String::new(),
            init_commission: 0,
            nft_holders_share: 100,
            proposal_quorum: 65,
            initial_redemption_fee: 0,
            redemption_fee_duration: 0,
            is_validator_id_switchable: false,
            rarity_names: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    /// Validator identity (base58 account address).
    pub validator_id: String,
    /// Stake backing per NFT, in SOL. Fractional values allowed.
    pub unit_backing: f64,
    /// Maximum primary stake, in SOL.
    pub max_primary_stake: f64,
    /// Governance expiration, in days.
    #[serde(rename = "governance_expiration_time")]
    pub governance_expiration_days: u32,
    /// Creator royalty percentage, 0-100 with one decimal.
    pub creator_royalties: f64,
    pub rarities: Vec<RarityTier>,
    #[serde(flatten)]
    pub profile: ValidatorProfile,
}

impl RegistrationRecord {
    /// Check caller input before any ledger or registry I/O happens.
    pub fn validate(&self) -> OnboardResult<()> {
        if self.validator_id.trim().is_empty() {
            return Err(OnboardError::invalid_argument("validator_id must not be empty"));
        }
        check_amount("unit_backing", self.unit_backing)?;
        check_amount("max_primary_stake", self.max_primary_stake)?;
        check_days("governance_expiration_time", self.governance_expiration_days)?;
        check_days("redemption_fee_duration", self.profile.redemption_fee_duration)?;

        if !self.creator_royalties.is_finite() || !(0.0..=100.0).contains(&self.creator_royalties) {
            return Err(OnboardError::invalid_argument(format!(
                "creator_royalties must be within 0..=100, got {}",
                self.creator_royalties
            )));
        }

        let p = &self.profile;
        for (name, v) in [
            ("init_commission", p.init_commission),
            ("nft_holders_share", p.nft_holders_share),
            ("proposal_quorum", p.proposal_quorum),
            ("initial_redemption_fee", p.initial_redemption_fee),
        ] {
            if v > 100 {
                return Err(OnboardError::invalid_argument(format!(
                    "{name} must be a percentage, got {v}"
                )));
            }
        }

        validate_tiers(&self.rarities)?;

        if !p.rarity_names.is_empty() && p.rarity_names.len() != self.rarities.len() {
            return Err(OnboardError::invalid_argument(format!(
                "rarity_names has {} entries for {} tiers",
                p.rarity_names.len(),
                self.rarities.len()
            )));
        }
        Ok(())
    }

    /// Rarity codes in tier order.
    pub fn rarity_codes(&self) -> Vec<RarityCode> {
        self.rarities.iter().map(|t| t.rarity).collect()
    }
}

/// Tiers must be non-empty, unique by code, and each carry at least one URI.
pub fn validate_tiers(tiers: &[RarityTier]) -> OnboardResult<()> {
    if tiers.is_empty() {
        return Err(OnboardError::invalid_argument("at least one rarity tier is required"));
    }
    let mut seen = BTreeSet::new();
    for tier in tiers {
        if !seen.insert(tier.rarity) {
            return Err(OnboardError::invalid_argument(format!(
                "duplicate rarity code {}",
                tier.rarity
            )));
        }
        if tier.uris.is_empty() {
            return Err(OnboardError::invalid_argument(format!(
                "rarity {} has no uris",
                tier.rarity
            )));
        }
        if tier.uris.iter().any(|u| u.trim().is_empty()) {
            return Err(OnboardError::invalid_argument(format!(
                "rarity {} contains an empty uri",
                tier.rarity
            )));
        }
    }
    Ok(())
}

fn check_amount(name: &str, v: f64) -> OnboardResult<()> {
    if !v.is_finite() || v < 0.0 {
        return Err(OnboardError::invalid_argument(format!(
            "{name} must be a non-negative amount, got {v}"
        )));
    }
    sol_to_lamports(v).map_err(|_| OnboardError::invalid_argument(format!("{name} is too large: {v} SOL")))?;
    Ok(())
}

fn check_days(name: &str, days: u32) -> OnboardResult<()> {
    days_to_seconds(days).map_err(|_| {
        OnboardError::invalid_argument(format!("{name} of {days} days overflows a u32 second count"))
    })?;
    Ok(())
}

/// A confirmed per-tier upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierUpload {
    pub rarity: RarityCode,
    pub signature: String,
}

/// A per-tier upload that did not confirm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierFailure {
    pub rarity: RarityCode,
    pub reason: String,
}
