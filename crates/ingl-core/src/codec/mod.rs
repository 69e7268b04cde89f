//! Payload codec for the Ingl program and the external registry.
//!
//! Encoding applies the numeric normalization the program expects before
//! any byte is written:
//! - SOL amounts are scaled by `LAMPORTS_PER_SOL` and truncated
//! - royalty percent is scaled by 100 (two implied decimals)
//! - day durations become seconds
//! - `log_level` is always `DEFAULT_LOG_LEVEL`
//!
//! Field order and widths come from `schema`; see `schema::INIT_V1` and
//! `schema::UPLOAD_URIS_V1`.

pub mod schema;

use serde::{Deserialize, Serialize};

use crate::errors::{OnboardError, OnboardResult};
use crate::model::{validate_tiers, RarityTier, RegistrationRecord};
use crate::{LAMPORTS_PER_SOL, SECONDS_PER_DAY};

use self::schema::{PayloadReader, PayloadWriter, INIT_V1, REGISTRY_CONFIG_V1, UPLOAD_URIS_V1};

/// Program log verbosity written into every instruction. Not caller-controlled.
pub const DEFAULT_LOG_LEVEL: u8 = 0;

/// Convert fractional SOL to lamports, truncating toward zero.
///
/// Negative, non-finite, or amounts beyond `u64::MAX` lamports are rejected.
pub fn sol_to_lamports(sol: f64) -> OnboardResult<u64> {
    let lamports = (sol * LAMPORTS_PER_SOL as f64).trunc();
    // u64::MAX as f64 rounds up to 2^64, which does not fit
    if !lamports.is_finite() || lamports < 0.0 || lamports >= u64::MAX as f64 {
        return Err(OnboardError::invalid_argument(format!(
            "{sol} SOL does not fit a u64 lamport amount"
        )));
    }
    Ok(lamports as u64)
}

/// Convert a royalty percentage (one decimal expected) to hundredths of a percent.
///
/// Rounded rather than truncated so that e.g. `0.29 * 100.0` yields 29.
pub fn royalty_to_basis_points(percent: f64) -> u16 {
    (percent * 100.0).round() as u16
}

pub fn days_to_seconds(days: u32) -> OnboardResult<u32> {
    days.checked_mul(SECONDS_PER_DAY).ok_or_else(|| {
        OnboardError::invalid_argument(format!("{days} days overflows a u32 second count"))
    })
}

/// Encode the `Init` instruction payload.
pub fn encode_init(record: &RegistrationRecord) -> OnboardResult<Vec<u8>> {
    record.validate()?;
    let p = &record.profile;

    PayloadWriter::new(&INIT_V1)
        .u8("log_level", DEFAULT_LOG_LEVEL)?
        .u8("init_commission", p.init_commission)?
        .u64("max_primary_stake", sol_to_lamports(record.max_primary_stake)?)?
        .u8("nft_holders_share", p.nft_holders_share)?
        .u8("initial_redemption_fee", p.initial_redemption_fee)?
        .bool("is_validator_id_switchable", p.is_validator_id_switchable)?
        .u64("unit_backing", sol_to_lamports(record.unit_backing)?)?
        .u32("redemption_fee_duration", days_to_seconds(p.redemption_fee_duration)?)?
        .u8("proposal_quorum", p.proposal_quorum)?
        .u16("creator_royalties", royalty_to_basis_points(record.creator_royalties))?
        .bytes("rarities", &record.rarity_codes())?
        .strings("rarity_names", &p.rarity_names)?
        .string("twitter_handle", &p.twitter_handle)?
        .string("discord_invite", &p.discord_invite)?
        .string("validator_name", &p.validator_name)?
        .string("collection_uri", &p.collection_uri)?
        .string("website", &p.website)?
        .u32("governance_expiration_time", days_to_seconds(record.governance_expiration_days)?)?
        .string("default_uri", &p.default_uri)?
        .finish()
}

/// Encode the `UploadUris` instruction payload for one tier.
pub fn encode_upload(tier: &RarityTier) -> OnboardResult<Vec<u8>> {
    validate_tiers(std::slice::from_ref(tier))?;

    PayloadWriter::new(&UPLOAD_URIS_V1)
        .strings("uris", &tier.uris)?
        .u8("rarity", tier.rarity)?
        .u8("log_level", DEFAULT_LOG_LEVEL)?
        .finish()
}

/// Decoded registry configuration account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub validation_phrase: u32,
    /// Number of validators registered so far.
    pub validation_number: u32,
}

pub fn decode_registry_config(data: &[u8]) -> OnboardResult<RegistryConfig> {
    if let Some(expected) = REGISTRY_CONFIG_V1.fixed_len() {
        if data.len() != expected {
            return Err(OnboardError::malformed_account(format!(
                "registry config: expected {expected} bytes, got {}",
                data.len()
            )));
        }
    }
    let mut r = PayloadReader::new(&REGISTRY_CONFIG_V1, data)?;
    let validation_phrase = r.u32("validation_phrase")?;
    let validation_number = r.u32("validation_number")?;
    r.finish()?;
    Ok(RegistryConfig {
        validation_phrase,
        validation_number,
    })
}

/// Inverse of `decode_registry_config`, for fixtures and local test ledgers.
pub fn encode_registry_config(cfg: &RegistryConfig) -> OnboardResult<Vec<u8>> {
    PayloadWriter::new(&REGISTRY_CONFIG_V1)
        .u32("validation_phrase", cfg.validation_phrase)?
        .u32("validation_number", cfg.validation_number)?
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ValidatorProfile;
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    fn record() -> RegistrationRecord {
        RegistrationRecord {
            validator_id: "Vote111111111111111111111111111111111111111".into(),
            unit_backing: 1.5,
            max_primary_stake: 2.25,
            governance_expiration_days: 2,
            creator_royalties: 5.5,
            rarities: vec![
                RarityTier { rarity: 1, uris: vec!["a".into()] },
                RarityTier { rarity: 4, uris: vec!["b".into(), "c".into()] },
            ],
            profile: ValidatorProfile {
                init_commission: 7,
                ..ValidatorProfile::default()
            },
        }
    }

    #[test]
    fn normalization_rules() {
        assert_eq!(sol_to_lamports(1.5).unwrap(), 1_500_000_000);
        assert_eq!(sol_to_lamports(0.000_000_001_9).unwrap(), 1);
        assert_eq!(royalty_to_basis_points(5.5), 550);
        assert_eq!(royalty_to_basis_points(0.29), 29);
        assert_eq!(days_to_seconds(2).unwrap(), 172_800);
        assert!(days_to_seconds(u32::MAX).is_err());
    }

    #[test]
    fn oversized_lamport_amounts_are_errors() {
        assert!(sol_to_lamports(1e12).is_err());
        assert!(sol_to_lamports(-1.0).is_err());
        assert!(sol_to_lamports(f64::NAN).is_err());
        assert_eq!(sol_to_lamports(0.0).unwrap(), 0);
    }

    #[test]
    fn init_layout_prefix() {
        let bytes = encode_init(&record()).unwrap();
        assert_eq!(bytes[0], schema::INIT_TAG);
        assert_eq!(bytes[1], DEFAULT_LOG_LEVEL);
        assert_eq!(bytes[2], 7);
        assert_eq!(&bytes[3..11], &2_250_000_000u64.to_le_bytes());
        // nft_holders_share, initial_redemption_fee, is_validator_id_switchable
        assert_eq!(&bytes[11..14], &[100, 0, 0]);
        assert_eq!(&bytes[14..22], &1_500_000_000u64.to_le_bytes());
        assert_eq!(&bytes[22..26], &0u32.to_le_bytes());
        assert_eq!(bytes[26], 65);
        assert_eq!(&bytes[27..29], &550u16.to_le_bytes());
        // rarities: u32 count + codes
        assert_eq!(&bytes[29..35], &[2, 0, 0, 0, 1, 4]);
    }

    #[test]
    fn init_layout_suffix_carries_expiration_seconds() {
        let bytes = encode_init(&record()).unwrap();
        // governance_expiration_time followed by an empty default_uri
        let tail = &bytes[bytes.len() - 8..];
        assert_eq!(&tail[..4], &172_800u32.to_le_bytes());
        assert_eq!(&tail[4..], &[0, 0, 0, 0]);
    }

    #[test]
    fn init_rejects_invalid_record() {
        let mut r = record();
        r.creator_royalties = 250.0;
        assert_matches!(encode_init(&r), Err(OnboardError::InvalidArgument(_)));
    }

    #[test]
    fn upload_layout() {
        let tier = RarityTier { rarity: 3, uris: vec!["ab".into()] };
        let bytes = encode_upload(&tier).unwrap();
        assert_eq!(
            bytes,
            vec![schema::UPLOAD_URIS_TAG, 1, 0, 0, 0, 2, 0, 0, 0, b'a', b'b', 3, DEFAULT_LOG_LEVEL]
        );
    }

    #[test]
    fn upload_rejects_empty_tier() {
        let tier = RarityTier { rarity: 3, uris: vec![] };
        assert!(encode_upload(&tier).is_err());
    }

    #[test]
    fn encoding_is_deterministic() {
        assert_eq!(encode_init(&record()).unwrap(), encode_init(&record()).unwrap());
    }

    #[test]
    fn registry_config_wrong_length() {
        assert_matches!(decode_registry_config(&[]), Err(OnboardError::MalformedAccount { .. }));
        assert_matches!(decode_registry_config(&[0; 7]), Err(OnboardError::MalformedAccount { .. }));
        assert_matches!(decode_registry_config(&[0; 9]), Err(OnboardError::MalformedAccount { .. }));
    }

    proptest! {
        #[test]
        fn registry_config_roundtrip(phrase in any::<u32>(), n in any::<u32>()) {
            let cfg = RegistryConfig { validation_phrase: phrase, validation_number: n };
            let bytes = encode_registry_config(&cfg).unwrap();
            prop_assert_eq!(decode_registry_config(&bytes).unwrap(), cfg);
        }

        #[test]
        fn registry_config_rejects_other_lengths(data in proptest::collection::vec(any::<u8>(), 0..32)) {
            prop_assume!(data.len() != 8);
            prop_assert!(
                matches!(decode_registry_config(&data), Err(OnboardError::MalformedAccount { .. })),
                "unexpected result for length {}", data.len()
            );
        }
    }
}
