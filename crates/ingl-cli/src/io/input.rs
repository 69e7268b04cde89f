use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use ingl_core::model::RegistrationRecord;

/// Read a registration record from a JSON file, or stdin when `source` is `-`.
pub fn read_record(source: &str) -> Result<RegistrationRecord> {
    let raw = if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("read stdin")?;
        buf
    } else {
        read_file(source)?
    };
    parse_record(&raw)
}

pub fn parse_record(raw: &str) -> Result<RegistrationRecord> {
    serde_json::from_str(raw).map_err(|e| anyhow!("invalid registration record: {e}"))
}

fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"{
        "validator_id": "11111111111111111111111111111111",
        "unit_backing": 1.5,
        "max_primary_stake": 1000,
        "governance_expiration_time": 30,
        "creator_royalties": 2.5,
        "rarities": [{"rarity": 1, "uris": ["https://arweave.net/a"]}],
        "validator_name": "alpha"
    }"#;

    #[test]
    fn record_file_parses_with_profile_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut f, RECORD.as_bytes()).unwrap();

        let rec = read_record(f.path().to_str().unwrap()).unwrap();
        assert_eq!(rec.governance_expiration_days, 30);
        assert_eq!(rec.profile.validator_name, "alpha");
        assert_eq!(rec.profile.proposal_quorum, 65);
        assert_eq!(rec.rarities[0].uris.len(), 1);
    }

    #[test]
    fn missing_file_names_path() {
        let err = read_record("/nonexistent/record.json").unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/record.json"));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(parse_record("{\"validator_id\": 3}").is_err());
    }
}
