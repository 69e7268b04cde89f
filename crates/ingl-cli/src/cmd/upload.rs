use anyhow::{anyhow, Result};
use ingl_core::model::{RarityTier, TierUpload};
use ingl_core::OnboardError;
use serde::Serialize;

use super::{parse_program, Backend};
use crate::io::input;
use crate::output;

#[derive(Debug, Serialize)]
pub struct UploadOut {
    pub ok: bool,
    pub program: String,
    pub uploads: Vec<TierUpload>,
}

pub async fn run(
    rpc: Option<&str>,
    keypair: Option<&str>,
    program: &str,
    record_src: &str,
    only: &[u8],
) -> Result<()> {
    let program = parse_program(program)?;
    let record = input::read_record(record_src)?;
    let tiers = select_tiers(record.rarities, only)?;

    let workflow = Backend::from_env(rpc)?.workflow(keypair)?;
    match workflow.upload_tiers(&program, &tiers).await {
        Ok(uploads) => {
            output::status(true, &format!("{} tier(s) uploaded", uploads.len()));
            output::print(&UploadOut {
                ok: true,
                program: program.to_string(),
                uploads,
            })
        }
        Err(OnboardError::PartialUpload {
            init_signature,
            succeeded,
            failed,
        }) => {
            output::print(&serde_json::json!({
                "ok": false,
                "code": "partial_upload",
                "succeeded": &succeeded,
                "failed": &failed,
            }))?;
            Err(anyhow!(OnboardError::PartialUpload {
                init_signature,
                succeeded,
                failed,
            }))
        }
        Err(e) => Err(anyhow!(e)),
    }
}

/// Tiers whose code is in `only`, in record order. Empty `only` keeps all.
fn select_tiers(tiers: Vec<RarityTier>, only: &[u8]) -> Result<Vec<RarityTier>> {
    if only.is_empty() {
        return Ok(tiers);
    }
    if let Some(missing) = only.iter().find(|r| !tiers.iter().any(|t| t.rarity == **r)) {
        return Err(anyhow!("rarity {missing} is not in the record"));
    }
    Ok(tiers.into_iter().filter(|t| only.contains(&t.rarity)).collect())
}
