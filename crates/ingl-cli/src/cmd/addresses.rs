use anyhow::Result;
use ingl_solana_client::{current_storage_bucket, DerivedAddressSet, WorkflowSettings};
use serde::Serialize;

use super::{parse_program, Backend};
use crate::output;

#[derive(Debug, Serialize)]
pub struct AddressOut {
    pub seed: &'static str,
    pub address: String,
    pub bump: u8,
}

#[derive(Debug, Serialize)]
pub struct AddressesOut {
    pub program: String,
    pub storage_bucket: u32,
    pub team: String,
    pub addresses: Vec<AddressOut>,
}

pub async fn run(rpc: Option<&str>, program: &str, bucket: Option<u32>) -> Result<()> {
    let program = parse_program(program)?;
    let backend = Backend::from_env(rpc)?;
    let settings = WorkflowSettings::from_config(&backend.cfg)?;

    let bucket = match bucket {
        Some(b) => b,
        None => {
            current_storage_bucket(
                backend.ledger.as_ref(),
                &settings.external.registry_program,
                settings.storage_capacity,
            )
            .await?
        }
    };

    let set = DerivedAddressSet::resolve(&program, &settings.external, bucket)?;
    output::print(&render(&set))
}

fn render(set: &DerivedAddressSet) -> AddressesOut {
    AddressesOut {
        program: set.program.to_string(),
        storage_bucket: set.storage_bucket,
        team: set.team.to_string(),
        addresses: set
            .entries()
            .into_iter()
            .map(|d| AddressOut {
                seed: d.seed_name,
                address: d.address.to_string(),
                bump: d.bump,
            })
            .collect(),
    }
}
