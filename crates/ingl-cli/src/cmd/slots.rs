use anyhow::Result;
use ingl_solana_client::SlotState;
use serde::Serialize;

use super::Backend;
use crate::output;

#[derive(Debug, Serialize)]
pub struct SlotOut {
    pub program: String,
    pub state: SlotState,
}

#[derive(Debug, Serialize)]
pub struct SlotsOut {
    pub available: usize,
    pub slots: Vec<SlotOut>,
}

pub async fn run(rpc: Option<&str>) -> Result<()> {
    let backend = Backend::from_env(rpc)?;
    let slots: Vec<SlotOut> = backend
        .registry
        .inspect()
        .await?
        .into_iter()
        .map(|s| SlotOut {
            program: s.slot.identity.to_string(),
            state: s.state,
        })
        .collect();

    let available = slots.iter().filter(|s| s.state == SlotState::Available).count();
    output::status(available > 0, &format!("{available} of {} unused slot(s) claimable", slots.len()));
    output::print(&SlotsOut { available, slots })
}
