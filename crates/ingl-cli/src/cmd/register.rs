use std::time::Duration;

use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use ingl_core::model::{TierFailure, TierUpload};
use ingl_core::OnboardError;
use ingl_solana_client::{RegistrationReceipt, WorkflowFailure, WorkflowStage};
use serde::Serialize;

use super::Backend;
use crate::io::input;
use crate::output;

#[derive(Debug, Serialize)]
pub struct RegisterOut {
    pub ok: bool,
    #[serde(flatten)]
    pub receipt: RegistrationReceipt,
}

/// Printed when a registration stops before completing.
#[derive(Debug, Serialize)]
pub struct FailureOut {
    pub ok: bool,
    pub stage: WorkflowStage,
    pub code: &'static str,
    pub retryable: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init_signature: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub succeeded: Vec<TierUpload>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<TierFailure>,
}

impl From<&WorkflowFailure> for FailureOut {
    fn from(f: &WorkflowFailure) -> Self {
        let (init_signature, succeeded, failed) = match &f.cause {
            OnboardError::PartialUpload {
                init_signature,
                succeeded,
                failed,
            } => (init_signature.clone(), succeeded.clone(), failed.clone()),
            _ => (None, Vec::new(), Vec::new()),
        };
        Self {
            ok: false,
            stage: f.stage,
            code: f.cause.code(),
            retryable: f.cause.is_retryable(),
            message: f.cause.to_string(),
            init_signature,
            succeeded,
            failed,
        }
    }
}

pub async fn run(rpc: Option<&str>, keypair: Option<&str>, record_src: &str) -> Result<()> {
    let record = input::read_record(record_src)?;
    let workflow = Backend::from_env(rpc)?.workflow(keypair)?;

    let pb = spinner();
    pb.set_message(format!("registering {}", record.validator_id));
    let result = workflow.register_validator(&record).await;
    pb.finish_and_clear();

    match result {
        Ok(receipt) => {
            output::status(true, &format!("program {} initialized", receipt.program));
            if !receipt.slot_marked {
                output::status(false, "slot registry flag not set; the slot stays excluded by its config account");
            }
            output::print(&RegisterOut { ok: true, receipt })
        }
        Err(failure) => {
            output::print(&FailureOut::from(&failure))?;
            if matches!(failure.cause, OnboardError::PartialUpload { .. }) {
                output::status(false, "retry the failed tiers with `ingl upload`");
            }
            Err(anyhow!(failure))
        }
    }
}

fn spinner() -> ProgressBar {
    if output::is_json() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
