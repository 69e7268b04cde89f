use std::sync::Arc;

use anyhow::Result;
use ingl_core::config::OnboardConfig;
use ingl_solana_client::{
    DataApiSlotStore, Ledger, ProgramSlotRegistry, RegistrationWorkflow, RpcLedger, TransactionSubmitter,
    WorkflowSettings,
};
use solana_sdk::pubkey::Pubkey;

use crate::args::{Cli, Command};
use crate::env;

mod addresses;
mod doctor;
mod register;
mod schema;
mod slots;
mod upload;

pub async fn dispatch(cli: Cli) -> Result<()> {
    let rpc = cli.rpc_url.as_deref();
    let keypair = cli.keypair.as_deref();
    match cli.command {
        Command::Register { ref record } => register::run(rpc, keypair, record).await,
        Command::Upload {
            ref program,
            ref record,
            ref rarities,
        } => upload::run(rpc, keypair, program, record, rarities).await,
        Command::Slots => slots::run(rpc).await,
        Command::Addresses { ref program, bucket } => addresses::run(rpc, program, bucket).await,
        Command::Schema { ref version } => schema::run(version),
        Command::Doctor => doctor::run(rpc, keypair).await,
    }
}

/// Ledger and slot registry built from the environment.
pub(crate) struct Backend {
    pub cfg: OnboardConfig,
    pub ledger: Arc<RpcLedger>,
    pub registry: ProgramSlotRegistry,
}

impl Backend {
    pub fn from_env(rpc_override: Option<&str>) -> Result<Self> {
        let cfg = env::load_config_from_env(rpc_override)?;
        let ledger = Arc::new(RpcLedger::new(&cfg.rpc_url, cfg.commitment));
        let store = Arc::new(DataApiSlotStore::new(cfg.registry_api.clone()));
        let registry = ProgramSlotRegistry::new(store, ledger.clone());
        Ok(Self { cfg, ledger, registry })
    }

    pub fn dyn_ledger(&self) -> Arc<dyn Ledger> {
        self.ledger.clone()
    }

    /// Full workflow; loads the signing key.
    pub fn workflow(self, keypair: Option<&str>) -> Result<RegistrationWorkflow> {
        let payer = env::load_keypair(keypair)?;
        let settings = WorkflowSettings::from_config(&self.cfg)?;
        let ledger = self.dyn_ledger();
        let submitter = TransactionSubmitter::new(ledger.clone(), Arc::new(payer));
        Ok(RegistrationWorkflow::new(self.registry, ledger, submitter, settings))
    }
}

pub(crate) fn parse_program(s: &str) -> Result<Pubkey> {
    s.trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid program id: {s}"))
}
