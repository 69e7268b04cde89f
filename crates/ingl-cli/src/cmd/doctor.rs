use anyhow::Result;
use ingl_solana_client::{RpcLedger, WorkflowSettings, CLIENT_VERSION};
use serde::Serialize;
use solana_sdk::signature::Signer;

use crate::env;
use crate::output;

#[derive(Debug, Serialize)]
pub struct Check {
    pub name: String,
    pub ok: bool,
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct DoctorOut {
    pub ok: bool,
    pub client_version: &'static str,
    pub checks: Vec<Check>,
}

pub async fn run(rpc: Option<&str>, keypair: Option<&str>) -> Result<()> {
    let mut checks = Vec::new();

    let cfg = match env::load_config_from_env(rpc) {
        Ok(cfg) => {
            checks.push(check("config", Ok(format!("rpc {} / registry {}", cfg.rpc_url, cfg.registry_api.endpoint))));
            Some(cfg)
        }
        Err(e) => {
            checks.push(check("config", Err(e.to_string())));
            None
        }
    };

    checks.push(check(
        "signing key",
        env::load_keypair(keypair)
            .map(|kp| format!("payer {}", kp.pubkey()))
            .map_err(|e| e.to_string()),
    ));

    if let Some(cfg) = cfg {
        checks.push(check(
            "program ids",
            WorkflowSettings::from_config(&cfg)
                .map(|s| format!("registry {} / team {}", s.external.registry_program, s.external.team))
                .map_err(|e| e.to_string()),
        ));

        let ledger = RpcLedger::new(&cfg.rpc_url, cfg.commitment);
        checks.push(check(
            "rpc",
            ledger
                .node_version()
                .await
                .map(|v| format!("{} reachable, node {v}", ledger.url()))
                .map_err(|e| format!("{e:#}")),
        ));
    }

    let ok = checks.iter().all(|c| c.ok);
    for c in &checks {
        output::status(c.ok, &format!("{}: {}", c.name, c.detail));
    }
    output::print(&DoctorOut {
        ok,
        client_version: CLIENT_VERSION,
        checks,
    })?;
    Ok(())
}

fn check(name: &str, result: std::result::Result<String, String>) -> Check {
    let (ok, detail) = match result {
        Ok(d) => (true, d),
        Err(d) => (false, d),
    };
    Check {
        name: name.to_string(),
        ok,
        detail,
    }
}
