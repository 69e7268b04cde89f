//! Ledger boundary.
//!
//! The workflow only needs three ledger capabilities: read an account, fetch
//! a recent blockhash, and send a signed transaction until it confirms or is
//! rejected. `RpcLedger` implements them over the nonblocking Solana RPC
//! client; confirmation timeouts are the RPC client's own.

use anyhow::Result;
use async_trait::async_trait;
use ingl_core::config::Commitment;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;

/// The subset of account info the onboarding flow inspects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerAccount {
    pub executable: bool,
    pub data: Vec<u8>,
}

#[async_trait]
pub trait Ledger: Send + Sync {
    /// `None` when no account exists at `address`.
    async fn get_account_info(&self, address: &Pubkey) -> Result<Option<LedgerAccount>>;

    async fn latest_blockhash(&self) -> Result<Hash>;

    /// Send and block until confirmed or rejected.
    async fn send_and_confirm(&self, tx: &Transaction) -> Result<Signature>;
}

pub struct RpcLedger {
    rpc: RpcClient,
    commitment: CommitmentConfig,
}

impl RpcLedger {
    pub fn new(rpc_url: &str, commitment: Commitment) -> Self {
        let commitment = commitment_config(commitment);
        Self {
            rpc: RpcClient::new_with_commitment(rpc_url.to_string(), commitment),
            commitment,
        }
    }

    pub fn url(&self) -> String {
        self.rpc.url()
    }

    /// Node version string, used as a reachability probe.
    pub async fn node_version(&self) -> Result<String> {
        let v = self.rpc.get_version().await?;
        Ok(v.solana_core)
    }
}

#[async_trait]
impl Ledger for RpcLedger {
    async fn get_account_info(&self, address: &Pubkey) -> Result<Option<LedgerAccount>> {
        let resp = self
            .rpc
            .get_account_with_commitment(address, self.commitment)
            .await?;
        Ok(resp.value.map(|a| LedgerAccount {
            executable: a.executable,
            data: a.data,
        }))
    }

    async fn latest_blockhash(&self) -> Result<Hash> {
        Ok(self.rpc.get_latest_blockhash().await?)
    }

    async fn send_and_confirm(&self, tx: &Transaction) -> Result<Signature> {
        Ok(self.rpc.send_and_confirm_transaction(tx).await?)
    }
}

fn commitment_config(c: Commitment) -> CommitmentConfig {
    match c {
        Commitment::Processed => CommitmentConfig::processed(),
        Commitment::Confirmed => CommitmentConfig::confirmed(),
        Commitment::Finalized => CommitmentConfig::finalized(),
    }
}
