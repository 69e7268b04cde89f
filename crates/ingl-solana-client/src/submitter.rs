//! Transaction submission.
//!
//! One call = one ledger transaction: a compute-unit-limit instruction
//! followed by the caller's instructions, signed by the held key. No retries
//! here; retry policy belongs to the workflow's caller.

use std::sync::Arc;

use ingl_core::{OnboardError, OnboardResult};
use solana_sdk::compute_budget::ComputeBudgetInstruction;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::Transaction;
use tracing::debug;

use crate::ledger::Ledger;

#[derive(Clone)]
pub struct TransactionSubmitter {
    ledger: Arc<dyn Ledger>,
    payer: Arc<Keypair>,
}

impl TransactionSubmitter {
    pub fn new(ledger: Arc<dyn Ledger>, payer: Arc<Keypair>) -> Self {
        Self { ledger, payer }
    }

    pub fn payer(&self) -> Pubkey {
        self.payer.pubkey()
    }

    /// Sign, send, and wait for confirmation.
    pub async fn submit(&self, ixs: &[Instruction], compute_unit_limit: u32) -> OnboardResult<Signature> {
        let tx = self.sign(ixs, compute_unit_limit).await?;
        let sig = self
            .ledger
            .send_and_confirm(&tx)
            .await
            .map_err(|e| OnboardError::submission_failed(format!("{e:#}")))?;
        debug!(signature = %sig, instructions = ixs.len(), "transaction confirmed");
        Ok(sig)
    }

    async fn sign(&self, ixs: &[Instruction], compute_unit_limit: u32) -> OnboardResult<Transaction> {
        let mut all = Vec::with_capacity(ixs.len() + 1);
        all.push(ComputeBudgetInstruction::set_compute_unit_limit(compute_unit_limit));
        all.extend_from_slice(ixs);

        let blockhash = self
            .ledger
            .latest_blockhash()
            .await
            .map_err(|e| OnboardError::submission_failed(format!("latest blockhash: {e:#}")))?;

        let payer = self.payer.pubkey();
        Ok(Transaction::new_signed_with_payer(
            &all,
            Some(&payer),
            &[&*self.payer],
            blockhash,
        ))
    }
}
