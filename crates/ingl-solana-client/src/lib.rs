//! ingl-solana-client
//!
//! Off-chain wiring for onboarding a validator onto a pre-deployed Ingl
//! program slot.
//!
//! It includes:
//! - seed constants and well-known program ids
//! - deterministic PDA derivation for every account a slot uses
//! - ordered account schemas and the instruction builder
//! - the ledger boundary (`Ledger`) with an RPC implementation
//! - a transaction submitter with a compute-budget hint
//! - the program slot registry client
//! - the end-to-end registration workflow
//!
//! Ledger and registry access go through traits so the workflow can be driven
//! against in-memory doubles.

pub mod accounts;
pub mod constants;
pub mod instructions;
pub mod keys;
pub mod ledger;
pub mod pda;
pub mod slots;
pub mod submitter;
pub mod workflow;

pub use accounts::*;
pub use constants::*;
pub use instructions::*;
pub use ledger::{Ledger, LedgerAccount, RpcLedger};
pub use pda::*;
pub use slots::*;
pub use submitter::TransactionSubmitter;
pub use workflow::*;
