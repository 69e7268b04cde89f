use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "ingl", version, about = "Ingl validator onboarding CLI")]
pub struct Cli {
    /// Emit JSON output on stdout and JSON logs on stderr.
    #[arg(long, global = true)]
    pub json: bool,

    /// RPC endpoint (overrides INGL_RPC_URL).
    #[arg(long, global = true)]
    pub rpc_url: Option<String>,

    /// Path to a JSON keypair file (overrides BACKEND_KEYPAIR).
    #[arg(long, global = true)]
    pub keypair: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Claim a program slot, initialize it for a validator and upload its rarity URIs.
    Register {
        /// Registration record (JSON file, `-` for stdin).
        record: String,
    },

    /// Retry rarity URI uploads against an already initialized program.
    Upload {
        /// Program id returned by `register`.
        #[arg(long)]
        program: String,

        /// Registration record holding the tiers (JSON file, `-` for stdin).
        record: String,

        /// Only upload these rarity codes (repeatable). Default: all tiers.
        #[arg(long = "rarity")]
        rarities: Vec<u8>,
    },

    /// List unused program slots and whether each can be claimed.
    Slots,

    /// Print every derived address for a program slot.
    Addresses {
        #[arg(long)]
        program: String,

        /// Use this storage bucket instead of reading the registry counter.
        #[arg(long)]
        bucket: Option<u32>,
    },

    /// Print payload field layouts.
    Schema {
        /// Payload schema version.
        #[arg(long, default_value = "v1")]
        version: String,
    },

    /// Run configuration and connectivity checks.
    Doctor,
}
