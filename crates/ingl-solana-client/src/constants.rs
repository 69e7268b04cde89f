//! Constants shared between the Ingl program and this client.
//!
//! Keep these stable because they affect PDA derivation.

use solana_program::pubkey;
use solana_program::pubkey::Pubkey;

/// PDA seed for the program configuration account. Its existence marks a slot as configured.
pub const SEED_CONFIG: &[u8] = b"ingl_config";

/// PDA seed for the general state account.
pub const SEED_GENERAL: &[u8] = b"general_account";

/// PDA seed for the per-rarity URI account.
pub const SEED_URIS: &[u8] = b"uris_account";

/// PDA seed for the NFT collection mint.
pub const SEED_COLLECTION_MINT: &[u8] = b"ingl_nft_collection_newer";

/// PDA seed for the mint authority.
pub const SEED_MINT_AUTHORITY: &[u8] = b"mint_authority";

/// PDA seed for the account holding the collection NFT.
pub const SEED_COLLECTION_HOLDER: &[u8] = b"collection_holder";

/// Metaplex token-metadata seeds.
pub const SEED_METADATA: &[u8] = b"metadata";
pub const SEED_EDITION: &[u8] = b"edition";

/// Registry program seeds.
pub const SEED_REGISTRY_CONFIG: &[u8] = b"config";
pub const SEED_STORAGE: &[u8] = b"storage";

pub const TOKEN_PROGRAM_ID: Pubkey = pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");

pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey = pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

pub const METAPLEX_PROGRAM_ID: Pubkey = pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

/// Version string embedded into client metadata.
pub const CLIENT_VERSION: &str = "v1";
