//! PDA derivation for Ingl program slots.
//!
//! Every address here is a pure function of (program id, seed constant,
//! extra seed bytes). Seeds are closed over by `Seed`; callers cannot pass
//! ad-hoc seed strings.
//!
//! Derivation uses `Pubkey::try_find_program_address`, which walks bumps from
//! 255 downward until the candidate falls off the curve. Exhausting all bumps
//! is reported as `InvalidSeed` instead of panicking.

use ingl_core::{OnboardError, OnboardResult};
use solana_program::pubkey::Pubkey;

use crate::constants::{
    ASSOCIATED_TOKEN_PROGRAM_ID, METAPLEX_PROGRAM_ID, SEED_COLLECTION_HOLDER, SEED_COLLECTION_MINT,
    SEED_CONFIG, SEED_EDITION, SEED_GENERAL, SEED_METADATA, SEED_MINT_AUTHORITY,
    SEED_REGISTRY_CONFIG, SEED_STORAGE, SEED_URIS, TOKEN_PROGRAM_ID,
};

/// Named seeds used by the onboarding flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seed {
    Config,
    General,
    Uris,
    CollectionMint,
    MintAuthority,
    CollectionHolder,
    CollectionMetadata,
    CollectionEdition,
    RegistryConfig,
    Storage,
}

impl Seed {
    /// Leading seed bytes.
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            Self::Config => SEED_CONFIG,
            Self::General => SEED_GENERAL,
            Self::Uris => SEED_URIS,
            Self::CollectionMint => SEED_COLLECTION_MINT,
            Self::MintAuthority => SEED_MINT_AUTHORITY,
            Self::CollectionHolder => SEED_COLLECTION_HOLDER,
            Self::CollectionMetadata | Self::CollectionEdition => SEED_METADATA,
            Self::RegistryConfig => SEED_REGISTRY_CONFIG,
            Self::Storage => SEED_STORAGE,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::General => "general",
            Self::Uris => "uris",
            Self::CollectionMint => "collection-mint",
            Self::MintAuthority => "mint-authority",
            Self::CollectionHolder => "collection-holder",
            Self::CollectionMetadata => "collection-metadata",
            Self::CollectionEdition => "collection-edition",
            Self::RegistryConfig => "registry-config",
            Self::Storage => "storage",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedAddress {
    pub seed_name: &'static str,
    pub bump: u8,
    pub address: Pubkey,
}

/// Derive `seed` (followed by `extra` seed chunks) under `program_id`.
pub fn derive(program_id: &Pubkey, seed: Seed, extra: &[&[u8]]) -> OnboardResult<DerivedAddress> {
    let mut seeds: Vec<&[u8]> = Vec::with_capacity(1 + extra.len());
    seeds.push(seed.as_bytes());
    seeds.extend_from_slice(extra);
    find(program_id, seed.name(), &seeds)
}

fn find(program_id: &Pubkey, seed_name: &'static str, seeds: &[&[u8]]) -> OnboardResult<DerivedAddress> {
    Pubkey::try_find_program_address(seeds, program_id)
        .map(|(address, bump)| DerivedAddress { seed_name, bump, address })
        .ok_or_else(|| OnboardError::InvalidSeed {
            seed: seed_name.to_string(),
        })
}

/// Config PDA of an Ingl program. Present on-chain once the slot is initialized.
pub fn derive_program_config(program_id: &Pubkey) -> OnboardResult<DerivedAddress> {
    derive(program_id, Seed::Config, &[])
}

pub fn derive_uris(program_id: &Pubkey) -> OnboardResult<DerivedAddress> {
    derive(program_id, Seed::Uris, &[])
}

pub fn derive_registry_config(registry_program: &Pubkey) -> OnboardResult<DerivedAddress> {
    derive(registry_program, Seed::RegistryConfig, &[])
}

/// Storage bucket PDA of the registry program; the bucket index is a u32 in big-endian.
pub fn derive_storage(registry_program: &Pubkey, bucket: u32) -> OnboardResult<DerivedAddress> {
    derive(registry_program, Seed::Storage, &[&bucket.to_be_bytes()])
}

/// Metaplex metadata PDA for `mint`.
pub fn derive_metadata(mint: &Pubkey) -> OnboardResult<DerivedAddress> {
    derive(
        &METAPLEX_PROGRAM_ID,
        Seed::CollectionMetadata,
        &[METAPLEX_PROGRAM_ID.as_ref(), mint.as_ref()],
    )
}

/// Metaplex master edition PDA for `mint`.
pub fn derive_edition(mint: &Pubkey) -> OnboardResult<DerivedAddress> {
    derive(
        &METAPLEX_PROGRAM_ID,
        Seed::CollectionEdition,
        &[METAPLEX_PROGRAM_ID.as_ref(), mint.as_ref(), SEED_EDITION],
    )
}

/// Associated token account of `owner` for `mint` (owner may be off-curve).
pub fn derive_associated_token(owner: &Pubkey, mint: &Pubkey) -> OnboardResult<DerivedAddress> {
    find(
        &ASSOCIATED_TOKEN_PROGRAM_ID,
        "associated-holder-token",
        &[owner.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
    )
}

/// External identities the address set depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternalIds {
    pub registry_program: Pubkey,
    pub team: Pubkey,
}

/// Every account address one program slot needs for its init instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedAddressSet {
    pub program: Pubkey,
    pub config: DerivedAddress,
    pub general: DerivedAddress,
    pub uris: DerivedAddress,
    pub collection_mint: DerivedAddress,
    pub mint_authority: DerivedAddress,
    pub collection_metadata: DerivedAddress,
    pub collection_edition: DerivedAddress,
    pub collection_holder: DerivedAddress,
    pub associated_holder_token: DerivedAddress,
    /// Fixed team wallet; not derived.
    pub team: Pubkey,
    /// Registry program that owns `storage` and `registry_config`.
    pub registry_program: Pubkey,
    pub storage: DerivedAddress,
    pub storage_bucket: u32,
    pub registry_config: DerivedAddress,
}

impl DerivedAddressSet {
    /// Resolve all entries for `program`. `storage_bucket` comes from the registry counter.
    pub fn resolve(program: &Pubkey, ext: &ExternalIds, storage_bucket: u32) -> OnboardResult<Self> {
        let collection_mint = derive(program, Seed::CollectionMint, &[])?;
        let collection_holder = derive(program, Seed::CollectionHolder, &[])?;

        Ok(Self {
            program: *program,
            config: derive_program_config(program)?,
            general: derive(program, Seed::General, &[])?,
            uris: derive_uris(program)?,
            mint_authority: derive(program, Seed::MintAuthority, &[])?,
            collection_metadata: derive_metadata(&collection_mint.address)?,
            collection_edition: derive_edition(&collection_mint.address)?,
            associated_holder_token: derive_associated_token(
                &collection_holder.address,
                &collection_mint.address,
            )?,
            collection_mint,
            collection_holder,
            team: ext.team,
            registry_program: ext.registry_program,
            storage: derive_storage(&ext.registry_program, storage_bucket)?,
            storage_bucket,
            registry_config: derive_registry_config(&ext.registry_program)?,
        })
    }

    /// Derived entries in a stable order (team excluded).
    pub fn entries(&self) -> Vec<DerivedAddress> {
        vec![
            self.config,
            self.general,
            self.uris,
            self.collection_mint,
            self.mint_authority,
            self.collection_metadata,
            self.collection_edition,
            self.collection_holder,
            self.associated_holder_token,
            self.storage,
            self.registry_config,
        ]
    }
}
