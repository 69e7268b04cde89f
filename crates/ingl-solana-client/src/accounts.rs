//! Ordered account schemas for Ingl program instructions.
//!
//! The position of each account is part of the calling convention of the
//! on-chain program. Schemas list named roles with their signer/writable flags;
//! the instruction builder resolves roles to addresses in schema order and
//! never builds account lists by hand.

/// A named account position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountRole {
    Payer,
    Config,
    General,
    Uris,
    RentSysvar,
    Validator,
    CollectionHolder,
    CollectionMint,
    MintAuthority,
    AssociatedToken,
    CollectionMetadata,
    CollectionEdition,
    TokenProgram,
    SystemProgram,
    RegistryConfig,
    ProgramSelf,
    Team,
    StorageBucket,
    AssociatedTokenProgram,
    MetaplexProgram,
    RegistryProgram,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Payer => "payer",
            Self::Config => "config",
            Self::General => "general",
            Self::Uris => "uris",
            Self::RentSysvar => "rent-sysvar",
            Self::Validator => "validator",
            Self::CollectionHolder => "collection-holder",
            Self::CollectionMint => "collection-mint",
            Self::MintAuthority => "mint-authority",
            Self::AssociatedToken => "associated-token",
            Self::CollectionMetadata => "collection-metadata",
            Self::CollectionEdition => "collection-edition",
            Self::TokenProgram => "token-program",
            Self::SystemProgram => "system-program",
            Self::RegistryConfig => "registry-config",
            Self::ProgramSelf => "program-self",
            Self::Team => "team",
            Self::StorageBucket => "storage-bucket",
            Self::AssociatedTokenProgram => "associated-token-program",
            Self::MetaplexProgram => "metaplex-program",
            Self::RegistryProgram => "registry-program",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountSlot {
    pub role: AccountRole,
    pub signer: bool,
    pub writable: bool,
}

const fn signer_mut(role: AccountRole) -> AccountSlot {
    AccountSlot { role, signer: true, writable: true }
}

const fn writable(role: AccountRole) -> AccountSlot {
    AccountSlot { role, signer: false, writable: true }
}

const fn readonly(role: AccountRole) -> AccountSlot {
    AccountSlot { role, signer: false, writable: false }
}

pub const INIT_ACCOUNT_COUNT: usize = 23;

/// `Init`: 18 named accounts followed by the programs the handler invokes.
pub const INIT_ACCOUNTS: [AccountSlot; INIT_ACCOUNT_COUNT] = [
    signer_mut(AccountRole::Payer),
    writable(AccountRole::Config),
    writable(AccountRole::General),
    writable(AccountRole::Uris),
    readonly(AccountRole::RentSysvar),
    readonly(AccountRole::Validator),
    writable(AccountRole::CollectionHolder),
    writable(AccountRole::CollectionMint),
    writable(AccountRole::MintAuthority),
    writable(AccountRole::AssociatedToken),
    writable(AccountRole::CollectionMetadata),
    writable(AccountRole::CollectionEdition),
    readonly(AccountRole::TokenProgram),
    readonly(AccountRole::SystemProgram),
    writable(AccountRole::RegistryConfig),
    readonly(AccountRole::ProgramSelf),
    writable(AccountRole::Team),
    writable(AccountRole::StorageBucket),
    // cpi program references
    readonly(AccountRole::SystemProgram),
    readonly(AccountRole::TokenProgram),
    readonly(AccountRole::AssociatedTokenProgram),
    readonly(AccountRole::MetaplexProgram),
    readonly(AccountRole::RegistryProgram),
];

pub const UPLOAD_ACCOUNT_COUNT: usize = 3;

pub const UPLOAD_ACCOUNTS: [AccountSlot; UPLOAD_ACCOUNT_COUNT] = [
    signer_mut(AccountRole::Payer),
    writable(AccountRole::Config),
    writable(AccountRole::Uris),
];
