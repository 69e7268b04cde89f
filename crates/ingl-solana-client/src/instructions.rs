//! Instruction builder for the Ingl program.
//!
//! Builds `Init` and `UploadUris` instructions by walking the account schemas
//! in `accounts`. The builder does not judge whether addresses are
//! semantically right (derivation and the slot registry own that), but it
//! refuses to return an instruction whose account list does not have the
//! schema's exact length.

use ingl_core::{OnboardError, OnboardResult};
use solana_program::instruction::{AccountMeta, Instruction};
use solana_program::pubkey::Pubkey;
use solana_program::{system_program, sysvar};

use crate::accounts::{AccountRole, AccountSlot, INIT_ACCOUNTS, UPLOAD_ACCOUNTS};
use crate::constants::{ASSOCIATED_TOKEN_PROGRAM_ID, METAPLEX_PROGRAM_ID, TOKEN_PROGRAM_ID};
use crate::pda::DerivedAddressSet;

/// Maps schema roles to concrete addresses.
pub trait AccountResolver {
    fn resolve(&self, role: AccountRole) -> Option<Pubkey>;
}

/// Accounts for the `Init` instruction.
#[derive(Debug, Clone, Copy)]
pub struct InitAccounts<'a> {
    pub payer: Pubkey,
    pub validator: Pubkey,
    pub set: &'a DerivedAddressSet,
}

impl AccountResolver for InitAccounts<'_> {
    fn resolve(&self, role: AccountRole) -> Option<Pubkey> {
        let s = self.set;
        let key = match role {
            AccountRole::Payer => self.payer,
            AccountRole::Config => s.config.address,
            AccountRole::General => s.general.address,
            AccountRole::Uris => s.uris.address,
            AccountRole::RentSysvar => sysvar::rent::id(),
            AccountRole::Validator => self.validator,
            AccountRole::CollectionHolder => s.collection_holder.address,
            AccountRole::CollectionMint => s.collection_mint.address,
            AccountRole::MintAuthority => s.mint_authority.address,
            AccountRole::AssociatedToken => s.associated_holder_token.address,
            AccountRole::CollectionMetadata => s.collection_metadata.address,
            AccountRole::CollectionEdition => s.collection_edition.address,
            AccountRole::TokenProgram => TOKEN_PROGRAM_ID,
            AccountRole::SystemProgram => system_program::id(),
            AccountRole::RegistryConfig => s.registry_config.address,
            AccountRole::ProgramSelf => s.program,
            AccountRole::Team => s.team,
            AccountRole::StorageBucket => s.storage.address,
            AccountRole::AssociatedTokenProgram => ASSOCIATED_TOKEN_PROGRAM_ID,
            AccountRole::MetaplexProgram => METAPLEX_PROGRAM_ID,
            AccountRole::RegistryProgram => s.registry_program,
        };
        Some(key)
    }
}

/// Accounts shared by every `UploadUris` instruction of one program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadAccounts {
    pub payer: Pubkey,
    pub config: Pubkey,
    pub uris: Pubkey,
}

impl UploadAccounts {
    pub fn from_set(payer: Pubkey, set: &DerivedAddressSet) -> Self {
        Self {
            payer,
            config: set.config.address,
            uris: set.uris.address,
        }
    }
}

impl AccountResolver for UploadAccounts {
    fn resolve(&self, role: AccountRole) -> Option<Pubkey> {
        match role {
            AccountRole::Payer => Some(self.payer),
            AccountRole::Config => Some(self.config),
            AccountRole::Uris => Some(self.uris),
            _ => None,
        }
    }
}

/// Resolve `schema` into account metas, in order.
pub fn account_metas(schema: &[AccountSlot], resolver: &impl AccountResolver) -> OnboardResult<Vec<AccountMeta>> {
    let metas: Vec<AccountMeta> = schema
        .iter()
        .filter_map(|slot| {
            resolver.resolve(slot.role).map(|key| {
                if slot.writable {
                    AccountMeta::new(key, slot.signer)
                } else {
                    AccountMeta::new_readonly(key, slot.signer)
                }
            })
        })
        .collect();

    if metas.len() != schema.len() {
        return Err(OnboardError::AccountListMismatch {
            expected: schema.len(),
            actual: metas.len(),
        });
    }
    Ok(metas)
}

/// Build the `Init` instruction for `program_id`.
pub fn build_init(program_id: &Pubkey, accounts: &InitAccounts<'_>, data: Vec<u8>) -> OnboardResult<Instruction> {
    build(program_id, &INIT_ACCOUNTS, accounts, data)
}

/// Build one `UploadUris` instruction for `program_id`.
pub fn build_upload(program_id: &Pubkey, accounts: &UploadAccounts, data: Vec<u8>) -> OnboardResult<Instruction> {
    build(program_id, &UPLOAD_ACCOUNTS, accounts, data)
}

fn build(
    program_id: &Pubkey,
    schema: &[AccountSlot],
    resolver: &impl AccountResolver,
    data: Vec<u8>,
) -> OnboardResult<Instruction> {
    let accounts = account_metas(schema, resolver)?;
    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::INIT_ACCOUNT_COUNT;
    use crate::pda::{derive_registry_config, derive_storage, ExternalIds};
    use assert_matches::assert_matches;

    fn fixture() -> (Pubkey, ExternalIds, DerivedAddressSet) {
        let program = Pubkey::new_from_array([9; 32]);
        let ext = ExternalIds {
            registry_program: Pubkey::new_from_array([1; 32]),
            team: Pubkey::new_from_array([2; 32]),
        };
        let set = DerivedAddressSet::resolve(&program, &ext, 0).unwrap();
        (program, ext, set)
    }

    #[test]
    fn init_accounts_follow_reference_order() {
        let (program, ext, set) = fixture();
        let payer = Pubkey::new_from_array([4; 32]);
        let validator = Pubkey::new_from_array([5; 32]);
        let accounts = InitAccounts { payer, validator, set: &set };

        let ix = build_init(&program, &accounts, vec![0]).unwrap();
        let keys: Vec<Pubkey> = ix.accounts.iter().map(|m| m.pubkey).collect();
        let expected = vec![
            payer,
            set.config.address,
            set.general.address,
            set.uris.address,
            sysvar::rent::id(),
            validator,
            set.collection_holder.address,
            set.collection_mint.address,
            set.mint_authority.address,
            set.associated_holder_token.address,
            set.collection_metadata.address,
            set.collection_edition.address,
            TOKEN_PROGRAM_ID,
            system_program::id(),
            set.registry_config.address,
            program,
            ext.team,
            set.storage.address,
            system_program::id(),
            TOKEN_PROGRAM_ID,
            ASSOCIATED_TOKEN_PROGRAM_ID,
            METAPLEX_PROGRAM_ID,
            ext.registry_program,
        ];
        assert_eq!(keys.len(), INIT_ACCOUNT_COUNT);
        assert_eq!(keys, expected);
        assert_eq!(ix.program_id, program);

        assert!(ix.accounts[0].is_signer && ix.accounts[0].is_writable);
        assert!(!ix.accounts[5].is_writable, "validator is read-only");
        assert!(ix.accounts[16].is_writable, "team is writable");
    }

    #[test]
    fn permuted_accounts_are_a_different_instruction() {
        let (program, _ext, set) = fixture();
        let accounts = InitAccounts {
            payer: Pubkey::new_from_array([4; 32]),
            validator: Pubkey::new_from_array([5; 32]),
            set: &set,
        };
        let ix = build_init(&program, &accounts, vec![0]).unwrap();
        let mut swapped = ix.clone();
        swapped.accounts.swap(1, 2);
        assert_ne!(ix, swapped);
    }

    #[test]
    fn registry_program_account_comes_from_the_address_set() {
        let (program, _, _) = fixture();
        let other = ExternalIds {
            registry_program: Pubkey::new_from_array([7; 32]),
            team: Pubkey::new_from_array([2; 32]),
        };
        let set = DerivedAddressSet::resolve(&program, &other, 0).unwrap();
        let accounts = InitAccounts {
            payer: Pubkey::new_from_array([4; 32]),
            validator: Pubkey::new_from_array([5; 32]),
            set: &set,
        };
        let ix = build_init(&program, &accounts, vec![0]).unwrap();
        assert_eq!(ix.accounts[22].pubkey, other.registry_program);
        assert_eq!(ix.accounts[14].pubkey, derive_registry_config(&other.registry_program).unwrap().address);
        assert_eq!(ix.accounts[17].pubkey, derive_storage(&other.registry_program, 0).unwrap().address);
    }

    #[test]
    fn upload_accounts() {
        let (program, _, set) = fixture();
        let payer = Pubkey::new_from_array([4; 32]);
        let ix = build_upload(&program, &UploadAccounts::from_set(payer, &set), vec![1]).unwrap();
        let keys: Vec<Pubkey> = ix.accounts.iter().map(|m| m.pubkey).collect();
        assert_eq!(keys, vec![payer, set.config.address, set.uris.address]);
    }

    #[test]
    fn unresolvable_role_is_a_mismatch() {
        let (program, _, set) = fixture();
        let upload = UploadAccounts::from_set(Pubkey::new_from_array([4; 32]), &set);
        let err = build(&program, &INIT_ACCOUNTS, &upload, vec![]).unwrap_err();
        assert_matches!(err, OnboardError::AccountListMismatch { expected: 23, actual: 3 });
    }
}
