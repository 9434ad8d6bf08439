//! Token Wrap program interface
#![deny(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod instruction;
pub mod state;

use {
    crate::error::AddressDerivationError,
    solana_pubkey::{Pubkey, MAX_SEEDS, MAX_SEED_LEN},
    spl_associated_token_account_client::address::get_associated_token_address_with_program_id,
};

solana_pubkey::declare_id!("TwRapQCDhWkZRrDaHfZGuHxkZ91gHDRkyuzNqeU5MgR");

/// Seed prefix of the wrapped mint PDA
pub const WRAPPED_MINT_SEED: &[u8] = br"mint";

/// Seed prefix of the wrapped mint authority PDA
pub const WRAPPED_MINT_AUTHORITY_SEED: &[u8] = br"authority";

/// Seed prefix of the wrapped mint backpointer PDA
pub const WRAPPED_MINT_BACKPOINTER_SEED: &[u8] = br"backpointer";

/// Finds a program derived address and its bump seed.
///
/// The seed list is checked against the runtime limits before searching, one
/// seed slot being reserved for the bump itself.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), AddressDerivationError> {
    if seeds.len() >= MAX_SEEDS {
        return Err(AddressDerivationError::TooManySeeds {
            count: seeds.len(),
            max: MAX_SEEDS - 1,
        });
    }
    if let Some(seed) = seeds.iter().find(|seed| seed.len() > MAX_SEED_LEN) {
        return Err(AddressDerivationError::MaxSeedLengthExceeded {
            len: seed.len(),
            max: MAX_SEED_LEN,
        });
    }
    Pubkey::try_find_program_address(seeds, program_id)
        .ok_or(AddressDerivationError::NoViableBump)
}

/// Seeds of the wrapped mint PDA, without the bump
pub fn get_wrapped_mint_seeds<'a>(
    unwrapped_mint: &'a Pubkey,
    wrapped_token_program_id: &'a Pubkey,
) -> [&'a [u8]; 3] {
    [
        WRAPPED_MINT_SEED,
        unwrapped_mint.as_ref(),
        wrapped_token_program_id.as_ref(),
    ]
}

/// Derive the wrapped mint address and bump seed for a specific Token Wrap
/// program deployment
pub fn get_wrapped_mint_address_with_seed_for_program(
    unwrapped_mint: &Pubkey,
    wrapped_token_program_id: &Pubkey,
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), AddressDerivationError> {
    find_program_address(
        &get_wrapped_mint_seeds(unwrapped_mint, wrapped_token_program_id),
        program_id,
    )
}

/// Derive the wrapped mint address associated with an unwrapped mint
pub fn get_wrapped_mint_address(
    unwrapped_mint: &Pubkey,
    wrapped_token_program_id: &Pubkey,
) -> Result<Pubkey, AddressDerivationError> {
    get_wrapped_mint_address_for_program(unwrapped_mint, wrapped_token_program_id, &id())
}

/// Derive the wrapped mint address associated with an unwrapped mint
/// for a specific Token Wrap program deployment.
pub fn get_wrapped_mint_address_for_program(
    unwrapped_mint: &Pubkey,
    wrapped_token_program_id: &Pubkey,
    program_id: &Pubkey,
) -> Result<Pubkey, AddressDerivationError> {
    get_wrapped_mint_address_with_seed_for_program(
        unwrapped_mint,
        wrapped_token_program_id,
        program_id,
    )
    .map(|(address, _)| address)
}

/// Seeds of the wrapped mint authority PDA, without the bump
pub fn get_wrapped_mint_authority_seeds(wrapped_mint: &Pubkey) -> [&[u8]; 2] {
    [WRAPPED_MINT_AUTHORITY_SEED, wrapped_mint.as_ref()]
}

/// Derive the wrapped mint authority address and bump seed for a specific
/// Token Wrap program deployment
pub fn get_wrapped_mint_authority_with_seed_for_program(
    wrapped_mint: &Pubkey,
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), AddressDerivationError> {
    find_program_address(&get_wrapped_mint_authority_seeds(wrapped_mint), program_id)
}

/// Derive the wrapped mint authority address
pub fn get_wrapped_mint_authority(wrapped_mint: &Pubkey) -> Result<Pubkey, AddressDerivationError> {
    get_wrapped_mint_authority_for_program(wrapped_mint, &id())
}

/// Derive the wrapped mint authority address for a specific Token Wrap
/// program deployment
pub fn get_wrapped_mint_authority_for_program(
    wrapped_mint: &Pubkey,
    program_id: &Pubkey,
) -> Result<Pubkey, AddressDerivationError> {
    get_wrapped_mint_authority_with_seed_for_program(wrapped_mint, program_id)
        .map(|(address, _)| address)
}

/// Seeds of the wrapped mint backpointer PDA, without the bump
pub fn get_wrapped_mint_backpointer_address_seeds(wrapped_mint: &Pubkey) -> [&[u8]; 2] {
    [WRAPPED_MINT_BACKPOINTER_SEED, wrapped_mint.as_ref()]
}

/// Derive the wrapped mint backpointer address and bump seed for a specific
/// Token Wrap program deployment
pub fn get_wrapped_mint_backpointer_address_with_seed_for_program(
    wrapped_mint: &Pubkey,
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), AddressDerivationError> {
    find_program_address(
        &get_wrapped_mint_backpointer_address_seeds(wrapped_mint),
        program_id,
    )
}

/// Derive the wrapped mint backpointer address
pub fn get_wrapped_mint_backpointer_address(
    wrapped_mint: &Pubkey,
) -> Result<Pubkey, AddressDerivationError> {
    get_wrapped_mint_backpointer_address_for_program(wrapped_mint, &id())
}

/// Derive the wrapped mint backpointer address for a specific Token Wrap
/// program deployment.
pub fn get_wrapped_mint_backpointer_address_for_program(
    wrapped_mint: &Pubkey,
    program_id: &Pubkey,
) -> Result<Pubkey, AddressDerivationError> {
    get_wrapped_mint_backpointer_address_with_seed_for_program(wrapped_mint, program_id)
        .map(|(address, _)| address)
}

/// Derive the escrow `ATA` that backs a given wrapped mint.
pub fn get_escrow_address(
    unwrapped_mint: &Pubkey,
    unwrapped_token_program_id: &Pubkey,
    wrapped_token_program_id: &Pubkey,
) -> Result<Pubkey, AddressDerivationError> {
    get_escrow_address_for_program(
        unwrapped_mint,
        unwrapped_token_program_id,
        wrapped_token_program_id,
        &id(),
    )
}

/// Derive the escrow `ATA` for a specific Token Wrap program deployment.
pub fn get_escrow_address_for_program(
    unwrapped_mint: &Pubkey,
    unwrapped_token_program_id: &Pubkey,
    wrapped_token_program_id: &Pubkey,
    program_id: &Pubkey,
) -> Result<Pubkey, AddressDerivationError> {
    let wrapped_mint =
        get_wrapped_mint_address_for_program(unwrapped_mint, wrapped_token_program_id, program_id)?;
    let mint_authority = get_wrapped_mint_authority_for_program(&wrapped_mint, program_id)?;

    Ok(get_associated_token_address_with_program_id(
        &mint_authority,
        unwrapped_mint,
        unwrapped_token_program_id,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_limits() {
        let long_seed = [7u8; MAX_SEED_LEN + 1];
        assert_eq!(
            find_program_address(&[WRAPPED_MINT_SEED, &long_seed], &id()),
            Err(AddressDerivationError::MaxSeedLengthExceeded {
                len: MAX_SEED_LEN + 1,
                max: MAX_SEED_LEN,
            })
        );

        let seed = [1u8; 4];
        let too_many: Vec<&[u8]> = (0..MAX_SEEDS).map(|_| &seed[..]).collect();
        assert_eq!(
            find_program_address(&too_many, &id()),
            Err(AddressDerivationError::TooManySeeds {
                count: MAX_SEEDS,
                max: MAX_SEEDS - 1,
            })
        );

        let just_enough: Vec<&[u8]> = (0..MAX_SEEDS - 1).map(|_| &seed[..]).collect();
        assert!(find_program_address(&just_enough, &id()).is_ok());
    }

    #[test]
    fn test_derivation_matches_runtime() {
        let unwrapped_mint = Pubkey::new_unique();
        let token_program = Pubkey::new_unique();
        let (address, bump) =
            get_wrapped_mint_address_with_seed_for_program(&unwrapped_mint, &token_program, &id())
                .unwrap();
        let expected = Pubkey::find_program_address(
            &[WRAPPED_MINT_SEED, unwrapped_mint.as_ref(), token_program.as_ref()],
            &id(),
        );
        assert_eq!((address, bump), expected);
    }
}
