use {
    crate::{
        error::TokenWrapClientError, pdas::WrappedMintAddresses, resolver::AccountResolver,
        rpc::TokenWrapRpc,
    },
    futures::try_join,
    log::{debug, info},
    solana_instruction::Instruction,
    solana_program_error::ProgramError,
    solana_pubkey::Pubkey,
    solana_system_interface::instruction::transfer,
    spl_token::solana_program::program_pack::Pack,
    spl_token_2022::{extension::ExtensionType, state::Mint},
    spl_token_wrap_interface::{instruction::create_mint, state::Backpointer},
};

/// Size the program allocates for a wrapped mint.
///
/// Token-2022 wrapped mints carry the confidential transfer and metadata
/// pointer extensions. Token metadata reallocates on its own and is not
/// counted.
pub fn wrapped_mint_space(wrapped_token_program: &Pubkey) -> Result<usize, ProgramError> {
    if *wrapped_token_program == spl_token_2022::id() {
        ExtensionType::try_calculate_account_len::<Mint>(&[
            ExtensionType::ConfidentialTransferMint,
            ExtensionType::MetadataPointer,
        ])
    } else {
        Ok(spl_token::state::Mint::LEN)
    }
}

/// Instructions creating a wrapped mint, with any rent top-ups it needs
#[derive(Clone, Debug, PartialEq)]
pub struct CreateMintPlan {
    pub unwrapped_mint: Pubkey,
    pub wrapped_token_program: Pubkey,
    pub addresses: WrappedMintAddresses,
    /// Lamports sent to the wrapped mint account, zero if already funded
    pub funded_wrapped_mint_lamports: u64,
    /// Lamports sent to the backpointer account, zero if already funded
    pub funded_backpointer_lamports: u64,
    /// Transfers first, then `CreateMint`
    pub instructions: Vec<Instruction>,
}

impl CreateMintPlan {
    /// Queries current balances and rent minimums, funding only the
    /// shortfall of each account from `payer`.
    ///
    /// Fails with `AccountNotFound` if the unwrapped mint does not exist.
    pub async fn build<R: TokenWrapRpc + ?Sized>(
        rpc: &R,
        payer: &Pubkey,
        unwrapped_mint: &Pubkey,
        wrapped_token_program: &Pubkey,
        idempotent: bool,
        program_id: &Pubkey,
    ) -> Result<Self, TokenWrapClientError> {
        let addresses = WrappedMintAddresses::derive(unwrapped_mint, wrapped_token_program, program_id)?;
        let mint_space = wrapped_mint_space(wrapped_token_program)?;
        let resolver = AccountResolver::new(rpc);

        let (_, wrapped_mint_account, backpointer_account, mint_rent, backpointer_rent) = try_join!(
            resolver.resolve_mint_program(unwrapped_mint),
            rpc.get_account(&addresses.wrapped_mint),
            rpc.get_account(&addresses.wrapped_backpointer),
            rpc.get_minimum_balance_for_rent_exemption(mint_space),
            rpc.get_minimum_balance_for_rent_exemption(Backpointer::LEN),
        )?;

        let wrapped_mint_lamports = wrapped_mint_account.map_or(0, |a| a.lamports);
        let backpointer_lamports = backpointer_account.map_or(0, |a| a.lamports);
        let funded_wrapped_mint_lamports = mint_rent.saturating_sub(wrapped_mint_lamports);
        let funded_backpointer_lamports = backpointer_rent.saturating_sub(backpointer_lamports);

        let mut instructions = vec![];
        if funded_wrapped_mint_lamports > 0 {
            debug!(
                "Funding wrapped mint {} with {funded_wrapped_mint_lamports} lamports",
                addresses.wrapped_mint
            );
            instructions.push(transfer(
                payer,
                &addresses.wrapped_mint,
                funded_wrapped_mint_lamports,
            ));
        }
        if funded_backpointer_lamports > 0 {
            debug!(
                "Funding backpointer {} with {funded_backpointer_lamports} lamports",
                addresses.wrapped_backpointer
            );
            instructions.push(transfer(
                payer,
                &addresses.wrapped_backpointer,
                funded_backpointer_lamports,
            ));
        }
        instructions.push(create_mint(
            program_id,
            &addresses.wrapped_mint,
            &addresses.wrapped_backpointer,
            unwrapped_mint,
            wrapped_token_program,
            idempotent,
        ));

        info!(
            "Planned wrapped mint {} for {unwrapped_mint} with {} instruction(s)",
            addresses.wrapped_mint,
            instructions.len()
        );

        Ok(Self {
            unwrapped_mint: *unwrapped_mint,
            wrapped_token_program: *wrapped_token_program,
            addresses,
            funded_wrapped_mint_lamports,
            funded_backpointer_lamports,
            instructions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_mint_space() {
        assert_eq!(wrapped_mint_space(&spl_token::id()).unwrap(), 82);
        assert!(wrapped_mint_space(&spl_token_2022::id()).unwrap() > 82);
    }
}
