use {
    log::debug,
    serde_derive::{Deserialize, Serialize},
    serde_with::{serde_as, DisplayFromStr},
    solana_pubkey::Pubkey,
    spl_associated_token_account_client::address::get_associated_token_address_with_program_id,
    spl_token_wrap_interface::{
        error::AddressDerivationError, get_wrapped_mint_address_for_program,
        get_wrapped_mint_authority_for_program, get_wrapped_mint_backpointer_address_for_program,
    },
};

/// Every protocol address tied to one (unwrapped mint, wrapped token program)
/// pair
#[serde_as]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrappedMintAddresses {
    #[serde_as(as = "DisplayFromStr")]
    pub wrapped_mint: Pubkey,
    #[serde_as(as = "DisplayFromStr")]
    pub wrapped_mint_authority: Pubkey,
    #[serde_as(as = "DisplayFromStr")]
    pub wrapped_backpointer: Pubkey,
}

impl WrappedMintAddresses {
    pub fn derive(
        unwrapped_mint: &Pubkey,
        wrapped_token_program: &Pubkey,
        program_id: &Pubkey,
    ) -> Result<Self, AddressDerivationError> {
        let wrapped_mint =
            get_wrapped_mint_address_for_program(unwrapped_mint, wrapped_token_program, program_id)?;
        let addresses = Self {
            wrapped_mint,
            wrapped_mint_authority: get_wrapped_mint_authority_for_program(
                &wrapped_mint,
                program_id,
            )?,
            wrapped_backpointer: get_wrapped_mint_backpointer_address_for_program(
                &wrapped_mint,
                program_id,
            )?,
        };
        debug!("Derived {addresses:?} for unwrapped mint {unwrapped_mint}");
        Ok(addresses)
    }

    /// Escrow holding unwrapped tokens: the authority's associated token
    /// account for the unwrapped mint
    pub fn escrow(&self, unwrapped_mint: &Pubkey, unwrapped_token_program: &Pubkey) -> Pubkey {
        get_associated_token_address_with_program_id(
            &self.wrapped_mint_authority,
            unwrapped_mint,
            unwrapped_token_program,
        )
    }
}

#[cfg(test)]
mod tests {
    use {super::*, spl_token_wrap_interface::get_escrow_address_for_program};

    #[test]
    fn test_escrow_matches_interface_derivation() {
        let unwrapped_mint = Pubkey::new_unique();
        let program_id = spl_token_wrap_interface::id();
        let addresses =
            WrappedMintAddresses::derive(&unwrapped_mint, &spl_token_2022::id(), &program_id)
                .unwrap();
        assert_eq!(
            addresses.escrow(&unwrapped_mint, &spl_token::id()),
            get_escrow_address_for_program(
                &unwrapped_mint,
                &spl_token::id(),
                &spl_token_2022::id(),
                &program_id
            )
            .unwrap()
        );
    }
}
