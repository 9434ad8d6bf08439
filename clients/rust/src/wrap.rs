use {
    crate::{
        error::TokenWrapClientError,
        pdas::WrappedMintAddresses,
        resolver::{reconcile, AccountResolver},
        rpc::TokenWrapRpc,
        signer::{TokenWrapSigner, TransferAuthority},
    },
    log::debug,
    solana_instruction::Instruction,
    solana_pubkey::Pubkey,
    spl_associated_token_account_client::address::get_associated_token_address_with_program_id,
    spl_token_wrap_interface::instruction::wrap,
};

/// Caller input for a wrap. `None` fields are derived or queried.
#[derive(Clone, Debug)]
pub struct WrapArgs {
    pub program_id: Pubkey,
    /// Token account holding the tokens to wrap
    pub unwrapped_token_account: Pubkey,
    /// Token program the wrapped mint belongs to
    pub wrapped_token_program: Pubkey,
    pub amount: u64,
    /// Defaults to the fee payer
    pub transfer_authority: Option<TransferAuthority>,
    /// Queried from `unwrapped_token_account` if not given
    pub unwrapped_mint: Option<Pubkey>,
    /// Owner of `unwrapped_token_account`, queried if not given
    pub unwrapped_token_program: Option<Pubkey>,
    /// Defaults to the fee payer's associated token account for the wrapped
    /// mint
    pub recipient_wrapped_token_account: Option<Pubkey>,
    /// Defaults to the wrapped mint authority's associated token account
    pub unwrapped_escrow: Option<Pubkey>,
}

impl WrapArgs {
    pub fn new(unwrapped_token_account: Pubkey, wrapped_token_program: Pubkey, amount: u64) -> Self {
        Self {
            program_id: spl_token_wrap_interface::id(),
            unwrapped_token_account,
            wrapped_token_program,
            amount,
            transfer_authority: None,
            unwrapped_mint: None,
            unwrapped_token_program: None,
            recipient_wrapped_token_account: None,
            unwrapped_escrow: None,
        }
    }

    /// Fills in missing fields from chain state, checking the supplied ones
    /// against it
    pub async fn resolve<R: TokenWrapRpc + ?Sized>(
        self,
        rpc: &R,
        fee_payer: &TokenWrapSigner,
    ) -> Result<ResolvedWrap, TokenWrapClientError> {
        let token_account = AccountResolver::new(rpc)
            .fetch_token_account(&self.unwrapped_token_account)
            .await?;
        let unwrapped_mint = reconcile("unwrapped mint", self.unwrapped_mint, token_account.mint)?;
        let unwrapped_token_program = reconcile(
            "unwrapped token program",
            self.unwrapped_token_program,
            token_account.token_program,
        )?;
        self.finish(unwrapped_mint, unwrapped_token_program, fee_payer)
    }

    /// Resolves without chain access. The unwrapped mint and its token
    /// program must be supplied.
    pub fn resolve_offline(
        self,
        fee_payer: &TokenWrapSigner,
    ) -> Result<ResolvedWrap, TokenWrapClientError> {
        let unwrapped_mint = self
            .unwrapped_mint
            .ok_or(TokenWrapClientError::MissingOfflineArgument("unwrapped mint"))?;
        let unwrapped_token_program = self
            .unwrapped_token_program
            .ok_or(TokenWrapClientError::MissingOfflineArgument(
                "unwrapped token program",
            ))?;
        self.finish(unwrapped_mint, unwrapped_token_program, fee_payer)
    }

    fn finish(
        self,
        unwrapped_mint: Pubkey,
        unwrapped_token_program: Pubkey,
        fee_payer: &TokenWrapSigner,
    ) -> Result<ResolvedWrap, TokenWrapClientError> {
        let addresses =
            WrappedMintAddresses::derive(&unwrapped_mint, &self.wrapped_token_program, &self.program_id)?;
        let recipient_wrapped_token_account = self.recipient_wrapped_token_account.unwrap_or_else(|| {
            get_associated_token_address_with_program_id(
                &fee_payer.pubkey(),
                &addresses.wrapped_mint,
                &self.wrapped_token_program,
            )
        });
        let unwrapped_escrow = self
            .unwrapped_escrow
            .unwrap_or_else(|| addresses.escrow(&unwrapped_mint, &unwrapped_token_program));
        let transfer_authority = self
            .transfer_authority
            .unwrap_or_else(|| TransferAuthority::single(fee_payer.clone()));

        let resolved = ResolvedWrap {
            program_id: self.program_id,
            recipient_wrapped_token_account,
            wrapped_mint: addresses.wrapped_mint,
            wrapped_mint_authority: addresses.wrapped_mint_authority,
            unwrapped_token_program,
            wrapped_token_program: self.wrapped_token_program,
            unwrapped_token_account: self.unwrapped_token_account,
            unwrapped_mint,
            unwrapped_escrow,
            transfer_authority,
            amount: self.amount,
        };
        debug!("Resolved wrap: {resolved:?}");
        Ok(resolved)
    }
}

/// Every account of a wrap instruction
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedWrap {
    pub program_id: Pubkey,
    pub recipient_wrapped_token_account: Pubkey,
    pub wrapped_mint: Pubkey,
    pub wrapped_mint_authority: Pubkey,
    pub unwrapped_token_program: Pubkey,
    pub wrapped_token_program: Pubkey,
    pub unwrapped_token_account: Pubkey,
    pub unwrapped_mint: Pubkey,
    pub unwrapped_escrow: Pubkey,
    pub transfer_authority: TransferAuthority,
    pub amount: u64,
}

impl ResolvedWrap {
    pub fn instruction(&self) -> Instruction {
        let multisig_pubkeys = self.transfer_authority.multisig_pubkeys();
        wrap(
            &self.program_id,
            &self.recipient_wrapped_token_account,
            &self.wrapped_mint,
            &self.wrapped_mint_authority,
            &self.unwrapped_token_program,
            &self.wrapped_token_program,
            &self.unwrapped_token_account,
            &self.unwrapped_mint,
            &self.unwrapped_escrow,
            &self.transfer_authority.pubkey(),
            &multisig_pubkeys.iter().collect::<Vec<_>>(),
            self.amount,
        )
    }

    /// Signers the instruction needs besides the fee payer
    pub fn signers(&self) -> Vec<TokenWrapSigner> {
        self.transfer_authority.signers()
    }
}
