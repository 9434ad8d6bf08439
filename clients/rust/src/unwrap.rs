use {
    crate::{
        error::TokenWrapClientError,
        pdas::WrappedMintAddresses,
        resolver::{reconcile, AccountResolver},
        rpc::TokenWrapRpc,
        signer::{TokenWrapSigner, TransferAuthority},
    },
    futures::try_join,
    log::debug,
    solana_instruction::Instruction,
    solana_pubkey::Pubkey,
    spl_token_wrap_interface::instruction::unwrap,
};

/// Caller input for an unwrap. `None` fields are derived or queried.
#[derive(Clone, Debug)]
pub struct UnwrapArgs {
    pub program_id: Pubkey,
    /// Token account holding the wrapped tokens to burn
    pub wrapped_token_account: Pubkey,
    /// Token account receiving the unwrapped tokens
    pub recipient_unwrapped_token_account: Pubkey,
    pub amount: u64,
    /// Defaults to the fee payer
    pub transfer_authority: Option<TransferAuthority>,
    /// Mint of the recipient account, queried if not given
    pub unwrapped_mint: Option<Pubkey>,
    /// Owner of the wrapped token account, queried if not given
    pub wrapped_token_program: Option<Pubkey>,
    /// Owner of the recipient account, queried if not given
    pub unwrapped_token_program: Option<Pubkey>,
    /// Defaults to the wrapped mint authority's associated token account
    pub unwrapped_escrow: Option<Pubkey>,
}

impl UnwrapArgs {
    pub fn new(
        wrapped_token_account: Pubkey,
        recipient_unwrapped_token_account: Pubkey,
        amount: u64,
    ) -> Self {
        Self {
            program_id: spl_token_wrap_interface::id(),
            wrapped_token_account,
            recipient_unwrapped_token_account,
            amount,
            transfer_authority: None,
            unwrapped_mint: None,
            wrapped_token_program: None,
            unwrapped_token_program: None,
            unwrapped_escrow: None,
        }
    }

    /// Fills in missing fields from chain state.
    ///
    /// Both token accounts are fetched concurrently. Supplied values are
    /// checked against what they hold, and the wrapped account's mint must
    /// be the wrapped mint derived for the recipient's mint.
    pub async fn resolve<R: TokenWrapRpc + ?Sized>(
        self,
        rpc: &R,
        fee_payer: &TokenWrapSigner,
    ) -> Result<ResolvedUnwrap, TokenWrapClientError> {
        let resolver = AccountResolver::new(rpc);
        let (wrapped_account, recipient_account) = try_join!(
            resolver.fetch_token_account(&self.wrapped_token_account),
            resolver.fetch_token_account(&self.recipient_unwrapped_token_account),
        )?;

        let wrapped_token_program = reconcile(
            "wrapped token program",
            self.wrapped_token_program,
            wrapped_account.token_program,
        )?;
        let unwrapped_mint = reconcile("unwrapped mint", self.unwrapped_mint, recipient_account.mint)?;
        let unwrapped_token_program = reconcile(
            "unwrapped token program",
            self.unwrapped_token_program,
            recipient_account.token_program,
        )?;

        let resolved = self.finish(
            unwrapped_mint,
            wrapped_token_program,
            unwrapped_token_program,
            fee_payer,
        )?;
        if wrapped_account.mint != resolved.wrapped_mint {
            return Err(TokenWrapClientError::ResolutionMismatch {
                what: "wrapped mint",
                provided: wrapped_account.mint,
                actual: resolved.wrapped_mint,
            });
        }
        Ok(resolved)
    }

    /// Resolves without chain access. The unwrapped mint and both token
    /// programs must be supplied.
    pub fn resolve_offline(
        self,
        fee_payer: &TokenWrapSigner,
    ) -> Result<ResolvedUnwrap, TokenWrapClientError> {
        let unwrapped_mint = self
            .unwrapped_mint
            .ok_or(TokenWrapClientError::MissingOfflineArgument("unwrapped mint"))?;
        let wrapped_token_program = self
            .wrapped_token_program
            .ok_or(TokenWrapClientError::MissingOfflineArgument(
                "wrapped token program",
            ))?;
        let unwrapped_token_program = self
            .unwrapped_token_program
            .ok_or(TokenWrapClientError::MissingOfflineArgument(
                "unwrapped token program",
            ))?;
        self.finish(
            unwrapped_mint,
            wrapped_token_program,
            unwrapped_token_program,
            fee_payer,
        )
    }

    fn finish(
        self,
        unwrapped_mint: Pubkey,
        wrapped_token_program: Pubkey,
        unwrapped_token_program: Pubkey,
        fee_payer: &TokenWrapSigner,
    ) -> Result<ResolvedUnwrap, TokenWrapClientError> {
        let addresses =
            WrappedMintAddresses::derive(&unwrapped_mint, &wrapped_token_program, &self.program_id)?;
        let unwrapped_escrow = self
            .unwrapped_escrow
            .unwrap_or_else(|| addresses.escrow(&unwrapped_mint, &unwrapped_token_program));
        let transfer_authority = self
            .transfer_authority
            .unwrap_or_else(|| TransferAuthority::single(fee_payer.clone()));

        let resolved = ResolvedUnwrap {
            program_id: self.program_id,
            unwrapped_escrow,
            recipient_unwrapped_token_account: self.recipient_unwrapped_token_account,
            wrapped_mint_authority: addresses.wrapped_mint_authority,
            unwrapped_mint,
            wrapped_token_program,
            unwrapped_token_program,
            wrapped_token_account: self.wrapped_token_account,
            wrapped_mint: addresses.wrapped_mint,
            transfer_authority,
            amount: self.amount,
        };
        debug!("Resolved unwrap: {resolved:?}");
        Ok(resolved)
    }
}

/// Every account of an unwrap instruction
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedUnwrap {
    pub program_id: Pubkey,
    pub unwrapped_escrow: Pubkey,
    pub recipient_unwrapped_token_account: Pubkey,
    pub wrapped_mint_authority: Pubkey,
    pub unwrapped_mint: Pubkey,
    pub wrapped_token_program: Pubkey,
    pub unwrapped_token_program: Pubkey,
    pub wrapped_token_account: Pubkey,
    pub wrapped_mint: Pubkey,
    pub transfer_authority: TransferAuthority,
    pub amount: u64,
}

impl ResolvedUnwrap {
    pub fn instruction(&self) -> Instruction {
        let multisig_pubkeys = self.transfer_authority.multisig_pubkeys();
        unwrap(
            &self.program_id,
            &self.unwrapped_escrow,
            &self.recipient_unwrapped_token_account,
            &self.wrapped_mint_authority,
            &self.unwrapped_mint,
            &self.wrapped_token_program,
            &self.unwrapped_token_program,
            &self.wrapped_token_account,
            &self.wrapped_mint,
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
