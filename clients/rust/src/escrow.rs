use {
    crate::{
        error::TokenWrapClientError, pdas::WrappedMintAddresses, resolver::AccountResolver,
        rpc::TokenWrapRpc,
    },
    log::debug,
    solana_instruction::Instruction,
    solana_pubkey::Pubkey,
    spl_associated_token_account_client::instruction::create_associated_token_account,
};

/// Escrow account of a wrapped mint and how to create it
#[derive(Clone, Debug, PartialEq)]
pub struct EscrowPlan {
    pub escrow: Pubkey,
    /// Wrapped mint authority, owner of the escrow
    pub escrow_owner: Pubkey,
    pub unwrapped_token_program: Pubkey,
    /// `None` when the escrow already exists
    pub instruction: Option<Instruction>,
}

/// Plans creation of the escrow that holds unwrapped tokens for
/// `unwrapped_mint`.
///
/// When the escrow already exists nothing is emitted if `idempotent`,
/// otherwise the call fails with `EscrowAlreadyExists`.
pub async fn create_escrow_account_instructions<R: TokenWrapRpc + ?Sized>(
    rpc: &R,
    payer: &Pubkey,
    unwrapped_mint: &Pubkey,
    wrapped_token_program: &Pubkey,
    idempotent: bool,
    program_id: &Pubkey,
) -> Result<EscrowPlan, TokenWrapClientError> {
    let addresses = WrappedMintAddresses::derive(unwrapped_mint, wrapped_token_program, program_id)?;
    let unwrapped_token_program = AccountResolver::new(rpc)
        .resolve_mint_program(unwrapped_mint)
        .await?;
    let escrow = addresses.escrow(unwrapped_mint, &unwrapped_token_program);

    let instruction = match rpc.get_account(&escrow).await? {
        Some(_) if idempotent => {
            debug!("Escrow {escrow} already exists, skipping creation");
            None
        }
        Some(_) => return Err(TokenWrapClientError::EscrowAlreadyExists(escrow)),
        None => Some(create_associated_token_account(
            payer,
            &addresses.wrapped_mint_authority,
            unwrapped_mint,
            &unwrapped_token_program,
        )),
    };

    Ok(EscrowPlan {
        escrow,
        escrow_owner: addresses.wrapped_mint_authority,
        unwrapped_token_program,
        instruction,
    })
}
