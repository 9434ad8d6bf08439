use {
    crate::{error::TokenWrapClientError, rpc::TokenWrapRpc},
    log::debug,
    solana_instruction::Instruction,
    solana_pubkey::Pubkey,
    solana_system_interface::instruction::create_account,
    spl_token::solana_program::program_pack::Pack,
    spl_token_2022::instruction::initialize_account3,
};

/// Instructions creating `account` as a token account of `mint` owned by
/// `owner`, which may be a multisig or any other address.
///
/// `account` is a fresh keypair that must sign the transaction alongside the
/// payer.
pub async fn create_token_account_instructions<R: TokenWrapRpc + ?Sized>(
    rpc: &R,
    payer: &Pubkey,
    account: &Pubkey,
    mint: &Pubkey,
    owner: &Pubkey,
    token_program: &Pubkey,
) -> Result<Vec<Instruction>, TokenWrapClientError> {
    let space = spl_token::state::Account::LEN;
    let lamports = rpc.get_minimum_balance_for_rent_exemption(space).await?;
    let initialize = initialize_account3(token_program, account, mint, owner)?;
    debug!("Creating token account {account} of mint {mint} for {owner}");

    Ok(vec![
        create_account(payer, account, lamports, space as u64, token_program),
        initialize,
    ])
}
