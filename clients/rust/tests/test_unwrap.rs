use {
    crate::helpers::{concrete, keypairs, MockRpc},
    solana_pubkey::Pubkey,
    solana_signer::Signer,
    spl_token_wrap_client::{
        interface::{
            get_escrow_address, get_wrapped_mint_address, get_wrapped_mint_authority,
            instruction::TokenWrapInstruction,
        },
        TokenWrapClientError, TokenWrapSigner, UnwrapArgs,
    },
};

mod helpers;

struct Fixture {
    rpc: MockRpc,
    unwrapped_mint: Pubkey,
    wrapped_mint: Pubkey,
    wrapped_token_account: Pubkey,
    recipient: Pubkey,
}

fn fixture(owner: &Pubkey) -> Fixture {
    let rpc = MockRpc::default();
    let unwrapped_mint = rpc.add_mint(&spl_token::id());
    let wrapped_mint = get_wrapped_mint_address(&unwrapped_mint, &spl_token_2022::id()).unwrap();
    let wrapped_token_account =
        rpc.add_token_account(&spl_token_2022::id(), &wrapped_mint, owner, 50);
    let recipient = rpc.add_token_account(&spl_token::id(), &unwrapped_mint, owner, 0);
    Fixture {
        rpc,
        unwrapped_mint,
        wrapped_mint,
        wrapped_token_account,
        recipient,
    }
}

#[tokio::test]
async fn test_unwrap_resolves_from_both_token_accounts() {
    let payer = keypairs(1).remove(0);
    let f = fixture(&payer.pubkey());

    let resolved = UnwrapArgs::new(f.wrapped_token_account, f.recipient, 50)
        .resolve(&f.rpc, &concrete(&payer))
        .await
        .unwrap();

    assert_eq!(resolved.unwrapped_mint, f.unwrapped_mint);
    assert_eq!(resolved.wrapped_mint, f.wrapped_mint);
    assert_eq!(resolved.wrapped_token_program, spl_token_2022::id());
    assert_eq!(resolved.unwrapped_token_program, spl_token::id());
    assert_eq!(
        resolved.wrapped_mint_authority,
        get_wrapped_mint_authority(&f.wrapped_mint).unwrap()
    );
    assert_eq!(
        resolved.unwrapped_escrow,
        get_escrow_address(&f.unwrapped_mint, &spl_token::id(), &spl_token_2022::id()).unwrap()
    );

    let instruction = resolved.instruction();
    assert_eq!(instruction.data[0], 2);
    assert_eq!(
        TokenWrapInstruction::unpack(&instruction.data).unwrap(),
        TokenWrapInstruction::Unwrap { amount: 50 }
    );
    assert_eq!(instruction.accounts[0].pubkey, resolved.unwrapped_escrow);
    assert_eq!(instruction.accounts[6].pubkey, f.wrapped_token_account);
    assert_eq!(instruction.accounts[8].pubkey, payer.pubkey());
    assert!(instruction.accounts[8].is_signer);
}

#[tokio::test]
async fn test_unwrap_rejects_wrong_wrapped_program() {
    let payer = keypairs(1).remove(0);
    let f = fixture(&payer.pubkey());

    let mut args = UnwrapArgs::new(f.wrapped_token_account, f.recipient, 1);
    args.wrapped_token_program = Some(spl_token::id());
    let err = args.resolve(&f.rpc, &concrete(&payer)).await.unwrap_err();
    assert!(matches!(
        err,
        TokenWrapClientError::ResolutionMismatch { what: "wrapped token program", provided, actual }
            if provided == spl_token::id() && actual == spl_token_2022::id()
    ));
}

#[tokio::test]
async fn test_unwrap_rejects_token_account_of_unrelated_mint() {
    let payer = keypairs(1).remove(0);
    let f = fixture(&payer.pubkey());
    let unrelated = f.rpc.add_token_account(
        &spl_token_2022::id(),
        &Pubkey::new_unique(),
        &payer.pubkey(),
        10,
    );

    let err = UnwrapArgs::new(unrelated, f.recipient, 1)
        .resolve(&f.rpc, &concrete(&payer))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TokenWrapClientError::ResolutionMismatch { what: "wrapped mint", actual, .. }
            if actual == f.wrapped_mint
    ));
}

#[tokio::test]
async fn test_unwrap_missing_recipient() {
    let payer = keypairs(1).remove(0);
    let f = fixture(&payer.pubkey());
    let missing = Pubkey::new_unique();

    let err = UnwrapArgs::new(f.wrapped_token_account, missing, 1)
        .resolve(&f.rpc, &concrete(&payer))
        .await
        .unwrap_err();
    assert!(matches!(err, TokenWrapClientError::AccountNotFound(a) if a == missing));
}

#[test]
fn test_unwrap_offline() {
    let payer = TokenWrapSigner::Placeholder(Pubkey::new_unique());
    let unwrapped_mint = Pubkey::new_unique();
    let mut args = UnwrapArgs::new(Pubkey::new_unique(), Pubkey::new_unique(), 5);

    let err = args.clone().resolve_offline(&payer).unwrap_err();
    assert!(matches!(
        err,
        TokenWrapClientError::MissingOfflineArgument("unwrapped mint")
    ));

    args.unwrapped_mint = Some(unwrapped_mint);
    args.wrapped_token_program = Some(spl_token_2022::id());
    args.unwrapped_token_program = Some(spl_token::id());
    let resolved = args.resolve_offline(&payer).unwrap();
    assert_eq!(
        resolved.wrapped_mint,
        get_wrapped_mint_address(&unwrapped_mint, &spl_token_2022::id()).unwrap()
    );
    assert_eq!(resolved.signers(), vec![payer]);
}
