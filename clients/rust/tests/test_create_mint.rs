use {
    crate::helpers::{account, rent, MockRpc},
    solana_pubkey::Pubkey,
    spl_token_wrap_client::{
        create_escrow_account_instructions,
        create_mint::wrapped_mint_space,
        create_token_account_instructions,
        interface::{
            get_escrow_address, get_wrapped_mint_address, get_wrapped_mint_backpointer_address,
            instruction::TokenWrapInstruction, state::Backpointer,
        },
        CreateMintPlan, TokenWrapClientError,
    },
};

mod helpers;

async fn build_plan(
    rpc: &MockRpc,
    unwrapped_mint: &Pubkey,
    wrapped_token_program: &Pubkey,
    idempotent: bool,
) -> CreateMintPlan {
    CreateMintPlan::build(
        rpc,
        &Pubkey::new_unique(),
        unwrapped_mint,
        wrapped_token_program,
        idempotent,
        &spl_token_wrap_client::interface::id(),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_unfunded_accounts_are_topped_up() {
    let rpc = MockRpc::default();
    let unwrapped_mint = rpc.add_mint(&spl_token::id());

    for wrapped_token_program in [spl_token::id(), spl_token_2022::id()] {
        let plan = build_plan(&rpc, &unwrapped_mint, &wrapped_token_program, false).await;
        let mint_space = wrapped_mint_space(&wrapped_token_program).unwrap();
        assert_eq!(plan.funded_wrapped_mint_lamports, rent(mint_space));
        assert_eq!(plan.funded_backpointer_lamports, rent(Backpointer::LEN));
        assert_eq!(plan.instructions.len(), 3);

        let wrapped_mint = get_wrapped_mint_address(&unwrapped_mint, &wrapped_token_program).unwrap();
        assert_eq!(plan.addresses.wrapped_mint, wrapped_mint);
        assert_eq!(
            plan.addresses.wrapped_backpointer,
            get_wrapped_mint_backpointer_address(&wrapped_mint).unwrap()
        );

        let create = plan.instructions.last().unwrap();
        assert_eq!(create.program_id, spl_token_wrap_client::interface::id());
        assert_eq!(
            TokenWrapInstruction::unpack(&create.data).unwrap(),
            TokenWrapInstruction::CreateMint { idempotent: false }
        );
    }
}

#[tokio::test]
async fn test_partial_funding_covers_only_the_shortfall() {
    let rpc = MockRpc::default();
    let unwrapped_mint = rpc.add_mint(&spl_token::id());
    let wrapped_mint = get_wrapped_mint_address(&unwrapped_mint, &spl_token::id()).unwrap();
    let backpointer = get_wrapped_mint_backpointer_address(&wrapped_mint).unwrap();

    let mut underfunded = account(solana_sdk_ids::system_program::id(), vec![]);
    underfunded.lamports = 1_000;
    rpc.set_account(wrapped_mint, underfunded);
    rpc.set_account(
        backpointer,
        account(solana_sdk_ids::system_program::id(), vec![0; Backpointer::LEN]),
    );

    let plan = build_plan(&rpc, &unwrapped_mint, &spl_token::id(), true).await;
    assert_eq!(
        plan.funded_wrapped_mint_lamports,
        rent(wrapped_mint_space(&spl_token::id()).unwrap()) - 1_000
    );
    assert_eq!(plan.funded_backpointer_lamports, 0);
    assert_eq!(plan.instructions.len(), 2);
    assert_eq!(plan.instructions[0].accounts[1].pubkey, wrapped_mint);
    assert_eq!(plan.instructions[1].data, vec![0, 1]);
}

#[tokio::test]
async fn test_idempotent_rebuild_of_existing_mint() {
    let rpc = MockRpc::default();
    let unwrapped_mint = rpc.add_mint(&spl_token::id());

    for wrapped_token_program in [spl_token::id(), spl_token_2022::id()] {
        let wrapped_mint = rpc.add_backpointer(&unwrapped_mint, &wrapped_token_program);
        let mint_space = wrapped_mint_space(&wrapped_token_program).unwrap();
        rpc.set_account(
            wrapped_mint,
            account(wrapped_token_program, vec![0; mint_space]),
        );

        let plan = build_plan(&rpc, &unwrapped_mint, &wrapped_token_program, true).await;
        assert_eq!(plan.funded_wrapped_mint_lamports, 0);
        assert_eq!(plan.funded_backpointer_lamports, 0);
        assert_eq!(plan.instructions.len(), 1);
        assert_eq!(plan.instructions[0].data, vec![0, 1]);
        assert_eq!(plan.instructions[0].accounts[0].pubkey, wrapped_mint);
    }
}

#[tokio::test]
async fn test_missing_unwrapped_mint() {
    let rpc = MockRpc::default();
    let unwrapped_mint = Pubkey::new_unique();
    let err = CreateMintPlan::build(
        &rpc,
        &Pubkey::new_unique(),
        &unwrapped_mint,
        &spl_token_2022::id(),
        false,
        &spl_token_wrap_client::interface::id(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, TokenWrapClientError::AccountNotFound(a) if a == unwrapped_mint));
}

#[tokio::test]
async fn test_escrow_creation() {
    let rpc = MockRpc::default();
    let payer = Pubkey::new_unique();
    let program_id = spl_token_wrap_client::interface::id();
    let unwrapped_mint = rpc.add_mint(&spl_token_2022::id());

    let escrow_plan = create_escrow_account_instructions(
        &rpc,
        &payer,
        &unwrapped_mint,
        &spl_token::id(),
        false,
        &program_id,
    )
    .await
    .unwrap();
    let escrow = get_escrow_address(&unwrapped_mint, &spl_token_2022::id(), &spl_token::id()).unwrap();
    assert_eq!(escrow_plan.escrow, escrow);
    assert_eq!(escrow_plan.unwrapped_token_program, spl_token_2022::id());
    let instruction = escrow_plan.instruction.unwrap();
    assert_eq!(instruction.accounts[0].pubkey, payer);
    assert_eq!(instruction.accounts[1].pubkey, escrow);
    assert_eq!(instruction.accounts[2].pubkey, escrow_plan.escrow_owner);

    // Once it exists
    rpc.set_account(escrow, account(spl_token_2022::id(), vec![0; 165]));

    let skipped = create_escrow_account_instructions(
        &rpc,
        &payer,
        &unwrapped_mint,
        &spl_token::id(),
        true,
        &program_id,
    )
    .await
    .unwrap();
    assert_eq!(skipped.instruction, None);

    let err = create_escrow_account_instructions(
        &rpc,
        &payer,
        &unwrapped_mint,
        &spl_token::id(),
        false,
        &program_id,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, TokenWrapClientError::EscrowAlreadyExists(a) if a == escrow));
}

#[tokio::test]
async fn test_token_account_for_arbitrary_owner() {
    let rpc = MockRpc::default();
    let payer = Pubkey::new_unique();
    let account_address = Pubkey::new_unique();
    let mint = Pubkey::new_unique();
    let multisig = Pubkey::new_unique();

    for token_program in [spl_token::id(), spl_token_2022::id()] {
        let instructions = create_token_account_instructions(
            &rpc,
            &payer,
            &account_address,
            &mint,
            &multisig,
            &token_program,
        )
        .await
        .unwrap();
        assert_eq!(instructions.len(), 2);

        let create = &instructions[0];
        assert_eq!(create.program_id, solana_sdk_ids::system_program::id());
        assert_eq!(create.accounts[0].pubkey, payer);
        assert_eq!(create.accounts[1].pubkey, account_address);
        assert!(create.accounts[1].is_signer);
        // CreateAccount: u32 tag, u64 lamports, u64 space, owner
        assert_eq!(create.data[4..12], rent(165).to_le_bytes());
        assert_eq!(create.data[12..20], 165u64.to_le_bytes());
        assert_eq!(&create.data[20..52], token_program.as_ref());

        let initialize = &instructions[1];
        assert_eq!(initialize.program_id, token_program);
        assert_eq!(initialize.accounts[0].pubkey, account_address);
        assert_eq!(initialize.accounts[1].pubkey, mint);
        // InitializeAccount3 carries the owner inline
        assert_eq!(initialize.data[0], 18);
        assert_eq!(&initialize.data[1..33], multisig.as_ref());
    }

    let err = create_token_account_instructions(
        &rpc,
        &payer,
        &account_address,
        &mint,
        &multisig,
        &Pubkey::new_unique(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, TokenWrapClientError::Program(_)));
}
