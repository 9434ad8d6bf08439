use {
    crate::helpers::{concrete, keypairs, MockRpc},
    solana_hash::Hash,
    solana_pubkey::Pubkey,
    solana_signer::Signer,
    spl_token_wrap_client::{
        interface::instruction::create_mint, MessageVersion, PartiallySignedTransaction,
        RecencyAnchor, TokenWrapClientError, TokenWrapRpc, TokenWrapSigner, TransactionTemplate,
        UnwrapArgs,
    },
};

mod helpers;

fn unwrap_template(payer: TokenWrapSigner, anchor: RecencyAnchor) -> TransactionTemplate {
    let mut args = UnwrapArgs::new(
        Pubkey::new_from_array([1; 32]),
        Pubkey::new_from_array([2; 32]),
        100,
    );
    args.unwrapped_mint = Some(Pubkey::new_from_array([3; 32]));
    args.wrapped_token_program = Some(spl_token_2022::id());
    args.unwrapped_token_program = Some(spl_token::id());
    let resolved = args.resolve_offline(&payer).unwrap();
    TransactionTemplate::new(payer, anchor)
        .with_instruction(resolved.instruction())
        .with_signers(resolved.signers())
}

#[test]
fn test_compilation_ignores_signing_capability() {
    let payer = keypairs(1).remove(0);
    let anchor = RecencyAnchor::new(Hash::new_from_array([9; 32]), 77);

    let signed = unwrap_template(concrete(&payer), anchor);
    let placeholder = unwrap_template(TokenWrapSigner::Placeholder(payer.pubkey()), anchor);
    assert_eq!(
        signed.message_bytes().unwrap(),
        placeholder.message_bytes().unwrap()
    );

    // Same inputs, separately compiled, every time
    for version in [MessageVersion::Legacy, MessageVersion::V0] {
        let a = signed.clone().with_version(version).message_bytes().unwrap();
        let b = placeholder
            .clone()
            .with_version(version)
            .message_bytes()
            .unwrap();
        assert_eq!(a, b);
    }

    let partial = signed.partially_sign().unwrap();
    assert!(partial.is_fully_signed());
    assert_eq!(partial.last_valid_block_height(), 77);

    let unsigned = placeholder.partially_sign().unwrap();
    assert_eq!(unsigned.signatures().missing(), vec![payer.pubkey()]);
}

#[test]
fn test_anchor_changes_message() {
    let payer = TokenWrapSigner::Placeholder(Pubkey::new_unique());
    let a = unwrap_template(payer.clone(), RecencyAnchor::new(Hash::new_unique(), 1));
    let b = unwrap_template(payer, RecencyAnchor::new(Hash::new_unique(), 1));
    assert_ne!(a.message_bytes().unwrap(), b.message_bytes().unwrap());
}

#[test]
fn test_instruction_order_is_preserved() {
    let payer = Pubkey::new_unique();
    let first = create_mint(
        &spl_token_wrap_client::interface::id(),
        &Pubkey::new_unique(),
        &Pubkey::new_unique(),
        &Pubkey::new_unique(),
        &spl_token_2022::id(),
        false,
    );
    let second = create_mint(
        &spl_token_wrap_client::interface::id(),
        &Pubkey::new_unique(),
        &Pubkey::new_unique(),
        &Pubkey::new_unique(),
        &spl_token_2022::id(),
        true,
    );
    let template = TransactionTemplate::new(payer, RecencyAnchor::default())
        .with_instructions([first, second]);
    let message = template.compile().unwrap();

    let data: Vec<&[u8]> = message
        .instructions()
        .iter()
        .map(|ix| ix.data.as_slice())
        .collect();
    assert_eq!(data, vec![&[0u8, 0][..], &[0u8, 1][..]]);
}

#[test]
fn test_exchange_format() {
    let payer = keypairs(1).remove(0);
    let cosigner = Pubkey::new_unique();
    let anchor = RecencyAnchor::new(Hash::new_unique(), 42);
    let partial = unwrap_template(concrete(&payer), anchor)
        .with_instruction(solana_instruction::Instruction::new_with_bytes(
            Pubkey::new_unique(),
            &[],
            vec![solana_instruction::AccountMeta::new_readonly(cosigner, true)],
        ))
        .partially_sign()
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(&partial.to_json().unwrap()).unwrap();
    assert_eq!(json["lastValidBlockHeight"], 42);
    assert!(json["message"].is_string());
    let signatures = json["signatures"].as_array().unwrap();
    assert_eq!(signatures[0]["pubkey"], payer.pubkey().to_string());
    assert!(signatures[0]["signature"].is_string());
    assert_eq!(signatures[1]["pubkey"], cosigner.to_string());
    assert!(signatures[1]["signature"].is_null());

    let decoded = PartiallySignedTransaction::from_json(&json.to_string()).unwrap();
    assert_eq!(decoded, partial);
    assert_eq!(
        decoded.decode_message().unwrap().serialize(),
        partial.message_bytes()
    );

    assert!(matches!(
        PartiallySignedTransaction::from_json("{\"message\": 1}"),
        Err(TokenWrapClientError::Serialization(_))
    ));
}

#[tokio::test]
async fn test_template_from_rpc_anchor_submits() {
    let rpc = MockRpc::default();
    let payer = keypairs(1).remove(0);
    let anchor = rpc.get_latest_recency_anchor().await.unwrap();

    let transaction = unwrap_template(concrete(&payer), anchor)
        .partially_sign()
        .unwrap()
        .into_fully_signed()
        .unwrap();
    transaction.submit(&rpc).await.unwrap();

    let submitted = rpc.submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(
        submitted[0].message.recent_blockhash(),
        &rpc.anchor.blockhash
    );
}
