use {
    crate::{
        common::{parse_pubkey, parse_token_program, transfer_authority, OfflineArgs},
        config::Config,
        output::{format_output, println_display, SignOnlyOutput},
        CommandResult,
    },
    clap::{ArgMatches, Args},
    serde_derive::{Deserialize, Serialize},
    serde_with::{serde_as, DisplayFromStr},
    solana_clap_v3_utils::input_parsers::signer::{SignerSource, SignerSourceParserBuilder},
    solana_cli_output::{display::writeln_name_value, QuietDisplay, VerboseDisplay},
    solana_pubkey::Pubkey,
    solana_remote_wallet::remote_wallet::RemoteWalletManager,
    solana_signature::Signature,
    spl_token_wrap_client::{TransactionTemplate, UnwrapArgs as UnwrapRequest},
    std::{
        fmt::{Display, Formatter},
        rc::Rc,
    },
};

#[derive(Clone, Debug, Args)]
pub struct UnwrapArgs {
    /// The address of the wrapped token account to unwrap from
    #[clap(value_parser = parse_pubkey)]
    pub wrapped_token_account: Pubkey,

    /// The address of the token account to receive the unwrapped tokens
    #[clap(value_parser = parse_pubkey)]
    pub unwrapped_token_recipient: Pubkey,

    /// The amount of tokens to unwrap
    #[clap(value_parser)]
    pub amount: u64,

    /// The address of the escrow account holding the unwrapped tokens.
    /// If not provided, defaults to the Associated Token Account (`ATA`) for
    /// the wrapped mint authority PDA on the unwrapped mint.
    #[clap(long, value_parser = parse_pubkey)]
    pub escrow_account: Option<Pubkey>,

    /// Signer source of transfer authority (to burn wrapped tokens)
    /// if different from fee payer. For a multisig, the multisig address.
    #[clap(
        long,
        value_parser = SignerSourceParserBuilder::default().allow_all().build()
    )]
    pub transfer_authority: Option<SignerSource>,

    /// The address of the unwrapped mint, queried if not provided
    #[clap(long, value_parser = parse_pubkey)]
    pub unwrapped_mint: Option<Pubkey>,

    /// The address of the token program for the wrapped mint,
    /// queried if not provided.
    #[clap(long, value_parser = parse_token_program)]
    pub wrapped_token_program: Option<Pubkey>,

    /// The address of the token program for the unwrapped mint,
    /// queried if not provided.
    #[clap(long, value_parser = parse_token_program)]
    pub unwrapped_token_program: Option<Pubkey>,

    /// Member signer of a multisig account.
    /// Use this argument multiple times for each signer.
    #[clap(
        long,
        multiple = true,
        value_parser = SignerSourceParserBuilder::default().allow_all().build(),
        requires = "blockhash"
    )]
    pub multisig_signer: Option<Vec<SignerSource>>,

    #[clap(flatten)]
    pub offline: OfflineArgs,
}

#[serde_as]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnwrapOutput {
    #[serde_as(as = "DisplayFromStr")]
    pub unwrapped_mint_address: Pubkey,

    #[serde_as(as = "DisplayFromStr")]
    pub unwrapped_token_program: Pubkey,

    #[serde_as(as = "DisplayFromStr")]
    pub wrapped_mint_address: Pubkey,

    #[serde_as(as = "DisplayFromStr")]
    pub wrapped_token_account: Pubkey,

    #[serde_as(as = "DisplayFromStr")]
    pub escrow_account: Pubkey,

    #[serde_as(as = "DisplayFromStr")]
    pub recipient_token_account: Pubkey,

    pub amount: u64,

    #[serde_as(as = "Option<DisplayFromStr>")]
    pub signature: Option<Signature>,

    pub sign_only_data: Option<SignOnlyOutput>,
}

impl Display for UnwrapOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln_name_value(
            f,
            "Unwrapped token program:",
            &self.unwrapped_token_program.to_string(),
        )?;
        writeln_name_value(
            f,
            "Unwrapped mint address:",
            &self.unwrapped_mint_address.to_string(),
        )?;
        writeln_name_value(
            f,
            "Wrapped mint address:",
            &self.wrapped_mint_address.to_string(),
        )?;
        writeln_name_value(
            f,
            "Wrapped token account:",
            &self.wrapped_token_account.to_string(),
        )?;
        writeln_name_value(f, "Escrow account:", &self.escrow_account.to_string())?;
        writeln_name_value(
            f,
            "Recipient unwrapped token account:",
            &self.recipient_token_account.to_string(),
        )?;
        writeln_name_value(f, "Amount unwrapped:", &self.amount.to_string())?;

        if let Some(data) = &self.sign_only_data {
            writeln!(f, "{}", data)?;
        } else if let Some(signature) = self.signature {
            writeln_name_value(f, "Signature:", &signature.to_string())?;
        }

        Ok(())
    }
}

impl QuietDisplay for UnwrapOutput {
    fn write_str(&self, _: &mut dyn std::fmt::Write) -> std::fmt::Result {
        Ok(())
    }
}
impl VerboseDisplay for UnwrapOutput {}

pub async fn command_unwrap(
    config: &Config,
    args: UnwrapArgs,
    matches: &ArgMatches,
    wallet_manager: &mut Option<Rc<RemoteWalletManager>>,
) -> CommandResult {
    let payer = config.fee_payer_signer()?;

    let mut request = UnwrapRequest::new(
        args.wrapped_token_account,
        args.unwrapped_token_recipient,
        args.amount,
    );
    request.program_id = config.program_id;
    request.transfer_authority = transfer_authority(
        matches,
        args.transfer_authority.as_ref(),
        args.multisig_signer.as_deref(),
        wallet_manager,
    )?;
    request.unwrapped_mint = args.unwrapped_mint;
    request.wrapped_token_program = args.wrapped_token_program;
    request.unwrapped_token_program = args.unwrapped_token_program;
    request.unwrapped_escrow = args.escrow_account;

    let resolved = if args.offline.is_offline() {
        request.resolve_offline(&payer)?
    } else {
        request.resolve(config.rpc(), &payer).await?
    };

    if !args.offline.sign_only {
        println_display(
            config,
            format!(
                "Unwrapping {} tokens from mint {}",
                args.amount, resolved.wrapped_mint
            ),
        );
    }

    let template = TransactionTemplate::new(payer, args.offline.recency_anchor(config).await?)
        .with_instruction(resolved.instruction())
        .with_signers(resolved.signers());
    let signed = args.offline.sign_and_process(config, template).await?;

    let output = UnwrapOutput {
        unwrapped_mint_address: resolved.unwrapped_mint,
        unwrapped_token_program: resolved.unwrapped_token_program,
        wrapped_mint_address: resolved.wrapped_mint,
        wrapped_token_account: resolved.wrapped_token_account,
        escrow_account: resolved.unwrapped_escrow,
        recipient_token_account: resolved.recipient_unwrapped_token_account,
        amount: resolved.amount,
        signature: signed.signature,
        sign_only_data: signed.sign_only_data,
    };

    Ok(format_output(config, output))
}
