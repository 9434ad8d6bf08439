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
    spl_token_wrap_client::{TransactionTemplate, WrapArgs as WrapRequest},
    std::{
        fmt::{Display, Formatter},
        rc::Rc,
    },
};

#[derive(Clone, Debug, Args)]
pub struct WrapArgs {
    /// The address of the unwrapped token account to wrap from
    #[clap(value_parser = parse_pubkey)]
    pub unwrapped_token_account: Pubkey,

    /// The address of the token program that the wrapped mint should belong to
    #[clap(value_parser = parse_token_program)]
    pub wrapped_token_program: Pubkey,

    /// The amount of tokens to wrap
    #[clap(value_parser)]
    pub amount: u64,

    /// The address of the escrow account that will hold the unwrapped tokens.
    /// Defaults to the wrapped mint authority's associated token account.
    #[clap(long, value_parser = parse_pubkey)]
    pub escrow_account: Option<Pubkey>,

    /// Signer source of transfer authority if different from fee payer.
    /// For a multisig, the multisig address.
    #[clap(
        long,
        value_parser = SignerSourceParserBuilder::default().allow_all().build()
    )]
    pub transfer_authority: Option<SignerSource>,

    /// The address of the mint to wrap, queried if not provided
    #[clap(long, value_parser = parse_pubkey)]
    pub unwrapped_mint: Option<Pubkey>,

    /// The address of the token account to receive wrapped tokens.
    /// If not provided, defaults to fee payer associated token account
    #[clap(long, value_parser = parse_pubkey)]
    pub recipient_token_account: Option<Pubkey>,

    /// The address of the token program that the unwrapped mint belongs to.
    /// Queries account for `unwrapped_token_account` if not provided.
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
pub struct WrapOutput {
    #[serde_as(as = "DisplayFromStr")]
    pub unwrapped_mint_address: Pubkey,

    #[serde_as(as = "DisplayFromStr")]
    pub wrapped_mint_address: Pubkey,

    #[serde_as(as = "DisplayFromStr")]
    pub unwrapped_token_account: Pubkey,

    #[serde_as(as = "DisplayFromStr")]
    pub recipient_token_account: Pubkey,

    #[serde_as(as = "DisplayFromStr")]
    pub escrow_account: Pubkey,

    pub amount: u64,

    #[serde_as(as = "Option<DisplayFromStr>")]
    pub signature: Option<Signature>,

    pub sign_only_data: Option<SignOnlyOutput>,
}

impl Display for WrapOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
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
            "Unwrapped token account:",
            &self.unwrapped_token_account.to_string(),
        )?;
        writeln_name_value(
            f,
            "Recipient wrapped token account:",
            &self.recipient_token_account.to_string(),
        )?;
        writeln_name_value(f, "Escrow account:", &self.escrow_account.to_string())?;
        writeln_name_value(f, "Amount:", &self.amount.to_string())?;

        if let Some(data) = &self.sign_only_data {
            writeln!(f, "{}", data)?;
        } else if let Some(signature) = self.signature {
            writeln_name_value(f, "Signature:", &signature.to_string())?;
        }

        Ok(())
    }
}

impl QuietDisplay for WrapOutput {
    fn write_str(&self, _: &mut dyn std::fmt::Write) -> std::fmt::Result {
        Ok(())
    }
}
impl VerboseDisplay for WrapOutput {}

pub async fn command_wrap(
    config: &Config,
    args: WrapArgs,
    matches: &ArgMatches,
    wallet_manager: &mut Option<Rc<RemoteWalletManager>>,
) -> CommandResult {
    let payer = config.fee_payer_signer()?;

    let mut request = WrapRequest::new(
        args.unwrapped_token_account,
        args.wrapped_token_program,
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
    request.unwrapped_token_program = args.unwrapped_token_program;
    request.recipient_wrapped_token_account = args.recipient_token_account;
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
                "Wrapping {} tokens from mint {}",
                args.amount, resolved.unwrapped_mint
            ),
        );
    }

    let template = TransactionTemplate::new(payer, args.offline.recency_anchor(config).await?)
        .with_instruction(resolved.instruction())
        .with_signers(resolved.signers());
    let signed = args.offline.sign_and_process(config, template).await?;

    let output = WrapOutput {
        unwrapped_mint_address: resolved.unwrapped_mint,
        wrapped_mint_address: resolved.wrapped_mint,
        unwrapped_token_account: resolved.unwrapped_token_account,
        recipient_token_account: resolved.recipient_wrapped_token_account,
        escrow_account: resolved.unwrapped_escrow,
        amount: resolved.amount,
        signature: signed.signature,
        sign_only_data: signed.sign_only_data,
    };

    Ok(format_output(config, output))
}
