use {
    crate::{
        common::{parse_pubkey, parse_token_program, recency_anchor, sign_and_process},
        config::Config,
        output::{format_output, println_display},
        CommandResult,
    },
    clap::Args,
    serde_derive::{Deserialize, Serialize},
    serde_with::{serde_as, DisplayFromStr},
    solana_cli_output::{display::writeln_name_value, QuietDisplay, VerboseDisplay},
    solana_pubkey::Pubkey,
    solana_signature::Signature,
    spl_token_wrap_client::{CreateMintPlan, TransactionTemplate},
    std::fmt::{Display, Formatter},
};

#[derive(Clone, Debug, Args)]
pub struct CreateMintArgs {
    /// The address of the mint to wrap
    #[clap(value_parser = parse_pubkey)]
    pub unwrapped_mint: Pubkey,

    /// The address of the token program that the wrapped mint should belong to
    #[clap(value_parser = parse_token_program)]
    pub wrapped_token_program: Pubkey,

    /// Do not err if account already created
    #[clap(long)]
    pub idempotent: bool,
}

#[serde_as]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMintOutput {
    #[serde_as(as = "DisplayFromStr")]
    pub unwrapped_mint_address: Pubkey,
    #[serde_as(as = "DisplayFromStr")]
    pub wrapped_mint_address: Pubkey,
    #[serde_as(as = "DisplayFromStr")]
    pub wrapped_backpointer_address: Pubkey,
    pub funded_wrapped_mint_lamports: u64,
    pub funded_backpointer_lamports: u64,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub signature: Option<Signature>,
}

impl Display for CreateMintOutput {
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
            "Wrapped backpointer address:",
            &self.wrapped_backpointer_address.to_string(),
        )?;
        writeln_name_value(
            f,
            "Funded wrapped mint lamports:",
            &self.funded_wrapped_mint_lamports.to_string(),
        )?;
        writeln_name_value(
            f,
            "Funded backpointer lamports:",
            &self.funded_backpointer_lamports.to_string(),
        )?;

        if let Some(signature) = self.signature {
            writeln_name_value(f, "Signature:", &signature.to_string())?;
        }

        Ok(())
    }
}

impl QuietDisplay for CreateMintOutput {
    fn write_str(&self, _: &mut dyn std::fmt::Write) -> std::fmt::Result {
        Ok(())
    }
}
impl VerboseDisplay for CreateMintOutput {}

pub async fn command_create_mint(config: &Config, args: CreateMintArgs) -> CommandResult {
    let payer = config.fee_payer_signer()?;

    println_display(
        config,
        format!("Creating wrapped mint for {}", args.unwrapped_mint),
    );

    let plan = CreateMintPlan::build(
        config.rpc(),
        &payer.pubkey(),
        &args.unwrapped_mint,
        &args.wrapped_token_program,
        args.idempotent,
        &config.program_id,
    )
    .await?;

    if plan.funded_wrapped_mint_lamports > 0 {
        println_display(
            config,
            format!(
                "Funding wrapped_mint_account {} with {} lamports for rent",
                plan.addresses.wrapped_mint, plan.funded_wrapped_mint_lamports
            ),
        );
    }
    if plan.funded_backpointer_lamports > 0 {
        println_display(
            config,
            format!(
                "Funding backpointer_account {} with {} lamports for rent",
                plan.addresses.wrapped_backpointer, plan.funded_backpointer_lamports
            ),
        );
    }

    let template = TransactionTemplate::new(payer, recency_anchor(config, None, None).await?)
        .with_instructions(plan.instructions.iter().cloned());
    let signed = sign_and_process(config, template, false, None).await?;

    Ok(format_output(
        config,
        CreateMintOutput {
            unwrapped_mint_address: plan.unwrapped_mint,
            wrapped_mint_address: plan.addresses.wrapped_mint,
            wrapped_backpointer_address: plan.addresses.wrapped_backpointer,
            funded_wrapped_mint_lamports: plan.funded_wrapped_mint_lamports,
            funded_backpointer_lamports: plan.funded_backpointer_lamports,
            signature: signed.signature,
        },
    ))
}
