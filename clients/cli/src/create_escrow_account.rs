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
    spl_token_wrap_client::{create_escrow_account_instructions, TransactionTemplate},
    std::fmt::{Display, Formatter},
};

#[derive(Clone, Debug, Args)]
#[clap(about = "Creates an escrow token account for holding unwrapped tokens")]
pub struct CreateEscrowAccountArgs {
    /// The address of the mint for the unwrapped tokens the escrow will hold
    #[clap(value_parser = parse_pubkey)]
    pub unwrapped_mint: Pubkey,

    /// The address of the token program for the *wrapped* mint
    #[clap(value_parser = parse_token_program)]
    pub wrapped_token_program: Pubkey,

    /// Do not error if the escrow account already exists and is initialized
    #[clap(long)]
    pub idempotent: bool,
}

#[serde_as]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEscrowAccountOutput {
    #[serde_as(as = "DisplayFromStr")]
    pub escrow_account_address: Pubkey,

    #[serde_as(as = "DisplayFromStr")]
    pub escrow_account_owner: Pubkey,

    #[serde_as(as = "DisplayFromStr")]
    pub unwrapped_token_program_id: Pubkey,

    #[serde_as(as = "Option<DisplayFromStr>")]
    pub signature: Option<Signature>,
}

impl Display for CreateEscrowAccountOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln_name_value(
            f,
            "Escrow Account Address:",
            &self.escrow_account_address.to_string(),
        )?;
        writeln_name_value(
            f,
            "Escrow Account Owner (wrapped mint authority):",
            &self.escrow_account_owner.to_string(),
        )?;
        writeln_name_value(
            f,
            "Unwrapped Token Program ID:",
            &self.unwrapped_token_program_id.to_string(),
        )?;
        if let Some(signature) = self.signature {
            writeln_name_value(f, "Signature:", &signature.to_string())?;
        }
        Ok(())
    }
}

impl QuietDisplay for CreateEscrowAccountOutput {
    fn write_str(&self, _: &mut dyn std::fmt::Write) -> std::fmt::Result {
        Ok(())
    }
}
impl VerboseDisplay for CreateEscrowAccountOutput {}

pub async fn command_create_escrow_account(
    config: &Config,
    args: CreateEscrowAccountArgs,
) -> CommandResult {
    let payer = config.fee_payer_signer()?;

    let plan = create_escrow_account_instructions(
        config.rpc(),
        &payer.pubkey(),
        &args.unwrapped_mint,
        &args.wrapped_token_program,
        args.idempotent,
        &config.program_id,
    )
    .await?;

    let signature = match plan.instruction.clone() {
        Some(instruction) => {
            println_display(
                config,
                format!(
                    "Creating escrow account under program {} for unwrapped mint {} owned by \
                     wrapped mint authority {}",
                    plan.unwrapped_token_program, args.unwrapped_mint, plan.escrow_owner
                ),
            );
            let anchor = recency_anchor(config, None, None).await?;
            let template = TransactionTemplate::new(payer, anchor).with_instruction(instruction);
            sign_and_process(config, template, false, None)
                .await?
                .signature
        }
        None => {
            println_display(
                config,
                format!(
                    "Escrow account {} already exists, skipping creation",
                    plan.escrow
                ),
            );
            None
        }
    };

    Ok(format_output(
        config,
        CreateEscrowAccountOutput {
            escrow_account_address: plan.escrow,
            escrow_account_owner: plan.escrow_owner,
            unwrapped_token_program_id: plan.unwrapped_token_program,
            signature,
        },
    ))
}
