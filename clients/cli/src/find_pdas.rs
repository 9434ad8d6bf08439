use {
    crate::{
        common::{parse_pubkey, parse_token_program},
        config::Config,
        output::format_output,
        CommandResult,
    },
    clap::Args,
    serde_derive::{Deserialize, Serialize},
    serde_with::{serde_as, DisplayFromStr},
    solana_cli_output::{display::writeln_name_value, QuietDisplay, VerboseDisplay},
    solana_pubkey::Pubkey,
    spl_token_wrap_client::{AccountResolver, WrappedMintAddresses},
    std::fmt::{Display, Formatter},
};

#[derive(Clone, Debug, Args)]
pub struct FindPdasArgs {
    /// The address of the mint to wrap
    #[clap(value_parser = parse_pubkey)]
    pub unwrapped_mint: Pubkey,

    /// The address of the token program that the wrapped mint should belong to
    #[clap(value_parser = parse_token_program)]
    pub wrapped_token_program: Pubkey,

    /// The token program of the unwrapped mint, queried if not provided
    #[clap(long, value_parser = parse_token_program)]
    pub unwrapped_token_program: Option<Pubkey>,
}

#[serde_as]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdasOutput {
    #[serde(flatten)]
    pub addresses: WrappedMintAddresses,
    #[serde_as(as = "DisplayFromStr")]
    pub unwrapped_escrow: Pubkey,
}

impl Display for PdasOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln_name_value(
            f,
            "Wrapped mint address:",
            &self.addresses.wrapped_mint.to_string(),
        )?;
        writeln_name_value(
            f,
            "Wrapped mint authority:",
            &self.addresses.wrapped_mint_authority.to_string(),
        )?;
        writeln_name_value(
            f,
            "Wrapped backpointer address:",
            &self.addresses.wrapped_backpointer.to_string(),
        )?;
        writeln_name_value(
            f,
            "Unwrapped escrow address:",
            &self.unwrapped_escrow.to_string(),
        )?;

        Ok(())
    }
}

impl QuietDisplay for PdasOutput {
    fn write_str(&self, _: &mut dyn std::fmt::Write) -> std::fmt::Result {
        Ok(())
    }
}
impl VerboseDisplay for PdasOutput {}

pub async fn command_get_pdas(config: &Config, args: FindPdasArgs) -> CommandResult {
    let addresses = WrappedMintAddresses::derive(
        &args.unwrapped_mint,
        &args.wrapped_token_program,
        &config.program_id,
    )?;

    let unwrapped_token_program = match args.unwrapped_token_program {
        Some(program) => program,
        None => {
            AccountResolver::new(config.rpc())
                .resolve_owning_program(&args.unwrapped_mint)
                .await?
        }
    };
    let unwrapped_escrow = addresses.escrow(&args.unwrapped_mint, &unwrapped_token_program);

    Ok(format_output(
        config,
        PdasOutput {
            addresses,
            unwrapped_escrow,
        },
    ))
}
