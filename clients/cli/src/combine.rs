use {
    crate::{
        common::{process_transaction, read_partially_signed, write_partially_signed},
        config::Config,
        output::{format_output, println_display, SignOnlyOutput},
        CommandResult,
    },
    clap::Args,
    serde_derive::{Deserialize, Serialize},
    serde_with::{serde_as, DisplayFromStr},
    solana_cli_output::{display::writeln_name_value, QuietDisplay, VerboseDisplay},
    solana_signature::Signature,
    spl_token_wrap_client::{CombineConfig, MultisigCoordinator},
    std::{
        fmt::{Display, Formatter},
        path::PathBuf,
    },
};

#[derive(Clone, Debug, Args)]
pub struct CombineArgs {
    /// Files holding partially signed transactions, as written by
    /// `--sign-only --output-file`. All must hold the same message.
    #[clap(required = true, min_values = 1)]
    pub files: Vec<PathBuf>,

    /// Accept signatures without checking them against the message
    #[clap(long)]
    pub skip_signature_verification: bool,

    /// Only merge, never broadcast, even when every signature is present
    #[clap(long)]
    pub no_broadcast: bool,

    /// Write the merged partially signed transaction to this file
    #[clap(long)]
    pub output_file: Option<PathBuf>,
}

#[serde_as]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombineOutput {
    pub inputs: usize,
    pub present_signatures: usize,
    pub required_signatures: usize,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub signature: Option<Signature>,
    pub merged: Option<SignOnlyOutput>,
}

impl Display for CombineOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln_name_value(f, "Inputs combined:", &self.inputs.to_string())?;
        writeln_name_value(
            f,
            "Signatures present:",
            &format!("{}/{}", self.present_signatures, self.required_signatures),
        )?;

        if let Some(merged) = &self.merged {
            writeln!(f, "{}", merged)?;
        } else if let Some(signature) = self.signature {
            writeln_name_value(f, "Signature:", &signature.to_string())?;
        }

        Ok(())
    }
}

impl QuietDisplay for CombineOutput {
    fn write_str(&self, _: &mut dyn std::fmt::Write) -> std::fmt::Result {
        Ok(())
    }
}
impl VerboseDisplay for CombineOutput {}

pub async fn command_combine(config: &Config, args: CombineArgs) -> CommandResult {
    let mut coordinator = MultisigCoordinator::new(CombineConfig {
        verify_signatures: !args.skip_signature_verification,
    });
    for path in &args.files {
        coordinator.add(read_partially_signed(path)?);
    }
    let inputs = coordinator.len();

    let merged = coordinator.validate()?.merge();
    let present_signatures = merged.signatures().present_count();
    let required_signatures = merged.signatures().len();

    if let Some(path) = &args.output_file {
        write_partially_signed(path, &merged.to_partially_signed())?;
    }

    if args.no_broadcast {
        return Ok(format_output(
            config,
            CombineOutput {
                inputs,
                present_signatures,
                required_signatures,
                signature: None,
                merged: Some(SignOnlyOutput::new(merged.to_partially_signed())),
            },
        ));
    }

    let transaction = merged.complete()?;
    println_display(
        config,
        format!(
            "Broadcasting transaction combined from {} partially signed inputs",
            inputs
        ),
    );
    let signature = process_transaction(config, &transaction).await?;

    Ok(format_output(
        config,
        CombineOutput {
            inputs,
            present_signatures,
            required_signatures,
            signature,
            merged: None,
        },
    ))
}
