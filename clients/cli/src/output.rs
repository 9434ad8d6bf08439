use {
    crate::config::Config,
    serde_derive::{Deserialize, Serialize},
    serde_with::{serde_as, DisplayFromStr},
    solana_cli_output::{OutputFormat, QuietDisplay, VerboseDisplay},
    solana_pubkey::Pubkey,
    spl_token_wrap_client::PartiallySignedTransaction,
    std::fmt::{Display, Formatter},
};

pub fn parse_output_format(output_format: &str) -> OutputFormat {
    match output_format {
        "display" => OutputFormat::Display,
        "json" => OutputFormat::Json,
        "json-compact" => OutputFormat::JsonCompact,
        "quiet" => OutputFormat::DisplayQuiet,
        "verbose" => OutputFormat::DisplayVerbose,
        _ => unreachable!(),
    }
}

pub fn println_display(config: &Config, message: String) {
    match config.output_format {
        OutputFormat::Display | OutputFormat::DisplayVerbose => {
            println!("{}", message);
        }
        _ => {}
    }
}

pub fn format_output<T>(config: &Config, command_output: T) -> String
where
    T: serde::Serialize + Display + QuietDisplay + VerboseDisplay,
{
    config.output_format.formatted_string(&command_output)
}

/// What an offline signer hands to the next participant
#[serde_as]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignOnlyOutput {
    /// `PUBKEY=SIGNATURE` pairs, accepted back by `--signer`
    pub signers: Vec<String>,
    #[serde_as(as = "Vec<DisplayFromStr>")]
    pub absent: Vec<Pubkey>,
    pub partially_signed_transaction: PartiallySignedTransaction,
}

impl SignOnlyOutput {
    pub fn new(partial: PartiallySignedTransaction) -> Self {
        Self {
            signers: partial.presigner_pairs(),
            absent: partial.signatures().missing(),
            partially_signed_transaction: partial,
        }
    }
}

impl Display for SignOnlyOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if !self.signers.is_empty() {
            writeln!(f, "Signers (Pubkey=Signature):")?;
            for signer in &self.signers {
                writeln!(f, "  {signer}")?;
            }
        }
        if !self.absent.is_empty() {
            writeln!(f, "Absent Signers (Pubkey):")?;
            for pubkey in &self.absent {
                writeln!(f, "  {pubkey}")?;
            }
        }
        let json = self
            .partially_signed_transaction
            .to_json()
            .map_err(|_| std::fmt::Error)?;
        writeln!(f, "Partially signed transaction:")?;
        writeln!(f, "{json}")
    }
}
