use {
    crate::{
        combine::{command_combine, CombineArgs},
        common::parse_pubkey,
        config::Config,
        create_escrow_account::{command_create_escrow_account, CreateEscrowAccountArgs},
        create_mint::{command_create_mint, CreateMintArgs},
        find_pdas::{command_get_pdas, FindPdasArgs},
        output::parse_output_format,
        unwrap::{command_unwrap, UnwrapArgs},
        wrap::{command_wrap, WrapArgs},
        CommandResult,
    },
    clap::{
        builder::{PossibleValuesParser, TypedValueParser},
        ArgMatches, Parser, Subcommand,
    },
    solana_clap_v3_utils::input_parsers::{
        parse_url_or_moniker,
        signer::{SignerSource, SignerSourceParserBuilder},
    },
    solana_cli_output::OutputFormat,
    solana_pubkey::Pubkey,
    solana_remote_wallet::remote_wallet::RemoteWalletManager,
    std::rc::Rc,
};

#[derive(Parser, Debug, Clone)]
#[clap(
    author,
    version,
    about = "A command line tool for interacting with the SPL Token Wrap program"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Command,

    /// Configuration file to use
    #[clap(global(true), short = 'C', long = "config", id = "PATH")]
    pub config_file: Option<String>,

    /// Simulate transaction instead of executing
    #[clap(global(true), long, alias = "dryrun")]
    pub dry_run: bool,

    /// URL for Solana JSON `RPC` or moniker (or their first letter):
    /// [`mainnet-beta`, `testnet`, `devnet`, `localhost`].
    /// Default from the configuration file.
    #[clap(
        global(true),
        short = 'u',
        long = "url",
        id = "URL_OR_MONIKER",
        value_parser = parse_url_or_moniker,
    )]
    pub json_rpc_url: Option<String>,

    /// Specify the fee-payer account. This may be a keypair file, the ASK
    /// keyword or the pubkey of an offline signer, provided an appropriate
    /// --signer argument is also passed. Defaults to the client keypair.
    #[clap(
        global(true),
        long,
        id = "PAYER_KEYPAIR",
        value_parser = SignerSourceParserBuilder::default().allow_all().build(),
    )]
    pub fee_payer: Option<SignerSource>,

    /// Token wrap program to target. Defaults to the canonical deployment.
    #[clap(global(true), long, id = "PROGRAM_ID", value_parser = parse_pubkey)]
    pub program_id: Option<Pubkey>,

    /// Show additional information
    #[clap(global(true), short, long)]
    pub verbose: bool,

    /// Return information in specified output format
    #[clap(
        global(true),
        long = "output",
        id = "FORMAT",
        conflicts_with = "verbose",
        value_parser = PossibleValuesParser::new([
            "display",
            "json",
            "json-compact",
            "quiet",
            "verbose"
        ]).map(|o| parse_output_format(&o)),
    )]
    pub output_format: Option<OutputFormat>,
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create a wrapped mint for a given SPL Token
    CreateMint(CreateMintArgs),
    /// Escrow SPL tokens and mint their wrapped version
    Wrap(WrapArgs),
    /// Find the PDA addresses associated with unwrapped mints
    FindPdas(FindPdasArgs),
    /// Convert wrapped tokens back into their original unwrapped version
    Unwrap(UnwrapArgs),
    /// Create an account used to escrow unwrapped tokens
    CreateEscrowAccount(CreateEscrowAccountArgs),
    /// Merge partially signed transactions from offline signers and
    /// broadcast the result once every signature is present
    Combine(CombineArgs),
}

impl Command {
    pub async fn execute(
        self,
        config: &Config,
        matches: &ArgMatches,
        wallet_manager: &mut Option<Rc<RemoteWalletManager>>,
    ) -> CommandResult {
        match self {
            Command::CreateMint(args) => command_create_mint(config, args).await,
            Command::Wrap(args) => command_wrap(config, args, matches, wallet_manager).await,
            Command::FindPdas(args) => command_get_pdas(config, args).await,
            Command::Unwrap(args) => command_unwrap(config, args, matches, wallet_manager).await,
            Command::CreateEscrowAccount(args) => command_create_escrow_account(config, args).await,
            Command::Combine(args) => command_combine(config, args).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, solana_hash::Hash};

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("spl-token-wrap").chain(args.iter().copied()))
    }

    #[test]
    fn test_offline_wrap_arguments() {
        let account = Pubkey::new_unique().to_string();
        let mint = Pubkey::new_unique().to_string();
        let blockhash = Hash::new_unique().to_string();
        let token_2022 = spl_token_2022::id().to_string();
        let token = spl_token::id().to_string();

        let cli = parse(&[
            "wrap",
            &account,
            &token_2022,
            "10",
            "--unwrapped-mint",
            &mint,
            "--unwrapped-token-program",
            &token,
            "--blockhash",
            &blockhash,
            "--sign-only",
            "--output-file",
            "wrap.json",
        ])
        .unwrap();
        let Command::Wrap(args) = cli.command else {
            panic!("expected wrap");
        };
        assert_eq!(args.amount, 10);
        assert!(args.offline.is_offline());
        assert_eq!(
            args.offline.output_file.unwrap().to_str(),
            Some("wrap.json")
        );

        // Signing offline needs a blockhash every party compiles against
        let members = Pubkey::new_unique().to_string();
        assert!(parse(&[
            "wrap",
            &account,
            &token_2022,
            "10",
            "--multisig-signer",
            &members
        ])
        .is_err());
        assert!(parse(&["wrap", &account, &token_2022, "10", "--output-file", "x.json"]).is_err());

        // Not a token program
        assert!(parse(&[
            "wrap",
            &account,
            &token,
            "10",
            "--unwrapped-token-program",
            &mint
        ])
        .is_err());
    }

    #[test]
    fn test_combine_arguments() {
        assert!(parse(&["combine"]).is_err());

        let cli = parse(&["combine", "a.json", "b.json", "--no-broadcast"]).unwrap();
        let Command::Combine(args) = cli.command else {
            panic!("expected combine");
        };
        assert_eq!(args.files.len(), 2);
        assert!(args.no_broadcast);
        assert!(!args.skip_signature_verification);
    }

    #[test]
    fn test_program_id_is_global() {
        let program_id = Pubkey::new_unique();
        let cli = parse(&[
            "find-pdas",
            &Pubkey::new_unique().to_string(),
            &spl_token_2022::id().to_string(),
            "--program-id",
            &program_id.to_string(),
        ])
        .unwrap();
        assert_eq!(cli.program_id, Some(program_id));
    }
}
