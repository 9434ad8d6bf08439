use {
    crate::{
        config::Config,
        output::{println_display, SignOnlyOutput},
        Error,
    },
    anyhow::anyhow,
    clap::{value_parser, ArgMatches, Args},
    solana_clap_v3_utils::{
        input_parsers::signer::SignerSource,
        keypair::{pubkey_from_path, signer_from_source_with_config, SignerFromPathConfig},
    },
    solana_hash::Hash,
    solana_presigner::Presigner,
    solana_pubkey::Pubkey,
    solana_remote_wallet::remote_wallet::RemoteWalletManager,
    solana_signature::Signature,
    spl_token_wrap_client::{
        FullySignedTransaction, MessageVersion, PartiallySignedTransaction, RecencyAnchor,
        TokenWrapClientError, TokenWrapRpc, TokenWrapSigner, TransactionTemplate,
        TransferAuthority,
    },
    std::{
        path::{Path, PathBuf},
        rc::Rc,
        str::FromStr,
        sync::Arc,
    },
};

pub fn parse_pubkey(value: &str) -> Result<Pubkey, String> {
    parse_address(value, "pubkey")
}

fn parse_address(path: &str, name: &str) -> Result<Pubkey, String> {
    let mut wallet_manager = None;
    pubkey_from_path(&ArgMatches::default(), path, name, &mut wallet_manager)
        .map_err(|_| format!("Failed to load pubkey {} at {}", name, path))
}

pub fn parse_token_program(value: &str) -> Result<Pubkey, String> {
    let pubkey = parse_pubkey(value)?;
    if pubkey == spl_token::id() || pubkey == spl_token_2022::id() {
        Ok(pubkey)
    } else {
        Err("Invalid token program. Must be spl-token or spl-token-2022".to_string())
    }
}

pub fn parse_presigner(value: &str) -> Result<Presigner, String> {
    let (pubkey_string, sig_string) = value
        .split_once('=')
        .ok_or("failed to split `pubkey=signature` pair")?;
    let pubkey = Pubkey::from_str(pubkey_string)
        .map_err(|_| "Failed to parse pubkey from string".to_string())?;
    let sig = Signature::from_str(sig_string)
        .map_err(|_| "Failed to parse signature from string".to_string())?;
    Ok(Presigner::new(&pubkey, &sig))
}

/// Flags for building a transaction offline and passing it between signers
#[derive(Clone, Debug, Args)]
pub struct OfflineArgs {
    /// Blockhash to build against. Required when signing offline so every
    /// participant compiles the same message.
    #[clap(long, value_parser = value_parser!(Hash))]
    pub blockhash: Option<Hash>,

    /// Last block height at which `--blockhash` is valid, recorded in the
    /// partially signed output
    #[clap(long, requires = "blockhash")]
    pub last_valid_block_height: Option<u64>,

    /// Signatures to add to transaction.
    /// Often the `PUBKEY=SIGNATURE` output from a multisig --sign-only signer.
    #[clap(
        long,
        multiple = true,
        value_parser = parse_presigner,
        requires = "blockhash"
    )]
    pub signer: Option<Vec<Presigner>>,

    /// Do not broadcast signed transaction, just sign
    #[clap(long)]
    pub sign_only: bool,

    /// With --sign-only, also write the partially signed transaction to
    /// this file for the `combine` command
    #[clap(long, requires = "sign-only")]
    pub output_file: Option<PathBuf>,

    /// Compile a legacy message instead of a version 0 message
    #[clap(long)]
    pub legacy_message: bool,
}

impl OfflineArgs {
    /// Whether to resolve accounts without querying the cluster
    pub fn is_offline(&self) -> bool {
        self.sign_only && self.blockhash.is_some()
    }

    pub fn message_version(&self) -> MessageVersion {
        if self.legacy_message {
            MessageVersion::Legacy
        } else {
            MessageVersion::V0
        }
    }

    /// Pre-made signatures as signers
    pub fn presigners(&self) -> Vec<TokenWrapSigner> {
        self.signer
            .iter()
            .flatten()
            .map(|presigner| TokenWrapSigner::Concrete(Arc::new(presigner.clone())))
            .collect()
    }

    /// Signs `template` and either processes it or, with --sign-only,
    /// returns the partial result
    pub async fn sign_and_process(
        &self,
        config: &Config,
        template: TransactionTemplate,
    ) -> Result<SignedTransaction, Error> {
        let template = template
            .with_version(self.message_version())
            .with_signers(self.presigners());
        sign_and_process(
            config,
            template,
            self.sign_only,
            self.output_file.as_deref(),
        )
        .await
    }

    pub async fn recency_anchor(&self, config: &Config) -> Result<RecencyAnchor, Error> {
        recency_anchor(config, self.blockhash, self.last_valid_block_height).await
    }
}

/// Loads signers, allowing bare pubkeys for keys held by offline parties
pub fn signers_from_sources(
    matches: &ArgMatches,
    sources: &[SignerSource],
    name: &str,
    wallet_manager: &mut Option<Rc<RemoteWalletManager>>,
) -> Result<Vec<TokenWrapSigner>, Error> {
    let parse_config = SignerFromPathConfig {
        allow_null_signer: true,
    };
    sources
        .iter()
        .map(|source| {
            signer_from_source_with_config(matches, source, name, wallet_manager, &parse_config)
                .map(|signer| TokenWrapSigner::Concrete(Arc::from(signer)))
                .map_err(|e| Error::from(e.to_string()))
        })
        .collect()
}

/// Builds the transfer authority from `--transfer-authority` and any
/// `--multisig-signer` members. `None` leaves it to default to the fee payer.
pub fn transfer_authority(
    matches: &ArgMatches,
    authority: Option<&SignerSource>,
    multisig_signers: Option<&[SignerSource]>,
    wallet_manager: &mut Option<Rc<RemoteWalletManager>>,
) -> Result<Option<TransferAuthority>, Error> {
    let members = match multisig_signers {
        Some(sources) => {
            signers_from_sources(matches, sources, "multisig_signer", wallet_manager)?
        }
        None => vec![],
    };
    let Some(source) = authority else {
        if !members.is_empty() {
            return Err("--multisig-signer requires --transfer-authority set to the multisig"
                .to_string()
                .into());
        }
        return Ok(None);
    };

    let authority = signers_from_sources(
        matches,
        std::slice::from_ref(source),
        "transfer_authority",
        wallet_manager,
    )?
    .pop()
    .ok_or("failed to load transfer authority")?;
    if members.is_empty() {
        Ok(Some(TransferAuthority::single(authority)))
    } else {
        Ok(Some(TransferAuthority::multisig(authority.pubkey(), members)?))
    }
}

/// Anchors against `blockhash` when one is given, otherwise queries the
/// cluster
pub async fn recency_anchor(
    config: &Config,
    blockhash: Option<Hash>,
    last_valid_block_height: Option<u64>,
) -> Result<RecencyAnchor, Error> {
    match blockhash {
        Some(blockhash) => Ok(RecencyAnchor::new(
            blockhash,
            last_valid_block_height.unwrap_or_default(),
        )),
        None => Ok(config.rpc().get_latest_recency_anchor().await?),
    }
}

pub fn read_partially_signed(path: &Path) -> Result<PartiallySignedTransaction, Error> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("Could not read {}: {}", path.display(), e))?;
    PartiallySignedTransaction::from_json(&json)
        .map_err(|e| anyhow!("Could not parse {}: {}", path.display(), e).into())
}

pub fn write_partially_signed(
    path: &Path,
    partial: &PartiallySignedTransaction,
) -> Result<(), Error> {
    std::fs::write(path, partial.to_json()?)
        .map_err(|e| anyhow!("Could not write {}: {}", path.display(), e).into())
}

/// Result of signing a command's transaction
pub struct SignedTransaction {
    pub signature: Option<Signature>,
    pub sign_only_data: Option<SignOnlyOutput>,
}

/// Signs `template` with every available signer. With `sign_only` the
/// partial result is returned (and written to `output_file` if given),
/// otherwise the transaction must be complete and is processed.
pub async fn sign_and_process(
    config: &Config,
    template: TransactionTemplate,
    sign_only: bool,
    output_file: Option<&Path>,
) -> Result<SignedTransaction, Error> {
    let partial = template.partially_sign()?;

    if sign_only {
        if let Some(path) = output_file {
            write_partially_signed(path, &partial)?;
        }
        return Ok(SignedTransaction {
            signature: None,
            sign_only_data: Some(SignOnlyOutput::new(partial)),
        });
    }

    let transaction = partial.into_fully_signed()?;
    Ok(SignedTransaction {
        signature: process_transaction(config, &transaction).await?,
        sign_only_data: None,
    })
}

pub async fn process_transaction(
    config: &Config,
    transaction: &FullySignedTransaction,
) -> Result<Option<Signature>, Error> {
    let transaction = transaction.to_versioned_transaction();

    if config.dry_run {
        let simulation_data = config.rpc_client.simulate_transaction(&transaction).await?;

        if config.verbose() {
            if let Some(logs) = simulation_data.value.logs {
                for log in logs {
                    println!("    {}", log);
                }
            }

            println!(
                "\nSimulation succeeded, consumed {} compute units",
                simulation_data.value.units_consumed.unwrap_or_default()
            );
        } else {
            println_display(config, "Simulation succeeded".to_string());
        }

        Ok(None)
    } else {
        let signature = config
            .rpc_client
            .send_and_confirm_transaction_with_spinner(&transaction)
            .await
            .map_err(|e| {
                let err = TokenWrapClientError::from(e);
                match err.program_error() {
                    Some(program_error) => {
                        anyhow!("Token wrap program error: {}", program_error).into()
                    }
                    None => Error::from(err),
                }
            })?;
        Ok(Some(signature))
    }
}

#[cfg(test)]
mod tests {
    use {super::*, solana_signer::Signer};

    #[test]
    fn test_parse_token_program() {
        assert_eq!(
            parse_token_program(&spl_token::id().to_string()),
            Ok(spl_token::id())
        );
        assert_eq!(
            parse_token_program(&spl_token_2022::id().to_string()),
            Ok(spl_token_2022::id())
        );
        assert!(parse_token_program(&Pubkey::new_unique().to_string()).is_err());
    }

    #[test]
    fn test_parse_presigner() {
        let keypair = solana_keypair::Keypair::new();
        let signature = keypair.sign_message(b"message");
        let presigner =
            parse_presigner(&format!("{}={}", keypair.pubkey(), signature)).unwrap();
        assert_eq!(presigner.pubkey(), keypair.pubkey());
        assert_eq!(presigner.sign_message(b"message"), signature);

        assert!(parse_presigner(&keypair.pubkey().to_string()).is_err());
        assert!(parse_presigner(&format!("{}=nope", keypair.pubkey())).is_err());
    }
}
