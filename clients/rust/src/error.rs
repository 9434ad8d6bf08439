//! Error types

use {
    solana_instruction::error::InstructionError,
    solana_message::CompileError,
    solana_program_error::ProgramError,
    solana_pubkey::Pubkey,
    solana_rpc_client_api::client_error::Error as ClientError,
    solana_signer::SignerError,
    solana_transaction_error::TransactionError,
    spl_token_wrap_interface::error::{AddressDerivationError, TokenWrapError},
    thiserror::Error,
};

/// Errors returned by the Token Wrap client
#[derive(Debug, Error)]
pub enum TokenWrapClientError {
    /// A program address could not be derived from its seeds
    #[error(transparent)]
    AddressDerivation(#[from] AddressDerivationError),

    /// The account does not exist on-chain
    #[error("Account {0} not found")]
    AccountNotFound(Pubkey),

    /// The account data does not match the expected layout
    #[error("Failed to decode account {address}: {reason}")]
    DecodeError {
        /// Account that failed to decode
        address: Pubkey,
        /// Decoder message
        reason: String,
    },

    /// A caller supplied value disagrees with chain state
    #[error("Provided {what} {provided} does not match actual {actual}")]
    ResolutionMismatch {
        /// Name of the resolved field
        what: &'static str,
        /// Value supplied by the caller
        provided: Pubkey,
        /// Value found on-chain or derived
        actual: Pubkey,
    },

    /// Offline resolution needs a value that was not supplied
    #[error("{0} must be provided when resolving offline")]
    MissingOfflineArgument(&'static str),

    /// More multisig signers than a multisig account can register
    #[error("{count} multisig signers given, at most {max} are allowed")]
    TooManyMultisigSigners {
        /// Number of signers given
        count: usize,
        /// Maximum number of signers
        max: usize,
    },

    /// The escrow account exists and creation was not idempotent
    #[error("Escrow account {0} already exists")]
    EscrowAlreadyExists(Pubkey),

    /// Local program-level computation failed
    #[error(transparent)]
    Program(#[from] ProgramError),

    /// The transaction message could not be compiled
    #[error(transparent)]
    MessageCompile(#[from] CompileError),

    /// A signing capability failed
    #[error(transparent)]
    Signing(#[from] SignerError),

    /// A signer was supplied for a key the message does not require
    #[error("{0} is not a required signer of this message")]
    UnexpectedSigner(Pubkey),

    /// No partially signed transactions were supplied
    #[error("No partially signed transactions to combine")]
    EmptyRound,

    /// Independently built messages differ
    #[error("Message of transaction {index} differs from transaction 0")]
    InconsistentMessages {
        /// Index of the first divergent transaction
        index: usize,
    },

    /// Message bytes do not re-encode to themselves
    #[error("Message bytes are not in canonical form")]
    NonCanonicalMessage,

    /// A signature map does not cover the message's required signers
    #[error("Signers of transaction {index} do not match the message's required signers")]
    SignerSetMismatch {
        /// Index of the offending transaction
        index: usize,
    },

    /// A provided signature does not verify against the message
    #[error("Signature for {signer} in transaction {index} failed verification")]
    InvalidSignature {
        /// Signer whose signature is invalid
        signer: Pubkey,
        /// Index of the offending transaction
        index: usize,
    },

    /// Required signatures are still absent after merging
    #[error("Missing signatures for: {}", format_pubkeys(.0))]
    MissingSignatures(Vec<Pubkey>),

    /// Exchange format could not be read or written
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// RPC or submission failure, surfaced verbatim
    #[error(transparent)]
    Rpc(#[from] Box<ClientError>),
}

impl From<ClientError> for TokenWrapClientError {
    fn from(e: ClientError) -> Self {
        Self::Rpc(Box::new(e))
    }
}

impl From<bincode::Error> for TokenWrapClientError {
    fn from(e: bincode::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for TokenWrapClientError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl TokenWrapClientError {
    /// Token Wrap program error behind a failed submission, if any.
    ///
    /// Custom codes are not tagged with the program that raised them, so a
    /// code coming from another program in the same transaction is read as a
    /// Token Wrap code too.
    pub fn program_error(&self) -> Option<TokenWrapError> {
        match self {
            Self::Rpc(err) => match err.get_transaction_error()? {
                TransactionError::InstructionError(_, InstructionError::Custom(code)) => {
                    TokenWrapError::from_code(code)
                }
                _ => None,
            },
            _ => None,
        }
    }
}

fn format_pubkeys(pubkeys: &[Pubkey]) -> String {
    pubkeys
        .iter()
        .map(Pubkey::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        solana_rpc_client_api::client_error::{Error as ClientError, ErrorKind},
    };

    #[test]
    fn test_missing_signatures_names_every_signer() {
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        let err = TokenWrapClientError::MissingSignatures(vec![a, b]);
        assert_eq!(err.to_string(), format!("Missing signatures for: {a}, {b}"));
    }

    #[test]
    fn test_program_error_from_submission() {
        let err: TokenWrapClientError = ClientError::from(ErrorKind::TransactionError(
            TransactionError::InstructionError(0, InstructionError::Custom(2)),
        ))
        .into();
        assert_eq!(err.program_error(), Some(TokenWrapError::ZeroWrapAmount));

        let err: TokenWrapClientError = ClientError::from(ErrorKind::TransactionError(
            TransactionError::BlockhashNotFound,
        ))
        .into();
        assert_eq!(err.program_error(), None);
    }
}
