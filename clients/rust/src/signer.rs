//! Signers that either hold a signing capability or only an identity

use {
    crate::error::TokenWrapClientError,
    solana_pubkey::Pubkey,
    solana_signature::Signature,
    solana_signer::{Signer, SignerError},
    spl_token_2022::instruction::MAX_SIGNERS,
    std::{fmt, sync::Arc},
};

/// A party whose signature a transaction requires.
///
/// Only `Concrete` can produce a signature. `Placeholder` carries the
/// identity needed to compile the message while the signature itself is
/// collected later, usually on another machine.
#[derive(Clone)]
pub enum TokenWrapSigner {
    /// Signer able to sign now
    Concrete(Arc<dyn Signer>),
    /// Address whose signature arrives out of band
    Placeholder(Pubkey),
}

impl TokenWrapSigner {
    /// Address of the signer
    pub fn pubkey(&self) -> Pubkey {
        match self {
            Self::Concrete(signer) => signer.pubkey(),
            Self::Placeholder(pubkey) => *pubkey,
        }
    }

    /// Whether a signature can be produced right now
    pub fn is_concrete(&self) -> bool {
        matches!(self, Self::Concrete(_))
    }

    /// Signs `message`, or returns `None` when no signature is available.
    ///
    /// A concrete signer that yields the default signature (a `NullSigner`
    /// standing in for an offline key) is treated as absent too.
    pub fn try_sign(&self, message: &[u8]) -> Result<Option<Signature>, SignerError> {
        match self {
            Self::Concrete(signer) => {
                let signature = signer.try_sign_message(message)?;
                Ok((signature != Signature::default()).then_some(signature))
            }
            Self::Placeholder(_) => Ok(None),
        }
    }
}

impl From<Arc<dyn Signer>> for TokenWrapSigner {
    fn from(signer: Arc<dyn Signer>) -> Self {
        Self::Concrete(signer)
    }
}

impl From<Pubkey> for TokenWrapSigner {
    fn from(pubkey: Pubkey) -> Self {
        Self::Placeholder(pubkey)
    }
}

impl fmt::Debug for TokenWrapSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concrete(signer) => f.debug_tuple("Concrete").field(&signer.pubkey()).finish(),
            Self::Placeholder(pubkey) => f.debug_tuple("Placeholder").field(pubkey).finish(),
        }
    }
}

impl PartialEq for TokenWrapSigner {
    fn eq(&self, other: &Self) -> bool {
        self.pubkey() == other.pubkey() && self.is_concrete() == other.is_concrete()
    }
}

/// Transfer authority of a wrap or unwrap, either a single key or a multisig
/// account with the member keys that will sign
#[derive(Clone, Debug, PartialEq)]
pub struct TransferAuthority {
    authority: TokenWrapSigner,
    multisig_signers: Vec<TokenWrapSigner>,
}

impl TransferAuthority {
    /// Authority that signs for itself
    pub fn single(authority: impl Into<TokenWrapSigner>) -> Self {
        Self {
            authority: authority.into(),
            multisig_signers: vec![],
        }
    }

    /// Multisig account and the members signing on its behalf
    pub fn multisig(
        multisig: Pubkey,
        signers: Vec<TokenWrapSigner>,
    ) -> Result<Self, TokenWrapClientError> {
        if signers.len() > MAX_SIGNERS {
            return Err(TokenWrapClientError::TooManyMultisigSigners {
                count: signers.len(),
                max: MAX_SIGNERS,
            });
        }
        Ok(Self {
            authority: TokenWrapSigner::Placeholder(multisig),
            multisig_signers: signers,
        })
    }

    pub fn pubkey(&self) -> Pubkey {
        self.authority.pubkey()
    }

    pub fn is_multisig(&self) -> bool {
        !self.multisig_signers.is_empty()
    }

    pub fn multisig_pubkeys(&self) -> Vec<Pubkey> {
        self.multisig_signers.iter().map(TokenWrapSigner::pubkey).collect()
    }

    /// Parties whose signatures the instruction requires
    pub fn signers(&self) -> Vec<TokenWrapSigner> {
        if self.is_multisig() {
            self.multisig_signers.clone()
        } else {
            vec![self.authority.clone()]
        }
    }
}
