//! Combining independently signed copies of one transaction.
//!
//! A round moves through [`MultisigCoordinator`] (collecting), then
//! [`ValidatedRound`] (messages identical, signer sets checked), then
//! [`MergedRound`] (one combined signature map), and ends in a
//! [`FullySignedTransaction`]. Each step consumes the previous state, and a
//! failed step ends the round: the caller must collect fresh signatures.

use {
    crate::{
        error::TokenWrapClientError,
        transaction::{
            required_signers, FullySignedTransaction, PartiallySignedTransaction, SignatureMap,
        },
    },
    log::{debug, info, warn},
    solana_message::VersionedMessage,
    solana_pubkey::Pubkey,
    std::collections::HashSet,
};

/// Options for combining a round
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CombineConfig {
    /// Verify every present signature against the message before merging
    pub verify_signatures: bool,
}

impl Default for CombineConfig {
    fn default() -> Self {
        Self {
            verify_signatures: true,
        }
    }
}

/// Collects partially signed transactions for one round
#[derive(Clone, Debug, Default)]
pub struct MultisigCoordinator {
    config: CombineConfig,
    partials: Vec<PartiallySignedTransaction>,
}

impl MultisigCoordinator {
    pub fn new(config: CombineConfig) -> Self {
        Self {
            config,
            partials: vec![],
        }
    }

    /// Adds one party's contribution
    pub fn add(&mut self, partial: PartiallySignedTransaction) -> &mut Self {
        self.partials.push(partial);
        self
    }

    pub fn len(&self) -> usize {
        self.partials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partials.is_empty()
    }

    /// Checks that every collected message is byte-identical to the first
    /// and that every signature map covers exactly the required signers
    pub fn validate(self) -> Result<ValidatedRound, TokenWrapClientError> {
        let Self { config, partials } = self;
        let first = partials.first().ok_or(TokenWrapClientError::EmptyRound)?;

        if let Some(index) = partials
            .iter()
            .position(|partial| partial.message_bytes() != first.message_bytes())
        {
            return Err(TokenWrapClientError::InconsistentMessages { index });
        }

        let message = first.decode_message()?;
        let required = required_signers(&message);
        let required_set: HashSet<&Pubkey> = required.iter().collect();

        for (index, partial) in partials.iter().enumerate() {
            let signatures = partial.signatures();
            let set: HashSet<&Pubkey> = signatures.pubkeys().collect();
            if signatures.len() != required.len() || set != required_set {
                return Err(TokenWrapClientError::SignerSetMismatch { index });
            }

            if config.verify_signatures {
                for (signer, signature) in signatures.iter() {
                    if let Some(signature) = signature {
                        if !signature.verify(signer.as_ref(), partial.message_bytes()) {
                            return Err(TokenWrapClientError::InvalidSignature {
                                signer: *signer,
                                index,
                            });
                        }
                    }
                }
            }
        }

        debug!(
            "Validated {} partial transaction(s) over {} required signer(s)",
            partials.len(),
            required.len()
        );
        Ok(ValidatedRound { message, partials })
    }
}

/// Round whose messages are known to be identical
#[derive(Clone, Debug)]
pub struct ValidatedRound {
    message: VersionedMessage,
    partials: Vec<PartiallySignedTransaction>,
}

impl ValidatedRound {
    pub fn message(&self) -> &VersionedMessage {
        &self.message
    }

    /// Unions the signatures of every input.
    ///
    /// Signers come out in the first input's order. For each signer the first
    /// present signature wins.
    pub fn merge(self) -> MergedRound {
        let Self { message, mut partials } = self;
        // validate() guarantees at least one input
        let first = partials.remove(0);
        let rest = partials;

        let signatures: SignatureMap = first
            .signatures()
            .iter()
            .map(|(signer, signature)| {
                let mut chosen = signature.copied();
                for other in rest.iter().filter_map(|p| p.signatures().get(signer).flatten()) {
                    match chosen {
                        None => chosen = Some(other),
                        Some(existing) if existing != other => {
                            warn!("Differing signatures supplied for {signer}, keeping the first");
                        }
                        Some(_) => {}
                    }
                }
                (*signer, chosen)
            })
            .collect();

        info!(
            "Merged {} partial transaction(s), {}/{} signatures present",
            rest.len() + 1,
            signatures.present_count(),
            signatures.len()
        );

        MergedRound {
            message,
            message_bytes: first.message_bytes().to_vec(),
            last_valid_block_height: first.last_valid_block_height(),
            signatures,
        }
    }
}

/// Round with one combined signature map, possibly still incomplete
#[derive(Clone, Debug)]
pub struct MergedRound {
    message: VersionedMessage,
    message_bytes: Vec<u8>,
    signatures: SignatureMap,
    last_valid_block_height: u64,
}

impl MergedRound {
    pub fn signatures(&self) -> &SignatureMap {
        &self.signatures
    }

    /// Every signer still absent after merging
    pub fn missing_signers(&self) -> Vec<Pubkey> {
        self.signatures.missing()
    }

    /// Combined map in exchange form, for handing to the remaining signers
    pub fn to_partially_signed(&self) -> PartiallySignedTransaction {
        PartiallySignedTransaction::new(
            self.message_bytes.clone(),
            self.signatures.clone(),
            self.last_valid_block_height,
        )
    }

    /// Fails with every absent signer if the map is incomplete
    pub fn complete(self) -> Result<FullySignedTransaction, TokenWrapClientError> {
        let missing = self.missing_signers();
        if !missing.is_empty() {
            return Err(TokenWrapClientError::MissingSignatures(missing));
        }
        FullySignedTransaction::new(
            self.message,
            self.message_bytes,
            self.signatures,
            self.last_valid_block_height,
        )
    }
}

/// Validates, merges and completes a round in one call.
///
/// The expiry height is taken from the first input.
pub fn combine(
    partials: impl IntoIterator<Item = PartiallySignedTransaction>,
    config: CombineConfig,
) -> Result<FullySignedTransaction, TokenWrapClientError> {
    let mut coordinator = MultisigCoordinator::new(config);
    for partial in partials {
        coordinator.add(partial);
    }
    coordinator.validate()?.merge().complete()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_round() {
        assert!(matches!(
            combine(vec![], CombineConfig::default()),
            Err(TokenWrapClientError::EmptyRound)
        ));
    }

    #[test]
    fn test_inconsistent_bytes_detected_before_decoding() {
        let a = PartiallySignedTransaction::new(vec![1, 2, 3], SignatureMap::default(), 0);
        let b = PartiallySignedTransaction::new(vec![1, 2, 4], SignatureMap::default(), 0);
        assert!(matches!(
            combine(vec![a.clone(), a, b], CombineConfig::default()),
            Err(TokenWrapClientError::InconsistentMessages { index: 2 })
        ));
    }

    #[test]
    fn test_undecodable_message() {
        let a = PartiallySignedTransaction::new(vec![0xff], SignatureMap::default(), 0);
        assert!(matches!(
            combine(vec![a], CombineConfig::default()),
            Err(TokenWrapClientError::Serialization(_))
        ));
    }

    #[test]
    fn test_default_verifies_signatures() {
        assert!(CombineConfig::default().verify_signatures);
    }
}
