//! Transaction templates and the signed artifacts built from them

use {
    crate::{
        error::TokenWrapClientError,
        multisig::{combine, CombineConfig},
        rpc::{RecencyAnchor, TokenWrapRpc},
        signer::TokenWrapSigner,
    },
    log::info,
    serde_derive::{Deserialize, Serialize},
    serde_with::{base64::Base64, serde_as, DisplayFromStr},
    solana_instruction::Instruction,
    solana_message::{v0, Message, VersionedMessage},
    solana_pubkey::Pubkey,
    solana_signature::Signature,
    solana_signer::Signer,
    solana_transaction::versioned::VersionedTransaction,
};

/// Message format to compile
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MessageVersion {
    Legacy,
    #[default]
    V0,
}

/// Unsigned transaction description.
///
/// Compilation depends only on the version, fee payer, recency anchor and
/// instruction list, so every party holding the same template compiles the
/// same message bytes.
#[derive(Clone, Debug)]
pub struct TransactionTemplate {
    fee_payer: TokenWrapSigner,
    recency_anchor: RecencyAnchor,
    version: MessageVersion,
    instructions: Vec<Instruction>,
    signers: Vec<TokenWrapSigner>,
}

impl TransactionTemplate {
    pub fn new(fee_payer: impl Into<TokenWrapSigner>, recency_anchor: RecencyAnchor) -> Self {
        Self {
            fee_payer: fee_payer.into(),
            recency_anchor,
            version: MessageVersion::default(),
            instructions: vec![],
            signers: vec![],
        }
    }

    pub fn with_version(mut self, version: MessageVersion) -> Self {
        self.version = version;
        self
    }

    /// Appends an instruction, keeping caller order
    pub fn with_instruction(mut self, instruction: Instruction) -> Self {
        self.instructions.push(instruction);
        self
    }

    pub fn with_instructions(mut self, instructions: impl IntoIterator<Item = Instruction>) -> Self {
        self.instructions.extend(instructions);
        self
    }

    /// Registers a signer besides the fee payer
    pub fn with_signer(mut self, signer: impl Into<TokenWrapSigner>) -> Self {
        self.signers.push(signer.into());
        self
    }

    pub fn with_signers(mut self, signers: impl IntoIterator<Item = TokenWrapSigner>) -> Self {
        self.signers.extend(signers);
        self
    }

    pub fn fee_payer(&self) -> Pubkey {
        self.fee_payer.pubkey()
    }

    pub fn recency_anchor(&self) -> &RecencyAnchor {
        &self.recency_anchor
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Compiles the message. Version 0 messages use no lookup tables.
    pub fn compile(&self) -> Result<VersionedMessage, TokenWrapClientError> {
        let payer = self.fee_payer.pubkey();
        let blockhash = self.recency_anchor.blockhash;
        Ok(match self.version {
            MessageVersion::Legacy => VersionedMessage::Legacy(Message::new_with_blockhash(
                &self.instructions,
                Some(&payer),
                &blockhash,
            )),
            MessageVersion::V0 => VersionedMessage::V0(v0::Message::try_compile(
                &payer,
                &self.instructions,
                &[],
                blockhash,
            )?),
        })
    }

    /// Canonical bytes every signer signs
    pub fn message_bytes(&self) -> Result<Vec<u8>, TokenWrapClientError> {
        Ok(self.compile()?.serialize())
    }

    /// Compiles the message and signs it with every concrete signer.
    ///
    /// Placeholder signers leave their slot absent. A signer whose key the
    /// message does not require is rejected.
    pub fn partially_sign(&self) -> Result<PartiallySignedTransaction, TokenWrapClientError> {
        let message = self.compile()?;
        let message_bytes = message.serialize();
        let required = required_signers(&message);

        let candidates = std::iter::once(&self.fee_payer).chain(self.signers.iter());
        let mut signatures = SignatureMap::unsigned(required.iter().copied());
        for signer in candidates {
            let pubkey = signer.pubkey();
            if !required.contains(&pubkey) {
                return Err(TokenWrapClientError::UnexpectedSigner(pubkey));
            }
            if signatures.get(&pubkey).flatten().is_some() {
                continue;
            }
            if let Some(signature) = signer.try_sign(&message_bytes)? {
                signatures.insert(pubkey, signature);
            }
        }

        info!(
            "Compiled {:?} message with {} instruction(s), {}/{} required signatures present",
            self.version,
            self.instructions.len(),
            signatures.present_count(),
            signatures.len(),
        );

        Ok(PartiallySignedTransaction::new(
            message_bytes,
            signatures,
            self.recency_anchor.last_valid_block_height,
        ))
    }
}

/// Required signers of a message, in the order its signatures are laid out
pub fn required_signers(message: &VersionedMessage) -> Vec<Pubkey> {
    let keys = message.static_account_keys();
    let count = usize::from(message.header().num_required_signatures).min(keys.len());
    keys[..count].to_vec()
}

/// Serialized form of one [`SignatureMap`] slot
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureEntry {
    #[serde_as(as = "DisplayFromStr")]
    pub pubkey: Pubkey,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub signature: Option<Signature>,
}

/// Signer address to signature, absent until collected.
///
/// Iteration follows insertion order, which for a compiled template is the
/// message's required-signer order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<SignatureEntry>", into = "Vec<SignatureEntry>")]
pub struct SignatureMap(Vec<(Pubkey, Option<Signature>)>);

impl SignatureMap {
    /// Map with every given signer absent
    pub fn unsigned(signers: impl IntoIterator<Item = Pubkey>) -> Self {
        Self(signers.into_iter().map(|pubkey| (pubkey, None)).collect())
    }

    /// `None` if `pubkey` has no slot, `Some(None)` if its signature is absent
    pub fn get(&self, pubkey: &Pubkey) -> Option<Option<Signature>> {
        self.0
            .iter()
            .find(|(key, _)| key == pubkey)
            .map(|(_, signature)| *signature)
    }

    /// Sets the signature of `pubkey`, appending a slot if it has none
    pub fn insert(&mut self, pubkey: Pubkey, signature: Signature) {
        match self.0.iter_mut().find(|(key, _)| *key == pubkey) {
            Some((_, slot)) => *slot = Some(signature),
            None => self.0.push((pubkey, Some(signature))),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Pubkey, Option<&Signature>)> {
        self.0
            .iter()
            .map(|(pubkey, signature)| (pubkey, signature.as_ref()))
    }

    pub fn pubkeys(&self) -> impl Iterator<Item = &Pubkey> {
        self.0.iter().map(|(pubkey, _)| pubkey)
    }

    /// Signers whose signature is still absent, in map order
    pub fn missing(&self) -> Vec<Pubkey> {
        self.0
            .iter()
            .filter(|(_, signature)| signature.is_none())
            .map(|(pubkey, _)| *pubkey)
            .collect()
    }

    pub fn present_count(&self) -> usize {
        self.0.iter().filter(|(_, s)| s.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.0.iter().all(|(_, signature)| signature.is_some())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<SignatureEntry>> for SignatureMap {
    fn from(entries: Vec<SignatureEntry>) -> Self {
        Self(
            entries
                .into_iter()
                .map(|entry| (entry.pubkey, entry.signature))
                .collect(),
        )
    }
}

impl From<SignatureMap> for Vec<SignatureEntry> {
    fn from(map: SignatureMap) -> Self {
        map.0
            .into_iter()
            .map(|(pubkey, signature)| SignatureEntry { pubkey, signature })
            .collect()
    }
}

impl FromIterator<(Pubkey, Option<Signature>)> for SignatureMap {
    fn from_iter<T: IntoIterator<Item = (Pubkey, Option<Signature>)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Message bytes with whatever signatures one party could attach.
///
/// This is the artifact exchanged out of band between signers. It is never
/// mutated; adding a signature yields a new value.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartiallySignedTransaction {
    #[serde_as(as = "Base64")]
    message: Vec<u8>,
    signatures: SignatureMap,
    last_valid_block_height: u64,
}

impl PartiallySignedTransaction {
    pub fn new(message: Vec<u8>, signatures: SignatureMap, last_valid_block_height: u64) -> Self {
        Self {
            message,
            signatures,
            last_valid_block_height,
        }
    }

    pub fn message_bytes(&self) -> &[u8] {
        &self.message
    }

    pub fn signatures(&self) -> &SignatureMap {
        &self.signatures
    }

    pub fn last_valid_block_height(&self) -> u64 {
        self.last_valid_block_height
    }

    /// Decodes the message bytes, which must be exactly the serialization
    /// of the decoded message
    pub fn decode_message(&self) -> Result<VersionedMessage, TokenWrapClientError> {
        let message: VersionedMessage = bincode::deserialize(&self.message)?;
        if message.serialize() != self.message {
            return Err(TokenWrapClientError::NonCanonicalMessage);
        }
        Ok(message)
    }

    pub fn is_fully_signed(&self) -> bool {
        self.signatures.is_complete()
    }

    /// Present signatures as `PUBKEY=SIGNATURE`, the form accepted back by
    /// presigner arguments
    pub fn presigner_pairs(&self) -> Vec<String> {
        self.signatures
            .iter()
            .filter_map(|(pubkey, signature)| signature.map(|s| format!("{pubkey}={s}")))
            .collect()
    }

    /// Returns a copy with `signer`'s signature added
    pub fn countersign(&self, signer: &dyn Signer) -> Result<Self, TokenWrapClientError> {
        let pubkey = signer.pubkey();
        if self.signatures.get(&pubkey).is_none() {
            return Err(TokenWrapClientError::UnexpectedSigner(pubkey));
        }
        let mut signatures = self.signatures.clone();
        signatures.insert(pubkey, signer.try_sign_message(&self.message)?);
        Ok(Self::new(
            self.message.clone(),
            signatures,
            self.last_valid_block_height,
        ))
    }

    pub fn to_json(&self) -> Result<String, TokenWrapClientError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, TokenWrapClientError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks that this transaction alone carries every signature
    pub fn into_fully_signed(self) -> Result<FullySignedTransaction, TokenWrapClientError> {
        combine([self], CombineConfig::default())
    }
}

/// Transaction carrying a signature for every required signer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FullySignedTransaction {
    message: VersionedMessage,
    message_bytes: Vec<u8>,
    signatures: SignatureMap,
    last_valid_block_height: u64,
}

impl FullySignedTransaction {
    pub(crate) fn new(
        message: VersionedMessage,
        message_bytes: Vec<u8>,
        signatures: SignatureMap,
        last_valid_block_height: u64,
    ) -> Result<Self, TokenWrapClientError> {
        if message.serialize() != message_bytes {
            return Err(TokenWrapClientError::NonCanonicalMessage);
        }
        let missing: Vec<Pubkey> = required_signers(&message)
            .into_iter()
            .filter(|pubkey| signatures.get(pubkey).flatten().is_none())
            .collect();
        if !missing.is_empty() {
            return Err(TokenWrapClientError::MissingSignatures(missing));
        }
        Ok(Self {
            message,
            message_bytes,
            signatures,
            last_valid_block_height,
        })
    }

    pub fn message(&self) -> &VersionedMessage {
        &self.message
    }

    pub fn message_bytes(&self) -> &[u8] {
        &self.message_bytes
    }

    /// Merged signatures in canonical order
    pub fn signatures(&self) -> &SignatureMap {
        &self.signatures
    }

    pub fn last_valid_block_height(&self) -> u64 {
        self.last_valid_block_height
    }

    /// Wire transaction, signatures laid out in the message's signer order
    pub fn to_versioned_transaction(&self) -> VersionedTransaction {
        let signatures = required_signers(&self.message)
            .iter()
            .map(|pubkey| self.signatures.get(pubkey).flatten().unwrap_or_default())
            .collect();
        VersionedTransaction {
            signatures,
            message: self.message.clone(),
        }
    }

    /// Submits the transaction
    pub async fn submit<R: TokenWrapRpc + ?Sized>(
        &self,
        rpc: &R,
    ) -> Result<Signature, TokenWrapClientError> {
        let signature = rpc
            .submit_and_confirm(&self.to_versioned_transaction())
            .await?;
        info!("Submitted transaction {signature}");
        Ok(signature)
    }

    /// Same transaction in the out-of-band exchange form
    pub fn to_partially_signed(&self) -> PartiallySignedTransaction {
        PartiallySignedTransaction::new(
            self.message_bytes.clone(),
            self.signatures.clone(),
            self.last_valid_block_height,
        )
    }
}
