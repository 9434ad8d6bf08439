//! Network capability consumed by the client

use {
    crate::error::TokenWrapClientError,
    async_trait::async_trait,
    serde_derive::{Deserialize, Serialize},
    serde_with::{serde_as, DisplayFromStr},
    solana_account::Account,
    solana_client::nonblocking::rpc_client::RpcClient,
    solana_hash::Hash,
    solana_pubkey::Pubkey,
    solana_signature::Signature,
    solana_transaction::versioned::VersionedTransaction,
};

/// A recent block hash and the last block height at which a transaction
/// referencing it can still land
#[serde_as]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecencyAnchor {
    /// Recent block hash
    #[serde_as(as = "DisplayFromStr")]
    pub blockhash: Hash,
    /// Expiry height
    pub last_valid_block_height: u64,
}

impl RecencyAnchor {
    /// Creates an anchor from a block hash and its expiry height
    pub fn new(blockhash: Hash, last_valid_block_height: u64) -> Self {
        Self {
            blockhash,
            last_valid_block_height,
        }
    }
}

/// Chain access needed to resolve accounts and submit transactions
#[async_trait]
pub trait TokenWrapRpc: Send + Sync {
    /// Fetches an account, `None` if it does not exist
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, TokenWrapClientError>;

    /// Minimum lamports for an account of `data_len` bytes to be rent exempt
    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, TokenWrapClientError>;

    /// Latest block hash with its expiry height
    async fn get_latest_recency_anchor(&self) -> Result<RecencyAnchor, TokenWrapClientError>;

    /// Submits a fully signed transaction and waits for confirmation
    async fn submit_and_confirm(
        &self,
        transaction: &VersionedTransaction,
    ) -> Result<Signature, TokenWrapClientError>;
}

#[async_trait]
impl TokenWrapRpc for RpcClient {
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, TokenWrapClientError> {
        Ok(self
            .get_account_with_commitment(address, self.commitment())
            .await?
            .value)
    }

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, TokenWrapClientError> {
        Ok(RpcClient::get_minimum_balance_for_rent_exemption(self, data_len).await?)
    }

    async fn get_latest_recency_anchor(&self) -> Result<RecencyAnchor, TokenWrapClientError> {
        let (blockhash, last_valid_block_height) = self
            .get_latest_blockhash_with_commitment(self.commitment())
            .await?;
        Ok(RecencyAnchor::new(blockhash, last_valid_block_height))
    }

    async fn submit_and_confirm(
        &self,
        transaction: &VersionedTransaction,
    ) -> Result<Signature, TokenWrapClientError> {
        Ok(self.send_and_confirm_transaction(transaction).await?)
    }
}
