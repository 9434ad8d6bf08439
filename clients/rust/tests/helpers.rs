#![allow(dead_code)]

use {
    async_trait::async_trait,
    solana_account::Account,
    solana_hash::Hash,
    solana_keypair::Keypair,
    solana_pubkey::Pubkey,
    solana_signature::Signature,
    solana_signer::Signer,
    solana_transaction::versioned::VersionedTransaction,
    spl_token_2022::{
        solana_program::program_pack::Pack,
        state::{Account as TokenAccount, AccountState, Mint},
    },
    spl_token_wrap_client::{
        interface::{get_wrapped_mint_address, state::Backpointer},
        RecencyAnchor, TokenWrapClientError, TokenWrapRpc, TokenWrapSigner,
    },
    std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    },
};

pub const LAMPORTS_PER_BYTE: u64 = 6_960;

/// In-memory chain state
pub struct MockRpc {
    accounts: Mutex<HashMap<Pubkey, Account>>,
    submitted: Mutex<Vec<VersionedTransaction>>,
    pub anchor: RecencyAnchor,
}

impl Default for MockRpc {
    fn default() -> Self {
        Self {
            accounts: Mutex::default(),
            submitted: Mutex::default(),
            anchor: RecencyAnchor::new(Hash::new_unique(), 1_000),
        }
    }
}

impl MockRpc {
    pub fn set_account(&self, address: Pubkey, account: Account) {
        self.accounts.lock().unwrap().insert(address, account);
    }

    pub fn submitted(&self) -> Vec<VersionedTransaction> {
        self.submitted.lock().unwrap().clone()
    }

    /// Adds an initialized mint owned by `token_program`
    pub fn add_mint(&self, token_program: &Pubkey) -> Pubkey {
        let address = Pubkey::new_unique();
        let mut data = vec![0; Mint::LEN];
        Mint::pack(
            Mint {
                decimals: 6,
                is_initialized: true,
                ..Mint::default()
            },
            &mut data,
        )
        .unwrap();
        self.set_account(address, account(*token_program, data));
        address
    }

    /// Adds an initialized token account owned by `token_program`
    pub fn add_token_account(
        &self,
        token_program: &Pubkey,
        mint: &Pubkey,
        owner: &Pubkey,
        amount: u64,
    ) -> Pubkey {
        let address = Pubkey::new_unique();
        let mut data = vec![0; TokenAccount::LEN];
        TokenAccount::pack(
            TokenAccount {
                mint: *mint,
                owner: *owner,
                amount,
                state: AccountState::Initialized,
                ..TokenAccount::default()
            },
            &mut data,
        )
        .unwrap();
        self.set_account(address, account(*token_program, data));
        address
    }

    /// Writes the backpointer of the wrapped mint of `unwrapped_mint`
    pub fn add_backpointer(&self, unwrapped_mint: &Pubkey, wrapped_token_program: &Pubkey) -> Pubkey {
        let wrapped_mint = get_wrapped_mint_address(unwrapped_mint, wrapped_token_program).unwrap();
        let address =
            spl_token_wrap_client::interface::get_wrapped_mint_backpointer_address(&wrapped_mint)
                .unwrap();
        let backpointer = Backpointer {
            unwrapped_mint: *unwrapped_mint,
        };
        self.set_account(
            address,
            account(
                spl_token_wrap_client::interface::id(),
                bytemuck::bytes_of(&backpointer).to_vec(),
            ),
        );
        wrapped_mint
    }
}

pub fn account(owner: Pubkey, data: Vec<u8>) -> Account {
    Account {
        lamports: rent(data.len()),
        data,
        owner,
        executable: false,
        rent_epoch: 0,
    }
}

pub fn rent(data_len: usize) -> u64 {
    (data_len as u64 + 128) * LAMPORTS_PER_BYTE
}

#[async_trait]
impl TokenWrapRpc for MockRpc {
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, TokenWrapClientError> {
        Ok(self.accounts.lock().unwrap().get(address).cloned())
    }

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, TokenWrapClientError> {
        Ok(rent(data_len))
    }

    async fn get_latest_recency_anchor(&self) -> Result<RecencyAnchor, TokenWrapClientError> {
        Ok(self.anchor)
    }

    async fn submit_and_confirm(
        &self,
        transaction: &VersionedTransaction,
    ) -> Result<Signature, TokenWrapClientError> {
        let message_bytes = transaction.message.serialize();
        let keys = transaction.message.static_account_keys();
        assert!(transaction
            .signatures
            .iter()
            .zip(keys)
            .all(|(signature, key)| signature.verify(key.as_ref(), &message_bytes)));
        self.submitted.lock().unwrap().push(transaction.clone());
        Ok(transaction.signatures[0])
    }
}

pub fn concrete(keypair: &Arc<Keypair>) -> TokenWrapSigner {
    TokenWrapSigner::Concrete(keypair.clone())
}

pub fn keypairs(n: usize) -> Vec<Arc<Keypair>> {
    (0..n).map(|_| Arc::new(Keypair::new())).collect()
}

pub fn pubkeys(keypairs: &[Arc<Keypair>]) -> Vec<Pubkey> {
    keypairs.iter().map(|k| k.pubkey()).collect()
}
