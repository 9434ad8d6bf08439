//! Lookups that fill in addresses the caller did not supply

use {
    crate::{error::TokenWrapClientError, rpc::TokenWrapRpc},
    log::debug,
    solana_account::Account,
    solana_pubkey::Pubkey,
    spl_token_2022::{
        extension::PodStateWithExtensions,
        pod::{PodAccount, PodMint},
    },
    spl_token_wrap_interface::{get_wrapped_mint_backpointer_address_for_program, state::Backpointer},
};

/// Fields of a token account the client cares about
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenAccountInfo {
    /// Address of the token account
    pub address: Pubkey,
    /// Token program owning the account
    pub token_program: Pubkey,
    /// Mint of the tokens held
    pub mint: Pubkey,
    /// Owner of the tokens held
    pub owner: Pubkey,
    /// Token balance
    pub amount: u64,
}

/// Read-only account lookups over a [`TokenWrapRpc`].
///
/// Every lookup is idempotent and independent of the others, so callers may
/// run them concurrently.
pub struct AccountResolver<'a, R: ?Sized> {
    rpc: &'a R,
}

impl<'a, R: TokenWrapRpc + ?Sized> AccountResolver<'a, R> {
    /// Creates a resolver over `rpc`
    pub fn new(rpc: &'a R) -> Self {
        Self { rpc }
    }

    /// Fetches an account, failing if it does not exist
    pub async fn fetch_account(&self, address: &Pubkey) -> Result<Account, TokenWrapClientError> {
        debug!("Fetching account {address}");
        self.rpc
            .get_account(address)
            .await?
            .ok_or(TokenWrapClientError::AccountNotFound(*address))
    }

    /// Program that owns `address`
    pub async fn resolve_owning_program(
        &self,
        address: &Pubkey,
    ) -> Result<Pubkey, TokenWrapClientError> {
        let owner = self.fetch_account(address).await?.owner;
        debug!("Account {address} is owned by {owner}");
        Ok(owner)
    }

    /// Fetches and decodes a token account of either token program
    pub async fn fetch_token_account(
        &self,
        address: &Pubkey,
    ) -> Result<TokenAccountInfo, TokenWrapClientError> {
        let account = self.fetch_account(address).await?;
        decode_token_account(address, &account)
    }

    /// Mint referenced by the token account at `address`
    pub async fn resolve_mint_of_token_account(
        &self,
        address: &Pubkey,
    ) -> Result<Pubkey, TokenWrapClientError> {
        let mint = self.fetch_token_account(address).await?.mint;
        debug!("Token account {address} holds mint {mint}");
        Ok(mint)
    }

    /// Wrapped mint referenced by a wrapped-side token account
    pub async fn resolve_wrapped_mint_from_token_account(
        &self,
        address: &Pubkey,
    ) -> Result<Pubkey, TokenWrapClientError> {
        self.resolve_mint_of_token_account(address).await
    }

    /// Reads the backpointer of `wrapped_mint` to find the mint it wraps
    pub async fn resolve_unwrapped_mint_from_backpointer(
        &self,
        wrapped_mint: &Pubkey,
        program_id: &Pubkey,
    ) -> Result<Pubkey, TokenWrapClientError> {
        let address = get_wrapped_mint_backpointer_address_for_program(wrapped_mint, program_id)?;
        let account = self.fetch_account(&address).await?;
        let backpointer = bytemuck::try_from_bytes::<Backpointer>(&account.data).map_err(|e| {
            TokenWrapClientError::DecodeError {
                address,
                reason: e.to_string(),
            }
        })?;
        debug!(
            "Wrapped mint {wrapped_mint} wraps {}",
            backpointer.unwrapped_mint
        );
        Ok(backpointer.unwrapped_mint)
    }

    /// Checks that a mint account exists and decodes, returning its token
    /// program
    pub async fn resolve_mint_program(
        &self,
        mint: &Pubkey,
    ) -> Result<Pubkey, TokenWrapClientError> {
        let account = self.fetch_account(mint).await?;
        PodStateWithExtensions::<PodMint>::unpack(&account.data).map_err(|e| {
            TokenWrapClientError::DecodeError {
                address: *mint,
                reason: e.to_string(),
            }
        })?;
        Ok(account.owner)
    }
}

/// Decodes the base token account layout shared by both token programs
pub fn decode_token_account(
    address: &Pubkey,
    account: &Account,
) -> Result<TokenAccountInfo, TokenWrapClientError> {
    let state = PodStateWithExtensions::<PodAccount>::unpack(&account.data).map_err(|e| {
        TokenWrapClientError::DecodeError {
            address: *address,
            reason: e.to_string(),
        }
    })?;
    Ok(TokenAccountInfo {
        address: *address,
        token_program: account.owner,
        mint: state.base.mint,
        owner: state.base.owner,
        amount: state.base.amount.into(),
    })
}

/// Returns `provided` after checking it against `actual`, or `actual` when
/// nothing was provided
pub(crate) fn reconcile(
    what: &'static str,
    provided: Option<Pubkey>,
    actual: Pubkey,
) -> Result<Pubkey, TokenWrapClientError> {
    match provided {
        Some(provided) if provided != actual => Err(TokenWrapClientError::ResolutionMismatch {
            what,
            provided,
            actual,
        }),
        _ => Ok(actual),
    }
}
