//! Client library for the Token Wrap program.
//!
//! Resolves the accounts of create-mint, wrap and unwrap operations, compiles
//! deterministic transaction templates that several parties can sign
//! offline, and combines their partial signatures into one broadcastable
//! transaction.

pub mod create_mint;
pub mod error;
pub mod escrow;
pub mod multisig;
pub mod pdas;
pub mod resolver;
pub mod rpc;
pub mod signer;
pub mod token_account;
pub mod transaction;
pub mod unwrap;
pub mod wrap;

pub use {
    create_mint::CreateMintPlan,
    error::TokenWrapClientError,
    escrow::{create_escrow_account_instructions, EscrowPlan},
    multisig::{combine, CombineConfig, MergedRound, MultisigCoordinator, ValidatedRound},
    pdas::WrappedMintAddresses,
    resolver::{AccountResolver, TokenAccountInfo},
    rpc::{RecencyAnchor, TokenWrapRpc},
    signer::{TokenWrapSigner, TransferAuthority},
    spl_token_wrap_interface as interface,
    token_account::create_token_account_instructions,
    transaction::{
        FullySignedTransaction, MessageVersion, PartiallySignedTransaction, SignatureMap,
        TransactionTemplate,
    },
    unwrap::{ResolvedUnwrap, UnwrapArgs},
    wrap::{ResolvedWrap, WrapArgs},
};
