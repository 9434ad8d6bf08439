//! Error types

use {
    num_derive::FromPrimitive,
    num_traits::FromPrimitive,
    solana_program_error::ProgramError,
    std::convert::TryFrom,
    thiserror::Error,
};

/// Errors that may be returned by the Token Wrap program.
///
/// Codes are assigned in declaration order and match the custom error codes
/// emitted on-chain.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq, FromPrimitive)]
pub enum TokenWrapError {
    // 0
    /// Wrapped mint account address does not match expected PDA
    #[error("Wrapped mint account address does not match expected PDA")]
    WrappedMintMismatch,
    /// Wrapped backpointer account address does not match expected PDA
    #[error("Wrapped backpointer account address does not match expected PDA")]
    BackpointerMismatch,
    /// Wrap amount should be positive
    #[error("Wrap amount should be positive")]
    ZeroWrapAmount,
    /// Wrapped mint authority does not match expected PDA
    #[error("Wrapped mint authority does not match expected PDA")]
    MintAuthorityMismatch,
    /// Unwrapped escrow token owner is not set to expected PDA
    #[error("Unwrapped escrow token owner is not set to expected PDA")]
    EscrowOwnerMismatch,

    // 5
    /// Wrapped mint account owner is not the expected token program
    #[error("Wrapped mint account owner is not the expected token program")]
    InvalidWrappedMintOwner,
    /// Wrapped backpointer account owner is not the expected token wrap program
    #[error("Wrapped backpointer account owner is not the expected token wrap program")]
    InvalidBackpointerOwner,
    /// Escrow account address does not match expected `ATA`
    #[error("Escrow account address does not match expected ATA")]
    EscrowMismatch,
    /// The escrow account is in a good state and cannot be recreated
    #[error("The escrow account is in a good state and cannot be recreated")]
    EscrowInGoodState,
    /// Unwrapped mint does not have the `TokenMetadata` extension
    #[error("Unwrapped mint does not have the TokenMetadata extension")]
    UnwrappedMintHasNoMetadata,

    // 10
    /// `Metaplex` metadata account address does not match expected PDA
    #[error("Metaplex metadata account address does not match expected PDA")]
    MetaplexMetadataMismatch,
    /// Metadata pointer extension missing on mint
    #[error("Metadata pointer extension missing on mint")]
    MetadataPointerMissing,
    /// Metadata pointer is unset (None)
    #[error("Metadata pointer is unset (None)")]
    MetadataPointerUnset,
    /// Provided source metadata account does not match pointer
    #[error("Provided source metadata account does not match pointer")]
    MetadataPointerMismatch,
    /// External metadata program returned no data
    #[error("External metadata program returned no data")]
    ExternalProgramReturnedNoData,

    // 15
    /// Instruction can only be used with spl-token wrapped mints
    #[error("Instruction can only be used with spl-token wrapped mints")]
    NoSyncingToToken2022,
}

impl TokenWrapError {
    /// Looks up the program error carried by a custom error code
    pub fn from_code(code: u32) -> Option<Self> {
        Self::from_u32(code)
    }
}

impl From<TokenWrapError> for ProgramError {
    fn from(e: TokenWrapError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl TryFrom<u32> for TokenWrapError {
    type Error = ProgramError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        TokenWrapError::from_u32(value).ok_or(ProgramError::InvalidArgument)
    }
}

/// Errors raised while deriving program addresses
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum AddressDerivationError {
    /// A single seed is longer than the runtime allows
    #[error("Seed of {len} bytes exceeds the maximum of {max}")]
    MaxSeedLengthExceeded {
        /// Length of the offending seed
        len: usize,
        /// Maximum seed length
        max: usize,
    },
    /// More seeds were given than fit next to the bump seed
    #[error("{count} seeds given, at most {max} are allowed")]
    TooManySeeds {
        /// Number of seeds given
        count: usize,
        /// Maximum number of seeds
        max: usize,
    },
    /// Every bump seed produced an on-curve address
    #[error("Unable to find a viable program address bump seed")]
    NoViableBump,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_round_trip_through_program_error() {
        assert_eq!(
            ProgramError::from(TokenWrapError::ZeroWrapAmount),
            ProgramError::Custom(2)
        );
        assert_eq!(
            TokenWrapError::from_code(15),
            Some(TokenWrapError::NoSyncingToToken2022)
        );
        assert_eq!(TokenWrapError::from_code(16), None);
        assert_eq!(
            TokenWrapError::try_from(99),
            Err(ProgramError::InvalidArgument)
        );
    }
}
