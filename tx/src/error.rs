use harness_rpc_client::RpcError;
use harness_types::{ext::rlp::DecoderError, ext::secp256k1, Address};

/// Malformed or contradictory request, detected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("conflicting fee fields")]
    ConflictingFeeFields,
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("access list not supported by legacy envelope")]
    AccessListOnLegacy,
    #[error("chain id {0} out of range")]
    ChainIdOutOfRange(u64),
    #[error("sender does not match signing key: request from {expected:?}, key of {actual:?}")]
    SenderMismatch { expected: Address, actual: Address },
}

#[derive(Debug, thiserror::Error)]
pub enum TxError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Key material invalid or signing failed.
    #[error("signing failed: {0}")]
    Signing(#[from] secp256k1::Error),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("malformed raw transaction: {0}")]
    Decode(#[from] DecoderError),
}
