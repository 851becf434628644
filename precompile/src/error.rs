use harness_rpc_client::RpcError;
use harness_tx::TxError;
use harness_types::{TxHash, H256};

use crate::word::ParseWordError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The name is not part of the precompile's selector table.
    #[error("unknown selector: {0}")]
    UnknownSelector(String),

    #[error("invalid parameter #{index}: {source}")]
    InvalidParameter {
        index: usize,
        #[source]
        source: ParseWordError,
    },

    #[error("function {0} declared twice")]
    DuplicateSelector(String),

    #[error("malformed function signature: {0:?}")]
    MalformedSignature(String),

    #[error("unknown precompile: {0}")]
    UnknownPrecompile(String),

    /// The receipt points to a block the node doesn't know.
    #[error("transaction {tx_hash:?} included in unknown block {block_hash:?}")]
    UnknownBlock { tx_hash: TxHash, block_hash: H256 },

    #[error(transparent)]
    Tx(#[from] TxError),

    #[error(transparent)]
    Rpc(#[from] RpcError),
}
