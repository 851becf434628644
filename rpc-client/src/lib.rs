mod error;
pub mod jsonrpsee;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

use async_trait::async_trait;
use harness_types::{
    Address, AtBlock, Bytes, CallRequest, RpcBlock, RpcTransaction, SyncStatus,
    TransactionReceipt, TxHash,
};
pub use error::RpcError;
use ::jsonrpsee::http_client::{HttpClient, HttpClientBuilder};

/// Re-exports for downstream crates.
#[doc(hidden)]
pub mod ext {
    pub use async_trait::async_trait;
    pub use harness_types as types;
    pub use ::jsonrpsee;
}

/// The node methods the harness depends on.
#[async_trait]
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait NodeRpc {
    /// Returns the number of transactions sent from an address.
    async fn get_transaction_count(&self, account: Address, at: AtBlock)
        -> Result<u64, RpcError>;

    /// Returns the chain id used for replay-protected signing, as introduced by EIP-155.
    async fn chain_id(&self) -> Result<u64, RpcError>;

    /// Executes a message call without creating a transaction.
    async fn call(&self, tx: CallRequest, at: AtBlock) -> Result<Bytes, RpcError>;

    /// Submits a pre-signed transaction for broadcast.
    async fn send_raw_transaction(&self, tx: Bytes) -> Result<TxHash, RpcError>;

    /// Returns the receipt of a transaction by transaction hash.
    async fn transaction_receipt(&self, tx: TxHash)
        -> Result<Option<TransactionReceipt>, RpcError>;

    /// Returns information about a transaction for a given hash.
    async fn transaction_by_hash(&self, tx: TxHash) -> Result<Option<RpcTransaction>, RpcError>;

    /// Returns a block, by hash or by tag/number.
    async fn block(&self, at: AtBlock) -> Result<Option<RpcBlock>, RpcError>;

    /// Returns the node sync status.
    async fn syncing(&self) -> Result<SyncStatus, RpcError>;
}

/// [`NodeRpc`] over HTTP.
pub type HttpNode = jsonrpsee::Adapter<HttpClient>;

/// HTTP json-rpc client for `url`.
///
/// # Errors
/// Returns `Err` if the url is malformed or the client cannot be built.
pub fn http_client(url: &str) -> Result<HttpNode, RpcError> {
    let url = url::Url::parse(url)?;
    let client = HttpClientBuilder::default().build(url.as_str())?;
    log::debug!("json-rpc http client for {url}");
    Ok(jsonrpsee::Adapter(client))
}

/// Fails with [`RpcError::Syncing`] unless the node reports it is fully synced.
///
/// # Errors
/// Returns `Err` if the node is syncing or the request fails.
pub async fn ensure_synced<R: NodeRpc + Sync>(rpc: &R) -> Result<(), RpcError> {
    match rpc.syncing().await? {
        SyncStatus::NotSyncing => Ok(()),
        SyncStatus::Syncing(progress) => {
            log::warn!(
                "node is syncing: block {} of {}",
                progress.current_block,
                progress.highest_block
            );
            Err(RpcError::Syncing {
                current: progress.current_block,
                highest: progress.highest_block,
            })
        },
    }
}
