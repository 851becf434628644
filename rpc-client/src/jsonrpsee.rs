use core::ops::Deref;

use crate::{NodeRpc, RpcError};
use harness_types::{
    AtBlock, Bytes, CallRequest, RpcBlock, RpcTransaction, SyncStatus,
    TransactionReceipt, TxHash, U256,
};
use jsonrpsee::{core::client::ClientT, rpc_params};

/// Adapter for [`ClientT`] to [`NodeRpc`].
#[repr(transparent)]
pub struct Adapter<T: ClientT + Send + Sync>(pub T);

impl<T> Adapter<T>
where
    T: ClientT + Send + Sync,
{
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Adapter<T>
where
    T: ClientT + Send + Sync,
{
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T> Deref for Adapter<T>
where
    T: ClientT + Send + Sync,
{
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> Clone for Adapter<T>
where
    T: ClientT + Send + Sync + Clone,
{
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> core::fmt::Debug for Adapter<T>
where
    T: ClientT + Send + Sync + core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Adapter").field(&self.0).finish()
    }
}

#[async_trait::async_trait]
impl<T> NodeRpc for Adapter<T>
where
    T: ClientT + Send + Sync,
{
    async fn get_transaction_count(
        &self,
        account: harness_types::Address,
        at: AtBlock,
    ) -> Result<u64, RpcError> {
        let count = <T as ClientT>::request::<U256, _>(
            &self.0,
            "eth_getTransactionCount",
            rpc_params![account, at],
        )
        .await?;
        u64::try_from(count).map_err(|_| RpcError::Unavailable(format!("nonce overflow: {count}")))
    }

    async fn chain_id(&self) -> Result<u64, RpcError> {
        let chain_id =
            <T as ClientT>::request::<U256, _>(&self.0, "eth_chainId", rpc_params![]).await?;
        u64::try_from(chain_id)
            .map_err(|_| RpcError::Unavailable(format!("chain id overflow: {chain_id}")))
    }

    async fn call(&self, tx: CallRequest, at: AtBlock) -> Result<Bytes, RpcError> {
        let result = <T as ClientT>::request(&self.0, "eth_call", rpc_params![tx, at]).await?;
        Ok(result)
    }

    async fn send_raw_transaction(&self, tx: Bytes) -> Result<TxHash, RpcError> {
        let tx_hash =
            <T as ClientT>::request(&self.0, "eth_sendRawTransaction", rpc_params![tx]).await?;
        Ok(tx_hash)
    }

    async fn transaction_receipt(
        &self,
        tx: TxHash,
    ) -> Result<Option<TransactionReceipt>, RpcError> {
        let receipt =
            <T as ClientT>::request(&self.0, "eth_getTransactionReceipt", rpc_params![tx]).await?;
        Ok(receipt)
    }

    async fn transaction_by_hash(&self, tx: TxHash) -> Result<Option<RpcTransaction>, RpcError> {
        let tx =
            <T as ClientT>::request(&self.0, "eth_getTransactionByHash", rpc_params![tx]).await?;
        Ok(tx)
    }

    async fn block(&self, at: AtBlock) -> Result<Option<RpcBlock>, RpcError> {
        let block = if let AtBlock::Hash(block_hash) = at {
            <T as ClientT>::request(&self.0, "eth_getBlockByHash", rpc_params![block_hash, false])
                .await?
        } else {
            <T as ClientT>::request(&self.0, "eth_getBlockByNumber", rpc_params![at, false])
                .await?
        };
        Ok(block)
    }

    async fn syncing(&self) -> Result<SyncStatus, RpcError> {
        let status = <T as ClientT>::request(&self.0, "eth_syncing", rpc_params![]).await?;
        Ok(status)
    }
}
