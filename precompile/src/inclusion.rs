use std::time::Duration;

use harness_rpc_client::NodeRpc;
use harness_types::{AtBlock, TxHash, H256};

use crate::Error;

/// Outcome of a transaction's execution, from the receipt status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Succeeded,
    Reverted,
    /// Receipt without a status field.
    Unknown,
}

impl From<Option<u64>> for ExecutionStatus {
    fn from(status_code: Option<u64>) -> Self {
        match status_code {
            Some(0) => Self::Reverted,
            Some(_) => Self::Succeeded,
            None => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InclusionResult {
    pub tx_hash: TxHash,
    pub block_hash: H256,
    pub block_number: u64,
    pub status: ExecutionStatus,
}

impl InclusionResult {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.status == ExecutionStatus::Succeeded
    }
}

/// Polls the receipt of `tx_hash` until it lands in a block, then resolves that block.
///
/// Never gives up on its own, wrap it in [`tokio::time::timeout`] to bound the wait.
///
/// # Errors
/// Returns `Err` if a request fails or the receipt references a block the node can't find.
pub async fn wait_for_inclusion<R>(
    rpc: &R,
    tx_hash: TxHash,
    poll_interval: Duration,
) -> Result<InclusionResult, Error>
where
    R: NodeRpc + Sync,
{
    let (receipt, block_hash) = loop {
        if let Some(receipt) = rpc.transaction_receipt(tx_hash).await? {
            if let Some(block_hash) = receipt.block_hash {
                break (receipt, block_hash);
            }
        }
        log::debug!("transaction {tx_hash:?} not included yet, next poll in {poll_interval:?}");
        tokio::time::sleep(poll_interval).await;
    };

    let Some(block) = rpc.block(AtBlock::from(block_hash)).await? else {
        return Err(Error::UnknownBlock { tx_hash, block_hash });
    };
    let result = InclusionResult {
        tx_hash,
        block_hash: block.hash,
        block_number: block.number,
        status: ExecutionStatus::from(receipt.status_code),
    };
    log::info!(
        "transaction {tx_hash:?} included in block #{} {:?}: {:?}",
        result.block_number,
        result.block_hash,
        result.status
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::{wait_for_inclusion, ExecutionStatus};
    use harness_rpc_client::mock::MockNode;
    use harness_types::H256;
    use std::time::Duration;

    #[test]
    fn status_codes() {
        assert_eq!(ExecutionStatus::from(Some(1)), ExecutionStatus::Succeeded);
        assert_eq!(ExecutionStatus::from(Some(0)), ExecutionStatus::Reverted);
        assert_eq!(ExecutionStatus::from(None), ExecutionStatus::Unknown);
    }

    #[tokio::test]
    async fn unknown_transaction_keeps_polling() {
        let node = MockNode::new(3000);
        let wait = wait_for_inclusion(&node, H256::repeat_byte(0xee), Duration::from_millis(1));
        assert!(tokio::time::timeout(Duration::from_millis(50), wait).await.is_err());
        assert!(node.requests() > 1);
        assert!(node.methods().iter().all(|method| *method == "eth_getTransactionReceipt"));
    }
}
