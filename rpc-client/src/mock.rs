//! In-memory [`NodeRpc`] used by tests across the workspace.
use std::sync::{
    atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    Mutex, PoisonError,
};

use crate::{NodeRpc, RpcError};
use harness_types::{
    keccak256, Address, AtBlock, Bytes, CallRequest, RpcBlock, RpcTransaction,
    SignedTransactionT, SyncStatus, Transaction, TransactionReceipt, TransactionT, TxHash, H256,
};

/// Hash of the single block every submitted transaction lands in.
pub const MOCK_BLOCK_HASH: H256 = H256([0x11; 32]);
pub const MOCK_BLOCK_NUMBER: u64 = 1;

/// Node double: a pending nonce per sender, instant inclusion, and a log of every method hit.
///
/// Methods registered with [`MockNode::with_failure`] answer with [`RpcError::Unavailable`].
pub struct MockNode {
    chain_id: u64,
    nonce: AtomicU64,
    pending_polls: AtomicUsize,
    revert: AtomicBool,
    call_response: Bytes,
    sync_status: SyncStatus,
    methods: Mutex<Vec<&'static str>>,
    failing: Vec<&'static str>,
    block_params: Mutex<Vec<AtBlock>>,
    submitted: Mutex<Vec<Transaction>>,
    last_call: Mutex<Option<CallRequest>>,
}

impl MockNode {
    #[must_use]
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            nonce: AtomicU64::new(0),
            pending_polls: AtomicUsize::new(0),
            revert: AtomicBool::new(false),
            call_response: Bytes::new(),
            sync_status: SyncStatus::NotSyncing,
            methods: Mutex::new(Vec::new()),
            failing: Vec::new(),
            block_params: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
            last_call: Mutex::new(None),
        }
    }

    /// Pending nonce reported for every account.
    #[must_use]
    pub fn with_nonce(self, nonce: u64) -> Self {
        self.nonce.store(nonce, Ordering::SeqCst);
        self
    }

    /// Number of receipt polls answered with `null` before the receipt shows up.
    #[must_use]
    pub fn with_pending_polls(self, polls: usize) -> Self {
        self.pending_polls.store(polls, Ordering::SeqCst);
        self
    }

    /// Receipts report status `0`.
    #[must_use]
    pub fn with_revert(self) -> Self {
        self.revert.store(true, Ordering::SeqCst);
        self
    }

    #[must_use]
    pub fn with_call_response(mut self, response: Bytes) -> Self {
        self.call_response = response;
        self
    }

    #[must_use]
    pub const fn with_sync_status(mut self, status: SyncStatus) -> Self {
        self.sync_status = status;
        self
    }

    /// Every request of `method` fails. Failed requests are still logged.
    #[must_use]
    pub fn with_failure(mut self, method: &'static str) -> Self {
        self.failing.push(method);
        self
    }

    /// Every json-rpc method hit so far, in order.
    pub fn methods(&self) -> Vec<&'static str> {
        self.methods.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of requests served.
    pub fn requests(&self) -> usize {
        self.methods.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Transactions accepted by `eth_sendRawTransaction`.
    pub fn submitted(&self) -> Vec<Transaction> {
        self.submitted.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// The request of the most recent `eth_call`.
    pub fn last_call(&self) -> Option<CallRequest> {
        self.last_call.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Block parameters received by `eth_getTransactionCount`, `eth_call` and the block
    /// queries, in order.
    pub fn block_params(&self) -> Vec<AtBlock> {
        self.block_params.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn record(&self, method: &'static str) -> Result<(), RpcError> {
        self.methods.lock().unwrap_or_else(PoisonError::into_inner).push(method);
        if self.failing.contains(&method) {
            return Err(RpcError::Unavailable(format!("{method} failed")));
        }
        Ok(())
    }

    fn record_at(&self, method: &'static str, at: AtBlock) -> Result<(), RpcError> {
        self.block_params.lock().unwrap_or_else(PoisonError::into_inner).push(at);
        self.record(method)
    }

    fn find(&self, tx_hash: TxHash) -> Option<(usize, Transaction)> {
        self.submitted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .enumerate()
            .find(|(_, tx)| tx.tx_hash() == tx_hash)
            .map(|(index, tx)| (index, tx.clone()))
    }
}

#[async_trait::async_trait]
impl NodeRpc for MockNode {
    async fn get_transaction_count(
        &self,
        _account: Address,
        at: AtBlock,
    ) -> Result<u64, RpcError> {
        self.record_at("eth_getTransactionCount", at)?;
        Ok(self.nonce.load(Ordering::SeqCst))
    }

    async fn chain_id(&self) -> Result<u64, RpcError> {
        self.record("eth_chainId")?;
        Ok(self.chain_id)
    }

    async fn call(&self, tx: CallRequest, at: AtBlock) -> Result<Bytes, RpcError> {
        self.record_at("eth_call", at)?;
        *self.last_call.lock().unwrap_or_else(PoisonError::into_inner) = Some(tx);
        Ok(self.call_response.clone())
    }

    async fn send_raw_transaction(&self, tx: Bytes) -> Result<TxHash, RpcError> {
        self.record("eth_sendRawTransaction")?;
        let decoded = Transaction::decode_raw(&tx)
            .map_err(|error| RpcError::Unavailable(format!("invalid transaction: {error}")))?;
        if decoded.chain_id().is_some_and(|chain_id| chain_id != self.chain_id) {
            return Err(RpcError::Unavailable("invalid chain id".into()));
        }
        self.nonce.fetch_add(1, Ordering::SeqCst);
        self.submitted.lock().unwrap_or_else(PoisonError::into_inner).push(decoded);
        Ok(keccak256(&tx))
    }

    async fn transaction_receipt(
        &self,
        tx: TxHash,
    ) -> Result<Option<TransactionReceipt>, RpcError> {
        self.record("eth_getTransactionReceipt")?;
        let Some((index, submitted)) = self.find(tx) else {
            return Ok(None);
        };
        let still_pending = self
            .pending_polls
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |polls| polls.checked_sub(1))
            .is_ok();
        if still_pending {
            return Ok(None);
        }
        Ok(Some(TransactionReceipt {
            transaction_hash: tx,
            transaction_index: index as u64,
            block_hash: Some(MOCK_BLOCK_HASH),
            block_number: Some(MOCK_BLOCK_NUMBER),
            from: submitted.from().ok(),
            to: submitted.to(),
            cumulative_gas_used: submitted.gas_limit().into(),
            gas_used: Some(submitted.gas_limit().into()),
            status_code: Some(u64::from(!self.revert.load(Ordering::SeqCst))),
            ..TransactionReceipt::default()
        }))
    }

    async fn transaction_by_hash(&self, tx: TxHash) -> Result<Option<RpcTransaction>, RpcError> {
        self.record("eth_getTransactionByHash")?;
        let Some((index, submitted)) = self.find(tx) else {
            return Ok(None);
        };
        let from = submitted
            .from()
            .map_err(|error| RpcError::Unavailable(format!("invalid signature: {error}")))?;
        Ok(Some(RpcTransaction {
            hash: tx,
            nonce: submitted.nonce(),
            block_hash: Some(MOCK_BLOCK_HASH),
            block_number: Some(MOCK_BLOCK_NUMBER),
            transaction_index: Some(index as u64),
            from,
            to: submitted.to(),
            value: submitted.value(),
            gas_limit: submitted.gas_limit().into(),
            input: Bytes::from(submitted.data()),
            chain_id: submitted.chain_id(),
            signature: submitted.signature,
            transaction_type: submitted.transaction_type().map(u64::from),
            ..RpcTransaction::default()
        }))
    }

    async fn block(&self, at: AtBlock) -> Result<Option<RpcBlock>, RpcError> {
        if matches!(at, AtBlock::Hash(_)) {
            self.record_at("eth_getBlockByHash", at)?;
        } else {
            self.record_at("eth_getBlockByNumber", at)?;
        }
        let matches = match at {
            AtBlock::Hash(hash) => hash == MOCK_BLOCK_HASH,
            AtBlock::Number(number) => number == MOCK_BLOCK_NUMBER,
            _ => true,
        };
        if !matches {
            return Ok(None);
        }
        let transactions = self
            .submitted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(SignedTransactionT::tx_hash)
            .collect();
        Ok(Some(RpcBlock {
            hash: MOCK_BLOCK_HASH,
            parent_hash: H256::zero(),
            number: MOCK_BLOCK_NUMBER,
            timestamp: 0,
            transactions,
        }))
    }

    async fn syncing(&self) -> Result<SyncStatus, RpcError> {
        self.record("eth_syncing")?;
        Ok(self.sync_status)
    }
}
