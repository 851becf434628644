use std::time::Duration;

use harness_rpc_client::NodeRpc;
use harness_tx::{EnvelopeType, Nonce, RawTransaction, TransactionBuilder, TransactionRequest};
use harness_types::{Address, AtBlock, Bytes, CallRequest, U256};

use crate::{wait_for_inclusion, Error, InclusionResult};

/// Gas and fee settings applied to dispatched precompile calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOptions {
    pub envelope: EnvelopeType,
    pub nonce: Nonce,
    pub gas_limit: u64,
    /// Used by `Legacy` and `AccessList` envelopes.
    pub gas_price: U256,
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
    /// `None` signs legacy transactions without replay protection.
    pub chain_id: Option<u64>,
    pub poll_interval: Duration,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            envelope: EnvelopeType::Legacy,
            nonce: Nonce::Auto,
            gas_limit: 1_000_000,
            gas_price: U256::from(1_000_000_000_000u64),
            max_fee_per_gas: U256::from(2_000_000_000_000u64),
            max_priority_fee_per_gas: U256::from(1_000_000_000u64),
            chain_id: None,
            poll_interval: Duration::from_millis(500),
        }
    }
}

impl DispatchOptions {
    /// Zero value transaction from `from` to `target` carrying `data`. Set a value on the
    /// returned request to move funds.
    #[must_use]
    pub fn request(&self, from: Address, target: Address, data: Bytes) -> TransactionRequest {
        let request = TransactionRequest::new(from)
            .to(target)
            .nonce(self.nonce)
            .gas_limit(self.gas_limit)
            .value(U256::zero())
            .data(data)
            .envelope(self.envelope);
        let request = match self.envelope {
            EnvelopeType::Legacy | EnvelopeType::AccessList => request.gas_price(self.gas_price),
            EnvelopeType::DynamicFee => {
                request.dynamic_fee(self.max_fee_per_gas, self.max_priority_fee_per_gas)
            },
        };
        match self.chain_id {
            Some(chain_id) => request.chain_id(chain_id),
            None => request,
        }
    }
}

/// Read-only call: zero value `eth_call` at the latest block. The response is returned as is.
///
/// # Errors
/// Returns `Err` if the node rejects or fails the call.
pub async fn view_call<R>(
    rpc: &R,
    data: Bytes,
    target: Address,
    from: Address,
) -> Result<Bytes, Error>
where
    R: NodeRpc + Sync,
{
    let request = CallRequest {
        from: Some(from),
        to: Some(target),
        value: Some(U256::zero()),
        data: Some(data),
        ..CallRequest::default()
    };
    Ok(rpc.call(request, AtBlock::Latest).await?)
}

/// Signs a call to `target`, submits it and waits until it is included in a block.
///
/// # Errors
/// Validation and signing errors surface before anything is sent. Transport errors propagate as
/// they happen, there is no retry.
pub async fn dispatch_call<R, K>(
    builder: &TransactionBuilder<R>,
    data: Bytes,
    target: Address,
    from: Address,
    private_key: K,
    options: &DispatchOptions,
) -> Result<InclusionResult, Error>
where
    R: NodeRpc + Sync,
    K: AsRef<[u8]>,
{
    let request = options.request(from, target, data);
    let tx = builder.build(request, private_key).await?;
    submit(builder.rpc(), tx, options.poll_interval).await
}

/// Sends a signed transaction and waits for its inclusion.
///
/// # Errors
/// Returns `Err` if the node rejects the transaction or a poll fails.
pub async fn submit<R>(
    rpc: &R,
    tx: RawTransaction,
    poll_interval: Duration,
) -> Result<InclusionResult, Error>
where
    R: NodeRpc + Sync,
{
    let tx_hash = rpc.send_raw_transaction(tx.raw().clone()).await?;
    if tx_hash != tx.tx_hash() {
        log::warn!("node reported hash {tx_hash:?} for transaction {:?}", tx.tx_hash());
    }
    log::info!("submitted {tx_hash:?} from {:?} with nonce {}", tx.sender(), tx.nonce());
    wait_for_inclusion(rpc, tx_hash, poll_interval).await
}
