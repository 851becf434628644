//! Harness client: signs with named accounts from a [`KeyStore`] and talks to one node.
use harness_config::HarnessConfig;
use harness_precompile::{
    submit, view_call, DispatchOptions, InclusionResult, Precompile, PrecompileSet, Word,
};
use harness_rpc_client::{ensure_synced, http_client, HttpNode, NodeRpc, RpcError};
use harness_tx::{KeyStore, TransactionBuilder, TransactionRequest, TxError};
use harness_types::{Address, Bytes, Keypair, RpcTransaction, TxHash, U256};

pub use harness_config as config;
pub use harness_precompile as precompile;
pub use harness_rpc_client as rpc;
pub use harness_tx as tx;
pub use harness_types as types;

#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("unknown account: {0}")]
    UnknownAccount(String),
    #[error(transparent)]
    Precompile(#[from] harness_precompile::Error),
    #[error(transparent)]
    Tx(#[from] TxError),
    #[error(transparent)]
    Rpc(#[from] RpcError),
}

pub struct Harness<R, K> {
    config: HarnessConfig,
    chain_id: u64,
    keystore: K,
    builder: TransactionBuilder<R>,
    precompiles: PrecompileSet,
}

impl<K: KeyStore> Harness<HttpNode, K> {
    /// Connects to the node configured in `config` over HTTP.
    ///
    /// # Errors
    /// Returns `Err` if the url is malformed, the node is unreachable or still syncing.
    pub async fn connect(config: HarnessConfig, keystore: K) -> Result<Self, HarnessError> {
        let rpc = http_client(config.node_url.as_str())?;
        Self::new(config, rpc, keystore).await
    }
}

impl<R, K> Harness<R, K>
where
    R: NodeRpc + Sync,
    K: KeyStore,
{
    /// # Errors
    /// Returns `Err` if the node is syncing or its chain id can't be fetched.
    pub async fn new(config: HarnessConfig, rpc: R, keystore: K) -> Result<Self, HarnessError> {
        ensure_synced(&rpc).await?;
        let chain_id = match config.chain_id {
            Some(chain_id) => chain_id,
            None => rpc.chain_id().await?,
        };
        log::info!(
            "connected to {} node at {}, chain id {chain_id}",
            config.network,
            config.node_url
        );
        Ok(Self {
            config,
            chain_id,
            keystore,
            builder: TransactionBuilder::new(rpc),
            precompiles: PrecompileSet::new()?,
        })
    }

    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub const fn rpc(&self) -> &R {
        self.builder.rpc()
    }

    pub const fn precompiles(&self) -> &PrecompileSet {
        &self.precompiles
    }

    pub fn dispatch_options(&self) -> DispatchOptions {
        self.config.dispatch_options(self.chain_id)
    }

    /// # Errors
    /// Returns [`HarnessError::UnknownAccount`] if the keystore has no such account.
    pub fn account(&self, name: &str) -> Result<Keypair, HarnessError> {
        self.keystore.lookup(name).ok_or_else(|| HarnessError::UnknownAccount(name.to_string()))
    }

    /// Signs `request` with the account `signer` and waits until it is included.
    ///
    /// # Errors
    /// Returns `Err` if the request is invalid, signing fails or the node rejects it.
    pub async fn send(
        &self,
        request: TransactionRequest,
        signer: &str,
    ) -> Result<InclusionResult, HarnessError> {
        let keypair = self.account(signer)?;
        let tx = self.builder.build_with_keypair(request, &keypair).await?;
        Ok(submit(self.rpc(), tx, self.config.poll_interval).await?)
    }

    /// Plain value transfer from the account `from`.
    ///
    /// # Errors
    /// See [`Self::send`].
    pub async fn transfer(
        &self,
        from: &str,
        to: Address,
        value: U256,
    ) -> Result<InclusionResult, HarnessError> {
        let sender = self.account(from)?.address();
        let options = DispatchOptions { gas_limit: 21_000, ..self.dispatch_options() };
        let request = options.request(sender, to, Bytes::new()).value(value);
        self.send(request, from).await
    }

    /// Read-only precompile call, the raw response is returned for the caller to decode.
    ///
    /// # Errors
    /// Fails with [`harness_precompile::Error::UnknownSelector`] before any request if the
    /// precompile has no function `name`.
    pub async fn view<I>(
        &self,
        precompile: Precompile,
        name: &str,
        params: I,
        from: Address,
    ) -> Result<Bytes, HarnessError>
    where
        I: IntoIterator<Item = Word>,
    {
        let call = self.precompiles.call(precompile, name, params)?;
        log::debug!("view {precompile}.{name} from {from:?}");
        Ok(view_call(self.rpc(), call.calldata(), call.target, from).await?)
    }

    /// Signs and submits a precompile call from the account `signer`.
    ///
    /// # Errors
    /// Unknown functions and accounts fail before any request.
    pub async fn dispatch<I>(
        &self,
        precompile: Precompile,
        name: &str,
        params: I,
        signer: &str,
    ) -> Result<InclusionResult, HarnessError>
    where
        I: IntoIterator<Item = Word>,
    {
        let call = self.precompiles.call(precompile, name, params)?;
        let sender = self.account(signer)?.address();
        log::debug!("dispatch {precompile}.{name} from {signer}");
        let request = self.dispatch_options().request(sender, call.target, call.calldata());
        self.send(request, signer).await
    }

    /// # Errors
    /// Returns `Err` if the request fails.
    pub async fn transaction(
        &self,
        tx_hash: TxHash,
    ) -> Result<Option<RpcTransaction>, HarnessError> {
        Ok(self.rpc().transaction_by_hash(tx_hash).await?)
    }
}
