use harness_rpc_client::NodeRpc;
use harness_types::{
    AtBlock, Eip1559Transaction, Eip2930Transaction, Keypair, LegacyTransaction, RecoveryId,
    SignedTransaction, Signer, TransactionT, TypedTransaction, U256,
};

use crate::{EnvelopeType, Nonce, RawTransaction, TransactionRequest, TxError, ValidationError};

/// Fee of a validated request, matching its envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fee {
    GasPrice(U256),
    Dynamic { max_fee_per_gas: U256, max_priority_fee_per_gas: U256 },
}

/// Fields of a request that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validated {
    pub fee: Fee,
    pub gas_limit: u64,
    pub value: U256,
    pub chain_id: Option<u64>,
}

/// Checks fee fields first, then required fields. Never touches the network.
///
/// # Errors
/// Returns the first [`ValidationError`] found.
pub fn validate(request: &TransactionRequest) -> Result<Validated, ValidationError> {
    let has_dynamic =
        request.max_fee_per_gas.is_some() || request.max_priority_fee_per_gas.is_some();
    let fee = match (request.envelope, request.gas_price, has_dynamic) {
        (_, Some(_), true) => return Err(ValidationError::ConflictingFeeFields),
        (EnvelopeType::Legacy | EnvelopeType::AccessList, Some(gas_price), false) => {
            Fee::GasPrice(gas_price)
        },
        (EnvelopeType::DynamicFee, None, true) => {
            let max_fee_per_gas = request
                .max_fee_per_gas
                .ok_or(ValidationError::MissingField("max_fee_per_gas"))?;
            let max_priority_fee_per_gas = request
                .max_priority_fee_per_gas
                .ok_or(ValidationError::MissingField("max_priority_fee_per_gas"))?;
            Fee::Dynamic { max_fee_per_gas, max_priority_fee_per_gas }
        },
        // fee kind doesn't match the envelope, or no fee at all
        _ => return Err(ValidationError::ConflictingFeeFields),
    };

    let gas_limit = request.gas_limit.ok_or(ValidationError::MissingField("gas_limit"))?;
    let value = request.value.ok_or(ValidationError::MissingField("value"))?;
    match request.envelope {
        EnvelopeType::Legacy if request.access_list.is_some() => {
            return Err(ValidationError::AccessListOnLegacy)
        },
        EnvelopeType::AccessList | EnvelopeType::DynamicFee if request.chain_id.is_none() => {
            return Err(ValidationError::MissingField("chain_id"))
        },
        _ => {},
    }
    if let Some(chain_id) = request.chain_id.filter(|&id| id > RecoveryId::MAX_CHAIN_ID) {
        return Err(ValidationError::ChainIdOutOfRange(chain_id));
    }

    Ok(Validated { fee, gas_limit, value, chain_id: request.chain_id })
}

/// Assembles, signs and serializes transactions.
#[derive(Debug, Clone)]
pub struct TransactionBuilder<R> {
    rpc: R,
}

impl<R> TransactionBuilder<R>
where
    R: NodeRpc + Sync,
{
    pub const fn new(rpc: R) -> Self {
        Self { rpc }
    }

    pub const fn rpc(&self) -> &R {
        &self.rpc
    }

    /// Validates `request`, signs it with `private_key` and returns the serialized envelope.
    ///
    /// # Errors
    /// [`TxError::Validation`] and [`TxError::Signing`] are raised before any network call,
    /// [`TxError::Rpc`] if the nonce has to be resolved and the node can't be reached.
    pub async fn build<K: AsRef<[u8]>>(
        &self,
        request: TransactionRequest,
        private_key: K,
    ) -> Result<RawTransaction, TxError> {
        let validated = validate(&request)?;
        let keypair = Keypair::from_bytes(private_key)?;
        self.sign_validated(request, validated, &keypair).await
    }

    /// Same as [`Self::build`] with an already parsed key.
    ///
    /// # Errors
    /// See [`Self::build`].
    pub async fn build_with_keypair(
        &self,
        request: TransactionRequest,
        keypair: &Keypair,
    ) -> Result<RawTransaction, TxError> {
        let validated = validate(&request)?;
        self.sign_validated(request, validated, keypair).await
    }

    async fn sign_validated(
        &self,
        request: TransactionRequest,
        validated: Validated,
        keypair: &Keypair,
    ) -> Result<RawTransaction, TxError> {
        let sender = keypair.address();
        if sender != request.from {
            return Err(ValidationError::SenderMismatch { expected: request.from, actual: sender }
                .into());
        }

        let nonce = match request.nonce {
            Nonce::Fixed(nonce) => nonce,
            Nonce::Auto => {
                let nonce = self.rpc.get_transaction_count(sender, AtBlock::Pending).await?;
                log::debug!("resolved pending nonce {nonce} for {sender:?}");
                nonce
            },
        };

        let tx = assemble(request, validated, nonce);
        // typed envelopes carry the chain id as a field, only legacy folds it into `v`
        let replay_protection = match tx {
            TypedTransaction::Legacy(ref legacy) => legacy.chain_id,
            _ => None,
        };
        let mut signature = keypair.sign_prehash(tx.sighash(), replay_protection)?;
        if let TypedTransaction::Legacy(LegacyTransaction { chain_id: None, .. }) = tx {
            // pre EIP-155 `v` is `27 + parity`
            signature.v = RecoveryId::new(signature.v.as_legacy());
        }
        let signed = SignedTransaction::new(tx, signature);
        log::debug!(
            "signed transaction {:?} from {sender:?} with nonce {nonce}",
            signed.tx_hash
        );
        Ok(RawTransaction::new(signed, sender))
    }
}

fn assemble(request: TransactionRequest, validated: Validated, nonce: u64) -> TypedTransaction {
    let Validated { fee, gas_limit, value, chain_id } = validated;
    let access_list = request.access_list.unwrap_or_default();
    match (request.envelope, fee) {
        (EnvelopeType::AccessList, Fee::GasPrice(gas_price)) => Eip2930Transaction {
            chain_id: chain_id.unwrap_or_default(),
            nonce,
            gas_price,
            gas_limit,
            to: request.to,
            value,
            data: request.data,
            access_list,
        }
        .into(),
        (_, Fee::Dynamic { max_fee_per_gas, max_priority_fee_per_gas }) => Eip1559Transaction {
            chain_id: chain_id.unwrap_or_default(),
            nonce,
            max_priority_fee_per_gas,
            max_fee_per_gas,
            gas_limit,
            to: request.to,
            value,
            data: request.data,
            access_list,
        }
        .into(),
        (_, Fee::GasPrice(gas_price)) => LegacyTransaction {
            nonce,
            gas_price,
            gas_limit,
            to: request.to,
            value,
            data: request.data,
            chain_id,
        }
        .into(),
    }
}

#[cfg(test)]
mod tests {
    use super::{validate, TransactionBuilder};
    use crate::{EnvelopeType, RawTransaction, TransactionRequest, TxError, ValidationError};
    use harness_rpc_client::{mock::MockNode, RpcError};
    use harness_types::{
        AccessList, AccessListItem, Address, AtBlock, GasPrice, RecoveryId, TransactionT, H160,
        H256, U256,
    };
    use hex_literal::hex;

    const ALITH_KEY: [u8; 32] =
        hex!("5fb92d6e98884f76de468fa3f6278f8807c48bebc13595d45af5bdc4da702133");
    const ALITH: Address = H160(hex!("f24ff3a9cf04c71dbc94d0b566f7a27b94566cac"));
    const BALTATHAR: Address = H160(hex!("3cd0a705a2dc65e5b1e1205896baa2be8a07c6e0"));
    const STAKING: Address = H160(hex!("0000000000000000000000000000000000000400"));

    fn transfer() -> TransactionRequest {
        TransactionRequest::new(ALITH)
            .to(BALTATHAR)
            .nonce(0)
            .gas_limit(21_000)
            .gas_price(1_000_000_000_000u64)
            .value(0u64)
    }

    fn staking_access_list() -> AccessList {
        AccessList(vec![AccessListItem { address: STAKING, storage_keys: vec![H256::zero()] }])
    }

    #[tokio::test]
    async fn legacy_envelopes_match_reference_encoding() {
        env_logger::try_init().ok();
        let node = MockNode::new(3000);
        let builder = TransactionBuilder::new(&node);

        let tx = builder.build(transfer(), ALITH_KEY).await.unwrap();
        assert_eq!(tx.raw().as_ref(), hex!("f8648085e8d4a51000825208943cd0a705a2dc65e5b1e1205896baa2be8a07c6e080801ca0846b09d8b23d9268498aa134387364dffbbdb06c872f9d4718647dca2a4bf97fa04ec1c15a06fda1dd47f55cdab1069bdee2a027cde6c47432adb03f506d802c88").as_slice());
        assert_eq!(
            tx.tx_hash(),
            H256(hex!("d2d36551b0c618c92c0863d91c9d83feaef9941ea3edbafc59e05edd4fb1b14a"))
        );
        assert_eq!(tx.transaction().signature.v.as_u64(), 0x1c);

        let tx = builder.build(transfer().chain_id(3000), ALITH_KEY).await.unwrap();
        assert_eq!(tx.raw().as_ref(), hex!("f8668085e8d4a51000825208943cd0a705a2dc65e5b1e1205896baa2be8a07c6e08080821794a0f309a46cabf6e3b96fe892be52646d476ee2d92cc86cb84cd755fff1695e3d81a008c6be15d5dd0d702c77ef16bdfcd83c29bc27eef1df9bf91807aeccfb45146e").as_slice());
        assert_eq!(tx.transaction().signature.v.as_u64(), 6036);

        // fixed nonces never reach the node
        assert_eq!(node.requests(), 0);
    }

    #[tokio::test]
    async fn typed_envelopes_match_reference_encoding() {
        let node = MockNode::new(3000);
        let builder = TransactionBuilder::new(&node);

        let request = TransactionRequest::new(ALITH)
            .to(STAKING)
            .nonce(1)
            .gas_limit(50_000)
            .gas_price(1_000_000_000_000u64)
            .value(0u64)
            .data(hex!("c9f593b2"))
            .access_list(staking_access_list())
            .chain_id(3000)
            .envelope(EnvelopeType::AccessList);
        let tx = builder.build(request, ALITH_KEY).await.unwrap();
        assert_eq!(tx.raw().as_ref(), hex!("01f8a5820bb80185e8d4a5100082c3509400000000000000000000000000000000000004008084c9f593b2f838f7940000000000000000000000000000000000000400e1a0000000000000000000000000000000000000000000000000000000000000000080a0d3362078ba2f86c9afa88b867bea8371df1e4e3897ce11d6786923f4687b45a1a011535ba7a34fb937426041ec6d868b62db39456b7b51132aeb63762272423bdc").as_slice());
        assert_eq!(
            tx.tx_hash(),
            H256(hex!("caee30b6cd9ee8e1a05fc635d7e03fc606d7b2168783c484d99d7b108b140b24"))
        );

        let request = TransactionRequest::new(ALITH)
            .to(BALTATHAR)
            .nonce(2)
            .gas_limit(100_000)
            .dynamic_fee(2_000_000_000_000u64, 1_000_000_000u64)
            .value(1_000_000_000_000_000_000u128)
            .chain_id(3000)
            .envelope(EnvelopeType::DynamicFee);
        let tx = builder.build(request, ALITH_KEY).await.unwrap();
        assert_eq!(tx.raw().as_ref(), hex!("02f877820bb802843b9aca008601d1a94a2000830186a0943cd0a705a2dc65e5b1e1205896baa2be8a07c6e0880de0b6b3a764000080c080a01830b85cd13717c49ce230bb5dc7b19fc214b7e2c768c3e208f6969104d3eebca03b7a5738c9194681ff298e566c93bc08c339fe17cc23ce5a66c3973ee18deac6").as_slice());
        assert_eq!(
            tx.tx_hash(),
            H256(hex!("e808272addb70d03a568d0c33874847fc1d6ac5405092e9541215453eb7b2ab3"))
        );
        assert_eq!(node.requests(), 0);
    }

    #[tokio::test]
    async fn signing_is_deterministic() {
        let node = MockNode::new(3000);
        let builder = TransactionBuilder::new(&node);
        let first = builder.build(transfer().chain_id(3000), ALITH_KEY).await.unwrap();
        let second = builder.build(transfer().chain_id(3000), ALITH_KEY).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn decoding_recovers_fields_and_sender() {
        let node = MockNode::new(3000);
        let builder = TransactionBuilder::new(&node);
        let requests = [
            transfer().data(hex!("deadbeef")),
            transfer().chain_id(3000).value(42u64),
            transfer()
                .chain_id(3000)
                .access_list(staking_access_list())
                .envelope(EnvelopeType::AccessList),
            TransactionRequest::new(ALITH)
                .nonce(9)
                .gas_limit(60_000)
                .dynamic_fee(3u64, 2u64)
                .value(7u64)
                .chain_id(3000)
                .envelope(EnvelopeType::DynamicFee),
        ];

        for request in requests {
            let built = builder.build(request.clone(), ALITH_KEY).await.unwrap();
            let decoded = RawTransaction::decode(built.raw()).unwrap();
            assert_eq!(decoded, built);
            assert_eq!(decoded.sender(), ALITH);

            let tx = decoded.transaction();
            assert_eq!(tx.to(), request.to);
            assert_eq!(Some(tx.gas_limit()), request.gas_limit);
            assert_eq!(Some(tx.value()), request.value);
            assert_eq!(tx.data(), request.data.as_ref());
            assert_eq!(tx.chain_id(), request.chain_id);
            match tx.gas_price() {
                GasPrice::Legacy(gas_price) => assert_eq!(Some(gas_price), request.gas_price),
                GasPrice::Eip1559 { max_fee_per_gas, max_priority_fee_per_gas } => {
                    assert_eq!(Some(max_fee_per_gas), request.max_fee_per_gas);
                    assert_eq!(Some(max_priority_fee_per_gas), request.max_priority_fee_per_gas);
                },
            }
            if let Some(access_list) = request.access_list.as_ref() {
                assert_eq!(tx.access_list(), Some(access_list));
            }
        }
    }

    #[tokio::test]
    async fn unprotected_legacy_signature_uses_27_or_28() {
        let node = MockNode::new(3000);
        let builder = TransactionBuilder::new(&node);
        for nonce in 0..4 {
            let built = builder.build(transfer().nonce(nonce), ALITH_KEY).await.unwrap();
            let v = built.transaction().signature.v.as_u64();
            assert!(v == 27 || v == 28, "unexpected v {v}");

            let decoded = RawTransaction::decode(built.raw()).unwrap();
            assert_eq!(decoded.transaction().signature, built.transaction().signature);
            assert_eq!(decoded, built);
        }
    }

    #[tokio::test]
    async fn auto_nonce_queries_pending_count() {
        let node = MockNode::new(3000).with_nonce(5);
        let builder = TransactionBuilder::new(&node);
        let request = transfer().nonce(crate::Nonce::Auto);
        let tx = builder.build(request, ALITH_KEY).await.unwrap();
        assert_eq!(tx.nonce(), 5);
        assert_eq!(node.methods(), vec!["eth_getTransactionCount"]);
        assert_eq!(node.block_params(), vec![AtBlock::Pending]);
    }

    #[tokio::test]
    async fn nonce_lookup_failure_is_not_retried() {
        let node = MockNode::new(3000).with_failure("eth_getTransactionCount");
        let builder = TransactionBuilder::new(&node);
        let request = transfer().nonce(crate::Nonce::Auto);
        let error = builder.build(request, ALITH_KEY).await.unwrap_err();
        assert!(matches!(error, TxError::Rpc(RpcError::Unavailable(_))));
        assert_eq!(node.methods(), vec!["eth_getTransactionCount"]);
    }

    #[tokio::test]
    async fn conflicting_fees_fail_without_network() {
        let node = MockNode::new(3000);
        let builder = TransactionBuilder::new(&node);
        let request = transfer().dynamic_fee(2u64, 1u64).nonce(crate::Nonce::Auto);
        let error = builder.build(request, ALITH_KEY).await.unwrap_err();
        assert!(matches!(error, TxError::Validation(ValidationError::ConflictingFeeFields)));
        assert_eq!(node.requests(), 0);
    }

    #[tokio::test]
    async fn sender_must_own_the_key() {
        let node = MockNode::new(3000);
        let builder = TransactionBuilder::new(&node);
        let mut request = transfer().nonce(crate::Nonce::Auto);
        request.from = BALTATHAR;
        let error = builder.build(request, ALITH_KEY).await.unwrap_err();
        assert!(matches!(
            error,
            TxError::Validation(ValidationError::SenderMismatch { expected, actual })
                if expected == BALTATHAR && actual == ALITH
        ));

        let error = builder.build(transfer(), [0u8; 32]).await.unwrap_err();
        assert!(matches!(error, TxError::Signing(_)));
        assert_eq!(node.requests(), 0);
    }

    #[test]
    fn validation_order() {
        // fee checks come before required fields
        let mut request = transfer();
        request.gas_price = None;
        request.gas_limit = None;
        assert_eq!(validate(&request), Err(ValidationError::ConflictingFeeFields));

        let request = transfer().envelope(EnvelopeType::DynamicFee).chain_id(3000);
        assert_eq!(validate(&request), Err(ValidationError::ConflictingFeeFields));

        let mut request = TransactionRequest::new(ALITH)
            .gas_limit(21_000)
            .value(0u64)
            .chain_id(3000)
            .envelope(EnvelopeType::DynamicFee);
        request.max_fee_per_gas = Some(U256::one());
        let missing = ValidationError::MissingField("max_priority_fee_per_gas");
        assert_eq!(validate(&request), Err(missing));

        let mut request = transfer();
        request.gas_limit = None;
        assert_eq!(validate(&request), Err(ValidationError::MissingField("gas_limit")));

        let mut request = transfer();
        request.value = None;
        assert_eq!(validate(&request), Err(ValidationError::MissingField("value")));

        let request = transfer().envelope(EnvelopeType::AccessList);
        assert_eq!(validate(&request), Err(ValidationError::MissingField("chain_id")));

        let request = transfer().access_list(staking_access_list());
        assert_eq!(validate(&request), Err(ValidationError::AccessListOnLegacy));

        let validated = validate(&transfer()).unwrap();
        assert_eq!(validated.gas_limit, 21_000);
        assert_eq!(validated.chain_id, None);
    }

    #[tokio::test]
    async fn chain_id_must_fit_eip155_v() {
        let request = transfer().chain_id(u64::MAX);
        assert_eq!(validate(&request), Err(ValidationError::ChainIdOutOfRange(u64::MAX)));
        let request =
            transfer().chain_id(RecoveryId::MAX_CHAIN_ID + 1).envelope(EnvelopeType::AccessList);
        assert_eq!(
            validate(&request),
            Err(ValidationError::ChainIdOutOfRange(RecoveryId::MAX_CHAIN_ID + 1))
        );

        let node = MockNode::new(3000);
        let builder = TransactionBuilder::new(&node);
        let built =
            builder.build(transfer().chain_id(RecoveryId::MAX_CHAIN_ID), ALITH_KEY).await.unwrap();
        let decoded = RawTransaction::decode(built.raw()).unwrap();
        assert_eq!(decoded.transaction().chain_id(), Some(RecoveryId::MAX_CHAIN_ID));
        assert_eq!(decoded.sender(), ALITH);
    }
}
