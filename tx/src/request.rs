use harness_types::{AccessList, Address, Bytes, U256};

/// Wire envelope of the transaction to build.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeType {
    /// Pre EIP-2718 transaction, EIP-155 protected when a chain id is set.
    #[default]
    Legacy,
    /// EIP-2930, type `0x01`.
    AccessList,
    /// EIP-1559, type `0x02`.
    DynamicFee,
}

/// Nonce of the transaction, `Auto` is resolved from the sender's pending transaction count.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nonce {
    #[default]
    Auto,
    Fixed(u64),
}

impl From<u64> for Nonce {
    fn from(nonce: u64) -> Self {
        Self::Fixed(nonce)
    }
}

/// Logical transaction assembled by the caller and consumed once by the builder.
///
/// Fee fields are independent so contradictory combinations can be expressed, and rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Option<Address>,
    pub nonce: Nonce,
    pub gas_limit: Option<u64>,
    pub gas_price: Option<U256>,
    pub max_fee_per_gas: Option<U256>,
    pub max_priority_fee_per_gas: Option<U256>,
    pub value: Option<U256>,
    pub data: Bytes,
    pub access_list: Option<AccessList>,
    pub chain_id: Option<u64>,
    pub envelope: EnvelopeType,
}

impl TransactionRequest {
    #[must_use]
    pub fn new(from: Address) -> Self {
        Self {
            from,
            to: None,
            nonce: Nonce::Auto,
            gas_limit: None,
            gas_price: None,
            max_fee_per_gas: None,
            max_priority_fee_per_gas: None,
            value: None,
            data: Bytes::new(),
            access_list: None,
            chain_id: None,
            envelope: EnvelopeType::Legacy,
        }
    }

    #[must_use]
    pub fn to(mut self, to: Address) -> Self {
        self.to = Some(to);
        self
    }

    #[must_use]
    pub fn nonce<N: Into<Nonce>>(mut self, nonce: N) -> Self {
        self.nonce = nonce.into();
        self
    }

    #[must_use]
    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    #[must_use]
    pub fn gas_price<P: Into<U256>>(mut self, gas_price: P) -> Self {
        self.gas_price = Some(gas_price.into());
        self
    }

    /// Sets the EIP-1559 fee pair.
    #[must_use]
    pub fn dynamic_fee<F: Into<U256>, P: Into<U256>>(
        mut self,
        max_fee_per_gas: F,
        max_priority_fee_per_gas: P,
    ) -> Self {
        self.max_fee_per_gas = Some(max_fee_per_gas.into());
        self.max_priority_fee_per_gas = Some(max_priority_fee_per_gas.into());
        self
    }

    #[must_use]
    pub fn value<V: Into<U256>>(mut self, value: V) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn data<D: Into<Bytes>>(mut self, data: D) -> Self {
        self.data = data.into();
        self
    }

    #[must_use]
    pub fn access_list<L: Into<AccessList>>(mut self, access_list: L) -> Self {
        self.access_list = Some(access_list.into());
        self
    }

    #[must_use]
    pub fn chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    #[must_use]
    pub fn envelope(mut self, envelope: EnvelopeType) -> Self {
        self.envelope = envelope;
        self
    }
}
