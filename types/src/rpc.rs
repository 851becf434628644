//! JSON-RPC payloads exchanged with the node.
use crate::{
    serde_utils::{deserialize_null_default, uint_to_hex},
    transactions::signature::Signature,
    AccessList, Address, Bytes, TxHash, H256, U256,
};

/// Call request for `eth_call` and adjacent methods.
#[derive(Clone, Default, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    /// Sender address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,

    /// Recipient address (None for contract creation)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,

    /// Supplied gas (None for sensible default)
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "gas", with = "uint_to_hex")]
    pub gas_limit: Option<u64>,

    /// Gas price (None for sensible default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<U256>,

    /// Transferred value (None for no transfer)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
}

/// Transaction object returned by `eth_getTransactionByHash`.
#[derive(Clone, Default, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTransaction {
    pub hash: TxHash,

    #[serde(with = "uint_to_hex")]
    pub nonce: u64,

    /// Hash of the block this transaction was included within, `None` while pending.
    #[serde(default)]
    pub block_hash: Option<H256>,

    #[serde(default, with = "uint_to_hex")]
    pub block_number: Option<u64>,

    #[serde(default, with = "uint_to_hex")]
    pub transaction_index: Option<u64>,

    pub from: Address,

    #[serde(default)]
    pub to: Option<Address>,

    pub value: U256,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<U256>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<U256>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<U256>,

    #[serde(default, rename = "gas")]
    pub gas_limit: U256,

    #[serde(default)]
    pub input: Bytes,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "uint_to_hex")]
    pub chain_id: Option<u64>,

    #[serde(default, flatten)]
    pub signature: Signature,

    #[serde(
        default,
        deserialize_with = "deserialize_null_default",
        skip_serializing_if = "AccessList::is_empty"
    )]
    pub access_list: AccessList,

    /// EIP-2718 type, absent on nodes that predate typed transactions
    #[serde(
        default,
        rename = "type",
        skip_serializing_if = "Option::is_none",
        with = "uint_to_hex"
    )]
    pub transaction_type: Option<u64>,
}

/// Block header fields consumed when confirming inclusion, transactions are kept as hashes.
#[derive(Clone, Default, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcBlock {
    pub hash: H256,

    pub parent_hash: H256,

    #[serde(with = "uint_to_hex")]
    pub number: u64,

    #[serde(with = "uint_to_hex")]
    pub timestamp: u64,

    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub transactions: Vec<TxHash>,
}

/// Progress reported by `eth_syncing` while the node imports blocks.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncProgress {
    #[serde(with = "uint_to_hex")]
    pub starting_block: u64,
    #[serde(with = "uint_to_hex")]
    pub current_block: u64,
    #[serde(with = "uint_to_hex")]
    pub highest_block: u64,
}

/// Result of `eth_syncing`, either `false` or the sync progress object.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SyncStatus {
    NotSyncing,
    Syncing(SyncProgress),
}

impl SyncStatus {
    #[must_use]
    pub const fn is_syncing(&self) -> bool {
        matches!(self, Self::Syncing(_))
    }
}

impl serde::Serialize for SyncStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        match self {
            Self::NotSyncing => serializer.serialize_bool(false),
            Self::Syncing(progress) => progress.serialize(serializer),
        }
    }
}

impl<'de> serde::Deserialize<'de> for SyncStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Flag(bool),
            Progress(SyncProgress),
        }

        match <Repr as serde::Deserialize>::deserialize(deserializer)? {
            Repr::Flag(false) => Ok(Self::NotSyncing),
            Repr::Flag(true) => Ok(Self::Syncing(SyncProgress::default())),
            Repr::Progress(progress) => Ok(Self::Syncing(progress)),
        }
    }
}
