use crate::{
    serde_utils::{deserialize_null_default, uint_to_hex},
    Address, Bytes, H256, U256,
};

/// Receipt returned by `eth_getTransactionReceipt` once a transaction is in a block.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: H256,
    #[serde(with = "uint_to_hex")]
    pub transaction_index: u64,
    #[serde(default)]
    pub block_hash: Option<H256>,
    #[serde(default, with = "uint_to_hex")]
    pub block_number: Option<u64>,
    #[serde(default)]
    pub from: Option<Address>,
    #[serde(default)]
    pub to: Option<Address>,
    /// Gas used by the block up to and including this transaction.
    pub cumulative_gas_used: U256,
    #[serde(default)]
    pub gas_used: Option<U256>,
    #[serde(default)]
    pub contract_address: Option<Address>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub logs: Vec<Log>,
    /// `1` on success, `0` when execution reverted. Missing on pre EIP-658 nodes.
    #[serde(
        default,
        rename = "status",
        skip_serializing_if = "Option::is_none",
        with = "uint_to_hex"
    )]
    pub status_code: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_gas_price: Option<U256>,
}

impl TransactionReceipt {
    /// `true` once the node reports a block for this receipt.
    #[must_use]
    pub const fn is_included(&self) -> bool {
        self.block_hash.is_some()
    }
}

/// Log emitted while executing a transaction.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    pub address: Address,
    pub topics: Vec<H256>,
    #[serde(default)]
    pub data: Bytes,
    #[serde(default, with = "uint_to_hex")]
    pub log_index: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::TransactionReceipt;
    use crate::H256;
    use hex_literal::hex;

    #[test]
    fn decodes_node_receipt() {
        let json = serde_json::json!({
            "transactionHash": "0xcaee30b6cd9ee8e1a05fc635d7e03fc606d7b2168783c484d99d7b108b140b24",
            "transactionIndex": "0x0",
            "blockHash": "0x1111111111111111111111111111111111111111111111111111111111111111",
            "blockNumber": "0x7",
            "from": "0xf24ff3a9cf04c71dbc94d0b566f7a27b94566cac",
            "to": "0x0000000000000000000000000000000000000400",
            "cumulativeGasUsed": "0xa410",
            "gasUsed": "0xa410",
            "contractAddress": null,
            "logs": [{
                "address": "0x0000000000000000000000000000000000000400",
                "topics": ["0x2222222222222222222222222222222222222222222222222222222222222222"],
                "data": "0x",
                "logIndex": "0x0",
            }],
            "logsBloom": "0x00",
            "status": "0x1",
        });
        let receipt = serde_json::from_value::<TransactionReceipt>(json).unwrap();
        assert!(receipt.is_included());
        assert_eq!(receipt.block_number, Some(7));
        assert_eq!(receipt.status_code, Some(1));
        assert_eq!(receipt.logs.len(), 1);
        assert_eq!(
            receipt.transaction_hash,
            H256(hex!("caee30b6cd9ee8e1a05fc635d7e03fc606d7b2168783c484d99d7b108b140b24"))
        );
    }
}
