mod bytes;
pub mod crypto;
pub mod rlp_utils;
pub mod rpc;
pub mod serde_utils;
pub mod transactions;
mod tx_receipt;

pub use crate::bytes::Bytes;
pub use crypto::{keccak256, Keypair, Signer};
pub use primitive_types::{H160, H256, U256};
pub use rpc::{CallRequest, RpcBlock, RpcTransaction, SyncProgress, SyncStatus};
pub use transactions::{
    access_list::{AccessList, AccessListItem},
    signature::{RecoveryId, Signature},
    signed_transaction::SignedTransaction,
    typed_transaction::TypedTransaction,
    Eip1559Transaction, Eip2930Transaction, GasPrice, LegacyTransaction, SignedTransactionT,
    Transaction, TransactionT,
};
pub use tx_receipt::{Log, TransactionReceipt};

use core::fmt::{Display, Formatter, Result as FmtResult};

pub type Address = H160;
pub type TxHash = H256;

/// Re-exports for downstream crates to not require any additional
/// dependencies to be explicitly added on the client side.
pub mod ext {
    pub use primitive_types;
    pub use rlp;
    pub use secp256k1;
    pub use serde;
}

/// Block parameter of the `eth_*` methods: a tag, a number or a hash.
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum AtBlock {
    #[default]
    Latest,
    /// State including the transactions still in the pool, used for nonces.
    Pending,
    Number(u64),
    Hash(H256),
}

impl From<H256> for AtBlock {
    fn from(hash: H256) -> Self {
        Self::Hash(hash)
    }
}

impl From<u64> for AtBlock {
    fn from(number: u64) -> Self {
        Self::Number(number)
    }
}

impl Display for AtBlock {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Pending => f.write_str("pending"),
            Self::Number(number) => write!(f, "{number:#x}"),
            Self::Hash(hash) => write!(f, "{hash:?}"),
        }
    }
}

impl serde::Serialize for AtBlock {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{AtBlock, H256};

    #[test]
    fn block_parameter_is_tag_quantity_or_hash() {
        assert_eq!(serde_json::to_value(AtBlock::Pending).unwrap(), "pending");
        assert_eq!(serde_json::to_value(AtBlock::from(26u64)).unwrap(), "0x1a");
        assert_eq!(
            serde_json::to_value(AtBlock::from(H256::repeat_byte(0xab))).unwrap(),
            format!("0x{}", "ab".repeat(32))
        );
    }
}
