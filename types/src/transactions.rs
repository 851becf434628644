pub mod access_list;
pub mod eip1559;
pub mod eip2930;
pub mod legacy;
pub mod signature;
pub mod signed_transaction;
pub mod typed_transaction;

use crate::{
    keccak256, rlp_utils::RlpEncodableTransaction, AccessList, Address, Bytes, H256, U256,
};
pub use eip1559::Eip1559Transaction;
pub use eip2930::Eip2930Transaction;
pub use legacy::LegacyTransaction;
use signature::Signature;
pub use signed_transaction::SignedTransaction;
pub use typed_transaction::TypedTransaction;

/// A signed envelope of any supported type.
pub type Transaction = SignedTransaction<TypedTransaction>;

/// Fee model of an envelope.
#[derive(Clone, Copy, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GasPrice {
    /// Fixed price per gas, legacy and EIP-2930 envelopes.
    Legacy(U256),
    #[serde(rename_all = "camelCase")]
    Eip1559 { max_priority_fee_per_gas: U256, max_fee_per_gas: U256 },
}

impl Default for GasPrice {
    fn default() -> Self {
        Self::Legacy(U256::zero())
    }
}

/// Read access to the fields every envelope has, plus its canonical encoding and hashes.
pub trait TransactionT: RlpEncodableTransaction {
    fn encode(&self, signature: Option<&Signature>) -> Bytes {
        match signature {
            Some(signature) => Bytes(self.rlp_signed(signature)),
            None => Bytes(self.rlp_unsigned()),
        }
    }

    /// Digest the sender signs: keccak256 of the unsigned encoding.
    fn sighash(&self) -> H256 {
        keccak256(self.rlp_unsigned())
    }

    /// keccak256 of the signed encoding.
    fn compute_tx_hash(&self, signature: &Signature) -> H256 {
        keccak256(self.rlp_signed(signature))
    }

    /// `None` only for legacy transactions without replay protection.
    fn chain_id(&self) -> Option<u64>;
    fn nonce(&self) -> u64;
    fn gas_price(&self) -> GasPrice;
    fn gas_limit(&self) -> u64;
    fn to(&self) -> Option<Address>;
    fn value(&self) -> U256;
    fn data(&self) -> &[u8];
    fn access_list(&self) -> Option<&AccessList>;
    /// EIP-2718 type byte, `None` for legacy.
    fn transaction_type(&self) -> Option<u8>;
}

pub trait SignedTransactionT: TransactionT {
    fn tx_hash(&self) -> H256;
    fn signature(&self) -> Signature;

    /// The raw transaction as accepted by `eth_sendRawTransaction`.
    fn encode_signed(&self) -> Bytes {
        self.encode(Some(&self.signature()))
    }
}
