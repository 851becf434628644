use super::{signature::Signature, GasPrice, TransactionT};
use crate::{
    rlp_utils::{
        append_typed, decode_typed, RlpDecodableTransaction, RlpEncodableTransaction, RlpExt,
        RlpStreamExt,
    },
    serde_utils::uint_to_hex,
    AccessList, Address, Bytes, U256,
};
use rlp::{DecoderError, Rlp, RlpStream};

/// Type `0x01` envelope: legacy pricing plus a declared access list.
#[derive(Clone, Default, PartialEq, Eq, Debug, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip2930Transaction {
    #[serde(with = "uint_to_hex")]
    pub chain_id: u64,
    #[serde(with = "uint_to_hex")]
    pub nonce: u64,
    pub gas_price: U256,
    #[serde(rename = "gas", with = "uint_to_hex")]
    pub gas_limit: u64,
    /// `None` deploys a contract.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    pub value: U256,
    #[serde(default, skip_serializing_if = "Bytes::is_empty")]
    pub data: Bytes,
    #[serde(default)]
    pub access_list: AccessList,
}

impl Eip2930Transaction {
    pub const TRANSACTION_TYPE: u8 = 0x01;
    const FIELDS: usize = 8;
}

impl RlpEncodableTransaction for Eip2930Transaction {
    fn rlp_append(&self, stream: &mut RlpStream, signature: Option<&Signature>) {
        append_typed(stream, Self::TRANSACTION_TYPE, Self::FIELDS, signature, |list| {
            list.append(&self.chain_id)
                .append(&self.nonce)
                .append(&self.gas_price)
                .append(&self.gas_limit)
                .append_opt(self.to.as_ref())
                .append(&self.value)
                .append(&self.data)
                .append(&self.access_list);
        });
    }
}

impl RlpDecodableTransaction for Eip2930Transaction {
    fn rlp_decode(
        rlp: &Rlp,
        decode_signature: bool,
    ) -> Result<(Self, Option<Signature>), DecoderError> {
        decode_typed(rlp, Self::TRANSACTION_TYPE, Self::FIELDS, decode_signature, |list| {
            Ok(Self {
                chain_id: list.val_at(0)?,
                nonce: list.val_at(1)?,
                gas_price: list.val_at(2)?,
                gas_limit: list.val_at(3)?,
                to: list.opt_at(4)?,
                value: list.val_at(5)?,
                data: list.val_at(6)?,
                access_list: list.val_at(7)?,
            })
        })
    }
}

impl TransactionT for Eip2930Transaction {
    fn chain_id(&self) -> Option<u64> {
        Some(self.chain_id)
    }

    fn nonce(&self) -> u64 {
        self.nonce
    }

    fn gas_price(&self) -> GasPrice {
        GasPrice::Legacy(self.gas_price)
    }

    fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    fn to(&self) -> Option<Address> {
        self.to
    }

    fn value(&self) -> U256 {
        self.value
    }

    fn data(&self) -> &[u8] {
        &self.data
    }

    fn access_list(&self) -> Option<&AccessList> {
        Some(&self.access_list)
    }

    fn transaction_type(&self) -> Option<u8> {
        Some(Self::TRANSACTION_TYPE)
    }
}
