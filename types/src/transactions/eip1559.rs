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

/// Type `0x02` envelope. The sender pays the block base fee plus a tip, capped by
/// `max_fee_per_gas`.
#[derive(Clone, Default, PartialEq, Eq, Debug, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip1559Transaction {
    #[serde(with = "uint_to_hex")]
    pub chain_id: u64,
    #[serde(with = "uint_to_hex")]
    pub nonce: u64,
    /// Tip for the block author, per gas.
    pub max_priority_fee_per_gas: U256,
    /// Ceiling on base fee plus tip, per gas.
    pub max_fee_per_gas: U256,
    #[serde(rename = "gas", with = "uint_to_hex")]
    pub gas_limit: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    pub value: U256,
    #[serde(default, skip_serializing_if = "Bytes::is_empty")]
    pub data: Bytes,
    #[serde(default)]
    pub access_list: AccessList,
}

impl Eip1559Transaction {
    pub const TRANSACTION_TYPE: u8 = 0x02;
    const FIELDS: usize = 9;
}

impl RlpEncodableTransaction for Eip1559Transaction {
    fn rlp_append(&self, stream: &mut RlpStream, signature: Option<&Signature>) {
        append_typed(stream, Self::TRANSACTION_TYPE, Self::FIELDS, signature, |list| {
            list.append(&self.chain_id)
                .append(&self.nonce)
                .append(&self.max_priority_fee_per_gas)
                .append(&self.max_fee_per_gas)
                .append(&self.gas_limit)
                .append_opt(self.to.as_ref())
                .append(&self.value)
                .append(&self.data)
                .append(&self.access_list);
        });
    }
}

impl RlpDecodableTransaction for Eip1559Transaction {
    fn rlp_decode(
        rlp: &Rlp,
        decode_signature: bool,
    ) -> Result<(Self, Option<Signature>), DecoderError> {
        decode_typed(rlp, Self::TRANSACTION_TYPE, Self::FIELDS, decode_signature, |list| {
            Ok(Self {
                chain_id: list.val_at(0)?,
                nonce: list.val_at(1)?,
                max_priority_fee_per_gas: list.val_at(2)?,
                max_fee_per_gas: list.val_at(3)?,
                gas_limit: list.val_at(4)?,
                to: list.opt_at(5)?,
                value: list.val_at(6)?,
                data: list.val_at(7)?,
                access_list: list.val_at(8)?,
            })
        })
    }
}

impl TransactionT for Eip1559Transaction {
    fn chain_id(&self) -> Option<u64> {
        Some(self.chain_id)
    }

    fn nonce(&self) -> u64 {
        self.nonce
    }

    fn gas_price(&self) -> GasPrice {
        GasPrice::Eip1559 {
            max_priority_fee_per_gas: self.max_priority_fee_per_gas,
            max_fee_per_gas: self.max_fee_per_gas,
        }
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

#[cfg(test)]
pub(crate) mod tests {
    use super::Eip1559Transaction;
    use crate::{
        rlp_utils::{RlpDecodableTransaction, RlpEncodableTransaction},
        transactions::{
            signature::{RecoveryId, Signature},
            GasPrice, TransactionT,
        },
        AccessList, Address, Bytes, H256,
    };
    use hex_literal::hex;

    /// One unit sent from alith to baltathar on chain 3000.
    pub static ONE_UNIT_TRANSFER: &[u8] = &hex!("02f877820bb802843b9aca008601d1a94a2000830186a0943cd0a705a2dc65e5b1e1205896baa2be8a07c6e0880de0b6b3a764000080c080a01830b85cd13717c49ce230bb5dc7b19fc214b7e2c768c3e208f6969104d3eebca03b7a5738c9194681ff298e566c93bc08c339fe17cc23ce5a66c3973ee18deac6");

    pub fn dynamic_fee_transfer() -> (Eip1559Transaction, Signature) {
        let tx = Eip1559Transaction {
            chain_id: 3000,
            nonce: 2,
            max_priority_fee_per_gas: 1_000_000_000u64.into(),
            max_fee_per_gas: 2_000_000_000_000u64.into(),
            gas_limit: 100_000,
            to: Some(Address::from(hex!("3cd0a705a2dc65e5b1e1205896baa2be8a07c6e0"))),
            value: 1_000_000_000_000_000_000u128.into(),
            data: Bytes::new(),
            access_list: AccessList::default(),
        };
        let signature = Signature {
            v: RecoveryId::new(0),
            r: hex!("1830b85cd13717c49ce230bb5dc7b19fc214b7e2c768c3e208f6969104d3eebc").into(),
            s: hex!("3b7a5738c9194681ff298e566c93bc08c339fe17cc23ce5a66c3973ee18deac6").into(),
        };
        (tx, signature)
    }

    #[test]
    fn json_uses_rpc_field_names() {
        let (tx, _) = dynamic_fee_transfer();
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "chainId": "0xbb8",
                "nonce": "0x2",
                "maxPriorityFeePerGas": "0x3b9aca00",
                "maxFeePerGas": "0x1d1a94a2000",
                "gas": "0x186a0",
                "to": "0x3cd0a705a2dc65e5b1e1205896baa2be8a07c6e0",
                "value": "0xde0b6b3a7640000",
                "accessList": [],
            })
        );
        assert_eq!(serde_json::from_value::<Eip1559Transaction>(json).unwrap(), tx);
    }

    #[test]
    fn encodes_y_parity_not_eip155_v() {
        let (tx, signature) = dynamic_fee_transfer();
        assert_eq!(Bytes::from(tx.rlp_signed(&signature)), Bytes::from_static(ONE_UNIT_TRANSFER));
        // y_parity 0 is the empty string right before r
        assert_eq!(ONE_UNIT_TRANSFER[ONE_UNIT_TRANSFER.len() - 67], 0x80);
    }

    #[test]
    fn unsigned_decoder_drops_signature() {
        let (expected, signature) = dynamic_fee_transfer();
        let rlp = rlp::Rlp::new(ONE_UNIT_TRANSFER);
        let decoded = Eip1559Transaction::rlp_decode_signed(&rlp).unwrap();
        assert_eq!(decoded, (expected.clone(), Some(signature)));
        assert_eq!(Eip1559Transaction::rlp_decode_unsigned(&rlp).unwrap(), expected);
    }

    #[test]
    fn hash_and_fee_model() {
        let (tx, signature) = dynamic_fee_transfer();
        assert_eq!(
            tx.compute_tx_hash(&signature),
            H256(hex!("e808272addb70d03a568d0c33874847fc1d6ac5405092e9541215453eb7b2ab3"))
        );
        assert_eq!(
            tx.gas_price(),
            GasPrice::Eip1559 {
                max_priority_fee_per_gas: 1_000_000_000u64.into(),
                max_fee_per_gas: 2_000_000_000_000u64.into(),
            }
        );
    }
}
