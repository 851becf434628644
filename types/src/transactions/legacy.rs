use super::{signature::Signature, GasPrice, TransactionT};
use crate::{
    rlp_utils::{RlpDecodableTransaction, RlpEncodableTransaction, RlpExt, RlpStreamExt},
    serde_utils::uint_to_hex,
    AccessList, Address, Bytes, U256,
};
use rlp::{DecoderError, Rlp, RlpStream};

/// Untyped envelope, a bare rlp list with no type byte.
///
/// With `chain_id` set the transaction is replay protected: the unsigned payload ends in
/// `[chain_id, 0, 0]` and the signature carries `v = 35 + 2 * chain_id + parity`.
#[derive(Clone, Default, PartialEq, Eq, Debug, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyTransaction {
    #[serde(with = "uint_to_hex")]
    pub nonce: u64,
    pub gas_price: U256,
    #[serde(rename = "gas", with = "uint_to_hex")]
    pub gas_limit: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    pub value: U256,
    #[serde(default, skip_serializing_if = "Bytes::is_empty")]
    pub data: Bytes,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "uint_to_hex")]
    pub chain_id: Option<u64>,
}

impl LegacyTransaction {
    const FIELDS: usize = 6;
}

impl RlpEncodableTransaction for LegacyTransaction {
    fn rlp_append(&self, stream: &mut RlpStream, signature: Option<&Signature>) {
        let trailer = self.chain_id.is_some() || signature.is_some();
        stream.begin_list(if trailer { Self::FIELDS + 3 } else { Self::FIELDS });
        stream
            .append(&self.nonce)
            .append(&self.gas_price)
            .append(&self.gas_limit)
            .append_opt(self.to.as_ref())
            .append(&self.value)
            .append(&self.data);

        if let Some(signature) = signature {
            let v = match self.chain_id {
                Some(chain_id) => signature.v.as_eip155(chain_id),
                None => signature.v.as_legacy(),
            };
            stream.append(&v).append(&signature.r).append(&signature.s);
        } else if let Some(chain_id) = self.chain_id {
            stream.append(&chain_id).append_empty_data().append_empty_data();
        }
    }
}

impl rlp::Encodable for LegacyTransaction {
    fn rlp_append(&self, stream: &mut RlpStream) {
        RlpEncodableTransaction::rlp_append(self, stream, None);
    }
}

impl RlpDecodableTransaction for LegacyTransaction {
    fn rlp_decode(
        rlp: &Rlp,
        decode_signature: bool,
    ) -> Result<(Self, Option<Signature>), DecoderError> {
        let items = rlp.item_count()?;
        if items != Self::FIELDS && items != Self::FIELDS + 3 {
            return Err(DecoderError::RlpIncorrectListLen);
        }

        let mut tx = Self {
            nonce: rlp.val_at(0)?,
            gas_price: rlp.val_at(1)?,
            gas_limit: rlp.val_at(2)?,
            to: rlp.opt_at(3)?,
            value: rlp.val_at(4)?,
            data: rlp.val_at(5)?,
            chain_id: None,
        };
        if items == Self::FIELDS {
            return Ok((tx, None));
        }

        let (r, s) = (rlp.at(7)?, rlp.at(8)?);
        if r.is_empty() && s.is_empty() {
            // unsigned replay protected payload
            tx.chain_id = Some(rlp.val_at(6)?);
            return Ok((tx, None));
        }

        let signature = Signature { v: rlp.val_at(6)?, r: r.as_val()?, s: s.as_val()? };
        tx.chain_id = signature.v.chain_id();
        Ok((tx, decode_signature.then_some(signature)))
    }
}

impl rlp::Decodable for LegacyTransaction {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        Self::rlp_decode_unsigned(rlp)
    }
}

impl TransactionT for LegacyTransaction {
    fn chain_id(&self) -> Option<u64> {
        self.chain_id
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
        None
    }

    fn transaction_type(&self) -> Option<u8> {
        None
    }
}
