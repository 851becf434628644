use super::{
    eip1559::Eip1559Transaction, eip2930::Eip2930Transaction, legacy::LegacyTransaction,
    signature::Signature, GasPrice, TransactionT,
};
use crate::{
    rlp_utils::{RlpDecodableTransaction, RlpEncodableTransaction},
    AccessList, Address, U256,
};
use rlp::{DecoderError, Rlp, RlpStream};

/// Any envelope the harness can build or decode, tagged in JSON by its EIP-2718 type.
#[derive(Clone, PartialEq, Eq, Debug, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum TypedTransaction {
    #[serde(rename = "0x0")]
    Legacy(LegacyTransaction),
    #[serde(rename = "0x1")]
    Eip2930(Eip2930Transaction),
    #[serde(rename = "0x2")]
    Eip1559(Eip1559Transaction),
}

impl TypedTransaction {
    fn envelope(&self) -> &dyn TransactionT {
        match self {
            Self::Legacy(tx) => tx,
            Self::Eip2930(tx) => tx,
            Self::Eip1559(tx) => tx,
        }
    }
}

impl RlpEncodableTransaction for TypedTransaction {
    fn rlp_append(&self, stream: &mut RlpStream, signature: Option<&Signature>) {
        self.envelope().rlp_append(stream, signature);
    }
}

impl RlpDecodableTransaction for TypedTransaction {
    fn rlp_decode(
        rlp: &Rlp,
        decode_signature: bool,
    ) -> Result<(Self, Option<Signature>), DecoderError> {
        fn wrap<T, F>(
            decoded: Result<(T, Option<Signature>), DecoderError>,
            variant: F,
        ) -> Result<(TypedTransaction, Option<Signature>), DecoderError>
        where
            F: FnOnce(T) -> TypedTransaction,
        {
            decoded.map(|(tx, signature)| (variant(tx), signature))
        }

        match rlp.as_raw().first().copied() {
            None => Err(DecoderError::RlpIsTooShort),
            Some(Eip2930Transaction::TRANSACTION_TYPE) => {
                wrap(Eip2930Transaction::rlp_decode(rlp, decode_signature), Self::Eip2930)
            },
            Some(Eip1559Transaction::TRANSACTION_TYPE) => {
                wrap(Eip1559Transaction::rlp_decode(rlp, decode_signature), Self::Eip1559)
            },
            // an untyped envelope starts with a list header
            Some(0xc0..=0xff) => {
                wrap(LegacyTransaction::rlp_decode(rlp, decode_signature), Self::Legacy)
            },
            Some(_) => Err(DecoderError::Custom("unsupported transaction type")),
        }
    }
}

impl From<LegacyTransaction> for TypedTransaction {
    fn from(tx: LegacyTransaction) -> Self {
        Self::Legacy(tx)
    }
}

impl From<Eip2930Transaction> for TypedTransaction {
    fn from(tx: Eip2930Transaction) -> Self {
        Self::Eip2930(tx)
    }
}

impl From<Eip1559Transaction> for TypedTransaction {
    fn from(tx: Eip1559Transaction) -> Self {
        Self::Eip1559(tx)
    }
}

impl TransactionT for TypedTransaction {
    fn chain_id(&self) -> Option<u64> {
        self.envelope().chain_id()
    }

    fn nonce(&self) -> u64 {
        self.envelope().nonce()
    }

    fn gas_price(&self) -> GasPrice {
        self.envelope().gas_price()
    }

    fn gas_limit(&self) -> u64 {
        self.envelope().gas_limit()
    }

    fn to(&self) -> Option<Address> {
        self.envelope().to()
    }

    fn value(&self) -> U256 {
        self.envelope().value()
    }

    fn data(&self) -> &[u8] {
        self.envelope().data()
    }

    fn access_list(&self) -> Option<&AccessList> {
        self.envelope().access_list()
    }

    fn transaction_type(&self) -> Option<u8> {
        self.envelope().transaction_type()
    }
}
