use derivative::Derivative;

use super::{signature::Signature, GasPrice, SignedTransactionT, TransactionT};
use crate::{
    crypto::{Crypto, DefaultCrypto},
    rlp_utils::{RlpDecodableTransaction, RlpEncodableTransaction},
    AccessList, Address, TxHash, U256,
};

/// Payload, signature and the hash of the signed encoding, kept consistent by [`Self::new`].
#[derive(Derivative, serde::Serialize, serde::Deserialize)]
#[derivative(Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SignedTransaction<T> {
    #[serde(rename = "hash")]
    pub tx_hash: TxHash,
    #[serde(bound = "T: serde::Serialize + serde::de::DeserializeOwned", flatten)]
    pub payload: T,
    #[serde(flatten)]
    pub signature: Signature,
}

impl<T> SignedTransaction<T>
where
    T: TransactionT,
{
    pub fn new(payload: T, signature: Signature) -> Self {
        let tx_hash = payload.compute_tx_hash(&signature);
        Self { tx_hash, payload, signature }
    }

    /// Sender recovered from the signature over the payload sighash.
    ///
    /// # Errors
    /// Returns an error if the signature does not recover to a public key.
    pub fn compute_from<C: Crypto>(&self) -> Result<Address, C::Error> {
        C::secp256k1_ecdsa_recover(&self.signature, self.payload.sighash())
    }

    /// [`Self::compute_from`] with the secp256k1 backend.
    ///
    /// # Errors
    /// Returns an error if the signature does not recover to a public key.
    pub fn from(&self) -> Result<Address, <DefaultCrypto as Crypto>::Error> {
        self.compute_from::<DefaultCrypto>()
    }
}

impl<T> SignedTransaction<T>
where
    T: RlpDecodableTransaction + TransactionT,
{
    /// Decodes a signed raw transaction as broadcast by `eth_sendRawTransaction`.
    ///
    /// # Errors
    /// Returns an error if the bytes are not a well formed signed envelope.
    pub fn decode_raw(raw: &[u8]) -> Result<Self, rlp::DecoderError> {
        let (payload, signature) = T::rlp_decode(&rlp::Rlp::new(raw), true)?;
        let signature = signature.ok_or(rlp::DecoderError::Custom("tx signature is missing"))?;
        Ok(Self::new(payload, signature))
    }
}

impl<T> RlpEncodableTransaction for SignedTransaction<T>
where
    T: TransactionT,
{
    fn rlp_append(&self, stream: &mut rlp::RlpStream, signature: Option<&Signature>) {
        self.payload.rlp_append(stream, signature);
    }
}

impl<T> rlp::Encodable for SignedTransaction<T>
where
    T: TransactionT,
{
    fn rlp_append(&self, stream: &mut rlp::RlpStream) {
        self.payload.rlp_append(stream, Some(&self.signature));
    }
}

impl<T> TransactionT for SignedTransaction<T>
where
    T: TransactionT,
{
    fn chain_id(&self) -> Option<u64> {
        self.payload.chain_id()
    }

    fn nonce(&self) -> u64 {
        self.payload.nonce()
    }

    fn gas_price(&self) -> GasPrice {
        self.payload.gas_price()
    }

    fn gas_limit(&self) -> u64 {
        self.payload.gas_limit()
    }

    fn to(&self) -> Option<Address> {
        self.payload.to()
    }

    fn value(&self) -> U256 {
        self.payload.value()
    }

    fn data(&self) -> &[u8] {
        self.payload.data()
    }

    fn access_list(&self) -> Option<&AccessList> {
        self.payload.access_list()
    }

    fn transaction_type(&self) -> Option<u8> {
        self.payload.transaction_type()
    }
}

impl<T> SignedTransactionT for SignedTransaction<T>
where
    T: TransactionT,
{
    fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    fn signature(&self) -> Signature {
        self.signature
    }
}

#[cfg(test)]
mod tests {
    use super::SignedTransaction;
    use crate::{
        transactions::{
            eip1559::tests::{dynamic_fee_transfer, ONE_UNIT_TRANSFER},
            eip2930::tests::{access_list_call, MIN_NOMINATION_CALL},
            legacy::tests::{
                legacy_transfer, protected_signature, unprotected_signature, PROTECTED_TRANSFER,
                UNPROTECTED_TRANSFER,
            },
            SignedTransactionT, TransactionT, TypedTransaction,
        },
        Address, Transaction, H160,
    };
    use hex_literal::hex;

    const ALITH: Address = H160(hex!("f24ff3a9cf04c71dbc94d0b566f7a27b94566cac"));

    #[test]
    fn recovers_sender_of_every_envelope() {
        let (eip1559, sig) = dynamic_fee_transfer();
        let tx = SignedTransaction::new(TypedTransaction::from(eip1559), sig);
        assert_eq!(tx.from().unwrap(), ALITH);

        let (eip2930, sig) = access_list_call();
        let tx = SignedTransaction::new(TypedTransaction::from(eip2930), sig);
        assert_eq!(tx.from().unwrap(), ALITH);

        let tx = SignedTransaction::new(legacy_transfer(None), unprotected_signature());
        assert_eq!(tx.from().unwrap(), ALITH);

        let tx = SignedTransaction::new(legacy_transfer(Some(3000)), protected_signature());
        assert_eq!(tx.from().unwrap(), ALITH);
    }

    #[test]
    fn reference_encodings_recover_the_signer() {
        let vectors =
            [UNPROTECTED_TRANSFER, PROTECTED_TRANSFER, MIN_NOMINATION_CALL, ONE_UNIT_TRANSFER];
        for raw in vectors {
            let decoded = Transaction::decode_raw(raw).unwrap();
            assert_eq!(decoded.from().unwrap(), ALITH);
            assert_eq!(decoded.encode_signed().as_ref(), raw);
            assert_eq!(decoded.tx_hash(), crate::keccak256(raw));
        }
    }

    #[test]
    fn decode_raw_roundtrips_hash() {
        let (eip1559, sig) = dynamic_fee_transfer();
        let signed = SignedTransaction::new(TypedTransaction::from(eip1559), sig);
        let raw = signed.encode_signed();
        let decoded = Transaction::decode_raw(&raw).unwrap();
        assert_eq!(decoded, signed);
        assert_eq!(decoded.tx_hash(), signed.tx_hash);

        let unsigned = signed.payload.encode(None);
        assert!(Transaction::decode_raw(&unsigned).is_err());
    }

    #[test]
    fn serde_flattens_payload_and_signature() {
        let signed = SignedTransaction::new(legacy_transfer(Some(3000)), protected_signature());
        let json = serde_json::to_value(&signed).unwrap();
        assert_eq!(
            json["hash"],
            "0xc9eeeee394cf0cf3d40a3f2f176784d55df60efd6c0bbc4189d06b0a184cad5c"
        );
        assert_eq!(json["nonce"], "0x0");
        assert_eq!(json["v"], "0x1794");
    }
}
