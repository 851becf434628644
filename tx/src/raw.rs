use harness_types::{
    keccak256, Address, Bytes, SignedTransactionT, Transaction, TransactionT, TxHash,
};

use crate::TxError;

/// Signed, serialized transaction ready for `eth_sendRawTransaction`. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTransaction {
    raw: Bytes,
    tx_hash: TxHash,
    sender: Address,
    transaction: Transaction,
}

impl RawTransaction {
    pub(crate) fn new(transaction: Transaction, sender: Address) -> Self {
        let raw = transaction.encode_signed();
        Self { tx_hash: transaction.tx_hash(), raw, sender, transaction }
    }

    /// Decodes a signed envelope of any supported type and recovers its sender.
    ///
    /// # Errors
    /// Returns `Err` if the bytes are not a signed envelope or the signature doesn't recover.
    pub fn decode<B: AsRef<[u8]>>(raw: B) -> Result<Self, TxError> {
        let raw = raw.as_ref();
        let transaction = Transaction::decode_raw(raw)?;
        let sender = transaction.from()?;
        Ok(Self { raw: Bytes::from(raw), tx_hash: keccak256(raw), sender, transaction })
    }

    /// The serialized envelope
    #[must_use]
    pub const fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// keccak256 of the serialized envelope
    #[must_use]
    pub const fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    #[must_use]
    pub const fn sender(&self) -> Address {
        self.sender
    }

    #[must_use]
    pub fn nonce(&self) -> u64 {
        self.transaction.nonce()
    }

    #[must_use]
    pub const fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    #[must_use]
    pub fn into_raw(self) -> Bytes {
        self.raw
    }
}
