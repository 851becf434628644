use crate::transactions::signature::Signature;
use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};

pub trait RlpStreamExt {
    /// Appends an optional value to the end of stream, chainable.
    ///
    /// ```
    /// use rlp::RlpStream;
    /// use harness_types::rlp_utils::RlpStreamExt;
    /// let mut stream = RlpStream::new_list(2);
    /// stream.append_opt(Some(&"cat")).append_opt(Option::<&u32>::None);
    /// let out = stream.out();
    /// assert_eq!(out, vec![0xc5, 0x83, b'c', b'a', b't', 0x80]);
    /// ```
    fn append_opt<E: Encodable>(&mut self, value: Option<&E>) -> &mut Self;
}

impl RlpStreamExt for RlpStream {
    fn append_opt<E: Encodable>(&mut self, opt: Option<&E>) -> &mut Self {
        if let Some(inner) = opt {
            self.append(inner);
        } else {
            self.append_empty_data();
        }
        self
    }
}

pub trait RlpExt {
    /// Decodes the item at `index`, an empty byte string decodes to `None`.
    #[allow(clippy::missing_errors_doc)]
    fn opt_at<T: Decodable>(&self, index: usize) -> Result<Option<T>, DecoderError>;
}

impl RlpExt for Rlp<'_> {
    fn opt_at<T: Decodable>(&self, index: usize) -> Result<Option<T>, DecoderError> {
        let item = self.at(index)?;
        if item.is_empty() {
            if item.is_data() {
                Ok(None)
            } else {
                Err(DecoderError::RlpExpectedToBeData)
            }
        } else {
            item.as_val().map(Some)
        }
    }
}

/// Encoding of a transaction payload with or without its signature.
///
/// Typed envelopes write their EIP-2718 type byte ahead of the rlp list.
pub trait RlpEncodableTransaction {
    fn rlp_append(&self, stream: &mut RlpStream, signature: Option<&Signature>);

    fn rlp_unsigned(&self) -> bytes::Bytes {
        let mut stream = RlpStream::new();
        self.rlp_append(&mut stream, None);
        stream.out().freeze()
    }

    fn rlp_signed(&self, signature: &Signature) -> bytes::Bytes {
        let mut stream = RlpStream::new();
        self.rlp_append(&mut stream, Some(signature));
        stream.out().freeze()
    }
}

#[allow(clippy::missing_errors_doc)]
pub trait RlpDecodableTransaction: Sized {
    /// Decodes the payload, and the signature when present and `decode_signature` is set.
    fn rlp_decode(rlp: &Rlp, decode_signature: bool)
        -> Result<(Self, Option<Signature>), DecoderError>;

    fn rlp_decode_unsigned(rlp: &Rlp) -> Result<Self, DecoderError> {
        Self::rlp_decode(rlp, false).map(|(tx, _)| tx)
    }

    fn rlp_decode_signed(rlp: &Rlp) -> Result<(Self, Option<Signature>), DecoderError> {
        Self::rlp_decode(rlp, true)
    }
}

/// Payload list of a typed envelope, after checking its type byte.
fn typed_payload<'a>(rlp: &Rlp<'a>, tx_type: u8) -> Result<Rlp<'a>, DecoderError> {
    match rlp.as_raw().split_first() {
        Some((first, payload)) if *first == tx_type => Ok(Rlp::new(payload)),
        Some(_) => Err(DecoderError::Custom("invalid transaction type")),
        None => Err(DecoderError::RlpIsTooShort),
    }
}

/// Writes `tx_type || rlp([fields..., y_parity, r, s])`, the signature items only when signed.
pub(crate) fn append_typed<F>(
    stream: &mut RlpStream,
    tx_type: u8,
    fields: usize,
    signature: Option<&Signature>,
    append_fields: F,
) where
    F: FnOnce(&mut RlpStream),
{
    stream.append_raw(&[tx_type], 0);
    stream.begin_list(if signature.is_some() { fields + 3 } else { fields });
    append_fields(stream);
    if let Some(signature) = signature {
        stream.append(&signature.v.y_parity()).append(&signature.r).append(&signature.s);
    }
}

/// Reverse of [`append_typed`]. Accepts signed and unsigned payloads.
pub(crate) fn decode_typed<T, F>(
    rlp: &Rlp,
    tx_type: u8,
    fields: usize,
    decode_signature: bool,
    decode_fields: F,
) -> Result<(T, Option<Signature>), DecoderError>
where
    F: FnOnce(&Rlp) -> Result<T, DecoderError>,
{
    let list = typed_payload(rlp, tx_type)?;
    let items = list.item_count()?;
    if items != fields && items != fields + 3 {
        return Err(DecoderError::RlpIncorrectListLen);
    }
    let tx = decode_fields(&list)?;
    if items == fields || !decode_signature {
        return Ok((tx, None));
    }
    let signature = Signature {
        v: list.val_at(fields)?,
        r: list.val_at(fields + 1)?,
        s: list.val_at(fields + 2)?,
    };
    Ok((tx, Some(signature)))
}
