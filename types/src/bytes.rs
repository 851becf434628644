use core::{
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    ops::Deref,
    str::FromStr,
};
use serde::{Deserialize, Deserializer, Serializer};

/// Byte string shown and serialized as `0x` prefixed hex, rlp encoded as a byte string.
#[derive(Clone, Default, PartialEq, Eq, Hash, Ord, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct Bytes(
    #[serde(serialize_with = "to_hex", deserialize_with = "from_hex")] pub bytes::Bytes,
);

impl Bytes {
    #[must_use]
    pub const fn new() -> Self {
        Self(bytes::Bytes::new())
    }

    #[must_use]
    pub const fn from_static(bytes: &'static [u8]) -> Self {
        Self(bytes::Bytes::from_static(bytes))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl Display for Bytes {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&const_hex::encode_prefixed(&self.0))
    }
}

impl Debug for Bytes {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Bytes({self})")
    }
}

impl Deref for Bytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<bytes::Bytes> for Bytes {
    fn from(bytes: bytes::Bytes) -> Self {
        Self(bytes)
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes.into())
    }
}

impl From<&[u8]> for Bytes {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes::Bytes::copy_from_slice(bytes))
    }
}

impl<const N: usize> From<[u8; N]> for Bytes {
    fn from(bytes: [u8; N]) -> Self {
        Self::from(bytes.as_slice())
    }
}

impl PartialEq<[u8]> for Bytes {
    fn eq(&self, other: &[u8]) -> bool {
        self.0[..] == *other
    }
}

impl rlp::Encodable for Bytes {
    fn rlp_append(&self, stream: &mut rlp::RlpStream) {
        stream.encoder().encode_value(self.0.as_ref());
    }
}

impl rlp::Decodable for Bytes {
    fn decode(rlp: &rlp::Rlp) -> Result<Self, rlp::DecoderError> {
        rlp.as_val::<Vec<u8>>().map(Self::from)
    }
}

/// Rejected hex input, with or without the `0x` prefix.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid hex bytes: {0}")]
pub struct ParseBytesError(#[from] const_hex::FromHexError);

impl FromStr for Bytes {
    type Err = ParseBytesError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(const_hex::decode(value)?.into())
    }
}

fn to_hex<S: Serializer>(bytes: &bytes::Bytes, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&const_hex::encode_prefixed(bytes))
}

fn from_hex<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bytes::Bytes, D::Error> {
    let value = <String as Deserialize>::deserialize(deserializer)?;
    const_hex::decode(value).map(Into::into).map_err(serde::de::Error::custom)
}
