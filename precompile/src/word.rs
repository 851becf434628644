use core::{
    fmt::{Debug, Display, Formatter, LowerHex, Result as FmtResult},
    str::FromStr,
};
use harness_types::{Address, H256, U256};

/// A 32 byte big-endian parameter word, as laid out after the selector in calldata.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Word(pub [u8; 32]);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseWordError {
    #[error("{0} bytes don't fit in a 32 byte word")]
    TooLong(usize),
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] const_hex::FromHexError),
}

impl Word {
    pub const ZERO: Self = Self([0u8; 32]);

    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parses a hex string, with or without `0x`, left padding it with zeros.
    ///
    /// ```
    /// use harness_precompile::Word;
    ///
    /// let word = Word::from_hex("0x2a").unwrap();
    /// assert_eq!(word, Word::from(42u64));
    /// ```
    ///
    /// # Errors
    /// Returns `Err` if the value isn't hex or is longer than 32 bytes.
    pub fn from_hex<S: AsRef<str>>(value: S) -> Result<Self, ParseWordError> {
        let value = value.as_ref();
        let digits = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")).unwrap_or(value);
        if digits.len() > 64 {
            return Err(ParseWordError::TooLong(digits.len().div_ceil(2)));
        }
        let mut padded = [b'0'; 64];
        padded[64 - digits.len()..].copy_from_slice(digits.as_bytes());
        let mut word = [0u8; 32];
        const_hex::decode_to_slice(padded, &mut word)?;
        Ok(Self(word))
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn to_u256(&self) -> U256 {
        U256::from_big_endian(&self.0)
    }

    /// The low 20 bytes.
    #[must_use]
    pub fn to_address(&self) -> Address {
        Address::from_slice(&self.0[12..])
    }
}

impl From<Address> for Word {
    fn from(address: Address) -> Self {
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(address.as_bytes());
        Self(word)
    }
}

impl From<U256> for Word {
    fn from(value: U256) -> Self {
        let mut word = [0u8; 32];
        value.to_big_endian(&mut word);
        Self(word)
    }
}

impl From<u64> for Word {
    fn from(value: u64) -> Self {
        U256::from(value).into()
    }
}

impl From<u128> for Word {
    fn from(value: u128) -> Self {
        U256::from(value).into()
    }
}

impl From<bool> for Word {
    fn from(value: bool) -> Self {
        U256::from(u8::from(value)).into()
    }
}

impl From<H256> for Word {
    fn from(hash: H256) -> Self {
        Self(hash.0)
    }
}

impl From<[u8; 32]> for Word {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl FromStr for Word {
    type Err = ParseWordError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_hex(value)
    }
}

impl AsRef<[u8]> for Word {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// 64 lowercase hex digits, no prefix.
impl Display for Word {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&const_hex::encode(self.0))
    }
}

impl LowerHex for Word {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if f.alternate() {
            f.write_str("0x")?;
        }
        Display::fmt(self, f)
    }
}

impl Debug for Word {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Word(0x{self})")
    }
}
