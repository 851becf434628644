use crate::{serde_utils::uint_to_hex, U256};

/// secp256k1 signature as carried by a transaction envelope.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    /// Bare y parity, or the legacy `27 / 28` and EIP-155 forms.
    pub v: RecoveryId,
    pub r: U256,
    pub s: U256,
}

impl Signature {
    /// `r || s || y_parity`, the layout secp256k1 recovery expects.
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_raw_signature(&self, output: &mut [u8; 65]) {
        self.r.to_big_endian(&mut output[..32]);
        self.s.to_big_endian(&mut output[32..64]);
        output[64] = self.v.y_parity() as u8;
    }
}

/// The `v` value of a signature. Normalizes between its three encodings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct RecoveryId(#[serde(with = "uint_to_hex")] u64);

impl RecoveryId {
    const EIP155_OFFSET: u64 = 35;
    const LEGACY_OFFSET: u64 = 27;

    /// Largest chain id whose EIP-155 `v` still fits in a `u64` (EIP-2294).
    pub const MAX_CHAIN_ID: u64 = u64::MAX / 2 - 36;

    #[must_use]
    pub const fn new(v: u64) -> Self {
        Self(v)
    }

    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// 0 for an even y coordinate, 1 for odd.
    #[must_use]
    pub const fn y_parity(self) -> u64 {
        match self.0 {
            v if v >= Self::EIP155_OFFSET => (v - Self::EIP155_OFFSET) & 1,
            v @ (27 | 28) => v - Self::LEGACY_OFFSET,
            v => v & 1,
        }
    }

    /// Chain id folded into an EIP-155 `v`.
    #[must_use]
    pub const fn chain_id(self) -> Option<u64> {
        if self.0 >= Self::EIP155_OFFSET {
            Some((self.0 - Self::EIP155_OFFSET) / 2)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn is_eip155(self) -> bool {
        self.chain_id().is_some()
    }

    /// `35 + 2 * chain_id + parity`, `chain_id` must not exceed [`Self::MAX_CHAIN_ID`].
    #[must_use]
    pub const fn as_eip155(self, chain_id: u64) -> u64 {
        Self::EIP155_OFFSET + 2 * chain_id + self.y_parity()
    }

    /// `27 + parity`
    #[must_use]
    pub const fn as_legacy(self) -> u64 {
        Self::LEGACY_OFFSET + self.y_parity()
    }
}

impl From<u64> for RecoveryId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

impl From<RecoveryId> for u64 {
    fn from(v: RecoveryId) -> Self {
        v.0
    }
}

impl rlp::Encodable for RecoveryId {
    fn rlp_append(&self, stream: &mut rlp::RlpStream) {
        <u64 as rlp::Encodable>::rlp_append(&self.0, stream);
    }
}

impl rlp::Decodable for RecoveryId {
    fn decode(rlp: &rlp::Rlp) -> Result<Self, rlp::DecoderError> {
        rlp.as_val().map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::RecoveryId;

    #[test]
    fn eip155_v_carries_chain_id() {
        // chain 3000, odd parity
        let v = RecoveryId::new(6036);
        assert_eq!(v.chain_id(), Some(3000));
        assert_eq!(v.y_parity(), 1);
        assert_eq!(v.as_legacy(), 28);
        assert_eq!(RecoveryId::new(1).as_eip155(3000), 6036);
        assert_eq!(RecoveryId::new(37).chain_id(), Some(1));
    }

    #[test]
    fn legacy_and_bare_parity() {
        let v = RecoveryId::new(27);
        assert!(!v.is_eip155());
        assert_eq!(v.y_parity(), 0);
        assert_eq!(RecoveryId::new(28).y_parity(), 1);
        assert_eq!(RecoveryId::new(0).as_legacy(), 27);
        assert_eq!(RecoveryId::new(1).y_parity(), 1);
    }

    #[test]
    fn largest_chain_id_fits() {
        let v = RecoveryId::new(1).as_eip155(RecoveryId::MAX_CHAIN_ID);
        assert_eq!(v, u64::MAX - 37);
        assert_eq!(RecoveryId::new(v).chain_id(), Some(RecoveryId::MAX_CHAIN_ID));
        assert_eq!(RecoveryId::new(v).y_parity(), 1);
    }

    #[test]
    fn counts_as_one_list_item() {
        let mut stream = rlp::RlpStream::new_list(3);
        stream.append(&RecoveryId::new(0x1794)).append(&0u64).append(&RecoveryId::new(0));
        let encoded = stream.out();
        assert_eq!(encoded.as_ref(), &[0xc5, 0x82, 0x17, 0x94, 0x80, 0x80]);
    }
}
