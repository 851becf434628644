use crate::{Address, H256};

/// EIP-2930 access list, the addresses and storage slots a transaction pre-declares.
#[derive(
    Clone,
    Default,
    PartialEq,
    Eq,
    Debug,
    Hash,
    rlp_derive::RlpEncodableWrapper,
    rlp_derive::RlpDecodableWrapper,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct AccessList(pub Vec<AccessListItem>);

impl AccessList {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<AccessListItem>> for AccessList {
    fn from(items: Vec<AccessListItem>) -> Self {
        Self(items)
    }
}

/// One contract and the storage slots read or written in it.
#[derive(
    Clone,
    Default,
    PartialEq,
    Eq,
    Debug,
    Hash,
    rlp_derive::RlpEncodable,
    rlp_derive::RlpDecodable,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct AccessListItem {
    pub address: Address,
    pub storage_keys: Vec<H256>,
}

#[cfg(test)]
mod tests {
    use super::{AccessList, AccessListItem, Address, H256};
    use hex_literal::hex;

    fn staking_slot_zero() -> AccessList {
        AccessList(vec![AccessListItem {
            address: Address::from_low_u64_be(0x0400),
            storage_keys: vec![H256::zero()],
        }])
    }

    #[test]
    fn rlp_encodes_nested_lists() {
        let encoded = rlp::encode(&staking_slot_zero());
        let expected = hex!("f838f7940000000000000000000000000000000000000400e1a00000000000000000000000000000000000000000000000000000000000000000");
        assert_eq!(encoded.as_ref(), expected.as_slice());
        assert_eq!(rlp::decode::<AccessList>(&encoded).unwrap(), staking_slot_zero());
        assert_eq!(rlp::encode(&AccessList::default()).as_ref(), &[0xc0]);
    }

    #[test]
    fn json_uses_storage_keys_field() {
        let actual = serde_json::to_value(staking_slot_zero()).unwrap();
        let expected = serde_json::json!([
            {
                "address": "0x0000000000000000000000000000000000000400",
                "storageKeys": [
                    "0x0000000000000000000000000000000000000000000000000000000000000000",
                ],
            },
        ]);
        assert_eq!(actual, expected);
        let decoded = serde_json::from_value::<AccessList>(actual).unwrap();
        assert_eq!(decoded, staking_slot_zero());
    }
}
