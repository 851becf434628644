use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// serde functions for converting `u64` to and from hexadecimal string
pub mod uint_to_hex {
    use super::HexQuantity;
    use serde::{Deserializer, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    /// # Errors
    /// never fails
    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: HexQuantity,
        S: Serializer,
    {
        T::serialize_quantity(value, serializer)
    }

    /// # Errors
    /// Returns `Err` source is not a valid hexadecimal string
    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: HexQuantity,
        D: Deserializer<'de>,
    {
        T::deserialize_quantity(deserializer)
    }
}

/// Deserialize that always returns `T` or `T::default()` when the value is `null`.
///
/// # Errors
/// returns an error if fails to deserialize T
pub fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    T: Default + Deserialize<'de>,
    D: Deserializer<'de>,
{
    let opt = <Option<T> as Deserialize<'de>>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// Ethereum JSON-RPC "quantity" encoding: `0x` prefixed, no leading zeros.
pub trait HexQuantity: Sized {
    /// # Errors
    /// should never fail
    fn serialize_quantity<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error>;

    /// # Errors
    /// Returns `Err` if the value isn't a valid quantity
    fn deserialize_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error>;
}

impl HexQuantity for u64 {
    fn serialize_quantity<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        format!("{self:#x}").serialize(serializer)
    }

    fn deserialize_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <String as Deserialize>::deserialize(deserializer)?;
        parse_quantity(&value).map_err(serde::de::Error::custom)
    }
}

impl HexQuantity for Option<u64> {
    fn serialize_quantity<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Some(value) => value.serialize_quantity(serializer),
            None => serializer.serialize_none(),
        }
    }

    fn deserialize_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <Option<String> as Deserialize>::deserialize(deserializer)?;
        value.map(|value| parse_quantity(&value).map_err(serde::de::Error::custom)).transpose()
    }
}

fn parse_quantity(value: &str) -> Result<u64, String> {
    let Some(hex) = value.strip_prefix("0x") else {
        return Err(format!("quantity must be 0x prefixed: {value}"));
    };
    if hex.is_empty() {
        return Ok(0);
    }
    u64::from_str_radix(hex, 16).map_err(|error| format!("invalid quantity {value}: {error}"))
}

#[cfg(test)]
mod tests {
    use super::uint_to_hex;

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Quantities {
        #[serde(with = "uint_to_hex")]
        nonce: u64,
        #[serde(default, with = "uint_to_hex")]
        block_number: Option<u64>,
    }

    #[test]
    fn quantities_roundtrip_through_json() {
        let value = Quantities { nonce: 0, block_number: Some(4096) };
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json, serde_json::json!({ "nonce": "0x0", "block_number": "0x1000" }));
        assert_eq!(serde_json::from_value::<Quantities>(json).unwrap(), value);

        let pending = serde_json::json!({ "nonce": "0x2a", "block_number": null });
        let decoded = serde_json::from_value::<Quantities>(pending).unwrap();
        assert_eq!(decoded, Quantities { nonce: 42, block_number: None });
    }

    #[test]
    fn rejects_unprefixed_quantity() {
        let json = serde_json::json!({ "nonce": "2a", "block_number": null });
        assert!(serde_json::from_value::<Quantities>(json).is_err());
    }
}
