use core::{
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    str::FromStr,
};
use std::collections::{btree_map::Entry, BTreeMap};

use harness_types::keccak256;

use crate::Error;

/// First 4 bytes of the keccak256 of a function signature.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Selector(pub [u8; 4]);

impl Selector {
    /// ```
    /// use harness_precompile::Selector;
    ///
    /// let selector = Selector::from_signature("min_nomination()");
    /// assert_eq!(selector.to_string(), "0xc9f593b2");
    /// ```
    #[must_use]
    pub fn from_signature(signature: &str) -> Self {
        let hash = keccak256(signature.as_bytes());
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&hash.0[..4]);
        Self(selector)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&const_hex::encode_prefixed(self.0))
    }
}

impl Debug for Selector {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Selector({self})")
    }
}

impl From<[u8; 4]> for Selector {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl FromStr for Selector {
    type Err = const_hex::FromHexError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut selector = [0u8; 4];
        const_hex::decode_to_slice(value, &mut selector)?;
        Ok(Self(selector))
    }
}

/// Returns the function name of a signature like `nominate(address,uint256)`.
fn function_name(signature: &str) -> Option<&str> {
    let (name, rest) = signature.split_once('(')?;
    let params = rest.strip_suffix(')')?;

    let mut chars = name.chars();
    let valid_name = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_') &&
        chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid_name {
        return None;
    }

    // tuples may nest, anything else is a type name, a comma or an array suffix
    let mut depth = 0usize;
    for c in params.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1)?,
            ',' | '[' | ']' => {},
            c if c.is_ascii_alphanumeric() => {},
            _ => return None,
        }
    }
    (depth == 0).then_some(name)
}

/// Function name to selector mapping of one precompile. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorTable {
    selectors: BTreeMap<String, Selector>,
}

impl SelectorTable {
    /// Builds the table from canonical function signatures.
    ///
    /// # Errors
    /// Fails on a malformed signature or when two signatures share a function name.
    pub fn from_signatures<I, S>(signatures: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = signatures
            .into_iter()
            .map(|signature| {
                let signature = signature.as_ref();
                let name = function_name(signature)
                    .ok_or_else(|| Error::MalformedSignature(signature.to_string()))?;
                Ok((name.to_string(), Selector::from_signature(signature)))
            })
            .collect::<Result<Vec<_>, Error>>()?;
        Self::from_entries(entries)
    }

    /// Builds the table from explicit `(name, selector)` pairs.
    ///
    /// # Errors
    /// Fails when a name appears twice.
    pub fn from_entries<I, N>(entries: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (N, Selector)>,
        N: Into<String>,
    {
        let mut selectors = BTreeMap::new();
        for (name, selector) in entries {
            match selectors.entry(name.into()) {
                Entry::Vacant(entry) => {
                    entry.insert(selector);
                },
                Entry::Occupied(entry) => return Err(Error::DuplicateSelector(entry.key().clone())),
            }
        }
        Ok(Self { selectors })
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Selector> {
        self.selectors.get(name).copied()
    }

    /// # Errors
    /// Returns [`Error::UnknownSelector`] if `name` isn't in the table.
    pub fn selector(&self, name: &str) -> Result<Selector, Error> {
        self.get(name).ok_or_else(|| Error::UnknownSelector(name.to_string()))
    }

    /// Reverse lookup, used to label incoming calldata.
    #[must_use]
    pub fn name_of(&self, selector: Selector) -> Option<&str> {
        self.selectors
            .iter()
            .find_map(|(name, candidate)| (*candidate == selector).then_some(name.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Selector)> {
        self.selectors.iter().map(|(name, selector)| (name.as_str(), *selector))
    }
}
