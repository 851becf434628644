use std::collections::BTreeMap;

use harness_types::{ext::secp256k1, Address, Keypair};

/// Named signing keys, injected wherever a caller refers to an account by name.
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait KeyStore {
    fn lookup(&self, name: &str) -> Option<Keypair>;

    fn address_of(&self, name: &str) -> Option<Address> {
        self.lookup(name).map(|keypair| keypair.address())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyStore {
    keys: BTreeMap<String, Keypair>,
}

impl InMemoryKeyStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from `(name, secret key)` pairs.
    ///
    /// # Errors
    /// Returns `Err` if any secret is not a valid secp256k1 scalar.
    pub fn from_secrets<I, N, S>(secrets: I) -> Result<Self, secp256k1::Error>
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: AsRef<[u8]>,
    {
        let mut store = Self::new();
        for (name, secret) in secrets {
            store.insert(name, secret)?;
        }
        Ok(store)
    }

    /// Adds or replaces a named key, returning its address.
    ///
    /// # Errors
    /// Returns `Err` if `secret` is not a valid secp256k1 scalar.
    pub fn insert<N: Into<String>, S: AsRef<[u8]>>(
        &mut self,
        name: N,
        secret: S,
    ) -> Result<Address, secp256k1::Error> {
        let keypair = Keypair::from_bytes(secret)?;
        let address = keypair.address();
        self.keys.insert(name.into(), keypair);
        Ok(address)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl KeyStore for InMemoryKeyStore {
    fn lookup(&self, name: &str) -> Option<Keypair> {
        self.keys.get(name).cloned()
    }
}
