mod builder;
mod error;
mod keystore;
mod raw;
mod request;

pub use builder::{validate, Fee, TransactionBuilder, Validated};
pub use error::{TxError, ValidationError};
pub use keystore::{InMemoryKeyStore, KeyStore};
pub use raw::RawTransaction;
pub use request::{EnvelopeType, Nonce, TransactionRequest};
