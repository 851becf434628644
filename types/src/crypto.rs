use crate::{
    transactions::signature::{RecoveryId, Signature},
    Address, H256, U256,
};
use secp256k1::{
    ecdsa::{RecoverableSignature, RecoveryId as SecpRecoveryId},
    Message, PublicKey, SecretKey, SECP256K1,
};

pub trait Crypto {
    type Error;

    fn keccak256_to(data: impl AsRef<[u8]>, output: &mut [u8; 32]);

    fn keccak256(data: impl AsRef<[u8]>) -> H256 {
        let mut hash = [0u8; 32];
        Self::keccak256_to(data, &mut hash);
        hash.into()
    }

    /// Recover the address which produced `signature` over `message_hash`.
    ///
    /// # Errors
    /// Returns an error if the signature is malformed or doesn't recover to a valid point.
    fn secp256k1_ecdsa_recover(
        signature: &Signature,
        message_hash: H256,
    ) -> Result<Address, Self::Error>;
}

pub trait Signer {
    type Error;

    /// Sign an already hashed message. When `chain_id` is provided the recovery id is
    /// encoded as EIP-155 `v`, otherwise it is the bare y parity.
    ///
    /// # Errors
    /// Returns an error if the produced signature is rejected.
    fn sign_prehash(&self, prehash: H256, chain_id: Option<u64>) -> Result<Signature, Self::Error>;
}

pub struct DefaultCrypto;

impl Crypto for DefaultCrypto {
    type Error = secp256k1::Error;

    fn keccak256_to(data: impl AsRef<[u8]>, output: &mut [u8; 32]) {
        use sha3::Digest;
        let mut hasher = sha3::Keccak256::new();
        hasher.update(data);
        hasher.finalize_into(output.into());
    }

    fn secp256k1_ecdsa_recover(
        signature: &Signature,
        message_hash: H256,
    ) -> Result<Address, Self::Error> {
        let mut raw = [0u8; 65];
        signature.to_raw_signature(&mut raw);
        let recovery_id = SecpRecoveryId::from_i32(i32::from(raw[64]))?;
        let signature = RecoverableSignature::from_compact(&raw[0..64], recovery_id)?;
        let message = Message::from_digest(message_hash.0);
        let pubkey = SECP256K1.recover_ecdsa(&message, &signature)?;
        Ok(public_key_to_address(&pubkey))
    }
}

/// keccak256 of a byte string
#[must_use]
pub fn keccak256(data: impl AsRef<[u8]>) -> H256 {
    DefaultCrypto::keccak256(data)
}

fn public_key_to_address(pubkey: &PublicKey) -> Address {
    let uncompressed = pubkey.serialize_uncompressed();
    let hash = DefaultCrypto::keccak256(&uncompressed[1..]);
    Address::from(hash)
}

/// secp256k1 signing key together with its derived account address.
#[derive(Clone)]
pub struct Keypair {
    secret: SecretKey,
    public: PublicKey,
}

impl Keypair {
    /// # Errors
    /// Returns an error if the bytes are not a valid 32 byte secret scalar.
    pub fn from_bytes<I: AsRef<[u8]>>(bytes: I) -> Result<Self, secp256k1::Error> {
        Self::from_slice(bytes.as_ref())
    }

    /// # Errors
    /// Returns an error if the slice is not a valid 32 byte secret scalar.
    pub fn from_slice(slice: &[u8]) -> Result<Self, secp256k1::Error> {
        let secret = SecretKey::from_slice(slice)?;
        let public = PublicKey::from_secret_key_global(&secret);
        Ok(Self { secret, public })
    }

    #[must_use]
    pub fn address(&self) -> Address {
        public_key_to_address(&self.public)
    }
}

impl core::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Keypair").field("address", &self.address()).finish_non_exhaustive()
    }
}

impl Signer for Keypair {
    type Error = secp256k1::Error;

    fn sign_prehash(&self, prehash: H256, chain_id: Option<u64>) -> Result<Signature, Self::Error> {
        if chain_id.is_some_and(|chain_id| chain_id > RecoveryId::MAX_CHAIN_ID) {
            return Err(secp256k1::Error::InvalidRecoveryId);
        }
        // RFC-6979 nonces, the same key and digest always yield the same signature
        let msg = Message::from_digest(prehash.0);
        let signature = SECP256K1.sign_ecdsa_recoverable(&msg, &self.secret);
        let (recovery_id, compact) = signature.serialize_compact();
        let parity = u64::try_from(recovery_id.to_i32())
            .map_err(|_| secp256k1::Error::InvalidRecoveryId)?
            & 1;
        let r = U256::from_big_endian(&compact[0..32]);
        let s = U256::from_big_endian(&compact[32..64]);

        let secp256k1_half_n = U256::from_big_endian(&secp256k1::constants::CURVE_ORDER) >> 1;
        if s > secp256k1_half_n {
            return Err(secp256k1::Error::IncorrectSignature);
        }
        let v = chain_id.map_or(parity, |chain_id| RecoveryId::new(parity).as_eip155(chain_id));
        Ok(Signature { v: RecoveryId::new(v), r, s })
    }
}
