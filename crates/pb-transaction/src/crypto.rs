//! Ed25519 key handling: generation, addresses, deterministic test keys.

use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;

/// An in-memory Ed25519 keypair.
///
/// The hex-encoded verifying key doubles as the holder's ledger identity —
/// the value placed in a transaction's `sender` and `receiver` fields.
pub struct Keypair {
    pub signing: SigningKey,
    pub verifying: VerifyingKey,
}

impl Keypair {
    /// Generate a fresh keypair using the OS RNG.
    pub fn generate() -> Self {
        let mut rng = OsRng;
        let signing = SigningKey::generate(&mut rng);
        let verifying = signing.verifying_key();
        Self { signing, verifying }
    }

    /// Rebuild a keypair from a 32-byte seed.
    ///
    /// Deterministic: the same seed always yields the same keypair.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let signing = SigningKey::from_bytes(&seed);
        let verifying = signing.verifying_key();
        Self { signing, verifying }
    }

    /// The holder's ledger identity: the hex-encoded verifying key.
    pub fn address(&self) -> String {
        hex::encode(self.verifying.to_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_is_hex_of_verifying_key() {
        let keypair = Keypair::generate();
        let address = keypair.address();
        assert_eq!(address.len(), 64);
        assert_eq!(hex::decode(&address).unwrap(), keypair.verifying.to_bytes());
    }

    #[test]
    fn from_seed_is_deterministic() {
        let a = Keypair::from_seed([7u8; 32]);
        let b = Keypair::from_seed([7u8; 32]);
        assert_eq!(a.address(), b.address());
    }

    #[test]
    fn distinct_seeds_yield_distinct_addresses() {
        let a = Keypair::from_seed([1u8; 32]);
        let b = Keypair::from_seed([2u8; 32]);
        assert_ne!(a.address(), b.address());
    }
}
