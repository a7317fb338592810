//! Nonce generation for Direct requests.
//!
//! The remote service requires a 40 character nonce: 256 random bits are
//! hashed with SHA-1 and hex encoded.

use rand::{CryptoRng, RngCore};
use sha1::{Digest, Sha1};

/// Length of a Direct nonce.
pub const NONCE_LEN: usize = 40;

const ENTROPY_BYTES: usize = 32;

/// Generate a 40 character lowercase hex nonce from `rng`.
///
/// Production code passes `rand::rngs::OsRng`; tests can pass a seeded RNG
/// to get reproducible nonces.
pub fn generate_nonce<R>(rng: &mut R) -> String
where
    R: RngCore + CryptoRng + ?Sized,
{
    let mut entropy = [0u8; ENTROPY_BYTES];
    rng.fill_bytes(&mut entropy);
    hex::encode(Sha1::digest(entropy))
}

/// Returns true if `nonce` has the shape the remote service accepts.
pub fn is_valid_nonce(nonce: &str) -> bool {
    nonce.len() == NONCE_LEN && nonce.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_nonce_shape() {
        for _ in 0..32 {
            let nonce = generate_nonce(&mut OsRng);
            assert_eq!(nonce.len(), NONCE_LEN);
            assert!(is_valid_nonce(&nonce), "bad nonce {}", nonce);
        }
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let a = generate_nonce(&mut ChaCha8Rng::seed_from_u64(7));
        let b = generate_nonce(&mut ChaCha8Rng::seed_from_u64(7));
        let c = generate_nonce(&mut ChaCha8Rng::seed_from_u64(8));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_consecutive_nonces_differ() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let first = generate_nonce(&mut rng);
        let second = generate_nonce(&mut rng);
        assert_ne!(first, second);
    }

    #[test]
    fn test_is_valid_nonce() {
        assert!(is_valid_nonce(&"a".repeat(40)));
        assert!(!is_valid_nonce(&"a".repeat(39)));
        assert!(!is_valid_nonce(&"A".repeat(40)));
        assert!(!is_valid_nonce(&"g".repeat(40)));
    }
}
