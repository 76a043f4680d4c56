//! Deterministic nonce generation per RFC 6979 §3.2
//!
//! HMAC-SHA256 based; no randomness enters the computation, so identical
//! `(private key, message hash)` pairs always yield the identical nonce.
//! The generator is resumable: squeezing again after a rejected candidate
//! (or a zero `r`/`s` during signing) continues the step-H retry sequence.

use crate::ec::{Scalar, SCALAR_SIZE};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

type HmacSha256 = Hmac<Sha256>;

/// RFC 6979 HMAC-DRBG state
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct NonceGenerator {
    k: [u8; 32],
    v: [u8; 32],
    primed: bool,
}

impl NonceGenerator {
    /// Seed the generator from raw private-key bytes and a message hash.
    ///
    /// The key bytes are HMAC key material here, not a curve scalar, so
    /// any 32-byte value is accepted. The hash is reduced modulo n first
    /// (`bits2octets` of the RFC).
    pub fn new(secret: &[u8; SCALAR_SIZE], msg_hash: &[u8; 32]) -> Self {
        let h1 = Scalar::reduce(*msg_hash).serialize();

        let mut v = [0x01u8; 32];
        let mut k = [0x00u8; 32];

        // step D: K = HMAC_K(V ∥ 0x00 ∥ int2octets(x) ∥ bits2octets(h1))
        let mut mac = HmacSha256::new_from_slice(&k).expect("HMAC accepts any key length");
        mac.update(&v);
        mac.update(&[0x00]);
        mac.update(secret);
        mac.update(&h1);
        k.copy_from_slice(&mac.finalize().into_bytes());

        // step E: V = HMAC_K(V)
        v = Self::prf(&k, &v);

        // step F: K = HMAC_K(V ∥ 0x01 ∥ int2octets(x) ∥ bits2octets(h1))
        let mut mac = HmacSha256::new_from_slice(&k).expect("HMAC accepts any key length");
        mac.update(&v);
        mac.update(&[0x01]);
        mac.update(secret);
        mac.update(&h1);
        k.copy_from_slice(&mac.finalize().into_bytes());

        // step G: V = HMAC_K(V)
        v = Self::prf(&k, &v);

        NonceGenerator {
            k,
            v,
            primed: false,
        }
    }

    /// Produce the next nonce candidate in `[1, n-1]` (step H).
    pub fn next_nonce(&mut self) -> Scalar {
        loop {
            if self.primed {
                self.retry_update();
            }
            self.primed = true;

            self.v = Self::prf(&self.k, &self.v);
            if Scalar::lt_order(&self.v) && self.v.iter().any(|&b| b != 0) {
                return Scalar::from_bytes_unchecked(self.v);
            }
        }
    }

    /// K = HMAC_K(V ∥ 0x00); V = HMAC_K(V)
    fn retry_update(&mut self) {
        let mut mac = HmacSha256::new_from_slice(&self.k).expect("HMAC accepts any key length");
        mac.update(&self.v);
        mac.update(&[0x00]);
        self.k.copy_from_slice(&mac.finalize().into_bytes());
        self.v = Self::prf(&self.k, &self.v);
    }

    fn prf(k: &[u8; 32], data: &[u8; 32]) -> [u8; 32] {
        let mut mac = HmacSha256::new_from_slice(k).expect("HMAC accepts any key length");
        mac.update(data);
        let mut out = [0u8; 32];
        out.copy_from_slice(&mac.finalize().into_bytes());
        out
    }
}

/// One-shot deterministic nonce for a `(private key, message hash)` pair
pub fn deterministic_nonce(secret: &[u8; SCALAR_SIZE], msg_hash: &[u8; 32]) -> Scalar {
    NonceGenerator::new(secret, msg_hash).next_nonce()
}
