//! Deterministic ECDSA over secp256k1
//!
//! Signing follows the usual flow — R = k·G, r = R.x mod n,
//! s = k⁻¹(z + r·d) mod n — with the nonce k drawn from the RFC 6979
//! generator, so signatures are reproducible. Every signature carries a
//! recovery id identifying which candidate point R it was built from,
//! which lets `recover` reconstruct the signer's public key from the
//! signature and message hash alone.
//!
//! All entry points take a 32-byte message hash; hashing the message is
//! the caller's concern.

mod rfc6979;

pub use rfc6979::{deterministic_nonce, NonceGenerator};

use crate::ec::{scalar_mult_base_g, FieldElement, Point, Scalar, SCALAR_SIZE};
use crate::error::{Error, Result};
use subtle::ConstantTimeEq;

/// Identifies which of up to four candidate points a signature's R is.
///
/// Bit 0: parity of R.y; bit 1: whether R.x overflowed the group order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecoveryId(u8);

impl RecoveryId {
    /// Create a recovery id; only 0–3 are meaningful.
    pub fn new(id: u8) -> Result<Self> {
        if id > 3 {
            return Err(Error::InvalidSignature {
                context: "recovery id",
                reason: "value above 3",
            });
        }
        Ok(RecoveryId(id))
    }

    /// The raw id byte
    pub fn to_byte(self) -> u8 {
        self.0
    }

    fn is_y_odd(self) -> bool {
        self.0 & 1 == 1
    }

    fn is_x_overflow(self) -> bool {
        self.0 & 2 == 2
    }
}

/// An ECDSA signature: the scalar pair (r, s) plus its recovery id
#[derive(Clone, Debug)]
pub struct Signature {
    r: Scalar,
    s: Scalar,
    recovery_id: RecoveryId,
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.r == other.r && self.s == other.s && self.recovery_id == other.recovery_id
    }
}

impl Eq for Signature {}

impl Signature {
    /// The r component
    pub fn r(&self) -> &Scalar {
        &self.r
    }

    /// The s component
    pub fn s(&self) -> &Scalar {
        &self.s
    }

    /// The recovery id
    pub fn recovery_id(&self) -> RecoveryId {
        self.recovery_id
    }

    /// Serialize as 64 bytes: r ∥ s, big-endian
    pub fn serialize_compact(&self) -> [u8; 2 * SCALAR_SIZE] {
        let mut out = [0u8; 2 * SCALAR_SIZE];
        out[..SCALAR_SIZE].copy_from_slice(&self.r.serialize());
        out[SCALAR_SIZE..].copy_from_slice(&self.s.serialize());
        out
    }

    /// Parse a compact 64-byte signature.
    ///
    /// Both components must lie in `[1, n-1]`; zero or non-canonical
    /// values are rejected, never silently reduced.
    pub fn from_compact(bytes: &[u8; 2 * SCALAR_SIZE], recovery_id: RecoveryId) -> Result<Self> {
        let mut r_bytes = [0u8; SCALAR_SIZE];
        let mut s_bytes = [0u8; SCALAR_SIZE];
        r_bytes.copy_from_slice(&bytes[..SCALAR_SIZE]);
        s_bytes.copy_from_slice(&bytes[SCALAR_SIZE..]);

        let r = Scalar::from_canonical(r_bytes).map_err(|_| Error::InvalidSignature {
            context: "compact signature",
            reason: "r not below the group order",
        })?;
        let s = Scalar::from_canonical(s_bytes).map_err(|_| Error::InvalidSignature {
            context: "compact signature",
            reason: "s not below the group order",
        })?;
        if r.is_zero() || s.is_zero() {
            return Err(Error::InvalidSignature {
                context: "compact signature",
                reason: "zero component",
            });
        }
        Ok(Signature { r, s, recovery_id })
    }
}

/// Sign a 32-byte message hash with a private key.
///
/// Deterministic: the same `(msg_hash, secret)` pair always produces the
/// same signature. The RFC 6979 generator is squeezed again in the
/// negligible-probability event that r or s comes out zero.
pub fn sign(msg_hash: &[u8; 32], secret: &Scalar) -> Result<Signature> {
    let z = Scalar::reduce(*msg_hash);
    let mut nonces = NonceGenerator::new(secret.as_bytes(), msg_hash);

    loop {
        let k = nonces.next_nonce();

        // R = k·G; k ∈ [1, n-1] so R is never the identity
        let r_point = scalar_mult_base_g(&k);
        let x_bytes = r_point.x_coordinate_bytes();
        let x_overflow = !Scalar::lt_order(&x_bytes);

        let r = Scalar::reduce(x_bytes);
        if r.is_zero() {
            continue;
        }

        let k_inv = k.inv_mod_n()?;
        let s = k_inv.mul_mod_n(&z.add_mod_n(&r.mul_mod_n(secret)));
        if s.is_zero() {
            continue;
        }

        let recovery_id =
            RecoveryId((r_point.y_is_odd() as u8) | ((x_overflow as u8) << 1));
        return Ok(Signature { r, s, recovery_id });
    }
}

/// Verify a signature against a 32-byte message hash and public key.
///
/// Malformed but well-typed input fails verification instead of erroring:
/// zero components, identity keys and mismatched points all return false.
pub fn verify(msg_hash: &[u8; 32], signature: &Signature, public_key: &Point) -> bool {
    if signature.r.is_zero() || signature.s.is_zero() {
        return false;
    }
    if public_key.is_identity() || !public_key.is_valid() {
        return false;
    }

    let z = Scalar::reduce(*msg_hash);
    let s_inv = match signature.s.inv_mod_n() {
        Ok(inv) => inv,
        Err(_) => return false,
    };
    let u1 = z.mul_mod_n(&s_inv);
    let u2 = signature.r.mul_mod_n(&s_inv);

    let point = scalar_mult_base_g(&u1).add(&public_key.mul(&u2));
    if point.is_identity() {
        return false;
    }

    let v = Scalar::reduce(point.x_coordinate_bytes());
    bool::from(v.serialize().ct_eq(&signature.r.serialize()))
}

/// Recover the signer's public key using the signature's recovery id.
pub fn recover(msg_hash: &[u8; 32], signature: &Signature) -> Result<Point> {
    candidate_from_id(msg_hash, signature, signature.recovery_id)
}

/// Scan all four recovery ids and return every public key consistent
/// with the signature. The true signer's key is always among them.
pub fn recover_candidates(msg_hash: &[u8; 32], signature: &Signature) -> Vec<Point> {
    let mut candidates = Vec::new();
    for id in 0..4u8 {
        let recovery_id = RecoveryId(id);
        if let Ok(candidate) = candidate_from_id(msg_hash, signature, recovery_id) {
            if verify(msg_hash, signature, &candidate) && !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    }
    candidates
}

/// Q = r⁻¹·(s·R − z·G), with R rebuilt from r and the recovery id.
fn candidate_from_id(
    msg_hash: &[u8; 32],
    signature: &Signature,
    recovery_id: RecoveryId,
) -> Result<Point> {
    if signature.r.is_zero() || signature.s.is_zero() {
        return Err(Error::InvalidSignature {
            context: "public key recovery",
            reason: "zero component",
        });
    }

    // The x-coordinate of R is r, or r + n in the rare overflow case.
    let x_bytes = if recovery_id.is_x_overflow() {
        add_order(&signature.r.serialize())?
    } else {
        signature.r.serialize()
    };
    let x = FieldElement::from_bytes(&x_bytes)?;
    let r_point = Point::lift_x(x, recovery_id.is_y_odd())?;

    let r_inv = signature.r.inv_mod_n()?;
    let z = Scalar::reduce(*msg_hash);

    // Q = (s·r⁻¹)·R + (−z·r⁻¹)·G
    let u1 = z.negate().mul_mod_n(&r_inv);
    let u2 = signature.s.mul_mod_n(&r_inv);
    let q = scalar_mult_base_g(&u1).add(&r_point.mul(&u2));
    if q.is_identity() {
        return Err(Error::InvalidSignature {
            context: "public key recovery",
            reason: "recovered the identity point",
        });
    }
    Ok(q)
}

/// r + n over raw 256-bit big-endian bytes; errors when the sum no
/// longer fits 256 bits (no such x-coordinate exists).
fn add_order(r_bytes: &[u8; SCALAR_SIZE]) -> Result<[u8; SCALAR_SIZE]> {
    let mut out = [0u8; SCALAR_SIZE];
    let mut carry = 0u16;
    for i in (0..SCALAR_SIZE).rev() {
        let sum = r_bytes[i] as u16 + Scalar::ORDER[i] as u16 + carry;
        out[i] = sum as u8;
        carry = sum >> 8;
    }
    if carry != 0 {
        return Err(Error::InvalidSignature {
            context: "public key recovery",
            reason: "r plus the group order exceeds the field size",
        });
    }
    Ok(out)
}
