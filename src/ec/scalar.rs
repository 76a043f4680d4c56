//! secp256k1 scalar arithmetic
//!
//! Scalars are integers modulo the group order n, stored big-endian and
//! zeroized on drop. They carry private keys, nonces and derivation tweaks.

use crate::ec::constants::SCALAR_SIZE;
use crate::error::{validate, Error, Result};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// secp256k1 scalar value in `[0, n)`
#[derive(Clone, Zeroize, ZeroizeOnDrop, Debug)]
pub struct Scalar([u8; SCALAR_SIZE]);

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for Scalar {}

impl Scalar {
    /// The group order n, big-endian
    pub const ORDER: [u8; SCALAR_SIZE] = [
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFE, 0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36,
        0x41, 0x41,
    ];

    /// n − 2, big-endian, exponent for Fermat inversion
    const N_MINUS_2: [u8; SCALAR_SIZE] = [
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFE, 0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36,
        0x41, 0x3F,
    ];

    /// The group order in little-endian 32-bit limbs
    const N_LIMBS: [u32; 8] = [
        0xD036_4141,
        0xBFD2_5E8C,
        0xAF48_A03B,
        0xBAAE_DCE6,
        0xFFFF_FFFE,
        0xFFFF_FFFF,
        0xFFFF_FFFF,
        0xFFFF_FFFF,
    ];

    /// Create a scalar from raw bytes, reducing modulo n.
    ///
    /// Returns an error if the result is zero; use this for private keys
    /// and nonces, which must lie in `[1, n-1]`.
    pub fn new(mut data: [u8; SCALAR_SIZE]) -> Result<Self> {
        Self::reduce_bytes(&mut data);
        if data.iter().all(|&b| b == 0) {
            return Err(Error::InvalidScalar {
                context: "scalar construction",
                reason: "value is zero modulo the group order",
            });
        }
        Ok(Scalar(data))
    }

    /// Create a scalar from bytes that must already be canonical (< n).
    ///
    /// Zero is accepted; callers that forbid it (signature components)
    /// check separately. No reduction is performed.
    pub fn from_canonical(data: [u8; SCALAR_SIZE]) -> Result<Self> {
        if !Self::lt_order(&data) {
            return Err(Error::InvalidScalar {
                context: "scalar construction",
                reason: "value not below the group order",
            });
        }
        Ok(Scalar(data))
    }

    /// Parse a scalar from a byte slice, with length validation, reducing
    /// modulo n and rejecting zero.
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        validate::length("scalar", bytes.len(), SCALAR_SIZE)?;
        let mut data = [0u8; SCALAR_SIZE];
        data.copy_from_slice(bytes);
        Self::new(data)
    }

    /// Reduce arbitrary bytes modulo n; zero results are allowed.
    /// For message hashes and intermediate sums, not key material.
    pub(crate) fn reduce(mut data: [u8; SCALAR_SIZE]) -> Self {
        Self::reduce_bytes(&mut data);
        Scalar(data)
    }

    pub(crate) fn from_bytes_unchecked(bytes: [u8; SCALAR_SIZE]) -> Self {
        Scalar(bytes)
    }

    /// Serialize this scalar to big-endian bytes
    pub fn serialize(&self) -> [u8; SCALAR_SIZE] {
        self.0
    }

    /// Borrow the big-endian byte representation
    pub fn as_bytes(&self) -> &[u8; SCALAR_SIZE] {
        &self.0
    }

    /// Check if this scalar is zero
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Add two scalars modulo n
    pub fn add_mod_n(&self, other: &Self) -> Self {
        let a = Self::to_le_limbs(&self.0);
        let b = Self::to_le_limbs(&other.0);

        let mut r = [0u32; 8];
        let mut carry = 0u64;
        for i in 0..8 {
            let tmp = a[i] as u64 + b[i] as u64 + carry;
            r[i] = tmp as u32;
            carry = tmp >> 32;
        }

        if carry == 1 || Self::geq(&r, &Self::N_LIMBS) {
            Self::sub_limbs_in_place(&mut r, &Self::N_LIMBS);
        }

        Scalar(Self::limbs_to_be(&r))
    }

    /// Subtract two scalars modulo n
    pub fn sub_mod_n(&self, other: &Self) -> Self {
        let a = Self::to_le_limbs(&self.0);
        let b = Self::to_le_limbs(&other.0);

        let mut r = [0u32; 8];
        let mut borrow = 0i64;
        for i in 0..8 {
            let tmp = a[i] as i64 - b[i] as i64 - borrow;
            if tmp < 0 {
                r[i] = (tmp + (1i64 << 32)) as u32;
                borrow = 1;
            } else {
                r[i] = tmp as u32;
                borrow = 0;
            }
        }

        if borrow == 1 {
            let mut c = 0u64;
            for i in 0..8 {
                let tmp = r[i] as u64 + Self::N_LIMBS[i] as u64 + c;
                r[i] = tmp as u32;
                c = tmp >> 32;
            }
        }

        Scalar(Self::limbs_to_be(&r))
    }

    /// Multiply two scalars modulo n using MSB-first double-and-add
    pub fn mul_mod_n(&self, other: &Self) -> Self {
        let mut acc = Scalar([0u8; SCALAR_SIZE]);
        for byte in other.0 {
            for bit in (0..8).rev() {
                acc = acc.add_mod_n(&acc);
                if (byte >> bit) & 1 == 1 {
                    acc = acc.add_mod_n(self);
                }
            }
        }
        acc
    }

    /// Compute the multiplicative inverse modulo n via Fermat: a^(n−2)
    pub fn inv_mod_n(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(Error::InvalidScalar {
                context: "scalar inversion",
                reason: "zero has no inverse",
            });
        }

        let mut result = {
            let mut one = [0u8; SCALAR_SIZE];
            one[SCALAR_SIZE - 1] = 1;
            Scalar(one)
        };
        for byte in Self::N_MINUS_2 {
            for bit in (0..8).rev() {
                result = result.mul_mod_n(&result);
                if (byte >> bit) & 1 == 1 {
                    result = result.mul_mod_n(self);
                }
            }
        }
        Ok(result)
    }

    /// Compute n − self (the additive inverse); zero maps to zero
    pub fn negate(&self) -> Self {
        if self.is_zero() {
            return Scalar([0u8; SCALAR_SIZE]);
        }
        let mut r = Self::to_le_limbs(&Self::ORDER);
        let s = Self::to_le_limbs(&self.0);
        let mut tmp = [0u32; 8];
        let mut borrow = 0i64;
        for i in 0..8 {
            let v = r[i] as i64 - s[i] as i64 - borrow;
            if v < 0 {
                tmp[i] = (v + (1i64 << 32)) as u32;
                borrow = 1;
            } else {
                tmp[i] = v as u32;
                borrow = 0;
            }
        }
        debug_assert_eq!(borrow, 0);
        r = tmp;
        Scalar(Self::limbs_to_be(&r))
    }

    /// Check whether big-endian bytes encode a value strictly below n
    pub(crate) fn lt_order(bytes: &[u8; SCALAR_SIZE]) -> bool {
        for i in 0..SCALAR_SIZE {
            if bytes[i] < Self::ORDER[i] {
                return true;
            }
            if bytes[i] > Self::ORDER[i] {
                return false;
            }
        }
        false // equal to n
    }

    /// Reduce big-endian bytes modulo n in place (single conditional
    /// subtraction; inputs are at most one subtraction away from range)
    fn reduce_bytes(bytes: &mut [u8; SCALAR_SIZE]) {
        if Self::lt_order(bytes) {
            return;
        }
        let mut borrow = 0i16;
        for i in (0..SCALAR_SIZE).rev() {
            let diff = (bytes[i] as i16) - (Self::ORDER[i] as i16) - borrow;
            if diff < 0 {
                bytes[i] = (diff + 256) as u8;
                borrow = 1;
            } else {
                bytes[i] = diff as u8;
                borrow = 0;
            }
        }
    }

    /// Convert big-endian bytes to little-endian 32-bit limbs
    #[inline(always)]
    fn to_le_limbs(bytes_be: &[u8; SCALAR_SIZE]) -> [u32; 8] {
        let mut limbs = [0u32; 8];
        for (i, limb) in limbs.iter_mut().enumerate() {
            let start = 28 - i * 4;
            *limb = u32::from_be_bytes([
                bytes_be[start],
                bytes_be[start + 1],
                bytes_be[start + 2],
                bytes_be[start + 3],
            ]);
        }
        limbs
    }

    /// Convert little-endian limbs back to big-endian bytes
    #[inline(always)]
    fn limbs_to_be(limbs: &[u32; 8]) -> [u8; SCALAR_SIZE] {
        let mut out = [0u8; SCALAR_SIZE];
        for (i, &w) in limbs.iter().enumerate() {
            let start = 28 - i * 4;
            out[start..start + 4].copy_from_slice(&w.to_be_bytes());
        }
        out
    }

    /// Compare two limb arrays for greater-than-or-equal
    #[inline(always)]
    fn geq(a: &[u32; 8], b: &[u32; 8]) -> bool {
        for i in (0..8).rev() {
            if a[i] > b[i] {
                return true;
            }
            if a[i] < b[i] {
                return false;
            }
        }
        true
    }

    /// Subtract b from a in place
    #[inline(always)]
    fn sub_limbs_in_place(a: &mut [u32; 8], b: &[u32; 8]) {
        let mut borrow = 0u64;
        for i in 0..8 {
            let tmp = (a[i] as u64).wrapping_sub(b[i] as u64).wrapping_sub(borrow);
            a[i] = tmp as u32;
            borrow = (tmp >> 63) & 1;
        }
    }
}
