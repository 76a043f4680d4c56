//! secp256k1 field arithmetic
//!
//! Elements of 𝔽ₚ with p = 2²⁵⁶ − 2³² − 977, stored as 8 little-endian
//! 32-bit limbs. Reduction of wide products uses 2²⁵⁶ ≡ 2³² + 977 (mod p).

use crate::ec::constants::FIELD_ELEMENT_SIZE;
use crate::error::{Error, Result};
use subtle::{Choice, ConditionallySelectable};

/// Number of 32-bit limbs in a field element (8 × 32 = 256 bits)
const NLIMBS: usize = 8;

/// secp256k1 field element, value in `[0, p)`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldElement(pub(crate) [u32; NLIMBS]);

impl FieldElement {
    /// p = 0xFFFFFFFF FFFFFFFF FFFFFFFF FFFFFFFF FFFFFFFF FFFFFFFF FFFFFFFE FFFFFC2F
    /// stored as eight 32-bit limbs, least significant first.
    pub(crate) const MOD_LIMBS: [u32; NLIMBS] = [
        0xFFFF_FC2F, // least significant
        0xFFFF_FFFE,
        0xFFFF_FFFF,
        0xFFFF_FFFF,
        0xFFFF_FFFF,
        0xFFFF_FFFF,
        0xFFFF_FFFF,
        0xFFFF_FFFF, // most significant
    ];

    /// p − 2, big-endian, exponent for Fermat inversion
    const P_MINUS_2: [u8; 32] = [
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE, 0xFF, 0xFF,
        0xFC, 0x2D,
    ];

    /// (p + 1) / 4, big-endian; valid square-root exponent since p ≡ 3 (mod 4)
    const SQRT_EXP: [u8; 32] = [
        0x3F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xBF, 0xFF,
        0xFF, 0x0C,
    ];

    /// Build a field element from a small literal (`0 ≤ n < 2³²`)
    #[inline]
    pub fn from_u32(n: u32) -> Self {
        let mut limbs = [0u32; NLIMBS];
        limbs[0] = n;
        FieldElement(limbs)
    }

    /// The additive identity
    #[inline]
    pub fn zero() -> Self {
        FieldElement([0u32; NLIMBS])
    }

    /// The multiplicative identity
    #[inline]
    pub fn one() -> Self {
        Self::from_u32(1)
    }

    /// Create a field element from big-endian bytes. Rejects values ≥ p.
    pub fn from_bytes(bytes: &[u8; FIELD_ELEMENT_SIZE]) -> Result<Self> {
        let mut limbs = [0u32; NLIMBS];
        for (i, limb) in limbs.iter_mut().enumerate() {
            let offset = (NLIMBS - 1 - i) * 4;
            *limb = u32::from_be_bytes([
                bytes[offset],
                bytes[offset + 1],
                bytes[offset + 2],
                bytes[offset + 3],
            ]);
        }
        let (_, borrow) = Self::sbb8(limbs, Self::MOD_LIMBS);
        if borrow == 0 {
            return Err(Error::InvalidPoint {
                context: "field element",
                reason: "coordinate not below the field prime",
            });
        }
        Ok(FieldElement(limbs))
    }

    /// Convert this field element into big-endian bytes.
    pub fn to_bytes(&self) -> [u8; FIELD_ELEMENT_SIZE] {
        let mut out = [0u8; FIELD_ELEMENT_SIZE];
        for (i, &limb) in self.0.iter().enumerate() {
            let offset = (NLIMBS - 1 - i) * 4;
            out[offset..offset + 4].copy_from_slice(&limb.to_be_bytes());
        }
        out
    }

    /// Check if this element is zero
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&w| w == 0)
    }

    /// Return true if the element is odd (least significant bit set)
    pub fn is_odd(&self) -> bool {
        (self.0[0] & 1) == 1
    }

    /// Constant-time addition: (self + other) mod p
    pub fn add(&self, other: &Self) -> Self {
        let (sum, carry) = Self::adc8(self.0, other.0);
        // Subtract p when the raw sum overflowed or landed in [p, 2^256)
        let (reduced, borrow) = Self::sbb8(sum, Self::MOD_LIMBS);
        let need_reduce = (carry | (borrow ^ 1)) & 1;
        Self::conditional_select(&sum, &reduced, Choice::from(need_reduce as u8))
    }

    /// Constant-time subtraction: (self - other) mod p
    pub fn sub(&self, other: &Self) -> Self {
        let (diff, borrow) = Self::sbb8(self.0, other.0);
        let (diff_plus_p, _) = Self::adc8(diff, Self::MOD_LIMBS);
        Self::conditional_select(&diff, &diff_plus_p, Choice::from(borrow as u8))
    }

    /// (2 · self) mod p
    #[inline]
    pub fn double(&self) -> Self {
        self.add(self)
    }

    /// Field multiplication: (self · other) mod p.
    /// Schoolbook 8×8 → 16-limb product, then reduction.
    pub fn mul(&self, other: &Self) -> Self {
        let mut t = [0u128; NLIMBS * 2];
        for i in 0..NLIMBS {
            for j in 0..NLIMBS {
                t[i + j] += (self.0[i] as u128) * (other.0[j] as u128);
            }
        }

        let mut wide = [0u32; NLIMBS * 2];
        let mut carry: u128 = 0;
        for i in 0..(NLIMBS * 2) {
            let v = t[i] + carry;
            wide[i] = (v & 0xFFFF_FFFF) as u32;
            carry = v >> 32;
        }

        Self::reduce_wide(wide)
    }

    /// Field squaring
    #[inline(always)]
    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// Compute the multiplicative inverse via Fermat: a^(p−2) mod p
    pub fn invert(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(Error::InvalidScalar {
                context: "field inversion",
                reason: "zero has no inverse",
            });
        }
        Ok(self.pow_be(&Self::P_MINUS_2))
    }

    /// Negate this field element: p − self for non-zero values
    pub fn negate(&self) -> Self {
        if self.is_zero() {
            self.clone()
        } else {
            FieldElement::zero().sub(self)
        }
    }

    /// Compute a square root using p ≡ 3 (mod 4): sqrt(x) = x^((p+1)/4).
    /// Returns `None` when self is not a quadratic residue.
    pub fn sqrt(&self) -> Option<Self> {
        if self.is_zero() {
            return Some(FieldElement::zero());
        }
        let root = self.pow_be(&Self::SQRT_EXP);
        if root.square() == *self {
            Some(root)
        } else {
            None
        }
    }

    /// Left-to-right binary exponentiation over a big-endian exponent
    fn pow_be(&self, exp: &[u8; 32]) -> Self {
        let mut result = FieldElement::one();
        for &byte in exp.iter() {
            for bit in (0..8).rev() {
                result = result.square();
                if (byte >> bit) & 1 == 1 {
                    result = result.mul(self);
                }
            }
        }
        result
    }

    /// 8-limb addition with carry
    #[inline(always)]
    fn adc8(a: [u32; NLIMBS], b: [u32; NLIMBS]) -> ([u32; NLIMBS], u32) {
        let mut r = [0u32; NLIMBS];
        let mut carry = 0u64;
        for ((&a_limb, &b_limb), r_limb) in a.iter().zip(b.iter()).zip(r.iter_mut()) {
            let tmp = (a_limb as u64) + (b_limb as u64) + carry;
            *r_limb = (tmp & 0xFFFF_FFFF) as u32;
            carry = tmp >> 32;
        }
        (r, carry as u32)
    }

    /// 8-limb subtraction with borrow
    #[inline(always)]
    fn sbb8(a: [u32; NLIMBS], b: [u32; NLIMBS]) -> ([u32; NLIMBS], u32) {
        let mut r = [0u32; NLIMBS];
        let mut borrow = 0u32;
        for ((&a_limb, &b_limb), r_limb) in a.iter().zip(b.iter()).zip(r.iter_mut()) {
            let ai = a_limb as u64;
            let bi = b_limb as u64;
            let tmp = ai.wrapping_sub(bi + borrow as u64);
            *r_limb = tmp as u32;
            borrow = (ai < bi + borrow as u64) as u32;
        }
        (r, borrow)
    }

    /// Constant-time select: flag == 0 returns a, flag == 1 returns b
    fn conditional_select(a: &[u32; NLIMBS], b: &[u32; NLIMBS], flag: Choice) -> Self {
        let mut out = [0u32; NLIMBS];
        for ((a_limb, b_limb), out_limb) in a.iter().zip(b.iter()).zip(out.iter_mut()) {
            *out_limb = u32::conditional_select(a_limb, b_limb, flag);
        }
        FieldElement(out)
    }

    /// Reduce a 16-limb (512-bit) value modulo p.
    ///
    /// Splits the value as low + high·2²⁵⁶ and folds the high half with
    /// 2²⁵⁶ ≡ 2³² + 977, then folds the residual overflow the same way
    /// and finishes with conditional subtractions of p.
    fn reduce_wide(t: [u32; NLIMBS * 2]) -> FieldElement {
        let mut r = [0u64; NLIMBS + 1];
        for i in 0..NLIMBS {
            r[i] = t[i] as u64;
        }
        for j in 0..NLIMBS {
            let hi = t[j + NLIMBS] as u64;
            r[j] += hi * 977;
            r[j + 1] += hi;
        }

        let mut carry = 0u64;
        for limb in r.iter_mut() {
            let tmp = *limb + carry;
            *limb = tmp & 0xFFFF_FFFF;
            carry = tmp >> 32;
        }

        let mut out = [0u64; NLIMBS];
        out.copy_from_slice(&r[..NLIMBS]);
        let mut overflow = (carry << 32) | r[NLIMBS];
        while overflow != 0 {
            out[0] += overflow * 977;
            out[1] += overflow;
            let mut c = 0u64;
            for limb in out.iter_mut() {
                let tmp = *limb + c;
                *limb = tmp & 0xFFFF_FFFF;
                c = tmp >> 32;
            }
            overflow = c;
        }

        let mut limbs = [0u32; NLIMBS];
        for (i, &w) in out.iter().enumerate() {
            limbs[i] = w as u32;
        }
        for _ in 0..2 {
            let (sub, borrow) = Self::sbb8(limbs, Self::MOD_LIMBS);
            limbs = Self::conditional_select(&limbs, &sub, Choice::from((borrow ^ 1) as u8)).0;
        }
        FieldElement(limbs)
    }
}
