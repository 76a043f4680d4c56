//! secp256k1 curve points and the group law
//!
//! Affine points on y² = x³ + 7 with a distinguished identity, plus the
//! SEC1 compressed/uncompressed codec. Group operations run internally on
//! Jacobian coordinates to keep field inversions out of the hot path.

use crate::ec::constants::{FIELD_ELEMENT_SIZE, POINT_COMPRESSED_SIZE, POINT_UNCOMPRESSED_SIZE};
use crate::ec::field::FieldElement;
use crate::ec::scalar::Scalar;
use crate::error::{validate, Error, Result};
use subtle::Choice;

/// A point on the secp256k1 curve in affine coordinates
#[derive(Clone, Debug)]
pub struct Point {
    pub(crate) is_identity: Choice,
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
}

/// Jacobian representation: (X, Y, Z) with x = X/Z², y = Y/Z³
#[derive(Clone, Debug)]
pub(crate) struct ProjectivePoint {
    x: FieldElement,
    y: FieldElement,
    z: FieldElement,
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        let self_is_identity: bool = self.is_identity.into();
        let other_is_identity: bool = other.is_identity.into();
        if self_is_identity || other_is_identity {
            return self_is_identity == other_is_identity;
        }
        self.x == other.x && self.y == other.y
    }
}

impl Eq for Point {}

impl Point {
    /// Create a point from affine coordinates, validating the curve equation.
    pub fn new_uncompressed(
        x: &[u8; FIELD_ELEMENT_SIZE],
        y: &[u8; FIELD_ELEMENT_SIZE],
    ) -> Result<Self> {
        let x_fe = FieldElement::from_bytes(x)?;
        let y_fe = FieldElement::from_bytes(y)?;
        if !Self::is_on_curve(&x_fe, &y_fe) {
            return Err(Error::InvalidPoint {
                context: "point construction",
                reason: "coordinates do not satisfy the curve equation",
            });
        }
        Ok(Point {
            is_identity: Choice::from(0),
            x: x_fe,
            y: y_fe,
        })
    }

    /// The identity element (point at infinity)
    pub fn identity() -> Self {
        Point {
            is_identity: Choice::from(1),
            x: FieldElement::zero(),
            y: FieldElement::zero(),
        }
    }

    /// Check if this point is the identity element
    pub fn is_identity(&self) -> bool {
        self.is_identity.into()
    }

    /// Check that this point lies on the curve (identity counts as valid)
    pub fn is_valid(&self) -> bool {
        if self.is_identity() {
            return true;
        }
        Self::is_on_curve(&self.x, &self.y)
    }

    /// The x-coordinate as big-endian bytes
    pub fn x_coordinate_bytes(&self) -> [u8; FIELD_ELEMENT_SIZE] {
        self.x.to_bytes()
    }

    /// The y-coordinate as big-endian bytes
    pub fn y_coordinate_bytes(&self) -> [u8; FIELD_ELEMENT_SIZE] {
        self.y.to_bytes()
    }

    /// True if the y-coordinate is odd; drives the compressed-form tag
    pub fn y_is_odd(&self) -> bool {
        self.y.is_odd()
    }

    /// Serialize in uncompressed SEC1 form: 0x04 ∥ x ∥ y.
    /// The identity serializes to all zeros.
    pub fn serialize_uncompressed(&self) -> [u8; POINT_UNCOMPRESSED_SIZE] {
        let mut out = [0u8; POINT_UNCOMPRESSED_SIZE];
        if self.is_identity() {
            return out;
        }
        out[0] = 0x04;
        out[1..33].copy_from_slice(&self.x.to_bytes());
        out[33..].copy_from_slice(&self.y.to_bytes());
        out
    }

    /// Parse an uncompressed SEC1 point, validating prefix, length and
    /// the curve equation.
    pub fn deserialize_uncompressed(bytes: &[u8]) -> Result<Self> {
        validate::length("uncompressed point", bytes.len(), POINT_UNCOMPRESSED_SIZE)?;
        if bytes.iter().all(|&b| b == 0) {
            return Ok(Self::identity());
        }
        if bytes[0] != 0x04 {
            return Err(Error::InvalidPoint {
                context: "uncompressed point",
                reason: "prefix byte is not 0x04",
            });
        }
        let mut x_bytes = [0u8; FIELD_ELEMENT_SIZE];
        let mut y_bytes = [0u8; FIELD_ELEMENT_SIZE];
        x_bytes.copy_from_slice(&bytes[1..33]);
        y_bytes.copy_from_slice(&bytes[33..65]);
        Self::new_uncompressed(&x_bytes, &y_bytes)
    }

    /// Serialize in compressed SEC1 form: 0x02/0x03 ∥ x.
    /// The identity serializes to all zeros.
    pub fn serialize_compressed(&self) -> [u8; POINT_COMPRESSED_SIZE] {
        let mut out = [0u8; POINT_COMPRESSED_SIZE];
        if self.is_identity() {
            return out;
        }
        out[0] = if self.y.is_odd() { 0x03 } else { 0x02 };
        out[1..].copy_from_slice(&self.x.to_bytes());
        out
    }

    /// Parse a compressed SEC1 point, recovering y as the square root of
    /// x³ + 7 whose parity matches the tag byte.
    pub fn deserialize_compressed(bytes: &[u8]) -> Result<Self> {
        validate::length("compressed point", bytes.len(), POINT_COMPRESSED_SIZE)?;
        if bytes.iter().all(|&b| b == 0) {
            return Ok(Self::identity());
        }
        let tag = bytes[0];
        if tag != 0x02 && tag != 0x03 {
            return Err(Error::InvalidPoint {
                context: "compressed point",
                reason: "prefix byte is not 0x02 or 0x03",
            });
        }
        let mut x_bytes = [0u8; FIELD_ELEMENT_SIZE];
        x_bytes.copy_from_slice(&bytes[1..]);
        let x_fe = FieldElement::from_bytes(&x_bytes)?;
        Self::lift_x(x_fe, tag == 0x03)
    }

    /// Recover the point with the given x-coordinate and y-parity.
    pub(crate) fn lift_x(x: FieldElement, y_odd: bool) -> Result<Self> {
        let rhs = x.square().mul(&x).add(&FieldElement::from_u32(7));
        let y = rhs.sqrt().ok_or(Error::InvalidPoint {
            context: "compressed point",
            reason: "x-coordinate has no square root on the curve",
        })?;
        let y_final = if y.is_odd() == y_odd { y } else { y.negate() };
        Ok(Point {
            is_identity: Choice::from(0),
            x,
            y: y_final,
        })
    }

    /// Add two points using the group law
    pub fn add(&self, other: &Self) -> Self {
        match (self.to_projective(), other.to_projective()) {
            (None, _) => other.clone(),
            (_, None) => self.clone(),
            (Some(a), Some(b)) => a.add(&b).to_affine(),
        }
    }

    /// Double a point
    pub fn double(&self) -> Self {
        match self.to_projective() {
            None => Self::identity(),
            Some(p) => p.double().to_affine(),
        }
    }

    /// Reflect across the x-axis: (x, y) → (x, −y)
    pub fn negate(&self) -> Self {
        Point {
            is_identity: self.is_identity,
            x: self.x.clone(),
            y: self.y.negate(),
        }
    }

    /// Scalar multiplication, MSB-first double-and-add over the scalar
    /// bits. `0 · P = ∞` and `n · P = ∞`.
    pub fn mul(&self, scalar: &Scalar) -> Self {
        let base = match self.to_projective() {
            None => return Self::identity(),
            Some(p) => p,
        };
        let mut acc: Option<ProjectivePoint> = None;
        for byte in scalar.serialize() {
            for bit in (0..8).rev() {
                if let Some(p) = acc.as_ref() {
                    acc = Some(p.double());
                }
                if (byte >> bit) & 1 == 1 {
                    acc = Some(match acc {
                        None => base.clone(),
                        Some(p) => p.add(&base),
                    });
                }
            }
        }
        match acc {
            None => Self::identity(),
            Some(p) => p.to_affine(),
        }
    }

    fn is_on_curve(x: &FieldElement, y: &FieldElement) -> bool {
        let lhs = y.square();
        let rhs = x.square().mul(x).add(&FieldElement::from_u32(7));
        lhs == rhs
    }

    fn to_projective(&self) -> Option<ProjectivePoint> {
        if self.is_identity() {
            return None;
        }
        Some(ProjectivePoint {
            x: self.x.clone(),
            y: self.y.clone(),
            z: FieldElement::one(),
        })
    }
}

impl ProjectivePoint {
    /// Jacobian addition. Falls back to doubling on equal inputs and to
    /// the identity (Z = 0) on inverse inputs.
    pub fn add(&self, other: &Self) -> Self {
        if self.z.is_zero() {
            return other.clone();
        }
        if other.z.is_zero() {
            return self.clone();
        }
        let z1z1 = self.z.square();
        let z2z2 = other.z.square();
        let u1 = self.x.mul(&z2z2);
        let u2 = other.x.mul(&z1z1);
        let s1 = self.y.mul(&z2z2).mul(&other.z);
        let s2 = other.y.mul(&z1z1).mul(&self.z);

        let h = u2.sub(&u1);
        if h.is_zero() {
            if s1 == s2 {
                return self.double();
            }
            // P + (-P): encode the identity as Z = 0
            return ProjectivePoint {
                x: FieldElement::one(),
                y: FieldElement::one(),
                z: FieldElement::zero(),
            };
        }

        let r = s2.sub(&s1);
        let h_sq = h.square();
        let h_cu = h_sq.mul(&h);
        let v = u1.mul(&h_sq);

        let x3 = r.square().sub(&h_cu).sub(&v.double());
        let y3 = r.mul(&v.sub(&x3)).sub(&s1.mul(&h_cu));
        let z3 = self.z.mul(&other.z).mul(&h);

        ProjectivePoint {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Jacobian doubling for a = 0 curves (dbl-2009-l).
    /// A point with Y = 0 doubles to the identity via Z3 = 0.
    pub fn double(&self) -> Self {
        if self.z.is_zero() {
            return self.clone();
        }
        let a = self.x.square();
        let b = self.y.square();
        let c = b.square();

        // D = 2·((X + B)² − A − C)
        let d = self.x.add(&b).square().sub(&a).sub(&c).double();
        let e = a.double().add(&a);
        let f = e.square();

        let x3 = f.sub(&d.double());
        let y3 = e.mul(&d.sub(&x3)).sub(&c.double().double().double());
        let z3 = self.y.mul(&self.z).double();

        ProjectivePoint {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Normalize back to affine coordinates; Z = 0 maps to the identity.
    pub fn to_affine(&self) -> Point {
        if self.z.is_zero() {
            return Point::identity();
        }
        let z_inv = self
            .z
            .invert()
            .expect("non-zero Z is invertible in a prime field");
        let z_inv_sq = z_inv.square();
        let z_inv_cu = z_inv_sq.mul(&z_inv);
        Point {
            is_identity: Choice::from(0),
            x: self.x.mul(&z_inv_sq),
            y: self.y.mul(&z_inv_cu),
        }
    }
}
