//! secp256k1 elliptic curve primitives
//!
//! Curve equation y² = x³ + 7 over F_p with
//! - p = 2²⁵⁶ − 2³² − 977
//! - group order n = 0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141

mod constants;
mod field;
mod point;
mod scalar;

pub use constants::{
    FIELD_ELEMENT_SIZE, POINT_COMPRESSED_SIZE, POINT_UNCOMPRESSED_SIZE, SCALAR_SIZE,
};
pub use field::FieldElement;
pub use point::Point;
pub use scalar::Scalar;

use rand::{CryptoRng, RngCore};

/// secp256k1 base point coordinates (big-endian)
struct CurveParams {
    g_x: [u8; 32],
    g_y: [u8; 32],
}

const SECP256K1: CurveParams = CurveParams {
    g_x: [
        0x79, 0xBE, 0x66, 0x7E, 0xF9, 0xDC, 0xBB, 0xAC, 0x55, 0xA0, 0x62, 0x95, 0xCE, 0x87, 0x0B,
        0x07, 0x02, 0x9B, 0xFC, 0xDB, 0x2D, 0xCE, 0x28, 0xD9, 0x59, 0xF2, 0x81, 0x5B, 0x16, 0xF8,
        0x17, 0x98,
    ],
    g_y: [
        0x48, 0x3A, 0xDA, 0x77, 0x26, 0xA3, 0xC4, 0x65, 0x5D, 0xA4, 0xFB, 0xFC, 0x0E, 0x11, 0x08,
        0xA8, 0xFD, 0x17, 0xB4, 0x48, 0xA6, 0x85, 0x54, 0x19, 0x9C, 0x47, 0xD0, 0x8F, 0xFB, 0x10,
        0xD4, 0xB8,
    ],
};

/// The standard base point G of the secp256k1 curve
pub fn base_point_g() -> Point {
    Point::new_uncompressed(&SECP256K1.g_x, &SECP256K1.g_y)
        .expect("standard base point must be valid")
}

/// Scalar multiplication with the base point: scalar · G
pub fn scalar_mult_base_g(scalar: &Scalar) -> Point {
    base_point_g().mul(scalar)
}

/// The public key corresponding to a private scalar: d · G
pub fn derive_public_key(secret: &Scalar) -> Point {
    scalar_mult_base_g(secret)
}

/// Draw a uniformly random private key in `[1, n-1]`
pub fn random_private_key<R: CryptoRng + RngCore>(rng: &mut R) -> Scalar {
    let mut scalar_bytes = [0u8; SCALAR_SIZE];
    loop {
        rng.fill_bytes(&mut scalar_bytes);
        // rejection sampling keeps the distribution uniform over [1, n-1]
        if let Ok(secret) = Scalar::from_canonical(scalar_bytes) {
            if !secret.is_zero() {
                return secret;
            }
        }
    }
}

/// Generate a keypair: a random private scalar and its public point
pub fn generate_keypair<R: CryptoRng + RngCore>(rng: &mut R) -> (Scalar, Point) {
    let secret = random_private_key(rng);
    let public = derive_public_key(&secret);
    (secret, public)
}

#[cfg(test)]
mod tests;
