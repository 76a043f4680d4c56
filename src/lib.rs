//! secp256k1 key engine for Bitcoin-style wallets
//!
//! This crate implements the secp256k1 elliptic curve from the field
//! arithmetic up: affine and Jacobian group operations, SEC1 point
//! encoding, deterministic ECDSA (RFC 6979) with public key recovery,
//! BIP-32 hierarchical deterministic key derivation, and the WIF
//! private key encoding.
//!
//! # Security
//!
//! Secret scalars and derivation chain codes are zeroized on drop, and
//! comparisons over secret material go through constant-time primitives.
//! Scalar and point arithmetic itself is not constant-time; keep that in
//! mind before signing on an attacker-observable timing channel.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

// Error module and re-exports
pub mod error;
pub use error::{validate, Error, Result};

// Curve arithmetic: field elements, scalars and points
pub mod ec;
pub use ec::{
    base_point_g, derive_public_key, generate_keypair, random_private_key,
    scalar_mult_base_g, FieldElement, Point, Scalar,
};

// Deterministic ECDSA with recovery
pub mod ecdsa;
pub use ecdsa::{
    deterministic_nonce, recover, recover_candidates, sign, verify, RecoveryId,
    Signature,
};

// Hierarchical deterministic derivation
pub mod bip32;
pub use bip32::{
    parse_path, ExtendedKey, ExtendedPrivateKey, ExtendedPublicKey, Network,
    PathStep, HARDENED_OFFSET,
};

// Wallet Import Format
pub mod wif;
pub use wif::{decode_wif, encode_wif};
