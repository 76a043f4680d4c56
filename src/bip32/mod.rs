//! BIP-32 hierarchical deterministic keys
//!
//! A master key is drawn from a seed with HMAC-SHA512 under the fixed
//! key "Bitcoin seed". Children are derived by index; indices at or
//! above [`HARDENED_OFFSET`] are hardened and can only be derived from
//! a private key. Extended keys serialize to the familiar Base58Check
//! `xprv`/`xpub` strings (`tprv`/`tpub` on testnet).
//!
//! Where BIP-32 declares a derivation index invalid (the tweak falls
//! outside the group, or the child key degenerates), derivation moves
//! on to the next index instead of failing, so every lookup yields a
//! key. An index is only a hard error when the retry would cross the
//! hardened boundary or exhaust the index space.

mod path;

pub use path::{parse_path, PathStep};

use crate::ec::{derive_public_key, scalar_mult_base_g, Point, Scalar, SCALAR_SIZE};
use crate::error::{validate, Error, Result};
use hmac::{Hmac, Mac};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

type HmacSha512 = Hmac<Sha512>;

/// Indices at or above this value derive hardened children
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

const VERSION_MAINNET_PRIVATE: [u8; 4] = [0x04, 0x88, 0xAD, 0xE4];
const VERSION_MAINNET_PUBLIC: [u8; 4] = [0x04, 0x88, 0xB2, 0x1E];
const VERSION_TESTNET_PRIVATE: [u8; 4] = [0x04, 0x35, 0x83, 0x94];
const VERSION_TESTNET_PUBLIC: [u8; 4] = [0x04, 0x35, 0x87, 0xCF];

const SERIALIZED_SIZE: usize = 78;
const MIN_SEED_SIZE: usize = 16;
const MAX_SEED_SIZE: usize = 64;

/// Which chain an extended key belongs to; selects the version bytes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Network {
    /// Bitcoin mainnet (`xprv`/`xpub`)
    Mainnet,
    /// Bitcoin testnet (`tprv`/`tpub`)
    Testnet,
}

impl Network {
    fn private_version(self) -> [u8; 4] {
        match self {
            Network::Mainnet => VERSION_MAINNET_PRIVATE,
            Network::Testnet => VERSION_TESTNET_PRIVATE,
        }
    }

    fn public_version(self) -> [u8; 4] {
        match self {
            Network::Mainnet => VERSION_MAINNET_PUBLIC,
            Network::Testnet => VERSION_TESTNET_PUBLIC,
        }
    }
}

/// An extended private key: the secret scalar plus the chain code and
/// position metadata needed to derive children.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ExtendedPrivateKey {
    #[zeroize(skip)]
    network: Network,
    #[zeroize(skip)]
    depth: u8,
    #[zeroize(skip)]
    parent_fingerprint: [u8; 4],
    #[zeroize(skip)]
    child_index: u32,
    chain_code: [u8; 32],
    #[zeroize(skip)]
    secret: Scalar,
}

impl fmt::Debug for ExtendedPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedPrivateKey")
            .field("network", &self.network)
            .field("depth", &self.depth)
            .field("parent_fingerprint", &self.parent_fingerprint)
            .field("child_index", &self.child_index)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// An extended public key; derives non-hardened children only
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendedPublicKey {
    network: Network,
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_index: u32,
    chain_code: [u8; 32],
    public: Point,
}

/// Either half of an extended key pair, as produced by a path walk
#[derive(Clone, Debug)]
pub enum ExtendedKey {
    /// Private extended key
    Private(ExtendedPrivateKey),
    /// Public extended key
    Public(ExtendedPublicKey),
}

impl ExtendedPrivateKey {
    /// Derive the master key from a seed of 16 to 64 bytes.
    pub fn master_from_seed(seed: &[u8], network: Network) -> Result<Self> {
        validate::min_length("seed", seed.len(), MIN_SEED_SIZE)?;
        validate::max_length("seed", seed.len(), MAX_SEED_SIZE)?;

        let (il, chain_code) = hmac_sha512_split(MASTER_HMAC_KEY, seed);
        let secret = Scalar::from_canonical(il).map_err(|_| Error::InvalidScalar {
            context: "master key derivation",
            reason: "seed maps outside the group order",
        })?;
        if secret.is_zero() {
            return Err(Error::InvalidScalar {
                context: "master key derivation",
                reason: "seed maps to the zero scalar",
            });
        }

        Ok(ExtendedPrivateKey {
            network,
            depth: 0,
            parent_fingerprint: [0u8; 4],
            child_index: 0,
            chain_code,
            secret,
        })
    }

    /// The underlying secret scalar
    pub fn secret(&self) -> &Scalar {
        &self.secret
    }

    /// The chain code
    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Depth in the derivation tree; the master key sits at 0
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Index this key was derived at (0 for the master key)
    pub fn child_index(&self) -> u32 {
        self.child_index
    }

    /// The network this key serializes for
    pub fn network(&self) -> Network {
        self.network
    }

    /// Derive the child key at `index`.
    ///
    /// Invalid indices (tweak outside the group, degenerate child) roll
    /// forward to `index + 1`. Errors only when that roll-forward would
    /// cross the hardened boundary or run off the end of the index
    /// space, or when the tree is already at maximum depth.
    pub fn derive_child(&self, index: u32) -> Result<ExtendedPrivateKey> {
        let depth = bump_depth(self.depth)?;
        let public = self.public_point();
        let fingerprint = fingerprint(&public);

        let mut index = index;
        loop {
            let mut data = [0u8; 37];
            if index >= HARDENED_OFFSET {
                data[1..33].copy_from_slice(self.secret.as_bytes());
            } else {
                data[..33].copy_from_slice(&public.serialize_compressed());
            }
            data[33..].copy_from_slice(&index.to_be_bytes());

            let (il, chain_code) = hmac_sha512_split(&self.chain_code, &data);
            if let Some(child_secret) = tweak_secret(&il, &self.secret) {
                return Ok(ExtendedPrivateKey {
                    network: self.network,
                    depth,
                    parent_fingerprint: fingerprint,
                    child_index: index,
                    chain_code,
                    secret: child_secret,
                });
            }
            index = next_index(index)?;
        }
    }

    /// The public point matching this key's secret
    pub fn public_point(&self) -> Point {
        derive_public_key(&self.secret)
    }

    /// Drop the secret half, keeping position metadata and chain code.
    pub fn to_public(&self) -> ExtendedPublicKey {
        ExtendedPublicKey {
            network: self.network,
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_index: self.child_index,
            chain_code: self.chain_code,
            public: self.public_point(),
        }
    }

    /// Serialize to a Base58Check `xprv`/`tprv` string.
    pub fn serialize(&self) -> String {
        let mut payload = [0u8; SERIALIZED_SIZE];
        payload[..4].copy_from_slice(&self.network.private_version());
        payload[4] = self.depth;
        payload[5..9].copy_from_slice(&self.parent_fingerprint);
        payload[9..13].copy_from_slice(&self.child_index.to_be_bytes());
        payload[13..45].copy_from_slice(&self.chain_code);
        payload[45] = 0x00;
        payload[46..].copy_from_slice(self.secret.as_bytes());
        let encoded = bs58::encode(payload).with_check().into_string();
        payload.zeroize();
        encoded
    }
}

impl ExtendedPublicKey {
    /// The public point
    pub fn public_point(&self) -> &Point {
        &self.public
    }

    /// The chain code
    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Depth in the derivation tree
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Index this key was derived at
    pub fn child_index(&self) -> u32 {
        self.child_index
    }

    /// The network this key serializes for
    pub fn network(&self) -> Network {
        self.network
    }

    /// Derive a non-hardened child. Hardened indices need the private
    /// key and fail with [`Error::HardenedFromPublicOnly`].
    pub fn derive_child(&self, index: u32) -> Result<ExtendedPublicKey> {
        if index >= HARDENED_OFFSET {
            return Err(Error::HardenedFromPublicOnly { index });
        }
        let depth = bump_depth(self.depth)?;
        let parent_fingerprint = fingerprint(&self.public);

        let mut index = index;
        loop {
            let mut data = [0u8; 37];
            data[..33].copy_from_slice(&self.public.serialize_compressed());
            data[33..].copy_from_slice(&index.to_be_bytes());

            let (il, chain_code) = hmac_sha512_split(&self.chain_code, &data);
            if let Some(child_public) = tweak_point(&il, &self.public) {
                return Ok(ExtendedPublicKey {
                    network: self.network,
                    depth,
                    parent_fingerprint,
                    child_index: index,
                    chain_code,
                    public: child_public,
                });
            }
            index = next_index(index)?;
        }
    }

    /// Serialize to a Base58Check `xpub`/`tpub` string.
    pub fn serialize(&self) -> String {
        let mut payload = [0u8; SERIALIZED_SIZE];
        payload[..4].copy_from_slice(&self.network.public_version());
        payload[4] = self.depth;
        payload[5..9].copy_from_slice(&self.parent_fingerprint);
        payload[9..13].copy_from_slice(&self.child_index.to_be_bytes());
        payload[13..45].copy_from_slice(&self.chain_code);
        payload[45..].copy_from_slice(&self.public.serialize_compressed());
        bs58::encode(payload).with_check().into_string()
    }
}

impl ExtendedKey {
    /// Parse a Base58Check extended key string of either kind.
    pub fn deserialize(encoded: &str) -> Result<ExtendedKey> {
        let payload = bs58::decode(encoded)
            .with_check(None)
            .into_vec()
            .map_err(|_| Error::ChecksumMismatch {
                context: "extended key",
            })?;
        validate::length("extended key payload", payload.len(), SERIALIZED_SIZE)?;

        let mut version = [0u8; 4];
        version.copy_from_slice(&payload[..4]);
        let depth = payload[4];
        let mut parent_fingerprint = [0u8; 4];
        parent_fingerprint.copy_from_slice(&payload[5..9]);
        let mut index_bytes = [0u8; 4];
        index_bytes.copy_from_slice(&payload[9..13]);
        let child_index = u32::from_be_bytes(index_bytes);
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&payload[13..45]);

        if depth == 0 && (parent_fingerprint != [0u8; 4] || child_index != 0) {
            return Err(Error::MalformedKey {
                reason: "master key with nonzero parent fingerprint or index",
            });
        }

        let (network, is_private) = match version {
            VERSION_MAINNET_PRIVATE => (Network::Mainnet, true),
            VERSION_MAINNET_PUBLIC => (Network::Mainnet, false),
            VERSION_TESTNET_PRIVATE => (Network::Testnet, true),
            VERSION_TESTNET_PUBLIC => (Network::Testnet, false),
            _ => {
                return Err(Error::MalformedKey {
                    reason: "unknown version bytes",
                })
            }
        };

        if is_private {
            if payload[45] != 0x00 {
                return Err(Error::MalformedKey {
                    reason: "private key material must start with a zero byte",
                });
            }
            let mut key_bytes = [0u8; SCALAR_SIZE];
            key_bytes.copy_from_slice(&payload[46..]);
            let secret = Scalar::from_canonical(key_bytes).map_err(|_| {
                Error::MalformedKey {
                    reason: "private key not below the group order",
                }
            })?;
            if secret.is_zero() {
                return Err(Error::MalformedKey {
                    reason: "private key is zero",
                });
            }
            Ok(ExtendedKey::Private(ExtendedPrivateKey {
                network,
                depth,
                parent_fingerprint,
                child_index,
                chain_code,
                secret,
            }))
        } else {
            let public = Point::deserialize_compressed(&payload[45..]).map_err(|_| {
                Error::MalformedKey {
                    reason: "public key is not a point on the curve",
                }
            })?;
            if public.is_identity() {
                return Err(Error::MalformedKey {
                    reason: "public key is the identity point",
                });
            }
            Ok(ExtendedKey::Public(ExtendedPublicKey {
                network,
                depth,
                parent_fingerprint,
                child_index,
                chain_code,
                public,
            }))
        }
    }

    /// Walk a derivation path from this key.
    ///
    /// `pub` steps project to the public half; once public, the walk
    /// stays public and hardened steps fail.
    pub fn derive_path(&self, path: &str) -> Result<ExtendedKey> {
        let steps = parse_path(path)?;
        let mut current = self.clone();
        for step in steps {
            current = match (current, step) {
                (ExtendedKey::Private(key), PathStep::Child(index)) => {
                    ExtendedKey::Private(key.derive_child(index)?)
                }
                (ExtendedKey::Public(key), PathStep::Child(index)) => {
                    ExtendedKey::Public(key.derive_child(index)?)
                }
                (ExtendedKey::Private(key), PathStep::Project) => {
                    ExtendedKey::Public(key.to_public())
                }
                (key @ ExtendedKey::Public(_), PathStep::Project) => key,
            };
        }
        Ok(current)
    }

    /// Serialize whichever half this key holds.
    pub fn serialize(&self) -> String {
        match self {
            ExtendedKey::Private(key) => key.serialize(),
            ExtendedKey::Public(key) => key.serialize(),
        }
    }
}

fn hmac_sha512_split(key: &[u8], data: &[u8]) -> ([u8; 32], [u8; 32]) {
    let mut mac =
        HmacSha512::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    let digest = mac.finalize().into_bytes();
    let mut left = [0u8; 32];
    let mut right = [0u8; 32];
    left.copy_from_slice(&digest[..32]);
    right.copy_from_slice(&digest[32..]);
    (left, right)
}

/// HASH160 of the compressed parent key, truncated to four bytes
fn fingerprint(public: &Point) -> [u8; 4] {
    let sha = Sha256::digest(public.serialize_compressed());
    let hash = Ripemd160::digest(sha);
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash[..4]);
    out
}

/// (IL + parent) mod n, or None when IL or the sum falls outside the
/// valid private-key range.
fn tweak_secret(il: &[u8; 32], parent: &Scalar) -> Option<Scalar> {
    if !Scalar::lt_order(il) {
        return None;
    }
    let tweak = Scalar::from_bytes_unchecked(*il);
    let child = tweak.add_mod_n(parent);
    if child.is_zero() {
        return None;
    }
    Some(child)
}

/// IL·G + parent, or None when IL is out of range or the sum is the
/// identity.
fn tweak_point(il: &[u8; 32], parent: &Point) -> Option<Point> {
    if !Scalar::lt_order(il) {
        return None;
    }
    let tweak = Scalar::from_bytes_unchecked(*il);
    let child = scalar_mult_base_g(&tweak).add(parent);
    if child.is_identity() {
        return None;
    }
    Some(child)
}

fn bump_depth(depth: u8) -> Result<u8> {
    depth.checked_add(1).ok_or(Error::MalformedKey {
        reason: "derivation tree is at maximum depth",
    })
}

/// Roll an invalid index forward without leaving its hardened class.
fn next_index(index: u32) -> Result<u32> {
    let next = index.checked_add(1).ok_or(Error::InvalidScalar {
        context: "child derivation",
        reason: "index space exhausted",
    })?;
    if index < HARDENED_OFFSET && next == HARDENED_OFFSET {
        return Err(Error::InvalidScalar {
            context: "child derivation",
            reason: "index space exhausted",
        });
    }
    Ok(next)
}
