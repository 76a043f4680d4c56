//! Wallet Import Format private key encoding
//!
//! A WIF string is Base58Check over a network prefix byte, the 32-byte
//! secret, and an optional trailing 0x01 marking that the matching
//! public key should be used in compressed form.

use crate::bip32::Network;
use crate::ec::{Scalar, SCALAR_SIZE};
use crate::error::{Error, Result};
use zeroize::Zeroize;

const PREFIX_MAINNET: u8 = 0x80;
const PREFIX_TESTNET: u8 = 0xEF;
const COMPRESSED_MARKER: u8 = 0x01;

/// Encode a private key as a WIF string.
pub fn encode_wif(secret: &Scalar, network: Network, compressed: bool) -> String {
    let prefix = match network {
        Network::Mainnet => PREFIX_MAINNET,
        Network::Testnet => PREFIX_TESTNET,
    };
    let mut payload = Vec::with_capacity(SCALAR_SIZE + 2);
    payload.push(prefix);
    payload.extend_from_slice(secret.as_bytes());
    if compressed {
        payload.push(COMPRESSED_MARKER);
    }
    let encoded = bs58::encode(&payload).with_check().into_string();
    payload.zeroize();
    encoded
}

/// Decode a WIF string into the secret, its network and the compressed
/// flag.
pub fn decode_wif(encoded: &str) -> Result<(Scalar, Network, bool)> {
    let mut payload = bs58::decode(encoded)
        .with_check(None)
        .into_vec()
        .map_err(|_| Error::ChecksumMismatch {
            context: "WIF key",
        })?;

    let compressed = match payload.len() {
        len if len == SCALAR_SIZE + 1 => false,
        len if len == SCALAR_SIZE + 2 => {
            if payload[SCALAR_SIZE + 1] != COMPRESSED_MARKER {
                payload.zeroize();
                return Err(Error::MalformedKey {
                    reason: "WIF trailing byte is not the compressed marker",
                });
            }
            true
        }
        len => {
            payload.zeroize();
            return Err(Error::Length {
                context: "WIF payload",
                expected: SCALAR_SIZE + 1,
                actual: len,
            });
        }
    };

    let network = match payload[0] {
        PREFIX_MAINNET => Network::Mainnet,
        PREFIX_TESTNET => Network::Testnet,
        _ => {
            payload.zeroize();
            return Err(Error::MalformedKey {
                reason: "unknown WIF network prefix",
            });
        }
    };

    let mut key_bytes = [0u8; SCALAR_SIZE];
    key_bytes.copy_from_slice(&payload[1..1 + SCALAR_SIZE]);
    payload.zeroize();
    let secret = Scalar::from_canonical(key_bytes)?;
    key_bytes.zeroize();
    if secret.is_zero() {
        return Err(Error::InvalidScalar {
            context: "WIF key",
            reason: "zero private key",
        });
    }
    Ok((secret, network, compressed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ec::random_private_key;
    use rand::rngs::OsRng;

    #[test]
    fn test_known_wif_string() {
        // the private key 1, mainnet, uncompressed
        let mut bytes = [0u8; SCALAR_SIZE];
        bytes[31] = 1;
        let secret = Scalar::new(bytes).unwrap();
        assert_eq!(
            encode_wif(&secret, Network::Mainnet, false),
            "5HpHagT65TZzG1PH3CSu63k8DbpvD8s5ip4nEB3kEsreAnchuDf"
        );
        assert_eq!(
            encode_wif(&secret, Network::Mainnet, true),
            "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn"
        );
    }

    #[test]
    fn test_round_trip() {
        let secret = random_private_key(&mut OsRng);
        for network in [Network::Mainnet, Network::Testnet] {
            for compressed in [false, true] {
                let encoded = encode_wif(&secret, network, compressed);
                let (decoded, net, comp) = decode_wif(&encoded).unwrap();
                assert_eq!(decoded, secret);
                assert_eq!(net, network);
                assert_eq!(comp, compressed);
            }
        }
    }

    #[test]
    fn test_decode_rejects_corruption() {
        let secret = random_private_key(&mut OsRng);
        let mut encoded = encode_wif(&secret, Network::Mainnet, true);
        let tail = if encoded.ends_with('2') { '3' } else { '2' };
        encoded.pop();
        encoded.push(tail);
        assert!(matches!(
            decode_wif(&encoded).unwrap_err(),
            Error::ChecksumMismatch { .. }
        ));
        assert!(decode_wif("0OIl").is_err());
    }

    #[test]
    fn test_decode_rejects_bad_prefix_and_marker() {
        let secret = random_private_key(&mut OsRng);

        let mut payload = vec![0x42u8];
        payload.extend_from_slice(secret.as_bytes());
        let bad_prefix = bs58::encode(&payload).with_check().into_string();
        assert!(decode_wif(&bad_prefix).is_err());

        let mut payload = vec![PREFIX_MAINNET];
        payload.extend_from_slice(secret.as_bytes());
        payload.push(0x02);
        let bad_marker = bs58::encode(&payload).with_check().into_string();
        assert!(decode_wif(&bad_marker).is_err());
    }
}
