//! Shared constants for secp256k1 operations

/// Size of a secp256k1 scalar in bytes (32 bytes = 256 bits)
pub const SCALAR_SIZE: usize = 32;

/// Size of a secp256k1 field element in bytes (32 bytes = 256 bits)
pub const FIELD_ELEMENT_SIZE: usize = 32;

/// Size of an uncompressed point: format byte (0x04) + x-coordinate + y-coordinate
pub const POINT_UNCOMPRESSED_SIZE: usize = 1 + 2 * FIELD_ELEMENT_SIZE; // 65 bytes

/// Size of a compressed point: format byte (0x02/0x03) + x-coordinate
pub const POINT_COMPRESSED_SIZE: usize = 1 + FIELD_ELEMENT_SIZE; // 33 bytes
