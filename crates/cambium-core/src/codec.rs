//! Fixed-width scalar field codec
//!
//! The wire format is built from a small set of primitives: unsigned
//! integers in **little-endian** byte order and fixed-length byte strings
//! (hash digests, public keys, signatures). Little-endian is a fixed
//! external contract — the remote node hashes and verifies the exact same
//! byte sequence, so the order is not a local choice.
//!
//! Writers take an explicit offset into the target buffer and zero-extend
//! the buffer when the offset lies past its current end, so header slots
//! can be reserved up front and filled in any order.

use crate::error::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Length in bytes of a content hash digest (SHA-256).
pub const HASH_LENGTH: usize = 32;

/// Length in bytes of an Ed25519 public key.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Length in bytes of an Ed25519 signature.
pub const SIGNATURE_LENGTH: usize = 64;

/// Width in bytes of an out-of-line variable-field reference:
/// a `u32` offset from the start of the body followed by a `u32` length,
/// both little-endian.
pub const POINTER_SIZE: usize = 8;

// ---------------------------------------------------------------------------
// Scalar writers
// ---------------------------------------------------------------------------

/// Write raw bytes into `buf` at `offset`, zero-extending the buffer if the
/// slot does not exist yet.
pub fn write_bytes(buf: &mut Vec<u8>, offset: usize, bytes: &[u8]) {
    let end = offset + bytes.len();
    if buf.len() < end {
        buf.resize(end, 0);
    }
    buf[offset..end].copy_from_slice(bytes);
}

/// Write an 8-bit integer at `offset`.
pub fn write_u8(buf: &mut Vec<u8>, offset: usize, value: u8) {
    write_bytes(buf, offset, &[value]);
}

/// Write a 16-bit little-endian integer at `offset`.
pub fn write_u16(buf: &mut Vec<u8>, offset: usize, value: u16) {
    write_bytes(buf, offset, &value.to_le_bytes());
}

/// Write a 32-bit little-endian integer at `offset`.
pub fn write_u32(buf: &mut Vec<u8>, offset: usize, value: u32) {
    write_bytes(buf, offset, &value.to_le_bytes());
}

/// Write a 64-bit little-endian integer at `offset`.
pub fn write_u64(buf: &mut Vec<u8>, offset: usize, value: u64) {
    write_bytes(buf, offset, &value.to_le_bytes());
}

/// Read a 16-bit little-endian integer at `offset`.
pub fn read_u16(buf: &[u8], offset: usize) -> Option<u16> {
    let bytes = buf.get(offset..offset + 2)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// Read a 32-bit little-endian integer at `offset`.
pub fn read_u32(buf: &[u8], offset: usize) -> Option<u32> {
    let bytes = buf.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Read a 64-bit little-endian integer at `offset`.
pub fn read_u64(buf: &[u8], offset: usize) -> Option<u64> {
    let bytes = buf.get(offset..offset + 8)?;
    let mut arr = [0u8; 8];
    arr.copy_from_slice(bytes);
    Some(u64::from_le_bytes(arr))
}

// ---------------------------------------------------------------------------
// Fixed-length wire types
// ---------------------------------------------------------------------------

fn decode_fixed_hex<const N: usize>(s: &str, what: &str) -> Result<[u8; N], Error> {
    let bytes = hex::decode(s).map_err(|e| Error::encoding(format!("invalid {what} hex: {e}")))?;
    bytes.as_slice().try_into().map_err(|_| {
        Error::encoding(format!(
            "invalid {what} length: expected {N} bytes, got {}",
            bytes.len()
        ))
    })
}

fn fixed_from_slice<const N: usize>(bytes: &[u8], what: &str) -> Result<[u8; N], Error> {
    bytes.try_into().map_err(|_| {
        Error::encoding(format!(
            "invalid {what} length: expected {N} bytes, got {}",
            bytes.len()
        ))
    })
}

/// 32-byte SHA-256 content hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash([u8; HASH_LENGTH]);

impl Hash {
    /// Wrap raw digest bytes.
    #[must_use]
    pub const fn new(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Construct from a byte slice, checking length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self(fixed_from_slice(bytes, "hash")?))
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", hex::encode(self.0))
    }
}

impl FromStr for Hash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Ok(Self(decode_fixed_hex(s, "hash")?))
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// 32-byte Ed25519 public key identifying a message author.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey([u8; PUBLIC_KEY_LENGTH]);

impl PublicKey {
    /// Wrap raw key bytes.
    #[must_use]
    pub const fn new(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Construct from a byte slice, checking length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self(fixed_from_slice(bytes, "public key")?))
    }

    /// The raw key bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.0))
    }
}

impl FromStr for PublicKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Ok(Self(decode_fixed_hex(s, "public key")?))
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// 64-byte Ed25519 signature, always the trailing component of a signed
/// transaction's canonical byte sequence.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_LENGTH]);

impl Signature {
    /// Wrap raw signature bytes.
    #[must_use]
    pub const fn new(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Construct from a byte slice, checking length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self(fixed_from_slice(bytes, "signature")?))
    }

    /// The raw signature bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", hex::encode(self.0))
    }
}

impl FromStr for Signature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Ok(Self(decode_fixed_hex(s, "signature")?))
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_u16_little_endian() {
        let mut buf = Vec::new();
        write_u16(&mut buf, 0, 0x0102);
        assert_eq!(buf, vec![0x02, 0x01]);
    }

    #[test]
    fn test_write_past_end_zero_extends() {
        let mut buf = vec![0xff];
        write_u8(&mut buf, 3, 0x07);
        assert_eq!(buf, vec![0xff, 0x00, 0x00, 0x07]);
    }

    #[test]
    fn test_write_overwrites_existing_slot() {
        let mut buf = vec![0u8; 4];
        write_u32(&mut buf, 0, 0xdead_beef);
        assert_eq!(buf, 0xdead_beef_u32.to_le_bytes().to_vec());
    }

    #[test]
    fn test_read_write_roundtrip() {
        let mut buf = Vec::new();
        write_u64(&mut buf, 2, u64::MAX - 7);
        assert_eq!(read_u64(&buf, 2), Some(u64::MAX - 7));
        assert_eq!(read_u64(&buf, 3), None);
    }

    #[test]
    fn test_hash_hex_roundtrip() {
        let hash = Hash::new([0xab; 32]);
        let parsed: Hash = hash.to_string().parse().unwrap();
        assert_eq!(parsed, hash);
    }

    #[test]
    fn test_public_key_rejects_wrong_length() {
        assert!(PublicKey::from_slice(&[0u8; 31]).is_err());
        assert!("00".repeat(33).parse::<PublicKey>().is_err());
    }

    #[test]
    fn test_signature_rejects_bad_hex() {
        assert!("zz".repeat(64).parse::<Signature>().is_err());
    }

    #[test]
    fn test_pointer_size_is_offset_plus_length() {
        // u32 offset + u32 length
        assert_eq!(POINTER_SIZE, 4 + 4);
    }
}
