//! Body schema engine
//!
//! A [`Schema`] is an ordered, structural field list describing a message
//! body. Encoding uses a segment-pointer layout: the body starts with a
//! header region holding one slot per field in schema order — the inline
//! little-endian encoding for fixed-size kinds, or an 8-byte pointer record
//! (`u32` offset from the start of the body + `u32` length) for
//! variable-size kinds — followed by the variable-length content appended
//! in schema order.
//!
//! The header region's width is statically known from the schema alone
//! (see [`Schema::header_size`]), which lets callers predict it without
//! running the encoder.

use crate::codec::{
    self, Hash, PublicKey, HASH_LENGTH, POINTER_SIZE, PUBLIC_KEY_LENGTH,
};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The wire kind of a single body field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// 8-bit unsigned integer
    U8,
    /// 16-bit unsigned integer, little-endian
    U16,
    /// 32-bit unsigned integer, little-endian
    U32,
    /// 64-bit unsigned integer, little-endian
    U64,
    /// 32-byte content hash
    Hash,
    /// 32-byte Ed25519 public key
    PublicKey,
    /// Variable-length byte string, stored out-of-line
    Bytes,
    /// Variable-length UTF-8 string, stored out-of-line
    Str,
}

impl FieldKind {
    /// The statically known encoded size of this kind, or `None` when the
    /// size depends on the value (variable-length kinds).
    #[must_use]
    pub const fn fixed_size(self) -> Option<usize> {
        match self {
            FieldKind::U8 => Some(1),
            FieldKind::U16 => Some(2),
            FieldKind::U32 => Some(4),
            FieldKind::U64 => Some(8),
            FieldKind::Hash => Some(HASH_LENGTH),
            FieldKind::PublicKey => Some(PUBLIC_KEY_LENGTH),
            FieldKind::Bytes | FieldKind::Str => None,
        }
    }

    /// Whether this kind has a statically known encoded size.
    #[must_use]
    pub const fn is_fixed(self) -> bool {
        self.fixed_size().is_some()
    }

    /// The width this kind contributes to the body's header region:
    /// its fixed size, or [`POINTER_SIZE`] for out-of-line kinds.
    #[must_use]
    pub const fn header_width(self) -> usize {
        match self.fixed_size() {
            Some(size) => size,
            None => POINTER_SIZE,
        }
    }
}

/// A named field within a body schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name, the key under which data supplies the value
    pub name: String,
    /// Wire kind of the field
    pub kind: FieldKind,
}

impl Field {
    /// Create a new field descriptor.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// A runtime value for one body field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// 8-bit unsigned integer
    U8(u8),
    /// 16-bit unsigned integer
    U16(u16),
    /// 32-bit unsigned integer
    U32(u32),
    /// 64-bit unsigned integer
    U64(u64),
    /// 32-byte content hash
    Hash(Hash),
    /// 32-byte public key
    PublicKey(PublicKey),
    /// Variable-length byte string
    Bytes(Vec<u8>),
    /// Variable-length UTF-8 string
    Str(String),
}

impl Value {
    /// The field kind this value encodes as.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            Value::U8(_) => FieldKind::U8,
            Value::U16(_) => FieldKind::U16,
            Value::U32(_) => FieldKind::U32,
            Value::U64(_) => FieldKind::U64,
            Value::Hash(_) => FieldKind::Hash,
            Value::PublicKey(_) => FieldKind::PublicKey,
            Value::Bytes(_) => FieldKind::Bytes,
            Value::Str(_) => FieldKind::Str,
        }
    }
}

/// Body data supplied by the caller: field name → value.
pub type BodyData = BTreeMap<String, Value>;

/// An ordered structural schema for a message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Create a schema from an ordered field list.
    #[must_use]
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// The ordered field list.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Width in bytes of the body's header region: the sum, per field, of
    /// its fixed encoded size or [`POINTER_SIZE`] for variable fields.
    ///
    /// This is the declared logical size of the field list, not the size
    /// of a full encoded body.
    #[must_use]
    pub fn header_size(&self) -> usize {
        self.fields
            .iter()
            .map(|field| field.kind.header_width())
            .sum()
    }

    /// Encode `data` into the segment-pointer body layout.
    ///
    /// Every schema field must be present in `data` with a value of the
    /// matching kind; anything else fails with [`Error::Encoding`].
    pub fn encode(&self, data: &BodyData) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; self.header_size()];
        let mut slot = 0usize;

        for field in &self.fields {
            let value = data.get(&field.name).ok_or_else(|| {
                Error::encoding(format!("missing field `{}`", field.name))
            })?;
            if value.kind() != field.kind {
                return Err(Error::encoding(format!(
                    "field `{}` expects {:?}, got {:?}",
                    field.name,
                    field.kind,
                    value.kind()
                )));
            }

            match value {
                Value::U8(v) => codec::write_u8(&mut buf, slot, *v),
                Value::U16(v) => codec::write_u16(&mut buf, slot, *v),
                Value::U32(v) => codec::write_u32(&mut buf, slot, *v),
                Value::U64(v) => codec::write_u64(&mut buf, slot, *v),
                Value::Hash(v) => codec::write_bytes(&mut buf, slot, v.as_bytes()),
                Value::PublicKey(v) => codec::write_bytes(&mut buf, slot, v.as_bytes()),
                Value::Bytes(_) | Value::Str(_) => {
                    let content: &[u8] = match value {
                        Value::Bytes(b) => b,
                        Value::Str(s) => s.as_bytes(),
                        _ => unreachable!(),
                    };
                    let offset = u32::try_from(buf.len()).map_err(|_| {
                        Error::encoding(format!("field `{}` offset exceeds u32", field.name))
                    })?;
                    let length = u32::try_from(content.len()).map_err(|_| {
                        Error::encoding(format!("field `{}` length exceeds u32", field.name))
                    })?;
                    codec::write_u32(&mut buf, slot, offset);
                    codec::write_u32(&mut buf, slot + 4, length);
                    buf.extend_from_slice(content);
                }
            }
            slot += field.kind.header_width();
        }

        Ok(buf)
    }

    /// Decode a body produced by [`Schema::encode`] back into field values.
    pub fn decode(&self, bytes: &[u8]) -> Result<BodyData> {
        let header = self.header_size();
        if bytes.len() < header {
            return Err(Error::encoding(format!(
                "body too short: {} bytes, header region needs {header}",
                bytes.len()
            )));
        }

        let mut data = BodyData::new();
        let mut slot = 0usize;

        for field in &self.fields {
            let value = match field.kind {
                FieldKind::U8 => Value::U8(bytes[slot]),
                FieldKind::U16 => Value::U16(
                    codec::read_u16(bytes, slot)
                        .ok_or_else(|| Error::encoding("truncated u16 field"))?,
                ),
                FieldKind::U32 => Value::U32(
                    codec::read_u32(bytes, slot)
                        .ok_or_else(|| Error::encoding("truncated u32 field"))?,
                ),
                FieldKind::U64 => Value::U64(
                    codec::read_u64(bytes, slot)
                        .ok_or_else(|| Error::encoding("truncated u64 field"))?,
                ),
                FieldKind::Hash => {
                    Value::Hash(Hash::from_slice(&bytes[slot..slot + HASH_LENGTH])?)
                }
                FieldKind::PublicKey => Value::PublicKey(PublicKey::from_slice(
                    &bytes[slot..slot + PUBLIC_KEY_LENGTH],
                )?),
                FieldKind::Bytes | FieldKind::Str => {
                    let offset = codec::read_u32(bytes, slot)
                        .ok_or_else(|| Error::encoding("truncated pointer record"))?
                        as usize;
                    let length = codec::read_u32(bytes, slot + 4)
                        .ok_or_else(|| Error::encoding("truncated pointer record"))?
                        as usize;
                    let end = offset.checked_add(length).ok_or_else(|| {
                        Error::encoding(format!("field `{}` pointer overflow", field.name))
                    })?;
                    let content = bytes.get(offset..end).ok_or_else(|| {
                        Error::encoding(format!(
                            "field `{}` points outside the body ({offset}..{end} of {})",
                            field.name,
                            bytes.len()
                        ))
                    })?;
                    match field.kind {
                        FieldKind::Bytes => Value::Bytes(content.to_vec()),
                        _ => Value::Str(String::from_utf8(content.to_vec()).map_err(|e| {
                            Error::encoding(format!("field `{}` is not UTF-8: {e}", field.name))
                        })?),
                    }
                }
            };
            data.insert(field.name.clone(), value);
            slot += field.kind.header_width();
        }

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallet_schema() -> Schema {
        Schema::new(vec![
            Field::new("amount", FieldKind::U64),
            Field::new("to", FieldKind::PublicKey),
            Field::new("memo", FieldKind::Str),
        ])
    }

    fn wallet_data() -> BodyData {
        let mut data = BodyData::new();
        data.insert("amount".into(), Value::U64(1_000));
        data.insert("to".into(), Value::PublicKey(PublicKey::new([7u8; 32])));
        data.insert("memo".into(), Value::Str("rent".into()));
        data
    }

    #[test]
    fn test_header_size_mixes_fixed_and_pointer() {
        // u64 (8) + public key (32) + variable (POINTER_SIZE)
        assert_eq!(wallet_schema().header_size(), 8 + 32 + POINTER_SIZE);
    }

    #[test]
    fn test_encode_layout() {
        let body = wallet_schema().encode(&wallet_data()).unwrap();
        let header = wallet_schema().header_size();

        // amount inline, little-endian
        assert_eq!(codec::read_u64(&body, 0), Some(1_000));
        // recipient key inline
        assert_eq!(&body[8..40], &[7u8; 32]);
        // memo pointer: content starts right after the header region
        assert_eq!(codec::read_u32(&body, 40), Some(header as u32));
        assert_eq!(codec::read_u32(&body, 44), Some(4));
        assert_eq!(&body[header..], b"rent");
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let schema = wallet_schema();
        let data = wallet_data();
        let body = schema.encode(&data).unwrap();
        assert_eq!(schema.decode(&body).unwrap(), data);
    }

    #[test]
    fn test_missing_field_fails() {
        let mut data = wallet_data();
        data.remove("memo");
        let err = wallet_schema().encode(&data).unwrap_err();
        assert!(err.to_string().contains("missing field `memo`"));
    }

    #[test]
    fn test_kind_mismatch_fails() {
        let mut data = wallet_data();
        data.insert("amount".into(), Value::U32(1_000));
        assert!(wallet_schema().encode(&data).is_err());
    }

    #[test]
    fn test_decode_rejects_out_of_range_pointer() {
        let schema = Schema::new(vec![Field::new("blob", FieldKind::Bytes)]);
        let mut body = Vec::new();
        codec::write_u32(&mut body, 0, 100); // offset past the end
        codec::write_u32(&mut body, 4, 4);
        assert!(schema.decode(&body).is_err());
    }

    #[test]
    fn test_decode_rejects_short_body() {
        let schema = Schema::new(vec![Field::new("n", FieldKind::U64)]);
        assert!(schema.decode(&[0u8; 4]).is_err());
    }

    #[test]
    fn test_empty_variable_field() {
        let schema = Schema::new(vec![Field::new("blob", FieldKind::Bytes)]);
        let mut data = BodyData::new();
        data.insert("blob".into(), Value::Bytes(Vec::new()));
        let body = schema.encode(&data).unwrap();
        assert_eq!(body.len(), POINTER_SIZE);
        assert_eq!(schema.decode(&body).unwrap(), data);
    }
}
