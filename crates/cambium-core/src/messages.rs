//! Canonical message frames
//!
//! A frame composes a fixed header (author identity, class byte, type byte,
//! variant routing fields), a schema-encoded body, and — for signed
//! transactions — a trailing 64-byte signature into the single canonical
//! byte sequence the rest of the system hashes, signs, verifies, and
//! submits. Correctness here is binary-exact: the remote node recomputes
//! hashes and verifies signatures over the identical bytes.
//!
//! Wire layouts:
//!
//! ```text
//! Transaction: [author: 32][class: 1 = 0][type: 1 = 0][service_id: 2 LE][message_id: 2 LE][body][signature: 64, iff signed]
//! Precommit:   [author: 32][class: 1 = 1][type: 1 = 0][body]
//! ```
//!
//! Frames are immutable. Signing is two-phase: [`Transaction::sign`]
//! returns a new [`SignedTransaction`] value instead of mutating the
//! unsigned frame, so "sign once, then treat as immutable" is a type-level
//! guarantee. Serialization is produced fresh on every call and is
//! idempotent for identical inputs.

use crate::codec::{self, Hash, PublicKey, Signature, PUBLIC_KEY_LENGTH};
use crate::crypto::{self, SecretKey};
use crate::error::{Error, Result};
use crate::schema::{BodyData, Schema};

/// Protocol class byte for transactions.
pub const TRANSACTION_CLASS: u8 = 0;
/// Protocol type byte for transactions.
pub const TRANSACTION_TYPE: u8 = 0;
/// Protocol class byte for consensus precommits.
pub const PRECOMMIT_CLASS: u8 = 1;
/// Protocol type byte for consensus precommits.
pub const PRECOMMIT_TYPE: u8 = 0;

/// Message type descriptor supplied by the caller at construction time.
///
/// Read-only once a frame has been constructed from it. The protocol class
/// and type bytes are deliberately absent: each frame variant fixes them
/// and they are not caller-settable.
#[derive(Debug, Clone)]
pub struct MessageType {
    /// Structural schema of the message body
    pub schema: Schema,
    /// Author identity (Ed25519 public key)
    pub author: PublicKey,
    /// Service the transaction is routed to on the remote node
    pub service_id: u16,
    /// Handler within that service the body is routed to
    pub message_id: u16,
    /// Pre-supplied signature, when the transaction was signed elsewhere
    pub signature: Option<Signature>,
}

impl MessageType {
    /// Create a descriptor with zeroed routing fields and no signature.
    #[must_use]
    pub fn new(schema: Schema, author: PublicKey) -> Self {
        Self {
            schema,
            author,
            service_id: 0,
            message_id: 0,
            signature: None,
        }
    }

    /// Set the transaction routing fields.
    #[must_use]
    pub fn with_routing(mut self, service_id: u16, message_id: u16) -> Self {
        self.service_id = service_id;
        self.message_id = message_id;
        self
    }

    /// Attach a pre-supplied signature.
    #[must_use]
    pub fn with_signature(mut self, signature: Signature) -> Self {
        self.signature = Some(signature);
        self
    }
}

/// Which frame variant a message is — an explicit tag instead of runtime
/// class inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// A client transaction (signable, sendable)
    Transaction,
    /// A consensus precommit (hash/encode symmetry only)
    Precommit,
}

/// Capability contract every frame variant honors.
///
/// Callers that accept transactions and precommits polymorphically (a
/// generic "serialize and hash" utility, the crypto service) depend only
/// on this trait.
pub trait MessageFrame {
    /// The variant tag of this frame.
    fn kind(&self) -> MessageKind;

    /// The author identity the header carries.
    fn author(&self) -> &PublicKey;

    /// The body schema this frame encodes data against.
    fn schema(&self) -> &Schema;

    /// Build the fixed serialization header preceding the body.
    fn create_header(&self) -> Vec<u8>;

    /// Produce the full canonical byte sequence for `data` under this
    /// frame's identity, class, and type.
    fn serialize(&self, data: &BodyData) -> Result<Vec<u8>>;

    /// The byte form signatures are computed and verified over. Never
    /// includes a signature, even on signed frames.
    fn signable(&self, data: &BodyData) -> Result<Vec<u8>> {
        let mut buf = self.create_header();
        buf.extend_from_slice(&self.schema().encode(data)?);
        Ok(buf)
    }

    /// Declared logical size of the schema's field list: the sum of each
    /// field's fixed size, or [`codec::POINTER_SIZE`] per variable field.
    /// Describes the body's header region, not the full serialized length.
    fn size(&self) -> usize {
        self.schema().header_size()
    }
}

/// Whether a frame honors the transaction contract. A tag check, true for
/// both unsigned and signed transactions.
pub fn is_transaction(frame: &dyn MessageFrame) -> bool {
    frame.kind() == MessageKind::Transaction
}

/// Shared header prefix: author identity, class byte, type byte. The two
/// variants diverge after the type byte.
fn common_header(author: &PublicKey, class: u8, message_type: u8) -> Vec<u8> {
    let mut buf = Vec::with_capacity(PUBLIC_KEY_LENGTH + 2);
    codec::write_bytes(&mut buf, 0, author.as_bytes());
    codec::write_u8(&mut buf, PUBLIC_KEY_LENGTH, class);
    codec::write_u8(&mut buf, PUBLIC_KEY_LENGTH + 1, message_type);
    buf
}

/// An unsigned client transaction frame.
///
/// Created once per message template (schema + identity + routing) and
/// reused to serialize, hash, and sign different payloads against that
/// template.
#[derive(Debug, Clone)]
pub struct Transaction {
    schema: Schema,
    author: PublicKey,
    service_id: u16,
    message_id: u16,
}

impl Transaction {
    /// The service identifier routing this transaction on the remote node.
    #[must_use]
    pub fn service_id(&self) -> u16 {
        self.service_id
    }

    /// The message identifier routing the body within the service.
    #[must_use]
    pub fn message_id(&self) -> u16 {
        self.message_id
    }

    /// SHA-256 content hash over the canonical byte sequence for `data`.
    pub fn hash(&self, data: &BodyData) -> Result<Hash> {
        crypto::hash(data, self)
    }

    /// Sign `data` under this frame, producing an immutable signed value.
    pub fn sign(&self, secret_key: &SecretKey, data: &BodyData) -> Result<SignedTransaction> {
        let signature = crypto::sign(secret_key, data, self)?;
        Ok(SignedTransaction {
            transaction: self.clone(),
            signature,
        })
    }

    /// Attach an externally produced signature without re-signing.
    #[must_use]
    pub fn with_signature(self, signature: Signature) -> SignedTransaction {
        SignedTransaction {
            transaction: self,
            signature,
        }
    }

    /// Verify `signature` over the signable form of `(self, data)`.
    ///
    /// Returns `Ok(false)` for a mismatched signature; errors only on
    /// malformed inputs or a body that fails to encode.
    pub fn verify_signature(
        &self,
        signature: &Signature,
        public_key: &PublicKey,
        data: &BodyData,
    ) -> Result<bool> {
        crypto::verify_signature(signature, public_key, data, self)
    }
}

impl MessageFrame for Transaction {
    fn kind(&self) -> MessageKind {
        MessageKind::Transaction
    }

    fn author(&self) -> &PublicKey {
        &self.author
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn create_header(&self) -> Vec<u8> {
        let mut buf = common_header(&self.author, TRANSACTION_CLASS, TRANSACTION_TYPE);
        let at = buf.len();
        codec::write_u16(&mut buf, at, self.service_id);
        codec::write_u16(&mut buf, at + 2, self.message_id);
        buf
    }

    fn serialize(&self, data: &BodyData) -> Result<Vec<u8>> {
        self.signable(data)
    }
}

/// A signed, immutable transaction: the unsigned frame plus its trailing
/// 64-byte signature.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    transaction: Transaction,
    signature: Signature,
}

impl SignedTransaction {
    /// The underlying unsigned frame.
    #[must_use]
    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// The attached signature.
    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// SHA-256 content hash over the full canonical form — including the
    /// trailing signature, so the content address commits to it.
    pub fn hash(&self, data: &BodyData) -> Result<Hash> {
        crypto::hash(data, self)
    }

    /// Verify the attached signature against `public_key` and `data`.
    pub fn verify(&self, public_key: &PublicKey, data: &BodyData) -> Result<bool> {
        crypto::verify_signature(&self.signature, public_key, data, self)
    }
}

impl MessageFrame for SignedTransaction {
    fn kind(&self) -> MessageKind {
        MessageKind::Transaction
    }

    fn author(&self) -> &PublicKey {
        self.transaction.author()
    }

    fn schema(&self) -> &Schema {
        self.transaction.schema()
    }

    fn create_header(&self) -> Vec<u8> {
        self.transaction.create_header()
    }

    fn serialize(&self, data: &BodyData) -> Result<Vec<u8>> {
        // Signature goes last, after the body.
        let mut buf = self.transaction.serialize(data)?;
        buf.extend_from_slice(self.signature.as_bytes());
        Ok(buf)
    }

    fn signable(&self, data: &BodyData) -> Result<Vec<u8>> {
        self.transaction.serialize(data)
    }
}

/// A consensus precommit frame.
///
/// Exists for hashing/encoding symmetry with how the remote protocol
/// represents precommit messages; never signed or sent through this frame.
#[derive(Debug, Clone)]
pub struct Precommit {
    schema: Schema,
    author: PublicKey,
}

impl Precommit {
    /// SHA-256 content hash over the canonical byte sequence for `data`.
    pub fn hash(&self, data: &BodyData) -> Result<Hash> {
        crypto::hash(data, self)
    }
}

impl MessageFrame for Precommit {
    fn kind(&self) -> MessageKind {
        MessageKind::Precommit
    }

    fn author(&self) -> &PublicKey {
        &self.author
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn create_header(&self) -> Vec<u8> {
        common_header(&self.author, PRECOMMIT_CLASS, PRECOMMIT_TYPE)
    }

    fn serialize(&self, data: &BodyData) -> Result<Vec<u8>> {
        self.signable(data)
    }
}

/// Create an unsigned transaction frame from a type descriptor.
///
/// A descriptor-supplied signature is not consumed here; use
/// [`new_signed_transaction`] when the descriptor carries one.
#[must_use]
pub fn new_transaction(message_type: MessageType) -> Transaction {
    Transaction {
        schema: message_type.schema,
        author: message_type.author,
        service_id: message_type.service_id,
        message_id: message_type.message_id,
    }
}

/// Create a signed transaction frame from a descriptor carrying a
/// pre-supplied signature.
pub fn new_signed_transaction(message_type: MessageType) -> Result<SignedTransaction> {
    let signature = message_type
        .signature
        .ok_or_else(|| Error::crypto("descriptor carries no signature"))?;
    let transaction = new_transaction(MessageType {
        signature: None,
        ..message_type
    });
    Ok(transaction.with_signature(signature))
}

/// Create a precommit frame from a type descriptor. Routing fields and any
/// signature on the descriptor are meaningless for precommits and ignored.
#[must_use]
pub fn new_precommit(message_type: MessageType) -> Precommit {
    Precommit {
        schema: message_type.schema,
        author: message_type.author,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::SIGNATURE_LENGTH;
    use crate::schema::{Field, FieldKind, Value};

    fn descriptor() -> MessageType {
        let schema = Schema::new(vec![
            Field::new("seed", FieldKind::U32),
            Field::new("name", FieldKind::Str),
        ]);
        MessageType::new(schema, PublicKey::new([9u8; 32])).with_routing(130, 2)
    }

    fn data() -> BodyData {
        let mut data = BodyData::new();
        data.insert("seed".into(), Value::U32(0x0403_0201));
        data.insert("name".into(), Value::Str("ab".into()));
        data
    }

    #[test]
    fn test_transaction_header_layout() {
        let tx = new_transaction(descriptor());
        let header = tx.create_header();
        assert_eq!(header.len(), 32 + 1 + 1 + 2 + 2);
        assert_eq!(&header[..32], &[9u8; 32]);
        assert_eq!(header[32], TRANSACTION_CLASS);
        assert_eq!(header[33], TRANSACTION_TYPE);
        assert_eq!(&header[34..36], &130u16.to_le_bytes());
        assert_eq!(&header[36..38], &2u16.to_le_bytes());
    }

    #[test]
    fn test_precommit_header_layout() {
        let pc = new_precommit(descriptor());
        let header = pc.create_header();
        assert_eq!(header.len(), 32 + 1 + 1);
        assert_eq!(header[32], PRECOMMIT_CLASS);
        assert_eq!(header[33], PRECOMMIT_TYPE);
    }

    #[test]
    fn test_serialize_is_header_then_body() {
        let tx = new_transaction(descriptor());
        let bytes = tx.serialize(&data()).unwrap();
        let header = tx.create_header();
        let body = tx.schema().encode(&data()).unwrap();
        assert_eq!(bytes.len(), header.len() + body.len());
        assert_eq!(&bytes[..header.len()], &header[..]);
        assert_eq!(&bytes[header.len()..], &body[..]);
    }

    #[test]
    fn test_serialize_idempotent() {
        let tx = new_transaction(descriptor());
        assert_eq!(tx.serialize(&data()).unwrap(), tx.serialize(&data()).unwrap());
    }

    #[test]
    fn test_signed_serialization_appends_signature_last() {
        let signature = Signature::new([0xcd; 64]);
        let tx = new_transaction(descriptor());
        let unsigned = tx.serialize(&data()).unwrap();
        let signed = tx.with_signature(signature);
        let bytes = signed.serialize(&data()).unwrap();

        assert_eq!(bytes.len(), unsigned.len() + SIGNATURE_LENGTH);
        assert_eq!(&bytes[..unsigned.len()], &unsigned[..]);
        assert_eq!(&bytes[unsigned.len()..], signature.as_bytes());
        // Signing input stays the unsigned form
        assert_eq!(signed.signable(&data()).unwrap(), unsigned);
    }

    #[test]
    fn test_size_counts_pointer_for_variable_fields() {
        let tx = new_transaction(descriptor());
        assert_eq!(tx.size(), 4 + codec::POINTER_SIZE);
    }

    #[test]
    fn test_is_transaction_predicate() {
        assert!(is_transaction(&new_transaction(descriptor())));
        assert!(is_transaction(
            &new_transaction(descriptor()).with_signature(Signature::new([0u8; 64]))
        ));
        assert!(!is_transaction(&new_precommit(descriptor())));
    }

    #[test]
    fn test_new_signed_transaction_requires_signature() {
        assert!(new_signed_transaction(descriptor()).is_err());
        let signed =
            new_signed_transaction(descriptor().with_signature(Signature::new([1u8; 64])))
                .unwrap();
        assert_eq!(signed.signature(), &Signature::new([1u8; 64]));
    }

    #[test]
    fn test_encoding_error_surfaces_unchanged() {
        let tx = new_transaction(descriptor());
        let err = tx.serialize(&BodyData::new()).unwrap_err();
        assert!(matches!(err, Error::Encoding { .. }));
    }
}
