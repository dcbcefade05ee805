//! Cambium core — canonical message framing for a blockchain light client
//!
//! This crate defines the exact byte sequences over which content hashes
//! and signatures are computed and which are submitted to a node:
//!
//! - [`codec`]: fixed-width scalar writers (little-endian) and the
//!   fixed-length wire types ([`Hash`], [`PublicKey`], [`Signature`]).
//! - [`schema`]: the structural body schema engine with its
//!   segment-pointer encoding.
//! - [`messages`]: the message frames — [`Transaction`],
//!   [`SignedTransaction`], [`Precommit`] — composing header, body, and
//!   optional trailing signature into one canonical sequence.
//! - [`crypto`]: SHA-256 content hashing and Ed25519 signing/verification
//!   over those sequences.
//! - [`error`]: the unified error type.
//!
//! Network submission lives in the companion `cambium-client` crate.
//!
//! # Example
//!
//! ```
//! use cambium_core::{
//!     crypto::Keypair,
//!     messages::{new_transaction, MessageType},
//!     schema::{BodyData, Field, FieldKind, Schema, Value},
//! };
//!
//! let keypair = Keypair::generate();
//! let schema = Schema::new(vec![
//!     Field::new("amount", FieldKind::U64),
//!     Field::new("memo", FieldKind::Str),
//! ]);
//! let tx = new_transaction(
//!     MessageType::new(schema, *keypair.public_key()).with_routing(130, 0),
//! );
//!
//! let mut data = BodyData::new();
//! data.insert("amount".into(), Value::U64(25));
//! data.insert("memo".into(), Value::Str("coffee".into()));
//!
//! let signed = tx.sign(keypair.secret_key(), &data)?;
//! assert!(signed.verify(keypair.public_key(), &data)?);
//! # Ok::<(), cambium_core::Error>(())
//! ```

#![forbid(unsafe_code)]

pub mod codec;
pub mod crypto;
pub mod error;
pub mod messages;
pub mod schema;

pub use codec::{Hash, PublicKey, Signature, POINTER_SIZE, SIGNATURE_LENGTH};
pub use error::{Error, Result};
pub use messages::{
    is_transaction, new_precommit, new_signed_transaction, new_transaction, MessageFrame,
    MessageKind, MessageType, Precommit, SignedTransaction, Transaction,
};
pub use schema::{BodyData, Field, FieldKind, Schema, Value};
