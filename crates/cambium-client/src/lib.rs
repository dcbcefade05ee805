//! Cambium client — transaction submission for the Cambium light client
//!
//! Wraps the canonical frames from `cambium-core` with the network side of
//! the system: an asynchronous [`NodeEndpoint`] abstraction, an HTTP
//! implementation ([`HttpEndpoint`]), and the bounded sequential retry
//! discipline ([`send`], [`send_signed`], [`RetryPolicy`]).
//!
//! # Example
//!
//! ```no_run
//! use cambium_client::{send, HttpEndpoint, RetryPolicy};
//! use cambium_core::{
//!     crypto::Keypair,
//!     messages::{new_transaction, MessageType},
//!     schema::{BodyData, Field, FieldKind, Schema, Value},
//! };
//! use std::time::Duration;
//!
//! # async fn example() -> cambium_core::Result<()> {
//! let keypair = Keypair::generate();
//! let schema = Schema::new(vec![Field::new("amount", FieldKind::U64)]);
//! let tx = new_transaction(
//!     MessageType::new(schema, *keypair.public_key()).with_routing(130, 0),
//! );
//! let mut data = BodyData::new();
//! data.insert("amount".into(), Value::U64(25));
//!
//! let endpoint = HttpEndpoint::new("http://127.0.0.1:8200/api/explorer/v1/transactions");
//! let policy = RetryPolicy::new(3, Duration::from_secs(5));
//! let tx_hash = send(&endpoint, &tx, &data, keypair.secret_key(), &policy).await?;
//! println!("accepted: {tx_hash}");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod transport;

pub use error::{Result, TransportError, TransportErrorBuilder};
pub use transport::{send, send_signed, HttpEndpoint, NodeEndpoint, RetryPolicy};
