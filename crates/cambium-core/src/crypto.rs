//! Crypto service: content hashing, signing, verification
//!
//! Hashes are SHA-256 over a frame's full canonical byte sequence — for a
//! signed transaction that includes the trailing signature, so the content
//! address commits to it. Signatures are Ed25519 and are always computed
//! and verified over the *signable* form (header + body, no signature),
//! which is what the remote node checks.

use crate::codec::{Hash, PublicKey, Signature};
use crate::error::{Error, Result};
use crate::messages::MessageFrame;
use crate::schema::BodyData;
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length in bytes of an Ed25519 secret key seed.
pub const SECRET_KEY_LENGTH: usize = 32;

/// An Ed25519 secret key seed.
///
/// Zeroized on drop and redacted from `Debug` output; never logged or
/// transmitted.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    bytes: [u8; SECRET_KEY_LENGTH],
}

impl SecretKey {
    /// Wrap raw seed bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; SECRET_KEY_LENGTH]) -> Self {
        Self { bytes }
    }

    /// The raw seed bytes. Handle with care — secret material.
    pub fn as_bytes(&self) -> &[u8; SECRET_KEY_LENGTH] {
        &self.bytes
    }

    /// Derive the public key for this secret.
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        let signing = SigningKey::from_bytes(&self.bytes);
        PublicKey::new(signing.verifying_key().to_bytes())
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// An Ed25519 keypair for authoring messages.
#[derive(Debug, Clone)]
pub struct Keypair {
    secret: SecretKey,
    public: PublicKey,
}

impl Keypair {
    /// Generate a fresh keypair from OS randomness.
    #[must_use]
    pub fn generate() -> Self {
        let signing = SigningKey::generate(&mut rand::rngs::OsRng);
        let public = PublicKey::new(signing.verifying_key().to_bytes());
        Self {
            secret: SecretKey::from_bytes(signing.to_bytes()),
            public,
        }
    }

    /// Reconstruct a keypair from a stored secret.
    #[must_use]
    pub fn from_secret(secret: SecretKey) -> Self {
        let public = secret.public_key();
        Self { secret, public }
    }

    /// The secret half.
    pub fn secret_key(&self) -> &SecretKey {
        &self.secret
    }

    /// The public half.
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }
}

/// SHA-256 content hash over `frame.serialize(data)`.
pub fn hash(data: &BodyData, frame: &dyn MessageFrame) -> Result<Hash> {
    let bytes = frame.serialize(data)?;
    let digest = Sha256::digest(&bytes);
    Ok(Hash::new(digest.into()))
}

/// Ed25519 signature over `frame.signable(data)`.
pub fn sign(secret_key: &SecretKey, data: &BodyData, frame: &dyn MessageFrame) -> Result<Signature> {
    let bytes = frame.signable(data)?;
    let signing = SigningKey::from_bytes(secret_key.as_bytes());
    let signature = signing.sign(&bytes);
    tracing::debug!(message_len = bytes.len(), "signed message");
    Ok(Signature::new(signature.to_bytes()))
}

/// Verify an Ed25519 signature over `frame.signable(data)`.
///
/// Returns `Ok(false)` for a signature that does not match; `Err` only for
/// a malformed public key or a body that fails to encode.
pub fn verify_signature(
    signature: &Signature,
    public_key: &PublicKey,
    data: &BodyData,
    frame: &dyn MessageFrame,
) -> Result<bool> {
    let bytes = frame.signable(data)?;
    let verifying = VerifyingKey::from_bytes(public_key.as_bytes())
        .map_err(|e| Error::crypto(format!("malformed public key: {e}")))?;
    let signature = ed25519_dalek::Signature::from_bytes(signature.as_bytes());
    Ok(verifying.verify(&bytes, &signature).is_ok())
}
