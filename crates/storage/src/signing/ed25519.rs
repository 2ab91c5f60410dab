use anyhow::{Context, Result};
use ed25519_dalek::{SigningKey, VerifyingKey};
use sha2::{Digest, Sha256};

use super::did_key::{self, ED25519_PUB};
use super::signer::Signer;

/// Ed25519 signer identified by a `did:key` verification method.
///
/// `id()` is `did:key:z6Mk...#z6Mk...`; the part before `#` is the controller.
pub struct Ed25519Signer {
    signing_key: SigningKey,
    controller: String,
    id: String,
}

impl Ed25519Signer {
    /// Generate a fresh key from OS randomness.
    pub fn generate() -> Result<Self> {
        let mut secret = [0u8; 32];
        getrandom::getrandom(&mut secret).context("reading OS randomness for ed25519 key")?;
        Ok(Self::from_bytes(&secret))
    }

    /// Created from a seed string. The SHA-256 hash of the seed
    /// becomes the 32-byte secret key.
    pub fn from_seed(seed: &str) -> Self {
        let hash = Sha256::digest(seed.as_bytes());
        Self::from_bytes(&hash.into())
    }

    pub fn from_bytes(secret: &[u8; 32]) -> Self {
        SigningKey::from_bytes(secret).into()
    }

    /// Controller DID (`did:key:z6Mk...`).
    pub fn controller(&self) -> &str {
        &self.controller
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }
}

impl From<SigningKey> for Ed25519Signer {
    fn from(signing_key: SigningKey) -> Self {
        let (controller, id) =
            did_key::identifiers(ED25519_PUB, signing_key.verifying_key().as_bytes());
        Self {
            signing_key,
            controller,
            id,
        }
    }
}

impl std::fmt::Debug for Ed25519Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519Signer").field("id", &self.id).finish()
    }
}

impl Signer for Ed25519Signer {
    fn id(&self) -> &str {
        &self.id
    }

    fn sign(&self, data: &[u8]) -> Result<Vec<u8>> {
        let signature = ed25519_dalek::Signer::try_sign(&self.signing_key, data)
            .map_err(|e| anyhow::anyhow!("ed25519 sign failed: {e}"))?;
        Ok(signature.to_bytes().to_vec())
    }
}

/// Checks Ed25519 signatures against the key encoded in a `did:key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ed25519Verifier {
    verifying_key: VerifyingKey,
}

impl Ed25519Verifier {
    /// Accepts a controller DID or a verification method id (`did#fragment`).
    pub fn from_did_key(did: &str) -> crate::Result<Self> {
        let bytes = did_key::decode(did, ED25519_PUB)?;
        let bytes: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| crate::Error::InvalidDidKey(format!("expected 32 key bytes in {did:?}")))?;
        let verifying_key = VerifyingKey::from_bytes(&bytes)
            .map_err(|e| crate::Error::InvalidDidKey(format!("{did:?}: {e}")))?;
        Ok(Self { verifying_key })
    }

    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        let Ok(signature) = ed25519_dalek::Signature::from_slice(signature) else {
            return false;
        };
        self.verifying_key.verify_strict(message, &signature).is_ok()
    }
}

impl From<VerifyingKey> for Ed25519Verifier {
    fn from(verifying_key: VerifyingKey) -> Self {
        Self { verifying_key }
    }
}
