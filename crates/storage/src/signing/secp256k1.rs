use anyhow::Result;
use k256::ecdsa::{Signature, SigningKey, signature::Signer as _};
use sha2::{Digest, Sha256};

use super::did_key::{self, SECP256K1_PUB};
use super::signer::Signer;

/// ECDSA signer using the secp256k1 curve, identified by a `did:key`.
///
/// Signs the SHA-256 digest of the message and returns the fixed-size
/// 64-byte `r || s` encoding.
pub struct Secp256k1Signer {
    signing_key: SigningKey,
    controller: String,
    id: String,
}

impl Secp256k1Signer {
    /// Created from a seed string. The SHA-256 hash of the seed
    /// becomes the 32-byte private key.
    pub fn from_seed(seed: &str) -> Result<Self> {
        let hash = Sha256::digest(seed.as_bytes());
        Self::from_bytes(&hash.into())
    }

    pub fn from_bytes(secret: &[u8; 32]) -> Result<Self> {
        let signing_key = SigningKey::from_slice(secret)
            .map_err(|e| anyhow::anyhow!("invalid secp256k1 secret: {e}"))?;
        Ok(signing_key.into())
    }

    pub fn controller(&self) -> &str {
        &self.controller
    }

    /// Compressed public key bytes (33 bytes).
    pub fn public_key_bytes(&self) -> Vec<u8> {
        self.signing_key
            .verifying_key()
            .to_encoded_point(true)
            .as_bytes()
            .to_vec()
    }
}

impl From<SigningKey> for Secp256k1Signer {
    fn from(signing_key: SigningKey) -> Self {
        let public_key = signing_key.verifying_key().to_encoded_point(true);
        let (controller, id) = did_key::identifiers(SECP256K1_PUB, public_key.as_bytes());
        Self {
            signing_key,
            controller,
            id,
        }
    }
}

impl std::fmt::Debug for Secp256k1Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secp256k1Signer").field("id", &self.id).finish()
    }
}

impl Signer for Secp256k1Signer {
    fn id(&self) -> &str {
        &self.id
    }

    fn sign(&self, data: &[u8]) -> Result<Vec<u8>> {
        let signature: Signature = self
            .signing_key
            .try_sign(data)
            .map_err(|e| anyhow::anyhow!("secp256k1 sign failed: {e}"))?;
        Ok(signature.to_bytes().to_vec())
    }
}
