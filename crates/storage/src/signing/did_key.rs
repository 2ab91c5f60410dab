//! `did:key` encoding for the key types this crate signs with.
//!
//! A `did:key` is `did:key:z` followed by the base58btc encoding of a
//! multicodec prefix and the raw public key bytes.

use base58::{FromBase58, ToBase58};

use crate::error::{Error, Result};

/// Multicodec prefix for Ed25519 public keys.
pub(crate) const ED25519_PUB: [u8; 2] = [0xed, 0x01];
/// Multicodec prefix for compressed secp256k1 public keys.
pub(crate) const SECP256K1_PUB: [u8; 2] = [0xe7, 0x01];

const DID_KEY_PREFIX: &str = "did:key:";

/// Multibase fingerprint (`z...`) of a public key.
pub(crate) fn fingerprint(codec: [u8; 2], public_key: &[u8]) -> String {
    let mut raw = Vec::with_capacity(codec.len() + public_key.len());
    raw.extend_from_slice(&codec);
    raw.extend_from_slice(public_key);
    format!("z{}", raw.to_base58())
}

/// Controller DID and verification method id for a public key.
pub(crate) fn identifiers(codec: [u8; 2], public_key: &[u8]) -> (String, String) {
    let fingerprint = fingerprint(codec, public_key);
    let controller = format!("{DID_KEY_PREFIX}{fingerprint}");
    let id = format!("{controller}#{fingerprint}");
    (controller, id)
}

/// Decode a `did:key` (optionally carrying a `#fragment`) into the public key
/// bytes, checking the multicodec prefix.
pub(crate) fn decode(did: &str, codec: [u8; 2]) -> Result<Vec<u8>> {
    let controller = did.split('#').next().unwrap_or(did);
    let encoded = controller
        .strip_prefix(DID_KEY_PREFIX)
        .ok_or_else(|| Error::InvalidDidKey(format!("missing did:key prefix in {did:?}")))?;
    let b58 = encoded
        .strip_prefix('z')
        .ok_or_else(|| Error::InvalidDidKey(format!("missing base58btc prefix in {did:?}")))?;
    let raw = b58
        .from_base58()
        .map_err(|_| Error::InvalidDidKey(format!("invalid base58 in {did:?}")))?;

    match raw.strip_prefix(&codec[..]) {
        Some(key) => Ok(key.to_vec()),
        None => Err(Error::InvalidDidKey(format!("unexpected key type in {did:?}"))),
    }
}
