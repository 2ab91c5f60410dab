use std::sync::Arc;

/// Trait for signing HTTP signature strings.
///
/// Implementations are sync, since signing is CPU-bound.
/// For async backends (e.g. KMS), use `spawn_blocking`.
pub trait Signer: Send + Sync {
    /// Stable identifier of the signing key, embedded as `keyId`.
    fn id(&self) -> &str;

    /// Sign exactly `data`. Returns raw signature bytes.
    fn sign(&self, data: &[u8]) -> anyhow::Result<Vec<u8>>;
}

impl<S: Signer + ?Sized> Signer for &S {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn sign(&self, data: &[u8]) -> anyhow::Result<Vec<u8>> {
        (**self).sign(data)
    }
}

impl<S: Signer + ?Sized> Signer for Box<S> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn sign(&self, data: &[u8]) -> anyhow::Result<Vec<u8>> {
        (**self).sign(data)
    }
}

impl<S: Signer + ?Sized> Signer for Arc<S> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn sign(&self, data: &[u8]) -> anyhow::Result<Vec<u8>> {
        (**self).sign(data)
    }
}
