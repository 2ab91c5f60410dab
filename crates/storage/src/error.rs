pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unsupported pseudo-header: {0:?}")]
    UnsupportedPseudoHeader(String),
    /// Raised by a [`Signer`](crate::Signer), passed through untouched.
    #[error(transparent)]
    Signing(anyhow::Error),
    #[error("Expected a urn:uuid, got {0:?}")]
    InvalidIdentifier(String),
    #[error("Malformed authorization header: {0}")]
    MalformedAuthorization(String),
    #[error("Signature is not valid unpadded url-safe base64")]
    InvalidSignatureEncoding(#[from] base64::DecodeError),
    #[error("Invalid did:key: {0}")]
    InvalidDidKey(String),
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
    #[error("Invalid request target: {0:?}")]
    InvalidRequestTarget(String),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
