use base64::Engine;
use base64::engine::GeneralPurpose;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use tracing::trace;

use super::clock::{Clock, SystemClock};
use super::signature_string::{PseudoHeader, SigningRequest};
use super::signer::Signer;
use crate::error::{Error, Result};

/// Validity window applied when the caller does not pin `expires`.
pub const DEFAULT_EXPIRATION_SECONDS: u64 = 30;

/// Encoding of the `signature=` parameter, shared by the builder and the parser.
pub(crate) const SIGNATURE_ENCODING: GeneralPurpose = URL_SAFE_NO_PAD;

/// Per-call overrides for [`AuthorizationHeaderBuilder::build`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureOptions<'a> {
    /// Defaults to the builder clock.
    pub created: Option<u64>,
    /// Defaults to `created + 30`.
    pub expires: Option<u64>,
    /// Defaults to [`PseudoHeader::DEFAULT`].
    pub include_headers: Option<&'a [&'a str]>,
}

impl SignatureOptions<'_> {
    /// Pin both timestamps, e.g. to make output reproducible.
    pub fn at(created: u64, expires: u64) -> Self {
        Self {
            created: Some(created),
            expires: Some(expires),
            include_headers: None,
        }
    }
}

/// Produces `Authorization: Signature ...` values (Cavage draft-12 with the
/// `(key-id)` pseudo-header).
///
/// Wire profile: the signature is base64 with the url-safe alphabet and no
/// padding, and `created`/`expires` are quoted.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationHeaderBuilder<C = SystemClock> {
    clock: C,
}

impl AuthorizationHeaderBuilder {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> AuthorizationHeaderBuilder<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Sign `method` + `url` with `signer` and format the header value.
    ///
    /// The clock is read only when `created` is not supplied, and the signer is
    /// called exactly once. Signer errors come back as [`Error::Signing`].
    pub fn build<S>(
        &self,
        signer: &S,
        method: &str,
        url: &str,
        options: &SignatureOptions<'_>,
    ) -> Result<String>
    where
        S: Signer + ?Sized,
    {
        let include_headers = PseudoHeader::parse_list(options.include_headers.unwrap_or_default())?;

        let created = options.created.unwrap_or_else(|| self.clock.now());
        let expires = options
            .expires
            .unwrap_or_else(|| created.saturating_add(DEFAULT_EXPIRATION_SECONDS));
        let key_id = signer.id();

        let request = SigningRequest {
            method,
            path: url,
            created,
            expires,
            key_id,
            include_headers: &include_headers,
        };
        let signing_string = request.signing_string();
        trace!(
            key_id,
            created,
            expires,
            len = signing_string.len(),
            "signing authorization string"
        );

        let signature = signer
            .sign(signing_string.as_bytes())
            .map_err(Error::Signing)?;

        Ok(format!(
            "Signature keyId=\"{key_id}\",headers=\"{headers}\",signature=\"{signature}\",created=\"{created}\",expires=\"{expires}\"",
            headers = PseudoHeader::join(request.headers()),
            signature = SIGNATURE_ENCODING.encode(signature),
        ))
    }
}

/// Authorization header for `method` + `url`, valid for 30 seconds from now.
pub fn create_authorization_header<S>(signer: &S, method: &str, url: &str) -> Result<String>
where
    S: Signer + ?Sized,
{
    AuthorizationHeaderBuilder::new().build(signer, method, url, &SignatureOptions::default())
}
