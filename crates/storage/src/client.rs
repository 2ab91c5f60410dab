use std::sync::Arc;

use http::Method;
use http::uri::PathAndQuery;
use reqwest::Url;
use tracing::debug;

use crate::error::{Error, Result};
use crate::signing::{Signer, build_auth_headers};
use crate::space::Space;
use crate::transport::{Headers, HttpTransport, ReqwestTransport, StorageRequest, StorageResponse};
use crate::urn_uuid::UrnUuid;

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Per-call settings for space and resource requests.
///
/// A signer here wins over the one the handle was created with.
#[derive(Clone, Default)]
pub struct RequestOptions {
    pub signer: Option<Arc<dyn Signer>>,
    pub headers: Headers,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Entry point for a Wallet Attached Storage server.
pub struct StorageClient<T = ReqwestTransport> {
    transport: Arc<T>,
}

impl StorageClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_transport(ReqwestTransport::new(base_url))
    }
}

impl<T: HttpTransport> StorageClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// A handle on the space `id`, or on a freshly named one when `id` is `None`.
    ///
    /// Nothing is sent; `put` on the returned space provisions it.
    pub fn space(&self, id: Option<&str>, signer: Option<Arc<dyn Signer>>) -> Result<Space<T>> {
        let id = match id {
            Some(id) => id.parse()?,
            None => UrnUuid::new_v4(),
        };
        Ok(Space::new(self.transport.clone(), id, signer))
    }
}

impl<T> Clone for StorageClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
        }
    }
}

/// Sign (when a signer applies) and send one request.
pub(crate) async fn dispatch<T: HttpTransport>(
    transport: &T,
    method: Method,
    path: &str,
    default_signer: Option<&Arc<dyn Signer>>,
    options: RequestOptions,
    body: Option<(Vec<u8>, &str)>,
) -> Result<StorageResponse> {
    let RequestOptions { signer, headers } = options;
    let signer = signer.as_ref().or(default_signer);
    let target = request_target(path)?;

    let mut headers = build_auth_headers(
        method.as_str(),
        &target,
        signer.map(|signer| signer.as_ref() as &dyn Signer),
        Some(headers),
    )?;

    let body = body.map(|(body, content_type)| {
        headers
            .entry("content-type".to_string())
            .or_insert_with(|| content_type.to_string());
        body
    });

    debug!(%method, %target, signed = signer.is_some(), "storage request");

    transport
        .send(
            StorageRequest::new(method, target)
                .with_headers(headers)
                .with_body(body),
        )
        .await
}

/// The path and query as the HTTP client puts them on the wire: dot segments
/// resolved, characters such as `{` percent-encoded. This is what gets signed.
fn request_target(path: &str) -> Result<String> {
    let invalid = || Error::InvalidRequestTarget(path.to_string());
    if !path.starts_with('/') {
        return Err(invalid());
    }
    let target: PathAndQuery = path.parse().map_err(|_| invalid())?;

    let mut url = Url::parse("http://localhost").map_err(|_| invalid())?;
    url.set_path(target.path());
    url.set_query(target.query());

    let mut normalized = url.path().to_string();
    if let Some(query) = url.query() {
        normalized.push('?');
        normalized.push_str(query);
    }
    Ok(normalized)
}
