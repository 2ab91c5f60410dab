use std::collections::BTreeMap;
use std::future::Future;

use http::Method;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Error, Result};

/// Header name to value, names lowercase.
pub type Headers = BTreeMap<String, String>;

/// One outgoing request, already carrying its `authorization` header if signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageRequest {
    pub method: Method,
    /// Absolute path (and query) relative to the server's base URL.
    pub path: String,
    pub headers: Headers,
    pub body: Option<Vec<u8>>,
}

impl StorageRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: Option<Vec<u8>>) -> Self {
        self.body = body;
        self
    }
}

/// A fully received response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageResponse {
    status: u16,
    headers: Headers,
    body: Vec<u8>,
}

impl StorageResponse {
    pub fn new(status: u16, headers: Headers, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// True for 2xx.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn content(&self) -> &[u8] {
        &self.body
    }

    pub fn into_content(self) -> Vec<u8> {
        self.body
    }

    /// Body decoded as UTF-8, invalid sequences replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Whatever moves a [`StorageRequest`] to a WAS server and back.
pub trait HttpTransport: Send + Sync {
    fn send(&self, request: StorageRequest)
    -> impl Future<Output = Result<StorageResponse>> + Send;

    fn get(
        &self,
        path: &str,
        headers: Headers,
    ) -> impl Future<Output = Result<StorageResponse>> + Send {
        self.send(StorageRequest::new(Method::GET, path).with_headers(headers))
    }

    fn put(
        &self,
        path: &str,
        body: Option<Vec<u8>>,
        headers: Headers,
    ) -> impl Future<Output = Result<StorageResponse>> + Send {
        self.send(
            StorageRequest::new(Method::PUT, path)
                .with_headers(headers)
                .with_body(body),
        )
    }

    fn post(
        &self,
        path: &str,
        body: Option<Vec<u8>>,
        headers: Headers,
    ) -> impl Future<Output = Result<StorageResponse>> + Send {
        self.send(
            StorageRequest::new(Method::POST, path)
                .with_headers(headers)
                .with_body(body),
        )
    }

    fn delete(
        &self,
        path: &str,
        headers: Headers,
    ) -> impl Future<Output = Result<StorageResponse>> + Send {
        self.send(StorageRequest::new(Method::DELETE, path).with_headers(headers))
    }
}

/// [`HttpTransport`] over a `reqwest` client rooted at a base URL.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: StorageRequest) -> Result<StorageResponse> {
        let url = self.url(&request.path);
        let headers = to_header_map(&request.headers)?;
        debug!(method = %request.method, %url, "sending request");

        let mut builder = self.client.request(request.method, &url).headers(headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        let response = builder.send().await?;

        let status = response.status().as_u16();
        let headers = from_header_map(response.headers());
        let body = response.bytes().await?.to_vec();
        debug!(status, %url, len = body.len(), "received response");

        Ok(StorageResponse::new(status, headers, body))
    }
}

fn to_header_map(headers: &Headers) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| Error::InvalidHeader(format!("name {name:?}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| Error::InvalidHeader(format!("value of {name}")))?;
        map.insert(name, value);
    }
    Ok(map)
}

/// Repeated headers are joined with `, `; values that are not visible ASCII are dropped.
fn from_header_map(map: &HeaderMap) -> Headers {
    let mut headers = Headers::new();
    for (name, value) in map {
        let Ok(value) = value.to_str() else {
            continue;
        };
        headers
            .entry(name.as_str().to_string())
            .and_modify(|existing: &mut String| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    headers
}
