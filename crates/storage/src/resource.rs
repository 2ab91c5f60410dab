use std::sync::Arc;

use http::Method;

use crate::client::{RequestOptions, dispatch};
use crate::error::Result;
use crate::signing::Signer;
use crate::transport::{HttpTransport, StorageResponse};

/// A resource within a space, supporting GET/PUT/POST/DELETE.
pub struct Resource<T> {
    transport: Arc<T>,
    path: String,
    signer: Option<Arc<dyn Signer>>,
}

impl<T: HttpTransport> Resource<T> {
    pub(crate) fn new(transport: Arc<T>, path: String, signer: Option<Arc<dyn Signer>>) -> Self {
        Self {
            transport,
            path,
            signer,
        }
    }

    /// Full path, `/space/<uuid>/<name>`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub async fn get(&self, options: RequestOptions) -> Result<StorageResponse> {
        self.send(Method::GET, options, None).await
    }

    pub async fn put(
        &self,
        body: impl Into<Vec<u8>>,
        content_type: &str,
        options: RequestOptions,
    ) -> Result<StorageResponse> {
        self.send(Method::PUT, options, Some((body.into(), content_type)))
            .await
    }

    pub async fn post(
        &self,
        body: impl Into<Vec<u8>>,
        content_type: &str,
        options: RequestOptions,
    ) -> Result<StorageResponse> {
        self.send(Method::POST, options, Some((body.into(), content_type)))
            .await
    }

    pub async fn delete(&self, options: RequestOptions) -> Result<StorageResponse> {
        self.send(Method::DELETE, options, None).await
    }

    async fn send(
        &self,
        method: Method,
        options: RequestOptions,
        body: Option<(Vec<u8>, &str)>,
    ) -> Result<StorageResponse> {
        dispatch(
            self.transport.as_ref(),
            method,
            &self.path,
            self.signer.as_ref(),
            options,
            body,
        )
        .await
    }
}
