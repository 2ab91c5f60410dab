use std::sync::Arc;

use http::Method;
use uuid::Uuid;

use crate::client::{RequestOptions, dispatch};
use crate::error::Result;
use crate::resource::Resource;
use crate::signing::Signer;
use crate::transport::{HttpTransport, StorageResponse};
use crate::urn_uuid::UrnUuid;

/// A storage space, served at `/space/<uuid>`.
pub struct Space<T> {
    transport: Arc<T>,
    id: UrnUuid,
    path: String,
    signer: Option<Arc<dyn Signer>>,
}

impl<T: HttpTransport> Space<T> {
    pub(crate) fn new(transport: Arc<T>, id: UrnUuid, signer: Option<Arc<dyn Signer>>) -> Self {
        let path = format!("/space/{}", id.uuid().hyphenated());
        Self {
            transport,
            id,
            path,
            signer,
        }
    }

    pub fn id(&self) -> &UrnUuid {
        &self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn signer(&self) -> Option<&Arc<dyn Signer>> {
        self.signer.as_ref()
    }

    pub async fn get(&self, options: RequestOptions) -> Result<StorageResponse> {
        dispatch(
            self.transport.as_ref(),
            Method::GET,
            &self.path,
            self.signer.as_ref(),
            options,
            None,
        )
        .await
    }

    /// Create or replace the space, e.g. with its controller document.
    pub async fn put(
        &self,
        body: impl Into<Vec<u8>>,
        content_type: &str,
        options: RequestOptions,
    ) -> Result<StorageResponse> {
        dispatch(
            self.transport.as_ref(),
            Method::PUT,
            &self.path,
            self.signer.as_ref(),
            options,
            Some((body.into(), content_type)),
        )
        .await
    }

    pub async fn delete(&self, options: RequestOptions) -> Result<StorageResponse> {
        dispatch(
            self.transport.as_ref(),
            Method::DELETE,
            &self.path,
            self.signer.as_ref(),
            options,
            None,
        )
        .await
    }

    /// A resource inside this space.
    ///
    /// `None` picks a random UUID name; a missing leading `/` is added. The
    /// resource signs with `signer`, or else with this space's signer.
    pub fn resource(&self, path: Option<&str>, signer: Option<Arc<dyn Signer>>) -> Resource<T> {
        let path = match path {
            None => format!("/{}", Uuid::new_v4()),
            Some(path) if path.starts_with('/') => path.to_string(),
            Some(path) => format!("/{path}"),
        };
        Resource::new(
            self.transport.clone(),
            format!("{}{path}", self.path),
            signer.or_else(|| self.signer.clone()),
        )
    }
}
