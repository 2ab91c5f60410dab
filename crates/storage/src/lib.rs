//! Client for Wallet Attached Storage (WAS).
//!
//! Requests are authenticated with HTTP Signatures (Cavage draft-12 plus the
//! `(key-id)` pseudo-header) rather than bearer tokens. The signing core lives
//! in [`signing`]; [`StorageClient`], [`Space`] and [`Resource`] build paths and
//! attach the `authorization` header on top of any [`HttpTransport`].

pub mod client;
pub mod error;
pub mod resource;
pub mod signing;
pub mod space;
pub mod transport;
pub mod urn_uuid;

pub use client::{DEFAULT_CONTENT_TYPE, RequestOptions, StorageClient};
pub use error::{Error, Result};
pub use resource::Resource;
pub use signing::{
    AuthorizationHeaderBuilder, Ed25519Signer, ParsedAuthorization, Secp256k1Signer, Signer,
    create_authorization_header,
};
pub use space::Space;
pub use transport::{Headers, HttpTransport, ReqwestTransport, StorageRequest, StorageResponse};
pub use urn_uuid::{UrnUuid, is_urn_uuid, make_urn_uuid, parse_urn_uuid};
