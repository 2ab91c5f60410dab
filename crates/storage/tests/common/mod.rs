//! In-process WAS server for integration tests.
//!
//! Every request carrying an `authorization` header is verified the way a
//! real server would: parse it, rebuild the signing string, check the Ed25519
//! signature against the `did:key` in `keyId`. Bad or expired signatures get 401.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use http_body_util::BodyExt;
use tower::ServiceExt;
use wallet_attached_storage::signing::{Clock, Ed25519Verifier, ParsedAuthorization, SystemClock};
use wallet_attached_storage::{
    Error, Headers, HttpTransport, StorageClient, StorageRequest, StorageResponse,
};

pub const SPACE_ID: &str = "urn:uuid:f47ac10b-58cc-4372-a567-0e02b2c3d479";
pub const SPACE_PATH: &str = "/space/f47ac10b-58cc-4372-a567-0e02b2c3d479";

/// What the server saw for one request.
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: String,
    pub path: String,
    pub authorization: Option<ParsedAuthorization>,
    pub content_type: Option<String>,
}

#[derive(Clone, Default)]
pub struct MockServer {
    store: Arc<Mutex<HashMap<String, (Vec<u8>, String)>>>,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl MockServer {
    pub fn router(&self) -> Router {
        Router::new().fallback(handle).with_state(self.clone())
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last(&self) -> Seen {
        self.seen().pop().expect("no request reached the server")
    }
}

async fn handle(State(server): State<MockServer>, request: Request) -> Response {
    let method = request.method().as_str().to_string();
    let path = request.uri().path().to_string();
    let target = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| path.clone());
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let parsed = match authorization.as_deref().map(verify(&method, &target)) {
        Some(Ok(parsed)) => Some(parsed),
        Some(Err(reason)) => return (StatusCode::UNAUTHORIZED, reason).into_response(),
        None => None,
    };

    server.seen.lock().unwrap().push(Seen {
        method: method.clone(),
        path: path.clone(),
        authorization: parsed,
        content_type: content_type.clone(),
    });

    let body = request
        .into_body()
        .collect()
        .await
        .map(|collected| collected.to_bytes().to_vec())
        .unwrap_or_default();
    let is_space = path.starts_with("/space/") && path.matches('/').count() == 2;
    let mut store = server.store.lock().unwrap();

    match method.as_str() {
        "PUT" | "POST" => {
            let content_type =
                content_type.unwrap_or_else(|| "application/octet-stream".to_string());
            store.insert(path, (body, content_type));
            if method == "PUT" {
                StatusCode::NO_CONTENT.into_response()
            } else {
                StatusCode::CREATED.into_response()
            }
        }
        "GET" => match store.get(&path) {
            Some((body, content_type)) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, content_type.clone())],
                body.clone(),
            )
                .into_response(),
            None if is_space => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/activity+json".to_string())],
                r#"{"type":"Collection","totalItems":0,"items":[]}"#,
            )
                .into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        },
        "DELETE" => {
            if store.remove(&path).is_some() || is_space {
                StatusCode::NO_CONTENT.into_response()
            } else {
                StatusCode::NOT_FOUND.into_response()
            }
        }
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

fn verify<'a>(
    method: &'a str,
    target: &'a str,
) -> impl Fn(&str) -> Result<ParsedAuthorization, String> + 'a {
    move |value| {
        let parsed = ParsedAuthorization::parse(value).map_err(|e| e.to_string())?;
        if parsed.is_expired_at(SystemClock.now()) {
            return Err("signature expired".to_string());
        }
        let verifier = Ed25519Verifier::from_did_key(&parsed.key_id).map_err(|e| e.to_string())?;
        let signature = parsed.signature_bytes().map_err(|e| e.to_string())?;
        let signing_string = parsed.signing_string(method, target);
        if verifier.verify(signing_string.as_bytes(), &signature) {
            Ok(parsed)
        } else {
            Err("signature does not verify".to_string())
        }
    }
}

/// [`HttpTransport`] that hands requests straight to an axum router.
#[derive(Clone)]
pub struct RouterTransport {
    router: Router,
}

impl RouterTransport {
    pub fn new(router: Router) -> Self {
        Self { router }
    }
}

impl HttpTransport for RouterTransport {
    async fn send(&self, request: StorageRequest) -> Result<StorageResponse, Error> {
        let mut builder = axum::http::Request::builder()
            .method(request.method)
            .uri(request.path.as_str());
        for (name, value) in &request.headers {
            let value = HeaderValue::from_str(value)
                .map_err(|_| Error::InvalidHeader(format!("value of {name}")))?;
            builder = builder.header(name.as_str(), value);
        }
        let http_request = builder
            .body(Body::from(request.body.unwrap_or_default()))
            .map_err(|e| Error::InvalidHeader(e.to_string()))?;

        let response = self
            .router
            .clone()
            .oneshot(http_request)
            .await
            .expect("router is infallible");

        let status = response.status().as_u16();
        let headers: Headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                Some((name.as_str().to_string(), value.to_str().ok()?.to_string()))
            })
            .collect();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("collecting mock response body")
            .to_bytes()
            .to_vec();

        Ok(StorageResponse::new(status, headers, body))
    }
}

pub fn mock_client() -> (StorageClient<RouterTransport>, MockServer) {
    let server = MockServer::default();
    let client = StorageClient::with_transport(RouterTransport::new(server.router()));
    (client, server)
}
