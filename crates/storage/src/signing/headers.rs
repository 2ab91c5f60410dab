use super::authorization::{AuthorizationHeaderBuilder, SignatureOptions};
use super::signer::Signer;
use crate::error::Result;
use crate::transport::Headers;

pub const AUTHORIZATION: &str = "authorization";

/// Caller headers plus, when a signer is given, a fresh `authorization` entry.
///
/// Names are lowercased; names that collide once lowercased (`Content-Type`
/// and `content-type`) are combined into one comma-separated value, in
/// byte order of the original names. Without a signer the request goes out
/// unsigned and nothing can fail; with one, only the signer itself can.
pub fn build_auth_headers(
    method: &str,
    path: &str,
    signer: Option<&dyn Signer>,
    headers: Option<Headers>,
) -> Result<Headers> {
    let mut merged = Headers::new();
    for (name, value) in headers.unwrap_or_default() {
        merged
            .entry(name.to_ascii_lowercase())
            .and_modify(|existing: &mut String| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.clone());
    }

    if let Some(signer) = signer {
        let authorization = AuthorizationHeaderBuilder::new().build(
            signer,
            method,
            path,
            &SignatureOptions::default(),
        )?;
        merged.insert(AUTHORIZATION.to_string(), authorization);
    }

    Ok(merged)
}
