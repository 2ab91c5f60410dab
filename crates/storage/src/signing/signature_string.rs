use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// The pseudo-headers a signing string may cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoHeader {
    Created,
    Expires,
    KeyId,
    RequestTarget,
}

impl PseudoHeader {
    /// Covered when the caller does not choose: all four, in this order.
    pub const DEFAULT: [PseudoHeader; 4] = [
        PseudoHeader::Created,
        PseudoHeader::Expires,
        PseudoHeader::KeyId,
        PseudoHeader::RequestTarget,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PseudoHeader::Created => "(created)",
            PseudoHeader::Expires => "(expires)",
            PseudoHeader::KeyId => "(key-id)",
            PseudoHeader::RequestTarget => "(request-target)",
        }
    }

    /// Parse every name up front, so a bad entry fails before anything is built.
    pub fn parse_list<I, S>(names: I) -> Result<Vec<PseudoHeader>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().map(|name| name.as_ref().parse()).collect()
    }

    /// Space-separated form used in the `headers=` parameter.
    pub fn join(headers: &[PseudoHeader]) -> String {
        headers
            .iter()
            .map(PseudoHeader::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl FromStr for PseudoHeader {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "(created)" => Ok(PseudoHeader::Created),
            "(expires)" => Ok(PseudoHeader::Expires),
            "(key-id)" => Ok(PseudoHeader::KeyId),
            "(request-target)" => Ok(PseudoHeader::RequestTarget),
            other => Err(Error::UnsupportedPseudoHeader(other.to_string())),
        }
    }
}

impl fmt::Display for PseudoHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs of one signing string. Built fresh for every outgoing request.
#[derive(Debug, Clone, Copy)]
pub struct SigningRequest<'a> {
    pub method: &'a str,
    /// Absolute path, query string included, used verbatim.
    pub path: &'a str,
    pub created: u64,
    pub expires: u64,
    pub key_id: &'a str,
    /// Empty means [`PseudoHeader::DEFAULT`].
    pub include_headers: &'a [PseudoHeader],
}

impl SigningRequest<'_> {
    pub fn headers(&self) -> &[PseudoHeader] {
        if self.include_headers.is_empty() {
            &PseudoHeader::DEFAULT
        } else {
            self.include_headers
        }
    }

    /// Renders one `name: value` line per covered pseudo-header, joined with `\n`.
    pub fn signing_string(&self) -> String {
        self.headers()
            .iter()
            .map(|header| match header {
                PseudoHeader::Created => format!("(created): {}", self.created),
                PseudoHeader::Expires => format!("(expires): {}", self.expires),
                PseudoHeader::KeyId => format!("(key-id): {}", self.key_id),
                PseudoHeader::RequestTarget => format!(
                    "(request-target): {} {}",
                    self.method.to_lowercase(),
                    self.path
                ),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Build the plaintext string to be signed from raw pseudo-header names.
///
/// `None` (or an empty list) covers [`PseudoHeader::DEFAULT`]. Any name outside
/// the four supported ones fails with [`Error::UnsupportedPseudoHeader`].
pub fn build_signature_string(
    method: &str,
    path: &str,
    created: u64,
    expires: u64,
    key_id: &str,
    include_headers: Option<&[&str]>,
) -> Result<String> {
    let headers = PseudoHeader::parse_list(include_headers.unwrap_or_default())?;
    let request = SigningRequest {
        method,
        path,
        created,
        expires,
        key_id,
        include_headers: &headers,
    };
    Ok(request.signing_string())
}
