//! `urn:uuid:` identifiers used to name spaces.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::error::{Error, Result};

const PREFIX: &str = "urn:uuid:";
const HYPHENATED_LEN: usize = 36;

/// A validated `urn:uuid:<uuid>` string, kept as the caller wrote it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UrnUuid {
    urn: String,
    uuid: Uuid,
}

impl UrnUuid {
    /// A fresh random (v4) identifier.
    pub fn new_v4() -> Self {
        Self::from(Uuid::new_v4())
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn as_str(&self) -> &str {
        &self.urn
    }
}

impl From<Uuid> for UrnUuid {
    fn from(uuid: Uuid) -> Self {
        Self {
            urn: format!("{PREFIX}{}", uuid.hyphenated()),
            uuid,
        }
    }
}

impl FromStr for UrnUuid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let uuid = parse_urn_uuid(s)?;
        Ok(Self {
            urn: s.to_string(),
            uuid,
        })
    }
}

impl fmt::Display for UrnUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.urn)
    }
}

impl AsRef<str> for UrnUuid {
    fn as_ref(&self) -> &str {
        &self.urn
    }
}

pub fn is_urn_uuid(s: &str) -> bool {
    parse_urn_uuid(s).is_ok()
}

/// Extract the UUID from `urn:uuid:<8-4-4-4-12 hex>`. The prefix and the hex
/// digits are case-insensitive; nothing else is accepted.
pub fn parse_urn_uuid(s: &str) -> Result<Uuid> {
    let invalid = || Error::InvalidIdentifier(s.to_string());

    let (prefix, rest) = s.split_at_checked(PREFIX.len()).ok_or_else(invalid)?;
    if !prefix.eq_ignore_ascii_case(PREFIX) || rest.len() != HYPHENATED_LEN {
        return Err(invalid());
    }
    Uuid::try_parse(rest).map_err(|_| invalid())
}

/// `urn:uuid:` form of `uuid`, or of a random v4 UUID when `None`.
pub fn make_urn_uuid(uuid: Option<Uuid>) -> UrnUuid {
    uuid.map(UrnUuid::from).unwrap_or_else(UrnUuid::new_v4)
}
