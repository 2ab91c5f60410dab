use base64::Engine;

use super::authorization::SIGNATURE_ENCODING;
use super::signature_string::{PseudoHeader, SigningRequest};
use crate::error::{Error, Result};

const SCHEME: &str = "Signature ";

/// An `Authorization: Signature ...` value split back into its parameters.
///
/// This is the verifier's half: it rebuilds the exact string the client
/// signed so the signature can be checked against the key behind `key_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAuthorization {
    pub key_id: String,
    pub headers: Vec<PseudoHeader>,
    /// Still encoded, as it appeared on the wire.
    pub signature: String,
    pub created: u64,
    pub expires: u64,
}

impl ParsedAuthorization {
    /// Parse a header value. Unknown parameters are ignored. Timestamps may be
    /// quoted or bare numerals.
    pub fn parse(value: &str) -> Result<Self> {
        let params = value
            .strip_prefix(SCHEME)
            .ok_or_else(|| malformed("missing Signature scheme"))?;

        let mut key_id = None;
        let mut headers = None;
        let mut signature = None;
        let mut created = None;
        let mut expires = None;

        for (name, value) in split_params(params)? {
            match name {
                "keyId" => key_id = Some(value.to_string()),
                "headers" => headers = Some(PseudoHeader::parse_list(value.split(' '))?),
                "signature" => signature = Some(value.to_string()),
                "created" => created = Some(parse_timestamp(name, value)?),
                "expires" => expires = Some(parse_timestamp(name, value)?),
                _ => {}
            }
        }

        Ok(Self {
            key_id: key_id.ok_or_else(|| malformed("missing keyId"))?,
            headers: headers.ok_or_else(|| malformed("missing headers"))?,
            signature: signature.ok_or_else(|| malformed("missing signature"))?,
            created: created.ok_or_else(|| malformed("missing created"))?,
            expires: expires.ok_or_else(|| malformed("missing expires"))?,
        })
    }

    /// The string the client must have signed for `method` + `path`.
    pub fn signing_string(&self, method: &str, path: &str) -> String {
        SigningRequest {
            method,
            path,
            created: self.created,
            expires: self.expires,
            key_id: &self.key_id,
            include_headers: &self.headers,
        }
        .signing_string()
    }

    pub fn signature_bytes(&self) -> Result<Vec<u8>> {
        Ok(SIGNATURE_ENCODING.decode(&self.signature)?)
    }

    pub fn is_expired_at(&self, now: u64) -> bool {
        now > self.expires
    }
}

impl std::str::FromStr for ParsedAuthorization {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn malformed(reason: &str) -> Error {
    Error::MalformedAuthorization(reason.to_string())
}

fn parse_timestamp(name: &str, value: &str) -> Result<u64> {
    value
        .parse()
        .map_err(|_| Error::MalformedAuthorization(format!("{name} is not an integer: {value:?}")))
}

/// Split `a="x",b=1` into name/value pairs with quotes removed.
fn split_params(params: &str) -> Result<Vec<(&str, &str)>> {
    let mut pairs = Vec::new();
    let mut rest = params.trim();

    while !rest.is_empty() {
        let (name, after) = rest
            .split_once('=')
            .ok_or_else(|| malformed("parameter without '='"))?;
        let name = name.trim();

        let (value, after) = match after.strip_prefix('"') {
            Some(quoted) => {
                let end = quoted
                    .find('"')
                    .ok_or_else(|| malformed("unterminated quoted value"))?;
                (&quoted[..end], &quoted[end + 1..])
            }
            None => match after.find(',') {
                Some(end) => (after[..end].trim(), &after[end..]),
                None => (after.trim(), ""),
            },
        };

        pairs.push((name, value));

        let after = after.trim_start();
        rest = match after.strip_prefix(',') {
            Some(next) => next.trim_start(),
            None if after.is_empty() => after,
            None => return Err(malformed("expected ',' between parameters")),
        };
    }

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Signature keyId=\"did:key:z6Mk#z6Mk\",\
        headers=\"(created) (expires) (key-id) (request-target)\",\
        signature=\"-__-\",created=\"1700000000\",expires=\"1700000030\"";

    #[test]
    fn parses_every_parameter() {
        let parsed = ParsedAuthorization::parse(HEADER).unwrap();
        assert_eq!(parsed.key_id, "did:key:z6Mk#z6Mk");
        assert_eq!(parsed.headers, PseudoHeader::DEFAULT.to_vec());
        assert_eq!(parsed.signature, "-__-");
        assert_eq!(parsed.created, 1700000000);
        assert_eq!(parsed.expires, 1700000030);
        assert_eq!(parsed.signature_bytes().unwrap(), vec![0xfb, 0xff, 0xfe]);
    }

    #[test]
    fn accepts_bare_timestamps() {
        let parsed: ParsedAuthorization =
            "Signature keyId=\"k\",headers=\"(created)\",signature=\"AA\",created=1,expires=31"
                .parse()
                .unwrap();
        assert_eq!((parsed.created, parsed.expires), (1, 31));
    }

    #[test]
    fn rebuilds_signing_string() {
        let parsed = ParsedAuthorization::parse(HEADER).unwrap();
        assert_eq!(
            parsed.signing_string("GET", "/space/abc"),
            "(created): 1700000000\n(expires): 1700000030\n(key-id): did:key:z6Mk#z6Mk\n\
             (request-target): get /space/abc"
        );
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(matches!(
            ParsedAuthorization::parse("Bearer abc"),
            Err(Error::MalformedAuthorization(_))
        ));
    }

    #[test]
    fn rejects_missing_parameters() {
        let err = ParsedAuthorization::parse("Signature keyId=\"k\",headers=\"(created)\"")
            .unwrap_err();
        assert_eq!(err.to_string(), "Malformed authorization header: missing signature");
    }

    #[test]
    fn rejects_non_numeric_timestamp() {
        let result = ParsedAuthorization::parse(
            "Signature keyId=\"k\",headers=\"(created)\",signature=\"AA\",created=\"soon\",expires=\"2\"",
        );
        assert!(matches!(result, Err(Error::MalformedAuthorization(_))));
    }

    #[test]
    fn rejects_unknown_pseudo_header() {
        let result = ParsedAuthorization::parse(
            "Signature keyId=\"k\",headers=\"(created) host\",signature=\"AA\",created=\"1\",expires=\"2\"",
        );
        assert!(matches!(result, Err(Error::UnsupportedPseudoHeader(name)) if name == "host"));
    }

    #[test]
    fn rejects_padded_signature() {
        let parsed = ParsedAuthorization::parse(
            "Signature keyId=\"k\",headers=\"(created)\",signature=\"+/8=\",created=\"1\",expires=\"2\"",
        )
        .unwrap();
        assert!(matches!(
            parsed.signature_bytes(),
            Err(Error::InvalidSignatureEncoding(_))
        ));
    }

    #[test]
    fn ignores_unknown_parameters() {
        let parsed = ParsedAuthorization::parse(
            "Signature keyId=\"k\",algorithm=\"hs2019\",headers=\"(created)\",signature=\"AA\",created=\"1\",expires=\"2\"",
        )
        .unwrap();
        assert_eq!(parsed.key_id, "k");
    }

    #[test]
    fn unterminated_quote_is_malformed() {
        let result = ParsedAuthorization::parse("Signature keyId=\"k");
        assert!(matches!(result, Err(Error::MalformedAuthorization(_))));
    }

    #[test]
    fn expiry_is_inclusive() {
        let parsed = ParsedAuthorization::parse(HEADER).unwrap();
        assert!(!parsed.is_expired_at(1700000030));
        assert!(parsed.is_expired_at(1700000031));
    }
}
