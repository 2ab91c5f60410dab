mod authorization;
mod clock;
mod did_key;
mod ed25519;
mod headers;
mod parse;
mod secp256k1;
mod signature_string;
mod signer;

pub use authorization::{
    AuthorizationHeaderBuilder, DEFAULT_EXPIRATION_SECONDS, SignatureOptions,
    create_authorization_header,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use ed25519::{Ed25519Signer, Ed25519Verifier};
pub use headers::{AUTHORIZATION, build_auth_headers};
pub use parse::ParsedAuthorization;
pub use secp256k1::Secp256k1Signer;
pub use signature_string::{PseudoHeader, SigningRequest, build_signature_string};
pub use signer::Signer;
