pub mod authenticator;
pub mod claims;
pub mod password;
pub mod token;

pub use authenticator::{AuthError, SessionAuthenticator, UnauthReason, VerifiedIdentity};
pub use claims::IdentityClaim;
pub use token::{decode_token, encode_token, TokenError};
