pub mod authenticator;
pub mod error;
pub mod factory;
pub mod identity;
pub mod jwks;
pub mod key_cache;

pub use authenticator::{Authenticator, AuthenticatorSettings, bearer_token};
pub use error::{AuthError, MalformedReason, UpstreamError};
pub use factory::build_authenticator;
pub use identity::{AuthenticatedIdentity, token_fingerprint};
pub use jwks::{HttpJwksSource, JwksSource, SigningKeySet};
pub use key_cache::SigningKeyCache;
