//! Token lifecycle core
//!
//! - Signed short-lived access tokens (HS512 JWT)
//! - Opaque refresh secrets, stored only as bcrypt hashes
//! - Single-use rotation with replay detection and IP-change notification

mod anomaly;
mod error;
mod hasher;
mod issuer;
mod jwt;
mod policy;
mod rotator;
pub mod secret;

pub use anomaly::{AnomalyNotifier, IpChangeEvent, LogAnomalyNotifier};
pub use error::{RejectReason, TokenError};
pub use hasher::{CredentialHasher, HashError};
pub use issuer::TokenIssuer;
pub use jwt::{AccessClaims, JwtError, JwtSigner};
pub use policy::TokenPolicy;
pub use rotator::TokenRotator;
