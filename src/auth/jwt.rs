//! Access-token signing and verification
//!
//! Access tokens are HS512 JWTs over a flat [`AccessClaims`] payload. The
//! signing secret is loaded once and shared read-only between requests.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const ALGORITHM: Algorithm = Algorithm::HS512;

/// JWT-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JwtError {
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Token signature is invalid")]
    SignatureInvalid,

    #[error("Token expired")]
    Expired,
}

/// Claims embedded in every access token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AccessClaims {
    pub user_id: String,
    pub client_ip: String,
    /// Token id, the join key to the refresh record
    pub jti: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl AccessClaims {
    pub fn new(user_id: &str, client_ip: &str, jti: &str, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.to_string(),
            client_ip: client_ip.to_string(),
            jti: jti.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}

/// Signs and verifies access tokens with one process-wide HMAC secret
#[derive(Clone)]
pub struct JwtSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSigner {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Sign claims into a compact JWT
    pub fn sign(&self, claims: &AccessClaims) -> Result<String, JwtError> {
        encode(&Header::new(ALGORITHM), claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify signature and expiry, returning the embedded claims.
    ///
    /// Pure cryptographic check; nothing here touches storage.
    pub fn verify(&self, token: &str) -> Result<AccessClaims, JwtError> {
        decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    JwtError::SignatureInvalid
                }
                _ => JwtError::Malformed(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(ttl: Duration) -> AccessClaims {
        AccessClaims::new("user-1", "10.0.0.1", "jti-1", ttl)
    }

    #[test]
    fn test_sign_and_verify() {
        let signer = JwtSigner::new(b"test-secret-key");
        let issued = claims(Duration::minutes(15));

        let token = signer.sign(&issued).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let verified = signer.verify(&token).unwrap();
        assert_eq!(verified, issued);
        assert_eq!(verified.exp - verified.iat, 900);
    }

    #[test]
    fn test_expired_token() {
        let signer = JwtSigner::new(b"test-secret-key");
        let token = signer.sign(&claims(Duration::minutes(-5))).unwrap();
        assert_eq!(signer.verify(&token), Err(JwtError::Expired));
    }

    #[test]
    fn test_wrong_secret() {
        let token = JwtSigner::new(b"secret1")
            .sign(&claims(Duration::minutes(15)))
            .unwrap();
        let result = JwtSigner::new(b"secret2").verify(&token);
        assert_eq!(result, Err(JwtError::SignatureInvalid));
    }

    #[test]
    fn test_malformed_token() {
        let signer = JwtSigner::new(b"test-secret-key");
        assert!(matches!(
            signer.verify("invalid.token.here"),
            Err(JwtError::Malformed(_))
        ));
        assert!(matches!(signer.verify(""), Err(JwtError::Malformed(_))));
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let other = encode(
            &Header::new(Algorithm::HS256),
            &claims(Duration::minutes(15)),
            &EncodingKey::from_secret(b"test-secret-key"),
        )
        .unwrap();
        let signer = JwtSigner::new(b"test-secret-key");
        assert_eq!(signer.verify(&other), Err(JwtError::SignatureInvalid));
    }

    #[test]
    fn test_missing_claims_is_malformed() {
        #[derive(Serialize)]
        struct Partial {
            user_id: String,
            exp: i64,
        }

        let token = encode(
            &Header::new(ALGORITHM),
            &Partial {
                user_id: "user-1".to_string(),
                exp: (Utc::now() + Duration::minutes(5)).timestamp(),
            },
            &EncodingKey::from_secret(b"test-secret-key"),
        )
        .unwrap();
        let signer = JwtSigner::new(b"test-secret-key");
        assert!(matches!(signer.verify(&token), Err(JwtError::Malformed(_))));
    }
}
