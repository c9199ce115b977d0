//! One-way hashing of refresh-token secrets
//!
//! bcrypt with a fixed cost. Verification goes through `bcrypt::verify`, whose
//! digest comparison is constant time.

use thiserror::Error;

#[derive(Error, Debug)]
#[error("Credential hashing failed: {0}")]
pub struct HashError(#[from] bcrypt::BcryptError);

/// Salted slow hash for refresh secrets
#[derive(Debug, Clone, Copy)]
pub struct CredentialHasher {
    cost: u32,
}

impl CredentialHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, secret: &str) -> Result<String, HashError> {
        Ok(bcrypt::hash(secret, self.cost)?)
    }

    /// Check a presented secret against a stored hash.
    ///
    /// An unparsable stored hash counts as a mismatch.
    pub fn compare(&self, hash: &str, candidate: &str) -> bool {
        match bcrypt::verify(candidate, hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(error = %e, "Stored refresh token hash could not be parsed");
                false
            }
        }
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> CredentialHasher {
        CredentialHasher::new(4 /* bcrypt minimum cost; bcrypt::MIN_COST is private */)
    }

    #[test]
    fn test_hash_and_compare() {
        let hasher = hasher();
        let hash = hasher.hash("s3cret").unwrap();
        assert_ne!(hash, "s3cret");
        assert!(hasher.compare(&hash, "s3cret"));
        assert!(!hasher.compare(&hash, "s3creT"));
        assert!(!hasher.compare(&hash, ""));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = hasher();
        let a = hasher.hash("same").unwrap();
        let b = hasher.hash("same").unwrap();
        assert_ne!(a, b);
        assert!(hasher.compare(&a, "same"));
        assert!(hasher.compare(&b, "same"));
    }

    #[test]
    fn test_cost_is_embedded_in_hash() {
        let hash = hasher().hash("s3cret").unwrap();
        assert!(hash.starts_with("$2b$04$"));
    }

    #[test]
    fn test_garbage_hash_never_matches() {
        assert!(!hasher().compare("not-a-bcrypt-hash", "anything"));
    }

    #[test]
    fn test_invalid_cost_fails() {
        assert!(CredentialHasher::new(2).hash("s3cret").is_err());
    }
}
