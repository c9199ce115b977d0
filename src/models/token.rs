//! Token models: the persisted refresh record and the pair handed to clients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access/refresh pair returned on issuance and on every successful rotation.
///
/// The refresh half is only ever held here in plaintext; storage keeps its hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Row of the `refresh_tokens` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RefreshRecord {
    pub id: i64,
    pub user_id: String,
    /// `jti` of the access token this refresh token was issued with
    #[sqlx(rename = "access_jti")]
    pub access_token_id: String,
    pub refresh_token_hash: String,
    pub client_ip: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
}

impl RefreshRecord {
    /// Check if the record has passed its fixed expiry
    #[inline]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Insert payload for a freshly issued refresh token
#[derive(Debug, Clone)]
pub struct NewRefreshRecord {
    pub user_id: String,
    pub access_token_id: String,
    pub refresh_token_hash: String,
    pub client_ip: String,
    pub expires_at: DateTime<Utc>,
}

// ============================================================================
// Request DTOs
// ============================================================================

/// Query string of `POST /token`
#[derive(Debug, Deserialize)]
pub struct IssueTokenQuery {
    pub user_id: Option<String>,
}

/// Body of `POST /refresh`
///
/// Absent tokens decode as empty strings and are rejected by rotation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default, alias = "access_token")]
    pub access_token: String,
    #[serde(default, alias = "refresh_token")]
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_token_pair_serializes_camel_case() {
        let pair = TokenPair {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
        };
        let json = serde_json::to_value(&pair).unwrap();
        assert_eq!(json["accessToken"], "a");
        assert_eq!(json["refreshToken"], "r");
    }

    #[test]
    fn test_refresh_request_accepts_both_casings() {
        let camel: RefreshRequest =
            serde_json::from_str(r#"{"accessToken":"a","refreshToken":"r"}"#).unwrap();
        let snake: RefreshRequest =
            serde_json::from_str(r#"{"access_token":"a","refresh_token":"r"}"#).unwrap();
        assert_eq!(camel.access_token, snake.access_token);
        assert_eq!(camel.refresh_token, snake.refresh_token);
    }

    #[test]
    fn test_refresh_request_missing_fields_default_to_empty() {
        let partial: RefreshRequest = serde_json::from_str(r#"{"accessToken":"a"}"#).unwrap();
        assert_eq!(partial.access_token, "a");
        assert!(partial.refresh_token.is_empty());

        let empty: RefreshRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.access_token.is_empty());
    }

    #[test]
    fn test_record_expiry_is_strictly_after() {
        let now = Utc::now();
        let record = RefreshRecord {
            id: 1,
            user_id: "u1".to_string(),
            access_token_id: "jti".to_string(),
            refresh_token_hash: "hash".to_string(),
            client_ip: "1.1.1.1".to_string(),
            created_at: now - Duration::days(7),
            expires_at: now,
            used: false,
        };
        assert!(!record.is_expired_at(now));
        assert!(record.is_expired_at(now + Duration::seconds(1)));
    }
}
