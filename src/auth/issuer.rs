//! Token pair issuance

use std::sync::Arc;

use chrono::Utc;

use super::error::TokenError;
use super::hasher::CredentialHasher;
use super::jwt::{AccessClaims, JwtSigner};
use super::policy::TokenPolicy;
use super::secret;
use crate::models::{NewRefreshRecord, TokenPair};
use crate::store::{self, TokenStore};

/// Creates a signed access token and its refresh record in one step
#[derive(Clone)]
pub struct TokenIssuer {
    signer: Arc<JwtSigner>,
    hasher: CredentialHasher,
    store: Arc<dyn TokenStore>,
    policy: TokenPolicy,
}

impl TokenIssuer {
    pub fn new(
        signer: Arc<JwtSigner>,
        hasher: CredentialHasher,
        store: Arc<dyn TokenStore>,
        policy: TokenPolicy,
    ) -> Self {
        Self {
            signer,
            hasher,
            store,
            policy,
        }
    }

    pub fn policy(&self) -> &TokenPolicy {
        &self.policy
    }

    /// Issue a fresh pair for `user_id` connecting from `client_ip`.
    ///
    /// Exactly one new refresh record is written per successful call.
    pub async fn issue(&self, user_id: &str, client_ip: &str) -> Result<TokenPair, TokenError> {
        let token_id = secret::token_id().map_err(|e| {
            tracing::error!(error = %e, "Failed to generate token id");
            e
        })?;

        let claims = AccessClaims::new(user_id, client_ip, &token_id, self.policy.access_token_ttl);
        let access_token = self.signer.sign(&claims).map_err(|e| {
            tracing::error!(error = %e, "Failed to sign access token");
            TokenError::Signing(e)
        })?;

        let refresh_token = secret::refresh_secret().map_err(|e| {
            tracing::error!(error = %e, "Failed to generate refresh token");
            e
        })?;

        let hasher = self.hasher;
        let plaintext = refresh_token.clone();
        let refresh_token_hash = tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await?
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to hash refresh token");
                e
            })?;

        let record = NewRefreshRecord {
            user_id: user_id.to_string(),
            access_token_id: token_id,
            refresh_token_hash,
            client_ip: client_ip.to_string(),
            expires_at: Utc::now() + self.policy.refresh_token_ttl,
        };
        let saved = store::bounded(self.policy.store_timeout, self.store.save(record)).await?;

        tracing::info!(user_id = %saved.user_id, record_id = saved.id, "Issued token pair");

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }
}
