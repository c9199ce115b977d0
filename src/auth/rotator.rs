//! Single-use refresh rotation
//!
//! Steps run in order and stop at the first failure:
//! verify access token, look up record, used flag, expiry, secret,
//! IP anomaly (non-blocking), conditional mark-used, reissue.

use std::sync::Arc;

use chrono::Utc;

use super::anomaly::{AnomalyNotifier, IpChangeEvent};
use super::error::{RejectReason, TokenError};
use super::hasher::CredentialHasher;
use super::issuer::TokenIssuer;
use super::jwt::JwtSigner;
use crate::models::TokenPair;
use crate::store::{self, MarkUsedOutcome, TokenStore};

/// Exchanges a valid, unused pair for a new one
#[derive(Clone)]
pub struct TokenRotator {
    signer: Arc<JwtSigner>,
    hasher: CredentialHasher,
    store: Arc<dyn TokenStore>,
    issuer: TokenIssuer,
    notifier: Arc<dyn AnomalyNotifier>,
}

impl TokenRotator {
    pub fn new(
        signer: Arc<JwtSigner>,
        hasher: CredentialHasher,
        store: Arc<dyn TokenStore>,
        issuer: TokenIssuer,
        notifier: Arc<dyn AnomalyNotifier>,
    ) -> Self {
        Self {
            signer,
            hasher,
            store,
            issuer,
            notifier,
        }
    }

    /// Rotate a presented pair. Any rejection is `TokenError::Unauthorized`.
    pub async fn rotate(
        &self,
        access_token: &str,
        refresh_token: &str,
        client_ip: &str,
    ) -> Result<TokenPair, TokenError> {
        let store_timeout = self.issuer.policy().store_timeout;

        let claims = self
            .signer
            .verify(access_token)
            .map_err(|e| reject(RejectReason::InvalidAccessToken(e), client_ip))?;

        let record = store::bounded(
            store_timeout,
            self.store.find_by_access_token_id(&claims.jti),
        )
        .await?
        .ok_or_else(|| reject(RejectReason::NotFound, client_ip))?;

        if record.used {
            tracing::warn!(
                user_id = %record.user_id,
                record_id = record.id,
                client_ip = %client_ip,
                "Replay of a consumed refresh token"
            );
            return Err(RejectReason::AlreadyUsed.into());
        }

        if record.is_expired_at(Utc::now()) {
            return Err(reject(RejectReason::RefreshExpired, client_ip));
        }

        let hasher = self.hasher;
        let stored_hash = record.refresh_token_hash.clone();
        let candidate = refresh_token.to_string();
        let matches =
            tokio::task::spawn_blocking(move || hasher.compare(&stored_hash, &candidate)).await?;
        if !matches {
            return Err(reject(RejectReason::SecretMismatch, client_ip));
        }

        if record.client_ip != client_ip {
            self.notifier.ip_changed(&IpChangeEvent {
                user_id: record.user_id.clone(),
                token_id: record.access_token_id.clone(),
                previous_ip: record.client_ip.clone(),
                current_ip: client_ip.to_string(),
            });
        }

        // The conditional update is the synchronization point for concurrent rotations
        match store::bounded(store_timeout, self.store.mark_used(record.id)).await? {
            MarkUsedOutcome::Marked => {}
            MarkUsedOutcome::AlreadyUsed => {
                tracing::warn!(
                    user_id = %record.user_id,
                    record_id = record.id,
                    "Concurrent rotation lost the race for a refresh token"
                );
                return Err(RejectReason::AlreadyUsed.into());
            }
        }

        self.issuer.issue(&record.user_id, client_ip).await
    }
}

fn reject(reason: RejectReason, client_ip: &str) -> TokenError {
    tracing::warn!(reason = %reason, client_ip = %client_ip, "Token refresh rejected");
    TokenError::Unauthorized(reason)
}
