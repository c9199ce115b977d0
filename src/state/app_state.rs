//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::{
    AnomalyNotifier, CredentialHasher, JwtSigner, TokenIssuer, TokenPolicy, TokenRotator,
};
use crate::store::TokenStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub issuer: Arc<TokenIssuer>,
    pub rotator: Arc<TokenRotator>,
}

impl AppState {
    pub fn new(issuer: Arc<TokenIssuer>, rotator: Arc<TokenRotator>) -> Self {
        Self { issuer, rotator }
    }

    /// Wire issuer and rotator over one signer, hasher and store
    pub fn build(
        signer: Arc<JwtSigner>,
        hasher: CredentialHasher,
        store: Arc<dyn TokenStore>,
        notifier: Arc<dyn AnomalyNotifier>,
        policy: TokenPolicy,
    ) -> Self {
        let issuer = TokenIssuer::new(signer.clone(), hasher, store.clone(), policy);
        let rotator = TokenRotator::new(signer, hasher, store, issuer.clone(), notifier);

        Self::new(Arc::new(issuer), Arc::new(rotator))
    }
}

impl FromRef<AppState> for Arc<TokenIssuer> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.issuer.clone()
    }
}

impl FromRef<AppState> for Arc<TokenRotator> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.rotator.clone()
    }
}
