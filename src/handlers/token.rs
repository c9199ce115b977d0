//! Token issuance and rotation HTTP handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::auth::{TokenIssuer, TokenRotator};
use crate::error::{ApiError, ApiResult};
use crate::middleware::ClientIp;
use crate::models::{IssueTokenQuery, RefreshRequest, TokenPair};

/// POST /token?user_id=<id> - Issue a new token pair
pub async fn issue_tokens(
    State(issuer): State<Arc<TokenIssuer>>,
    ClientIp(client_ip): ClientIp,
    Query(query): Query<IssueTokenQuery>,
) -> ApiResult<Json<TokenPair>> {
    let user_id = query
        .user_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("user_id required".to_string()))?;

    let tokens = issuer.issue(&user_id, &client_ip).await?;

    Ok(Json(tokens))
}

/// POST /refresh - Rotate an access/refresh pair
pub async fn refresh_tokens(
    State(rotator): State<Arc<TokenRotator>>,
    ClientIp(client_ip): ClientIp,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<TokenPair>> {
    let tokens = rotator
        .rotate(&req.access_token, &req.refresh_token, &client_ip)
        .await?;

    Ok(Json(tokens))
}
