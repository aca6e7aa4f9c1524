/// Token issuance and rotation handlers
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::TokenError,
    models::{RefreshTokensRequest, TokenPairResponse},
    services::RotationService,
};

/// Issue request parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct IssueQuery {
    /// Well-formed GUID identifying the subject
    pub user_id: String,
}

/// Error body shared by all endpoints (matches `TokenError` responses)
#[derive(Debug, serde::Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub status: u16,
}

/// Issue endpoint handler: mints an access/refresh pair for a client with
/// no prior credential.
#[utoipa::path(
    post,
    path = "/api/v1/tokens/issue",
    tag = "Tokens",
    params(IssueQuery),
    responses(
        (status = 200, description = "Token pair issued", body = TokenPairResponse),
        (status = 400, description = "Malformed user id", body = ErrorResponse),
        (status = 500, description = "Internal failure", body = ErrorResponse)
    )
)]
pub async fn issue_tokens(
    rotation: web::Data<RotationService>,
    query: web::Query<IssueQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, TokenError> {
    let ip = client_ip(&req);
    let pair = rotation.issue(&query.user_id, &ip).await?;

    Ok(HttpResponse::Ok().json(pair))
}

/// Refresh endpoint handler: rotates a presented access/refresh pair.
#[utoipa::path(
    post,
    path = "/api/v1/tokens/refresh",
    tag = "Tokens",
    request_body = RefreshTokensRequest,
    responses(
        (status = 200, description = "Pair rotated", body = TokenPairResponse),
        (status = 401, description = "Invalid or consumed credentials", body = ErrorResponse),
        (status = 500, description = "Internal failure", body = ErrorResponse)
    )
)]
pub async fn refresh_tokens(
    rotation: web::Data<RotationService>,
    payload: web::Json<RefreshTokensRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, TokenError> {
    let ip = client_ip(&req);
    let pair = rotation
        .refresh(&payload.access_token, &payload.refresh_token, &ip)
        .await?;

    Ok(HttpResponse::Ok().json(pair))
}

/// Client network address, honouring proxy forwarding headers when present.
fn client_ip(req: &HttpRequest) -> String {
    if let Some(realip) = req.connection_info().realip_remote_addr() {
        // May carry a port when taken from the peer address
        return strip_port(realip).to_string();
    }

    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn strip_port(addr: &str) -> &str {
    // IPv6 peer addresses look like [::1]:8080
    if let Some(rest) = addr.strip_prefix('[') {
        if let Some(end) = rest.find(']') {
            return &rest[..end];
        }
    }
    match addr.rsplit_once(':') {
        // A lone colon would also appear inside bare IPv6 addresses;
        // only treat the suffix as a port when it is purely numeric
        Some((host, port)) if !host.contains(':') && port.chars().all(|c| c.is_ascii_digit()) => {
            host
        }
        _ => addr,
    }
}
