use utoipa::OpenApi;

use crate::handlers::tokens::ErrorResponse;
use crate::models::{RefreshTokensRequest, TokenPairResponse};

/// OpenAPI document covering the token REST endpoints
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::tokens::issue_tokens,
        crate::handlers::tokens::refresh_tokens
    ),
    components(schemas(RefreshTokensRequest, TokenPairResponse, ErrorResponse)),
    tags(
        (name = "Tokens", description = "Token issuance & rotation APIs")
    )
)]
pub struct ApiDoc;
