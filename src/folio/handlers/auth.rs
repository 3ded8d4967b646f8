use crate::{
    folio::auth::require_auth,
    keys::Keys,
    token::{AuthError, Claims},
};
use axum::{extract::Extension, http::HeaderMap, response::Json};
use std::sync::Arc;
use tracing::instrument;

#[utoipa::path(
    get,
    path= "/api/auth",
    responses (
        (status = 200, description = "Token is valid", body = Claims, content_type = "application/json"),
        (status = 400, description = "Malformed Authorization header or token"),
        (status = 401, description = "No token, invalid signature or expired token"),
    ),
    security(("bearer" = []), ("cookie" = [])),
    tag= "auth"
)]
// axum handler for auth
#[instrument(skip_all)]
pub async fn auth(
    headers: HeaderMap,
    keys: Extension<Arc<Keys>>,
) -> Result<Json<Claims>, AuthError> {
    require_auth(&headers, &keys).map(Json)
}
