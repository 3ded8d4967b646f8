//! Share-link pass tokens.
//!
//! The decrypted value is only trusted once it parses as a UUID: the cipher
//! has no integrity tag, so a forged pass decrypts to noise rather than failing.

use crate::{
    cipher::{self, CipherError},
    keys::Keys,
};
use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, instrument};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(IntoParams, Deserialize, Debug)]
#[into_params(parameter_in = Query)]
pub struct GenerateQuery {
    /// Identifier to share
    uuid: Option<String>,
}

#[derive(IntoParams, Deserialize, Debug)]
#[into_params(parameter_in = Query)]
pub struct ValidateQuery {
    /// Pass token from a share link
    pass: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Pass {
    pub pass: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ValidPass {
    pub uuid: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[utoipa::path(
    get,
    path= "/api/pass",
    params(GenerateQuery),
    responses (
        (status = 200, description = "Pass generated", body = Pass, content_type = "application/json"),
        (status = 400, description = "UUID missing or invalid"),
        (status = 500, description = "Failed to encrypt UUID"),
    ),
    tag= "pass"
)]
// axum handler for pass generation
#[instrument(skip_all)]
pub async fn generate_pass(
    Query(query): Query<GenerateQuery>,
    keys: Extension<Arc<Keys>>,
) -> Response {
    let Some(uuid) = non_empty(query.uuid) else {
        return (StatusCode::BAD_REQUEST, "UUID not provided".to_string()).into_response();
    };

    if Uuid::parse_str(&uuid).is_err() {
        return (StatusCode::BAD_REQUEST, "Invalid UUID".to_string()).into_response();
    }

    match cipher::encrypt(&uuid, &keys.cipher) {
        Ok(pass) => Json(Pass { pass }).into_response(),
        Err(err) => {
            error!("Failed to encrypt UUID: {}", err);

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to encrypt UUID".to_string(),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    get,
    path= "/api/pass/validate",
    params(ValidateQuery),
    responses (
        (status = 200, description = "Pass resolves to a UUID", body = ValidPass, content_type = "application/json"),
        (status = 400, description = "Pass missing or malformed"),
        (status = 404, description = "Pass does not resolve to a UUID"),
    ),
    tag= "pass"
)]
// axum handler for pass validation
#[instrument(skip_all)]
pub async fn validate_pass(
    Query(query): Query<ValidateQuery>,
    keys: Extension<Arc<Keys>>,
) -> Response {
    let Some(pass) = non_empty(query.pass) else {
        return (
            StatusCode::BAD_REQUEST,
            "Encrypted UUID not provided".to_string(),
        )
            .into_response();
    };

    let plaintext = match cipher::decrypt(&pass, &keys.cipher) {
        Ok(plaintext) => plaintext,
        Err(err @ CipherError::Malformed(_)) => {
            debug!("Rejected pass: {}", err);

            return (StatusCode::BAD_REQUEST, "Malformed pass".to_string()).into_response();
        }
        Err(err) => {
            error!("Failed to decrypt pass: {}", err);

            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to decrypt UUID".to_string(),
            )
                .into_response();
        }
    };

    match Uuid::parse_str(&plaintext) {
        Ok(_) => Json(ValidPass { uuid: plaintext }).into_response(),
        Err(_) => {
            debug!("Pass decrypted to a non-UUID value");

            (StatusCode::NOT_FOUND, "UUID does not exist".to_string()).into_response()
        }
    }
}
