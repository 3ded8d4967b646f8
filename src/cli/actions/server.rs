use crate::{folio, keys::Keys};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub frontend_url: String,
    pub jwt_secret: SecretString,
    pub aes_key: SecretString,
}

/// Execute the server action.
///
/// Keys are validated before the listener binds; a bad key aborts startup.
///
/// # Errors
/// Returns an error if a key is invalid, the frontend URL cannot be parsed, or
/// the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let keys = Keys::load(&args.jwt_secret, &args.aes_key).context("Invalid key configuration")?;

    let origin = folio::frontend_origin(&args.frontend_url)?;

    debug!("Allowed origin: {:?}", origin);

    folio::new(args.port, Arc::new(keys), origin).await
}
