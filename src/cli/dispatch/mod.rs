use crate::cli::{
    actions::{server::Args, Action},
    commands::{ARG_AES_KEY, ARG_FRONTEND_URL, ARG_JWT_SECRET, ARG_PORT},
};
use anyhow::{Context, Result};
use secrecy::SecretString;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if a required argument is missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let jwt_secret = matches
        .get_one::<String>(ARG_JWT_SECRET)
        .cloned()
        .context("missing required argument: --jwt-secret")?;

    let aes_key = matches
        .get_one::<String>(ARG_AES_KEY)
        .cloned()
        .context("missing required argument: --aes-key")?;

    Ok(Action::Server(Args {
        port: matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080),
        frontend_url: matches
            .get_one::<String>(ARG_FRONTEND_URL)
            .cloned()
            .unwrap_or_else(|| "http://localhost:3000".to_string()),
        jwt_secret: SecretString::from(jwt_secret),
        aes_key: SecretString::from(aes_key),
    }))
}
