//! Sign-in handling
//!
//! Signing in only selects which identity the session acts as; the user
//! record is created on first use.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use linkshare_core::models::validate_email;
use linkshare_core::{Config, Session, SqliteGateway};

use crate::output::Output;

/// Resolve the session for the configured user
pub fn session(gateway: &SqliteGateway, config: &Config) -> Result<Session> {
    match config.user_email.as_deref() {
        Some(email) => {
            let user = gateway
                .upsert_user(email)
                .with_context(|| format!("Failed to resolve user {}", email))?;
            Ok(Session::signed_in(user))
        }
        None => Ok(Session::anonymous()),
    }
}

/// Open the gateway and the session it serves
pub fn open(config: &Config) -> Result<(Arc<SqliteGateway>, Session)> {
    let gateway = SqliteGateway::open(config).context("Failed to open database")?;
    let session = session(&gateway, config)?;
    Ok((Arc::new(gateway), session))
}

/// Sign in as `email`
pub fn login(
    mut config: Config,
    email: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    validate_email(&email)?;

    let gateway = SqliteGateway::open(&config).context("Failed to open database")?;
    let user = gateway
        .upsert_user(&email)
        .context("Failed to register user")?;

    config.user_email = Some(user.email.clone());
    save(&config, config_path)?;

    output.success(&format!("Signed in as {}", user.email));
    Ok(())
}

/// Sign out, forgetting the configured user
pub fn logout(mut config: Config, config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    match config.user_email.take() {
        Some(email) => {
            save(&config, config_path)?;
            output.success(&format!("Signed out {}", email));
        }
        None => output.message("Not signed in."),
    }
    Ok(())
}

fn save(config: &Config, config_path: Option<&PathBuf>) -> Result<()> {
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")
}
