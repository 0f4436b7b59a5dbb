//! CLI command handlers.

pub mod auth;
pub mod clients;
pub mod config;
pub mod orders;
pub mod talleres;

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use taller_core::api::ApiClient;
use taller_core::auth::AuthContext;
use taller_core::forms::{FieldErrors, SubmitOutcome};
use taller_core::interrupt::{self, InterruptedError};
use taller_core::session::FileSessionStore;
use taller_core::types::ApiResponse;
use tokio_util::sync::CancellationToken;

/// State shared by the session-backed commands.
pub struct App {
    pub auth: AuthContext,
    pub json: bool,
    pub cancel: CancellationToken,
}

impl App {
    /// Loads config, opens the session store and restores the session.
    pub fn connect(json: bool) -> Result<Self> {
        let config = taller_core::config::Config::load().context("load config")?;
        let store = Arc::new(FileSessionStore::at_default_path());
        let client = ApiClient::from_config(&config, store).context("create API client")?;
        tracing::debug!(base_url = client.base_url(), "client ready");

        let mut auth = AuthContext::new(client);
        auth.restore();

        Ok(Self {
            auth,
            json,
            cancel: interrupt::child_token(),
        })
    }

    /// Prints a flow result: JSON envelope or `render` on success.
    ///
    /// Failures become errors so the process exits non-zero.
    pub fn report<T: Serialize>(
        &self,
        result: Result<T, String>,
        render: impl FnOnce(&T),
    ) -> Result<()> {
        if self.json {
            let failure = result.as_ref().err().cloned();
            print_json(&ApiResponse::from(result))?;
            return match failure {
                Some(message) => Err(anyhow!(message)),
                None => Ok(()),
            };
        }

        match result {
            Ok(value) => {
                render(&value);
                Ok(())
            }
            Err(message) => Err(anyhow!(message)),
        }
    }
}

/// Maps a form submission to the flow result, turning validation errors and
/// interruption into command errors.
pub fn settle<T>(outcome: SubmitOutcome<T>, errors: &FieldErrors) -> Result<Result<T, String>> {
    match outcome {
        SubmitOutcome::Succeeded(value) => Ok(Ok(value)),
        SubmitOutcome::Failed(message) => Ok(Err(message)),
        SubmitOutcome::Invalid => Err(errors.clone().into()),
        SubmitOutcome::Cancelled => Err(InterruptedError.into()),
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{text}");
    Ok(())
}

/// Fails unless a session is active.
pub fn require_login(app: &App) -> Result<()> {
    app.auth.require_user()?;
    Ok(())
}
