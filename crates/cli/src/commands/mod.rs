//! Command implementations.
//!
//! Each submodule maps one group of subcommands onto client calls and prints
//! the result as JSON on stdout. Diagnostics go through `tracing` on stderr.

pub mod account;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod orders;
pub mod stats;

use std::path::PathBuf;

use emarket_client::gate::{self, AuthView, GateDecision};
use emarket_client::{ApiClient, ApiError, ClientConfig, ConfigError, Session};
use emarket_core::{UserId, UserRole};
use serde::Serialize;
use thiserror::Error;

use crate::session_file::{self, SessionFileError};

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Session(#[from] SessionFileError),

    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The command needs a signed-in user or a particular role.
    #[error("{0}")]
    NotAllowed(String),

    /// A store reported a failure through its error message.
    #[error("{0}")]
    Failed(String),
}

/// Everything a command needs: the client and where its session lives.
pub struct Context {
    pub api: ApiClient,
    session_path: PathBuf,
}

impl Context {
    /// Build the client from the environment and restore the saved session.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is missing or the session file is
    /// unreadable.
    pub fn from_env() -> Result<Self, CommandError> {
        let config = ClientConfig::from_env()?;
        let session_path = session_file::path_from_env();
        let session = session_file::load(&session_path)?;
        let api = ApiClient::new(&config, session)?;
        Ok(Self { api, session_path })
    }

    pub fn session(&self) -> &Session {
        self.api.session()
    }

    /// Persist the session after a login or logout.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file can't be written.
    pub fn save_session(&self) -> Result<(), CommandError> {
        session_file::save(&self.session_path, self.session())?;
        Ok(())
    }

    /// Refuse to run unless the session's role is in `allowed` (any signed-in
    /// user when empty).
    ///
    /// # Errors
    ///
    /// `CommandError::NotAllowed` naming where the gate would send the user.
    pub fn require(&self, allowed: &[UserRole]) -> Result<(), CommandError> {
        match gate::evaluate(&AuthView::from_session(self.session()), allowed) {
            GateDecision::Render => Ok(()),
            GateDecision::Redirect(gate::LOGIN_PATH) | GateDecision::Loading => Err(
                CommandError::NotAllowed("not signed in; run `emarket auth login` first".to_string()),
            ),
            GateDecision::Redirect(home) => Err(CommandError::NotAllowed(format!(
                "this command is not available to your role (home: {home})"
            ))),
        }
    }

    /// The signed-in user's id, from the session.
    ///
    /// # Errors
    ///
    /// `CommandError::NotAllowed` when the session doesn't know the user.
    pub fn user_id(&self) -> Result<UserId, CommandError> {
        self.session()
            .user()
            .map(|user| user.user_id)
            .ok_or_else(|| CommandError::NotAllowed("not signed in; run `emarket auth login` first".to_string()))
    }
}

/// Print a value as pretty JSON on stdout.
///
/// # Errors
///
/// Returns an error if the value can't be serialized.
#[allow(clippy::print_stdout)]
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CommandError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Staff-or-admin pages.
pub const BACK_OFFICE: &[UserRole] = &[UserRole::Admin, UserRole::Staff];

/// Admin-only pages.
pub const ADMIN_ONLY: &[UserRole] = &[UserRole::Admin];
