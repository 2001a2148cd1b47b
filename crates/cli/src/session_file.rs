//! Session persistence between CLI invocations.
//!
//! The token is kept as JSON in a file (`EMARKET_SESSION_FILE`, default
//! `.emarket-session.json`), so `emarket auth login` in one run authorizes
//! the commands that follow.

use std::path::{Path, PathBuf};

use emarket_client::{Session, SessionUser};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default session file, relative to the working directory.
pub const DEFAULT_SESSION_FILE: &str = ".emarket-session.json";

#[derive(Debug, Error)]
pub enum SessionFileError {
    #[error("Failed to access session file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Session file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Serialize, Deserialize)]
struct StoredSession {
    token: String,
    #[serde(default)]
    user: Option<SessionUser>,
}

/// Path from `EMARKET_SESSION_FILE`, or the default.
#[must_use]
pub fn path_from_env() -> PathBuf {
    std::env::var("EMARKET_SESSION_FILE")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from)
}

/// Restore a session. A missing file is an anonymous session.
///
/// # Errors
///
/// Returns an error if the file exists but can't be read or parsed.
pub fn load(path: &Path) -> Result<Session, SessionFileError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Session::new()),
        Err(source) => {
            return Err(SessionFileError::Io {
                path: path.to_owned(),
                source,
            });
        }
    };

    let stored: StoredSession =
        serde_json::from_str(&raw).map_err(|source| SessionFileError::Corrupt {
            path: path.to_owned(),
            source,
        })?;

    let session = Session::new();
    let token = SecretString::from(stored.token);
    match stored.user {
        Some(user) => session.sign_in(token, user),
        None => session.set_token(token),
    }
    Ok(session)
}

/// Write the session out, or delete the file when signed out.
///
/// # Errors
///
/// Returns an error if the file can't be written or removed.
pub fn save(path: &Path, session: &Session) -> Result<(), SessionFileError> {
    let io = |source| SessionFileError::Io {
        path: path.to_owned(),
        source,
    };

    let Some(token) = session.token() else {
        return match std::fs::remove_file(path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(io(e)),
            _ => Ok(()),
        };
    };

    let stored = StoredSession {
        token: token.expose_secret().to_owned(),
        user: session.user(),
    };
    let json = serde_json::to_string_pretty(&stored).map_err(|source| SessionFileError::Corrupt {
        path: path.to_owned(),
        source,
    })?;
    write_private(path, json.as_bytes()).map_err(io)
}

/// Write `contents`, readable by the owner only on unix.
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::io::Write;

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    // `mode` only applies on creation
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents)
}
