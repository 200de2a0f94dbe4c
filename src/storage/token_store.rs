use crate::domain::auth::TokenPair;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

/// Holds the session's tokens.
///
/// The access token only ever lives in memory. The refresh token is mirrored
/// to an optional session file so a sign-in survives across invocations;
/// without a session file it lives for the life of the process. Storage
/// trouble never fails a request. A file that cannot be read or written is
/// treated as an absent token and logged.
#[derive(Debug)]
pub struct TokenStore {
    access: RwLock<Option<String>>,
    refresh: RwLock<Option<String>>,
    session_file: Option<PathBuf>,
}

impl TokenStore {
    #[must_use]
    pub const fn new(session_file: Option<PathBuf>) -> Self {
        Self { access: RwLock::new(None), refresh: RwLock::new(None), session_file }
    }

    /// Store without persistence. Tokens vanish when the process exits.
    #[must_use]
    pub const fn in_memory() -> Self {
        Self::new(None)
    }

    #[must_use]
    pub fn access(&self) -> Option<String> {
        self.access.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn set_access(&self, token: Option<String>) {
        *self.access.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    /// Current refresh token, falling back to the session file when this
    /// process has not seen one yet.
    #[must_use]
    pub fn refresh(&self) -> Option<String> {
        if let Some(token) = self.refresh.read().unwrap_or_else(PoisonError::into_inner).clone() {
            return Some(token);
        }
        let loaded = self.session_file.as_deref().and_then(read_session_file);
        if let Some(token) = &loaded {
            *self.refresh.write().unwrap_or_else(PoisonError::into_inner) =
                Some(token.clone());
        }
        loaded
    }

    pub fn set_refresh(&self, token: Option<&str>) {
        *self.refresh.write().unwrap_or_else(PoisonError::into_inner) =
            token.map(str::to_owned);
        if let Some(path) = self.session_file.as_deref() {
            match token {
                Some(token) => write_session_file(path, token),
                None => remove_session_file(path),
            }
        }
    }

    pub fn set_pair(&self, pair: &TokenPair) {
        self.set_access(Some(pair.access.clone()));
        self.set_refresh(Some(&pair.refresh));
    }

    /// Drops both tokens and the session file. Safe to call repeatedly.
    pub fn clear(&self) {
        self.set_access(None);
        self.set_refresh(None);
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.access().is_some() || self.refresh().is_some()
    }
}

fn read_session_file(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            let token = contents.trim();
            if token.is_empty() { None } else { Some(token.to_owned()) }
        }
        Err(error) if error.kind() == ErrorKind::NotFound => None,
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "could not read session file");
            None
        }
    }
}

fn write_session_file(path: &Path, token: &str) {
    if let Some(parent) = path.parent() {
        if let Err(error) = fs::create_dir_all(parent) {
            tracing::warn!(path = %path.display(), %error, "could not create session directory");
            return;
        }
    }
    if let Err(error) = fs::write(path, token) {
        tracing::warn!(path = %path.display(), %error, "could not write session file");
        return;
    }
    restrict_permissions(path);
}

/// The file holds a live credential, keep it private to the user.
#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Err(error) = fs::set_permissions(path, fs::Permissions::from_mode(0o600)) {
        tracing::warn!(path = %path.display(), %error, "could not restrict session file mode");
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}

fn remove_session_file(path: &Path) {
    if let Err(error) = fs::remove_file(path) {
        if error.kind() != ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), %error, "could not remove session file");
        }
    }
}
