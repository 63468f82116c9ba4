//! Persisted console state and the signed-in session.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use crate::console::http::{ApiError, AuthApi};
use crate::dto::api::{LoginRequest, UserProfile};
use crate::forms::FormError;
use crate::forms::login::LoginForm;

/// Last known number of clients.
pub const CLIENT_COUNT_KEY: &str = "RABO_CLIENTS";
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const USER_KEY: &str = "user";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage error: {0}")]
    Io(#[from] std::io::Error),
    #[error("session data is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key/value storage that survives restarts.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&mut self, key: &str) -> Result<(), SessionError>;
}

#[derive(Clone, Debug, Default)]
pub struct MemorySessionStore {
    values: BTreeMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        self.values.remove(key);
        Ok(())
    }
}

/// Keeps all values in one JSON object on disk, rewritten on every change.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileSessionStore {
    /// Opens the store, starting empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, values })
    }

    fn flush(&self) -> Result<(), SessionError> {
        let contents = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Could not encode the user profile: {0}")]
    Profile(#[from] serde_json::Error),
}

/// Token and profile of the signed-in user, backed by a [`SessionStore`].
pub struct AuthSession<S: SessionStore> {
    store: S,
}

impl<S: SessionStore> AuthSession<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates the form, signs in and remembers the token and profile.
    pub async fn login<A: AuthApi + ?Sized>(
        &mut self,
        api: &A,
        form: LoginForm,
    ) -> Result<UserProfile, LoginError> {
        let request = LoginRequest::try_from(form)?;
        let response = api.login(&request).await.map_err(|err| {
            log::error!("Login failed: {err}");
            err
        })?;

        self.store.set(ACCESS_TOKEN_KEY, &response.access_token)?;
        self.store
            .set(USER_KEY, &serde_json::to_string(&response.user)?)?;
        log::info!("Signed in as {}", response.user.email);
        Ok(response.user)
    }

    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.store.remove(ACCESS_TOKEN_KEY)?;
        self.store.remove(USER_KEY)
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(ACCESS_TOKEN_KEY)
    }

    /// Stored profile; an unreadable value counts as signed out.
    pub fn current_user(&self) -> Option<UserProfile> {
        let raw = self.store.get(USER_KEY)?;
        serde_json::from_str(&raw)
            .map_err(|err| log::warn!("Ignoring stored user profile: {err}"))
            .ok()
    }

    pub fn is_logged_in(&self) -> bool {
        self.token().is_some_and(|token| !token.is_empty())
    }
}
