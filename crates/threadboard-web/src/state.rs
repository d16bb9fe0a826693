use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rand::RngCore;

use threadboard_db::Database;

use crate::error::AppError;
use crate::password::PasswordScheme;

/// Shared application state for all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub passwords: PasswordScheme,
    cookie_key: Key,
}

impl AppState {
    /// Draws a fresh session-signing key, so sessions from a previous
    /// process no longer verify.
    pub fn new(db: Database, passwords: PasswordScheme) -> Self {
        let mut secret = [0u8; 64];
        rand::rng().fill_bytes(&mut secret);

        Self {
            db: Arc::new(db),
            passwords,
            cookie_key: Key::from(&secret[..]),
        }
    }

    /// Run a database call off the async runtime.
    pub async fn run_db<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        let result = tokio::task::spawn_blocking(move || f(&db)).await?;
        Ok(result?)
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
