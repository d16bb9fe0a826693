//! Signed-cookie session and flash storage.
//!
//! Payloads are JSON, base64url-encoded so the cookie value never contains
//! separators, then signed by the jar with the per-process key.

use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use threadboard_types::session::{Flashes, SessionUser};

use crate::error::AppError;
use crate::templates::Chrome;

pub const SESSION_COOKIE: &str = "session";
pub const FLASH_COOKIE: &str = "flash";

/// The signed-in user, if the session cookie is present and verifies.
pub fn current_user(jar: &SignedCookieJar) -> Option<SessionUser> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| decode(cookie.value()))
}

/// Replace any existing session with `user`.
pub fn sign_in(jar: SignedCookieJar, user: &SessionUser) -> Result<SignedCookieJar, AppError> {
    Ok(jar.add(cookie(SESSION_COOKIE, encode(user)?)))
}

pub fn sign_out(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

/// Queue a message for the next rendered page.
pub fn push_flash(
    jar: SignedCookieJar,
    message: impl Into<String>,
) -> Result<SignedCookieJar, AppError> {
    let mut flashes = pending_flashes(&jar);
    flashes.push(message);
    Ok(jar.add(cookie(FLASH_COOKIE, encode(&flashes)?)))
}

/// Remove and return every queued message.
///
/// The cookie is expired even when it fails verification (for example one
/// signed before a restart); the jar only emits the removal if the request
/// actually carried it.
pub fn take_flashes(jar: SignedCookieJar) -> (SignedCookieJar, Flashes) {
    let flashes = pending_flashes(&jar);
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), flashes)
}

/// Navigation state for a page about to be rendered. Consumes the flashes.
pub fn page_chrome(jar: SignedCookieJar) -> (SignedCookieJar, Chrome) {
    let user = current_user(&jar);
    let (jar, flashes) = take_flashes(jar);
    (jar, Chrome::new(user, flashes.into_inner()))
}

fn pending_flashes(jar: &SignedCookieJar) -> Flashes {
    jar.get(FLASH_COOKIE)
        .and_then(|cookie| decode(cookie.value()))
        .unwrap_or_default()
}

fn cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn encode<T: Serialize>(value: &T) -> Result<String, AppError> {
    Ok(B64.encode(serde_json::to_vec(value)?))
}

fn decode<T: DeserializeOwned>(raw: &str) -> Option<T> {
    let bytes = B64.decode(raw).ok()?;
    match serde_json::from_slice(&bytes) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Discarding unreadable cookie payload: {}", e);
            None
        }
    }
}
