//! Threadboard web layer
//!
//! Server-rendered handlers for sign-up, sign-in and the post/reply board.
//! Sessions and flash messages travel in signed cookies; every database call
//! runs on the blocking pool.

pub mod auth;
pub mod error;
pub mod password;
pub mod posts;
pub mod session;
pub mod state;
pub mod templates;


use axum::{
    Router,
    routing::{get, post},
};

pub use error::AppError;
pub use state::AppState;

/// Every route the board serves.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(posts::index))
        .route("/signup/", get(auth::signup_page).post(auth::signup))
        .route("/signin/", get(auth::signin_page).post(auth::signin))
        .route("/logout", get(auth::logout))
        .route("/create/", get(posts::create_page).post(posts::create))
        .route("/{id}/view/", get(posts::view))
        .route("/{id}/edit/", get(posts::edit_page).post(posts::edit))
        .route("/{id}/reply/", get(posts::reply_page).post(posts::reply))
        .route("/{id}/delete/", post(posts::delete))
        .with_state(state)
}

/// Returns the message for the first empty field, if any.
pub(crate) fn first_missing(fields: &[(&str, &'static str)]) -> Option<&'static str> {
    fields
        .iter()
        .find(|(value, _)| value.is_empty())
        .map(|(_, message)| *message)
}
