use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Cookie payload error: {0}")]
    Cookie(#[from] serde_json::Error),

    #[error("Blocking task failed: {0}")]
    Blocking(#[from] tokio::task::JoinError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                Html("<!DOCTYPE html><title>404 Not Found</title><h1>Not Found</h1>"),
            )
                .into_response(),
            other => {
                tracing::error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html("<!DOCTYPE html><title>500 Internal Server Error</title><h1>Internal Server Error</h1>"),
                )
                    .into_response()
            }
        }
    }
}
