//! JSON body extractor with TexFlow error bodies
//!
//! `axum::Json` rejects malformed or oversized bodies with plain-text
//! responses. [`AppJson`] routes those rejections through [`AppError`] so
//! every failure carries a `{code, message}` body.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};

use crate::utils::AppError;

/// Drop-in replacement for `Json<T>` in handler arguments
#[derive(Debug, Clone, Copy, Default)]
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}
