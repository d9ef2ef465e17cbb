use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use service::quotes::{Quote, QuoteStore};

use crate::errors::ApiError;

pub type SharedStore = Arc<dyn QuoteStore>;

/// Create/update request body. Both fields are optional at the serde level
/// so a missing field reaches our own validation instead of a framework
/// rejection.
#[derive(Debug, Default, Deserialize)]
pub struct QuoteInput {
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

impl QuoteInput {
    /// A body that fails to parse carries no usable fields, so it falls
    /// into the same validation branch as an empty object.
    fn from_payload(payload: Result<Json<QuoteInput>, JsonRejection>) -> Self {
        payload.map(|Json(input)| input).unwrap_or_default()
    }

    /// Missing and empty-after-trim are the same failure.
    fn into_fields(self) -> Result<(String, String), ApiError> {
        match (self.quote, self.author) {
            (Some(q), Some(a)) if !q.trim().is_empty() && !a.trim().is_empty() => Ok((q, a)),
            _ => Err(ApiError::Validation("Missing quote or author.")),
        }
    }
}

pub async fn list_quotes(State(store): State<SharedStore>) -> Result<Json<Vec<Quote>>, ApiError> {
    Ok(Json(store.list().await?))
}

pub async fn get_quote(
    State(store): State<SharedStore>,
    Path(id): Path<u32>,
) -> Result<Json<Quote>, ApiError> {
    match store.get(id).await? {
        Some(quote) => Ok(Json(quote)),
        None => Err(ApiError::NotFound("Quote not found.")),
    }
}

/// Body is the picked quote, or `null` when the collection is empty.
pub async fn random_quote(
    State(store): State<SharedStore>,
) -> Result<Json<Option<Quote>>, ApiError> {
    Ok(Json(store.get_random().await?))
}

pub async fn create_quote(
    State(store): State<SharedStore>,
    payload: Result<Json<QuoteInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Quote>), ApiError> {
    let (quote, author) = QuoteInput::from_payload(payload).into_fields()?;
    let created = store.create(quote, author).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_quote(
    State(store): State<SharedStore>,
    Path(id): Path<u32>,
    payload: Result<Json<QuoteInput>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    if store.get(id).await?.is_none() {
        return Err(ApiError::NotFound("Quote Not Found"));
    }
    let (quote, author) = QuoteInput::from_payload(payload).into_fields()?;
    // A delete racing between the check and this call turns the update into
    // a harmless absent result; the store serializes the mutations themselves.
    store.update(id, quote, author).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_quote(
    State(store): State<SharedStore>,
    Path(id): Path<u32>,
) -> Result<StatusCode, ApiError> {
    if store.get(id).await?.is_none() {
        return Err(ApiError::NotFound("Quote Not Found"));
    }
    store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
