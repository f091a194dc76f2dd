//! Custom Axum extractors

use axum::body::Bytes;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use bson::oid::ObjectId;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::error::ApiError;
use crate::models::{parse_object_id, Pagination, PaginationParams};

/// Every query parameter any action reads. Unused ones are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionParams {
    pub action: Option<String>,
    pub id: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub year: Option<String>,
    pub search: Option<String>,
    /// Event window: upcoming | past | all
    pub when: Option<String>,
    pub author_id: Option<String>,
    pub offset: Option<u64>,
    pub limit: Option<u32>,
}

impl ActionParams {
    /// The required `id` parameter as a document id.
    pub fn id(&self) -> Result<ObjectId, ApiError> {
        Ok(parse_object_id("id", self.id.as_deref().unwrap_or_default())?)
    }

    pub fn has_id(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.trim().is_empty())
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::from(&PaginationParams {
            offset: self.offset,
            limit: self.limit,
        })
    }
}

/// Trimmed, non-blank copy of an optional filter value.
pub fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Query string extractor that reports malformed input as a JSON 400.
pub struct ActionQuery(pub ActionParams);

impl<S> FromRequestParts<S> for ActionQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<ActionParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::BadRequest {
                message: format!("invalid query string: {}", e.body_text()),
            })?;
        Ok(Self(params))
    }
}

/// Decode a JSON request body; an empty body reads as `{}`.
pub fn json_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    let raw: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        body
    };
    serde_json::from_slice(raw).map_err(|e| ApiError::BadRequest {
        message: format!("invalid JSON body: {}", e),
    })
}
