//! Success envelope and response DTOs
//!
//! Every successful response is `{"success": true, "data": ...}` with an
//! optional `message`. Stored documents are converted to camelCase JSON
//! with hex ids and RFC 3339 timestamps.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::db::{BlogDocument, EventDocument, MemberDocument};
use crate::models::Paginated;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// 200 with `data`.
pub fn ok<T: Serialize>(data: T) -> Response {
    reply(StatusCode::OK, data, None)
}

/// 201 with the created resource.
pub fn created<T: Serialize>(data: T) -> Response {
    reply(StatusCode::CREATED, data, None)
}

/// 200 with `data` and a human-readable message.
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Response {
    reply(StatusCode::OK, data, Some(message.into()))
}

fn reply<T: Serialize>(status: StatusCode, data: T, message: Option<String>) -> Response {
    (
        status,
        Json(Envelope {
            success: true,
            data,
            message,
        }),
    )
        .into_response()
}

pub(crate) fn rfc3339(dt: bson::DateTime) -> String {
    dt.to_chrono().to_rfc3339()
}

/// A page of items plus window metadata
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u32,
    pub has_more: bool,
}

impl<D, T: From<D>> From<Paginated<D>> for PageResponse<T> {
    fn from(page: Paginated<D>) -> Self {
        let has_more = page.has_more();
        let page = page.map(T::from);
        Self {
            items: page.items,
            total: page.total,
            offset: page.offset,
            limit: page.limit,
            has_more,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub department: String,
    pub year: Option<String>,
    pub interests: Vec<String>,
    pub joined_at: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<MemberDocument> for MemberResponse {
    fn from(m: MemberDocument) -> Self {
        Self {
            id: m.id.to_hex(),
            name: m.name,
            email: m.email,
            department: m.department,
            year: m.year,
            interests: m.interests,
            joined_at: rfc3339(m.joined_at),
            created_at: rfc3339(m.created_at),
            updated_at: rfc3339(m.updated_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub event_date: String,
    pub location: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<EventDocument> for EventResponse {
    fn from(e: EventDocument) -> Self {
        Self {
            id: e.id.to_hex(),
            title: e.title,
            description: e.description,
            event_date: rfc3339(e.event_date),
            location: e.location,
            created_at: rfc3339(e.created_at),
            updated_at: rfc3339(e.updated_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub author_name: String,
    pub author_email: String,
    pub author_department: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<BlogDocument> for BlogResponse {
    fn from(b: BlogDocument) -> Self {
        Self {
            id: b.id.to_hex(),
            title: b.title,
            content: b.content,
            author_id: b.author_id.to_hex(),
            author_name: b.author_name,
            author_email: b.author_email,
            author_department: b.author_department,
            created_at: rfc3339(b.created_at),
            updated_at: rfc3339(b.updated_at),
        }
    }
}
