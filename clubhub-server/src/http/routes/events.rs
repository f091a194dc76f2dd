//! Event actions on /api/events

use axum::response::Response;
use chrono::Utc;
use serde::Serialize;

use crate::db::documents::now;
use crate::db::EventDocument;
use crate::http::error::ApiError;
use crate::http::extractors::{non_blank, ActionParams};
use crate::http::response::{created, ok, ok_with_message, EventResponse, PageResponse};
use crate::http::server::AppState;
use crate::models::{
    CreateEventRequest, EventFilter, EventPatch, EventWindow, NewEvent, UpdateEventRequest,
};

#[derive(Debug, Serialize)]
pub struct EventDeleted {
    pub id: String,
}

pub async fn create(state: &AppState, req: CreateEventRequest) -> Result<Response, ApiError> {
    let input = NewEvent::validate(&req, Utc::now())?;
    let event = state.store.insert_event(EventDocument::new(input, now())).await?;

    tracing::info!(event_id = %event.id, title = %event.title, "event created");
    Ok(created(EventResponse::from(event)))
}

pub async fn list(state: &AppState, params: &ActionParams) -> Result<Response, ApiError> {
    let filter = EventFilter {
        window: match params.when.as_deref() {
            Some(when) => EventWindow::parse(when)?,
            None => EventWindow::default(),
        },
        search: non_blank(&params.search),
    };
    let page = state
        .store
        .list_events(&filter, now(), params.pagination())
        .await?;
    Ok(ok(PageResponse::<EventResponse>::from(page)))
}

pub async fn get(state: &AppState, params: &ActionParams) -> Result<Response, ApiError> {
    let id = params.id()?;
    let event = state
        .store
        .find_event(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "event",
            id: id.to_hex(),
        })?;
    Ok(ok(EventResponse::from(event)))
}

pub async fn update(
    state: &AppState,
    params: &ActionParams,
    req: UpdateEventRequest,
) -> Result<Response, ApiError> {
    let id = params.id()?;
    let patch = EventPatch::validate(&req)?;
    let event = state.store.update_event(&id, &patch).await?;

    tracing::info!(event_id = %event.id, "event updated");
    Ok(ok(EventResponse::from(event)))
}

pub async fn delete(state: &AppState, params: &ActionParams) -> Result<Response, ApiError> {
    let id = params.id()?;
    if !state.store.delete_event(&id).await? {
        return Err(ApiError::NotFound {
            resource: "event",
            id: id.to_hex(),
        });
    }

    tracing::info!(event_id = %id, "event deleted");
    Ok(ok_with_message(EventDeleted { id: id.to_hex() }, "event deleted"))
}
