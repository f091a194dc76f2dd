//! Member actions on /api/members

use axum::response::Response;
use serde::Serialize;

use crate::db::documents::now;
use crate::db::MemberDocument;
use crate::http::error::ApiError;
use crate::http::extractors::{non_blank, ActionParams};
use crate::http::response::{created, ok, ok_with_message, MemberResponse, PageResponse};
use crate::http::server::AppState;
use crate::models::{
    Email, MemberFilter, MemberPatch, NewMember, RegisterMemberRequest, UpdateMemberRequest,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailCheck {
    pub email: String,
    pub registered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDeleted {
    pub id: String,
    pub deleted_blogs: u64,
}

/// POST action=register
pub async fn register(state: &AppState, req: RegisterMemberRequest) -> Result<Response, ApiError> {
    let input = NewMember::validate(&req)?;
    let member = state.store.insert_member(MemberDocument::new(input, now())).await?;

    tracing::info!(member_id = %member.id, department = %member.department, "member registered");
    Ok(created(MemberResponse::from(member)))
}

/// GET action=list
pub async fn list(state: &AppState, params: &ActionParams) -> Result<Response, ApiError> {
    let filter = MemberFilter {
        department: non_blank(&params.department),
        year: non_blank(&params.year),
        search: non_blank(&params.search),
    };
    let page = state.store.list_members(&filter, params.pagination()).await?;
    Ok(ok(PageResponse::<MemberResponse>::from(page)))
}

/// GET action=get&id=
pub async fn get(state: &AppState, params: &ActionParams) -> Result<Response, ApiError> {
    let id = params.id()?;
    let member = state
        .store
        .find_member(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "member",
            id: id.to_hex(),
        })?;
    Ok(ok(MemberResponse::from(member)))
}

/// GET action=check-email&email=
pub async fn check_email(state: &AppState, params: &ActionParams) -> Result<Response, ApiError> {
    let email = Email::new(params.email.as_deref().unwrap_or_default())?;
    let existing = state.store.find_member_by_email(email.as_str()).await?;

    Ok(ok(EmailCheck {
        email: email.into_string(),
        registered: existing.is_some(),
        member_id: existing.map(|m| m.id.to_hex()),
    }))
}

/// PUT/PATCH action=update&id=
pub async fn update(
    state: &AppState,
    params: &ActionParams,
    req: UpdateMemberRequest,
) -> Result<Response, ApiError> {
    let id = params.id()?;
    let patch = MemberPatch::validate(&req)?;
    let member = state.store.update_member(&id, &patch).await?;

    tracing::info!(member_id = %member.id, "member updated");
    Ok(ok(MemberResponse::from(member)))
}

/// DELETE action=delete&id=
///
/// Removes the member's blogs first, then the member.
pub async fn delete(state: &AppState, params: &ActionParams) -> Result<Response, ApiError> {
    let id = params.id()?;
    if state.store.find_member(&id).await?.is_none() {
        return Err(ApiError::NotFound {
            resource: "member",
            id: id.to_hex(),
        });
    }

    let deleted_blogs = state.store.delete_blogs_by_author(&id).await?;
    if !state.store.delete_member(&id).await? {
        return Err(ApiError::NotFound {
            resource: "member",
            id: id.to_hex(),
        });
    }

    tracing::info!(member_id = %id, deleted_blogs, "member deleted");
    Ok(ok_with_message(
        MemberDeleted {
            id: id.to_hex(),
            deleted_blogs,
        },
        "member deleted",
    ))
}
