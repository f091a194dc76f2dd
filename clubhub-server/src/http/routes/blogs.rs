//! Blog actions on /api/blogs

use axum::response::Response;
use serde::Serialize;

use crate::db::documents::now;
use crate::db::BlogDocument;
use crate::http::error::ApiError;
use crate::http::extractors::{non_blank, ActionParams};
use crate::http::response::{created, ok, ok_with_message, BlogResponse, PageResponse};
use crate::http::server::AppState;
use crate::models::{
    parse_object_id, BlogFilter, BlogPatch, CreateBlogRequest, NewBlog, UpdateBlogRequest,
};

#[derive(Debug, Serialize)]
pub struct BlogDeleted {
    pub id: String,
}

/// Create a post, copying the author's name/email/department onto it.
pub async fn create(state: &AppState, req: CreateBlogRequest) -> Result<Response, ApiError> {
    let input = NewBlog::validate(&req)?;
    let author = state
        .store
        .find_member(&input.author_id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "member",
            id: input.author_id.to_hex(),
        })?;

    let blog = state
        .store
        .insert_blog(BlogDocument::new(input, &author, now()))
        .await?;

    tracing::info!(blog_id = %blog.id, author_id = %blog.author_id, "blog created");
    Ok(created(BlogResponse::from(blog)))
}

pub async fn list(state: &AppState, params: &ActionParams) -> Result<Response, ApiError> {
    let filter = BlogFilter {
        author_id: non_blank(&params.author_id)
            .map(|id| parse_object_id("authorId", &id))
            .transpose()?,
        search: non_blank(&params.search),
    };
    let page = state.store.list_blogs(&filter, params.pagination()).await?;
    Ok(ok(PageResponse::<BlogResponse>::from(page)))
}

pub async fn get(state: &AppState, params: &ActionParams) -> Result<Response, ApiError> {
    let id = params.id()?;
    let blog = state
        .store
        .find_blog(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "blog",
            id: id.to_hex(),
        })?;
    Ok(ok(BlogResponse::from(blog)))
}

pub async fn update(
    state: &AppState,
    params: &ActionParams,
    req: UpdateBlogRequest,
) -> Result<Response, ApiError> {
    let id = params.id()?;
    let patch = BlogPatch::validate(&req)?;
    let blog = state.store.update_blog(&id, &patch).await?;

    tracing::info!(blog_id = %blog.id, "blog updated");
    Ok(ok(BlogResponse::from(blog)))
}

pub async fn delete(state: &AppState, params: &ActionParams) -> Result<Response, ApiError> {
    let id = params.id()?;
    if !state.store.delete_blog(&id).await? {
        return Err(ApiError::NotFound {
            resource: "blog",
            id: id.to_hex(),
        });
    }

    tracing::info!(blog_id = %id, "blog deleted");
    Ok(ok_with_message(BlogDeleted { id: id.to_hex() }, "blog deleted"))
}
