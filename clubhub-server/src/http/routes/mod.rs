//! Route handlers organized by resource
//!
//! Each collection is one URL; the `action` query parameter and the method
//! choose the operation (see [`crate::http::action`]).

pub mod blogs;
pub mod dashboard;
pub mod events;
pub mod health;
pub mod members;

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::Method;
use axum::response::Response;
use axum::routing::any;
use axum::Router;

use super::action::{Action, Endpoint};
use super::error::ApiError;
use super::extractors::{json_body, ActionParams, ActionQuery};
use super::server::AppState;

/// Run the resolved action for one request.
pub async fn dispatch(
    endpoint: Endpoint,
    state: &AppState,
    method: &Method,
    params: &ActionParams,
    body: &Bytes,
) -> Result<Response, ApiError> {
    let action = Action::resolve(endpoint, method, params.action.as_deref(), params.has_id())?;
    tracing::debug!(endpoint = endpoint.as_str(), %action, %method, "dispatching");

    match action {
        Action::RegisterMember => members::register(state, json_body(body)?).await,
        Action::ListMembers => members::list(state, params).await,
        Action::GetMember => members::get(state, params).await,
        Action::CheckEmail => members::check_email(state, params).await,
        Action::UpdateMember => members::update(state, params, json_body(body)?).await,
        Action::DeleteMember => members::delete(state, params).await,

        Action::CreateEvent => events::create(state, json_body(body)?).await,
        Action::ListEvents => events::list(state, params).await,
        Action::GetEvent => events::get(state, params).await,
        Action::UpdateEvent => events::update(state, params, json_body(body)?).await,
        Action::DeleteEvent => events::delete(state, params).await,

        Action::CreateBlog => blogs::create(state, json_body(body)?).await,
        Action::ListBlogs => blogs::list(state, params).await,
        Action::GetBlog => blogs::get(state, params).await,
        Action::UpdateBlog => blogs::update(state, params, json_body(body)?).await,
        Action::DeleteBlog => blogs::delete(state, params).await,

        Action::DashboardStats => dashboard::stats(state).await,
        Action::DashboardDepartments => dashboard::departments(state).await,
        Action::DashboardRecent => dashboard::recent_activity(state).await,
        Action::DashboardOverview => dashboard::overview(state).await,
    }
}

/// ANY /api/members
async fn members_endpoint(
    State(state): State<Arc<AppState>>,
    method: Method,
    ActionQuery(params): ActionQuery,
    body: Bytes,
) -> Result<Response, ApiError> {
    dispatch(Endpoint::Members, &state, &method, &params, &body).await
}

/// ANY /api/events
async fn events_endpoint(
    State(state): State<Arc<AppState>>,
    method: Method,
    ActionQuery(params): ActionQuery,
    body: Bytes,
) -> Result<Response, ApiError> {
    dispatch(Endpoint::Events, &state, &method, &params, &body).await
}

/// ANY /api/blogs
async fn blogs_endpoint(
    State(state): State<Arc<AppState>>,
    method: Method,
    ActionQuery(params): ActionQuery,
    body: Bytes,
) -> Result<Response, ApiError> {
    dispatch(Endpoint::Blogs, &state, &method, &params, &body).await
}

/// ANY /api/dashboard
async fn dashboard_endpoint(
    State(state): State<Arc<AppState>>,
    method: Method,
    ActionQuery(params): ActionQuery,
    body: Bytes,
) -> Result<Response, ApiError> {
    dispatch(Endpoint::Dashboard, &state, &method, &params, &body).await
}

/// Collection routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/members", any(members_endpoint))
        .route("/api/events", any(events_endpoint))
        .route("/api/blogs", any(blogs_endpoint))
        .route("/api/dashboard", any(dashboard_endpoint))
}
