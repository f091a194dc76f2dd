//! Dashboard aggregates on /api/dashboard

use axum::response::Response;
use serde::Serialize;

use crate::db::documents::now;
use crate::db::{DashboardCounts, DepartmentCount};
use crate::http::error::ApiError;
use crate::http::response::{ok, BlogResponse, EventResponse, MemberResponse};
use crate::http::server::AppState;
use crate::models::{BlogFilter, EventFilter, EventWindow, MemberFilter, Pagination};

/// Items per list in the "recent" block
const RECENT_LIMIT: u32 = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recent {
    pub members: Vec<MemberResponse>,
    pub upcoming_events: Vec<EventResponse>,
    pub blogs: Vec<BlogResponse>,
}

#[derive(Debug, Serialize)]
pub struct Overview {
    pub stats: DashboardCounts,
    pub departments: Vec<DepartmentCount>,
    pub recent: Recent,
}

async fn recent(state: &AppState) -> Result<Recent, ApiError> {
    let page = Pagination::new(0, RECENT_LIMIT);
    let all_members = MemberFilter::default();
    let upcoming = EventFilter {
        window: EventWindow::Upcoming,
        search: None,
    };
    let all_blogs = BlogFilter::default();

    let (members, events, blogs) = tokio::try_join!(
        state.store.list_members(&all_members, page),
        state.store.list_events(&upcoming, now(), page),
        state.store.list_blogs(&all_blogs, page),
    )?;

    Ok(Recent {
        members: members.items.into_iter().map(MemberResponse::from).collect(),
        upcoming_events: events.items.into_iter().map(EventResponse::from).collect(),
        blogs: blogs.items.into_iter().map(BlogResponse::from).collect(),
    })
}

/// GET action=stats
pub async fn stats(state: &AppState) -> Result<Response, ApiError> {
    Ok(ok(state.store.dashboard_counts(now()).await?))
}

/// GET action=departments
pub async fn departments(state: &AppState) -> Result<Response, ApiError> {
    Ok(ok(state.store.members_by_department().await?))
}

/// GET action=recent
pub async fn recent_activity(state: &AppState) -> Result<Response, ApiError> {
    Ok(ok(recent(state).await?))
}

/// GET action=overview (default)
pub async fn overview(state: &AppState) -> Result<Response, ApiError> {
    let (stats, departments) = tokio::try_join!(
        state.store.dashboard_counts(now()),
        state.store.members_by_department(),
    )?;
    let recent = recent(state).await?;

    Ok(ok(Overview {
        stats,
        departments,
        recent,
    }))
}
