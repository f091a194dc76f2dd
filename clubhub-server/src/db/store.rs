//! Storage seam between handlers and the document database

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::DateTime;
use serde::Serialize;

use super::documents::{BlogDocument, EventDocument, MemberDocument};
use crate::models::{
    BlogFilter, BlogPatch, EventFilter, EventPatch, MemberFilter, MemberPatch, Paginated,
    Pagination,
};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("document decoding error: {0}")]
    Decode(#[from] bson::de::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("conflict: {message}")]
    Conflict { message: String },
}

impl DbError {
    pub(crate) fn not_found(resource: &'static str, id: &ObjectId) -> Self {
        Self::NotFound {
            resource,
            id: id.to_hex(),
        }
    }

    pub(crate) fn duplicate_email(email: &str) -> Self {
        Self::Conflict {
            message: format!("a member with email '{}' is already registered", email),
        }
    }
}

/// Totals for the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCounts {
    pub members: u64,
    pub events: u64,
    pub upcoming_events: u64,
    pub blogs: u64,
}

/// Member count for one department
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentCount {
    pub department: String,
    pub count: u64,
}

/// Document store operations used by the handlers.
///
/// Ordering contract for lists: members by `joinedAt` desc, blogs by
/// `createdAt` desc, events per [`crate::models::EventWindow`].
#[async_trait]
pub trait Store: Send + Sync {
    /// Round-trip to the backend.
    async fn ping(&self) -> Result<(), DbError>;

    /// Insert a member; a taken email yields `DbError::Conflict`.
    async fn insert_member(&self, member: MemberDocument) -> Result<MemberDocument, DbError>;
    async fn find_member(&self, id: &ObjectId) -> Result<Option<MemberDocument>, DbError>;
    async fn find_member_by_email(&self, email: &str) -> Result<Option<MemberDocument>, DbError>;
    async fn list_members(
        &self,
        filter: &MemberFilter,
        page: Pagination,
    ) -> Result<Paginated<MemberDocument>, DbError>;
    /// Apply a patch and return the updated member.
    async fn update_member(
        &self,
        id: &ObjectId,
        patch: &MemberPatch,
    ) -> Result<MemberDocument, DbError>;
    /// Returns whether a member was removed.
    async fn delete_member(&self, id: &ObjectId) -> Result<bool, DbError>;

    async fn insert_event(&self, event: EventDocument) -> Result<EventDocument, DbError>;
    async fn find_event(&self, id: &ObjectId) -> Result<Option<EventDocument>, DbError>;
    async fn list_events(
        &self,
        filter: &EventFilter,
        now: DateTime,
        page: Pagination,
    ) -> Result<Paginated<EventDocument>, DbError>;
    async fn update_event(&self, id: &ObjectId, patch: &EventPatch)
        -> Result<EventDocument, DbError>;
    async fn delete_event(&self, id: &ObjectId) -> Result<bool, DbError>;

    async fn insert_blog(&self, blog: BlogDocument) -> Result<BlogDocument, DbError>;
    async fn find_blog(&self, id: &ObjectId) -> Result<Option<BlogDocument>, DbError>;
    async fn list_blogs(
        &self,
        filter: &BlogFilter,
        page: Pagination,
    ) -> Result<Paginated<BlogDocument>, DbError>;
    async fn update_blog(&self, id: &ObjectId, patch: &BlogPatch) -> Result<BlogDocument, DbError>;
    async fn delete_blog(&self, id: &ObjectId) -> Result<bool, DbError>;
    /// Remove every post by `author_id`, returning how many went.
    async fn delete_blogs_by_author(&self, author_id: &ObjectId) -> Result<u64, DbError>;

    async fn dashboard_counts(&self, now: DateTime) -> Result<DashboardCounts, DbError>;
    /// Departments by descending member count, ties by name.
    async fn members_by_department(&self) -> Result<Vec<DepartmentCount>, DbError>;
}
