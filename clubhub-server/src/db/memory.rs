//! In-process store for tests and `serve --memory`
//!
//! Mirrors the MongoDB store's contract, including the unique email index
//! and list ordering, over plain vectors.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::DateTime;
use tokio::sync::RwLock;

use super::documents::{now, BlogDocument, EventDocument, MemberDocument};
use super::store::{DashboardCounts, DbError, DepartmentCount, Store};
use crate::models::{
    BlogFilter, BlogPatch, EventFilter, EventPatch, EventWindow, MemberFilter, MemberPatch,
    Paginated, Pagination,
};

#[derive(Default)]
struct Collections {
    members: Vec<MemberDocument>,
    events: Vec<EventDocument>,
    blogs: Vec<BlogDocument>,
}

/// Store holding every document in memory
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn paginate<T: Clone>(items: Vec<T>, page: Pagination) -> Paginated<T> {
    Paginated {
        total: items.len() as u64,
        items: page.slice(&items),
        offset: page.offset,
        limit: page.limit,
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }

    async fn insert_member(&self, member: MemberDocument) -> Result<MemberDocument, DbError> {
        let mut data = self.data.write().await;
        if data.members.iter().any(|m| m.email == member.email) {
            return Err(DbError::duplicate_email(&member.email));
        }
        data.members.push(member.clone());
        Ok(member)
    }

    async fn find_member(&self, id: &ObjectId) -> Result<Option<MemberDocument>, DbError> {
        let data = self.data.read().await;
        Ok(data.members.iter().find(|m| m.id == *id).cloned())
    }

    async fn find_member_by_email(&self, email: &str) -> Result<Option<MemberDocument>, DbError> {
        let data = self.data.read().await;
        Ok(data.members.iter().find(|m| m.email == email).cloned())
    }

    async fn list_members(
        &self,
        filter: &MemberFilter,
        page: Pagination,
    ) -> Result<Paginated<MemberDocument>, DbError> {
        let data = self.data.read().await;
        let mut matched: Vec<MemberDocument> = data
            .members
            .iter()
            .filter(|m| filter.department.as_ref().map_or(true, |d| &m.department == d))
            .filter(|m| filter.year.as_ref().map_or(true, |y| m.year.as_ref() == Some(y)))
            .filter(|m| {
                filter.search.as_ref().map_or(true, |s| {
                    contains_ci(&m.name, s) || contains_ci(&m.email, s)
                })
            })
            .cloned()
            .collect();
        matched.sort_by_key(|m| Reverse((m.joined_at, m.id)));
        Ok(paginate(matched, page))
    }

    async fn update_member(
        &self,
        id: &ObjectId,
        patch: &MemberPatch,
    ) -> Result<MemberDocument, DbError> {
        let mut data = self.data.write().await;
        if let Some(email) = &patch.email {
            if data
                .members
                .iter()
                .any(|m| m.id != *id && m.email == email.as_str())
            {
                return Err(DbError::duplicate_email(email.as_str()));
            }
        }
        let member = data
            .members
            .iter_mut()
            .find(|m| m.id == *id)
            .ok_or_else(|| DbError::not_found("member", id))?;
        member.apply(patch, now());
        Ok(member.clone())
    }

    async fn delete_member(&self, id: &ObjectId) -> Result<bool, DbError> {
        let mut data = self.data.write().await;
        let before = data.members.len();
        data.members.retain(|m| m.id != *id);
        Ok(data.members.len() < before)
    }

    async fn insert_event(&self, event: EventDocument) -> Result<EventDocument, DbError> {
        self.data.write().await.events.push(event.clone());
        Ok(event)
    }

    async fn find_event(&self, id: &ObjectId) -> Result<Option<EventDocument>, DbError> {
        let data = self.data.read().await;
        Ok(data.events.iter().find(|e| e.id == *id).cloned())
    }

    async fn list_events(
        &self,
        filter: &EventFilter,
        now: DateTime,
        page: Pagination,
    ) -> Result<Paginated<EventDocument>, DbError> {
        let data = self.data.read().await;
        let mut matched: Vec<EventDocument> = data
            .events
            .iter()
            .filter(|e| match filter.window {
                EventWindow::Upcoming => e.event_date >= now,
                EventWindow::Past => e.event_date < now,
                EventWindow::All => true,
            })
            .filter(|e| filter.search.as_ref().map_or(true, |s| contains_ci(&e.title, s)))
            .cloned()
            .collect();

        match filter.window {
            EventWindow::Upcoming => matched.sort_by_key(|e| (e.event_date, e.id)),
            EventWindow::Past | EventWindow::All => {
                matched.sort_by_key(|e| Reverse((e.event_date, e.id)))
            }
        }
        Ok(paginate(matched, page))
    }

    async fn update_event(
        &self,
        id: &ObjectId,
        patch: &EventPatch,
    ) -> Result<EventDocument, DbError> {
        let mut data = self.data.write().await;
        let event = data
            .events
            .iter_mut()
            .find(|e| e.id == *id)
            .ok_or_else(|| DbError::not_found("event", id))?;
        event.apply(patch, now());
        Ok(event.clone())
    }

    async fn delete_event(&self, id: &ObjectId) -> Result<bool, DbError> {
        let mut data = self.data.write().await;
        let before = data.events.len();
        data.events.retain(|e| e.id != *id);
        Ok(data.events.len() < before)
    }

    async fn insert_blog(&self, blog: BlogDocument) -> Result<BlogDocument, DbError> {
        self.data.write().await.blogs.push(blog.clone());
        Ok(blog)
    }

    async fn find_blog(&self, id: &ObjectId) -> Result<Option<BlogDocument>, DbError> {
        let data = self.data.read().await;
        Ok(data.blogs.iter().find(|b| b.id == *id).cloned())
    }

    async fn list_blogs(
        &self,
        filter: &BlogFilter,
        page: Pagination,
    ) -> Result<Paginated<BlogDocument>, DbError> {
        let data = self.data.read().await;
        let mut matched: Vec<BlogDocument> = data
            .blogs
            .iter()
            .filter(|b| filter.author_id.map_or(true, |a| b.author_id == a))
            .filter(|b| filter.search.as_ref().map_or(true, |s| contains_ci(&b.title, s)))
            .cloned()
            .collect();
        matched.sort_by_key(|b| Reverse((b.created_at, b.id)));
        Ok(paginate(matched, page))
    }

    async fn update_blog(&self, id: &ObjectId, patch: &BlogPatch) -> Result<BlogDocument, DbError> {
        let mut data = self.data.write().await;
        let blog = data
            .blogs
            .iter_mut()
            .find(|b| b.id == *id)
            .ok_or_else(|| DbError::not_found("blog", id))?;
        blog.apply(patch, now());
        Ok(blog.clone())
    }

    async fn delete_blog(&self, id: &ObjectId) -> Result<bool, DbError> {
        let mut data = self.data.write().await;
        let before = data.blogs.len();
        data.blogs.retain(|b| b.id != *id);
        Ok(data.blogs.len() < before)
    }

    async fn delete_blogs_by_author(&self, author_id: &ObjectId) -> Result<u64, DbError> {
        let mut data = self.data.write().await;
        let before = data.blogs.len();
        data.blogs.retain(|b| b.author_id != *author_id);
        Ok((before - data.blogs.len()) as u64)
    }

    async fn dashboard_counts(&self, now: DateTime) -> Result<DashboardCounts, DbError> {
        let data = self.data.read().await;
        Ok(DashboardCounts {
            members: data.members.len() as u64,
            events: data.events.len() as u64,
            upcoming_events: data.events.iter().filter(|e| e.event_date >= now).count() as u64,
            blogs: data.blogs.len() as u64,
        })
    }

    async fn members_by_department(&self) -> Result<Vec<DepartmentCount>, DbError> {
        let data = self.data.read().await;
        let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
        for member in &data.members {
            *counts.entry(member.department.as_str()).or_default() += 1;
        }

        let mut rows: Vec<DepartmentCount> = counts
            .into_iter()
            .map(|(department, count)| DepartmentCount {
                department: department.to_owned(),
                count,
            })
            .collect();
        // BTreeMap already ordered names; a stable sort keeps that for ties
        rows.sort_by_key(|r| Reverse(r.count));
        Ok(rows)
    }
}
