//! MongoDB-backed store
//!
//! Every operation goes through the process-wide connection cache, so the
//! first request pays for the connect and the rest reuse the handle.
//! Independent queries (page + total, dashboard counts) run concurrently.

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, DateTime, Document};
use futures::TryStreamExt;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::connection::{cached_database, DatabaseConfig};
use super::documents::{
    blog_update, event_update, member_update, now, BlogDocument, EventDocument, MemberDocument,
    BLOGS, EVENTS, MEMBERS,
};
use super::store::{DashboardCounts, DbError, DepartmentCount, Store};
use crate::models::{
    BlogFilter, BlogPatch, EventFilter, EventPatch, EventWindow, MemberFilter, MemberPatch,
    Paginated, Pagination,
};

/// Server error code for a unique index violation
const DUPLICATE_KEY: i32 = 11000;

/// Store backed by the cached MongoDB connection
#[derive(Debug, Clone)]
pub struct MongoStore {
    config: DatabaseConfig,
}

impl MongoStore {
    /// No I/O happens here; the first operation connects.
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    async fn db(&self) -> Result<Database, DbError> {
        cached_database(&self.config).await
    }

    async fn members(&self) -> Result<Collection<MemberDocument>, DbError> {
        Ok(self.db().await?.collection(MEMBERS))
    }

    async fn events(&self) -> Result<Collection<EventDocument>, DbError> {
        Ok(self.db().await?.collection(EVENTS))
    }

    async fn blogs(&self) -> Result<Collection<BlogDocument>, DbError> {
        Ok(self.db().await?.collection(BLOGS))
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY,
        _ => false,
    }
}

/// Case-insensitive substring match on a literal string.
fn contains_ci(needle: &str) -> Document {
    doc! { "$regex": regex::escape(needle), "$options": "i" }
}

fn member_query(filter: &MemberFilter) -> Document {
    let mut query = Document::new();
    if let Some(department) = &filter.department {
        query.insert("department", department.as_str());
    }
    if let Some(year) = &filter.year {
        query.insert("year", year.as_str());
    }
    if let Some(search) = &filter.search {
        query.insert(
            "$or",
            vec![
                doc! { "name": contains_ci(search) },
                doc! { "email": contains_ci(search) },
            ],
        );
    }
    query
}

fn event_query(filter: &EventFilter, now: DateTime) -> (Document, Document) {
    let mut query = Document::new();
    let sort = match filter.window {
        EventWindow::Upcoming => {
            query.insert("eventDate", doc! { "$gte": now });
            doc! { "eventDate": 1, "_id": 1 }
        }
        EventWindow::Past => {
            query.insert("eventDate", doc! { "$lt": now });
            doc! { "eventDate": -1, "_id": -1 }
        }
        EventWindow::All => doc! { "eventDate": -1, "_id": -1 },
    };
    if let Some(search) = &filter.search {
        query.insert("title", contains_ci(search));
    }
    (query, sort)
}

fn blog_query(filter: &BlogFilter) -> Document {
    let mut query = Document::new();
    if let Some(author_id) = filter.author_id {
        query.insert("authorId", author_id);
    }
    if let Some(search) = &filter.search {
        query.insert("title", contains_ci(search));
    }
    query
}

/// Fetch one window of `query` together with its total count.
async fn find_page<T>(
    collection: &Collection<T>,
    query: Document,
    sort: Document,
    page: Pagination,
) -> Result<Paginated<T>, DbError>
where
    T: DeserializeOwned + Send + Sync + Unpin,
{
    let items = async {
        collection
            .find(query.clone())
            .sort(sort)
            .skip(page.offset)
            .limit(i64::from(page.limit))
            .await?
            .try_collect::<Vec<T>>()
            .await
    };
    let total = async { collection.count_documents(query.clone()).await };
    let (items, total) = tokio::try_join!(items, total)?;

    Ok(Paginated {
        items,
        total,
        offset: page.offset,
        limit: page.limit,
    })
}

#[derive(Deserialize)]
struct DepartmentRow {
    #[serde(rename = "_id")]
    department: Option<String>,
    count: i64,
}

#[async_trait]
impl Store for MongoStore {
    async fn ping(&self) -> Result<(), DbError> {
        self.db().await?.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn insert_member(&self, member: MemberDocument) -> Result<MemberDocument, DbError> {
        match self.members().await?.insert_one(&member).await {
            Ok(_) => Ok(member),
            Err(e) if is_duplicate_key(&e) => Err(DbError::duplicate_email(&member.email)),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_member(&self, id: &ObjectId) -> Result<Option<MemberDocument>, DbError> {
        Ok(self.members().await?.find_one(doc! { "_id": *id }).await?)
    }

    async fn find_member_by_email(&self, email: &str) -> Result<Option<MemberDocument>, DbError> {
        Ok(self.members().await?.find_one(doc! { "email": email }).await?)
    }

    async fn list_members(
        &self,
        filter: &MemberFilter,
        page: Pagination,
    ) -> Result<Paginated<MemberDocument>, DbError> {
        let members = self.members().await?;
        find_page(
            &members,
            member_query(filter),
            doc! { "joinedAt": -1, "_id": -1 },
            page,
        )
        .await
    }

    async fn update_member(
        &self,
        id: &ObjectId,
        patch: &MemberPatch,
    ) -> Result<MemberDocument, DbError> {
        let result = self
            .members()
            .await?
            .find_one_and_update(doc! { "_id": *id }, member_update(patch, now()))
            .return_document(ReturnDocument::After)
            .await;

        match result {
            Ok(Some(member)) => Ok(member),
            Ok(None) => Err(DbError::not_found("member", id)),
            Err(e) if is_duplicate_key(&e) => Err(DbError::duplicate_email(
                patch.email.as_ref().map(|e| e.as_str()).unwrap_or_default(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_member(&self, id: &ObjectId) -> Result<bool, DbError> {
        let result = self.members().await?.delete_one(doc! { "_id": *id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn insert_event(&self, event: EventDocument) -> Result<EventDocument, DbError> {
        self.events().await?.insert_one(&event).await?;
        Ok(event)
    }

    async fn find_event(&self, id: &ObjectId) -> Result<Option<EventDocument>, DbError> {
        Ok(self.events().await?.find_one(doc! { "_id": *id }).await?)
    }

    async fn list_events(
        &self,
        filter: &EventFilter,
        now: DateTime,
        page: Pagination,
    ) -> Result<Paginated<EventDocument>, DbError> {
        let events = self.events().await?;
        let (query, sort) = event_query(filter, now);
        find_page(&events, query, sort, page).await
    }

    async fn update_event(
        &self,
        id: &ObjectId,
        patch: &EventPatch,
    ) -> Result<EventDocument, DbError> {
        self.events()
            .await?
            .find_one_and_update(doc! { "_id": *id }, event_update(patch, now()))
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| DbError::not_found("event", id))
    }

    async fn delete_event(&self, id: &ObjectId) -> Result<bool, DbError> {
        let result = self.events().await?.delete_one(doc! { "_id": *id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn insert_blog(&self, blog: BlogDocument) -> Result<BlogDocument, DbError> {
        self.blogs().await?.insert_one(&blog).await?;
        Ok(blog)
    }

    async fn find_blog(&self, id: &ObjectId) -> Result<Option<BlogDocument>, DbError> {
        Ok(self.blogs().await?.find_one(doc! { "_id": *id }).await?)
    }

    async fn list_blogs(
        &self,
        filter: &BlogFilter,
        page: Pagination,
    ) -> Result<Paginated<BlogDocument>, DbError> {
        let blogs = self.blogs().await?;
        find_page(
            &blogs,
            blog_query(filter),
            doc! { "createdAt": -1, "_id": -1 },
            page,
        )
        .await
    }

    async fn update_blog(&self, id: &ObjectId, patch: &BlogPatch) -> Result<BlogDocument, DbError> {
        self.blogs()
            .await?
            .find_one_and_update(doc! { "_id": *id }, blog_update(patch, now()))
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| DbError::not_found("blog", id))
    }

    async fn delete_blog(&self, id: &ObjectId) -> Result<bool, DbError> {
        let result = self.blogs().await?.delete_one(doc! { "_id": *id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn delete_blogs_by_author(&self, author_id: &ObjectId) -> Result<u64, DbError> {
        let result = self
            .blogs()
            .await?
            .delete_many(doc! { "authorId": *author_id })
            .await?;
        Ok(result.deleted_count)
    }

    async fn dashboard_counts(&self, now: DateTime) -> Result<DashboardCounts, DbError> {
        let members = self.members().await?;
        let events = self.events().await?;
        let blogs = self.blogs().await?;

        let (members, events, upcoming_events, blogs) = tokio::try_join!(
            async { members.count_documents(doc! {}).await },
            async { events.count_documents(doc! {}).await },
            async { events.count_documents(doc! { "eventDate": { "$gte": now } }).await },
            async { blogs.count_documents(doc! {}).await },
        )?;

        Ok(DashboardCounts {
            members,
            events,
            upcoming_events,
            blogs,
        })
    }

    async fn members_by_department(&self) -> Result<Vec<DepartmentCount>, DbError> {
        let pipeline = vec![
            doc! { "$group": { "_id": "$department", "count": { "$sum": 1 } } },
            doc! { "$sort": { "count": -1, "_id": 1 } },
        ];
        let rows: Vec<Document> = self
            .members()
            .await?
            .aggregate(pipeline)
            .await?
            .try_collect()
            .await?;

        rows.into_iter()
            .map(|row| -> Result<DepartmentCount, DbError> {
                let row: DepartmentRow = bson::from_document(row)?;
                Ok(DepartmentCount {
                    department: row.department.unwrap_or_default(),
                    count: u64::try_from(row.count).unwrap_or_default(),
                })
            })
            .collect()
    }
}
