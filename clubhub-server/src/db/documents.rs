//! Stored document shapes for the three collections
//!
//! Field names are camelCase on disk so the collections stay readable from
//! the mongo shell. Timestamps are BSON dates.

use bson::oid::ObjectId;
use bson::{doc, DateTime, Document};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::models::{BlogPatch, EventPatch, MemberPatch, NewBlog, NewEvent, NewMember};

pub const MEMBERS: &str = "members";
pub const EVENTS: &str = "events";
pub const BLOGS: &str = "blogs";

/// Current time as a BSON date.
pub fn now() -> DateTime {
    DateTime::from_chrono(Utc::now())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub department: String,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    pub joined_at: DateTime,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl MemberDocument {
    pub fn new(input: NewMember, at: DateTime) -> Self {
        Self {
            id: ObjectId::new(),
            name: input.name,
            email: input.email.into_string(),
            department: input.department,
            year: input.year,
            interests: input.interests,
            joined_at: at,
            created_at: at,
            updated_at: at,
        }
    }

    pub fn apply(&mut self, patch: &MemberPatch, at: DateTime) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.as_str().to_owned();
        }
        if let Some(department) = &patch.department {
            self.department = department.clone();
        }
        if let Some(year) = &patch.year {
            self.year = year.clone();
        }
        if let Some(interests) = &patch.interests {
            self.interests = interests.clone();
        }
        self.updated_at = at;
    }
}

/// Set or unset one optional field.
fn set_or_unset(set: &mut Document, unset: &mut Document, key: &str, value: &Option<String>) {
    match value {
        Some(v) => {
            set.insert(key, v.as_str());
        }
        None => {
            unset.insert(key, "");
        }
    }
}

/// Combine `$set` with `$unset` when something is being cleared.
fn update_doc(set: Document, unset: Document) -> Document {
    let mut update = doc! { "$set": set };
    if !unset.is_empty() {
        update.insert("$unset", unset);
    }
    update
}

/// `$set`/`$unset` body for a member patch.
pub fn member_update(patch: &MemberPatch, at: DateTime) -> Document {
    let mut set = doc! { "updatedAt": at };
    let mut unset = Document::new();
    if let Some(name) = &patch.name {
        set.insert("name", name.as_str());
    }
    if let Some(email) = &patch.email {
        set.insert("email", email.as_str());
    }
    if let Some(department) = &patch.department {
        set.insert("department", department.as_str());
    }
    if let Some(year) = &patch.year {
        set_or_unset(&mut set, &mut unset, "year", year);
    }
    if let Some(interests) = &patch.interests {
        set.insert("interests", interests.clone());
    }
    update_doc(set, unset)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub event_date: DateTime,
    #[serde(default)]
    pub location: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl EventDocument {
    pub fn new(input: NewEvent, at: DateTime) -> Self {
        Self {
            id: ObjectId::new(),
            title: input.title,
            description: input.description,
            event_date: DateTime::from_chrono(input.event_date),
            location: input.location,
            created_at: at,
            updated_at: at,
        }
    }

    pub fn apply(&mut self, patch: &EventPatch, at: DateTime) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(date) = patch.event_date {
            self.event_date = DateTime::from_chrono(date);
        }
        if let Some(location) = &patch.location {
            self.location = location.clone();
        }
        self.updated_at = at;
    }
}

pub fn event_update(patch: &EventPatch, at: DateTime) -> Document {
    let mut set = doc! { "updatedAt": at };
    let mut unset = Document::new();
    if let Some(title) = &patch.title {
        set.insert("title", title.as_str());
    }
    if let Some(description) = &patch.description {
        set_or_unset(&mut set, &mut unset, "description", description);
    }
    if let Some(date) = patch.event_date {
        set.insert("eventDate", DateTime::from_chrono(date));
    }
    if let Some(location) = &patch.location {
        set_or_unset(&mut set, &mut unset, "location", location);
    }
    update_doc(set, unset)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub content: String,
    pub author_id: ObjectId,
    pub author_name: String,
    pub author_email: String,
    pub author_department: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl BlogDocument {
    /// Build a post, snapshotting the author's current name/email/department.
    pub fn new(input: NewBlog, author: &MemberDocument, at: DateTime) -> Self {
        Self {
            id: ObjectId::new(),
            title: input.title,
            content: input.content,
            author_id: input.author_id,
            author_name: author.name.clone(),
            author_email: author.email.clone(),
            author_department: author.department.clone(),
            created_at: at,
            updated_at: at,
        }
    }

    pub fn apply(&mut self, patch: &BlogPatch, at: DateTime) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
        self.updated_at = at;
    }
}

pub fn blog_update(patch: &BlogPatch, at: DateTime) -> Document {
    let mut set = doc! { "updatedAt": at };
    if let Some(title) = &patch.title {
        set.insert("title", title.as_str());
    }
    if let Some(content) = &patch.content {
        set.insert("content", content.as_str());
    }
    doc! { "$set": set }
}
