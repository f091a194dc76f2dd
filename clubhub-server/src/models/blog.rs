//! Blog post input

use bson::oid::ObjectId;
use serde::Deserialize;

use super::id::parse_object_id;
use super::validation::required_text;
use super::ValidationError;

const MAX_TITLE_LEN: usize = 200;
const MAX_CONTENT_LEN: usize = 50_000;

/// POST body for blog creation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author_id: String,
}

/// Validated blog post. The author snapshot is filled in by the handler
/// once the member has been loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBlog {
    pub title: String,
    pub content: String,
    pub author_id: ObjectId,
}

impl NewBlog {
    pub fn validate(req: &CreateBlogRequest) -> Result<Self, ValidationError> {
        Ok(Self {
            title: required_text("title", &req.title, MAX_TITLE_LEN)?,
            content: required_text("content", &req.content, MAX_CONTENT_LEN)?,
            author_id: parse_object_id("authorId", &req.author_id)?,
        })
    }
}

/// PUT/PATCH body for blog updates; the author cannot change
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogPatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl BlogPatch {
    pub fn validate(req: &UpdateBlogRequest) -> Result<Self, ValidationError> {
        let patch = Self {
            title: req
                .title
                .as_deref()
                .map(|v| required_text("title", v, MAX_TITLE_LEN))
                .transpose()?,
            content: req
                .content
                .as_deref()
                .map(|v| required_text("content", v, MAX_CONTENT_LEN))
                .transpose()?,
        };
        if patch.title.is_none() && patch.content.is_none() {
            return Err(ValidationError::NoChanges);
        }
        Ok(patch)
    }
}

/// Blog list filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogFilter {
    pub author_id: Option<ObjectId>,
    /// Case-insensitive substring of the title
    pub search: Option<String>,
}
