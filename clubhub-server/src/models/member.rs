//! Member registration and update input

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::validation::{clearable_text, nullable, optional_text, required_text};
use super::ValidationError;

const MAX_NAME_LEN: usize = 100;
const MAX_DEPARTMENT_LEN: usize = 100;
const MAX_YEAR_LEN: usize = 32;
const MAX_EMAIL_LEN: usize = 254;
const MAX_INTEREST_LEN: usize = 50;
const MAX_INTERESTS: usize = 20;

/// Loose address check: something@something.tld, no whitespace.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email regex"));

/// Validated, lowercased email address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Trim, lowercase and check the address format.
    ///
    /// # Example
    /// ```
    /// use clubhub_server::models::Email;
    ///
    /// assert_eq!(Email::new(" Ada@Example.COM ").unwrap().as_str(), "ada@example.com");
    /// assert!(Email::new("not-an-email").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let normalized = s.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ValidationError::Empty { field: "email" });
        }
        if normalized.len() > MAX_EMAIL_LEN {
            return Err(ValidationError::TooLong {
                field: "email",
                max: MAX_EMAIL_LEN,
            });
        }
        if !EMAIL_RE.is_match(&normalized) {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "must be a valid email address",
            });
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Interests arrive either as a JSON array or a comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Interests {
    List(Vec<String>),
    Csv(String),
}

impl Interests {
    /// Trimmed, non-empty entries in input order, duplicates dropped
    /// ignoring case.
    pub fn normalize(&self) -> Result<Vec<String>, ValidationError> {
        let raw: Vec<&str> = match self {
            Self::List(items) => items.iter().map(String::as_str).collect(),
            Self::Csv(s) => s.split(',').collect(),
        };

        let mut out: Vec<String> = Vec::with_capacity(raw.len());
        let mut seen: Vec<String> = Vec::with_capacity(raw.len());
        for item in raw.into_iter().map(str::trim).filter(|s| !s.is_empty()) {
            if item.chars().count() > MAX_INTEREST_LEN {
                return Err(ValidationError::TooLong {
                    field: "interests",
                    max: MAX_INTEREST_LEN,
                });
            }
            let folded = item.to_lowercase();
            if seen.contains(&folded) {
                continue;
            }
            if out.len() == MAX_INTERESTS {
                return Err(ValidationError::TooMany {
                    field: "interests",
                    max: MAX_INTERESTS,
                });
            }
            seen.push(folded);
            out.push(item.to_owned());
        }
        Ok(out)
    }
}

/// POST body for member registration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterMemberRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub department: String,
    pub year: Option<String>,
    pub interests: Option<Interests>,
}

/// Registration input after validation
#[derive(Debug, Clone)]
pub struct NewMember {
    pub name: String,
    pub email: Email,
    pub department: String,
    pub year: Option<String>,
    pub interests: Vec<String>,
}

impl NewMember {
    pub fn validate(req: &RegisterMemberRequest) -> Result<Self, ValidationError> {
        Ok(Self {
            name: required_text("name", &req.name, MAX_NAME_LEN)?,
            email: Email::new(&req.email)?,
            department: required_text("department", &req.department, MAX_DEPARTMENT_LEN)?,
            year: optional_text("year", req.year.as_deref(), MAX_YEAR_LEN)?,
            interests: match &req.interests {
                Some(i) => i.normalize()?,
                None => Vec::new(),
            },
        })
    }
}

/// PUT/PATCH body for member updates; absent fields are left alone
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    /// `null` or blank clears the year
    #[serde(default, deserialize_with = "nullable")]
    pub year: Option<Option<String>>,
    pub interests: Option<Interests>,
}

/// Validated member update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberPatch {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub department: Option<String>,
    /// `Some(None)` removes the stored year
    pub year: Option<Option<String>>,
    pub interests: Option<Vec<String>>,
}

impl MemberPatch {
    pub fn validate(req: &UpdateMemberRequest) -> Result<Self, ValidationError> {
        let patch = Self {
            name: req
                .name
                .as_deref()
                .map(|v| required_text("name", v, MAX_NAME_LEN))
                .transpose()?,
            email: req.email.as_deref().map(Email::new).transpose()?,
            department: req
                .department
                .as_deref()
                .map(|v| required_text("department", v, MAX_DEPARTMENT_LEN))
                .transpose()?,
            year: clearable_text("year", &req.year, MAX_YEAR_LEN)?,
            interests: req.interests.as_ref().map(Interests::normalize).transpose()?,
        };

        if patch.is_empty() {
            return Err(ValidationError::NoChanges);
        }
        Ok(patch)
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.department.is_none()
            && self.year.is_none()
            && self.interests.is_none()
    }
}

/// Member list filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberFilter {
    pub department: Option<String>,
    pub year: Option<String>,
    /// Case-insensitive substring of name or email
    pub search: Option<String>,
}
