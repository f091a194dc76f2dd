//! Event input and date handling

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use super::validation::{clearable_text, nullable, optional_text, required_text};
use super::ValidationError;

const MAX_TITLE_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 5000;
const MAX_LOCATION_LEN: usize = 200;

/// Parse an event date given as RFC 3339 or a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_event_date(s: &str) -> Result<DateTime<Utc>, ValidationError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ValidationError::Empty { field: "eventDate" });
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or(ValidationError::InvalidFormat {
            field: "eventDate",
            reason: "must be an RFC 3339 timestamp or YYYY-MM-DD",
        })
}

/// POST body for event creation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub event_date: String,
    pub location: Option<String>,
}

/// Validated event
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub location: Option<String>,
}

impl NewEvent {
    /// Validate against `now`; the event must start strictly after it.
    pub fn validate(req: &CreateEventRequest, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let title = required_text("title", &req.title, MAX_TITLE_LEN)?;
        let event_date = parse_event_date(&req.event_date)?;
        if event_date <= now {
            return Err(ValidationError::NotInFuture { field: "eventDate" });
        }

        Ok(Self {
            title,
            description: optional_text("description", req.description.as_deref(), MAX_DESCRIPTION_LEN)?,
            event_date,
            location: optional_text("location", req.location.as_deref(), MAX_LOCATION_LEN)?,
        })
    }
}

/// PUT/PATCH body for event updates
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    /// `null` or blank clears the description
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub event_date: Option<String>,
    /// `null` or blank clears the location
    #[serde(default, deserialize_with = "nullable")]
    pub location: Option<Option<String>>,
}

/// Validated event update. Past dates are accepted here so finished
/// events can still be corrected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub event_date: Option<DateTime<Utc>>,
    pub location: Option<Option<String>>,
}

impl EventPatch {
    pub fn validate(req: &UpdateEventRequest) -> Result<Self, ValidationError> {
        let patch = Self {
            title: req
                .title
                .as_deref()
                .map(|v| required_text("title", v, MAX_TITLE_LEN))
                .transpose()?,
            description: clearable_text("description", &req.description, MAX_DESCRIPTION_LEN)?,
            event_date: req.event_date.as_deref().map(parse_event_date).transpose()?,
            location: clearable_text("location", &req.location, MAX_LOCATION_LEN)?,
        };

        if patch.title.is_none()
            && patch.description.is_none()
            && patch.event_date.is_none()
            && patch.location.is_none()
        {
            return Err(ValidationError::NoChanges);
        }
        Ok(patch)
    }
}

/// Which side of "now" to list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EventWindow {
    /// eventDate >= now, soonest first
    Upcoming,
    /// eventDate < now, most recent first
    Past,
    /// Everything, latest eventDate first
    #[default]
    All,
}

impl EventWindow {
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.trim().to_lowercase().as_str() {
            "upcoming" => Ok(Self::Upcoming),
            "past" => Ok(Self::Past),
            "all" | "" => Ok(Self::All),
            other => Err(ValidationError::InvalidVariant {
                field: "when",
                value: other.to_owned(),
            }),
        }
    }
}

/// Event list filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub window: EventWindow,
    /// Case-insensitive substring of the title
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn create(title: &str, date: &str) -> CreateEventRequest {
        CreateEventRequest {
            title: title.into(),
            description: None,
            event_date: date.into(),
            location: Some("  ".into()),
        }
    }

    #[test]
    fn parses_rfc3339_and_plain_dates() {
        let dt = parse_event_date("2026-04-01T18:30:00+02:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 4, 1, 16, 30, 0).unwrap());

        let dt = parse_event_date("2026-04-01").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap());

        assert!(matches!(
            parse_event_date("next tuesday"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn creation_requires_future_date() {
        let err = NewEvent::validate(&create("Hack night", "2026-02-01"), now()).unwrap_err();
        assert_eq!(err, ValidationError::NotInFuture { field: "eventDate" });

        let exactly_now = now().to_rfc3339();
        assert!(NewEvent::validate(&create("Hack night", &exactly_now), now()).is_err());

        let later = (now() + Duration::hours(1)).to_rfc3339();
        let event = NewEvent::validate(&create("Hack night", &later), now()).unwrap();
        assert_eq!(event.title, "Hack night");
        assert_eq!(event.location, None);
    }

    #[test]
    fn creation_requires_title() {
        let err = NewEvent::validate(&create(" ", "2027-01-01"), now()).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "title" });
    }

    #[test]
    fn patch_allows_past_dates() {
        let req = UpdateEventRequest {
            event_date: Some("2020-01-01".into()),
            ..Default::default()
        };
        assert!(EventPatch::validate(&req).unwrap().event_date.is_some());
        assert_eq!(
            EventPatch::validate(&UpdateEventRequest::default()).unwrap_err(),
            ValidationError::NoChanges
        );
    }

    #[test]
    fn patch_clears_optional_fields() {
        let req: UpdateEventRequest =
            serde_json::from_str(r#"{"location": null, "description": "  "}"#).unwrap();
        let patch = EventPatch::validate(&req).unwrap();
        assert_eq!(patch.location, Some(None));
        assert_eq!(patch.description, Some(None));

        let req: UpdateEventRequest = serde_json::from_str(r#"{"location": " Lab 1 "}"#).unwrap();
        let patch = EventPatch::validate(&req).unwrap();
        assert_eq!(patch.location, Some(Some("Lab 1".to_owned())));
        assert_eq!(patch.description, None);
    }

    #[test]
    fn window_parsing() {
        assert_eq!(EventWindow::parse("Upcoming").unwrap(), EventWindow::Upcoming);
        assert_eq!(EventWindow::parse("past").unwrap(), EventWindow::Past);
        assert_eq!(EventWindow::parse("").unwrap(), EventWindow::All);
        assert!(EventWindow::parse("soon").is_err());
    }
}
