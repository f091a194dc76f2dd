//! Document id parsing

use bson::oid::ObjectId;

use super::ValidationError;

/// Parse a 24-char hex document id.
pub fn parse_object_id(field: &'static str, s: &str) -> Result<ObjectId, ValidationError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    ObjectId::parse_str(s).map_err(|_| ValidationError::InvalidFormat {
        field,
        reason: "must be a 24-character hex id",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_ids() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id("id", &id.to_hex()).unwrap(), id);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            parse_object_id("id", "").unwrap_err(),
            ValidationError::Empty { field: "id" }
        );
        assert!(matches!(
            parse_object_id("id", "1234"),
            Err(ValidationError::InvalidFormat { field: "id", .. })
        ));
    }
}
