//! Field rules for todo payloads.

use crate::error::AppError;
use crate::model::{TodoFields, DESCRIPTION_MAX_LEN, TITLE_MAX_LEN};

pub struct RequestValidator;

impl RequestValidator {
    /// Title is required and non-blank; both text fields are length-capped in characters.
    pub fn validate(fields: &TodoFields) -> Result<(), AppError> {
        if fields.title.trim().is_empty() {
            return Err(AppError::Validation("title is required".into()));
        }
        check_max_length("title", &fields.title, TITLE_MAX_LEN)?;
        if let Some(d) = &fields.description {
            check_max_length("description", d, DESCRIPTION_MAX_LEN)?;
        }
        Ok(())
    }
}

fn check_max_length(col: &str, s: &str, max: usize) -> Result<(), AppError> {
    if s.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            col, max
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(title: &str, description: Option<&str>) -> TodoFields {
        TodoFields {
            title: title.into(),
            description: description.map(Into::into),
            is_completed: false,
        }
    }

    #[test]
    fn accepts_limits_exactly() {
        let title = "t".repeat(TITLE_MAX_LEN);
        let desc = "d".repeat(DESCRIPTION_MAX_LEN);
        assert!(RequestValidator::validate(&fields(&title, Some(&desc))).is_ok());
        assert!(RequestValidator::validate(&fields("Buy milk", None)).is_ok());
    }

    #[test]
    fn counts_characters_not_bytes() {
        let title = "é".repeat(TITLE_MAX_LEN);
        assert!(RequestValidator::validate(&fields(&title, None)).is_ok());
    }

    #[test]
    fn rejects_blank_title() {
        let err = RequestValidator::validate(&fields("   ", None)).unwrap_err();
        assert_eq!(err.to_string(), "title is required");
    }

    #[test]
    fn rejects_long_fields() {
        let title = "t".repeat(TITLE_MAX_LEN + 1);
        assert!(matches!(
            RequestValidator::validate(&fields(&title, None)),
            Err(AppError::Validation(_))
        ));
        let desc = "d".repeat(DESCRIPTION_MAX_LEN + 1);
        let err = RequestValidator::validate(&fields("ok", Some(&desc))).unwrap_err();
        assert_eq!(err.to_string(), "description must be at most 255 characters");
    }
}
