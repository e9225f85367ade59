use std::collections::BTreeMap;

use serde::Serialize;
use validator::ValidationErrors;

/// Uniform operation envelope returned by every business operation. Expected
/// business conditions set `success = false` with a message (and per-field
/// errors where applicable); only infrastructure failures escape as
/// `AppError`.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
    /// Machine-readable condition code for outcomes the UI branches on,
    /// e.g. "ALREADY_LINKED" offering a confirm-and-override flow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            code: None,
        }
    }

    pub fn ok_empty() -> Self {
        Self {
            success: true,
            data: None,
            message: None,
            errors: None,
            code: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            errors: None,
            code: None,
        }
    }

    pub fn fail_with_code(message: impl Into<String>, code: &'static str) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            errors: None,
            code: Some(code),
        }
    }

    /// Per-field errors with the first message promoted to the top-level
    /// message for convenience.
    pub fn invalid(errors: BTreeMap<String, Vec<String>>) -> Self {
        let first = errors
            .values()
            .flatten()
            .next()
            .cloned()
            .unwrap_or_else(|| "Validation failed".to_string());
        Self {
            success: false,
            data: None,
            message: Some(first),
            errors: Some(errors),
            code: None,
        }
    }

    /// Fold `validator` derive output into the envelope's error map.
    pub fn from_validation(errors: &ValidationErrors) -> Self {
        let mut map = BTreeMap::new();
        for (field, field_errors) in errors.field_errors() {
            let messages: Vec<String> = field_errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {field}"))
                })
                .collect();
            map.insert(field.to_string(), messages);
        }
        Self::invalid(map)
    }

    /// Duplicate-value conflict for the given fields, e.g. a unique
    /// constraint hit on employee email or code.
    pub fn conflict(fields: &[&str]) -> Self {
        let mut map = BTreeMap::new();
        for field in fields {
            let label = field.replace('_', " ");
            map.insert(
                field.to_string(),
                vec![format!("The {label} has already been taken.")],
            );
        }
        Self {
            success: false,
            data: None,
            message: Some(format!("Duplicate value for: {}", fields.join(", "))),
            errors: Some(map),
            code: None,
        }
    }
}

/// Pagination envelope: `last_page = ceil(total / per_page)`.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub last_page: i64,
}

impl<T: Serialize> Page<T> {
    pub fn new(data: Vec<T>, total: i64, page: i64, per_page: i64) -> Self {
        let last_page = if per_page > 0 {
            (total + per_page - 1) / per_page
        } else {
            0
        };
        Self {
            data,
            total,
            page,
            per_page,
            last_page,
        }
    }

    /// Empty page for the no-active-company case: still a success shape, so
    /// callers can tell it apart from a failing operation.
    pub fn empty(page: i64, per_page: i64) -> Self {
        Self::new(Vec::new(), 0, page, per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_page_is_ceiling() {
        assert_eq!(Page::<i64>::new(vec![], 0, 1, 10).last_page, 0);
        assert_eq!(Page::<i64>::new(vec![], 10, 1, 10).last_page, 1);
        assert_eq!(Page::<i64>::new(vec![], 11, 1, 10).last_page, 2);
        assert_eq!(Page::<i64>::new(vec![], 1, 1, 100).last_page, 1);
    }

    #[test]
    fn invalid_promotes_first_message() {
        let mut errors = BTreeMap::new();
        errors.insert("email".to_string(), vec!["Email is invalid".to_string()]);
        let envelope: Envelope<()> = Envelope::invalid(errors);
        assert!(!envelope.success);
        assert_eq!(envelope.message.as_deref(), Some("Email is invalid"));
    }

    #[test]
    fn conflict_names_fields() {
        let envelope: Envelope<()> = Envelope::conflict(&["national_id"]);
        assert_eq!(
            envelope.message.as_deref(),
            Some("Duplicate value for: national_id")
        );
        let errors = envelope.errors.unwrap();
        assert_eq!(
            errors["national_id"],
            vec!["The national id has already been taken.".to_string()]
        );
    }
}
