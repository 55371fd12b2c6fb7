//! Book instance form handling: sanitization, validation and conversion into a record

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use super::book_instance::{BookInstance, BookInstanceStatus, NewBookInstance};
use crate::error::{AppError, AppResult};

/// Error messages are reported in this field order
const FIELD_ORDER: [&str; 3] = ["book", "imprint", "due_back"];

/// Raw create/update form body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookInstanceForm {
    #[serde(default)]
    pub book: String,
    #[serde(default)]
    pub imprint: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub due_back: Option<String>,
}

/// Delete confirmation form body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteBookInstanceForm {
    #[serde(default)]
    pub bookinstanceid: String,
}

/// Which form is being submitted; the two report errors in their own words
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update,
}

impl FormMode {
    fn invalid_date_message(self) -> &'static str {
        match self {
            FormMode::Create => "Invalid date",
            FormMode::Update => "Invalid due date",
        }
    }
}

#[derive(Debug, Validate)]
struct CreateRequired {
    #[validate(length(min = 1, message = "Book must be specified"))]
    book: String,
    #[validate(length(min = 1, message = "Imprint must be specified"))]
    imprint: String,
}

#[derive(Debug, Validate)]
struct UpdateRequired {
    #[validate(length(min = 1, message = "Must select a book."))]
    book: String,
    #[validate(length(min = 1, message = "Imprint must not be empty."))]
    imprint: String,
}

/// Form after trimming and escaping
#[derive(Debug, Clone)]
struct SanitizedForm {
    book: String,
    imprint: String,
    status: String,
    due_back: Option<String>,
}

impl SanitizedForm {
    fn check_required(&self, mode: FormMode) -> ValidationErrors {
        let book = self.book.clone();
        let imprint = self.imprint.clone();
        let result = match mode {
            FormMode::Create => CreateRequired { book, imprint }.validate(),
            FormMode::Update => UpdateRequired { book, imprint }.validate(),
        };
        result.err().unwrap_or_else(ValidationErrors::new)
    }
}

fn invalid_date(mode: FormMode) -> ValidationError {
    let mut error = ValidationError::new("iso8601");
    error.message = Some(mode.invalid_date_message().into());
    error
}

/// In-memory book instance built from a submission, valid or not
#[derive(Debug, Clone, PartialEq)]
pub struct BookInstanceDraft {
    pub id: Option<Uuid>,
    pub book: String,
    pub imprint: String,
    pub status: String,
    pub due_back: Option<DateTime<Utc>>,
}

/// Outcome of the validation pipeline
#[derive(Debug, Clone)]
pub struct ValidatedForm {
    pub mode: FormMode,
    pub draft: BookInstanceDraft,
    pub errors: Vec<String>,
}

impl ValidatedForm {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Move the due date by `offset`; a date pushed out of range is reported as invalid
    pub fn shift_due_back(mut self, offset: Duration) -> Self {
        if let Some(due) = self.draft.due_back {
            match due.checked_add_signed(offset) {
                Some(shifted) => self.draft.due_back = Some(shifted),
                None => {
                    self.draft.due_back = None;
                    self.errors
                        .push(self.mode.invalid_date_message().to_string());
                }
            }
        }
        self
    }
}

impl BookInstanceForm {
    fn sanitize(self) -> SanitizedForm {
        SanitizedForm {
            book: escape_html(self.book.trim()),
            imprint: escape_html(self.imprint.trim()),
            status: escape_html(&self.status),
            due_back: self.due_back.filter(|value| !value.is_empty()),
        }
    }

    /// Run every check, then collect messages in field order
    pub fn validate(self, mode: FormMode) -> ValidatedForm {
        let sanitized = self.sanitize();
        let mut errors = sanitized.check_required(mode);

        let due_back = match sanitized.due_back.as_deref() {
            None => None,
            Some(raw) => {
                let parsed = parse_iso8601(raw);
                if parsed.is_none() {
                    errors.add("due_back", invalid_date(mode));
                }
                parsed
            }
        };

        let field_errors = errors.field_errors();
        let messages = FIELD_ORDER
            .iter()
            .filter_map(|field| field_errors.get(*field))
            .flat_map(|list| list.iter())
            .map(|error| {
                error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string())
            })
            .collect();

        ValidatedForm {
            mode,
            draft: BookInstanceDraft {
                id: None,
                book: sanitized.book,
                imprint: sanitized.imprint,
                status: sanitized.status,
                due_back,
            },
            errors: messages,
        }
    }
}

impl BookInstanceDraft {
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// Apply the storage rules: book must be an id, status must be known
    /// (empty means the default), and a missing due date means `now`.
    pub fn to_record(&self, now: DateTime<Utc>) -> AppResult<NewBookInstance> {
        let book = Uuid::parse_str(&self.book)
            .map_err(|_| AppError::Validation(format!("`{}` is not a valid book id", self.book)))?;
        let status = if self.status.is_empty() {
            BookInstanceStatus::default()
        } else {
            self.status.parse()?
        };

        Ok(NewBookInstance {
            book,
            imprint: self.imprint.clone(),
            status,
            due_back: self.due_back.unwrap_or(now),
        })
    }
}

impl From<&BookInstance> for BookInstanceDraft {
    fn from(instance: &BookInstance) -> Self {
        Self {
            id: Some(instance.id),
            book: instance.book.to_string(),
            imprint: instance.imprint.clone(),
            status: instance.status.to_string(),
            due_back: Some(instance.due_back),
        }
    }
}

/// Accepts `YYYY-MM-DD` (midnight UTC), RFC 3339, and naive date-times taken as UTC
pub fn parse_iso8601(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive));
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Replace HTML-significant characters with entities
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '/' => escaped.push_str("&#x2F;"),
            '`' => escaped.push_str("&#96;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(book: &str, imprint: &str, status: &str, due_back: Option<&str>) -> BookInstanceForm {
        BookInstanceForm {
            book: book.to_string(),
            imprint: imprint.to_string(),
            status: status.to_string(),
            due_back: due_back.map(str::to_string),
        }
    }

    #[test]
    fn test_valid_form() {
        let book = Uuid::new_v4().to_string();
        let validated = form(&format!("  {}  ", book), " Penguin ", "Available", Some("2024-06-01"))
            .validate(FormMode::Create);

        assert!(validated.is_valid());
        assert_eq!(validated.draft.book, book);
        assert_eq!(validated.draft.imprint, "Penguin");
        assert_eq!(
            validated.draft.due_back,
            Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_missing_required_fields_reported_in_order() {
        let validated = form("   ", "", "Available", Some("not a date")).validate(FormMode::Create);

        assert_eq!(
            validated.errors,
            vec![
                "Book must be specified".to_string(),
                "Imprint must be specified".to_string(),
                "Invalid date".to_string(),
            ]
        );
        assert_eq!(validated.draft.due_back, None);
    }

    #[test]
    fn test_empty_due_back_is_absent() {
        let validated = form("b", "i", "Loaned", Some("")).validate(FormMode::Create);
        assert!(validated.is_valid());
        assert_eq!(validated.draft.due_back, None);
    }

    #[test]
    fn test_fields_are_escaped() {
        let validated = form("b", "<script>alert('x')</script>", "A&B", None).validate(FormMode::Create);
        assert_eq!(
            validated.draft.imprint,
            "&lt;script&gt;alert(&#x27;x&#x27;)&lt;&#x2F;script&gt;"
        );
        assert_eq!(validated.draft.status, "A&amp;B");
    }

    #[test]
    fn test_parse_iso8601_variants() {
        let expected = Utc.with_ymd_and_hms(2024, 6, 1, 10, 30, 0).unwrap();
        assert_eq!(parse_iso8601("2024-06-01T10:30:00Z"), Some(expected));
        assert_eq!(parse_iso8601("2024-06-01T12:30:00+02:00"), Some(expected));
        assert_eq!(parse_iso8601("2024-06-01T10:30"), Some(expected));
        assert_eq!(parse_iso8601("2024-13-01"), None);
        assert_eq!(parse_iso8601("June 1st"), None);
    }

    #[test]
    fn test_to_record_rules() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let book = Uuid::new_v4();
        let draft = BookInstanceDraft {
            id: None,
            book: book.to_string(),
            imprint: "Imprint".to_string(),
            status: String::new(),
            due_back: None,
        };

        let record = draft.to_record(now).unwrap();
        assert_eq!(record.book, book);
        assert_eq!(record.status, BookInstanceStatus::Maintenance);
        assert_eq!(record.due_back, now);

        let bad_status = BookInstanceDraft {
            status: "Lost".to_string(),
            ..draft.clone()
        };
        assert!(matches!(bad_status.to_record(now), Err(AppError::Validation(_))));

        let bad_book = BookInstanceDraft {
            book: "not-an-id".to_string(),
            ..draft
        };
        assert!(matches!(bad_book.to_record(now), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_update_messages() {
        let validated = form("", " ", "Available", Some("01/06/2024")).validate(FormMode::Update);

        assert_eq!(
            validated.errors,
            vec![
                "Must select a book.".to_string(),
                "Imprint must not be empty.".to_string(),
                "Invalid due date".to_string(),
            ]
        );
    }

    #[test]
    fn test_shift_due_back() {
        let validated = form("b", "i", "Available", Some("2024-06-01"))
            .validate(FormMode::Update)
            .shift_due_back(Duration::days(1));

        assert!(validated.is_valid());
        assert_eq!(
            validated.draft.due_back,
            Some(Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_shift_past_latest_date_is_invalid() {
        let latest = NaiveDate::MAX.format("%Y-%m-%d").to_string();
        let validated = form("b", "i", "Available", Some(latest.as_str()))
            .validate(FormMode::Update);
        assert!(validated.is_valid());
        assert!(validated.draft.due_back.is_some());

        let shifted = validated.shift_due_back(Duration::hours(24));
        assert_eq!(shifted.errors, vec!["Invalid due date".to_string()]);
        assert_eq!(shifted.draft.due_back, None);
    }

    #[test]
    fn test_shift_without_due_back_is_noop() {
        let validated = form("b", "i", "Available", None)
            .validate(FormMode::Update)
            .shift_due_back(Duration::hours(24));
        assert!(validated.is_valid());
        assert_eq!(validated.draft.due_back, None);
    }
}
