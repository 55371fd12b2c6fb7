//! Book instance (physical copy of a book) model and derived display fields

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::book::Book;
use crate::error::AppError;

/// Circulation status of a copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "book_instance_status")]
pub enum BookInstanceStatus {
    Available,
    Maintenance,
    Loaned,
    Reserved,
}

impl BookInstanceStatus {
    pub const ALL: [BookInstanceStatus; 4] = [
        BookInstanceStatus::Maintenance,
        BookInstanceStatus::Available,
        BookInstanceStatus::Loaned,
        BookInstanceStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookInstanceStatus::Available => "Available",
            BookInstanceStatus::Maintenance => "Maintenance",
            BookInstanceStatus::Loaned => "Loaned",
            BookInstanceStatus::Reserved => "Reserved",
        }
    }
}

impl Default for BookInstanceStatus {
    fn default() -> Self {
        BookInstanceStatus::Maintenance
    }
}

impl fmt::Display for BookInstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookInstanceStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(BookInstanceStatus::Available),
            "Maintenance" => Ok(BookInstanceStatus::Maintenance),
            "Loaned" => Ok(BookInstanceStatus::Loaned),
            "Reserved" => Ok(BookInstanceStatus::Reserved),
            other => Err(AppError::Validation(format!(
                "`{}` is not a valid book instance status",
                other
            ))),
        }
    }
}

/// Stored book instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BookInstance {
    pub id: Uuid,
    /// Referenced book id
    #[sqlx(rename = "book_id")]
    pub book: Uuid,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: DateTime<Utc>,
}

/// Book instance with its book reference resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulatedBookInstance {
    pub instance: BookInstance,
    pub book: Book,
}

/// Field values for a create or an in-place update
#[derive(Debug, Clone, PartialEq)]
pub struct NewBookInstance {
    pub book: Uuid,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: DateTime<Utc>,
}

/// Canonical URL of a book instance
pub fn url(instance: &BookInstance) -> String {
    url_for(instance.id)
}

pub fn url_for(id: Uuid) -> String {
    format!("/catalog/bookinstance/{}", id)
}

/// Medium-length display date, e.g. `Jun 2, 2024`
pub fn due_back_formatted(instance: &BookInstance) -> String {
    instance.due_back.format("%b %-d, %Y").to_string()
}

/// ISO date used to pre-fill the edit form, e.g. `2024-06-02`
pub fn due_back_formatted_update(instance: &BookInstance) -> String {
    instance.due_back.format("%Y-%m-%d").to_string()
}
