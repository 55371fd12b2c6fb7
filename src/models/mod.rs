//! Data models for the catalog

pub mod book;
pub mod book_instance;
pub mod form;

// Re-export commonly used types
pub use book::{Book, BookTitle};
pub use book_instance::{BookInstance, BookInstanceStatus, NewBookInstance, PopulatedBookInstance};
pub use form::{BookInstanceDraft, BookInstanceForm, DeleteBookInstanceForm, FormMode, ValidatedForm};
