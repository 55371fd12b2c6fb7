//! Repository layer for database operations
//!
//! Handlers only see the traits below; [`Repository::postgres`] wires the sqlx
//! implementations, tests substitute their own.

pub mod book_instances;
pub mod books;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookInstance, BookTitle, NewBookInstance, PopulatedBookInstance},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookInstanceRepository: Send + Sync {
    /// All copies with their book resolved, in storage order
    async fn find_all_populated(&self) -> AppResult<Vec<PopulatedBookInstance>>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BookInstance>>;
    async fn find_by_id_populated(&self, id: Uuid) -> AppResult<Option<PopulatedBookInstance>>;
    /// Persist a new copy; the id is assigned here
    async fn create(&self, data: NewBookInstance) -> AppResult<BookInstance>;
    /// Replace the fields of an existing copy, `None` if no copy has this id
    async fn update(&self, id: Uuid, data: NewBookInstance) -> AppResult<Option<BookInstance>>;
    /// Returns whether a copy was removed
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn list_titles(&self) -> AppResult<Vec<BookTitle>>;
    async fn find_all(&self) -> AppResult<Vec<Book>>;
}

/// Repositories injected into the services
#[derive(Clone)]
pub struct Repository {
    pub book_instances: Arc<dyn BookInstanceRepository>,
    pub books: Arc<dyn BookRepository>,
}

impl Repository {
    pub fn new(
        book_instances: Arc<dyn BookInstanceRepository>,
        books: Arc<dyn BookRepository>,
    ) -> Self {
        Self {
            book_instances,
            books,
        }
    }

    /// Create Postgres-backed repositories sharing one pool
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self::new(
            Arc::new(book_instances::PgBookInstanceRepository::new(pool.clone())),
            Arc::new(books::PgBookRepository::new(pool)),
        )
    }
}

/// Foreign-key violations mean the referenced book does not exist
pub(crate) fn map_write_error(error: sqlx::Error, book: Uuid) -> AppError {
    if let sqlx::Error::Database(ref db_error) = error {
        if db_error.code().as_deref() == Some("23503") {
            return AppError::Validation(format!("Book {} does not exist", book));
        }
    }
    AppError::Database(error)
}
