//! Book instances repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Pool, Postgres};
use uuid::Uuid;

use super::{map_write_error, BookInstanceRepository};
use crate::{
    error::AppResult,
    models::{Book, BookInstance, BookInstanceStatus, NewBookInstance, PopulatedBookInstance},
};

const POPULATED_SELECT: &str = r#"
    SELECT bi.id, bi.book_id, bi.imprint, bi.status, bi.due_back,
           b.title AS book_title, b.summary AS book_summary, b.isbn AS book_isbn
    FROM book_instances bi
    JOIN books b ON b.id = bi.book_id
"#;

/// Row of a book instance joined with its book
#[derive(Debug, FromRow)]
struct PopulatedRow {
    id: Uuid,
    book_id: Uuid,
    imprint: String,
    status: BookInstanceStatus,
    due_back: DateTime<Utc>,
    book_title: String,
    book_summary: String,
    book_isbn: String,
}

impl From<PopulatedRow> for PopulatedBookInstance {
    fn from(row: PopulatedRow) -> Self {
        Self {
            instance: BookInstance {
                id: row.id,
                book: row.book_id,
                imprint: row.imprint,
                status: row.status,
                due_back: row.due_back,
            },
            book: Book {
                id: row.book_id,
                title: row.book_title,
                summary: row.book_summary,
                isbn: row.book_isbn,
            },
        }
    }
}

#[derive(Clone)]
pub struct PgBookInstanceRepository {
    pool: Pool<Postgres>,
}

impl PgBookInstanceRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookInstanceRepository for PgBookInstanceRepository {
    async fn find_all_populated(&self) -> AppResult<Vec<PopulatedBookInstance>> {
        let rows = sqlx::query_as::<_, PopulatedRow>(POPULATED_SELECT)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(PopulatedBookInstance::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        let row = sqlx::query_as::<_, BookInstance>(
            "SELECT id, book_id, imprint, status, due_back FROM book_instances WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_by_id_populated(&self, id: Uuid) -> AppResult<Option<PopulatedBookInstance>> {
        let query = format!("{} WHERE bi.id = $1", POPULATED_SELECT);
        let row = sqlx::query_as::<_, PopulatedRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(PopulatedBookInstance::from))
    }

    async fn create(&self, data: NewBookInstance) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>(
            r#"
            INSERT INTO book_instances (id, book_id, imprint, status, due_back)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, book_id, imprint, status, due_back
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.book)
        .bind(&data.imprint)
        .bind(data.status)
        .bind(data.due_back)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, data.book))
    }

    async fn update(&self, id: Uuid, data: NewBookInstance) -> AppResult<Option<BookInstance>> {
        sqlx::query_as::<_, BookInstance>(
            r#"
            UPDATE book_instances
            SET book_id = $2, imprint = $3, status = $4, due_back = $5
            WHERE id = $1
            RETURNING id, book_id, imprint, status, due_back
            "#,
        )
        .bind(id)
        .bind(data.book)
        .bind(&data.imprint)
        .bind(data.status)
        .bind(data.due_back)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, data.book))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
