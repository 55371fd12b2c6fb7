//! Book instance (copy) management service
//!
//! Each operation fetches or validates, then either renders a view or redirects.

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book_instance, BookInstanceDraft, BookInstanceForm, BookTitle, DeleteBookInstanceForm,
        FormMode, ValidatedForm,
    },
    repository::Repository,
    views::{BookOption, FormView, Page, View},
};

pub const LIST_URL: &str = "/catalog/bookinstances";

const LIST_TITLE: &str = "Book Instance List";
const DETAIL_TITLE: &str = "Book:";
const CREATE_TITLE: &str = "Create BookInstance";
const UPDATE_TITLE: &str = "Update book instance";
const DELETE_TITLE: &str = "Delete book instance";

/// Submitted dates come back one day early after parsing; updates add it back.
const UPDATE_DUE_BACK_OFFSET_HOURS: i64 = 24;

fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

fn not_found() -> AppError {
    AppError::NotFound("Book copy not found".to_string())
}

#[derive(Clone)]
pub struct BookInstanceService {
    repository: Repository,
}

impl BookInstanceService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all copies with their book
    pub async fn list(&self) -> AppResult<View> {
        let book_instances = self.repository.book_instances.find_all_populated().await?;
        Ok(View::BookInstanceList {
            title: LIST_TITLE,
            book_instances,
        })
    }

    /// Detail page of one copy
    pub async fn detail(&self, id: &str) -> AppResult<View> {
        let found = match parse_id(id) {
            Some(id) => self.repository.book_instances.find_by_id_populated(id).await?,
            None => None,
        };
        let book_instance = found.ok_or_else(not_found)?;

        Ok(View::BookInstanceDetail {
            title: DETAIL_TITLE,
            book_instance,
        })
    }

    /// Empty create form
    pub async fn create_form(&self) -> AppResult<View> {
        let books = self.repository.books.list_titles().await?;
        Ok(View::BookInstanceForm(FormView {
            title: CREATE_TITLE,
            book_list: BookOption::list(books, None),
            book_instance: None,
            errors: Vec::new(),
        }))
    }

    /// Validate a submission and persist it, or re-render the form with errors
    pub async fn create(&self, form: BookInstanceForm) -> AppResult<Page> {
        let ValidatedForm { draft, errors, .. } = form.validate(FormMode::Create);

        if !errors.is_empty() {
            let books = self.repository.books.list_titles().await?;
            let book_list = BookOption::list(books, Some(draft.book.as_str()));
            return Ok(Page::Render(View::BookInstanceForm(FormView {
                title: CREATE_TITLE,
                book_list,
                book_instance: Some(draft),
                errors,
            })));
        }

        let created = self
            .repository
            .book_instances
            .create(draft.to_record(Utc::now())?)
            .await?;
        tracing::info!("Created book instance id={} book={}", created.id, created.book);

        Ok(Page::Redirect(book_instance::url(&created)))
    }

    /// Delete confirmation page; an unknown copy sends the browser back to the list
    pub async fn delete_form(&self, id: &str) -> AppResult<Page> {
        let found = match parse_id(id) {
            Some(id) => self.repository.book_instances.find_by_id(id).await?,
            None => None,
        };

        match found {
            Some(book_instance) => Ok(Page::Render(View::BookInstanceDelete {
                title: DELETE_TITLE,
                book_instance,
            })),
            None => {
                tracing::debug!("Delete requested for unknown book instance {}", id);
                Ok(Page::Redirect(LIST_URL.to_string()))
            }
        }
    }

    /// Remove a copy; always redirects to the list
    pub async fn delete(&self, form: DeleteBookInstanceForm) -> AppResult<Page> {
        if let Some(id) = parse_id(&form.bookinstanceid) {
            if self.repository.book_instances.delete(id).await? {
                tracing::info!("Deleted book instance id={}", id);
            } else {
                tracing::debug!("Book instance {} already gone", id);
            }
        }
        Ok(Page::Redirect(LIST_URL.to_string()))
    }

    /// Update form pre-filled with the stored copy
    pub async fn update_form(&self, id: &str) -> AppResult<View> {
        let id = parse_id(id).ok_or_else(not_found)?;
        self.stored_update_form(id, Vec::new()).await
    }

    /// Validate a submission and apply it to the stored copy
    pub async fn update(&self, id: &str, form: BookInstanceForm) -> AppResult<Page> {
        let id = parse_id(id).ok_or_else(not_found)?;
        let ValidatedForm { draft, errors, .. } = form
            .validate(FormMode::Update)
            .shift_due_back(Duration::hours(UPDATE_DUE_BACK_OFFSET_HOURS));
        let draft = draft.with_id(id);

        if !errors.is_empty() {
            // The form shows the stored copy again, not the rejected values.
            let view = self.stored_update_form(id, errors).await?;
            return Ok(Page::Render(view));
        }

        let record = draft.to_record(Utc::now())?;
        match self.repository.book_instances.update(id, record).await? {
            Some(updated) => tracing::info!("Updated book instance id={}", updated.id),
            None => tracing::warn!("Book instance {} vanished before update", id),
        }

        Ok(Page::Redirect(book_instance::url_for(id)))
    }

    async fn stored_update_form(&self, id: Uuid, errors: Vec<String>) -> AppResult<View> {
        let (found, books) = tokio::try_join!(
            self.repository.book_instances.find_by_id_populated(id),
            self.repository.books.find_all(),
        )?;
        let populated = found.ok_or_else(not_found)?;

        let selected = populated.instance.book.to_string();
        let books = books.into_iter().map(BookTitle::from).collect();

        Ok(View::BookInstanceForm(FormView {
            title: UPDATE_TITLE,
            book_list: BookOption::list(books, Some(selected.as_str())),
            book_instance: Some(BookInstanceDraft::from(&populated.instance)),
            errors,
        }))
    }
}
