//! Book instance (copy) endpoints

use axum::{
    extract::{Path, State},
    response::Html,
    Form,
};

use crate::{
    error::AppResult,
    models::{BookInstanceForm, DeleteBookInstanceForm},
    views::Page,
    AppState,
};

/// List all book instances
pub async fn list(State(state): State<AppState>) -> AppResult<Html<String>> {
    let view = state.services.book_instances.list().await?;
    Ok(Html(view.render()))
}

/// Book instance detail page
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let view = state.services.book_instances.detail(&id).await?;
    Ok(Html(view.render()))
}

/// Book instance create form
pub async fn create_get(State(state): State<AppState>) -> AppResult<Html<String>> {
    let view = state.services.book_instances.create_form().await?;
    Ok(Html(view.render()))
}

/// Handle book instance create
pub async fn create_post(
    State(state): State<AppState>,
    Form(form): Form<BookInstanceForm>,
) -> AppResult<Page> {
    state.services.book_instances.create(form).await
}

/// Book instance delete confirmation
pub async fn delete_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Page> {
    state.services.book_instances.delete_form(&id).await
}

/// Handle book instance delete; the id comes from the form body
pub async fn delete_post(
    State(state): State<AppState>,
    Form(form): Form<DeleteBookInstanceForm>,
) -> AppResult<Page> {
    state.services.book_instances.delete(form).await
}

/// Book instance update form
pub async fn update_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let view = state.services.book_instances.update_form(&id).await?;
    Ok(Html(view.render()))
}

/// Handle book instance update
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<BookInstanceForm>,
) -> AppResult<Page> {
    state.services.book_instances.update(&id, form).await
}
