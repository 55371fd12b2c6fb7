//! View models produced by the catalog handlers
//!
//! Services return a [`Page`]: either a named view with its data or a redirect.
//! HTML generation lives in [`html`].

mod html;

use axum::response::{Html, IntoResponse, Redirect, Response};
use uuid::Uuid;

use crate::models::{BookInstance, BookInstanceDraft, BookTitle, PopulatedBookInstance};

/// Entry of a book selection list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookOption {
    pub id: Uuid,
    pub title: String,
    pub selected: bool,
}

impl BookOption {
    /// Build options, flagging the entry whose id matches `selected`
    pub fn list(books: Vec<BookTitle>, selected: Option<&str>) -> Vec<BookOption> {
        books
            .into_iter()
            .map(|book| BookOption {
                selected: selected.is_some_and(|id| book.id.to_string() == id),
                id: book.id,
                title: book.title,
            })
            .collect()
    }
}

/// Create/update form data
#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub title: &'static str,
    pub book_list: Vec<BookOption>,
    /// Prior values, absent on a fresh create form
    pub book_instance: Option<BookInstanceDraft>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    BookInstanceList {
        title: &'static str,
        book_instances: Vec<PopulatedBookInstance>,
    },
    BookInstanceDetail {
        title: &'static str,
        book_instance: PopulatedBookInstance,
    },
    BookInstanceForm(FormView),
    BookInstanceDelete {
        title: &'static str,
        book_instance: BookInstance,
    },
    Error {
        status: u16,
        message: String,
    },
}

impl View {
    pub fn render(&self) -> String {
        html::render(self)
    }
}

/// Handler outcome: render a view or send the browser elsewhere
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Render(View),
    Redirect(String),
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        match self {
            Page::Render(view) => Html(view.render()).into_response(),
            Page::Redirect(location) => Redirect::to(&location).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::LOCATION, StatusCode};

    #[test]
    fn test_book_option_selection() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let books = vec![
            BookTitle { id: first, title: "Dune".into() },
            BookTitle { id: second, title: "Emma".into() },
        ];

        let options = BookOption::list(books.clone(), Some(second.to_string().as_str()));
        assert_eq!(
            options.iter().filter(|o| o.selected).map(|o| o.id).collect::<Vec<_>>(),
            vec![second]
        );

        assert!(BookOption::list(books, None).iter().all(|o| !o.selected));
    }

    #[test]
    fn test_redirect_response() {
        let response = Page::Redirect("/catalog/bookinstances".into()).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/catalog/bookinstances");
    }
}
