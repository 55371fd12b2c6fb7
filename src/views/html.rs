//! HTML rendering for catalog views

use std::fmt::Write;

use super::{BookOption, FormView, View};
use crate::models::{
    book_instance::{self, BookInstanceStatus},
    form::escape_html,
    BookInstanceDraft, PopulatedBookInstance,
};

pub(super) fn render(view: &View) -> String {
    match view {
        View::BookInstanceList {
            title,
            book_instances,
        } => layout(title, &list_body(title, book_instances)),
        View::BookInstanceDetail {
            title,
            book_instance,
        } => layout(title, &detail_body(title, book_instance)),
        View::BookInstanceForm(form) => layout(form.title, &form_body(form)),
        View::BookInstanceDelete {
            title,
            book_instance,
        } => {
            let mut body = format!("<h1>{}</h1>\n", escape_html(title));
            let _ = write!(
                body,
                "<p><strong>ID:</strong> {id}</p>\n\
                 <p><strong>Imprint:</strong> {imprint}</p>\n\
                 <p>Do you really want to delete this book instance?</p>\n\
                 <form method=\"POST\">\n\
                 <input type=\"hidden\" name=\"bookinstanceid\" value=\"{id}\">\n\
                 <button type=\"submit\">Delete</button>\n\
                 </form>\n",
                id = book_instance.id,
                imprint = escape_html(&book_instance.imprint),
            );
            layout(title, &body)
        }
        View::Error { status, message } => layout(
            "Error",
            &format!(
                "<h1>{}</h1>\n<h2>{}</h2>\n",
                escape_html(message),
                status
            ),
        ),
    }
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n\
         <body>\n<nav><ul>\n\
         <li><a href=\"/catalog\">Home</a></li>\n\
         <li><a href=\"/catalog/bookinstances\">All book-instances</a></li>\n\
         <li><a href=\"/catalog/bookinstance/create\">Create new book instance (copy)</a></li>\n\
         </ul></nav>\n<main>\n{body}</main>\n</body>\n</html>\n",
        title = escape_html(title),
        body = body,
    )
}

fn status_class(status: BookInstanceStatus) -> &'static str {
    match status {
        BookInstanceStatus::Available => "text-success",
        BookInstanceStatus::Maintenance => "text-danger",
        BookInstanceStatus::Loaned | BookInstanceStatus::Reserved => "text-warning",
    }
}

fn list_body(title: &str, book_instances: &[PopulatedBookInstance]) -> String {
    let mut body = format!("<h1>{}</h1>\n", escape_html(title));
    if book_instances.is_empty() {
        body.push_str("<p>There are no book copies in this library.</p>\n");
        return body;
    }

    body.push_str("<ul>\n");
    for populated in book_instances {
        let instance = &populated.instance;
        let _ = write!(
            body,
            "<li><a href=\"{url}\">{title} : {imprint}</a> - <span class=\"{class}\">{status}</span>",
            url = book_instance::url(instance),
            title = escape_html(&populated.book.title),
            imprint = escape_html(&instance.imprint),
            class = status_class(instance.status),
            status = instance.status,
        );
        if instance.status != BookInstanceStatus::Available {
            let _ = write!(
                body,
                "<span> (Due: {})</span>",
                book_instance::due_back_formatted(instance)
            );
        }
        body.push_str("</li>\n");
    }
    body.push_str("</ul>\n");
    body
}

fn detail_body(title: &str, populated: &PopulatedBookInstance) -> String {
    let instance = &populated.instance;
    let mut body = format!(
        "<h1>ID: {}</h1>\n<p><strong>{}</strong> <a href=\"{}\">{}</a></p>\n",
        instance.id,
        escape_html(title),
        populated.book.url(),
        escape_html(&populated.book.title),
    );
    let _ = write!(
        body,
        "<p><strong>Imprint:</strong> {}</p>\n\
         <p><strong>Status:</strong> <span class=\"{}\">{}</span></p>\n",
        escape_html(&instance.imprint),
        status_class(instance.status),
        instance.status,
    );
    if instance.status != BookInstanceStatus::Available {
        let _ = writeln!(
            body,
            "<p><strong>Due back:</strong> {}</p>",
            book_instance::due_back_formatted(instance)
        );
    }
    let url = book_instance::url(instance);
    let _ = write!(
        body,
        "<hr>\n<p><a href=\"{url}/delete\">Delete BookInstance</a></p>\n\
         <p><a href=\"{url}/update\">Update BookInstance</a></p>\n",
    );
    body
}

fn book_select(options: &[BookOption]) -> String {
    let mut select = String::from(
        "<select id=\"book\" name=\"book\" required>\n<option value=\"\">--Please select a book--</option>\n",
    );
    for option in options {
        let _ = writeln!(
            select,
            "<option value=\"{}\"{}>{}</option>",
            option.id,
            if option.selected { " selected" } else { "" },
            escape_html(&option.title),
        );
    }
    select.push_str("</select>\n");
    select
}

fn status_select(current: Option<&str>) -> String {
    let mut select = String::from(
        "<select id=\"status\" name=\"status\" required>\n<option value=\"\">--Select a status--</option>\n",
    );
    for status in BookInstanceStatus::ALL {
        let _ = writeln!(
            select,
            "<option value=\"{status}\"{}>{status}</option>",
            if current == Some(status.as_str()) { " selected" } else { "" },
        );
    }
    select.push_str("</select>\n");
    select
}

fn form_body(form: &FormView) -> String {
    let draft: Option<&BookInstanceDraft> = form.book_instance.as_ref();
    let imprint = draft.map(|d| escape_html(&d.imprint)).unwrap_or_default();
    let due_back = draft
        .and_then(|d| d.due_back)
        .map(|due| due.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    let mut body = format!("<h1>{}</h1>\n<form method=\"POST\">\n", escape_html(form.title));
    let _ = write!(
        body,
        "<div><label for=\"book\">Book:</label>\n{books}</div>\n\
         <div><label for=\"imprint\">Imprint:</label>\n\
         <input id=\"imprint\" type=\"text\" name=\"imprint\" required value=\"{imprint}\"></div>\n\
         <div><label for=\"due_back\">Date when book available:</label>\n\
         <input id=\"due_back\" type=\"date\" name=\"due_back\" value=\"{due_back}\"></div>\n\
         <div><label for=\"status\">Status:</label>\n{statuses}</div>\n\
         <button type=\"submit\">Submit</button>\n</form>\n",
        books = book_select(&form.book_list),
        statuses = status_select(draft.map(|d| d.status.as_str())),
    );

    if !form.errors.is_empty() {
        body.push_str("<ul>\n");
        for error in &form.errors {
            let _ = writeln!(body, "<li>{}</li>", escape_html(error));
        }
        body.push_str("</ul>\n");
    }
    body
}
