use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::application::error::HttpError;
use crate::application::todos::OwnerListing;
use crate::domain::entities::TodoRecord;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

/// One row of the board; carries what the edit and delete forms post back.
#[derive(Clone)]
pub struct TodoRowView {
    pub id: u64,
    pub task: String,
    pub owner: String,
    pub action_href: String,
}

impl From<&TodoRecord> for TodoRowView {
    fn from(record: &TodoRecord) -> Self {
        Self {
            id: record.id,
            task: record.task.clone(),
            owner: record.owner.clone(),
            action_href: format!("/todos/{}", record.id),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct BoardTemplate {
    pub todos: Vec<TodoRowView>,
    pub total_count: usize,
}

impl BoardTemplate {
    pub fn from_records(records: &[TodoRecord]) -> Self {
        Self {
            todos: records.iter().map(TodoRowView::from).collect(),
            total_count: records.len(),
        }
    }
}

#[derive(Template)]
#[template(path = "todos.html")]
pub struct TodoListTemplate {
    pub todos: Vec<TodoRowView>,
    pub owner: Option<String>,
    pub heading: String,
}

impl TodoListTemplate {
    pub fn from_listing(listing: OwnerListing) -> Self {
        let heading = match listing.owner.as_deref() {
            Some(owner) => format!("Todos for {owner}"),
            None => "All todos".to_string(),
        };
        Self {
            todos: listing.todos.iter().map(TodoRowView::from).collect(),
            owner: listing.owner,
            heading,
        }
    }
}
