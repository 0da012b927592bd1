use std::sync::Arc;

use axum::{
    Router,
    extract::{Form, Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use url::form_urlencoded;

use crate::{
    application::{
        error::HttpError,
        todos::{CreateTodoCommand, TodoActionCommand, TodoService},
    },
    domain::entities::TodoId,
    presentation::views::{BoardTemplate, TodoListTemplate, render_template_response},
};

use super::{
    middleware::{log_responses, set_request_context},
    todo_error_to_http,
};

#[derive(Clone)]
pub struct HttpState {
    pub todos: Arc<TodoService>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/create-todo", post(create_todo))
        .route("/todos", get(list_todos))
        .route("/todos/{todo_id}", post(todo_action).delete(delete_todo))
        .route("/_health", get(health))
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

#[derive(Debug, Deserialize)]
struct CreateTodoForm {
    task: String,
    owner: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwnerQuery {
    owner: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeleteTodoForm {
    owner: String,
}

#[derive(Debug, Deserialize)]
struct TodoActionForm {
    method: String,
    task: Option<String>,
    owner: String,
}

fn owner_list_location(owner: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("owner", owner)
        .finish();
    format!("/todos?{query}")
}

async fn index(State(state): State<HttpState>) -> Result<Response, HttpError> {
    const SOURCE: &str = "infra::http::todos::index";

    let snapshot = state
        .todos
        .snapshot()
        .await
        .map_err(|err| todo_error_to_http(SOURCE, err))?;

    Ok(render_template_response(
        BoardTemplate::from_records(&snapshot),
        StatusCode::OK,
    ))
}

async fn create_todo(
    State(state): State<HttpState>,
    Form(form): Form<CreateTodoForm>,
) -> Result<Redirect, HttpError> {
    state
        .todos
        .create(CreateTodoCommand {
            task: form.task,
            owner: form.owner,
        })
        .await
        .map_err(|err| todo_error_to_http("infra::http::todos::create_todo", err))?;

    Ok(Redirect::to("/"))
}

async fn list_todos(
    State(state): State<HttpState>,
    Query(query): Query<OwnerQuery>,
) -> Result<Response, HttpError> {
    let listing = state
        .todos
        .list_for_owner(query.owner.as_deref())
        .await
        .map_err(|err| todo_error_to_http("infra::http::todos::list_todos", err))?;

    Ok(render_template_response(
        TodoListTemplate::from_listing(listing),
        StatusCode::OK,
    ))
}

async fn delete_todo(
    State(state): State<HttpState>,
    Path(todo_id): Path<TodoId>,
    Form(form): Form<DeleteTodoForm>,
) -> Result<Redirect, HttpError> {
    state
        .todos
        .delete(todo_id, &form.owner)
        .await
        .map_err(|err| todo_error_to_http("infra::http::todos::delete_todo", err))?;

    Ok(Redirect::to(&owner_list_location(&form.owner)))
}

async fn todo_action(
    State(state): State<HttpState>,
    Path(todo_id): Path<TodoId>,
    Form(form): Form<TodoActionForm>,
) -> Result<Redirect, HttpError> {
    let location = owner_list_location(&form.owner);

    state
        .todos
        .apply_action(TodoActionCommand {
            id: todo_id,
            method: form.method,
            task: form.task,
            owner: form.owner,
        })
        .await
        .map_err(|err| todo_error_to_http("infra::http::todos::todo_action", err))?;

    Ok(Redirect::to(&location))
}

async fn health() -> Response {
    StatusCode::NO_CONTENT.into_response()
}
