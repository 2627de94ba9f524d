use crate::error::TodoServiceError;
use crate::metrics;
use crate::routes::requests::{TodoPatchRequest, TodoSearch};
use crate::routes::responses::TodoError;
use crate::service::TodoService;
use crate::state::TodoAppState;
use axum::middleware::{self};
use axum::routing::patch;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response, Result},
    routing::{delete, get, post},
};
use engine::error::EndpointError;
use engine::pagination::MAX_PAGE_SIZE;
use engine::{ListFilter, Page, Pagination, Window, WindowLimits};
use requests::CreateTodoRequest;
use responses::TodoResponse;
use serde::{Deserialize, Serialize};
use todos_core::TodoEngine;
use todos_core::list_filter::TodoFilter;
use todos_core::model::Todo;
use tracing::{info, instrument};
use utoipa::OpenApi;
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

mod requests;
mod responses;

const TODO_ROOT_PATH: &str = "/todos";

#[derive(OpenApi)]
#[openapi(
    nest(
        (path = TODO_ROOT_PATH, api = TodoDocs),
    )
)]
struct ApiDoc;

#[derive(OpenApi)]
#[openapi(paths(list_todos, get_todo, create_todo, delete_todo, patch_todo,))]
struct TodoDocs;

const DEFAULT_TODO_PAGE_SIZE: u64 = 10;

const TODO_LIST_PATH: &str = "/";
const TODO_GET_PATH: &str = "/{todo_id}";
const TODO_CREATE_PATH: &str = "/";
const TODO_DELETE_PATH: &str = "/{todo_id}";
const TODO_PATCH_PATH: &str = "/{todo_id}";

pub fn build<T: TodoEngine>(app_state: TodoAppState<T>) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(routes(app_state))
        .split_for_parts();

    router.merge(SwaggerUi::new("/todos/swagger-ui").url("/todos/api-docs/openapi.json", api))
}

fn routes<S, T: TodoEngine>(app_state: TodoAppState<T>) -> OpenApiRouter<S> {
    let main_router = OpenApiRouter::new()
        .route(TODO_LIST_PATH, get(list_todos))
        .route(TODO_GET_PATH, get(get_todo))
        .route(TODO_CREATE_PATH, post(create_todo))
        .route(TODO_DELETE_PATH, delete(delete_todo))
        .route(TODO_PATCH_PATH, patch(patch_todo));

    let router = if app_state.metrics_enabled {
        info!("metrics enabled, setting up metrics handler");
        let metrics_recorder = metrics::setup_recorder();
        main_router
            .route("/metrics", get(|| async move { metrics_recorder.render() }))
            .route_layer(middleware::from_fn(metrics::track_http))
    } else {
        info!("metrics not enabled, setting up service unavailable metrics handler");
        main_router
            .route("/metrics", get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "Metrics endpoint is disabled. Metrics must be enabled and the service restarted")}))
    };

    OpenApiRouter::new()
        .nest(TODO_ROOT_PATH, router)
        .with_state(app_state)
}

#[derive(Debug, ToSchema, Serialize, Deserialize, Copy, Clone, PartialEq, Eq)]
/// The type of the ID that identifies a Todo.
/// This changes depending on how the app is configured.
struct IdType;

type ResponseType = Todo<IdType>;

/// List one page of todos, with the total count across all pages.
#[utoipa::path(
    get,
    path = TODO_LIST_PATH,
    responses(
        (status = OK, description = "One page of todos plus count metadata. The items array is empty when the page lies beyond the last one", body = Page<ResponseType>),
        (status = BAD_REQUEST, description = "The page or page_size parameters are out of range", body = TodoError),
    ),
    params(
        ("page" = u64, Query, description = "The 1-indexed page to return"),
        ("page_size" = u64, Query, description = "The max number of todos to return"),
        ("title" = Option<String>, Query, description = "Keep todos whose title contains this text, ignoring case"),
        ("done" = Option<bool>, Query, description = "Keep todos with this done state"),
    )
)]
#[instrument(skip(service, search), err(Debug), fields(req.page = pagination.page, req.page_size = pagination.page_size))]
pub async fn list_todos<T>(
    State(service): State<TodoService<T>>,
    Query(pagination): Query<Pagination>,
    Query(search): Query<TodoSearch>,
) -> Result<Response, EndpointError<TodoServiceError>>
where
    T: TodoEngine + Send + Sync + 'static,
{
    let limits = WindowLimits {
        default_page_size: DEFAULT_TODO_PAGE_SIZE,
        max_page_size: MAX_PAGE_SIZE,
    };

    // rejected before the repository sees anything
    let window = match Window::try_new(pagination, limits) {
        Ok(window) => window,
        Err(e) => return Ok(TodoError::bad_request(e.to_string()).into_response()),
    };

    let mut criteria = TodoFilter::criteria(window);
    if let Some(title) = search.title {
        criteria.add(TodoFilter::Title(title));
    }
    if let Some(done) = search.done {
        criteria.add(TodoFilter::Done(done));
    }

    let page = service.list(criteria).await?;

    metrics::increment_todos_retrieved_by(page.items.len());

    Ok(Json(page).into_response())
}

/// Get the todo associated with the given id.
#[utoipa::path(
    get,
    path = TODO_GET_PATH,
    responses(
        (status = OK, description = "A todo was found that matched the given TodoId", body = ResponseType),
        (status = NOT_FOUND, description = "No todos with the given TodoId were found"),
    ),
    params(
        ("todo_id" = IdType, Path, description = "The TodoId to find"),
    )
)]
#[instrument(skip(service), err(Debug))]
pub async fn get_todo<T>(
    State(service): State<TodoService<T>>,
    Path(todo_id): Path<T::TodoId>,
) -> Result<Response, EndpointError<TodoServiceError>>
where
    T: TodoEngine,
{
    let todo = service.get(todo_id).await?;

    Ok(todo
        .map(|t| TodoResponse::ok(t).into_response())
        .unwrap_or_else(|| TodoError::not_found().into_response()))
}

/// Create a new Todo and return it, id included.
#[utoipa::path(
    post,
    path = TODO_CREATE_PATH,
    responses(
        (status = CREATED, description = "A todo was successfully created", body = ResponseType),
        (status = UNPROCESSABLE_ENTITY, description = "The title in the request was null or missing"),
    ),
    request_body = CreateTodoRequest
)]
#[instrument(skip_all, err(Debug), fields(req.title = todo.title, req.description = todo.description))]
async fn create_todo<T>(
    State(service): State<TodoService<T>>,
    Json(todo): Json<CreateTodoRequest>,
) -> Result<Response, EndpointError<TodoServiceError>>
where
    T: TodoEngine,
{
    let new_todo = service.create(todo.title, todo.description).await?;

    metrics::increment_todos_created();

    Ok(TodoResponse::created(new_todo).into_response())
}

/// Delete the todo associated with the given id.
#[utoipa::path(
    delete,
    path = TODO_DELETE_PATH,
    responses(
        (status = NO_CONTENT, description = "The todo was successfully deleted"),
        (status = NOT_FOUND, description = "No todos with the given TodoId were found"),
    ),
    params(
        ("todo_id" = IdType, Path, description = "The ID of the todo to delete")
    )
)]
#[instrument(skip(service), err(Debug))]
pub async fn delete_todo<T>(
    State(service): State<TodoService<T>>,
    Path(todo_id): Path<T::TodoId>,
) -> Result<Response, EndpointError<TodoServiceError>>
where
    T: TodoEngine,
{
    match service.delete(todo_id).await? {
        Some(_) => {
            metrics::increment_todos_deleted();
            Ok(StatusCode::NO_CONTENT.into_response())
        }
        None => Ok(TodoError::not_found().into_response()),
    }
}

/// Update the todo associated with the given id using the given information.
#[utoipa::path(
    patch,
    path = TODO_PATCH_PATH,
    responses(
        (status = OK, description = "The todo was successfully patched", body = ResponseType),
        (status = NOT_FOUND, description = "The todo was not found so could not be updated"),
    ),
    params(
        ("todo_id" = IdType, Path, description = "The TodoId to patch")
    ),
    request_body = TodoPatchRequest,
)]
#[instrument(skip(service, todo), err(Debug), fields(
    todo.title = todo.title,
    todo.done = todo.done,
))]
pub async fn patch_todo<T>(
    State(service): State<TodoService<T>>,
    Path(todo_id): Path<T::TodoId>,
    Json(todo): Json<TodoPatchRequest>,
) -> Result<Response, EndpointError<TodoServiceError>>
where
    T: TodoEngine,
{
    let updated = service
        .patch(todo_id, todo.title, todo.description, todo.done)
        .await?;

    let res = match updated {
        Some(t) => {
            metrics::increment_todos_patched();
            TodoResponse::ok(t).into_response()
        }
        None => TodoError::not_found().into_response(),
    };

    Ok(res)
}
