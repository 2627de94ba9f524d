use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::borrow::Cow;
use todos_core::TodoId;
use todos_core::model::Todo;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct TodoResponse<T> {
    #[serde(skip)]
    status_code: StatusCode,
    #[serde(flatten)]
    todo: Todo<T>,
}

impl<T> TodoResponse<T> {
    pub fn ok(todo: Todo<T>) -> Self {
        Self {
            status_code: StatusCode::OK,
            todo,
        }
    }

    pub fn created(todo: Todo<T>) -> Self {
        Self {
            status_code: StatusCode::CREATED,
            todo,
        }
    }
}

impl<T: TodoId> IntoResponse for TodoResponse<T> {
    fn into_response(self) -> Response {
        (self.status_code, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TodoError<T = ()> {
    #[serde(skip)]
    status_code: StatusCode,
    message: Cow<'static, str>,
    #[serde(flatten)]
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

pub type ErrorMessageType = Cow<'static, str>;

impl TodoError<()> {
    pub fn not_found() -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "the requested todo does not exist",
            None,
        )
    }

    pub fn bad_request(message: impl Into<ErrorMessageType>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message.into(), None)
    }
}

impl<T: Serialize> TodoError<T> {
    pub fn new(
        status_code: StatusCode,
        message: impl Into<ErrorMessageType>,
        data: Option<T>,
    ) -> Self {
        Self {
            status_code,
            message: message.into(),
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for TodoError<T> {
    fn into_response(self) -> Response {
        (self.status_code, Json(self)).into_response()
    }
}
