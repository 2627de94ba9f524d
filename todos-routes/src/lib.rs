use crate::error::TodoServiceError;
use error_stack::Report;

pub type ServiceResult<T> = Result<T, Report<TodoServiceError>>;
pub type OptServiceResult<T> = Result<Option<T>, Report<TodoServiceError>>;

pub mod error;
mod metrics;
pub mod routes;
pub mod service;
pub mod state;

#[cfg(test)]
mod tests;
