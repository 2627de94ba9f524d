use crate::service::TodoService;
use axum::extract::FromRef;
use todos_core::TodoEngine;

#[derive(Clone)]
pub struct TodoAppState<T: TodoEngine> {
    pub service: TodoService<T>,
    pub metrics_enabled: bool,
}

impl<T: TodoEngine> TodoAppState<T> {
    pub fn new_with_metrics(engine: T) -> Self {
        Self {
            service: TodoService::new(engine),
            metrics_enabled: true,
        }
    }

    pub fn new_without_metrics(engine: T) -> Self {
        Self {
            service: TodoService::new(engine),
            metrics_enabled: false,
        }
    }
}

impl<T: TodoEngine + Clone> FromRef<TodoAppState<T>> for TodoService<T> {
    fn from_ref(input: &TodoAppState<T>) -> Self {
        input.service.clone()
    }
}
