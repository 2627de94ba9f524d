#[derive(Debug, thiserror::Error)]
#[error("todo service failed")]
pub struct TodoServiceError;
