use error_stack::Report;

pub type RepoResult<T> = Result<T, Report<TodoRepoError>>;
pub type OptRepoResult<T> = Result<Option<T>, Report<TodoRepoError>>;

#[derive(Debug, thiserror::Error)]
pub enum TodoRepoError {
    #[error("failed to get todo")]
    Get,
    #[error("failed to count todos")]
    Count,
    #[error("failed to list todos")]
    List,
    #[error("failed to create todo")]
    Create,
    #[error("failed to patch todo")]
    Patch,
    #[error("failed to delete todo")]
    Delete,
}
