use engine::PageSource;
use list_filter::{TodoFilter, TodoListCriteria};
use model::{NewTodo, PatchTodo, Todo};
use result::{OptRepoResult, RepoResult, TodoRepoError};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use utoipa::ToSchema;

pub mod list_filter;
pub mod model;
pub mod result;

pub trait TodoEngine: Clone + Send + Sync + 'static {
    type TodoId: TodoId;
    type Repo: TodoRepository<TodoId = Self::TodoId> + Send + Sync + 'static;

    fn repo(&self) -> Self::Repo;
}

/// The record store a todo service runs against. Listing goes through the
/// [`PageSource`] supertrait so `engine::paginate` can drive the count and
/// windowed fetch against any implementation.
pub trait TodoRepository:
    PageSource<[TodoFilter], Item = Todo<Self::TodoId>, Error = TodoRepoError>
{
    type TodoId: TodoId;

    fn get(
        &self,
        id: Self::TodoId,
    ) -> impl Future<Output = OptRepoResult<Todo<Self::TodoId>>> + Send;

    fn create(
        &self,
        new_todo: NewTodo,
    ) -> impl Future<Output = RepoResult<Todo<Self::TodoId>>> + Send;

    fn patch(
        &self,
        id: Self::TodoId,
        patch: PatchTodo,
    ) -> impl Future<Output = OptRepoResult<Todo<Self::TodoId>>> + Send;

    fn delete(&self, id: Self::TodoId) -> impl Future<Output = OptRepoResult<()>> + Send;
}

/// Convenience for callers holding a repository and criteria.
pub async fn list<R>(repo: &R, criteria: TodoListCriteria) -> RepoResult<engine::Page<Todo<R::TodoId>>>
where
    R: TodoRepository + Sync,
{
    engine::paginate(repo, criteria.filters(), criteria.window()).await
}

pub trait TodoId:
    Debug + Send + Sync + Serialize + for<'de> Deserialize<'de> + Clone + ToSchema + PartialEq
{
}

impl<T> TodoId for T where
    T: Debug + Send + Sync + Serialize + for<'de> Deserialize<'de> + Clone + ToSchema + PartialEq
{
}
