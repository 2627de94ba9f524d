use crate::error::TodoServiceError;
use crate::{OptServiceResult, ServiceResult};
use engine::Page;
use error_stack::ResultExt;
use optional_field::Field;
use todos_core::list_filter::TodoListCriteria;
use todos_core::model::{NewTodo, PatchTodo, Todo};
use todos_core::{TodoEngine, TodoRepository};
use tracing::instrument;

#[derive(Debug, Clone)]
pub struct TodoService<T> {
    engine: T,
}

impl<T> TodoService<T>
where
    T: TodoEngine,
    T::Repo: TodoRepository,
{
    pub fn new(engine: T) -> Self {
        TodoService { engine }
    }

    #[instrument(skip_all, name = "service#get")]
    pub async fn get(&self, id: T::TodoId) -> OptServiceResult<Todo<T::TodoId>> {
        self.engine
            .repo()
            .get(id)
            .await
            .change_context(TodoServiceError)
    }

    #[instrument(skip_all, name = "service#list")]
    pub async fn list(&self, criteria: TodoListCriteria) -> ServiceResult<Page<Todo<T::TodoId>>> {
        todos_core::list(&self.engine.repo(), criteria)
            .await
            .change_context(TodoServiceError)
    }

    #[instrument(skip_all, name = "service#create")]
    pub async fn create(
        &self,
        title: String,
        description: Option<String>,
    ) -> ServiceResult<Todo<T::TodoId>> {
        self.engine
            .repo()
            .create(NewTodo::new(title, description))
            .await
            .change_context(TodoServiceError)
    }

    #[instrument(skip_all, name = "service#delete")]
    pub async fn delete(&self, todo_id: T::TodoId) -> ServiceResult<Option<()>> {
        self.engine
            .repo()
            .delete(todo_id)
            .await
            .change_context(TodoServiceError)
    }

    #[instrument(skip_all, name = "service#update")]
    pub async fn patch(
        &self,
        todo_id: T::TodoId,
        title: Option<String>,
        description: Field<String>,
        done: Option<bool>,
    ) -> OptServiceResult<Todo<T::TodoId>> {
        self.engine
            .repo()
            .patch(todo_id, PatchTodo::new(title, description, done))
            .await
            .change_context(TodoServiceError)
    }
}
