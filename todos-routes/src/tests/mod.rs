use chrono::{DateTime, TimeZone, Utc};
use engine::{PageSource, Window};
use error_stack::Report;
use optional_field::Field;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use todos_core::list_filter::TodoFilter;
use todos_core::model::{NewTodo, PatchTodo, Todo};
use todos_core::result::{OptRepoResult, RepoResult, TodoRepoError};
use todos_core::{TodoEngine, TodoRepository};

mod todo_endpoints;

pub type TestTodo = Todo<u32>;

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn todo(id: u32, title: &str, done: bool) -> TestTodo {
    Todo::new(id, title.to_owned(), None, done, fixed_time(), None)
}

/// In-memory stand-in for the real repository. Keeps todos sorted by id,
/// which is its stable listing order, and counts every store access so
/// tests can assert that rejected requests never reach it.
#[derive(Debug, Clone, Default)]
pub struct FakeRepo {
    todos: Arc<Mutex<Vec<TestTodo>>>,
    fail: bool,
    store_calls: Arc<AtomicUsize>,
}

impl FakeRepo {
    pub fn seeded(todos: Vec<TestTodo>) -> Self {
        Self {
            todos: Arc::new(Mutex::new(todos)),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn store_calls(&self) -> usize {
        self.store_calls.load(Ordering::SeqCst)
    }

    fn matching(&self, filters: &[TodoFilter]) -> Vec<TestTodo> {
        let mut todos: Vec<_> = self
            .todos
            .lock()
            .unwrap()
            .iter()
            .filter(|t| filters.iter().all(|f| matches(f, t)))
            .cloned()
            .collect();
        todos.sort_by_key(|t| t.id);
        todos
    }
}

fn matches(filter: &TodoFilter, todo: &TestTodo) -> bool {
    match filter {
        TodoFilter::Title(text) => todo.title.to_lowercase().contains(&text.to_lowercase()),
        TodoFilter::Done(done) => todo.done == *done,
    }
}

impl PageSource<[TodoFilter]> for FakeRepo {
    type Item = TestTodo;
    type Error = TodoRepoError;

    async fn count(&self, filters: &[TodoFilter]) -> Result<u64, Report<TodoRepoError>> {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Report::new(TodoRepoError::Count));
        }
        Ok(self.matching(filters).len() as u64)
    }

    async fn fetch(
        &self,
        filters: &[TodoFilter],
        window: Window,
    ) -> Result<Vec<TestTodo>, Report<TodoRepoError>> {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Report::new(TodoRepoError::List));
        }
        Ok(self
            .matching(filters)
            .into_iter()
            .skip(window.offset() as usize)
            .take(window.page_size() as usize)
            .collect())
    }
}

impl TodoRepository for FakeRepo {
    type TodoId = u32;

    async fn get(&self, id: u32) -> OptRepoResult<TestTodo> {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Report::new(TodoRepoError::Get));
        }
        Ok(self.todos.lock().unwrap().iter().find(|t| t.id == id).cloned())
    }

    async fn create(&self, new_todo: NewTodo) -> RepoResult<TestTodo> {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Report::new(TodoRepoError::Create));
        }
        let mut todos = self.todos.lock().unwrap();
        let id = todos.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let todo = Todo::new(
            id,
            new_todo.title,
            new_todo.description,
            false,
            fixed_time(),
            None,
        );
        todos.push(todo.clone());
        Ok(todo)
    }

    async fn patch(&self, id: u32, patch: PatchTodo) -> OptRepoResult<TestTodo> {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Report::new(TodoRepoError::Patch));
        }
        let mut todos = self.todos.lock().unwrap();
        let Some(todo) = todos.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            todo.title = title;
        }
        if let Field::Present(description) = patch.description {
            todo.description = description;
        }
        if let Some(done) = patch.done {
            todo.done = done;
        }
        todo.updated = Some(fixed_time());

        Ok(Some(todo.clone()))
    }

    async fn delete(&self, id: u32) -> OptRepoResult<()> {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Report::new(TodoRepoError::Delete));
        }
        let mut todos = self.todos.lock().unwrap();
        let before = todos.len();
        todos.retain(|t| t.id != id);
        Ok((todos.len() < before).then_some(()))
    }
}

#[derive(Debug, Clone)]
pub struct FakeEngine {
    repo: FakeRepo,
}

impl FakeEngine {
    pub fn new(repo: FakeRepo) -> Self {
        Self { repo }
    }
}

impl TodoEngine for FakeEngine {
    type TodoId = u32;
    type Repo = FakeRepo;

    fn repo(&self) -> FakeRepo {
        self.repo.clone()
    }
}
