use engine::{ListCriteria, ListFilter, Tag, Window};

/// Conjunction members for the todo listing. An empty set matches all todos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoFilter {
    /// Case-insensitive substring match on the title.
    Title(String),
    Done(bool),
}

impl ListFilter for TodoFilter {
    type Criteria = TodoListCriteria;

    fn tag(&self) -> Tag {
        match self {
            TodoFilter::Title(_) => Tag::One,
            TodoFilter::Done(_) => Tag::Two,
        }
    }

    fn criteria(window: Window) -> Self::Criteria {
        TodoListCriteria::new(window)
    }
}

pub type TodoListCriteria = ListCriteria<TodoFilter>;
