use chrono::{DateTime, Utc};
use optional_field::Field;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
}

impl NewTodo {
    pub fn new(title: String, description: Option<String>) -> Self {
        Self { title, description }
    }
}

/// Tri-state update: `title`/`done` update only when given, `description`
/// distinguishes "set to null" from "leave alone".
pub struct PatchTodo {
    pub title: Option<String>,
    pub description: Field<String>,
    pub done: Option<bool>,
}

impl PatchTodo {
    pub fn new(title: Option<String>, description: Field<String>, done: Option<bool>) -> Self {
        Self {
            title,
            description,
            done,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct Todo<T> {
    pub id: T,
    pub title: String,
    pub description: Option<String>,
    pub done: bool,
    pub created: DateTime<Utc>,
    pub updated: Option<DateTime<Utc>>,
}

impl<T> Todo<T> {
    pub fn create(id: T, title: String, description: Option<String>) -> Self {
        Self::new(id, title, description, false, Utc::now(), None)
    }

    pub fn new(
        id: T,
        title: String,
        description: Option<String>,
        done: bool,
        created: DateTime<Utc>,
        updated: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            done,
            created,
            updated,
        }
    }
}
