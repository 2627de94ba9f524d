use bson::oid::ObjectId;
use bson::{Bson, Document, doc};
use chrono::{DateTime, Utc};
use engine::{PageSource, Window};
use error_stack::{IntoReport, Report, ResultExt};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::{Client, Database};
use optional_field::Field;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use todos_core::TodoRepository;
use todos_core::list_filter::TodoFilter;
use todos_core::model::{NewTodo, PatchTodo, Todo};
use todos_core::result::{OptRepoResult, RepoResult, TodoRepoError};
use tokio_stream::StreamExt;
use tracing::{debug, warn};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq, Clone, Copy)]
#[repr(transparent)]
#[schema(value_type = String)]
pub struct TodoId(#[serde(serialize_with = "obj_id_serialize")] ObjectId);

fn obj_id_serialize<S>(id: &ObjectId, ser: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    id.to_hex().serialize(ser)
}

impl TodoId {
    pub fn new_with(id: ObjectId) -> Self {
        Self(id)
    }
}

impl From<TodoId> for Bson {
    fn from(value: TodoId) -> Self {
        value.0.into()
    }
}

impl Display for TodoId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub enum ConnectionDetails {
    Url(String),
}

#[derive(Debug, thiserror::Error)]
#[error("failed to create client connection to mongodb instance")]
pub struct ConnectError;

#[derive(Debug, Serialize)]
struct NewTodoRecord {
    title: String,
    description: Option<String>,
    done: bool,
    created: DateTime<Utc>,
}

impl NewTodoRecord {
    fn new(title: String, description: Option<String>, created: DateTime<Utc>) -> Self {
        Self {
            title,
            description,
            done: false,
            created,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct MongoTodo {
    #[serde(rename = "_id")]
    id: TodoId,
    title: String,
    description: Option<String>,
    done: bool,
    created: DateTime<Utc>,
    updated: Option<DateTime<Utc>>,
}

impl From<MongoTodo> for Todo<TodoId> {
    fn from(value: MongoTodo) -> Self {
        Self {
            id: value.id,
            title: value.title,
            description: value.description,
            done: value.done,
            created: value.created,
            updated: value.updated,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TodoRepo {
    db: Database,
}

const TODOS_DB_NAME: &str = "todos";
const TODOS_COLLECTION_NAME: &str = "todos";

impl TodoRepo {
    pub fn new(client: Client) -> Self {
        Self {
            db: client.database(TODOS_DB_NAME),
        }
    }

    pub async fn init(
        connection_details: ConnectionDetails,
    ) -> Result<TodoRepo, Report<ConnectError>> {
        let client = match connection_details {
            ConnectionDetails::Url(url) => Client::with_uri_str(url)
                .await
                .change_context(ConnectError)?,
        };

        Ok(Self::new(client))
    }
}

fn filter_document(filters: &[TodoFilter]) -> Document {
    let mut filter = Document::new();

    for f in filters {
        match f {
            TodoFilter::Title(title) => {
                filter.insert(
                    "title",
                    bson::Regex {
                        pattern: escape_regex_literal(title),
                        options: String::from("i"),
                    },
                );
            }
            TodoFilter::Done(done) => {
                filter.insert("done", *done);
            }
        }
    }

    filter
}

// Escaped so the title text matches as a literal substring.
fn escape_regex_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if !c.is_alphanumeric() {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// The count and the fetch are two independent reads; a write landing
/// between them can leave the count and the window disagreeing. Snapshot
/// reads would need a causally consistent session against a replica set,
/// which this deployment does not assume, so the default two-read path of
/// [`PageSource::count_and_fetch`] is kept.
impl PageSource<[TodoFilter]> for TodoRepo {
    type Item = Todo<TodoId>;
    type Error = TodoRepoError;

    async fn count(&self, filters: &[TodoFilter]) -> Result<u64, Report<TodoRepoError>> {
        self.db
            .collection::<MongoTodo>(TODOS_COLLECTION_NAME)
            .count_documents(filter_document(filters))
            .await
            .change_context(TodoRepoError::Count)
    }

    async fn fetch(
        &self,
        filters: &[TodoFilter],
        window: Window,
    ) -> Result<Vec<Todo<TodoId>>, Report<TodoRepoError>> {
        let limit = if window.page_size() > i64::MAX as u64 {
            return Err(TodoRepoError::List.into_report()).attach_with(|| {
                format!(
                    "page_size '{}' is too large and is not supported",
                    window.page_size()
                )
            });
        } else {
            window.page_size() as i64
        };

        // `_id` ascending is the stable order that keeps windows
        // reproducible across repeated calls on unchanged data.
        let options = FindOptions::builder()
            .sort(doc! { "_id": 1 })
            .skip(window.offset())
            .limit(limit)
            .build();

        self.db
            .collection::<MongoTodo>(TODOS_COLLECTION_NAME)
            .find(filter_document(filters))
            .with_options(options)
            .await
            .change_context(TodoRepoError::List)?
            .map(|t| t.map(Todo::from))
            .collect::<Result<_, _>>()
            .await
            .change_context(TodoRepoError::List)
    }
}

impl TodoRepository for TodoRepo {
    type TodoId = TodoId;

    async fn get(&self, id: Self::TodoId) -> OptRepoResult<Todo<Self::TodoId>> {
        self.db
            .collection::<MongoTodo>(TODOS_COLLECTION_NAME)
            .find_one(doc! { "_id": id })
            .await
            .change_context(TodoRepoError::Get)
            .map(|t| t.map(From::from))
    }

    async fn create(&self, new_todo: NewTodo) -> RepoResult<Todo<Self::TodoId>> {
        let created = Utc::now();
        let record = NewTodoRecord::new(new_todo.title, new_todo.description, created);

        let result = self
            .db
            .collection::<NewTodoRecord>(TODOS_COLLECTION_NAME)
            .insert_one(&record)
            .await
            .change_context(TodoRepoError::Create)?;

        Ok(Todo {
            id: TodoId::new_with(
                result
                    .inserted_id
                    .as_object_id()
                    .ok_or(TodoRepoError::Create)
                    .attach_with(|| format!("inserted id for {record:?} was not an ObjectId"))?,
            ),
            title: record.title,
            description: record.description,
            done: record.done,
            created,
            updated: None,
        })
    }

    async fn patch(&self, id: Self::TodoId, patch: PatchTodo) -> OptRepoResult<Todo<Self::TodoId>> {
        let mut update_document = Document::new();
        if let Some(title) = patch.title {
            update_document.insert("title", title);
        }

        if let Field::Present(desc) = patch.description {
            match desc {
                Some(d) => {
                    update_document.insert("description", d);
                }
                None => {
                    update_document.insert("description", Bson::Null);
                }
            }
        }

        if let Some(done) = patch.done {
            update_document.insert("done", done);
        }

        if update_document.is_empty() {
            warn!("no todo patch fields specified, returning existing todo");
            return self.get(id).await.change_context(TodoRepoError::Patch);
        }

        update_document.insert("updated", Utc::now().to_rfc3339());

        debug!("updating document {:?}", update_document);

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.db
            .collection::<MongoTodo>(TODOS_COLLECTION_NAME)
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": update_document })
            .with_options(options)
            .await
            .change_context(TodoRepoError::Patch)
            .map(|t| t.map(From::from))
    }

    async fn delete(&self, id: Self::TodoId) -> OptRepoResult<()> {
        let result = self
            .db
            .collection::<MongoTodo>(TODOS_COLLECTION_NAME)
            .delete_one(doc! { "_id": id })
            .await
            .change_context(TodoRepoError::Delete)?;

        Ok((result.deleted_count > 0).then_some(()))
    }
}
