use engine::patch_field_schema;
use optional_field::{Field, serde_optional_fields};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTodoRequest {
    pub title: String,
    pub description: Option<String>,
}

#[serde_optional_fields]
#[derive(Debug, Deserialize, ToSchema)]
pub struct TodoPatchRequest {
    /// The new title of the todo. If set to null or not specified, no update will happen.
    pub title: Option<String>,
    /// The new description of the todo. Can be null. If specified as null, the description
    /// will update to null. If not specified, no update will happen.
    #[schema(schema_with = patch_field_schema)]
    pub description: Field<String>,
    /// The new done state. If not specified, no update will happen.
    pub done: Option<bool>,
}

/// Filter parameters for the listing. All given filters must match.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TodoSearch {
    pub title: Option<String>,
    pub done: Option<bool>,
}
