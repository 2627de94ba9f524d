use utoipa::PartialSchema;
use utoipa::openapi::{RefOr, Schema};

pub mod app;
pub mod error;
mod list_criteria;
pub mod pagination;

pub use list_criteria::{ListCriteria, ListFilter, Tag};
pub use pagination::{Page, PageSource, Pagination, Window, WindowError, WindowLimits, paginate};

/// OpenAPI schema for `optional_field::Field` request fields, which serde
/// treats as present-null / present-value / absent.
pub fn patch_field_schema() -> impl Into<RefOr<Schema>> {
    <Option<String> as PartialSchema>::schema()
}
