//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns field errors, not panic.

pub mod pagination;
pub mod todo;
pub mod validation;

pub use pagination::{Paginated, Pagination, PaginationParams, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use todo::{
    NewTodo, Todo, TodoChanges, TodoCreate, TodoListResponse, TodoResponse, TodoUpdate,
    DESCRIPTION_MAX_LEN, TITLE_MAX_LEN, TITLE_MIN_LEN,
};
pub use validation::{BodyFields, FieldError, FromJsonBody, ValidationError};
