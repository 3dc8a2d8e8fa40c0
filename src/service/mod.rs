//! Todo operations and payload validation.

mod todo;
mod validation;
pub use todo::{TodoListResponse, TodoService};
pub use validation::RequestValidator;
