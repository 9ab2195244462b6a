//! Application layer: loading response dumps and resolving paths into them
//!
//! This layer feeds domain views from files and user input.

pub mod error;
pub mod error_ext;
pub mod loader;
pub mod query;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use loader::{load_response, parse_response, resolve_response_path};
pub use query::{NodePath, Step};
