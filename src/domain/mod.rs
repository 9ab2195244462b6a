//! Domain layer: the response tree and the views navigating it
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod error;
pub mod geometry;
pub mod response;
pub mod scalar;
pub mod timestamp;
pub mod view;

pub use builder::{NodeBuilder, ResponseBuilder};
pub use error::{DomainError, ScalarError};
pub use geometry::{Coord, Geometry};
pub use response::{Node, Property, Response, Value};
pub use scalar::ScalarView;
pub use view::NodeView;
