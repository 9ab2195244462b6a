//! Chainable navigation over graph-database query responses.
//!
//! ```
//! use graphnav::domain::{NodeBuilder, NodeView, ResponseBuilder};
//!
//! let response = ResponseBuilder::new()
//!     .node(NodeBuilder::new("_root_").child(
//!         NodeBuilder::new("me")
//!             .str("name", "Clara")
//!             .child(NodeBuilder::new("follows").str("name", "Bob")),
//!     ))
//!     .build();
//!
//! let me = NodeView::from_root(&response).attribute("me");
//! assert_eq!(me.property("name").to_string_value(), "Clara");
//! assert_eq!(me.attribute("follows").property("name").to_string_value(), "Bob");
//! assert!(me.attribute("address").is_absent());
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod tree_traits;
pub mod util;

pub use domain::{NodeView, Response, ScalarView};
