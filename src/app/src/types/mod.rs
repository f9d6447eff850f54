//! Domain-based type organization
//!
//! - binding: control descriptors and the control -> path table
//! - pipeline: save/restart task queue
//! - view: what the page renders

pub mod binding;
pub mod pipeline;
pub mod view;

pub use binding::*;
pub use pipeline::*;
pub use view::*;
