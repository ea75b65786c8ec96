pub mod convert;
pub mod cwl;
pub mod error;
pub mod io;
pub mod model;
pub mod nodes;
pub mod workflow;

pub use error::{Result, ToolError};
