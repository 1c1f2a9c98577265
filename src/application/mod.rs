//! Application layer: services and use cases
//!
//! This layer turns scene files and settings into domain objects and drives them.

pub mod error;
pub mod error_ext;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
