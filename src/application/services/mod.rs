//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.

mod countdown;
mod journal;
mod scene;

pub use countdown::CountdownService;
pub use journal::JournalService;
pub use scene::{Scene, SceneFile, SceneService, ShapeSpec};
