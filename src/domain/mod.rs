//! Domain layer: shapes, timer and logger
//!
//! This layer is independent of external concerns (no file I/O, no CLI, no config loading).

pub mod error;
pub mod logger;
pub mod point;
pub mod render;
pub mod shape;
pub mod timer;
pub mod tree;

pub use error::{DomainError, DomainResult};
pub use logger::{
    DecoratorId, DecoratorKind, EmphasisDecorator, LogDecorator, Logger, Severity,
    TimestampDecorator,
};
pub use point::Point;
pub use render::TreeNodeConvert;
pub use shape::{Circle, Rectangle, Shape};
pub use timer::{stop_after, Delegate, Timer, TimerControl, TimerState};
pub use tree::{ShapeId, ShapeKind, ShapeNode, ShapeRef, ShapeTree, TreeIterator};
