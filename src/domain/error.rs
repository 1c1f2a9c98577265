//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::timer::TimerState;
use crate::domain::tree::ShapeId;

/// Domain errors represent violated shape or state-machine invariants.
/// These are independent of I/O and configuration concerns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("invalid argument: circle radius must be positive with a finite square, got {0}")]
    InvalidRadius(f64),

    #[error("invalid argument: shape center must be finite, got ({x}, {y})")]
    InvalidCenter { x: f64, y: f64 },

    #[error("invalid argument: rectangle half-extent must be non-negative and finite, got ({x}, {y})")]
    InvalidHalfExtent { x: f64, y: f64 },

    #[error("invalid argument: adding {child} to {parent} would create a containment cycle")]
    CycleDetected { parent: ShapeId, child: ShapeId },

    #[error("invalid argument: {child} is already owned by {owner}")]
    AlreadyOwned { child: ShapeId, owner: ShapeId },

    #[error("shape is not a composite: {0}")]
    NotComposite(ShapeId),

    #[error("unknown shape: {0}")]
    UnknownShape(ShapeId),

    #[error("invalid timer transition: cannot {action} while {state:?}")]
    InvalidTransition {
        state: TimerState,
        action: &'static str,
    },
}

impl DomainError {
    /// True for the errors raised by argument validation: bad geometry or
    /// a composite edge that breaks the ownership/cycle invariants.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidRadius(_)
                | DomainError::InvalidCenter { .. }
                | DomainError::InvalidHalfExtent { .. }
                | DomainError::CycleDetected { .. }
                | DomainError::AlreadyOwned { .. }
        )
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
