//! Error types for plan generation and the plan store.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlanError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// Plan form rejected before generation (duration, daily goal, companies).
    #[error("Invalid plan configuration: {0}")]
    InvalidConfig(String),

    /// No plan with the requested id in the store.
    #[error("Plan not found: {0}")]
    NotFound(String),
}
