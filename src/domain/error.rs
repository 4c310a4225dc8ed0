use thiserror::Error;

/// Failures of habit and check-in operations.
///
/// Everything except `Storage` is caused by the request; `Storage` wraps
/// whatever the backing store reported and is never shown to clients.
#[derive(Debug, Error)]
pub enum HabitError {
    // ---
    #[error("{0}")]
    Validation(String),

    #[error("Habit not found")]
    NotFound,

    #[error("Habit disabled")]
    HabitDisabled,

    #[error("Already checked in today")]
    DuplicateCheckin,

    #[error("{0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

pub type HabitResult<T> = std::result::Result<T, HabitError>;
