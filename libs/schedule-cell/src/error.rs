use thiserror::Error;

use shared_database::SupabaseError;
use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl ScheduleError {
    /// Lift a store failure, keeping uniqueness violations visible as conflicts.
    pub fn from_store(err: anyhow::Error, conflict_message: &str) -> Self {
        if SupabaseError::is_conflict(&err) {
            ScheduleError::Conflict(conflict_message.to_string())
        } else {
            ScheduleError::Store(err)
        }
    }
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::NotFound(what) => AppError::NotFound(format!("{} not found", what)),
            ScheduleError::Conflict(msg) => AppError::Conflict(msg),
            ScheduleError::InvalidArgument(msg) => AppError::BadRequest(msg),
            ScheduleError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}

pub type ScheduleResult<T> = std::result::Result<T, ScheduleError>;
