use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_models::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentFromSlotRequest {
    pub time_slot_id: Uuid,
    pub patient_id: Uuid,
    /// Defaults to the taxonomy's Waiting status.
    #[serde(default)]
    pub status_id: Option<i32>,
    #[serde(default)]
    pub medical_record_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedAppointment {
    pub appointment_id: Uuid,
    /// The slot made bookable again, if one was found.
    pub released_slot_id: Option<Uuid>,
}

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("Appointment {0} not found")]
    NotFound(Uuid),

    #[error("Time slot {0} not found")]
    SlotNotFound(Uuid),

    #[error("Time slot {0} is already booked")]
    SlotNotAvailable(Uuid),

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound(_) | AppointmentError::SlotNotFound(_) => AppError::NotFound(err.to_string()),
            AppointmentError::SlotNotAvailable(_) => AppError::Conflict(err.to_string()),
            AppointmentError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}

pub type AppointmentResult<T> = std::result::Result<T, AppointmentError>;
