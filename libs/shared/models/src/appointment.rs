use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use shared_config::AppConfig;

/// Appointment statuses the schedule core reasons about. Everything else the
/// CRUD layer defines is carried through as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Completed,
    Waiting,
    Cancelled,
    Other(i32),
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Waiting => write!(f, "waiting"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Other(id) => write!(f, "status_{}", id),
        }
    }
}

/// Numeric status ids as stored by the appointment tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTaxonomy {
    pub completed: i32,
    pub waiting: i32,
    pub cancelled: i32,
}

impl Default for StatusTaxonomy {
    fn default() -> Self {
        Self {
            completed: 2,
            waiting: 4,
            cancelled: 5,
        }
    }
}

impl StatusTaxonomy {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            completed: config.appointment_status_completed_id,
            waiting: config.appointment_status_waiting_id,
            cancelled: config.appointment_status_cancelled_id,
        }
    }

    pub fn status_of(&self, status_id: i32) -> AppointmentStatus {
        if status_id == self.completed {
            AppointmentStatus::Completed
        } else if status_id == self.waiting {
            AppointmentStatus::Waiting
        } else if status_id == self.cancelled {
            AppointmentStatus::Cancelled
        } else {
            AppointmentStatus::Other(status_id)
        }
    }

    pub fn id_of(&self, status: AppointmentStatus) -> i32 {
        match status {
            AppointmentStatus::Completed => self.completed,
            AppointmentStatus::Waiting => self.waiting,
            AppointmentStatus::Cancelled => self.cancelled,
            AppointmentStatus::Other(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalAppointment {
    pub id: Uuid,
    pub hospital_id: Option<Uuid>,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub status_id: i32,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub medical_record_id: Option<Uuid>,
    /// Set when the appointment was booked from a slot. Rows created before
    /// this column existed are matched to slots by time window instead.
    pub time_slot_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMedicalAppointment {
    pub hospital_id: Option<Uuid>,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub status_id: i32,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub medical_record_id: Option<Uuid>,
    pub time_slot_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_round_trip_for_known_statuses() {
        let taxonomy = StatusTaxonomy::default();
        assert_eq!(taxonomy.status_of(2), AppointmentStatus::Completed);
        assert_eq!(taxonomy.status_of(4), AppointmentStatus::Waiting);
        assert_eq!(taxonomy.status_of(5), AppointmentStatus::Cancelled);
        assert_eq!(taxonomy.status_of(1), AppointmentStatus::Other(1));
        assert_eq!(taxonomy.id_of(AppointmentStatus::Waiting), 4);
    }

    #[test]
    fn test_taxonomy_from_config() {
        let config = AppConfig {
            appointment_status_completed_id: 10,
            appointment_status_waiting_id: 11,
            appointment_status_cancelled_id: 12,
            ..AppConfig::default()
        };
        let taxonomy = StatusTaxonomy::from_config(&config);
        assert_eq!(taxonomy.status_of(11), AppointmentStatus::Waiting);
        assert_eq!(taxonomy.status_of(4), AppointmentStatus::Other(4));
    }
}
