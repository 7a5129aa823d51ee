use std::sync::Arc;

use tracing::debug;

use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{DoctorFilter, DoctorInfo, ScheduleScope};
use crate::store::DoctorDirectory;

/// Turns a scope into the concrete doctors it covers.
#[derive(Clone)]
pub struct ScopeResolver {
    doctors: Arc<dyn DoctorDirectory>,
}

impl ScopeResolver {
    pub fn new(doctors: Arc<dyn DoctorDirectory>) -> Self {
        Self { doctors }
    }

    pub async fn resolve(&self, scope: &ScheduleScope) -> ScheduleResult<Vec<DoctorInfo>> {
        debug!("Resolving doctors for scope {}", scope);

        let doctors = match *scope {
            ScheduleScope::AllDoctors => self.doctors.list_doctors(&DoctorFilter::default()).await?,
            // The directory orders by hospital, which groups the result.
            ScheduleScope::AllHospitals => {
                self.doctors
                    .list_doctors(&DoctorFilter {
                        require_hospital: true,
                        ..DoctorFilter::default()
                    })
                    .await?
            }
            ScheduleScope::Hospital(hospital_id) => {
                self.doctors
                    .list_doctors(&DoctorFilter {
                        hospital_id: Some(hospital_id),
                        ..DoctorFilter::default()
                    })
                    .await?
            }
            ScheduleScope::Speciality { hospital_id, speciality_id } => {
                self.doctors
                    .list_doctors(&DoctorFilter {
                        hospital_id,
                        speciality_id: Some(speciality_id),
                        require_hospital: false,
                    })
                    .await?
            }
            ScheduleScope::Doctor(doctor_id) => {
                let doctor = self
                    .doctors
                    .get_doctor(doctor_id)
                    .await?
                    .ok_or_else(|| ScheduleError::NotFound(format!("Doctor {}", doctor_id)))?;
                vec![doctor]
            }
        };

        Ok(doctors)
    }
}
