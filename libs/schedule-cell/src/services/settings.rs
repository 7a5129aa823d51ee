use std::sync::Arc;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{SaveScheduleSettingsRequest, ScheduleSettings, SettingsKey};
use crate::store::SettingsStore;

#[derive(Clone)]
pub struct SettingsService {
    store: Arc<dyn SettingsStore>,
}

impl SettingsService {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Settings row owned by the doctor itself, without fallback.
    pub async fn get_doctor_settings(&self, doctor_id: Uuid) -> ScheduleResult<ScheduleSettings> {
        debug!("Fetching schedule settings for doctor: {}", doctor_id);

        self.store
            .find_settings(SettingsKey::Doctor(doctor_id))
            .await?
            .ok_or_else(|| ScheduleError::NotFound(format!("Schedule settings for doctor {}", doctor_id)))
    }

    /// Insert the settings for the request's owner, or update the existing row.
    pub async fn save_settings(
        &self,
        request: SaveScheduleSettingsRequest,
    ) -> ScheduleResult<ScheduleSettings> {
        request.hours.validate()?;

        let key = SettingsKey::for_ids(request.doctor_id, request.hospital_id);
        debug!("Saving schedule settings for {:?}", key);

        let now = Utc::now();
        match self.store.find_settings(key).await? {
            Some(mut existing) => {
                existing.hospital_id = request.hospital_id;
                existing.hours = request.hours;
                existing.updated_at = now;
                Ok(self.store.update_settings(&existing).await?)
            }
            None => {
                let settings = ScheduleSettings {
                    id: Uuid::new_v4(),
                    doctor_id: request.doctor_id,
                    hospital_id: request.hospital_id,
                    hours: request.hours,
                    created_at: now,
                    updated_at: now,
                };
                self.store
                    .insert_settings(&settings)
                    .await
                    .map_err(|e| ScheduleError::from_store(e, "Schedule settings were created concurrently"))
            }
        }
    }

    /// The most specific settings that apply to a doctor: the doctor's own row,
    /// then the hospital row, then the global row.
    pub async fn effective_settings(
        &self,
        doctor_id: Uuid,
        hospital_id: Option<Uuid>,
    ) -> ScheduleResult<Option<ScheduleSettings>> {
        let keys = [
            Some(SettingsKey::Doctor(doctor_id)),
            hospital_id.map(SettingsKey::Hospital),
            Some(SettingsKey::Global),
        ];

        for key in keys.into_iter().flatten() {
            if let Some(settings) = self.store.find_settings(key).await? {
                return Ok(Some(settings));
            }
        }
        Ok(None)
    }
}
