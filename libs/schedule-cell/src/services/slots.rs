use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::engine;
use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{CreateTimeSlotRequest, NewTimeSlot, RangeQuery, TimeSlot, WorkingHours};
use crate::period::ensure_chronological;
use crate::services::settings::SettingsService;
use crate::store::{DoctorDirectory, SlotStore};

#[derive(Clone)]
pub struct SlotService {
    slots: Arc<dyn SlotStore>,
    doctors: Arc<dyn DoctorDirectory>,
    settings: SettingsService,
}

impl SlotService {
    pub fn new(
        slots: Arc<dyn SlotStore>,
        doctors: Arc<dyn DoctorDirectory>,
        settings: SettingsService,
    ) -> Self {
        Self { slots, doctors, settings }
    }

    /// Rebuild a doctor's slots in `[start, end]` from their effective settings.
    ///
    /// Store write failures are logged and reported as `false` so callers can
    /// retry; missing data and invalid arguments are still errors.
    pub async fn generate_schedule(
        &self,
        doctor_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ScheduleResult<bool> {
        debug!("Generating schedule for doctor {} from {} to {}", doctor_id, start, end);
        ensure_chronological(start, end)?;

        let doctor = self
            .doctors
            .get_doctor(doctor_id)
            .await?
            .ok_or_else(|| ScheduleError::NotFound(format!("Doctor {}", doctor_id)))?;

        let settings = self
            .settings
            .effective_settings(doctor.id, doctor.hospital_id)
            .await?
            .ok_or_else(|| ScheduleError::NotFound(format!("Schedule settings for doctor {}", doctor_id)))?;

        let slots = engine::generate_slots(doctor.id, doctor.hospital_id, &settings.hours, start, end)?;

        match self.replace_slots(doctor.id, start, end, &slots).await {
            Ok(count) => {
                info!("Generated {} slots for doctor {}", count, doctor_id);
                Ok(true)
            }
            Err(e) => {
                error!("Failed to write slots for doctor {}: {}", doctor_id, e);
                Ok(false)
            }
        }
    }

    /// Generate with explicit working hours and replace the doctor's slots in
    /// the range. Returns the number of slots written.
    pub async fn regenerate_with(
        &self,
        doctor_id: Uuid,
        hospital_id: Option<Uuid>,
        hours: &WorkingHours,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ScheduleResult<usize> {
        let slots = engine::generate_slots(doctor_id, hospital_id, hours, start, end)?;
        self.replace_slots(doctor_id, start, end, &slots).await
    }

    /// Clear then insert; regeneration never merges with existing slots, so
    /// booked slots in the range come back available.
    async fn replace_slots(
        &self,
        doctor_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
        slots: &[NewTimeSlot],
    ) -> ScheduleResult<usize> {
        let deleted = self.slots.delete_slots(&RangeQuery::for_doctor(doctor_id, start, end)).await?;
        debug!("Cleared {} slots for doctor {}", deleted, doctor_id);

        let inserted = self
            .slots
            .insert_slots(slots)
            .await
            .map_err(|e| ScheduleError::from_store(e, "Slots already exist in the target range"))?;
        Ok(inserted.len())
    }

    /// Delete every slot of a doctor in `[start, end]`.
    pub async fn clear_schedule(
        &self,
        doctor_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ScheduleResult<usize> {
        ensure_chronological(start, end)?;
        let deleted = self.slots.delete_slots(&RangeQuery::for_doctor(doctor_id, start, end)).await?;
        info!("Cleared {} slots for doctor {}", deleted, doctor_id);
        Ok(deleted)
    }

    pub async fn get_doctor_slots(
        &self,
        doctor_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ScheduleResult<Vec<TimeSlot>> {
        ensure_chronological(start, end)?;
        Ok(self.slots.list_slots(&RangeQuery::for_doctor(doctor_id, start, end)).await?)
    }

    /// Add a single slot by hand.
    pub async fn create_slot(&self, request: CreateTimeSlotRequest) -> ScheduleResult<TimeSlot> {
        if request.duration <= 0 {
            return Err(ScheduleError::InvalidArgument(
                "Slot duration must be greater than zero".to_string(),
            ));
        }

        let slot = NewTimeSlot {
            doctor_id: request.doctor_id,
            hospital_id: request.hospital_id,
            slot_date: request.slot_date,
            slot_time: request.slot_time,
            duration: request.duration,
            is_available: true,
        };

        let mut created = self
            .slots
            .insert_slots(std::slice::from_ref(&slot))
            .await
            .map_err(|e| {
                ScheduleError::from_store(
                    e,
                    &format!("Doctor already has a slot at {} {}", slot.slot_date, slot.slot_time),
                )
            })?;

        created.pop().ok_or_else(|| ScheduleError::Store(anyhow::anyhow!("Slot insert returned no rows")))
    }

    pub async fn update_slot(&self, slot_id: Uuid, is_available: bool) -> ScheduleResult<TimeSlot> {
        debug!("Setting slot {} availability to {}", slot_id, is_available);

        self.slots
            .set_availability(slot_id, is_available)
            .await?
            .ok_or_else(|| ScheduleError::NotFound(format!("Time slot {}", slot_id)))
    }
}
