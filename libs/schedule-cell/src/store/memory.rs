use std::collections::HashSet;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use shared_database::SupabaseError;
use shared_models::appointment::{MedicalAppointment, NewMedicalAppointment};

use crate::models::{
    AutoGenerationSettings, AutoGenerationStatus, DoctorFilter, DoctorInfo, NewTimeSlot,
    RangeQuery, ScheduleSettings, SettingsKey, TimeSlot,
};
use crate::store::{AppointmentStore, AutoGenerationStore, DoctorDirectory, SettingsStore, SlotStore};

#[derive(Default)]
struct MemoryState {
    settings: Vec<ScheduleSettings>,
    slots: Vec<TimeSlot>,
    appointments: Vec<MedicalAppointment>,
    auto_generation: Vec<AutoGenerationSettings>,
    doctors: Vec<DoctorInfo>,
    failing_slot_writes: HashSet<Uuid>,
}

/// Store kept in process memory. Uniqueness rules mirror the database
/// indexes and violations surface as [`SupabaseError::Conflict`].
#[derive(Default)]
pub struct InMemoryScheduleStore {
    state: RwLock<MemoryState>,
}

fn conflict(message: impl Into<String>) -> anyhow::Error {
    anyhow::Error::new(SupabaseError::Conflict(message.into()))
}

impl InMemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_doctor(&self, doctor: DoctorInfo) {
        let mut state = self.state.write().await;
        state.doctors.retain(|d| d.id != doctor.id);
        state.doctors.push(doctor);
    }

    /// Make every slot write for `doctor_id` fail, as an unreachable database would.
    pub async fn fail_slot_writes_for(&self, doctor_id: Uuid) {
        self.state.write().await.failing_slot_writes.insert(doctor_id);
    }

    pub async fn slot_count(&self) -> usize {
        self.state.read().await.slots.len()
    }

    pub async fn all_auto_generation(&self) -> Vec<AutoGenerationSettings> {
        self.state.read().await.auto_generation.clone()
    }
}

#[async_trait]
impl SettingsStore for InMemoryScheduleStore {
    async fn find_settings(&self, key: SettingsKey) -> Result<Option<ScheduleSettings>> {
        let state = self.state.read().await;
        Ok(state.settings.iter().find(|s| s.key() == key).cloned())
    }

    async fn insert_settings(&self, settings: &ScheduleSettings) -> Result<ScheduleSettings> {
        let mut state = self.state.write().await;
        if state.settings.iter().any(|s| s.key() == settings.key()) {
            return Err(conflict("schedule settings already exist for this owner"));
        }
        state.settings.push(settings.clone());
        Ok(settings.clone())
    }

    async fn update_settings(&self, settings: &ScheduleSettings) -> Result<ScheduleSettings> {
        let mut state = self.state.write().await;
        let row = state
            .settings
            .iter_mut()
            .find(|s| s.id == settings.id)
            .ok_or_else(|| anyhow::Error::new(SupabaseError::NotFound(settings.id.to_string())))?;
        *row = settings.clone();
        Ok(settings.clone())
    }
}

#[async_trait]
impl SlotStore for InMemoryScheduleStore {
    async fn list_slots(&self, query: &RangeQuery) -> Result<Vec<TimeSlot>> {
        let state = self.state.read().await;
        let mut slots: Vec<TimeSlot> = state
            .slots
            .iter()
            .filter(|s| query.matches(s.doctor_id, s.slot_date))
            .cloned()
            .collect();
        slots.sort_by_key(|s| (s.doctor_id, s.slot_date, s.slot_time));
        Ok(slots)
    }

    async fn get_slot(&self, slot_id: Uuid) -> Result<Option<TimeSlot>> {
        Ok(self.state.read().await.slots.iter().find(|s| s.id == slot_id).cloned())
    }

    async fn insert_slots(&self, slots: &[NewTimeSlot]) -> Result<Vec<TimeSlot>> {
        let mut state = self.state.write().await;

        if let Some(slot) = slots.iter().find(|s| state.failing_slot_writes.contains(&s.doctor_id)) {
            return Err(anyhow!("connection reset while writing slots for doctor {}", slot.doctor_id));
        }

        let mut seen: HashSet<_> = state
            .slots
            .iter()
            .map(|s| (s.doctor_id, s.slot_date, s.slot_time))
            .collect();
        for slot in slots {
            if !seen.insert((slot.doctor_id, slot.slot_date, slot.slot_time)) {
                return Err(conflict(format!(
                    "slot {} {} already exists for doctor {}",
                    slot.slot_date, slot.slot_time, slot.doctor_id
                )));
            }
        }

        let now = Utc::now();
        let inserted: Vec<TimeSlot> = slots
            .iter()
            .map(|slot| TimeSlot {
                id: Uuid::new_v4(),
                doctor_id: slot.doctor_id,
                hospital_id: slot.hospital_id,
                slot_date: slot.slot_date,
                slot_time: slot.slot_time,
                duration: slot.duration,
                is_available: slot.is_available,
                created_at: now,
            })
            .collect();
        state.slots.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn delete_slots(&self, query: &RangeQuery) -> Result<usize> {
        let mut state = self.state.write().await;
        if let Some(doctor_id) = query
            .doctor_ids
            .iter()
            .flatten()
            .find(|id| state.failing_slot_writes.contains(*id))
        {
            return Err(anyhow!("connection reset while deleting slots for doctor {}", doctor_id));
        }
        let before = state.slots.len();
        state.slots.retain(|s| !query.matches(s.doctor_id, s.slot_date));
        Ok(before - state.slots.len())
    }

    async fn set_availability(&self, slot_id: Uuid, is_available: bool) -> Result<Option<TimeSlot>> {
        let mut state = self.state.write().await;
        Ok(state.slots.iter_mut().find(|s| s.id == slot_id).map(|slot| {
            slot.is_available = is_available;
            slot.clone()
        }))
    }

    async fn flip_availability(&self, slot_id: Uuid, to: bool) -> Result<Option<TimeSlot>> {
        let mut state = self.state.write().await;
        Ok(state
            .slots
            .iter_mut()
            .find(|s| s.id == slot_id && s.is_available != to)
            .map(|slot| {
                slot.is_available = to;
                slot.clone()
            }))
    }
}

#[async_trait]
impl AppointmentStore for InMemoryScheduleStore {
    async fn get_appointment(&self, appointment_id: Uuid) -> Result<Option<MedicalAppointment>> {
        let state = self.state.read().await;
        Ok(state.appointments.iter().find(|a| a.id == appointment_id).cloned())
    }

    async fn insert_appointment(&self, appointment: &NewMedicalAppointment) -> Result<MedicalAppointment> {
        let row = MedicalAppointment {
            id: Uuid::new_v4(),
            hospital_id: appointment.hospital_id,
            patient_id: appointment.patient_id,
            doctor_id: appointment.doctor_id,
            status_id: appointment.status_id,
            appointment_date: appointment.appointment_date,
            appointment_time: appointment.appointment_time,
            medical_record_id: appointment.medical_record_id,
            time_slot_id: appointment.time_slot_id,
            created_at: Utc::now(),
        };
        self.state.write().await.appointments.push(row.clone());
        Ok(row)
    }

    async fn update_appointment_status(
        &self,
        appointment_id: Uuid,
        status_id: i32,
    ) -> Result<Option<MedicalAppointment>> {
        let mut state = self.state.write().await;
        Ok(state
            .appointments
            .iter_mut()
            .find(|a| a.id == appointment_id)
            .map(|appointment| {
                appointment.status_id = status_id;
                appointment.clone()
            }))
    }

    async fn delete_appointment(&self, appointment_id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        let before = state.appointments.len();
        state.appointments.retain(|a| a.id != appointment_id);
        Ok(state.appointments.len() < before)
    }

    async fn list_appointments(&self, query: &RangeQuery) -> Result<Vec<MedicalAppointment>> {
        let state = self.state.read().await;
        let mut appointments: Vec<MedicalAppointment> = state
            .appointments
            .iter()
            .filter(|a| query.matches(a.doctor_id, a.appointment_date))
            .cloned()
            .collect();
        appointments.sort_by_key(|a| (a.appointment_date, a.appointment_time));
        Ok(appointments)
    }
}

#[async_trait]
impl AutoGenerationStore for InMemoryScheduleStore {
    async fn get_auto_generation(&self, id: Uuid) -> Result<Option<AutoGenerationSettings>> {
        let state = self.state.read().await;
        Ok(state.auto_generation.iter().find(|s| s.id == id).cloned())
    }

    async fn list_enabled_auto_generation(&self) -> Result<Vec<AutoGenerationSettings>> {
        let state = self.state.read().await;
        let mut rows: Vec<_> = state.auto_generation.iter().filter(|s| s.is_enabled).cloned().collect();
        rows.sort_by_key(|s| s.created_at);
        Ok(rows)
    }

    async fn list_due_auto_generation(&self, now: DateTime<Utc>) -> Result<Vec<AutoGenerationSettings>> {
        let state = self.state.read().await;
        let mut rows: Vec<_> = state.auto_generation.iter().filter(|s| s.is_due(now)).cloned().collect();
        rows.sort_by_key(|s| s.next_generation_date);
        Ok(rows)
    }

    async fn supersede_and_insert(&self, settings: &AutoGenerationSettings) -> Result<AutoGenerationSettings> {
        let mut state = self.state.write().await;
        if state.auto_generation.iter().any(|s| s.id == settings.id) {
            return Err(conflict(format!("auto-generation settings {} already exist", settings.id)));
        }
        if settings.is_enabled {
            let now = Utc::now();
            for row in state
                .auto_generation
                .iter_mut()
                .filter(|s| s.is_enabled && s.scope_key == settings.scope_key)
            {
                row.is_enabled = false;
                row.status = AutoGenerationStatus::Superseded;
                row.updated_at = now;
            }
        }
        state.auto_generation.push(settings.clone());
        Ok(settings.clone())
    }

    async fn disable_auto_generation(&self, id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        Ok(state
            .auto_generation
            .iter_mut()
            .find(|s| s.id == id && s.is_enabled)
            .map(|row| {
                row.is_enabled = false;
                row.status = AutoGenerationStatus::Disabled;
                row.updated_at = Utc::now();
            })
            .is_some())
    }

    async fn claim_auto_generation(
        &self,
        id: Uuid,
        expected_version: i32,
        next_generation_date: DateTime<Utc>,
    ) -> Result<Option<AutoGenerationSettings>> {
        let mut state = self.state.write().await;
        Ok(state
            .auto_generation
            .iter_mut()
            .find(|s| s.id == id && s.is_enabled && s.version == expected_version)
            .map(|row| {
                row.next_generation_date = next_generation_date;
                row.version += 1;
                row.updated_at = Utc::now();
                row.clone()
            }))
    }
}

#[async_trait]
impl DoctorDirectory for InMemoryScheduleStore {
    async fn get_doctor(&self, doctor_id: Uuid) -> Result<Option<DoctorInfo>> {
        Ok(self.state.read().await.doctors.iter().find(|d| d.id == doctor_id).cloned())
    }

    async fn list_doctors(&self, filter: &DoctorFilter) -> Result<Vec<DoctorInfo>> {
        let state = self.state.read().await;
        let mut doctors: Vec<DoctorInfo> = state
            .doctors
            .iter()
            .filter(|d| filter.hospital_id.map_or(true, |h| d.hospital_id == Some(h)))
            .filter(|d| filter.speciality_id.map_or(true, |s| d.speciality_id == Some(s)))
            .filter(|d| !filter.require_hospital || d.hospital_id.is_some())
            .cloned()
            .collect();
        // Option<Uuid> orders None first; doctors without a hospital go last.
        doctors.sort_by_key(|d| (d.hospital_id.is_none(), d.hospital_id, d.id));
        Ok(doctors)
    }
}
