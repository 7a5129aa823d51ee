//! Persistence seams for the schedule core. The Supabase implementation is
//! used in production; the in-memory one backs tests and local runs.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use shared_models::appointment::{MedicalAppointment, NewMedicalAppointment};

use crate::models::{
    AutoGenerationSettings, DoctorFilter, DoctorInfo, NewTimeSlot, RangeQuery,
    ScheduleSettings, SettingsKey, TimeSlot,
};

pub mod memory;
pub mod supabase;

pub use memory::InMemoryScheduleStore;
pub use supabase::SupabaseScheduleStore;

#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn find_settings(&self, key: SettingsKey) -> Result<Option<ScheduleSettings>>;

    async fn insert_settings(&self, settings: &ScheduleSettings) -> Result<ScheduleSettings>;

    async fn update_settings(&self, settings: &ScheduleSettings) -> Result<ScheduleSettings>;
}

#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Ordered by doctor, date, time.
    async fn list_slots(&self, query: &RangeQuery) -> Result<Vec<TimeSlot>>;

    async fn get_slot(&self, slot_id: Uuid) -> Result<Option<TimeSlot>>;

    /// Fails with a conflict when any (doctor, date, time) already exists.
    async fn insert_slots(&self, slots: &[NewTimeSlot]) -> Result<Vec<TimeSlot>>;

    /// Returns the number of deleted slots.
    async fn delete_slots(&self, query: &RangeQuery) -> Result<usize>;

    async fn set_availability(&self, slot_id: Uuid, is_available: bool) -> Result<Option<TimeSlot>>;

    /// Atomically flip `is_available` to `to` only when it currently holds
    /// `!to`. `None` means no row changed.
    async fn flip_availability(&self, slot_id: Uuid, to: bool) -> Result<Option<TimeSlot>>;
}

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn get_appointment(&self, appointment_id: Uuid) -> Result<Option<MedicalAppointment>>;

    async fn insert_appointment(
        &self,
        appointment: &NewMedicalAppointment,
    ) -> Result<MedicalAppointment>;

    async fn update_appointment_status(
        &self,
        appointment_id: Uuid,
        status_id: i32,
    ) -> Result<Option<MedicalAppointment>>;

    /// `false` when nothing was deleted.
    async fn delete_appointment(&self, appointment_id: Uuid) -> Result<bool>;

    async fn list_appointments(&self, query: &RangeQuery) -> Result<Vec<MedicalAppointment>>;
}

#[async_trait]
pub trait AutoGenerationStore: Send + Sync {
    async fn get_auto_generation(&self, id: Uuid) -> Result<Option<AutoGenerationSettings>>;

    async fn list_enabled_auto_generation(&self) -> Result<Vec<AutoGenerationSettings>>;

    async fn list_due_auto_generation(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<AutoGenerationSettings>>;

    /// Insert `settings`. When it is enabled, any enabled row with the same
    /// scope key is marked superseded in the same atomic step; a disabled row
    /// leaves the scope's active row alone.
    async fn supersede_and_insert(
        &self,
        settings: &AutoGenerationSettings,
    ) -> Result<AutoGenerationSettings>;

    /// `false` when the row is missing or already disabled.
    async fn disable_auto_generation(&self, id: Uuid) -> Result<bool>;

    /// Move `next_generation_date` forward if the row is still enabled and at
    /// `expected_version`. `None` means another caller claimed it first.
    async fn claim_auto_generation(
        &self,
        id: Uuid,
        expected_version: i32,
        next_generation_date: DateTime<Utc>,
    ) -> Result<Option<AutoGenerationSettings>>;
}

/// Read-only view of the doctor directory owned by the CRUD layer.
#[async_trait]
pub trait DoctorDirectory: Send + Sync {
    async fn get_doctor(&self, doctor_id: Uuid) -> Result<Option<DoctorInfo>>;

    /// Ordered by hospital, then doctor id.
    async fn list_doctors(&self, filter: &DoctorFilter) -> Result<Vec<DoctorInfo>>;
}
