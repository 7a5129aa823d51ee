use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::appointment::{MedicalAppointment, NewMedicalAppointment};

use crate::models::{
    AutoGenerationSettings, AutoGenerationStatus, DoctorFilter, DoctorInfo, NewTimeSlot,
    RangeQuery, ScheduleSettings, SettingsKey, TimeSlot,
};
use crate::store::{AppointmentStore, AutoGenerationStore, DoctorDirectory, SettingsStore, SlotStore};

const SETTINGS_TABLE: &str = "/rest/v1/schedule_settings";
const SLOTS_TABLE: &str = "/rest/v1/time_slots";
const APPOINTMENTS_TABLE: &str = "/rest/v1/medical_appointments";
const AUTO_GENERATION_TABLE: &str = "/rest/v1/auto_generation_settings";
const DOCTORS_TABLE: &str = "/rest/v1/doctors";
const SUPERSEDE_RPC: &str = "/rest/v1/rpc/supersede_auto_generation_settings";

/// Rows per bulk insert request.
const INSERT_CHUNK: usize = 500;

/// PostgREST-backed store. Requests carry the caller's bearer token so row
/// level security applies.
pub struct SupabaseScheduleStore {
    supabase: Arc<SupabaseClient>,
    auth_token: Option<String>,
}

impl SupabaseScheduleStore {
    pub fn new(config: &AppConfig, auth_token: Option<&str>) -> Self {
        Self::with_client(Arc::new(SupabaseClient::new(config)), auth_token)
    }

    pub fn with_client(supabase: Arc<SupabaseClient>, auth_token: Option<&str>) -> Self {
        Self {
            supabase,
            auth_token: auth_token.map(str::to_string),
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        self.supabase
            .request(Method::GET, path, self.auth_token.as_deref(), None)
            .await
    }

    async fn write<T: DeserializeOwned>(&self, method: Method, path: &str, body: Option<Value>) -> Result<Vec<T>> {
        self.supabase
            .request_with_headers(
                method,
                path,
                self.auth_token.as_deref(),
                body,
                Some(SupabaseClient::return_representation()),
            )
            .await
    }

    async fn fetch_one<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        Ok(self.fetch(path).await?.into_iter().next())
    }
}

fn settings_filter(key: SettingsKey) -> String {
    match key {
        SettingsKey::Doctor(doctor_id) => format!("doctor_id=eq.{}", doctor_id),
        SettingsKey::Hospital(hospital_id) => {
            format!("doctor_id=is.null&hospital_id=eq.{}", hospital_id)
        }
        SettingsKey::Global => "doctor_id=is.null&hospital_id=is.null".to_string(),
    }
}

fn in_list(ids: &[Uuid]) -> String {
    let joined: Vec<String> = ids.iter().map(Uuid::to_string).collect();
    format!("in.({})", joined.join(","))
}

fn range_filter(query: &RangeQuery, date_column: &str) -> String {
    let mut filter = format!(
        "{col}=gte.{from}&{col}=lte.{to}",
        col = date_column,
        from = query.from,
        to = query.to
    );
    if let Some(ids) = &query.doctor_ids {
        filter.push_str(&format!("&doctor_id={}", in_list(ids)));
    }
    filter
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn doctors_path(filter: &DoctorFilter) -> String {
    let mut path = format!("{}?select=id,hospital_id,speciality_id", DOCTORS_TABLE);
    if let Some(hospital_id) = filter.hospital_id {
        path.push_str(&format!("&hospital_id=eq.{}", hospital_id));
    } else if filter.require_hospital {
        path.push_str("&hospital_id=not.is.null");
    }
    if let Some(speciality_id) = filter.speciality_id {
        path.push_str(&format!("&speciality_id=eq.{}", speciality_id));
    }
    path.push_str("&order=hospital_id.asc.nullslast,id.asc");
    path
}

#[async_trait]
impl SettingsStore for SupabaseScheduleStore {
    async fn find_settings(&self, key: SettingsKey) -> Result<Option<ScheduleSettings>> {
        debug!("Fetching schedule settings for {:?}", key);
        let path = format!("{}?{}&limit=1", SETTINGS_TABLE, settings_filter(key));
        self.fetch_one(&path).await
    }

    async fn insert_settings(&self, settings: &ScheduleSettings) -> Result<ScheduleSettings> {
        let rows: Vec<ScheduleSettings> = self
            .write(Method::POST, SETTINGS_TABLE, Some(serde_json::to_value(settings)?))
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to create schedule settings"))
    }

    async fn update_settings(&self, settings: &ScheduleSettings) -> Result<ScheduleSettings> {
        let path = format!("{}?id=eq.{}", SETTINGS_TABLE, settings.id);
        let rows: Vec<ScheduleSettings> = self
            .write(Method::PATCH, &path, Some(serde_json::to_value(settings)?))
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to update schedule settings {}", settings.id))
    }
}

#[async_trait]
impl SlotStore for SupabaseScheduleStore {
    async fn list_slots(&self, query: &RangeQuery) -> Result<Vec<TimeSlot>> {
        if query.doctor_ids.as_ref().is_some_and(|ids| ids.is_empty()) {
            return Ok(Vec::new());
        }
        let path = format!(
            "{}?{}&order=doctor_id.asc,slot_date.asc,slot_time.asc",
            SLOTS_TABLE,
            range_filter(query, "slot_date")
        );
        self.fetch(&path).await
    }

    async fn get_slot(&self, slot_id: Uuid) -> Result<Option<TimeSlot>> {
        self.fetch_one(&format!("{}?id=eq.{}", SLOTS_TABLE, slot_id)).await
    }

    async fn insert_slots(&self, slots: &[NewTimeSlot]) -> Result<Vec<TimeSlot>> {
        let mut inserted = Vec::with_capacity(slots.len());
        for chunk in slots.chunks(INSERT_CHUNK) {
            debug!("Inserting {} time slots", chunk.len());
            let rows: Vec<TimeSlot> = self
                .write(Method::POST, SLOTS_TABLE, Some(serde_json::to_value(chunk)?))
                .await?;
            inserted.extend(rows);
        }
        Ok(inserted)
    }

    async fn delete_slots(&self, query: &RangeQuery) -> Result<usize> {
        if query.doctor_ids.as_ref().is_some_and(|ids| ids.is_empty()) {
            return Ok(0);
        }
        let path = format!("{}?{}", SLOTS_TABLE, range_filter(query, "slot_date"));
        let deleted: Vec<Value> = self.write(Method::DELETE, &path, None).await?;
        Ok(deleted.len())
    }

    async fn set_availability(&self, slot_id: Uuid, is_available: bool) -> Result<Option<TimeSlot>> {
        let path = format!("{}?id=eq.{}", SLOTS_TABLE, slot_id);
        let rows: Vec<TimeSlot> = self
            .write(Method::PATCH, &path, Some(json!({ "is_available": is_available })))
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn flip_availability(&self, slot_id: Uuid, to: bool) -> Result<Option<TimeSlot>> {
        // The filter on the current value makes this a single conditional UPDATE.
        let path = format!("{}?id=eq.{}&is_available=eq.{}", SLOTS_TABLE, slot_id, !to);
        let rows: Vec<TimeSlot> = self
            .write(Method::PATCH, &path, Some(json!({ "is_available": to })))
            .await?;
        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl AppointmentStore for SupabaseScheduleStore {
    async fn get_appointment(&self, appointment_id: Uuid) -> Result<Option<MedicalAppointment>> {
        self.fetch_one(&format!("{}?id=eq.{}", APPOINTMENTS_TABLE, appointment_id)).await
    }

    async fn insert_appointment(&self, appointment: &NewMedicalAppointment) -> Result<MedicalAppointment> {
        let rows: Vec<MedicalAppointment> = self
            .write(Method::POST, APPOINTMENTS_TABLE, Some(serde_json::to_value(appointment)?))
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to create appointment"))
    }

    async fn update_appointment_status(
        &self,
        appointment_id: Uuid,
        status_id: i32,
    ) -> Result<Option<MedicalAppointment>> {
        let path = format!("{}?id=eq.{}", APPOINTMENTS_TABLE, appointment_id);
        let rows: Vec<MedicalAppointment> = self
            .write(Method::PATCH, &path, Some(json!({ "status_id": status_id })))
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn delete_appointment(&self, appointment_id: Uuid) -> Result<bool> {
        let path = format!("{}?id=eq.{}", APPOINTMENTS_TABLE, appointment_id);
        let deleted: Vec<Value> = self.write(Method::DELETE, &path, None).await?;
        Ok(!deleted.is_empty())
    }

    async fn list_appointments(&self, query: &RangeQuery) -> Result<Vec<MedicalAppointment>> {
        if query.doctor_ids.as_ref().is_some_and(|ids| ids.is_empty()) {
            return Ok(Vec::new());
        }
        let path = format!(
            "{}?{}&order=appointment_date.asc,appointment_time.asc",
            APPOINTMENTS_TABLE,
            range_filter(query, "appointment_date")
        );
        self.fetch(&path).await
    }
}

#[async_trait]
impl AutoGenerationStore for SupabaseScheduleStore {
    async fn get_auto_generation(&self, id: Uuid) -> Result<Option<AutoGenerationSettings>> {
        self.fetch_one(&format!("{}?id=eq.{}", AUTO_GENERATION_TABLE, id)).await
    }

    async fn list_enabled_auto_generation(&self) -> Result<Vec<AutoGenerationSettings>> {
        let path = format!("{}?is_enabled=eq.true&order=created_at.asc", AUTO_GENERATION_TABLE);
        self.fetch(&path).await
    }

    async fn list_due_auto_generation(&self, now: DateTime<Utc>) -> Result<Vec<AutoGenerationSettings>> {
        let path = format!(
            "{}?is_enabled=eq.true&next_generation_date=lte.{}&order=next_generation_date.asc",
            AUTO_GENERATION_TABLE,
            timestamp(now)
        );
        self.fetch(&path).await
    }

    async fn supersede_and_insert(&self, settings: &AutoGenerationSettings) -> Result<AutoGenerationSettings> {
        debug!("Saving auto-generation settings for scope {}", settings.scope_key);
        let body = json!({ "new_settings": serde_json::to_value(settings)? });
        let rows: Vec<AutoGenerationSettings> = self.write(Method::POST, SUPERSEDE_RPC, Some(body)).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to save auto-generation settings"))
    }

    async fn disable_auto_generation(&self, id: Uuid) -> Result<bool> {
        let path = format!("{}?id=eq.{}&is_enabled=eq.true", AUTO_GENERATION_TABLE, id);
        let body = json!({
            "is_enabled": false,
            "status": AutoGenerationStatus::Disabled,
            "updated_at": timestamp(Utc::now()),
        });
        let rows: Vec<Value> = self.write(Method::PATCH, &path, Some(body)).await?;
        Ok(!rows.is_empty())
    }

    async fn claim_auto_generation(
        &self,
        id: Uuid,
        expected_version: i32,
        next_generation_date: DateTime<Utc>,
    ) -> Result<Option<AutoGenerationSettings>> {
        let path = format!(
            "{}?id=eq.{}&version=eq.{}&is_enabled=eq.true",
            AUTO_GENERATION_TABLE, id, expected_version
        );
        let body = json!({
            "next_generation_date": timestamp(next_generation_date),
            "version": expected_version + 1,
            "updated_at": timestamp(Utc::now()),
        });
        let rows: Vec<AutoGenerationSettings> = self.write(Method::PATCH, &path, Some(body)).await?;
        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl DoctorDirectory for SupabaseScheduleStore {
    async fn get_doctor(&self, doctor_id: Uuid) -> Result<Option<DoctorInfo>> {
        let path = format!(
            "{}?select=id,hospital_id,speciality_id&id=eq.{}",
            DOCTORS_TABLE, doctor_id
        );
        self.fetch_one(&path).await
    }

    async fn list_doctors(&self, filter: &DoctorFilter) -> Result<Vec<DoctorInfo>> {
        self.fetch(&doctors_path(filter)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_settings_filters() {
        let id = Uuid::nil();
        assert_eq!(settings_filter(SettingsKey::Doctor(id)), format!("doctor_id=eq.{}", id));
        assert_eq!(settings_filter(SettingsKey::Global), "doctor_id=is.null&hospital_id=is.null");
    }

    #[test]
    fn test_range_filter_with_doctors() {
        let a = Uuid::nil();
        let query = RangeQuery {
            doctor_ids: Some(vec![a]),
            from: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
        };
        assert_eq!(
            range_filter(&query, "slot_date"),
            format!("slot_date=gte.2026-03-01&slot_date=lte.2026-03-31&doctor_id=in.({})", a)
        );
    }

    #[test]
    fn test_doctors_path_prefers_explicit_hospital() {
        let hospital = Uuid::nil();
        let path = doctors_path(&DoctorFilter {
            hospital_id: Some(hospital),
            speciality_id: None,
            require_hospital: true,
        });
        assert!(path.contains(&format!("hospital_id=eq.{}", hospital)));
        assert!(!path.contains("not.is.null"));
    }

    #[test]
    fn test_timestamp_has_no_offset_sign() {
        let at = DateTime::parse_from_rfc3339("2026-03-02T09:00:00+00:00").unwrap().with_timezone(&Utc);
        assert_eq!(timestamp(at), "2026-03-02T09:00:00Z");
    }
}
