// libs/schedule-cell/src/models.rs
use chrono::{DateTime, Days, Months, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{ScheduleError, ScheduleResult};

// ==============================================================================
// WORKING HOURS & SCHEDULE SETTINGS
// ==============================================================================

/// Workday shape used to cut a day into bookable slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub work_day_start: NaiveTime,
    pub work_day_end: NaiveTime,
    /// Minutes.
    pub slot_duration: i32,
    /// Minutes between the end of one slot and the start of the next.
    #[serde(default)]
    pub break_duration: i32,
    #[serde(default)]
    pub lunch_start: Option<NaiveTime>,
    #[serde(default)]
    pub lunch_end: Option<NaiveTime>,
    #[serde(default)]
    pub has_lunch_break: bool,
    /// ISO weekdays, Monday = 1 .. Sunday = 7.
    pub work_days: Vec<u32>,
}

impl WorkingHours {
    pub fn validate(&self) -> ScheduleResult<()> {
        if self.work_day_end <= self.work_day_start {
            return Err(ScheduleError::InvalidArgument(
                "Workday end must be after workday start".to_string(),
            ));
        }
        if self.slot_duration <= 0 {
            return Err(ScheduleError::InvalidArgument(
                "Slot duration must be greater than zero".to_string(),
            ));
        }
        if self.break_duration < 0 {
            return Err(ScheduleError::InvalidArgument(
                "Break duration cannot be negative".to_string(),
            ));
        }
        if let Some(day) = self.work_days.iter().find(|day| !(1..=7).contains(*day)) {
            return Err(ScheduleError::InvalidArgument(format!(
                "Work day {} is outside 1 (Monday) ..= 7 (Sunday)",
                day
            )));
        }
        if self.has_lunch_break {
            let (Some(lunch_start), Some(lunch_end)) = (self.lunch_start, self.lunch_end) else {
                return Err(ScheduleError::InvalidArgument(
                    "Lunch break is enabled but its window is incomplete".to_string(),
                ));
            };
            if lunch_end <= lunch_start {
                return Err(ScheduleError::InvalidArgument(
                    "Lunch end must be after lunch start".to_string(),
                ));
            }
            if lunch_start < self.work_day_start || lunch_end > self.work_day_end {
                return Err(ScheduleError::InvalidArgument(
                    "Lunch window must lie within the workday".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// The lunch window, only when lunch is enforced.
    pub fn lunch_window(&self) -> Option<(NaiveTime, NaiveTime)> {
        if !self.has_lunch_break {
            return None;
        }
        self.lunch_start.zip(self.lunch_end)
    }

    pub fn works_on(&self, iso_weekday: u32) -> bool {
        self.work_days.contains(&iso_weekday)
    }
}

/// Which row a settings lookup targets. Doctor rows win over hospital rows,
/// hospital rows over the global row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsKey {
    Doctor(Uuid),
    Hospital(Uuid),
    Global,
}

impl SettingsKey {
    pub fn for_ids(doctor_id: Option<Uuid>, hospital_id: Option<Uuid>) -> Self {
        match (doctor_id, hospital_id) {
            (Some(doctor_id), _) => SettingsKey::Doctor(doctor_id),
            (None, Some(hospital_id)) => SettingsKey::Hospital(hospital_id),
            (None, None) => SettingsKey::Global,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSettings {
    pub id: Uuid,
    pub doctor_id: Option<Uuid>,
    pub hospital_id: Option<Uuid>,
    #[serde(flatten)]
    pub hours: WorkingHours,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScheduleSettings {
    pub fn key(&self) -> SettingsKey {
        SettingsKey::for_ids(self.doctor_id, self.hospital_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveScheduleSettingsRequest {
    pub doctor_id: Option<Uuid>,
    pub hospital_id: Option<Uuid>,
    #[serde(flatten)]
    pub hours: WorkingHours,
}

// ==============================================================================
// TIME SLOTS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub hospital_id: Option<Uuid>,
    pub slot_date: NaiveDate,
    pub slot_time: NaiveTime,
    /// Minutes.
    pub duration: i32,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

impl TimeSlot {
    /// Whether `time` falls inside `[slot_time, slot_time + duration)`.
    pub fn contains(&self, time: NaiveTime) -> bool {
        let start = self.slot_time.num_seconds_from_midnight() as i64;
        let end = start + i64::from(self.duration.max(0)) * 60;
        let at = time.num_seconds_from_midnight() as i64;
        start <= at && at < end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTimeSlot {
    pub doctor_id: Uuid,
    pub hospital_id: Option<Uuid>,
    pub slot_date: NaiveDate,
    pub slot_time: NaiveTime,
    pub duration: i32,
    pub is_available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTimeSlotRequest {
    pub doctor_id: Uuid,
    pub hospital_id: Option<Uuid>,
    pub slot_date: NaiveDate,
    pub slot_time: NaiveTime,
    pub duration: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTimeSlotRequest {
    pub is_available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRangeRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Slots or appointments for a date range, optionally restricted to a set of
/// doctors. `doctor_ids: None` means every doctor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeQuery {
    pub doctor_ids: Option<Vec<Uuid>>,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl RangeQuery {
    pub fn for_doctor(doctor_id: Uuid, from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            doctor_ids: Some(vec![doctor_id]),
            from,
            to,
        }
    }

    pub fn matches(&self, doctor_id: Uuid, date: NaiveDate) -> bool {
        let doctor_ok = self
            .doctor_ids
            .as_ref()
            .map_or(true, |ids| ids.contains(&doctor_id));
        doctor_ok && self.from <= date && date <= self.to
    }
}

// ==============================================================================
// DOCTOR DIRECTORY VIEW
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorInfo {
    pub id: Uuid,
    pub hospital_id: Option<Uuid>,
    pub speciality_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorFilter {
    pub hospital_id: Option<Uuid>,
    pub speciality_id: Option<Uuid>,
    /// Skip doctors not attached to any hospital.
    pub require_hospital: bool,
}

// ==============================================================================
// SCOPES
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScopeKind {
    AllDoctors,
    AllHospitals,
    SelectedHospital,
    SelectedSpeciality,
    SelectedDoctor,
}

/// Scope as it arrives over the wire; qualifying ids are checked by
/// [`ScopeRequest::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeRequest {
    pub scope: ScopeKind,
    #[serde(default)]
    pub hospital_id: Option<Uuid>,
    #[serde(default)]
    pub speciality_id: Option<Uuid>,
    #[serde(default)]
    pub doctor_id: Option<Uuid>,
}

impl ScopeRequest {
    pub fn resolve(&self) -> ScheduleResult<ScheduleScope> {
        let missing = |what: &str| {
            ScheduleError::InvalidArgument(format!(
                "Scope {:?} requires {}",
                self.scope, what
            ))
        };

        Ok(match self.scope {
            ScopeKind::AllDoctors => ScheduleScope::AllDoctors,
            ScopeKind::AllHospitals => ScheduleScope::AllHospitals,
            ScopeKind::SelectedHospital => ScheduleScope::Hospital(
                self.hospital_id.ok_or_else(|| missing("hospital_id"))?,
            ),
            ScopeKind::SelectedSpeciality => ScheduleScope::Speciality {
                hospital_id: self.hospital_id,
                speciality_id: self.speciality_id.ok_or_else(|| missing("speciality_id"))?,
            },
            ScopeKind::SelectedDoctor => ScheduleScope::Doctor(
                self.doctor_id.ok_or_else(|| missing("doctor_id"))?,
            ),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduleScope {
    AllDoctors,
    AllHospitals,
    Hospital(Uuid),
    Speciality {
        hospital_id: Option<Uuid>,
        speciality_id: Uuid,
    },
    Doctor(Uuid),
}

impl ScheduleScope {
    pub fn kind(&self) -> ScopeKind {
        match self {
            ScheduleScope::AllDoctors => ScopeKind::AllDoctors,
            ScheduleScope::AllHospitals => ScopeKind::AllHospitals,
            ScheduleScope::Hospital(_) => ScopeKind::SelectedHospital,
            ScheduleScope::Speciality { .. } => ScopeKind::SelectedSpeciality,
            ScheduleScope::Doctor(_) => ScopeKind::SelectedDoctor,
        }
    }

    /// Uniqueness key for auto-generation settings.
    pub fn key(&self) -> String {
        match self {
            ScheduleScope::AllDoctors => "allDoctors".to_string(),
            ScheduleScope::AllHospitals => "allHospitals".to_string(),
            ScheduleScope::Hospital(id) => format!("hospital:{}", id),
            ScheduleScope::Speciality { hospital_id: Some(hospital_id), speciality_id } => {
                format!("speciality:{}:hospital:{}", speciality_id, hospital_id)
            }
            ScheduleScope::Speciality { hospital_id: None, speciality_id } => {
                format!("speciality:{}", speciality_id)
            }
            ScheduleScope::Doctor(id) => format!("doctor:{}", id),
        }
    }

    pub fn to_request(&self) -> ScopeRequest {
        let mut request = ScopeRequest {
            scope: self.kind(),
            hospital_id: None,
            speciality_id: None,
            doctor_id: None,
        };
        match *self {
            ScheduleScope::AllDoctors | ScheduleScope::AllHospitals => {}
            ScheduleScope::Hospital(id) => request.hospital_id = Some(id),
            ScheduleScope::Speciality { hospital_id, speciality_id } => {
                request.hospital_id = hospital_id;
                request.speciality_id = Some(speciality_id);
            }
            ScheduleScope::Doctor(id) => request.doctor_id = Some(id),
        }
        request
    }
}

impl fmt::Display for ScheduleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

// ==============================================================================
// AUTO-GENERATION
// ==============================================================================

/// How far ahead each auto-generation run fills the calendar, and how far the
/// next run is pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GenerationPeriod {
    Week,
    TwoWeeks,
    Month,
    ThreeMonths,
}

impl GenerationPeriod {
    pub fn advance_date(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            GenerationPeriod::Week => date.checked_add_days(Days::new(7)),
            GenerationPeriod::TwoWeeks => date.checked_add_days(Days::new(14)),
            GenerationPeriod::Month => date.checked_add_months(Months::new(1)),
            GenerationPeriod::ThreeMonths => date.checked_add_months(Months::new(3)),
        }
    }

    pub fn advance(&self, at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            GenerationPeriod::Week => at.checked_add_days(Days::new(7)),
            GenerationPeriod::TwoWeeks => at.checked_add_days(Days::new(14)),
            GenerationPeriod::Month => at.checked_add_months(Months::new(1)),
            GenerationPeriod::ThreeMonths => at.checked_add_months(Months::new(3)),
        }
    }

    /// Inclusive window `[start, start + period)`.
    pub fn window(&self, start: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let end = self.advance_date(start)?.pred_opt()?;
        Some((start, end))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoGenerationStatus {
    Active,
    Superseded,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoGenerationSettings {
    pub id: Uuid,
    pub is_enabled: bool,
    pub status: AutoGenerationStatus,
    pub scope: ScopeKind,
    pub hospital_id: Option<Uuid>,
    pub speciality_id: Option<Uuid>,
    pub doctor_id: Option<Uuid>,
    pub scope_key: String,
    pub period_type: GenerationPeriod,
    pub next_generation_date: DateTime<Utc>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Bumped on every claim so concurrent scans cannot both run a row.
    pub version: i32,
    /// Applied to every doctor in scope; when absent each doctor's own
    /// effective settings are used.
    pub settings: Option<WorkingHours>,
}

impl AutoGenerationSettings {
    pub fn scope(&self) -> ScheduleResult<ScheduleScope> {
        ScopeRequest {
            scope: self.scope,
            hospital_id: self.hospital_id,
            speciality_id: self.speciality_id,
            doctor_id: self.doctor_id,
        }
        .resolve()
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.is_enabled && self.next_generation_date <= now
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveAutoGenerationRequest {
    #[serde(flatten)]
    pub scope: ScopeRequest,
    pub period_type: GenerationPeriod,
    #[serde(default)]
    pub settings: Option<WorkingHours>,
    /// Defaults to now, making the row due on the next scan.
    #[serde(default)]
    pub next_generation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoGenerateRequest {
    #[serde(flatten)]
    pub scope: ScopeRequest,
    #[serde(default)]
    pub settings: Option<WorkingHours>,
    #[serde(default)]
    pub period_type: Option<GenerationPeriod>,
    /// First day of the generation window, today when absent.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoGenerationResult {
    pub total_count: usize,
    pub success_count: usize,
    pub generated_slots: usize,
    pub failed_doctor_ids: Vec<Uuid>,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub warning: Option<String>,
}

impl AutoGenerationResult {
    pub fn is_partial_failure(&self) -> bool {
        self.success_count < self.total_count
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoGenerationRunReport {
    pub settings_id: Uuid,
    pub scope_key: String,
    pub next_generation_date: DateTime<Utc>,
    pub result: AutoGenerationResult,
}

// ==============================================================================
// STATISTICS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatisticsPeriod {
    Day,
    Week,
    Month,
    ThreeMonths,
    Year,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsRequest {
    #[serde(flatten)]
    pub scope: ScopeRequest,
    #[serde(default)]
    pub from_date: Option<NaiveDate>,
    #[serde(default)]
    pub to_date: Option<NaiveDate>,
    #[serde(default)]
    pub period: Option<StatisticsPeriod>,
    /// Anchor the period at today instead of the calendar boundary.
    #[serde(default)]
    pub start_from_today: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyStatistics {
    pub hour: u32,
    pub label: String,
    pub total_appointments: usize,
    pub completed_appointments: usize,
    pub waiting_appointments: usize,
    pub cancelled_appointments: usize,
    /// Share of the range's appointments that fall in this hour, in percent.
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayStatistics {
    pub weekday: u32,
    pub name: String,
    pub total_slots: usize,
    pub total_appointments: usize,
    pub completed_appointments: usize,
    pub waiting_appointments: usize,
    pub cancelled_appointments: usize,
    /// Completed appointments over slots on this weekday, in percent.
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendComparison {
    pub previous_from_date: NaiveDate,
    pub previous_to_date: NaiveDate,
    pub previous_total_slots: usize,
    pub previous_total_appointments: usize,
    pub previous_completed_appointments: usize,
    pub previous_occupancy_rate: f64,
    /// `None` when the previous window had no appointments.
    pub appointments_change_percent: Option<f64>,
    pub occupancy_rate_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleStatistics {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub total_slots: usize,
    pub available_slots: usize,
    pub booked_slots: usize,
    pub total_appointments: usize,
    pub completed_appointments: usize,
    pub waiting_appointments: usize,
    pub cancelled_appointments: usize,
    pub occupancy_rate: f64,
    pub hourly_distribution: Vec<HourlyStatistics>,
    pub weekday_distribution: Vec<WeekdayStatistics>,
    pub trend: Option<TrendComparison>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySlotAvailability {
    pub date: NaiveDate,
    pub total_slots: usize,
    pub available_slots: usize,
    pub booked_slots: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotAvailabilityStatistics {
    pub doctor_id: Uuid,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub total_slots: usize,
    pub available_slots: usize,
    pub booked_slots: usize,
    pub availability_rate: f64,
    pub daily: Vec<DailySlotAvailability>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorOccupancy {
    pub doctor_id: Uuid,
    pub total_slots: usize,
    pub booked_slots: usize,
    pub completed_appointments: usize,
    pub occupancy_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalOccupancyStatistics {
    pub hospital_id: Uuid,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub total_slots: usize,
    pub total_appointments: usize,
    pub completed_appointments: usize,
    pub occupancy_rate: f64,
    pub doctors: Vec<DoctorOccupancy>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hours() -> WorkingHours {
        WorkingHours {
            work_day_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            work_day_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            slot_duration: 30,
            break_duration: 0,
            lunch_start: Some(NaiveTime::from_hms_opt(12, 0, 0).unwrap()),
            lunch_end: Some(NaiveTime::from_hms_opt(13, 0, 0).unwrap()),
            has_lunch_break: true,
            work_days: vec![1, 2, 3, 4, 5],
        }
    }

    #[test]
    fn test_valid_hours() {
        assert!(hours().validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_workday() {
        let mut h = hours();
        h.work_day_end = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        assert!(matches!(h.validate(), Err(ScheduleError::InvalidArgument(_))));
    }

    #[test]
    fn test_rejects_lunch_outside_workday() {
        let mut h = hours();
        h.lunch_end = Some(NaiveTime::from_hms_opt(18, 0, 0).unwrap());
        assert!(h.validate().is_err());
    }

    #[test]
    fn test_lunch_ignored_when_not_enforced() {
        let mut h = hours();
        h.has_lunch_break = false;
        h.lunch_end = Some(NaiveTime::from_hms_opt(11, 0, 0).unwrap());
        assert!(h.validate().is_ok());
        assert_eq!(h.lunch_window(), None);
    }

    #[test]
    fn test_rejects_bad_weekday_and_duration() {
        let mut h = hours();
        h.work_days = vec![0];
        assert!(h.validate().is_err());

        let mut h = hours();
        h.slot_duration = 0;
        assert!(h.validate().is_err());
    }

    #[test]
    fn test_scope_requires_qualifying_id() {
        let request = ScopeRequest {
            scope: ScopeKind::SelectedHospital,
            hospital_id: None,
            speciality_id: None,
            doctor_id: None,
        };
        assert!(matches!(request.resolve(), Err(ScheduleError::InvalidArgument(_))));
    }

    #[test]
    fn test_scope_keys() {
        let hospital = Uuid::new_v4();
        let speciality = Uuid::new_v4();
        assert_eq!(ScheduleScope::AllDoctors.key(), "allDoctors");
        assert_eq!(ScheduleScope::Hospital(hospital).key(), format!("hospital:{}", hospital));
        assert_ne!(
            ScheduleScope::Speciality { hospital_id: None, speciality_id: speciality }.key(),
            ScheduleScope::Speciality { hospital_id: Some(hospital), speciality_id: speciality }.key(),
        );

        let scope = ScheduleScope::Speciality { hospital_id: Some(hospital), speciality_id: speciality };
        assert_eq!(scope.to_request().resolve().unwrap(), scope);
    }

    #[test]
    fn test_generation_window() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        assert_eq!(
            GenerationPeriod::Week.window(start),
            Some((start, NaiveDate::from_ymd_opt(2026, 2, 6).unwrap()))
        );
        // Month arithmetic clamps to the last day of February.
        assert_eq!(
            GenerationPeriod::Month.window(start),
            Some((start, NaiveDate::from_ymd_opt(2026, 2, 27).unwrap()))
        );
    }

    #[test]
    fn test_slot_contains() {
        let slot = TimeSlot {
            id: Uuid::new_v4(),
            doctor_id: Uuid::new_v4(),
            hospital_id: None,
            slot_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            slot_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            duration: 30,
            is_available: false,
            created_at: Utc::now(),
        };
        assert!(slot.contains(NaiveTime::from_hms_opt(9, 0, 0).unwrap()));
        assert!(slot.contains(NaiveTime::from_hms_opt(9, 29, 59).unwrap()));
        assert!(!slot.contains(NaiveTime::from_hms_opt(9, 30, 0).unwrap()));
        assert!(!slot.contains(NaiveTime::from_hms_opt(8, 59, 0).unwrap()));
    }
}
