use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Timelike};
use tracing::debug;
use uuid::Uuid;

use shared_models::appointment::{AppointmentStatus, MedicalAppointment, StatusTaxonomy};

use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{
    DailySlotAvailability, DoctorOccupancy, HospitalOccupancyStatistics, HourlyStatistics,
    RangeQuery, ScheduleScope, ScheduleStatistics, SlotAvailabilityStatistics, StatisticsPeriod,
    StatisticsRequest, TimeSlot, TrendComparison, WeekdayStatistics,
};
use crate::period::{ensure_chronological, previous_window, resolve_period, resolve_range};
use crate::services::scope::ScopeResolver;
use crate::store::{AppointmentStore, SlotStore};

const WEEKDAY_NAMES: [&str; 7] = [
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / whole * 100`, 0 for an empty whole, clamped to `[0, 100]`.
pub fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round2((part as f64 / whole as f64 * 100.0).clamp(0.0, 100.0))
}

#[derive(Debug, Default, Clone, Copy)]
struct StatusCounts {
    total: usize,
    completed: usize,
    waiting: usize,
    cancelled: usize,
}

impl StatusCounts {
    fn add(&mut self, status: AppointmentStatus) {
        self.total += 1;
        match status {
            AppointmentStatus::Completed => self.completed += 1,
            AppointmentStatus::Waiting => self.waiting += 1,
            AppointmentStatus::Cancelled => self.cancelled += 1,
            AppointmentStatus::Other(_) => {}
        }
    }

    fn of(appointments: &[MedicalAppointment], taxonomy: &StatusTaxonomy) -> Self {
        let mut counts = Self::default();
        for appointment in appointments {
            counts.add(taxonomy.status_of(appointment.status_id));
        }
        counts
    }
}

/// 24 one-hour buckets keyed by the hour of the appointment time.
pub fn hourly_distribution(
    appointments: &[MedicalAppointment],
    taxonomy: &StatusTaxonomy,
) -> Vec<HourlyStatistics> {
    let mut buckets = [StatusCounts::default(); 24];
    for appointment in appointments {
        let hour = appointment.appointment_time.hour() as usize;
        buckets[hour].add(taxonomy.status_of(appointment.status_id));
    }

    let total = appointments.len();
    buckets
        .iter()
        .enumerate()
        .map(|(hour, counts)| {
            let hour = hour as u32;
            HourlyStatistics {
                hour,
                label: format!("{:02}:00-{:02}:00", hour, (hour + 1) % 24),
                total_appointments: counts.total,
                completed_appointments: counts.completed,
                waiting_appointments: counts.waiting,
                cancelled_appointments: counts.cancelled,
                rate: percent(counts.total, total),
            }
        })
        .collect()
}

/// Monday..Sunday buckets; `rate` is completed appointments over slots.
pub fn weekday_distribution(
    slots: &[TimeSlot],
    appointments: &[MedicalAppointment],
    taxonomy: &StatusTaxonomy,
) -> Vec<WeekdayStatistics> {
    let mut slot_counts = [0usize; 7];
    for slot in slots {
        slot_counts[slot.slot_date.weekday().num_days_from_monday() as usize] += 1;
    }

    let mut counts = [StatusCounts::default(); 7];
    for appointment in appointments {
        let index = appointment.appointment_date.weekday().num_days_from_monday() as usize;
        counts[index].add(taxonomy.status_of(appointment.status_id));
    }

    WEEKDAY_NAMES
        .iter()
        .enumerate()
        .map(|(index, name)| WeekdayStatistics {
            weekday: index as u32 + 1,
            name: name.to_string(),
            total_slots: slot_counts[index],
            total_appointments: counts[index].total,
            completed_appointments: counts[index].completed,
            waiting_appointments: counts[index].waiting,
            cancelled_appointments: counts[index].cancelled,
            rate: percent(counts[index].completed, slot_counts[index]),
        })
        .collect()
}

/// Aggregate slots and appointments of a range into statistics without trend.
pub fn summarize(
    from: NaiveDate,
    to: NaiveDate,
    slots: &[TimeSlot],
    appointments: &[MedicalAppointment],
    taxonomy: &StatusTaxonomy,
) -> ScheduleStatistics {
    let counts = StatusCounts::of(appointments, taxonomy);
    let available_slots = slots.iter().filter(|s| s.is_available).count();

    ScheduleStatistics {
        from_date: from,
        to_date: to,
        total_slots: slots.len(),
        available_slots,
        booked_slots: slots.len() - available_slots,
        total_appointments: counts.total,
        completed_appointments: counts.completed,
        waiting_appointments: counts.waiting,
        cancelled_appointments: counts.cancelled,
        occupancy_rate: percent(counts.completed, slots.len()),
        hourly_distribution: hourly_distribution(appointments, taxonomy),
        weekday_distribution: weekday_distribution(slots, appointments, taxonomy),
        trend: None,
    }
}

pub fn compare(current: &ScheduleStatistics, previous: &ScheduleStatistics) -> TrendComparison {
    let appointments_change_percent = (previous.total_appointments > 0).then(|| {
        let delta = current.total_appointments as f64 - previous.total_appointments as f64;
        round2(delta / previous.total_appointments as f64 * 100.0)
    });

    TrendComparison {
        previous_from_date: previous.from_date,
        previous_to_date: previous.to_date,
        previous_total_slots: previous.total_slots,
        previous_total_appointments: previous.total_appointments,
        previous_completed_appointments: previous.completed_appointments,
        previous_occupancy_rate: previous.occupancy_rate,
        appointments_change_percent,
        occupancy_rate_change: round2(current.occupancy_rate - previous.occupancy_rate),
    }
}

#[derive(Clone)]
pub struct StatisticsService {
    slots: Arc<dyn SlotStore>,
    appointments: Arc<dyn AppointmentStore>,
    scopes: ScopeResolver,
    taxonomy: StatusTaxonomy,
}

impl StatisticsService {
    pub fn new(
        slots: Arc<dyn SlotStore>,
        appointments: Arc<dyn AppointmentStore>,
        scopes: ScopeResolver,
        taxonomy: StatusTaxonomy,
    ) -> Self {
        Self {
            slots,
            appointments,
            scopes,
            taxonomy,
        }
    }

    async fn doctor_ids(&self, scope: &ScheduleScope) -> ScheduleResult<Option<Vec<Uuid>>> {
        if *scope == ScheduleScope::AllDoctors {
            return Ok(None);
        }
        let doctors = self.scopes.resolve(scope).await?;
        Ok(Some(doctors.into_iter().map(|d| d.id).collect()))
    }

    async fn load(
        &self,
        query: &RangeQuery,
    ) -> ScheduleResult<(Vec<TimeSlot>, Vec<MedicalAppointment>)> {
        let slots = self.slots.list_slots(query).await?;
        let appointments = self.appointments.list_appointments(query).await?;
        Ok((slots, appointments))
    }

    /// Occupancy and distributions for a scope and period, with a comparison
    /// against the window of equal length just before it.
    pub async fn get_schedule_statistics(
        &self,
        request: &StatisticsRequest,
        today: NaiveDate,
    ) -> ScheduleResult<ScheduleStatistics> {
        let scope = request.scope.resolve()?;
        let (from, to) = resolve_range(request, today)?;
        debug!("Computing schedule statistics for {} from {} to {}", scope, from, to);

        let doctor_ids = self.doctor_ids(&scope).await?;

        let query = RangeQuery { doctor_ids: doctor_ids.clone(), from, to };
        let (slots, appointments) = self.load(&query).await?;
        let mut statistics = summarize(from, to, &slots, &appointments, &self.taxonomy);

        if let Some((previous_from, previous_to)) = previous_window(from, to) {
            let query = RangeQuery { doctor_ids, from: previous_from, to: previous_to };
            let (slots, appointments) = self.load(&query).await?;
            let previous = summarize(previous_from, previous_to, &slots, &appointments, &self.taxonomy);
            statistics.trend = Some(compare(&statistics, &previous));
        }

        Ok(statistics)
    }

    pub async fn get_slot_availability_statistics(
        &self,
        doctor_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ScheduleResult<SlotAvailabilityStatistics> {
        ensure_chronological(from, to)?;
        let slots = self.slots.list_slots(&RangeQuery::for_doctor(doctor_id, from, to)).await?;

        let mut daily: BTreeMap<NaiveDate, DailySlotAvailability> = BTreeMap::new();
        for slot in &slots {
            let day = daily.entry(slot.slot_date).or_insert_with(|| DailySlotAvailability {
                date: slot.slot_date,
                total_slots: 0,
                available_slots: 0,
                booked_slots: 0,
            });
            day.total_slots += 1;
            if slot.is_available {
                day.available_slots += 1;
            } else {
                day.booked_slots += 1;
            }
        }

        let available_slots = slots.iter().filter(|s| s.is_available).count();
        Ok(SlotAvailabilityStatistics {
            doctor_id,
            from_date: from,
            to_date: to,
            total_slots: slots.len(),
            available_slots,
            booked_slots: slots.len() - available_slots,
            availability_rate: percent(available_slots, slots.len()),
            daily: daily.into_values().collect(),
        })
    }

    pub async fn get_hospital_occupancy_statistics(
        &self,
        hospital_id: Uuid,
        period: Option<StatisticsPeriod>,
        start_from_today: bool,
        today: NaiveDate,
    ) -> ScheduleResult<HospitalOccupancyStatistics> {
        let period = period.unwrap_or(StatisticsPeriod::Month);
        let (from, to) = resolve_period(period, start_from_today, today)
            .ok_or_else(|| ScheduleError::InvalidArgument("Period is out of the supported date range".to_string()))?;

        let doctors = self.scopes.resolve(&ScheduleScope::Hospital(hospital_id)).await?;
        let doctor_ids: Vec<Uuid> = doctors.iter().map(|d| d.id).collect();
        let (slots, appointments) = self
            .load(&RangeQuery { doctor_ids: Some(doctor_ids.clone()), from, to })
            .await?;

        let per_doctor = doctor_ids
            .iter()
            .map(|doctor_id| {
                let doctor_slots: Vec<&TimeSlot> = slots.iter().filter(|s| s.doctor_id == *doctor_id).collect();
                let completed = appointments
                    .iter()
                    .filter(|a| {
                        a.doctor_id == *doctor_id
                            && self.taxonomy.status_of(a.status_id) == AppointmentStatus::Completed
                    })
                    .count();
                DoctorOccupancy {
                    doctor_id: *doctor_id,
                    total_slots: doctor_slots.len(),
                    booked_slots: doctor_slots.iter().filter(|s| !s.is_available).count(),
                    completed_appointments: completed,
                    occupancy_rate: percent(completed, doctor_slots.len()),
                }
            })
            .collect();

        let counts = StatusCounts::of(&appointments, &self.taxonomy);
        Ok(HospitalOccupancyStatistics {
            hospital_id,
            from_date: from,
            to_date: to,
            total_slots: slots.len(),
            total_appointments: counts.total,
            completed_appointments: counts.completed,
            occupancy_rate: percent(counts.completed, slots.len()),
            doctors: per_doctor,
        })
    }
}
