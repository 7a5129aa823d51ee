// libs/schedule-cell/src/engine.rs
//! Slot generation: turns working hours and a date range into bookable slots.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use uuid::Uuid;

use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{NewTimeSlot, WorkingHours};

fn minutes_of(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight()) / 60
}

fn time_of(minutes: i64) -> Option<NaiveTime> {
    let minutes = u32::try_from(minutes).ok()?;
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}

/// Slot start times for a single working day.
///
/// The cursor starts at the workday start and moves by `slot + break` after
/// every candidate; a candidate that would run past the workday end stops the
/// day, and a candidate overlapping an enforced lunch window is skipped without
/// shifting the cursor.
pub fn day_slot_times(hours: &WorkingHours) -> Vec<NaiveTime> {
    let slot = i64::from(hours.slot_duration);
    if slot <= 0 {
        return Vec::new();
    }
    let step = slot + i64::from(hours.break_duration.max(0));
    let day_end = minutes_of(hours.work_day_end);
    let lunch = hours
        .lunch_window()
        .map(|(start, end)| (minutes_of(start), minutes_of(end)));

    let mut times = Vec::new();
    let mut cursor = minutes_of(hours.work_day_start);

    while cursor + slot <= day_end {
        let overlaps_lunch = lunch.is_some_and(|(lunch_start, lunch_end)| {
            cursor < lunch_end && cursor + slot > lunch_start
        });

        if !overlaps_lunch {
            if let Some(time) = time_of(cursor) {
                times.push(time);
            }
        }
        cursor += step;
    }

    times
}

/// Generate every slot for `doctor_id` in `[start, end]` (inclusive), ordered by
/// date then time. Dates whose ISO weekday is not a work day produce nothing.
pub fn generate_slots(
    doctor_id: Uuid,
    hospital_id: Option<Uuid>,
    hours: &WorkingHours,
    start: NaiveDate,
    end: NaiveDate,
) -> ScheduleResult<Vec<NewTimeSlot>> {
    hours.validate()?;
    if end < start {
        return Err(ScheduleError::InvalidArgument(format!(
            "End date {} is before start date {}",
            end, start
        )));
    }

    let times = day_slot_times(hours);
    let slots = start
        .iter_days()
        .take_while(|date| *date <= end)
        .filter(|date| hours.works_on(date.weekday().number_from_monday()))
        .flat_map(|date| {
            times.iter().map(move |time| NewTimeSlot {
                doctor_id,
                hospital_id,
                slot_date: date,
                slot_time: *time,
                duration: hours.slot_duration,
                is_available: true,
            })
        })
        .collect();

    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn hours(start: NaiveTime, end: NaiveTime, slot: i32, brk: i32, days: Vec<u32>) -> WorkingHours {
        WorkingHours {
            work_day_start: start,
            work_day_end: end,
            slot_duration: slot,
            break_duration: brk,
            lunch_start: None,
            lunch_end: None,
            has_lunch_break: false,
            work_days: days,
        }
    }

    // 2026-03-02 is a Monday.
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[test]
    fn test_three_hour_morning_yields_six_slots() {
        let h = hours(t(9, 0), t(12, 0), 30, 0, vec![1]);
        let slots = generate_slots(Uuid::new_v4(), None, &h, monday(), monday()).unwrap();

        let times: Vec<NaiveTime> = slots.iter().map(|s| s.slot_time).collect();
        assert_eq!(times, vec![t(9, 0), t(9, 30), t(10, 0), t(10, 30), t(11, 0), t(11, 30)]);
        assert!(slots.iter().all(|s| s.is_available && s.duration == 30));
    }

    #[test]
    fn test_lunch_removes_overlapping_slots() {
        let plain = hours(t(9, 0), t(17, 0), 30, 0, vec![1]);
        let mut with_lunch = plain.clone();
        with_lunch.has_lunch_break = true;
        with_lunch.lunch_start = Some(t(12, 0));
        with_lunch.lunch_end = Some(t(13, 0));

        let without = day_slot_times(&plain);
        let with = day_slot_times(&with_lunch);

        assert_eq!(without.len(), 16);
        assert!(!with.contains(&t(12, 0)));
        assert!(!with.contains(&t(12, 30)));
        assert!(with.contains(&t(11, 30)));
        assert!(with.contains(&t(13, 0)));
        assert_eq!(without.len() - with.len(), 2);
    }

    #[test]
    fn test_lunch_skip_keeps_cursor_cadence() {
        // 40 minute slots from 09:00: 09:00, 09:40, 10:20, 11:00, 11:40 (overlaps
        // 12:00-13:00), 12:20 (overlaps), 13:00, ...
        let mut h = hours(t(9, 0), t(14, 0), 40, 0, vec![1]);
        h.has_lunch_break = true;
        h.lunch_start = Some(t(12, 0));
        h.lunch_end = Some(t(13, 0));

        let times = day_slot_times(&h);
        assert_eq!(times, vec![t(9, 0), t(9, 40), t(10, 20), t(11, 0), t(13, 0)]);
    }

    #[test]
    fn test_break_and_trailing_gap() {
        // 25 minute slots with 10 minute breaks: 09:00, 09:35, 10:10 (ends 10:35);
        // 10:45 would end at 11:10 which is past 11:00.
        let h = hours(t(9, 0), t(11, 0), 25, 10, vec![1]);
        assert_eq!(day_slot_times(&h), vec![t(9, 0), t(9, 35), t(10, 10)]);
    }

    #[test]
    fn test_no_qualifying_weekday_is_empty() {
        let h = hours(t(9, 0), t(12, 0), 30, 0, vec![6, 7]);
        let friday = NaiveDate::from_ymd_opt(2026, 3, 6).unwrap();
        let slots = generate_slots(Uuid::new_v4(), None, &h, monday(), friday).unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn test_range_spans_only_work_days_in_order() {
        let h = hours(t(9, 0), t(10, 0), 30, 0, vec![1, 3]);
        let sunday = NaiveDate::from_ymd_opt(2026, 3, 8).unwrap();
        let slots = generate_slots(Uuid::new_v4(), None, &h, monday(), sunday).unwrap();

        let dates: Vec<NaiveDate> = slots.iter().map(|s| s.slot_date).collect();
        let wednesday = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
        assert_eq!(dates, vec![monday(), monday(), wednesday, wednesday]);
    }

    #[test]
    fn test_slots_stay_inside_workday_and_never_overlap() {
        let mut h = hours(t(8, 15), t(16, 50), 20, 5, vec![1, 2, 3, 4, 5]);
        h.has_lunch_break = true;
        h.lunch_start = Some(t(12, 10));
        h.lunch_end = Some(t(13, 5));

        let times = day_slot_times(&h);
        let start = minutes_of(h.work_day_start);
        let end = minutes_of(h.work_day_end);
        let (lunch_start, lunch_end) = (minutes_of(t(12, 10)), minutes_of(t(13, 5)));

        for pair in times.windows(2) {
            assert!(minutes_of(pair[0]) + 20 <= minutes_of(pair[1]));
        }
        for time in &times {
            let m = minutes_of(*time);
            assert!(m >= start && m + 20 <= end);
            assert!(!(m < lunch_end && m + 20 > lunch_start));
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let doctor = Uuid::new_v4();
        let h = hours(t(9, 0), t(12, 0), 15, 5, vec![1, 2, 3, 4, 5]);
        let end = NaiveDate::from_ymd_opt(2026, 3, 20).unwrap();
        let first = generate_slots(doctor, None, &h, monday(), end).unwrap();
        let second = generate_slots(doctor, None, &h, monday(), end).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_inverted_range() {
        let h = hours(t(9, 0), t(12, 0), 30, 0, vec![1]);
        let sunday = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert!(matches!(
            generate_slots(Uuid::new_v4(), None, &h, monday(), sunday),
            Err(ScheduleError::InvalidArgument(_))
        ));
    }
}
