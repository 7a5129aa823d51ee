// libs/schedule-cell/src/period.rs
//! Resolution of symbolic statistics periods into concrete date ranges.

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{StatisticsPeriod, StatisticsRequest};

fn first_of_month(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)
}

fn last_of_month(date: NaiveDate) -> Option<NaiveDate> {
    first_of_month(date)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

fn anchored(today: NaiveDate, months: u32) -> Option<(NaiveDate, NaiveDate)> {
    let end = today.checked_add_months(Months::new(months))?.pred_opt()?;
    Some((today, end))
}

/// `[from, to]` for `period` as seen on `today`.
pub fn resolve_period(
    period: StatisticsPeriod,
    start_from_today: bool,
    today: NaiveDate,
) -> Option<(NaiveDate, NaiveDate)> {
    match (period, start_from_today) {
        (StatisticsPeriod::Day, _) => Some((today, today)),
        (StatisticsPeriod::Week, true) => Some((today, today.checked_add_days(Days::new(6))?)),
        (StatisticsPeriod::Week, false) => {
            let offset = u64::from(today.weekday().num_days_from_monday());
            let monday = today.checked_sub_days(Days::new(offset))?;
            Some((monday, monday.checked_add_days(Days::new(6))?))
        }
        (StatisticsPeriod::Month, true) => anchored(today, 1),
        (StatisticsPeriod::Month, false) => Some((first_of_month(today)?, last_of_month(today)?)),
        (StatisticsPeriod::ThreeMonths, true) => anchored(today, 3),
        (StatisticsPeriod::ThreeMonths, false) => {
            let start = first_of_month(today)?.checked_sub_months(Months::new(2))?;
            Some((start, last_of_month(today)?))
        }
        (StatisticsPeriod::Year, true) => anchored(today, 12),
        (StatisticsPeriod::Year, false) => Some((
            NaiveDate::from_ymd_opt(today.year(), 1, 1)?,
            NaiveDate::from_ymd_opt(today.year(), 12, 31)?,
        )),
    }
}

fn out_of_range() -> ScheduleError {
    ScheduleError::InvalidArgument("Period is out of the supported date range".to_string())
}

/// Date range of a statistics request. Explicit dates win over the symbolic
/// period; a missing side falls back to the period (current month when none).
///
/// When only one side is given and the period's bound would land on the
/// wrong side of it, the missing bound is taken from a period window pinned
/// to the given date instead: a lone `from_date` gets the window starting on
/// it, a lone `to_date` gets the calendar window containing it.
pub fn resolve_range(
    request: &StatisticsRequest,
    today: NaiveDate,
) -> ScheduleResult<(NaiveDate, NaiveDate)> {
    let period = request.period.unwrap_or(StatisticsPeriod::Month);
    let (period_from, period_to) =
        resolve_period(period, request.start_from_today, today).ok_or_else(out_of_range)?;

    let (from, to) = match (request.from_date, request.to_date) {
        (Some(from), Some(to)) => (from, to),
        (Some(from), None) if from > period_to => {
            let (_, to) = resolve_period(period, true, from).ok_or_else(out_of_range)?;
            (from, to)
        }
        (Some(from), None) => (from, period_to),
        (None, Some(to)) if to < period_from => {
            let (from, _) = resolve_period(period, false, to).ok_or_else(out_of_range)?;
            (from, to)
        }
        (None, Some(to)) => (period_from, to),
        (None, None) => (period_from, period_to),
    };
    ensure_chronological(from, to)?;
    Ok((from, to))
}

pub fn ensure_chronological(from: NaiveDate, to: NaiveDate) -> ScheduleResult<()> {
    if from > to {
        return Err(ScheduleError::InvalidArgument(format!(
            "Start date {} is after end date {}",
            from, to
        )));
    }
    Ok(())
}

/// The window of equal length immediately before `[from, to]`.
pub fn previous_window(from: NaiveDate, to: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let length = u64::try_from((to - from).num_days()).ok()? + 1;
    let previous_to = from.pred_opt()?;
    let previous_from = from.checked_sub_days(Days::new(length))?;
    Some((previous_from, previous_to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ScopeKind, ScopeRequest};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    // 2026-03-04 is a Wednesday.
    fn wednesday() -> NaiveDate {
        d(2026, 3, 4)
    }

    fn request(period: Option<StatisticsPeriod>, from: Option<NaiveDate>, to: Option<NaiveDate>) -> StatisticsRequest {
        StatisticsRequest {
            scope: ScopeRequest {
                scope: ScopeKind::AllDoctors,
                hospital_id: None,
                speciality_id: None,
                doctor_id: None,
            },
            from_date: from,
            to_date: to,
            period,
            start_from_today: false,
        }
    }

    #[test]
    fn test_week_on_wednesday_is_monday_to_sunday() {
        assert_eq!(
            resolve_period(StatisticsPeriod::Week, false, wednesday()),
            Some((d(2026, 3, 2), d(2026, 3, 8)))
        );
    }

    #[test]
    fn test_week_from_today() {
        assert_eq!(
            resolve_period(StatisticsPeriod::Week, true, wednesday()),
            Some((wednesday(), d(2026, 3, 10)))
        );
    }

    #[test]
    fn test_day() {
        assert_eq!(resolve_period(StatisticsPeriod::Day, false, wednesday()), Some((wednesday(), wednesday())));
    }

    #[test]
    fn test_month_calendar_and_anchored() {
        assert_eq!(
            resolve_period(StatisticsPeriod::Month, false, d(2028, 2, 10)),
            Some((d(2028, 2, 1), d(2028, 2, 29)))
        );
        assert_eq!(
            resolve_period(StatisticsPeriod::Month, true, wednesday()),
            Some((wednesday(), d(2026, 4, 3)))
        );
    }

    #[test]
    fn test_three_months_rolls_back_over_year_end() {
        assert_eq!(
            resolve_period(StatisticsPeriod::ThreeMonths, false, d(2026, 1, 15)),
            Some((d(2025, 11, 1), d(2026, 1, 31)))
        );
        assert_eq!(
            resolve_period(StatisticsPeriod::ThreeMonths, true, d(2026, 1, 15)),
            Some((d(2026, 1, 15), d(2026, 4, 14)))
        );
    }

    #[test]
    fn test_year() {
        assert_eq!(
            resolve_period(StatisticsPeriod::Year, false, wednesday()),
            Some((d(2026, 1, 1), d(2026, 12, 31)))
        );
        assert_eq!(
            resolve_period(StatisticsPeriod::Year, true, wednesday()),
            Some((wednesday(), d(2027, 3, 3)))
        );
    }

    #[test]
    fn test_explicit_dates_override_period() {
        let req = request(Some(StatisticsPeriod::Year), Some(d(2026, 2, 1)), Some(d(2026, 2, 10)));
        assert_eq!(resolve_range(&req, wednesday()).unwrap(), (d(2026, 2, 1), d(2026, 2, 10)));
    }

    #[test]
    fn test_defaults_to_current_month() {
        let req = request(None, None, None);
        assert_eq!(resolve_range(&req, wednesday()).unwrap(), (d(2026, 3, 1), d(2026, 3, 31)));
    }

    #[test]
    fn test_rejects_reversed_range() {
        let req = request(None, Some(d(2026, 3, 10)), Some(d(2026, 3, 1)));
        assert!(matches!(resolve_range(&req, wednesday()), Err(ScheduleError::InvalidArgument(_))));
    }

    #[test]
    fn test_lone_from_date_inside_period_keeps_period_end() {
        let req = request(None, Some(d(2026, 3, 10)), None);
        assert_eq!(resolve_range(&req, wednesday()).unwrap(), (d(2026, 3, 10), d(2026, 3, 31)));
    }

    #[test]
    fn test_lone_from_date_after_period_end_derives_end() {
        let req = request(None, Some(d(2026, 5, 20)), None);
        assert_eq!(resolve_range(&req, wednesday()).unwrap(), (d(2026, 5, 20), d(2026, 6, 19)));

        let req = request(Some(StatisticsPeriod::Week), Some(d(2026, 4, 1)), None);
        assert_eq!(resolve_range(&req, wednesday()).unwrap(), (d(2026, 4, 1), d(2026, 4, 7)));
    }

    #[test]
    fn test_lone_to_date_before_period_start_derives_start() {
        let req = request(None, None, Some(d(2026, 1, 15)));
        assert_eq!(resolve_range(&req, wednesday()).unwrap(), (d(2026, 1, 1), d(2026, 1, 15)));
    }

    #[test]
    fn test_previous_window() {
        assert_eq!(
            previous_window(d(2026, 3, 2), d(2026, 3, 8)),
            Some((d(2026, 2, 23), d(2026, 3, 1)))
        );
    }
}
