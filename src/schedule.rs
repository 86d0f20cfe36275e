use chrono::{DateTime, Datelike, Local, NaiveTime, Weekday};

use crate::config::{PeriodEntry, ScheduleConfig};

/// Label and icon reported when no period matches
pub const OUT_OF_HOURS_LABEL: &str = "Okul Kapalı";
pub const OUT_OF_HOURS_ICON: &str = "🚫";

/// The period the board is currently in
#[derive(Debug, Clone, PartialEq)]
pub enum CurrentPeriod {
    /// Inside a scheduled period
    InPeriod(PeriodEntry),
    /// Outside school hours (or the schedule is empty)
    OutOfHours,
}

impl CurrentPeriod {
    pub fn label(&self) -> &str {
        match self {
            CurrentPeriod::InPeriod(entry) => &entry.label,
            CurrentPeriod::OutOfHours => OUT_OF_HOURS_LABEL,
        }
    }

    pub fn icon(&self) -> &str {
        match self {
            CurrentPeriod::InPeriod(entry) if !entry.icon.is_empty() => &entry.icon,
            CurrentPeriod::InPeriod(_) => "",
            CurrentPeriod::OutOfHours => OUT_OF_HOURS_ICON,
        }
    }

    pub fn entry(&self) -> Option<&PeriodEntry> {
        match self {
            CurrentPeriod::InPeriod(entry) => Some(entry),
            CurrentPeriod::OutOfHours => None,
        }
    }

    /// Whether this period forces the board locked. Out-of-hours never
    /// does; a closed school is not a break.
    pub fn is_break(&self) -> bool {
        match self {
            CurrentPeriod::InPeriod(entry) => entry.kind.is_break(),
            CurrentPeriod::OutOfHours => false,
        }
    }
}

/// Get the current period for the local wall clock
pub fn current_period(schedule: &ScheduleConfig, now: DateTime<Local>) -> CurrentPeriod {
    period_at(schedule, now.weekday(), now.time())
}

/// Get the period for a specific weekday and time of day
///
/// Fridays use the Friday timetable; every other day, weekends
/// included, uses the standard one. The first entry whose inclusive
/// range contains the time wins, so a period's end beats the next
/// period's identical start. No match means out-of-hours.
pub fn period_at(schedule: &ScheduleConfig, weekday: Weekday, time: NaiveTime) -> CurrentPeriod {
    let timetable = timetable_for(schedule, weekday);

    for entry in timetable {
        if entry.start <= time && time <= entry.end {
            return CurrentPeriod::InPeriod(entry.clone());
        }
    }

    CurrentPeriod::OutOfHours
}

/// Select the timetable that applies on a given weekday
pub fn timetable_for(schedule: &ScheduleConfig, weekday: Weekday) -> &[PeriodEntry] {
    if weekday == Weekday::Fri {
        &schedule.friday
    } else {
        &schedule.standard
    }
}

/// Whole minutes left in a period, clamped at zero
pub fn remaining_minutes(entry: &PeriodEntry, time: NaiveTime) -> i64 {
    (entry.end - time).num_minutes().max(0)
}
