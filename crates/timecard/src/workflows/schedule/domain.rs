use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::config::ScheduleConfig;
use crate::workflows::employee::EmployeeId;
use crate::workflows::status::RequestStatus;
use crate::workflows::RequestId;

/// Which weekdays a work pattern applies to, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdaySet(pub [bool; 7]);

impl WeekdaySet {
    pub const fn none() -> Self {
        Self([false; 7])
    }

    pub fn from_days(days: &[Weekday]) -> Self {
        let mut set = [false; 7];
        for day in days {
            set[day.num_days_from_monday() as usize] = true;
        }
        Self(set)
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0[day.num_days_from_monday() as usize]
    }

    pub fn any(&self) -> bool {
        self.0.iter().any(|set| *set)
    }
}

/// Where a resolved schedule came from; overtime baselines differ between
/// the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleSource {
    Standard,
    Override,
}

/// The schedule in force for one employee on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveSchedule {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub break_minutes: i64,
    pub is_working_day: bool,
    pub source: ScheduleSource,
}

impl EffectiveSchedule {
    pub fn standard(config: &ScheduleConfig, is_working_day: bool) -> Self {
        Self {
            start: config.start,
            end: config.end,
            break_minutes: config.break_minutes,
            is_working_day,
            source: ScheduleSource::Standard,
        }
    }

    /// Scheduled start as a timestamp on the given date.
    pub fn start_on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.start)
    }

    /// Scheduled end as a timestamp; an end at or before the start belongs
    /// to the following day (overnight schedule).
    pub fn end_on(&self, date: NaiveDate) -> NaiveDateTime {
        if self.end <= self.start {
            (date + chrono::Duration::days(1)).and_time(self.end)
        } else {
            date.and_time(self.end)
        }
    }

    /// Nominal working minutes: scheduled span minus the scheduled break.
    pub fn working_minutes(&self) -> i64 {
        let span = span_minutes(self.start, self.end);
        (span - self.break_minutes).max(0)
    }
}

/// Minutes between two times of day, treating an end at or before the start
/// as belonging to the next day.
pub(crate) fn span_minutes(start: NaiveTime, end: NaiveTime) -> i64 {
    let raw = (end - start).num_minutes();
    if raw <= 0 {
        raw + 24 * 60
    } else {
        raw
    }
}

/// Inbound fields for a schedule-override proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkPatternSubmission {
    pub employee_id: EmployeeId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub break_minutes: i64,
    pub weekdays: WeekdaySet,
    pub applies_on_holiday: bool,
    pub reason: String,
}

/// A schedule-override request travelling through the approval workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkPatternChangeRequest {
    pub id: RequestId,
    pub employee_id: EmployeeId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub break_minutes: i64,
    /// Derived at submission: scheduled span minus break.
    pub working_minutes: i64,
    pub weekdays: WeekdaySet,
    pub applies_on_holiday: bool,
    pub reason: String,
    pub status: RequestStatus,
    pub approver_id: Option<EmployeeId>,
    pub decided_at: Option<NaiveDateTime>,
    pub rejection_comment: Option<String>,
}

impl WorkPatternChangeRequest {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Working-day evaluation under this pattern: the weekday set, OR'd with
    /// the holiday flag on public holidays.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        self.weekdays.contains(date.weekday())
            || (self.applies_on_holiday && calendar::is_public_holiday(date))
    }

    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && start <= self.end_date
    }

    /// Schedule carried by this pattern for metric computation.
    pub fn as_schedule(&self, is_working_day: bool) -> EffectiveSchedule {
        EffectiveSchedule {
            start: self.start_time,
            end: self.end_time,
            break_minutes: self.break_minutes,
            is_working_day,
            source: ScheduleSource::Override,
        }
    }
}
