//! Pure clock-metric computation against a resolved schedule.
//!
//! Everything here is arithmetic over the inputs; the ledger and the
//! workflows decide when to call it and what to do with the results.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use super::domain::AttendanceStatus;
use crate::fault::{Fault, FaultKind};
use crate::workflows::schedule::domain::{EffectiveSchedule, ScheduleSource};

/// Minutes derived from one clock-in/clock-out pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputedMetrics {
    /// The break actually deducted, after sanitation.
    pub break_minutes: i64,
    pub late_minutes: i64,
    pub early_leave_minutes: i64,
    pub working_minutes: i64,
    pub overtime_minutes: i64,
    pub night_shift_minutes: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("clock-in {clock_in} is after clock-out {clock_out}")]
    ClockOrder {
        clock_in: NaiveDateTime,
        clock_out: NaiveDateTime,
    },
}

impl Fault for MetricsError {
    fn kind(&self) -> FaultKind {
        FaultKind::InvalidInput
    }

    fn code(&self) -> &'static str {
        "clock_order"
    }
}

/// Minimum break demanded for a shift of the given elapsed length; doubles
/// as the default when the caller supplies no break.
pub fn minimum_break_for(elapsed_minutes: i64) -> i64 {
    if elapsed_minutes >= 480 {
        60
    } else if elapsed_minutes >= 360 {
        45
    } else {
        0
    }
}

/// Break resolution, precedence: explicit value (clamped to the elapsed
/// span) over duration-based default over zero.
pub fn sanitize_break(explicit: Option<i64>, elapsed_minutes: i64) -> i64 {
    match explicit {
        Some(minutes) => minutes.clamp(0, elapsed_minutes),
        None => minimum_break_for(elapsed_minutes),
    }
}

/// Compute the full metric set for a shift on `date` under `schedule`.
pub fn compute(
    date: NaiveDate,
    clock_in: NaiveDateTime,
    clock_out: NaiveDateTime,
    explicit_break: Option<i64>,
    schedule: &EffectiveSchedule,
) -> Result<ComputedMetrics, MetricsError> {
    if clock_out < clock_in {
        return Err(MetricsError::ClockOrder {
            clock_in,
            clock_out,
        });
    }

    let elapsed = (clock_out - clock_in).num_minutes();
    let mut break_minutes = sanitize_break(explicit_break, elapsed);

    // Shifts under the standard schedule spanning the lunch hour always
    // have at least the 60-minute lunch deducted, whatever the caller sent.
    if schedule.source == ScheduleSource::Standard && spans_lunch(date, clock_in, clock_out) {
        break_minutes = break_minutes.max(60).min(elapsed);
    }

    let late_minutes = ceil_positive_minutes(clock_in - schedule.start_on(date));
    let early_leave_minutes = ceil_positive_minutes(schedule.end_on(date) - clock_out);
    let working_minutes = (elapsed - break_minutes).max(0);
    let overtime_minutes = (working_minutes - schedule.working_minutes()).max(0);
    let night_shift_minutes = night_shift_minutes(clock_in, clock_out);

    Ok(ComputedMetrics {
        break_minutes,
        late_minutes,
        early_leave_minutes,
        working_minutes,
        overtime_minutes,
        night_shift_minutes,
    })
}

/// Status precedence: both lateness flags beat everything, then night work,
/// then overtime.
pub fn classify(metrics: &ComputedMetrics) -> AttendanceStatus {
    match (metrics.late_minutes > 0, metrics.early_leave_minutes > 0) {
        (true, true) => AttendanceStatus::LateAndEarlyLeave,
        (true, false) => AttendanceStatus::Late,
        (false, true) => AttendanceStatus::EarlyLeave,
        (false, false) => {
            if metrics.night_shift_minutes > 0 {
                AttendanceStatus::NightShift
            } else if metrics.overtime_minutes > 0 {
                AttendanceStatus::Overtime
            } else {
                AttendanceStatus::Normal
            }
        }
    }
}

/// Minutes of lateness for a clock-in against the scheduled start.
pub fn late_minutes(scheduled_start: NaiveDateTime, clock_in: NaiveDateTime) -> i64 {
    ceil_positive_minutes(clock_in - scheduled_start)
}

/// Overlap of the shift with the nightly window [22:00, 06:00 next day),
/// summed across however many day boundaries the shift crosses.
pub fn night_shift_minutes(clock_in: NaiveDateTime, clock_out: NaiveDateTime) -> i64 {
    let night_start = NaiveTime::from_hms_opt(22, 0, 0).expect("valid night start");
    let night_end = NaiveTime::from_hms_opt(6, 0, 0).expect("valid night end");

    let mut total = 0;
    // The window that started the previous evening can still cover the
    // morning side of the clock-in.
    let mut day = clock_in.date() - Duration::days(1);
    loop {
        let window_start = day.and_time(night_start);
        if window_start >= clock_out {
            break;
        }
        let window_end = (day + Duration::days(1)).and_time(night_end);
        let overlap =
            (clock_out.min(window_end) - clock_in.max(window_start)).num_minutes();
        if overlap > 0 {
            total += overlap;
        }
        day += Duration::days(1);
    }

    total
}

/// Positive durations round up to the next whole minute; a single second
/// over the boundary counts as a full minute.
fn ceil_positive_minutes(duration: Duration) -> i64 {
    let seconds = duration.num_seconds();
    if seconds <= 0 {
        0
    } else {
        (seconds + 59) / 60
    }
}

fn spans_lunch(date: NaiveDate, clock_in: NaiveDateTime, clock_out: NaiveDateTime) -> bool {
    let noon = date.and_time(NaiveTime::from_hms_opt(12, 0, 0).expect("valid noon"));
    let one_pm = date.and_time(NaiveTime::from_hms_opt(13, 0, 0).expect("valid 13:00"));
    clock_in <= noon && clock_out >= one_pm
}
