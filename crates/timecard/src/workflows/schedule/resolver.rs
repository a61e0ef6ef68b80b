use std::sync::Arc;

use chrono::NaiveDate;

use super::domain::EffectiveSchedule;
use super::repository::PatternRepository;
use crate::calendar;
use crate::config::ScheduleConfig;
use crate::workflows::attendance::repository::AttendanceRepository;
use crate::workflows::employee::EmployeeId;
use crate::workflows::RepositoryError;

/// Decides which schedule governs an employee's date: an approved override
/// pattern when one covers it, the standard schedule otherwise.
pub struct ScheduleResolver<P, A> {
    patterns: Arc<P>,
    attendance: Arc<A>,
    standard: ScheduleConfig,
}

impl<P, A> ScheduleResolver<P, A>
where
    P: PatternRepository,
    A: AttendanceRepository,
{
    pub fn new(patterns: Arc<P>, attendance: Arc<A>, standard: ScheduleConfig) -> Self {
        Self {
            patterns,
            attendance,
            standard,
        }
    }

    pub fn standard_config(&self) -> &ScheduleConfig {
        &self.standard
    }

    /// Resolve the effective schedule for the date.
    ///
    /// A date with recorded clock data is always a working day: actual
    /// presence overrides the nominal schedule, so an override-holiday can
    /// still carry metrics when the employee showed up.
    pub fn resolve(
        &self,
        employee_id: &EmployeeId,
        date: NaiveDate,
    ) -> Result<EffectiveSchedule, RepositoryError> {
        let mut schedule = match self.patterns.approved_covering(employee_id, date)? {
            Some(pattern) => {
                let working = pattern.applies_on(date);
                pattern.as_schedule(working)
            }
            None => EffectiveSchedule::standard(&self.standard, calendar::is_business_day(date)),
        };

        if !schedule.is_working_day {
            let clocked = self
                .attendance
                .fetch(employee_id, date)?
                .map(|record| record.has_clock_data())
                .unwrap_or(false);
            if clocked {
                schedule.is_working_day = true;
            }
        }

        Ok(schedule)
    }
}

// Resolvers are shared by the attendance and leave services; the clone is
// cheap because the stores sit behind Arcs.
impl<P, A> Clone for ScheduleResolver<P, A> {
    fn clone(&self) -> Self {
        Self {
            patterns: Arc::clone(&self.patterns),
            attendance: Arc::clone(&self.attendance),
            standard: self.standard,
        }
    }
}
