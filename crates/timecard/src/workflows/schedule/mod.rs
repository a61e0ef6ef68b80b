//! Work schedules: the resolver that decides which schedule governs a date,
//! and the approval workflow for schedule-override requests.

pub mod domain;
pub mod repository;
pub mod resolver;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    EffectiveSchedule, ScheduleSource, WeekdaySet, WorkPatternChangeRequest, WorkPatternSubmission,
};
pub use repository::PatternRepository;
pub use resolver::ScheduleResolver;
pub use router::schedule_router;
pub use service::{PatternError, WorkPatternService};
