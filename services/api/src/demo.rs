use chrono::{Datelike, Duration, Local, NaiveDate, NaiveTime, Weekday};
use clap::Args;
use rust_decimal_macros::dec;

use timecard::calendar;
use timecard::config::ScheduleConfig;
use timecard::error::AppError;
use timecard::workflows::attendance::AdjustmentSubmission;
use timecard::workflows::employee::{EmployeeId, EmployeeProfile};
use timecard::workflows::leave::{GrantSubmission, LeaveSubmission, LeaveTimeUnit, LeaveType};
use timecard::workflows::schedule::{WeekdaySet, WorkPatternSubmission};
use timecard::workflows::status::Decision;

use crate::infra;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Monday the demo week starts on (YYYY-MM-DD); defaults to the next
    /// business Monday.
    #[arg(long, value_parser = crate::cli::parse_date_arg)]
    pub(crate) week_start: Option<NaiveDate>,
}

fn next_business_monday(today: NaiveDate) -> NaiveDate {
    let mut date = today;
    loop {
        date += Duration::days(1);
        if date.weekday() == Weekday::Mon && calendar::is_business_day(date) {
            return date;
        }
    }
}

fn at(day: NaiveDate, hour: u32, minute: u32) -> chrono::NaiveDateTime {
    day.and_time(NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time"))
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let monday = args
        .week_start
        .unwrap_or_else(|| next_business_monday(Local::now().date_naive()));
    let tuesday = monday + Duration::days(1);
    let wednesday = monday + Duration::days(2);
    let thursday = monday + Duration::days(3);

    println!("Attendance engine demo (week of {monday})");

    let engine = infra::engine(ScheduleConfig::default());
    let worker = EmployeeId("emp-001".to_string());
    let manager = EmployeeId("mgr-001".to_string());
    engine.directory.register(EmployeeProfile {
        id: worker.clone(),
        display_name: "Asada Rin".to_string(),
        active: true,
    });
    engine.directory.register(EmployeeProfile {
        id: manager.clone(),
        display_name: "Mori Kenji".to_string(),
        active: true,
    });

    println!("\nClock events");
    match engine
        .attendance_service
        .record_clock_in(&worker, at(monday, 9, 20))
    {
        Ok(record) => println!(
            "- {} clocked in {} ({} minutes late)",
            record.employee_id, monday, record.late_minutes
        ),
        Err(err) => println!("- clock-in rejected: {err}"),
    }
    match engine
        .attendance_service
        .record_clock_out(&worker, at(monday, 19, 5))
    {
        Ok(record) => println!(
            "- clocked out: status {}, working break {} min, overtime {} min",
            record.status.label(),
            record.break_minutes,
            record.overtime_minutes
        ),
        Err(err) => println!("- clock-out rejected: {err}"),
    }

    println!("\nAdjustment workflow");
    let adjustment = engine.attendance_service.submit_adjustment(AdjustmentSubmission {
        employee_id: worker.clone(),
        date: tuesday,
        clock_in: at(tuesday, 9, 0),
        clock_out: at(tuesday, 18, 0),
        break_minutes: Some(60),
        reason: "badge reader outage".to_string(),
    });
    match adjustment {
        Ok(request) => {
            println!("- submitted {} for {}", request.id, request.date);
            match engine.attendance_service.decide_adjustment(
                &request.id,
                &manager,
                Decision::Approve,
                None,
                at(tuesday, 19, 0),
            ) {
                Ok(decided) => println!("- approved -> status {}", decided.status.label()),
                Err(err) => println!("- approval failed: {err}"),
            }
            match engine
                .attendance_service
                .cancel_adjustment(&request.id, &worker, at(tuesday, 20, 0))
            {
                Ok(cancelled) => {
                    println!("- cancelled -> status {}", cancelled.status.label())
                }
                Err(err) => println!("- cancellation failed: {err}"),
            }
        }
        Err(err) => println!("- submission rejected: {err}"),
    }

    println!("\nLeave workflow");
    match engine.leave_service.grant_leave(GrantSubmission {
        employee_id: worker.clone(),
        leave_type: LeaveType::Paid,
        days: dec!(10),
        granted_on: monday,
        expires_at: None,
        granted_by: manager.clone(),
    }) {
        Ok(grant) => println!("- granted {} paid days ({})", grant.days, grant.id),
        Err(err) => println!("- grant failed: {err}"),
    }

    let leave = engine.leave_service.submit_leave(
        LeaveSubmission {
            employee_id: worker.clone(),
            leave_type: LeaveType::Paid,
            time_unit: LeaveTimeUnit::FullDay,
            start_date: wednesday,
            end_date: thursday,
            reason: Some("family visit".to_string()),
        },
        at(monday, 10, 0),
    );
    match leave {
        Ok(request) => {
            println!(
                "- requested {} days {} -> {}",
                request.requested_days, request.start_date, request.end_date
            );
            match engine.leave_service.decide_leave(
                &request.id,
                &manager,
                Decision::Approve,
                None,
                at(monday, 11, 0),
            ) {
                Ok(_) => println!("- approved"),
                Err(err) => println!("- approval failed: {err}"),
            }
        }
        Err(err) => println!("- submission rejected: {err}"),
    }
    match engine
        .leave_service
        .balance_summary(&worker, LeaveType::Paid, monday)
    {
        Ok(summary) => println!(
            "- balance: remaining {}, pending {}, available {}",
            summary.remaining, summary.pending, summary.available
        ),
        Err(err) => println!("- balance unavailable: {err}"),
    }

    println!("\nSchedule override workflow");
    let pattern = engine.pattern_service.submit(WorkPatternSubmission {
        employee_id: worker.clone(),
        start_date: monday + Duration::days(7),
        end_date: monday + Duration::days(11),
        start_time: NaiveTime::from_hms_opt(10, 0, 0).expect("valid time"),
        end_time: NaiveTime::from_hms_opt(15, 0, 0).expect("valid time"),
        break_minutes: 0,
        weekdays: WeekdaySet::from_days(&[Weekday::Mon, Weekday::Tue, Weekday::Wed]),
        applies_on_holiday: false,
        reason: "reduced hours".to_string(),
    });
    match pattern {
        Ok(request) => {
            println!("- submitted {} covering {} -> {}", request.id, request.start_date, request.end_date);
            match engine.pattern_service.decide(
                &request.id,
                &manager,
                Decision::Approve,
                None,
                at(monday, 12, 0),
            ) {
                Ok(decided) => println!("- approved -> status {}", decided.status.label()),
                Err(err) => println!("- approval failed: {err}"),
            }
        }
        Err(err) => println!("- submission rejected: {err}"),
    }

    println!("\nAudit trail: {} decisions recorded", engine.audit.entries().len());
    Ok(())
}
