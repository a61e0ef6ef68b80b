//! Pure calendar oracle: weekends, public holidays, business days.
//!
//! Holidays come in three flavors: a fixed calendar-date list, "Nth weekday
//! of month" movable holidays, and the two equinox days approximated
//! arithmetically (valid for 1980–2099). Everything here is deterministic
//! and side-effect free.

use chrono::{Datelike, NaiveDate, Weekday};

/// Holidays pinned to a calendar date, as (month, day).
const FIXED_HOLIDAYS: &[(u32, u32)] = &[
    (1, 1),   // New Year's Day
    (2, 11),  // National Foundation Day
    (2, 23),  // Emperor's Birthday
    (4, 29),  // Showa Day
    (5, 3),   // Constitution Memorial Day
    (5, 4),   // Greenery Day
    (5, 5),   // Children's Day
    (8, 11),  // Mountain Day
    (11, 3),  // Culture Day
    (11, 23), // Labor Thanksgiving Day
];

/// Movable holidays, as (month, weekday, nth occurrence).
const MOVABLE_HOLIDAYS: &[(u32, Weekday, u32)] = &[
    (1, Weekday::Mon, 2),  // Coming of Age Day
    (7, Weekday::Mon, 3),  // Marine Day
    (9, Weekday::Mon, 3),  // Respect for the Aged Day
    (10, Weekday::Mon, 2), // Sports Day
];

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn is_public_holiday(date: NaiveDate) -> bool {
    let month = date.month();
    let day = date.day();

    if FIXED_HOLIDAYS.contains(&(month, day)) {
        return true;
    }

    if MOVABLE_HOLIDAYS
        .iter()
        .any(|&(m, weekday, nth)| m == month && nth_weekday_of_month(date.year(), m, weekday, nth) == Some(date))
    {
        return true;
    }

    (month == 3 && day == vernal_equinox_day(date.year()))
        || (month == 9 && day == autumnal_equinox_day(date.year()))
}

/// A business day is any weekday that is not a public holiday.
pub fn is_business_day(date: NaiveDate) -> bool {
    !is_weekend(date) && !is_public_holiday(date)
}

/// Resolve the nth occurrence of a weekday within a month, if it exists.
pub fn nth_weekday_of_month(year: i32, month: u32, weekday: Weekday, nth: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let offset = (7 + weekday.num_days_from_monday() - first.weekday().num_days_from_monday()) % 7;
    let day = 1 + offset + (nth.checked_sub(1)?) * 7;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    (date.month() == month).then_some(date)
}

fn vernal_equinox_day(year: i32) -> u32 {
    equinox_day(year, 20.8431)
}

fn autumnal_equinox_day(year: i32) -> u32 {
    equinox_day(year, 23.2488)
}

// Standard astronomical approximation; the leap-cycle correction keeps the
// result aligned through 2099.
fn equinox_day(year: i32, base: f64) -> u32 {
    let years = year - 1980;
    (base + 0.242194 * years as f64) as u32 - (years / 4) as u32
}
