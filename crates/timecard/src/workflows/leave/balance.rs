//! The per-(employee, leave type) balance ledger.
//!
//! Balances are only ever changed through the three mutators; `remaining`
//! is re-derived after every change so the `remaining == max(0, total -
//! used)` invariant cannot drift, even through over-consumption followed by
//! corrective restores.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::domain::LeaveType;
use crate::workflows::employee::EmployeeId;

/// Round a day quantity to the ledger's two-decimal, half-up precision.
pub fn round_days(days: Decimal) -> Decimal {
    days.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Running totals for one employee and one leave type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveBalance {
    pub employee_id: EmployeeId,
    pub leave_type: LeaveType,
    pub total: Decimal,
    pub used: Decimal,
    pub remaining: Decimal,
}

impl LeaveBalance {
    pub fn new(employee_id: EmployeeId, leave_type: LeaveType) -> Self {
        Self {
            employee_id,
            leave_type,
            total: Decimal::ZERO,
            used: Decimal::ZERO,
            remaining: Decimal::ZERO,
        }
    }

    /// Grant days into the balance; negative values correct earlier grants.
    pub fn add_to_total(&mut self, days: Decimal) {
        self.total = round_days(self.total + days);
        self.rederive();
    }

    /// Consume days on approval.
    pub fn consume(&mut self, days: Decimal) {
        self.used = round_days(self.used + days);
        self.rederive();
    }

    /// Hand days back on cancellation of an approved request.
    pub fn restore(&mut self, days: Decimal) {
        self.used = round_days((self.used - days).max(Decimal::ZERO));
        self.rederive();
    }

    /// Zero everything; applied when an employee is terminated.
    pub fn reset(&mut self) {
        self.total = Decimal::ZERO;
        self.used = Decimal::ZERO;
        self.remaining = Decimal::ZERO;
    }

    /// Replace the total outright (cleanup pass over expired grants).
    pub fn set_total(&mut self, total: Decimal) {
        self.total = round_days(total);
        self.rederive();
    }

    fn rederive(&mut self) {
        self.remaining = round_days((self.total - self.used).max(Decimal::ZERO));
    }
}

/// The figures reported for a balance query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub employee_id: EmployeeId,
    pub leave_type: LeaveType,
    pub remaining: Decimal,
    /// Days provisionally reserved by pending requests of this type.
    pub pending: Decimal,
    /// `remaining - pending`, floored at zero.
    pub available: Decimal,
}
