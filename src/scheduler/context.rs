//! Mutable scheduling state threaded through one generation pass.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::models::ShiftType;

/// Running counters for one employee during a generation pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmployeeStats {
    /// Shifts assigned in the current week.
    pub weekly_shifts: u32,
    /// Morning-classified shifts assigned in the current week.
    pub weekly_morning_count: u32,
    /// Shifts assigned in the whole pass.
    pub monthly_shifts: u32,
    /// Long-morning secondary slots assigned in the whole pass.
    pub monthly_long_morning_count: u32,
    /// Length of the current consecutive-workday run.
    pub consecutive_days: u32,
    /// Most recent committed assignment.
    pub last_assignment: Option<(NaiveDate, ShiftType)>,
}

/// Scheduling state owned by the roster builder.
///
/// Mutated only by the builder after each committed assignment; the
/// scorer and assigner read it immutably. This ordering dependency is why
/// the whole generation pass is single-threaded by construction.
#[derive(Debug, Clone, Default)]
pub struct SchedulingContext {
    stats: HashMap<String, EmployeeStats>,
    assignments: HashMap<String, Vec<(NaiveDate, ShiftType)>>,
    /// Dates of the week currently being generated, ascending.
    pub week_dates: Vec<NaiveDate>,
}

impl SchedulingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The running counters for an employee (zeroed when never assigned).
    pub fn stats(&self, employee_id: &str) -> EmployeeStats {
        self.stats.get(employee_id).copied().unwrap_or_default()
    }

    /// Committed (date, shift) assignments for an employee, in commit order.
    pub fn assignments(&self, employee_id: &str) -> &[(NaiveDate, ShiftType)] {
        self.assignments
            .get(employee_id)
            .map_or(&[], |v| v.as_slice())
    }

    /// The employee's most recent committed assignment.
    pub fn last_assignment(&self, employee_id: &str) -> Option<(NaiveDate, ShiftType)> {
        self.stats(employee_id).last_assignment
    }

    /// Commits one primary assignment and updates every counter.
    pub fn record(&mut self, employee_id: &str, date: NaiveDate, shift: ShiftType) {
        let stats = self.stats.entry(employee_id.to_string()).or_default();
        stats.weekly_shifts += 1;
        if shift.is_morning() {
            stats.weekly_morning_count += 1;
        }
        stats.monthly_shifts += 1;
        stats.consecutive_days = match stats.last_assignment {
            Some((last, _)) if last == date => stats.consecutive_days,
            Some((last, _)) if (date - last).num_days() == 1 => stats.consecutive_days + 1,
            _ => 1,
        };
        stats.last_assignment = Some((date, shift));
        self.assignments
            .entry(employee_id.to_string())
            .or_default()
            .push((date, shift));
    }

    /// Bumps the long-morning secondary-slot counter. Secondary slots
    /// double up with a primary assignment and feed no other counter.
    pub fn record_long_morning(&mut self, employee_id: &str) {
        self.stats
            .entry(employee_id.to_string())
            .or_default()
            .monthly_long_morning_count += 1;
    }

    /// Resets weekly counters and the current-week date list.
    pub fn reset_week(&mut self) {
        for stats in self.stats.values_mut() {
            stats.weekly_shifts = 0;
            stats.weekly_morning_count = 0;
        }
        self.week_dates.clear();
    }

    /// Appends a date to the current week.
    pub fn push_week_date(&mut self, date: NaiveDate) {
        self.week_dates.push(date);
    }
}
