//! Roster artifacts: individual assignments, per-day schedules, and the
//! roster produced by one generation pass.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Role, ShiftType};

/// How an assignment came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentSource {
    /// Placed by the roster builder.
    Auto,
    /// Injected by the end-of-week backfill pass.
    Backfill,
    /// Entered by a human editor.
    Manual,
    /// Result of an accepted swap request.
    Swap,
}

/// One employee assigned to one shift slot on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignedShift {
    pub employee_id: String,
    pub date: NaiveDate,
    pub shift: ShiftType,
    /// The role slot this assignment fills. May differ from the
    /// employee's native role via the hierarchy.
    pub role: Role,
    pub source: AssignmentSource,
    pub assigned_at: NaiveDateTime,
}

impl AssignedShift {
    pub fn new(
        employee_id: impl Into<String>,
        date: NaiveDate,
        shift: ShiftType,
        role: Role,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            date,
            shift,
            role,
            source: AssignmentSource::Auto,
            assigned_at: Utc::now().naive_utc(),
        }
    }

    pub fn with_source(mut self, source: AssignmentSource) -> Self {
        self.source = source;
        self
    }
}

/// One generated day: assignees per shift kind plus any issues recorded
/// while staffing it. Owned by the builder, never shared across dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDay {
    pub date: NaiveDate,
    shifts: BTreeMap<ShiftType, Vec<AssignedShift>>,
    /// Human-readable staffing problems (unmet roles, backfills).
    pub issues: Vec<String>,
}

impl ScheduleDay {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            shifts: BTreeMap::new(),
            issues: Vec::new(),
        }
    }

    /// Adds an assignment to its shift slot.
    pub fn push_assignment(&mut self, assignment: AssignedShift) {
        self.shifts.entry(assignment.shift).or_default().push(assignment);
    }

    /// Assignments in one shift slot.
    pub fn assigned(&self, shift: ShiftType) -> &[AssignedShift] {
        self.shifts.get(&shift).map_or(&[], |v| v.as_slice())
    }

    /// Employee ids in one shift slot, in assignment order.
    pub fn employee_ids(&self, shift: ShiftType) -> Vec<&str> {
        self.assigned(shift)
            .iter()
            .map(|a| a.employee_id.as_str())
            .collect()
    }

    /// Iterates every assignment of the day across all shift slots.
    pub fn all_assignments(&self) -> impl Iterator<Item = &AssignedShift> {
        self.shifts.values().flatten()
    }

    /// Total assignments across all shift slots.
    pub fn assignment_count(&self) -> usize {
        self.shifts.values().map(Vec::len).sum()
    }
}

/// A complete generated roster: one [`ScheduleDay`] per date, ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    pub days: Vec<ScheduleDay>,
}

impl Roster {
    /// The day for a date, if within the generated range.
    pub fn day(&self, date: NaiveDate) -> Option<&ScheduleDay> {
        self.days.iter().find(|d| d.date == date)
    }

    /// Flattens the roster into the per-date assignment map consumed by
    /// the work-rule validator. Every generated date is present as a key,
    /// even when nothing was assigned.
    pub fn by_date(&self) -> BTreeMap<NaiveDate, Vec<AssignedShift>> {
        self.days
            .iter()
            .map(|d| (d.date, d.all_assignments().cloned().collect()))
            .collect()
    }

    /// Total assignments across all days.
    pub fn total_assignments(&self) -> usize {
        self.days.iter().map(ScheduleDay::assignment_count).sum()
    }

    /// Iterates every recorded issue together with its date.
    pub fn issues(&self) -> impl Iterator<Item = (NaiveDate, &str)> {
        self.days
            .iter()
            .flat_map(|d| d.issues.iter().map(move |i| (d.date, i.as_str())))
    }
}
