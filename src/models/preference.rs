//! Per-day availability preferences and the employee record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Role, ShiftType, TimePart};

/// An availability choice for one time-part of one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftChoice {
    /// No preference recorded.
    #[default]
    Unset,
    /// Wants the shift.
    Prefer,
    /// Would rather not; assignable with a penalty.
    Minus,
    /// Blocked; never assignable.
    Block,
    /// Urgent request note. Informational only, never scored.
    Urgent,
}

/// Availability record for one employee on one calendar date.
///
/// Choices are stored per time-part — that is the only granularity the
/// scheduler and validator ever read. The on-leave flag overrides every
/// choice for the date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayPreference {
    #[serde(default)]
    pub morning: ShiftChoice,
    #[serde(default)]
    pub afternoon: ShiftChoice,
    #[serde(default)]
    pub night: ShiftChoice,
    /// Free-text note. A note containing "exam" relaxes weekly quota rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_note: Option<String>,
    /// Reserve-duty style absence; overrides all shift choices that day.
    #[serde(default)]
    pub on_leave: bool,
}

impl DayPreference {
    /// A record with every choice unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// A record marking the whole day as on leave.
    pub fn leave() -> Self {
        Self {
            on_leave: true,
            ..Self::default()
        }
    }

    /// The choice recorded for a time-part.
    pub fn choice_for(&self, part: TimePart) -> ShiftChoice {
        match part {
            TimePart::Morning => self.morning,
            TimePart::Afternoon => self.afternoon,
            TimePart::Night => self.night,
        }
    }

    pub fn with_morning(mut self, choice: ShiftChoice) -> Self {
        self.morning = choice;
        self
    }

    pub fn with_afternoon(mut self, choice: ShiftChoice) -> Self {
        self.afternoon = choice;
        self
    }

    pub fn with_night(mut self, choice: ShiftChoice) -> Self {
        self.night = choice;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.day_note = Some(note.into());
        self
    }
}

/// An active staff member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub role: Role,
    /// Per-date availability. Absent dates mean no preference.
    #[serde(default)]
    pub preferences: HashMap<NaiveDate, DayPreference>,
    /// Long-term shift-kind preferences (small scoring bonus).
    #[serde(default)]
    pub preferred_shifts: Vec<ShiftType>,
}

impl Employee {
    /// Creates an employee with no recorded preferences.
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            preferences: HashMap::new(),
            preferred_shifts: Vec::new(),
        }
    }

    /// Records the preference for a date.
    pub fn with_preference(mut self, date: NaiveDate, pref: DayPreference) -> Self {
        self.preferences.insert(date, pref);
        self
    }

    /// Sets the long-term preferred shift kinds.
    pub fn with_preferred_shifts(
        mut self,
        shifts: impl IntoIterator<Item = ShiftType>,
    ) -> Self {
        self.preferred_shifts = shifts.into_iter().collect();
        self
    }

    /// The preference recorded for a date, if any.
    pub fn preference(&self, date: NaiveDate) -> Option<&DayPreference> {
        self.preferences.get(&date)
    }
}
