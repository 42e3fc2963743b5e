//! Shift vocabulary: the eight shift kinds, their canonical clock times,
//! and the coarse time-part classification used for preference lookups and
//! rest-window math.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Role;

/// Coarse day-part classification of a shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimePart {
    Morning,
    Afternoon,
    Night,
}

/// One of the eight staffable shift kinds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ShiftType {
    /// Main morning shift, 06:30–15:00.
    Morning,
    /// Extended morning, 06:30–16:30. Secondary slot filled from the
    /// day's morning assignees on weekdays.
    LongMorning,
    /// Afternoon shift, 14:45–21:45.
    Afternoon,
    /// Night shift, 21:45–06:30 (crosses midnight).
    Night,
    /// Early outpost post, 05:45–14:00. Sensitive zone.
    OutpostEarly,
    /// Late outpost post, 13:00–20:30. Sensitive zone.
    OutpostLate,
    /// Weekend afternoon patrol, 14:00–21:45. Sensitive zone; secondary
    /// slot filled from the day's afternoon assignees.
    Patrol,
    /// Visitor-center post, 08:30–16:30. Sensitive zone.
    VisitorCenter,
}

impl ShiftType {
    /// All shift kinds.
    pub const ALL: [ShiftType; 8] = [
        ShiftType::Morning,
        ShiftType::LongMorning,
        ShiftType::Afternoon,
        ShiftType::Night,
        ShiftType::OutpostEarly,
        ShiftType::OutpostLate,
        ShiftType::Patrol,
        ShiftType::VisitorCenter,
    ];

    /// Shift kinds staffed by the main per-day loop. `LongMorning` and
    /// `Patrol` are secondary slots filled by post-processing instead.
    pub const PRIMARY: [ShiftType; 6] = [
        ShiftType::Morning,
        ShiftType::Afternoon,
        ShiftType::Night,
        ShiftType::OutpostEarly,
        ShiftType::OutpostLate,
        ShiftType::VisitorCenter,
    ];

    /// Time-part classification of this shift.
    pub fn part(self) -> TimePart {
        match self {
            ShiftType::Morning
            | ShiftType::LongMorning
            | ShiftType::OutpostEarly
            | ShiftType::VisitorCenter => TimePart::Morning,
            ShiftType::Afternoon | ShiftType::OutpostLate | ShiftType::Patrol => {
                TimePart::Afternoon
            }
            ShiftType::Night => TimePart::Night,
        }
    }

    /// Whether the shift counts as a morning shift.
    pub fn is_morning(self) -> bool {
        self.part() == TimePart::Morning
    }

    /// Clock start time in fractional hours from midnight.
    pub fn start_hours(self) -> f64 {
        match self {
            ShiftType::Morning | ShiftType::LongMorning => 6.5,
            ShiftType::Afternoon => 14.75,
            ShiftType::Night => 21.75,
            ShiftType::OutpostEarly => 5.75,
            ShiftType::OutpostLate => 13.0,
            ShiftType::Patrol => 14.0,
            ShiftType::VisitorCenter => 8.5,
        }
    }

    /// Clock end time in fractional hours from midnight. `Night` ends at
    /// 06:30 on the following calendar day; the raw clock value is
    /// returned, see [`ShiftType::crosses_midnight`].
    pub fn end_hours(self) -> f64 {
        match self {
            ShiftType::Morning => 15.0,
            ShiftType::LongMorning | ShiftType::VisitorCenter => 16.5,
            ShiftType::Afternoon | ShiftType::Patrol => 21.75,
            ShiftType::Night => 6.5,
            ShiftType::OutpostEarly => 14.0,
            ShiftType::OutpostLate => 20.5,
        }
    }

    /// Whether the shift ends on the following calendar day.
    pub fn crosses_midnight(self) -> bool {
        matches!(self, ShiftType::Night)
    }

    /// Shift length in hours.
    pub fn duration_hours(self) -> f64 {
        if self.crosses_midnight() {
            24.0 - self.start_hours() + self.end_hours()
        } else {
            self.end_hours() - self.start_hours()
        }
    }

    /// The single role admitted to this shift if it is a sensitive zone.
    ///
    /// Sensitive zones override the role hierarchy: only the privileged
    /// role is eligible, regardless of seniority.
    pub fn sensitive_zone_role(self) -> Option<Role> {
        match self {
            ShiftType::OutpostEarly
            | ShiftType::OutpostLate
            | ShiftType::Patrol
            | ShiftType::VisitorCenter => Some(Role::Guard),
            _ => None,
        }
    }
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShiftType::Morning => "morning",
            ShiftType::LongMorning => "long-morning",
            ShiftType::Afternoon => "afternoon",
            ShiftType::Night => "night",
            ShiftType::OutpostEarly => "outpost-early",
            ShiftType::OutpostLate => "outpost-late",
            ShiftType::Patrol => "patrol",
            ShiftType::VisitorCenter => "visitor-center",
        };
        f.write_str(name)
    }
}
