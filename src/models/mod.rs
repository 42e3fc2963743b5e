//! Rostering domain models.
//!
//! Core data types shared by the generation engine and the validator:
//! roles and their capability hierarchy, the shift vocabulary, per-day
//! availability preferences, staffing requirements and weekly quota rules,
//! and the roster artifacts themselves.

pub mod calendar;
mod preference;
mod requirement;
mod role;
mod schedule;
mod shift;

pub use preference::{DayPreference, Employee, ShiftChoice};
pub use requirement::{
    DayClass, ShiftRequirement, ShiftRequirements, WeeklyRules, WEEK_END, WEEK_START,
};
pub use role::{Role, RoleCounts};
pub use schedule::{AssignedShift, AssignmentSource, Roster, ScheduleDay};
pub use shift::{ShiftType, TimePart};
