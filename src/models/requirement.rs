//! Staffing requirements per shift kind and the weekly preference-quota
//! rules used by the validator.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::{Role, RoleCounts, ShiftType};

/// First day of the scheduling week.
pub const WEEK_START: Weekday = Weekday::Sun;

/// Last day of the scheduling week.
pub const WEEK_END: Weekday = Weekday::Sat;

/// Weekday/weekend classification of a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayClass {
    Weekday,
    Weekend,
}

impl DayClass {
    /// Friday and Saturday count as the weekend.
    pub fn of(date: NaiveDate) -> Self {
        if matches!(date.weekday(), Weekday::Fri | Weekday::Sat) {
            DayClass::Weekend
        } else {
            DayClass::Weekday
        }
    }
}

/// Staffing requirement for one (shift kind, day class).
///
/// The base role counts are tried first; each alternative option set, if
/// fully satisfiable, is an equally valid way to staff the shift. The
/// assigner keeps the highest-scoring fully-feasible option, falling back
/// to the base requirement's unmet-role issues when nothing is feasible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftRequirement {
    pub shift: ShiftType,
    pub day_class: DayClass,
    /// Base role counts.
    pub required: RoleCounts,
    /// Alternative option sets, evaluated in order after the base.
    #[serde(default)]
    pub alternatives: Vec<RoleCounts>,
}

impl ShiftRequirement {
    pub fn new(shift: ShiftType, day_class: DayClass, required: RoleCounts) -> Self {
        Self {
            shift,
            day_class,
            required,
            alternatives: Vec::new(),
        }
    }

    /// Adds an alternative option set.
    pub fn with_alternative(mut self, alternative: RoleCounts) -> Self {
        self.alternatives.push(alternative);
        self
    }

    /// Base requirement followed by alternatives, in evaluation order.
    pub fn role_sets(&self) -> Vec<&RoleCounts> {
        std::iter::once(&self.required)
            .chain(self.alternatives.iter())
            .collect()
    }
}

/// The full requirement table consulted by the roster builder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShiftRequirements {
    entries: Vec<ShiftRequirement>,
}

impl ShiftRequirements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, entry: ShiftRequirement) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn push(&mut self, entry: ShiftRequirement) {
        self.entries.push(entry);
    }

    /// The requirement for a (shift, day class), if configured.
    pub fn find(&self, shift: ShiftType, day_class: DayClass) -> Option<&ShiftRequirement> {
        self.entries
            .iter()
            .find(|e| e.shift == shift && e.day_class == day_class)
    }

    /// The default deployment table: full crews on weekdays, reduced crews
    /// on the weekend. Secondary slots (`LongMorning`, `Patrol`) carry no
    /// entry — they are filled by post-processing.
    pub fn standard() -> Self {
        let one = |role: Role| RoleCounts::new().with(role, 1);
        Self::new()
            .with_entry(ShiftRequirement::new(
                ShiftType::Morning,
                DayClass::Weekday,
                RoleCounts::new()
                    .with(Role::Supervisor, 1)
                    .with(Role::SeniorGuard, 1)
                    .with(Role::Guard, 1),
            ))
            .with_entry(ShiftRequirement::new(
                ShiftType::Afternoon,
                DayClass::Weekday,
                RoleCounts::new()
                    .with(Role::Supervisor, 1)
                    .with(Role::Guard, 1),
            ))
            .with_entry(ShiftRequirement::new(
                ShiftType::Night,
                DayClass::Weekday,
                RoleCounts::new()
                    .with(Role::SeniorGuard, 1)
                    .with(Role::Guard, 1),
            ))
            .with_entry(ShiftRequirement::new(
                ShiftType::OutpostEarly,
                DayClass::Weekday,
                one(Role::Guard),
            ))
            .with_entry(ShiftRequirement::new(
                ShiftType::OutpostLate,
                DayClass::Weekday,
                one(Role::Guard),
            ))
            .with_entry(ShiftRequirement::new(
                ShiftType::VisitorCenter,
                DayClass::Weekday,
                one(Role::Guard),
            ))
            .with_entry(ShiftRequirement::new(
                ShiftType::Morning,
                DayClass::Weekend,
                one(Role::Supervisor),
            ))
            .with_entry(ShiftRequirement::new(
                ShiftType::Afternoon,
                DayClass::Weekend,
                one(Role::Supervisor),
            ))
            .with_entry(ShiftRequirement::new(
                ShiftType::Night,
                DayClass::Weekend,
                RoleCounts::new()
                    .with(Role::SeniorGuard, 1)
                    .with(Role::Guard, 1),
            ))
            .with_entry(ShiftRequirement::new(
                ShiftType::OutpostEarly,
                DayClass::Weekend,
                one(Role::Guard),
            ))
            .with_entry(ShiftRequirement::new(
                ShiftType::OutpostLate,
                DayClass::Weekend,
                one(Role::Guard),
            ))
            .with_entry(ShiftRequirement::new(
                ShiftType::VisitorCenter,
                DayClass::Weekend,
                one(Role::Guard),
            ))
    }
}

/// Weekly preference-quota thresholds.
///
/// The `_one_exam` / `_two_exams` variants apply when the week contains
/// exam-note days or on-leave days; `max_minus` is never escalated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyRules {
    pub max_blocks: u32,
    pub max_minus: u32,
    pub min_open_mornings: u32,
    pub max_blocks_one_exam: u32,
    pub max_blocks_two_exams: u32,
    pub min_open_mornings_one_exam: u32,
    pub min_open_mornings_two_exams: u32,
}

impl WeeklyRules {
    /// The default deployment thresholds.
    pub fn standard() -> Self {
        Self {
            max_blocks: 5,
            max_minus: 2,
            min_open_mornings: 3,
            max_blocks_one_exam: 7,
            max_blocks_two_exams: 9,
            min_open_mornings_one_exam: 2,
            min_open_mornings_two_exams: 1,
        }
    }
}
