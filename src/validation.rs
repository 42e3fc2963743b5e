//! Work-rule validation over a finished (or externally edited) roster.
//!
//! Pure functions over a per-date assignment map: validation never
//! mutates the roster and never short-circuits, so every violation an
//! employee has is reported in one pass. Safe to run per employee in
//! parallel.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::calendar::{in_first_half, week_start};
use crate::models::{AssignedShift, DayClass, Employee, ShiftChoice, TimePart, WeeklyRules};
use crate::rules::{rest_hours, MAX_CONSECUTIVE_DAYS};

/// Minimum rest the validator accepts between adjacent-day assignments.
/// Stricter than the builder's generation floor.
pub const MIN_REST_HOURS: f64 = 8.0;

/// Night-shift density cap: more than this many nights within any
/// [`NIGHT_WINDOW_DAYS`] consecutive calendar days is a violation.
const MAX_NIGHTS_IN_WINDOW: usize = 7;
const NIGHT_WINDOW_DAYS: usize = 14;

/// Day notes containing this keyword mark exam days for the weekly
/// escalation tiers.
const EXAM_KEYWORD: &str = "exam";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationKind {
    ConsecutiveDays,
    NightDensity,
    DoubleShift,
    ProhibitedTransition,
    DifficultTransition,
    ShortRest,
    HalfMonthMorning,
    WeeklyMorningMiss,
    WeeklyOpenMornings,
    WeeklyBlockLimit,
    WeeklyMinusLimit,
}

/// One violated work rule for one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkRuleViolation {
    pub kind: ViolationKind,
    pub severity: Severity,
    pub message: String,
    pub employee_id: String,
    /// The dates the violation spans.
    pub dates: Vec<NaiveDate>,
}

/// Per-date assignments, every covered date present as a key.
pub type ScheduleMap = BTreeMap<NaiveDate, Vec<AssignedShift>>;

/// Validates one employee against a finished schedule.
///
/// Checks, in order: consecutive-day runs, night density, double shifts,
/// day-to-day transitions, rest gaps, per-half-month morning coverage,
/// and (when rules are given) the weekly preference quotas.
pub fn validate_work_rules(
    employee: &Employee,
    schedule: &ScheduleMap,
    weekly_rules: Option<&WeeklyRules>,
) -> Vec<WorkRuleViolation> {
    // The employee's own assignments, keyed by date, dates ascending.
    let mine: BTreeMap<NaiveDate, Vec<&AssignedShift>> = schedule
        .iter()
        .filter_map(|(date, assignments)| {
            let own: Vec<&AssignedShift> = assignments
                .iter()
                .filter(|a| a.employee_id == employee.id)
                .collect();
            if own.is_empty() {
                None
            } else {
                Some((*date, own))
            }
        })
        .collect();

    let mut violations = Vec::new();
    check_consecutive_runs(employee, &mine, &mut violations);
    check_night_density(employee, schedule, &mine, &mut violations);
    check_double_shifts(employee, &mine, &mut violations);
    check_transitions_and_rest(employee, &mine, &mut violations);
    check_half_month_mornings(employee, schedule, &mine, &mut violations);
    if let Some(rules) = weekly_rules {
        check_weekly_quotas(employee, schedule, &mine, rules, &mut violations);
    }
    violations
}

/// Validates every employee; violations in employee order.
pub fn validate_all(
    employees: &[Employee],
    schedule: &ScheduleMap,
    weekly_rules: Option<&WeeklyRules>,
) -> Vec<WorkRuleViolation> {
    employees
        .iter()
        .flat_map(|e| validate_work_rules(e, schedule, weekly_rules))
        .collect()
}

fn check_consecutive_runs(
    employee: &Employee,
    mine: &BTreeMap<NaiveDate, Vec<&AssignedShift>>,
    violations: &mut Vec<WorkRuleViolation>,
) {
    let dates: Vec<NaiveDate> = mine.keys().copied().collect();
    let mut run: Vec<NaiveDate> = Vec::new();
    for (i, &date) in dates.iter().enumerate() {
        let adjacent = i > 0 && (date - dates[i - 1]).num_days() == 1;
        if !adjacent {
            flush_run(employee, &run, violations);
            run.clear();
        }
        run.push(date);
    }
    flush_run(employee, &run, violations);
}

fn flush_run(
    employee: &Employee,
    run: &[NaiveDate],
    violations: &mut Vec<WorkRuleViolation>,
) {
    if run.len() as u32 > MAX_CONSECUTIVE_DAYS {
        violations.push(WorkRuleViolation {
            kind: ViolationKind::ConsecutiveDays,
            severity: Severity::Error,
            message: format!(
                "{} worked {} consecutive days ending {}",
                employee.name,
                run.len(),
                run[run.len() - 1],
            ),
            employee_id: employee.id.clone(),
            dates: run.to_vec(),
        });
    }
}

fn check_night_density(
    employee: &Employee,
    schedule: &ScheduleMap,
    mine: &BTreeMap<NaiveDate, Vec<&AssignedShift>>,
    violations: &mut Vec<WorkRuleViolation>,
) {
    // The window slides over the schedule's calendar dates, assigned or
    // not, so sparse rosters are not compressed into a denser one.
    let nights_per_date: Vec<(NaiveDate, bool)> = schedule
        .keys()
        .map(|date| {
            let night = mine
                .get(date)
                .map(|assignments| {
                    assignments
                        .iter()
                        .any(|a| a.shift.part() == TimePart::Night)
                })
                .unwrap_or(false);
            (*date, night)
        })
        .collect();

    let windows: Vec<&[(NaiveDate, bool)]> = if nights_per_date.len() < NIGHT_WINDOW_DAYS {
        vec![nights_per_date.as_slice()]
    } else {
        nights_per_date.windows(NIGHT_WINDOW_DAYS).collect()
    };

    for window in windows {
        let nights = window.iter().filter(|(_, night)| *night).count();
        if nights > MAX_NIGHTS_IN_WINDOW {
            violations.push(WorkRuleViolation {
                kind: ViolationKind::NightDensity,
                severity: Severity::Error,
                message: format!(
                    "{} has {} night shifts within {} days",
                    employee.name,
                    nights,
                    window.len(),
                ),
                employee_id: employee.id.clone(),
                dates: window
                    .iter()
                    .filter(|(_, night)| *night)
                    .map(|(d, _)| *d)
                    .collect(),
            });
            // One report per employee is enough; sliding further only
            // repeats overlapping windows.
            break;
        }
    }
}

fn check_double_shifts(
    employee: &Employee,
    mine: &BTreeMap<NaiveDate, Vec<&AssignedShift>>,
    violations: &mut Vec<WorkRuleViolation>,
) {
    for (date, assignments) in mine {
        if assignments.len() > 1 {
            violations.push(WorkRuleViolation {
                kind: ViolationKind::DoubleShift,
                severity: Severity::Error,
                message: format!(
                    "{} has {} assignments on {}",
                    employee.name,
                    assignments.len(),
                    date,
                ),
                employee_id: employee.id.clone(),
                dates: vec![*date],
            });
        }
    }
}

fn classify_transition(prev: TimePart, next: TimePart) -> Option<(ViolationKind, Severity)> {
    use TimePart::*;
    match (prev, next) {
        (Morning, Afternoon) | (Afternoon, Morning) | (Night, Morning) => {
            Some((ViolationKind::ProhibitedTransition, Severity::Error))
        }
        (Morning, Night) | (Afternoon, Night) | (Night, Afternoon) => {
            Some((ViolationKind::DifficultTransition, Severity::Warning))
        }
        _ => None,
    }
}

fn check_transitions_and_rest(
    employee: &Employee,
    mine: &BTreeMap<NaiveDate, Vec<&AssignedShift>>,
    violations: &mut Vec<WorkRuleViolation>,
) {
    let days: Vec<(NaiveDate, &Vec<&AssignedShift>)> =
        mine.iter().map(|(d, a)| (*d, a)).collect();
    for pair in days.windows(2) {
        let (prev_date, prev) = pair[0];
        let (next_date, next) = pair[1];
        if (next_date - prev_date).num_days() != 1 {
            continue;
        }
        let prev_shift = earliest_shift(prev);
        let next_shift = earliest_shift(next);

        if let Some((kind, severity)) = classify_transition(prev_shift.part(), next_shift.part())
        {
            let label = match kind {
                ViolationKind::ProhibitedTransition => "prohibited",
                _ => "difficult",
            };
            violations.push(WorkRuleViolation {
                kind,
                severity,
                message: format!(
                    "{}: {} transition from {} on {} to {} on {}",
                    employee.name, label, prev_shift, prev_date, next_shift, next_date,
                ),
                employee_id: employee.id.clone(),
                dates: vec![prev_date, next_date],
            });
        }

        let rest = rest_hours(prev_shift, prev_date, next_shift, next_date);
        if rest < MIN_REST_HOURS {
            violations.push(WorkRuleViolation {
                kind: ViolationKind::ShortRest,
                severity: Severity::Error,
                message: format!(
                    "{}: only {rest:.2}h of rest between {} on {} and {} on {}",
                    employee.name, prev_shift, prev_date, next_shift, next_date,
                ),
                employee_id: employee.id.clone(),
                dates: vec![prev_date, next_date],
            });
        }
    }
}

/// The day's earliest assignment by start time.
fn earliest_shift(assignments: &[&AssignedShift]) -> crate::models::ShiftType {
    assignments
        .iter()
        .map(|a| a.shift)
        .min_by(|a, b| {
            a.start_hours()
                .partial_cmp(&b.start_hours())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or(crate::models::ShiftType::Morning)
}

fn check_half_month_mornings(
    employee: &Employee,
    schedule: &ScheduleMap,
    mine: &BTreeMap<NaiveDate, Vec<&AssignedShift>>,
    violations: &mut Vec<WorkRuleViolation>,
) {
    use chrono::Datelike;

    // (year, month, first half?) buckets over the covered dates.
    let mut halves: BTreeMap<(i32, u32, bool), Vec<NaiveDate>> = BTreeMap::new();
    for &date in schedule.keys() {
        halves
            .entry((date.year(), date.month(), in_first_half(date)))
            .or_default()
            .push(date);
    }

    for ((_, month, first), dates) in &halves {
        let on_leave = dates.iter().any(|d| {
            employee.preference(*d).map(|p| p.on_leave).unwrap_or(false)
        });
        if on_leave {
            continue;
        }
        let worked_morning = dates.iter().any(|d| {
            mine.get(d)
                .map(|a| a.iter().any(|s| s.shift.is_morning()))
                .unwrap_or(false)
        });
        if !worked_morning {
            let half = if *first { "first" } else { "second" };
            violations.push(WorkRuleViolation {
                kind: ViolationKind::HalfMonthMorning,
                severity: Severity::Error,
                message: format!(
                    "{} has no morning shift in the {} half of month {}",
                    employee.name, half, month,
                ),
                employee_id: employee.id.clone(),
                dates: dates.clone(),
            });
        }
    }
}

fn check_weekly_quotas(
    employee: &Employee,
    schedule: &ScheduleMap,
    mine: &BTreeMap<NaiveDate, Vec<&AssignedShift>>,
    rules: &WeeklyRules,
    violations: &mut Vec<WorkRuleViolation>,
) {
    let mut weeks: BTreeMap<NaiveDate, Vec<NaiveDate>> = BTreeMap::new();
    for &date in schedule.keys() {
        weeks.entry(week_start(date)).or_default().push(date);
    }

    for (start, dates) in &weeks {
        let mut leave_days = 0u32;
        let mut exam_days = 0u32;
        let mut blocks = 0u32;
        let mut minus = 0u32;
        let mut open_mornings = 0u32;

        for &date in dates {
            let Some(pref) = employee.preference(date) else {
                if DayClass::of(date) == DayClass::Weekday {
                    open_mornings += 1;
                }
                continue;
            };
            if pref
                .day_note
                .as_deref()
                .map(|n| n.to_lowercase().contains(EXAM_KEYWORD))
                .unwrap_or(false)
            {
                exam_days += 1;
            }
            if pref.on_leave {
                leave_days += 1;
                continue;
            }
            for part in [TimePart::Morning, TimePart::Afternoon, TimePart::Night] {
                match pref.choice_for(part) {
                    ShiftChoice::Block => blocks += 1,
                    ShiftChoice::Minus => minus += 1,
                    _ => {}
                }
            }
            if DayClass::of(date) == DayClass::Weekday
                && pref.choice_for(TimePart::Morning) != ShiftChoice::Block
            {
                open_mornings += 1;
            }
        }

        let worked_morning = dates.iter().any(|d| {
            mine.get(d)
                .map(|a| a.iter().any(|s| s.shift.is_morning()))
                .unwrap_or(false)
        });

        // Exam weeks and leave weeks relax the block/open-morning quotas.
        let (max_blocks, min_open) = if exam_days >= 2 || leave_days >= 2 {
            (rules.max_blocks_two_exams, rules.min_open_mornings_two_exams)
        } else if exam_days == 1 || leave_days == 1 {
            (rules.max_blocks_one_exam, rules.min_open_mornings_one_exam)
        } else {
            (rules.max_blocks, rules.min_open_mornings)
        };

        if leave_days == 0 && exam_days == 0 && open_mornings > 0 && !worked_morning {
            violations.push(WorkRuleViolation {
                kind: ViolationKind::WeeklyMorningMiss,
                severity: Severity::Error,
                message: format!(
                    "{} has no morning shift in the week of {}",
                    employee.name, start,
                ),
                employee_id: employee.id.clone(),
                dates: dates.clone(),
            });
        }
        if open_mornings < min_open {
            violations.push(WorkRuleViolation {
                kind: ViolationKind::WeeklyOpenMornings,
                severity: Severity::Error,
                message: format!(
                    "{} left only {} open mornings in the week of {} (minimum {})",
                    employee.name, open_mornings, start, min_open,
                ),
                employee_id: employee.id.clone(),
                dates: dates.clone(),
            });
        }
        if blocks > max_blocks {
            violations.push(WorkRuleViolation {
                kind: ViolationKind::WeeklyBlockLimit,
                severity: Severity::Error,
                message: format!(
                    "{} marked {} blocks in the week of {} (maximum {})",
                    employee.name, blocks, start, max_blocks,
                ),
                employee_id: employee.id.clone(),
                dates: dates.clone(),
            });
        }
        if minus > rules.max_minus {
            violations.push(WorkRuleViolation {
                kind: ViolationKind::WeeklyMinusLimit,
                severity: Severity::Error,
                message: format!(
                    "{} marked {} minus days in the week of {} (maximum {})",
                    employee.name, minus, start, rules.max_minus,
                ),
                employee_id: employee.id.clone(),
                dates: dates.clone(),
            });
        }
    }
}
