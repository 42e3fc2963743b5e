//! Candidate scoring for one (employee, date, shift, role) slot.

use chrono::NaiveDate;
use rand::Rng;

use crate::models::{Employee, Role, ShiftChoice, ShiftType, TimePart};
use crate::rules::rest_hours;
use crate::scheduler::SchedulingContext;

/// Scores at or below this value are never assignable.
pub const HARD_REJECT: f64 = -1000.0;

/// Minimum rest the builder enforces between consecutive assignments.
/// Deliberately below the validator's 8h floor so that tight-but-legal
/// turnarounds still surface as warnings instead of empty slots.
pub const MIN_REST_HOURS_GENERATION: f64 = 7.5;

/// Desirability of assigning `employee` to `shift` on `date` in a
/// `required_role` slot. Higher is better; [`HARD_REJECT`] means never.
///
/// # Algorithm
///
/// Hard gates first (leave, blocked time-part, insufficient rest after
/// the previous assignment), then additive heuristics:
///
/// - stated day preference: prefer +10, minus −20, urgent neutral
/// - the shift kind is on the employee's preferred list: +2
/// - native role matches the slot exactly: +3; filled via hierarchy: +1
/// - fairness: −0.25 per shift already assigned this pass
/// - variety: −5 when the employee already holds this shift kind
///   anywhere in the pass
/// - controllers gravitate to afternoons (+30) over mornings (+5)
/// - spreading: −2 when the two most recent assignments both fall in
///   the current week
/// - everyone gets at least one weekly morning: +1000 when this would be
///   the employee's first morning of the week
/// - uniform jitter in [0, 1.5) so near-equal candidates rotate
pub fn score_candidate<R: Rng>(
    employee: &Employee,
    date: NaiveDate,
    shift: ShiftType,
    required_role: Role,
    ctx: &SchedulingContext,
    rng: &mut R,
) -> f64 {
    let choice = match employee.preference(date) {
        Some(pref) if pref.on_leave => return HARD_REJECT,
        Some(pref) => pref.choice_for(shift.part()),
        None => ShiftChoice::Unset,
    };
    if choice == ShiftChoice::Block {
        return HARD_REJECT;
    }
    if let Some((last_date, last_shift)) = ctx.last_assignment(&employee.id) {
        if rest_hours(last_shift, last_date, shift, date) < MIN_REST_HOURS_GENERATION {
            return HARD_REJECT;
        }
    }

    let stats = ctx.stats(&employee.id);
    let mut score = 0.0;

    score += match choice {
        ShiftChoice::Prefer => 10.0,
        ShiftChoice::Minus => -20.0,
        _ => 0.0,
    };

    if employee.preferred_shifts.contains(&shift) {
        score += 2.0;
    }

    if employee.role == required_role {
        score += 3.0;
    } else {
        score += 1.0;
    }

    score -= 0.25 * stats.monthly_shifts as f64;

    let log = ctx.assignments(&employee.id);
    if log.iter().any(|(_, held)| *held == shift) {
        score -= 5.0;
    }

    if employee.role == Role::Controller {
        match shift.part() {
            TimePart::Afternoon => score += 30.0,
            TimePart::Morning => score += 5.0,
            TimePart::Night => {}
        }
    }

    if log.len() >= 2
        && log[log.len() - 2..]
            .iter()
            .all(|(d, _)| ctx.week_dates.contains(d))
    {
        score -= 2.0;
    }

    if shift.is_morning() && stats.weekly_morning_count == 0 {
        score += 1000.0;
    }

    score + rng.random_range(0.0..1.5)
}
