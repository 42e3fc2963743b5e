//! Eligibility predicates shared by the scheduler and the validator.
//!
//! Role fit, per-day availability, shift-to-shift conflicts, and the rest
//! gap between two assignments. All functions are pure.

use chrono::NaiveDate;

use crate::models::{Employee, Role, ShiftChoice, ShiftType};

/// Longest permitted run of consecutive workdays.
pub const MAX_CONSECUTIVE_DAYS: u32 = 6;

/// Whether an employee with `employee_role` may fill a `required_role`
/// slot on `shift`.
///
/// The required role must be reachable downward in the hierarchy. For
/// sensitive zones the hierarchy is overridden, not merely filtered: only
/// the zone's privileged role is eligible.
pub fn can_fill_role(employee_role: Role, required_role: Role, shift: ShiftType) -> bool {
    if !employee_role.can_act_as(required_role) {
        return false;
    }
    match shift.sensitive_zone_role() {
        Some(privileged) => employee_role == privileged,
        None => true,
    }
}

/// Whether the employee is assignable to `shift` on `date`.
///
/// False when on leave or when the choice for the shift's time-part is
/// `Block`; true otherwise, including `Unset`, `Minus`, `Prefer`, and
/// `Urgent`.
pub fn is_available(employee: &Employee, date: NaiveDate, shift: ShiftType) -> bool {
    match employee.preference(date) {
        None => true,
        Some(pref) if pref.on_leave => false,
        Some(pref) => pref.choice_for(shift.part()) != ShiftChoice::Block,
    }
}

/// Whether two assignments conflict.
///
/// Same date with the same time-part conflicts (which covers the same
/// shift kind). A night shift followed on the next calendar day by a
/// morning-classified shift conflicts: the turnaround is too short.
pub fn is_conflicting(
    shift_a: ShiftType,
    date_a: NaiveDate,
    shift_b: ShiftType,
    date_b: NaiveDate,
) -> bool {
    match (date_b - date_a).num_days() {
        0 => shift_a.part() == shift_b.part(),
        1 => shift_a == ShiftType::Night && shift_b.is_morning(),
        -1 => shift_b == ShiftType::Night && shift_a.is_morning(),
        _ => false,
    }
}

/// Rest gap in hours between the end of one assignment and the start of
/// the next.
///
/// Same-day pairs use the raw clock difference (clamped at zero);
/// next-day pairs wrap modulo 24h, which handles the midnight-crossing
/// night shift; gaps of two or more days count as a full 24h.
pub fn rest_hours(
    last_shift: ShiftType,
    last_date: NaiveDate,
    next_shift: ShiftType,
    next_date: NaiveDate,
) -> f64 {
    let end = last_shift.end_hours();
    let start = next_shift.start_hours();
    match (next_date - last_date).num_days() {
        0 => (start - end).max(0.0),
        1 => (start - end).rem_euclid(24.0),
        _ => 24.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DayPreference;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_can_fill_role_hierarchy() {
        assert!(can_fill_role(Role::Supervisor, Role::Guard, ShiftType::Morning));
        assert!(can_fill_role(Role::SeniorGuard, Role::Controller, ShiftType::Afternoon));
        assert!(!can_fill_role(Role::Guard, Role::Supervisor, ShiftType::Morning));
        assert!(!can_fill_role(Role::Controller, Role::Guard, ShiftType::Night));
    }

    #[test]
    fn test_sensitive_zone_overrides_hierarchy() {
        // A supervisor can act as a guard, but sensitive zones admit
        // guards only.
        assert!(!can_fill_role(Role::Supervisor, Role::Guard, ShiftType::OutpostEarly));
        assert!(can_fill_role(Role::Guard, Role::Guard, ShiftType::OutpostEarly));
        assert!(can_fill_role(Role::Guard, Role::Guard, ShiftType::Patrol));
        assert!(!can_fill_role(Role::SeniorGuard, Role::Guard, ShiftType::VisitorCenter));
    }

    #[test]
    fn test_availability_block_and_leave() {
        let d = date(2025, 6, 3);
        let emp = Employee::new("e1", "Dana", Role::Guard)
            .with_preference(d, DayPreference::new().with_morning(ShiftChoice::Block));
        assert!(!is_available(&emp, d, ShiftType::Morning));
        assert!(!is_available(&emp, d, ShiftType::VisitorCenter)); // same part
        assert!(is_available(&emp, d, ShiftType::Afternoon));
        assert!(is_available(&emp, d, ShiftType::Night));

        let on_leave = Employee::new("e2", "Noa", Role::Guard)
            .with_preference(d, DayPreference::leave());
        for shift in ShiftType::ALL {
            assert!(!is_available(&on_leave, d, shift));
        }
    }

    #[test]
    fn test_availability_minus_and_unset() {
        let d = date(2025, 6, 3);
        let emp = Employee::new("e1", "Dana", Role::Guard)
            .with_preference(d, DayPreference::new().with_night(ShiftChoice::Minus));
        assert!(is_available(&emp, d, ShiftType::Night));
        // No preference recorded at all for another date.
        assert!(is_available(&emp, date(2025, 6, 4), ShiftType::Night));
    }

    #[test]
    fn test_same_day_conflicts() {
        let d = date(2025, 6, 3);
        assert!(is_conflicting(ShiftType::Morning, d, ShiftType::Morning, d));
        assert!(is_conflicting(ShiftType::Morning, d, ShiftType::VisitorCenter, d));
        assert!(is_conflicting(ShiftType::Afternoon, d, ShiftType::OutpostLate, d));
        assert!(!is_conflicting(ShiftType::Morning, d, ShiftType::Afternoon, d));
        assert!(!is_conflicting(ShiftType::Afternoon, d, ShiftType::Night, d));
    }

    #[test]
    fn test_night_to_morning_conflict_both_orders() {
        let d1 = date(2025, 6, 3);
        let d2 = date(2025, 6, 4);
        assert!(is_conflicting(ShiftType::Night, d1, ShiftType::Morning, d2));
        assert!(is_conflicting(ShiftType::Night, d1, ShiftType::OutpostEarly, d2));
        assert!(is_conflicting(ShiftType::Morning, d2, ShiftType::Night, d1));
        assert!(!is_conflicting(ShiftType::Night, d1, ShiftType::Afternoon, d2));
        assert!(!is_conflicting(ShiftType::Morning, d1, ShiftType::Morning, d2));
    }

    #[test]
    fn test_distant_dates_never_conflict() {
        let d1 = date(2025, 6, 3);
        let d3 = date(2025, 6, 5);
        assert!(!is_conflicting(ShiftType::Night, d1, ShiftType::Morning, d3));
    }

    #[test]
    fn test_rest_hours_same_day() {
        let d = date(2025, 6, 3);
        // Morning ends 15:00, night starts 21:45.
        assert!((rest_hours(ShiftType::Morning, d, ShiftType::Night, d) - 6.75).abs() < 1e-10);
        // Overlapping pair clamps at zero.
        assert_eq!(rest_hours(ShiftType::Morning, d, ShiftType::Afternoon, d), 0.0);
    }

    #[test]
    fn test_rest_hours_next_day_wraps_midnight() {
        let d1 = date(2025, 6, 3);
        let d2 = date(2025, 6, 4);
        // Night ends 06:30 (next day); afternoon starts 14:45 the same
        // calendar day the night ends: 8.25h of rest.
        assert!((rest_hours(ShiftType::Night, d1, ShiftType::Afternoon, d2) - 8.25).abs() < 1e-10);
        // Night into the next morning is zero rest.
        assert_eq!(rest_hours(ShiftType::Night, d1, ShiftType::Morning, d2), 0.0);
        // Afternoon ends 21:45, next morning starts 06:30: 8.75h.
        assert!((rest_hours(ShiftType::Afternoon, d1, ShiftType::Morning, d2) - 8.75).abs() < 1e-10);
    }

    #[test]
    fn test_rest_hours_capped_for_long_gaps() {
        let d1 = date(2025, 6, 3);
        let d3 = date(2025, 6, 5);
        assert_eq!(rest_hours(ShiftType::Night, d1, ShiftType::Morning, d3), 24.0);
    }
}
