//! The roster builder: one generation pass over a date range.

use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{
    calendar::date_range, AssignedShift, AssignmentSource, DayClass, Employee, Role, Roster,
    ScheduleDay, ShiftRequirements, ShiftType, TimePart, WeeklyRules, WEEK_END, WEEK_START,
};
use crate::rules::{is_available, rest_hours};
use crate::scheduler::{SchedulingContext, ShiftAssigner};
use crate::validation::validate_work_rules;

/// Everything one generation pass needs.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub employees: Vec<Employee>,
    pub requirements: ShiftRequirements,
    /// Weekly preference-quota thresholds. Generation refuses to run
    /// without them so that the closing validation pass is meaningful.
    pub weekly_rules: Option<WeeklyRules>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl GenerateRequest {
    pub fn new(
        employees: Vec<Employee>,
        requirements: ShiftRequirements,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            employees,
            requirements,
            weekly_rules: Some(WeeklyRules::standard()),
            start,
            end,
        }
    }

    pub fn with_weekly_rules(mut self, rules: Option<WeeklyRules>) -> Self {
        self.weekly_rules = rules;
        self
    }
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("weekly rules are required for roster generation")]
    MissingWeeklyRules,
    #[error("invalid date range: {start} is after {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}

/// Generates rosters. Wraps the slot assigner so that one seed drives a
/// whole pass.
#[derive(Debug, Default)]
pub struct RosterBuilder {
    assigner: ShiftAssigner,
}

impl RosterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A seeded builder: same seed and inputs, same roster.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            assigner: ShiftAssigner::with_seed(seed),
        }
    }

    /// Runs one generation pass.
    ///
    /// # Algorithm
    ///
    /// Days are generated in order, week by week. Each day staffs every
    /// primary shift kind through the assigner, then fills the day's
    /// secondary slot (weekday long morning, weekend patrol) by doubling
    /// up a primary assignee. At each week close the backfill pass patches
    /// employees who missed their mandatory weekly coverage into already
    /// committed days. Unmet requirements become per-day issues, never
    /// errors: a partial roster a human can finish beats no roster.
    pub fn generate(&mut self, request: &GenerateRequest) -> Result<Roster, GenerateError> {
        let weekly_rules = request
            .weekly_rules
            .as_ref()
            .ok_or(GenerateError::MissingWeeklyRules)?;
        if request.start > request.end {
            return Err(GenerateError::InvalidDateRange {
                start: request.start,
                end: request.end,
            });
        }

        let dates = date_range(request.start, request.end);
        let by_id: HashMap<&str, &Employee> = request
            .employees
            .iter()
            .map(|e| (e.id.as_str(), e))
            .collect();

        let mut ctx = SchedulingContext::new();
        let mut days: Vec<ScheduleDay> = Vec::new();
        let mut week_start_idx = 0;

        for (idx, &date) in dates.iter().enumerate() {
            if date.weekday() == WEEK_START {
                ctx.reset_week();
                week_start_idx = days.len();
            }
            ctx.push_week_date(date);

            let class = DayClass::of(date);
            let mut day = ScheduleDay::new(date);
            debug!(%date, ?class, "staffing day");

            for shift in ShiftType::PRIMARY {
                let Some(requirement) = request.requirements.find(shift, class) else {
                    continue;
                };
                let role_sets = requirement.role_sets();
                let outcome =
                    self.assigner
                        .assign(&request.employees, date, shift, &role_sets, &ctx);
                for issue in &outcome.issues {
                    warn!(%date, %shift, "{issue}");
                }
                day.issues.extend(outcome.issues);
                for (employee_id, role) in outcome.assigned {
                    ctx.record(&employee_id, date, shift);
                    day.push_assignment(AssignedShift::new(employee_id, date, shift, role));
                }
            }

            match class {
                DayClass::Weekday => Self::pick_long_morning(&mut day, &by_id, &mut ctx),
                DayClass::Weekend => Self::pick_patrol(&mut day, &by_id, &ctx),
            }

            days.push(day);

            if date.weekday() == WEEK_END || idx == dates.len() - 1 {
                Self::backfill_week(&mut days[week_start_idx..], &request.employees, &ctx);
            }
        }

        let roster = Roster { days };

        let by_date = roster.by_date();
        for employee in &request.employees {
            for violation in validate_work_rules(employee, &by_date, Some(weekly_rules)) {
                warn!(
                    employee = %employee.name,
                    kind = ?violation.kind,
                    "{}", violation.message
                );
            }
        }

        Ok(roster)
    }

    /// Doubles one morning assignee into the long-morning slot, preferring
    /// controllers and, among those, whoever has held it least this pass.
    fn pick_long_morning(
        day: &mut ScheduleDay,
        by_id: &HashMap<&str, &Employee>,
        ctx: &mut SchedulingContext,
    ) {
        let pick = day
            .assigned(ShiftType::Morning)
            .iter()
            .filter_map(|a| by_id.get(a.employee_id.as_str()).copied())
            .min_by_key(|e| {
                let controller = e.role == Role::Controller;
                (!controller, ctx.stats(&e.id).monthly_long_morning_count)
            })
            .map(|e| (e.id.clone(), e.role));

        if let Some((employee_id, role)) = pick {
            ctx.record_long_morning(&employee_id);
            day.push_assignment(AssignedShift::new(
                employee_id,
                day.date,
                ShiftType::LongMorning,
                role,
            ));
        }
    }

    /// Doubles one afternoon assignee into the weekend patrol slot,
    /// preferring non-controllers and then whoever is most rested.
    fn pick_patrol(
        day: &mut ScheduleDay,
        by_id: &HashMap<&str, &Employee>,
        ctx: &SchedulingContext,
    ) {
        let key = |e: &Employee| {
            let rest = match ctx.last_assignment(&e.id) {
                Some((d, s)) => rest_hours(s, d, ShiftType::Patrol, day.date),
                None => 24.0,
            };
            (e.role != Role::Controller, rest)
        };
        let pick = day
            .assigned(ShiftType::Afternoon)
            .iter()
            .filter_map(|a| by_id.get(a.employee_id.as_str()).copied())
            .max_by(|&a, &b| {
                key(a)
                    .partial_cmp(&key(b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|e| (e.id.clone(), e.role));

        if let Some((employee_id, role)) = pick {
            day.push_assignment(AssignedShift::new(
                employee_id,
                day.date,
                ShiftType::Patrol,
                role,
            ));
        }
    }

    /// Patches mandatory weekly coverage into the week's committed days:
    /// one morning for everyone, one afternoon for every controller.
    fn backfill_week(week: &mut [ScheduleDay], employees: &[Employee], ctx: &SchedulingContext) {
        for employee in employees {
            if ctx.stats(&employee.id).weekly_morning_count == 0 {
                Self::backfill_slot(
                    week,
                    employee,
                    ShiftType::Morning,
                    format!("backfilled missing weekly morning for {}", employee.name),
                );
            }
        }
        for employee in employees.iter().filter(|e| e.role == Role::Controller) {
            let worked_afternoon = week.iter().any(|day| {
                day.all_assignments().any(|a| {
                    a.employee_id == employee.id && a.shift.part() == TimePart::Afternoon
                })
            });
            if !worked_afternoon {
                Self::backfill_slot(
                    week,
                    employee,
                    ShiftType::Afternoon,
                    format!(
                        "backfilled missing weekly afternoon for controller {}",
                        employee.name
                    ),
                );
            }
        }
    }

    fn backfill_slot(
        week: &mut [ScheduleDay],
        employee: &Employee,
        shift: ShiftType,
        issue: String,
    ) {
        let slot = week.iter_mut().find(|day| {
            day.assigned(shift).is_empty()
                && is_available(employee, day.date, shift)
                && !day
                    .all_assignments()
                    .any(|a| a.employee_id == employee.id)
        });
        if let Some(day) = slot {
            warn!(date = %day.date, employee = %employee.name, "{issue}");
            day.push_assignment(
                AssignedShift::new(employee.id.clone(), day.date, shift, employee.role)
                    .with_source(AssignmentSource::Backfill),
            );
            day.issues.push(issue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DayPreference;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn full_staff() -> Vec<Employee> {
        vec![
            Employee::new("s1", "Amit", Role::Supervisor),
            Employee::new("s2", "Tal", Role::Supervisor),
            Employee::new("sg1", "Yael", Role::SeniorGuard),
            Employee::new("sg2", "Omer", Role::SeniorGuard),
            Employee::new("g1", "Dana", Role::Guard),
            Employee::new("g2", "Noa", Role::Guard),
            Employee::new("g3", "Gil", Role::Guard),
            Employee::new("g4", "Eli", Role::Guard),
            Employee::new("g5", "Maya", Role::Guard),
            Employee::new("g6", "Ben", Role::Guard),
            Employee::new("c1", "Rina", Role::Controller),
            Employee::new("c2", "Shai", Role::Controller),
        ]
    }

    fn week_request() -> GenerateRequest {
        // 2025-06-01 is a Sunday, 2025-06-07 a Saturday.
        GenerateRequest::new(
            full_staff(),
            ShiftRequirements::standard(),
            date(2025, 6, 1),
            date(2025, 6, 7),
        )
    }

    #[test]
    fn test_missing_weekly_rules_fails_fast() {
        let request = week_request().with_weekly_rules(None);
        let result = RosterBuilder::with_seed(42).generate(&request);
        assert!(matches!(result, Err(GenerateError::MissingWeeklyRules)));
    }

    #[test]
    fn test_inverted_range_fails_fast() {
        let mut request = week_request();
        request.start = date(2025, 6, 7);
        request.end = date(2025, 6, 1);
        let result = RosterBuilder::with_seed(42).generate(&request);
        assert!(matches!(
            result,
            Err(GenerateError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_generates_one_day_per_date() {
        let roster = RosterBuilder::with_seed(42)
            .generate(&week_request())
            .unwrap();
        assert_eq!(roster.days.len(), 7);
        assert_eq!(roster.days[0].date, date(2025, 6, 1));
        assert_eq!(roster.days[6].date, date(2025, 6, 7));
    }

    #[test]
    fn test_no_employee_holds_two_primary_slots_per_day() {
        let roster = RosterBuilder::with_seed(42)
            .generate(&week_request())
            .unwrap();
        for day in &roster.days {
            let mut seen = std::collections::HashSet::new();
            for shift in ShiftType::PRIMARY {
                for assignment in day.assigned(shift) {
                    assert!(
                        seen.insert(assignment.employee_id.clone()),
                        "{} double-booked on {}",
                        assignment.employee_id,
                        day.date
                    );
                }
            }
        }
    }

    #[test]
    fn test_on_leave_employee_is_never_assigned() {
        let mut employees = full_staff();
        for day in 1..=7 {
            let d = date(2025, 6, day);
            employees[4] = employees[4].clone().with_preference(d, DayPreference::leave());
        }
        let request = GenerateRequest::new(
            employees,
            ShiftRequirements::standard(),
            date(2025, 6, 1),
            date(2025, 6, 7),
        );
        let roster = RosterBuilder::with_seed(42).generate(&request).unwrap();
        for day in &roster.days {
            assert!(day.all_assignments().all(|a| a.employee_id != "g1"));
        }
    }

    #[test]
    fn test_same_seed_reproduces_roster() {
        let a = RosterBuilder::with_seed(7).generate(&week_request()).unwrap();
        let b = RosterBuilder::with_seed(7).generate(&week_request()).unwrap();
        for (day_a, day_b) in a.days.iter().zip(&b.days) {
            for shift in ShiftType::ALL {
                assert_eq!(
                    day_a.employee_ids(shift),
                    day_b.employee_ids(shift),
                    "divergence on {} {}",
                    day_a.date,
                    shift
                );
            }
        }
    }

    #[test]
    fn test_weekday_long_morning_and_weekend_patrol() {
        let roster = RosterBuilder::with_seed(42)
            .generate(&week_request())
            .unwrap();
        for day in &roster.days {
            match DayClass::of(day.date) {
                DayClass::Weekday => {
                    if !day.assigned(ShiftType::Morning).is_empty() {
                        assert_eq!(day.assigned(ShiftType::LongMorning).len(), 1);
                        // The long morning doubles up with a morning assignee.
                        let pick = &day.assigned(ShiftType::LongMorning)[0];
                        assert!(day
                            .employee_ids(ShiftType::Morning)
                            .contains(&pick.employee_id.as_str()));
                    }
                    assert!(day.assigned(ShiftType::Patrol).is_empty());
                }
                DayClass::Weekend => {
                    if !day.assigned(ShiftType::Afternoon).is_empty() {
                        assert_eq!(day.assigned(ShiftType::Patrol).len(), 1);
                    }
                    assert!(day.assigned(ShiftType::LongMorning).is_empty());
                }
            }
        }
    }

    #[test]
    fn test_generated_rest_meets_generation_floor() {
        use crate::scheduler::MIN_REST_HOURS_GENERATION;

        let roster = RosterBuilder::with_seed(11)
            .generate(&week_request())
            .unwrap();
        let mut per_employee: HashMap<String, Vec<(NaiveDate, ShiftType)>> = HashMap::new();
        for day in &roster.days {
            for a in day.all_assignments() {
                if a.source == AssignmentSource::Auto && ShiftType::PRIMARY.contains(&a.shift) {
                    per_employee
                        .entry(a.employee_id.clone())
                        .or_default()
                        .push((a.date, a.shift));
                }
            }
        }
        for (employee_id, mut assignments) in per_employee {
            assignments.sort_by_key(|(d, _)| *d);
            for pair in assignments.windows(2) {
                let (d1, s1) = pair[0];
                let (d2, s2) = pair[1];
                let rest = rest_hours(s1, d1, s2, d2);
                assert!(
                    rest >= MIN_REST_HOURS_GENERATION,
                    "{employee_id}: only {rest}h between {s1} on {d1} and {s2} on {d2}"
                );
            }
        }
    }

    #[test]
    fn test_backfill_covers_empty_week() {
        // No requirements at all: nothing gets assigned until the
        // end-of-range backfill patches mandatory coverage in.
        let employees = vec![
            Employee::new("s1", "Amit", Role::Supervisor),
            Employee::new("g1", "Dana", Role::Guard),
            Employee::new("c1", "Rina", Role::Controller),
        ];
        let request = GenerateRequest::new(
            employees,
            ShiftRequirements::new(),
            date(2025, 6, 2),
            date(2025, 6, 4),
        );
        let roster = RosterBuilder::with_seed(42).generate(&request).unwrap();

        // One morning each, spread over the three days in staff order.
        assert_eq!(roster.days[0].employee_ids(ShiftType::Morning), vec!["s1"]);
        assert_eq!(roster.days[1].employee_ids(ShiftType::Morning), vec!["g1"]);
        assert_eq!(roster.days[2].employee_ids(ShiftType::Morning), vec!["c1"]);
        // The controller also gets an afternoon, on the first open day.
        assert_eq!(
            roster.days[0].employee_ids(ShiftType::Afternoon),
            vec!["c1"]
        );
        for day in &roster.days {
            for assignment in day.all_assignments() {
                assert_eq!(assignment.source, AssignmentSource::Backfill);
            }
        }
        assert_eq!(roster.issues().count(), 4);
    }
}
