//! Greedy slot filling for one shift on one date.

use chrono::NaiveDate;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

use crate::models::{Employee, Role, RoleCounts, ShiftType, TimePart};
use crate::rules::{can_fill_role, is_available, is_conflicting, MAX_CONSECUTIVE_DAYS};
use crate::scheduler::score::{score_candidate, HARD_REJECT};
use crate::scheduler::SchedulingContext;

/// Flat score for any role set with at least one unfillable slot.
const INFEASIBLE_SET_SCORE: f64 = -10_000.0;

/// Ties among the best candidates are broken uniformly over this many.
const TIE_POOL: usize = 3;

/// The result of staffing one shift slot.
#[derive(Debug, Clone)]
pub struct ShiftOutcome {
    /// Chosen (employee id, slot role) pairs, in fill order.
    pub assigned: Vec<(String, Role)>,
    /// One message per role slot that could not be filled.
    pub issues: Vec<String>,
    /// Total score of the chosen role set.
    pub score: f64,
}

/// Fills one shift's role requirements from a candidate pool.
///
/// Owns the random source for the whole generation pass so that a fixed
/// seed reproduces the same roster.
#[derive(Debug)]
pub struct ShiftAssigner {
    rng: SmallRng,
}

impl Default for ShiftAssigner {
    fn default() -> Self {
        Self::new()
    }
}

impl ShiftAssigner {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::seed_from_u64(rand::random()),
        }
    }

    /// A seeded assigner. Same seed, same inputs, same outcome.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Staffs `shift` on `date`, trying the base role set first and then
    /// each alternative, keeping the best-scoring outcome. A set with any
    /// unfillable slot scores a flat [`INFEASIBLE_SET_SCORE`], so a fully
    /// feasible alternative always beats a partial one, and when nothing
    /// is fully feasible the base requirement's unmet-role issues are the
    /// ones reported. Ties keep the earlier set.
    pub fn assign(
        &mut self,
        employees: &[Employee],
        date: NaiveDate,
        shift: ShiftType,
        role_sets: &[&RoleCounts],
        ctx: &SchedulingContext,
    ) -> ShiftOutcome {
        let mut best: Option<ShiftOutcome> = None;
        for role_set in role_sets {
            let outcome = self.fill_role_set(employees, date, shift, role_set, ctx);
            let better = match &best {
                Some(current) => outcome.score > current.score,
                None => true,
            };
            if better {
                best = Some(outcome);
            }
        }
        best.unwrap_or_else(|| ShiftOutcome {
            assigned: Vec::new(),
            issues: Vec::new(),
            score: 0.0,
        })
    }

    fn fill_role_set(
        &mut self,
        employees: &[Employee],
        date: NaiveDate,
        shift: ShiftType,
        role_set: &RoleCounts,
        ctx: &SchedulingContext,
    ) -> ShiftOutcome {
        // The pool shrinks once, up front: unavailable employees, runs at
        // the consecutive-day cap, and anyone whose latest assignment
        // conflicts (which also bars a second slot on the same date).
        let pool: Vec<&Employee> = employees
            .iter()
            .filter(|e| is_available(e, date, shift))
            .filter(|e| {
                let stats = ctx.stats(&e.id);
                if stats.consecutive_days < MAX_CONSECUTIVE_DAYS {
                    return true;
                }
                // A capped run only bars assignment while still live.
                match stats.last_assignment {
                    Some((d, _)) => (date - d).num_days() > 1,
                    None => true,
                }
            })
            .filter(|e| match ctx.last_assignment(&e.id) {
                Some((d, s)) => d != date && !is_conflicting(s, d, shift, date),
                None => true,
            })
            .collect();

        let mut assigned: Vec<(String, Role)> = Vec::new();
        let mut taken: HashSet<&str> = HashSet::new();
        let mut issues = Vec::new();
        let mut total = 0.0;
        let rng = &mut self.rng;

        for (role, count) in role_set.iter() {
            for _ in 0..count {
                let mut scored: Vec<(&Employee, f64)> = pool
                    .iter()
                    .filter(|e| !taken.contains(e.id.as_str()))
                    .filter(|e| can_fill_role(e.role, role, shift))
                    .map(|e| {
                        let mut s = score_candidate(e, date, shift, role, ctx, rng);
                        // Controllers edge out peers for the desk shifts
                        // they end up anchoring anyway.
                        if e.role == Role::Controller
                            && matches!(shift.part(), TimePart::Morning | TimePart::Afternoon)
                            && s > HARD_REJECT
                        {
                            s += 2.0;
                        }
                        (*e, s)
                    })
                    .filter(|(_, s)| *s > HARD_REJECT)
                    .collect();

                if scored.is_empty() {
                    issues.push(format!("missing {role} for {shift} on {date}"));
                    continue;
                }

                scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
                let k = scored.len().min(TIE_POOL);
                let (chosen, score) = scored[rng.random_range(0..k)];
                taken.insert(chosen.id.as_str());
                assigned.push((chosen.id.clone(), role));
                total += score;
            }
        }

        // A flat sentinel, not a per-slot sum: every partially-unmet set
        // ties, and strict-greater comparison keeps the base requirement's
        // outcome when no set is fully feasible.
        let score = if issues.is_empty() {
            total
        } else {
            INFEASIBLE_SET_SCORE
        };

        ShiftOutcome {
            assigned,
            issues,
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DayPreference, ShiftChoice};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn staff() -> Vec<Employee> {
        vec![
            Employee::new("s1", "Amit", Role::Supervisor),
            Employee::new("sg1", "Yael", Role::SeniorGuard),
            Employee::new("g1", "Dana", Role::Guard),
            Employee::new("g2", "Noa", Role::Guard),
            Employee::new("c1", "Rina", Role::Controller),
        ]
    }

    #[test]
    fn test_fills_base_role_set() {
        let d = date(2025, 6, 2);
        let ctx = SchedulingContext::new();
        let mut assigner = ShiftAssigner::with_seed(42);
        let required = RoleCounts::new()
            .with(Role::Supervisor, 1)
            .with(Role::Guard, 1);

        let outcome = assigner.assign(&staff(), d, ShiftType::Afternoon, &[&required], &ctx);
        assert!(outcome.issues.is_empty());
        assert_eq!(outcome.assigned.len(), 2);
        let roles: Vec<Role> = outcome.assigned.iter().map(|(_, r)| *r).collect();
        assert!(roles.contains(&Role::Supervisor));
        assert!(roles.contains(&Role::Guard));
        // Only the supervisor can take the supervisor slot.
        let sup = outcome
            .assigned
            .iter()
            .find(|(_, r)| *r == Role::Supervisor)
            .unwrap();
        assert_eq!(sup.0, "s1");
    }

    #[test]
    fn test_no_employee_fills_two_slots() {
        let d = date(2025, 6, 2);
        let ctx = SchedulingContext::new();
        let mut assigner = ShiftAssigner::with_seed(7);
        let required = RoleCounts::new().with(Role::Guard, 2);

        let outcome = assigner.assign(&staff(), d, ShiftType::Night, &[&required], &ctx);
        assert_eq!(outcome.assigned.len(), 2);
        assert_ne!(outcome.assigned[0].0, outcome.assigned[1].0);
    }

    #[test]
    fn test_alternative_role_set_rescues_infeasible_base() {
        let d = date(2025, 6, 2);
        let ctx = SchedulingContext::new();
        let mut assigner = ShiftAssigner::with_seed(42);
        // No supervisor on staff today.
        let staff = vec![
            Employee::new("g1", "Dana", Role::Guard),
            Employee::new("g2", "Noa", Role::Guard),
        ];
        let base = RoleCounts::new().with(Role::Supervisor, 1);
        let alt = RoleCounts::new().with(Role::Guard, 1);

        let outcome = assigner.assign(&staff, d, ShiftType::Morning, &[&base, &alt], &ctx);
        assert!(outcome.issues.is_empty());
        assert_eq!(outcome.assigned.len(), 1);
        assert_eq!(outcome.assigned[0].1, Role::Guard);
    }

    #[test]
    fn test_no_fully_feasible_set_keeps_base_outcome() {
        let d = date(2025, 6, 2);
        let ctx = SchedulingContext::new();
        let mut assigner = ShiftAssigner::with_seed(42);
        // One guard on staff: the base wants two supervisors, the
        // alternative one supervisor and one guard. Neither is fully
        // feasible, so the base's unmet-role issues win and the partially
        // fillable alternative commits nothing.
        let staff = vec![Employee::new("g1", "Dana", Role::Guard)];
        let base = RoleCounts::new().with(Role::Supervisor, 2);
        let alt = RoleCounts::new()
            .with(Role::Supervisor, 1)
            .with(Role::Guard, 1);

        let outcome = assigner.assign(&staff, d, ShiftType::Morning, &[&base, &alt], &ctx);
        assert!(outcome.assigned.is_empty());
        assert_eq!(outcome.issues.len(), 2);
        assert!(outcome.issues.iter().all(|i| i.contains("supervisor")));
    }

    #[test]
    fn test_unfillable_slot_becomes_issue() {
        let d = date(2025, 6, 2);
        let ctx = SchedulingContext::new();
        let mut assigner = ShiftAssigner::with_seed(42);
        let staff = vec![Employee::new("g1", "Dana", Role::Guard)];
        let required = RoleCounts::new().with(Role::Supervisor, 1);

        let outcome = assigner.assign(&staff, d, ShiftType::Morning, &[&required], &ctx);
        assert!(outcome.assigned.is_empty());
        assert_eq!(outcome.issues.len(), 1);
        assert!(outcome.issues[0].contains("supervisor"));
    }

    #[test]
    fn test_sensitive_zone_rejects_hierarchy_fill() {
        let d = date(2025, 6, 2);
        let ctx = SchedulingContext::new();
        let mut assigner = ShiftAssigner::with_seed(42);
        // Supervisors outrank guards everywhere except sensitive zones.
        let staff = vec![Employee::new("s1", "Amit", Role::Supervisor)];
        let required = RoleCounts::new().with(Role::Guard, 1);

        let outcome = assigner.assign(&staff, d, ShiftType::Patrol, &[&required], &ctx);
        assert!(outcome.assigned.is_empty());
        assert_eq!(outcome.issues.len(), 1);
    }

    #[test]
    fn test_already_assigned_today_is_skipped() {
        let d = date(2025, 6, 2);
        let mut ctx = SchedulingContext::new();
        ctx.record("g1", d, ShiftType::OutpostEarly);
        let mut assigner = ShiftAssigner::with_seed(42);
        let staff = vec![
            Employee::new("g1", "Dana", Role::Guard),
            Employee::new("g2", "Noa", Role::Guard),
        ];
        let required = RoleCounts::new().with(Role::Guard, 1);

        let outcome = assigner.assign(&staff, d, ShiftType::Night, &[&required], &ctx);
        assert_eq!(outcome.assigned.len(), 1);
        assert_eq!(outcome.assigned[0].0, "g2");
    }

    #[test]
    fn test_blocked_employee_is_skipped() {
        let d = date(2025, 6, 2);
        let ctx = SchedulingContext::new();
        let mut assigner = ShiftAssigner::with_seed(42);
        let staff = vec![
            Employee::new("g1", "Dana", Role::Guard)
                .with_preference(d, DayPreference::new().with_night(ShiftChoice::Block)),
            Employee::new("g2", "Noa", Role::Guard),
        ];
        let required = RoleCounts::new().with(Role::Guard, 1);

        let outcome = assigner.assign(&staff, d, ShiftType::Night, &[&required], &ctx);
        assert_eq!(outcome.assigned.len(), 1);
        assert_eq!(outcome.assigned[0].0, "g2");
    }
}
