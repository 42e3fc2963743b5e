//! Shift-roster generation and work-rule validation for security staffing.
//!
//! Assigns staff to daily shifts over a date range under role-eligibility,
//! rest-period, and weekly-quota constraints, then audits any roster —
//! freshly generated or externally edited — against labor-style work rules.
//!
//! # Modules
//!
//! - **`models`**: domain types — `Role`, `ShiftType`, `DayPreference`,
//!   `ShiftRequirements`, `WeeklyRules`, `Roster`
//! - **`rules`**: eligibility predicates — role fit, availability,
//!   shift conflicts, rest gaps
//! - **`scheduler`**: greedy roster generation — candidate scorer,
//!   per-shift assigner, date-loop builder
//! - **`validation`**: independent work-rule auditing of a roster
//!
//! # Architecture
//!
//! Generation is a single-threaded greedy pass by construction: scoring on
//! later days depends on weekly and monthly counters accumulated from
//! earlier days, carried in an explicit [`scheduler::SchedulingContext`].
//! Unmet requirements never abort a run — they are recorded as per-day
//! issue strings. Validation is a pure per-employee function with no shared
//! state; callers may fan it out across employees and concatenate results.

pub mod models;
pub mod rules;
pub mod scheduler;
pub mod validation;
