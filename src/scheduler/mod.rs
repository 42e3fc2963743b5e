//! Greedy roster generation.
//!
//! # Algorithm
//!
//! 1. Iterate the date range ascending, resetting weekly counters at each
//!    week start (Sunday).
//! 2. Per day, per primary shift kind: gather the eligible pool, score
//!    every (candidate, role) pair, and greedily fill the required role
//!    counts — trying the base requirement and each alternative option
//!    set, keeping the highest-scoring feasible outcome.
//! 3. Post-process the day: the weekday long-morning slot and the weekend
//!    patrol slot double up with an existing primary assignee.
//! 4. At week close, backfill missing mandatory morning and afternoon
//!    coverage into still-empty slots.
//!
//! Not optimal by design: a deterministic-as-possible greedy heuristic
//! with seeded random tie-breaking among near-equal candidates, built to
//! produce a usable roster quickly and surface unmet requirements as
//! per-day issues rather than fail.

mod assign;
mod builder;
mod context;
mod score;

pub use assign::{ShiftAssigner, ShiftOutcome};
pub use builder::{GenerateError, GenerateRequest, RosterBuilder};
pub use context::{EmployeeStats, SchedulingContext};
pub use score::{score_candidate, HARD_REJECT, MIN_REST_HOURS_GENERATION};
