//! Staff roles and per-role head-count requirements.
//!
//! Roles form a downward capability hierarchy: a role may stand in for any
//! role reachable via [`Role::can_act_as`]. Sensitive shift zones override
//! the hierarchy entirely — see [`crate::rules::can_fill_role`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A staff role.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Role {
    /// Shift supervisor; may stand in for every other role.
    Supervisor,
    /// Senior guard; may stand in for guards and controllers.
    SeniorGuard,
    /// Guard; the only role admitted to sensitive zones.
    Guard,
    /// Junior controller; may fill only its own slots.
    Controller,
}

impl Role {
    /// All roles, in seniority order.
    pub const ALL: [Role; 4] = [
        Role::Supervisor,
        Role::SeniorGuard,
        Role::Guard,
        Role::Controller,
    ];

    /// Whether this role may stand in for `target` (downward capability).
    pub fn can_act_as(self, target: Role) -> bool {
        match self {
            Role::Supervisor => true,
            Role::SeniorGuard => matches!(
                target,
                Role::SeniorGuard | Role::Guard | Role::Controller
            ),
            Role::Guard => target == Role::Guard,
            Role::Controller => target == Role::Controller,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Supervisor => "supervisor",
            Role::SeniorGuard => "senior-guard",
            Role::Guard => "guard",
            Role::Controller => "controller",
        };
        f.write_str(name)
    }
}

/// Required head-count per role for one shift slot.
///
/// A zero or absent entry means "not required". Iteration follows the fixed
/// [`Role`] order so slot filling proceeds deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCounts {
    counts: BTreeMap<Role, u32>,
}

impl RoleCounts {
    /// Creates an empty requirement.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the required count for a role. Zero entries are dropped.
    pub fn with(mut self, role: Role, count: u32) -> Self {
        if count > 0 {
            self.counts.insert(role, count);
        } else {
            self.counts.remove(&role);
        }
        self
    }

    /// Required count for `role` (0 if absent).
    pub fn get(&self, role: Role) -> u32 {
        self.counts.get(&role).copied().unwrap_or(0)
    }

    /// Iterates (role, count) pairs in seniority order.
    pub fn iter(&self) -> impl Iterator<Item = (Role, u32)> + '_ {
        self.counts.iter().map(|(r, c)| (*r, *c))
    }

    /// Total head-count across all roles.
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    /// Whether nothing is required.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
