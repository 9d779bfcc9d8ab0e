//! Role Definitions
//!
//! Bitmask-based role dominance: a role may act for a required role iff its
//! mask is a bit superset of the required role's mask. New roles can be
//! added without revisiting existing comparisons, as long as their masks
//! nest cleanly into the existing bit planes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User role, ordered by privilege
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Basic,
    Seller,
    Manager,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Basic, Role::Seller, Role::Manager, Role::Admin];

    /// Privilege bitmask for this role
    ///
    /// Every role dominates the roles whose mask is a subset of its own.
    pub fn mask(self) -> u8 {
        match self {
            Role::Basic => 0x00,
            Role::Seller => 0x01,
            Role::Manager => 0x0F,
            Role::Admin => 0xFF,
        }
    }

    /// Whether this role satisfies an operation requiring `required`
    pub fn has_privilege(self, required: Role) -> bool {
        self.mask() & required.mask() == required.mask()
    }

    /// Assert at startup that no two role masks partially overlap.
    ///
    /// For every pair of roles, one mask must contain the other or they must
    /// be disjoint. A partial overlap would make an unrelated role dominate
    /// another by accident; this is a bit-plane allocation bug, so we refuse
    /// to start.
    pub fn assert_mask_coherence() {
        for a in Role::ALL {
            for b in Role::ALL {
                let overlap = a.mask() & b.mask();
                assert!(
                    overlap == a.mask() || overlap == b.mask() || overlap == 0,
                    "role masks for {a} and {b} partially overlap"
                );
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Basic => "basic",
            Role::Seller => "seller",
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Role::Basic),
            "seller" => Ok(Role::Seller),
            "manager" => Ok(Role::Manager),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}
