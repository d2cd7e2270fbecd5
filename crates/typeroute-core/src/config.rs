//! Process-wide routing defaults
//!
//! Two environment-style settings mirror the knobs callers most often need:
//! the per-hop hierarchy cost (default: hierarchy disabled) and whether
//! multi-step routes are allowed (default: yes). Unparsable values are logged
//! and replaced by the default rather than failing startup.

use std::env;
use std::fmt;

/// Environment variable holding the per-hop hierarchy cost. Negative values
/// disable hierarchy traversal.
pub const ENV_HIERARCHY_COST: &str = "TYPEROUTE_HIERARCHY_COST";

/// Environment variable toggling multi-step routing.
pub const ENV_ALLOW_MULTI_STEP: &str = "TYPEROUTE_ALLOW_MULTI_STEP";

/// Policy for implicit hierarchy edges during planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HierarchyCost {
    /// Hierarchy hops are not usable; only exact types match.
    Disabled,
    /// Each hop from a type to one of its declared ancestors costs this much.
    PerHop(u32),
}

impl HierarchyCost {
    /// Interpret an integer the way the routing contract does: any negative
    /// value means "disabled", otherwise the value is the per-hop cost.
    pub fn from_cost(cost: i32) -> Self {
        if cost < 0 {
            HierarchyCost::Disabled
        } else {
            HierarchyCost::PerHop(cost as u32)
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, HierarchyCost::PerHop(_))
    }
}

impl Default for HierarchyCost {
    fn default() -> Self {
        HierarchyCost::Disabled
    }
}

impl fmt::Display for HierarchyCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HierarchyCost::Disabled => write!(f, "disabled"),
            HierarchyCost::PerHop(unit) => write!(f, "{} per hop", unit),
        }
    }
}

/// Defaults a registry applies when callers use the convenience routing
/// entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    pub hierarchy_cost: HierarchyCost,
    pub allow_multi_step: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            hierarchy_cost: HierarchyCost::Disabled,
            allow_multi_step: true,
        }
    }
}

impl RegistryConfig {
    /// Read the defaults from the environment, falling back field by field.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = env::var(ENV_HIERARCHY_COST) {
            match raw.trim().parse::<i32>() {
                Ok(cost) => config.hierarchy_cost = HierarchyCost::from_cost(cost),
                Err(err) => log::warn!(
                    "could not parse {}={:?}: {}; hierarchy stays {}",
                    ENV_HIERARCHY_COST,
                    raw,
                    err,
                    config.hierarchy_cost
                ),
            }
        }
        if let Ok(raw) = env::var(ENV_ALLOW_MULTI_STEP) {
            match raw.trim().parse::<bool>() {
                Ok(allow) => config.allow_multi_step = allow,
                Err(err) => log::warn!(
                    "could not parse {}={:?}: {}; multi-step stays {}",
                    ENV_ALLOW_MULTI_STEP,
                    raw,
                    err,
                    config.allow_multi_step
                ),
            }
        }
        config
    }
}
