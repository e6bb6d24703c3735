// Assignment policy: the tunable parameters of a grouping run

use serde::{Deserialize, Serialize};

/// Closed integer interval a per-group aggregate must fall within.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    pub min: u32,
    pub max: u32,
}

impl Band {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Parameters of the grouping problem.
///
/// Defaults are groups of five with two to three females and two to three
/// quantitative members each, nationality affinity weighted an order of
/// magnitude above cultural affinity, and "British" as the home nationality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentPolicy {
    /// Students whose nationality differs from this label (case-insensitive)
    /// count as international.
    pub home_nationality: String,
    /// Fixed number of members per group.
    pub group_capacity: usize,
    /// Per-group bound on the female count.
    pub female_band: Band,
    /// Per-group bound on the quantitative-background count.
    pub quant_band: Band,
    /// Objective weight of one same-nationality pairing unit.
    pub nationality_weight: f64,
    /// Objective weight of one same-culture pairing unit.
    pub culture_weight: f64,
}

impl Default for AssignmentPolicy {
    fn default() -> Self {
        Self {
            home_nationality: "British".to_string(),
            group_capacity: 5,
            female_band: Band::new(2, 3),
            quant_band: Band::new(2, 3),
            nationality_weight: 100.0,
            culture_weight: 10.0,
        }
    }
}
