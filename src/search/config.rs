//! Search configuration parameters.

use serde::{Deserialize, Serialize};

/// Search configuration parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies searched below the current position.
    pub max_depth: u32,

    /// Chebyshev distance from an existing stone within which empty cells
    /// become candidates.
    pub radius: u32,

    /// Candidates kept per node, indexed by plies below the root.
    /// Deeper plies reuse the last entry.
    pub branch_widths: Vec<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            radius: 2,
            branch_widths: vec![40, 20, 12, 8],
        }
    }
}

impl SearchConfig {
    /// Create a new config with custom max depth.
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Create a new config with custom candidate radius.
    pub fn with_radius(mut self, radius: u32) -> Self {
        self.radius = radius;
        self
    }

    /// Create a new config with a custom width schedule.
    pub fn with_branch_widths(mut self, widths: Vec<usize>) -> Self {
        self.branch_widths = widths;
        self
    }

    /// Candidates kept at a node with `depth_left` plies remaining.
    #[must_use]
    pub fn width_for(&self, depth_left: u32) -> usize {
        let ply = self.max_depth.saturating_sub(depth_left) as usize;
        self.branch_widths
            .get(ply)
            .or_else(|| self.branch_widths.last())
            .copied()
            .unwrap_or(usize::MAX)
    }
}
