//! Level resolver: coarse banding of cumulative points.

use serde::{Deserialize, Serialize};

pub const POINTS_PER_LEVEL: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Starts at 1 for 0 points; unbounded.
    pub level: u64,
    /// Fraction of the way to the next level, in [0, 1).
    pub progress: f64,
}

pub fn resolve_level(total_points: u64) -> Level {
    Level {
        level: total_points / POINTS_PER_LEVEL + 1,
        progress: (total_points % POINTS_PER_LEVEL) as f64 / POINTS_PER_LEVEL as f64,
    }
}
