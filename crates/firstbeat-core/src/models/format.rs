//! Long-form show formats and their timed segments.

use serde::{Deserialize, Serialize};

/// Allowed drift when checking that segment portions add up to a whole show.
const PORTION_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub segments: Vec<FormatSegment>,
}

impl FormatDefinition {
    pub fn total_portion(&self) -> f64 {
        self.segments.iter().map(|s| s.portion).sum()
    }

    /// Segments cover the whole show, within rounding.
    pub fn is_complete(&self) -> bool {
        !self.segments.is_empty() && (self.total_portion() - 1.0).abs() <= PORTION_TOLERANCE
    }
}

/// One timed part of a show. `portion` is the share of the total running
/// time, between 0.0 and 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatSegment {
    pub title: String,
    pub portion: f64,
}

impl FormatSegment {
    pub fn duration_secs(&self, total_minutes: u32) -> f64 {
        f64::from(total_minutes) * 60.0 * self.portion
    }

    /// Human readable duration, e.g. "5m" or "4m 48s".
    pub fn duration_label(&self, total_minutes: u32) -> String {
        let seconds = self.duration_secs(total_minutes).round().max(0.0) as u64;
        let minutes = seconds / 60;
        let remainder = seconds % 60;
        if remainder == 0 {
            format!("{}m", minutes)
        } else {
            format!("{}m {}s", minutes, remainder)
        }
    }
}
