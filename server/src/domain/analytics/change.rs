//! Current vs previous period comparison

/// Reported growth when the previous period was zero and the current one is not
pub const ZERO_BASELINE_CHANGE: f64 = 100.0;

/// Percentage change from `previous` to `current`
///
/// `None` when both are zero. A zero baseline with a non-zero current value
/// reports `±ZERO_BASELINE_CHANGE` following the sign of `current`.
pub fn change_percent(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        if current == 0.0 {
            None
        } else {
            Some(ZERO_BASELINE_CHANGE.copysign(current))
        }
    } else {
        Some((current - previous) / previous * 100.0)
    }
}

/// Aggregate of a period next to the preceding one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodComparison {
    pub current: f64,
    pub previous: f64,
    pub change_percent: Option<f64>,
}

impl PeriodComparison {
    pub fn new(current: f64, previous: f64) -> Self {
        Self {
            current,
            previous,
            change_percent: change_percent(current, previous),
        }
    }
}
