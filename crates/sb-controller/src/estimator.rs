//! Pump demand estimator.
//!
//! Predicts the water level one cycle ahead for each candidate number of
//! active pumps and picks the candidate whose predicted interval is centred
//! closest to the middle of the normal band.
//!
//! For an inflow `q` (litres/second) held for a cycle of length `dt`:
//!
//! ```text
//! lmax = level + dt * q - dt * steam            (steam stays at its reading)
//! lmin = level + dt * q - dt * max_steam_rate   (steam rises to its maximum)
//! ```

use crate::config::BoilerConfig;
use sb_core::{Real, midpoint};

/// Predicted water level range at the end of the next cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelInterval {
    pub min: Real,
    pub max: Real,
}

impl LevelInterval {
    pub fn midpoint(&self) -> Real {
        midpoint(self.min, self.max)
    }
}

/// Outcome of the pump demand search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PumpDemand {
    /// Number of pumps to keep open, in `0..=pump_count`.
    pub pumps: usize,
    /// Predicted level interval for that choice.
    pub predicted: LevelInterval,
}

/// Predict the next-cycle level interval for a total pump inflow.
pub fn predict_level(level: Real, steam: Real, inflow: Real, config: &BoilerConfig) -> LevelInterval {
    let dt = config.cycle_seconds;
    let filled = level + dt * inflow;
    LevelInterval {
        min: filled - dt * config.max_steam_rate,
        max: filled - dt * steam,
    }
}

/// Choose how many pumps to keep open.
///
/// Above the normal band no pump is needed. Otherwise candidates `k = 1..=n`
/// are tried with inflow `capacity[k-1] * k`; the first candidate whose
/// predicted midpoint is closest to the normal band's midpoint wins.
pub fn estimate(level: Real, steam: Real, config: &BoilerConfig) -> PumpDemand {
    let idle = PumpDemand {
        pumps: 0,
        predicted: predict_level(level, steam, 0.0, config),
    };
    if level > config.max_normal {
        return idle;
    }

    let target = config.normal_midpoint();
    let mut best: Option<(PumpDemand, Real)> = None;
    for (pumps, capacity) in (1_usize..).zip(&config.pump_capacities) {
        let inflow = capacity * pumps as Real;
        let predicted = predict_level(level, steam, inflow, config);
        let distance = (predicted.midpoint() - target).abs();
        if best.is_none_or(|(_, closest)| distance < closest) {
            best = Some((PumpDemand { pumps, predicted }, distance));
        }
    }
    best.map_or(idle, |(demand, _)| demand)
}
