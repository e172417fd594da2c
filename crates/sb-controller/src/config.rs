//! Boiler characteristics.

use crate::error::{ControllerError, ControllerResult};
use sb_core::{PumpId, Real, ensure_finite, midpoint};
use serde::{Deserialize, Serialize};

/// Period of the reference plant clock, in seconds.
pub const DEFAULT_CYCLE_SECONDS: Real = 5.0;

fn default_cycle_seconds() -> Real {
    DEFAULT_CYCLE_SECONDS
}

/// Immutable characteristics of one boiler.
///
/// Levels are in litres, rates in litres/second. The ordering
/// `min_limit < min_normal < max_normal < max_limit <= capacity` is checked
/// by [`BoilerConfig::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoilerConfig {
    /// Total water capacity (C).
    pub capacity: Real,
    /// Lower edge of the normal band (N1).
    pub min_normal: Real,
    /// Upper edge of the normal band (N2).
    pub max_normal: Real,
    /// Lower safety limit (M1).
    pub min_limit: Real,
    /// Upper safety limit (M2).
    pub max_limit: Real,
    /// Maximum steam output (W).
    pub max_steam_rate: Real,
    /// Throughput of each pump; the number of entries is the pump count.
    pub pump_capacities: Vec<Real>,
    /// Length of one control cycle (seconds).
    #[serde(default = "default_cycle_seconds")]
    pub cycle_seconds: Real,
}

impl BoilerConfig {
    /// Create a validated configuration using the default cycle length.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::InvalidConfig`] if any constraint is violated.
    pub fn new(
        capacity: Real,
        normal: (Real, Real),
        limits: (Real, Real),
        max_steam_rate: Real,
        pump_capacities: Vec<Real>,
    ) -> ControllerResult<Self> {
        let config = Self {
            capacity,
            min_normal: normal.0,
            max_normal: normal.1,
            min_limit: limits.0,
            max_limit: limits.1,
            max_steam_rate,
            pump_capacities,
            cycle_seconds: DEFAULT_CYCLE_SECONDS,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn pump_count(&self) -> usize {
        self.pump_capacities.len()
    }

    pub fn pump_capacity(&self, pump: PumpId) -> Option<Real> {
        self.pump_capacities.get(pump.slot()).copied()
    }

    /// Centre of the normal band, the regulation target.
    pub fn normal_midpoint(&self) -> Real {
        midpoint(self.min_normal, self.max_normal)
    }

    /// Whether `level` lies strictly inside `(min_normal, max_normal)`.
    pub fn in_normal_band(&self, level: Real) -> bool {
        level > self.min_normal && level < self.max_normal
    }

    /// Early-warning distance kept from either safety limit.
    pub fn limit_margin(&self) -> Real {
        (self.max_limit - self.max_normal) / 4.0
    }

    /// Wider margin for a synthesized level, which carries the estimator's
    /// uncertainty.
    pub fn rescue_margin(&self) -> Real {
        (self.max_limit - self.max_normal) / 2.0
    }

    /// Check every constraint on the characteristics.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::InvalidConfig`] naming the first violated
    /// constraint, or [`ControllerError::Core`] for a non-finite value.
    pub fn validate(&self) -> ControllerResult<()> {
        ensure_finite(self.capacity, "capacity")?;
        ensure_finite(self.min_normal, "min_normal")?;
        ensure_finite(self.max_normal, "max_normal")?;
        ensure_finite(self.min_limit, "min_limit")?;
        ensure_finite(self.max_limit, "max_limit")?;
        ensure_finite(self.max_steam_rate, "max_steam_rate")?;
        ensure_finite(self.cycle_seconds, "cycle_seconds")?;

        if self.min_limit < 0.0 {
            return Err(invalid("min_limit must be non-negative"));
        }
        if self.min_limit >= self.min_normal {
            return Err(invalid("min_limit must be below min_normal"));
        }
        if self.min_normal >= self.max_normal {
            return Err(invalid("min_normal must be below max_normal"));
        }
        if self.max_normal >= self.max_limit {
            return Err(invalid("max_normal must be below max_limit"));
        }
        if self.max_limit > self.capacity {
            return Err(invalid("max_limit must not exceed capacity"));
        }
        if self.max_steam_rate <= 0.0 {
            return Err(invalid("max_steam_rate must be positive"));
        }
        if self.cycle_seconds <= 0.0 {
            return Err(invalid("cycle_seconds must be positive"));
        }
        if self.pump_capacities.is_empty() {
            return Err(invalid("at least one pump is required"));
        }
        for &capacity in &self.pump_capacities {
            ensure_finite(capacity, "pump capacity")?;
            if capacity <= 0.0 {
                return Err(invalid("pump capacities must be positive"));
            }
        }
        Ok(())
    }
}

fn invalid(what: &'static str) -> ControllerError {
    ControllerError::InvalidConfig { what }
}
