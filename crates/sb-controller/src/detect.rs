//! Failure detectors.
//!
//! All detectors are pure predicates over one cycle's readings, the
//! boiler characteristics and, where needed, the controller's own beliefs.

use core::fmt;

use crate::config::BoilerConfig;
use sb_core::{PumpId, Real};
use sb_mailbox::CycleSnapshot;

/// A condition the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    /// Required readings missing, duplicated or malformed.
    Transmission,
    /// Water level sensor reports an impossible value or jump.
    LevelSensor,
    /// Steam sensor reports an impossible value.
    SteamSensor,
    /// Pump reports a state other than the one last commanded.
    Pump(PumpId),
    /// Pump controller reports a flow other than the one last commanded.
    PumpController(PumpId),
    /// Water level at or near a safety limit.
    LimitBreach,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Transmission => write!(f, "Transmission failure"),
            Fault::LevelSensor => write!(f, "Water level sensor failure"),
            Fault::SteamSensor => write!(f, "Steam sensor failure"),
            Fault::Pump(pump) => write!(f, "Pump {pump} failure"),
            Fault::PumpController(pump) => write!(f, "Pump controller {pump} failure"),
            Fault::LimitBreach => write!(f, "Water level safety limit breach"),
        }
    }
}

impl Fault {
    /// The pump taken out of service by this fault, if any.
    pub fn pump(&self) -> Option<PumpId> {
        match self {
            Fault::Pump(pump) | Fault::PumpController(pump) => Some(*pump),
            _ => None,
        }
    }

    /// Whether `snapshot` carries the repair notice that clears this fault.
    pub fn repaired_by(&self, snapshot: &CycleSnapshot) -> bool {
        match self {
            Fault::LevelSensor => snapshot.level_repaired,
            Fault::SteamSensor => snapshot.steam_repaired,
            Fault::Pump(pump) => snapshot.pump_repaired(*pump),
            Fault::PumpController(pump) => snapshot.pump_control_repaired(*pump),
            Fault::Transmission | Fault::LimitBreach => false,
        }
    }
}

/// Water level sensor plausibility check.
///
/// A reading is implausible if it is negative or at/above capacity. Once
/// the boiler is operating (`trusted` is the previously accepted level), a
/// reading that more than doubles or falls below half of it is treated as a
/// sensor fault rather than a real change.
pub fn level_sensor_failed(reading: Real, trusted: Option<Real>, config: &BoilerConfig) -> bool {
    if reading < 0.0 || reading >= config.capacity {
        return true;
    }
    match trusted {
        Some(previous) => reading > previous * 2.0 || reading < previous / 2.0,
        None => false,
    }
}

/// Steam sensor plausibility check: outside `[0, max_steam_rate]`.
pub fn steam_sensor_failed(reading: Real, config: &BoilerConfig) -> bool {
    reading < 0.0 || reading > config.max_steam_rate
}

/// Whether `level` is at, beyond, or within the early-warning margin of a
/// safety limit.
pub fn near_limit(level: Real, config: &BoilerConfig) -> bool {
    let margin = config.limit_margin();
    level >= config.max_limit - margin || level <= config.min_limit + margin
}

/// Limit check for the synthesized level in rescue mode, using the wider
/// rescue margin. Since `min_limit >= 0`, an estimate at or below empty
/// always trips.
pub fn estimate_near_limit(level: Real, config: &BoilerConfig) -> bool {
    let margin = config.rescue_margin();
    level >= config.max_limit - margin || level <= config.min_limit + margin
}

/// First pump whose reported state differs from the commanded one.
pub fn first_mismatch(commanded: &[bool], reported: &[bool]) -> Option<PumpId> {
    (0_u32..)
        .zip(commanded.iter().zip(reported))
        .find(|(_, (cmd, rep))| cmd != rep)
        .map(|(index, _)| PumpId::from_index(index))
}
