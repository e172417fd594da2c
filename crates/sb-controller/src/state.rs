//! Controller state persisting across cycles.

use crate::detect::Fault;
use crate::mode::Mode;
use crate::pumps::PumpBank;
use sb_core::{PumpId, Real};

/// Everything the controller remembers between cycles.
///
/// Owned exclusively by [`crate::SteamBoilerController`] and mutated once
/// per cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerState {
    pub(crate) mode: Mode,
    pub(crate) mode_before_degraded: Mode,
    pub(crate) mode_before_rescue: Mode,
    pub(crate) pumps: PumpBank,
    pub(crate) trusted_level: Real,
    pub(crate) trusted_steam: Real,
    pub(crate) broken_pump: Option<PumpId>,
    pub(crate) degraded_by: Option<Fault>,
    pub(crate) steam_failed: bool,
    pub(crate) valve_open: bool,
}

impl ControllerState {
    /// Start-up state: waiting, every pump believed closed, valve closed.
    pub fn new(pump_count: usize) -> Self {
        Self {
            mode: Mode::Waiting,
            mode_before_degraded: Mode::Waiting,
            mode_before_rescue: Mode::Waiting,
            pumps: PumpBank::new(pump_count),
            trusted_level: 0.0,
            trusted_steam: 0.0,
            broken_pump: None,
            degraded_by: None,
            steam_failed: false,
            valve_open: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Mode to resume once the active degradation is repaired.
    pub fn mode_before_degraded(&self) -> Mode {
        self.mode_before_degraded
    }

    /// Mode to resume once the level sensor is repaired.
    pub fn mode_before_rescue(&self) -> Mode {
        self.mode_before_rescue
    }

    /// The controller's belief of which pumps are open.
    pub fn pump_command_vector(&self) -> &[bool] {
        self.pumps.commanded()
    }

    /// Last accepted level reading, or the synthesized estimate in rescue mode.
    pub fn trusted_level(&self) -> Real {
        self.trusted_level
    }

    /// Last steam reading that passed the steam sensor check.
    pub fn trusted_steam(&self) -> Real {
        self.trusted_steam
    }

    /// Pump currently routed around.
    pub fn broken_pump(&self) -> Option<PumpId> {
        self.broken_pump
    }

    /// Fault that caused the current degradation.
    pub fn degraded_by(&self) -> Option<Fault> {
        self.degraded_by
    }

    /// Steam sensor reported failed and not yet repaired, whatever fault
    /// the current degradation was entered for.
    pub fn steam_fault_pending(&self) -> bool {
        self.steam_failed
    }

    pub fn valve_open(&self) -> bool {
        self.valve_open
    }
}
