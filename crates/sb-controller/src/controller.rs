//! Mode state machine.
//!
//! Each cycle runs the transmission-failure gate, then dispatches once on
//! the current mode. A handler that changes mode may continue into the new
//! mode's handler within the same cycle (NORMAL falling into DEGRADED, for
//! example). The cycle always ends with exactly one mode announcement.

use crate::config::BoilerConfig;
use crate::detect::{
    Fault, estimate_near_limit, first_mismatch, level_sensor_failed, near_limit,
    steam_sensor_failed,
};
use crate::error::ControllerResult;
use crate::estimator::{estimate, predict_level};
use crate::mode::Mode;
use crate::output::CycleOutput;
use crate::state::ControllerState;
use sb_core::Real;
use sb_mailbox::{CycleSnapshot, Inbound, Mailbox, Outbound};
use tracing::{debug, error, info, warn};

/// The steam boiler controller.
#[derive(Debug, Clone)]
pub struct SteamBoilerController {
    config: BoilerConfig,
    state: ControllerState,
}

impl SteamBoilerController {
    /// Create a controller in `Waiting` mode.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn new(config: BoilerConfig) -> ControllerResult<Self> {
        config.validate()?;
        let state = ControllerState::new(config.pump_count());
        Ok(Self { config, state })
    }

    pub fn config(&self) -> &BoilerConfig {
        &self.config
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    /// Human-readable status for display; has no control effect.
    pub fn status_message(&self) -> String {
        self.state.mode.to_string()
    }

    /// Run one control cycle: read `incoming`, append decisions to `outgoing`.
    pub fn clock(&mut self, incoming: &Mailbox<Inbound>, outgoing: &mut Mailbox<Outbound>) {
        let mut out = CycleOutput::new(outgoing);
        match CycleSnapshot::classify(incoming.as_slice(), self.config.pump_count()) {
            Ok(snapshot) => self.dispatch(&snapshot, &mut out),
            Err(failure) => {
                error!(%failure, mode = %self.state.mode, "transmission failure");
                self.emergency_stop(Fault::Transmission, &mut out);
            }
        }
        out.announce(self.state.mode.announced());
    }

    /// Run one control cycle and return the outbound batch.
    pub fn cycle(&mut self, incoming: &Mailbox<Inbound>) -> Mailbox<Outbound> {
        let mut outgoing = Mailbox::new();
        self.clock(incoming, &mut outgoing);
        outgoing
    }

    fn dispatch(&mut self, snap: &CycleSnapshot, out: &mut CycleOutput<'_>) {
        match self.state.mode {
            Mode::Waiting => self.waiting(snap, out),
            Mode::Ready => self.ready(snap, out),
            Mode::Normal => self.normal(snap, out),
            Mode::Degraded => self.degraded(snap, out),
            Mode::Rescue => self.rescue(snap, out),
            Mode::EmergencyStop => debug!("emergency stop: no commands issued"),
        }
    }

    fn waiting(&mut self, snap: &CycleSnapshot, out: &mut CycleOutput<'_>) {
        if !snap.waiting {
            return;
        }
        // Steam cannot flow before the boiler has started.
        if snap.steam != 0.0 {
            self.emergency_stop(Fault::SteamSensor, out);
            return;
        }
        if level_sensor_failed(snap.level, None, &self.config) {
            self.emergency_stop(Fault::LevelSensor, out);
            return;
        }
        self.state.trusted_level = snap.level;
        self.state.trusted_steam = snap.steam;
        self.transition(Mode::Ready);
        if self.config.in_normal_band(snap.level) {
            out.program_ready();
        }
    }

    fn ready(&mut self, snap: &CycleSnapshot, out: &mut CycleOutput<'_>) {
        if snap.physical_units_ready {
            self.set_valve(false, out);
            self.transition(Mode::Normal);
            return;
        }
        if snap.steam != 0.0 {
            self.emergency_stop(Fault::SteamSensor, out);
            return;
        }
        if level_sensor_failed(snap.level, None, &self.config) {
            self.emergency_stop(Fault::LevelSensor, out);
            return;
        }

        let level = snap.level;
        self.state.trusted_level = level;
        self.state.trusted_steam = snap.steam;
        if self.config.in_normal_band(level) {
            self.set_valve(false, out);
            self.state.pumps.stop_all(out);
            out.program_ready();
        } else if level >= self.config.max_normal {
            debug!(level, "draining through the valve");
            self.set_valve(true, out);
            self.state.pumps.stop_all(out);
        } else {
            debug!(level, "filling");
            self.set_valve(false, out);
            self.regulate(level, snap.steam, out);
        }
    }

    fn normal(&mut self, snap: &CycleSnapshot, out: &mut CycleOutput<'_>) {
        let level = snap.level;
        if steam_sensor_failed(snap.steam, &self.config) {
            self.degrade(Fault::SteamSensor, out);
            self.degraded(snap, out);
            return;
        }
        if level_sensor_failed(level, Some(self.state.trusted_level), &self.config) || level <= 0.0
        {
            self.enter_rescue(out);
            self.rescue(snap, out);
            return;
        }
        if near_limit(level, &self.config) {
            self.emergency_stop(Fault::LimitBreach, out);
            return;
        }
        let commanded = self.state.pumps.commanded();
        let fault = first_mismatch(commanded, &snap.pump_states)
            .map(Fault::Pump)
            .or_else(|| first_mismatch(commanded, &snap.pump_control_states).map(Fault::PumpController));
        if let Some(fault) = fault {
            self.degrade(fault, out);
            self.degraded(snap, out);
            return;
        }

        self.state.trusted_level = level;
        self.state.trusted_steam = snap.steam;
        self.regulate(level, snap.steam, out);
    }

    fn degraded(&mut self, snap: &CycleSnapshot, out: &mut CycleOutput<'_>) {
        let level = snap.level;
        if level_sensor_failed(level, Some(self.state.trusted_level), &self.config) {
            self.enter_rescue(out);
            self.rescue(snap, out);
            return;
        }
        if near_limit(level, &self.config) {
            self.emergency_stop(Fault::LimitBreach, out);
            return;
        }
        self.state.trusted_level = level;

        let steam_acknowledged = self.track_steam_sensor(snap, out);
        let cleared = match self.state.degraded_by {
            Some(Fault::SteamSensor) => steam_acknowledged,
            Some(fault) if fault.repaired_by(snap) => {
                out.acknowledged(fault);
                info!(%fault, "repair acknowledged");
                if fault.pump().is_some() {
                    self.state.broken_pump = None;
                }
                true
            }
            _ => false,
        };
        if cleared {
            self.end_degradation();
        } else {
            warn_unmatched_repairs(snap, self.state.degraded_by, steam_acknowledged);
        }

        let steam = self.regulation_steam(snap);
        self.regulate(level, steam, out);
    }

    fn rescue(&mut self, snap: &CycleSnapshot, out: &mut CycleOutput<'_>) {
        if self.track_steam_sensor(snap, out) && self.state.degraded_by == Some(Fault::SteamSensor) {
            // The degradation this rescue interrupted is over.
            self.state.degraded_by = None;
            if self.state.mode_before_rescue == Mode::Degraded {
                self.state.mode_before_rescue = self.state.mode_before_degraded;
            }
        }

        if Fault::LevelSensor.repaired_by(snap) {
            out.acknowledged(Fault::LevelSensor);
            info!(level = snap.level, "level sensor repair acknowledged");
            self.state.trusted_level = snap.level;
            let resume = self.rescue_exit_mode();
            self.transition(resume);
            if near_limit(snap.level, &self.config) {
                self.emergency_stop(Fault::LimitBreach, out);
                return;
            }
            let steam = self.regulation_steam(snap);
            self.regulate(snap.level, steam, out);
            return;
        }

        let estimated = self.state.trusted_level;
        if estimate_near_limit(estimated, &self.config) {
            self.emergency_stop(Fault::LimitBreach, out);
            return;
        }
        let steam = self.regulation_steam(snap);
        self.regulate(estimated, steam, out);
        let inflow = self.state.pumps.inflow(&self.config);
        self.state.trusted_level = predict_level(estimated, steam, inflow, &self.config).midpoint();
        debug!(
            estimated,
            next = self.state.trusted_level,
            "synthesized level estimate"
        );
    }

    /// Record a recoverable fault and move to `Degraded`.
    fn degrade(&mut self, fault: Fault, out: &mut CycleOutput<'_>) {
        warn!(%fault, mode = %self.state.mode, "fault detected, degrading");
        out.detected(fault);
        if let Some(pump) = fault.pump() {
            self.state.broken_pump = Some(pump);
        }
        if fault == Fault::SteamSensor {
            self.state.steam_failed = true;
        }
        self.state.degraded_by = Some(fault);
        self.state.mode_before_degraded = self.state.mode;
        self.transition(Mode::Degraded);
    }

    /// Leave `Degraded` once its fault is repaired. An outstanding steam
    /// sensor failure keeps the controller degraded on that fault instead.
    fn end_degradation(&mut self) {
        if self.state.steam_failed {
            info!("steam sensor still failed, staying degraded");
            self.state.degraded_by = Some(Fault::SteamSensor);
            return;
        }
        self.state.degraded_by = None;
        self.transition(self.state.mode_before_degraded);
    }

    /// Mode to resume after the level sensor is repaired.
    fn rescue_exit_mode(&mut self) -> Mode {
        let resume = self.state.mode_before_rescue;
        if resume == Mode::Normal && self.state.steam_failed {
            self.state.degraded_by = Some(Fault::SteamSensor);
            self.state.mode_before_degraded = Mode::Normal;
            return Mode::Degraded;
        }
        resume
    }

    /// Follow the steam sensor while another fault is being handled: a new
    /// failure is reported once, and its repair acknowledged once.
    ///
    /// Returns whether a steam repair was acknowledged this cycle.
    fn track_steam_sensor(&mut self, snap: &CycleSnapshot, out: &mut CycleOutput<'_>) -> bool {
        if self.state.steam_failed {
            if snap.steam_repaired {
                out.acknowledged(Fault::SteamSensor);
                info!(fault = %Fault::SteamSensor, "repair acknowledged");
                self.state.steam_failed = false;
                return true;
            }
        } else if steam_sensor_failed(snap.steam, &self.config) {
            warn!(fault = %Fault::SteamSensor, mode = %self.state.mode, steam = snap.steam, "fault detected");
            out.detected(Fault::SteamSensor);
            self.state.steam_failed = true;
        }
        false
    }

    /// Stop trusting the level sensor and move to `Rescue`.
    fn enter_rescue(&mut self, out: &mut CycleOutput<'_>) {
        warn!(
            fault = %Fault::LevelSensor,
            mode = %self.state.mode,
            trusted_level = self.state.trusted_level,
            "fault detected, rescuing"
        );
        out.detected(Fault::LevelSensor);
        self.state.mode_before_rescue = self.state.mode;
        self.transition(Mode::Rescue);
    }

    fn emergency_stop(&mut self, fault: Fault, out: &mut CycleOutput<'_>) {
        if self.state.mode.is_terminal() {
            return;
        }
        error!(%fault, mode = %self.state.mode, "emergency stop");
        out.detected(fault);
        self.transition(Mode::EmergencyStop);
    }

    fn transition(&mut self, next: Mode) {
        let prev = self.state.mode;
        if prev == next {
            return;
        }
        if !prev.can_transition_to(next) {
            error!(from = %prev, to = %next, "rejected mode transition");
            return;
        }
        info!(from = %prev, to = %next, "mode transition");
        self.state.mode = next;
    }

    fn set_valve(&mut self, open: bool, out: &mut CycleOutput<'_>) {
        if self.state.valve_open != open {
            out.toggle_valve();
            self.state.valve_open = open;
        }
    }

    /// Steam value to regulate with: the reading, unless the steam sensor is
    /// failed or awaiting repair, in which case the last trusted reading.
    fn regulation_steam(&mut self, snap: &CycleSnapshot) -> Real {
        let untrusted =
            self.state.steam_failed || steam_sensor_failed(snap.steam, &self.config);
        if untrusted {
            self.state.trusted_steam
        } else {
            self.state.trusted_steam = snap.steam;
            snap.steam
        }
    }

    /// Command every pump per the estimator, routing around a broken pump.
    fn regulate(&mut self, level: Real, steam: Real, out: &mut CycleOutput<'_>) -> usize {
        let demand = estimate(level, steam, &self.config);
        let opened = self
            .state
            .pumps
            .command(demand.pumps, self.state.broken_pump, out);
        debug!(
            level,
            steam,
            demand = demand.pumps,
            opened,
            pumps = ?self.state.pumps.commanded(),
            "pump regulation"
        );
        opened
    }
}

fn warn_unmatched_repairs(snap: &CycleSnapshot, active: Option<Fault>, steam_acknowledged: bool) {
    let pending = (snap.steam_repaired && !steam_acknowledged)
        || snap.level_repaired
        || !snap.pumps_repaired.is_empty()
        || !snap.pump_controls_repaired.is_empty();
    if pending {
        warn!(active = ?active, "repair notice does not match the active fault; ignored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_core::PumpId;
    use sb_mailbox::OperatingMode;

    fn reference() -> BoilerConfig {
        BoilerConfig::new(1000.0, (400.0, 600.0), (100.0, 800.0), 250.0, vec![4.0, 4.0]).unwrap()
    }

    fn pump(i: u32) -> PumpId {
        PumpId::from_index(i)
    }

    fn reports(level: Real, steam: Real, pumps: &[bool], controls: &[bool]) -> Mailbox<Inbound> {
        let mut mb = Mailbox::new();
        mb.send(Inbound::Level { value: level });
        mb.send(Inbound::Steam { value: steam });
        for (i, open) in (0_u32..).zip(pumps) {
            mb.send(Inbound::PumpState {
                pump: pump(i),
                open: *open,
            });
        }
        for (i, flowing) in (0_u32..).zip(controls) {
            mb.send(Inbound::PumpControlState {
                pump: pump(i),
                flowing: *flowing,
            });
        }
        mb
    }

    fn with_signal(mut mb: Mailbox<Inbound>, signal: Inbound) -> Mailbox<Inbound> {
        mb.send(signal);
        mb
    }

    fn controller_in(mode: Mode, trusted_level: Real, commanded: &[bool]) -> SteamBoilerController {
        let mut ctl = SteamBoilerController::new(reference()).unwrap();
        ctl.state.mode = mode;
        ctl.state.trusted_level = trusted_level;
        let mut mailbox = Mailbox::new();
        let demand = commanded.iter().filter(|o| **o).count();
        ctl.state
            .pumps
            .command(demand, None, &mut CycleOutput::new(&mut mailbox));
        assert_eq!(ctl.state.pumps.commanded(), commanded);
        ctl
    }

    fn last_mode(out: &Mailbox<Outbound>) -> Option<OperatingMode> {
        out.iter().last().and_then(Outbound::announced_mode)
    }

    fn pump_commands(out: &Mailbox<Outbound>) -> usize {
        out.iter().filter(|m| m.is_pump_command()).count()
    }

    #[test]
    fn waiting_without_signal_stays_waiting() {
        let mut ctl = SteamBoilerController::new(reference()).unwrap();
        let out = ctl.cycle(&reports(500.0, 0.0, &[false, false], &[false, false]));
        assert_eq!(ctl.mode(), Mode::Waiting);
        assert_eq!(
            out.as_slice(),
            &[Outbound::Mode {
                mode: OperatingMode::Initialisation
            }]
        );
        assert_eq!(ctl.status_message(), "WAITING");
    }

    #[test]
    fn waiting_signal_in_band_is_ready() {
        let mut ctl = SteamBoilerController::new(reference()).unwrap();
        let inbound = with_signal(
            reports(500.0, 0.0, &[false, false], &[false, false]),
            Inbound::SteamBoilerWaiting,
        );
        let out = ctl.cycle(&inbound);
        assert_eq!(ctl.mode(), Mode::Ready);
        assert!(out.contains(&Outbound::ProgramReady));
        assert_eq!(last_mode(&out), Some(OperatingMode::Initialisation));
    }

    #[test]
    fn waiting_with_steam_flowing_stops() {
        let mut ctl = SteamBoilerController::new(reference()).unwrap();
        let inbound = with_signal(
            reports(500.0, 12.0, &[false, false], &[false, false]),
            Inbound::SteamBoilerWaiting,
        );
        let out = ctl.cycle(&inbound);
        assert_eq!(ctl.mode(), Mode::EmergencyStop);
        assert_eq!(last_mode(&out), Some(OperatingMode::EmergencyStop));
        assert_eq!(pump_commands(&out), 0);
    }

    #[test]
    fn waiting_with_broken_level_sensor_reports_before_stopping() {
        let mut ctl = SteamBoilerController::new(reference()).unwrap();
        let inbound = with_signal(
            reports(-3.0, 0.0, &[false, false], &[false, false]),
            Inbound::SteamBoilerWaiting,
        );
        let out = ctl.cycle(&inbound);
        assert_eq!(ctl.mode(), Mode::EmergencyStop);
        assert_eq!(
            out.as_slice(),
            &[
                Outbound::LevelFailureDetection,
                Outbound::Mode {
                    mode: OperatingMode::EmergencyStop
                }
            ]
        );
    }

    #[test]
    fn ready_drains_high_water_once() {
        let mut ctl = controller_in(Mode::Ready, 700.0, &[false, false]);
        let out = ctl.cycle(&reports(700.0, 0.0, &[false, false], &[false, false]));
        assert!(out.contains(&Outbound::Valve));
        assert!(ctl.state().valve_open());
        assert_eq!(pump_commands(&out), 2);

        // Still high: the valve is already open, no second toggle.
        let out = ctl.cycle(&reports(650.0, 0.0, &[false, false], &[false, false]));
        assert!(!out.contains(&Outbound::Valve));
        assert_eq!(ctl.mode(), Mode::Ready);
    }

    #[test]
    fn ready_fills_low_water_and_closes_valve() {
        let mut ctl = controller_in(Mode::Ready, 300.0, &[false, false]);
        ctl.state.valve_open = true;
        let out = ctl.cycle(&reports(300.0, 0.0, &[false, false], &[false, false]));
        assert_eq!(out.read(0), Some(&Outbound::Valve));
        assert!(!ctl.state().valve_open());
        assert_eq!(pump_commands(&out), 2);
        assert_eq!(ctl.state().pump_command_vector(), &[true, true]);
    }

    #[test]
    fn ready_in_band_stops_pumps_and_reports_ready() {
        let mut ctl = controller_in(Mode::Ready, 450.0, &[true, true]);
        let out = ctl.cycle(&reports(450.0, 0.0, &[true, true], &[true, true]));
        assert_eq!(ctl.state().pump_command_vector(), &[false, false]);
        assert!(out.contains(&Outbound::ProgramReady));
        assert_eq!(pump_commands(&out), 2);
    }

    #[test]
    fn ready_band_edges_drain_and_fill() {
        // Exactly at max_normal: drain.
        let mut ctl = controller_in(Mode::Ready, 600.0, &[false, false]);
        let out = ctl.cycle(&reports(600.0, 0.0, &[false, false], &[false, false]));
        assert!(out.contains(&Outbound::Valve));
        assert!(!out.contains(&Outbound::ProgramReady));
        assert_eq!(ctl.state().pump_command_vector(), &[false, false]);

        // Exactly at min_normal: fill.
        let mut ctl = controller_in(Mode::Ready, 400.0, &[false, false]);
        let out = ctl.cycle(&reports(400.0, 0.0, &[false, false], &[false, false]));
        assert!(!out.contains(&Outbound::Valve));
        assert!(!out.contains(&Outbound::ProgramReady));
        assert_eq!(pump_commands(&out), 2);
        assert_eq!(ctl.state().pump_command_vector(), &[true, true]);
        assert_eq!(ctl.mode(), Mode::Ready);
    }

    #[test]
    fn physical_units_ready_enters_normal() {
        let mut ctl = controller_in(Mode::Ready, 500.0, &[false, false]);
        let inbound = with_signal(
            reports(500.0, 0.0, &[false, false], &[false, false]),
            Inbound::PhysicalUnitsReady,
        );
        let out = ctl.cycle(&inbound);
        assert_eq!(ctl.mode(), Mode::Normal);
        assert_eq!(last_mode(&out), Some(OperatingMode::Normal));
    }

    #[test]
    fn normal_regulates_every_pump() {
        let mut ctl = controller_in(Mode::Normal, 500.0, &[false, false]);
        let out = ctl.cycle(&reports(500.0, 0.0, &[false, false], &[false, false]));
        assert_eq!(ctl.mode(), Mode::Normal);
        assert_eq!(pump_commands(&out), 2);
        assert_eq!(ctl.state().pump_command_vector(), &[true, true]);
        assert_eq!(ctl.state().trusted_level(), 500.0);
    }

    #[test]
    fn normal_level_sensor_failure_enters_rescue() {
        let mut ctl = controller_in(Mode::Normal, 500.0, &[true, true]);
        let out = ctl.cycle(&reports(1300.0, 0.0, &[true, true], &[true, true]));
        assert_eq!(ctl.mode(), Mode::Rescue);
        assert_eq!(ctl.state().mode_before_rescue(), Mode::Normal);

        let detection = out
            .iter()
            .position(|m| *m == Outbound::LevelFailureDetection)
            .unwrap();
        let announcement = out
            .iter()
            .position(|m| {
                *m == Outbound::Mode {
                    mode: OperatingMode::Rescue,
                }
            })
            .unwrap();
        assert!(detection < announcement);
        assert_eq!(pump_commands(&out), 2);
    }

    #[test]
    fn normal_zero_level_enters_rescue() {
        let mut ctl = controller_in(Mode::Normal, 500.0, &[true, true]);
        ctl.cycle(&reports(0.0, 0.0, &[true, true], &[true, true]));
        assert_eq!(ctl.mode(), Mode::Rescue);
    }

    #[test]
    fn normal_pump_mismatch_degrades() {
        let mut ctl = controller_in(Mode::Normal, 500.0, &[true, true]);
        let out = ctl.cycle(&reports(500.0, 0.0, &[true, false], &[true, true]));
        assert_eq!(ctl.mode(), Mode::Degraded);
        assert_eq!(ctl.state().broken_pump(), Some(pump(1)));
        assert_eq!(ctl.state().degraded_by(), Some(Fault::Pump(pump(1))));
        assert_eq!(out.read(0), Some(&Outbound::PumpFailureDetection { pump: pump(1) }));
        // Broken pump is held closed while the other keeps filling.
        assert_eq!(ctl.state().pump_command_vector(), &[true, false]);
        assert_eq!(pump_commands(&out), 2);
    }

    #[test]
    fn normal_controller_mismatch_degrades() {
        let mut ctl = controller_in(Mode::Normal, 500.0, &[true, true]);
        let out = ctl.cycle(&reports(500.0, 0.0, &[true, true], &[false, true]));
        assert_eq!(ctl.mode(), Mode::Degraded);
        assert_eq!(ctl.state().degraded_by(), Some(Fault::PumpController(pump(0))));
        assert!(out.contains(&Outbound::PumpControlFailureDetection { pump: pump(0) }));
        assert_eq!(ctl.state().pump_command_vector(), &[false, true]);
    }

    #[test]
    fn normal_steam_failure_degrades_with_trusted_steam() {
        let mut ctl = controller_in(Mode::Normal, 500.0, &[true, true]);
        ctl.state.trusted_steam = 3.0;
        let out = ctl.cycle(&reports(500.0, 400.0, &[true, true], &[true, true]));
        assert_eq!(ctl.mode(), Mode::Degraded);
        assert_eq!(ctl.state().mode_before_degraded(), Mode::Normal);
        assert!(out.contains(&Outbound::SteamFailureDetection));
        assert_eq!(ctl.state().trusted_steam(), 3.0);
        assert_eq!(pump_commands(&out), 2);
    }

    #[test]
    fn normal_near_limit_stops() {
        let mut ctl = controller_in(Mode::Normal, 700.0, &[false, false]);
        let out = ctl.cycle(&reports(760.0, 0.0, &[false, false], &[false, false]));
        assert_eq!(ctl.mode(), Mode::EmergencyStop);
        assert_eq!(pump_commands(&out), 0);
    }

    #[test]
    fn degraded_ignores_unmatched_repair() {
        let mut ctl = controller_in(Mode::Normal, 500.0, &[true, true]);
        ctl.cycle(&reports(500.0, 0.0, &[true, false], &[true, true]));
        let inbound = with_signal(
            reports(500.0, 0.0, &[true, false], &[true, false]),
            Inbound::PumpRepaired { pump: pump(0) },
        );
        let out = ctl.cycle(&inbound);
        assert_eq!(ctl.mode(), Mode::Degraded);
        assert!(!out.iter().any(|m| matches!(m, Outbound::PumpRepairedAcknowledgement { .. })));
        assert_eq!(ctl.state().broken_pump(), Some(pump(1)));
    }

    #[test]
    fn degraded_steam_repair_returns_to_normal() {
        let mut ctl = controller_in(Mode::Normal, 500.0, &[true, true]);
        ctl.cycle(&reports(500.0, -1.0, &[true, true], &[true, true]));
        assert_eq!(ctl.mode(), Mode::Degraded);

        let inbound = with_signal(
            reports(500.0, 2.0, &[true, true], &[true, true]),
            Inbound::SteamRepaired,
        );
        let out = ctl.cycle(&inbound);
        assert_eq!(ctl.mode(), Mode::Normal);
        assert_eq!(out.read(0), Some(&Outbound::SteamRepairedAcknowledgement));
        assert_eq!(last_mode(&out), Some(OperatingMode::Normal));
        assert_eq!(ctl.state().trusted_steam(), 2.0);
        assert_eq!(ctl.state().degraded_by(), None);
    }

    #[test]
    fn rescue_synthesizes_level_from_prediction() {
        let mut ctl = controller_in(Mode::Normal, 500.0, &[true, true]);
        ctl.cycle(&reports(1300.0, 0.0, &[true, true], &[true, true]));
        // Regulated from 500 with both pumps: interval [-710, 540].
        assert_eq!(ctl.state().trusted_level(), -85.0);

        // The estimate is now below the lower limit margin.
        let out = ctl.cycle(&reports(1300.0, 0.0, &[true, true], &[true, true]));
        assert_eq!(ctl.mode(), Mode::EmergencyStop);
        assert_eq!(last_mode(&out), Some(OperatingMode::EmergencyStop));
    }

    #[test]
    fn emergency_stop_is_terminal() {
        let mut ctl = controller_in(Mode::EmergencyStop, 500.0, &[false, false]);
        let inbound = with_signal(
            reports(500.0, 0.0, &[false, false], &[false, false]),
            Inbound::PhysicalUnitsReady,
        );
        for _ in 0..3 {
            let out = ctl.cycle(&inbound);
            assert_eq!(
                out.as_slice(),
                &[Outbound::Mode {
                    mode: OperatingMode::EmergencyStop
                }]
            );
        }
    }

    #[test]
    fn transmission_failure_preempts_every_mode() {
        for mode in [Mode::Waiting, Mode::Ready, Mode::Normal, Mode::Degraded, Mode::Rescue] {
            let mut ctl = controller_in(mode, 500.0, &[false, false]);
            let mut inbound = Mailbox::new();
            inbound.send(Inbound::Level { value: 500.0 });
            inbound.send(Inbound::PumpState {
                pump: pump(0),
                open: false,
            });
            let out = ctl.cycle(&inbound);
            assert_eq!(ctl.mode(), Mode::EmergencyStop, "from {mode}");
            assert_eq!(pump_commands(&out), 0);
            assert_eq!(out.len(), 1);
        }
    }
}
