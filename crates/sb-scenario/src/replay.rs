//! Replay a scenario through a fresh controller.

use crate::ScenarioResult;
use crate::schema::Scenario;
use crate::validate::validate_scenario;
use sb_controller::SteamBoilerController;
use sb_mailbox::{OperatingMode, Outbound};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Outputs of one replayed cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleRecord {
    pub cycle: usize,
    pub mode: OperatingMode,
    pub outputs: Vec<Outbound>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExpectationFailure {
    pub cycle: usize,
    pub expected: OperatingMode,
    pub found: OperatingMode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub name: String,
    pub cycles: Vec<CycleRecord>,
    pub final_mode: OperatingMode,
    /// Controller status line after the last cycle.
    pub status: String,
    pub failures: Vec<ExpectationFailure>,
}

impl ReplayReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

pub fn replay(scenario: &Scenario) -> ScenarioResult<ReplayReport> {
    validate_scenario(scenario)?;
    let mut controller = SteamBoilerController::new(scenario.boiler.clone())?;
    info!(name = %scenario.name, cycles = scenario.cycles.len(), "replaying scenario");

    let mut cycles = Vec::with_capacity(scenario.cycles.len());
    let mut failures = Vec::new();
    for (cycle, def) in scenario.cycles.iter().enumerate() {
        let outputs = controller.cycle(&def.to_mailbox());
        let mode = controller.mode().announced();
        debug!(cycle, %mode, outputs = outputs.len(), "cycle replayed");

        if let Some(expected) = def.expect_mode
            && expected != mode
        {
            warn!(cycle, %expected, found = %mode, "mode expectation failed");
            failures.push(ExpectationFailure {
                cycle,
                expected,
                found: mode,
            });
        }
        cycles.push(CycleRecord {
            cycle,
            mode,
            outputs: outputs.into_vec(),
        });
    }

    Ok(ReplayReport {
        name: scenario.name.clone(),
        cycles,
        final_mode: controller.mode().announced(),
        status: controller.status_message(),
        failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::CycleDef;
    use sb_controller::BoilerConfig;
    use sb_mailbox::Inbound;

    fn cycle(level: f64, signals: Vec<Inbound>, expect: OperatingMode) -> CycleDef {
        CycleDef {
            level: Some(level),
            steam: Some(0.0),
            pumps: vec![false, false],
            pump_controllers: vec![false, false],
            signals,
            expect_mode: Some(expect),
        }
    }

    fn boiler() -> BoilerConfig {
        BoilerConfig::new(1000.0, (400.0, 600.0), (100.0, 800.0), 25.0, vec![5.0, 5.0]).unwrap()
    }

    #[test]
    fn replay_reaches_normal() {
        let scenario = Scenario {
            version: 1,
            name: "start".to_string(),
            boiler: boiler(),
            cycles: vec![
                cycle(
                    500.0,
                    vec![Inbound::SteamBoilerWaiting],
                    OperatingMode::Initialisation,
                ),
                cycle(
                    500.0,
                    vec![Inbound::PhysicalUnitsReady],
                    OperatingMode::Normal,
                ),
            ],
        };
        let report = replay(&scenario).unwrap();
        assert!(report.passed(), "{:?}", report.failures);
        assert_eq!(report.final_mode, OperatingMode::Normal);
        assert!(report.cycles[0].outputs.contains(&Outbound::ProgramReady));
    }

    #[test]
    fn replay_records_mismatch() {
        let mut start = cycle(
            500.0,
            vec![Inbound::SteamBoilerWaiting],
            OperatingMode::Normal,
        );
        start.steam = Some(3.0);
        let scenario = Scenario {
            version: 1,
            name: "steam at start".to_string(),
            boiler: boiler(),
            cycles: vec![start],
        };
        let report = replay(&scenario).unwrap();
        assert_eq!(report.final_mode, OperatingMode::EmergencyStop);
        assert_eq!(
            report.failures,
            vec![ExpectationFailure {
                cycle: 0,
                expected: OperatingMode::Normal,
                found: OperatingMode::EmergencyStop,
            }]
        );
    }
}
