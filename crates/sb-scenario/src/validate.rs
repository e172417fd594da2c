//! Scenario validation logic.

use crate::schema::{LATEST_VERSION, Scenario};
use sb_mailbox::Inbound;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },

    #[error("Invalid boiler: {0}")]
    Boiler(#[from] sb_controller::ControllerError),

    #[error("Unknown pump {pump} in cycle {cycle} (boiler has {pump_count} pumps)")]
    UnknownPump {
        cycle: usize,
        pump: u32,
        pump_count: usize,
    },

    #[error("Scenario '{name}' has no cycles")]
    Empty { name: String },
}

/// Check a scenario before replay.
///
/// Report vectors whose length differs from the pump count are allowed:
/// they describe transmission failures the controller must handle.
pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version > LATEST_VERSION || scenario.version == 0 {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }
    scenario.boiler.validate()?;
    if scenario.cycles.is_empty() {
        return Err(ValidationError::Empty {
            name: scenario.name.clone(),
        });
    }

    let pump_count = scenario.boiler.pump_count();
    for (cycle, def) in scenario.cycles.iter().enumerate() {
        for signal in &def.signals {
            let pump = match signal {
                Inbound::PumpState { pump, .. }
                | Inbound::PumpControlState { pump, .. }
                | Inbound::PumpRepaired { pump }
                | Inbound::PumpControlRepaired { pump } => *pump,
                _ => continue,
            };
            // Raw state reports may deliberately name bad pumps; repairs may not.
            if signal.repaired_pump().is_some() && pump.slot() >= pump_count {
                return Err(ValidationError::UnknownPump {
                    cycle,
                    pump: pump.index(),
                    pump_count,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::CycleDef;
    use sb_controller::BoilerConfig;
    use sb_core::PumpId;

    fn scenario() -> Scenario {
        Scenario {
            version: 1,
            name: "validate".to_string(),
            boiler: BoilerConfig::new(1000.0, (400.0, 600.0), (100.0, 800.0), 25.0, vec![5.0])
                .unwrap(),
            cycles: vec![CycleDef {
                level: Some(500.0),
                steam: Some(0.0),
                pumps: vec![false],
                pump_controllers: vec![false],
                signals: vec![],
                expect_mode: None,
            }],
        }
    }

    #[test]
    fn accepts_minimal_scenario() {
        assert!(validate_scenario(&scenario()).is_ok());
    }

    #[test]
    fn rejects_future_version() {
        let mut s = scenario();
        s.version = 9;
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::UnsupportedVersion { version: 9 })
        ));
    }

    #[test]
    fn rejects_bad_boiler() {
        let mut s = scenario();
        s.boiler.max_limit = 2000.0;
        assert!(matches!(validate_scenario(&s), Err(ValidationError::Boiler(_))));
    }

    #[test]
    fn rejects_repair_of_unknown_pump() {
        let mut s = scenario();
        s.cycles[0].signals.push(Inbound::PumpRepaired {
            pump: PumpId::from_index(3),
        });
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::UnknownPump {
                cycle: 0,
                pump: 3,
                pump_count: 1
            })
        ));
    }

    #[test]
    fn allows_malformed_reports() {
        let mut s = scenario();
        s.cycles[0].pumps.push(true);
        s.cycles[0].signals.push(Inbound::PumpState {
            pump: PumpId::from_index(7),
            open: true,
        });
        assert!(validate_scenario(&s).is_ok());
    }
}
