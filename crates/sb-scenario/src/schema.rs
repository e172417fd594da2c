//! Scenario file format.

use sb_controller::BoilerConfig;
use sb_core::{PumpId, Real};
use sb_mailbox::{Inbound, Mailbox, OperatingMode};
use serde::{Deserialize, Serialize};

/// Current scenario format version.
pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    pub boiler: BoilerConfig,
    pub cycles: Vec<CycleDef>,
}

/// One recorded cycle of plant reports.
///
/// Omitting `level` or `steam` models a lost message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Real>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steam: Option<Real>,
    /// Reported open state per pump, in pump order.
    #[serde(default)]
    pub pumps: Vec<bool>,
    /// Reported flow per pump controller, in pump order.
    #[serde(default)]
    pub pump_controllers: Vec<bool>,
    /// Discrete signals and any extra raw messages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signals: Vec<Inbound>,
    /// Mode the controller is expected to announce at the end of the cycle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect_mode: Option<OperatingMode>,
}

impl CycleDef {
    /// Build the inbound batch the plant would send for this cycle.
    pub fn to_mailbox(&self) -> Mailbox<Inbound> {
        let mut mailbox = Mailbox::new();
        if let Some(value) = self.level {
            mailbox.send(Inbound::Level { value });
        }
        if let Some(value) = self.steam {
            mailbox.send(Inbound::Steam { value });
        }
        for (index, open) in (0_u32..).zip(&self.pumps) {
            mailbox.send(Inbound::PumpState {
                pump: PumpId::from_index(index),
                open: *open,
            });
        }
        for (index, flowing) in (0_u32..).zip(&self.pump_controllers) {
            mailbox.send(Inbound::PumpControlState {
                pump: PumpId::from_index(index),
                flowing: *flowing,
            });
        }
        for signal in &self.signals {
            mailbox.send(*signal);
        }
        mailbox
    }
}
