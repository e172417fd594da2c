//! Message kinds exchanged with the physical units.

use core::fmt;

use sb_core::{PumpId, Real};
use serde::{Deserialize, Serialize};

/// Operating mode as announced to the physical units.
///
/// The plant protocol knows five modes; both controller start-up states
/// announce themselves as `Initialisation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatingMode {
    Initialisation,
    Normal,
    Degraded,
    Rescue,
    EmergencyStop,
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperatingMode::Initialisation => "INITIALISATION",
            OperatingMode::Normal => "NORMAL",
            OperatingMode::Degraded => "DEGRADED",
            OperatingMode::Rescue => "RESCUE",
            OperatingMode::EmergencyStop => "EMERGENCY_STOP",
        };
        f.write_str(name)
    }
}

/// Message sent by the physical units to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Inbound {
    /// Water level reading (litres).
    Level { value: Real },
    /// Steam output reading (litres/second).
    Steam { value: Real },
    /// Whether pump `pump` is currently open.
    PumpState { pump: PumpId, open: bool },
    /// Whether the controller of pump `pump` observes water flowing.
    PumpControlState { pump: PumpId, flowing: bool },
    SteamBoilerWaiting,
    PhysicalUnitsReady,
    LevelRepaired,
    SteamRepaired,
    PumpRepaired { pump: PumpId },
    PumpControlRepaired { pump: PumpId },
}

/// Discriminant of an [`Inbound`] message, used to query a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InboundKind {
    Level,
    Steam,
    PumpState,
    PumpControlState,
    SteamBoilerWaiting,
    PhysicalUnitsReady,
    LevelRepaired,
    SteamRepaired,
    PumpRepaired,
    PumpControlRepaired,
}

impl Inbound {
    pub fn kind(&self) -> InboundKind {
        match self {
            Inbound::Level { .. } => InboundKind::Level,
            Inbound::Steam { .. } => InboundKind::Steam,
            Inbound::PumpState { .. } => InboundKind::PumpState,
            Inbound::PumpControlState { .. } => InboundKind::PumpControlState,
            Inbound::SteamBoilerWaiting => InboundKind::SteamBoilerWaiting,
            Inbound::PhysicalUnitsReady => InboundKind::PhysicalUnitsReady,
            Inbound::LevelRepaired => InboundKind::LevelRepaired,
            Inbound::SteamRepaired => InboundKind::SteamRepaired,
            Inbound::PumpRepaired { .. } => InboundKind::PumpRepaired,
            Inbound::PumpControlRepaired { .. } => InboundKind::PumpControlRepaired,
        }
    }

    /// Scalar payload of a reading message.
    pub fn reading(&self) -> Option<Real> {
        match self {
            Inbound::Level { value } | Inbound::Steam { value } => Some(*value),
            _ => None,
        }
    }

    /// Pump index and boolean payload of a per-pump report.
    pub fn pump_report(&self) -> Option<(PumpId, bool)> {
        match self {
            Inbound::PumpState { pump, open } => Some((*pump, *open)),
            Inbound::PumpControlState { pump, flowing } => Some((*pump, *flowing)),
            _ => None,
        }
    }

    /// Pump index carried by a repair notice.
    pub fn repaired_pump(&self) -> Option<PumpId> {
        match self {
            Inbound::PumpRepaired { pump } | Inbound::PumpControlRepaired { pump } => Some(*pump),
            _ => None,
        }
    }
}

impl fmt::Display for InboundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InboundKind::Level => "LEVEL",
            InboundKind::Steam => "STEAM",
            InboundKind::PumpState => "PUMP_STATE",
            InboundKind::PumpControlState => "PUMP_CONTROL_STATE",
            InboundKind::SteamBoilerWaiting => "STEAM_BOILER_WAITING",
            InboundKind::PhysicalUnitsReady => "PHYSICAL_UNITS_READY",
            InboundKind::LevelRepaired => "LEVEL_REPAIRED",
            InboundKind::SteamRepaired => "STEAM_REPAIRED",
            InboundKind::PumpRepaired => "PUMP_REPAIRED",
            InboundKind::PumpControlRepaired => "PUMP_CONTROL_REPAIRED",
        };
        f.write_str(name)
    }
}

/// Message sent by the controller to the physical units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outbound {
    Mode { mode: OperatingMode },
    ProgramReady,
    /// Toggle the evacuation valve.
    Valve,
    OpenPump { pump: PumpId },
    ClosePump { pump: PumpId },
    LevelFailureDetection,
    SteamFailureDetection,
    PumpFailureDetection { pump: PumpId },
    PumpControlFailureDetection { pump: PumpId },
    LevelRepairedAcknowledgement,
    SteamRepairedAcknowledgement,
    PumpRepairedAcknowledgement { pump: PumpId },
    PumpControlRepairedAcknowledgement { pump: PumpId },
}

impl Outbound {
    /// Whether this message is an open/close command for a pump.
    pub fn is_pump_command(&self) -> bool {
        matches!(self, Outbound::OpenPump { .. } | Outbound::ClosePump { .. })
    }

    /// The announced mode, if this is a mode announcement.
    pub fn announced_mode(&self) -> Option<OperatingMode> {
        match self {
            Outbound::Mode { mode } => Some(*mode),
            _ => None,
        }
    }
}

impl fmt::Display for Outbound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outbound::Mode { mode } => write!(f, "MODE({mode})"),
            Outbound::ProgramReady => f.write_str("PROGRAM_READY"),
            Outbound::Valve => f.write_str("VALVE"),
            Outbound::OpenPump { pump } => write!(f, "OPEN_PUMP({pump})"),
            Outbound::ClosePump { pump } => write!(f, "CLOSE_PUMP({pump})"),
            Outbound::LevelFailureDetection => f.write_str("LEVEL_FAILURE_DETECTION"),
            Outbound::SteamFailureDetection => f.write_str("STEAM_FAILURE_DETECTION"),
            Outbound::PumpFailureDetection { pump } => {
                write!(f, "PUMP_FAILURE_DETECTION({pump})")
            }
            Outbound::PumpControlFailureDetection { pump } => {
                write!(f, "PUMP_CONTROL_FAILURE_DETECTION({pump})")
            }
            Outbound::LevelRepairedAcknowledgement => {
                f.write_str("LEVEL_REPAIRED_ACKNOWLEDGEMENT")
            }
            Outbound::SteamRepairedAcknowledgement => {
                f.write_str("STEAM_REPAIRED_ACKNOWLEDGEMENT")
            }
            Outbound::PumpRepairedAcknowledgement { pump } => {
                write!(f, "PUMP_REPAIRED_ACKNOWLEDGEMENT({pump})")
            }
            Outbound::PumpControlRepairedAcknowledgement { pump } => {
                write!(f, "PUMP_CONTROL_REPAIRED_ACKNOWLEDGEMENT({pump})")
            }
        }
    }
}
