//! Controller operating modes and the allowed transitions between them.

use core::fmt;

use sb_mailbox::OperatingMode;

/// Operating mode of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Waiting for the boiler to signal it is ready to start.
    Waiting,
    /// Bringing the water level into the normal band before start-up.
    Ready,
    /// All units working.
    Normal,
    /// Regulating despite a steam sensor, pump or pump controller failure.
    Degraded,
    /// Regulating from an estimated level while the level sensor is untrusted.
    Rescue,
    /// Terminal: safety can no longer be guaranteed.
    EmergencyStop,
}

impl Mode {
    /// Mode as announced to the physical units.
    pub fn announced(self) -> OperatingMode {
        match self {
            Mode::Waiting | Mode::Ready => OperatingMode::Initialisation,
            Mode::Normal => OperatingMode::Normal,
            Mode::Degraded => OperatingMode::Degraded,
            Mode::Rescue => OperatingMode::Rescue,
            Mode::EmergencyStop => OperatingMode::EmergencyStop,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Mode::EmergencyStop
    }

    /// Whether `next` is a permitted successor of `self`.
    ///
    /// Every non-terminal mode may fall into `EmergencyStop`; nothing leaves it.
    pub fn can_transition_to(self, next: Mode) -> bool {
        if self.is_terminal() {
            return false;
        }
        matches!(
            (self, next),
            (_, Mode::EmergencyStop)
                | (Mode::Waiting, Mode::Ready)
                | (Mode::Ready, Mode::Normal)
                | (Mode::Normal, Mode::Degraded | Mode::Rescue)
                | (Mode::Degraded, Mode::Normal | Mode::Rescue)
                | (Mode::Rescue, Mode::Normal | Mode::Degraded)
        )
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Waiting => "WAITING",
            Mode::Ready => "READY",
            Mode::Normal => "NORMAL",
            Mode::Degraded => "DEGRADED",
            Mode::Rescue => "RESCUE",
            Mode::EmergencyStop => "EMERGENCY_STOP",
        };
        f.write_str(name)
    }
}
