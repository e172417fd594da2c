//! Output emitter.
//!
//! Translates controller decisions into the outbound batch. Messages are
//! appended in decision order; [`CycleOutput::announce`] is called once, last.

use crate::detect::Fault;
use sb_core::PumpId;
use sb_mailbox::{Mailbox, OperatingMode, Outbound};

/// Outbound batch under construction for one cycle.
pub struct CycleOutput<'a> {
    mailbox: &'a mut Mailbox<Outbound>,
}

impl<'a> CycleOutput<'a> {
    pub fn new(mailbox: &'a mut Mailbox<Outbound>) -> Self {
        Self { mailbox }
    }

    /// Command one pump open or closed.
    pub fn pump(&mut self, pump: PumpId, open: bool) {
        let message = if open {
            Outbound::OpenPump { pump }
        } else {
            Outbound::ClosePump { pump }
        };
        self.mailbox.send(message);
    }

    pub fn toggle_valve(&mut self) {
        self.mailbox.send(Outbound::Valve);
    }

    pub fn program_ready(&mut self) {
        self.mailbox.send(Outbound::ProgramReady);
    }

    /// Report a detected fault. Faults without a plant diagnostic are not sent.
    pub fn detected(&mut self, fault: Fault) {
        let message = match fault {
            Fault::LevelSensor => Outbound::LevelFailureDetection,
            Fault::SteamSensor => Outbound::SteamFailureDetection,
            Fault::Pump(pump) => Outbound::PumpFailureDetection { pump },
            Fault::PumpController(pump) => Outbound::PumpControlFailureDetection { pump },
            Fault::Transmission | Fault::LimitBreach => return,
        };
        self.mailbox.send(message);
    }

    /// Acknowledge the repair of a previously detected fault.
    pub fn acknowledged(&mut self, fault: Fault) {
        let message = match fault {
            Fault::LevelSensor => Outbound::LevelRepairedAcknowledgement,
            Fault::SteamSensor => Outbound::SteamRepairedAcknowledgement,
            Fault::Pump(pump) => Outbound::PumpRepairedAcknowledgement { pump },
            Fault::PumpController(pump) => Outbound::PumpControlRepairedAcknowledgement { pump },
            Fault::Transmission | Fault::LimitBreach => return,
        };
        self.mailbox.send(message);
    }

    /// Append the mode announcement closing the cycle.
    pub fn announce(&mut self, mode: OperatingMode) {
        self.mailbox.send(Outbound::Mode { mode });
    }
}
