//! Pump bookkeeping.
//!
//! [`PumpBank`] is the controller's record of which pumps it last commanded
//! open. The failure detectors compare the plant's reports against it on the
//! next cycle, so the record and the emitted commands are always updated
//! together.

use crate::config::BoilerConfig;
use crate::output::CycleOutput;
use sb_core::{PumpId, Real};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PumpBank {
    commanded: Vec<bool>,
}

impl PumpBank {
    /// All pumps believed closed.
    pub fn new(pump_count: usize) -> Self {
        Self {
            commanded: vec![false; pump_count],
        }
    }

    /// Commanded state per pump (`true` = open).
    pub fn commanded(&self) -> &[bool] {
        &self.commanded
    }

    /// Open `demand` pumps in index order and close the rest, never opening
    /// `broken`. Exactly one command is emitted per pump.
    ///
    /// Returns the number of pumps actually opened, which is below `demand`
    /// when the broken pump leaves too few in service.
    pub fn command(&mut self, demand: usize, broken: Option<PumpId>, out: &mut CycleOutput<'_>) -> usize {
        let mut opened = 0;
        for (index, slot) in (0_u32..).zip(self.commanded.iter_mut()) {
            let pump = PumpId::from_index(index);
            let open = Some(pump) != broken && opened < demand;
            if open {
                opened += 1;
            }
            *slot = open;
            out.pump(pump, open);
        }
        opened
    }

    /// Close every pump.
    pub fn stop_all(&mut self, out: &mut CycleOutput<'_>) {
        self.command(0, None, out);
    }

    /// Total inflow of the pumps currently commanded open.
    pub fn inflow(&self, config: &BoilerConfig) -> Real {
        self.commanded
            .iter()
            .zip(&config.pump_capacities)
            .filter(|(open, _)| **open)
            .map(|(_, capacity)| capacity)
            .sum()
    }
}
