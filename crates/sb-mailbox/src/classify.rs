//! Message classifier and transmission-failure gate.
//!
//! Extraction never has side effects. A batch passes the gate only if it
//! carries exactly one finite level reading, exactly one finite steam
//! reading, and exactly one state report and one control-state report per
//! pump. The resulting [`CycleSnapshot`] is therefore fully populated: the
//! mode logic never sees a missing reading.

use crate::error::{ReadingFault, TransmissionFailure};
use crate::message::{Inbound, InboundKind};
use sb_core::{PumpId, Real, ensure_finite};

/// Find the unique message of `kind` in `batch`.
///
/// Zero matches and more than one match are both failures, reported
/// separately so callers can tell a lost message from a conflicting one.
pub fn extract_only_match(batch: &[Inbound], kind: InboundKind) -> Result<&Inbound, ReadingFault> {
    let mut matches = batch.iter().filter(|m| m.kind() == kind);
    let first = matches.next().ok_or(ReadingFault::Missing { kind })?;
    let extra = matches.count();
    if extra > 0 {
        return Err(ReadingFault::Duplicate {
            kind,
            count: extra + 1,
        });
    }
    Ok(first)
}

/// All messages of `kind` in `batch`, in arrival order.
pub fn extract_all_matches(batch: &[Inbound], kind: InboundKind) -> Vec<&Inbound> {
    batch.iter().filter(|m| m.kind() == kind).collect()
}

/// Typed view of one cycle's inbound batch.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleSnapshot {
    /// Water level reading (litres).
    pub level: Real,
    /// Steam output reading (litres/second).
    pub steam: Real,
    /// Reported open/closed state, indexed by pump.
    pub pump_states: Vec<bool>,
    /// Reported flow seen by each pump controller, indexed by pump.
    pub pump_control_states: Vec<bool>,
    /// `STEAM_BOILER_WAITING` observed.
    pub waiting: bool,
    /// `PHYSICAL_UNITS_READY` observed.
    pub physical_units_ready: bool,
    /// `LEVEL_REPAIRED` observed.
    pub level_repaired: bool,
    /// `STEAM_REPAIRED` observed.
    pub steam_repaired: bool,
    /// Pumps named by `PUMP_REPAIRED` notices.
    pub pumps_repaired: Vec<PumpId>,
    /// Pumps named by `PUMP_CONTROL_REPAIRED` notices.
    pub pump_controls_repaired: Vec<PumpId>,
}

impl CycleSnapshot {
    /// Run the transmission-failure gate over `batch` for a boiler with
    /// `pump_count` pumps.
    ///
    /// # Errors
    ///
    /// Returns the first [`TransmissionFailure`] found, checking the level
    /// reading, the steam reading, the pump state reports and the pump
    /// control state reports in that order.
    pub fn classify(batch: &[Inbound], pump_count: usize) -> Result<Self, TransmissionFailure> {
        let level = reading(batch, InboundKind::Level)?;
        let steam = reading(batch, InboundKind::Steam)?;
        let pump_states = pump_reports(batch, InboundKind::PumpState, pump_count)?;
        let pump_control_states = pump_reports(batch, InboundKind::PumpControlState, pump_count)?;

        let observed = |kind: InboundKind| batch.iter().any(|m| m.kind() == kind);
        let repaired = |kind: InboundKind| -> Vec<PumpId> {
            extract_all_matches(batch, kind)
                .into_iter()
                .filter_map(Inbound::repaired_pump)
                .collect()
        };

        Ok(Self {
            level,
            steam,
            pump_states,
            pump_control_states,
            waiting: observed(InboundKind::SteamBoilerWaiting),
            physical_units_ready: observed(InboundKind::PhysicalUnitsReady),
            level_repaired: observed(InboundKind::LevelRepaired),
            steam_repaired: observed(InboundKind::SteamRepaired),
            pumps_repaired: repaired(InboundKind::PumpRepaired),
            pump_controls_repaired: repaired(InboundKind::PumpControlRepaired),
        })
    }

    pub fn pump_count(&self) -> usize {
        self.pump_states.len()
    }

    pub fn pump_repaired(&self, pump: PumpId) -> bool {
        self.pumps_repaired.contains(&pump)
    }

    pub fn pump_control_repaired(&self, pump: PumpId) -> bool {
        self.pump_controls_repaired.contains(&pump)
    }
}

fn reading(batch: &[Inbound], kind: InboundKind) -> Result<Real, TransmissionFailure> {
    let message = extract_only_match(batch, kind)?;
    let value = message
        .reading()
        .ok_or(TransmissionFailure::Missing { kind })?;
    ensure_finite(value, "reading").map_err(|_| TransmissionFailure::NonFinite { kind, value })
}

fn pump_reports(
    batch: &[Inbound],
    kind: InboundKind,
    pump_count: usize,
) -> Result<Vec<bool>, TransmissionFailure> {
    let reports = extract_all_matches(batch, kind);
    if reports.len() != pump_count {
        return Err(TransmissionFailure::CountMismatch {
            kind,
            expected: pump_count,
            found: reports.len(),
        });
    }

    let mut slots: Vec<Option<bool>> = vec![None; pump_count];
    for (pump, value) in reports.into_iter().filter_map(Inbound::pump_report) {
        match slots.get_mut(pump.slot()) {
            Some(slot) if slot.is_none() => *slot = Some(value),
            _ => return Err(TransmissionFailure::BadPumpIndex { kind, pump }),
        }
    }

    // Count matched and no slot was filled twice, so every slot is set.
    Ok(slots.into_iter().flatten().collect())
}
