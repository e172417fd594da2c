//! Transmission failure taxonomy.

use crate::message::InboundKind;
use sb_core::{PumpId, Real};
use thiserror::Error;

/// Why a single-valued reading could not be extracted from a batch.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ReadingFault {
    #[error("no {kind} message")]
    Missing { kind: InboundKind },

    #[error("{count} conflicting {kind} messages")]
    Duplicate { kind: InboundKind, count: usize },
}

/// A cycle whose inbound batch cannot be trusted as a whole.
///
/// Every variant is fatal for the cycle: the controller stops the boiler.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransmissionFailure {
    #[error("Missing reading: {kind}")]
    Missing { kind: InboundKind },

    #[error("Duplicate reading: {count} {kind} messages")]
    Duplicate { kind: InboundKind, count: usize },

    #[error("Non-finite reading: {kind} = {value}")]
    NonFinite { kind: InboundKind, value: Real },

    #[error("Report count mismatch: expected {expected} {kind} messages, found {found}")]
    CountMismatch {
        kind: InboundKind,
        expected: usize,
        found: usize,
    },

    #[error("Bad pump index in {kind} report: pump {pump} is unknown or reported twice")]
    BadPumpIndex { kind: InboundKind, pump: PumpId },
}

impl From<ReadingFault> for TransmissionFailure {
    fn from(fault: ReadingFault) -> Self {
        match fault {
            ReadingFault::Missing { kind } => Self::Missing { kind },
            ReadingFault::Duplicate { kind, count } => Self::Duplicate { kind, count },
        }
    }
}
