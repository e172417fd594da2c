//! Message channel between the boiler controller and the physical units.
//!
//! Once per control cycle the physical units deliver a batch of status
//! reports and the controller answers with a batch of commands and
//! diagnostics. This crate provides:
//!
//! - **Messages**: typed [`Inbound`] and [`Outbound`] message kinds
//! - **Mailbox**: the ordered batch exchanged each cycle
//! - **Classifier**: extraction of typed readings from an inbound batch, and
//!   the transmission-failure gate that turns a batch into a [`CycleSnapshot`]

pub mod classify;
pub mod error;
pub mod mailbox;
pub mod message;

pub use classify::{CycleSnapshot, extract_all_matches, extract_only_match};
pub use error::{ReadingFault, TransmissionFailure};
pub use mailbox::Mailbox;
pub use message::{Inbound, InboundKind, OperatingMode, Outbound};
