//! Decision core of the steam boiler controller.
//!
//! Once per control cycle the controller consumes the batch of reports sent
//! by the physical units, decides which of six operating modes the boiler is
//! in, and answers with pump commands, valve commands, failure diagnostics,
//! repair acknowledgements and a mode announcement.
//!
//! # Architecture
//!
//! - [`config`]: immutable boiler characteristics
//! - [`detect`]: pure failure predicates and the [`Fault`] taxonomy
//! - [`estimator`]: one-cycle-ahead pump demand search
//! - [`pumps`]: the controller's record of commanded pump states
//! - [`output`]: translation of decisions into outbound messages
//! - [`controller`]: the mode state machine owning [`ControllerState`]
//!
//! The controller is single-threaded and synchronous: every call to
//! [`SteamBoilerController::clock`] runs one complete cycle.

pub mod config;
pub mod controller;
pub mod detect;
pub mod error;
pub mod estimator;
pub mod mode;
pub mod output;
pub mod pumps;
pub mod state;

pub use config::BoilerConfig;
pub use controller::SteamBoilerController;
pub use detect::Fault;
pub use error::{ControllerError, ControllerResult};
pub use estimator::{LevelInterval, PumpDemand, estimate, predict_level};
pub use mode::Mode;
pub use output::CycleOutput;
pub use pumps::PumpBank;
pub use state::ControllerState;
