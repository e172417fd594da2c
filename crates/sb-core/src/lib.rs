//! sb-core: stable foundation for the steam boiler controller.
//!
//! Contains:
//! - numeric (Real + float helpers)
//! - ids (compact pump identifiers)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use numeric::*;
