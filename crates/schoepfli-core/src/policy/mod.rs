//! Pure gate policies for the alarm broadcast.
//!
//! Both gates are plain functions over their inputs; the coordinator
//! supplies the measured position, the clock, and the configuration. The
//! formatted failure descriptions feed the user-facing error messages
//! only, never the decisions.

pub mod cooldown;
pub mod proximity;

pub use cooldown::CooldownCheck;
pub use proximity::ProximityCheck;
