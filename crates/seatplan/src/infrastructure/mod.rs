//! Infrastructure layer for the seating planner.
//!
//! Contains the adapters that touch the outside world: the configuration file,
//! the CSV roster file and the operator prompt on the terminal.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `seatplan_core`, but MUST NOT be imported by the `application` or domain
//! layers.

pub mod prompt;
pub mod roster_file;
pub mod storage;
