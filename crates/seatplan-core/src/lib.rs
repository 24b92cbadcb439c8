//! # seatplan-core
//!
//! Domain entities and the seat-allocation engine for exam hall seating plans.
//!
//! The crate has no file-system, terminal or process dependencies. Every
//! operation is a synchronous, deterministic computation over plain values, so
//! the whole engine can be unit-tested without any harness.
//!
//! # Architecture overview
//!
//! An exam office seats students from several class groups into one or more
//! halls. Each hall is a grid of desks and each desk has a fixed number of
//! seats. Two students of the same class must never sit side by side on one
//! desk.
//!
//! - **`domain`** – The data model: students, class groups (the roster), halls
//!   and desks, and the two stores that keep "seated" and "available" pools
//!   disjoint.
//!
//! - **`placement`** – The allocation engine. Ordinary fill seats one class
//!   into a hall column by column; middle-seat fill re-lays a three-seat hall
//!   with two classes in a side/middle/side pattern.
//!
//! - **`seat_move`** – Manual corrections: swapping the occupants of two seats.
//!
//! - **`import`** / **`export`** – The narrow data contracts with the
//!   spreadsheet importer and the printable-plan exporter.
//!
//! - **`invariants`** – Checks for the partition and adjacency rules, used by
//!   tests and debug assertions.

pub mod domain;
pub mod export;
pub mod import;
pub mod invariants;
pub mod placement;
pub mod seat_move;

// Re-export the most-used types at the crate root so callers can write
// `seatplan_core::Hall` instead of `seatplan_core::domain::hall::Hall`.
pub use domain::hall::{Desk, DeskId, Hall, HallConfig, HallError, HallId, SeatRef};
pub use domain::hall_store::{HallStore, ReturnReport};
pub use domain::roster::{ClassColor, ClassGroup, Roster, RosterError};
pub use domain::student::{compare_register_numbers, Student};
pub use export::{hall_sheet, ColumnTable, HallSheet, HallSummary};
pub use import::{import_roster, ImportError};
pub use placement::fill::{place_class, FillResult, PlacementOutcome};
pub use placement::middle_seat::{resolve_middle_seat, MiddleSeatResult, MiddleSide};
pub use placement::PlacementError;
pub use seat_move::{move_seat, SwapOutcome};
