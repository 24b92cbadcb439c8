//! The seat-allocation engine.
//!
//! Both fill strategies are pure functions: they take a hall snapshot and a
//! list of candidate students and return a new hall plus whatever could not be
//! seated. Nothing is written back to any store here; the caller decides
//! whether to commit the result.
//!
//! # Traversal order
//!
//! Halls are filled column by column (left to right), and within a column
//! from the front row to the back. See [`order`] for the exact rules.

use thiserror::Error;

use crate::domain::hall::HallId;

pub mod fill;
pub mod middle_seat;
pub mod order;

/// Preconditions of a placement that were not met.
///
/// Advisory results such as "nothing could be placed" are not errors; they are
/// reported through [`fill::PlacementOutcome`].
#[derive(Debug, Error, PartialEq)]
pub enum PlacementError {
    /// Every seat of the hall is already taken.
    #[error("hall {0} has no empty seat")]
    HallFull(HallId),

    /// Middle-seat fill only applies to three-seat desks.
    #[error("hall {hall} has {capacity}-seat desks; middle-seat fill needs 3")]
    NotThreeSeat { hall: HallId, capacity: u32 },

    /// The hall holds students of a class other than the one being re-laid.
    #[error("hall {hall} also seats class {class}; middle-seat fill expects a single class")]
    MixedOccupancy { hall: HallId, class: String },
}
