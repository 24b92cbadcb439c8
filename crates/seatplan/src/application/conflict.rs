//! Conflict detection for class→hall drops.
//!
//! A drop is a *middle-seat conflict* when the target hall has three-seat
//! desks and is already occupied by exactly one other class. Two classes in a
//! three-seat desk can only be separated by putting one of them in the middle
//! seat, and which one is an operator decision, so the drop cannot proceed
//! until it is made.
//!
//! Every other drop goes straight to ordinary fill.

use seatplan_core::Hall;

/// How a class→hall drop must be handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropKind {
    /// Run ordinary fill right away.
    Ordinary,
    /// Ask the operator which class takes the middle seats.
    MiddleSeatConflict {
        /// The class already seated in the hall.
        existing_class: String,
    },
}

/// Classifies dropping `class_name` onto `hall`.
pub fn classify_drop(hall: &Hall, class_name: &str) -> DropKind {
    if hall.desk_capacity != 3 {
        return DropKind::Ordinary;
    }
    let present = hall.distinct_classes();
    if present.len() != 1 {
        return DropKind::Ordinary;
    }
    match present.into_iter().next() {
        Some(existing) if existing != class_name => DropKind::MiddleSeatConflict {
            existing_class: existing,
        },
        _ => DropKind::Ordinary,
    }
}
