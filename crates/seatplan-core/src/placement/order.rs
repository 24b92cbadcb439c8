//! Traversal orders shared by both fill strategies.

use crate::domain::hall::{DeskId, Hall};

/// Order in which seat indices of a desk are visited.
///
/// Three-seat desks fill both ends before the middle (`[0, 2, 1]`), so the
/// middle seat is the last to be taken. Every other capacity is visited left
/// to right.
pub fn seat_fill_order(capacity: usize) -> Vec<usize> {
    if capacity == 3 {
        vec![0, 2, 1]
    } else {
        (0..capacity).collect()
    }
}

/// Desk ids grouped by physical column (left to right), each column ordered
/// front row first.
pub fn columns(hall: &Hall) -> Vec<Vec<DeskId>> {
    let mut ids: Vec<DeskId> = hall.desks().iter().map(|d| d.id).collect();
    ids.sort_by_key(|id| (id.col, id.row));

    (1..=hall.cols)
        .map(|col| ids.iter().copied().filter(|id| id.col == col).collect())
        .collect()
}
