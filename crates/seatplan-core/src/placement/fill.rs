//! Ordinary fill: seats a list of candidates into a hall's empty slots while
//! keeping same-class students off neighbouring seats of one desk.
//!
//! # Algorithm
//!
//! 1. Candidates are sorted by register number (numeric-aware). The sorted
//!    order is the allocation priority.
//! 2. Physical columns are visited left to right. Inside a column, each seat
//!    index is swept front to back across all desks of that column before the
//!    next seat index is started (see [`order::seat_fill_order`]).
//! 3. At each empty slot the head of the queue is tried. If the seat directly
//!    left or right on the same desk holds a student of the same class, the
//!    slot is skipped and the same candidate is retried at the next slot.
//!    Otherwise the candidate is seated and removed from the queue.
//! 4. The sweep ends when every slot was visited or the queue is empty.
//!
//! The candidate at the head of the queue blocks everyone behind it, so a
//! single conflicting student can leave later, non-conflicting students
//! unplaced. That is the intended priority rule.

use std::collections::VecDeque;

use tracing::{debug, trace};

use super::order::{columns, seat_fill_order};
use super::PlacementError;
use crate::domain::hall::Hall;
use crate::domain::student::{sort_by_register_number, Student};

/// How an ordinary fill went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// The candidate list was empty; nothing to do.
    NoCandidates,
    /// Every candidate was seated.
    Complete { placed: usize },
    /// Some candidates were seated, the rest are in [`FillResult::remaining`].
    Partial { placed: usize, remaining: usize },
    /// Slots were available but every attempt hit an adjacency conflict.
    ///
    /// Callers must treat this as a no-op: neither the hall nor the class
    /// should change.
    ZeroPlacement { candidates: usize },
}

impl PlacementOutcome {
    /// Number of students seated by the fill.
    pub fn placed(&self) -> usize {
        match *self {
            PlacementOutcome::Complete { placed } | PlacementOutcome::Partial { placed, .. } => {
                placed
            }
            PlacementOutcome::NoCandidates | PlacementOutcome::ZeroPlacement { .. } => 0,
        }
    }

    /// `true` when the result should be committed to the stores.
    pub fn changes_state(&self) -> bool {
        self.placed() > 0
    }
}

/// Result of [`place_class`].
#[derive(Debug, Clone, PartialEq)]
pub struct FillResult {
    /// The hall with the new placements applied.
    pub hall: Hall,
    /// Candidates that could not be seated, in allocation (sorted) order.
    pub remaining: Vec<Student>,
    pub outcome: PlacementOutcome,
}

/// Seats `candidates` into the empty slots of `hall`.
///
/// The input hall is not modified; the returned [`FillResult`] carries the
/// updated copy. Running this twice on the same inputs, in any candidate order,
/// produces identical results.
///
/// # Errors
///
/// Returns [`PlacementError::HallFull`] if there are candidates but the hall
/// has no empty seat at all.
pub fn place_class(hall: &Hall, candidates: &[Student]) -> Result<FillResult, PlacementError> {
    if candidates.is_empty() {
        return Ok(FillResult {
            hall: hall.clone(),
            remaining: Vec::new(),
            outcome: PlacementOutcome::NoCandidates,
        });
    }
    if !hall.has_empty_seat() {
        return Err(PlacementError::HallFull(hall.id));
    }

    let mut sorted = candidates.to_vec();
    sort_by_register_number(&mut sorted);
    let mut queue: VecDeque<Student> = sorted.into();
    let total = queue.len();

    let mut updated = hall.clone();
    let seat_order = seat_fill_order(hall.desk_capacity as usize);

    'columns: for column in columns(hall) {
        for &seat_idx in &seat_order {
            for &desk_id in &column {
                let Some(candidate) = queue.front() else {
                    break 'columns;
                };
                let Some(desk) = updated.desk_mut(desk_id) else {
                    continue;
                };
                if desk.seats()[seat_idx].is_some() {
                    continue;
                }
                if desk.has_same_class_neighbor(seat_idx, &candidate.class_name) {
                    trace!(desk = %desk_id, seat = seat_idx, student = %candidate.register_number, "adjacent same-class seat, skipping");
                    continue;
                }
                desk.seats_mut()[seat_idx] = queue.pop_front();
            }
        }
    }

    let remaining: Vec<Student> = queue.into();
    let placed = total - remaining.len();
    let outcome = if placed == 0 {
        PlacementOutcome::ZeroPlacement { candidates: total }
    } else if remaining.is_empty() {
        PlacementOutcome::Complete { placed }
    } else {
        PlacementOutcome::Partial {
            placed,
            remaining: remaining.len(),
        }
    };
    debug!(hall = %hall.id, placed, remaining = remaining.len(), "ordinary fill finished");

    Ok(FillResult {
        hall: updated,
        remaining,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hall::{DeskId, HallConfig};

    fn make_hall(rows: u32, cols: u32, capacity: u32) -> Hall {
        Hall::new(&HallConfig::new("Hall", rows, cols, capacity)).unwrap()
    }

    fn class(name: &str, regs: &[&str]) -> Vec<Student> {
        regs.iter().map(|r| Student::new(*r, name)).collect()
    }

    fn reg_at(hall: &Hall, row: u32, col: u32, seat: usize) -> Option<&str> {
        hall.desk_at(row, col)
            .and_then(|d| d.seat(seat))
            .map(|s| s.register_number.as_str())
    }

    #[test]
    fn test_empty_candidates_is_a_no_op() {
        let hall = make_hall(1, 1, 2);
        let result = place_class(&hall, &[]).unwrap();
        assert_eq!(result.outcome, PlacementOutcome::NoCandidates);
        assert_eq!(result.hall, hall);
        assert!(!result.outcome.changes_state());
    }

    #[test]
    fn test_full_hall_is_rejected() {
        let hall = make_hall(1, 1, 1);
        let filled = place_class(&hall, &class("A", &["A1"])).unwrap().hall;
        assert_eq!(
            place_class(&filled, &class("B", &["B1"])),
            Err(PlacementError::HallFull(hall.id))
        );
    }

    #[test]
    fn test_single_class_two_seat_desks_leaves_second_seats_empty() {
        // Arrange: 2 rows x 1 col, 2 seats per desk.
        let hall = make_hall(2, 1, 2);

        // Act
        let result = place_class(&hall, &class("A", &["A1", "A2", "A3"])).unwrap();

        // Assert
        assert_eq!(reg_at(&result.hall, 1, 1, 0), Some("A1"));
        assert_eq!(reg_at(&result.hall, 2, 1, 0), Some("A2"));
        assert_eq!(reg_at(&result.hall, 1, 1, 1), None);
        assert_eq!(reg_at(&result.hall, 2, 1, 1), None);
        assert_eq!(result.remaining, class("A", &["A3"]));
        assert_eq!(result.outcome, PlacementOutcome::Partial { placed: 2, remaining: 1 });
    }

    #[test]
    fn test_candidates_are_sorted_numerically_before_placement() {
        let hall = make_hall(3, 1, 1);
        let result = place_class(&hall, &class("A", &["R10", "R9", "R2"])).unwrap();
        assert_eq!(reg_at(&result.hall, 1, 1, 0), Some("R2"));
        assert_eq!(reg_at(&result.hall, 2, 1, 0), Some("R9"));
        assert_eq!(reg_at(&result.hall, 3, 1, 0), Some("R10"));
        assert_eq!(result.outcome, PlacementOutcome::Complete { placed: 3 });
    }

    #[test]
    fn test_three_seat_desks_fill_ends_before_middle() {
        let hall = make_hall(2, 1, 3);
        let result = place_class(&hall, &class("A", &["1", "2", "3", "4", "5"])).unwrap();

        // Column sweep: seat 0 front-to-back, then seat 2, then seat 1.
        assert_eq!(reg_at(&result.hall, 1, 1, 0), Some("1"));
        assert_eq!(reg_at(&result.hall, 2, 1, 0), Some("2"));
        assert_eq!(reg_at(&result.hall, 1, 1, 2), Some("3"));
        assert_eq!(reg_at(&result.hall, 2, 1, 2), Some("4"));
        // Middle seats are blocked by same-class ends.
        assert_eq!(reg_at(&result.hall, 1, 1, 1), None);
        assert_eq!(result.remaining, class("A", &["5"]));
    }

    #[test]
    fn test_fill_finishes_a_column_before_the_next() {
        let hall = make_hall(2, 2, 1);
        let result = place_class(&hall, &class("A", &["1", "2", "3"])).unwrap();
        assert_eq!(reg_at(&result.hall, 1, 1, 0), Some("1"));
        assert_eq!(reg_at(&result.hall, 2, 1, 0), Some("2"));
        assert_eq!(reg_at(&result.hall, 1, 2, 0), Some("3"));
        assert_eq!(reg_at(&result.hall, 2, 2, 0), None);
    }

    #[test]
    fn test_second_class_fills_gaps_next_to_first_class() {
        // Arrange
        let hall = make_hall(2, 1, 2);
        let first = place_class(&hall, &class("A", &["A1", "A2"])).unwrap().hall;

        // Act
        let result = place_class(&first, &class("B", &["B1", "B2", "B3"])).unwrap();

        // Assert
        assert_eq!(reg_at(&result.hall, 1, 1, 1), Some("B1"));
        assert_eq!(reg_at(&result.hall, 2, 1, 1), Some("B2"));
        assert_eq!(result.remaining, class("B", &["B3"]));
        assert_eq!(result.hall.seated_count(), 4);
    }

    #[test]
    fn test_fully_blocked_fill_reports_zero_placement() {
        let hall = make_hall(1, 1, 2);
        let first = place_class(&hall, &class("A", &["A1"])).unwrap().hall;

        let result = place_class(&first, &class("A", &["A2"])).unwrap();

        assert_eq!(result.outcome, PlacementOutcome::ZeroPlacement { candidates: 1 });
        assert_eq!(result.hall, first);
        assert_eq!(result.remaining, class("A", &["A2"]));
        assert!(!result.outcome.changes_state());
    }

    #[test]
    fn test_blocked_head_candidate_holds_back_the_queue() {
        // A lone A-student sits in seat 0. Candidates are sorted so the A-student
        // comes first and blocks the B-student behind it at seat 1.
        let hall = make_hall(1, 1, 2);
        let first = place_class(&hall, &class("A", &["A1"])).unwrap().hall;
        let mixed = vec![Student::new("1", "A"), Student::new("2", "B")];

        let result = place_class(&first, &mixed).unwrap();

        assert_eq!(result.outcome, PlacementOutcome::ZeroPlacement { candidates: 2 });
    }

    #[test]
    fn test_input_hall_is_not_modified() {
        let hall = make_hall(1, 1, 2);
        let before = hall.clone();
        let _ = place_class(&hall, &class("A", &["A1"])).unwrap();
        assert_eq!(hall, before);
        assert!(hall.desk(DeskId::new(1, 1)).unwrap().is_empty());
    }
}
