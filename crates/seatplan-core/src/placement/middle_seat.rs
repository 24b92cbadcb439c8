//! Middle-seat fill: re-lays a three-seat hall with two classes in a
//! side / middle / side pattern.
//!
//! Used when a hall of three-seat desks is occupied by exactly one class (the
//! *existing* class) and a second class (the *incoming* class) is dropped on
//! it. The operator chooses which of the two takes the middle seats; the other
//! takes both ends. The engine never infers this choice.
//!
//! # Algorithm
//!
//! 1. Take every existing-class student out of the hall and sort them; sort
//!    the incoming candidates.
//! 2. One list feeds the side queue (seats 0 and 2), the other the middle
//!    queue (seat 1).
//! 3. Empty every desk. This is a full re-layout, not an incremental edit.
//! 4. For each physical column: sweep seat 0 front to back from the side
//!    queue, then seat 2 from the side queue, then seat 1 from the middle
//!    queue. Each sweep stops on its own when its queue runs dry.
//!
//! Incoming students left over go back to their class. Existing students left
//! over (more of them than the seats their role allows) are not returned to
//! any pool; they are reported in [`MiddleSeatResult::dropped_overflow`].

use std::collections::VecDeque;

use tracing::debug;

use super::order::columns;
use super::PlacementError;
use crate::domain::hall::{DeskId, Hall};
use crate::domain::student::{sort_by_register_number, Student};

const SIDE_SEATS: [usize; 2] = [0, 2];
const MIDDLE_SEAT: usize = 1;

/// Which class the operator put in the middle seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiddleSide {
    /// The class already seated in the hall takes the middle seats.
    Existing,
    /// The class being dropped on the hall takes the middle seats.
    Incoming,
}

/// Result of [`resolve_middle_seat`].
#[derive(Debug, Clone, PartialEq)]
pub struct MiddleSeatResult {
    /// The re-laid hall.
    pub hall: Hall,
    /// Incoming students that did not fit; they belong back in their class.
    pub remaining_incoming: Vec<Student>,
    /// Existing-class students that did not fit. They are not returned to
    /// their class.
    pub dropped_overflow: Vec<Student>,
    /// Existing-class students seated by the re-layout.
    pub placed_existing: usize,
    /// Incoming students seated by the re-layout.
    pub placed_incoming: usize,
}

/// Re-lays `hall` with its current (single-class) occupants and `incoming`.
///
/// `existing_class` names the class already seated in the hall; every seated
/// student must belong to it.
///
/// # Errors
///
/// Returns [`PlacementError::NotThreeSeat`] unless desks have exactly three
/// seats, and [`PlacementError::MixedOccupancy`] if anyone in the hall belongs
/// to a class other than `existing_class`.
pub fn resolve_middle_seat(
    hall: &Hall,
    existing_class: &str,
    incoming: &[Student],
    middle: MiddleSide,
) -> Result<MiddleSeatResult, PlacementError> {
    if hall.desk_capacity != 3 {
        return Err(PlacementError::NotThreeSeat {
            hall: hall.id,
            capacity: hall.desk_capacity,
        });
    }
    if let Some(other) = hall
        .distinct_classes()
        .into_iter()
        .find(|c| c != existing_class)
    {
        return Err(PlacementError::MixedOccupancy {
            hall: hall.id,
            class: other,
        });
    }

    let mut updated = hall.clone();
    let mut existing = updated.vacate();
    sort_by_register_number(&mut existing);
    let mut arriving = incoming.to_vec();
    sort_by_register_number(&mut arriving);

    let existing_count = existing.len();
    let incoming_count = arriving.len();

    let (mut side, mut centre): (VecDeque<Student>, VecDeque<Student>) = match middle {
        MiddleSide::Existing => (arriving.into(), existing.into()),
        MiddleSide::Incoming => (existing.into(), arriving.into()),
    };

    for column in columns(hall) {
        for seat_idx in SIDE_SEATS {
            fill_sweep(&mut updated, &column, seat_idx, &mut side);
        }
        fill_sweep(&mut updated, &column, MIDDLE_SEAT, &mut centre);
    }

    let (leftover_incoming, leftover_existing): (Vec<Student>, Vec<Student>) = match middle {
        MiddleSide::Existing => (side.into(), centre.into()),
        MiddleSide::Incoming => (centre.into(), side.into()),
    };

    let result = MiddleSeatResult {
        placed_existing: existing_count - leftover_existing.len(),
        placed_incoming: incoming_count - leftover_incoming.len(),
        hall: updated,
        remaining_incoming: leftover_incoming,
        dropped_overflow: leftover_existing,
    };
    debug!(
        hall = %hall.id,
        placed_existing = result.placed_existing,
        placed_incoming = result.placed_incoming,
        remaining_incoming = result.remaining_incoming.len(),
        dropped = result.dropped_overflow.len(),
        "middle-seat fill finished"
    );
    Ok(result)
}

/// Fills seat `seat_idx` of every desk in `column` from `queue`, front to back.
fn fill_sweep(hall: &mut Hall, column: &[DeskId], seat_idx: usize, queue: &mut VecDeque<Student>) {
    for &desk_id in column {
        if queue.is_empty() {
            return;
        }
        if let Some(desk) = hall.desk_mut(desk_id) {
            desk.seats_mut()[seat_idx] = queue.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hall::HallConfig;
    use crate::placement::fill::place_class;

    fn class(name: &str, regs: &[&str]) -> Vec<Student> {
        regs.iter().map(|r| Student::new(*r, name)).collect()
    }

    fn hall_with(rows: u32, cols: u32, capacity: u32, seated: &[Student]) -> Hall {
        let hall = Hall::new(&HallConfig::new("Hall", rows, cols, capacity)).unwrap();
        place_class(&hall, seated).unwrap().hall
    }

    fn regs_at(hall: &Hall, row: u32, col: u32) -> Vec<Option<String>> {
        hall.desk_at(row, col)
            .unwrap()
            .seats()
            .iter()
            .map(|s| s.as_ref().map(|s| s.register_number.clone()))
            .collect()
    }

    fn some(regs: &[&str]) -> Vec<Option<String>> {
        regs.iter()
            .map(|r| if r.is_empty() { None } else { Some(r.to_string()) })
            .collect()
    }

    #[test]
    fn test_incoming_in_middle_fills_exactly() {
        // Arrange: 2x1 hall, 3 seats, four A-students already seated on the ends.
        let hall = hall_with(2, 1, 3, &class("A", &["A1", "A2", "A3", "A4"]));

        // Act
        let result =
            resolve_middle_seat(&hall, "A", &class("B", &["B1", "B2"]), MiddleSide::Incoming)
                .unwrap();

        // Assert
        assert_eq!(regs_at(&result.hall, 1, 1), some(&["A1", "B1", "A3"]));
        assert_eq!(regs_at(&result.hall, 2, 1), some(&["A2", "B2", "A4"]));
        assert!(result.remaining_incoming.is_empty());
        assert!(result.dropped_overflow.is_empty());
        assert_eq!(result.placed_existing, 4);
        assert_eq!(result.placed_incoming, 2);
    }

    #[test]
    fn test_existing_in_middle_puts_incoming_on_ends() {
        let hall = hall_with(2, 1, 3, &class("A", &["A1", "A2"]));

        let result = resolve_middle_seat(
            &hall,
            "A",
            &class("B", &["B4", "B3", "B2", "B1"]),
            MiddleSide::Existing,
        )
        .unwrap();

        assert_eq!(regs_at(&result.hall, 1, 1), some(&["B1", "A1", "B3"]));
        assert_eq!(regs_at(&result.hall, 2, 1), some(&["B2", "A2", "B4"]));
    }

    #[test]
    fn test_incoming_overflow_is_returned() {
        let hall = hall_with(1, 1, 3, &class("A", &["A1"]));

        let result =
            resolve_middle_seat(&hall, "A", &class("B", &["B1", "B2"]), MiddleSide::Incoming)
                .unwrap();

        assert_eq!(result.remaining_incoming, class("B", &["B2"]));
        assert_eq!(regs_at(&result.hall, 1, 1), some(&["A1", "B1", ""]));
    }

    #[test]
    fn test_existing_overflow_is_dropped_not_returned() {
        // Four A-students but only two middle seats: two of them do not fit.
        let hall = hall_with(2, 1, 3, &class("A", &["A1", "A2", "A3", "A4"]));

        let result =
            resolve_middle_seat(&hall, "A", &class("B", &["B1", "B2"]), MiddleSide::Existing)
                .unwrap();

        assert_eq!(result.dropped_overflow, class("A", &["A3", "A4"]));
        assert_eq!(result.placed_existing, 2);
        assert_eq!(result.hall.seated_count(), 4);
        assert!(result.remaining_incoming.is_empty());
    }

    #[test]
    fn test_columns_are_filled_in_turn() {
        // 1 row x 2 cols: the side queue fills column 1 ends, then column 2 ends.
        let hall = hall_with(1, 2, 3, &class("A", &["A1", "A2", "A3"]));

        let result =
            resolve_middle_seat(&hall, "A", &class("B", &["B1", "B2"]), MiddleSide::Incoming)
                .unwrap();

        assert_eq!(regs_at(&result.hall, 1, 1), some(&["A1", "B1", "A2"]));
        assert_eq!(regs_at(&result.hall, 1, 2), some(&["A3", "B2", ""]));
    }

    #[test]
    fn test_rejects_non_three_seat_hall() {
        let hall = hall_with(1, 1, 2, &class("A", &["A1"]));
        assert_eq!(
            resolve_middle_seat(&hall, "A", &class("B", &["B1"]), MiddleSide::Incoming),
            Err(PlacementError::NotThreeSeat { hall: hall.id, capacity: 2 })
        );
    }

    #[test]
    fn test_rejects_hall_with_other_classes() {
        let hall = hall_with(1, 1, 3, &class("C", &["C1"]));
        assert_eq!(
            resolve_middle_seat(&hall, "A", &class("B", &["B1"]), MiddleSide::Incoming),
            Err(PlacementError::MixedOccupancy { hall: hall.id, class: "C".to_string() })
        );
    }
}
