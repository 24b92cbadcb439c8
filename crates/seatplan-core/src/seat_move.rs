//! The Seat Mutator: manual corrections by swapping two seat slots.
//!
//! A move is always a swap. Dragging a student onto an empty seat swaps the
//! student with the empty slot; dragging onto an occupied seat exchanges the
//! two students. No adjacency rule is checked: the operator's override is
//! unconditional.

use tracing::debug;

use crate::domain::hall::{Hall, SeatRef};

/// Result of [`move_seat`].
#[derive(Debug, Clone, PartialEq)]
pub enum SwapOutcome {
    /// The swap was applied. Carries the updated copies of the affected halls
    /// (one hall for a same-hall swap, two for a cross-hall swap).
    Swapped(Vec<Hall>),
    /// A hall id, desk id or seat index could not be resolved. Nothing changed.
    Unresolved,
}

/// Swaps the occupants of `source` and `target`.
///
/// `halls` is not modified; commit the returned halls to apply the swap.
/// Swapping the same pair twice restores the original occupancy.
pub fn move_seat(halls: &[Hall], source: &SeatRef, target: &SeatRef) -> SwapOutcome {
    if !resolves(halls, source) || !resolves(halls, target) {
        debug!(?source, ?target, "seat swap references unknown seat, ignoring");
        return SwapOutcome::Unresolved;
    }

    let Some(mut src_hall) = halls.iter().find(|h| h.id == source.hall_id).cloned() else {
        return SwapOutcome::Unresolved;
    };

    if source.hall_id == target.hall_id {
        swap_within_hall(&mut src_hall, source, target);
        return SwapOutcome::Swapped(vec![src_hall]);
    }

    let Some(mut dst_hall) = halls.iter().find(|h| h.id == target.hall_id).cloned() else {
        return SwapOutcome::Unresolved;
    };
    let (Some(src_desk), Some(dst_desk)) = (
        src_hall.desk_mut(source.desk_id),
        dst_hall.desk_mut(target.desk_id),
    ) else {
        return SwapOutcome::Unresolved;
    };
    std::mem::swap(
        &mut src_desk.seats_mut()[source.seat_index],
        &mut dst_desk.seats_mut()[target.seat_index],
    );
    SwapOutcome::Swapped(vec![src_hall, dst_hall])
}

fn swap_within_hall(hall: &mut Hall, source: &SeatRef, target: &SeatRef) {
    if source.desk_id == target.desk_id {
        if let Some(desk) = hall.desk_mut(source.desk_id) {
            desk.seats_mut().swap(source.seat_index, target.seat_index);
        }
        return;
    }

    let src = hall.desk(source.desk_id).and_then(|d| d.seats()[source.seat_index].clone());
    let dst = hall.desk(target.desk_id).and_then(|d| d.seats()[target.seat_index].clone());
    if let Some(desk) = hall.desk_mut(source.desk_id) {
        desk.seats_mut()[source.seat_index] = dst;
    }
    if let Some(desk) = hall.desk_mut(target.desk_id) {
        desk.seats_mut()[target.seat_index] = src;
    }
}

fn resolves(halls: &[Hall], seat: &SeatRef) -> bool {
    halls
        .iter()
        .find(|h| h.id == seat.hall_id)
        .and_then(|h| h.desk(seat.desk_id))
        .is_some_and(|d| seat.seat_index < d.capacity())
}
