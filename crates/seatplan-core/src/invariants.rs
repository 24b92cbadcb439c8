//! Consistency checks over rosters and halls.
//!
//! These are cheap enough to run after every operation in debug builds (see
//! [`debug_assert_partition`]) and are the backbone of the property tests.

use std::collections::HashMap;

use crate::domain::hall::{DeskId, Hall};
use crate::domain::roster::Roster;
use crate::domain::student::Student;

/// A class whose available + seated count does not match its enrollment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionViolation {
    pub class_name: String,
    pub enrollment: usize,
    pub available: usize,
    pub seated: usize,
}

/// Two horizontally adjacent seats on one desk holding the same class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyViolation {
    pub desk_id: DeskId,
    /// Index of the left seat of the offending pair.
    pub seat_index: usize,
    pub class_name: String,
}

/// Seated students per class across `halls`.
pub fn seated_per_class<'a, I>(halls: I) -> HashMap<String, usize>
where
    I: IntoIterator<Item = &'a Hall>,
{
    let mut counts = HashMap::new();
    for hall in halls {
        for student in hall.desks().iter().flat_map(|d| d.occupants()) {
            *counts.entry(student.class_name.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Checks, for every class, that available + seated == enrollment.
pub fn partition_violations<'a, I>(roster: &Roster, halls: I) -> Vec<PartitionViolation>
where
    I: IntoIterator<Item = &'a Hall>,
{
    accounted_violations(roster, halls, &[])
}

/// Like [`partition_violations`], but students in `written_off` (middle-seat
/// overflow that left the model) count towards their class's total.
pub fn accounted_violations<'a, I>(
    roster: &Roster,
    halls: I,
    written_off: &[Student],
) -> Vec<PartitionViolation>
where
    I: IntoIterator<Item = &'a Hall>,
{
    let seated = seated_per_class(halls);
    roster
        .classes()
        .iter()
        .filter_map(|class| {
            let seated = seated.get(&class.name).copied().unwrap_or(0);
            let lost = written_off
                .iter()
                .filter(|s| s.class_name == class.name)
                .count();
            let available = class.students().len();
            (available + seated + lost != class.enrollment()).then(|| PartitionViolation {
                class_name: class.name.clone(),
                enrollment: class.enrollment(),
                available,
                seated,
            })
        })
        .collect()
}

/// Lists every pair of neighbouring seats that share a class.
pub fn adjacency_violations(hall: &Hall) -> Vec<AdjacencyViolation> {
    let mut out = Vec::new();
    for desk in hall.desks() {
        for (idx, pair) in desk.seats().windows(2).enumerate() {
            if let (Some(left), Some(right)) = (&pair[0], &pair[1]) {
                if left.same_class(right) {
                    out.push(AdjacencyViolation {
                        desk_id: desk.id,
                        seat_index: idx,
                        class_name: left.class_name.clone(),
                    });
                }
            }
        }
    }
    out
}

/// Panics in debug builds if the partition invariant does not hold.
pub fn debug_assert_partition<'a, I>(roster: &Roster, halls: I, written_off: &[Student])
where
    I: IntoIterator<Item = &'a Hall>,
{
    if cfg!(debug_assertions) {
        let violations = accounted_violations(roster, halls, written_off);
        debug_assert!(
            violations.is_empty(),
            "seated/available partition broken: {violations:?}"
        );
    }
}
