//! Integration tests for the allocation engine.
//!
//! These tests drive the public API the way the application layer does: fill a
//! hall from the roster, commit the result back to both stores, then check the
//! stores against each other.

use seatplan_core::{
    import_roster, invariants, move_seat, place_class, resolve_middle_seat, DeskId, Hall,
    HallConfig, HallId, HallStore, MiddleSide, PlacementOutcome, Roster, SeatRef, Student,
    SwapOutcome,
};

fn roster_of(classes: &[(&str, &[&str])]) -> Roster {
    let width = classes.iter().map(|(_, regs)| regs.len()).max().unwrap_or(0);
    let mut rows: Vec<Vec<String>> = vec![classes.iter().map(|(n, _)| n.to_string()).collect()];
    for i in 0..width {
        rows.push(
            classes
                .iter()
                .map(|(_, regs)| regs.get(i).map(|r| r.to_string()).unwrap_or_default())
                .collect(),
        );
    }
    import_roster(rows).expect("fixture roster must import")
}

/// Fills `hall_id` from `class` and commits the result, like a class→hall drop.
fn drop_class(store: &mut HallStore, roster: &mut Roster, class: &str, hall_id: HallId) {
    let hall = store.get(hall_id).expect("hall exists").clone();
    let candidates = roster.get(class).expect("class exists").students().to_vec();
    let result = place_class(&hall, &candidates).expect("hall has room");
    if result.outcome.changes_state() {
        store.replace(result.hall);
        roster.set_available(class, result.remaining).expect("class exists");
    }
}

fn commit(store: &mut HallStore, outcome: SwapOutcome) {
    match outcome {
        SwapOutcome::Swapped(halls) => {
            for hall in halls {
                assert!(store.replace(hall));
            }
        }
        SwapOutcome::Unresolved => panic!("swap did not resolve"),
    }
}

fn available(roster: &Roster, class: &str) -> Vec<String> {
    roster
        .get(class)
        .expect("class exists")
        .students()
        .iter()
        .map(|s| s.register_number.clone())
        .collect()
}

// ── Ordinary fill ────────────────────────────────────────────────────────────

#[test]
fn test_two_by_one_hall_leaves_third_student_available() {
    // Arrange
    let mut roster = roster_of(&[("A", &["A1", "A2", "A3"])]);
    let mut store = HallStore::new();
    let id = store.create(&HallConfig::new("H", 2, 1, 2)).unwrap();

    // Act
    drop_class(&mut store, &mut roster, "A", id);

    // Assert
    let hall = store.get(id).unwrap();
    assert_eq!(hall.seated_count(), 2);
    assert_eq!(available(&roster, "A"), vec!["A3"]);
    assert!(invariants::partition_violations(&roster, store.halls()).is_empty());
    assert!(invariants::adjacency_violations(hall).is_empty());
}

#[test]
fn test_two_classes_share_desks_without_adjacency() {
    let mut roster = roster_of(&[
        ("CSE-A", &["21CS010", "21CS002", "21CS001"]),
        ("CSE-B", &["21CS101", "21CS102", "21CS103"]),
    ]);
    let mut store = HallStore::new();
    let id = store.create(&HallConfig::new("Lab 1", 3, 1, 2)).unwrap();

    drop_class(&mut store, &mut roster, "CSE-A", id);
    drop_class(&mut store, &mut roster, "CSE-B", id);

    let hall = store.get(id).unwrap();
    assert_eq!(hall.seated_count(), 6);
    let front = hall.desk_at(1, 1).unwrap();
    assert_eq!(front.seat(0).unwrap().register_number, "21CS001");
    assert_eq!(front.seat(1).unwrap().register_number, "21CS101");
    assert_eq!(hall.desk_at(3, 1).unwrap().seat(0).unwrap().register_number, "21CS010");
    assert!(invariants::adjacency_violations(hall).is_empty());
    assert!(roster.total_available() == 0);
}

#[test]
fn test_zero_placement_leaves_both_stores_untouched() {
    let mut roster = roster_of(&[("A", &["A1", "A2"])]);
    let mut store = HallStore::new();
    let id = store.create(&HallConfig::new("H", 1, 1, 2)).unwrap();
    drop_class(&mut store, &mut roster, "A", id);
    let store_before = store.clone();
    let roster_before = roster.clone();

    let hall = store.get(id).unwrap().clone();
    let result = place_class(&hall, roster.get("A").unwrap().students()).unwrap();

    assert_eq!(result.outcome, PlacementOutcome::ZeroPlacement { candidates: 1 });
    assert_eq!(store, store_before);
    assert_eq!(roster, roster_before);
}

// ── Middle seat ──────────────────────────────────────────────────────────────

#[test]
fn test_middle_seat_scenario_places_everyone() {
    // Arrange: four A students on the ends of a 2x1 three-seat hall.
    let mut roster = roster_of(&[("A", &["A1", "A2", "A3", "A4"]), ("B", &["B1", "B2"])]);
    let mut store = HallStore::new();
    let id = store.create(&HallConfig::new("H", 2, 1, 3)).unwrap();
    drop_class(&mut store, &mut roster, "A", id);
    assert_eq!(store.get(id).unwrap().seated_count(), 4);

    // Act
    let hall = store.get(id).unwrap().clone();
    let incoming = roster.get("B").unwrap().students().to_vec();
    let result = resolve_middle_seat(&hall, "A", &incoming, MiddleSide::Incoming).unwrap();
    store.replace(result.hall);
    roster.set_available("B", result.remaining_incoming).unwrap();

    // Assert
    assert!(available(&roster, "B").is_empty());
    assert!(invariants::partition_violations(&roster, store.halls()).is_empty());
    let hall = store.get(id).unwrap();
    for row in 1..=2 {
        let desk = hall.desk_at(row, 1).unwrap();
        assert_eq!(desk.seat(0).unwrap().class_name, "A");
        assert_eq!(desk.seat(1).unwrap().class_name, "B");
        assert_eq!(desk.seat(2).unwrap().class_name, "A");
    }
}

#[test]
fn test_middle_seat_overflow_leaves_the_visible_model() {
    let mut roster = roster_of(&[("A", &["A1", "A2", "A3", "A4"]), ("B", &["B1"])]);
    let mut store = HallStore::new();
    let id = store.create(&HallConfig::new("H", 2, 1, 3)).unwrap();
    drop_class(&mut store, &mut roster, "A", id);

    let hall = store.get(id).unwrap().clone();
    let incoming = roster.get("B").unwrap().students().to_vec();
    let result = resolve_middle_seat(&hall, "A", &incoming, MiddleSide::Existing).unwrap();
    let lost = result.dropped_overflow.clone();
    store.replace(result.hall);
    roster.set_available("B", result.remaining_incoming).unwrap();

    assert_eq!(lost.len(), 2);
    assert!(!invariants::partition_violations(&roster, store.halls()).is_empty());
    assert!(invariants::accounted_violations(&roster, store.halls(), &lost).is_empty());
}

// ── Hall lifecycle ───────────────────────────────────────────────────────────

#[test]
fn test_delete_returns_exactly_the_seated_students() {
    // Arrange: fill seat 0 by placement, then move a second X student onto
    // seat 1 manually (placement alone would refuse the adjacent seat).
    let mut roster = roster_of(&[("X", &["X1", "X2"])]);
    let mut store = HallStore::new();
    let main = store.create(&HallConfig::new("Main", 1, 1, 2)).unwrap();
    let spare = store.create(&HallConfig::new("Spare", 1, 1, 1)).unwrap();
    drop_class(&mut store, &mut roster, "X", main);
    drop_class(&mut store, &mut roster, "X", spare);
    let outcome = move_seat(
        store.halls(),
        &SeatRef::new(spare, DeskId::new(1, 1), 0),
        &SeatRef::new(main, DeskId::new(1, 1), 1),
    );
    commit(&mut store, outcome);
    assert_eq!(store.get(main).unwrap().seated_count(), 2);
    assert!(available(&roster, "X").is_empty());

    // Act
    let report = store.delete(main, &mut roster).unwrap();

    // Assert
    assert_eq!(report.returned, 2);
    let mut back = available(&roster, "X");
    back.sort();
    assert_eq!(back, vec!["X1", "X2"]);
    assert!(invariants::partition_violations(&roster, store.halls()).is_empty());
}

#[test]
fn test_resize_returns_residents_then_refill_uses_new_shape() {
    let mut roster = roster_of(&[("A", &["A1", "A2", "A3"])]);
    let mut store = HallStore::new();
    let id = store.create(&HallConfig::new("H", 1, 1, 2)).unwrap();
    drop_class(&mut store, &mut roster, "A", id);

    let report = store
        .resize(id, &HallConfig::new("H", 3, 1, 1), &mut roster)
        .unwrap();
    drop_class(&mut store, &mut roster, "A", id);

    assert_eq!(report.returned, 1);
    assert_eq!(store.get(id).unwrap().seated_count(), 3);
    assert!(available(&roster, "A").is_empty());
}

#[test]
fn test_swap_across_halls_keeps_partition() {
    let mut roster = roster_of(&[("A", &["A1"]), ("B", &["B1"])]);
    let mut store = HallStore::new();
    let h1 = store.create(&HallConfig::new("H1", 1, 1, 1)).unwrap();
    let h2 = store.create(&HallConfig::new("H2", 1, 1, 1)).unwrap();
    drop_class(&mut store, &mut roster, "A", h1);
    drop_class(&mut store, &mut roster, "B", h2);

    let outcome = move_seat(
        store.halls(),
        &SeatRef::new(h1, DeskId::new(1, 1), 0),
        &SeatRef::new(h2, DeskId::new(1, 1), 0),
    );
    commit(&mut store, outcome);

    let names = |h: &Hall| {
        h.seated_students()
            .into_iter()
            .map(|s| s.register_number)
            .collect::<Vec<_>>()
    };
    assert_eq!(names(store.get(h1).unwrap()), vec!["B1"]);
    assert_eq!(names(store.get(h2).unwrap()), vec!["A1"]);
    assert!(invariants::partition_violations(&roster, store.halls()).is_empty());
    assert_eq!(
        store.get(h1).unwrap().seated_students(),
        vec![Student::new("B1", "B")]
    );
}
