//! SeatingSession: the orchestrator over the roster and the hall store.
//!
//! Every operator gesture enters through this type, either as a [`Command`]
//! (seat→seat or class→hall drop) or as one of the hall/roster management
//! methods. Each operation works on copies of the stores and swaps them in only
//! when it succeeds, so a failed or advisory-only operation leaves the session
//! exactly as it was.
//!
//! # The middle-seat decision (for beginners)
//!
//! Most drops run ordinary fill immediately. A class dropped on a three-seat
//! hall that already holds one other class is different: the engine needs to
//! know which class takes the middle seats, and that is a human decision. The
//! session then parks the drop:
//!
//! ```text
//!            drop (conflict)
//!   Idle ───────────────────────▶ AwaitingMiddleDecision { class_a, class_b, hall }
//!    ▲                                   │            │
//!    └──────── decide(middle_class) ─────┘            │
//!    └──────── cancel() ──────────────────────────────┘
//! ```
//!
//! While a decision is pending every other mutating call is rejected with
//! [`SessionError::DecisionPending`]. Read-only queries keep working.

use std::collections::BTreeSet;

use seatplan_core::{
    hall_sheet, import_roster, invariants, move_seat, place_class, resolve_middle_seat, HallConfig,
    HallError, HallId, HallSheet, HallStore, ImportError, MiddleSide, PlacementError,
    PlacementOutcome, ReturnReport, Roster, SeatRef, Student, SwapOutcome,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::conflict::{classify_drop, DropKind};

/// Errors returned by session operations.
///
/// Advisory results (nothing placed, partial placement, unknown seat) are not
/// errors; they come back as a [`DropOutcome`].
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    /// A middle-seat decision must be made or cancelled first.
    #[error("a middle-seat decision is pending for hall {0}; decide or cancel it first")]
    DecisionPending(HallId),

    /// `decide` or `cancel` was called with nothing pending.
    #[error("no middle-seat decision is pending")]
    NoPendingDecision,

    /// The chosen middle class is neither of the two pending classes.
    #[error("{given} is not one of the pending classes ({class_a}, {class_b})")]
    InvalidMiddleClass {
        given: String,
        class_a: String,
        class_b: String,
    },

    /// A new roster cannot be imported while students from the current one
    /// are still seated.
    #[error("cannot import a roster while {seated} student(s) are seated; clear the halls or reset first")]
    HallsOccupied { seated: usize },

    #[error(transparent)]
    Hall(#[from] HallError),

    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error(transparent)]
    Import(#[from] ImportError),
}

/// A discrete operator gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Seat→seat drag: swap two seat slots.
    MoveSeat { source: SeatRef, target: SeatRef },
    /// Class→hall drag: seat a class's available students in a hall.
    DropClass { class_name: String, hall_id: HallId },
}

/// A class→hall drop waiting for the operator's middle-seat choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingMiddleSeat {
    /// The class already seated in the hall.
    pub class_a: String,
    /// The class being dropped.
    pub class_b: String,
    pub hall_id: HallId,
}

/// Orchestrator state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OrchestratorState {
    #[default]
    Idle,
    AwaitingMiddleDecision(PendingMiddleSeat),
}

/// What a [`Command`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Two seats were exchanged.
    Swapped,
    /// A hall, desk, seat or class could not be found. Nothing changed.
    Unresolved,
    /// The dropped class has no available students.
    NoCandidates,
    /// Every available student of the class was seated.
    Placed { placed: usize },
    /// Some students were seated; `remaining` are still available.
    PartialPlacement { placed: usize, remaining: usize },
    /// Adjacency blocked every attempt. Nothing changed.
    ZeroPlacement { candidates: usize },
    /// The hall has no empty seat. Nothing changed.
    HallFull,
    /// The drop is parked until [`SeatingSession::decide`] or
    /// [`SeatingSession::cancel`].
    AwaitingDecision(PendingMiddleSeat),
}

impl From<PlacementOutcome> for DropOutcome {
    fn from(outcome: PlacementOutcome) -> Self {
        match outcome {
            PlacementOutcome::NoCandidates => DropOutcome::NoCandidates,
            PlacementOutcome::Complete { placed } => DropOutcome::Placed { placed },
            PlacementOutcome::Partial { placed, remaining } => {
                DropOutcome::PartialPlacement { placed, remaining }
            }
            PlacementOutcome::ZeroPlacement { candidates } => {
                DropOutcome::ZeroPlacement { candidates }
            }
        }
    }
}

/// Result of a resolved middle-seat decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiddleSeatReport {
    pub hall_id: HallId,
    pub middle_class: String,
    pub placed_existing: usize,
    pub placed_incoming: usize,
    /// Students of the dropped class still available afterwards.
    pub remaining_incoming: usize,
    /// Students of the existing class that no longer fit anywhere.
    pub dropped_overflow: Vec<Student>,
}

/// A point-in-time copy of the whole session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub roster: Roster,
    pub halls: HallStore,
    pub state: OrchestratorState,
    pub written_off: Vec<Student>,
}

/// The seating session.
#[derive(Debug, Clone)]
pub struct SeatingSession {
    roster: Roster,
    halls: HallStore,
    state: OrchestratorState,
    last_hall_config: HallConfig,
    /// Middle-seat overflow that left the model.
    written_off: Vec<Student>,
}

impl SeatingSession {
    /// Creates an empty session. `hall_defaults` prefills the hall form until
    /// the first hall is created.
    pub fn new(hall_defaults: HallConfig) -> Self {
        Self {
            roster: Roster::new(),
            halls: HallStore::new(),
            state: OrchestratorState::Idle,
            last_hall_config: hall_defaults,
            written_off: Vec::new(),
        }
    }

    // ── Queries ─────────────────────────────────────────────────────────────

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn halls(&self) -> &HallStore {
        &self.halls
    }

    pub fn state(&self) -> &OrchestratorState {
        &self.state
    }

    /// The parked drop, if any.
    pub fn pending(&self) -> Option<&PendingMiddleSeat> {
        match &self.state {
            OrchestratorState::AwaitingMiddleDecision(pending) => Some(pending),
            OrchestratorState::Idle => None,
        }
    }

    /// The configuration of the last hall created (or the configured defaults).
    pub fn last_hall_config(&self) -> &HallConfig {
        &self.last_hall_config
    }

    /// Existing-class students lost to middle-seat overflow.
    pub fn written_off(&self) -> &[Student] {
        &self.written_off
    }

    pub fn seated_students(&self, hall_id: HallId) -> Option<Vec<Student>> {
        self.halls.get(hall_id).map(|h| h.seated_students())
    }

    pub fn distinct_classes(&self, hall_id: HallId) -> Option<BTreeSet<String>> {
        self.halls.get(hall_id).map(|h| h.distinct_classes())
    }

    pub fn seated_count(&self, hall_id: HallId) -> Option<usize> {
        self.halls.get(hall_id).map(|h| h.seated_count())
    }

    pub fn empty_seats(&self, hall_id: HallId) -> Option<usize> {
        self.halls.get(hall_id).map(|h| h.empty_seat_count())
    }

    /// Available (unseated) students of a class.
    pub fn available(&self, class_name: &str) -> Option<&[Student]> {
        self.roster.get(class_name).map(|c| c.students())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            roster: self.roster.clone(),
            halls: self.halls.clone(),
            state: self.state.clone(),
            written_off: self.written_off.clone(),
        }
    }

    /// Printable views of every hall, in creation order.
    pub fn hall_sheets(&self) -> Vec<HallSheet> {
        self.halls.halls().iter().map(hall_sheet).collect()
    }

    // ── Roster ──────────────────────────────────────────────────────────────

    /// Replaces the roster with one read from tabular rows. Halls are left as
    /// they are, so every hall must be empty: seated students belong to the
    /// old roster and could never be returned to it.
    ///
    /// # Errors
    ///
    /// [`SessionError::DecisionPending`] while a decision is pending,
    /// [`SessionError::HallsOccupied`] while any student is seated, or
    /// [`SessionError::Import`] if the table cannot be read.
    pub fn import_roster<R, C>(&mut self, rows: R) -> Result<(), SessionError>
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = C>,
        C: AsRef<str>,
    {
        self.ensure_idle()?;
        let seated = self.halls.seated_count();
        if seated > 0 {
            return Err(SessionError::HallsOccupied { seated });
        }
        let roster = import_roster(rows)?;
        info!(
            classes = roster.classes().len(),
            students = roster.total_available(),
            "roster imported"
        );
        self.roster = roster;
        self.written_off.clear();
        Ok(())
    }

    /// Starts over: drops every hall, the roster and the written-off list.
    /// The remembered hall configuration is kept.
    ///
    /// # Errors
    ///
    /// [`SessionError::DecisionPending`] while a decision is pending.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.ensure_idle()?;
        info!(
            halls = self.halls.len(),
            classes = self.roster.classes().len(),
            "session reset"
        );
        self.halls = HallStore::new();
        self.roster = Roster::new();
        self.written_off.clear();
        Ok(())
    }

    // ── Halls ───────────────────────────────────────────────────────────────

    /// Creates an empty hall and remembers `config` for the next one.
    ///
    /// # Errors
    ///
    /// [`SessionError::DecisionPending`] or an invalid configuration.
    pub fn create_hall(&mut self, config: &HallConfig) -> Result<HallId, SessionError> {
        self.ensure_idle()?;
        warn_if_oversized(config);
        let id = self.commit(|halls, _| Ok(halls.create(config)?))?;
        self.last_hall_config = config.clone();
        info!(hall = %id, name = %config.name.trim(), "hall created");
        Ok(id)
    }

    /// Applies a full configuration edit. Always destructive: residents go
    /// back to their classes and desks are regenerated, even when only the
    /// name differs. Use [`rename_hall`](Self::rename_hall) to keep seats.
    ///
    /// # Errors
    ///
    /// [`SessionError::DecisionPending`], an invalid configuration or an
    /// unknown hall. Nothing changes in any of these cases.
    pub fn edit_hall(
        &mut self,
        hall_id: HallId,
        config: &HallConfig,
    ) -> Result<ReturnReport, SessionError> {
        self.ensure_idle()?;
        warn_if_oversized(config);
        let report = self.commit(|halls, roster| Ok(halls.resize(hall_id, config, roster)?))?;
        info!(hall = %hall_id, returned = report.returned, "hall edited");
        warn_orphans(&report);
        Ok(report)
    }

    /// Changes only the hall's name.
    ///
    /// # Errors
    ///
    /// [`SessionError::DecisionPending`], a blank name or an unknown hall.
    pub fn rename_hall(&mut self, hall_id: HallId, name: &str) -> Result<(), SessionError> {
        self.ensure_idle()?;
        self.commit(|halls, _| Ok(halls.rename(hall_id, name)?))?;
        info!(hall = %hall_id, name = %name.trim(), "hall renamed");
        Ok(())
    }

    /// Empties a hall, returning its residents to their classes.
    ///
    /// # Errors
    ///
    /// [`SessionError::DecisionPending`] or an unknown hall.
    pub fn clear_hall(&mut self, hall_id: HallId) -> Result<ReturnReport, SessionError> {
        self.ensure_idle()?;
        let report = self.commit(|halls, roster| Ok(halls.clear(hall_id, roster)?))?;
        info!(hall = %hall_id, returned = report.returned, "hall cleared");
        warn_orphans(&report);
        Ok(report)
    }

    /// Deletes a hall, returning its residents to their classes.
    ///
    /// # Errors
    ///
    /// [`SessionError::DecisionPending`] or an unknown hall.
    pub fn delete_hall(&mut self, hall_id: HallId) -> Result<ReturnReport, SessionError> {
        self.ensure_idle()?;
        let report = self.commit(|halls, roster| Ok(halls.delete(hall_id, roster)?))?;
        info!(hall = %hall_id, returned = report.returned, "hall deleted");
        warn_orphans(&report);
        Ok(report)
    }

    // ── Commands ────────────────────────────────────────────────────────────

    /// Executes an operator gesture.
    ///
    /// # Errors
    ///
    /// [`SessionError::DecisionPending`] while a middle-seat decision is
    /// pending. Everything else is reported through [`DropOutcome`].
    pub fn handle(&mut self, command: Command) -> Result<DropOutcome, SessionError> {
        self.ensure_idle()?;
        let outcome = match command {
            Command::MoveSeat { source, target } => self.swap_seats(&source, &target),
            Command::DropClass {
                class_name,
                hall_id,
            } => self.drop_class(&class_name, hall_id),
        };
        self.debug_check();
        Ok(outcome)
    }

    /// Resolves the pending drop with `middle_class` in the middle seats.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NoPendingDecision`] when idle.
    /// - [`SessionError::InvalidMiddleClass`] when `middle_class` is neither
    ///   pending class; the decision stays pending.
    /// - [`SessionError::Hall`] / [`SessionError::Placement`] if the parked
    ///   hall can no longer be re-laid; the pending drop is discarded.
    pub fn decide(&mut self, middle_class: &str) -> Result<MiddleSeatReport, SessionError> {
        let pending = self.pending().cloned().ok_or(SessionError::NoPendingDecision)?;
        let middle = if middle_class == pending.class_a {
            MiddleSide::Existing
        } else if middle_class == pending.class_b {
            MiddleSide::Incoming
        } else {
            return Err(SessionError::InvalidMiddleClass {
                given: middle_class.to_string(),
                class_a: pending.class_a,
                class_b: pending.class_b,
            });
        };

        self.state = OrchestratorState::Idle;
        let report = self.apply_middle_seat(&pending, middle)?;
        info!(
            hall = %pending.hall_id,
            middle = %report.middle_class,
            placed_existing = report.placed_existing,
            placed_incoming = report.placed_incoming,
            remaining = report.remaining_incoming,
            "middle-seat decision applied"
        );
        if !report.dropped_overflow.is_empty() {
            warn!(
                hall = %pending.hall_id,
                class = %pending.class_a,
                dropped = report.dropped_overflow.len(),
                "middle-seat fill could not reseat every existing student; they are no longer in any pool"
            );
        }
        self.debug_check();
        Ok(report)
    }

    /// Discards the pending drop without changing anything else.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoPendingDecision`] when idle.
    pub fn cancel(&mut self) -> Result<PendingMiddleSeat, SessionError> {
        match std::mem::take(&mut self.state) {
            OrchestratorState::AwaitingMiddleDecision(pending) => {
                info!(
                    hall = %pending.hall_id,
                    class = %pending.class_b,
                    "middle-seat decision cancelled"
                );
                Ok(pending)
            }
            OrchestratorState::Idle => Err(SessionError::NoPendingDecision),
        }
    }

    // ── Internals ───────────────────────────────────────────────────────────

    fn ensure_idle(&self) -> Result<(), SessionError> {
        match &self.state {
            OrchestratorState::Idle => Ok(()),
            OrchestratorState::AwaitingMiddleDecision(pending) => {
                Err(SessionError::DecisionPending(pending.hall_id))
            }
        }
    }

    /// Runs `op` on copies of both stores and keeps the copies only on success.
    fn commit<T>(
        &mut self,
        op: impl FnOnce(&mut HallStore, &mut Roster) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        let mut halls = self.halls.clone();
        let mut roster = self.roster.clone();
        let value = op(&mut halls, &mut roster)?;
        self.halls = halls;
        self.roster = roster;
        self.debug_check();
        Ok(value)
    }

    fn swap_seats(&mut self, source: &SeatRef, target: &SeatRef) -> DropOutcome {
        match move_seat(self.halls.halls(), source, target) {
            SwapOutcome::Swapped(updated) => {
                let mut halls = self.halls.clone();
                for hall in updated {
                    halls.replace(hall);
                }
                self.halls = halls;
                debug!(?source, ?target, "seats swapped");
                DropOutcome::Swapped
            }
            SwapOutcome::Unresolved => {
                debug!(?source, ?target, "seat swap unresolved");
                DropOutcome::Unresolved
            }
        }
    }

    fn drop_class(&mut self, class_name: &str, hall_id: HallId) -> DropOutcome {
        let (Some(hall), Some(class)) = (self.halls.get(hall_id), self.roster.get(class_name))
        else {
            debug!(hall = %hall_id, class = %class_name, "drop references unknown hall or class");
            return DropOutcome::Unresolved;
        };
        if class.students().is_empty() {
            debug!(hall = %hall_id, class = %class_name, "dropped class has no available students");
            return DropOutcome::NoCandidates;
        }

        if let DropKind::MiddleSeatConflict { existing_class } = classify_drop(hall, class_name) {
            let pending = PendingMiddleSeat {
                class_a: existing_class,
                class_b: class_name.to_string(),
                hall_id,
            };
            info!(
                hall = %hall_id,
                existing = %pending.class_a,
                incoming = %pending.class_b,
                "middle-seat conflict, waiting for decision"
            );
            self.state = OrchestratorState::AwaitingMiddleDecision(pending.clone());
            return DropOutcome::AwaitingDecision(pending);
        }

        let result = match place_class(hall, class.students()) {
            Ok(result) => result,
            Err(PlacementError::HallFull(_)) => {
                warn!(hall = %hall_id, class = %class_name, "hall is full");
                return DropOutcome::HallFull;
            }
            Err(e) => {
                warn!(hall = %hall_id, class = %class_name, "placement failed: {e}");
                return DropOutcome::Unresolved;
            }
        };

        let outcome = DropOutcome::from(result.outcome);
        match &outcome {
            DropOutcome::ZeroPlacement { candidates } => {
                warn!(
                    hall = %hall_id,
                    class = %class_name,
                    candidates,
                    "could not place any students: adjacent same-class seats blocked every attempt"
                );
                return outcome;
            }
            DropOutcome::PartialPlacement { placed, remaining } => {
                warn!(
                    hall = %hall_id,
                    class = %class_name,
                    placed,
                    remaining,
                    "placed some students; the rest stay available"
                );
            }
            _ => {
                info!(
                    hall = %hall_id,
                    class = %class_name,
                    placed = result.outcome.placed(),
                    "class placed"
                );
            }
        }

        if result.outcome.changes_state() {
            let mut halls = self.halls.clone();
            let mut roster = self.roster.clone();
            halls.replace(result.hall);
            if roster.set_available(class_name, result.remaining).is_err() {
                return DropOutcome::Unresolved;
            }
            self.halls = halls;
            self.roster = roster;
        }
        outcome
    }

    fn apply_middle_seat(
        &mut self,
        pending: &PendingMiddleSeat,
        middle: MiddleSide,
    ) -> Result<MiddleSeatReport, SessionError> {
        let hall = self
            .halls
            .get(pending.hall_id)
            .ok_or(HallError::HallNotFound(pending.hall_id))?;
        let incoming = self
            .roster
            .get(&pending.class_b)
            .map(|c| c.students().to_vec())
            .unwrap_or_default();

        let result = resolve_middle_seat(hall, &pending.class_a, &incoming, middle)?;

        let mut halls = self.halls.clone();
        let mut roster = self.roster.clone();
        halls.replace(result.hall);
        let remaining_incoming = result.remaining_incoming.len();
        if roster
            .set_available(&pending.class_b, result.remaining_incoming)
            .is_err()
        {
            debug!(class = %pending.class_b, "incoming class vanished before the decision");
        }
        self.halls = halls;
        self.roster = roster;
        self.written_off.extend(result.dropped_overflow.iter().cloned());

        Ok(MiddleSeatReport {
            hall_id: pending.hall_id,
            middle_class: match middle {
                MiddleSide::Existing => pending.class_a.clone(),
                MiddleSide::Incoming => pending.class_b.clone(),
            },
            placed_existing: result.placed_existing,
            placed_incoming: result.placed_incoming,
            remaining_incoming,
            dropped_overflow: result.dropped_overflow,
        })
    }

    fn debug_check(&self) {
        invariants::debug_assert_partition(&self.roster, self.halls.halls(), &self.written_off);
    }
}

fn warn_if_oversized(config: &HallConfig) {
    if config.exceeds_practical_capacity() {
        warn!(
            name = %config.name.trim(),
            capacity = config.capacity,
            "desk capacity above 4 is unusual for an exam hall"
        );
    }
}

fn warn_orphans(report: &ReturnReport) {
    if !report.orphaned.is_empty() {
        warn!(
            orphaned = report.orphaned.len(),
            "returned students belong to classes no longer in the roster"
        );
    }
}
