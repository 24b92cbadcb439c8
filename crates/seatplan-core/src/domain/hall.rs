//! Hall and desk domain entities.
//!
//! A hall is a `rows × cols` grid of desks. Every desk has exactly
//! `desk_capacity` seat slots, each either empty or holding one student.
//! Rows and columns are 1-based; seat indices are 0-based, left to right.
//!
//! Desks are generated once, fully empty, when the hall is created or resized.
//! The seat vector of a desk never changes length afterwards, which keeps the
//! invariant `total seats == rows × cols × desk_capacity`.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::student::Student;

/// Desks with more seats than this are accepted but unusual enough to flag.
pub const PRACTICAL_MAX_CAPACITY: u32 = 4;

/// Unique identifier for a hall, derived from UUID v4.
pub type HallId = Uuid;

/// Identifies a desk within its hall by grid position.
///
/// Positions are unique within a hall, so the position doubles as the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeskId {
    /// 1-based row, counted from the front of the hall.
    pub row: u32,
    /// 1-based physical column, counted from the left.
    pub col: u32,
}

impl DeskId {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for DeskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}c{}", self.row, self.col)
    }
}

/// Address of a single seat slot anywhere in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatRef {
    pub hall_id: HallId,
    pub desk_id: DeskId,
    /// 0-based seat index within the desk.
    pub seat_index: usize,
}

impl SeatRef {
    pub fn new(hall_id: HallId, desk_id: DeskId, seat_index: usize) -> Self {
        Self {
            hall_id,
            desk_id,
            seat_index,
        }
    }
}

/// Errors that can occur when configuring a hall.
#[derive(Debug, Error, PartialEq)]
pub enum HallError {
    /// A hall needs at least one row.
    #[error("invalid hall configuration: rows must be at least 1 (got {0})")]
    InvalidRows(u32),

    /// A hall needs at least one column.
    #[error("invalid hall configuration: cols must be at least 1 (got {0})")]
    InvalidCols(u32),

    /// A desk needs at least one seat.
    #[error("invalid hall configuration: desk capacity must be at least 1 (got {0})")]
    InvalidCapacity(u32),

    /// The hall name is blank.
    #[error("invalid hall configuration: name must not be empty")]
    EmptyName,

    /// The specified hall does not exist in the store.
    #[error("hall not found: {0}")]
    HallNotFound(HallId),
}

/// The operator-facing shape of a hall: what the configuration form produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HallConfig {
    pub name: String,
    pub rows: u32,
    pub cols: u32,
    /// Seats per desk.
    pub capacity: u32,
}

impl HallConfig {
    pub fn new(name: impl Into<String>, rows: u32, cols: u32, capacity: u32) -> Self {
        Self {
            name: name.into(),
            rows,
            cols,
            capacity,
        }
    }

    /// Checks the configuration before any desk is generated.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule as a [`HallError`].
    pub fn validate(&self) -> Result<(), HallError> {
        if self.name.trim().is_empty() {
            return Err(HallError::EmptyName);
        }
        if self.rows < 1 {
            return Err(HallError::InvalidRows(self.rows));
        }
        if self.cols < 1 {
            return Err(HallError::InvalidCols(self.cols));
        }
        if self.capacity < 1 {
            return Err(HallError::InvalidCapacity(self.capacity));
        }
        Ok(())
    }

    /// Number of desks this configuration generates, computed in `usize` so
    /// large grids do not wrap.
    pub fn desk_count(&self) -> usize {
        (self.rows as usize).saturating_mul(self.cols as usize)
    }

    /// Returns `true` when the capacity is valid but above the practical ceiling.
    pub fn exceeds_practical_capacity(&self) -> bool {
        self.capacity > PRACTICAL_MAX_CAPACITY
    }
}

/// One desk: a fixed-length row of seat slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Desk {
    pub id: DeskId,
    seats: Vec<Option<Student>>,
}

impl Desk {
    pub(crate) fn empty(id: DeskId, capacity: usize) -> Self {
        Self {
            id,
            seats: vec![None; capacity],
        }
    }

    pub fn row(&self) -> u32 {
        self.id.row
    }

    pub fn col(&self) -> u32 {
        self.id.col
    }

    /// Seat slots, left to right.
    pub fn seats(&self) -> &[Option<Student>] {
        &self.seats
    }

    /// Occupant of seat `index`, `None` if empty or out of range.
    pub fn seat(&self, index: usize) -> Option<&Student> {
        self.seats.get(index).and_then(Option::as_ref)
    }

    pub fn capacity(&self) -> usize {
        self.seats.len()
    }

    /// Seated students, left to right.
    pub fn occupants(&self) -> impl Iterator<Item = &Student> {
        self.seats.iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.iter().all(Option::is_none)
    }

    /// Returns `true` if a student of `class_name` sits directly left or right
    /// of seat `index` on this desk.
    pub fn has_same_class_neighbor(&self, index: usize, class_name: &str) -> bool {
        let left = index
            .checked_sub(1)
            .and_then(|i| self.seat(i))
            .is_some_and(|s| s.class_name == class_name);
        let right = self
            .seat(index + 1)
            .is_some_and(|s| s.class_name == class_name);
        left || right
    }

    pub(crate) fn seats_mut(&mut self) -> &mut [Option<Student>] {
        &mut self.seats
    }
}

/// One exam room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hall {
    pub id: HallId,
    pub name: String,
    pub rows: u32,
    pub cols: u32,
    pub desk_capacity: u32,
    /// Desks in generation order: row-major, row 1 column 1 first.
    desks: Vec<Desk>,
}

impl Hall {
    /// Creates an empty hall with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns a [`HallError`] if `config` fails validation; no desks are
    /// generated in that case.
    pub fn new(config: &HallConfig) -> Result<Self, HallError> {
        Self::with_id(Uuid::new_v4(), config)
    }

    /// Creates an empty hall with a caller-chosen id.
    ///
    /// # Errors
    ///
    /// Returns a [`HallError`] if `config` fails validation.
    pub fn with_id(id: HallId, config: &HallConfig) -> Result<Self, HallError> {
        config.validate()?;
        Ok(Self {
            id,
            name: config.name.trim().to_string(),
            rows: config.rows,
            cols: config.cols,
            desk_capacity: config.capacity,
            desks: generate_desks(config),
        })
    }

    /// The configuration this hall was generated from.
    pub fn config(&self) -> HallConfig {
        HallConfig::new(self.name.clone(), self.rows, self.cols, self.desk_capacity)
    }

    pub fn desks(&self) -> &[Desk] {
        &self.desks
    }

    pub fn desk(&self, id: DeskId) -> Option<&Desk> {
        self.desks.iter().find(|d| d.id == id)
    }

    pub fn desk_at(&self, row: u32, col: u32) -> Option<&Desk> {
        self.desk(DeskId::new(row, col))
    }

    pub(crate) fn desk_mut(&mut self, id: DeskId) -> Option<&mut Desk> {
        self.desks.iter_mut().find(|d| d.id == id)
    }

    pub fn total_seats(&self) -> usize {
        self.desks.iter().map(Desk::capacity).sum()
    }

    pub fn seated_count(&self) -> usize {
        self.desks.iter().map(|d| d.occupants().count()).sum()
    }

    pub fn empty_seat_count(&self) -> usize {
        self.total_seats() - self.seated_count()
    }

    pub fn has_empty_seat(&self) -> bool {
        self.empty_seat_count() > 0
    }

    /// All seated students in desk order, then seat order.
    pub fn seated_students(&self) -> Vec<Student> {
        self.desks
            .iter()
            .flat_map(|d| d.occupants().cloned())
            .collect()
    }

    /// Distinct class names of everyone seated in this hall, sorted.
    pub fn distinct_classes(&self) -> BTreeSet<String> {
        self.desks
            .iter()
            .flat_map(Desk::occupants)
            .map(|s| s.class_name.clone())
            .collect()
    }

    /// Empties every seat, keeping the desk structure, and returns the former
    /// residents in desk order.
    pub fn vacate(&mut self) -> Vec<Student> {
        let mut residents = Vec::new();
        for desk in &mut self.desks {
            residents.extend(desk.seats.iter_mut().filter_map(Option::take));
        }
        residents
    }

    /// Regenerates the desks for a new configuration and returns the residents
    /// of the old desks.
    ///
    /// # Errors
    ///
    /// Returns a [`HallError`] if `config` fails validation; the hall is left
    /// untouched in that case.
    pub fn reconfigure(&mut self, config: &HallConfig) -> Result<Vec<Student>, HallError> {
        config.validate()?;
        let residents = self.vacate();
        self.name = config.name.trim().to_string();
        self.rows = config.rows;
        self.cols = config.cols;
        self.desk_capacity = config.capacity;
        self.desks = generate_desks(config);
        Ok(residents)
    }
}

fn generate_desks(config: &HallConfig) -> Vec<Desk> {
    let mut desks = Vec::with_capacity(config.desk_count());
    for row in 1..=config.rows {
        for col in 1..=config.cols {
            desks.push(Desk::empty(DeskId::new(row, col), config.capacity as usize));
        }
    }
    desks
}
