//! The Hall Store: every hall in creation order.
//!
//! Operations that destroy seat assignments (resize, clear, delete) hand the
//! former residents back to the [`Roster`] before they return, so the seated
//! and available pools stay a partition of each class's enrollment.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::hall::{Hall, HallConfig, HallError, HallId};
use super::roster::Roster;
use super::student::Student;

/// What happened to the residents of a hall when it was cleared, resized or
/// deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReturnReport {
    /// Students appended back to their class's available sequence.
    pub returned: usize,
    /// Students whose class no longer exists in the roster.
    pub orphaned: Vec<Student>,
}

impl ReturnReport {
    fn from_residents(residents: Vec<Student>, roster: &mut Roster) -> Self {
        let total = residents.len();
        let orphaned = roster.return_students(residents);
        Self {
            returned: total - orphaned.len(),
            orphaned,
        }
    }
}

/// In-memory collection of halls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HallStore {
    halls: Vec<Hall>,
}

impl HallStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All halls in creation order.
    pub fn halls(&self) -> &[Hall] {
        &self.halls
    }

    pub fn get(&self, id: HallId) -> Option<&Hall> {
        self.halls.iter().find(|h| h.id == id)
    }

    /// Finds a hall by its (trimmed) display name. Names are not required to be
    /// unique; the first match wins.
    pub fn find_by_name(&self, name: &str) -> Option<&Hall> {
        let name = name.trim();
        self.halls.iter().find(|h| h.name == name)
    }

    pub fn len(&self) -> usize {
        self.halls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.halls.is_empty()
    }

    /// Total seated students across every hall.
    pub fn seated_count(&self) -> usize {
        self.halls.iter().map(Hall::seated_count).sum()
    }

    /// Creates an empty hall and returns its id.
    ///
    /// # Errors
    ///
    /// Returns a [`HallError`] if `config` is invalid.
    pub fn create(&mut self, config: &HallConfig) -> Result<HallId, HallError> {
        let hall = Hall::new(config)?;
        let id = hall.id;
        debug!(hall = %id, name = %hall.name, rows = hall.rows, cols = hall.cols, capacity = hall.desk_capacity, "hall created");
        self.halls.push(hall);
        Ok(id)
    }

    /// Swaps in a new version of a hall with the same id.
    ///
    /// Returns `false` (and changes nothing) if no hall has that id.
    pub fn replace(&mut self, hall: Hall) -> bool {
        match self.halls.iter_mut().find(|h| h.id == hall.id) {
            Some(slot) => {
                *slot = hall;
                true
            }
            None => false,
        }
    }

    /// Changes only the display name; seat assignments are kept.
    ///
    /// # Errors
    ///
    /// Returns [`HallError::EmptyName`] for a blank name or
    /// [`HallError::HallNotFound`] for an unknown id.
    pub fn rename(&mut self, id: HallId, name: &str) -> Result<(), HallError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(HallError::EmptyName);
        }
        let hall = self.find_mut(id)?;
        hall.name = name.to_string();
        Ok(())
    }

    /// Applies a new configuration. Destructive: every desk is regenerated and
    /// the former residents are returned to the roster.
    ///
    /// # Errors
    ///
    /// Returns a [`HallError`] for an invalid configuration or unknown id. In
    /// both cases neither the hall nor the roster is modified.
    pub fn resize(
        &mut self,
        id: HallId,
        config: &HallConfig,
        roster: &mut Roster,
    ) -> Result<ReturnReport, HallError> {
        config.validate()?;
        let hall = self.find_mut(id)?;
        let residents = hall.reconfigure(config)?;
        debug!(hall = %id, returned = residents.len(), "hall resized");
        Ok(ReturnReport::from_residents(residents, roster))
    }

    /// Empties every seat of a hall, keeping its desks.
    ///
    /// # Errors
    ///
    /// Returns [`HallError::HallNotFound`] for an unknown id.
    pub fn clear(&mut self, id: HallId, roster: &mut Roster) -> Result<ReturnReport, HallError> {
        let residents = self.find_mut(id)?.vacate();
        debug!(hall = %id, returned = residents.len(), "hall cleared");
        Ok(ReturnReport::from_residents(residents, roster))
    }

    /// Removes a hall, returning its residents to the roster.
    ///
    /// # Errors
    ///
    /// Returns [`HallError::HallNotFound`] for an unknown id.
    pub fn delete(&mut self, id: HallId, roster: &mut Roster) -> Result<ReturnReport, HallError> {
        let idx = self
            .halls
            .iter()
            .position(|h| h.id == id)
            .ok_or(HallError::HallNotFound(id))?;
        let mut hall = self.halls.remove(idx);
        let residents = hall.vacate();
        debug!(hall = %id, returned = residents.len(), "hall deleted");
        Ok(ReturnReport::from_residents(residents, roster))
    }

    fn find_mut(&mut self, id: HallId) -> Result<&mut Hall, HallError> {
        self.halls
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or(HallError::HallNotFound(id))
    }
}
