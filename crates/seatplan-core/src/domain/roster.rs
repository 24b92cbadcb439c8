//! The Roster Store: class groups and their available (unseated) students.
//!
//! A [`ClassGroup`] keeps its students in arrival order. Students leave the
//! sequence only when the placement engine seats them and come back only
//! through a return operation (hall clear/resize/delete, or the leftovers of a
//! partial placement), which always appends at the end.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::student::Student;

/// Errors raised by roster edits.
#[derive(Debug, Error, PartialEq)]
pub enum RosterError {
    /// A class with this name already exists.
    #[error("class already exists: {0}")]
    DuplicateClass(String),

    /// The referenced class does not exist.
    #[error("class not found: {0}")]
    ClassNotFound(String),

    /// Class names must contain at least one non-whitespace character.
    #[error("class name must not be empty")]
    EmptyClassName,
}

/// Cosmetic display color of a class, assigned by import column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Pink,
    Indigo,
    Teal,
    Orange,
}

impl ClassColor {
    const PALETTE: [ClassColor; 9] = [
        ClassColor::Red,
        ClassColor::Blue,
        ClassColor::Green,
        ClassColor::Yellow,
        ClassColor::Purple,
        ClassColor::Pink,
        ClassColor::Indigo,
        ClassColor::Teal,
        ClassColor::Orange,
    ];

    /// Picks a color for the class in import column `index`, cycling through
    /// the palette.
    pub fn for_index(index: usize) -> Self {
        Self::PALETTE[index % Self::PALETTE.len()]
    }
}

/// A named pool of students that have not been seated yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassGroup {
    /// Unique key across all classes.
    pub name: String,
    /// Display color (cosmetic).
    pub color: ClassColor,
    /// Unseated students, in arrival order.
    students: Vec<Student>,
    /// Total enrollment: available plus seated. Fixed at import time and
    /// adjusted only by explicit add/remove of students.
    enrollment: usize,
}

impl ClassGroup {
    pub fn new(name: impl Into<String>, color: ClassColor) -> Self {
        Self {
            name: name.into(),
            color,
            students: Vec::new(),
            enrollment: 0,
        }
    }

    /// Unseated students in arrival order.
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// Number of students of this class, seated or not.
    pub fn enrollment(&self) -> usize {
        self.enrollment
    }

    pub fn is_exhausted(&self) -> bool {
        self.students.is_empty()
    }
}

/// The Roster Store: every class group, in import column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    classes: Vec<ClassGroup>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// All class groups in import order.
    pub fn classes(&self) -> &[ClassGroup] {
        &self.classes
    }

    pub fn get(&self, name: &str) -> Option<&ClassGroup> {
        self.classes.iter().find(|c| c.name == name)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut ClassGroup> {
        self.classes.iter_mut().find(|c| c.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Total unseated students across all classes.
    pub fn total_available(&self) -> usize {
        self.classes.iter().map(|c| c.students.len()).sum()
    }

    /// Adds an empty class group.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::EmptyClassName`] for a blank name and
    /// [`RosterError::DuplicateClass`] if the name is already taken.
    pub fn add_class(&mut self, name: &str, color: ClassColor) -> Result<(), RosterError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::EmptyClassName);
        }
        if self.get(name).is_some() {
            return Err(RosterError::DuplicateClass(name.to_string()));
        }
        self.classes.push(ClassGroup::new(name, color));
        Ok(())
    }

    /// Enrolls a new student at the end of their class's sequence.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::ClassNotFound`] if the student's class does not exist.
    pub fn add_student(&mut self, student: Student) -> Result<(), RosterError> {
        let class = self
            .get_mut(&student.class_name)
            .ok_or_else(|| RosterError::ClassNotFound(student.class_name.clone()))?;
        class.students.push(student);
        class.enrollment += 1;
        Ok(())
    }

    /// Removes an unseated student from the roster entirely (un-enrolls them).
    ///
    /// Returns the removed student, or `None` if no such unseated student exists.
    pub fn remove_student(&mut self, class_name: &str, register_number: &str) -> Option<Student> {
        let class = self.get_mut(class_name)?;
        let idx = class
            .students
            .iter()
            .position(|s| s.register_number == register_number)?;
        class.enrollment -= 1;
        Some(class.students.remove(idx))
    }

    /// Replaces a class's available sequence with the leftovers of a placement.
    ///
    /// Enrollment is unchanged: the students missing from `remaining` are the
    /// ones that were seated.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::ClassNotFound`] if the class does not exist.
    pub fn set_available(
        &mut self,
        class_name: &str,
        remaining: Vec<Student>,
    ) -> Result<(), RosterError> {
        let class = self
            .get_mut(class_name)
            .ok_or_else(|| RosterError::ClassNotFound(class_name.to_string()))?;
        class.students = remaining;
        Ok(())
    }

    /// Returns seated students to their classes, appending in the given order.
    ///
    /// Students whose class is not in the roster cannot be returned anywhere;
    /// they are handed back to the caller.
    pub fn return_students<I>(&mut self, students: I) -> Vec<Student>
    where
        I: IntoIterator<Item = Student>,
    {
        let mut orphans = Vec::new();
        for student in students {
            match self.get_mut(&student.class_name) {
                Some(class) => class.students.push(student),
                None => orphans.push(student),
            }
        }
        orphans
    }

    /// Builds a roster from already-populated groups, recording each group's
    /// current size as its enrollment. Used by the import adapter.
    pub(crate) fn push_imported(
        &mut self,
        name: String,
        color: ClassColor,
        students: Vec<Student>,
    ) {
        let enrollment = students.len();
        self.classes.push(ClassGroup {
            name,
            color,
            students,
            enrollment,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster_with(classes: &[(&str, &[&str])]) -> Roster {
        let mut roster = Roster::new();
        for (idx, (name, regs)) in classes.iter().enumerate() {
            roster.add_class(name, ClassColor::for_index(idx)).unwrap();
            for reg in regs.iter() {
                roster.add_student(Student::new(*reg, *name)).unwrap();
            }
        }
        roster
    }

    #[test]
    fn test_color_for_index_cycles_palette() {
        assert_eq!(ClassColor::for_index(0), ClassColor::Red);
        assert_eq!(ClassColor::for_index(8), ClassColor::Orange);
        assert_eq!(ClassColor::for_index(9), ClassColor::Red);
    }

    #[test]
    fn test_add_class_rejects_duplicates_and_blank_names() {
        let mut roster = Roster::new();
        roster.add_class("CSE-A", ClassColor::Red).unwrap();
        assert_eq!(
            roster.add_class("CSE-A", ClassColor::Blue),
            Err(RosterError::DuplicateClass("CSE-A".to_string()))
        );
        assert_eq!(roster.add_class("   ", ClassColor::Blue), Err(RosterError::EmptyClassName));
    }

    #[test]
    fn test_add_student_to_unknown_class_fails() {
        let mut roster = Roster::new();
        assert_eq!(
            roster.add_student(Student::new("1", "Ghost")),
            Err(RosterError::ClassNotFound("Ghost".to_string()))
        );
    }

    #[test]
    fn test_add_student_increments_enrollment() {
        let roster = roster_with(&[("A", &["A1", "A2"])]);
        let class = roster.get("A").unwrap();
        assert_eq!(class.enrollment(), 2);
        assert_eq!(class.students().len(), 2);
    }

    #[test]
    fn test_remove_student_decrements_enrollment() {
        let mut roster = roster_with(&[("A", &["A1", "A2"])]);
        let removed = roster.remove_student("A", "A1");
        assert_eq!(removed, Some(Student::new("A1", "A")));
        assert_eq!(roster.get("A").unwrap().enrollment(), 1);
        assert_eq!(roster.remove_student("A", "A1"), None);
    }

    #[test]
    fn test_set_available_keeps_enrollment() {
        let mut roster = roster_with(&[("A", &["A1", "A2", "A3"])]);
        roster
            .set_available("A", vec![Student::new("A3", "A")])
            .unwrap();
        let class = roster.get("A").unwrap();
        assert_eq!(class.students(), &[Student::new("A3", "A")]);
        assert_eq!(class.enrollment(), 3);
    }

    #[test]
    fn test_return_students_appends_per_class_and_reports_orphans() {
        // Arrange
        let mut roster = roster_with(&[("A", &["A3"]), ("B", &[])]);

        // Act
        let orphans = roster.return_students(vec![
            Student::new("A1", "A"),
            Student::new("B1", "B"),
            Student::new("Z1", "Z"),
        ]);

        // Assert
        let a: Vec<_> = roster.get("A").unwrap().students().iter().map(|s| s.register_number.as_str()).collect();
        assert_eq!(a, vec!["A3", "A1"]);
        assert_eq!(roster.get("B").unwrap().students().len(), 1);
        assert_eq!(orphans, vec![Student::new("Z1", "Z")]);
    }

    #[test]
    fn test_total_available_sums_all_classes() {
        let roster = roster_with(&[("A", &["A1", "A2"]), ("B", &["B1"])]);
        assert_eq!(roster.total_available(), 3);
        assert!(!roster.get("B").unwrap().is_exhausted());
    }
}
