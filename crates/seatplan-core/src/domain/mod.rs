//! Domain entities for exam seating.
//!
//! This module contains pure business logic with no infrastructure dependencies.
//!
//! # Two pools per class
//!
//! Every student of a class is in exactly one of two places:
//!
//! - the class group's **available** sequence in the [`roster::Roster`], or
//! - a seat slot of some desk in a [`hall::Hall`] held by the
//!   [`hall_store::HallStore`].
//!
//! Operations that take students out of one pool always put them into the
//! other. Placement moves students from the roster into halls; clearing,
//! resizing and deleting a hall return them.

pub mod hall;
pub mod hall_store;
pub mod roster;
pub mod student;
