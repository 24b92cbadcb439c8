//! Application layer use cases for the seating planner.
//!
//! # What is the "application" layer? (for beginners)
//!
//! The domain crate (`seatplan_core`) knows how to fill one hall from one
//! list of students. It does not know who asked, what happens to the students
//! it could not seat, or that some drops need a human decision first. This
//! layer owns those questions:
//!
//! - **Orchestrate** the engine and both stores to fulfil an operator gesture
//!   ("drop class CSE-A on Hall 2", "swap these two seats").
//! - **Depend on abstractions** (the `MiddleSeatPrompt` trait lives in
//!   infrastructure and is injected by the binary), never on a terminal.
//! - **Contain no file system access and no terminal I/O.**
//!
//! # Sub-modules
//!
//! - **`conflict`** – Classifies a class→hall drop as an ordinary fill or a
//!   middle-seat conflict that needs the operator's decision.
//!
//! - **`session`** – The seating session: both stores, the orchestrator state
//!   machine and the command handlers.
//!
//! - **`render_plan`** – Turns the final halls into the printable seating
//!   document (plain text or JSON).

pub mod conflict;
pub mod render_plan;
pub mod session;
