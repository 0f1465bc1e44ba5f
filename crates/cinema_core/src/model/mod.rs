//! Domain entities of the seating-reservation backend.
//!
//! # Responsibility
//! - Define theaters, lines, seats, films, seances, users and status rows.
//! - Keep parent links as plain ids, never as object back-pointers.
//!
//! # Invariants
//! - An id is `None` until the persistence layer assigns one on first write.
//! - Children carry the id of their owning parent (`Line::theater_id`,
//!   `Seat::line_id`); navigation upward goes through [`graph::TheaterGraph`].

pub mod film;
pub mod graph;
pub mod seance;
pub mod theater;
pub mod user;
