//! Read-side arena over materialized theater graphs.
//!
//! # Responsibility
//! - Own a set of fully loaded theaters (lines and seats nested by value).
//! - Answer upward navigation (seat -> line -> theater) through index maps.
//!
//! # Invariants
//! - Index maps are derived from the nesting, not from stored parent ids.
//! - Entities without an assigned id are reachable by nesting only.

use crate::model::theater::{Line, LineId, Seat, SeatId, Theater, TheaterId};
use std::collections::HashMap;

/// Request-scoped navigable view over theaters, lines and seats.
#[derive(Debug, Clone, Default)]
pub struct TheaterGraph {
    theaters: Vec<Theater>,
    theater_index: HashMap<TheaterId, usize>,
    line_index: HashMap<LineId, (usize, usize)>,
    seat_index: HashMap<SeatId, (usize, usize, usize)>,
}

impl TheaterGraph {
    pub fn new(theaters: Vec<Theater>) -> Self {
        let mut theater_index = HashMap::new();
        let mut line_index = HashMap::new();
        let mut seat_index = HashMap::new();

        for (t, theater) in theaters.iter().enumerate() {
            if let Some(theater_id) = theater.theater_id {
                theater_index.insert(theater_id, t);
            }
            for (l, line) in theater.lines.iter().enumerate() {
                if let Some(line_id) = line.line_id {
                    line_index.insert(line_id, (t, l));
                }
                for (s, seat) in line.seats.iter().enumerate() {
                    if let Some(seat_id) = seat.seat_id {
                        seat_index.insert(seat_id, (t, l, s));
                    }
                }
            }
        }

        Self {
            theaters,
            theater_index,
            line_index,
            seat_index,
        }
    }

    pub fn theaters(&self) -> &[Theater] {
        &self.theaters
    }

    pub fn theater(&self, theater_id: TheaterId) -> Option<&Theater> {
        self.theater_index
            .get(&theater_id)
            .map(|&t| &self.theaters[t])
    }

    pub fn line(&self, line_id: LineId) -> Option<&Line> {
        self.line_index
            .get(&line_id)
            .map(|&(t, l)| &self.theaters[t].lines[l])
    }

    pub fn seat(&self, seat_id: SeatId) -> Option<&Seat> {
        self.seat_index
            .get(&seat_id)
            .map(|&(t, l, s)| &self.theaters[t].lines[l].seats[s])
    }

    /// Owning theater of a line.
    pub fn theater_of_line(&self, line_id: LineId) -> Option<&Theater> {
        self.line_index
            .get(&line_id)
            .map(|&(t, _)| &self.theaters[t])
    }

    /// Owning line of a seat.
    pub fn line_of_seat(&self, seat_id: SeatId) -> Option<&Line> {
        self.seat_index
            .get(&seat_id)
            .map(|&(t, l, _)| &self.theaters[t].lines[l])
    }

    pub fn theater_of_seat(&self, seat_id: SeatId) -> Option<&Theater> {
        self.seat_index
            .get(&seat_id)
            .map(|&(t, _, _)| &self.theaters[t])
    }

    pub fn seat_count(&self) -> usize {
        self.seat_index.len()
    }
}
