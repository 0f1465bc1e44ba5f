//! Physical seating hierarchy: theater, line, seat.

use serde::{Deserialize, Serialize};

pub type TheaterId = i64;
pub type LineId = i64;
pub type SeatId = i64;

/// Closed set of seat categories, persisted by numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatType {
    Standard,
    Comfort,
    Vip,
}

impl SeatType {
    pub fn id(self) -> i64 {
        match self {
            Self::Standard => 1,
            Self::Comfort => 2,
            Self::Vip => 3,
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(Self::Standard),
            2 => Some(Self::Comfort),
            3 => Some(Self::Vip),
            _ => None,
        }
    }
}

/// Theater with its owned, ordered lines.
///
/// `lines` is never stored in the `theaters` table; it is filled by graph
/// materialization and consumed by graph creation/reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theater {
    pub theater_id: Option<TheaterId>,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub lines: Vec<Line>,
}

impl Theater {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            theater_id: None,
            name: name.into(),
            address: address.into(),
            lines: Vec::new(),
        }
    }

    pub fn with_line(mut self, line: Line) -> Self {
        self.lines.push(line);
        self
    }

    /// Iterates every seat of every line in line order.
    pub fn seats(&self) -> impl Iterator<Item = &Seat> {
        self.lines.iter().flat_map(|line| line.seats.iter())
    }

    pub fn seat_count(&self) -> usize {
        self.lines.iter().map(|line| line.seats.len()).sum()
    }
}

/// Seating line (row) owned by one theater.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub line_id: Option<LineId>,
    /// Owning theater. Set by the data manager when the parent is known.
    pub theater_id: Option<TheaterId>,
    pub number: i64,
    #[serde(default)]
    pub seats: Vec<Seat>,
}

impl Line {
    pub fn new(number: i64) -> Self {
        Self {
            line_id: None,
            theater_id: None,
            number,
            seats: Vec::new(),
        }
    }

    pub fn with_seat(mut self, seat: Seat) -> Self {
        self.seats.push(seat);
        self
    }
}

/// Single seat owned by one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub seat_id: Option<SeatId>,
    /// Owning line. Set by the data manager when the parent is known.
    pub line_id: Option<LineId>,
    pub number: i64,
    pub seat_type: SeatType,
}

impl Seat {
    pub fn new(number: i64, seat_type: SeatType) -> Self {
        Self {
            seat_id: None,
            line_id: None,
            number,
            seat_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Line, Seat, SeatType, Theater};

    #[test]
    fn seat_type_codes_round_trip() {
        for seat_type in [SeatType::Standard, SeatType::Comfort, SeatType::Vip] {
            assert_eq!(SeatType::from_id(seat_type.id()), Some(seat_type));
        }
        assert_eq!(SeatType::from_id(42), None);
    }

    #[test]
    fn seat_count_spans_all_lines() {
        let theater = Theater::new("Odeon", "Main st. 1")
            .with_line(
                Line::new(1)
                    .with_seat(Seat::new(1, SeatType::Standard))
                    .with_seat(Seat::new(2, SeatType::Vip)),
            )
            .with_line(Line::new(2).with_seat(Seat::new(1, SeatType::Comfort)));

        assert_eq!(theater.seat_count(), 3);
        assert_eq!(theater.seats().count(), 3);
    }
}
