//! Screenings and per-seat booking state.

use crate::model::film::FilmId;
use crate::model::theater::{SeatId, TheaterId};
use serde::{Deserialize, Serialize};

pub type SeanceId = i64;
pub type StatusMapperId = i64;

/// Scheduled screening of a film at a theater.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seance {
    pub seance_id: Option<SeanceId>,
    pub film_id: FilmId,
    /// Set from the theater when the seance is created for it.
    pub theater_id: Option<TheaterId>,
    /// Unix epoch seconds.
    pub starts_at: i64,
}

impl Seance {
    pub fn new(film_id: FilmId, starts_at: i64) -> Self {
        Self {
            seance_id: None,
            film_id,
            theater_id: None,
            starts_at,
        }
    }
}

/// Booking state of one seat for one seance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatSeanceStatus {
    Free,
    Reserved,
    Sold,
}

impl SeatSeanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Reserved => "reserved",
            Self::Sold => "sold",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "free" => Some(Self::Free),
            "reserved" => Some(Self::Reserved),
            "sold" => Some(Self::Sold),
            _ => None,
        }
    }
}

/// Status row for a (seat, seance) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatSeanceStatusMapper {
    pub mapper_id: Option<StatusMapperId>,
    pub seat_id: SeatId,
    pub seance_id: SeanceId,
    pub status: SeatSeanceStatus,
}

impl SeatSeanceStatusMapper {
    pub fn new(seat_id: SeatId, seance_id: SeanceId, status: SeatSeanceStatus) -> Self {
        Self {
            mapper_id: None,
            seat_id,
            seance_id,
            status,
        }
    }
}
