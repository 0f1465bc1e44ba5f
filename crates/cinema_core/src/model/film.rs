//! Films and their reference types.

use serde::{Deserialize, Serialize};

pub type FilmId = i64;
pub type FilmTypeId = i64;

/// Film genre/format, stored as a reference table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmType {
    pub film_type_id: Option<FilmTypeId>,
    pub name: String,
}

impl FilmType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            film_type_id: None,
            name: name.into(),
        }
    }
}

/// Audience age restriction, persisted by numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeLimitType {
    AllAges,
    Over6,
    Over12,
    Over16,
    Over18,
}

impl AgeLimitType {
    pub fn id(self) -> i64 {
        match self {
            Self::AllAges => 1,
            Self::Over6 => 2,
            Self::Over12 => 3,
            Self::Over16 => 4,
            Self::Over18 => 5,
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(Self::AllAges),
            2 => Some(Self::Over6),
            3 => Some(Self::Over12),
            4 => Some(Self::Over16),
            5 => Some(Self::Over18),
            _ => None,
        }
    }
}

/// Film with resolved reference entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Film {
    pub film_id: Option<FilmId>,
    pub name: String,
    pub film_type: FilmType,
    pub age_limit: AgeLimitType,
}

impl Film {
    pub fn new(name: impl Into<String>, film_type: FilmType, age_limit: AgeLimitType) -> Self {
        Self {
            film_id: None,
            name: name.into(),
            film_type,
            age_limit,
        }
    }
}
