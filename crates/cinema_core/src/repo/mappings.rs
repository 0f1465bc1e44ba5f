//! Table mappings of every persisted entity.
//!
//! # Responsibility
//! - Bind each model type to its table, sequence and columns.
//! - Parse result rows into entities, flagging unknown reference codes.
//!
//! # Invariants
//! - Nested collections (`Theater::lines`, `Line::seats`) and wired user roles
//!   are never written; only parent ids are.
//! - Unknown status text is invalid data, unknown seat-type codes are
//!   dangling references.

use crate::db::schema::{
    film_types, films, lines, seances, seat_seance_status, seats, theaters, user_roles, users,
};
use crate::model::film::{Film, FilmType};
use crate::model::seance::{Seance, SeatSeanceStatus, SeatSeanceStatusMapper};
use crate::model::theater::{Line, Seat, SeatType, Theater};
use crate::model::user::{User, UserRole};
use crate::query::compiler::ColumnValues;
use crate::query::specification::ColumnRef;
use crate::repo::entity::{
    required_id, ChildEntity, DanglingReference, FromRow, MapOutcome, TableEntity,
};
use crate::repo::repository::{RepoError, RepoResult};
use crate::storage::Row;

impl TableEntity for Theater {
    const ENTITY: &'static str = "theater";
    const TABLE: &'static str = theaters::TABLE;
    const SEQUENCE: &'static str = theaters::SEQUENCE;
    const ID: ColumnRef = theaters::ID;
    const COLUMNS: &'static [ColumnRef] = theaters::COLUMNS;

    fn id(&self) -> Option<i64> {
        self.theater_id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.theater_id = id;
    }

    fn column_values(&self) -> RepoResult<ColumnValues> {
        Ok(ColumnValues::new(theaters::ID.column)
            .set(theaters::ID.column, self.theater_id)
            .set(theaters::NAME.column, self.name.as_str())
            .set(theaters::ADDRESS.column, self.address.as_str()))
    }
}

impl FromRow for Theater {
    fn from_row(row: &Row) -> RepoResult<MapOutcome<Self>> {
        Ok(MapOutcome::Mapped(Theater {
            theater_id: Some(row.get_i64(theaters::ID.column)?),
            name: row.get_text(theaters::NAME.column)?,
            address: row.get_text(theaters::ADDRESS.column)?,
            lines: Vec::new(),
        }))
    }
}

impl TableEntity for Line {
    const ENTITY: &'static str = "line";
    const TABLE: &'static str = lines::TABLE;
    const SEQUENCE: &'static str = lines::SEQUENCE;
    const ID: ColumnRef = lines::ID;
    const COLUMNS: &'static [ColumnRef] = lines::COLUMNS;

    fn id(&self) -> Option<i64> {
        self.line_id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.line_id = id;
    }

    fn column_values(&self) -> RepoResult<ColumnValues> {
        let theater_id = required_id(self.theater_id, lines::THEATER_ID)?;
        Ok(ColumnValues::new(lines::ID.column)
            .set(lines::ID.column, self.line_id)
            .set(lines::THEATER_ID.column, theater_id)
            .set(lines::NUMBER.column, self.number))
    }
}

impl ChildEntity for Line {
    const PARENT: ColumnRef = lines::THEATER_ID;
}

impl FromRow for Line {
    fn from_row(row: &Row) -> RepoResult<MapOutcome<Self>> {
        Ok(MapOutcome::Mapped(Line {
            line_id: Some(row.get_i64(lines::ID.column)?),
            theater_id: Some(row.get_i64(lines::THEATER_ID.column)?),
            number: row.get_i64(lines::NUMBER.column)?,
            seats: Vec::new(),
        }))
    }
}

impl TableEntity for Seat {
    const ENTITY: &'static str = "seat";
    const TABLE: &'static str = seats::TABLE;
    const SEQUENCE: &'static str = seats::SEQUENCE;
    const ID: ColumnRef = seats::ID;
    const COLUMNS: &'static [ColumnRef] = seats::COLUMNS;

    fn id(&self) -> Option<i64> {
        self.seat_id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.seat_id = id;
    }

    fn column_values(&self) -> RepoResult<ColumnValues> {
        let line_id = required_id(self.line_id, seats::LINE_ID)?;
        Ok(ColumnValues::new(seats::ID.column)
            .set(seats::ID.column, self.seat_id)
            .set(seats::LINE_ID.column, line_id)
            .set(seats::NUMBER.column, self.number)
            .set(seats::SEAT_TYPE_ID.column, self.seat_type.id()))
    }
}

impl ChildEntity for Seat {
    const PARENT: ColumnRef = seats::LINE_ID;
}

impl FromRow for Seat {
    fn from_row(row: &Row) -> RepoResult<MapOutcome<Self>> {
        let seat_id = row.get_i64(seats::ID.column)?;
        let seat_type_id = row.get_i64(seats::SEAT_TYPE_ID.column)?;
        let Some(seat_type) = SeatType::from_id(seat_type_id) else {
            return Ok(MapOutcome::Dangling(DanglingReference {
                entity: Self::ENTITY,
                entity_id: seat_id,
                reference: seats::SEAT_TYPE_ID,
                reference_id: seat_type_id,
            }));
        };

        Ok(MapOutcome::Mapped(Seat {
            seat_id: Some(seat_id),
            line_id: Some(row.get_i64(seats::LINE_ID.column)?),
            number: row.get_i64(seats::NUMBER.column)?,
            seat_type,
        }))
    }
}

impl TableEntity for FilmType {
    const ENTITY: &'static str = "film type";
    const TABLE: &'static str = film_types::TABLE;
    const SEQUENCE: &'static str = film_types::SEQUENCE;
    const ID: ColumnRef = film_types::ID;
    const COLUMNS: &'static [ColumnRef] = film_types::COLUMNS;

    fn id(&self) -> Option<i64> {
        self.film_type_id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.film_type_id = id;
    }

    fn column_values(&self) -> RepoResult<ColumnValues> {
        Ok(ColumnValues::new(film_types::ID.column)
            .set(film_types::ID.column, self.film_type_id)
            .set(film_types::NAME.column, self.name.as_str()))
    }
}

impl FromRow for FilmType {
    fn from_row(row: &Row) -> RepoResult<MapOutcome<Self>> {
        Ok(MapOutcome::Mapped(FilmType {
            film_type_id: Some(row.get_i64(film_types::ID.column)?),
            name: row.get_text(film_types::NAME.column)?,
        }))
    }
}

// Film rows need a film-type lookup; see `film_repo::FilmRowMapper`.
impl TableEntity for Film {
    const ENTITY: &'static str = "film";
    const TABLE: &'static str = films::TABLE;
    const SEQUENCE: &'static str = films::SEQUENCE;
    const ID: ColumnRef = films::ID;
    const COLUMNS: &'static [ColumnRef] = films::COLUMNS;

    fn id(&self) -> Option<i64> {
        self.film_id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.film_id = id;
    }

    fn column_values(&self) -> RepoResult<ColumnValues> {
        let film_type_id = required_id(self.film_type.film_type_id, films::FILM_TYPE_ID)?;
        Ok(ColumnValues::new(films::ID.column)
            .set(films::ID.column, self.film_id)
            .set(films::NAME.column, self.name.as_str())
            .set(films::FILM_TYPE_ID.column, film_type_id)
            .set(films::AGE_LIMIT_ID.column, self.age_limit.id()))
    }
}

impl TableEntity for Seance {
    const ENTITY: &'static str = "seance";
    const TABLE: &'static str = seances::TABLE;
    const SEQUENCE: &'static str = seances::SEQUENCE;
    const ID: ColumnRef = seances::ID;
    const COLUMNS: &'static [ColumnRef] = seances::COLUMNS;

    fn id(&self) -> Option<i64> {
        self.seance_id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.seance_id = id;
    }

    fn column_values(&self) -> RepoResult<ColumnValues> {
        let theater_id = required_id(self.theater_id, seances::THEATER_ID)?;
        Ok(ColumnValues::new(seances::ID.column)
            .set(seances::ID.column, self.seance_id)
            .set(seances::FILM_ID.column, self.film_id)
            .set(seances::THEATER_ID.column, theater_id)
            .set(seances::STARTS_AT.column, self.starts_at))
    }
}

impl FromRow for Seance {
    fn from_row(row: &Row) -> RepoResult<MapOutcome<Self>> {
        Ok(MapOutcome::Mapped(Seance {
            seance_id: Some(row.get_i64(seances::ID.column)?),
            film_id: row.get_i64(seances::FILM_ID.column)?,
            theater_id: Some(row.get_i64(seances::THEATER_ID.column)?),
            starts_at: row.get_i64(seances::STARTS_AT.column)?,
        }))
    }
}

impl TableEntity for SeatSeanceStatusMapper {
    const ENTITY: &'static str = "seat seance status";
    const TABLE: &'static str = seat_seance_status::TABLE;
    const SEQUENCE: &'static str = seat_seance_status::SEQUENCE;
    const ID: ColumnRef = seat_seance_status::ID;
    const COLUMNS: &'static [ColumnRef] = seat_seance_status::COLUMNS;

    fn id(&self) -> Option<i64> {
        self.mapper_id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.mapper_id = id;
    }

    fn column_values(&self) -> RepoResult<ColumnValues> {
        Ok(ColumnValues::new(seat_seance_status::ID.column)
            .set(seat_seance_status::ID.column, self.mapper_id)
            .set(seat_seance_status::SEAT_ID.column, self.seat_id)
            .set(seat_seance_status::SEANCE_ID.column, self.seance_id)
            .set(seat_seance_status::STATUS.column, self.status.as_str()))
    }
}

impl FromRow for SeatSeanceStatusMapper {
    fn from_row(row: &Row) -> RepoResult<MapOutcome<Self>> {
        let status_text = row.get_text(seat_seance_status::STATUS.column)?;
        let status = SeatSeanceStatus::parse(&status_text).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid status `{status_text}` in {}",
                seat_seance_status::STATUS
            ))
        })?;

        Ok(MapOutcome::Mapped(SeatSeanceStatusMapper {
            mapper_id: Some(row.get_i64(seat_seance_status::ID.column)?),
            seat_id: row.get_i64(seat_seance_status::SEAT_ID.column)?,
            seance_id: row.get_i64(seat_seance_status::SEANCE_ID.column)?,
            status,
        }))
    }
}

impl TableEntity for UserRole {
    const ENTITY: &'static str = "user role";
    const TABLE: &'static str = user_roles::TABLE;
    const SEQUENCE: &'static str = user_roles::SEQUENCE;
    const ID: ColumnRef = user_roles::ID;
    const COLUMNS: &'static [ColumnRef] = user_roles::COLUMNS;

    fn id(&self) -> Option<i64> {
        self.role_id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.role_id = id;
    }

    fn column_values(&self) -> RepoResult<ColumnValues> {
        Ok(ColumnValues::new(user_roles::ID.column)
            .set(user_roles::ID.column, self.role_id)
            .set(user_roles::NAME.column, self.name.as_str())
            .set(user_roles::PERMISSION_LEVEL.column, self.permission_level))
    }
}

impl FromRow for UserRole {
    fn from_row(row: &Row) -> RepoResult<MapOutcome<Self>> {
        Ok(MapOutcome::Mapped(UserRole {
            role_id: Some(row.get_i64(user_roles::ID.column)?),
            name: row.get_text(user_roles::NAME.column)?,
            permission_level: row.get_i64(user_roles::PERMISSION_LEVEL.column)?,
        }))
    }
}

impl TableEntity for User {
    const ENTITY: &'static str = "user";
    const TABLE: &'static str = users::TABLE;
    const SEQUENCE: &'static str = users::SEQUENCE;
    const ID: ColumnRef = users::ID;
    const COLUMNS: &'static [ColumnRef] = users::COLUMNS;

    fn id(&self) -> Option<i64> {
        self.user_id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.user_id = id;
    }

    fn column_values(&self) -> RepoResult<ColumnValues> {
        Ok(ColumnValues::new(users::ID.column)
            .set(users::ID.column, self.user_id)
            .set(users::LOGIN.column, self.login.as_str())
            .set(users::PASSWORD.column, self.password.as_str())
            .set(users::ROLE_ID.column, self.role_id))
    }
}

impl FromRow for User {
    fn from_row(row: &Row) -> RepoResult<MapOutcome<Self>> {
        Ok(MapOutcome::Mapped(User {
            user_id: Some(row.get_i64(users::ID.column)?),
            login: row.get_text(users::LOGIN.column)?,
            password: row.get_text(users::PASSWORD.column)?,
            role_id: row.get_i64(users::ROLE_ID.column)?,
            role: None,
        }))
    }
}
