//! Film row mapping with nested reference resolution.
//!
//! # Responsibility
//! - Resolve each film row's film type through the film-type repository.
//! - Resolve the age-limit code against the closed `AgeLimitType` set.
//!
//! # Invariants
//! - A film whose film type or age limit does not resolve is reported as a
//!   dangling reference, never half-built.

use crate::db::schema::films;
use crate::model::film::{AgeLimitType, Film, FilmType};
use crate::query::factory::SpecificationFactory;
use crate::query::specification::ColumnRef;
use crate::repo::entity::{DanglingReference, MapOutcome, RowMapper, TableEntity};
use crate::repo::repository::{RepoResult, Repository};
use crate::repo::sql_repository::{SqlContext, SqlRepository};
use crate::storage::Row;

/// Maps film rows, looking up their film type per row.
pub struct FilmRowMapper<'conn> {
    film_types: SqlRepository<'conn, FilmType>,
    factory: SpecificationFactory,
}

impl<'conn> FilmRowMapper<'conn> {
    pub fn new(ctx: SqlContext<'conn>) -> Self {
        Self {
            film_types: SqlRepository::new(ctx),
            factory: SpecificationFactory,
        }
    }
}

impl RowMapper<Film> for FilmRowMapper<'_> {
    fn map_row(&self, row: &Row) -> RepoResult<MapOutcome<Film>> {
        let film_id = row.get_i64(films::ID.column)?;
        let dangling = |reference: ColumnRef, reference_id: i64| {
            MapOutcome::Dangling(DanglingReference {
                entity: Film::ENTITY,
                entity_id: film_id,
                reference,
                reference_id,
            })
        };

        let age_limit_id = row.get_i64(films::AGE_LIMIT_ID.column)?;
        let Some(age_limit) = AgeLimitType::from_id(age_limit_id) else {
            return Ok(dangling(films::AGE_LIMIT_ID, age_limit_id));
        };

        let film_type_id = row.get_i64(films::FILM_TYPE_ID.column)?;
        let film_type = self
            .film_types
            .query(&self.factory.film_type_by_id(film_type_id))?
            .into_iter()
            .next();
        let Some(film_type) = film_type else {
            return Ok(dangling(films::FILM_TYPE_ID, film_type_id));
        };

        Ok(MapOutcome::Mapped(Film {
            film_id: Some(film_id),
            name: row.get_text(films::NAME.column)?,
            film_type,
            age_limit,
        }))
    }
}

/// Builds the film repository with nested film-type resolution.
pub fn film_repository(ctx: SqlContext<'_>) -> SqlRepository<'_, Film> {
    SqlRepository::with_mapper(ctx, FilmRowMapper::new(ctx))
}
