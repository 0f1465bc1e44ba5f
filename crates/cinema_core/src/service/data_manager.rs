//! Compound persistence operations over the theater and seance graphs.
//!
//! # Responsibility
//! - Decompose theater graphs into flat line and seat writes (parent first).
//! - Reassemble theater graphs from per-level queries on read.
//! - Initialize per-seat status mappers when a seance is created.
//! - Reconcile incoming graphs against storage through the existence oracle.
//!
//! # Invariants
//! - Compound operations are not atomic; a failed step leaves earlier steps
//!   committed and is returned to the caller unchanged.
//! - Children always receive their parent's identity before they are written.
//! - Reconciliation never deletes rows missing from the incoming graph.

use crate::db::schema::{lines, seances, seats, theaters};
use crate::model::film::{Film, FilmType, FilmTypeId};
use crate::model::graph::TheaterGraph;
use crate::model::seance::{Seance, SeanceId, SeatSeanceStatus, SeatSeanceStatusMapper};
use crate::model::theater::{Line, Seat, Theater, TheaterId};
use crate::model::user::{User, UserId, UserRole};
use crate::query::factory::SpecificationFactory;
use crate::repo::entity::TableEntity;
use crate::repo::existence::{EntityKey, ExistenceOracle, SqlExistenceOracle};
use crate::repo::film_repo::film_repository;
use crate::repo::repository::{RepoError, Repository};
use crate::repo::sql_repository::{SqlContext, SqlRepository};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ManagerResult<T> = Result<T, ManagerError>;

/// Errors from compound persistence operations.
#[derive(Debug)]
pub enum ManagerError {
    /// A single expected entity does not exist.
    NotFound {
        entity: &'static str,
        filter: String,
    },
    /// No role matches the user's credentials.
    RoleNotFound { login: String },
    /// Repository-level failure.
    Repo(RepoError),
}

impl ManagerError {
    /// Returns `true` for failures the caller must not retry or recover from.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::RoleNotFound { .. })
    }
}

impl Display for ManagerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, filter } => write!(f, "{entity} not found: {filter}"),
            Self::RoleNotFound { login } => write!(f, "no role found for user `{login}`"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ManagerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ManagerError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, filter } => Self::NotFound { entity, filter },
            other => Self::Repo(other),
        }
    }
}

/// Counts of child writes performed by `update_theater`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub lines_inserted: usize,
    pub lines_updated: usize,
    pub seats_inserted: usize,
    pub seats_updated: usize,
}

/// One repository per entity type.
pub struct Repositories<'conn> {
    pub theaters: Box<dyn Repository<Theater> + 'conn>,
    pub lines: Box<dyn Repository<Line> + 'conn>,
    pub seats: Box<dyn Repository<Seat> + 'conn>,
    pub film_types: Box<dyn Repository<FilmType> + 'conn>,
    pub films: Box<dyn Repository<Film> + 'conn>,
    pub seances: Box<dyn Repository<Seance> + 'conn>,
    pub status_mappers: Box<dyn Repository<SeatSeanceStatusMapper> + 'conn>,
    pub users: Box<dyn Repository<User> + 'conn>,
    pub user_roles: Box<dyn Repository<UserRole> + 'conn>,
}

impl<'conn> Repositories<'conn> {
    /// Builds SQL-backed repositories sharing one context.
    pub fn sql(ctx: SqlContext<'conn>) -> Self {
        Self {
            theaters: Box::new(SqlRepository::<Theater>::new(ctx)),
            lines: Box::new(SqlRepository::<Line>::new(ctx)),
            seats: Box::new(SqlRepository::<Seat>::new(ctx)),
            film_types: Box::new(SqlRepository::<FilmType>::new(ctx)),
            films: Box::new(film_repository(ctx)),
            seances: Box::new(SqlRepository::<Seance>::new(ctx)),
            status_mappers: Box::new(SqlRepository::<SeatSeanceStatusMapper>::new(ctx)),
            users: Box::new(SqlRepository::<User>::new(ctx)),
            user_roles: Box::new(SqlRepository::<UserRole>::new(ctx)),
        }
    }
}

/// Orchestrates multi-entity reads and writes over injected repositories.
pub struct DataManager<'conn> {
    repos: Repositories<'conn>,
    oracle: Box<dyn ExistenceOracle + 'conn>,
    factory: SpecificationFactory,
}

impl<'conn> DataManager<'conn> {
    pub fn new(repos: Repositories<'conn>, oracle: Box<dyn ExistenceOracle + 'conn>) -> Self {
        Self {
            repos,
            oracle,
            factory: SpecificationFactory,
        }
    }

    /// Wires SQL repositories and the SQL existence oracle from one context.
    pub fn sql(ctx: SqlContext<'conn>) -> Self {
        Self::new(
            Repositories::sql(ctx),
            Box::new(SqlExistenceOracle::new(ctx.compiler, ctx.storage)),
        )
    }

    /// Persists a theater, then every line and seat it carries.
    ///
    /// Identities are assigned on the way down; on failure the theater and
    /// children written before the failing step stay persisted.
    pub fn create_theater(&self, theater: &mut Theater) -> ManagerResult<TheaterId> {
        info!(
            "event=theater_create module=service status=start lines={} seats={}",
            theater.lines.len(),
            theater.seat_count()
        );
        let theater_id = self.repos.theaters.add(theater)?;
        for line in theater.lines.iter_mut() {
            line.theater_id = Some(theater_id);
            let line_id = self.repos.lines.add(line)?;
            for seat in line.seats.iter_mut() {
                seat.line_id = Some(line_id);
                self.repos.seats.add(seat)?;
            }
        }
        info!(
            "event=theater_create module=service status=ok theater_id={}",
            theater_id
        );
        Ok(theater_id)
    }

    pub fn create_film_type(&self, film_type: &mut FilmType) -> ManagerResult<FilmTypeId> {
        Ok(self.repos.film_types.add(film_type)?)
    }

    /// Persists a film referencing an already persisted film type.
    pub fn create_film(&self, film: &mut Film) -> ManagerResult<i64> {
        Ok(self.repos.films.add(film)?)
    }

    pub fn create_user(&self, user: &mut User) -> ManagerResult<UserId> {
        Ok(self.repos.users.add(user)?)
    }

    /// Persists a seance for `theater` and one `Free` mapper per seat.
    ///
    /// The seance row is written first so every mapper can reference it.
    /// Seats are read from storage, not from the in-memory graph.
    pub fn create_seance_for_theater(
        &self,
        seance: &mut Seance,
        theater: &Theater,
    ) -> ManagerResult<Vec<SeatSeanceStatusMapper>> {
        let theater_id = theater
            .theater_id
            .ok_or(RepoError::MissingId(theaters::ID))?;
        info!(
            "event=seance_create module=service status=start theater_id={}",
            theater_id
        );

        seance.theater_id = Some(theater_id);
        let seance_id = self.repos.seances.add(seance)?;

        let mut mappers: Vec<SeatSeanceStatusMapper> = self
            .stored_seats(theater_id)?
            .into_iter()
            .filter_map(|seat| seat.seat_id)
            .map(|seat_id| SeatSeanceStatusMapper::new(seat_id, seance_id, SeatSeanceStatus::Free))
            .collect();
        self.repos.status_mappers.add_all(&mut mappers)?;

        info!(
            "event=seance_create module=service status=ok seance_id={} mappers={}",
            seance_id,
            mappers.len()
        );
        Ok(mappers)
    }

    /// Loads one theater with its lines and seats.
    pub fn get_theater(&self, theater_id: TheaterId) -> ManagerResult<Theater> {
        let mut theater = self
            .repos
            .theaters
            .query_one(&self.factory.theater_by_id(theater_id))?;
        self.attach_lines(&mut theater)?;
        Ok(theater)
    }

    /// Loads every theater with its lines and seats, ordered by identity.
    pub fn get_all_theaters(&self) -> ManagerResult<Vec<Theater>> {
        let mut items = self.repos.theaters.query(&self.factory.any_theater())?;
        for theater in items.iter_mut() {
            self.attach_lines(theater)?;
        }
        Ok(items)
    }

    /// Loads every theater into a navigable graph.
    pub fn load_theater_graph(&self) -> ManagerResult<TheaterGraph> {
        let graph = TheaterGraph::new(self.get_all_theaters()?);
        info!(
            "event=theater_graph_load module=service status=ok theaters={} seats={}",
            graph.theaters().len(),
            graph.seat_count()
        );
        Ok(graph)
    }

    pub fn get_film(&self, film_id: i64) -> ManagerResult<Film> {
        Ok(self.repos.films.query_one(&self.factory.film_by_id(film_id))?)
    }

    pub fn get_seance(&self, seance_id: SeanceId) -> ManagerResult<Seance> {
        Ok(self
            .repos
            .seances
            .query_one(&self.factory.seance_by_id(seance_id))?)
    }

    pub fn get_all_seances(&self) -> ManagerResult<Vec<Seance>> {
        Ok(self.repos.seances.query(&self.factory.any_seance())?)
    }

    /// Loads a stored user; the role is left unresolved.
    pub fn get_user(&self, user_id: UserId) -> ManagerResult<User> {
        Ok(self.repos.users.query_one(&self.factory.user_by_id(user_id))?)
    }

    /// Loads the status of one seat for one seance.
    pub fn get_seat_seance_status_mapper(
        &self,
        seat: &Seat,
        seance: &Seance,
    ) -> ManagerResult<SeatSeanceStatusMapper> {
        let seat_id = seat.seat_id.ok_or(RepoError::MissingId(seats::ID))?;
        let seance_id = seance.seance_id.ok_or(RepoError::MissingId(seances::ID))?;
        let spec = self
            .factory
            .composite(
                self.factory.mapper_by_seat_id(seat_id),
                self.factory.mapper_by_seance_id(seance_id),
            )
            .and();
        Ok(self.repos.status_mappers.query_one(&spec)?)
    }

    pub fn get_status_mappers_for_seance(
        &self,
        seance_id: SeanceId,
    ) -> ManagerResult<Vec<SeatSeanceStatusMapper>> {
        Ok(self
            .repos
            .status_mappers
            .query(&self.factory.mapper_by_seance_id(seance_id))?)
    }

    /// Updates the theater row, then inserts or updates each carried child.
    ///
    /// Every line and seat is decided on its own through the existence
    /// oracle. Stored children absent from `theater` are left untouched.
    pub fn update_theater(&self, theater: &mut Theater) -> ManagerResult<ReconcileReport> {
        self.repos.theaters.update(theater)?;
        let theater_id = theater
            .theater_id
            .ok_or(RepoError::MissingId(theaters::ID))?;
        info!(
            "event=theater_update module=service status=start theater_id={}",
            theater_id
        );

        let mut report = ReconcileReport::default();
        for line in theater.lines.iter_mut() {
            line.theater_id = Some(theater_id);
            if self.upsert(self.repos.lines.as_ref(), line)? {
                report.lines_inserted += 1;
            } else {
                report.lines_updated += 1;
            }

            let line_id = line.line_id.ok_or(RepoError::MissingId(lines::ID))?;
            for seat in line.seats.iter_mut() {
                seat.line_id = Some(line_id);
                if self.upsert(self.repos.seats.as_ref(), seat)? {
                    report.seats_inserted += 1;
                } else {
                    report.seats_updated += 1;
                }
            }
        }

        info!(
            "event=theater_update module=service status=ok theater_id={} lines_inserted={} lines_updated={} seats_inserted={} seats_updated={}",
            theater_id,
            report.lines_inserted,
            report.lines_updated,
            report.seats_inserted,
            report.seats_updated
        );
        Ok(report)
    }

    /// Updates the mappers that are already persisted and skips the rest.
    pub fn update_seat_seance_mappers(
        &self,
        mappers: &[SeatSeanceStatusMapper],
    ) -> ManagerResult<usize> {
        let mut updated = 0;
        for mapper in mappers {
            if self.oracle.is_persisted(EntityKey::of(mapper))? {
                self.repos.status_mappers.update(mapper)?;
                updated += 1;
            }
        }
        info!(
            "event=mappers_update module=service status=ok requested={} updated={}",
            mappers.len(),
            updated
        );
        Ok(updated)
    }

    /// Resolves the role matching the user's login and password.
    ///
    /// Fails with `RoleNotFound` when the credentials match no user.
    pub fn wire_user_with_role(&self, user: &mut User) -> ManagerResult<()> {
        let credentials = self
            .factory
            .composite(
                self.factory.user_by_login(&user.login),
                self.factory.user_by_password(&user.password),
            )
            .and();
        let spec = self
            .factory
            .composite(self.factory.role_id_equals_user_role_id(), credentials)
            .and();

        let role = self.repos.user_roles.query(&spec)?.into_iter().next();
        let Some(role) = role else {
            error!("event=role_wire module=service status=error error_code=role_not_found");
            return Err(ManagerError::RoleNotFound {
                login: user.login.clone(),
            });
        };

        if let Some(role_id) = role.role_id {
            user.role_id = role_id;
        }
        user.role = Some(role);
        Ok(())
    }

    fn attach_lines(&self, theater: &mut Theater) -> ManagerResult<()> {
        let theater_id = theater
            .theater_id
            .ok_or(RepoError::MissingId(theaters::ID))?;
        let mut lines = self
            .repos
            .lines
            .query(&self.factory.lines_by_theater_id(theater_id))?;
        for line in lines.iter_mut() {
            line.theater_id = Some(theater_id);
            let line_id = line.line_id.ok_or(RepoError::MissingId(lines::ID))?;
            line.seats = self
                .repos
                .seats
                .query(&self.factory.seats_by_line_id(line_id))?;
            for seat in line.seats.iter_mut() {
                seat.line_id = Some(line_id);
            }
        }
        theater.lines = lines;
        Ok(())
    }

    fn stored_seats(&self, theater_id: TheaterId) -> ManagerResult<Vec<Seat>> {
        let line_ids: Vec<i64> = self
            .repos
            .lines
            .query(&self.factory.lines_by_theater_id(theater_id))?
            .into_iter()
            .filter_map(|line| line.line_id)
            .collect();
        if line_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .repos
            .seats
            .query(&self.factory.seats_by_line_ids(&line_ids))?)
    }

    /// Returns `true` when the item was inserted, `false` when updated.
    fn upsert<T: TableEntity>(
        &self,
        repo: &dyn Repository<T>,
        item: &mut T,
    ) -> ManagerResult<bool> {
        if self.oracle.is_persisted(EntityKey::of(&*item))? {
            repo.update(item)?;
            Ok(false)
        } else {
            repo.add(item)?;
            Ok(true)
        }
    }
}
