use cinema_core::model::theater::{Line, Seat, SeatType, Theater};
use cinema_core::repo::existence::EntityKey;
use cinema_core::service::data_manager::Repositories;
use cinema_core::{
    open_db_in_memory, DataManager, ExistenceOracle, IntegrityPolicy, ManagerError,
    ReconcileReport, RepoResult, SqlCompiler, SqlContext, SqliteStorage,
};
use std::cell::RefCell;

fn two_seat_theater() -> Theater {
    Theater::new("Aurora", "1 Main St").with_line(
        Line::new(1)
            .with_seat(Seat::new(1, SeatType::Standard))
            .with_seat(Seat::new(2, SeatType::Standard)),
    )
}

#[test]
fn update_inserts_new_children_and_updates_existing_ones() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteStorage::new(&conn);
    let compiler = SqlCompiler;
    let manager = DataManager::sql(SqlContext::new(
        &compiler,
        &storage,
        &storage,
        IntegrityPolicy::Skip,
    ));

    let mut theater = two_seat_theater();
    let theater_id = manager.create_theater(&mut theater).unwrap();

    theater.name = "Aurora Deluxe".to_string();
    theater.lines[0].number = 10;
    theater.lines[0].seats[1].seat_type = SeatType::Comfort;
    theater.lines[0].seats.push(Seat::new(3, SeatType::Vip));
    theater
        .lines
        .push(Line::new(11).with_seat(Seat::new(1, SeatType::Standard)));

    let report = manager.update_theater(&mut theater).unwrap();
    assert_eq!(
        report,
        ReconcileReport {
            lines_inserted: 1,
            lines_updated: 1,
            seats_inserted: 2,
            seats_updated: 2,
        }
    );
    assert!(theater.seats().all(|seat| seat.seat_id.is_some()));

    let loaded = manager.get_theater(theater_id).unwrap();
    assert_eq!(loaded.name, "Aurora Deluxe");
    let numbers: Vec<_> = loaded.lines.iter().map(|line| line.number).collect();
    assert_eq!(numbers, vec![10, 11]);
    assert_eq!(loaded.lines[0].seats.len(), 3);
    assert_eq!(loaded.lines[0].seats[1].seat_type, SeatType::Comfort);
    assert_eq!(loaded.lines[1].seats[0].line_id, loaded.lines[1].line_id);
}

#[test]
fn children_missing_from_incoming_graph_are_left_in_storage() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteStorage::new(&conn);
    let compiler = SqlCompiler;
    let manager = DataManager::sql(SqlContext::new(
        &compiler,
        &storage,
        &storage,
        IntegrityPolicy::Skip,
    ));

    let mut theater = two_seat_theater();
    let theater_id = manager.create_theater(&mut theater).unwrap();

    theater.lines[0].seats.truncate(1);
    let report = manager.update_theater(&mut theater).unwrap();
    assert_eq!(report.seats_updated, 1);
    assert_eq!(report.seats_inserted, 0);

    let loaded = manager.get_theater(theater_id).unwrap();
    assert_eq!(loaded.lines[0].seats.len(), 2);
}

#[test]
fn unsaved_theater_cannot_be_updated() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteStorage::new(&conn);
    let compiler = SqlCompiler;
    let manager = DataManager::sql(SqlContext::new(
        &compiler,
        &storage,
        &storage,
        IntegrityPolicy::Skip,
    ));

    let mut ghost = two_seat_theater();
    ghost.theater_id = Some(77);
    assert!(matches!(
        manager.update_theater(&mut ghost).unwrap_err(),
        ManagerError::NotFound { .. }
    ));
}

/// Oracle that records every question and always answers "not stored".
#[derive(Default)]
struct NeverPersisted {
    asked: RefCell<Vec<EntityKey>>,
}

impl ExistenceOracle for NeverPersisted {
    fn is_persisted(&self, key: EntityKey) -> RepoResult<bool> {
        self.asked.borrow_mut().push(key);
        Ok(false)
    }
}

impl ExistenceOracle for &NeverPersisted {
    fn is_persisted(&self, key: EntityKey) -> RepoResult<bool> {
        (**self).is_persisted(key)
    }
}

#[test]
fn oracle_answer_alone_decides_insert_versus_update() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteStorage::new(&conn);
    let compiler = SqlCompiler;
    let ctx = SqlContext::new(&compiler, &storage, &storage, IntegrityPolicy::Skip);

    let mut theater = two_seat_theater();
    DataManager::sql(ctx).create_theater(&mut theater).unwrap();
    let old_line_id = theater.lines[0].line_id;

    let oracle = NeverPersisted::default();
    let manager = DataManager::new(Repositories::sql(ctx), Box::new(&oracle));
    let report = manager.update_theater(&mut theater).unwrap();

    assert_eq!(report.lines_inserted, 1);
    assert_eq!(report.seats_inserted, 2);
    assert_eq!(report.lines_updated + report.seats_updated, 0);
    assert_eq!(oracle.asked.borrow().len(), 3);
    assert_ne!(theater.lines[0].line_id, old_line_id);
    assert!(theater.lines[0]
        .seats
        .iter()
        .all(|seat| seat.line_id == theater.lines[0].line_id));
}
