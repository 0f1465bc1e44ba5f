use cinema_core::model::film::{AgeLimitType, Film, FilmType};
use cinema_core::model::seance::{Seance, SeatSeanceStatus, SeatSeanceStatusMapper};
use cinema_core::model::theater::{Line, Seat, SeatType, Theater};
use cinema_core::repo::repository::RepoError;
use cinema_core::{
    open_db_in_memory, DataManager, IntegrityPolicy, ManagerError, SqlCompiler, SqlContext,
    SqliteStorage,
};
use std::collections::BTreeSet;

fn create_film(manager: &DataManager<'_>) -> i64 {
    let mut drama = FilmType::new("drama");
    drama.film_type_id = Some(1);
    let mut film = Film::new("Arrival", drama, AgeLimitType::Over12);
    manager.create_film(&mut film).unwrap()
}

fn theater_with_seats(lines: i64, seats_per_line: i64) -> Theater {
    let mut theater = Theater::new("Aurora", "1 Main St");
    for line_number in 1..=lines {
        let mut line = Line::new(line_number);
        for seat_number in 1..=seats_per_line {
            line = line.with_seat(Seat::new(seat_number, SeatType::Standard));
        }
        theater = theater.with_line(line);
    }
    theater
}

#[test]
fn each_seance_gets_its_own_mapper_set() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteStorage::new(&conn);
    let compiler = SqlCompiler;
    let manager = DataManager::sql(SqlContext::new(
        &compiler,
        &storage,
        &storage,
        IntegrityPolicy::Skip,
    ));
    let film_id = create_film(&manager);

    let mut theater = theater_with_seats(1, 1);
    manager.create_theater(&mut theater).unwrap();
    let seat_id = theater.lines[0].seats[0].seat_id.unwrap();

    let mut first = Seance::new(film_id, 1_700_000_000);
    let first_mappers = manager
        .create_seance_for_theater(&mut first, &theater)
        .unwrap();
    let first_id = first.seance_id.unwrap();
    assert_eq!(first.theater_id, theater.theater_id);
    assert_eq!(first_mappers.len(), 1);
    assert_eq!(first_mappers[0].seat_id, seat_id);
    assert_eq!(first_mappers[0].seance_id, first_id);
    assert_eq!(first_mappers[0].status, SeatSeanceStatus::Free);

    let mut second = Seance::new(film_id, 1_700_007_200);
    manager
        .create_seance_for_theater(&mut second, &theater)
        .unwrap();
    let second_id = second.seance_id.unwrap();
    assert_ne!(first_id, second_id);

    let for_first = manager.get_status_mappers_for_seance(first_id).unwrap();
    let for_second = manager.get_status_mappers_for_seance(second_id).unwrap();
    assert_eq!(for_first.len(), 1);
    assert_eq!(for_second.len(), 1);
    assert_eq!(for_second[0].seat_id, seat_id);
    assert_ne!(for_first[0].mapper_id, for_second[0].mapper_id);
}

#[test]
fn mappers_cover_every_stored_seat_exactly_once() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteStorage::new(&conn);
    let compiler = SqlCompiler;
    let manager = DataManager::sql(SqlContext::new(
        &compiler,
        &storage,
        &storage,
        IntegrityPolicy::Skip,
    ));
    let film_id = create_film(&manager);

    let mut theater = theater_with_seats(3, 4);
    manager.create_theater(&mut theater).unwrap();
    let mut other = theater_with_seats(1, 2);
    manager.create_theater(&mut other).unwrap();

    let mut seance = Seance::new(film_id, 1_700_000_000);
    let mappers = manager
        .create_seance_for_theater(&mut seance, &theater)
        .unwrap();

    let expected: BTreeSet<_> = theater.seats().filter_map(|seat| seat.seat_id).collect();
    let mapped: BTreeSet<_> = mappers.iter().map(|mapper| mapper.seat_id).collect();
    assert_eq!(mappers.len(), 12);
    assert_eq!(mapped, expected);
    assert!(mappers
        .iter()
        .all(|mapper| mapper.status == SeatSeanceStatus::Free));

    let stored = manager
        .get_status_mappers_for_seance(seance.seance_id.unwrap())
        .unwrap();
    assert_eq!(stored, mappers);
}

#[test]
fn theater_without_seats_creates_seance_without_mappers() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteStorage::new(&conn);
    let compiler = SqlCompiler;
    let manager = DataManager::sql(SqlContext::new(
        &compiler,
        &storage,
        &storage,
        IntegrityPolicy::Skip,
    ));
    let film_id = create_film(&manager);

    let mut theater = Theater::new("Empty Hall", "nowhere");
    manager.create_theater(&mut theater).unwrap();

    let mut seance = Seance::new(film_id, 1_700_000_000);
    let mappers = manager
        .create_seance_for_theater(&mut seance, &theater)
        .unwrap();
    assert!(mappers.is_empty());

    let loaded = manager.get_seance(seance.seance_id.unwrap()).unwrap();
    assert_eq!(loaded, seance);
    assert_eq!(manager.get_all_seances().unwrap().len(), 1);
}

#[test]
fn unsaved_theater_is_rejected_before_any_write() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteStorage::new(&conn);
    let compiler = SqlCompiler;
    let manager = DataManager::sql(SqlContext::new(
        &compiler,
        &storage,
        &storage,
        IntegrityPolicy::Skip,
    ));
    let film_id = create_film(&manager);

    let theater = theater_with_seats(1, 1);
    let mut seance = Seance::new(film_id, 1_700_000_000);
    let err = manager
        .create_seance_for_theater(&mut seance, &theater)
        .unwrap_err();
    assert!(matches!(err, ManagerError::Repo(RepoError::MissingId(_))));
    assert!(seance.seance_id.is_none());
    assert!(manager.get_all_seances().unwrap().is_empty());
}

#[test]
fn status_lookup_and_update_touch_only_persisted_mappers() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteStorage::new(&conn);
    let compiler = SqlCompiler;
    let manager = DataManager::sql(SqlContext::new(
        &compiler,
        &storage,
        &storage,
        IntegrityPolicy::Skip,
    ));
    let film_id = create_film(&manager);

    let mut theater = theater_with_seats(1, 2);
    manager.create_theater(&mut theater).unwrap();
    let mut seance = Seance::new(film_id, 1_700_000_000);
    let mut mappers = manager
        .create_seance_for_theater(&mut seance, &theater)
        .unwrap();

    mappers[0].status = SeatSeanceStatus::Sold;
    let mut stray = SeatSeanceStatusMapper::new(
        theater.lines[0].seats[1].seat_id.unwrap(),
        seance.seance_id.unwrap(),
        SeatSeanceStatus::Reserved,
    );
    stray.mapper_id = None;
    let updated = manager
        .update_seat_seance_mappers(&[mappers[0].clone(), stray])
        .unwrap();
    assert_eq!(updated, 1);

    let first_seat = &theater.lines[0].seats[0];
    let second_seat = &theater.lines[0].seats[1];
    let sold = manager
        .get_seat_seance_status_mapper(first_seat, &seance)
        .unwrap();
    assert_eq!(sold.status, SeatSeanceStatus::Sold);
    let untouched = manager
        .get_seat_seance_status_mapper(second_seat, &seance)
        .unwrap();
    assert_eq!(untouched.status, SeatSeanceStatus::Free);

    let mut other = Seance::new(film_id, 1_700_009_000);
    other.seance_id = Some(999);
    assert!(matches!(
        manager
            .get_seat_seance_status_mapper(first_seat, &other)
            .unwrap_err(),
        ManagerError::NotFound { .. }
    ));
}

#[test]
fn seats_with_unknown_type_code_get_no_mapper_under_skip() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteStorage::new(&conn);
    let compiler = SqlCompiler;
    let manager = DataManager::sql(SqlContext::new(
        &compiler,
        &storage,
        &storage,
        IntegrityPolicy::Skip,
    ));
    let film_id = create_film(&manager);

    let mut theater = theater_with_seats(1, 2);
    manager.create_theater(&mut theater).unwrap();
    conn.execute(
        "INSERT INTO seats (seat_id, line_id, seat_number, seat_type_id) VALUES (500, ?1, 3, 42);",
        [theater.lines[0].line_id.unwrap()],
    )
    .unwrap();

    let mut seance = Seance::new(film_id, 1_700_000_000);
    let mappers = manager
        .create_seance_for_theater(&mut seance, &theater)
        .unwrap();

    let mapped: BTreeSet<_> = mappers.iter().map(|mapper| mapper.seat_id).collect();
    let known: BTreeSet<_> = theater.seats().filter_map(|seat| seat.seat_id).collect();
    assert_eq!(mapped, known);
    assert!(!mapped.contains(&500));
}
