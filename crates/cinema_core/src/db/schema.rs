//! Table, column and sequence names of the relational schema.
//!
//! Mirrors `migrations/0001_init.sql`; the first column of every table list is
//! its id column.

use crate::query::specification::ColumnRef;

pub mod theaters {
    use super::ColumnRef;

    pub const TABLE: &str = "theaters";
    pub const SEQUENCE: &str = "theater_id_seq";
    pub const ID: ColumnRef = ColumnRef::new(TABLE, "theater_id");
    pub const NAME: ColumnRef = ColumnRef::new(TABLE, "theater_name");
    pub const ADDRESS: ColumnRef = ColumnRef::new(TABLE, "address");
    pub const COLUMNS: &[ColumnRef] = &[ID, NAME, ADDRESS];
}

pub mod lines {
    use super::ColumnRef;

    pub const TABLE: &str = "lines";
    pub const SEQUENCE: &str = "line_id_seq";
    pub const ID: ColumnRef = ColumnRef::new(TABLE, "line_id");
    pub const THEATER_ID: ColumnRef = ColumnRef::new(TABLE, "theater_id");
    pub const NUMBER: ColumnRef = ColumnRef::new(TABLE, "line_number");
    pub const COLUMNS: &[ColumnRef] = &[ID, THEATER_ID, NUMBER];
}

pub mod seats {
    use super::ColumnRef;

    pub const TABLE: &str = "seats";
    pub const SEQUENCE: &str = "seat_id_seq";
    pub const ID: ColumnRef = ColumnRef::new(TABLE, "seat_id");
    pub const LINE_ID: ColumnRef = ColumnRef::new(TABLE, "line_id");
    pub const NUMBER: ColumnRef = ColumnRef::new(TABLE, "seat_number");
    pub const SEAT_TYPE_ID: ColumnRef = ColumnRef::new(TABLE, "seat_type_id");
    pub const COLUMNS: &[ColumnRef] = &[ID, LINE_ID, NUMBER, SEAT_TYPE_ID];
}

pub mod film_types {
    use super::ColumnRef;

    pub const TABLE: &str = "film_types";
    pub const SEQUENCE: &str = "film_type_id_seq";
    pub const ID: ColumnRef = ColumnRef::new(TABLE, "film_type_id");
    pub const NAME: ColumnRef = ColumnRef::new(TABLE, "film_type_name");
    pub const COLUMNS: &[ColumnRef] = &[ID, NAME];
}

pub mod films {
    use super::ColumnRef;

    pub const TABLE: &str = "films";
    pub const SEQUENCE: &str = "film_id_seq";
    pub const ID: ColumnRef = ColumnRef::new(TABLE, "film_id");
    pub const NAME: ColumnRef = ColumnRef::new(TABLE, "film_name");
    pub const FILM_TYPE_ID: ColumnRef = ColumnRef::new(TABLE, "film_type_id");
    pub const AGE_LIMIT_ID: ColumnRef = ColumnRef::new(TABLE, "age_limit_id");
    pub const COLUMNS: &[ColumnRef] = &[ID, NAME, FILM_TYPE_ID, AGE_LIMIT_ID];
}

pub mod seances {
    use super::ColumnRef;

    pub const TABLE: &str = "seances";
    pub const SEQUENCE: &str = "seance_id_seq";
    pub const ID: ColumnRef = ColumnRef::new(TABLE, "seance_id");
    pub const FILM_ID: ColumnRef = ColumnRef::new(TABLE, "film_id");
    pub const THEATER_ID: ColumnRef = ColumnRef::new(TABLE, "theater_id");
    pub const STARTS_AT: ColumnRef = ColumnRef::new(TABLE, "starts_at");
    pub const COLUMNS: &[ColumnRef] = &[ID, FILM_ID, THEATER_ID, STARTS_AT];
}

pub mod seat_seance_status {
    use super::ColumnRef;

    pub const TABLE: &str = "seat_seance_status";
    pub const SEQUENCE: &str = "seat_seance_status_id_seq";
    pub const ID: ColumnRef = ColumnRef::new(TABLE, "mapper_id");
    pub const SEAT_ID: ColumnRef = ColumnRef::new(TABLE, "seat_id");
    pub const SEANCE_ID: ColumnRef = ColumnRef::new(TABLE, "seance_id");
    pub const STATUS: ColumnRef = ColumnRef::new(TABLE, "status");
    pub const COLUMNS: &[ColumnRef] = &[ID, SEAT_ID, SEANCE_ID, STATUS];
}

pub mod user_roles {
    use super::ColumnRef;

    pub const TABLE: &str = "user_roles";
    pub const SEQUENCE: &str = "user_role_id_seq";
    pub const ID: ColumnRef = ColumnRef::new(TABLE, "role_id");
    pub const NAME: ColumnRef = ColumnRef::new(TABLE, "role_name");
    pub const PERMISSION_LEVEL: ColumnRef = ColumnRef::new(TABLE, "permission_level");
    pub const COLUMNS: &[ColumnRef] = &[ID, NAME, PERMISSION_LEVEL];
}

pub mod users {
    use super::ColumnRef;

    pub const TABLE: &str = "users";
    pub const SEQUENCE: &str = "user_id_seq";
    pub const ID: ColumnRef = ColumnRef::new(TABLE, "user_id");
    pub const LOGIN: ColumnRef = ColumnRef::new(TABLE, "login");
    pub const PASSWORD: ColumnRef = ColumnRef::new(TABLE, "password");
    pub const ROLE_ID: ColumnRef = ColumnRef::new(TABLE, "role_id");
    pub const COLUMNS: &[ColumnRef] = &[ID, LOGIN, PASSWORD, ROLE_ID];
}
