//! Canonical query shapes of the reservation domain.
//!
//! # Responsibility
//! - Produce every specification repositories and the data manager use.
//! - Keep table/column knowledge out of call sites.
//!
//! # Invariants
//! - Returned specifications are backend-agnostic.
//! - Boolean composition requires an explicit operator on [`PendingComposite`].

use crate::db::schema::{
    film_types, films, lines, seances, seat_seance_status, seats, theaters, user_roles, users,
};
use crate::model::film::{FilmId, FilmTypeId};
use crate::model::seance::SeanceId;
use crate::model::theater::{LineId, SeatId, TheaterId};
use crate::model::user::UserId;
use crate::query::specification::{
    ColumnRef, Condition, PendingComposite, Specification, SqlValue,
};
use crate::repo::entity::{ChildEntity, TableEntity};

/// Stateless producer of specifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpecificationFactory;

impl SpecificationFactory {
    /// Matches every row.
    pub fn any(&self) -> Specification {
        Specification::any()
    }

    /// Matches rows of `T` with the given identity.
    pub fn by_id<T: TableEntity>(&self, id: i64) -> Specification {
        self.by_id_column(T::ID, id)
    }

    /// Matches child rows of `T` owned by `parent_id`.
    pub fn by_parent_id<T: ChildEntity>(&self, parent_id: i64) -> Specification {
        self.column_equals(T::PARENT, parent_id)
    }

    pub fn by_id_column(&self, id_column: ColumnRef, id: i64) -> Specification {
        self.column_equals(id_column, id)
    }

    /// Pairs two specifications; the caller picks AND/OR on the result.
    pub fn composite(&self, left: Specification, right: Specification) -> PendingComposite {
        PendingComposite::new(left, right)
    }

    pub fn theater_by_id(&self, theater_id: TheaterId) -> Specification {
        self.column_equals(theaters::ID, theater_id)
    }

    pub fn any_theater(&self) -> Specification {
        self.any()
    }

    pub fn lines_by_theater_id(&self, theater_id: TheaterId) -> Specification {
        self.column_equals(lines::THEATER_ID, theater_id)
    }

    pub fn seats_by_line_id(&self, line_id: LineId) -> Specification {
        self.column_equals(seats::LINE_ID, line_id)
    }

    /// Matches seats of any listed line. An empty list matches nothing.
    pub fn seats_by_line_ids(&self, line_ids: &[LineId]) -> Specification {
        Specification::leaf(
            seats::LINE_ID,
            Condition::In(line_ids.iter().copied().map(SqlValue::Integer).collect()),
        )
    }

    pub fn film_by_id(&self, film_id: FilmId) -> Specification {
        self.column_equals(films::ID, film_id)
    }

    pub fn any_film(&self) -> Specification {
        self.any()
    }

    pub fn film_type_by_id(&self, film_type_id: FilmTypeId) -> Specification {
        self.column_equals(film_types::ID, film_type_id)
    }

    pub fn seance_by_id(&self, seance_id: SeanceId) -> Specification {
        self.column_equals(seances::ID, seance_id)
    }

    pub fn any_seance(&self) -> Specification {
        self.any()
    }

    pub fn mapper_by_seat_id(&self, seat_id: SeatId) -> Specification {
        self.column_equals(seat_seance_status::SEAT_ID, seat_id)
    }

    pub fn mapper_by_seance_id(&self, seance_id: SeanceId) -> Specification {
        self.column_equals(seat_seance_status::SEANCE_ID, seance_id)
    }

    pub fn user_by_id(&self, user_id: UserId) -> Specification {
        self.column_equals(users::ID, user_id)
    }

    pub fn user_by_login(&self, login: &str) -> Specification {
        self.column_equals(users::LOGIN, login)
    }

    pub fn user_by_password(&self, password: &str) -> Specification {
        self.column_equals(users::PASSWORD, password)
    }

    /// Join predicate `user_roles.role_id = users.role_id`.
    pub fn role_id_equals_user_role_id(&self) -> Specification {
        Specification::leaf(user_roles::ID, Condition::EqualsColumn(users::ROLE_ID))
    }

    fn column_equals(&self, column: ColumnRef, value: impl Into<SqlValue>) -> Specification {
        Specification::leaf(column, Condition::Equals(value.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::SpecificationFactory;
    use crate::model::theater::{Line, Seat};
    use crate::query::specification::{BoolOp, SpecNode};

    #[test]
    fn generic_and_named_shapes_agree() {
        let factory = SpecificationFactory;
        assert_eq!(
            factory.by_parent_id::<Line>(4),
            factory.lines_by_theater_id(4)
        );
        assert_eq!(factory.by_parent_id::<Seat>(9), factory.seats_by_line_id(9));
        assert_eq!(factory.by_id::<Seat>(1).to_string(), "seats.seat_id = 1");
    }

    #[test]
    fn composite_operator_is_chosen_by_caller() {
        let factory = SpecificationFactory;
        let spec = factory
            .composite(factory.mapper_by_seat_id(1), factory.mapper_by_seance_id(2))
            .with_operator(BoolOp::And);
        assert!(matches!(
            spec.node(),
            SpecNode::Composite { op: BoolOp::And, .. }
        ));
        assert_eq!(
            spec.to_string(),
            "(seat_seance_status.seat_id = 1 AND seat_seance_status.seance_id = 2)"
        );
    }
}
