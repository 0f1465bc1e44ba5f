//! Immutable predicate trees over named columns.
//!
//! # Responsibility
//! - Represent leaf predicates (equality, column equality, membership).
//! - Represent AND/OR composition of two sub-predicates.
//!
//! # Invariants
//! - A `Specification` cannot be mutated after construction.
//! - Textual composition order is preserved; nothing is re-associated.
//! - A composite only exists once its operator has been chosen.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Scalar value bound into a compiled statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Text(String),
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Option<i64>> for SqlValue {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Self::Null, Self::Integer)
    }
}

impl Display for SqlValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "'{value}'"),
        }
    }
}

/// Table-qualified column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub table: &'static str,
    pub column: &'static str,
}

impl ColumnRef {
    pub const fn new(table: &'static str, column: &'static str) -> Self {
        Self { table, column }
    }
}

impl Display for ColumnRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// Boolean operator joining two specifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

impl BoolOp {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// Right-hand side of a leaf predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Column equals a bound value.
    Equals(SqlValue),
    /// Column equals another column (join predicate).
    EqualsColumn(ColumnRef),
    /// Column value is one of the listed values. Empty list matches nothing.
    In(Vec<SqlValue>),
}

/// Node of a predicate tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecNode {
    /// Matches every row.
    Any,
    Leaf {
        column: ColumnRef,
        condition: Condition,
    },
    Composite {
        left: Box<Specification>,
        right: Box<Specification>,
        op: BoolOp,
    },
}

/// Backend-agnostic row filter.
///
/// Built only through [`crate::query::factory::SpecificationFactory`];
/// compilers inspect it through [`Specification::node`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specification {
    node: SpecNode,
}

impl Specification {
    pub(crate) fn any() -> Self {
        Self {
            node: SpecNode::Any,
        }
    }

    pub(crate) fn leaf(column: ColumnRef, condition: Condition) -> Self {
        Self {
            node: SpecNode::Leaf { column, condition },
        }
    }

    fn composite(left: Specification, right: Specification, op: BoolOp) -> Self {
        Self {
            node: SpecNode::Composite {
                left: Box::new(left),
                right: Box::new(right),
                op,
            },
        }
    }

    pub fn node(&self) -> &SpecNode {
        &self.node
    }

    /// Returns every table referenced by this tree, in first-seen order.
    pub fn tables(&self) -> Vec<&'static str> {
        let mut tables = Vec::new();
        self.collect_tables(&mut tables);
        tables
    }

    fn collect_tables(&self, out: &mut Vec<&'static str>) {
        match &self.node {
            SpecNode::Any => {}
            SpecNode::Leaf { column, condition } => {
                push_unique(out, column.table);
                if let Condition::EqualsColumn(other) = condition {
                    push_unique(out, other.table);
                }
            }
            SpecNode::Composite { left, right, .. } => {
                left.collect_tables(out);
                right.collect_tables(out);
            }
        }
    }
}

fn push_unique(out: &mut Vec<&'static str>, table: &'static str) {
    if !out.contains(&table) {
        out.push(table);
    }
}

impl Display for Specification {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.node {
            SpecNode::Any => write!(f, "any"),
            SpecNode::Leaf { column, condition } => match condition {
                Condition::Equals(value) => write!(f, "{column} = {value}"),
                Condition::EqualsColumn(other) => write!(f, "{column} = {other}"),
                Condition::In(values) => {
                    let rendered = values
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ");
                    write!(f, "{column} IN ({rendered})")
                }
            },
            SpecNode::Composite { left, right, op } => {
                write!(f, "({left} {} {right})", op.as_sql())
            }
        }
    }
}

/// Two specifications awaiting their boolean operator.
///
/// Not usable as a filter until [`PendingComposite::and`],
/// [`PendingComposite::or`] or [`PendingComposite::with_operator`] is called.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a composite needs an operator before it can be used"]
pub struct PendingComposite {
    left: Specification,
    right: Specification,
}

impl PendingComposite {
    pub(crate) fn new(left: Specification, right: Specification) -> Self {
        Self { left, right }
    }

    pub fn with_operator(self, op: BoolOp) -> Specification {
        Specification::composite(self.left, self.right, op)
    }

    pub fn and(self) -> Specification {
        self.with_operator(BoolOp::And)
    }

    pub fn or(self) -> Specification {
        self.with_operator(BoolOp::Or)
    }
}
