//! Parameterised filter query builder.
//!
//! [`FilterQuery`] pairs every condition it appends with the value bound to
//! that condition's placeholder, and renders the SQL text and the argument
//! list together. SQL text is assembled only from `&'static str` pieces and
//! generated `?N` ordinals; values travel separately as [`FilterValue`]s.

use rusqlite::types::{ToSql, ToSqlOutput, Value};
use std::fmt;

/// Comparison operator for a single condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// `=`
    Eq,
    /// `<=`
    AtMost,
}

impl Comparison {
    /// Returns the SQL operator.
    pub fn as_sql(self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::AtMost => "<=",
        }
    }
}

/// A raw filter value as received from the caller.
///
/// The value is opaque to the search engine. Coercion happens when the
/// statement is bound: the trimmed text must parse as a 64-bit integer to
/// match the integer columns it is compared with, otherwise binding fails
/// with [`rusqlite::Error::ToSqlConversionFailure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterValue(String);

impl FilterValue {
    /// Wraps a raw value.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the value as received.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Error for a value that is not a valid integer.
#[derive(Debug)]
struct IntegerCoercionError(String);

impl fmt::Display for IntegerCoercionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid input syntax for type integer: {:?}", self.0)
    }
}

impl std::error::Error for IntegerCoercionError {}

impl ToSql for FilterValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0
            .trim()
            .parse::<i64>()
            .map(|n| ToSqlOutput::Owned(Value::Integer(n)))
            .map_err(|_| {
                rusqlite::Error::ToSqlConversionFailure(Box::new(IntegerCoercionError(
                    self.0.clone(),
                )))
            })
    }
}

#[derive(Debug, Clone)]
struct Condition {
    column: &'static str,
    op: Comparison,
}

/// Builder for a conjunctive, positionally-bound `WHERE` clause.
///
/// ```
/// use carfinder_catalog::{Comparison, FilterQuery, FilterValue};
///
/// let mut query = FilterQuery::new("SELECT id FROM cars c");
/// query.and("c.year", Comparison::Eq, FilterValue::new("2020"));
/// query.and("c.price", Comparison::AtMost, FilterValue::new("15000"));
///
/// let (sql, values) = query.order_by("c.id").render();
/// assert_eq!(sql, "SELECT id FROM cars c WHERE c.year = ?1 AND c.price <= ?2 ORDER BY c.id");
/// assert_eq!(values.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct FilterQuery {
    base: &'static str,
    conditions: Vec<Condition>,
    values: Vec<FilterValue>,
    order_by: Option<&'static str>,
}

impl FilterQuery {
    /// Starts a query from a `SELECT ... FROM ...` base with no `WHERE`.
    pub fn new(base: &'static str) -> Self {
        Self {
            base,
            conditions: Vec::new(),
            values: Vec::new(),
            order_by: None,
        }
    }

    /// Appends `column <op> ?N`, where `N` is the 1-based position of
    /// `value` in the rendered argument list.
    pub fn and(&mut self, column: &'static str, op: Comparison, value: FilterValue) -> &mut Self {
        self.conditions.push(Condition { column, op });
        self.values.push(value);
        self
    }

    /// Appends the condition only when `value` is present and non-empty.
    pub fn and_present(
        &mut self,
        column: &'static str,
        op: Comparison,
        value: Option<&str>,
    ) -> &mut Self {
        match value {
            Some(v) if !v.is_empty() => self.and(column, op, FilterValue::new(v)),
            _ => self,
        }
    }

    /// Sets the `ORDER BY` expression.
    pub fn order_by(&mut self, expr: &'static str) -> &mut Self {
        self.order_by = Some(expr);
        self
    }

    /// Number of conditions appended so far.
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Returns `true` if no condition has been appended.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Renders the SQL text and the argument list bound to it.
    pub fn render(&self) -> (String, Vec<FilterValue>) {
        let mut sql = String::from(self.base);

        for (i, cond) in self.conditions.iter().enumerate() {
            let joiner = if i == 0 { " WHERE " } else { " AND " };
            sql.push_str(joiner);
            sql.push_str(cond.column);
            sql.push(' ');
            sql.push_str(cond.op.as_sql());
            sql.push_str(&format!(" ?{}", i + 1));
        }

        if let Some(expr) = self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(expr);
        }

        (sql, self.values.clone())
    }
}
