//! Typed expression and condition parts of a request body.
//!
//! The central type is [`FieldValue`]: every value a request carries is
//! either a literal leaf or a raw SQL fragment, and the two are separate
//! variants so the serializer can never confuse them. A raw expression is
//! sent verbatim while a string literal is always quoted. Whether a value
//! is literal or raw is decided by the variant the caller constructs,
//! never inferred from the value's shape.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::BuildError;

/// A typed request value: a literal leaf or a raw expression fragment.
///
/// # Examples
///
/// ```rust
/// use jserv_link::FieldValue;
///
/// // Literals quote on rendering, raw expressions pass through.
/// assert_eq!(FieldValue::from("d001").to_sql_literal(), "'d001'");
/// assert_eq!(FieldValue::expr("0").to_sql_literal(), "0");
/// assert_eq!(FieldValue::expr("sysdate").to_sql_literal(), "sysdate");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "v", rename_all = "lowercase")]
pub enum FieldValue {
    /// Quoted string literal.
    Str(String),
    /// Integer literal.
    Int(i64),
    /// Floating point literal.
    Real(f64),
    /// Boolean literal.
    Bool(bool),
    /// SQL null.
    Null,
    /// Raw expression fragment, sent without quoting.
    Expr(String),
}

impl FieldValue {
    /// Wrap a raw expression fragment. The serializer will never quote it.
    pub fn expr(fragment: impl Into<String>) -> Self {
        Self::Expr(fragment.into())
    }

    /// `true` when this value is a raw expression rather than a literal.
    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Expr(_))
    }

    /// Render as a SQL literal. String literals are single-quoted with
    /// embedded quotes doubled; raw expressions pass through verbatim.
    pub fn to_sql_literal(&self) -> String {
        match self {
            Self::Str(s) => format!("'{}'", s.replace('\'', "''")),
            Self::Int(i) => i.to_string(),
            Self::Real(r) => r.to_string(),
            Self::Bool(b) => if *b { "true" } else { "false" }.to_string(),
            Self::Null => "null".to_string(),
            Self::Expr(e) => e.clone(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        Self::Int(i as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(r: f64) -> Self {
        Self::Real(r)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Comparison operators accepted in predicates. Closed set; the tail two
/// are vendor extensions some backends accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "<>")]
    Ne,
    #[serde(rename = "like")]
    Like,
    #[serde(rename = "not like")]
    NotLike,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Ne => "<>",
            Self::Like => "like",
            Self::NotLike => "not like",
        };
        write!(f, "{}", s)
    }
}

/// One conjunct of a where clause. Multiple predicates on the same body
/// conjoin with AND in call order; no disjunction at this layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub op: Operator,
    /// Left operand, a column reference or raw expression text.
    pub lhs: String,
    /// Right operand, literal or raw expression.
    pub rhs: FieldValue,
}

/// A projected column or expression under an alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub expr: String,
    #[serde(rename = "as")]
    pub alias: String,
}

/// Join flavor. Wire codes follow the serv convention: "j" inner,
/// "l" left outer, "r" right outer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinType {
    #[serde(rename = "j")]
    Inner,
    #[serde(rename = "l")]
    Left,
    #[serde(rename = "r")]
    Right,
}

/// One join entry. Joins keep attachment order; some backends are
/// order-sensitive when planning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub jt: JoinType,
    pub tabl: String,
    pub alias: String,
    pub on: String,
}

/// Bodies that accept where predicates.
pub trait Filterable: Sized {
    /// Append a predicate; predicates conjoin with AND in call order.
    fn where_cond(self, op: Operator, lhs: impl Into<String>, rhs: impl Into<FieldValue>) -> Self;

    /// Shorthand for an equality predicate.
    fn where_eq(self, lhs: impl Into<String>, rhs: impl Into<FieldValue>) -> Self {
        self.where_cond(Operator::Eq, lhs, rhs)
    }
}

/// Bodies that accept join entries.
pub trait Joinable: Sized {
    /// Append a join; joins keep left-to-right attachment order.
    fn join(
        self,
        jt: JoinType,
        tabl: impl Into<String>,
        alias: impl Into<String>,
        on: impl Into<String>,
    ) -> Self;

    /// Inner join shorthand.
    fn j(self, tabl: impl Into<String>, alias: impl Into<String>, on: impl Into<String>) -> Self {
        self.join(JoinType::Inner, tabl, alias, on)
    }

    /// Left outer join shorthand.
    fn l(self, tabl: impl Into<String>, alias: impl Into<String>, on: impl Into<String>) -> Self {
        self.join(JoinType::Left, tabl, alias, on)
    }
}

/// Bodies that accept name/value assignments.
pub trait Assignable: Sized {
    /// Set a value for a column. Insert bodies verify the column was
    /// declared first and fail fast otherwise.
    fn nv(
        self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Result<Self, BuildError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_quoting() {
        assert_eq!(FieldValue::from("admin").to_sql_literal(), "'admin'");
        assert_eq!(FieldValue::from("it's").to_sql_literal(), "'it''s'");
        assert_eq!(FieldValue::from(42i64).to_sql_literal(), "42");
        assert_eq!(FieldValue::Null.to_sql_literal(), "null");
    }

    #[test]
    fn test_raw_expression_never_quoted() {
        let raw = FieldValue::expr("decode(r.stamp, null, sysdate, r.stamp)");
        assert!(raw.is_raw());
        assert_eq!(
            raw.to_sql_literal(),
            "decode(r.stamp, null, sysdate, r.stamp)"
        );
    }

    #[test]
    fn test_value_tagging_on_wire() {
        let lit = serde_json::to_value(FieldValue::from("d001")).unwrap();
        assert_eq!(lit["t"], "str");
        assert_eq!(lit["v"], "d001");

        let raw = serde_json::to_value(FieldValue::expr("0")).unwrap();
        assert_eq!(raw["t"], "expr");
        assert_eq!(raw["v"], "0");
    }

    #[test]
    fn test_operator_wire_symbols() {
        assert_eq!(serde_json::to_string(&Operator::Eq).unwrap(), "\"=\"");
        assert_eq!(serde_json::to_string(&Operator::Ne).unwrap(), "\"<>\"");
        assert_eq!(Operator::Ge.to_string(), ">=");
    }

    #[test]
    fn test_predicate_round_trip() {
        let p = Predicate {
            op: Operator::Gt,
            lhs: "r.stamp".into(),
            rhs: FieldValue::expr("sysdate - 10"),
        };
        let json = serde_json::to_string(&p).unwrap();
        let back: Predicate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
