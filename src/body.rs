//! Request bodies and their fluent builders.
//!
//! [`Body`] is a closed tagged variant over the four request kinds. Each
//! kind exposes a small fluent surface; builder calls only mutate the body
//! being built and never touch the network. Every body owns an ordered
//! list of chained children attached via [`Chainable::post`]; children
//! execute strictly after their parent, in attachment order, and a failing
//! child fails the whole chain from the caller's perspective.

use serde::{Deserialize, Serialize};

use crate::error::BuildError;
use crate::expr::{
    Assignable, FieldValue, Filterable, Join, JoinType, Joinable, Operator, Predicate, Projection,
};
use crate::message::Port;

/// One request, tagged with its CRUD code on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "a")]
pub enum Body {
    #[serde(rename = "R")]
    Query(QueryBody),
    #[serde(rename = "I")]
    Insert(InsertBody),
    #[serde(rename = "U")]
    Update(UpdateBody),
    #[serde(rename = "D")]
    Delete(DeleteBody),
}

impl Body {
    /// Target entity name.
    pub fn tabl(&self) -> &str {
        match self {
            Self::Query(b) => &b.tabl,
            Self::Insert(b) => &b.tabl,
            Self::Update(b) => &b.tabl,
            Self::Delete(b) => &b.tabl,
        }
    }

    /// Chained children, in attachment order.
    pub fn children(&self) -> &[Body] {
        match self {
            Self::Query(b) => &b.post,
            Self::Insert(b) => &b.post,
            Self::Update(b) => &b.post,
            Self::Delete(b) => &b.post,
        }
    }

    /// The port this body kind is committed to.
    pub fn port(&self) -> Port {
        match self {
            Self::Query(_) => Port::Query,
            Self::Insert(_) => Port::Insert,
            Self::Update(_) => Port::Update,
            Self::Delete(_) => Port::Delete,
        }
    }
}

impl From<QueryBody> for Body {
    fn from(b: QueryBody) -> Self {
        Self::Query(b)
    }
}

impl From<InsertBody> for Body {
    fn from(b: InsertBody) -> Self {
        Self::Insert(b)
    }
}

impl From<UpdateBody> for Body {
    fn from(b: UpdateBody) -> Self {
        Self::Update(b)
    }
}

impl From<DeleteBody> for Body {
    fn from(b: DeleteBody) -> Self {
        Self::Delete(b)
    }
}

/// Bodies that accept chained child requests.
pub trait Chainable: Sized {
    /// Attach a dependent child request and return the parent for further
    /// chaining. Children run after the parent succeeds, in attachment
    /// order; rollback of the parent on child failure is the server's
    /// concern, not this layer's.
    fn post(self, child: impl Into<Body>) -> Self;
}

/// One name/value assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nv {
    pub n: String,
    pub v: FieldValue,
}

impl Nv {
    pub fn new(n: impl Into<String>, v: impl Into<FieldValue>) -> Self {
        Self {
            n: n.into(),
            v: v.into(),
        }
    }
}

/// Sort entry for a query. `asc = false` sorts descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    pub col: String,
    pub asc: bool,
}

/// A select request: projections, joins, predicates and paging.
///
/// # Examples
///
/// ```rust
/// use jserv_link::{Filterable, Joinable, QueryBody};
///
/// # fn main() -> Result<(), jserv_link::BuildError> {
/// let q = QueryBody::new(Some("sys-sqlite"), "a_users", "u")
///     .expr("userName", "uname")?
///     .expr("userId", "uid")?
///     .j("a_roles", "r", "u.roleId = r.roleId")
///     .where_eq("u.userId", "admin");
/// assert_eq!(q.exprs.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conn: Option<String>,
    pub tabl: String,
    pub alias: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exprs: Vec<Projection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub joins: Vec<Join>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conds: Vec<Predicate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub orders: Vec<OrderBy>,
    /// Page index; -1 means no paging at the server side.
    pub page: i32,
    /// Page size; -1 means no paging at the server side.
    pub size: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post: Vec<Body>,
}

impl QueryBody {
    /// New query on `tabl` aliased `alias`, unpaged.
    pub fn new(conn: Option<&str>, tabl: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            conn: conn.map(str::to_string),
            tabl: tabl.into(),
            alias: alias.into(),
            exprs: Vec::new(),
            joins: Vec::new(),
            conds: Vec::new(),
            orders: Vec::new(),
            page: -1,
            size: -1,
            post: Vec::new(),
        }
    }

    /// Set paging bounds. Pass (-1, -1) for server-default / no paging.
    pub fn paging(mut self, page: i32, size: i32) -> Self {
        self.page = page;
        self.size = size;
        self
    }

    /// Project a column or raw expression under `alias`. Fails when the
    /// alias collides with an existing projection in this body.
    pub fn expr(
        mut self,
        expr: impl Into<String>,
        alias: impl Into<String>,
    ) -> Result<Self, BuildError> {
        let alias = alias.into();
        if self.exprs.iter().any(|p| p.alias == alias) {
            return Err(BuildError::DuplicateAlias(alias));
        }
        self.exprs.push(Projection {
            expr: expr.into(),
            alias,
        });
        Ok(self)
    }

    /// Append a sort entry.
    pub fn order_by(mut self, col: impl Into<String>, asc: bool) -> Self {
        self.orders.push(OrderBy {
            col: col.into(),
            asc,
        });
        self
    }
}

impl Filterable for QueryBody {
    fn where_cond(
        mut self,
        op: Operator,
        lhs: impl Into<String>,
        rhs: impl Into<FieldValue>,
    ) -> Self {
        self.conds.push(Predicate {
            op,
            lhs: lhs.into(),
            rhs: rhs.into(),
        });
        self
    }
}

impl Joinable for QueryBody {
    fn join(
        mut self,
        jt: JoinType,
        tabl: impl Into<String>,
        alias: impl Into<String>,
        on: impl Into<String>,
    ) -> Self {
        self.joins.push(Join {
            jt,
            tabl: tabl.into(),
            alias: alias.into(),
            on: on.into(),
        });
        self
    }
}

impl Chainable for QueryBody {
    fn post(mut self, child: impl Into<Body>) -> Self {
        self.post.push(child.into());
        self
    }
}

/// An insert request. `cols()` fixes the column order exactly once;
/// `nv()` fills the first row and `valus()` appends batch rows sharing
/// the same column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conn: Option<String>,
    pub tabl: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cols: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<Vec<Nv>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post: Vec<Body>,
}

impl InsertBody {
    pub fn new(conn: Option<&str>, tabl: impl Into<String>) -> Self {
        Self {
            conn: conn.map(str::to_string),
            tabl: tabl.into(),
            cols: Vec::new(),
            rows: Vec::new(),
            post: Vec::new(),
        }
    }

    /// Declare the column list, fixing the column order. May be called
    /// only once per body.
    pub fn cols<I, S>(mut self, cols: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !self.cols.is_empty() {
            return Err(BuildError::ColumnsAlreadyDeclared);
        }
        let cols: Vec<String> = cols.into_iter().map(Into::into).collect();
        if cols.is_empty() {
            return Err(BuildError::EmptyColumns);
        }
        self.cols = cols;
        Ok(self)
    }

    /// Append a complete batch row. Row arity and column names must match
    /// the declared columns.
    pub fn valus<N, V>(mut self, row: Vec<(N, V)>) -> Result<Self, BuildError>
    where
        N: Into<String>,
        V: Into<FieldValue>,
    {
        if self.cols.is_empty() {
            return Err(BuildError::EmptyColumns);
        }
        let row: Vec<Nv> = row.into_iter().map(|(n, v)| Nv::new(n, v)).collect();
        if row.len() != self.cols.len() {
            return Err(BuildError::RowArity {
                want: self.cols.len(),
                got: row.len(),
            });
        }
        for nv in &row {
            if !self.cols.iter().any(|c| c == &nv.n) {
                return Err(BuildError::UnknownColumn(nv.n.clone()));
            }
        }
        self.rows.push(row);
        Ok(self)
    }
}

impl Assignable for InsertBody {
    /// Set a value in the first row. The column must have been declared
    /// via `cols()` first.
    fn nv(
        mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Result<Self, BuildError> {
        let name = name.into();
        if !self.cols.iter().any(|c| c == &name) {
            return Err(BuildError::UnknownColumn(name));
        }
        if self.rows.is_empty() {
            self.rows.push(Vec::new());
        }
        self.rows[0].push(Nv {
            n: name,
            v: value.into(),
        });
        Ok(self)
    }
}

impl Chainable for InsertBody {
    fn post(mut self, child: impl Into<Body>) -> Self {
        self.post.push(child.into());
        self
    }
}

/// An update request: assignments plus predicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conn: Option<String>,
    pub tabl: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nvs: Vec<Nv>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conds: Vec<Predicate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post: Vec<Body>,
}

impl UpdateBody {
    pub fn new(conn: Option<&str>, tabl: impl Into<String>) -> Self {
        Self {
            conn: conn.map(str::to_string),
            tabl: tabl.into(),
            nvs: Vec::new(),
            conds: Vec::new(),
            post: Vec::new(),
        }
    }
}

impl Assignable for UpdateBody {
    fn nv(
        mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Result<Self, BuildError> {
        self.nvs.push(Nv {
            n: name.into(),
            v: value.into(),
        });
        Ok(self)
    }
}

impl Filterable for UpdateBody {
    fn where_cond(
        mut self,
        op: Operator,
        lhs: impl Into<String>,
        rhs: impl Into<FieldValue>,
    ) -> Self {
        self.conds.push(Predicate {
            op,
            lhs: lhs.into(),
            rhs: rhs.into(),
        });
        self
    }
}

impl Chainable for UpdateBody {
    fn post(mut self, child: impl Into<Body>) -> Self {
        self.post.push(child.into());
        self
    }
}

/// A delete request: predicates only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conn: Option<String>,
    pub tabl: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conds: Vec<Predicate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post: Vec<Body>,
}

impl DeleteBody {
    pub fn new(conn: Option<&str>, tabl: impl Into<String>) -> Self {
        Self {
            conn: conn.map(str::to_string),
            tabl: tabl.into(),
            conds: Vec::new(),
            post: Vec::new(),
        }
    }
}

impl Filterable for DeleteBody {
    fn where_cond(
        mut self,
        op: Operator,
        lhs: impl Into<String>,
        rhs: impl Into<FieldValue>,
    ) -> Self {
        self.conds.push(Predicate {
            op,
            lhs: lhs.into(),
            rhs: rhs.into(),
        });
        self
    }
}

impl Chainable for DeleteBody {
    fn post(mut self, child: impl Into<Body>) -> Self {
        self.post.push(child.into());
        self
    }
}
