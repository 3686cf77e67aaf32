//! # jserv-link
//!
//! Client library for the jserv query protocol: fluent request builders,
//! a header/session envelope, dependency-linked sub-request composition
//! and an asynchronous commit model with typed result delivery.
//!
//! A request is built as a [`Body`] (query, insert, update or delete),
//! wrapped with a session [`Header`] into an [`Envelope`], and committed
//! through a [`SessionClient`]. The round trip resolves to exactly one of
//! two continuations, carrying either a decoded [`ResponseEnvelope`] with
//! its [`Resultset`]s (or a forest of [`TreeNode`]s) or an error code and
//! detail. Dependent requests chain with [`Chainable::post`] and execute
//! strictly after their parent, in attachment order.
//!
//! ## Example
//!
//! ```rust,no_run
//! use jserv_link::{Filterable, Joinable, JservClient};
//!
//! # async fn example() -> jserv_link::Result<()> {
//! let client = JservClient::builder()
//!     .base_url("http://localhost:8080/jserv-sample")
//!     .build()?;
//! let session = client.login("admin", "----").await?;
//!
//! let q = session
//!     .query(Some("sys-sqlite"), "a_users", "u", -1, -1)
//!     .expr("userName", "uname")?
//!     .expr("userId", "uid")?
//!     .j("a_roles", "r", "u.roleId = r.roleId")
//!     .where_eq("u.userId", "admin");
//!
//! let resp = session.send(session.envelope(q)).await?;
//! if let Some(mut rs) = resp.rs(0).cloned() {
//!     while rs.next() {
//!         println!("{} ({})", rs.get_string("uname")?, rs.get_string("uid")?);
//!     }
//! }
//!
//! session.logout().await?;
//! # Ok(())
//! # }
//! ```

pub mod body;
pub mod client;
pub mod dataset;
pub mod error;
pub mod expr;
pub mod message;
pub mod response;
pub mod resultset;
pub mod session;
pub mod transport;

pub use body::{Body, Chainable, DeleteBody, InsertBody, Nv, OrderBy, QueryBody, UpdateBody};
pub use client::{credential_token64, JservClient, JservClientBuilder};
pub use dataset::{DatasetAction, DatasetReq};
pub use error::{BuildError, JservLinkError, Result};
pub use expr::{
    Assignable, FieldValue, Filterable, Join, JoinType, Joinable, Operator, Predicate, Projection,
};
pub use message::{Envelope, Header, MsgCode, Port, SessionInfo, UserAction};
pub use response::{ErrorDetail, RespData, ResponseEnvelope, TreeNode};
pub use resultset::Resultset;
pub use session::{SessionAction, SessionClient, SessionReq};
pub use transport::{HttpTransport, HttpTransportBuilder, Transport};
