//! Semantic dataset and tree requests.
//!
//! A dataset request names a semantic key configured at the server and
//! resolves to the hierarchical forest response shape rather than a
//! tabular resultset.

use serde::{Deserialize, Serialize};

/// How the server should shape the dataset answer. Closed set understood
/// by the dataset and s-tree ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetAction {
    /// Run the configured sql tree and return its forest.
    Sqltree,
    /// Rebuild a tree from previously fetched rows.
    Retree,
    /// Rebuild a forest from previously fetched rows.
    Reforest,
}

/// Request body for the dataset port.
///
/// # Examples
///
/// ```rust
/// use jserv_link::{DatasetAction, DatasetReq};
///
/// let req = DatasetReq::new(Some("sys-sqlite"), "menu")
///     .action(DatasetAction::Sqltree)
///     .arg("admin");
/// assert_eq!(req.sk, "menu");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetReq {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conn: Option<String>,
    /// Semantic key naming a dataset configured at the server.
    pub sk: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    pub a: DatasetAction,
}

impl DatasetReq {
    pub fn new(conn: Option<&str>, sk: impl Into<String>) -> Self {
        Self {
            conn: conn.map(str::to_string),
            sk: sk.into(),
            args: Vec::new(),
            a: DatasetAction::Sqltree,
        }
    }

    pub fn action(mut self, a: DatasetAction) -> Self {
        self.a = a;
        self
    }

    /// Append one positional sql argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several positional sql arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}
