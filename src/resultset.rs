//! Cursor-based view over a tabular response.
//!
//! A [`Resultset`] is fully materialized when the response is decoded and
//! performs no further I/O. The cursor starts before the first row;
//! `next()` advances it and `before_first()` rewinds, so the same data can
//! be replayed any number of times.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{JservLinkError, Result};

/// In-memory, restartable tabular view over returned rows.
///
/// # Examples
///
/// ```rust
/// use jserv_link::Resultset;
/// use serde_json::json;
///
/// # fn main() -> jserv_link::Result<()> {
/// let mut rs = Resultset::new(
///     ["uid", "uname"],
///     vec![vec![json!("admin"), json!("Administrator")]],
/// );
/// while rs.next() {
///     assert_eq!(rs.get_string("uid")?, "admin");
/// }
/// rs.before_first();
/// assert!(rs.next());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resultset {
    cols: Vec<String>,
    rows: Vec<Vec<JsonValue>>,
    /// 0 is before-first; row i sits at cursor i + 1.
    #[serde(skip)]
    cursor: usize,
}

impl Resultset {
    pub fn new<I, S>(cols: I, rows: Vec<Vec<JsonValue>>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cols: cols.into_iter().map(Into::into).collect(),
            rows,
            cursor: 0,
        }
    }

    /// Reset the cursor to before the first row. Idempotent; the data can
    /// be re-iterated any number of times.
    pub fn before_first(&mut self) -> &mut Self {
        self.cursor = 0;
        self
    }

    /// Advance the cursor. Returns whether a row is now available.
    pub fn next(&mut self) -> bool {
        if self.cursor < self.rows.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.cols.len()
    }

    pub fn cols(&self) -> &[String] {
        &self.cols
    }

    pub fn has_col(&self, name: &str) -> bool {
        self.cols.iter().any(|c| c == name)
    }

    fn col_index(&self, name: &str) -> Result<usize> {
        self.cols
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| JservLinkError::NoSuchColumn(name.to_string()))
    }

    fn current(&self) -> Result<&[JsonValue]> {
        if self.cursor == 0 || self.cursor > self.rows.len() {
            return Err(JservLinkError::CursorNotOnRow);
        }
        Ok(&self.rows[self.cursor - 1])
    }

    /// Raw value at the current row. Fails for unprojected aliases and
    /// when the cursor is not on a row.
    pub fn get_value(&self, col: &str) -> Result<&JsonValue> {
        static NULL: JsonValue = JsonValue::Null;
        let ix = self.col_index(col)?;
        let row = self.current()?;
        Ok(row.get(ix).unwrap_or(&NULL))
    }

    /// String value at the current row. Non-string scalars render to
    /// their display form; nulls yield an empty string.
    pub fn get_string(&self, col: &str) -> Result<String> {
        Ok(match self.get_value(col)? {
            JsonValue::String(s) => s.clone(),
            JsonValue::Null => String::new(),
            other => other.to_string(),
        })
    }

    pub fn get_i64(&self, col: &str) -> Result<i64> {
        let v = self.get_value(col)?;
        v.as_i64()
            .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
            .ok_or_else(|| {
                JservLinkError::Serialization(format!("column '{}' is not an integer", col))
            })
    }

    pub fn get_f64(&self, col: &str) -> Result<f64> {
        let v = self.get_value(col)?;
        v.as_f64()
            .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
            .ok_or_else(|| {
                JservLinkError::Serialization(format!("column '{}' is not a number", col))
            })
    }

    pub fn get_bool(&self, col: &str) -> Result<bool> {
        let v = self.get_value(col)?;
        v.as_bool().ok_or_else(|| {
            JservLinkError::Serialization(format!("column '{}' is not a boolean", col))
        })
    }
}
