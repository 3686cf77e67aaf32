//! Error types for the jserv-link client.
//!
//! Builder misuse is reported through [`BuildError`] at the call site,
//! before any request is serialized or sent. Everything that can go wrong
//! after a commit is issued is a [`JservLinkError`] and reaches the caller
//! through the error continuation, tagged with a [`MsgCode`].

use thiserror::Error;

use crate::message::MsgCode;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, JservLinkError>;

/// Fluent-builder misuse, raised before any network I/O.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A projection alias was used twice within the same body.
    #[error("duplicate projection alias '{0}'")]
    DuplicateAlias(String),

    /// `nv()` named a column that was never declared via `cols()`.
    #[error("column '{0}' was not declared via cols()")]
    UnknownColumn(String),

    /// `cols()` was called a second time on the same insert body.
    #[error("insert columns already declared")]
    ColumnsAlreadyDeclared,

    /// `cols()` was called with an empty column list.
    #[error("cols() requires at least one column")]
    EmptyColumns,

    /// A batch row does not match the declared column count.
    #[error("row carries {got} values but {want} columns are declared")]
    RowArity { want: usize, got: usize },
}

/// Main error type for the jserv-link client.
#[derive(Error, Debug)]
pub enum JservLinkError {
    /// Bad fluent usage, surfaced before any request leaves the process.
    #[error("build error: {0}")]
    Build(#[from] BuildError),

    /// A value or envelope could not be encoded/decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Network or IO failure while talking to the server.
    #[error("transport error: {0}")]
    Transport(String),

    /// Session or credential failure.
    #[error("security error: {0}")]
    Security(String),

    /// Business-rule or storage failure reported by the remote side.
    #[error("server error ({code}): {message}")]
    Server { code: MsgCode, message: String },

    /// Invalid client configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A resultset getter named a column that was never projected.
    #[error("no such column '{0}' in resultset")]
    NoSuchColumn(String),

    /// A resultset getter was called before `next()` or past the last row.
    #[error("resultset cursor is not on a row")]
    CursorNotOnRow,
}

impl JservLinkError {
    /// The protocol code this error is reported under when it reaches an
    /// error continuation.
    pub fn code(&self) -> MsgCode {
        match self {
            Self::Build(_) | Self::NoSuchColumn(_) | Self::CursorNotOnRow => MsgCode::ExSemantic,
            Self::Serialization(_) | Self::Configuration(_) => MsgCode::ExGeneral,
            Self::Transport(_) => MsgCode::ExIo,
            Self::Security(_) => MsgCode::ExSession,
            Self::Server { code, .. } => *code,
        }
    }
}

impl From<reqwest::Error> for JservLinkError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for JservLinkError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let build = JservLinkError::Build(BuildError::DuplicateAlias("uid".into()));
        assert!(build.to_string().contains("duplicate projection alias 'uid'"));

        let server = JservLinkError::Server {
            code: MsgCode::ExTransct,
            message: "constraint violated".into(),
        };
        assert!(server.to_string().contains("exTransct"));
        assert!(server.to_string().contains("constraint violated"));
    }

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(
            JservLinkError::Security("expired".into()).code(),
            MsgCode::ExSession
        );
        assert_eq!(
            JservLinkError::Transport("refused".into()).code(),
            MsgCode::ExIo
        );
        assert_eq!(
            JservLinkError::Build(BuildError::EmptyColumns).code(),
            MsgCode::ExSemantic
        );
        assert_eq!(
            JservLinkError::Server {
                code: MsgCode::ExDa,
                message: "dup key".into()
            }
            .code(),
            MsgCode::ExDa
        );
    }
}
