//! Message envelope and session header.
//!
//! An [`Envelope`] is the unit of transmission: one [`Header`] plus one or
//! more bodies, addressed to a [`Port`]. The envelope is generic over its
//! body type so the same wrapper carries CRUD bodies, session requests and
//! dataset requests.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Service port a message is addressed to. The wire carries the short
/// port name; `url()` yields the serv path the transport posts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Port {
    Heartbeat,
    Echo,
    Session,
    Query,
    Insert,
    Update,
    Delete,
    Dataset,
    Stree,
}

impl Port {
    /// Serv path for this port, relative to the service root.
    pub fn url(&self) -> &'static str {
        match self {
            Self::Heartbeat => "ping.serv",
            Self::Echo => "echo.serv",
            Self::Session => "login.serv",
            Self::Query => "r.serv",
            Self::Insert => "c.serv",
            Self::Update => "u.serv",
            Self::Delete => "d.serv",
            Self::Dataset => "ds.serv",
            Self::Stree => "s-tree.serv",
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url())
    }
}

/// Response/status codes of the protocol. Closed set; `Ok` is the only
/// success code, everything else names a failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MsgCode {
    #[serde(rename = "ok")]
    Ok,
    /// Session missing, expired or rejected.
    #[serde(rename = "exSession")]
    ExSession,
    /// Validation or business-rule failure.
    #[serde(rename = "exSemantic")]
    ExSemantic,
    /// Network or IO failure.
    #[serde(rename = "exIo")]
    ExIo,
    /// Transaction failure on the storage side.
    #[serde(rename = "exTransct")]
    ExTransct,
    /// Data-access failure on the storage side.
    #[serde(rename = "exDA")]
    ExDa,
    /// Anything without a more precise class.
    #[serde(rename = "exGeneral")]
    ExGeneral,
}

impl MsgCode {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for MsgCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ok => "ok",
            Self::ExSession => "exSession",
            Self::ExSemantic => "exSemantic",
            Self::ExIo => "exIo",
            Self::ExTransct => "exTransct",
            Self::ExDa => "exDA",
            Self::ExGeneral => "exGeneral",
        };
        write!(f, "{}", s)
    }
}

/// Session identity issued at login and threaded into every header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Opaque session ticket.
    pub ssid: String,
    /// Acting user id.
    pub uid: String,
}

/// Audit action descriptor attached to a header. Purely data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAction {
    /// Caller tag, typically the calling component or function name.
    pub func: String,
    /// Action category or target.
    pub cate: String,
    /// Command name.
    pub cmd: String,
    /// Free-form reason for the audit trail.
    pub remarks: String,
}

/// Session and audit metadata attached to an envelope. Immutable once
/// attached; create one per logical operation and reuse it across
/// envelopes within the same session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub ssid: String,
    pub uid: String,
    #[serde(rename = "usrAct", default, skip_serializing_if = "Option::is_none")]
    pub usr_act: Option<UserAction>,
}

impl Header {
    pub fn new(ssid: impl Into<String>, uid: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            uid: uid.into(),
            usr_act: None,
        }
    }

    /// Attach an audit action descriptor: caller tag, category/target,
    /// command and reason.
    pub fn usr_act(
        mut self,
        func: impl Into<String>,
        cate: impl Into<String>,
        cmd: impl Into<String>,
        remarks: impl Into<String>,
    ) -> Self {
        self.usr_act = Some(UserAction {
            func: func.into(),
            cate: cate.into(),
            cmd: cmd.into(),
            remarks: remarks.into(),
        });
        self
    }
}

impl From<&SessionInfo> for Header {
    fn from(ss: &SessionInfo) -> Self {
        Self::new(ss.ssid.clone(), ss.uid.clone())
    }
}

/// Transmissible unit: a header plus one or more bodies, addressed to a
/// port. Created per request and discarded after the round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<B> {
    pub version: String,
    pub seq: u32,
    pub port: Port,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<Header>,
    pub body: Vec<B>,
}

impl<B> Envelope<B> {
    pub const VERSION: &'static str = "1.0";

    pub fn new(port: Port, body: B) -> Self {
        Self {
            version: Self::VERSION.to_string(),
            seq: 0,
            port,
            header: None,
            body: vec![body],
        }
    }

    pub fn with_seq(mut self, seq: u32) -> Self {
        self.seq = seq;
        self
    }

    /// Attach or replace the header.
    pub fn header(mut self, header: Header) -> Self {
        self.header = Some(header);
        self
    }

    /// Append another body; most envelopes carry a single body at index 0.
    pub fn add_body(mut self, body: B) -> Self {
        self.body.push(body);
        self
    }

    pub fn body(&self, ix: usize) -> Option<&B> {
        self.body.get(ix)
    }

    pub fn body_mut(&mut self, ix: usize) -> Option<&mut B> {
        self.body.get_mut(ix)
    }
}
