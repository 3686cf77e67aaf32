//! Logged-in session client and commit dispatch.
//!
//! A [`SessionClient`] is obtained from [`JservClient::login`] and threads
//! the session ticket into every header it builds. It is cheap to clone;
//! clones share the session and may commit concurrently against
//! independent envelopes.
//!
//! [`JservClient::login`]: crate::client::JservClient::login

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::body::{Body, DeleteBody, InsertBody, QueryBody, UpdateBody};
use crate::client::JservClient;
use crate::dataset::DatasetReq;
use crate::error::{JservLinkError, Result};
use crate::message::{Envelope, Header, MsgCode, Port, SessionInfo};
use crate::response::{ErrorDetail, ResponseEnvelope};

/// Session port actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionAction {
    Login,
    Logout,
}

/// Body of a session-port request. The credential token is opaque to this
/// layer; issuing it is the login collaborator's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReq {
    pub a: SessionAction,
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl SessionReq {
    pub fn login(uid: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            a: SessionAction::Login,
            uid: uid.into(),
            token: Some(token.into()),
        }
    }

    pub fn logout(uid: impl Into<String>) -> Self {
        Self {
            a: SessionAction::Logout,
            uid: uid.into(),
            token: None,
        }
    }
}

/// Client with a session logged in.
///
/// # Examples
///
/// ```rust,no_run
/// use jserv_link::{Filterable, JservClient};
///
/// # async fn example() -> jserv_link::Result<()> {
/// let client = JservClient::builder()
///     .base_url("http://localhost:8080/jserv-sample")
///     .build()?;
/// let session = client.login("admin", "----").await?;
///
/// let q = session
///     .query(Some("sys-sqlite"), "a_users", "u", -1, -1)
///     .where_eq("u.userId", "admin");
///
/// session
///     .commit(
///         session.envelope(q),
///         |_code, resp| {
///             if let Some(rs) = resp.rs(0) {
///                 println!("{} rows", rs.row_count());
///             }
///         },
///         |code, err| eprintln!("{}: {}", code, err.msg()),
///     )
///     .await;
/// session.logout().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SessionClient {
    core: JservClient,
    ssinf: SessionInfo,
    open: Arc<AtomicBool>,
}

impl SessionClient {
    pub(crate) fn new(core: JservClient, ssinf: SessionInfo) -> Self {
        Self {
            core,
            ssinf,
            open: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Session identity issued at login.
    pub fn session(&self) -> &SessionInfo {
        &self.ssinf
    }

    /// Whether this session is still usable for commits.
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// A fresh header carrying this session's ticket and user id. Chain
    /// [`Header::usr_act`] onto it for audited operations.
    pub fn header(&self) -> Header {
        Header::from(&self.ssinf)
    }

    /// Start a query body on `tabl` aliased `alias`. Pass (-1, -1) for
    /// unpaged results.
    pub fn query(
        &self,
        conn: Option<&str>,
        tabl: impl Into<String>,
        alias: impl Into<String>,
        page: i32,
        size: i32,
    ) -> QueryBody {
        QueryBody::new(conn, tabl, alias).paging(page, size)
    }

    pub fn insert(&self, conn: Option<&str>, tabl: impl Into<String>) -> InsertBody {
        InsertBody::new(conn, tabl)
    }

    pub fn update(&self, conn: Option<&str>, tabl: impl Into<String>) -> UpdateBody {
        UpdateBody::new(conn, tabl)
    }

    pub fn delete(&self, conn: Option<&str>, tabl: impl Into<String>) -> DeleteBody {
        DeleteBody::new(conn, tabl)
    }

    /// Start a semantic dataset request keyed by `sk`.
    pub fn dataset(&self, conn: Option<&str>, sk: impl Into<String>) -> DatasetReq {
        DatasetReq::new(conn, sk)
    }

    /// Wrap a CRUD body into an envelope addressed to the body's port,
    /// with this session's header attached.
    pub fn envelope(&self, body: impl Into<Body>) -> Envelope<Body> {
        let body = body.into();
        let port = body.port();
        Envelope::new(port, body)
            .header(self.header())
            .with_seq(self.core.next_seq())
    }

    /// Wrap an arbitrary body for an explicit port, header attached. Used
    /// for dataset and other non-CRUD requests.
    pub fn envelope_with<B>(&self, port: Port, body: B) -> Envelope<B> {
        Envelope::new(port, body)
            .header(self.header())
            .with_seq(self.core.next_seq())
    }

    /// Serialize, send and decode; refuses before any I/O when the
    /// session was logged out. The response is returned whatever its
    /// code.
    async fn exchange<B: Serialize>(&self, msg: &Envelope<B>) -> Result<ResponseEnvelope> {
        if !self.is_open() {
            return Err(JservLinkError::Security(
                "session expired: the client has logged out".into(),
            ));
        }
        let payload = serde_json::to_value(msg)?;
        debug!("[COMMIT] port={} seq={}", msg.port, msg.seq);
        let raw = self.core.transport().round_trip(msg.port, payload).await?;
        Ok(serde_json::from_value(raw)?)
    }

    /// Commit an envelope and return the decoded response, mapping a
    /// non-ok code to a server error. The building block for combinator
    /// style sequencing: await one send, then issue the next.
    pub async fn send<B: Serialize>(&self, msg: Envelope<B>) -> Result<ResponseEnvelope> {
        let resp = self.exchange(&msg).await?;
        if resp.is_ok() {
            Ok(resp)
        } else {
            let code = resp.code;
            let message = resp
                .error
                .map(|e| e.msg)
                .unwrap_or_else(|| "server reported failure without detail".to_string());
            Err(JservLinkError::Server { code, message })
        }
    }

    /// Commit an envelope and resolve it to exactly one of the two
    /// continuations: `on_ok` with the decoded response, or `on_err` with
    /// the failure code and detail. Never both, never neither. No
    /// automatic retry; re-commit a fresh envelope to retry.
    ///
    /// The calling task is suspended for the round trip, so a commit
    /// issued after this one resolves is guaranteed to start only after
    /// this one's continuation has run.
    pub async fn commit<B, O, E>(&self, msg: Envelope<B>, on_ok: O, on_err: E)
    where
        B: Serialize,
        O: FnOnce(MsgCode, ResponseEnvelope),
        E: FnOnce(MsgCode, ErrorDetail),
    {
        match self.exchange(&msg).await {
            Ok(resp) if resp.is_ok() => {
                debug!("[COMMIT] ok seq={}", msg.seq);
                on_ok(resp.code, resp);
            }
            Ok(resp) => {
                let code = resp.code;
                let detail = resp
                    .error
                    .unwrap_or_else(|| ErrorDetail::new(code, "server reported failure without detail"));
                warn!("[COMMIT] server error: code={} msg={}", code, detail.msg());
                on_err(code, detail);
            }
            Err(e) => {
                let code = e.code();
                warn!("[COMMIT] failed: {}", e);
                on_err(code, ErrorDetail::new(code, e.to_string()));
            }
        }
    }

    /// Invalidate the session. The local flag flips first, so no commit
    /// can slip out on this or any clone once logout begins; the server
    /// is then notified. Idempotent.
    pub async fn logout(&self) -> Result<()> {
        if !self.open.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        debug!("[SESSION] logout uid={}", self.ssinf.uid);
        let msg = Envelope::new(Port::Session, SessionReq::logout(self.ssinf.uid.as_str()))
            .header(self.header())
            .with_seq(self.core.next_seq());
        let payload = serde_json::to_value(&msg)?;
        match self.core.transport().round_trip(Port::Session, payload).await {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!("[SESSION] logout notification failed: {}", e);
                Err(e)
            }
        }
    }
}
