//! In-process fake transport shared by the integration tests.
//!
//! Parses the serialized envelopes the client hands to the carrier,
//! walks body trees the way the real server does (parent first, children
//! in attachment order) and answers with canned responses. Lets every
//! test run hermetically, no server required.

use async_trait::async_trait;
use jserv_link::{
    Body, Envelope, JservClient, JservLinkError, MsgCode, Port, RespData, ResponseEnvelope,
    Resultset, SessionAction, SessionClient, SessionInfo, SessionReq, Transport, TreeNode,
};
use serde_json::{json, Map, Value as JsonValue};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Simulated jserv backend.
pub struct FakeServ {
    calls: AtomicUsize,
    visited: Mutex<Vec<String>>,
    /// (crud code, table) the simulated server fails on.
    fail_on: Option<(String, String)>,
    canned_rs: Option<Resultset>,
    offline: AtomicBool,
}

impl FakeServ {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            visited: Mutex::new(Vec::new()),
            fail_on: None,
            canned_rs: None,
            offline: AtomicBool::new(false),
        }
    }

    /// Fail the body whose crud code ("R"/"I"/"U"/"D") and table match.
    pub fn failing_on(kind: &str, tabl: &str) -> Self {
        Self {
            fail_on: Some((kind.to_string(), tabl.to_string())),
            ..Self::new()
        }
    }

    /// Answer every query with this resultset.
    pub fn with_resultset(rs: Resultset) -> Self {
        Self {
            canned_rs: Some(rs),
            ..Self::new()
        }
    }

    /// Refuse every further round trip with a transport failure.
    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    /// Round trips attempted so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Tables visited, in execution order, across all round trips.
    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }

    fn crud_code(body: &Body) -> &'static str {
        match body {
            Body::Query(_) => "R",
            Body::Insert(_) => "I",
            Body::Update(_) => "U",
            Body::Delete(_) => "D",
        }
    }

    /// Execute a body tree: parent first, then children in attachment
    /// order. Stops at the first failing body.
    fn exec(&self, body: &Body) -> Result<(), String> {
        self.visited.lock().unwrap().push(body.tabl().to_string());
        if let Some((kind, tabl)) = &self.fail_on {
            if kind == Self::crud_code(body) && tabl == body.tabl() {
                return Err(format!("simulated failure on {}", tabl));
            }
        }
        for child in body.children() {
            self.exec(child)?;
        }
        Ok(())
    }

    fn answer_session(&self, payload: JsonValue) -> ResponseEnvelope {
        let msg: Envelope<SessionReq> = match serde_json::from_value(payload) {
            Ok(m) => m,
            Err(e) => return ResponseEnvelope::err(MsgCode::ExGeneral, e.to_string()),
        };
        let req = &msg.body[0];
        match req.a {
            SessionAction::Login => {
                if req.token.as_deref() == Some("bad-credential") {
                    ResponseEnvelope::err(MsgCode::ExSession, "credential rejected")
                } else {
                    ResponseEnvelope {
                        code: MsgCode::Ok,
                        data: Some(RespData::Ss(SessionInfo {
                            ssid: "001UsrSes".into(),
                            uid: req.uid.clone(),
                        })),
                        error: None,
                    }
                }
            }
            SessionAction::Logout => ResponseEnvelope::ok_empty(),
        }
    }

    fn answer_crud(&self, port: Port, payload: JsonValue) -> ResponseEnvelope {
        let msg: Envelope<Body> = match serde_json::from_value(payload) {
            Ok(m) => m,
            Err(e) => return ResponseEnvelope::err(MsgCode::ExGeneral, e.to_string()),
        };
        if msg.header.as_ref().map(|h| h.ssid.is_empty()).unwrap_or(true) {
            return ResponseEnvelope::err(MsgCode::ExSession, "no session header");
        }
        for body in &msg.body {
            if let Err(m) = self.exec(body) {
                return ResponseEnvelope::err(MsgCode::ExTransct, m);
            }
        }
        if port == Port::Query {
            let rs = self
                .canned_rs
                .clone()
                .unwrap_or_else(|| Resultset::new(["uid"], vec![]));
            ResponseEnvelope::ok_rs(vec![rs])
        } else {
            ResponseEnvelope::ok_empty()
        }
    }

    fn answer_dataset(&self) -> ResponseEnvelope {
        let mut root = Map::new();
        root.insert("funcId".into(), json!("sys"));
        root.insert("text".into(), json!("System"));
        let mut leaf = Map::new();
        leaf.insert("funcId".into(), json!("sys-domain"));
        leaf.insert("text".into(), json!("Domain Settings"));
        ResponseEnvelope::ok_forest(vec![TreeNode {
            fields: root,
            children: vec![TreeNode {
                fields: leaf,
                children: vec![],
            }],
        }])
    }
}

#[async_trait]
impl Transport for FakeServ {
    async fn round_trip(&self, port: Port, payload: JsonValue) -> jserv_link::Result<JsonValue> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(JservLinkError::Transport("connection refused".into()));
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        let resp = match port {
            Port::Session => self.answer_session(payload),
            Port::Dataset | Port::Stree => self.answer_dataset(),
            _ => self.answer_crud(port, payload),
        };
        Ok(serde_json::to_value(resp).unwrap())
    }
}

/// Client wired to the given fake backend.
pub fn client_over(serv: Arc<FakeServ>) -> JservClient {
    JservClient::builder().transport(serv).build().unwrap()
}

/// Logged-in session over the given fake backend.
pub async fn session_over(serv: Arc<FakeServ>) -> SessionClient {
    client_over(serv)
        .login("admin", "dGVzdA==")
        .await
        .expect("fake login should succeed")
}
