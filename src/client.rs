//! Entry-point client: explicit context, builder configuration, login.
//!
//! A [`JservClient`] is an explicit value passed around by the caller; no
//! global registry. The lifecycle is build, login, use the returned
//! [`SessionClient`], logout.

use base64::{engine::general_purpose, Engine as _};
use log::{debug, warn};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{JservLinkError, Result};
use crate::message::{Envelope, Port};
use crate::response::{RespData, ResponseEnvelope};
use crate::session::{SessionClient, SessionReq};
use crate::transport::{HttpTransport, Transport};

/// Encode a demo credential token from user id and password, RFC 4648
/// standard alphabet. Real deployments issue tokens through their own
/// login collaborator; this helper only covers development setups.
pub fn credential_token64(uid: &str, pswd: &str) -> String {
    general_purpose::STANDARD.encode(format!("{}:{}", uid, pswd).as_bytes())
}

/// Client context for one jserv service root.
///
/// # Examples
///
/// ```rust,no_run
/// use jserv_link::JservClient;
/// use std::time::Duration;
///
/// # async fn example() -> jserv_link::Result<()> {
/// let client = JservClient::builder()
///     .base_url("http://localhost:8080/jserv-sample")
///     .timeout(Duration::from_secs(30))
///     .build()?;
///
/// let session = client.login("admin", "----").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct JservClient {
    transport: Arc<dyn Transport>,
    seq: Arc<AtomicU32>,
}

impl JservClient {
    pub fn builder() -> JservClientBuilder {
        JservClientBuilder::new()
    }

    pub(crate) fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub(crate) fn next_seq(&self) -> u32 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }

    /// Establish a session. The credential is an opaque token understood
    /// by the server's session collaborator.
    ///
    /// Fails with the security class when the server rejects the
    /// credential, and with the transport class when the service is
    /// unreachable.
    pub async fn login(&self, uid: &str, credential: &str) -> Result<SessionClient> {
        debug!("[SESSION] login uid={}", uid);
        let msg = Envelope::new(Port::Session, SessionReq::login(uid, credential))
            .with_seq(self.next_seq());

        let payload = serde_json::to_value(&msg)?;
        let raw = self.transport.round_trip(Port::Session, payload).await?;
        let resp: ResponseEnvelope = serde_json::from_value(raw)?;

        if !resp.is_ok() {
            let code = resp.code;
            let message = resp
                .error
                .map(|e| e.msg)
                .unwrap_or_else(|| "login rejected".to_string());
            warn!("[SESSION] login failed: code={} msg={}", code, message);
            return Err(JservLinkError::Security(message));
        }

        match resp.data {
            Some(RespData::Ss(ssinf)) => {
                debug!("[SESSION] logged in ssid={}", ssinf.ssid);
                Ok(SessionClient::new(self.clone(), ssinf))
            }
            _ => Err(JservLinkError::Serialization(
                "login response carries no session info".into(),
            )),
        }
    }
}

/// Builder for [`JservClient`] instances.
pub struct JservClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
    transport: Option<Arc<dyn Transport>>,
}

impl JservClientBuilder {
    fn new() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            transport: None,
        }
    }

    /// Service root URL for the shipped HTTP transport.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Whole-request timeout for the shipped HTTP transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the carrier entirely. `base_url` and `timeout` are ignored
    /// when a transport is supplied.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<JservClient> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(t) => t,
            None => {
                let base_url = self.base_url.ok_or_else(|| {
                    JservLinkError::Configuration("base_url is required".into())
                })?;
                Arc::new(
                    HttpTransport::builder()
                        .base_url(base_url)
                        .timeout(self.timeout)
                        .build()?,
                )
            }
        };

        Ok(JservClient {
            transport,
            seq: Arc::new(AtomicU32::new(1)),
        })
    }
}
