//! CDP WebSocket client.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, trace, warn};

use super::error::CdpError;
use super::protocol::{Command, Incoming, VersionInfo};
use super::session::PageSession;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
pub(crate) type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

pub(crate) type PendingMap = Arc<Mutex<HashMap<u64, PendingRequest>>>;

/// How long a single command may wait for its response.
pub(crate) const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Pending request waiting for response.
pub(crate) struct PendingRequest {
    pub tx: oneshot::Sender<Result<Value, CdpError>>,
}

/// Channel shared by the browser connection and every page session on it.
#[derive(Clone)]
pub(crate) struct Transport {
    ws_tx: Arc<tokio::sync::Mutex<WsSink>>,
    pending: PendingMap,
    request_id: Arc<AtomicU64>,
}

impl Transport {
    /// Send a command, optionally scoped to a session, and wait for its result.
    pub(crate) async fn call(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> Result<Value, CdpError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);

        let json = serde_json::to_string(&Command {
            id,
            method,
            params,
            session_id,
        })?;
        trace!("CDP send: {}", json);

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, PendingRequest { tx });

        {
            let mut ws = self.ws_tx.lock().await;
            if let Err(e) = ws.send(Message::Text(json.into())).await {
                self.pending.lock().remove(&id);
                return Err(e.into());
            }
        }

        match tokio::time::timeout(COMMAND_TIMEOUT, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(CdpError::Disconnected),
            Err(_) => {
                self.pending.lock().remove(&id);
                Err(CdpError::TimedOut(method.to_string()))
            }
        }
    }
}

/// CDP client for one browser.
pub struct CdpClient {
    transport: Transport,
    _recv_task: tokio::task::JoinHandle<()>,
}

impl CdpClient {
    /// Connect to Chrome at the given HTTP debugging endpoint,
    /// e.g. `http://localhost:9222`.
    pub async fn connect(endpoint: &str) -> Result<Self, CdpError> {
        let http_endpoint = endpoint.trim_end_matches('/');

        let version_url = format!("{}/json/version", http_endpoint);
        debug!("Fetching browser version from {}", version_url);

        let unavailable = |e: reqwest::Error| CdpError::EndpointUnavailable {
            endpoint: http_endpoint.to_string(),
            reason: e.to_string(),
        };
        let version: VersionInfo = reqwest::get(&version_url)
            .await
            .map_err(unavailable)?
            .json()
            .await
            .map_err(unavailable)?;

        debug!("Connected to browser: {}", version.browser);

        let (ws_stream, _) = tokio_tungstenite::connect_async(&version.socket_url).await?;

        let (ws_sink, ws_source) = ws_stream.split();
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));

        let recv_task = {
            let pending = pending.clone();
            tokio::spawn(async move {
                Self::receive_loop(ws_source, pending).await;
            })
        };

        debug!("CDP client connected to {}", version.socket_url);

        Ok(Self {
            transport: Transport {
                ws_tx: Arc::new(tokio::sync::Mutex::new(ws_sink)),
                pending,
                request_id: Arc::new(AtomicU64::new(1)),
            },
            _recv_task: recv_task,
        })
    }

    /// Route responses to their waiting callers. Events are not consumed.
    async fn receive_loop(mut ws_source: WsSource, pending: PendingMap) {
        while let Some(msg) = ws_source.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    trace!("CDP recv: {}", text);
                    match serde_json::from_str::<Incoming>(&text) {
                        Ok(incoming) => Self::complete_pending(&pending, incoming),
                        Err(e) => warn!("Failed to parse CDP message: {}", e),
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!("WebSocket closed");
                    break;
                }
                Err(e) => {
                    error!("WebSocket error: {}", e);
                    break;
                }
                _ => {}
            }
        }

        // Wake every caller still waiting; their senders drop here.
        pending.lock().clear();
    }

    fn complete_pending(pending: &PendingMap, incoming: Incoming) {
        let Some((id, outcome)) = incoming.into_reply() else {
            return;
        };
        let Some(req) = pending.lock().remove(&id) else {
            return;
        };
        let _ = req.tx.send(outcome.map_err(CdpError::from));
    }

    /// Send a browser-level CDP command and wait for its response.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.transport.call(method, params, None).await
    }

    /// Open a new page at `url` and attach a session to it.
    ///
    /// A `background` page is created without being focused.
    pub async fn create_page(&self, url: &str, background: bool) -> Result<PageSession, CdpError> {
        let result = self
            .call(
                "Target.createTarget",
                Some(json!({
                    "url": url,
                    "background": background,
                })),
            )
            .await?;

        let target_id = result["targetId"]
            .as_str()
            .ok_or(CdpError::MissingField {
                method: "Target.createTarget",
                field: "targetId",
            })?
            .to_string();
        debug!("Created target {} for {}", target_id, url);

        match self.attach_page(&target_id).await {
            Ok(session) => Ok(session),
            Err(e) => {
                // Do not leave an unattached target behind.
                if let Err(close_err) = self.close_page(&target_id).await {
                    warn!("Failed to close unattached target {}: {}", target_id, close_err);
                }
                Err(e)
            }
        }
    }

    /// Attach to an existing target.
    pub async fn attach_page(&self, target_id: &str) -> Result<PageSession, CdpError> {
        let result = self
            .call(
                "Target.attachToTarget",
                Some(json!({
                    "targetId": target_id,
                    "flatten": true
                })),
            )
            .await?;

        let session_id = result["sessionId"]
            .as_str()
            .ok_or(CdpError::MissingField {
                method: "Target.attachToTarget",
                field: "sessionId",
            })?
            .to_string();

        let session = PageSession::new(target_id.to_string(), session_id, self.transport.clone());
        session.enable_domains().await?;

        Ok(session)
    }

    /// Bring a target to the foreground.
    pub async fn activate_page(&self, target_id: &str) -> Result<(), CdpError> {
        self.call("Target.activateTarget", Some(json!({"targetId": target_id})))
            .await?;
        Ok(())
    }

    /// Close a target.
    pub async fn close_page(&self, target_id: &str) -> Result<(), CdpError> {
        self.call("Target.closeTarget", Some(json!({"targetId": target_id})))
            .await?;
        Ok(())
    }
}

impl Drop for CdpClient {
    fn drop(&mut self) {
        self._recv_task.abort();
    }
}
