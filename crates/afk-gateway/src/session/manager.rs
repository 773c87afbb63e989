//! Socket Mode session manager
//!
//! One supervisor task owns the connection lifecycle: obtain a URL, open the websocket,
//! serve frames until the connection dies, back off, repeat. Each live connection adds
//! a writer task draining the outbound queue and a keepalive task.

use super::backoff::{Backoff, BackoffPolicy};
use super::error::GatewayResult;
use super::state::SessionState;
use crate::dispatch::EventDispatcher;
use crate::protocol::{is_peer_liveness, Envelope, EnvelopeKind, OutboundFrame};
use afk_common::SessionSettings;
use afk_core::ConnectionOpener;
use futures_util::stream::SplitSink;
use futures_util::{FutureExt, SinkExt, StreamExt};
use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type SocketStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type SocketSink = SplitSink<SocketStream, Message>;

/// Channel buffer size for outgoing frames
const OUTBOUND_BUFFER_SIZE: usize = 64;

/// How long the writer may take to flush and close after the reader stops
const WRITER_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Session timings
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    pub keepalive_interval: Duration,
    pub backoff: BackoffPolicy,
    pub outbound_buffer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from(&SessionSettings::default())
    }
}

impl From<&SessionSettings> for SessionConfig {
    fn from(settings: &SessionSettings) -> Self {
        Self {
            keepalive_interval: settings.keepalive_interval,
            backoff: BackoffPolicy {
                initial: settings.reconnect_initial,
                max: settings.reconnect_max,
            },
            outbound_buffer: OUTBOUND_BUFFER_SIZE,
        }
    }
}

/// What the session did with one inbound text frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Peer liveness probe, discarded
    Liveness,
    /// Not a valid envelope, dropped
    Malformed,
    Hello,
    /// Server asked us to reconnect
    Disconnect,
    /// Handed to the dispatcher
    Dispatched,
    /// Handed to the dispatcher, which panicked; the connection carries on
    HandlerPanicked,
    /// Valid but not dispatchable (`interactive`, unknown types)
    Ignored,
}

/// Owns the Socket Mode connection and keeps it alive
pub struct SessionManager {
    opener: Arc<dyn ConnectionOpener>,
    dispatcher: Arc<EventDispatcher>,
    config: SessionConfig,

    state: RwLock<SessionState>,

    /// Set while a reconnect is pending; collapses concurrent triggers
    reconnect_requested: AtomicBool,
    reconnect_signal: Notify,

    stopped: AtomicBool,
    shutdown: watch::Sender<bool>,
    supervisor: Mutex<Option<JoinHandle<()>>>,

    /// Successful websocket connections since start
    connections: AtomicU64,
}

impl SessionManager {
    pub fn new(
        opener: Arc<dyn ConnectionOpener>,
        dispatcher: Arc<EventDispatcher>,
        config: SessionConfig,
    ) -> Arc<Self> {
        let (shutdown, _) = watch::channel(false);
        Arc::new(Self {
            opener,
            dispatcher,
            config,
            state: RwLock::new(SessionState::Disconnected),
            reconnect_requested: AtomicBool::new(false),
            reconnect_signal: Notify::new(),
            stopped: AtomicBool::new(false),
            shutdown,
            supervisor: Mutex::new(None),
            connections: AtomicU64::new(0),
        })
    }

    pub fn state(&self) -> SessionState {
        *self.state.read()
    }

    fn set_state(&self, state: SessionState) {
        let previous = std::mem::replace(&mut *self.state.write(), state);
        if previous != state {
            tracing::debug!(from = %previous, to = %state, "Session state changed");
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Number of websocket connections established so far
    pub fn connection_count(&self) -> u64 {
        self.connections.load(Ordering::SeqCst)
    }

    /// Spawn the supervisor; a second call is a no-op
    pub fn start(self: &Arc<Self>) {
        let mut supervisor = self.supervisor.lock();
        if supervisor.is_some() || self.is_stopped() {
            tracing::warn!("Session already started or stopped");
            return;
        }
        *supervisor = Some(tokio::spawn(Arc::clone(self).supervise()));
        tracing::info!("Socket Mode session started");
    }

    /// Close the connection and stop reconnecting
    ///
    /// Idempotent. Returns once the supervisor has exited; no handler runs afterwards.
    pub async fn stop(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        self.set_state(SessionState::Closing);
        self.shutdown.send_replace(true);

        let supervisor = self.supervisor.lock().take();
        if let Some(handle) = supervisor {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Session task ended abnormally");
            }
        }

        self.set_state(SessionState::Disconnected);
        tracing::info!("Socket Mode session stopped");
    }

    /// Drop the current connection and reconnect
    ///
    /// Triggers arriving while a reconnect is already pending are collapsed into it.
    pub fn request_reconnect(&self, reason: &str) {
        if self.is_stopped() {
            return;
        }
        if self.reconnect_requested.swap(true, Ordering::SeqCst) {
            tracing::debug!(reason, "Reconnect already pending");
            return;
        }
        tracing::info!(reason, "Reconnect requested");
        self.reconnect_signal.notify_one();
    }

    async fn supervise(self: Arc<Self>) {
        let mut shutdown = self.shutdown.subscribe();
        let mut backoff = Backoff::new(self.config.backoff);

        while !self.is_stopped() {
            self.set_state(SessionState::Connecting);

            let attempt = tokio::select! {
                result = self.connect() => result,
                _ = shutdown.changed() => break,
            };

            match attempt {
                Ok(socket) => {
                    self.reconnect_requested.store(false, Ordering::SeqCst);
                    self.set_state(SessionState::Connected);
                    backoff.reset();
                    let count = self.connections.fetch_add(1, Ordering::SeqCst) + 1;
                    tracing::info!(connection = count, "WebSocket connection established");

                    self.serve(socket, &mut shutdown).await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to open Socket Mode connection");
                }
            }

            if self.is_stopped() {
                break;
            }
            self.set_state(SessionState::Disconnected);

            let delay = backoff.next_delay();
            tracing::info!(
                delay_ms = delay.as_millis() as u64,
                attempt = backoff.attempts(),
                "Reconnecting after delay"
            );
            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                _ = shutdown.changed() => break,
            }
        }

        tracing::debug!("Session supervisor exited");
    }

    async fn connect(&self) -> GatewayResult<SocketStream> {
        let url = self.opener.open_connection().await?;
        tracing::debug!("Socket Mode URL obtained");

        let (socket, _response) = connect_async(url.as_str()).await?;
        Ok(socket)
    }

    /// Serve one live connection until it dies, a reconnect is requested, or shutdown
    async fn serve(self: &Arc<Self>, socket: SocketStream, shutdown: &mut watch::Receiver<bool>) {
        let (sink, mut stream) = socket.split();
        let (tx, rx) = mpsc::channel(self.config.outbound_buffer);

        let mut writer = tokio::spawn(Arc::clone(self).write_loop(sink, rx));
        let keepalive = tokio::spawn(Arc::clone(self).keepalive_loop(tx.clone()));

        loop {
            tokio::select! {
                frame = stream.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        self.handle_frame(&text, &tx).await;
                    }
                    Some(Ok(Message::Close(frame))) => {
                        tracing::info!(frame = ?frame, "WebSocket closed by peer");
                        break;
                    }
                    // Pings are answered by tungstenite; pongs and binary frames carry nothing
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "WebSocket transport error");
                        break;
                    }
                    None => {
                        tracing::info!("WebSocket stream ended");
                        break;
                    }
                },
                () = self.reconnect_signal.notified() => {
                    // A permit left over from an earlier connection has no flag behind it
                    if self.reconnect_requested.load(Ordering::SeqCst) {
                        break;
                    }
                }
                _ = shutdown.changed() => {
                    tracing::debug!("Shutdown requested, closing connection");
                    break;
                }
            }
        }

        keepalive.abort();
        let _ = keepalive.await;
        drop(tx);

        if tokio::time::timeout(WRITER_SHUTDOWN_TIMEOUT, &mut writer)
            .await
            .is_err()
        {
            tracing::warn!("Writer did not finish in time");
            writer.abort();
        }
    }

    async fn write_loop(self: Arc<Self>, mut sink: SocketSink, mut rx: mpsc::Receiver<OutboundFrame>) {
        while let Some(frame) = rx.recv().await {
            let message = match frame {
                OutboundFrame::Ack(ack) => match ack.to_json() {
                    Ok(json) => Message::Text(json),
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to encode ack");
                        continue;
                    }
                },
                OutboundFrame::Keepalive => Message::Ping(Vec::new()),
            };

            if let Err(e) = sink.send(message).await {
                tracing::warn!(error = %e, "Failed to write frame");
                self.request_reconnect("write failed");
                return;
            }
        }

        if let Err(e) = sink.close().await {
            tracing::debug!(error = %e, "WebSocket close failed");
        }
    }

    async fn keepalive_loop(self: Arc<Self>, tx: mpsc::Sender<OutboundFrame>) {
        let mut ticker = tokio::time::interval(self.config.keepalive_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if tx.send(OutboundFrame::Keepalive).await.is_err() {
                tracing::warn!("Keepalive failed, connection is dead");
                self.request_reconnect("keepalive failed");
                return;
            }
            tracing::trace!("Keepalive queued");
        }
    }

    /// Process one inbound text frame
    ///
    /// Envelopes with a non-empty id are acknowledged exactly once, before dispatch,
    /// whatever the dispatch outcome.
    pub async fn handle_frame(&self, text: &str, outbound: &mpsc::Sender<OutboundFrame>) -> FrameOutcome {
        if is_peer_liveness(text) {
            tracing::trace!("Peer liveness frame discarded");
            return FrameOutcome::Liveness;
        }

        let envelope = match Envelope::decode(text) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(error = %e, len = text.len(), "Dropping malformed frame");
                return FrameOutcome::Malformed;
            }
        };

        if let Some(id) = envelope.ack_id() {
            if outbound.send(OutboundFrame::ack(id)).await.is_err() {
                tracing::warn!(envelope_id = %id, "Failed to queue ack");
            }
        }

        match &envelope.kind {
            EnvelopeKind::Hello => {
                self.set_state(SessionState::Connected);
                tracing::info!("Socket Mode hello received");
                FrameOutcome::Hello
            }
            EnvelopeKind::Disconnect => {
                tracing::info!(
                    reason = envelope.reason.as_deref().unwrap_or("unspecified"),
                    "Disconnect requested by server"
                );
                self.request_reconnect("disconnect envelope");
                FrameOutcome::Disconnect
            }
            EnvelopeKind::Event | EnvelopeKind::Command => {
                let dispatch = AssertUnwindSafe(self.dispatcher.dispatch(&envelope)).catch_unwind();
                match dispatch.await {
                    Ok(()) => FrameOutcome::Dispatched,
                    Err(panic) => {
                        tracing::error!(
                            envelope_id = ?envelope.id,
                            kind = %envelope.kind,
                            panic = %panic_message(&*panic),
                            "Handler panicked"
                        );
                        FrameOutcome::HandlerPanicked
                    }
                }
            }
            EnvelopeKind::Interactive => {
                tracing::debug!(envelope_id = ?envelope.id, "Interactive envelope ignored");
                FrameOutcome::Ignored
            }
            EnvelopeKind::Unknown(kind) => {
                tracing::info!(kind = %kind, "Unknown envelope type");
                FrameOutcome::Ignored
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic")
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("state", &self.state())
            .field("stopped", &self.is_stopped())
            .field("connections", &self.connection_count())
            .finish()
    }
}
