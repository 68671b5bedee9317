use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use super::line::{decode_log_line, LogLine, RawLogLine};
use super::state::{GameState, SharedGameState};
use super::watchdog::IdleWatchdog;
use crate::settings::WatcherSettings;

const SUBSCRIBED_EVENTS: [&str; 5] = [
    "LogLine",
    "onZoneChangedEvent",
    "onInCombatChangedEvent",
    "onPlayerChangedEvent",
    "PartyChanged",
];

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Failed to connect to '{url}': {message}")]
    Connect { url: String, message: String },

    #[error("Failed to send frame: {0}")]
    Send(String),

    #[error("Connection read error: {0}")]
    Read(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyMember {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub world_id: u32,
    #[serde(default)]
    pub job: u32,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub in_party: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WatcherEvent {
    Line(LogLine),
    ZoneChanged {
        zone_id: Option<u32>,
        zone_name: Option<String>,
    },
    CombatChanged {
        in_combat: bool,
    },
    PlayerIdentified {
        player_id: String,
    },
    PartyChanged {
        members: Vec<PartyMember>,
    },
    IdleTimeout {
        idle: Duration,
    },
    ForceStop,
}

impl WatcherEvent {
    /// True when the watcher folded this event into the cached game state
    /// before emitting it.
    pub fn updates_game_state(&self) -> bool {
        matches!(
            self,
            WatcherEvent::Line(_)
                | WatcherEvent::ZoneChanged { .. }
                | WatcherEvent::CombatChanged { .. }
                | WatcherEvent::PlayerIdentified { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct WatchControl {
    should_watch: bool,
    reconnect_enabled: bool,
}

impl WatchControl {
    fn may_connect(&self) -> bool {
        self.should_watch && self.reconnect_enabled
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum InboundFrame {
    LogLine {
        #[serde(rename = "rawLine")]
        raw_line: Option<String>,
    },
    #[serde(rename = "onZoneChangedEvent")]
    ZoneChanged { detail: ZoneChangedDetail },
    #[serde(rename = "onInCombatChangedEvent")]
    CombatChanged { detail: CombatChangedDetail },
    #[serde(rename = "onPlayerChangedEvent")]
    PlayerChanged { detail: PlayerChangedDetail },
    PartyChanged {
        #[serde(default)]
        party: Vec<PartyMember>,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Deserialize)]
struct ZoneChangedDetail {
    #[serde(default, rename = "zoneID")]
    zone_id: Option<u32>,
    #[serde(default, rename = "zoneName")]
    zone_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CombatChangedDetail {
    #[serde(default, rename = "inGameCombat")]
    in_game_combat: bool,
}

#[derive(Debug, Deserialize)]
struct PlayerChangedDetail {
    #[serde(default)]
    id: u64,
}

/// Everything the connection task needs; cloned into it on `connect`.
#[derive(Clone)]
struct ConnectionContext {
    endpoint_url: String,
    reconnect_delay: Duration,
    connection_state: Arc<RwLock<ConnectionState>>,
    game_state: SharedGameState,
    event_tx: mpsc::UnboundedSender<WatcherEvent>,
    watchdog: Arc<IdleWatchdog>,
}

/// Persistent client for the upstream overlay WebSocket. Decoded lines and
/// state events are pushed into the channel returned by `new`.
pub struct CombatLogWatcher {
    context: ConnectionContext,
    control_tx: watch::Sender<WatchControl>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl CombatLogWatcher {
    /// Must be called from within a tokio runtime; the idle watchdog task is
    /// spawned immediately.
    pub fn new(settings: &WatcherSettings) -> (Self, mpsc::UnboundedReceiver<WatcherEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let watchdog = IdleWatchdog::spawn(settings.idle_timeout(), event_tx.clone());
        let (control_tx, _control_rx) = watch::channel(WatchControl::default());

        let watcher = Self {
            context: ConnectionContext {
                endpoint_url: settings.endpoint_url.clone(),
                reconnect_delay: settings.reconnect_delay(),
                connection_state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
                game_state: Arc::new(RwLock::new(GameState::default())),
                event_tx,
                watchdog: Arc::new(watchdog),
            },
            control_tx,
            handle: Mutex::new(None),
        };

        (watcher, event_rx)
    }

    /// Requests a persistent connection. Nothing is opened until reconnect is
    /// also enabled by the game-process liveness gate.
    pub fn connect(&self) {
        self.control_tx
            .send_modify(|control| control.should_watch = true);

        let mut handle = match self.handle.lock() {
            Ok(handle) => handle,
            Err(error) => {
                tracing::error!(lock_error = %error, "Failed to lock combat log watcher handle");
                return;
            }
        };

        if handle.as_ref().is_some_and(|task| !task.is_finished()) {
            return;
        }

        let context = self.context.clone();
        let control_rx = self.control_tx.subscribe();
        *handle = Some(tokio::spawn(run_connection_loop(context, control_rx)));
    }

    /// Idempotent. Cancels any pending reconnect and closes the socket.
    pub fn disconnect(&self) {
        tracing::info!("Unwatching combat log stream");
        self.control_tx
            .send_modify(|control| control.should_watch = false);

        match self.handle.lock() {
            Ok(mut handle) => {
                if let Some(task) = handle.take() {
                    task.abort();
                }
            }
            Err(error) => {
                tracing::error!(lock_error = %error, "Failed to lock combat log watcher handle");
            }
        }

        self.context.set_connection_state(ConnectionState::Disconnected);
    }

    pub fn enable_reconnect(&self) {
        tracing::info!("Enabling combat log reconnect");
        self.control_tx
            .send_modify(|control| control.reconnect_enabled = true);
    }

    pub fn disable_reconnect(&self) {
        tracing::info!("Disabling combat log reconnect");
        self.control_tx
            .send_modify(|control| control.reconnect_enabled = false);
    }

    pub fn current_game_state(&self) -> GameState {
        match self.context.game_state.read() {
            Ok(state) => state.clone(),
            Err(error) => {
                tracing::error!(lock_error = %error, "Failed to read cached game state");
                GameState::default()
            }
        }
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.context
            .connection_state
            .read()
            .map(|state| *state)
            .unwrap_or(ConnectionState::Disconnected)
    }

    pub fn request_force_stop(&self) {
        if self.context.event_tx.send(WatcherEvent::ForceStop).is_err() {
            tracing::debug!("Force stop requested but event receiver dropped");
        }
    }

    /// Feeds one inbound frame through the same path as the socket does.
    pub fn handle_frame(&self, text: &str) {
        self.context.handle_frame(text);
    }
}

impl Drop for CombatLogWatcher {
    fn drop(&mut self) {
        if let Ok(mut handle) = self.handle.lock() {
            if let Some(task) = handle.take() {
                task.abort();
            }
        }
    }
}

impl ConnectionContext {
    fn set_connection_state(&self, next_state: ConnectionState) {
        match self.connection_state.write() {
            Ok(mut state) => *state = next_state,
            Err(error) => {
                tracing::error!(lock_error = %error, "Failed to update connection state");
            }
        }
    }

    fn update_game_state(&self, update: impl FnOnce(&mut GameState)) {
        match self.game_state.write() {
            Ok(mut state) => update(&mut state),
            Err(error) => {
                tracing::error!(lock_error = %error, "Failed to update cached game state");
            }
        }
    }

    fn emit(&self, event: WatcherEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::debug!("Combat log event receiver dropped");
        }
    }

    fn handle_frame(&self, text: &str) {
        let frame = match serde_json::from_str::<InboundFrame>(text) {
            Ok(frame) => frame,
            Err(error) => {
                tracing::debug!(parse_error = %error, "Dropping malformed frame");
                return;
            }
        };

        let received_at = Utc::now();

        match frame {
            InboundFrame::LogLine { raw_line } => {
                let Some(raw) = raw_line.as_deref().and_then(RawLogLine::parse) else {
                    return;
                };

                let line = decode_log_line(raw, received_at);
                self.update_game_state(|state| state.apply_log_line(&line));
                self.watchdog.reset();
                self.emit(WatcherEvent::Line(line));
            }
            InboundFrame::ZoneChanged { detail } => {
                tracing::info!(
                    zone_id = ?detail.zone_id,
                    zone_name = detail.zone_name.as_deref().unwrap_or(""),
                    "Received zone change event"
                );
                self.update_game_state(|state| {
                    state.apply_zone_changed(detail.zone_id, detail.zone_name.as_deref(), received_at)
                });
                self.emit(WatcherEvent::ZoneChanged {
                    zone_id: detail.zone_id,
                    zone_name: detail.zone_name,
                });
            }
            InboundFrame::CombatChanged { detail } => {
                tracing::info!(in_combat = detail.in_game_combat, "Received combat change event");
                self.update_game_state(|state| {
                    state.apply_combat_changed(detail.in_game_combat, received_at)
                });
                self.emit(WatcherEvent::CombatChanged {
                    in_combat: detail.in_game_combat,
                });
            }
            InboundFrame::PlayerChanged { detail } => {
                if detail.id == 0 {
                    return;
                }

                let player_id = format!("{:X}", detail.id);
                let mut first_identification = false;
                self.update_game_state(|state| {
                    first_identification = state.apply_player_identified(&player_id);
                });

                if first_identification {
                    tracing::info!(player_id = %player_id, "Received player changed event");
                    self.emit(WatcherEvent::PlayerIdentified { player_id });
                }
            }
            InboundFrame::PartyChanged { party } => {
                tracing::info!(members = party.len(), "Received party changed event");
                self.emit(WatcherEvent::PartyChanged { members: party });
            }
            InboundFrame::Unsupported => {}
        }
    }
}

fn subscribe_frames() -> [String; 2] {
    [
        json!({ "call": "subscribe", "events": SUBSCRIBED_EVENTS }).to_string(),
        json!({ "call": "cactbotRequestState" }).to_string(),
    ]
}

async fn run_connection_loop(
    context: ConnectionContext,
    mut control_rx: watch::Receiver<WatchControl>,
) {
    loop {
        let control = *control_rx.borrow_and_update();
        if !control.should_watch {
            break;
        }

        if !control.reconnect_enabled {
            context.set_connection_state(ConnectionState::Disconnected);
            if control_rx.changed().await.is_err() {
                break;
            }
            continue;
        }

        context.set_connection_state(ConnectionState::Connecting);
        tracing::info!(url = %context.endpoint_url, "Connecting to combat log stream");

        // Connect failures and unexpected closes share the reconnect path.
        if let Err(error) = pump_connection(&context, &mut control_rx).await {
            tracing::warn!("Combat log connection error: {error}");
        }

        context.set_connection_state(ConnectionState::Disconnected);

        if !wait_for_reconnect(&mut control_rx, context.reconnect_delay).await {
            break;
        }
    }

    context.set_connection_state(ConnectionState::Disconnected);
    tracing::debug!("Combat log connection loop stopped");
}

async fn pump_connection(
    context: &ConnectionContext,
    control_rx: &mut watch::Receiver<WatchControl>,
) -> Result<(), TransportError> {
    let (mut socket, _response) =
        connect_async(context.endpoint_url.as_str())
            .await
            .map_err(|error| TransportError::Connect {
                url: context.endpoint_url.clone(),
                message: error.to_string(),
            })?;

    context.set_connection_state(ConnectionState::Connected);
    tracing::info!("Combat log stream connected");

    for frame in subscribe_frames() {
        socket
            .send(Message::Text(frame))
            .await
            .map_err(|error| TransportError::Send(error.to_string()))?;
    }

    loop {
        tokio::select! {
            next = socket.next() => {
                match next {
                    Some(Ok(Message::Text(text))) => context.handle_frame(&text),
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::info!("Combat log stream closed");
                        return Ok(());
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(error)) => return Err(TransportError::Read(error.to_string())),
                }
            }
            changed = control_rx.changed() => {
                let keep_open = changed.is_ok() && control_rx.borrow().may_connect();
                if !keep_open {
                    if let Err(error) = socket.close(None).await {
                        tracing::debug!("Failed to close combat log socket cleanly: {error}");
                    }
                    return Ok(());
                }
            }
        }
    }
}

/// Sleeps out the reconnect delay. Returns `false` when watching was
/// cancelled in the meantime.
async fn wait_for_reconnect(
    control_rx: &mut watch::Receiver<WatchControl>,
    reconnect_delay: Duration,
) -> bool {
    let control = *control_rx.borrow_and_update();
    if !control.should_watch {
        return false;
    }
    if !control.reconnect_enabled {
        return true;
    }

    tracing::info!(
        delay_seconds = reconnect_delay.as_secs(),
        "Scheduling combat log reconnect"
    );

    let sleep = tokio::time::sleep(reconnect_delay);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            _ = &mut sleep => return true,
            changed = control_rx.changed() => {
                if changed.is_err() {
                    return false;
                }
                let control = *control_rx.borrow_and_update();
                if !control.should_watch {
                    return false;
                }
                if !control.reconnect_enabled {
                    return true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        subscribe_frames, wait_for_reconnect, CombatLogWatcher, ConnectionState, WatchControl,
        WatcherEvent,
    };
    use crate::combat_log::line::LogRecord;
    use crate::settings::WatcherSettings;
    use futures_util::StreamExt;
    use std::time::Duration;
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::watch;
    use tokio::time::Instant;
    use tokio_tungstenite::tungstenite::Message;
    use tokio_tungstenite::WebSocketStream;

    const WATCHING: WatchControl = WatchControl {
        should_watch: true,
        reconnect_enabled: true,
    };

    async fn accept_subscriber(listener: &TcpListener) -> WebSocketStream<TcpStream> {
        let (stream, _) = tokio::time::timeout(Duration::from_secs(5), listener.accept())
            .await
            .expect("Watcher did not reconnect in time")
            .expect("Failed to accept watcher connection");
        let mut socket = tokio_tungstenite::accept_async(stream)
            .await
            .expect("WebSocket handshake failed");

        let Some(Ok(Message::Text(frame))) = socket.next().await else {
            panic!("Expected the subscribe frame first");
        };
        assert!(frame.contains("subscribe"), "Unexpected first frame: {frame}");
        socket
    }

    fn watcher() -> (
        CombatLogWatcher,
        tokio::sync::mpsc::UnboundedReceiver<WatcherEvent>,
    ) {
        CombatLogWatcher::new(&WatcherSettings::default())
    }

    #[tokio::test]
    async fn log_line_frames_update_state_and_push_decoded_lines() {
        let (watcher, mut events) = watcher();

        watcher.handle_frame(
            r#"{"type":"LogLine","rawLine":"265|2025-03-14T20:15:11.0000000Z|3D2|the Aitiascope|True|0|0|0|0|0|hash"}"#,
        );

        let Some(WatcherEvent::Line(line)) = events.recv().await else {
            panic!("Expected a decoded line event");
        };
        assert!(matches!(line.record, LogRecord::ContentFinderSettings(_)));

        let state = watcher.current_game_state();
        assert_eq!(state.zone_id, Some(978));
        assert!(state.in_content_finder_content);
    }

    #[tokio::test]
    async fn malformed_and_unsupported_frames_are_dropped() {
        let (watcher, mut events) = watcher();

        watcher.handle_frame("not json at all");
        watcher.handle_frame(r#"{"type":"ChangeMap","mapID":12}"#);
        watcher.handle_frame(r#"{"type":"LogLine"}"#);
        watcher.handle_frame(r#"{"type":"LogLine","rawLine":""}"#);
        watcher.request_force_stop();

        assert_eq!(events.recv().await, Some(WatcherEvent::ForceStop));
    }

    #[tokio::test]
    async fn player_changed_is_reported_once_as_upper_hex() {
        let (watcher, mut events) = watcher();

        watcher.handle_frame(r#"{"type":"onPlayerChangedEvent","detail":{"id":275447809}}"#);
        watcher.handle_frame(r#"{"type":"onPlayerChangedEvent","detail":{"id":275447810}}"#);
        watcher.request_force_stop();

        assert_eq!(
            events.recv().await,
            Some(WatcherEvent::PlayerIdentified {
                player_id: "106AF501".to_string()
            })
        );
        assert_eq!(events.recv().await, Some(WatcherEvent::ForceStop));
        assert_eq!(
            watcher.current_game_state().player_id.as_deref(),
            Some("106AF501")
        );
    }

    #[tokio::test]
    async fn state_events_are_forwarded() {
        let (watcher, mut events) = watcher();

        watcher.handle_frame(
            r#"{"type":"onZoneChangedEvent","detail":{"zoneID":129,"zoneName":"Limsa Lominsa"}}"#,
        );
        watcher.handle_frame(r#"{"type":"onInCombatChangedEvent","detail":{"inGameCombat":true}}"#);
        watcher.handle_frame(
            r#"{"type":"PartyChanged","party":[{"id":"10FF0001","name":"Alpha Beta","worldId":74,"job":19,"level":100,"inParty":true}]}"#,
        );

        assert_eq!(
            events.recv().await,
            Some(WatcherEvent::ZoneChanged {
                zone_id: Some(129),
                zone_name: Some("Limsa Lominsa".to_string())
            })
        );
        assert_eq!(
            events.recv().await,
            Some(WatcherEvent::CombatChanged { in_combat: true })
        );
        let Some(WatcherEvent::PartyChanged { members }) = events.recv().await else {
            panic!("Expected a party changed event");
        };
        assert_eq!(members.len(), 1);
        assert!(members[0].in_party);

        let state = watcher.current_game_state();
        assert!(state.in_combat);
        assert_eq!(state.zone_id, Some(129));
    }

    #[tokio::test]
    async fn stays_disconnected_until_reconnect_is_enabled() {
        let (watcher, _events) = watcher();

        watcher.connect();
        tokio::task::yield_now().await;
        assert_eq!(watcher.connection_state(), ConnectionState::Disconnected);

        watcher.disconnect();
        watcher.disconnect();
        assert_eq!(watcher.connection_state(), ConnectionState::Disconnected);
    }

    #[test]
    fn subscribes_to_log_lines_and_requests_state() {
        let [subscribe, request_state] = subscribe_frames();
        let subscribe: serde_json::Value =
            serde_json::from_str(&subscribe).expect("Subscribe frame should be JSON");

        assert_eq!(subscribe["call"], "subscribe");
        assert_eq!(subscribe["events"][0], "LogLine");
        assert!(request_state.contains("cactbotRequestState"));
    }

    #[tokio::test(start_paused = true)]
    async fn reconnect_fires_after_the_fixed_delay() {
        let (_control_tx, mut control_rx) = watch::channel(WATCHING);
        let started = Instant::now();

        assert!(wait_for_reconnect(&mut control_rx, Duration::from_secs(5)).await);

        let waited = started.elapsed();
        assert!(waited >= Duration::from_secs(5), "Reconnected early after {waited:?}");
        assert!(waited < Duration::from_secs(6), "Reconnected late after {waited:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn unwatching_cancels_a_pending_reconnect() {
        let (control_tx, mut control_rx) = watch::channel(WATCHING);
        let unwatch = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            control_tx.send_modify(|control| control.should_watch = false);
            control_tx
        });
        let started = Instant::now();

        assert!(!wait_for_reconnect(&mut control_rx, Duration::from_secs(5)).await);
        assert!(started.elapsed() < Duration::from_secs(5));
        let _control_tx = unwatch.await.expect("Unwatch task panicked");
    }

    #[tokio::test(start_paused = true)]
    async fn disabling_reconnect_ends_the_wait_early() {
        let (control_tx, mut control_rx) = watch::channel(WATCHING);
        let disable = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            control_tx.send_modify(|control| control.reconnect_enabled = false);
            control_tx
        });
        let started = Instant::now();

        // The loop then parks until reconnect is enabled again.
        assert!(wait_for_reconnect(&mut control_rx, Duration::from_secs(5)).await);
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(!control_rx.borrow().may_connect());
        let _control_tx = disable.await.expect("Disable task panicked");
    }

    #[tokio::test]
    async fn refused_connection_and_dropped_socket_both_retry() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let address = listener.local_addr().expect("Listener should have an address");
        drop(listener);

        let settings = WatcherSettings {
            endpoint_url: format!("ws://{address}/ws"),
            reconnect_delay_seconds: 1,
            ..WatcherSettings::default()
        };
        let (watcher, _events) = CombatLogWatcher::new(&settings);
        watcher.enable_reconnect();
        watcher.connect();

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_ne!(watcher.connection_state(), ConnectionState::Connected);

        let listener = TcpListener::bind(address)
            .await
            .expect("Failed to rebind test listener");
        let first = accept_subscriber(&listener).await;
        drop(first);

        let _second = accept_subscriber(&listener).await;
        assert_eq!(watcher.connection_state(), ConnectionState::Connected);

        watcher.disconnect();
        assert_eq!(watcher.connection_state(), ConnectionState::Disconnected);
    }
}
