pub mod classifier;
pub mod combat_log;
pub mod encounter;
pub mod recording;
pub mod settings;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

use classifier::EncounterClassifier;
use combat_log::CombatLogWatcher;
use recording::dry_run::{AssumeGameRunning, DryRunRecorder, JsonQueue};
use recording::{DrainOutcome, EncounterController, GameProcess, Recorder, VideoQueue};
use settings::WatcherSettings;

const DEFAULT_LOG_DIRECTIVE: &str = "xivpov=info";
const LIVENESS_POLL_INTERVAL: Duration = Duration::from_secs(5);

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));

    if let Err(error) = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init()
    {
        eprintln!("Failed to initialize tracing: {error}");
    }
}

/// Dry-run entry point used by the binary.
pub async fn run() -> Result<(), String> {
    init_tracing();

    let settings = match WatcherSettings::resolve_path(std::env::args().nth(1)) {
        Some(path) => WatcherSettings::load(&path).map_err(|error| error.to_string())?,
        None => WatcherSettings::default(),
    };

    tracing::info!(endpoint_url = %settings.endpoint_url, "Starting xivpov in dry-run mode");

    let shutdown = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {error}");
        }
    };

    run_pipeline(
        settings,
        Arc::new(DryRunRecorder::default()),
        Arc::new(JsonQueue),
        Arc::new(AssumeGameRunning),
        shutdown,
    )
    .await;

    Ok(())
}

/// Connects the watcher, replays the cached state once the first state
/// resend lands, then feeds every event through the classifier one at a
/// time until `shutdown` resolves.
pub async fn run_pipeline(
    settings: WatcherSettings,
    recorder: Arc<dyn Recorder>,
    queue: Arc<dyn VideoQueue>,
    game_process: Arc<dyn GameProcess>,
    shutdown: impl Future<Output = ()>,
) {
    let (watcher, mut events) = CombatLogWatcher::new(&settings);
    let mut controller =
        EncounterController::new(&settings, recorder, queue, Arc::clone(&game_process));
    let mut classifier = EncounterClassifier::new();
    let mut pending_drains: Vec<JoinHandle<DrainOutcome>> = Vec::new();

    let status_logger = spawn_status_logger(&controller);

    let mut game_running = game_process.is_running();
    apply_liveness_gate(&watcher, game_running);
    watcher.connect();

    // The cache is empty until the upstream answers the state request sent on
    // connect, so recovery waits for the first event that fed it.
    let mut recovered = false;
    let mut liveness_poll = tokio::time::interval(LIVENESS_POLL_INTERVAL);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutdown requested");
                break;
            }
            event = events.recv() => {
                let Some(event) = event else {
                    tracing::warn!("Combat log event stream closed");
                    break;
                };

                if !recovered && event.updates_game_state() {
                    recovered = true;
                    if let Some(drain) = classifier
                        .recover(&mut controller, &watcher.current_game_state(), Utc::now())
                        .await
                    {
                        pending_drains.push(drain);
                    }
                }

                if let Some(drain) = classifier.handle_event(&mut controller, event, Utc::now()).await {
                    pending_drains.push(drain);
                }
                pending_drains.retain(|drain| !drain.is_finished());
            }
            _ = liveness_poll.tick() => {
                let now_running = game_process.is_running();
                if now_running != game_running {
                    game_running = now_running;
                    apply_liveness_gate(&watcher, game_running);
                }
            }
        }
    }

    watcher.disconnect();

    if let Some(drain) = controller.finish_activity(Utc::now(), false) {
        pending_drains.push(drain);
    }

    for drain in pending_drains {
        match drain.await {
            Ok(outcome) => tracing::debug!(?outcome, "Encounter drain finished"),
            Err(error) => tracing::error!("Encounter drain task failed: {error}"),
        }
    }

    status_logger.abort();
}

fn apply_liveness_gate(watcher: &CombatLogWatcher, game_running: bool) {
    if game_running {
        watcher.enable_reconnect();
    } else {
        watcher.disable_reconnect();
    }
}

fn spawn_status_logger(controller: &EncounterController) -> JoinHandle<()> {
    let mut status_rx = controller.subscribe();

    tokio::spawn(async move {
        loop {
            match status_rx.recv().await {
                Ok(event) => tracing::debug!(?event, "Recording status changed"),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Recording status logger lagged");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::run_pipeline;
    use crate::classifier::UNKNOWN_BOSS_NAME;
    use crate::recording::dry_run::{DryRunRecorder, JsonQueue};
    use crate::recording::session::tests::{FakeGame, FakeQueue, FakeRecorder};
    use crate::recording::GameProcess;
    use crate::settings::WatcherSettings;
    use futures_util::{SinkExt, StreamExt};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio_tungstenite::tungstenite::Message;

    struct GameClosed;

    impl GameProcess for GameClosed {
        fn is_running(&self) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn pipeline_stops_on_shutdown_without_a_running_game() {
        let pipeline = run_pipeline(
            WatcherSettings::default(),
            Arc::new(DryRunRecorder::default()),
            Arc::new(JsonQueue),
            Arc::new(GameClosed),
            async {},
        );

        tokio::time::timeout(std::time::Duration::from_secs(5), pipeline)
            .await
            .expect("Pipeline should return once shutdown resolves");
    }

    #[tokio::test]
    async fn pipeline_recovers_pull_from_state_resent_on_connect() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let address = listener.local_addr().expect("Listener should have an address");

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("Watcher never connected");
            let mut socket = tokio_tungstenite::accept_async(stream)
                .await
                .expect("WebSocket handshake failed");

            // Combat arrives before the zone, as it can in a state resend.
            for frame in [
                r#"{"type":"onPlayerChangedEvent","detail":{"id":268435457}}"#,
                r#"{"type":"onInCombatChangedEvent","detail":{"inGameCombat":true}}"#,
                r#"{"type":"onZoneChangedEvent","detail":{"zoneID":1196,"zoneName":"Worqor Lar Dor (Extreme)"}}"#,
            ] {
                socket
                    .send(Message::Text(frame.to_string()))
                    .await
                    .expect("Failed to send state frame");
            }

            while let Some(Ok(_)) = socket.next().await {}
        });

        let settings = WatcherSettings {
            endpoint_url: format!("ws://{address}/ws"),
            ..WatcherSettings::default()
        };
        let recorder = Arc::new(FakeRecorder::default());
        let queue = Arc::new(FakeQueue::default());

        let started = Arc::clone(&recorder);
        let shutdown = async move {
            while started
                .start_offsets
                .lock()
                .expect("Recorder lock poisoned")
                .is_empty()
            {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        };

        let pipeline = run_pipeline(
            settings,
            recorder.clone(),
            queue.clone(),
            Arc::new(FakeGame(true)),
            shutdown,
        );
        tokio::time::timeout(Duration::from_secs(10), pipeline)
            .await
            .expect("Recovered pull was never started");
        server.abort();

        assert_eq!(
            *recorder.start_offsets.lock().expect("Recorder lock poisoned"),
            vec![0.0],
            "Recovered pulls start at the recovery instant"
        );
        let queued = queue.queued();
        assert_eq!(queued.len(), 1, "Shutdown should drain the recovered pull");
        assert_eq!(queued[0].metadata.boss_name.as_deref(), Some(UNKNOWN_BOSS_NAME));
        assert_eq!(queued[0].metadata.pull, Some(1));
        assert!(!queued[0].metadata.result);
    }
}
