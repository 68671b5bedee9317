use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::watcher::WatcherEvent;

/// Single-shot idle timer. Every `reset` bumps a generation; a timer that
/// expires after a newer reset compares generations and stays silent.
/// Once fired it is not rearmed until the next `reset`.
pub(crate) struct IdleWatchdog {
    generation_tx: watch::Sender<u64>,
    handle: JoinHandle<()>,
}

impl IdleWatchdog {
    pub(crate) fn spawn(timeout: Duration, event_tx: mpsc::UnboundedSender<WatcherEvent>) -> Self {
        let (generation_tx, generation_rx) = watch::channel(0_u64);
        let handle = tokio::spawn(run_idle_watchdog(timeout, generation_rx, event_tx));

        Self {
            generation_tx,
            handle,
        }
    }

    pub(crate) fn reset(&self) {
        self.generation_tx
            .send_modify(|generation| *generation = generation.wrapping_add(1));
    }
}

impl Drop for IdleWatchdog {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run_idle_watchdog(
    timeout: Duration,
    mut generation_rx: watch::Receiver<u64>,
    event_tx: mpsc::UnboundedSender<WatcherEvent>,
) {
    loop {
        // Disarmed until the next line arrives.
        if generation_rx.changed().await.is_err() {
            return;
        }

        loop {
            let armed_generation = *generation_rx.borrow_and_update();

            tokio::select! {
                _ = tokio::time::sleep(timeout) => {
                    if *generation_rx.borrow() == armed_generation {
                        tracing::info!(
                            idle_seconds = timeout.as_secs(),
                            "No combat log data received within idle timeout"
                        );
                        if event_tx.send(WatcherEvent::IdleTimeout { idle: timeout }).is_err() {
                            tracing::debug!("Idle timeout receiver dropped");
                            return;
                        }
                    }
                    break;
                }
                changed = generation_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::IdleWatchdog;
    use crate::combat_log::watcher::WatcherEvent;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::Instant;

    const TIMEOUT: Duration = Duration::from_secs(600);

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_silence() {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let watchdog = IdleWatchdog::spawn(TIMEOUT, event_tx);
        let started_at = Instant::now();

        watchdog.reset();

        let event = event_rx.recv().await.expect("Expected an idle timeout event");
        assert!(matches!(event, WatcherEvent::IdleTimeout { idle } if idle == TIMEOUT));
        assert!(started_at.elapsed() >= TIMEOUT);

        let second = tokio::time::timeout(TIMEOUT * 3, event_rx.recv()).await;
        assert!(second.is_err(), "Watchdog must not rearm without new lines");
    }

    #[tokio::test(start_paused = true)]
    async fn reset_pushes_expiry_back() {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let watchdog = IdleWatchdog::spawn(TIMEOUT, event_tx);
        let started_at = Instant::now();

        watchdog.reset();
        tokio::time::sleep(Duration::from_secs(300)).await;
        watchdog.reset();

        event_rx.recv().await.expect("Expected an idle timeout event");
        assert!(
            started_at.elapsed() >= Duration::from_secs(900),
            "Expiry should be measured from the latest reset"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stays_silent_before_first_line() {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let _watchdog = IdleWatchdog::spawn(TIMEOUT, event_tx);

        let event = tokio::time::timeout(TIMEOUT * 2, event_rx.recv()).await;
        assert!(event.is_err());
    }
}
