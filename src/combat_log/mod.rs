pub mod line;
pub mod state;
mod watchdog;
pub mod watcher;

pub use line::{decode_log_line, LogLine, LogRecord, RawLogLine};
pub use state::{GameState, SharedGameState};
pub use watcher::{CombatLogWatcher, ConnectionState, PartyMember, TransportError, WatcherEvent};
