/// Watch sessions: the alert state machine, the tick loop and its lifecycle
///
/// - `alert_state`: debounce and cooldown decisions per tick
/// - `watch_loop`: capture, evaluate, decide and dispatch on an interval
/// - `session`: start / stop handle around one spawned loop
/// - `manager`: preset switching with a bounded stop of the previous session
pub mod alert_state;
pub mod artifacts;
pub mod error;
pub mod manager;
pub mod session;
pub mod types;
pub mod watch_loop;


pub use alert_state::AlertState;
pub use artifacts::{DebugArtifacts, snapshot_name};
pub use error::{WatchError, WatchResult};
pub use manager::{DEFAULT_SESSION, SessionManager};
pub use session::{WatchSession, load_evaluator};
pub use types::{AlertPhase, AlertPolicy, Decision, DebugPolicy, WatchSummary};
pub use watch_loop::WatchLoop;
