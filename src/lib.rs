pub mod capture;
pub mod config;
pub mod notify;
pub mod template_matching;
pub mod watcher;

pub use capture::{Frame, FrameSource, Region};
pub use config::{Overrides, WatchConfig};
pub use notify::{Dispatcher, NotificationPolicy};
pub use template_matching::{MultiTemplateEvaluator, Template};
pub use watcher::{AlertState, SessionManager, WatchSession, WatchSummary};
