use clap::{Parser, Subcommand};
use screen_watcher::config::Overrides;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "👀 Watch a screen region and alert when a template appears"
)]
pub struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "watcher.toml", global = true)]
    pub config: PathBuf,

    /// Verbose logging (per-tick decisions, snapshot paths).
    #[arg(long, global = true)]
    pub debug: bool,

    /// Override matching.threshold.
    #[arg(long, value_name = "SCORE", global = true)]
    pub threshold: Option<f64>,

    /// Override runtime.interval_sec.
    #[arg(long, value_name = "SECS", global = true)]
    pub interval: Option<f64>,

    /// Override runtime.debounce_count.
    #[arg(long, value_name = "N", global = true)]
    pub debounce: Option<i64>,

    /// Override runtime.cooldown_sec.
    #[arg(long, value_name = "SECS", global = true)]
    pub cooldown: Option<f64>,

    /// Read frames from PNG/JPEG files in DIR instead of the screen.
    #[arg(long, value_name = "DIR", global = true)]
    pub replay: Option<PathBuf>,

    /// Watch with a named preset's templates.
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Print an example config and exit.
    #[arg(long)]
    pub print_example: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Store the watched region in the config file.
    Roi {
        #[arg(long)]
        left: i64,
        #[arg(long)]
        top: i64,
        #[arg(long)]
        width: i64,
        #[arg(long)]
        height: i64,
    },
    /// Line-based control panel on stdin: `<preset>`, `start`, `stop`, `list`, `quit`.
    Panel {
        /// Seconds to wait for the active session to stop before switching.
        #[arg(long, value_name = "SECS", default_value_t = 5.0)]
        stop_timeout: f64,
    },
}

impl Args {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            threshold: self.threshold,
            interval_sec: self.interval,
            debounce_count: self.debounce,
            cooldown_sec: self.cooldown,
        }
    }
}
