mod args;

use args::{Args, Command};
use clap::Parser;
use log::{error, info, warn};
use screen_watcher::capture::{self, CaptureError, FrameSource, ReplaySource};
use screen_watcher::config::{self, ConfigError, RegionSection, WatchConfig};
use screen_watcher::notify::SystemChannels;
use screen_watcher::watcher::{DEFAULT_SESSION, SessionManager, WatchResult, WatchSession};
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

const EXAMPLE_CONFIG: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/watcher.example.toml"));

const STOP_TIMEOUT: Duration = Duration::from_secs(5);

fn main() -> ExitCode {
    let args = Args::parse();

    if args.print_example {
        print!("{EXAMPLE_CONFIG}");
        return ExitCode::SUCCESS;
    }

    init_logging(args.debug);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("❌ Failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = rt.block_on(async {
        match args.command.clone() {
            Some(Command::Roi {
                left,
                top,
                width,
                height,
            }) => run_roi(&args, RegionSection {
                left,
                top,
                width,
                height,
            }),
            Some(Command::Panel { stop_timeout }) => run_panel(&args, stop_timeout).await,
            None => run_watch(&args).await,
        }
    });

    // A pending stdin read cannot be cancelled; don't wait on it
    rt.shutdown_timeout(Duration::from_millis(200));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();
}

/// Start a session on the live screen, or on replayed frames when `replay` is set.
fn start_session(label: &str, config: &WatchConfig, replay: Option<&Path>) -> WatchResult<WatchSession> {
    match replay {
        Some(dir) => {
            let source = ReplaySource::from_dir(dir)?;
            let channels = SystemChannels::new(config.notify.timeout)?;
            WatchSession::start_with(label, config, source, channels)
        }
        None => WatchSession::start(label, config),
    }
}

async fn run_watch(args: &Args) -> WatchResult<()> {
    let mut config = WatchConfig::load(&args.config, &args.overrides())?;
    let label = match &args.preset {
        Some(name) => {
            config = config.with_preset(name)?;
            name.clone()
        }
        None => DEFAULT_SESSION.to_string(),
    };

    let session = start_session(&label, &config, args.replay.as_deref())?;
    info!("⌨️ Press Ctrl+C to stop");

    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("⚠️ Failed to listen for Ctrl+C: {e}");
    }

    let summary = session.stop(STOP_TIMEOUT).await?;
    info!(
        "👋 Stopped after {} tick(s) and {} alert(s)",
        summary.ticks, summary.alerts
    );
    Ok(())
}

fn run_roi(args: &Args, section: RegionSection) -> WatchResult<()> {
    let region = section.to_region()?;

    let source: Option<Box<dyn FrameSource>> = match &args.replay {
        Some(dir) => Some(Box::new(ReplaySource::from_dir(dir)?)),
        None => match capture::live_source() {
            Ok(source) => Some(source),
            Err(e) => {
                warn!("⚠️ Screen bounds unavailable, skipping check: {e}");
                None
            }
        },
    };

    if let Some(source) = source {
        let bounds = source.screen_bounds()?;
        if !bounds.contains(&region) {
            return Err(CaptureError::RegionOutOfBounds {
                region,
                width: bounds.width,
                height: bounds.height,
            }
            .into());
        }
    }

    config::save_region(&args.config, &region)?;
    println!("✅ Region {region} saved to {}", args.config.display());
    Ok(())
}

async fn run_panel(args: &Args, stop_timeout: f64) -> WatchResult<()> {
    let config = WatchConfig::load(&args.config, &args.overrides())?;
    let timeout = Duration::try_from_secs_f64(stop_timeout).map_err(|_| ConfigError::Invalid {
        field: "--stop-timeout".to_string(),
        value: stop_timeout.to_string(),
        reason: "must be >= 0".to_string(),
    })?;

    let replay = args.replay.clone();
    let mut manager = SessionManager::new(config, timeout, move |label: &str, config: &WatchConfig| {
        start_session(label, config, replay.as_deref())
    });

    print_panel_help(&manager.presets().collect::<Vec<_>>());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = tokio::signal::ctrl_c() => break,
        };
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("⚠️ Failed to read command: {e}");
                break;
            }
        };

        let outcome = match line.trim() {
            "" => continue,
            "quit" | "exit" => break,
            "list" => {
                let presets: Vec<&str> = manager.presets().collect();
                println!("📋 Presets: {}", presets.join(", "));
                println!("▶️ Active: {}", manager.active_label().unwrap_or("none"));
                Ok(())
            }
            "stop" => manager.stop_active().await.map(|summary| {
                if summary.is_none() {
                    println!("⏹️ Nothing is running");
                }
            }),
            "start" => manager.start_default().await,
            preset => manager.switch_to(preset).await,
        };
        if let Err(e) = outcome {
            error!("❌ {e}");
        }
    }

    manager.stop_active().await?;
    Ok(())
}

fn print_panel_help(presets: &[&str]) {
    println!("🎛️ Watcher panel");
    println!("    <preset>    switch to a preset ({})", presets.join(", "));
    println!("    start       watch with the base templates");
    println!("    stop        stop the active session");
    println!("    list        show presets and the active session");
    println!("    quit        stop and exit");
}
