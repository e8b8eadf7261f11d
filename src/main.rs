use anyhow::Result;
use clap::Parser;
use eframe::egui;
use std::path::PathBuf;
use swipelock::scenario::{Scenario, ScenarioRunner};
use swipelock::ui::SwipeLockApp;
use swipelock::LockConfig;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Lock configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run a scenario file headless and exit with its result
    #[arg(long)]
    scenario: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "swipelock=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match LockConfig::load(path) {
            Ok(config) => config,
            Err(e) if e.is_recoverable() => {
                warn!("[CONFIG] {} ({})", e.user_message(), e);
                LockConfig::default()
            }
            Err(e) => return Err(e.into()),
        },
        None => LockConfig::default(),
    };

    if let Some(path) = &args.scenario {
        let scenario = Scenario::load(path)?;
        let report = ScenarioRunner::new(scenario, config).run();
        std::process::exit(if report.passed() { 0 } else { 1 });
    }

    info!("Starting swipe-lock recorder");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([360.0, 560.0])
            .with_min_inner_size([240.0, 400.0])
            .with_title("Swipe Lock"),
        ..Default::default()
    };

    eframe::run_native(
        "Swipe Lock",
        options,
        Box::new(|cc| Ok(Box::new(SwipeLockApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_and_scenario() {
        let args = Args::try_parse_from([
            "swipelock",
            "--config",
            "lock.toml",
            "--scenario",
            "scenarios/lock_and_release.toml",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("lock.toml")));
        assert_eq!(
            args.scenario,
            Some(PathBuf::from("scenarios/lock_and_release.toml"))
        );
    }

    #[test]
    fn test_rejects_unknown_argument() {
        assert!(Args::try_parse_from(["swipelock", "--frobnicate"]).is_err());
        assert!(Args::try_parse_from(["swipelock", "--config"]).is_err());
    }
}
