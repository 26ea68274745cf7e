use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ecopolis::{
    config::Settings,
    engine::Engine,
    snapshot::{self, SnapshotConfig, SnapshotManager},
    web::{self, WebConfig},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "ecopolis city simulation runner")]
struct Cli {
    /// Path to a settings YAML file (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the save file path
    #[arg(long)]
    save: Option<PathBuf>,

    /// Headless mode: number of cycles to run before exiting
    #[arg(long)]
    cycles: Option<u64>,

    /// Serve the web dashboard and run cycles on the timer
    #[arg(long)]
    serve: bool,

    /// Override the listen host
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let mut settings = Settings::load_or_default(cli.config.as_deref())?;
    if let Some(save) = cli.save {
        settings.save_path = save;
    }
    if let Some(host) = cli.host {
        settings.host = host;
    }
    if let Some(port) = cli.port {
        settings.port = port;
    }

    let state = snapshot::load_or_new(&settings.save_path);
    let engine = Engine::from_state(state);

    if cli.serve {
        let config = WebConfig {
            host: settings.host.clone(),
            port: settings.port,
            cycle_seconds: settings.cycle_seconds,
            autosave_cycles: settings.autosave_cycles,
            save_path: settings.save_path.clone(),
        };
        return web::run(engine, config).await;
    }

    run_headless(engine, &settings, cli.cycles.unwrap_or(120))
}

fn run_headless(mut engine: Engine, settings: &Settings, cycles: u64) -> Result<()> {
    let snapshots = SnapshotManager::new(SnapshotConfig {
        interval: settings.snapshot_interval,
        output_dir: settings.snapshot_dir.clone(),
    });

    for _ in 0..cycles {
        let Some(summary) = engine.advance_cycle()? else {
            info!("campaign complete, stopping early");
            break;
        };
        for event in &summary.events {
            info!(cycle = summary.cycle, ?event, "event");
        }
        if let Some(path) = snapshots.maybe_snapshot(engine.state())? {
            info!(path = %path.display(), "checkpoint written");
        }
    }

    snapshot::save_game(&settings.save_path, engine.state())?;
    let state = engine.state();
    println!(
        "Ran {} cycles: ${}, level {}, happiness {}, pollution {}, missions completed {}",
        state.cycles,
        state.money,
        state.level,
        state.avg_happiness,
        state.avg_pollution,
        state.completed_missions.len()
    );
    Ok(())
}
