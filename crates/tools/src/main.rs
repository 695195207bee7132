use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use headless::{HeadlessPage, PageSpec, ScrollScript, Simulation};
use reveal::RevealConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Dry-run reveal animations against a described page.
#[derive(Debug, Parser)]
#[command(name = "reveal-cli", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a scroll script and print the resulting reveal timeline as JSON.
    Plan {
        page: PathBuf,
        script: PathBuf,
        /// JSON config file; overrides --preset.
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value = "standard")]
        preset: String,
        #[arg(long)]
        pretty: bool,
    },
    /// Validate a JSON config file.
    CheckConfig { config: PathBuf },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main(Cli::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Plan {
            page,
            script,
            config,
            preset,
            pretty,
        } => {
            let config = match config {
                Some(path) => load_config(&path)?,
                None => RevealConfig::preset(&preset).ok_or_else(|| {
                    format!("unknown preset {preset:?} (expected standard or loose)")
                })?,
            };
            let out = plan(&read(&page)?, &read(&script)?, config, pretty)?;
            println!("{out}");
            Ok(())
        }
        Command::CheckConfig { config } => {
            let parsed = load_config(&config)?;
            info!(path = %config.display(), "config ok");
            println!(
                "ok: trigger at {:.0}%, window {}s",
                parsed.start_fraction * 100.0,
                parsed.reset_window_s
            );
            Ok(())
        }
    }
}

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))
}

fn load_config(path: &Path) -> Result<RevealConfig, String> {
    RevealConfig::from_json(&read(path)?).map_err(|e| format!("{}: {e}", path.display()))
}

fn plan(
    page_json: &str,
    script_json: &str,
    config: RevealConfig,
    pretty: bool,
) -> Result<String, String> {
    let spec = PageSpec::from_json(page_json).map_err(|e| e.to_string())?;
    let page = HeadlessPage::from_spec(&spec);
    let script = ScrollScript::from_json(script_json).map_err(|e| e.to_string())?;
    let timeline = Simulation::new(page, config)
        .and_then(|sim| sim.run(&script))
        .map_err(|e| e.to_string())?;
    info!(
        reveals = timeline.reveals.len(),
        frames = timeline.frames,
        "simulation finished"
    );
    let json = if pretty {
        serde_json::to_string_pretty(&timeline)
    } else {
        serde_json::to_string(&timeline)
    };
    json.map_err(|e| e.to_string())
}
