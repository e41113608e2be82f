use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use log::{error, warn};

use yandere_shift::engine::engine::EngineHandle;
use yandere_shift::engine::image_client::PollinationsClient;
use yandere_shift::engine::llm_client::{self, GeminiClient};
use yandere_shift::engine::narrative::NarrativeEngine;
use yandere_shift::ui::app::ConsoleApp;
use yandere_shift::ui::settings::Settings;
use yandere_shift::ui::settings_io;

#[derive(Parser, Debug)]
#[command(name = "yandere_shift")]
#[command(about = "A short dating-sim that turns dark on day 50")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to the per-user config directory)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Send one ping to the dialogue model and exit
    #[arg(long)]
    check: bool,

    /// Verbose logging (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    builder.init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let path = cli.settings.unwrap_or_else(settings_io::settings_path);
    if !path.exists() {
        // leave a template behind for the player to fill in
        if let Err(e) = settings_io::save_settings_to(&path, &Settings::default()) {
            warn!("could not write default settings: {e:#}");
        }
    }

    let settings = settings_io::load_settings_from(&path);
    let settings = settings_io::apply_env_overrides(settings, |key| std::env::var(key).ok());
    if settings.api_key().is_none() {
        eprintln!("Yandere Shift needs a Gemini API key.");
        eprintln!("Set GEMINI_API_KEY, or add \"api_key\" to {}", path.display());
        return Err(anyhow!("no API key configured"));
    }

    if cli.check {
        println!("{}", llm_client::test_connection(&settings)?);
        return Ok(());
    }

    let dialogue = GeminiClient::from_settings(&settings)?;
    let images = PollinationsClient::from_settings(&settings)?;
    let engine = EngineHandle::spawn(NarrativeEngine::new(dialogue, images));

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut app = ConsoleApp::new(engine);
    if let Err(e) = app.run(stdin.lock(), &mut stdout) {
        error!("session ended: {e:#}");
        return Err(e);
    }
    stdout.flush()?;
    Ok(())
}
