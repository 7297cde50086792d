mod app;
mod error;
mod hit;
mod layout;
mod overlay;
mod paint;
mod paths;
mod settings;
mod terminal;
mod transactions;

use std::fs::{self, File};
use std::process::ExitCode;

use log::{debug, error, info};
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::app::App;
use crate::error::AppError;
use crate::settings::Settings;
use crate::terminal::Terminal;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), AppError> {
    let settings = Settings::load()?;
    init_logging(settings.level_filter())?;
    info!("ledger-tui {} starting", env!("CARGO_PKG_VERSION"));
    debug!("settings: {settings:?}");

    let (app, inbox) = App::new(settings);
    let mut terminal = Terminal::new()?;
    app.run(&mut terminal, inbox).await
}

/// Log to a fresh file in the cache directory, keeping a few older ones.
fn init_logging(level: LevelFilter) -> Result<(), AppError> {
    paths::rotate_logs();
    let Some(path) = paths::log_file() else {
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    let file = File::create(&path)?;
    WriteLogger::init(level, Config::default(), file)?;
    Ok(())
}
