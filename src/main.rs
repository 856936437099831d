//! CityWeather: browse open-data cities and their current weather in the terminal.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use cityweather_core::{App, AppError, Config};
use cityweather_ui::{AppServices, Command, Osc52Clipboard, Route, Shell};

#[derive(Parser)]
#[command(name = "cityweather", version, about = "Browse cities and their current weather")]
struct Cli {
    /// Config file (default: <config dir>/cityweather/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial route, e.g. / or /weather/Paris
    #[arg(long, default_value = "/")]
    route: String,

    /// OpenWeatherMap API key, overriding config and environment
    #[arg(long)]
    api_key: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_optional(cli.config.as_deref())?;
    if let Some(key) = cli.api_key {
        config.weather.api_key = key;
    }

    cityweather_core::init(&config.logging.level)?;
    let (config, _) = config.into_validated().map_err(|e| {
        let err = AppError::from(e);
        tracing::error!("{} ({})", err.user_message(), err);
        err
    })?;
    let initial = Route::parse(&cli.route).context("Invalid --route")?;
    let settle = Duration::from_millis(config.ui.settle_ms);

    let app = App::from_config(config);
    let services = AppServices::new(&app)?;
    tracing::info!("CityWeather started");

    let clipboard = Box::new(Osc52Clipboard::new(io::stdout()));
    let mut shell = Shell::new(services.clone(), initial, clipboard);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        shell.settle(settle);
        writeln!(stdout, "\n{}", shell.render())?;
        write!(stdout, "> ")?;
        stdout.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read command")?;
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(command) => {
                if !shell.execute(command) {
                    break;
                }
            }
            Err(e) => writeln!(stdout, "{e}")?,
        }
    }

    shell.close();
    services.shutdown();
    app.shutdown();
    Ok(())
}
