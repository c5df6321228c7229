use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use skycast_core::{Config, ConfigError};
use skycast_ui::{bridge, WeatherModel};
use skycast_weather::UnitSystem;

/// Look up current conditions and the forecast for a location
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about)]
struct Cli {
    /// Run a single search, print the result and exit
    #[arg(short, long)]
    location: Option<String>,

    /// Unit system: metric or imperial (defaults to the configured one)
    #[arg(short, long)]
    units: Option<UnitSystem>,

    /// Config file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// One line of user input
#[derive(Debug, PartialEq)]
enum Command {
    Search(String),
    Units(UnitSystem),
    Dismiss,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(rest) = line.strip_prefix(':') else {
        return Command::Search(line.to_string());
    };

    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("units"), Some(value)) => match value.parse() {
            Ok(units) => Command::Units(units),
            Err(e) => Command::Unknown(e),
        },
        (Some("dismiss"), None) => Command::Dismiss,
        (Some("quit"), None) | (Some("q"), None) => Command::Quit,
        _ => Command::Unknown(format!("unknown command '{}'", line)),
    }
}

/// Short explanation for a config failure, when it came from the file's contents.
fn config_hint(err: &anyhow::Error) -> Option<&'static str> {
    err.downcast_ref::<ConfigError>().map(ConfigError::user_message)
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    skycast_core::init()?;

    let loaded = match &cli.config {
        Some(path) => Config::load_validated_from(path),
        None => Config::load_validated(),
    };
    let (config, _warnings) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            if let Some(hint) = config_hint(&e) {
                eprintln!("{}", hint);
            }
            return Err(e.context("Failed to load configuration"));
        }
    };

    let mut model = bridge::initialize_weather_model(&config)?;
    if let Some(units) = cli.units {
        model.set_units(units);
    }

    let poll_interval = Duration::from_millis(config.ui.poll_interval_ms.max(1));

    match cli.location {
        Some(location) => run_once(&mut model, location, poll_interval),
        None => run_interactive(&mut model, poll_interval),
    }
}

fn run_once(model: &mut WeatherModel, location: String, poll_interval: Duration) -> Result<()> {
    model.set_location(location);
    model.submit();

    while !model.is_settled() {
        std::thread::sleep(poll_interval);
        model.poll_channel();
    }

    println!("{}", model.render(today()));
    Ok(())
}

fn run_interactive(model: &mut WeatherModel, poll_interval: Duration) -> Result<()> {
    // Stdin is read on its own thread so the widget keeps polling while idle
    let (tx, rx) = mpsc::channel::<std::io::Result<String>>();
    std::thread::Builder::new()
        .name("skycast-stdin".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                if tx.send(line).is_err() {
                    break;
                }
            }
        })
        .context("Failed to spawn input thread")?;

    println!("Type a location and press Enter. Commands: :units metric|imperial, :dismiss, :quit");
    println!("{}\n", model.render(today()));

    loop {
        let mut changed = match rx.recv_timeout(poll_interval) {
            Ok(line) => {
                let line = line.context("Failed to read input")?;
                match parse_command(&line) {
                    Command::Search(text) => {
                        model.set_location(text);
                        model.submit();
                    }
                    Command::Units(units) => model.set_units(units),
                    Command::Dismiss => model.dismiss_error(),
                    Command::Quit => break,
                    Command::Unknown(message) => {
                        eprintln!("{}", message);
                        continue;
                    }
                }
                true
            }
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        changed |= model.poll_channel();
        if changed {
            println!("{}\n", model.render(today()));
        }
    }

    tracing::info!("Skycast exiting");
    Ok(())
}
