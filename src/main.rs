//! NGR Finder - Main entry point
//!
//! Without a subcommand this runs the interactive search form; the
//! subcommands expose the same lookup and conversion as one-shot commands.

use anyhow::{Context, Result};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ngr_finder::app::App;
use ngr_finder::cli::{Cli, Commands, ConfigCommands};
use ngr_finder::config::AppConfig;
use ngr_finder::connectivity::{NetworkState, StaticProbe};
use ngr_finder::converter;
use ngr_finder::geodesy::{Datum, LatLon, OsGridRef};
use ngr_finder::lookup::{self, LookupRecord};
use ngr_finder::resolver::{CachedLookup, PostcodeLookup, PostcodesIoResolver};
use ngr_finder::NgrError;
use ratatui::{backend::CrosstermBackend, Terminal};
use serde::Serialize;
use serde_json::json;
use std::fs::OpenOptions;
use std::io::stdout;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// Initialize tracing.
///
/// Logs go to `log_file` when given. Otherwise CLI commands log to stderr
/// and the TUI does not log at all, since stderr shares the screen.
fn init_tracing(log_file: Option<&Path>, tui: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;
        }
        None if tui => {}
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;
        }
    }
    Ok(())
}

/// Main application entry point
fn main() {
    let cli = Cli::parse_args();
    let tui = matches!(cli.command, None | Some(Commands::Tui));

    if let Err(e) = init_tracing(cli.log_file.as_deref(), tui) {
        eprintln!("✗ {e:#}");
        std::process::exit(1);
    }
    info!("NGR Finder starting up");

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        fail(cli.json, &format!("{e:#}"));
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    if let Some(url) = &cli.api_url {
        config.api_base_url = url.clone();
    }
    debug!("Effective configuration: {:?}", config);

    if let Some(Commands::Config { action }) = &cli.command {
        return run_config_command(action, &config, cli.json);
    }

    config.validate().context("Invalid configuration")?;

    match &cli.command {
        Some(Commands::Lookup { postcode }) => {
            let resolver = build_resolver(&config, cli.assume_online)?;
            let record = lookup::lookup(&resolver, &postcode.join(" "), config.grid_digits)
                .map_err(NgrError::from)?;
            emit(cli.json, &record, || record_text(&record));
        }
        Some(Commands::Convert {
            easting,
            northing,
            digits,
        }) => {
            let conversion = converter::convert_with_digits(
                *easting,
                *northing,
                digits.unwrap_or(config.grid_digits),
            )
            .map_err(NgrError::from)?;
            let data = json!({
                "eastings": easting,
                "northings": northing,
                "ngrFormatted": conversion.ngr_formatted,
                "geoLat": conversion.geo.lat,
                "geoLon": conversion.geo.lon,
            });
            emit(cli.json, &data, || {
                format!(
                    "{}\n{:.6}, {:.6} (WGS84)",
                    conversion.ngr_formatted, conversion.geo.lat, conversion.geo.lon
                )
            });
        }
        Some(Commands::Parse { gridref }) => {
            let grid_ref = OsGridRef::parse(&gridref.join(" ")).map_err(NgrError::from)?;
            let geo = grid_ref
                .to_lat_lon(Datum::Wgs84)
                .map_err(NgrError::from)?
                .rounded(converter::COORDINATE_PLACES);
            let data = json!({
                "eastings": grid_ref.easting(),
                "northings": grid_ref.northing(),
                "ngrFormatted": grid_ref.to_string(),
                "geoLat": geo.lat,
                "geoLon": geo.lon,
            });
            emit(cli.json, &data, || {
                format!(
                    "{}\nEasting {}  Northing {}\n{}",
                    grid_ref,
                    grid_ref.easting(),
                    grid_ref.northing(),
                    geo
                )
            });
        }
        Some(Commands::ToGrid { lat, lon, digits }) => {
            let grid_ref = LatLon::new(*lat, *lon, Datum::Wgs84)
                .to_os_grid()
                .map_err(NgrError::from)?;
            let formatted = grid_ref
                .format(digits.unwrap_or(config.grid_digits))
                .map_err(NgrError::from)?;
            let data = json!({
                "eastings": grid_ref.easting(),
                "northings": grid_ref.northing(),
                "ngrFormatted": formatted,
            });
            emit(cli.json, &data, || {
                format!(
                    "{}\nEasting {}  Northing {}",
                    formatted,
                    grid_ref.easting(),
                    grid_ref.northing()
                )
            });
        }
        Some(Commands::Tui) | None => {
            info!("Launching search form");
            let resolver = build_resolver(&config, cli.assume_online)?;
            run_tui(Arc::new(resolver), config.grid_digits)?;
        }
        // Handled before validation
        Some(Commands::Config { .. }) => {}
    }

    Ok(())
}

fn run_config_command(action: &ConfigCommands, config: &AppConfig, json: bool) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let pretty = serde_json::to_string_pretty(config)?;
            emit(json, config, || pretty);
        }
        ConfigCommands::Validate => {
            config.validate()?;
            info!("Configuration validation successful");
            emit(json, &json!({ "valid": true }), || {
                "✓ Configuration is valid".to_string()
            });
        }
        ConfigCommands::Init { path } => {
            if path.exists() {
                anyhow::bail!("{:?} already exists", path);
            }
            AppConfig::default().save_to_file(path)?;
            info!("Wrote default configuration to {:?}", path);
            emit(json, &json!({ "path": path }), || {
                format!("✓ Wrote default configuration to {}", path.display())
            });
        }
    }
    Ok(())
}

/// The network resolver behind a response cache
fn build_resolver(
    config: &AppConfig,
    assume_online: bool,
) -> Result<CachedLookup<PostcodesIoResolver>> {
    let inner = if assume_online {
        PostcodesIoResolver::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
            Arc::new(StaticProbe(NetworkState::Online)),
        )?
    } else {
        PostcodesIoResolver::from_config(config)?
    };
    Ok(CachedLookup::from_config(inner, config))
}

/// Print `data` as `{"ok": true, "data": ...}` or as the given text
fn emit<T: Serialize>(json: bool, data: &T, text: impl FnOnce() -> String) {
    if json {
        println!("{}", json!({ "ok": true, "data": data }));
    } else {
        println!("{}", text());
    }
}

/// Report `message` and exit with status 1
fn fail(json: bool, message: &str) -> ! {
    if json {
        println!("{}", json!({ "ok": false, "error": message }));
    } else {
        eprintln!("✗ {}", message);
    }
    std::process::exit(1);
}

fn record_text(record: &LookupRecord) -> String {
    let mut lines = Vec::new();
    if let Some(postcode) = &record.postcode {
        lines.push(postcode.clone());
    }
    lines.push(format!("National Grid  {}", record.ngr_formatted));
    lines.push(format!(
        "Easting        {}\nNorthing       {}",
        record.easting_display(),
        record.northing_display()
    ));
    lines.push(format!(
        "Latitude       {}\nLongitude      {}",
        record.geo_lat_display(),
        record.geo_lon_display()
    ));
    if let Some(url) = record.map_url() {
        lines.push(format!("Map            {}", url));
    }
    if let Some(err) = &record.conversion_error {
        lines.push(format!("⚠ {}", err));
    }
    lines.join("\n")
}

/// Set up the terminal, run the search form and always restore the terminal
fn run_tui(resolver: Arc<dyn PostcodeLookup>, grid_digits: u8) -> Result<()> {
    debug!("Initializing terminal for TUI mode");

    enable_raw_mode().context("Failed to enable raw mode")?;
    if let Err(e) = crossterm::execute!(stdout(), crossterm::terminal::EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e).context("Failed to enter alternate screen");
    }

    let result = Terminal::new(CrosstermBackend::new(stdout()))
        .map_err(|e| NgrError::terminal(format!("Failed to create terminal: {e}")))
        .and_then(|mut terminal| {
            let mut app = App::new(resolver, grid_digits);
            let result = app.run(&mut terminal);
            let _ = terminal.show_cursor();
            result
        });

    // Cleanup terminal (always attempt cleanup, even if app failed)
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(stdout(), crossterm::terminal::LeaveAlternateScreen);

    Ok(result?)
}
