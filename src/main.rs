use anyhow::{Context, Result};
use clap::Parser;
use powdertime::config::LoggingConfig;
use powdertime::{
    DemoWeather, LocationParser, NominatimGeocoder, Notifier, OpenMeteoClient, PowdertimeApp,
    PowdertimeConfig, PowdertimeError, WeatherSource,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "powdertime")]
#[command(version, about = "Monitor ski resort forecasts for significant snowfall")]
struct Cli {
    /// Path to configuration file (default: ./config.toml, then the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Search around this location instead: "lat,lon", a zipcode, or a city
    #[arg(short, long)]
    location: Option<String>,

    /// Notify even when no significant snow is forecast
    #[arg(long)]
    always_notify: bool,

    /// Keep running, checking every `check_frequency_hours`
    #[arg(long)]
    watch: bool,

    /// Use canned forecasts instead of the weather API
    #[arg(long)]
    demo: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Write an example configuration file and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<PowdertimeError>() {
                Some(err) => eprintln!("❌ Error: {}", err.user_message()),
                None => eprintln!("❌ Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    if cli.init_config {
        return init_config(cli.config);
    }

    let location = cli.location.as_deref().map(LocationParser::parse).transpose()?;
    let config = PowdertimeConfig::load_with_location(cli.config, location.as_ref())?;

    init_logging(&config.logging, cli.verbose);
    tracing::debug!(
        method = ?config.notifications.method,
        radius = config.search_radius_miles,
        threshold = config.snow_threshold.min_inches,
        "Configuration loaded"
    );

    println!("🎿 Powdertime - Ski Mountain Weather Monitor");
    println!("{}", "=".repeat(70));

    let timeout = Duration::from_secs(u64::from(config.weather.timeout_seconds));
    let geocoder = NominatimGeocoder::new(&config.weather.geocoding_url, timeout)?;
    let notifier = Notifier::from_config(&config.notifications, timeout)?;
    let always_notify = cli.always_notify || config.notifications.always_notify;

    if cli.demo {
        println!("🧪 Demo mode: using canned forecasts");
        let app = PowdertimeApp::new(config, geocoder, DemoWeather::new(), notifier);
        return execute(&app, cli.watch, always_notify).await;
    }

    let weather = OpenMeteoClient::new(&config.weather.base_url, &config.weather.timezone, timeout)?;
    let app = PowdertimeApp::new(config, geocoder, weather, notifier);
    execute(&app, cli.watch, always_notify).await
}

async fn execute<W: WeatherSource>(
    app: &PowdertimeApp<NominatimGeocoder, W>,
    watch: bool,
    always_notify: bool,
) -> Result<()> {
    if watch {
        app.watch(always_notify).await
    } else {
        app.run_once(always_notify).await.map(|_| ())
    }
}

fn init_config(path: Option<PathBuf>) -> Result<()> {
    let path = path
        .or_else(PowdertimeConfig::get_config_path)
        .context("Could not determine a configuration directory")?;

    PowdertimeConfig::write_example(&path)?;
    println!("Wrote example configuration to {}", path.display());
    Ok(())
}

/// `RUST_LOG` wins over the configured level; `--verbose` raises it to debug
fn init_logging(logging: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,powdertime={level}")));

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
