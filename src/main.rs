use clap::Parser;
use std::path::Path;
use ticker_watch::cli::{Cli, Commands};
use ticker_watch::config::{Config, WatchSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = if Path::new(&cli.config).exists() {
        Config::load(&cli.config)?
    } else {
        eprintln!("Warning: {} not found, using default configuration", cli.config);
        Config::default()
    };

    // Initialize telemetry
    let _telemetry = ticker_watch::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Watch(args) => {
            tracing::info!("Starting dashboard");
            args.execute(config).await?;
        }
        Commands::Quote(args) => {
            args.execute(config).await?;
        }
        Commands::Config => {
            let settings = WatchSettings::try_from(&config)?;
            println!("Current configuration:");
            println!("  Feed: {} via {}", settings.symbol, config.feed.base_url);
            println!(
                "  Credentials: {}",
                if config.feed.credentials()?.is_some() { "configured" } else { "none" }
            );
            println!("  Interval: {}s", settings.tick_interval.as_secs());
            match settings.retention.span() {
                Some(span) => println!(
                    "  History: {}s ({:?} eviction)",
                    span.as_secs(),
                    settings.eviction
                ),
                None => println!("  History: unbounded"),
            }
            println!("  Fetch timeout: {}s", settings.fetch_timeout.as_secs());
            println!("  Table rows: {}", settings.table_rows);
            println!(
                "  Logging: {} {:?}",
                config.telemetry.log_level, config.telemetry.log_format
            );
            if let Some(port) = config.telemetry.metrics_port {
                println!("  Metrics: 0.0.0.0:{}", port);
            }
        }
    }

    Ok(())
}
