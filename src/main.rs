//! Teamclock command-line entry point.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use teamclock::commands::{self, Cli, OutputFormat};
use teamclock::config::{Config, LogFormat};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::from_env();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    // Initialize logging; stdout is reserved for command output
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(io::stderr);
    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Json => registry.with(fmt_layer.json()).init(),
        LogFormat::Text => registry.with(fmt_layer).init(),
    }

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let mut stdout = io::stdout().lock();
    match commands::dispatch(cli.command, config, &mut stdout, format).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match format {
                OutputFormat::Json => commands::emit_error(&mut stdout, format, &e),
                OutputFormat::Text => commands::emit_error(&mut io::stderr(), format, &e),
            }
            ExitCode::from(e.exit_code())
        }
    }
}
