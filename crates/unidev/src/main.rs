mod cli;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use unidev_api::ApiClient;

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(err) = run(&cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // Logs go to stderr so stdout carries only device output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    // Settings are resolved up front; nothing touches the network until
    // host, token and site are all present.
    let settings = unidev_config::load(cli.config.as_deref())?;
    settings.validate()?;
    tracing::debug!(?settings, "loaded settings");

    let client = ApiClient::new(&settings.credentials(), &settings.transport())?;
    let devices = client.list_devices(&settings.site_id).await?;
    tracing::info!(count = devices.len(), site = %settings.site_id, "listed devices");

    let rendered = output::render_devices(cli.output, &devices)?;
    output::print_output(&rendered)
}
