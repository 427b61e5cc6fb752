use clap::Parser;
use rescope::Commands;
use rescope_config::Settings;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rescope")]
#[command(about = "Scoped acquisition and guaranteed release of async resources", long_about = None)]
#[command(version)]
struct Cli {
    /// Settings file (JSON); defaults to $RESCOPE_CONFIG
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    rescope_utils::tracing::init(&settings.log_filter)
        .map_err(|e| eyre::eyre!("failed to initialise logging: {e}"))?;

    cli.command.execute(settings).await
}
