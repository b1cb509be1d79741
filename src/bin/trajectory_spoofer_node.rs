use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info};
use trajectory_spoofer::control::{parse_override, TrajectoryParameters};
use trajectory_spoofer::node::{
    JsonLinesPublisher, TrajectoryPublisher, DEFAULT_PUBLISH_PERIOD_MS,
};
use trajectory_spoofer::{LifecycleNode, TrajectorySpooferNode};

/// Publish a synthetic straight or circular trajectory at a fixed rate
#[derive(Parser, Debug)]
#[command(name = "trajectory_spoofer_node", version)]
struct Cli {
    /// JSON parameter file; missing keys keep the launch defaults
    #[arg(long)]
    params_file: Option<PathBuf>,

    /// Parameter override as `name:=value`, may be repeated
    #[arg(short = 'p', long = "param", value_name = "NAME:=VALUE")]
    params: Vec<String>,

    /// Node name used in logs
    #[arg(long, default_value = "trajectory_spoofer")]
    node_name: String,

    /// Frame the trajectory is expressed in
    #[arg(long, default_value = "map")]
    frame_id: String,

    /// Republish period in milliseconds
    #[arg(
        long,
        default_value_t = DEFAULT_PUBLISH_PERIOD_MS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    period_ms: u64,

    /// Publish a single trajectory and exit
    #[arg(long)]
    once: bool,
}

fn load_parameters(cli: &Cli) -> Result<TrajectoryParameters> {
    let mut parameters = match &cli.params_file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading parameter file {}", path.display()))?;
            TrajectoryParameters::from_json(&text)
                .with_context(|| format!("parsing parameter file {}", path.display()))?
        }
        None => TrajectoryParameters::default(),
    };

    let overrides = cli
        .params
        .iter()
        .map(|text| parse_override(text))
        .collect::<Result<Vec<_>, _>>()?;
    parameters.apply(&overrides).with_context(|| {
        format!(
            "applying parameter overrides (known parameters: {})",
            TrajectoryParameters::NAMES.join(", ")
        )
    })?;

    Ok(parameters)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let parameters = load_parameters(&cli)?;

    let node = Arc::new(TrajectorySpooferNode::new(
        &cli.node_name,
        &cli.frame_id,
        parameters,
    ));
    if let Err(err) = node.on_configure() {
        error!(node = %cli.node_name, error = %err, "Failed to configure trajectory spoofer");
        return Err(err).context("invalid trajectory configuration");
    }
    node.on_activate()?;

    let publisher: Arc<dyn TrajectoryPublisher> = Arc::new(JsonLinesPublisher::stdout());

    if cli.once {
        node.publish_once(publisher.as_ref())?;
    } else {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let spinner = tokio::spawn(Arc::clone(&node).spin(
            Arc::clone(&publisher),
            Duration::from_millis(cli.period_ms),
            shutdown_rx,
        ));

        tokio::signal::ctrl_c()
            .await
            .context("waiting for shutdown signal")?;
        info!(node = %cli.node_name, "Shutdown requested");
        shutdown_tx.send(true).ok();
        spinner.await.context("publishing task panicked")?;
    }

    node.on_deactivate()?;
    node.on_cleanup()?;
    node.on_shutdown()?;
    Ok(())
}
