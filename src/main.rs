//! pushgateway-handler - Prometheus Pushgateway event handler
//!
//! Reads one monitoring event as JSON on standard input, transforms its
//! metric points into the Prometheus text exposition format, and pushes the
//! result to the configured Pushgateway.

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info, warn};

use pushgateway_handler::cli::Cli;
use pushgateway_handler::config::HandlerConfig;
use pushgateway_handler::event;
use pushgateway_handler::publisher::GatewayClient;
use pushgateway_handler::transformer::Transformer;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging; --debug wins over --log-level
    let level = if cli.debug {
        "debug".to_string()
    } else {
        cli.log_level.to_string()
    };
    pushgateway_handler::init_logging(&level)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting pushgateway-handler"
    );

    // Resolve and validate configuration before touching the event
    let config = HandlerConfig::resolve(&cli)?;
    debug!(
        url = %config.url,
        default_job = %config.default_job,
        default_instance = %config.default_instance,
        default_type = %config.default_type,
        job = %config.job,
        instance = %config.instance,
        content_type = %config.content_type,
        "Resolved handler configuration"
    );

    // One event per invocation, on stdin
    let event = event::read_event(std::io::stdin().lock())?;
    debug!(points = event.points().len(), "Decoded event");

    let transformer = Transformer::new(&config);
    let output = transformer.transform(event.points());

    for (family, declared) in &output.type_conflicts {
        warn!(
            family = %family,
            declared = %declared,
            "Event declared a conflicting type for an established family"
        );
    }

    debug!(payload = %output.body, "Serialized payload");

    if cli.dry_run {
        print!("{}", output.body);
        return Ok(());
    }

    let client = GatewayClient::new(&config.url, &config.content_type)?;
    let response = client
        .push(&output.job, &output.instance, output.body)
        .await?;

    info!(response = %response, "Pushgateway accepted metrics");

    Ok(())
}
