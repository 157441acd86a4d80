//! Broker server binary.
//!
//! Loads configuration from the file named by `BROKER_CONFIG`, or from
//! environment variables when the file is not set, then serves until
//! CTRL+C.

use tracing::{error, info};

use broker_protocol::config::BrokerConfig;
use broker_protocol::error::Result;
use broker_protocol::transport::tcp;
use broker_protocol::utils::logging::init_logging;
use broker_protocol::utils::metrics::{global_metrics, init_metrics};

fn load_config() -> Result<BrokerConfig> {
    match std::env::var("BROKER_CONFIG") {
        Ok(path) => BrokerConfig::from_file(path),
        Err(_) => BrokerConfig::from_env(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;
    init_logging(&config.logging)?;
    init_metrics();

    if let Err(e) = config.validate_strict() {
        error!(error = %e, "Invalid configuration");
        return Err(e);
    }

    info!(
        address = %config.server.address,
        max_connections = config.server.max_connections,
        "Starting broker"
    );

    let result = tcp::start_server(config).await;
    global_metrics().log_metrics();
    result
}
