//! Serve command implementation

use crate::cli::ServeArgs;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::web::server;

/// Run the serve command
pub async fn run(args: ServeArgs) -> Result<()> {
    let mut config = Config::load()?;

    if let Some(data) = args.data {
        config.data.transactions = data;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }

    server::run(&config).await
}
