//! Backend entry-point: wires REST endpoints and OpenAPI docs.

use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use backend::server::{run, ServerConfig};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = ServerConfig::from_env()?;
    run(&config)?.await
}
