use std::net::{Ipv4Addr, SocketAddr};

use clap::Parser;
use metadata_gateway::{
    gateway::{self, GatewayConfig},
    grpc,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// HTTP port of the gateway on localhost
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// gRPC port of the echo backend on localhost
    #[arg(short, long, default_value_t = 9090)]
    backend_port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let localhost = |port: u16| SocketAddr::from((Ipv4Addr::LOCALHOST, port));

    let backend = tokio::spawn(grpc::server::run(localhost(args.backend_port)));
    gateway::run(GatewayConfig {
        listen: localhost(args.port),
        backend_port: args.backend_port,
    })
    .await?;
    backend.await??;
    Ok(())
}
