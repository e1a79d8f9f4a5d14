use clap::Parser;
use hyper::{Body, Client, Method, Request};
use metadata_gateway::error::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// HTTP port of the gateway on localhost
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// extra request header as `name:value`, may be repeated
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// message sent to the echo backend
    #[arg(short, long, default_value = "ping")]
    message: String,
}

fn parse_header(arg: &str) -> Result<(&str, &str), Error> {
    arg.split_once(':')
        .map(|(name, value)| (name.trim(), value.trim()))
        .ok_or_else(|| Error::InvalidHeader(arg.to_owned()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(format!("http://127.0.0.1:{}/", args.port))
        .header("Grpc-Metadata-Demo-Key", "demo-value");
    for header in &args.headers {
        let (name, value) = parse_header(header)?;
        builder = builder.header(name, value);
    }
    let request = builder.body(Body::from(args.message))?;

    let response = Client::new().request(request).await?;
    println!("{}", response.status());
    for (name, value) in response.headers() {
        println!("{}: {:?}", name, value);
    }
    let body = hyper::body::to_bytes(response.into_body()).await?;
    println!();
    println!("{}", String::from_utf8_lossy(&body));
    Ok(())
}
