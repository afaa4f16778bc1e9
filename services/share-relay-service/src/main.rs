//! Share Relay Service for GreetLink
//!
//! Two stateless relays behind one origin: issuing signed upload grants for
//! the media API (so the API secret stays server-side) and proxying link
//! shortening (so clients never talk to the shortener directly). Nothing is
//! persisted between requests.

use std::time::Duration;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

mod api;
mod error;
mod shortener;

use greetlink_signing::SigningCredentials;
use shortener::UrlShortener;

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "share-relay-service")]
#[command(about = "GreetLink upload-signing and link-shortening relay")]
struct Args {
    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value = "8086")]
    port: u16,

    /// Shortening upstream endpoint
    #[arg(long, env = "SHORTENER_ENDPOINT", default_value = shortener::DEFAULT_ENDPOINT)]
    shortener_endpoint: String,

    /// Upstream request timeout in seconds
    #[arg(long, default_value = "5")]
    upstream_timeout_secs: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Application state
pub struct AppState {
    /// Media API credentials; absent when the environment is unconfigured,
    /// in which case sign requests fail with a server error
    pub credentials: Option<SigningCredentials>,
    /// Upstream shortener client
    pub shortener: UrlShortener,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .json()
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    info!("Starting Share Relay Service");

    let credentials = match SigningCredentials::from_env() {
        Ok(creds) => Some(creds),
        Err(e) => {
            warn!("Upload signing disabled: {}", e);
            None
        }
    };

    let shortener = UrlShortener::new(
        args.shortener_endpoint.clone(),
        Duration::from_secs(args.upstream_timeout_secs),
    )
    .expect("Failed to build shortener client");

    let app_state = web::Data::new(AppState {
        credentials,
        shortener,
    });

    info!("Binding to {}:{}", args.host, args.port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["POST", "OPTIONS", "GET"])
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(app_state.clone())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(api::configure)
    })
    .bind((args.host.as_str(), args.port))?
    .run()
    .await
}
