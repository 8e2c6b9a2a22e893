use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use poem::{listener::TcpListener, Server};
use registry_listing::{FilesystemStore, ListingApp, ListingConfig};
use tracing::{event, Level};
use tracing_subscriber::EnvFilter;

/// Registry listing CLI
///
#[derive(Default, Parser, Clone)]
#[clap(name = "registry-listing")]
#[clap(about = "Serves the catalog and tags list endpoints of a registry's filesystem storage")]
struct Cli {
    /// Path to a toml config file,
    ///
    #[clap(long)]
    config: Option<PathBuf>,
    /// Address to serve the registry api on, overrides the config file
    #[clap(long)]
    address: Option<String>,
    /// Root directory of the filesystem storage, overrides the config file
    #[clap(long)]
    root: Option<PathBuf>,
    /// Enable debug mode
    #[clap(long, short, action)]
    debug: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(if !cli.debug {
            EnvFilter::builder()
                .with_default_directive("registry_listing=info".parse().expect("should parse"))
                .from_env()
                .expect("should work")
        } else {
            EnvFilter::builder()
                .with_default_directive("registry_listing=debug".parse().expect("should parse"))
                .from_env()
                .expect("should work")
                .add_directive("poem=debug".parse().expect("should be ok"))
        })
        .compact()
        .init();

    let mut config = match cli.config.as_ref() {
        Some(path) => match ListingConfig::try_load(path).await {
            Ok(config) => config,
            Err(err) => {
                event!(Level::ERROR, "Could not load config {:?}, {err}", path);
                std::process::exit(1);
            }
        },
        None => ListingConfig::default(),
    };

    if let Some(address) = cli.address {
        config.address = address;
    }

    if let Some(root) = cli.root {
        config.storage.root = root;
    }

    event!(
        Level::INFO,
        "Serving registry listing for {:?} on {}",
        config.storage.root,
        config.address
    );
    event!(Level::DEBUG, "{:#?}", config.paging);

    let store = Arc::new(FilesystemStore::new(&config.storage.root));
    let app = ListingApp::new(store, config.paging).routes();

    if let Err(err) = Server::new(TcpListener::bind(config.address)).run(app).await {
        event!(Level::ERROR, "Server exited w/ error, {err}");
        std::process::exit(1);
    }
}
