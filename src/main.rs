// article-feed CLI.
// Loads the feed once and prints the rendered markup.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use article_feed::{
    FeedLoader, LoaderConfig, Result,
    cache::FileStore,
    config::{DEFAULT_CACHE_KEY, DEFAULT_ENDPOINT, DEFAULT_FAILURE_ENDPOINT},
    feed::FeedClient,
    render::{EmptyState, HtmlDocument},
};

#[derive(Parser)]
#[command(name = "article-feed")]
#[command(about = "Render a cached JSON article feed as HTML")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    #[arg(long, default_value = DEFAULT_FAILURE_ENDPOINT)]
    failure_endpoint: String,

    /// Fetch from the failure endpoint to exercise the fallback path
    #[arg(long)]
    simulate_failure: bool,

    /// How long cached data skips the network, in milliseconds
    #[arg(long, default_value_t = 5000)]
    ttl_ms: u64,

    /// Defaults to the platform cache directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_CACHE_KEY)]
    cache_key: String,

    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Clear previous output when showing the empty-state message
    #[arg(long)]
    replace_on_empty: bool,

    /// Write markup here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit a complete HTML page rather than a fragment
    #[arg(long)]
    page: bool,

    #[arg(long)]
    debug: bool,
}

impl Args {
    fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            endpoint: self.endpoint.clone(),
            failure_endpoint: self.failure_endpoint.clone(),
            simulate_failure: self.simulate_failure,
            validity_window: Duration::from_millis(self.ttl_ms),
            cache_key: self.cache_key.clone(),
            empty_state: if self.replace_on_empty {
                EmptyState::Replace
            } else {
                EmptyState::Append
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("article_feed={filter_level}").into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let store = match &args.cache_dir {
        Some(dir) => FileStore::new(dir),
        None => FileStore::in_cache_dir()?,
    };
    info!(dir = %store.dir().display(), "cache directory");

    let client = FeedClient::new(Duration::from_secs(args.timeout_secs))?;
    let mut loader = FeedLoader::new(client, store, HtmlDocument::new(), args.loader_config());

    let outcome = loader.load().await;
    info!(?outcome, "load finished");

    let document = loader.into_sink();
    let markup = if args.page {
        document.into_page("Articles")
    } else {
        format!("{}\n", document.contents())
    };

    match &args.output {
        Some(path) => std::fs::write(path, markup)?,
        None => print!("{markup}"),
    }

    Ok(())
}
