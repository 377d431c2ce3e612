//! faculty-connect: semantic faculty search client
//!
//! This is the main entry point for the application.

use anyhow::Result;
use clap::{Parser, Subcommand};
use faculty_connect::{
    config::{self, OutputFormat, Settings},
    metrics::Metrics,
    network::{SearchClient, SearchTransport},
    repl::Repl,
    results::Normalizer,
    search::SearchController,
    view::ResultRenderer,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "faculty-connect", version, about = "Find faculty by research interest")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Render results as HTML instead of text
    #[arg(long, global = true)]
    html: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive search prompt (default)
    Repl,
    /// Submit one query and print the results
    Search { query: Vec<String> },
    /// Serve the search page over HTTP
    Serve,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut settings, source) = config::load(cli.config.as_deref())?;
    if cli.html {
        settings.ui.format = OutputFormat::Html;
    }
    init_logging(&settings);

    info!("Starting faculty-connect v{}", faculty_connect::VERSION);
    match source {
        Some(path) => info!("Loaded settings from: {}", path.display()),
        None => info!("No settings file found, using defaults"),
    }

    let client = SearchClient::with_settings(&settings.service)?;
    match client.timeout() {
        Some(timeout) => info!("Search endpoint: {} (timeout {:?})", client.search_url(), timeout),
        None => info!("Search endpoint: {}", client.search_url()),
    }
    let transport: Arc<dyn SearchTransport> = Arc::new(client);

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Repl => run_repl(settings, transport).await,
        Commands::Search { query } => run_once(settings, transport, query.join(" ")).await,
        Commands::Serve => serve(settings, transport).await,
    }
}

/// Install the fmt subscriber; RUST_LOG wins over the configured level
fn init_logging(settings: &Settings) {
    let default_level = if settings.general.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn controller(settings: &Settings) -> SearchController {
    SearchController::with_metrics(
        Normalizer::new(&settings.results),
        Arc::new(Metrics::new()),
    )
}

async fn run_repl(settings: Settings, transport: Arc<dyn SearchTransport>) -> Result<()> {
    let controller = controller(&settings);
    let mut repl = Repl::new(&settings, controller, transport)?;

    eprintln!(
        "{}. Describe your research interest, or :help for commands.",
        settings.general.instance_name
    );

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    repl.run(stdin, &mut stdout).await
}

async fn run_once(
    settings: Settings,
    transport: Arc<dyn SearchTransport>,
    query: String,
) -> Result<()> {
    let mut controller = controller(&settings);
    controller.set_query(query);

    if !controller.submit(transport.as_ref()).await {
        anyhow::bail!("nothing to search for: the query is empty");
    }

    let renderer = ResultRenderer::new(&settings.ui)?;
    let view = renderer.view(&controller);
    println!("{}", renderer.render(&view, settings.ui.format)?.trim_end());
    Ok(())
}

async fn serve(settings: Settings, transport: Arc<dyn SearchTransport>) -> Result<()> {
    let addr = SocketAddr::new(
        settings.server.bind_address.parse()?,
        settings.server.port,
    );

    let state = AppState::new(settings, transport)?;
    let app = create_router(state);

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
