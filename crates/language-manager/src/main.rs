//! language-manager server and catalog compiler.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tower_http::trace::TraceLayer;
use tower_sessions::MemoryStore;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use language_manager::compile::{CompileRun, compile_translations, default_compiler};
use language_manager::session::{create_redis_store, session_layer};
use language_manager::{AppState, Config, build_router};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server.
    Serve,

    /// Compile .po translation files to .mo catalogs.
    CompileTranslations {
        /// Locale directories to scan (overrides LOCALE_PATHS).
        #[arg(long = "locale-path")]
        locale_paths: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;

    match cli.command {
        Command::Serve => {
            serve(config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::CompileTranslations { locale_paths } => {
            let paths = if locale_paths.is_empty() {
                config.locale_paths
            } else {
                locale_paths
            };
            Ok(run_compile(&paths))
        }
    }
}

async fn serve(config: Config) -> Result<()> {
    info!(
        port = config.port,
        languages = config.languages.len(),
        default_language = %config.default_language,
        "Configuration loaded"
    );

    let state = AppState::new(&config).context("failed to initialize application state")?;
    let app = build_router(state);

    let app = match &config.redis_url {
        Some(url) => {
            let store = create_redis_store(url)
                .await
                .context("failed to create session store")?;
            info!("Using Redis session store");
            app.layer(session_layer(
                store,
                config.session_cookie_secure,
                config.session_cookie_same_site,
            ))
        }
        None => {
            warn!("REDIS_URL not set, sessions are kept in memory");
            app.layer(session_layer(
                MemoryStore::default(),
                config.session_cookie_secure,
                config.session_cookie_same_site,
            ))
        }
    };
    let app = app.layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind to address")?;

    info!(%addr, "Server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

fn run_compile(paths: &[PathBuf]) -> ExitCode {
    let compiler = default_compiler();
    let report = match compile_translations(paths, compiler.as_deref()) {
        CompileRun::Unavailable => {
            println!("Catalog compiler unavailable: rebuild with the `rspolib` feature enabled.");
            return ExitCode::FAILURE;
        }
        CompileRun::Completed(report) => report,
    };

    for dir in &report.missing_dirs {
        println!("Locale directory not found: {}", dir.display());
    }
    for file in &report.files {
        match &file.result {
            Ok(()) => println!(
                "Compiled: {} -> {}",
                file.po_path.display(),
                file.mo_path.display()
            ),
            Err(e) => println!("Error compiling {}: {e}", file.po_path.display()),
        }
    }

    println!();
    let compiled = report.compiled();
    if compiled > 0 {
        println!("Successfully compiled {compiled} translation file(s).");
        println!("Restart the server for changes to take effect.");
    } else {
        println!("No .po files found to compile.");
    }

    let failed = report.failed();
    if failed > 0 {
        println!("Failed to compile {failed} file(s).");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
