//! # Leonlib Server
//!
//! Book library web application.
//!
//! ## Architecture
//!
//! The server is built on Axum and uses:
//! - PostgreSQL for books, users, likes and sessions
//! - Google or Auth0 for sign-in
//! - minijinja templates for pages

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use sqlx::{PgPool, postgres::PgPoolOptions};
use tower_sessions_sqlx_store::PostgresStore;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leonlib_core::{
    CatalogLoader, MIGRATOR,
    database::{PostgresBooksRepository, PostgresLikesRepository, PostgresUsersRepository},
};
use leonlib_server::{
    AppState,
    auth::OAuthIdentityProvider,
    infra::{config::Config, sessions::session_layer, shutdown::shutdown_signal},
    routes,
    views::TemplateRenderer,
};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "leonlib-server")]
#[command(about = "Book library with search, likes and OAuth sign-in")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Server port (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Server host (overrides HOST)
    #[arg(long)]
    host: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    Db(DbCommand),
    #[command(subcommand)]
    Catalog(CatalogCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply database migrations and exit
    Migrate,
}

#[derive(Debug, Subcommand)]
enum CatalogCommand {
    /// Load the book catalog and its cover images into the database
    Load {
        /// Catalog file (overrides LEONLIB_CATALOG_PATH)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Directory of cover images (overrides LEONLIB_IMAGES_DIR)
        #[arg(long)]
        images: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env().context("failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Some(port) = cli.serve.port {
        config.server.port = port;
    }
    if let Some(host) = cli.serve.host {
        config.server.host = host;
    }
    let config = Arc::new(config);

    match cli.command {
        Some(Command::Db(DbCommand::Migrate)) => run_db_migrate(&config).await,
        Some(Command::Catalog(CatalogCommand::Load { catalog, images })) => {
            run_catalog_load(&config, catalog, images).await
        }
        None => run_server(config).await,
    }
}

async fn connect(config: &Config) -> anyhow::Result<PgPool> {
    let options = config
        .database
        .connect_options()
        .context("invalid database configuration")?;

    info!("Connecting to PostgreSQL via {}", config.database.describe_source());

    PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect_with(options)
        .await
        .context("failed to connect to PostgreSQL")
}

async fn run_db_migrate(config: &Config) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    MIGRATOR
        .run(&pool)
        .await
        .context("database migration failed")?;
    info!("Database migrations applied successfully");
    Ok(())
}

async fn run_catalog_load(
    config: &Config,
    catalog: Option<PathBuf>,
    images: Option<PathBuf>,
) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    MIGRATOR
        .run(&pool)
        .await
        .context("database migration failed")?;

    let loader = CatalogLoader::new(
        catalog.unwrap_or_else(|| config.catalog.catalog_path.clone()),
        images.unwrap_or_else(|| config.catalog.images_dir.clone()),
    );
    let books = PostgresBooksRepository::new(pool);
    let report = loader
        .load_into(&books)
        .await
        .with_context(|| format!("failed to load catalog {}", loader.catalog_path().display()))?;

    info!(inserted = report.inserted, "Catalog loaded");
    Ok(())
}

async fn run_server(config: Arc<Config>) -> anyhow::Result<()> {
    let pool = connect(&config).await?;
    MIGRATOR
        .run(&pool)
        .await
        .context("database migration failed")?;
    info!("Database schema initialized successfully");

    let session_store = PostgresStore::new(pool.clone());
    session_store
        .migrate()
        .await
        .context("failed to prepare session store")?;
    let session_layer =
        session_layer(&config.session, session_store).context("invalid session configuration")?;

    let endpoints = config
        .identity
        .endpoints()
        .context("invalid identity provider configuration")?;
    info!(provider = endpoints.tag, "identity provider configured");
    let identity = OAuthIdentityProvider::new(endpoints, config.identity.timeout)
        .context("failed to build identity provider client")?;

    if config.catalog.initdb_enabled {
        warn!("catalog initialization endpoint is enabled and unauthenticated");
    }

    let state = AppState {
        config: config.clone(),
        books: Arc::new(PostgresBooksRepository::new(pool.clone())),
        users: Arc::new(PostgresUsersRepository::new(pool.clone())),
        likes: Arc::new(PostgresLikesRepository::new(pool.clone())),
        identity: Arc::new(identity),
        renderer: Arc::new(TemplateRenderer::new(&config.views.template_dir)),
        catalog: Arc::new(CatalogLoader::new(
            config.catalog.catalog_path.clone(),
            config.catalog.images_dir.clone(),
        )),
    };

    let app = routes::create_app(state, session_layer);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Leonlib listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    info!("Server stopped");
    Ok(())
}
