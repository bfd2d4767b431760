/// Identity Server - user records and credential checks over HTTP and RPC
use clap::{Parser, Subcommand};
use identity_core::{IdentityController, NewUser, UserRepository};
use identity_server::{
    config::ServerConfig, create_router, AppState, IdentityService, TokenService, UserAuthRpc,
};
use identity_storage::SqliteUserStore;
use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    sync::Arc,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "identity-server")]
#[command(about = "User identity service with token and RPC credential checks", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "IDENTITY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP and RPC servers
    Serve,
    /// Create a new user
    AddUser {
        /// Display name
        #[arg(short, long)]
        name: String,
        /// Login
        #[arg(short, long)]
        login: String,
        /// Password
        #[arg(short, long)]
        password: String,
        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List all users
    ListUsers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve => {
            serve(config).await?;
        }
        Commands::AddUser {
            name,
            login,
            password,
            description,
        } => {
            add_user(
                config,
                NewUser {
                    name,
                    login,
                    password,
                    description,
                },
            )
            .await?;
        }
        Commands::ListUsers => {
            list_users(config).await?;
        }
    }

    Ok(())
}

/// Connect the pool, migrate, and wrap it in a store using the configured scheme
async fn open_store(config: &ServerConfig) -> anyhow::Result<SqliteUserStore> {
    let pool = identity_storage::create_pool(
        &config.storage.database_url,
        config.storage.max_connections,
    )
    .await?;

    // The schema may already exist under an older migration history
    if let Err(e) = identity_storage::run_migrations(&pool).await {
        tracing::warn!("Database migration failed, continuing: {}", e);
    }

    Ok(SqliteUserStore::new(pool, config.auth.credential_scheme()))
}

fn build_identity(
    config: &ServerConfig,
    store: SqliteUserStore,
) -> (Arc<dyn IdentityController>, Arc<TokenService>) {
    let tokens = Arc::new(TokenService::new(
        &config.auth.jwt_secret,
        config.auth.token_ttl_minutes,
    ));
    let identity: Arc<dyn IdentityController> =
        Arc::new(IdentityService::new(Arc::new(store), Arc::clone(&tokens)));
    (identity, tokens)
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting Identity Server");

    let store = open_store(&config).await?;
    tracing::info!(scheme = store.scheme_name(), "Database connected");

    let (identity, tokens) = build_identity(&config, store);

    // HTTP
    let app = create_router(AppState::new(Arc::clone(&identity), tokens));
    let http_addr = SocketAddr::from((
        config.server.host.parse::<IpAddr>()?,
        config.server.port,
    ));
    let listener = tokio::net::TcpListener::bind(http_addr).await?;
    tracing::info!("HTTP listening on {}", http_addr);

    let http = async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(anyhow::Error::from)
    };

    // RPC
    let rpc = async {
        if !config.rpc.enabled {
            tracing::info!("RPC server disabled");
            return Ok::<(), anyhow::Error>(());
        }

        let rpc_addr = SocketAddr::from((config.rpc.host.parse::<IpAddr>()?, config.rpc.port));
        tracing::info!("RPC listening on {}", rpc_addr);

        tonic::transport::Server::builder()
            .add_service(UserAuthRpc::new(Arc::clone(&identity)).into_service())
            .serve_with_shutdown(rpc_addr, shutdown_signal())
            .await
            .map_err(anyhow::Error::from)
    };

    tokio::try_join!(http, rpc)?;

    tracing::info!("Identity Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn add_user(config: ServerConfig, input: NewUser) -> anyhow::Result<()> {
    let store = open_store(&config).await?;
    let (identity, _) = build_identity(&config, store);

    let user = identity.create(input).await?;
    println!("Created user {} ({})", user.id, user.login);

    Ok(())
}

async fn list_users(config: ServerConfig) -> anyhow::Result<()> {
    let store = open_store(&config).await?;
    let users = store.list_all().await?;

    println!("Users:");
    for user in users {
        println!("  {} - {} ({})", user.id, user.name, user.login);
    }

    Ok(())
}
