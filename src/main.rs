use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use clap::{Parser, ValueEnum};
use axum::http::{HeaderValue, Method};
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod shared;
mod domain;
mod ports;
mod infrastructure;
mod services;
mod presentation;

use shared::config::{Config, ConfigOverrides};
use shared::error::FeedError;
use shared::result::Result;
use infrastructure::cache::MokaCache;
use infrastructure::github::{GitHubEndpoints, PaginatedFetcher};
use infrastructure::sqlite::commit_repo::SqliteCommitRepository;
use infrastructure::sqlite::repository_repo::SqliteRepositoryRepository;
use ports::queue::{JobQueue, SyncJob};
use presentation::routes::AppContext;
use services::commit_sync::CommitSyncJob;
use services::feed::FeedService;
use services::repository_sync::RepositorySyncJob;
use services::scheduler::SyncScheduler;
use services::worker::{JobRunner, WorkerPool};


#[derive(Parser)]
#[clap(name = "ghfeed")]
#[clap(version)]
#[clap(about = "Mirrors a GitHub account's repositories and commits into SQLite")]
pub struct Args {
    /// Path to the TOML configuration file
    #[clap(short, long, value_parser, default_value = "config.toml")]
    config: PathBuf,

    /// The SQLite database path (overrides the config file)
    #[clap(short, long, value_parser)]
    db_path: Option<PathBuf>,

    /// Server bind address (overrides the config file)
    #[clap(short, long)]
    bind_address: Option<SocketAddr>,

    /// GitHub account whose repositories are mirrored
    #[clap(short, long, env = "GITHUB_USERNAME")]
    username: Option<String>,

    /// GitHub personal access token
    #[clap(long, env = "GITHUB_PAT", hide_env_values = true)]
    token: Option<String>,

    /// Run one full sync, wait for every queued job, then exit
    #[clap(long)]
    once: bool,

    /// Log output format
    #[clap(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn cors_layer(config: &Config) -> Result<CorsLayer> {
    let origins = config
        .server
        .cors_origins
        .iter()
        .map(|o| o.parse::<HeaderValue>().map_err(|e| FeedError::Config(e.to_string())))
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST]))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format);

    // 加载配置
    let config = Config::from_args_and_file(
        &args.config,
        ConfigOverrides {
            db_path: args.db_path,
            bind_address: args.bind_address,
            username: args.username,
            token: args.token,
        },
    )?;
    if args.once && config.github.username.trim().is_empty() {
        return Err(FeedError::Config("--once requires a GitHub username".into()));
    }
    let config = Arc::new(config);

    info!("Starting ghfeed...");
    info!("Configuration loaded: {:?}", config);

    // 初始化 SQLite 数据库
    let sqlite_pool = infrastructure::sqlite::create_pool(
        &config.database.sqlite_path,
        config.database.max_connections,
    )
    .await?;

    info!("Running database migrations...");
    infrastructure::sqlite::run_migrations(&sqlite_pool).await?;
    info!("Database migrations completed");

    let repository_store = Arc::new(SqliteRepositoryRepository::new(sqlite_pool.clone()));
    let commit_store = Arc::new(SqliteCommitRepository::new(sqlite_pool.clone()));
    let endpoints = GitHubEndpoints::new(&config.github.api_base_url, config.github.per_page)?;
    let fetcher = Arc::new(PaginatedFetcher::new(&config.github)?);

    // 任务队列与工作者池
    let (queue, receiver) = infrastructure::queue::channel();
    let queue = Arc::new(queue);

    let runner = JobRunner::new(
        Arc::new(RepositorySyncJob::new(
            config.clone(),
            endpoints.clone(),
            fetcher.clone(),
            repository_store.clone(),
            queue.clone(),
        )),
        Arc::new(CommitSyncJob::new(
            config.clone(),
            endpoints.clone(),
            fetcher.clone(),
            repository_store.clone(),
            commit_store.clone(),
        )),
    );
    let worker_pool = WorkerPool::new(receiver, runner, config.sync.workers);
    let shutdown = CancellationToken::new();
    let workers = worker_pool.spawn(shutdown.clone());

    if args.once {
        queue.submit(SyncJob::SyncRepositories).await?;
        queue.wait_idle().await;

        let stats = worker_pool.stats();
        info!(
            "One-shot sync finished: {} job(s) succeeded, {} failed",
            stats.succeeded.load(Ordering::Relaxed),
            stats.failed.load(Ordering::Relaxed)
        );

        shutdown.cancel();
        futures::future::join_all(workers).await;
        return Ok(());
    }

    // 启动同步调度器
    let scheduler = SyncScheduler::new(config.clone(), queue.clone());
    let scheduler_handle = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move { scheduler.start(shutdown).await })
    };

    let cache = Arc::new(MokaCache::new(
        config.cache.max_capacity,
        Duration::from_secs(config.cache.ttl_secs),
    ));
    let app_context = Arc::new(AppContext {
        repository_store,
        commit_store: commit_store.clone(),
        queue,
        endpoints,
        feed: FeedService::new(commit_store, cache),
    });

    let app = presentation::routes::create_app_router(app_context).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(cors_layer(&config)?),
    );

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address).await?;

    info!("Server listening on {}", config.server.bind_address);
    info!("API available at: http://{}/api/", config.server.bind_address);

    let server_shutdown = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for ctrl-c: {}", e);
            }
            info!("Shutdown requested");
            server_shutdown.cancel();
        })
        .await?;

    shutdown.cancel();
    if let Err(e) = scheduler_handle.await {
        warn!("Scheduler task ended abnormally: {}", e);
    }
    futures::future::join_all(workers).await;
    info!("ghfeed stopped");

    Ok(())
}
