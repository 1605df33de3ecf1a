use clap::Parser;
use odin_node::catalog::{CatalogStore, MemoryCatalog};
use odin_node::config::NodeConfig;
use odin_node::routes::{NodeContext, create_router};
use odin_node::scheduler::{JobRegistry, Schedule, Scheduler};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const JOB_INDEXER: &str = "indexer";
const JOB_BOOTSTRAP: &str = "bootstrap";
const JOB_ANNOUNCE: &str = "announce";
const JOB_HEARTBEAT: &str = "heartbeat";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 1. Configuration:
    let config = NodeConfig::parse();
    config.validate()?;
    let bind_addr = config.bind_addr()?;

    tracing::info!("Starting node {} on {}", config.node_id, bind_addr);
    match &config.directory {
        Some(dir) => tracing::info!("Indexing directory: {}", dir.display()),
        None => tracing::warn!("No directory configured, indexing runs will fail"),
    }

    // 2. Catalog:
    let catalog: Arc<dyn CatalogStore> = Arc::new(MemoryCatalog::open(&config.catalog_path)?);
    tracing::info!(
        "Catalog {} holds {} entries",
        config.catalog_path.display(),
        catalog.len()
    );

    // 3. Components:
    let ctx = NodeContext::build(&config, catalog);

    // 4. Jobs:
    let registry = JobRegistry::new();

    let indexer = ctx.indexer.clone();
    registry.register(JOB_INDEXER, move || {
        let indexer = indexer.clone();
        async move {
            indexer.index_configured().await?;
            Ok(())
        }
    });

    let membership = ctx.membership.clone();
    let bootstrap_url = config.bootstrap_url.clone();
    registry.register(JOB_BOOTSTRAP, move || {
        let membership = membership.clone();
        let bootstrap_url = bootstrap_url.clone();
        async move {
            if let Some(url) = bootstrap_url {
                membership.bootstrap(&url).await?;
            }
            Ok(())
        }
    });

    let membership = ctx.membership.clone();
    registry.register(JOB_ANNOUNCE, move || {
        let membership = membership.clone();
        async move {
            membership.announce_cycle().await;
            Ok(())
        }
    });

    let detector = ctx.detector.clone();
    registry.register(JOB_HEARTBEAT, move || {
        let detector = detector.clone();
        async move {
            detector.check_all().await;
            Ok(())
        }
    });

    let mut scheduler = Scheduler::new(registry);
    scheduler.add_job(
        JOB_INDEXER,
        Schedule::DailyAt {
            hour: config.index_hour,
        },
    );
    scheduler.add_job(JOB_BOOTSTRAP, Schedule::Startup);
    scheduler.add_job(JOB_ANNOUNCE, Schedule::Every(config.announce_interval()));
    scheduler.add_job(JOB_HEARTBEAT, Schedule::Every(config.heartbeat_interval()));

    // 5. Spawn scheduler (startup pass, then the polling loop):
    tokio::spawn(async move {
        scheduler.run_startup().await;
        scheduler.run().await;
    });

    // 6. Start HTTP server:
    let app = create_router(&ctx);

    tracing::info!("HTTP server listening on {}", bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
