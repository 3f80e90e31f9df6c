use std::net::SocketAddr;

use chronicle_aggregator::{
    api::create_router,
    config::Config,
    consumer::ConsumerPool,
    observability::init_tracing,
    queue::BrokerQueue,
    store::{create_pool, run_migrations},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate()?;

    init_tracing(&config.observability);

    tracing::info!("starting Chronicle aggregator");
    tracing::info!("configuration loaded: {:?}", config.server);

    let db_pool = create_pool(&config.database).await?;
    tracing::info!("database connection pool created");

    run_migrations(&db_pool).await?;
    tracing::info!("database migrations completed");

    let queue = BrokerQueue::connect(&config.queue.url).await?;
    tracing::info!("broker queue connected");

    let mut consumers = ConsumerPool::new();
    consumers.start(config.consumer.worker_count, db_pool.clone(), queue.clone());

    let app = create_router(db_pool.clone(), queue.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on http://{addr}");
    tracing::info!("Chronicle aggregator is ready to accept requests");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("server error: {e}"))?;

    consumers.stop().await;
    tracing::info!("Chronicle aggregator stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
