use anyhow::Context;
use gastro_server::{AppState, Config, Gateway, build_app, logger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    logger::init_logger_with_file(&config.log_level, config.log_json, config.log_dir.as_deref())?;

    tracing::info!(
        environment = %config.environment,
        version = env!("CARGO_PKG_VERSION"),
        "Starting gastro-server"
    );

    let gateway = Gateway::connect(&config.db_config())
        .await
        .context("failed to open database")?;
    gateway.migrate().await.context("failed to apply schema")?;

    let app = build_app(AppState::new(gateway.clone()));

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("gastro-server listening on http://{addr}");

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
    });

    tokio::select! {
        joined = &mut server => {
            joined??;
            gateway.pool().close().await;
            return Ok(());
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    let _ = shutdown_tx.send(());
    match tokio::time::timeout(config.shutdown_timeout, &mut server).await {
        Ok(joined) => joined??,
        Err(_) => {
            tracing::warn!(
                timeout_ms = config.shutdown_timeout.as_millis() as u64,
                "In-flight requests did not finish in time"
            );
            server.abort();
        }
    }

    gateway.pool().close().await;
    tracing::info!("gastro-server stopped");
    Ok(())
}
