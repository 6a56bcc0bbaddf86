use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use configs::AppConfig;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_stream::wrappers::TcpListenerStream;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::grpc::GrpcOrderHandler;
use crate::routes;
use crate::state::ServerState;

/// Load `.env`, the config file and environment overrides.
pub fn load_config() -> Result<AppConfig, StartupError> {
    dotenvy::dotenv().ok();
    AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))
}

async fn bind(addr: String) -> Result<TcpListener, StartupError> {
    let resolved: SocketAddr = tokio::net::lookup_host(addr.as_str())
        .await
        .map_err(|e| StartupError::InvalidConfig(format!("{addr}: {e}")))?
        .next()
        .ok_or_else(|| StartupError::InvalidConfig(format!("{addr}: no address")))?;
    TcpListener::bind(resolved).await.map_err(|source| StartupError::Bind { addr: resolved, source })
}

/// Connect, migrate, serve both transports until `shutdown` resolves, then
/// close the pool.
pub async fn run(cfg: AppConfig, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<(), StartupError> {
    if cfg.auth.uses_dev_secret() {
        warn!("JWT_SECRET not set; using the development secret");
    }

    let db = models::db::connect_with_config(&cfg.database).await?;
    run_with_db(cfg, db, shutdown).await
}

/// Everything after connect. The pool is closed on every exit path,
/// including a failed migration or bind.
async fn run_with_db(
    cfg: AppConfig,
    db: DatabaseConnection,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), StartupError> {
    let served = migrate_and_serve(&cfg, &db, shutdown).await;

    // listeners have drained (or never started); only now release the pool
    if let Err(e) = db.close().await {
        warn!(error = %e, "closing database pool failed");
    }
    info!("database pool closed");
    served
}

async fn migrate_and_serve(
    cfg: &AppConfig,
    db: &DatabaseConnection,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), StartupError> {
    migration::Migrator::up(db, None).await.map_err(StartupError::Migration)?;
    info!("migrations applied");

    let state = ServerState::from_db(db.clone(), &cfg.auth).map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let rest = bind(cfg.server.rest_addr()).await?;
    let grpc = bind(cfg.server.grpc_addr()).await?;
    serve(rest, grpc, state, shutdown).await
}

/// Run the REST and RPC listeners over one state until `shutdown` resolves.
/// Both stop accepting at the same time and drain in-flight requests. If one
/// listener fails the other is told to stop and drained before returning.
pub async fn serve(
    rest: TcpListener,
    grpc: TcpListener,
    state: ServerState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), StartupError> {
    let (tx, rx) = watch::channel(false);
    let tx = Arc::new(tx);
    let on_signal = tx.clone();
    tokio::spawn(async move {
        shutdown.await;
        info!("shutdown requested");
        let _ = on_signal.send(true);
    });

    let rest_addr = rest.local_addr().map_err(StartupError::Listener)?;
    let grpc_addr = grpc.local_addr().map_err(StartupError::Listener)?;
    info!(%rest_addr, %grpc_addr, "listening");

    let app = routes::build_router(state.clone());
    let rest_task = {
        let rx = rx.clone();
        let tx = tx.clone();
        async move {
            let res = axum::serve(rest, app).with_graceful_shutdown(stopped(rx)).await;
            if let Err(e) = &res {
                warn!(error = %e, "rest listener failed; stopping rpc");
                let _ = tx.send(true);
            }
            res.map_err(StartupError::Rest)
        }
    };
    let grpc_task = async move {
        let res = tonic::transport::Server::builder()
            .add_service(GrpcOrderHandler::new(state.orders.clone()).into_server())
            .serve_with_incoming_shutdown(TcpListenerStream::new(grpc), stopped(rx))
            .await;
        if let Err(e) = &res {
            warn!(error = %e, "rpc listener failed; stopping rest");
            let _ = tx.send(true);
        }
        res.map_err(StartupError::from)
    };

    let (rest_res, grpc_res) = tokio::join!(rest_task, grpc_task);
    info!("listeners stopped");
    rest_res?;
    grpc_res
}

async fn stopped(mut rx: watch::Receiver<bool>) {
    // a dropped sender also means stop
    let _ = rx.wait_for(|stop| *stop).await;
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "ctrl_c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
