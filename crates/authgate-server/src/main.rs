//! authgate: Envoy ext_authz decision service.
//!
//! - gRPC `envoy.service.auth.v3.Authorization/Check` on `server.listen`
//! - optional ops HTTP listener on `server.admin_listen`
//! - Ctrl-C flips readiness to draining, then stops both listeners

use std::process::ExitCode;

use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::{fmt, EnvFilter};

use authgate_core::error::{AuthzError, Result};
use authgate_server::{app_state::AppState, config, router, transport};

#[derive(Debug, Parser)]
#[command(name = "authgate", about = "External authorization decision service")]
struct Args {
    /// Path to the YAML config.
    #[arg(long, env = "AUTHGATE_CONFIG", default_value = "authgate.yaml")]
    config: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "authgate exited with error");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let cfg = config::load_from_file(&args.config)?;
    let listen = cfg.server.listen_addr()?;
    let admin = cfg.server.admin_addr()?;

    let state = AppState::new(&cfg)?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    {
        let state = state.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("shutdown requested, draining");
                    state.set_draining();
                    let _ = shutdown_tx.send(true);
                }
                Err(e) => {
                    // Keep the sender alive so listeners are not stopped.
                    let _keep = shutdown_tx;
                    tracing::warn!(error = %e, "ctrl-c handler unavailable");
                    std::future::pending::<()>().await;
                }
            }
        });
    }

    let admin_task = match admin {
        Some(addr) => {
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .map_err(|e| AuthzError::Internal(format!("bind {addr} failed: {e}")))?;
            tracing::info!(%addr, "ops listener starting");
            let app = router::build_admin_router(state.clone());
            let mut rx = shutdown_rx.clone();
            Some(tokio::spawn(async move {
                let shutdown = async move {
                    let _ = rx.changed().await;
                };
                if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(shutdown).await {
                    tracing::error!(error = %e, "ops listener failed");
                }
            }))
        }
        None => None,
    };

    let mut rx = shutdown_rx;
    transport::grpc::serve(state, listen, async move {
        let _ = rx.changed().await;
    })
    .await?;

    if let Some(task) = admin_task {
        let _ = task.await;
    }
    tracing::info!("authgate stopped");
    Ok(())
}
