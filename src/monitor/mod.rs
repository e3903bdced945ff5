//! Monitor module
//!
//! Tick scheduling and the fetch-aggregate-render cycle

mod clock;
mod controller;
mod scheduler;
mod snapshot;
mod state;

pub use clock::{Clock, SystemClock, TokioClock};
pub use controller::{Controller, CycleOutcome, SHUTDOWN_NOTICE};
pub use scheduler::{SchedulerHandle, Tick, TickScheduler};
pub use snapshot::Snapshot;
pub use state::{Aggregated, CycleCounters, CyclePhase, MonitorState};

use crate::feed::FetchError;
use crate::window::StatsError;
use thiserror::Error;

/// Why a cycle ended without rendering
#[derive(Debug, Error)]
pub enum CycleError {
    /// The price source failed or timed out
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// Statistics could not be derived from a non-empty window
    #[error("internal invariant violated: {0}")]
    Invariant(#[from] StatsError),
}

/// Resolve when the process is asked to terminate (Ctrl-C or SIGTERM)
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }
}
