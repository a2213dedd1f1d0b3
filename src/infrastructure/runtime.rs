//! Long-running fleet loop: startup reconciliation, reload on SIGHUP,
//! ordered shutdown.

use std::future::Future;

use tracing::{error, info, warn};

use crate::application::FleetService;
use crate::domain::ReconcileReport;
use crate::error::Result;
use crate::port::inbound::admin::FleetAdmin;

/// Stream of reload requests.
///
/// On Unix this is SIGHUP. Elsewhere it never fires.
struct ReloadSignal {
    #[cfg(unix)]
    inner: tokio::signal::unix::Signal,
}

impl ReloadSignal {
    fn new() -> Result<Self> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            Ok(Self {
                inner: signal(SignalKind::hangup())?,
            })
        }
        #[cfg(not(unix))]
        {
            Ok(Self {})
        }
    }

    async fn recv(&mut self) -> Option<()> {
        #[cfg(unix)]
        {
            self.inner.recv().await
        }
        #[cfg(not(unix))]
        {
            std::future::pending().await
        }
    }
}

/// Run the startup pass. A failed snapshot is fatal here: there is nothing
/// running yet to preserve.
///
/// # Errors
///
/// Returns the reconciliation error.
pub async fn start(service: &FleetService) -> Result<ReconcileReport> {
    let report = service.reload().await?;
    info!(
        added = report.added,
        failed = report.failures.len(),
        "Fleet started"
    );
    Ok(report)
}

/// Serve reloads until `shutdown` resolves, then stop every worker.
///
/// A failed reload leaves the fleet as it was and is only logged.
///
/// # Errors
///
/// Returns an error if the reload signal handler cannot be installed.
pub async fn run_until<F>(service: &FleetService, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    let mut reload = ReloadSignal::new()?;
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }
            received = reload.recv() => {
                if received.is_none() {
                    warn!("Reload signal stream closed");
                    break;
                }
                info!("Reload requested");
                match service.reload().await {
                    Ok(report) => info!(%report, "Reload applied"),
                    Err(e) => error!(error = %e, "Reload failed, fleet unchanged"),
                }
            }
        }
    }

    service.shutdown().await;
    Ok(())
}
