use crate::di::DnsServices;
use geodns_domain::{CliOverrides, Config};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Cancels `shutdown` on SIGTERM or SIGINT, and reloads the geo and policy
/// tables from `config_path` on SIGHUP.
pub fn spawn_signal_handlers(
    shutdown: CancellationToken,
    services: Arc<DnsServices>,
    config_path: Option<String>,
) {
    tokio::spawn(wait_for_shutdown(shutdown.clone()));
    tokio::spawn(reload_on_hangup(shutdown, services, config_path));
}

#[cfg(unix)]
async fn wait_for_shutdown(shutdown: CancellationToken) {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut sigterm, mut sigint) = match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(term), Ok(int)) => (term, int),
        (Err(e), _) | (_, Err(e)) => {
            error!(error = %e, "Failed to install shutdown signal handlers");
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
        _ = sigint.recv() => info!("Received SIGINT, shutting down"),
        _ = shutdown.cancelled() => return,
    }

    shutdown.cancel();
}

#[cfg(not(unix))]
async fn wait_for_shutdown(shutdown: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!(error = %e, "Failed to listen for Ctrl-C");
                return;
            }
            info!("Received Ctrl-C, shutting down");
        }
        _ = shutdown.cancelled() => return,
    }

    shutdown.cancel();
}

#[cfg(unix)]
async fn reload_on_hangup(
    shutdown: CancellationToken,
    services: Arc<DnsServices>,
    config_path: Option<String>,
) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sighup = match signal(SignalKind::hangup()) {
        Ok(sighup) => sighup,
        Err(e) => {
            error!(error = %e, "Failed to install SIGHUP handler");
            return;
        }
    };

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            received = sighup.recv() => {
                if received.is_none() {
                    break;
                }
                info!("Received SIGHUP, reloading configuration");
                reload(&services, config_path.as_deref());
            }
        }
    }
}

#[cfg(not(unix))]
async fn reload_on_hangup(
    _shutdown: CancellationToken,
    _services: Arc<DnsServices>,
    _config_path: Option<String>,
) {
}

#[cfg_attr(not(unix), allow(dead_code))]
fn reload(services: &DnsServices, config_path: Option<&str>) {
    let Some(path) = config_path else {
        warn!("No configuration file in use, nothing to reload");
        return;
    };

    let config = match Config::load(Some(path), CliOverrides::default()) {
        Ok(config) => config,
        Err(e) => {
            error!(path, error = %e, "Reload failed, keeping current tables");
            return;
        }
    };

    if let Err(e) = config.validate() {
        error!(path, error = %e, "Reloaded configuration is invalid, keeping current tables");
        return;
    }

    match services.reload(&config) {
        Ok(()) => info!(path, "Configuration reloaded"),
        Err(e) => error!(path, error = %e, "Reload failed, keeping current tables"),
    }
}
