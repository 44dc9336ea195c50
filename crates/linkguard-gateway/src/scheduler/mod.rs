//! Background timer tasks
//!
//! TLD dictionary refresh, periodic membership reconciliation, and the
//! one-shot adapter connectivity check.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use linkguard_common::AppError;
use linkguard_service::services::MembershipService;
use linkguard_service::TldDictionary;

use crate::server::GatewayState;

/// Refresh `tlds` from `url` every `period`, starting immediately.
///
/// A failed refresh keeps the current dictionary.
pub fn spawn_tld_refresh(
    tlds: Arc<TldDictionary>,
    client: reqwest::Client,
    url: String,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            match tlds.refresh(&client, &url).await {
                Ok(count) => info!(count, "TLD dictionary refreshed"),
                Err(e) => warn!(error = %e, "TLD refresh failed, keeping current dictionary"),
            }
        }
    })
}

/// Reconcile membership `initial_delay` after each adapter `ready`, then
/// every `period` until the next `ready`.
pub fn spawn_reconciliation(
    state: GatewayState,
    initial_delay: Duration,
    period: Duration,
) -> JoinHandle<()> {
    let mut ready = state.subscribe_ready();
    tokio::spawn(async move {
        if ready.changed().await.is_err() {
            return;
        }
        loop {
            tokio::time::sleep(initial_delay).await;
            reconcile_once(&state).await;

            loop {
                tokio::select! {
                    () = tokio::time::sleep(period) => reconcile_once(&state).await,
                    changed = ready.changed() => {
                        if changed.is_err() {
                            return;
                        }
                        break;
                    }
                }
            }
        }
    })
}

async fn reconcile_once(state: &GatewayState) {
    let joined = state.joined().snapshot();
    MembershipService::new(state.service_context())
        .reconcile(&joined)
        .await;
}

/// Resolve once an adapter has connected; fail after `timeout`
pub async fn wait_for_adapter(
    mut seen: watch::Receiver<bool>,
    timeout: Duration,
) -> Result<(), AppError> {
    match tokio::time::timeout(timeout, seen.wait_for(|seen| *seen)).await {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(_)) => Err(AppError::Bridge("gateway state dropped".to_string())),
        Err(_) => {
            error!(
                timeout_secs = timeout.as_secs(),
                "No protocol adapter connected in time"
            );
            Err(AppError::Bridge(format!(
                "no protocol adapter connected within {}s",
                timeout.as_secs()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{next_action, state};
    use linkguard_core::entities::ChannelConfig;
    use linkguard_core::events::OutboundAction;

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_adapter_times_out() {
        let state = state(&[]);
        let err = wait_for_adapter(state.subscribe_adapter_seen(), Duration::from_secs(30))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "BRIDGE_ERROR");
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_adapter_succeeds() {
        let state = state(&[]);
        let waiter = tokio::spawn(wait_for_adapter(
            state.subscribe_adapter_seen(),
            Duration::from_secs(30),
        ));
        tokio::time::sleep(Duration::from_secs(1)).await;
        state.mark_adapter_seen();
        assert!(waiter.await.unwrap().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reconciliation_waits_for_ready_then_delay() {
        let state = state(&[]);
        state
            .service_context()
            .repository()
            .put(&ChannelConfig::with_defaults("configured"))
            .await
            .unwrap();
        state.joined().insert("guardbot");

        let task = spawn_reconciliation(
            state.clone(),
            Duration::from_secs(5),
            Duration::from_secs(3600),
        );

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(next_action(&state).await, None);

        state.signal_ready();
        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(next_action(&state).await, None);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(
            next_action(&state).await,
            Some(OutboundAction::join("configured"))
        );

        // Hourly afterwards
        state.joined().insert("configured");
        state.joined().insert("leftover");
        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert_eq!(
            next_action(&state).await,
            Some(OutboundAction::part("leftover"))
        );

        task.abort();
    }
}
