//! Rebuild trigger coordination
//!
//! When FX lags behind vanilla, the rebuild workflow is dispatched unless its
//! most recent run did not succeed. A broken pipeline gets a single
//! manual-update alert; the `needsManualUpdate` flag keeps later cycles quiet
//! until a dispatch goes through again.

use tracing::{debug, info, warn};

use crate::clients::discord::ChatApi;
use crate::clients::github::WorkflowApi;
use crate::compat::classifier::Classification;
use crate::monitor::error::MonitorError;
use crate::monitor::status_board::MANUAL_UPDATE_ALERT;
use crate::store::{StateStore, load_needs_manual_update, save_needs_manual_update};

/// Progress of the rebuild path within one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildState {
    /// No rebuild needed
    Idle,
    /// Looking up the latest workflow run
    Checking,
    /// A new workflow run was dispatched
    Triggered,
    /// The latest run did not succeed, so nothing was dispatched
    Skipped,
}

/// What the coordinator did in one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebuildOutcome {
    pub state: RebuildState,
    pub alert_sent: bool,
}

/// Collaborators used by [`coordinate_rebuild`]
pub struct RebuildContext<'a> {
    pub workflows: &'a dyn WorkflowApi,
    pub chat: &'a dyn ChatApi,
    pub store: &'a dyn StateStore,
    pub notification_channel_id: &'a str,
}

fn transition(state: &mut RebuildState, next: RebuildState) {
    debug!("Rebuild state: {:?} -> {:?}", state, next);
    *state = next;
}

/// Run the rebuild path for this cycle's classification
///
/// API failures propagate; the flag is only written once the alert (if any)
/// went out, so a failed alert is retried by the next cycle.
pub async fn coordinate_rebuild(
    ctx: &RebuildContext<'_>,
    classification: &Classification,
) -> Result<RebuildOutcome, MonitorError> {
    let mut state = RebuildState::Idle;

    if !classification.needs_rebuild() {
        return Ok(RebuildOutcome {
            state,
            alert_sent: false,
        });
    }

    transition(&mut state, RebuildState::Checking);
    let latest_run = ctx.workflows.latest_run().await?;

    let triggered = match latest_run {
        Some(run) if !run.succeeded() => {
            warn!(
                "Latest rebuild run did not succeed (conclusion: {:?}), not dispatching",
                run.conclusion
            );
            transition(&mut state, RebuildState::Skipped);
            false
        }
        _ => {
            ctx.workflows.dispatch().await?;
            transition(&mut state, RebuildState::Triggered);
            true
        }
    };

    let already_alerted = load_needs_manual_update(ctx.store)?;
    let alert_sent = !triggered && !already_alerted;
    if alert_sent {
        ctx.chat
            .send_notification(ctx.notification_channel_id, MANUAL_UPDATE_ALERT)
            .await?;
        info!("Sent manual update alert");
    } else if !triggered {
        debug!("Manual update alert already sent, staying quiet");
    }

    save_needs_manual_update(ctx.store, !triggered)?;

    Ok(RebuildOutcome { state, alert_sent })
}
