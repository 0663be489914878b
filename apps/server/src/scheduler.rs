//! Optional background rollover of past-due renewal dates.
//!
//! The core never advances `next_renewal_date` on its own; this scheduler
//! is the explicit, opt-in component that does (enable with
//! `KLYPP_RENEWAL_ROLLOVER=true`). Each rolled plan also produces a
//! RENEWAL notification for its owner.

use std::sync::Arc;

use tokio::time::{interval, sleep, Duration};
use tracing::{debug, info, warn};

use klypp_core::notifications::{NewNotification, NotificationMetadata, NotificationType};

use crate::main_lib::AppState;

/// Hourly is plenty for date-granular renewals.
const ROLLOVER_INTERVAL_SECS: u64 = 60 * 60;

/// Initial delay to let the server fully start.
const INITIAL_DELAY_SECS: u64 = 30;

pub fn start_renewal_rollover(state: Arc<AppState>) {
    tokio::spawn(async move {
        sleep(Duration::from_secs(INITIAL_DELAY_SECS)).await;
        info!("Renewal rollover scheduler started");
        let mut ticker = interval(Duration::from_secs(ROLLOVER_INTERVAL_SECS));
        loop {
            ticker.tick().await;
            if let Err(e) = roll_due_renewals(&state).await {
                warn!("Renewal rollover pass failed: {}", e);
            }
        }
    });
}

async fn roll_due_renewals(state: &Arc<AppState>) -> anyhow::Result<()> {
    let rolled = state.plan_service.roll_due_renewals().await?;
    if rolled.is_empty() {
        debug!("No plans due for renewal rollover");
        return Ok(());
    }

    info!("Rolled renewal dates for {} plans", rolled.len());
    for plan in rolled {
        let notification = NewNotification {
            user_id: plan.owner_id.clone(),
            title: "Subscription Renewed".to_string(),
            message: format!(
                "Your {} plan renewed and is next due on {}",
                plan.name, plan.next_renewal_date
            ),
            notification_type: NotificationType::Renewal,
            metadata: NotificationMetadata {
                plan_id: Some(plan.id.clone()),
                plan_name: Some(plan.name.clone()),
                ..Default::default()
            },
        };
        if let Err(e) = state
            .notification_service
            .create_notification(notification)
            .await
        {
            warn!("Failed to record renewal notification for plan {}: {}", plan.id, e);
        }
    }
    Ok(())
}
