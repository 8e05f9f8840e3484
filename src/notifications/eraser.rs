use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{error::NotificationError, gateway::NotificationGateway};

/// Wipes everything notification related a signed out user could still see
pub struct NotificationStateEraser<G: NotificationGateway> {
    notification_gateway: Arc<G>,
}

impl<G: NotificationGateway> NotificationStateEraser<G> {
    pub fn new(notification_gateway: Arc<G>) -> Self {
        Self {
            notification_gateway,
        }
    }

    /// Cancels scheduled notifications, dismisses displayed ones and resets
    /// the badge. Every step runs even if an earlier one failed.
    #[instrument(skip(self))]
    pub async fn clear(&self) {
        let results = [
            self.notification_gateway
                .cancel_all_scheduled()
                .await
                .map_err(NotificationError::erase),
            self.notification_gateway
                .dismiss_all()
                .await
                .map_err(NotificationError::erase),
            self.notification_gateway
                .set_badge_count(0)
                .await
                .map_err(NotificationError::erase),
        ];

        let failures = results
            .into_iter()
            .filter_map(Result::err)
            .inspect(|e| warn!("{}", e))
            .count();

        if failures == 0 {
            info!("Notification state cleared");
        }
    }
}
