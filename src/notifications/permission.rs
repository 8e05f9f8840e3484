use std::sync::Arc;
use tracing::{debug, instrument, warn};

use super::{entities::PermissionStatus, gateway::NotificationGateway};

/// Single source of truth for whether notifications may be delivered
pub struct PermissionGate<G: NotificationGateway> {
    notification_gateway: Arc<G>,
}

impl<G: NotificationGateway> PermissionGate<G> {
    pub fn new(notification_gateway: Arc<G>) -> Self {
        Self {
            notification_gateway,
        }
    }

    /// Returns whether notifications are permitted, prompting the user at
    /// most once if they are not yet.
    #[instrument(skip(self))]
    pub async fn ensure_permission(&self) -> bool {
        let status = match self.notification_gateway.get_permission_status().await {
            Ok(status) => status,
            Err(e) => {
                warn!("Failed to read notification permission: {}", e);
                return false;
            }
        };

        if status == PermissionStatus::Granted {
            return true;
        }

        debug!("Notification permission is {:?}, requesting", status);
        match self.notification_gateway.request_permission().await {
            Ok(status) => status == PermissionStatus::Granted,
            Err(e) => {
                warn!("Failed to request notification permission: {}", e);
                false
            }
        }
    }
}
