pub mod dummy;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use super::entities::{
    ChannelConfig, DeliveryDirective, NotificationEnvelope, PermissionStatus, PushTokenConfig,
    SubscriptionHandle,
};

#[derive(Error, Debug)]
pub enum NotificationGatewayError {
    #[error("Notification service unavailable: {0}")]
    Unavailable(String),

    #[error("Notification service rejected the request: {0}")]
    Rejected(String),
}

/// Callback invoked for every notification event a listener subscribed to
pub type NotificationListener = Box<dyn Fn(NotificationEnvelope) + Send + Sync>;

/// Decides how an incoming notification is presented.
///
/// Invoked synchronously by the gateway before anything is rendered. Exactly
/// one handler is installed at a time.
pub trait NotificationHandler: Send + Sync {
    fn handle_notification(&self, envelope: &NotificationEnvelope) -> DeliveryDirective;
}

/// The OS notification delivery service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn get_permission_status(&self) -> Result<PermissionStatus, NotificationGatewayError>;

    /// Prompts the user. Returns the status after the prompt was answered.
    async fn request_permission(&self) -> Result<PermissionStatus, NotificationGatewayError>;

    /// Fetches the push routing token addressing this device
    async fn get_push_token(
        &self,
        config: &PushTokenConfig,
    ) -> Result<String, NotificationGatewayError>;

    /// Creates or updates an Android notification channel. Idempotent.
    async fn set_channel(&self, channel: &ChannelConfig) -> Result<(), NotificationGatewayError>;

    async fn cancel_all_scheduled(&self) -> Result<(), NotificationGatewayError>;

    async fn dismiss_all(&self) -> Result<(), NotificationGatewayError>;

    async fn set_badge_count(&self, count: u32) -> Result<(), NotificationGatewayError>;

    fn add_received_listener(&self, listener: NotificationListener) -> SubscriptionHandle;

    fn add_tapped_listener(&self, listener: NotificationListener) -> SubscriptionHandle;

    /// Removes a listener. Unknown handles are ignored.
    fn remove_subscription(&self, handle: SubscriptionHandle);

    /// Replaces the installed presentation handler
    fn set_notification_handler(&self, handler: Arc<dyn NotificationHandler>);
}
