use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::{collections::HashMap, sync::Arc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{NotificationGateway, NotificationGatewayError, NotificationHandler, NotificationListener};
use crate::notifications::entities::{
    ChannelConfig, DeliveryDirective, NotificationEnvelope, PermissionStatus, PushTokenConfig,
    SubscriptionHandle,
};

type SharedListener = Arc<dyn Fn(NotificationEnvelope) + Send + Sync>;

/// In-process stand-in for the OS notification service.
///
/// Keeps the installed handler and all live listeners, so notifications can
/// be delivered and tapped without a device.
pub struct DummyNotificationGateway {
    permission: Mutex<PermissionStatus>,
    grant_on_request: bool,
    badge_count: Mutex<u32>,
    displayed: Mutex<Vec<NotificationEnvelope>>,
    scheduled: Mutex<Vec<NotificationEnvelope>>,
    channels: RwLock<HashMap<String, ChannelConfig>>,
    handler: RwLock<Option<Arc<dyn NotificationHandler>>>,
    received_listeners: RwLock<HashMap<SubscriptionHandle, SharedListener>>,
    tapped_listeners: RwLock<HashMap<SubscriptionHandle, SharedListener>>,
}

impl DummyNotificationGateway {
    pub fn new() -> Self {
        Self::with_permission(PermissionStatus::Undetermined, true)
    }

    /// Gateway starting out with `status`, answering a permission prompt
    /// with `grant_on_request`
    pub fn with_permission(status: PermissionStatus, grant_on_request: bool) -> Self {
        Self {
            permission: Mutex::new(status),
            grant_on_request,
            badge_count: Mutex::new(0),
            displayed: Mutex::new(Vec::new()),
            scheduled: Mutex::new(Vec::new()),
            channels: RwLock::new(HashMap::new()),
            handler: RwLock::new(None),
            received_listeners: RwLock::new(HashMap::new()),
            tapped_listeners: RwLock::new(HashMap::new()),
        }
    }

    /// Simulates an incoming notification: asks the installed handler how to
    /// present it, then notifies received listeners.
    pub fn deliver(&self, envelope: NotificationEnvelope) -> DeliveryDirective {
        let handler = self.handler.read().clone();
        let directive = match handler {
            Some(handler) => handler.handle_notification(&envelope),
            None => {
                warn!("No notification handler installed, notification stays hidden");
                DeliveryDirective {
                    show_alert: false,
                    play_sound: false,
                    set_badge: false,
                }
            }
        };

        if directive.show_alert {
            info!(kind = ?envelope.kind, chat_id = ?envelope.chat_id, "Showing notification");
            self.displayed.lock().push(envelope.clone());
        }
        if directive.set_badge {
            *self.badge_count.lock() += 1;
        }

        let listeners: Vec<SharedListener> =
            self.received_listeners.read().values().cloned().collect();
        for listener in listeners {
            listener(envelope.clone());
        }

        directive
    }

    /// Simulates the user tapping a notification
    pub fn tap(&self, envelope: NotificationEnvelope) {
        let listeners: Vec<SharedListener> =
            self.tapped_listeners.read().values().cloned().collect();
        if listeners.is_empty() {
            debug!("Tap without listeners");
        }
        for listener in listeners {
            listener(envelope.clone());
        }
    }

    pub fn schedule(&self, envelope: NotificationEnvelope) {
        self.scheduled.lock().push(envelope);
    }

    pub fn live_received_listeners(&self) -> usize {
        self.received_listeners.read().len()
    }

    pub fn live_tapped_listeners(&self) -> usize {
        self.tapped_listeners.read().len()
    }

    pub fn badge_count(&self) -> u32 {
        *self.badge_count.lock()
    }

    pub fn displayed_count(&self) -> usize {
        self.displayed.lock().len()
    }

    pub fn scheduled_count(&self) -> usize {
        self.scheduled.lock().len()
    }

    pub fn channel(&self, id: &str) -> Option<ChannelConfig> {
        self.channels.read().get(id).cloned()
    }

    pub fn has_handler(&self) -> bool {
        self.handler.read().is_some()
    }
}

impl Default for DummyNotificationGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationGateway for DummyNotificationGateway {
    async fn get_permission_status(&self) -> Result<PermissionStatus, NotificationGatewayError> {
        Ok(*self.permission.lock())
    }

    async fn request_permission(&self) -> Result<PermissionStatus, NotificationGatewayError> {
        let mut permission = self.permission.lock();
        if *permission == PermissionStatus::Undetermined {
            *permission = if self.grant_on_request {
                PermissionStatus::Granted
            } else {
                PermissionStatus::Denied
            };
        }
        Ok(*permission)
    }

    async fn get_push_token(
        &self,
        config: &PushTokenConfig,
    ) -> Result<String, NotificationGatewayError> {
        if *self.permission.lock() != PermissionStatus::Granted {
            return Err(NotificationGatewayError::Rejected(
                "notification permission not granted".to_string(),
            ));
        }
        let token = format!("DummyPushToken[{}]", Uuid::new_v4());
        info!(project_id = ?config.project_id, "Issued push token {}", token);
        Ok(token)
    }

    async fn set_channel(&self, channel: &ChannelConfig) -> Result<(), NotificationGatewayError> {
        self.channels
            .write()
            .insert(channel.id.clone(), channel.clone());
        Ok(())
    }

    async fn cancel_all_scheduled(&self) -> Result<(), NotificationGatewayError> {
        self.scheduled.lock().clear();
        Ok(())
    }

    async fn dismiss_all(&self) -> Result<(), NotificationGatewayError> {
        self.displayed.lock().clear();
        Ok(())
    }

    async fn set_badge_count(&self, count: u32) -> Result<(), NotificationGatewayError> {
        *self.badge_count.lock() = count;
        Ok(())
    }

    fn add_received_listener(&self, listener: NotificationListener) -> SubscriptionHandle {
        let handle = SubscriptionHandle::new();
        self.received_listeners
            .write()
            .insert(handle, Arc::from(listener));
        handle
    }

    fn add_tapped_listener(&self, listener: NotificationListener) -> SubscriptionHandle {
        let handle = SubscriptionHandle::new();
        self.tapped_listeners
            .write()
            .insert(handle, Arc::from(listener));
        handle
    }

    fn remove_subscription(&self, handle: SubscriptionHandle) {
        let removed = self.received_listeners.write().remove(&handle).is_some()
            || self.tapped_listeners.write().remove(&handle).is_some();
        if !removed {
            debug!("Ignoring removal of unknown subscription {:?}", handle);
        }
    }

    fn set_notification_handler(&self, handler: Arc<dyn NotificationHandler>) {
        *self.handler.write() = Some(handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::entities::NotificationKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct AlwaysAlert;

    impl NotificationHandler for AlwaysAlert {
        fn handle_notification(&self, _envelope: &NotificationEnvelope) -> DeliveryDirective {
            DeliveryDirective::alert()
        }
    }

    #[tokio::test]
    async fn test_request_permission_answers_prompt_once() {
        let gateway = DummyNotificationGateway::with_permission(PermissionStatus::Undetermined, false);

        assert_eq!(
            gateway.request_permission().await.unwrap(),
            PermissionStatus::Denied
        );
        assert_eq!(
            gateway.get_permission_status().await.unwrap(),
            PermissionStatus::Denied
        );
    }

    #[tokio::test]
    async fn test_push_token_requires_permission() {
        let gateway = DummyNotificationGateway::new();
        let config = PushTokenConfig::default();

        assert!(gateway.get_push_token(&config).await.is_err());

        gateway.request_permission().await.unwrap();
        let token = gateway.get_push_token(&config).await.unwrap();
        assert!(token.starts_with("DummyPushToken["));
    }

    #[test]
    fn test_deliver_runs_handler_and_listeners() {
        let gateway = DummyNotificationGateway::new();
        gateway.set_notification_handler(Arc::new(AlwaysAlert));

        let received = Arc::new(AtomicUsize::new(0));
        let counter = received.clone();
        gateway.add_received_listener(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        let directive = gateway.deliver(NotificationEnvelope::new(NotificationKind::Match, None));

        assert_eq!(directive, DeliveryDirective::alert());
        assert_eq!(received.load(Ordering::SeqCst), 1);
        assert_eq!(gateway.displayed_count(), 1);
        assert_eq!(gateway.badge_count(), 1);
    }

    #[test]
    fn test_deliver_without_handler_stays_hidden() {
        let gateway = DummyNotificationGateway::new();

        let directive = gateway.deliver(NotificationEnvelope::new(NotificationKind::Chat, None));

        assert!(!directive.show_alert);
        assert_eq!(gateway.displayed_count(), 0);
        assert_eq!(gateway.badge_count(), 0);
    }

    #[test]
    fn test_remove_subscription_is_idempotent() {
        let gateway = DummyNotificationGateway::new();
        let handle = gateway.add_tapped_listener(Box::new(|_| {}));
        assert_eq!(gateway.live_tapped_listeners(), 1);

        gateway.remove_subscription(handle);
        gateway.remove_subscription(handle);

        assert_eq!(gateway.live_tapped_listeners(), 0);
    }
}
