use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    entities::{ChannelConfig, PushTokenConfig, RegistrationResult},
    error::NotificationError,
    gateway::NotificationGateway,
    permission::PermissionGate,
};
use crate::{app_state::Platform, network::ApiClient};

pub const DEFAULT_PUSH_TOKEN_PATH: &str = "/users/push-token";

#[derive(Debug, Clone)]
pub struct RegistrarConfig {
    pub platform: Platform,
    pub channel: ChannelConfig,
    pub push_token: PushTokenConfig,
    pub push_token_path: String,
}

impl Default for RegistrarConfig {
    fn default() -> Self {
        Self {
            platform: Platform::current(),
            channel: ChannelConfig::default(),
            push_token: PushTokenConfig::default(),
            push_token_path: DEFAULT_PUSH_TOKEN_PATH.to_string(),
        }
    }
}

/// Obtains this device's push token and hands it to the backend
pub struct DeviceRegistrar<G: NotificationGateway, C: ApiClient> {
    notification_gateway: Arc<G>,
    api_client: Arc<C>,
    permission_gate: PermissionGate<G>,
    config: RegistrarConfig,
}

impl<G: NotificationGateway, C: ApiClient> DeviceRegistrar<G, C> {
    pub fn new(notification_gateway: Arc<G>, api_client: Arc<C>, config: RegistrarConfig) -> Self {
        Self {
            permission_gate: PermissionGate::new(notification_gateway.clone()),
            notification_gateway,
            api_client,
            config,
        }
    }

    /// Registers the device for push notifications.
    ///
    /// Never fails: a missing permission or token yields an empty result,
    /// and a backend sync failure still returns the token.
    #[instrument(skip(self))]
    pub async fn register(&self) -> RegistrationResult {
        if self.config.platform == Platform::Android {
            self.ensure_channel().await;
        }

        let token = match self.acquire_token().await {
            Ok(token) => token,
            Err(NotificationError::PermissionDenied) => {
                info!("Notification permission denied, skipping push registration");
                return RegistrationResult::skipped();
            }
            Err(e) => {
                warn!("{}", e);
                return RegistrationResult::skipped();
            }
        };

        if let Err(e) = self.sync_token(&token).await {
            warn!("{}", e);
        } else {
            info!("Push token registered with backend");
        }

        RegistrationResult::registered(token)
    }

    async fn ensure_channel(&self) {
        if let Err(e) = self
            .notification_gateway
            .set_channel(&self.config.channel)
            .await
        {
            warn!(
                "Failed to set up notification channel '{}': {}",
                self.config.channel.id, e
            );
        }
    }

    async fn acquire_token(&self) -> Result<String, NotificationError> {
        if !self.permission_gate.ensure_permission().await {
            return Err(NotificationError::PermissionDenied);
        }

        self.notification_gateway
            .get_push_token(&self.config.push_token)
            .await
            .map_err(NotificationError::token_acquisition)
    }

    async fn sync_token(&self, token: &str) -> Result<(), NotificationError> {
        let body = json!({
            "pushToken": token,
            "platform": self.config.platform.as_str(),
        });
        self.api_client
            .post(&self.config.push_token_path, body)
            .await?;
        Ok(())
    }
}
