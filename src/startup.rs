use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::{
    app_state::{AppStateSource, SharedAppState},
    navigation::{InMemoryNavigator, Navigator},
    network::{ApiClient, HttpApiClient},
    notifications::{
        eraser::NotificationStateEraser, gateway::NotificationGateway,
        gateway::dummy::DummyNotificationGateway, lifecycle::ListenerLifecycle,
        policy::DeliveryPolicy, registrar::DeviceRegistrar,
    },
    session::InMemorySessionStore,
    settings::Settings,
};

pub type ClientLifecycle = ListenerLifecycle<
    DummyNotificationGateway,
    HttpApiClient<InMemorySessionStore>,
    InMemoryNavigator,
>;

/// Collaborators the host keeps driving after startup
pub struct ClientContext {
    pub notification_gateway: Arc<DummyNotificationGateway>,
    pub navigator: Arc<InMemoryNavigator>,
    pub app_state: Arc<SharedAppState>,
    pub session_store: Arc<InMemorySessionStore>,
    pub lifecycle: ClientLifecycle,
}

/// Installs the delivery policy as the one presentation handler and wires up
/// the listener lifecycle. Call once during bootstrap.
pub fn start_notifications<G, C, N, A>(
    settings: &Settings,
    notification_gateway: Arc<G>,
    api_client: Arc<C>,
    navigator: Arc<N>,
    app_state: Arc<A>,
) -> ListenerLifecycle<G, C, N>
where
    G: NotificationGateway + 'static,
    C: ApiClient + 'static,
    N: Navigator + 'static,
    A: AppStateSource + 'static,
{
    let policy = DeliveryPolicy::new(app_state, navigator.clone());
    notification_gateway.set_notification_handler(Arc::new(policy));
    info!("Notification handler installed");

    let registrar = DeviceRegistrar::new(
        notification_gateway.clone(),
        api_client,
        settings.registrar_config(),
    );
    let eraser = NotificationStateEraser::new(notification_gateway.clone());

    ListenerLifecycle::new(notification_gateway, navigator, registrar, eraser)
}

/// Creates the in-process client stack used by the development console
pub fn start_application(settings: &Settings) -> Result<ClientContext> {
    let session_store = Arc::new(InMemorySessionStore::new());
    let api_client = Arc::new(HttpApiClient::new(
        &settings.backend.base_url,
        session_store.clone(),
    )?);

    let notification_gateway = Arc::new(DummyNotificationGateway::new());
    let navigator = Arc::new(InMemoryNavigator::new());
    let app_state = Arc::new(SharedAppState::default());

    let lifecycle = start_notifications(
        settings,
        notification_gateway.clone(),
        api_client,
        navigator.clone(),
        app_state.clone(),
    );

    Ok(ClientContext {
        notification_gateway,
        navigator,
        app_state,
        session_store,
        lifecycle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::Platform;
    use crate::navigation::{Route, RouteParams};
    use crate::notifications::entities::{
        DeliveryDirective, ForegroundState, NotificationEnvelope, NotificationKind,
    };
    use crate::settings::{BackendSettings, PushSettings};
    use serde_json::json;

    fn settings() -> Settings {
        Settings {
            platform: Some(Platform::Ios),
            backend: BackendSettings {
                base_url: "http://127.0.0.1:9".to_string(),
                push_token_path: "/users/push-token".to_string(),
            },
            push: PushSettings::default(),
            android_channel: Default::default(),
        }
    }

    #[test]
    fn test_start_application_installs_handler() {
        let context = start_application(&settings()).unwrap();

        assert!(context.notification_gateway.has_handler());
    }

    #[test]
    fn test_installed_handler_follows_live_context() {
        let context = start_application(&settings()).unwrap();
        let gateway = &context.notification_gateway;
        let envelope = NotificationEnvelope::new(NotificationKind::Chat, Some("c1".to_string()));

        assert_eq!(gateway.deliver(envelope.clone()), DeliveryDirective::alert());

        let mut params = RouteParams::new();
        params.insert("chatId".to_string(), json!("c1"));
        context.navigator.navigate("Chat", params.clone());
        context.app_state.set_foreground_state(ForegroundState::Active);

        assert_eq!(
            context.navigator.current_route(),
            Some(Route::new("Chat", Some(params)))
        );
        assert_eq!(gateway.deliver(envelope), DeliveryDirective::badge_only());
        assert_eq!(gateway.badge_count(), 2);
    }
}
