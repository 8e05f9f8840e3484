use serde_json::{Value, json};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

use super::{
    entities::{NotificationEnvelope, NotificationKind, SubscriptionHandle},
    eraser::NotificationStateEraser,
    error::NotificationError,
    gateway::NotificationGateway,
    registrar::DeviceRegistrar,
};
use crate::{
    navigation::{CHAT_SCREEN, Navigator, RouteParams},
    network::ApiClient,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No listeners held, nothing registered
    Inactive,
    /// Registration attempted, received and tapped listeners held
    Active,
}

/// Binds notification listeners to the signed-in session.
///
/// Becoming authenticated registers the device once and subscribes to
/// received and tapped notifications. Signing out clears all notification
/// state and drops the subscriptions. At most one listener of each kind is
/// live at any time.
pub struct ListenerLifecycle<G, C, N>
where
    G: NotificationGateway + 'static,
    C: ApiClient + 'static,
    N: Navigator + 'static,
{
    notification_gateway: Arc<G>,
    navigator: Arc<N>,
    registrar: DeviceRegistrar<G, C>,
    eraser: NotificationStateEraser<G>,
    authenticated: Arc<AtomicBool>,
    state: LifecycleState,
    received_subscription: Option<SubscriptionHandle>,
    tapped_subscription: Option<SubscriptionHandle>,
}

impl<G, C, N> ListenerLifecycle<G, C, N>
where
    G: NotificationGateway + 'static,
    C: ApiClient + 'static,
    N: Navigator + 'static,
{
    pub fn new(
        notification_gateway: Arc<G>,
        navigator: Arc<N>,
        registrar: DeviceRegistrar<G, C>,
        eraser: NotificationStateEraser<G>,
    ) -> Self {
        Self {
            notification_gateway,
            navigator,
            registrar,
            eraser,
            authenticated: Arc::new(AtomicBool::new(false)),
            state: LifecycleState::Inactive,
            received_subscription: None,
            tapped_subscription: None,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    /// Applies a new value of the authentication signal
    #[instrument(skip(self))]
    pub async fn set_authenticated(&mut self, authenticated: bool) {
        match (self.state, authenticated) {
            (LifecycleState::Inactive, true) => self.activate().await,
            (LifecycleState::Active, true) => self.remount(),
            (LifecycleState::Active, false) => self.deactivate().await,
            (LifecycleState::Inactive, false) => {
                self.authenticated.store(false, Ordering::SeqCst);
                debug!("Already signed out, nothing to do");
            }
        }
    }

    /// Replaces the live subscriptions with fresh ones without registering
    /// again. Does nothing while inactive.
    pub fn remount(&mut self) {
        if self.state != LifecycleState::Active {
            debug!("Not active, skipping remount");
            return;
        }
        debug!("Resubscribing notification listeners");
        self.subscribe();
    }

    /// Drops all subscriptions regardless of the authentication signal.
    /// Taps are ignored until the next activation.
    #[instrument(skip(self))]
    pub fn shutdown(&mut self) {
        self.authenticated.store(false, Ordering::SeqCst);
        self.unsubscribe();
        self.state = LifecycleState::Inactive;
    }

    /// Applies every value of `auth_signal` in the order it was sent, each
    /// transition completing before the next starts. Shuts down once all
    /// senders are dropped.
    pub fn spawn(
        mut self,
        mut auth_signal: mpsc::UnboundedReceiver<bool>,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            info!("Starting notification lifecycle");
            while let Some(authenticated) = auth_signal.recv().await {
                self.set_authenticated(authenticated).await;
            }

            info!("Auth signal closed, stopping notification lifecycle");
            self.shutdown();
        })
    }

    async fn activate(&mut self) {
        self.authenticated.store(true, Ordering::SeqCst);

        let registration = self.registrar.register().await;
        if registration.token.is_none() {
            info!("Continuing without push token");
        }

        self.subscribe();
        self.state = LifecycleState::Active;
        info!("Notification listeners active");
    }

    async fn deactivate(&mut self) {
        self.authenticated.store(false, Ordering::SeqCst);
        self.eraser.clear().await;
        self.unsubscribe();
        self.state = LifecycleState::Inactive;
        info!("Notification listeners removed");
    }

    fn subscribe(&mut self) {
        self.unsubscribe();

        let received = self
            .notification_gateway
            .add_received_listener(Box::new(|envelope| {
                info!(
                    kind = ?envelope.kind,
                    chat_id = ?envelope.chat_id,
                    "Notification received"
                );
            }));

        let authenticated = self.authenticated.clone();
        let navigator = self.navigator.clone();
        let tapped = self
            .notification_gateway
            .add_tapped_listener(Box::new(move |envelope| {
                handle_tap(&authenticated, navigator.as_ref(), &envelope);
            }));

        self.received_subscription = Some(received);
        self.tapped_subscription = Some(tapped);
    }

    fn unsubscribe(&mut self) {
        if let Some(handle) = self.received_subscription.take() {
            self.notification_gateway.remove_subscription(handle);
        }
        if let Some(handle) = self.tapped_subscription.take() {
            self.notification_gateway.remove_subscription(handle);
        }
    }
}

/// Navigation parameters for the chat a tapped notification leads to, if any
pub fn tap_destination(envelope: &NotificationEnvelope) -> Option<RouteParams> {
    let mut params = RouteParams::new();
    match (envelope.kind, &envelope.chat_id) {
        (NotificationKind::Match, chat_id) => {
            let chat_id = chat_id.as_ref().map_or(Value::Null, |id| json!(id));
            params.insert("chatId".to_string(), chat_id);
            params.insert("isNewMatch".to_string(), Value::Bool(true));
        }
        (NotificationKind::Chat, Some(chat_id)) => {
            params.insert("chatId".to_string(), json!(chat_id));
        }
        (NotificationKind::Chat, None) => return None,
    }
    Some(params)
}

fn handle_tap<N: Navigator + ?Sized>(
    authenticated: &AtomicBool,
    navigator: &N,
    envelope: &NotificationEnvelope,
) {
    if !authenticated.load(Ordering::SeqCst) {
        debug!("Ignoring notification tap while signed out");
        return;
    }

    let Some(params) = tap_destination(envelope) else {
        debug!("Tapped notification has no destination");
        return;
    };

    if !navigator.is_ready() {
        debug!("Dropping notification tap: {}", NotificationError::NavigationNotReady);
        return;
    }

    navigator.navigate(CHAT_SCREEN, params);
}
