use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::{
    entities::{AppContext, DeliveryDirective, ForegroundState, NotificationEnvelope, NotificationKind},
    gateway::NotificationHandler,
};
use crate::{
    app_state::AppStateSource,
    navigation::{CHAT_SCREEN, Navigator},
};

/// Decides how a notification is presented given what the user is looking at.
///
/// Matches always alert. Chat messages only stay quiet while the user has the
/// very conversation open in the foreground. The badge is updated in every
/// case since it reflects the unread total.
pub fn decide(envelope: &NotificationEnvelope, context: &AppContext) -> DeliveryDirective {
    if envelope.kind == NotificationKind::Match {
        return DeliveryDirective::alert();
    }

    if is_on_relevant_screen(envelope, context) {
        DeliveryDirective::badge_only()
    } else {
        DeliveryDirective::alert()
    }
}

fn is_on_relevant_screen(envelope: &NotificationEnvelope, context: &AppContext) -> bool {
    let open_chat_id = context
        .current_screen_params
        .as_ref()
        .and_then(|params| params.get("chatId"))
        .and_then(Value::as_str);

    context.foreground_state == ForegroundState::Active
        && context.current_screen_name.as_deref() == Some(CHAT_SCREEN)
        && open_chat_id == envelope.chat_id.as_deref()
}

/// Presentation handler installed on the notification gateway. Samples the
/// live app context for every notification and applies [`decide`].
pub struct DeliveryPolicy<A: AppStateSource, N: Navigator> {
    app_state: Arc<A>,
    navigator: Arc<N>,
}

impl<A: AppStateSource, N: Navigator> DeliveryPolicy<A, N> {
    pub fn new(app_state: Arc<A>, navigator: Arc<N>) -> Self {
        Self {
            app_state,
            navigator,
        }
    }

    pub fn current_context(&self) -> AppContext {
        let route = self.navigator.current_route();

        AppContext {
            foreground_state: self.app_state.foreground_state(),
            current_screen_name: route.as_ref().map(|route| route.name.clone()),
            current_screen_params: route.and_then(|route| route.params),
        }
    }
}

impl<A: AppStateSource, N: Navigator> NotificationHandler for DeliveryPolicy<A, N> {
    fn handle_notification(&self, envelope: &NotificationEnvelope) -> DeliveryDirective {
        let context = self.current_context();
        let directive = decide(envelope, &context);
        debug!(
            kind = ?envelope.kind,
            chat_id = ?envelope.chat_id,
            foreground = ?context.foreground_state,
            screen = ?context.current_screen_name,
            "Presenting notification as {:?}",
            directive
        );
        directive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::MockAppStateSource;
    use crate::navigation::{MockNavigator, Route, RouteParams};
    use serde_json::json;

    fn chat_params(chat_id: &str) -> RouteParams {
        let mut params = RouteParams::new();
        params.insert("chatId".to_string(), json!(chat_id));
        params
    }

    fn context(state: ForegroundState, screen: Option<&str>, chat_id: Option<&str>) -> AppContext {
        AppContext {
            foreground_state: state,
            current_screen_name: screen.map(str::to_string),
            current_screen_params: chat_id.map(chat_params),
        }
    }

    fn chat(chat_id: &str) -> NotificationEnvelope {
        NotificationEnvelope::new(NotificationKind::Chat, Some(chat_id.to_string()))
    }

    #[test]
    fn test_match_always_alerts() {
        let envelope = NotificationEnvelope::new(NotificationKind::Match, Some("m1".to_string()));
        let contexts = [
            context(ForegroundState::Active, Some("Chat"), Some("m1")),
            context(ForegroundState::Background, None, None),
            context(ForegroundState::Inactive, Some("Profile"), None),
            AppContext::default(),
        ];

        for context in contexts {
            assert_eq!(decide(&envelope, &context), DeliveryDirective::alert());
        }
    }

    #[test]
    fn test_chat_suppressed_on_open_conversation() {
        let directive = decide(
            &chat("c1"),
            &context(ForegroundState::Active, Some("Chat"), Some("c1")),
        );

        assert_eq!(
            directive,
            DeliveryDirective {
                show_alert: false,
                play_sound: false,
                set_badge: true,
            }
        );
    }

    #[test]
    fn test_chat_alerts_in_background() {
        let directive = decide(
            &chat("c1"),
            &context(ForegroundState::Background, Some("Chat"), Some("c1")),
        );

        assert_eq!(directive, DeliveryDirective::alert());
    }

    #[test]
    fn test_chat_alerts_while_inactive() {
        let directive = decide(
            &chat("c1"),
            &context(ForegroundState::Inactive, Some("Chat"), Some("c1")),
        );

        assert_eq!(directive, DeliveryDirective::alert());
    }

    #[test]
    fn test_chat_alerts_for_other_conversation() {
        let directive = decide(
            &chat("c1"),
            &context(ForegroundState::Active, Some("Chat"), Some("c2")),
        );

        assert_eq!(directive, DeliveryDirective::alert());
    }

    #[test]
    fn test_chat_alerts_on_other_screen() {
        let directive = decide(
            &chat("c1"),
            &context(ForegroundState::Active, Some("Matches"), Some("c1")),
        );

        assert_eq!(directive, DeliveryDirective::alert());
    }

    #[test]
    fn test_untyped_notification_treated_as_chat() {
        let envelope = NotificationEnvelope::from_data(json!({"chatId": "c1"})).unwrap();

        let directive = decide(
            &envelope,
            &context(ForegroundState::Active, Some("Chat"), Some("c1")),
        );

        assert_eq!(directive, DeliveryDirective::badge_only());
    }

    #[test]
    fn test_handler_samples_live_context() {
        let mut mock_app_state = MockAppStateSource::new();
        mock_app_state
            .expect_foreground_state()
            .times(1)
            .returning(|| ForegroundState::Active);

        let mut mock_navigator = MockNavigator::new();
        mock_navigator
            .expect_current_route()
            .times(1)
            .returning(|| Some(Route::new("Chat", Some(chat_params("c1")))));

        let policy = DeliveryPolicy::new(Arc::new(mock_app_state), Arc::new(mock_navigator));

        assert_eq!(
            policy.handle_notification(&chat("c1")),
            DeliveryDirective::badge_only()
        );
    }

    #[test]
    fn test_handler_without_route_alerts() {
        let mut mock_app_state = MockAppStateSource::new();
        mock_app_state
            .expect_foreground_state()
            .returning(|| ForegroundState::Active);

        let mut mock_navigator = MockNavigator::new();
        mock_navigator.expect_current_route().returning(|| None);

        let policy = DeliveryPolicy::new(Arc::new(mock_app_state), Arc::new(mock_navigator));

        assert_eq!(
            policy.handle_notification(&chat("c1")),
            DeliveryDirective::alert()
        );
    }
}
