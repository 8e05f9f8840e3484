use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::navigation::RouteParams;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Match,
    #[default]
    #[serde(other)]
    Chat,
}

/// Data attached to an incoming push notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEnvelope {
    #[serde(rename = "type", default, deserialize_with = "lenient_kind")]
    pub kind: NotificationKind,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_chat_id"
    )]
    pub chat_id: Option<String>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

/// Anything but a known kind string counts as chat
fn lenient_kind<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NotificationKind, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Backends send chat ids as strings or numbers; other shapes are dropped
fn lenient_chat_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let chat_id = match Value::deserialize(deserializer)? {
        Value::String(id) => Some(id),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    };
    Ok(chat_id)
}

impl NotificationEnvelope {
    pub fn new(kind: NotificationKind, chat_id: Option<String>) -> Self {
        Self {
            kind,
            chat_id,
            payload: Map::new(),
        }
    }

    /// Parses the data object of a notification as delivered by the OS layer
    pub fn from_data(data: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(data)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForegroundState {
    Active,
    #[default]
    Background,
    Inactive,
}

/// Snapshot of what the user is looking at when a notification arrives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppContext {
    pub foreground_state: ForegroundState,
    pub current_screen_name: Option<String>,
    pub current_screen_params: Option<RouteParams>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDirective {
    pub show_alert: bool,
    pub play_sound: bool,
    pub set_badge: bool,
}

impl DeliveryDirective {
    pub fn alert() -> Self {
        Self {
            show_alert: true,
            play_sound: true,
            set_badge: true,
        }
    }

    pub fn badge_only() -> Self {
        Self {
            show_alert: false,
            play_sound: false,
            set_badge: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationResult {
    pub token: Option<String>,
}

impl RegistrationResult {
    pub fn skipped() -> Self {
        Self { token: None }
    }

    pub fn registered(token: String) -> Self {
        Self { token: Some(token) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelImportance {
    Min,
    Low,
    Default,
    High,
    #[default]
    Max,
}

/// Android notification channel the app posts into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub importance: ChannelImportance,
    #[serde(default = "default_vibration_pattern")]
    pub vibration_pattern: Vec<u64>,
    #[serde(default = "default_light_color")]
    pub light_color: Option<String>,
}

fn default_vibration_pattern() -> Vec<u64> {
    vec![0, 250, 250, 250]
}

fn default_light_color() -> Option<String> {
    Some("#FF231F7C".to_string())
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            id: "default".to_string(),
            name: "default".to_string(),
            importance: ChannelImportance::Max,
            vibration_pattern: default_vibration_pattern(),
            light_color: default_light_color(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushTokenConfig {
    pub project_id: Option<String>,
}

/// Handle to a live listener registration on the notification gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(Uuid);

impl SubscriptionHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionHandle {
    fn default() -> Self {
        Self::new()
    }
}
