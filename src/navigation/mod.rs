mod inmemory;

pub use inmemory::InMemoryNavigator;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type RouteParams = Map<String, Value>;

pub const CHAT_SCREEN: &str = "Chat";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub name: String,
    pub params: Option<RouteParams>,
}

impl Route {
    pub fn new(name: impl Into<String>, params: Option<RouteParams>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }
}

/// The app's navigation container
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Whether the navigation tree is mounted and can take `navigate` calls
    fn is_ready(&self) -> bool;

    fn navigate(&self, screen: &str, params: RouteParams);

    fn current_route(&self) -> Option<Route>;
}
