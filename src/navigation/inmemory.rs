use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

use super::{Navigator, Route, RouteParams};

/// Navigator that only tracks the current route
pub struct InMemoryNavigator {
    ready: AtomicBool,
    current_route: RwLock<Option<Route>>,
}

impl InMemoryNavigator {
    pub fn new() -> Self {
        Self {
            ready: AtomicBool::new(false),
            current_route: RwLock::new(None),
        }
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }
}

impl Default for InMemoryNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for InMemoryNavigator {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn navigate(&self, screen: &str, params: RouteParams) {
        info!("Navigating to {} with {:?}", screen, params);
        *self.current_route.write() = Some(Route::new(screen, Some(params)));
    }

    fn current_route(&self) -> Option<Route> {
        self.current_route.read().clone()
    }
}
