use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::notifications::entities::ForegroundState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
}

impl Platform {
    /// Platform this binary was compiled for. Anything that is not iOS is
    /// treated as Android.
    pub fn current() -> Self {
        if cfg!(target_os = "ios") {
            Platform::Ios
        } else {
            Platform::Android
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
        }
    }
}

/// Reports whether the app is currently in the foreground
#[cfg_attr(test, mockall::automock)]
pub trait AppStateSource: Send + Sync {
    fn foreground_state(&self) -> ForegroundState;
}

/// Foreground state pushed in by the host whenever it changes
#[derive(Default)]
pub struct SharedAppState {
    foreground_state: RwLock<ForegroundState>,
}

impl SharedAppState {
    pub fn new(foreground_state: ForegroundState) -> Self {
        Self {
            foreground_state: RwLock::new(foreground_state),
        }
    }

    pub fn set_foreground_state(&self, foreground_state: ForegroundState) {
        *self.foreground_state.write() = foreground_state;
    }
}

impl AppStateSource for SharedAppState {
    fn foreground_state(&self) -> ForegroundState {
        *self.foreground_state.read()
    }
}
