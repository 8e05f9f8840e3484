use thiserror::Error;

use crate::network::ApiError;

use super::gateway::NotificationGatewayError;

/// Failures of the notification lifecycle. None of these reach the user,
/// they end up in the log.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Notification permission denied")]
    PermissionDenied,

    #[error("Failed to acquire push token: {0}")]
    TokenAcquisitionFailure(String),

    #[error("Failed to sync push token with backend: {0}")]
    BackendSyncFailure(String),

    #[error("Failed to erase notification state: {0}")]
    EraseFailure(String),

    #[error("Navigation is not ready")]
    NavigationNotReady,
}

impl From<ApiError> for NotificationError {
    fn from(err: ApiError) -> Self {
        NotificationError::BackendSyncFailure(err.to_string())
    }
}

impl NotificationError {
    pub fn token_acquisition(err: NotificationGatewayError) -> Self {
        NotificationError::TokenAcquisitionFailure(err.to_string())
    }

    pub fn erase(err: NotificationGatewayError) -> Self {
        NotificationError::EraseFailure(err.to_string())
    }
}
