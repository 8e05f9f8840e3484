use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session store operation failed")]
    OperationFailed,
}

/// Persistent storage of the signed-in user's auth token
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn auth_token(&self) -> Result<Option<String>, SessionError>;
    async fn store_auth_token(&self, token: String) -> Result<(), SessionError>;
    async fn clear(&self) -> Result<(), SessionError>;
}

pub struct InMemorySessionStore {
    auth_token: Mutex<Option<String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        InMemorySessionStore {
            auth_token: Mutex::new(None),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn auth_token(&self) -> Result<Option<String>, SessionError> {
        let token_lock = self
            .auth_token
            .lock()
            .map_err(|_| SessionError::OperationFailed)?;

        Ok(token_lock.clone())
    }

    async fn store_auth_token(&self, token: String) -> Result<(), SessionError> {
        let mut token_lock = self
            .auth_token
            .lock()
            .map_err(|_| SessionError::OperationFailed)?;

        *token_lock = Some(token);
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        let mut token_lock = self
            .auth_token
            .lock()
            .map_err(|_| SessionError::OperationFailed)?;

        token_lock.take();
        Ok(())
    }
}
