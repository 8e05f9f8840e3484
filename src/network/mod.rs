pub mod client;
mod error;

pub use client::{ApiClient, HttpApiClient};
pub use error::ApiError;

#[cfg(test)]
pub use client::MockApiClient;
