pub mod entities;
pub mod eraser;
pub mod error;
pub mod gateway;
pub mod lifecycle;
pub mod permission;
pub mod policy;
pub mod registrar;

pub use error::NotificationError;
