pub mod app_state;
pub mod navigation;
pub mod network;
pub mod notifications;
pub mod session;
pub mod settings;
pub mod startup;
