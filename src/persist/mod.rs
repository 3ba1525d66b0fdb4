pub mod config;
pub mod entity;
pub mod session;

pub use config::GuardConfig;
pub use entity::Entity;
pub use session::Session;
