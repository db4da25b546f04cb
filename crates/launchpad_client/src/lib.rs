pub mod auth_api;
pub mod config;
mod http;
pub mod idea_api;

pub use auth_api::HttpAuthApi;
pub use config::{ClientConfig, ClientConfigError};
pub use idea_api::HttpIdeaApi;
