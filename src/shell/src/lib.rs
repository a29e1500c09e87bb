pub mod config;
pub mod http_client;
pub mod input;
pub mod render;
pub mod runtime;

pub use crate::{config::AppConfig, runtime::Shell};
