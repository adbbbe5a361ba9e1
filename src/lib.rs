pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::gemini::GeminiClient;
pub use config::{gemini::GeminiConfig, AppConfig};
pub use core::{
    aspect::AspectCatalog, catalog::CardCatalog, draw::DrawEngine, reading::ReadingService,
};
pub use utils::error::{OracleError, Result};
