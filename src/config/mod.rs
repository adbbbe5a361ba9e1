#[cfg(feature = "cli")]
pub mod cli;
pub mod gemini;
pub mod toml_config;

use crate::core::aspect::AspectCatalog;
use crate::core::catalog::CardCatalog;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use gemini::GeminiConfig;
use std::path::PathBuf;
use toml_config::AspectsConfig;

/// 服務啟動時所需的全部設定
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    /// 自訂占卜面向的 TOML 檔，未設定時使用內建面向
    pub aspects_file: Option<PathBuf>,
    /// 自訂牌庫 JSON 檔，未設定時使用內建大阿爾克那
    pub catalog_file: Option<PathBuf>,
}

impl AppConfig {
    /// Gemini 設定取自環境變數，資料檔路徑取自命令列（亦可由環境變數提供）
    #[cfg(feature = "cli")]
    pub fn from_cli(cli: &cli::CliConfig) -> Result<Self> {
        Ok(Self {
            gemini: GeminiConfig::from_env()?,
            aspects_file: cli.aspects.clone(),
            catalog_file: cli.catalog.clone(),
        })
    }

    pub fn load_catalog(&self) -> Result<CardCatalog> {
        match &self.catalog_file {
            Some(path) => {
                tracing::info!("🃏 Loading card catalog from {}", path.display());
                CardCatalog::from_file(path)
            }
            None => CardCatalog::builtin(),
        }
    }

    pub fn load_aspects(&self) -> Result<AspectCatalog> {
        match &self.aspects_file {
            Some(path) => {
                tracing::info!("🔮 Loading aspects from {}", path.display());
                AspectsConfig::from_file(path)?.into_catalog()
            }
            None => Ok(AspectCatalog::default()),
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.gemini.validate()
    }
}
