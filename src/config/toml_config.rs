use crate::core::aspect::{AspectCatalog, AspectDefinition};
use crate::utils::error::{OracleError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex is valid"));

/// 占卜面向設定檔
///
/// ```toml
/// [[aspects]]
/// key = "love"
/// label = "感情"
/// emphasis = "love"
///
/// [[aspects]]
/// key = "general"
/// label = "整體運勢"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AspectsConfig {
    pub aspects: Vec<AspectDefinition>,
}

impl AspectsConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(OracleError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| OracleError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn into_catalog(self) -> Result<AspectCatalog> {
        AspectCatalog::new(self.aspects)
    }
}

impl Validate for AspectsConfig {
    fn validate(&self) -> Result<()> {
        AspectCatalog::new(self.aspects.clone()).map(|_| ())
    }
}

/// 替換環境變數 (例如 ${AUTHOR})，找不到的變數保持原樣
fn substitute_env_vars(content: &str) -> String {
    ENV_VAR_PATTERN
        .replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
}
