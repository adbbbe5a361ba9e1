use crate::utils::error::{OracleError, Result};
use crate::utils::validation::{
    validate_duration_range, validate_non_empty_string, validate_url, Validate,
};
use std::fmt;
use std::time::Duration;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_PRIMARY_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_FALLBACK_MODEL: &str = "gemini-2.5-flash-lite";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(9);
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(350);

/// Gemini 連線設定，全部來自環境變數
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    /// 設定後直接使用此完整 URL，忽略模型名稱
    pub api_url: Option<String>,
    pub base_url: String,
    pub primary_model: String,
    pub fallback_model: String,
    /// 單次請求的等待上限，不跨重試累計
    pub timeout: Duration,
    pub retry_backoff: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: None,
            base_url: GEMINI_BASE_URL.to_string(),
            primary_model: DEFAULT_PRIMARY_MODEL.to_string(),
            fallback_model: DEFAULT_FALLBACK_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("api_url", &self.api_url)
            .field("base_url", &self.base_url)
            .field("primary_model", &self.primary_model)
            .field("fallback_model", &self.fallback_model)
            .field("timeout", &self.timeout)
            .field("retry_backoff", &self.retry_backoff)
            .finish()
    }
}

impl GeminiConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 以任意查詢函式讀取設定，測試時不必動到行程環境變數
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let timeout = match non_empty("GEMINI_TIMEOUT_SECONDS") {
            Some(raw) => {
                let seconds: f64 = raw.trim().parse().map_err(|_| {
                    OracleError::InvalidConfigValueError {
                        field: "GEMINI_TIMEOUT_SECONDS".to_string(),
                        value: raw.clone(),
                        reason: "must be a number of seconds".to_string(),
                    }
                })?;
                Duration::try_from_secs_f64(seconds).map_err(|_| {
                    OracleError::InvalidConfigValueError {
                        field: "GEMINI_TIMEOUT_SECONDS".to_string(),
                        value: raw.clone(),
                        reason: "must be a positive number of seconds".to_string(),
                    }
                })?
            }
            None => defaults.timeout,
        };

        Ok(Self {
            api_key: non_empty("GEMINI_API_KEY"),
            api_url: non_empty("GEMINI_API_URL"),
            base_url: non_empty("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            primary_model: non_empty("GEMINI_MODEL").unwrap_or(defaults.primary_model),
            fallback_model: non_empty("GEMINI_FALLBACK_MODEL").unwrap_or(defaults.fallback_model),
            timeout,
            retry_backoff: defaults.retry_backoff,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// 某模型實際要呼叫的端點（不含金鑰）
    pub fn endpoint_for(&self, model: &str) -> String {
        match &self.api_url {
            Some(url) => url.clone(),
            None => format!(
                "{}/{}:generateContent",
                self.base_url.trim_end_matches('/'),
                model
            ),
        }
    }

    /// 備援模型是否會打到與主要模型不同的端點
    pub fn has_distinct_fallback(&self) -> bool {
        self.endpoint_for(&self.fallback_model) != self.endpoint_for(&self.primary_model)
    }
}

impl Validate for GeminiConfig {
    fn validate(&self) -> Result<()> {
        if let Some(url) = &self.api_url {
            validate_url("GEMINI_API_URL", url)?;
        }
        validate_url("GEMINI_BASE_URL", &self.base_url)?;
        validate_non_empty_string("GEMINI_MODEL", &self.primary_model)?;
        validate_non_empty_string("GEMINI_FALLBACK_MODEL", &self.fallback_model)?;
        validate_duration_range(
            "GEMINI_TIMEOUT_SECONDS",
            self.timeout,
            Duration::from_millis(1),
            Duration::from_secs(600),
        )?;
        Ok(())
    }
}
