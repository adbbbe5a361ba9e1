use thiserror::Error;

/// HTTP 狀態碼中視為暫時性失敗、值得重試一次的集合
pub const RETRYABLE_STATUS: [u16; 6] = [408, 429, 500, 502, 503, 504];

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Missing GEMINI_API_KEY env var")]
    MissingApiKey,

    #[error("Gemini API error ({status}): {body}")]
    GeminiApi { status: u16, body: String },

    #[error("Gemini API timeout: request exceeded {seconds} seconds")]
    GeminiTimeout { seconds: f64 },

    #[error("Gemini API returned empty response")]
    EmptyResponse,

    #[error("Gemini API request failed: {message}")]
    Transport { message: String },

    #[error("Failed to parse Gemini response: {message}")]
    ResponseParse { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Card not found: {card_id}")]
    CardNotFound { card_id: u32 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid configuration value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

pub type Result<T> = std::result::Result<T, OracleError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Lookup,
    Provider,
    Configuration,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl OracleError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    /// 同一模型內是否值得再試一次：可重試的 HTTP 狀態或逾時
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::GeminiApi { status, .. } => RETRYABLE_STATUS.contains(status),
            Self::GeminiTimeout { .. } => true,
            _ => false,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. } => ErrorCategory::Validation,
            Self::CardNotFound { .. } => ErrorCategory::Lookup,
            Self::GeminiApi { .. }
            | Self::GeminiTimeout { .. }
            | Self::Transport { .. }
            | Self::EmptyResponse
            | Self::ResponseParse { .. } => ErrorCategory::Provider,
            Self::MissingApiKey
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ValidationError { .. } | Self::CardNotFound { .. } => ErrorSeverity::Low,
            Self::GeminiApi { .. } | Self::GeminiTimeout { .. } | Self::Transport { .. } => {
                ErrorSeverity::Medium
            }
            Self::EmptyResponse | Self::ResponseParse { .. } => ErrorSeverity::High,
            _ => ErrorSeverity::Critical,
        }
    }

    /// 供終端使用者閱讀的訊息，不揭露內部細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { message } => message.clone(),
            Self::CardNotFound { card_id } => {
                format!("找不到指定的牌（編號 {}）。", card_id)
            }
            Self::GeminiApi { .. } | Self::GeminiTimeout { .. } | Self::Transport { .. } => {
                "連結星際能量失敗，請重新翻牌。".to_string()
            }
            _ => "占卜過程發生未預期的錯誤，請稍後再試。".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::MissingApiKey => "請在環境變數或 .env 檔設定 GEMINI_API_KEY",
            Self::GeminiApi { status: 401 | 403, .. } => {
                "請確認 GEMINI_API_KEY 是否有效且具備權限"
            }
            Self::GeminiApi { .. } | Self::GeminiTimeout { .. } | Self::Transport { .. } => {
                "請稍後再試，或調整 GEMINI_MODEL / GEMINI_FALLBACK_MODEL"
            }
            Self::EmptyResponse | Self::ResponseParse { .. } => "請重新占卜一次",
            Self::ValidationError { .. } => "請修正輸入內容後再送出",
            Self::CardNotFound { .. } => "請重新抽牌",
            Self::InvalidConfigValueError { .. } | Self::ConfigValidationError { .. } => {
                "請檢查設定檔內容"
            }
            Self::IoError(_) | Self::SerializationError(_) => "請確認檔案路徑與格式",
        }
    }
}
