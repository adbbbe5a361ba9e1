use crate::utils::error::{OracleError, Result};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

pub const QUESTION_MIN_CHARS: usize = 5;
pub const QUESTION_MAX_CHARS: usize = 100;

static MEANINGFUL_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]").expect("static regex is valid"));

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(OracleError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(OracleError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(OracleError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(OracleError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_duration_range(
    field_name: &str,
    value: Duration,
    min: Duration,
    max: Duration,
) -> Result<()> {
    if value < min || value > max {
        return Err(OracleError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: format!("{:?}", value),
            reason: format!("Value must be between {:?} and {:?}", min, max),
        });
    }
    Ok(())
}

/// 驗證占卜問題：去除前後空白後 5–100 字，且至少包含一個文字或數字
///
/// 字數以 Unicode 字元計算，中文一字算一個字。
pub fn validate_question(question: &str) -> Result<()> {
    let trimmed = question.trim();
    let length = trimmed.chars().count();

    if length < QUESTION_MIN_CHARS {
        return Err(OracleError::validation(format!(
            "問題至少需要 {} 個字。",
            QUESTION_MIN_CHARS
        )));
    }
    if length > QUESTION_MAX_CHARS {
        return Err(OracleError::validation(format!(
            "問題最多 {} 個字。",
            QUESTION_MAX_CHARS
        )));
    }
    if !MEANINGFUL_TEXT.is_match(trimmed) {
        return Err(OracleError::validation("請輸入具體問題，避免僅使用符號。"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_of(result: Result<()>) -> String {
        match result {
            Err(OracleError::ValidationError { message }) => message,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("GEMINI_API_URL", "https://example.com").is_ok());
        assert!(validate_url("GEMINI_API_URL", "http://example.com").is_ok());
        assert!(validate_url("GEMINI_API_URL", "").is_err());
        assert!(validate_url("GEMINI_API_URL", "invalid-url").is_err());
        assert!(validate_url("GEMINI_API_URL", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_question_length_bounds() {
        assert_eq!(message_of(validate_question("  短問題 ")), "問題至少需要 5 個字。");
        assert!(validate_question("我的運勢如何？").is_ok());
        assert!(validate_question(&"問".repeat(100)).is_ok());
        assert_eq!(
            message_of(validate_question(&"問".repeat(101))),
            "問題最多 100 個字。"
        );
    }

    #[test]
    fn test_validate_question_rejects_symbol_only() {
        assert_eq!(
            message_of(validate_question("？？？！！！")),
            "請輸入具體問題，避免僅使用符號。"
        );
        assert!(validate_question("12345").is_ok());
        assert!(validate_question("will I get the job?").is_ok());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("GEMINI_MODEL", "gemini-2.5-flash").is_ok());
        assert!(matches!(
            validate_non_empty_string("GEMINI_MODEL", "   "),
            Err(OracleError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_validate_duration_range() {
        let min = Duration::from_millis(1);
        let max = Duration::from_secs(120);
        assert!(validate_duration_range("timeout", Duration::from_secs(9), min, max).is_ok());
        assert!(validate_duration_range("timeout", Duration::ZERO, min, max).is_err());
    }
}
