use crate::utils::error::Result;
use async_trait::async_trait;

/// 將組好的 prompt 交給生成式模型並取回解讀文字
#[async_trait]
pub trait Interpreter: Send + Sync {
    async fn interpret(&self, prompt: &str) -> Result<String>;
}
