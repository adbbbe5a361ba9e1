use crate::core::aspect::{AspectCatalog, AspectDefinition};
use crate::core::catalog::{CardCatalog, SPREAD_SIZE};
use crate::core::draw::DrawEngine;
use crate::core::enrich::CardEnricher;
use crate::core::prompt::{build_reading_prompt, missing_sections};
use crate::domain::model::{DrawnCard, Position, ReadingSubmission};
use crate::domain::ports::Interpreter;
use crate::utils::error::{OracleError, Result};
use crate::utils::validation::validate_question;
use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;

pub const MISSING_FIELDS_MESSAGE: &str = "Missing or invalid fields: question, aspect, cards (3)";
pub const UNSUPPORTED_ASPECT_MESSAGE: &str = "不支援的占卜分類。";
pub const SPREAD_POSITIONS_MESSAGE: &str = "牌陣必須包含過去、現在、未來各一張牌。";
pub const DUPLICATE_CARDS_MESSAGE: &str = "抽出的牌不可重複。";
pub const ORACLE_UNAVAILABLE_MESSAGE: &str = "連結星際能量失敗，請重新翻牌。";
pub const INTERNAL_FAILURE_MESSAGE: &str = "占卜過程發生未預期的錯誤，請稍後再試。";

/// 通過驗證的占卜請求，牌已依過去、現在、未來排序
#[derive(Debug, Clone)]
pub struct Reading {
    pub question: String,
    pub aspect: AspectDefinition,
    pub cards: [DrawnCard; SPREAD_SIZE],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    BadRequest,
    ServiceUnavailable,
    Internal,
}

/// 回給使用者的失敗結果；內部細節只寫進日誌
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingFailure {
    pub class: FailureClass,
    pub code: &'static str,
    pub message: String,
}

impl From<&OracleError> for ReadingFailure {
    fn from(err: &OracleError) -> Self {
        match err {
            OracleError::ValidationError { message } => Self {
                class: FailureClass::BadRequest,
                code: "BAD_REQUEST",
                message: message.clone(),
            },
            OracleError::CardNotFound { .. } => Self {
                class: FailureClass::BadRequest,
                code: "CARD_NOT_FOUND",
                message: err.user_friendly_message(),
            },
            OracleError::GeminiApi { .. }
            | OracleError::GeminiTimeout { .. }
            | OracleError::Transport { .. } => Self {
                class: FailureClass::ServiceUnavailable,
                code: "ORACLE_UNAVAILABLE",
                message: ORACLE_UNAVAILABLE_MESSAGE.to_string(),
            },
            _ => Self {
                class: FailureClass::Internal,
                code: "INTERNAL_ERROR",
                message: INTERNAL_FAILURE_MESSAGE.to_string(),
            },
        }
    }
}

/// 占卜流程的協調者：驗證 → 補全牌義 → 組 prompt → 取得解讀
pub struct ReadingService {
    catalog: Arc<CardCatalog>,
    aspects: Arc<AspectCatalog>,
    draw_engine: DrawEngine,
    enricher: CardEnricher,
    interpreter: Arc<dyn Interpreter>,
}

impl ReadingService {
    pub fn new(
        catalog: Arc<CardCatalog>,
        aspects: Arc<AspectCatalog>,
        interpreter: Arc<dyn Interpreter>,
    ) -> Self {
        Self {
            aspects,
            draw_engine: DrawEngine::new(catalog.clone()),
            enricher: CardEnricher::new(catalog.clone()),
            catalog,
            interpreter,
        }
    }

    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    pub fn aspects(&self) -> &AspectCatalog {
        &self.aspects
    }

    pub fn draw(&self) -> [DrawnCard; SPREAD_SIZE] {
        self.draw_engine.draw(&mut rand::rng())
    }

    pub fn draw_with<R: Rng>(&self, rng: &mut R) -> [DrawnCard; SPREAD_SIZE] {
        self.draw_engine.draw(rng)
    }

    pub fn validate(&self, submission: ReadingSubmission) -> Result<Reading> {
        let question = submission.question.filter(|q| !q.is_empty());
        let aspect_key = submission.aspect.filter(|a| !a.is_empty());
        let (question, aspect_key, cards) = match (question, aspect_key, submission.cards) {
            (Some(q), Some(a), Some(c)) if c.len() == SPREAD_SIZE => (q, a, c),
            _ => return Err(OracleError::validation(MISSING_FIELDS_MESSAGE)),
        };

        let aspect = self
            .aspects
            .get(&aspect_key)
            .cloned()
            .ok_or_else(|| OracleError::validation(UNSUPPORTED_ASPECT_MESSAGE))?;

        validate_question(&question)?;

        let cards = canonical_spread(cards)?;

        Ok(Reading {
            question,
            aspect,
            cards,
        })
    }

    pub fn build_prompt(&self, reading: &Reading) -> Result<String> {
        let enriched = self.enricher.enrich_all(&reading.cards, &reading.aspect)?;
        Ok(build_reading_prompt(&enriched, &reading.question, &reading.aspect))
    }

    /// 完整的占卜流程，失敗時回傳的錯誤可用 [`ReadingFailure::from`] 分類
    pub async fn perform(&self, submission: ReadingSubmission) -> Result<String> {
        let reading = self.validate(submission)?;
        tracing::info!(
            "🔮 Reading requested: aspect={}, cards={:?}",
            reading.aspect.key,
            reading.cards.iter().map(|c| c.card_id).collect::<Vec<_>>()
        );

        let prompt = self.build_prompt(&reading)?;
        tracing::debug!("📝 Prompt built ({} chars)", prompt.chars().count());

        let interpretation = self.interpreter.interpret(&prompt).await?;
        tracing::info!("✨ Interpretation received ({} chars)", interpretation.chars().count());

        let missing = missing_sections(&interpretation);
        if !missing.is_empty() {
            tracing::warn!("⚠️ Interpretation is missing sections: {}", missing.join(", "));
        }
        Ok(interpretation)
    }
}

/// 確認三張牌恰好各佔過去、現在、未來一個位置且互不重複，並依位置排序
fn canonical_spread(mut cards: Vec<DrawnCard>) -> Result<[DrawnCard; SPREAD_SIZE]> {
    cards.sort_by_key(|c| c.position);
    let positions: Vec<Position> = cards.iter().map(|c| c.position).collect();
    if positions != Position::ALL {
        return Err(OracleError::validation(SPREAD_POSITIONS_MESSAGE));
    }

    let ids: HashSet<u32> = cards.iter().map(|c| c.card_id).collect();
    if ids.len() != SPREAD_SIZE {
        return Err(OracleError::validation(DUPLICATE_CARDS_MESSAGE));
    }

    cards
        .try_into()
        .map_err(|_| OracleError::validation(MISSING_FIELDS_MESSAGE))
}
