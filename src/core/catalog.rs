use crate::domain::model::CardDefinition;
use crate::utils::error::{OracleError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// 每次占卜抽出的張數，牌庫至少要有這麼多張
pub const SPREAD_SIZE: usize = 3;

const BUILTIN_DECK: &str = include_str!("../../data/major_arcana.json");

#[derive(Debug, Deserialize)]
struct DeckFile {
    #[serde(default)]
    major_arcana: Vec<CardDefinition>,
    #[serde(default)]
    minor_wands: Vec<CardDefinition>,
    #[serde(default)]
    minor_cups: Vec<CardDefinition>,
    #[serde(default)]
    minor_swords: Vec<CardDefinition>,
    #[serde(default)]
    minor_pentacles: Vec<CardDefinition>,
}

/// 唯讀牌庫：啟動時載入一次，之後只提供查詢
#[derive(Debug, Clone)]
pub struct CardCatalog {
    cards: Vec<CardDefinition>,
    index: HashMap<u32, usize>,
}

impl CardCatalog {
    /// 內建的大阿爾克那牌庫
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_DECK)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_json_str(&content)
    }

    /// 解析牌庫 JSON，可同時包含大阿爾克那與四個小阿爾克那花色
    pub fn from_json_str(content: &str) -> Result<Self> {
        let deck: DeckFile = serde_json::from_str(content)?;
        let cards: Vec<CardDefinition> = deck
            .major_arcana
            .into_iter()
            .chain(deck.minor_wands)
            .chain(deck.minor_cups)
            .chain(deck.minor_swords)
            .chain(deck.minor_pentacles)
            .collect();
        Self::new(cards)
    }

    pub fn new(cards: Vec<CardDefinition>) -> Result<Self> {
        if cards.len() < SPREAD_SIZE {
            return Err(OracleError::ConfigValidationError {
                field: "catalog".to_string(),
                message: format!(
                    "牌庫至少需要 {} 張牌，目前只有 {} 張",
                    SPREAD_SIZE,
                    cards.len()
                ),
            });
        }

        let mut index = HashMap::with_capacity(cards.len());
        for (position, card) in cards.iter().enumerate() {
            if index.insert(card.id, position).is_some() {
                return Err(OracleError::ConfigValidationError {
                    field: "catalog".to_string(),
                    message: format!("牌的編號重複：{}", card.id),
                });
            }
        }

        tracing::debug!("🃏 Card catalog loaded with {} cards", cards.len());
        Ok(Self { cards, index })
    }

    pub fn get(&self, id: u32) -> Option<&CardDefinition> {
        self.index.get(&id).map(|&i| &self.cards[i])
    }

    pub fn cards(&self) -> &[CardDefinition] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
