use crate::core::catalog::{CardCatalog, SPREAD_SIZE};
use crate::domain::model::{DrawnCard, Orientation, Position};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

/// 抽牌引擎：從牌庫不放回地抽出三張，依序放入過去、現在、未來
#[derive(Debug, Clone)]
pub struct DrawEngine {
    catalog: Arc<CardCatalog>,
}

impl DrawEngine {
    pub fn new(catalog: Arc<CardCatalog>) -> Self {
        Self { catalog }
    }

    /// 以注入的亂數來源抽牌，傳入固定種子的 RNG 即可重現結果
    pub fn draw<R: Rng>(&self, rng: &mut R) -> [DrawnCard; SPREAD_SIZE] {
        let cards = self.catalog.cards();
        let mut indices: Vec<usize> = (0..cards.len()).collect();
        // Fisher-Yates
        indices.shuffle(rng);

        Position::ALL.map(|position| {
            let card = &cards[indices[position as usize]];
            let orientation = if rng.random_bool(0.5) {
                Orientation::Upright
            } else {
                Orientation::Reversed
            };
            DrawnCard {
                card_id: card.id,
                position,
                orientation,
            }
        })
    }
}
