use crate::core::aspect::AspectDefinition;
use crate::core::catalog::CardCatalog;
use crate::domain::model::{AspectMeaning, DrawnCard, EnrichedCard};
use crate::utils::error::{OracleError, Result};
use std::sync::Arc;

/// 把抽到的牌與牌庫資料合併成完整描述
#[derive(Debug, Clone)]
pub struct CardEnricher {
    catalog: Arc<CardCatalog>,
}

impl CardEnricher {
    pub fn new(catalog: Arc<CardCatalog>) -> Self {
        Self { catalog }
    }

    pub fn enrich(&self, drawn: &DrawnCard, aspect: &AspectDefinition) -> Result<EnrichedCard> {
        let card = self
            .catalog
            .get(drawn.card_id)
            .ok_or(OracleError::CardNotFound {
                card_id: drawn.card_id,
            })?;
        let meaning = card.meaning(drawn.orientation);

        let aspect_meaning = aspect.emphasis.map(|field| AspectMeaning {
            label: aspect.meaning_label(),
            text: meaning.field(field).to_string(),
        });

        Ok(EnrichedCard {
            card_id: card.id,
            position: drawn.position,
            orientation: drawn.orientation,
            name: card.name.clone(),
            element: card.element.clone(),
            image_description: card.image_description.clone(),
            symbols: card.symbols.clone(),
            colors: card.colors.clone(),
            meaning: meaning.clone(),
            aspect_meaning,
        })
    }

    pub fn enrich_all(
        &self,
        drawn: &[DrawnCard],
        aspect: &AspectDefinition,
    ) -> Result<Vec<EnrichedCard>> {
        drawn.iter().map(|card| self.enrich(card, aspect)).collect()
    }
}
