//! Request and response bodies for the reading API

use crate::core::aspect::AspectDefinition;
use crate::domain::model::DrawnCard;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawResponse {
    pub cards: Vec<DrawnCard>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AspectSummary {
    pub key: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quick_questions: Vec<String>,
}

impl From<&AspectDefinition> for AspectSummary {
    fn from(aspect: &AspectDefinition) -> Self {
        Self {
            key: aspect.key.clone(),
            label: aspect.label.clone(),
            icon: aspect.icon.clone(),
            quick_questions: aspect.quick_questions.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AspectsResponse {
    pub aspects: Vec<AspectSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingResponse {
    pub interpretation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", error)
    }
}
