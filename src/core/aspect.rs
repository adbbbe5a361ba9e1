use crate::domain::model::MeaningField;
use crate::utils::error::{OracleError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 占卜面向：決定 prompt 中強調哪一段牌義
///
/// `emphasis` 為 `None` 的面向即「整體」面向，prompt 不會額外列出面向牌義。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectDefinition {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub emphasis: Option<MeaningField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meaning_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quick_questions: Vec<String>,
}

impl AspectDefinition {
    pub fn new(key: &str, label: &str, emphasis: Option<MeaningField>) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            emphasis,
            meaning_label: None,
            icon: None,
            quick_questions: Vec::new(),
        }
    }

    fn with_icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    fn with_quick_questions(mut self, questions: &[&str]) -> Self {
        self.quick_questions = questions.iter().map(|q| q.to_string()).collect();
        self
    }

    pub fn is_general(&self) -> bool {
        self.emphasis.is_none()
    }

    /// 面向牌義那一行的標籤
    pub fn meaning_label(&self) -> String {
        if let Some(label) = &self.meaning_label {
            return label.clone();
        }
        match self.emphasis {
            Some(MeaningField::Love) => "感情牌義".to_string(),
            Some(MeaningField::Career) => "事業牌義".to_string(),
            _ => format!("{}參考牌義", self.label),
        }
    }
}

/// 支援的占卜面向集合；驗證 aspect 就是查這張表
#[derive(Debug, Clone)]
pub struct AspectCatalog {
    aspects: Vec<AspectDefinition>,
}

impl AspectCatalog {
    pub fn new(aspects: Vec<AspectDefinition>) -> Result<Self> {
        if aspects.is_empty() {
            return Err(OracleError::ConfigValidationError {
                field: "aspects".to_string(),
                message: "至少需要一個占卜面向".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for aspect in &aspects {
            if aspect.key.trim().is_empty() || aspect.label.trim().is_empty() {
                return Err(OracleError::ConfigValidationError {
                    field: "aspects".to_string(),
                    message: format!("面向 '{}' 的 key 與 label 不可為空", aspect.key),
                });
            }
            if !seen.insert(aspect.key.as_str()) {
                return Err(OracleError::ConfigValidationError {
                    field: "aspects".to_string(),
                    message: format!("面向 key 重複：{}", aspect.key),
                });
            }
        }

        Ok(Self { aspects })
    }

    pub fn get(&self, key: &str) -> Option<&AspectDefinition> {
        self.aspects.iter().find(|a| a.key == key)
    }

    pub fn is_supported(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn aspects(&self) -> &[AspectDefinition] {
        &self.aspects
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.aspects.iter().map(|a| a.key.as_str())
    }
}

impl Default for AspectCatalog {
    fn default() -> Self {
        let aspects = vec![
            AspectDefinition::new("love", "感情", Some(MeaningField::Love))
                .with_icon("♥")
                .with_quick_questions(&[
                    "我們最近的關係為什麼卡住了？",
                    "這段關係接下來三個月會怎麼發展？",
                ]),
            AspectDefinition::new("career", "事業", Some(MeaningField::Career))
                .with_icon("◆")
                .with_quick_questions(&[
                    "我該不該在今年轉職？",
                    "目前職場衝突我該怎麼處理比較好？",
                ]),
            AspectDefinition::new("wealth", "財運", Some(MeaningField::Core))
                .with_icon("◈")
                .with_quick_questions(&[
                    "我今年的收入有機會提升嗎？",
                    "近期投資策略應該保守還是積極？",
                ]),
            AspectDefinition::new("relationships", "人際", Some(MeaningField::Core))
                .with_icon("✦")
                .with_quick_questions(&[
                    "我和這位同事的溝通為何一直不順？",
                    "我該如何修復與家人的關係？",
                ]),
            AspectDefinition::new("growth", "自我成長", Some(MeaningField::Core))
                .with_icon("☉")
                .with_quick_questions(&[
                    "我現在最需要突破的內在課題是什麼？",
                    "我該先放下什麼，才能往前走？",
                ]),
            AspectDefinition::new("general", "整體運勢", None)
                .with_icon("✧")
                .with_quick_questions(&["我近期整體的運勢如何？"]),
        ];
        Self { aspects }
    }
}
