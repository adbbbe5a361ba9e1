use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArcanaType {
    Major,
    Minor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Cups,
    Wands,
    Swords,
    Pentacles,
}

/// 聖三角牌陣的時間位置，順序固定為過去、現在、未來
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "過去", alias = "past")]
    Past,
    #[serde(rename = "現在", alias = "present")]
    Present,
    #[serde(rename = "未來", alias = "future")]
    Future,
}

impl Position {
    pub const ALL: [Position; 3] = [Position::Past, Position::Present, Position::Future];

    pub fn label(self) -> &'static str {
        match self {
            Position::Past => "過去",
            Position::Present => "現在",
            Position::Future => "未來",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Upright,
    Reversed,
}

impl Orientation {
    pub fn label(self) -> &'static str {
        match self {
            Orientation::Upright => "正位",
            Orientation::Reversed => "逆位",
        }
    }
}

/// 牌義中可被占卜面向強調的欄位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeaningField {
    Core,
    Love,
    Career,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrientationMeaning {
    pub core: String,
    pub love: String,
    pub career: String,
    pub action_advice: String,
}

impl OrientationMeaning {
    pub fn field(&self, field: MeaningField) -> &str {
        match field {
            MeaningField::Core => &self.core,
            MeaningField::Love => &self.love,
            MeaningField::Career => &self.career,
        }
    }
}

/// 保留 JSON 原始順序的「項目 → 意涵」對照
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedMeanings(Vec<(String, String)>);

impl OrderedMeanings {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OrderedMeanings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl Serialize for OrderedMeanings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

impl<'de> Deserialize<'de> for OrderedMeanings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = OrderedMeanings;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of names to meanings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, String>()? {
                    entries.push((key, value));
                }
                Ok(OrderedMeanings(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub id: u32,
    pub name: String,
    #[serde(rename = "arcanaType")]
    pub arcana_type: ArcanaType,
    #[serde(default)]
    pub suit: Option<Suit>,
    #[serde(default)]
    pub rank: Option<String>,
    pub element: String,
    pub image_description: String,
    pub symbols: OrderedMeanings,
    pub colors: OrderedMeanings,
    pub upright: OrientationMeaning,
    pub reversed: OrientationMeaning,
}

impl CardDefinition {
    pub fn meaning(&self, orientation: Orientation) -> &OrientationMeaning {
        match orientation {
            Orientation::Upright => &self.upright,
            Orientation::Reversed => &self.reversed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawnCard {
    pub card_id: u32,
    pub position: Position,
    pub orientation: Orientation,
}

/// 占卜面向下特別強調的牌義，一般面向時不存在
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AspectMeaning {
    pub label: String,
    pub text: String,
}

/// 抽到的牌與牌庫資料合併後的完整描述，只在組 prompt 時使用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedCard {
    pub card_id: u32,
    pub position: Position,
    pub orientation: Orientation,
    pub name: String,
    pub element: String,
    pub image_description: String,
    pub symbols: OrderedMeanings,
    pub colors: OrderedMeanings,
    pub meaning: OrientationMeaning,
    pub aspect_meaning: Option<AspectMeaning>,
}

/// 前端送來的占卜請求，欄位皆可能缺漏，需經驗證後才能使用
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadingSubmission {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub aspect: Option<String>,
    #[serde(default)]
    pub cards: Option<Vec<DrawnCard>>,
}
