use crate::core::aspect::AspectDefinition;
use crate::domain::model::{EnrichedCard, Position};

const PREAMBLE: &str = "你是一位專業的塔羅占卜師，擁有豐富的牌義解讀經驗。
請根據以下聖三角牌陣（過去—現在—未來）的抽牌結果，為用戶提供深入且具有洞察力的解讀。";

const INSTRUCTIONS: &str = "--- 解讀要求 ---

請嚴格依照以下標題與順序輸出：
### 全局概述
### 分項解析（過去）
### 分項解析（現在）
### 分項解析（未來）
### 行動建議

規則：
- 每一段都要呼應用戶問題中的關鍵詞。
- 「行動建議」請提供 2-3 條、可立即執行、具體可操作的建議。
- 不可省略任何段落標題。

語氣要求：溫暖而專業，既有神秘感又具備實用性。避免過於籠統的泛泛之談，請結合牌面細節給出有針對性的解讀。
請使用繁體中文回答。";

/// 依抽牌結果、問題與占卜面向組出完整的解讀指令
///
/// 純函式：相同輸入必定得到逐位元相同的輸出。牌依過去、現在、未來排序輸出。
pub fn build_reading_prompt(
    cards: &[EnrichedCard],
    question: &str,
    aspect: &AspectDefinition,
) -> String {
    let mut ordered: Vec<&EnrichedCard> = cards.iter().collect();
    ordered.sort_by_key(|card| card.position);

    let cards_section = ordered
        .iter()
        .map(|card| format_card(card))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "{PREAMBLE}\n\n用戶的問題：「{question}」\n占卜面向：{label}\n\n--- 抽牌結果 ---\n\n{cards_section}\n\n{INSTRUCTIONS}",
        label = aspect.label,
    )
}

fn format_card(card: &EnrichedCard) -> String {
    let listing = |entries: Vec<(&str, &str)>| {
        entries
            .into_iter()
            .map(|(name, meaning)| format!("    {}：{}", name, meaning))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let mut lines = vec![
        format!(
            "【{}】{}（{}）",
            card.position.label(),
            card.name,
            card.orientation.label()
        ),
        format!("  元素：{}", card.element),
        format!("  牌面描述：{}", card.image_description),
        "  象徵符號：".to_string(),
    ];
    if !card.symbols.is_empty() {
        lines.push(listing(card.symbols.iter().collect()));
    }
    lines.push("  色彩意涵：".to_string());
    if !card.colors.is_empty() {
        lines.push(listing(card.colors.iter().collect()));
    }
    lines.push(format!("  核心牌義：{}", card.meaning.core));
    if let Some(aspect_meaning) = &card.aspect_meaning {
        lines.push(format!("  {}：{}", aspect_meaning.label, aspect_meaning.text));
    }
    lines.push(format!("  行動建議：{}", card.meaning.action_advice));

    lines.join("\n")
}

/// 解讀結果中必須出現的段落標題
pub fn required_sections() -> Vec<String> {
    let mut sections = vec!["### 全局概述".to_string()];
    sections.extend(
        Position::ALL
            .iter()
            .map(|p| format!("### 分項解析（{}）", p.label())),
    );
    sections.push("### 行動建議".to_string());
    sections
}

/// 模型回覆中缺少的段落標題，依標題順序列出
pub fn missing_sections(reply: &str) -> Vec<String> {
    required_sections()
        .into_iter()
        .filter(|section| !reply.contains(section.as_str()))
        .collect()
}
