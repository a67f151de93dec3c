//! Rule-based intent classification.
//!
//! Case-sensitive substring matching against fixed keyword tables,
//! evaluated in strict priority order: quiz before guide, guide features
//! before guide apps, first match wins. The precedence lives in the table
//! order, not in control flow — reorder the tables to change it.

use sonjutalk_core::intent::{GuideTarget, Intent};

/// Any of these makes the turn a quiz request.
pub const QUIZ_KEYWORDS: &[&str] = &["퀴즈", "문제", "테스트", "시험", "내줘", "내주"];

/// Quiz topics, scanned in order; the first one found in the input wins.
/// The first entry doubles as the fallback when none match.
pub const QUIZ_TOPICS: &[&str] = &["토스", "카카오톡", "전화", "문자", "사진"];

/// Any of these makes the turn a guide request (unless it was a quiz).
pub const GUIDE_KEYWORDS: &[&str] = &[
    "알려줘",
    "알려주세요",
    "알려주",
    "가르쳐",
    "방법",
    "어떻게",
    "어케",
    "가이드",
];

/// Ordered guide rules: specific features strictly before app-level
/// guides, so "토스 송금 알려줘" resolves to the 송금 guide rather than
/// the 토스 app guide.
const GUIDE_RULES: &[(&[&str], GuideTarget)] = &[
    (&["송금", "돈 보내", "보내는"], GuideTarget::Feature("송금")),
    (&["계좌"], GuideTarget::Feature("계좌")),
    (&["전화"], GuideTarget::Feature("전화")),
    (&["문자"], GuideTarget::Feature("문자")),
    (&["사진"], GuideTarget::Feature("사진")),
    (&["토스"], GuideTarget::App("토스")),
    (&["카카오톡", "카톡"], GuideTarget::App("카카오톡")),
];

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Classify a single user utterance. Pure; always returns a valid intent.
pub fn classify(text: &str) -> Intent {
    if contains_any(text, QUIZ_KEYWORDS) {
        let topic = QUIZ_TOPICS
            .iter()
            .find(|topic| text.contains(**topic))
            .unwrap_or(&QUIZ_TOPICS[0]);
        return Intent::Quiz {
            topic: (*topic).to_string(),
        };
    }

    if contains_any(text, GUIDE_KEYWORDS) {
        for (keywords, target) in GUIDE_RULES {
            if contains_any(text, keywords) {
                return Intent::Guide { target: *target };
            }
        }
    }

    Intent::Chat
}
