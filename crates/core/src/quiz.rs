//! Quiz and learning-analysis domain types.

use serde::{Deserialize, Serialize};

/// A validated, structurally complete quiz question.
///
/// Created only by the response validator in `sonjutalk-assistant`;
/// never mutated after creation. Invariants (checked at construction):
/// exactly 4 options, `correct_answer` in 1..=4.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizItem {
    /// The question text.
    pub question: String,

    /// Exactly four answer options, each labeled "1. ..." through "4. ...".
    pub options: Vec<String>,

    /// 1-based index of the correct option.
    pub correct_answer: u8,

    /// Explanation shown after grading.
    pub explanation: String,

    /// Praise shown on a correct answer.
    pub encouragement: String,
}

/// The result of grading a quiz answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grading {
    /// Whether the answer matched `correct_answer`.
    pub correct: bool,

    /// Feedback text: the item's encouragement when correct,
    /// a "정답은 N번이에요" message when not.
    pub message: String,

    /// The item's explanation, shown either way.
    pub explanation: String,

    /// The correct 1-based option index.
    pub correct_answer: u8,
}

/// Learning statistics summarized by the analysis operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningData {
    /// Lesson name, e.g. "토스_송금".
    pub lesson: String,

    /// Average seconds per step.
    pub avg_time: f64,

    /// Accuracy in [0.0, 1.0].
    pub accuracy: f64,

    /// Tags of steps the user repeatedly got wrong.
    #[serde(default)]
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> QuizItem {
        QuizItem {
            question: "토스 앱에서 송금 버튼은 어디에 있나요?".into(),
            options: vec![
                "1. 화면 아래".into(),
                "2. 화면 위".into(),
                "3. 설정 메뉴".into(),
                "4. 알림창".into(),
            ],
            correct_answer: 1,
            explanation: "송금 버튼은 홈 화면 아래에 있어요.".into(),
            encouragement: "정답이에요! 정말 잘하셨어요!".into(),
        }
    }

    #[test]
    fn quiz_item_roundtrip() {
        let item = sample_item();
        let json = serde_json::to_string(&item).unwrap();
        let parsed: QuizItem = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, item);
    }

    #[test]
    fn learning_data_errors_default_empty() {
        let data: LearningData =
            serde_json::from_str(r#"{"lesson":"토스_송금","avg_time":15.5,"accuracy":0.8}"#)
                .unwrap();
        assert!(data.errors.is_empty());
    }
}
