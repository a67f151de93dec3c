//! The quiz session state machine.
//!
//! Two states: idle, or holding one quiz awaiting its answer. Grading
//! always returns the session to idle; unusable answers re-prompt and
//! leave the state untouched.

use sonjutalk_core::quiz::{Grading, QuizItem};

/// Fallback praise when a quiz arrives with an empty encouragement field.
const DEFAULT_ENCOURAGEMENT: &str = "정답입니다! 잘하셨어요!";

/// Per-conversation quiz state. Exactly one instance per session.
#[derive(Debug, Default)]
pub struct QuizSession {
    current: Option<QuizItem>,
}

/// What happened to a submitted answer.
#[derive(Debug)]
pub enum AnswerOutcome {
    /// A valid 1-4 answer was graded; the session is idle again.
    Graded(Grading),

    /// Digits were given but outside 1-4; still awaiting an answer.
    OutOfRange,

    /// No digits in the input at all; still awaiting an answer.
    NotNumeric,

    /// There is no quiz to answer.
    NoActiveQuiz,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a quiz is currently awaiting its answer.
    pub fn is_awaiting_answer(&self) -> bool {
        self.current.is_some()
    }

    /// The quiz awaiting an answer, if any.
    pub fn current(&self) -> Option<&QuizItem> {
        self.current.as_ref()
    }

    /// Store a freshly generated quiz (idle → awaiting answer).
    pub fn begin(&mut self, item: QuizItem) {
        self.current = Some(item);
    }

    /// Submit raw user input as a quiz answer.
    ///
    /// All non-digit characters are stripped first, so "3번이요!" grades
    /// as 3. Grading transitions back to idle unconditionally; re-prompt
    /// outcomes leave the quiz in place.
    pub fn submit_answer(&mut self, raw: &str) -> AnswerOutcome {
        let Some(item) = self.current.as_ref() else {
            return AnswerOutcome::NoActiveQuiz;
        };

        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return AnswerOutcome::NotNumeric;
        }

        let answer = match digits.parse::<u8>() {
            Ok(n @ 1..=4) => n,
            _ => return AnswerOutcome::OutOfRange,
        };

        let grading = grade(item, answer);
        self.current = None;
        AnswerOutcome::Graded(grading)
    }
}

/// Grade an answer against a quiz item.
///
/// Shared by the session state machine and the stateless HTTP quiz-check
/// endpoint.
pub fn grade(item: &QuizItem, answer: u8) -> Grading {
    if answer == item.correct_answer {
        let message = if item.encouragement.is_empty() {
            DEFAULT_ENCOURAGEMENT.to_string()
        } else {
            item.encouragement.clone()
        };
        Grading {
            correct: true,
            message,
            explanation: item.explanation.clone(),
            correct_answer: item.correct_answer,
        }
    } else {
        Grading {
            correct: false,
            message: format!(
                "아쉬워요! 정답은 {}번이에요. 다시 한번 도전해보세요!",
                item.correct_answer
            ),
            explanation: item.explanation.clone(),
            correct_answer: item.correct_answer,
        }
    }
}
