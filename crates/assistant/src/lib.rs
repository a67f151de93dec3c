//! The SonjuTalk assistant core — intent routing and the quiz lifecycle.
//!
//! A user turn flows through here as:
//!
//! 1. **Classify** the raw text into an intent (quiz / guide / chat)
//! 2. **Build a prompt** (persona + truncated history + user turn)
//! 3. **Send to the model** via the configured provider
//! 4. **Quiz path only**: repair and validate the model's JSON output
//! 5. **Update history** and return user-facing text
//!
//! An active quiz short-circuits the flow: the next turn is consumed as an
//! answer by the session state machine before any classification happens.

pub mod history;
pub mod intent;
pub mod prompt;
pub mod service;
pub mod session;
pub mod validator;

pub use history::HistoryManager;
pub use intent::classify;
pub use service::{Assistant, ChatReply, QuizFailure, QuizReply};
pub use session::{grade, AnswerOutcome, QuizSession};
pub use validator::parse_quiz;
