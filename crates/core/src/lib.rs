//! # SonjuTalk Core
//!
//! Domain types, traits, and error definitions for the SonjuTalk assistant
//! runtime. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The model completion capability is a trait here; the HTTP implementation
//! lives in `sonjutalk-providers`. This enables:
//! - Swapping backends via configuration
//! - Easy testing with scripted mock providers
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod intent;
pub mod message;
pub mod provider;
pub mod quiz;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result, ValidationError};
pub use intent::{GuideTarget, Intent};
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use quiz::{Grading, LearningData, QuizItem};
