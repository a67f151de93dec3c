//! HTTP API v1 — the assistant's REST surface.
//!
//! Endpoints:
//!
//! - `POST /v1/chat`          — one chat turn with optional history
//! - `POST /v1/quiz/generate` — generate a validated quiz
//! - `POST /v1/quiz/check`    — grade an answer against a quiz payload
//! - `POST /v1/analysis`      — summarize learning statistics
//!
//! Provider and validation failures never surface as 5xx: they come back
//! as `success: false` envelopes with the stable user-facing message,
//! while the logs keep the failure detail (and the token cost of a call
//! that already happened).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::post;
use axum::Router;
use serde::{Deserialize, Serialize};
use tracing::info;

use sonjutalk_assistant::service::{CHAT_RETRY_MESSAGE, DEFAULT_DIFFICULTY, QUIZ_RETRY_MESSAGE};
use sonjutalk_assistant::grade;
use sonjutalk_core::message::Message;
use sonjutalk_core::quiz::{LearningData, QuizItem};

use crate::SharedState;

/// Build the v1 API router. Nest this under "/v1" in the main router.
pub fn v1_router(state: SharedState) -> Router {
    Router::new()
        .route("/chat", post(chat_handler))
        .route("/quiz/generate", post(quiz_generate_handler))
        .route("/quiz/check", post(quiz_check_handler))
        .route("/analysis", post(analysis_handler))
        .with_state(state)
}

fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn default_difficulty() -> String {
    DEFAULT_DIFFICULTY.into()
}

// ── Request / Response types ──────────────────────────────────────────────

#[derive(Deserialize)]
struct ChatRequest {
    /// The user's message.
    message: String,
    /// Caller-supplied user id, logged for traceability.
    user_id: String,
    /// Prior turns, oldest first.
    #[serde(default)]
    conversation_history: Option<Vec<Message>>,
}

#[derive(Serialize)]
struct ChatResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tokens_used: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    timestamp: String,
}

#[derive(Deserialize)]
struct QuizGenerateRequest {
    topic: String,
    #[serde(default = "default_difficulty")]
    difficulty: String,
    user_id: String,
}

#[derive(Serialize)]
struct QuizGenerateResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    quiz: Option<QuizItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tokens_used: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    timestamp: String,
}

#[derive(Deserialize)]
struct QuizCheckRequest {
    /// The quiz payload returned by `/v1/quiz/generate`.
    quiz_data: QuizItem,
    /// The user's answer, 1-4.
    user_answer: u8,
    user_id: String,
}

#[derive(Serialize)]
struct QuizCheckResponse {
    correct: bool,
    message: String,
    explanation: String,
    correct_answer: u8,
}

#[derive(Deserialize)]
struct AnalysisRequest {
    user_id: String,
    learning_data: LearningData,
}

#[derive(Serialize)]
struct AnalysisResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tokens_used: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    timestamp: String,
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Json<ChatResponse> {
    info!(user_id = %payload.user_id, "Chat request");

    let history = payload.conversation_history.unwrap_or_default();
    match state.assistant.chat(&payload.message, &history).await {
        Ok(reply) => Json(ChatResponse {
            success: true,
            message: Some(reply.message),
            tokens_used: reply.tokens_used,
            error: None,
            timestamp: timestamp(),
        }),
        Err(e) => {
            tracing::error!(user_id = %payload.user_id, error = %e, "Chat failed");
            Json(ChatResponse {
                success: false,
                message: None,
                tokens_used: None,
                error: Some(CHAT_RETRY_MESSAGE.into()),
                timestamp: timestamp(),
            })
        }
    }
}

async fn quiz_generate_handler(
    State(state): State<SharedState>,
    Json(payload): Json<QuizGenerateRequest>,
) -> Json<QuizGenerateResponse> {
    info!(user_id = %payload.user_id, topic = %payload.topic, "Quiz generate request");

    match state
        .assistant
        .generate_quiz(&payload.topic, &payload.difficulty)
        .await
    {
        Ok(reply) => Json(QuizGenerateResponse {
            success: true,
            quiz: Some(reply.quiz),
            tokens_used: reply.tokens_used,
            error: None,
            timestamp: timestamp(),
        }),
        Err(failure) => {
            tracing::error!(
                user_id = %payload.user_id,
                error = %failure.error,
                tokens = ?failure.tokens_used,
                "Quiz generation failed"
            );
            Json(QuizGenerateResponse {
                success: false,
                quiz: None,
                tokens_used: failure.tokens_used,
                error: Some(QUIZ_RETRY_MESSAGE.into()),
                timestamp: timestamp(),
            })
        }
    }
}

async fn quiz_check_handler(
    State(_state): State<SharedState>,
    Json(payload): Json<QuizCheckRequest>,
) -> Result<Json<QuizCheckResponse>, StatusCode> {
    if !(1..=4).contains(&payload.user_answer) {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }

    info!(user_id = %payload.user_id, answer = payload.user_answer, "Quiz check request");

    let grading = grade(&payload.quiz_data, payload.user_answer);
    Ok(Json(QuizCheckResponse {
        correct: grading.correct,
        message: grading.message,
        explanation: grading.explanation,
        correct_answer: grading.correct_answer,
    }))
}

async fn analysis_handler(
    State(state): State<SharedState>,
    Json(payload): Json<AnalysisRequest>,
) -> Json<AnalysisResponse> {
    info!(user_id = %payload.user_id, lesson = %payload.learning_data.lesson, "Analysis request");

    match state.assistant.analyze(&payload.learning_data).await {
        Ok(reply) => Json(AnalysisResponse {
            success: true,
            summary_text: Some(reply.message),
            tokens_used: reply.tokens_used,
            error: None,
            timestamp: timestamp(),
        }),
        Err(e) => {
            tracing::error!(user_id = %payload.user_id, error = %e, "Analysis failed");
            Json(AnalysisResponse {
                success: false,
                summary_text: None,
                tokens_used: None,
                error: Some(CHAT_RETRY_MESSAGE.into()),
                timestamp: timestamp(),
            })
        }
    }
}
