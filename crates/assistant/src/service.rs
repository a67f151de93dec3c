//! The assistant service — orchestrates intent routing, model calls,
//! validation, and history updates for one conversation turn.

use std::sync::Arc;

use sonjutalk_config::AppConfig;
use sonjutalk_core::error::Error;
use sonjutalk_core::intent::{GuideTarget, Intent};
use sonjutalk_core::message::Message;
use sonjutalk_core::provider::{Provider, ProviderRequest};
use sonjutalk_core::quiz::{LearningData, QuizItem};
use tracing::{error, info};

use crate::history::HistoryManager;
use crate::session::{AnswerOutcome, QuizSession};
use crate::{intent, prompt, validator};

/// Token cap for quiz generation (the payload is small and structured).
const QUIZ_MAX_TOKENS: u32 = 500;

/// Token cap for learning-analysis summaries (3-4 sentences).
const ANALYSIS_MAX_TOKENS: u32 = 200;

/// Default quiz difficulty when the caller does not specify one.
pub const DEFAULT_DIFFICULTY: &str = "쉬움";

/// Stable user-facing message for any quiz generation failure.
pub const QUIZ_RETRY_MESSAGE: &str = "퀴즈를 만드는 중 문제가 발생했어요. 다시 시도해주세요.";

/// Stable user-facing message for any chat/guide/analysis failure.
pub const CHAT_RETRY_MESSAGE: &str = "지금은 답변을 드리기 어려워요. 다시 시도해주세요.";

/// Re-prompt when the quiz answer has digits outside 1-4.
pub const CHOOSE_RANGE_MESSAGE: &str = "1, 2, 3, 4 중 하나를 선택해주세요!";

/// Re-prompt when the quiz answer has no digits at all.
pub const NUMERIC_ANSWER_MESSAGE: &str =
    "숫자로 답변해주세요. 1, 2, 3, 4 중 하나를 선택해주세요!";

/// Closing line under a freshly presented quiz.
const PICK_ONE_PROMPT: &str = "1~4 중 하나를 선택해주세요!";

/// A successful chat-style completion.
#[derive(Debug)]
pub struct ChatReply {
    pub message: String,
    pub tokens_used: Option<u32>,
}

/// A successfully generated and validated quiz.
#[derive(Debug)]
pub struct QuizReply {
    pub quiz: QuizItem,
    pub tokens_used: Option<u32>,
}

/// A failed quiz generation.
///
/// Carries the token cost even though the quiz is unusable — the model
/// call already happened and must be accounted for.
#[derive(Debug)]
pub struct QuizFailure {
    pub error: Error,
    pub tokens_used: Option<u32>,
}

/// The assistant service. Holds the injected provider and the per-call
/// model parameters; all conversation state (history, quiz session)
/// stays with the caller.
pub struct Assistant {
    provider: Arc<dyn Provider>,
    model: String,
    max_tokens: u32,
    temperature_chat: f32,
    temperature_quiz: f32,
    prompt_exchanges: usize,
}

impl Assistant {
    pub fn new(provider: Arc<dyn Provider>, config: &AppConfig) -> Self {
        Self {
            provider,
            model: config.default_model.clone(),
            max_tokens: config.max_tokens,
            temperature_chat: config.temperature_chat,
            temperature_quiz: config.temperature_quiz,
            prompt_exchanges: config.history.prompt_exchanges,
        }
    }

    async fn complete(
        &self,
        messages: Vec<Message>,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<(String, Option<u32>), Error> {
        let response = self
            .provider
            .complete(ProviderRequest {
                model: self.model.clone(),
                messages,
                temperature,
                max_tokens: Some(max_tokens),
            })
            .await?;

        let tokens = response.usage.map(|u| u.total_tokens);
        Ok((response.message.content, tokens))
    }

    /// Plain conversation with persona and truncated history.
    pub async fn chat(&self, text: &str, history: &[Message]) -> Result<ChatReply, Error> {
        let messages = prompt::chat_messages(history, text, self.prompt_exchanges);
        let (message, tokens_used) = self
            .complete(messages, self.max_tokens, self.temperature_chat)
            .await?;

        info!(tokens = ?tokens_used, "Chat successful");
        Ok(ChatReply {
            message,
            tokens_used,
        })
    }

    /// A how-to guide: the mapped instruction goes down the chat path.
    pub async fn guide(
        &self,
        target: &GuideTarget,
        history: &[Message],
    ) -> Result<ChatReply, Error> {
        self.chat(&prompt::guide_request(target), history).await
    }

    /// Generate and validate a quiz.
    ///
    /// On failure the token cost of the completed model call (when it got
    /// that far) rides along in the [`QuizFailure`].
    pub async fn generate_quiz(
        &self,
        topic: &str,
        difficulty: &str,
    ) -> Result<QuizReply, QuizFailure> {
        let messages = prompt::quiz_messages(topic, difficulty);
        let (raw, tokens_used) = match self
            .complete(messages, QUIZ_MAX_TOKENS, self.temperature_quiz)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, topic, "Quiz generation call failed");
                return Err(QuizFailure {
                    error: e,
                    tokens_used: None,
                });
            }
        };

        match validator::parse_quiz(&raw) {
            Ok(quiz) => {
                info!(topic, tokens = ?tokens_used, "Quiz generated");
                Ok(QuizReply { quiz, tokens_used })
            }
            Err(e) => {
                error!(error = %e, tokens = ?tokens_used, "Quiz validation failed");
                Err(QuizFailure {
                    error: e.into(),
                    tokens_used,
                })
            }
        }
    }

    /// Summarize learning statistics in 3-4 encouraging sentences.
    pub async fn analyze(&self, data: &LearningData) -> Result<ChatReply, Error> {
        let messages = prompt::analysis_messages(data);
        let (message, tokens_used) = self
            .complete(messages, ANALYSIS_MAX_TOKENS, self.temperature_chat)
            .await?;

        info!(lesson = %data.lesson, tokens = ?tokens_used, "Analysis generated");
        Ok(ChatReply {
            message,
            tokens_used,
        })
    }

    /// Process one console turn: answer-in-flight check, intent routing,
    /// dispatch, history update. Always returns user-facing text; no
    /// failure in here ends the session.
    pub async fn respond(
        &self,
        input: &str,
        session: &mut QuizSession,
        history: &mut HistoryManager,
    ) -> String {
        if session.is_awaiting_answer() {
            match session.submit_answer(input) {
                AnswerOutcome::Graded(grading) => {
                    return if grading.explanation.is_empty() {
                        grading.message
                    } else {
                        format!("{}\n{}", grading.message, grading.explanation)
                    };
                }
                AnswerOutcome::OutOfRange => return CHOOSE_RANGE_MESSAGE.into(),
                AnswerOutcome::NotNumeric => return NUMERIC_ANSWER_MESSAGE.into(),
                AnswerOutcome::NoActiveQuiz => {}
            }
        }

        match intent::classify(input) {
            Intent::Quiz { topic } => match self.generate_quiz(&topic, DEFAULT_DIFFICULTY).await {
                Ok(reply) => {
                    let mut text = format!("{}\n\n", reply.quiz.question);
                    for option in &reply.quiz.options {
                        text.push_str("   ");
                        text.push_str(option);
                        text.push('\n');
                    }
                    text.push('\n');
                    text.push_str(PICK_ONE_PROMPT);
                    session.begin(reply.quiz);
                    text
                }
                Err(_) => QUIZ_RETRY_MESSAGE.into(),
            },
            Intent::Guide { target } => match self.guide(&target, history.snapshot()).await {
                Ok(reply) => {
                    history.append(Message::user(input), Message::assistant(&reply.message));
                    reply.message
                }
                Err(_) => CHAT_RETRY_MESSAGE.into(),
            },
            Intent::Chat => match self.chat(input, history.snapshot()).await {
                Ok(reply) => {
                    history.append(Message::user(input), Message::assistant(&reply.message));
                    reply.message
                }
                Err(_) => CHAT_RETRY_MESSAGE.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sonjutalk_core::error::ProviderError;
    use sonjutalk_core::provider::{ProviderResponse, Usage};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    const QUIZ_JSON: &str = r#"{
        "question": "토스 앱에서 송금 버튼은 어디에 있나요?",
        "options": ["1. 화면 아래", "2. 화면 위", "3. 설정 메뉴", "4. 알림창"],
        "correct_answer": 3,
        "explanation": "설정 메뉴가 아니라... 사실 설정 메뉴예요.",
        "encouragement": "정답이에요! 대단하세요!"
    }"#;

    /// Replays a scripted sequence of provider results.
    struct ScriptedProvider {
        replies: Mutex<VecDeque<Result<ProviderResponse, ProviderError>>>,
        requests: Mutex<Vec<ProviderRequest>>,
    }

    impl ScriptedProvider {
        fn new(replies: Vec<Result<ProviderResponse, ProviderError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn reply(content: &str, tokens: u32) -> Result<ProviderResponse, ProviderError> {
            Ok(ProviderResponse {
                message: Message::assistant(content),
                usage: Some(Usage {
                    prompt_tokens: tokens / 2,
                    completion_tokens: tokens - tokens / 2,
                    total_tokens: tokens,
                }),
                model: "scripted".into(),
            })
        }
    }

    #[async_trait]
    impl Provider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            self.requests.lock().unwrap().push(request);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::NotConfigured("script exhausted".into())))
        }
    }

    fn assistant_with(provider: Arc<ScriptedProvider>) -> Assistant {
        Assistant::new(provider, &AppConfig::default())
    }

    #[tokio::test]
    async fn quiz_turn_end_to_end() {
        let provider = ScriptedProvider::new(vec![ScriptedProvider::reply(QUIZ_JSON, 150)]);
        let assistant = assistant_with(provider.clone());
        let mut session = QuizSession::new();
        let mut history = HistoryManager::new(10);

        let reply = assistant
            .respond("토스 퀴즈 내줘", &mut session, &mut history)
            .await;
        assert!(reply.contains("송금 버튼"));
        assert!(reply.contains("1. 화면 아래"));
        assert!(session.is_awaiting_answer());
        // Quiz turns are not part of the chat history.
        assert!(history.is_empty());

        // The generation request embedded the detected topic.
        let requests = provider.requests.lock().unwrap();
        assert!(requests[0].messages[0].content.contains("토스"));
        drop(requests);

        let graded = assistant.respond("2", &mut session, &mut history).await;
        assert!(graded.contains("정답은 3번"));
        assert!(!session.is_awaiting_answer());
    }

    #[tokio::test]
    async fn correct_answer_gets_encouragement() {
        let provider = ScriptedProvider::new(vec![ScriptedProvider::reply(QUIZ_JSON, 150)]);
        let assistant = assistant_with(provider);
        let mut session = QuizSession::new();
        let mut history = HistoryManager::new(10);

        assistant
            .respond("퀴즈 내줘", &mut session, &mut history)
            .await;
        let graded = assistant.respond("3번!", &mut session, &mut history).await;
        assert!(graded.contains("정답이에요! 대단하세요!"));
        assert!(!session.is_awaiting_answer());
    }

    #[tokio::test]
    async fn invalid_answers_reprompt_without_losing_quiz() {
        let provider = ScriptedProvider::new(vec![ScriptedProvider::reply(QUIZ_JSON, 150)]);
        let assistant = assistant_with(provider);
        let mut session = QuizSession::new();
        let mut history = HistoryManager::new(10);

        assistant
            .respond("퀴즈 내줘", &mut session, &mut history)
            .await;

        let out_of_range = assistant.respond("7", &mut session, &mut history).await;
        assert_eq!(out_of_range, CHOOSE_RANGE_MESSAGE);
        assert!(session.is_awaiting_answer());

        let not_numeric = assistant.respond("몰라요", &mut session, &mut history).await;
        assert_eq!(not_numeric, NUMERIC_ANSWER_MESSAGE);
        assert!(session.is_awaiting_answer());
    }

    #[tokio::test]
    async fn quiz_failure_reports_retry_and_stays_idle() {
        let provider = ScriptedProvider::new(vec![Err(ProviderError::Network(
            "connection refused".into(),
        ))]);
        let assistant = assistant_with(provider);
        let mut session = QuizSession::new();
        let mut history = HistoryManager::new(10);

        let reply = assistant
            .respond("퀴즈 내줘", &mut session, &mut history)
            .await;
        assert_eq!(reply, QUIZ_RETRY_MESSAGE);
        assert!(!session.is_awaiting_answer());
    }

    #[tokio::test]
    async fn quiz_validation_failure_keeps_token_cost() {
        let provider =
            ScriptedProvider::new(vec![ScriptedProvider::reply("JSON이 아니에요", 220)]);
        let assistant = assistant_with(provider);

        let failure = assistant
            .generate_quiz("토스", DEFAULT_DIFFICULTY)
            .await
            .unwrap_err();
        assert_eq!(failure.tokens_used, Some(220));
        assert!(matches!(failure.error, Error::Validation(_)));
    }

    #[tokio::test]
    async fn chat_turn_updates_history() {
        let provider =
            ScriptedProvider::new(vec![ScriptedProvider::reply("안녕하세요, 할머니!", 52)]);
        let assistant = assistant_with(provider.clone());
        let mut session = QuizSession::new();
        let mut history = HistoryManager::new(10);

        let reply = assistant
            .respond("안녕, 잘 지냈니?", &mut session, &mut history)
            .await;
        assert_eq!(reply, "안녕하세요, 할머니!");
        assert_eq!(history.len(), 2);

        // The prompt carried the persona as its system message.
        let requests = provider.requests.lock().unwrap();
        assert!(requests[0].messages[0].content.contains("손주톡톡"));
    }

    #[tokio::test]
    async fn guide_turn_uses_mapped_instruction() {
        let provider = ScriptedProvider::new(vec![ScriptedProvider::reply(
            "1단계. 토스 앱을 열어주세요...",
            80,
        )]);
        let assistant = assistant_with(provider.clone());
        let mut session = QuizSession::new();
        let mut history = HistoryManager::new(10);

        let reply = assistant
            .respond("송금하는 방법 알려줘", &mut session, &mut history)
            .await;
        assert!(reply.contains("1단계"));
        // History records the user's words, not the rewritten instruction.
        assert_eq!(history.snapshot()[0].content, "송금하는 방법 알려줘");

        let requests = provider.requests.lock().unwrap();
        let sent = &requests[0].messages.last().unwrap().content;
        assert!(sent.contains("송금하는 방법을 단계별로"));
    }

    #[tokio::test]
    async fn chat_failure_keeps_session_alive() {
        let provider = ScriptedProvider::new(vec![
            Err(ProviderError::RateLimited { retry_after_secs: 5 }),
            ScriptedProvider::reply("이제 괜찮아요!", 30),
        ]);
        let assistant = assistant_with(provider);
        let mut session = QuizSession::new();
        let mut history = HistoryManager::new(10);

        let failed = assistant
            .respond("안녕하세요", &mut session, &mut history)
            .await;
        assert_eq!(failed, CHAT_RETRY_MESSAGE);
        assert!(history.is_empty());

        let ok = assistant
            .respond("다시 안녕하세요", &mut session, &mut history)
            .await;
        assert_eq!(ok, "이제 괜찮아요!");
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn analysis_summarizes() {
        let provider = ScriptedProvider::new(vec![ScriptedProvider::reply(
            "할머니, 송금 연습을 정말 잘하고 계세요!",
            96,
        )]);
        let assistant = assistant_with(provider);

        let reply = assistant
            .analyze(&LearningData {
                lesson: "토스_송금".into(),
                avg_time: 15.5,
                accuracy: 0.8,
                errors: vec!["버튼3".into()],
            })
            .await
            .unwrap();
        assert!(reply.message.contains("할머니"));
        assert_eq!(reply.tokens_used, Some(96));
    }
}
