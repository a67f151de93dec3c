//! Prompt assembly for the three model-facing operations.
//!
//! Read-only over the conversation history; every function returns a fresh
//! message sequence ready for `Provider::complete`.

use sonjutalk_core::intent::GuideTarget;
use sonjutalk_core::message::Message;
use sonjutalk_core::quiz::LearningData;

/// The 손주톡톡 persona: a bright, patient AI grandchild for users in
/// their seventies. Plain text only — the model is told to never use
/// markdown because responses are read aloud or shown on large-font
/// screens.
pub const PERSONA: &str = r#"당신은 "손주톡톡"이라는 70대 어르신 전담 AI 손주입니다.

**성격과 역할:**
- 밝고 친근하며 인내심이 많은 손주
- 어르신을 "할머니" 또는 "할아버지"라고 부름
- 스마트폰 사용법을 차근차근 알려드림
- 항상 격려와 칭찬을 아끼지 않음

**말투 규칙:**
- 존댓말 사용하되 친근하게
- 어려운 용어 대신 쉬운 말 사용 (예: "클릭" → "눌러주세요")
- 한 번에 하나씩만 설명

**응답 방식:**
- 여러 단계로 나누어 설명 (1단계, 2단계...)
- 설명 마지막에 격려 멘트 한 번만 포함
- 각 단계마다 격려를 반복하지 말 것
- 절대로 마크다운 포맷을 사용하지 말 것 (**, *, #, - 등 금지)
- 모든 텍스트는 평문으로만 작성"#;

/// Build the chat message sequence: persona, the most recent
/// `prompt_exchanges` exchanges of history (oldest dropped first), then
/// the user's turn.
pub fn chat_messages(
    history: &[Message],
    user_text: &str,
    prompt_exchanges: usize,
) -> Vec<Message> {
    let window = prompt_exchanges * 2;
    let recent = &history[history.len().saturating_sub(window)..];

    let mut messages = Vec::with_capacity(recent.len() + 2);
    messages.push(Message::system(PERSONA));
    messages.extend_from_slice(recent);
    messages.push(Message::user(user_text));
    messages
}

/// Build the quiz-generation instruction: a single user message demanding
/// a raw-JSON-only five-field response.
pub fn quiz_messages(topic: &str, difficulty: &str) -> Vec<Message> {
    let instruction = format!(
        r#"{topic}에 대한 {difficulty} 난이도의 어르신용 퀴즈를 만들어주세요.

반드시 다음 JSON 형식으로만 응답하고, 다른 설명은 붙이지 마세요.
코드 블록(```)이나 마크다운 없이 JSON만 출력하세요:
{{
    "question": "질문 내용",
    "options": ["1. 선택지1", "2. 선택지2", "3. 선택지3", "4. 선택지4"],
    "correct_answer": 1,
    "explanation": "정답 해설",
    "encouragement": "칭찬 멘트"
}}"#
    );

    vec![Message::user(instruction)]
}

/// Build the learning-analysis messages: persona plus a summary request
/// embedding the lesson statistics.
pub fn analysis_messages(data: &LearningData) -> Vec<Message> {
    let errors = if data.errors.is_empty() {
        "없음".to_string()
    } else {
        data.errors.join(", ")
    };

    let instruction = format!(
        r#"어르신의 {lesson} 학습 결과를 분석해주세요.

데이터:
- 평균 소요 시간: {avg_time}초
- 정확도: {accuracy}%
- 자주 틀린 부분: {errors}

요구사항:
- 친근하고 격려하는 톤으로
- 3-4문장으로 간단히 요약
- 잘한 부분은 칭찬, 어려워한 부분은 부드럽게 피드백
- "할머니" 또는 "할아버지"라고 부르기"#,
        lesson = data.lesson,
        avg_time = data.avg_time,
        accuracy = data.accuracy * 100.0,
        errors = errors,
    );

    vec![Message::system(PERSONA), Message::user(instruction)]
}

/// The instruction text for a guide request. Sent down the chat path, so
/// it picks up the persona and history there.
pub fn guide_request(target: &GuideTarget) -> String {
    match target {
        GuideTarget::Feature(name) => match *name {
            "송금" => "토스 앱에서 송금하는 방법을 단계별로 쉽게 설명해주세요.".into(),
            "계좌" => "토스 앱에서 계좌 잔액을 확인하는 방법을 알려주세요.".into(),
            "전화" => "전화걸기에 대해 단계별로 친절하게 설명해주세요.".into(),
            "문자" => "문자메시지 보내는 방법을 어르신이 이해하기 쉽게 설명해주세요.".into(),
            "사진" => "사진찍기에 대해 어르신이 이해하기 쉽게 단계별로 설명해주세요.".into(),
            other => format!("{other}에 대해 어르신이 이해하기 쉽게 단계별로 설명해주세요."),
        },
        GuideTarget::App(name) => {
            format!("{name} 앱의 기본 사용법을 어르신이 이해하기 쉽게 단계별로 설명해주세요.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sonjutalk_core::message::Role;

    fn exchange(i: usize) -> [Message; 2] {
        [
            Message::user(format!("질문 {i}")),
            Message::assistant(format!("답변 {i}")),
        ]
    }

    #[test]
    fn chat_messages_shape() {
        let history: Vec<Message> = (0..3).flat_map(exchange).collect();
        let messages = chat_messages(&history, "안녕하세요", 5);

        assert_eq!(messages.len(), 8); // persona + 6 history + user turn
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages.last().map(|m| m.role), Some(Role::User));
        assert_eq!(messages.last().map(|m| m.content.as_str()), Some("안녕하세요"));
    }

    #[test]
    fn chat_history_truncated_oldest_first() {
        let history: Vec<Message> = (0..8).flat_map(exchange).collect();
        let messages = chat_messages(&history, "다음", 5);

        // persona + 10 most recent turns + user turn
        assert_eq!(messages.len(), 12);
        // Exchanges 0..3 dropped; the first retained history turn is 질문 3
        assert_eq!(messages[1].content, "질문 3");
    }

    #[test]
    fn chat_with_short_history_keeps_everything() {
        let history: Vec<Message> = (0..2).flat_map(exchange).collect();
        let messages = chat_messages(&history, "안녕", 5);
        assert_eq!(messages.len(), 6);
    }

    #[test]
    fn quiz_instruction_embeds_topic_and_difficulty() {
        let messages = quiz_messages("토스", "쉬움");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::User);
        assert!(messages[0].content.contains("토스"));
        assert!(messages[0].content.contains("쉬움"));
        assert!(messages[0].content.contains("correct_answer"));
    }

    #[test]
    fn analysis_embeds_statistics() {
        let data = LearningData {
            lesson: "토스_송금".into(),
            avg_time: 15.5,
            accuracy: 0.8,
            errors: vec!["버튼3".into(), "화면2".into()],
        };
        let messages = analysis_messages(&data);
        assert_eq!(messages.len(), 2);
        let body = &messages[1].content;
        assert!(body.contains("토스_송금"));
        assert!(body.contains("15.5초"));
        assert!(body.contains("80%"));
        assert!(body.contains("버튼3, 화면2"));
    }

    #[test]
    fn analysis_empty_errors_marked_none() {
        let data = LearningData {
            lesson: "전화걸기".into(),
            avg_time: 10.0,
            accuracy: 1.0,
            errors: vec![],
        };
        let messages = analysis_messages(&data);
        assert!(messages[1].content.contains("없음"));
    }

    #[test]
    fn guide_requests_map_targets() {
        assert!(guide_request(&GuideTarget::Feature("송금")).contains("송금하는 방법"));
        assert!(guide_request(&GuideTarget::Feature("계좌")).contains("잔액"));
        assert!(guide_request(&GuideTarget::App("카카오톡")).contains("기본 사용법"));
    }
}
