//! `sonjutalk chat` — the interactive console mode.
//!
//! Reads one line per turn from stdin and routes it through the
//! assistant. A single quiz session and history buffer live for the
//! whole console session; nothing short of a termination keyword (or
//! EOF) ends it.

use std::io::Write as _;

use sonjutalk_assistant::{Assistant, HistoryManager, QuizSession};
use sonjutalk_config::AppConfig;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Words that end the console session. "안녕" doubles as a greeting in
/// Korean, but the original product treats it as a goodbye here.
const EXIT_KEYWORDS: &[&str] = &["quit", "q", "종료", "그만", "끝", "나갈래", "안녕"];

fn is_exit(input: &str) -> bool {
    EXIT_KEYWORDS.contains(&input.to_lowercase().as_str())
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for the API key early — give a clear error
    if config.ensure_api_key().is_err() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    export SONJUTALK_API_KEY='sk-...'");
        eprintln!("    export OPENAI_API_KEY='sk-...'");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let provider = sonjutalk_providers::build_from_config(&config);
    let assistant = Assistant::new(provider, &config);
    let mut session = QuizSession::new();
    let mut history = HistoryManager::new(config.history.max_exchanges);

    println!("{}", "=".repeat(50));
    println!("손주톡톡 AI 챗봇");
    println!("어르신의 스마트폰 사용을 도와드려요!");
    println!("{}", "=".repeat(50));
    println!();
    println!("사용 예시:");
    println!("  - 토스 퀴즈 내줘");
    println!("  - 송금하는 방법 알려줘");
    println!("  - 카카오톡 어떻게 써?");
    println!("  - 종료하려면 '그만' 또는 '종료'");
    println!("{}", "=".repeat(50));
    println!();

    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();

    loop {
        print!("어르신: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break; // EOF (Ctrl+D)
        };
        let input = line.trim();

        if input.is_empty() {
            continue;
        }

        if is_exit(input) {
            break;
        }

        let reply = assistant.respond(input, &mut session, &mut history).await;
        println!();
        println!("손주톡톡: {reply}");
        println!();
    }

    println!();
    println!("손주톡톡: 할머니/할아버지, 오늘도 수고 많으셨어요!");
    println!("언제든 불러주세요!");
    println!();

    Ok(())
}
