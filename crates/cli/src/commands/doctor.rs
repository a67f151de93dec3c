//! `sonjutalk doctor` — Diagnose config and provider connectivity.
//!
//! Runs one tiny real completion, so it costs a few tokens when the
//! connection works.

use sonjutalk_config::AppConfig;
use sonjutalk_core::message::Message;
use sonjutalk_core::provider::{Provider, ProviderRequest};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("손주톡톡 Doctor — System Diagnostics");
    println!("====================================\n");

    let mut issues = 0;

    // Check config
    let config_path = AppConfig::config_dir().join("config.toml");
    let config = match AppConfig::load() {
        Ok(config) => {
            if config_path.exists() {
                println!("  [ok] Config file valid");
            } else {
                println!("  [ok] No config file — using defaults (env vars still apply)");
            }
            config
        }
        Err(e) => {
            println!("  [!!] Config file invalid: {e}");
            println!("\n  1 issue found. Fix the config and run doctor again.");
            return Ok(());
        }
    };

    // Check API key
    if config.ensure_api_key().is_ok() {
        println!("  [ok] API key configured");
    } else {
        println!("  [!!] No API key — set SONJUTALK_API_KEY or OPENAI_API_KEY");
        issues += 1;
    }

    // Check provider reachability and run one tiny completion
    if issues == 0 {
        let provider = sonjutalk_providers::build_from_config(&config);

        match provider.health_check().await {
            Ok(true) => println!("  [ok] Provider reachable at {}", config.api_url),
            Ok(false) => {
                println!("  [!!] Provider at {} rejected the request", config.api_url);
                issues += 1;
            }
            Err(e) => {
                println!("  [!!] Provider unreachable: {e}");
                issues += 1;
            }
        }

        if issues == 0 {
            let request = ProviderRequest {
                model: config.default_model.clone(),
                messages: vec![Message::user("안녕하세요")],
                temperature: config.temperature_chat,
                max_tokens: Some(50),
            };
            match provider.complete(request).await {
                Ok(response) => {
                    println!("  [ok] Completion round-trip succeeded");
                    println!("       Model:  {}", response.model);
                    println!("       Reply:  {}", response.message.content.trim());
                    if let Some(usage) = response.usage {
                        println!("       Tokens: {}", usage.total_tokens);
                    }
                }
                Err(e) => {
                    println!("  [!!] Completion failed: {e}");
                    issues += 1;
                }
            }
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  All checks passed!");
    } else {
        println!("  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
