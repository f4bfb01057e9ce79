use clap::Parser;
use screen_score::core::formatter::summary;
use screen_score::domain::catalog;
use screen_score::utils::{logger, validation::Validate};
use screen_score::{AssessmentEngine, CliConfig, LocalStorage, ScreeningPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    if config.list_questions {
        for (i, question) in catalog::questions().iter().enumerate() {
            println!(
                "{:>2}  {:<30} {:<9} {}",
                i, question.id, question.category, question.prompt
            );
        }
        return Ok(());
    }

    tracing::info!("Starting screen-score CLI");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    let source = match config.validate().and_then(|_| config.response_source()) {
        Ok(source) => source,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    let json_output = config.json;
    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = ScreeningPipeline::new(storage, config, source);
    let engine = AssessmentEngine::new(pipeline);

    match engine.run().await {
        Ok(record) => {
            if json_output {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                println!("{}", summary(&record));
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Assessment failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
