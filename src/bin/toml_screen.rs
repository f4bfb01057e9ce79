use clap::Parser;
use screen_score::config::toml_config::{LogFormat, TomlConfig};
use screen_score::core::formatter::summary;
use screen_score::core::ConfigProvider;
use screen_score::utils::{logger, validation::Validate};
use screen_score::{AssessmentEngine, LocalStorage, ScreeningPipeline};

#[derive(Parser)]
#[command(name = "toml_screen")]
#[command(about = "Run a screening assessment described by a TOML configuration")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "screen-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override [input] responses from the config
    #[arg(long)]
    responses: Option<String>,

    /// Override [output] archive from the config
    #[arg(long)]
    archive: Option<bool>,

    /// Print the full record as JSON instead of a summary
    #[arg(long)]
    json: bool,

    /// Validate and show the resolved configuration without scoring anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    let verbose = args.verbose || config.logging.verbose;
    match config.logging.format {
        LogFormat::Compact => logger::init_cli_logger(verbose),
        LogFormat::Json => logger::init_json_logger(verbose),
    }
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(responses) = args.responses {
        config.input.responses = Some(responses);
        tracing::info!("🔧 Responses overridden from the command line");
    }
    if let Some(archive) = args.archive {
        config.output.archive = archive;
        tracing::info!("🔧 Archive output overridden to: {}", archive);
    }

    let source = match config.validate().and_then(|_| config.response_source()) {
        Ok(source) => source,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be scored or written");
        return Ok(());
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = ScreeningPipeline::new(storage, config, source);
    let engine = AssessmentEngine::new(pipeline);

    match engine.run().await {
        Ok(record) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                println!("{}", summary(&record));
            }
            Ok(())
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
}

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("📋 Configuration Summary:");
    tracing::info!(
        "   Scale: 0..={} per question",
        config.scoring.max_per_question
    );
    tracing::info!("   Output: {}", config.output.output_path);
    tracing::info!("   Archive: {}", config.output.archive);
    tracing::info!(
        "   Charts: bar {}px wide, radar {}px",
        config.charts.bar_width,
        config.charts.radar_size
    );
}
