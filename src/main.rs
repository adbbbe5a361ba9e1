use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tarot_oracle::adapters::http::{self, ReadingAppState};
use tarot_oracle::config::cli::{Command, ReadArgs, ServeArgs};
use tarot_oracle::core::reading::ReadingFailure;
use tarot_oracle::domain::model::ReadingSubmission;
use tarot_oracle::utils::error::ErrorSeverity;
use tarot_oracle::utils::{logger, validation::Validate};
use tarot_oracle::{AppConfig, CliConfig, GeminiClient, OracleError, ReadingService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 不存在時直接使用行程環境變數
    let _ = dotenvy::dotenv();

    let cli = CliConfig::parse();

    // 初始化日誌
    match &cli.command {
        Command::Serve(args) if args.json_logs => logger::init_json_logger(cli.verbose),
        _ => logger::init_cli_logger(cli.verbose),
    }

    tracing::info!("Starting tarot-oracle");

    let config = AppConfig::from_cli(&cli)?;
    if cli.verbose {
        tracing::debug!("App config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    if !config.gemini.has_api_key() {
        tracing::warn!(
            "⚠️ GEMINI_API_KEY is not set; every reading will fail until it is configured"
        );
    }

    let catalog = Arc::new(config.load_catalog()?);
    let aspects = Arc::new(config.load_aspects()?);
    let client = Arc::new(GeminiClient::new(config.gemini.clone()));
    let service = ReadingService::new(catalog, aspects, client);

    match cli.command {
        Command::Serve(args) => serve(service, args).await,
        Command::Read(args) => read(service, args).await,
    }
}

async fn serve(service: ReadingService, args: ServeArgs) -> anyhow::Result<()> {
    let addr = format!("{}:{}", args.host, args.port);
    http::serve(&addr, ReadingAppState::new(Arc::new(service))).await?;
    Ok(())
}

async fn read(service: ReadingService, args: ReadArgs) -> anyhow::Result<()> {
    let drawn = match args.seed {
        Some(seed) => service.draw_with(&mut StdRng::seed_from_u64(seed)),
        None => service.draw(),
    };

    println!("\n--- 🎴 抽牌結果 ---");
    for card in &drawn {
        let name = service
            .catalog()
            .get(card.card_id)
            .map(|c| c.name.as_str())
            .unwrap_or("?");
        println!("{}: {} [{}]", card.position, name, card.orientation.label());
    }
    println!();

    let submission = ReadingSubmission {
        question: Some(args.question.trim().to_string()),
        aspect: Some(args.aspect.clone()),
        cards: Some(drawn.to_vec()),
    };

    let result = if args.dry_run {
        service
            .validate(submission)
            .and_then(|reading| service.build_prompt(&reading))
    } else {
        println!("⏳ AI 正在深度解牌中，請稍候...");
        service.perform(submission).await
    };

    match result {
        Ok(text) => {
            if !args.dry_run {
                println!("\n--- 🌟 AI 專業解牌建議 ---");
            }
            println!("{}", text);
            Ok(())
        }
        Err(e) => {
            report_failure(&e);
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 2,
                ErrorSeverity::Medium => 3,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 4,
            };
            std::process::exit(exit_code);
        }
    }
}

fn report_failure(e: &OracleError) {
    tracing::error!(
        "❌ Reading failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    let failure = ReadingFailure::from(e);
    eprintln!("❌ {}", failure.message);
    eprintln!("💡 建議: {}", e.recovery_suggestion());
}
