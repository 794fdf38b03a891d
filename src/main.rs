use clap::Parser;
use pricing_explain::utils::error::ErrorCategory;
use pricing_explain::utils::{logger, validation::Validate};
use pricing_explain::{CliConfig, ExplainEngine, FileRulesSource, JsonRecordStore, RecordKind};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting pricing-explain CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("error: {e}");
        std::process::exit(2);
    }

    let Some(kind) = RecordKind::parse(&config.kind) else {
        eprintln!("error: --kind must be \"task\" or \"expense\", got {:?}", config.kind);
        std::process::exit(2);
    };

    let store = match JsonRecordStore::from_file(&config.records) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to load records fixture: {}", e);
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let engine = ExplainEngine::new(
        store.clone(),
        FileRulesSource::new(),
        store,
        config.rules.clone(),
    );

    match engine.explain(kind, &config.id).await {
        Ok(explanation) => {
            let json = if config.pretty {
                serde_json::to_string_pretty(&explanation)?
            } else {
                serde_json::to_string(&explanation)?
            };
            println!("{json}");
        }
        Err(e) => {
            tracing::error!(
                "Explanation failed: {} (category: {:?}, retryable: {})",
                e,
                e.category(),
                e.is_retryable()
            );
            eprintln!("error: {e}");

            let exit_code = match e.category() {
                ErrorCategory::Client => 2,
                ErrorCategory::Server if e.is_retryable() => 3,
                ErrorCategory::Server => 1,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
