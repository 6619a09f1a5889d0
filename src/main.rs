use anyhow::Context;
use clap::Parser;
use order_analytics::{
    AppConfig, CliArgs, InMemoryOrderStore, InMemoryProductStore, LoggingConfig, OrderService,
    init_logging,
};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::from_env())?;

    let cli = CliArgs::parse();
    let config = AppConfig::from_args(&cli)?;

    let service = OrderService::new(
        Arc::new(InMemoryOrderStore::new()),
        Arc::new(InMemoryProductStore::new()),
        Arc::new(config),
    );

    for path in &cli.files {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read upload {}", path.display()))?;

        match service.ingest_upload(&file_name, &bytes) {
            Ok(report) => {
                tracing::info!(file = %file_name, records = report.records_ingested, "ingested");
            }
            Err(err) => {
                tracing::warn!(file = %file_name, category = err.category(), %err, "upload rejected");
            }
        }
    }

    if cli.dashboard {
        println!("{}", serde_json::to_string_pretty(&service.dashboard())?);
    } else if cli.stats {
        println!("{}", serde_json::to_string_pretty(&service.statistics())?);
    }

    Ok(())
}
