use anyhow::Context;
use clap::Parser;
use drr_table::app::report;
use drr_table::core::{Clock, Storage};
use drr_table::utils::{logger, validation::Validate};
use drr_table::{load_model, CliConfig, HttpGateway, LocalStorage, Session, SystemClock};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting drr-table");
    tracing::debug!("CLI config: {:?}", cli);

    let settings = match cli.settings().and_then(|s| s.validate().map(|_| s)) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Configuration validation failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = cli.validate() {
        tracing::error!("Argument validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
    tracing::debug!("Effective settings: {:?}", settings);

    let storage = LocalStorage::new(".".to_string());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let source = cli.source()?;

    let model = load_model(&storage, &source, &settings, clock)
        .await
        .with_context(|| format!("building table from {:?}", source))?;
    tracing::info!("Table has {} rows", model.len());

    let rendered = report::render(&model.to_records(), cli.format)?;
    match &cli.output {
        Some(path) => {
            storage
                .write_file(path, rendered.as_bytes())
                .await
                .with_context(|| format!("writing report to {}", path))?;
            tracing::info!("Report written to {}", path);
        }
        None => print!("{}", rendered),
    }

    if cli.save {
        let gateway = HttpGateway::from_config(&settings)?;
        tracing::info!("Saving to {}", gateway.endpoint());
        let session = Session::new(model, gateway);
        // Outcome is logged by the session; a failed save does not change the exit code.
        let _ = session.save().await;
    }

    Ok(())
}
