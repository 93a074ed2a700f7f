use chrono::{Local, Utc};
use quina_lib::{Extractor, JsonStore, Reconciler, ResultsPage, config, reports, run};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    match fetch_and_save().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("run failed: {:?}", e);
            eprintln!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn fetch_and_save() -> anyhow::Result<()> {
    let config = config::load()?;
    reports::banner(&config.url);

    let page = ResultsPage::new(&config.url, config.timeout)?;
    let store = JsonStore::new(&config.data_file, &config.source);
    let extractor = Extractor::new(Local::now().date_naive());
    let reconciler = Reconciler::new(config.max_results);

    let summary = run(&page, &store, &extractor, &reconciler, Utc::now()).await?;
    reports::summary(&summary);
    Ok(())
}
