// Consulting24 entry point
// Reads an analysis request as JSON on stdin and prints the result.

use std::sync::Arc;

use anyhow::{bail, Context};
use tokio::io::AsyncReadExt;
use tracing::{error, info};

use consulting24_core::actors::llm::GeminiActorHandle;
use consulting24_core::advisor::Advisor;
use consulting24_core::config::AppConfig;
use consulting24_core::models::{AnalysisRequest, FormDraft};
use consulting24_core::store::{DraftRepository, HistoryLog, KeyValueStore, SqliteStore};
use consulting24_core::{export, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("Invalid configuration")?;
    telemetry::init("consulting24", &config.log_filter, config.log_format);

    let markdown = std::env::args().skip(1).any(|arg| arg == "--markdown");

    let store: Arc<dyn KeyValueStore> =
        Arc::new(SqliteStore::open(&config.database_path()).await?);
    let drafts = DraftRepository::new(store.clone());
    let history = HistoryLog::new(store);

    let mut input = String::new();
    tokio::io::stdin().read_to_string(&mut input).await?;
    // An empty stdin resumes the saved draft.
    let request = if input.trim().is_empty() {
        AnalysisRequest::from(drafts.load().await?)
    } else {
        serde_json::from_str::<AnalysisRequest>(&input)
            .context("stdin is not a valid analysis request")?
            .normalized()
    };
    if request.is_blank() {
        bail!("nothing to analyze: select a goal or describe the situation");
    }
    drafts.save(&FormDraft::from(&request)).await?;

    let llm = config.gemini().map(|settings| Arc::new(GeminiActorHandle::new(settings)));
    if llm.is_none() {
        info!("GEMINI_API_KEY is not set, running in fallback-only mode");
    }
    let advisor = Advisor::new(llm, config.min_delay());

    let result = match advisor.analyze(&request).await {
        Ok(result) => result,
        Err(e) => {
            error!("Analysis rejected: {}", e);
            return Err(e.into());
        }
    };
    let entry = history.save(&result).await?;
    drafts.clear().await?;
    info!(id = %entry.id, source = ?result.source, "Analysis complete");

    if markdown {
        let date = entry.created_on()?;
        println!("{}", export::render(&result, date));
    } else {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }
    Ok(())
}
