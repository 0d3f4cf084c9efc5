//! Trigger command - turns an upload event into a retrain request

use anyhow::Context;
use clap::Args;
use tokio::io::AsyncReadExt;

use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::trigger::{RetrainTrigger, TriggerReport, UploadEvent};

#[derive(Args, Debug)]
pub struct TriggerArgs {
    /// Event JSON file, or `-` for stdin
    #[arg(long)]
    pub event: String,
}

/// Prints a `{statusCode, body}` report and fails when the retrain failed
pub async fn run(args: TriggerArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    let raw = read_event(&args.event).await?;
    let result = match UploadEvent::from_json(&raw) {
        Ok(event) => match RetrainTrigger::new(&config.trigger) {
            Ok(trigger) => trigger.handle(&event).await,
            Err(e) => Err(e),
        },
        Err(e) => Err(e),
    };

    let report = TriggerReport::from_result(&result);
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.is_success() {
        anyhow::bail!("retrain trigger failed with status {}", report.status_code);
    }

    Ok(())
}

async fn read_event(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut raw = String::new();
        tokio::io::stdin()
            .read_to_string(&mut raw)
            .await
            .context("failed to read event from stdin")?;
        return Ok(raw);
    }

    tokio::fs::read_to_string(source)
        .await
        .with_context(|| format!("failed to read event file {}", source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_event_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event.json");
        tokio::fs::write(&path, r#"{"Records": []}"#).await.unwrap();

        let raw = read_event(path.to_str().unwrap()).await.unwrap();
        assert_eq!(raw, r#"{"Records": []}"#);
    }

    #[tokio::test]
    async fn test_read_event_missing_file() {
        assert!(read_event("/nonexistent/event.json").await.is_err());
    }
}
