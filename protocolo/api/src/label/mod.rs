use std::path::PathBuf;
use std::time::Duration;

use crate::config::LabelConfig;
use crate::database::Protocolo;

mod barcode;
mod renderer;

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("failed to build pdf document: {0}")]
    Pdf(String),
    #[error("failed to write label file: {0}")]
    Io(#[from] std::io::Error),
    #[error("barcode payload rejected: {0}")]
    Barcode(String),
    #[error("label file not visible after {0} attempts")]
    PollExhausted(u32),
    #[error("render task cancelled")]
    TaskCancelled,
}

/// Where the label for a record lands. Named by record id, so regenerating
/// overwrites and two concurrent renders of the same record race on the path
/// (last writer wins).
pub fn label_path(config: &LabelConfig, id: i64) -> PathBuf {
    config.output_dir.join(format!("protocolo-{id}.pdf"))
}

/// Renders the label for a record and confirms the file landed on disk.
///
/// The document build runs on the blocking pool. After the save returns, the
/// path is probed a bounded number of times before success is reported; the
/// save is synchronous so the first probe normally hits, but the probe loop is
/// kept as a guard against write-behind filesystems.
pub async fn render(config: &LabelConfig, protocolo: &Protocolo) -> Result<PathBuf, RenderError> {
    let path = label_path(config, protocolo.id);

    let task_config = config.clone();
    let record = protocolo.clone();
    let out = path.clone();
    tokio::task::spawn_blocking(move || renderer::write_label(&task_config, &record, &out))
        .await
        .map_err(|_| RenderError::TaskCancelled)??;

    for attempt in 0..config.poll_attempts {
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            if attempt > 0 {
                tracing::debug!(path = %path.display(), attempt, "label file appeared late");
            }
            return Ok(path);
        }

        tokio::time::sleep(Duration::from_millis(config.poll_interval_ms)).await;
    }

    Err(RenderError::PollExhausted(config.poll_attempts))
}
