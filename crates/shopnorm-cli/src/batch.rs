//! `batch` command: JSON Lines in, JSON Lines out.
//!
//! Each input line is `{"url": "...", "raw": {...}}`. Lines are normalized on
//! blocking worker threads, at most `concurrency` at a time, and written in
//! input order. A malformed line is logged and reported in place as
//! `{"line": n, "error": "..."}`; it never aborts the run.

use std::path::Path;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use shopnorm_core::CanonicalProduct;
use shopnorm_normalizer::{normalize_product_with, PlatformTable, RawExtraction};

#[derive(Debug, Deserialize)]
struct BatchRecord {
    url: String,
    #[serde(default)]
    raw: RawExtraction,
}

/// One output line.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum BatchLine {
    Product(Box<CanonicalProduct>),
    Error { line: usize, error: String },
}

impl BatchLine {
    fn is_error(&self) -> bool {
        matches!(self, BatchLine::Error { .. })
    }
}

/// Normalize every record in `input` and print one JSON line per record.
pub(crate) async fn run_batch(
    table: Arc<PlatformTable>,
    input: &Path,
    concurrency: usize,
) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(input)
        .await
        .map_err(|e| anyhow::anyhow!("failed to read batch input {}: {e}", input.display()))?;

    let results = normalize_lines(table, &content, concurrency).await;

    let failed = results.iter().filter(|r| r.is_error()).count();
    for result in &results {
        println!("{}", serde_json::to_string(result)?);
    }

    tracing::info!(
        input = %input.display(),
        records = results.len(),
        failed,
        "batch complete"
    );
    Ok(())
}

/// Normalizes the non-blank lines of `content`, preserving input order.
/// Line numbers in error entries are 1-based.
pub(crate) async fn normalize_lines(
    table: Arc<PlatformTable>,
    content: &str,
    concurrency: usize,
) -> Vec<BatchLine> {
    let lines: Vec<(usize, String)> = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| (index + 1, line.to_string()))
        .collect();

    stream::iter(lines.into_iter().map(|(line_no, line)| {
        let table = Arc::clone(&table);
        async move {
            tokio::task::spawn_blocking(move || normalize_line(&table, line_no, &line))
                .await
                .unwrap_or_else(|e| BatchLine::Error {
                    line: line_no,
                    error: format!("normalization task failed: {e}"),
                })
        }
    }))
    .buffered(concurrency.max(1))
    .collect::<Vec<_>>()
    .await
}

fn normalize_line(table: &PlatformTable, line_no: usize, line: &str) -> BatchLine {
    match serde_json::from_str::<BatchRecord>(line) {
        Ok(record) => {
            let product = normalize_product_with(table, &record.url, &record.raw);
            tracing::debug!(
                line = line_no,
                platform = %product.platform,
                variants = product.variant_count(),
                primary_image = product.primary_image().unwrap_or(""),
                score = product.quality_score,
                "normalized batch line"
            );
            BatchLine::Product(Box::new(product))
        }
        Err(e) => {
            tracing::warn!(line = line_no, error = %e, "skipping malformed batch line");
            BatchLine::Error {
                line: line_no,
                error: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
#[path = "batch_test.rs"]
mod tests;
