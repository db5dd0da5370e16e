use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::chunker::Chunk;
use crate::pipeline::DocumentSummary;

/// Snapshot of one chunking run, written as a JSON artifact
#[derive(Debug, Serialize, Deserialize)]
pub struct ChunkReport {
    pub version: String,
    pub created_at: String,
    pub generator: String,
    pub source_path: Option<String>,
    pub stats: ReportStats,
    pub chunks: Vec<Chunk>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportStats {
    pub page_count: usize,
    pub atom_count: usize,
    pub structure_count: usize,
    pub chunk_count: usize,
    pub total_tokens: usize,
}

impl ChunkReport {
    /// Build a report from a finished document run
    pub fn new(source_path: Option<String>, summary: &DocumentSummary) -> Self {
        let total_tokens = summary.chunks.iter().map(|c| c.token_count).sum();

        Self {
            version: "1.0.0".to_string(),
            created_at: Utc::now().to_rfc3339(),
            generator: format!("tablesafe v{}", env!("CARGO_PKG_VERSION")),
            source_path,
            stats: ReportStats {
                page_count: summary.page_count,
                atom_count: summary.atom_count,
                structure_count: summary.structure_count,
                chunk_count: summary.chunks.len(),
                total_tokens,
            },
            chunks: summary.chunks.clone(),
        }
    }

    /// Write the report as pretty-printed JSON
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create report file: {}", path.display()))?;
        serde_json::to_writer_pretty(file, self).context("Failed to serialize report")?;
        Ok(())
    }
}
