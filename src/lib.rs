/// Public library interface for the wellness tracker
///
/// This module exports the tracker context, the persisted store and its
/// backends, the streak and achievement calculators, and the stdio tool
/// server that front ends talk to.

use std::path::PathBuf;
use thiserror::Error;

// Internal modules
mod domain;
mod storage;
mod analytics;
mod config;
mod tracker;
mod tools;
mod mcp;

// Re-export public modules and types
pub use domain::*;
pub use storage::{
    keys, KeyValueBackend, MemoryBackend, PersistedStore, SqliteBackend, StorageError,
    DOCUMENT_VERSION,
};
pub use analytics::{
    DailyActivity, MonthSummary, ProgressAggregator, ProgressReport, WeeklyTotal, REPORT_WEEKS,
};
pub use config::{ConfigError, TrackerConfig};
pub use tracker::{CheckInOutcome, WellnessTracker};

/// Errors that can occur while starting or running the tracker
///
/// Data operations never produce these; only opening the database, reading
/// configuration and protocol I/O can fail.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tracker server backed by a SQLite database, speaking MCP over stdio
pub struct TrackerServer {
    tracker: WellnessTracker<SqliteBackend>,
}

impl TrackerServer {
    /// Open the database at `db_path` and load the tracker state
    pub fn new(db_path: PathBuf, config: TrackerConfig) -> Result<Self, TrackerError> {
        tracing::info!("Initializing wellness tracker with database: {:?}", db_path);

        let backend = SqliteBackend::new(db_path)?;
        let tracker = WellnessTracker::open(PersistedStore::new(backend), config)?;

        Ok(Self { tracker })
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until stdin is closed or an I/O error occurs.
    pub async fn run(self) -> Result<(), TrackerError> {
        tracing::info!("Starting MCP server...");

        let mut mcp_server = mcp::McpServer::new(self.tracker);
        mcp_server.run().await?;

        Ok(())
    }

    /// Serve JSON-RPC from an arbitrary line-oriented stream instead of stdio
    pub async fn serve<R, W>(self, reader: R, writer: W) -> Result<(), TrackerError>
    where
        R: tokio::io::AsyncBufRead + Unpin,
        W: tokio::io::AsyncWrite + Unpin,
    {
        let mut mcp_server = mcp::McpServer::new(self.tracker);
        mcp_server.serve(reader, writer).await
    }

    pub fn tracker(&self) -> &WellnessTracker<SqliteBackend> {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut WellnessTracker<SqliteBackend> {
        &mut self.tracker
    }
}
