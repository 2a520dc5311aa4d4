//! IPC client for talking to the scoring daemon.
//!
//! Requests are sent one at a time; each call writes a line and waits for the
//! matching response line.

use std::path::PathBuf;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};

use crate::domain::{ScoredTask, TaskInput};
use crate::error::{RankError, Result};
use crate::ipc::default_socket_path;
use crate::ipc::messages::{AnalyzeParams, DaemonRequest, DaemonResponse, Methods, SuggestParams};

/// Configuration for IPC client.
#[derive(Debug, Clone)]
pub struct IpcClientConfig {
    /// Path to daemon Unix socket.
    pub socket_path: PathBuf,
    /// Request timeout in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for IpcClientConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            request_timeout_ms: 30000,
        }
    }
}

impl IpcClientConfig {
    /// Create config with custom socket path.
    pub fn with_socket(path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: path.into(),
            ..Default::default()
        }
    }
}

/// IPC client for communicating with the daemon.
pub struct IpcClient {
    config: IpcClientConfig,
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    next_id: u64,
}

impl IpcClient {
    /// Connect to the daemon.
    pub async fn connect(config: IpcClientConfig) -> Result<Self> {
        let stream = UnixStream::connect(&config.socket_path).await.map_err(|e| {
            RankError::Ipc(format!(
                "Failed to connect to {}: {}",
                config.socket_path.display(),
                e
            ))
        })?;
        let (reader, writer) = stream.into_split();

        Ok(Self {
            config,
            reader: BufReader::new(reader),
            writer,
            next_id: 1,
        })
    }

    /// Connect to the daemon at `path` with default settings.
    pub async fn connect_to(path: impl Into<PathBuf>) -> Result<Self> {
        Self::connect(IpcClientConfig::with_socket(path)).await
    }

    /// Send a request and wait for its response.
    pub async fn request(&mut self, method: &str, params: serde_json::Value) -> Result<DaemonResponse> {
        let id = self.next_id;
        self.next_id += 1;

        let mut json = serde_json::to_string(&DaemonRequest::new(id, method, params))?;
        json.push('\n');
        self.writer
            .write_all(json.as_bytes())
            .await
            .map_err(|e| RankError::Ipc(format!("Failed to write: {}", e)))?;
        self.writer
            .flush()
            .await
            .map_err(|e| RankError::Ipc(format!("Failed to flush: {}", e)))?;

        let timeout = Duration::from_millis(self.config.request_timeout_ms);
        let mut line = String::new();
        let read = tokio::time::timeout(timeout, self.reader.read_line(&mut line))
            .await
            .map_err(|_| RankError::Ipc("Request timeout".into()))?
            .map_err(|e| RankError::Ipc(format!("Failed to read: {}", e)))?;
        if read == 0 {
            return Err(RankError::Ipc("Connection closed by daemon".into()));
        }

        let response: DaemonResponse = serde_json::from_str(line.trim())?;
        if response.id != id && response.error.is_none() {
            return Err(RankError::Ipc(format!(
                "Response id {} does not match request id {}",
                response.id, id
            )));
        }
        Ok(response)
    }

    /// Send ping request.
    pub async fn ping(&mut self) -> Result<bool> {
        let response = self.request(Methods::PING, serde_json::json!({})).await?;
        Ok(response.is_success())
    }

    /// Score a batch on the daemon; the daemon remembers the ranking.
    pub async fn analyze(&mut self, tasks: Vec<TaskInput>) -> Result<Vec<ScoredTask>> {
        let params = serde_json::to_value(AnalyzeParams { tasks })?;
        let response = self.request(Methods::ANALYZE, params).await?;
        into_tasks(response)
    }

    /// Top `count` tasks of `tasks`, or of the daemon's last analysis when `None`.
    pub async fn suggest(&mut self, tasks: Option<Vec<TaskInput>>, count: Option<usize>) -> Result<Vec<ScoredTask>> {
        let params = serde_json::to_value(SuggestParams { tasks, count })?;
        let response = self.request(Methods::SUGGEST, params).await?;
        into_tasks(response)
    }
}

fn into_tasks(response: DaemonResponse) -> Result<Vec<ScoredTask>> {
    if let Some(error) = response.error {
        return Err(error.into());
    }
    let result = response.result.unwrap_or_default();
    Ok(serde_json::from_value(result)?)
}
