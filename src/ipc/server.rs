//! IPC Server - Unix socket server for the scoring daemon
//!
//! Provides:
//! - Unix stream socket listener
//! - Client connection handling (one task per connection)
//! - Request routing and response sending
//! - Shutdown signalling

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::mpsc;

use crate::error::{RankError, Result};
use crate::ipc::default_socket_path;
use crate::ipc::messages::{DaemonError, DaemonRequest, DaemonResponse};

/// Configuration for the IPC server
#[derive(Debug, Clone)]
pub struct IpcServerConfig {
    /// Path to the Unix socket
    pub socket_path: PathBuf,
    /// Maximum number of concurrent clients
    pub max_clients: usize,
}

impl Default for IpcServerConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            max_clients: 16,
        }
    }
}

impl IpcServerConfig {
    /// Create config with custom socket path
    pub fn with_socket_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.socket_path = path.as_ref().to_path_buf();
        self
    }

    /// Set max clients
    pub fn with_max_clients(mut self, max: usize) -> Self {
        self.max_clients = max;
        self
    }
}

/// Handler trait for processing requests
pub trait RequestHandler: Send + Sync {
    /// Handle a request and return a response
    fn handle(&self, request: DaemonRequest) -> impl std::future::Future<Output = DaemonResponse> + Send;
}

/// IPC Server for daemon communication
pub struct IpcServer {
    config: IpcServerConfig,
    /// Connections currently being served
    active_clients: Arc<AtomicUsize>,
    /// Next client ID, for log correlation
    next_client_id: AtomicU64,
    shutdown_tx: mpsc::Sender<()>,
    shutdown_rx: mpsc::Receiver<()>,
}

impl IpcServer {
    /// Create a new IPC server with default config
    pub fn new() -> Self {
        Self::with_config(IpcServerConfig::default())
    }

    /// Create a new IPC server with custom config
    pub fn with_config(config: IpcServerConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        Self {
            config,
            active_clients: Arc::new(AtomicUsize::new(0)),
            next_client_id: AtomicU64::new(1),
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Get the socket path
    pub fn socket_path(&self) -> &Path {
        &self.config.socket_path
    }

    /// Get count of connected clients
    pub fn client_count(&self) -> usize {
        self.active_clients.load(Ordering::SeqCst)
    }

    /// Sender that stops `run` when a message is sent on it
    pub fn shutdown_handle(&self) -> mpsc::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Run the server with a request handler until shutdown is signalled
    pub async fn run<H: RequestHandler + 'static>(&mut self, handler: Arc<H>) -> Result<()> {
        // Remove existing socket if present
        if self.config.socket_path.exists() {
            std::fs::remove_file(&self.config.socket_path)?;
        }

        // Ensure parent directory exists
        if let Some(parent) = self.config.socket_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let listener = UnixListener::bind(&self.config.socket_path)
            .map_err(|e| RankError::Ipc(format!("Failed to bind socket: {}", e)))?;
        info!("Listening on {}", self.config.socket_path.display());

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, _addr)) => {
                            if self.active_clients.load(Ordering::SeqCst) >= self.config.max_clients {
                                warn!("Rejecting connection: {} clients already connected", self.config.max_clients);
                                continue;
                            }

                            let client_id = self.next_client_id.fetch_add(1, Ordering::SeqCst);
                            self.active_clients.fetch_add(1, Ordering::SeqCst);

                            let handler = Arc::clone(&handler);
                            let active = Arc::clone(&self.active_clients);
                            tokio::spawn(async move {
                                if let Err(e) = handle_client(stream, client_id, handler).await {
                                    debug!("Client {} ended with error: {}", client_id, e);
                                }
                                active.fetch_sub(1, Ordering::SeqCst);
                            });
                        }
                        Err(e) => {
                            warn!("Accept error: {}", e);
                        }
                    }
                }
                _ = self.shutdown_rx.recv() => {
                    break;
                }
            }
        }

        // Cleanup socket
        let _ = std::fs::remove_file(&self.config.socket_path);
        info!("Server on {} stopped", self.config.socket_path.display());
        Ok(())
    }
}

impl Default for IpcServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Serve one connection: one response line per request line
async fn handle_client<H: RequestHandler>(stream: UnixStream, client_id: u64, handler: Arc<H>) -> Result<()> {
    debug!("Client {} connected", client_id);
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            break; // EOF - client disconnected
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<serde_json::Value>(trimmed) {
            Ok(value) => match serde_json::from_value::<DaemonRequest>(value) {
                Ok(request) => {
                    debug!("Client {} -> {} (id {})", client_id, request.method, request.id);
                    handler.handle(request).await
                }
                Err(e) => DaemonResponse::error(0, DaemonError::invalid_request(format!("Invalid request: {}", e))),
            },
            Err(e) => DaemonResponse::error(0, DaemonError::parse_error(format!("Parse error: {}", e))),
        };

        let mut response_json = serde_json::to_string(&response)?;
        response_json.push('\n');
        writer.write_all(response_json.as_bytes()).await?;
        writer.flush().await?;
    }

    debug!("Client {} disconnected", client_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipc::messages::ErrorCode;
    use tempfile::tempdir;

    struct EchoHandler;

    impl RequestHandler for EchoHandler {
        fn handle(&self, request: DaemonRequest) -> impl std::future::Future<Output = DaemonResponse> + Send {
            async move { DaemonResponse::success(request.id, request.params) }
        }
    }

    async fn connect(path: &Path) -> UnixStream {
        for _ in 0..100 {
            if let Ok(stream) = UnixStream::connect(path).await {
                return stream;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("server never came up at {}", path.display());
    }

    #[test]
    fn test_server_config_default() {
        let config = IpcServerConfig::default();
        assert_eq!(config.max_clients, 16);
        assert!(config.socket_path.ends_with("taskrank.sock"));
    }

    #[test]
    fn test_server_config_builder() {
        let config = IpcServerConfig::default()
            .with_socket_path("/tmp/test.sock")
            .with_max_clients(32);
        assert_eq!(config.socket_path, PathBuf::from("/tmp/test.sock"));
        assert_eq!(config.max_clients, 32);
    }

    #[test]
    fn test_server_socket_path() {
        let dir = tempdir().unwrap();
        let socket_path = dir.path().join("test.sock");
        let server = IpcServer::with_config(IpcServerConfig::default().with_socket_path(&socket_path));
        assert_eq!(server.socket_path(), socket_path);
        assert_eq!(server.client_count(), 0);
    }

    #[tokio::test]
    async fn test_echo_roundtrip_and_shutdown() {
        let dir = tempdir().unwrap();
        let socket_path = dir.path().join("nested").join("echo.sock");
        let mut server = IpcServer::with_config(IpcServerConfig::default().with_socket_path(&socket_path));
        let shutdown = server.shutdown_handle();
        let task = tokio::spawn(async move { server.run(Arc::new(EchoHandler)).await });

        let stream = connect(&socket_path).await;
        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);

        writer
            .write_all(b"{\"id\":5,\"method\":\"echo\",\"params\":{\"n\":1}}\n")
            .await
            .unwrap();
        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        let response: DaemonResponse = serde_json::from_str(&line).unwrap();
        assert_eq!(response.id, 5);
        assert_eq!(response.result.unwrap()["n"], 1);

        writer.write_all(b"not json\n").await.unwrap();
        line.clear();
        reader.read_line(&mut line).await.unwrap();
        let response: DaemonResponse = serde_json::from_str(&line).unwrap();
        assert_eq!(response.error.unwrap().code, ErrorCode::PARSE_ERROR);

        writer.write_all(b"{\"method\":\"ping\"}\n").await.unwrap();
        line.clear();
        reader.read_line(&mut line).await.unwrap();
        let response: DaemonResponse = serde_json::from_str(&line).unwrap();
        assert_eq!(response.error.unwrap().code, ErrorCode::INVALID_REQUEST);

        shutdown.send(()).await.unwrap();
        task.await.unwrap().unwrap();
        assert!(!socket_path.exists());
    }
}
