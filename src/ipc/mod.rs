//! IPC Layer - Unix socket transport for the scoring daemon
//!
//! This module provides:
//! - Message types for requests and responses
//! - Unix socket server and the request handler backed by a `Prioritizer`
//! - Client for the CLI

use std::path::PathBuf;

pub mod client;
pub mod handler;
pub mod messages;
pub mod server;

pub use client::{IpcClient, IpcClientConfig};
pub use handler::PrioritizerHandler;
pub use messages::{
    AnalyzeParams, DaemonError, DaemonRequest, DaemonResponse, ErrorCode, Methods, SuggestParams,
};
pub use server::{IpcServer, IpcServerConfig, RequestHandler};

/// Socket file name used when no path is configured.
pub const SOCKET_NAME: &str = "taskrank.sock";

/// Default daemon socket: the user runtime directory, else the temp directory.
pub fn default_socket_path() -> PathBuf {
    dirs::runtime_dir().unwrap_or_else(std::env::temp_dir).join(SOCKET_NAME)
}
