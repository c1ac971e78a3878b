/// MCP protocol implementation
///
/// This module handles the Model Context Protocol communication that front
/// ends use to drive the tracker: JSON-RPC parsing and tool routing.

pub mod protocol;
pub mod server;

pub use server::McpServer;
