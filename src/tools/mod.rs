/// MCP tools for the wellness tracker
///
/// This module contains all the MCP tools that external clients (a front end
/// or an assistant) can call to interact with the tracker.

pub mod check_in;
pub mod status;
pub mod achievements;
pub mod progress;
pub mod history;

// Re-export tool functions for easy access
pub use check_in::*;
pub use status::*;
pub use achievements::*;
pub use progress::*;
pub use history::*;
