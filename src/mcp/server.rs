/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads JSON-RPC requests from stdin
/// 2. Processes tool calls against the wellness tracker
/// 3. Sends JSON-RPC responses to stdout

use std::collections::HashMap;
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::mcp::protocol::*;
use crate::storage::KeyValueBackend;
use crate::tools;
use crate::tracker::WellnessTracker;
use crate::TrackerError;

/// MCP server that handles communication with a front end
pub struct McpServer<B: KeyValueBackend> {
    /// The tracker all tools operate on
    tracker: WellnessTracker<B>,
    /// Whether the client has completed initialization
    initialized: bool,
}

impl<B: KeyValueBackend> McpServer<B> {
    /// Create a new MCP server
    pub fn new(tracker: WellnessTracker<B>) -> Self {
        Self {
            tracker,
            initialized: false,
        }
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), TrackerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
    }

    /// Serve newline-delimited JSON-RPC from `reader` until it is exhausted
    pub async fn serve<R, W>(&mut self, mut reader: R, mut writer: W) -> Result<(), TrackerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (input closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line) {
                        let response_str = serde_json::to_string(&response)?;

                        writer.write_all(response_str.as_bytes()).await?;
                        writer.write_all(b"\n").await?;
                        writer.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read request: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    json!(null),
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None
                ));
            }
        };

        self.handle_request(request)
    }

    /// Handle a JSON-RPC request; notifications produce no response
    fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let id = match request.id {
            Some(id) => id,
            None => {
                if request.method.ends_with("initialized") {
                    self.initialized = true;
                }
                debug!("Notification '{}' handled", request.method);
                return None;
            }
        };

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                id,
                error_codes::INVALID_REQUEST,
                format!("Unsupported JSON-RPC version '{}'", request.jsonrpc),
                None
            ));
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                JsonRpcResponse::success(id, json!(null))
            }
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params),
            _ => {
                JsonRpcResponse::error(
                    id,
                    error_codes::METHOD_NOT_FOUND,
                    format!("Method '{}' not found", request.method),
                    None
                )
            }
        };

        Some(response)
    }

    /// Handle MCP initialization request
    fn handle_initialize(&mut self, id: Value) -> JsonRpcResponse {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: "Wellness Tracker MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        Self::serialized(id, &result)
    }

    /// Handle tools/list request
    fn handle_tools_list(&self, id: Value) -> JsonRpcResponse {
        let category_ids: Vec<String> = self
            .tracker
            .config()
            .categories
            .iter()
            .map(|c| c.id.to_string())
            .collect();

        let tools = vec![
            ToolDefinition {
                name: "wellness_check_in".to_string(),
                description: "Log a completed wellness activity for today or a past date".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "category": {"type": "string", "enum": category_ids, "description": "Activity category"},
                        "date": {"type": "string", "description": "Date completed (YYYY-MM-DD, optional - defaults to today)"}
                    },
                    "required": ["category"]
                }),
            },
            ToolDefinition {
                name: "wellness_status".to_string(),
                description: "Show current streak, best streak and totals".to_string(),
                input_schema: json!({"type": "object", "properties": {}, "required": []}),
            },
            ToolDefinition {
                name: "wellness_achievements".to_string(),
                description: "List unlocked achievements, optionally with progress toward locked ones".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "include_locked": {"type": "boolean", "description": "Also list locked achievements with progress (default: false)"}
                    },
                    "required": []
                }),
            },
            ToolDefinition {
                name: "wellness_progress".to_string(),
                description: "Daily, weekly and monthly activity with category breakdown".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "days": {"type": "number", "description": "Length of the daily window, 1-90 (default: 7)"}
                    },
                    "required": []
                }),
            },
            ToolDefinition {
                name: "wellness_history".to_string(),
                description: "List activities logged on a date".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "date": {"type": "string", "description": "Date (YYYY-MM-DD, optional - defaults to today)"}
                    },
                    "required": []
                }),
            },
            ToolDefinition {
                name: "wellness_categories".to_string(),
                description: "List the activity categories that can be logged".to_string(),
                input_schema: json!({"type": "object", "properties": {}, "required": []}),
            },
        ];

        JsonRpcResponse::success(id, json!({"tools": tools}))
    }

    /// Handle tools/call request using the local calendar day
    fn handle_tools_call(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match params {
            Some(params) => match serde_json::from_value(params) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        error_codes::INVALID_PARAMS,
                        format!("Invalid parameters: {}", e),
                        None
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None
                );
            }
        };

        if !self.initialized {
            debug!("Tool call before initialization handshake");
        }

        let today = Local::now().date_naive();
        let result = self.call_tool(&tool_params.name, tool_params.arguments, today, Utc::now());

        Self::serialized(id, &result)
    }

    /// Dispatch a tool call with an explicit calendar day and timestamp
    fn call_tool(
        &mut self,
        name: &str,
        args: HashMap<String, Value>,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> ToolCallResult {
        let unlocked = self.tracker.refresh(today, now);
        if !unlocked.is_empty() {
            info!("{} achievements unlocked on refresh", unlocked.len());
        }

        match name {
            "wellness_check_in" => match parse_args::<tools::CheckInParams>(args) {
                Ok(params) => match tools::check_in(&mut self.tracker, params, today, now) {
                    Ok(response) => respond(response.message.clone(), &response),
                    Err(e) => ToolCallResult::error(e.to_string()),
                },
                Err(e) => ToolCallResult::error(e),
            },
            "wellness_status" => {
                let response = tools::get_status(&self.tracker, today);
                respond(response.message.clone(), &response)
            }
            "wellness_achievements" => match parse_args::<tools::AchievementsParams>(args) {
                Ok(params) => {
                    let response = tools::list_achievements(&self.tracker, params);
                    respond(response.message.clone(), &response)
                }
                Err(e) => ToolCallResult::error(e),
            },
            "wellness_progress" => match parse_args::<tools::ProgressParams>(args) {
                Ok(params) => {
                    let response = tools::get_progress(&self.tracker, params, today);
                    respond(response.message.clone(), &response)
                }
                Err(e) => ToolCallResult::error(e),
            },
            "wellness_history" => match parse_args::<tools::HistoryParams>(args) {
                Ok(params) => match tools::get_history(&self.tracker, params, today) {
                    Ok(response) => respond(response.message.clone(), &response),
                    Err(e) => ToolCallResult::error(e.to_string()),
                },
                Err(e) => ToolCallResult::error(e),
            },
            "wellness_categories" => {
                let response = tools::list_categories(&self.tracker);
                respond(response.message.clone(), &response)
            }
            _ => ToolCallResult::error(format!("Unknown tool: {}", name)),
        }
    }

    fn serialized<T: Serialize>(id: Value, result: &T) -> JsonRpcResponse {
        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(
                id,
                error_codes::INTERNAL_ERROR,
                format!("Failed to serialize result: {}", e),
                None
            ),
        }
    }
}

/// Deserialize tool arguments into a parameter struct
fn parse_args<T: DeserializeOwned>(args: HashMap<String, Value>) -> Result<T, String> {
    serde_json::from_value(Value::Object(args.into_iter().collect()))
        .map_err(|e| format!("Invalid arguments: {}", e))
}

fn respond<T: Serialize>(message: String, body: &T) -> ToolCallResult {
    ToolCallResult::success(message, serde_json::to_value(body).ok())
}
