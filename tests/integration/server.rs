/// Stdio server driven over in-memory streams
use serde_json::Value;
use tempfile::TempDir;
use wellness_tracker::*;

fn responses(output: Vec<u8>) -> Vec<Value> {
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn test_server_session() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let server = TrackerServer::new(dir.path().join("wellness.db"), TrackerConfig::default())
        .expect("Failed to create server");

    let input = [
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
        r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"wellness_check_in","arguments":{"category":"gratitude"}}}"#,
        r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"wellness_status","arguments":{}}}"#,
        r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"wellness_check_in","arguments":{"category":"napping"}}}"#,
    ]
    .join("\n");
    let mut output = Vec::new();

    server.serve(input.as_bytes(), &mut output).await.unwrap();

    let replies = responses(output);
    assert_eq!(replies.len(), 5);
    assert_eq!(replies[1]["result"]["tools"].as_array().unwrap().len(), 6);

    let check_in = &replies[2]["result"];
    assert_eq!(check_in["isError"], false);
    assert_eq!(check_in["structuredContent"]["new_achievements"][0]["achievement_id"], "first-step");

    let status = &replies[3]["result"]["structuredContent"];
    assert_eq!(status["current_streak"], 1);
    assert_eq!(status["total_points"], 10);

    assert_eq!(replies[4]["result"]["isError"], true);
}

#[tokio::test]
async fn test_server_persists_between_sessions() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("wellness.db");

    let first = TrackerServer::new(db_path.clone(), TrackerConfig::default()).unwrap();
    let call = r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"wellness_check_in","arguments":{"category":"journaling"}}}"#;
    first.serve(call.as_bytes(), Vec::new()).await.unwrap();

    let second = TrackerServer::new(db_path, TrackerConfig::default()).unwrap();
    assert_eq!(second.tracker().log().len(), 1);
    assert_eq!(second.tracker().totals().total_events, 1);
}
