//! MCP HTTP Integration Tests
//!
//! Full client flows against a running warp server

use serde_json::{json, Value};

use mcp_test_helpers::*;

#[tokio::test]
async fn test_health_endpoint() -> TestResult {
    init_test_tracing();
    let server = McpTestServer::start(notebook_handler()).await?;

    let response = reqwest::get(format!("{}/health", server.http_url())).await?;
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await?, "OK");

    server.stop().await;
    Ok(())
}

#[tokio::test]
async fn test_full_session_lifecycle() -> TestResult {
    init_test_tracing();
    let server = McpTestServer::start(notebook_handler()).await?;
    let client = reqwest::Client::new();

    let init = post_rpc(&client, &server, json!(1), "initialize", json!({}), None).await?;
    assert_eq!(init.status, 200);
    assert_eq!(init.mcp_version.as_deref(), Some("0.6"));
    assert_eq!(init.body["result"]["serverInfo"]["name"], "notebook-test");
    let session_id = init.session_id.expect("initialize must return a session id");

    let listed = post_rpc(&client, &server, json!(2), "tools/list", json!({}), Some(&session_id)).await?;
    let names: Vec<&str> = listed.body["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    assert_eq!(names, ["note_take", "note_find"]);

    for text in ["buy milk", "call mom", "buy bread"] {
        let taken = post_rpc(
            &client,
            &server,
            json!(3),
            "tools/call",
            json!({"name": "note_take", "arguments": {"text": text}}),
            Some(&session_id),
        )
        .await?;
        assert_eq!(taken.status, 200);
        assert_eq!(taken.body["result"]["content"][0]["text"], format!("Noted: {text}"));
    }

    let found = post_rpc(
        &client,
        &server,
        json!(4),
        "tools/call",
        json!({"name": "note_find", "arguments": {"query": "buy"}}),
        Some(&session_id),
    )
    .await?;
    let text = found.body["result"]["content"][0]["text"].as_str().unwrap();
    let matches: Value = serde_json::from_str(text)?;
    assert_eq!(matches, json!(["buy milk", "buy bread"]));

    let deleted = client
        .delete(server.mcp_url())
        .header("Mcp-Session-Id", &session_id)
        .send()
        .await?;
    assert_eq!(deleted.status(), 204);

    let after = post_rpc(&client, &server, json!(5), "ping", json!({}), Some(&session_id)).await?;
    assert_eq!(after.status, 404);
    assert_eq!(after.body["error"]["code"], -32000);

    server.stop().await;
    Ok(())
}

#[tokio::test]
async fn test_prompt_and_resource_over_http() -> TestResult {
    init_test_tracing();
    let server = McpTestServer::start(notebook_handler()).await?;
    let client = reqwest::Client::new();

    let session_id = post_rpc(&client, &server, json!(1), "initialize", json!({}), None)
        .await?
        .session_id
        .expect("session id");

    let prompt = post_rpc(
        &client,
        &server,
        json!(2),
        "prompts/get",
        json!({"name": "summarize_notes", "arguments": {"style": "haiku"}}),
        Some(&session_id),
    )
    .await?;
    assert_eq!(
        prompt.body["result"]["messages"],
        json!([{"role": "user", "content": {"type": "text", "text": "Summarize my notes as haiku"}}])
    );

    let resource = post_rpc(
        &client,
        &server,
        json!(3),
        "resources/read",
        json!({"uri": "notes://about"}),
        Some(&session_id),
    )
    .await?;
    assert_eq!(resource.body["result"]["contents"][0]["text"], "A notebook");

    server.stop().await;
    Ok(())
}

#[tokio::test]
async fn test_rejected_requests_over_http() -> TestResult {
    init_test_tracing();
    let server = McpTestServer::start(notebook_handler()).await?;
    let client = reqwest::Client::new();

    let wrong_type = client
        .post(server.mcp_url())
        .header("Content-Type", "text/plain")
        .body(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#)
        .send()
        .await?;
    assert_eq!(wrong_type.status(), 400);
    let body: Value = wrong_type.json().await?;
    assert_eq!(body["error"]["code"], -32700);

    let garbage = client
        .post(server.mcp_url())
        .header("Content-Type", "application/json")
        .body("{{{")
        .send()
        .await?;
    assert_eq!(garbage.status(), 400);

    let no_session = post_rpc(&client, &server, json!(1), "tools/list", json!({}), None).await?;
    assert_eq!(no_session.status, 400);
    assert_eq!(no_session.body["error"]["message"], "Session required");

    server.stop().await;
    Ok(())
}
