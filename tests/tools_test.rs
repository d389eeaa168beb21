use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use molt::api::Api;
use molt::engine::{EngineConfig, VerifyEngine};
use molt::solver::mock::MockSolver;
use molt::tools::delete::DeleteTool;
use molt::tools::fetch::FetchTool;
use molt::tools::post::PostTool;
use molt::tools::settings::SettingsTool;
use molt::tools::subscribe::SubscribeTool;
use molt::tools::vote::VoteTool;
use molt::tools::{Tool, ToolOutcome, ToolRegistry};

fn args(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn engine_for(uri: &str, answers: Vec<&str>) -> Arc<VerifyEngine> {
    let api = Arc::new(Api::new(uri, "test-token").unwrap());
    Arc::new(VerifyEngine::new(
        api,
        Arc::new(MockSolver::new(answers)),
        EngineConfig::default(),
    ))
}

/// Engine pointed at a dead address. Argument validation fails before any
/// request goes out, so these tests never touch the network.
fn offline_engine() -> Arc<VerifyEngine> {
    engine_for("http://127.0.0.1:1", Vec::new())
}

// ── Argument validation ───────────────────────────────────────────

#[tokio::test]
async fn post_requires_a_body_source() {
    let tool = PostTool::new(offline_engine());
    let err = tool
        .execute(&args(&[("submolt", "general"), ("title", "hi")]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("one of 'content' or 'link'"));
}

#[tokio::test]
async fn post_rejects_content_and_link_together() {
    let tool = PostTool::new(offline_engine());
    let err = tool
        .execute(&args(&[
            ("submolt", "general"),
            ("title", "hi"),
            ("content", "body"),
            ("link", "https://example.com"),
        ]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("mutually exclusive"));
}

#[tokio::test]
async fn post_requires_submolt() {
    let tool = PostTool::new(offline_engine());
    let err = tool
        .execute(&args(&[("title", "hi"), ("content", "body")]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("missing required arg: submolt"));
}

#[tokio::test]
async fn vote_rejects_comment_downvote() {
    let tool = VoteTool::new(offline_engine());
    let err = tool
        .execute(&args(&[
            ("target", "comment"),
            ("id", "5"),
            ("direction", "down"),
        ]))
        .await
        .unwrap_err();
    assert!(
        err.to_string()
            .contains("downvoting is not supported for comments")
    );
}

#[tokio::test]
async fn vote_rejects_unknown_target() {
    let tool = VoteTool::new(offline_engine());
    let err = tool
        .execute(&args(&[
            ("target", "submolt"),
            ("id", "5"),
            ("direction", "up"),
        ]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("target must be"));
}

#[tokio::test]
async fn settings_requires_at_least_one_field() {
    let tool = SettingsTool::new(offline_engine());
    let err = tool
        .execute(&args(&[("submolt", "general")]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("at least one of"));
}

#[tokio::test]
async fn subscribe_rejects_unknown_action() {
    let tool = SubscribeTool::new(offline_engine());
    let err = tool
        .execute(&args(&[("submolt", "general"), ("action", "mute")]))
        .await
        .unwrap_err();
    assert!(
        err.to_string()
            .contains("action must be 'subscribe' or 'unsubscribe'")
    );
}

// ── Registry ──────────────────────────────────────────────────────

#[tokio::test]
async fn registry_reports_unknown_tool() {
    let registry = ToolRegistry::new();
    let result = registry.execute("nonexistent", &HashMap::new()).await;
    assert!(matches!(result.outcome, ToolOutcome::Error(e) if e.contains("unknown tool")));
}

#[tokio::test]
async fn registry_maps_tool_failures_to_error_outcomes() {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(PostTool::new(offline_engine())));

    let result = registry.execute("post", &HashMap::new()).await;
    assert!(matches!(result.outcome, ToolOutcome::Error(e) if e.contains("missing required arg")));
}

#[tokio::test]
async fn registry_lists_descriptions_sorted_by_name() {
    let engine = offline_engine();
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(VoteTool::new(Arc::clone(&engine))));
    registry.register(Arc::new(DeleteTool::new(Arc::clone(&engine))));
    registry.register(Arc::new(PostTool::new(engine)));

    let names: Vec<String> = registry
        .descriptions()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(names, vec!["delete", "post", "vote"]);
}

// ── End to end through a mocked API ───────────────────────────────

#[tokio::test]
async fn post_tool_publishes_without_challenge() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/posts"))
        .and(body_partial_json(
            json!({"submolt_name": "general", "title": "hello", "content": "world"}),
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "post": {"id": "42"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(PostTool::new(engine_for(&server.uri(), vec![]))));

    let result = registry
        .execute(
            "post",
            &args(&[
                ("submolt", "general"),
                ("title", "hello"),
                ("content", "world"),
            ]),
        )
        .await;
    assert!(matches!(result.outcome, ToolOutcome::Success(msg)
        if msg.contains("request succeeded (id: 42)")));
}

#[tokio::test]
async fn post_tool_reports_a_solved_challenge() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "verification": {
                "verification_code": "abc",
                "challenge_text": "o^ne p-lus THREE"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/verify"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "content_id": "7"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let tool = PostTool::new(engine_for(&server.uri(), vec!["4.00"]));
    let msg = tool
        .execute(&args(&[
            ("submolt", "general"),
            ("title", "hello"),
            ("content", "world"),
        ]))
        .await
        .unwrap();
    assert!(msg.contains("verified and published successfully (id: 7"));
    assert!(msg.contains("4.00"));
}

#[tokio::test]
async fn delete_tool_issues_a_bodyless_delete() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/posts/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let tool = DeleteTool::new(engine_for(&server.uri(), vec![]));
    let msg = tool.execute(&args(&[("post_id", "9")])).await.unwrap();
    assert!(msg.contains("request succeeded"));
}

#[tokio::test]
async fn fetch_tool_pretty_prints_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/1"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "post": {"id": "1", "title": "hi"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = Arc::new(Api::new(server.uri(), "test-token").unwrap());
    let tool = FetchTool::new(api);
    let msg = tool.execute(&args(&[("path", "/posts/1")])).await.unwrap();
    assert!(msg.contains("status 200"));
    assert!(msg.contains("\"title\": \"hi\""));
}

#[tokio::test]
async fn fetch_tool_passes_through_non_json_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let api = Arc::new(Api::new(server.uri(), "test-token").unwrap());
    let tool = FetchTool::new(api);
    let msg = tool.execute(&args(&[("path", "health")])).await.unwrap();
    assert!(msg.ends_with("ok"));
}

#[tokio::test]
async fn subscribe_tool_uses_delete_for_unsubscribe() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/submolts/general/subscribe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let tool = SubscribeTool::new(engine_for(&server.uri(), vec![]));
    let msg = tool
        .execute(&args(&[("submolt", "general"), ("action", "unsubscribe")]))
        .await
        .unwrap();
    assert!(msg.contains("request succeeded"));
}
