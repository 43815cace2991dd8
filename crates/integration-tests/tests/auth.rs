mod harness;

use harness::config::ConfigBuilder;
use harness::identity::USER_HEADER;
use serde_json::json;

#[tokio::test]
async fn anonymous_request_is_rejected_before_handler() {
    let (server, probe) = harness::start(ConfigBuilder::new().build()).await;

    let resp = server.client().get(server.url("/api/secret")).send().await.unwrap();

    let (status, body) = harness::json(resp).await;
    assert_eq!(status, 401);
    assert_eq!(
        body,
        json!({
            "success": false,
            "error": { "message": "You must be signed in to access this resource", "status": 401 }
        })
    );
    assert_eq!(probe.hits(), 0);
}

#[tokio::test]
async fn empty_user_id_is_anonymous() {
    let (server, probe) = harness::start(ConfigBuilder::new().build()).await;

    let resp = server
        .client()
        .get(server.url("/api/secret"))
        .header(USER_HEADER, "")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    assert_eq!(probe.hits(), 0);
}

#[tokio::test]
async fn signed_in_request_reaches_handler() {
    let (server, probe) = harness::start(ConfigBuilder::new().build()).await;

    let resp = server
        .client()
        .get(server.url("/api/secret"))
        .header(USER_HEADER, "user_123")
        .send()
        .await
        .unwrap();

    let (status, body) = harness::json(resp).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["owner"], "user_123");
    assert_eq!(probe.hits(), 1);
}

#[tokio::test]
async fn me_reports_the_signed_in_user() {
    let (server, _) = harness::start(ConfigBuilder::new().build()).await;

    let resp = server
        .client()
        .get(server.url("/api/me"))
        .header(USER_HEADER, "user_123")
        .send()
        .await
        .unwrap();

    let (status, body) = harness::json(resp).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "success": true, "data": { "userId": "user_123" } }));
}

#[tokio::test]
async fn identity_outage_is_generic_500() {
    let (server, probe) = harness::start(ConfigBuilder::new().build()).await;

    let resp = server
        .client()
        .get(server.url("/api/secret"))
        .header(USER_HEADER, "outage")
        .send()
        .await
        .unwrap();

    let (status, body) = harness::json(resp).await;
    assert_eq!(status, 500);
    assert_eq!(body["error"]["message"], "Internal Server Error");
    assert_eq!(probe.hits(), 0);
}

#[tokio::test]
async fn public_routes_skip_the_gate() {
    let (server, _) = harness::start(ConfigBuilder::new().build()).await;

    let resp = server.client().get(server.url("/api/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn unmounted_path_is_not_found_even_when_anonymous() {
    let (server, _) = harness::start(ConfigBuilder::new().build()).await;

    let resp = server.client().get(server.url("/api/secrets")).send().await.unwrap();
    assert_eq!(resp.status(), 404);
}
