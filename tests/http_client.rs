use std::time::Duration;

use gradboard::application::repos::{ApiError, ModerationApi};
use gradboard::config::ApiSettings;
use gradboard::domain::entities::ContentId;
use gradboard::domain::types::{ContentKind, PublishState, ReviewAction};
use gradboard::infra::http::HttpModerationApi;
use httpmock::MockServer;
use url::Url;

fn client(server: &MockServer) -> HttpModerationApi {
    let settings = ApiSettings {
        base_url: Some(Url::parse(&server.base_url()).expect("mock url")),
        prefix: "api/v1/moderation".to_string(),
        timeout: Duration::from_secs(5),
        token: Some("test-token".to_string()),
    };
    HttpModerationApi::new(&settings).expect("client")
}

fn id(value: &str) -> ContentId {
    ContentId::parse(value).expect("id")
}

#[tokio::test]
async fn list_decodes_wrapped_listing_with_bearer_token() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET")
            .path("/api/v1/moderation/internships")
            .header("authorization", "Bearer test-token");
        then.status(200)
            .header("content-type", "application/json")
            .body(
                r#"{"data":[
                    {"_id":"i-1","publishState":null,"internship_data":{"title":"Data intern","company":"Initech"}},
                    {"_id":"i-2","publishState":"rejected","feedback":"Stipend missing","internship_data":{"title":"QA intern","company":"Hooli"}}
                ]}"#,
            );
    });

    let items = client(&server)
        .list(ContentKind::Internship)
        .await
        .expect("listing");

    mock.assert();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].publish_state, PublishState::Pending);
    assert_eq!(items[0].title(), "Data intern");
    assert_eq!(items[1].publish_state, PublishState::Rejected);
    assert_eq!(items[1].feedback.as_deref(), Some("Stipend missing"));
}

#[tokio::test]
async fn review_posts_the_action() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/api/v1/moderation/jobs/j-9/review")
            .json_body_includes(r#"{"action":"approve"}"#);
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"message":"Job approved"}"#);
    });

    let message = client(&server)
        .review(ContentKind::Job, &id("j-9"), ReviewAction::Approve)
        .await
        .expect("review");

    mock.assert();
    assert_eq!(message.message, "Job approved");
}

#[tokio::test]
async fn feedback_targets_the_shared_endpoint() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/api/v1/moderation/feedback")
            .json_body_includes(
                r#"{"item_id":"e-3","item_type":"exam","feedback":"Wrong exam date"}"#,
            );
        then.status(200).body("");
    });

    let message = client(&server)
        .submit_feedback(ContentKind::Exam, &id("e-3"), "Wrong exam date")
        .await
        .expect("feedback");

    mock.assert();
    assert!(message.message.is_empty());
}

#[tokio::test]
async fn delete_maps_404_to_not_found() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("DELETE").path("/api/v1/moderation/jobs/j-1");
        then.status(404).body(r#"{"message":"not found"}"#);
    });

    let err = client(&server)
        .delete(ContentKind::Job, &id("j-1"))
        .await
        .expect_err("missing");

    mock.assert();
    assert_eq!(err, ApiError::NotFound);
}

#[tokio::test]
async fn server_errors_keep_status_and_body() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/api/v1/moderation/exams");
        then.status(401).body("token expired");
    });

    let err = client(&server)
        .list(ContentKind::Exam)
        .await
        .expect_err("unauthorised");

    assert_eq!(
        err,
        ApiError::Server {
            status: 401,
            body: "token expired".to_string(),
        }
    );
}

#[tokio::test]
async fn auto_approval_paths_follow_scope() {
    let server = MockServer::start();
    let per_kind = server.mock(|when, then| {
        when.method("GET")
            .path("/api/v1/moderation/achievements/auto-approval");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"enabled":true}"#);
    });
    let global = server.mock(|when, then| {
        when.method("PUT")
            .path("/api/v1/moderation/auto-approval")
            .json_body_includes(r#"{"enabled":false}"#);
        then.status(204);
    });

    let api = client(&server);
    let enabled = api
        .auto_approval(Some(ContentKind::Achievement))
        .await
        .expect("read flag");
    api.set_auto_approval(None, false).await.expect("write flag");

    per_kind.assert();
    global.assert();
    assert!(enabled);
}

#[tokio::test]
async fn set_starred_returns_the_updated_achievement() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("PATCH")
            .path("/api/v1/moderation/achievements/a-1")
            .json_body_includes(r#"{"starred":true}"#);
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"data":{"id":"a-1","isStarred":true,"title":"Olympiad gold","student_name":"M. Rao"}}"#);
    });

    let item = client(&server)
        .set_starred(&id("a-1"), true)
        .await
        .expect("star");

    mock.assert();
    assert!(item.starred);
    assert_eq!(item.title(), "Olympiad gold");
}

#[tokio::test]
async fn one_malformed_item_does_not_fail_the_listing() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/api/v1/moderation/jobs");
        then.status(200)
            .header("content-type", "application/json")
            .body(
                r#"[
                    {"id":"j-1","title":"Platform engineer","company":null,"deadline":20240601},
                    {"id":"","title":"No id"},
                    {"id":"j-2","status":"approved","title":"QA analyst","company":"Hooli"}
                ]"#,
            );
    });

    let items = client(&server)
        .list(ContentKind::Job)
        .await
        .expect("listing");

    let ids: Vec<&str> = items.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, ["j-1", "j-2"]);
    assert_eq!(items[0].payload.organisation(), "");
    assert_eq!(items[0].payload.deadline(), Some("20240601"));
    assert_eq!(items[1].publish_state, PublishState::Approved);
}
