mod common;

use std::time::Duration;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use backoffice_api::auth::TenantContext;

fn listener(org_id: &str, username: &str) -> TenantContext {
    TenantContext {
        org_id: org_id.to_string(),
        username: username.to_string(),
        token: String::new(),
    }
}

fn notification_body(recipient: &str, message: &str) -> Value {
    json!({ "recipient": recipient, "sender": "dispatcher", "caseType": "incident", "message": message })
}

#[tokio::test]
async fn created_notification_gets_server_identifiers() -> Result<()> {
    let Some((app, _)) = common::database_app().await? else { return Ok(()) };
    let token = common::token(&common::fresh_org(), "dispatcher");

    let (status, body) = common::send(
        &app,
        common::request(
            Method::POST,
            "/api/v1/notifications/new",
            Some(&token),
            Some(json!({ "recipient": "alice", "sender": "dispatcher", "message": "New case", "read": true })),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::OK, "body: {}", body);

    let data = &body["data"];
    let id = data["id"].as_str().unwrap();
    assert!(id.starts_with('D'));
    assert_eq!(id.len(), 20);
    assert_eq!(data["caseId"].as_str().unwrap().len(), 10);
    assert_eq!(data["read"], false);

    let (status, body) = common::send(&app, common::request(Method::GET, "/api/v1/notifications/recipient/alice", Some(&token), None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], id);
    Ok(())
}

#[tokio::test]
async fn missing_notification_is_not_found() -> Result<()> {
    let Some((app, _)) = common::database_app().await? else { return Ok(()) };
    let token = common::token(&common::fresh_org(), "dispatcher");

    for (method, uri) in [
        (Method::GET, "/api/v1/notifications/noti/D0000000000000000000"),
        (Method::DELETE, "/api/v1/notifications/delete/D0000000000000000000"),
    ] {
        let (status, body) = common::send(&app, common::request(method, uri, Some(&token), None)).await?;
        assert_eq!(status, StatusCode::NOT_FOUND, "uri: {}", uri);
        common::assert_failure(&body, "Failed");
    }

    let (status, _) = common::send(
        &app,
        common::request(
            Method::PUT,
            "/api/v1/notifications/edit/D0000000000000000000",
            Some(&token),
            Some(json!({ "recipient": "alice" })),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn edit_returns_updated_record() -> Result<()> {
    let Some((app, _)) = common::database_app().await? else { return Ok(()) };
    let token = common::token(&common::fresh_org(), "dispatcher");

    let (_, body) = common::send(
        &app,
        common::request(Method::POST, "/api/v1/notifications/new", Some(&token), Some(notification_body("alice", "New case"))),
    )
    .await?;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    let case_id = body["data"]["caseId"].clone();

    let (status, body) = common::send(
        &app,
        common::request(
            Method::PUT,
            &format!("/api/v1/notifications/edit/{}", id),
            Some(&token),
            Some(json!({ "recipient": "alice", "sender": "dispatcher", "message": "Case closed", "read": true })),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    common::assert_success(&body);
    assert_eq!(body["desc"], "Update successfully");
    assert_eq!(body["data"]["id"], id.as_str());
    assert_eq!(body["data"]["caseId"], case_id);
    assert_eq!(body["data"]["message"], "Case closed");
    assert_eq!(body["data"]["read"], true);

    let (_, body) = common::send(&app, common::request(Method::GET, &format!("/api/v1/notifications/noti/{}", id), Some(&token), None)).await?;
    assert_eq!(body["data"]["message"], "Case closed");
    Ok(())
}

#[tokio::test]
async fn notifications_stay_within_their_tenant() -> Result<()> {
    let Some((app, _)) = common::database_app().await? else { return Ok(()) };
    let owner = common::token(&common::fresh_org(), "dispatcher");
    let stranger = common::token(&common::fresh_org(), "dispatcher");

    let (_, body) = common::send(
        &app,
        common::request(Method::POST, "/api/v1/notifications/new", Some(&owner), Some(notification_body("alice", "Private"))),
    )
    .await?;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = common::send(&app, common::request(Method::GET, &format!("/api/v1/notifications/noti/{}", id), Some(&stranger), None)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = common::send(&app, common::request(Method::GET, "/api/v1/notifications/recipient/alice", Some(&stranger), None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let (status, _) = common::send(&app, common::request(Method::DELETE, &format!("/api/v1/notifications/delete/{}", id), Some(&stranger), None)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = common::send(&app, common::request(Method::GET, "/api/v1/notifications/recipient/alice", Some(&owner), None)).await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn created_notification_reaches_only_same_tenant_sockets() -> Result<()> {
    let Some((app, _, hub)) = common::database_app_with_hub().await? else { return Ok(()) };
    let org = common::fresh_org();
    let other_org = common::fresh_org();

    let (_, mut own) = hub.register(&listener(&org, "alice"));
    let (_, mut foreign) = hub.register(&listener(&other_org, "alice"));

    let token = common::token(&org, "dispatcher");
    let (status, body) = common::send(
        &app,
        common::request(Method::POST, "/api/v1/notifications/new", Some(&token), Some(notification_body("alice", "Live"))),
    )
    .await?;
    assert_eq!(status, StatusCode::OK, "body: {}", body);

    let frame = tokio::time::timeout(Duration::from_secs(2), own.recv())
        .await?
        .expect("socket channel open");
    let pushed: Value = serde_json::from_str(&frame)?;
    assert_eq!(pushed["id"], body["data"]["id"]);
    assert_eq!(pushed["message"], "Live");

    assert!(tokio::time::timeout(Duration::from_millis(200), foreign.recv()).await.is_err());
    Ok(())
}
