mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};

#[tokio::test]
async fn missing_bearer_token_is_unauthorized() -> Result<()> {
    let app = common::offline_app()?;

    let (status, body) = common::send(&app, common::request(Method::GET, "/api/v1/forms/getAllForms", None, None)).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    common::assert_failure(&body, "Failure");
    Ok(())
}

#[tokio::test]
async fn garbage_token_is_unauthorized() -> Result<()> {
    let app = common::offline_app()?;

    let (status, body) = common::send(
        &app,
        common::request(Method::GET, "/api/v1/workflows", Some("not.a.token"), None),
    )
    .await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    common::assert_failure(&body, "Failure");
    Ok(())
}

#[tokio::test]
async fn token_without_org_is_invalid_token() -> Result<()> {
    let app = common::offline_app()?;
    let token = common::token("", "alice");

    let (status, body) = common::send(
        &app,
        common::request(Method::GET, "/api/v1/forms/getAllForms", Some(&token), None),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    common::assert_failure(&body, "Invalid token");
    assert_eq!(body["desc"], "orgId not found in token");
    Ok(())
}

#[tokio::test]
async fn every_protected_tree_requires_a_token() -> Result<()> {
    let app = common::offline_app()?;

    for uri in [
        "/api/v1/users",
        "/api/v1/users_with_skills",
        "/api/v1/users_with_contacts",
        "/api/v1/users_with_socials",
        "/api/v1/notifications/recipient/alice",
    ] {
        let (status, body) = common::send(&app, common::request(Method::GET, uri, None, None)).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "uri: {}", uri);
        common::assert_failure(&body, "Failure");
    }
    Ok(())
}
