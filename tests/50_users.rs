mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn user_round_trip_never_exposes_password() -> Result<()> {
    let Some((app, _)) = common::database_app().await? else { return Ok(()) };
    let token = common::token(&common::fresh_org(), "admin");

    let (status, body) = common::send(
        &app,
        common::request(
            Method::POST,
            "/api/v1/users/add",
            Some(&token),
            Some(json!({ "username": "bob", "password": "hunter2", "firstName": "Bob", "active": true })),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = common::send(&app, common::request(Method::GET, "/api/v1/users/username/bob", Some(&token), None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id);
    assert_eq!(body["data"]["firstName"], "Bob");
    assert_eq!(body["data"]["activationToken"], token.as_str());
    assert!(body["data"].get("password").is_none());
    assert!(!body.to_string().contains("hunter2"));
    Ok(())
}

#[tokio::test]
async fn user_list_honours_paging() -> Result<()> {
    let Some((app, _)) = common::database_app().await? else { return Ok(()) };
    let token = common::token(&common::fresh_org(), "admin");

    for name in ["u1", "u2", "u3"] {
        let (status, _) = common::send(
            &app,
            common::request(Method::POST, "/api/v1/users/add", Some(&token), Some(json!({ "username": name, "password": "pw" }))),
        )
        .await?;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = common::send(&app, common::request(Method::GET, "/api/v1/users?start=1&length=1", Some(&token), None)).await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["username"], "u2");

    let (_, body) = common::send(&app, common::request(Method::GET, "/api/v1/users?start=x&length=y", Some(&token), None)).await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
    Ok(())
}

#[tokio::test]
async fn deleting_missing_user_still_succeeds() -> Result<()> {
    let Some((app, _)) = common::database_app().await? else { return Ok(()) };
    let token = common::token(&common::fresh_org(), "admin");

    let (status, body) = common::send(&app, common::request(Method::DELETE, "/api/v1/users/987654321", Some(&token), None)).await?;

    assert_eq!(status, StatusCode::OK);
    common::assert_success(&body);
    assert_eq!(body["desc"], "Delete successfully");
    Ok(())
}

#[tokio::test]
async fn skills_take_tenant_from_token() -> Result<()> {
    let Some((app, _)) = common::database_app().await? else { return Ok(()) };
    let org = common::fresh_org();
    let token = common::token(&org, "admin");

    let (status, body) = common::send(
        &app,
        common::request(
            Method::POST,
            "/api/v1/users_with_skills/add",
            Some(&token),
            Some(json!({ "userName": "bob", "skillId": "medic", "active": true, "orgId": "someone-else" })),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::OK, "body: {}", body);

    let (_, body) = common::send(&app, common::request(Method::GET, "/api/v1/users_with_skills/skillId/medic", Some(&token), None)).await?;
    let skills = body["data"].as_array().unwrap();
    assert_eq!(skills.len(), 1);
    assert_eq!(skills[0]["orgId"], org.as_str());
    assert_eq!(skills[0]["userName"], "bob");
    Ok(())
}

#[tokio::test]
async fn contacts_round_trip() -> Result<()> {
    let Some((app, _)) = common::database_app().await? else { return Ok(()) };
    let org = common::fresh_org();
    let token = common::token(&org, "admin");

    let (status, body) = common::send(
        &app,
        common::request(
            Method::POST,
            "/api/v1/users_with_contacts/add",
            Some(&token),
            Some(json!({ "username": "bob", "contactName": "Mum", "contactPhone": "555-0100", "contactAddr": { "city": "Leeds" } })),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["desc"], "Create successfully");
    let uri = format!("/api/v1/users_with_contacts/{}", body["data"]["id"].as_i64().unwrap());

    let (status, body) = common::send(
        &app,
        common::request(Method::PATCH, &uri, Some(&token), Some(json!({ "contactName": "Dad", "contactPhone": "555-0199" }))),
    )
    .await?;
    assert_eq!(status, StatusCode::OK, "body: {}", body);

    let (_, body) = common::send(&app, common::request(Method::GET, &uri, Some(&token), None)).await?;
    assert_eq!(body["data"]["orgId"], org.as_str());
    assert_eq!(body["data"]["contactName"], "Dad");
    assert_eq!(body["data"]["contactPhone"], "555-0199");
    assert!(body["data"]["contactAddr"].is_null());

    let (_, body) = common::send(&app, common::request(Method::GET, "/api/v1/users_with_contacts/username/bob", Some(&token), None)).await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let other = common::token(&common::fresh_org(), "admin");
    let (status, _) = common::send(&app, common::request(Method::GET, &uri, Some(&other), None)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = common::send(&app, common::request(Method::DELETE, &uri, Some(&token), None)).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = common::send(&app, common::request(Method::GET, &uri, Some(&token), None)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = common::send(&app, common::request(Method::PATCH, &uri, Some(&token), Some(json!({ "contactName": "Gone" })))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    common::assert_failure(&body, "Failed");
    Ok(())
}

#[tokio::test]
async fn social_update_keeps_owner_when_username_omitted() -> Result<()> {
    let Some((app, _)) = common::database_app().await? else { return Ok(()) };
    let token = common::token(&common::fresh_org(), "admin");

    let (status, body) = common::send(
        &app,
        common::request(
            Method::POST,
            "/api/v1/users_with_socials/add",
            Some(&token),
            Some(json!({ "username": "bob", "socialType": "line", "socialId": "bob-line", "socialName": "Bob" })),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    let uri = format!("/api/v1/users_with_socials/{}", body["data"]["id"].as_i64().unwrap());

    let (status, _) = common::send(
        &app,
        common::request(Method::PATCH, &uri, Some(&token), Some(json!({ "socialType": "x", "socialId": "bob-x", "socialName": "B" }))),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = common::send(&app, common::request(Method::GET, "/api/v1/users_with_socials/username/bob", Some(&token), None)).await?;
    let socials = body["data"].as_array().unwrap();
    assert_eq!(socials.len(), 1);
    assert_eq!(socials[0]["socialType"], "x");
    assert_eq!(socials[0]["socialId"], "bob-x");

    let (_, body) = common::send(&app, common::request(Method::GET, "/api/v1/users_with_socials", Some(&token), None)).await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = common::send(
        &app,
        common::request(Method::POST, "/api/v1/users_with_socials/add", Some(&token), Some(json!({ "username": " " }))),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    common::assert_failure(&body, "Failure");
    Ok(())
}
