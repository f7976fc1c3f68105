mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

fn workflow_body(title: &str, nodes: Value, connections: Value) -> Value {
    json!({ "title": title, "desc": "", "nodes": nodes, "connections": connections })
}

#[tokio::test]
async fn list_assembles_each_workflow() -> Result<()> {
    let Some((app, _)) = common::database_app().await? else { return Ok(()) };
    let token = common::token(&common::fresh_org(), "alice");

    let first = workflow_body(
        "First",
        json!([{ "id": "n1", "type": "start", "data": { "label": "Start" } }]),
        json!([{ "source": "n1", "target": "n2" }, { "source": "n2", "target": "n3" }]),
    );
    let second = workflow_body("Second", json!([{ "id": "m1", "type": "task", "data": { "label": "Only" } }]), json!([]));

    for body in [first, second] {
        let (status, reply) = common::send(&app, common::request(Method::POST, "/api/v1/workflows", Some(&token), Some(body))).await?;
        assert_eq!(status, StatusCode::OK, "body: {}", reply);
    }

    let (status, body) = common::send(&app, common::request(Method::GET, "/api/v1/workflows", Some(&token), None)).await?;
    assert_eq!(status, StatusCode::OK);

    let workflows = body["data"].as_array().unwrap();
    assert_eq!(workflows.len(), 2);
    assert_eq!(workflows[0]["metadata"]["title"], "First");
    assert_eq!(workflows[0]["nodes"].as_array().unwrap().len(), 1);
    assert_eq!(workflows[0]["connections"].as_array().unwrap().len(), 2);
    assert_eq!(workflows[1]["metadata"]["title"], "Second");
    assert_eq!(workflows[1]["connections"].as_array().unwrap().len(), 0);
    Ok(())
}

#[tokio::test]
async fn empty_tenant_lists_no_workflows() -> Result<()> {
    let Some((app, _)) = common::database_app().await? else { return Ok(()) };
    let token = common::token(&common::fresh_org(), "alice");

    let (status, body) = common::send(&app, common::request(Method::GET, "/api/v1/workflows", Some(&token), None)).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let (status, body) = common::send(&app, common::request(Method::GET, "/api/v1/workflows/missing", Some(&token), None)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    common::assert_failure(&body, "Failed");
    Ok(())
}

#[tokio::test]
async fn case_subtype_resolves_to_first_non_start_form() -> Result<()> {
    let Some((app, pool)) = common::database_app().await? else { return Ok(()) };
    let org = common::fresh_org();
    let token = common::token(&org, "alice");

    let (_, body) = common::send(
        &app,
        common::request(
            Method::POST,
            "/api/v1/forms",
            Some(&token),
            Some(json!({ "formName": "Triage", "formFieldJson": [{ "label": "Severity" }] })),
        ),
    )
    .await?;
    let form_id = body["data"]["formId"].as_str().unwrap().to_string();

    let nodes = json!([
        { "id": "n1", "type": "start", "data": { "label": "Start", "config": { "form_id": "ignored" } } },
        { "id": "n2", "type": "task", "data": { "label": "Triage", "config": { "form_id": form_id } } },
        { "id": "n3", "type": "task", "data": { "label": "Later", "config": { "form_id": "also-ignored" } } }
    ]);
    let (_, body) = common::send(
        &app,
        common::request(Method::POST, "/api/v1/workflows", Some(&token), Some(workflow_body("Case flow", nodes, json!([])))),
    )
    .await?;
    let wf_id = body["data"]["wfId"].as_str().unwrap().to_string();

    sqlx::query("INSERT INTO case_sub_types (org_id, s_type_id, wf_id) VALUES ($1, $2, $3)")
        .bind(&org)
        .bind("CST-1")
        .bind(&wf_id)
        .execute(&pool)
        .await?;

    let (status, body) = common::send(
        &app,
        common::request(Method::POST, "/api/v1/forms/casesubtype", Some(&token), Some(json!({ "caseSubType": "CST-1" }))),
    )
    .await?;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["data"]["formName"], "Triage");
    assert_eq!(body["data"]["formFieldJson"][0]["label"], "Severity");

    let (status, body) = common::send(
        &app,
        common::request(Method::POST, "/api/v1/forms/casesubtype", Some(&token), Some(json!({ "caseSubType": "CST-404" }))),
    )
    .await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    common::assert_failure(&body, "Failure");
    Ok(())
}

#[tokio::test]
async fn update_replaces_child_set_and_is_repeatable() -> Result<()> {
    let Some((app, _)) = common::database_app().await? else { return Ok(()) };
    let token = common::token(&common::fresh_org(), "alice");

    let original = workflow_body(
        "Draft flow",
        json!([
            { "id": "n1", "type": "start", "data": { "label": "Start" } },
            { "id": "n2", "type": "task", "data": { "label": "Old" } },
            { "id": "n3", "type": "task", "data": { "label": "Gone" } }
        ]),
        json!([{ "source": "n1", "target": "n2" }]),
    );
    let (_, body) = common::send(&app, common::request(Method::POST, "/api/v1/workflows", Some(&token), Some(original))).await?;
    let wf_id = body["data"]["wfId"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/workflows/{}", wf_id);

    let mut replacement = workflow_body(
        "Final flow",
        json!([
            { "id": "n1", "type": "start", "data": { "label": "Start" } },
            { "id": "n9", "type": "task", "data": { "label": "New" } }
        ]),
        json!([{ "source": "n1", "target": "n9" }, { "source": "n9", "target": "n1" }]),
    );
    replacement["status"] = json!("published");

    let mut stored = Vec::new();
    for _ in 0..2 {
        let (status, body) = common::send(&app, common::request(Method::PATCH, &uri, Some(&token), Some(replacement.clone()))).await?;
        assert_eq!(status, StatusCode::OK, "body: {}", body);
        assert_eq!(body["desc"], "Update successfully");

        let (status, body) = common::send(&app, common::request(Method::GET, &uri, Some(&token), None)).await?;
        assert_eq!(status, StatusCode::OK);
        stored.push((body["data"]["nodes"].clone(), body["data"]["connections"].clone(), body["data"]["metadata"]["title"].clone()));
    }

    let (nodes, connections, title) = &stored[0];
    assert_eq!(nodes, &replacement["nodes"]);
    assert_eq!(connections, &replacement["connections"]);
    assert_eq!(title, "Final flow");
    assert_eq!(stored[0], stored[1]);
    Ok(())
}

#[tokio::test]
async fn update_and_delete_of_missing_workflow_are_not_found() -> Result<()> {
    let Some((app, _)) = common::database_app().await? else { return Ok(()) };
    let token = common::token(&common::fresh_org(), "alice");

    let (_, body) = common::send(
        &app,
        common::request(Method::POST, "/api/v1/workflows", Some(&token), Some(workflow_body("Short", json!([]), json!([])))),
    )
    .await?;
    let uri = format!("/api/v1/workflows/{}", body["data"]["wfId"].as_str().unwrap());

    let (status, body) = common::send(&app, common::request(Method::DELETE, &uri, Some(&token), None)).await?;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["desc"], "Delete successfully");

    let (status, _) = common::send(&app, common::request(Method::GET, &uri, Some(&token), None)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = common::send(&app, common::request(Method::DELETE, &uri, Some(&token), None)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    common::assert_failure(&body, "Failed");

    let (status, _) = common::send(
        &app,
        common::request(Method::PATCH, &uri, Some(&token), Some(workflow_body("Again", json!([]), json!([])))),
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
