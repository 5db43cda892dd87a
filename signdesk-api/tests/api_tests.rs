/// End-to-end tests driving the router over in-memory stores

mod common;

use axum::http::{Method, StatusCode};
use common::{placement_body, TestContext};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx.send(Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["placements"], 0);
}

#[tokio::test]
async fn test_user_registration_hides_secrets() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .send(
            Method::POST,
            "/v1/users",
            Some(json!({
                "email": "Signer@Example.com",
                "passwordHash": "hash",
                "fullName": "Signer",
                "verificationToken": "tok-1"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "signer@example.com");
    assert!(body.get("passwordHash").is_none());
    assert!(body.get("verificationToken").is_none());

    let (status, body) = ctx
        .send(
            Method::POST,
            "/v1/users",
            Some(json!({
                "email": "signer@example.com",
                "passwordHash": "hash",
                "fullName": "Someone Else"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn test_apply_then_repeat_repositions() {
    let ctx = TestContext::new().await.unwrap();
    let document = ctx.create_document(3).await.unwrap();
    let signature = ctx.create_signature("Primary").await.unwrap();
    let uri = format!("/v1/documents/{}/placements", document.id);

    let (status, first) = ctx
        .send(Method::POST, &uri, Some(placement_body(signature.id, 1, "A1")))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["pageNumber"], 1);

    let (status, second) = ctx
        .send(Method::POST, &uri, Some(placement_body(signature.id, 1, "C3")))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["id"], first["id"]);
    assert_eq!(second["position"]["gridPosition"], "C3");
    assert_eq!(second["position"]["x"], 10);

    let (_, list) = ctx.send(Method::GET, &uri, None).await;
    assert_eq!(list["placements"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_apply_reports_every_invalid_field() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .send(
            Method::POST,
            "/v1/documents/not-a-uuid/placements",
            Some(json!({ "signatureId": "", "pageNumber": 0 })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");

    let mut fields: Vec<String> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|detail| detail["field"].as_str().unwrap().to_string())
        .collect();
    fields.sort();
    assert_eq!(fields, vec!["documentId", "pageNumber", "position", "signatureId"]);

    assert_eq!(ctx.storage.placements.len().await, 0);
}

#[tokio::test]
async fn test_apply_blank_grid_position() {
    let ctx = TestContext::new().await.unwrap();
    let document = ctx.create_document(1).await.unwrap();
    let signature = ctx.create_signature("Primary").await.unwrap();

    let (status, body) = ctx
        .send(
            Method::POST,
            &format!("/v1/documents/{}/placements", document.id),
            Some(placement_body(signature.id, 1, "   ")),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "position.gridPosition");
}

#[tokio::test]
async fn test_wrong_typed_position_is_validation_error() {
    let ctx = TestContext::new().await.unwrap();
    let document = ctx.create_document(1).await.unwrap();
    let signature = ctx.create_signature("Primary").await.unwrap();
    let uri = format!("/v1/documents/{}/placements", document.id);

    let cases = [
        (json!({ "gridPosition": null }), "position.gridPosition"),
        (json!({ "gridPosition": 5 }), "position.gridPosition"),
        (json!({ "gridPosition": ["A1"] }), "position.gridPosition"),
        (json!("A1"), "position"),
        (json!(42), "position"),
        (json!(null), "position"),
    ];

    for (position, field) in cases {
        let (status, body) = ctx
            .send(
                Method::POST,
                &uri,
                Some(json!({
                    "signatureId": signature.id,
                    "pageNumber": 1,
                    "position": position
                })),
            )
            .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "position {}", position);
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["details"][0]["field"], field);
    }

    assert_eq!(ctx.storage.placements.len().await, 0);
}

#[tokio::test]
async fn test_page_number_beyond_range_is_validation_error() {
    let ctx = TestContext::new().await.unwrap();
    let document = ctx.create_document(1).await.unwrap();
    let signature = ctx.create_signature("Primary").await.unwrap();

    let (status, body) = ctx
        .send(
            Method::POST,
            &format!("/v1/documents/{}/placements", document.id),
            Some(placement_body(signature.id, i64::from(u32::MAX) + 1, "A1")),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "pageNumber");
}

#[tokio::test]
async fn test_oversized_page_count_is_rejected() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .send(
            Method::POST,
            "/v1/documents",
            Some(json!({
                "userId": ctx.user.id,
                "fileName": "huge.pdf",
                "originalName": "huge.pdf",
                "fileSize": 1024,
                "filePath": "/uploads/huge.pdf",
                "pageCount": u32::MAX
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "pageCount");

    let document = ctx.create_document(2).await.unwrap();
    let uri = format!("/v1/documents/{}/status", document.id);
    let (status, body) = ctx
        .send(
            Method::PUT,
            &uri,
            Some(json!({ "status": "completed", "pageCount": u32::MAX })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "pageCount");

    let (_, stored) = ctx
        .send(Method::GET, &format!("/v1/documents/{}", document.id), None)
        .await;
    assert_eq!(stored["pageCount"], 2);
}

#[tokio::test]
async fn test_apply_unknown_parents_is_404() {
    let ctx = TestContext::new().await.unwrap();
    let document = ctx.create_document(1).await.unwrap();

    let (status, body) = ctx
        .send(
            Method::POST,
            &format!("/v1/documents/{}/placements", document.id),
            Some(placement_body(Uuid::new_v4(), 1, "A1")),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Referenced signature profile"));

    let signature = ctx.create_signature("Primary").await.unwrap();
    let (status, _) = ctx
        .send(
            Method::POST,
            &format!("/v1/documents/{}/placements", Uuid::new_v4()),
            Some(placement_body(signature.id, 1, "A1")),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let ctx = TestContext::new().await.unwrap();
    let document = ctx.create_document(1).await.unwrap();

    let response = ctx
        .raw(
            Method::POST,
            &format!("/v1/documents/{}/placements", document.id),
            Some(json!("just a string")),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_all_pages_sweep() {
    let ctx = TestContext::new().await.unwrap();
    let document = ctx.create_document(3).await.unwrap();
    let signature = ctx.create_signature("Initials").await.unwrap();
    let uri = format!("/v1/documents/{}/placements/all-pages", document.id);
    let body = json!({
        "signatureId": signature.id,
        "position": { "gridPosition": "F9" }
    });

    let (status, created) = ctx.send(Method::POST, &uri, Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let pages: Vec<u64> = created["placements"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["pageNumber"].as_u64().unwrap())
        .collect();
    assert_eq!(pages, vec![1, 2, 3]);

    // A second sweep adds another placement per page
    ctx.send(Method::POST, &uri, Some(body)).await;
    assert_eq!(ctx.storage.placements.len().await, 6);
}

#[tokio::test]
async fn test_all_pages_requires_page_count() {
    let ctx = TestContext::new().await.unwrap();
    let document = ctx.create_document(0).await.unwrap();
    let signature = ctx.create_signature("Initials").await.unwrap();

    let (status, body) = ctx
        .send(
            Method::POST,
            &format!("/v1/documents/{}/placements/all-pages", document.id),
            Some(json!({
                "signatureId": signature.id,
                "position": { "gridPosition": "F9" }
            })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "pageCount");
}

#[tokio::test]
async fn test_reposition_placement() {
    let ctx = TestContext::new().await.unwrap();
    let document = ctx.create_document(2).await.unwrap();
    let signature = ctx.create_signature("Primary").await.unwrap();

    let (_, placement) = ctx
        .send(
            Method::POST,
            &format!("/v1/documents/{}/placements", document.id),
            Some(placement_body(signature.id, 2, "A1")),
        )
        .await;
    let id = placement["id"].as_str().unwrap();
    let uri = format!("/v1/placements/{}/position", id);

    let (status, moved) = ctx
        .send(Method::PUT, &uri, Some(json!({ "position": { "gridPosition": "D4" } })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["id"], placement["id"]);
    assert_eq!(moved["pageNumber"], 2);
    assert_eq!(moved["position"]["gridPosition"], "D4");

    let (status, _) = ctx.send(Method::PUT, &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = ctx
        .send(
            Method::PUT,
            &format!("/v1/placements/{}/position", Uuid::new_v4()),
            Some(json!({ "position": { "gridPosition": "D4" } })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_removals() {
    let ctx = TestContext::new().await.unwrap();
    let document = ctx.create_document(2).await.unwrap();
    let primary = ctx.create_signature("Primary").await.unwrap();
    let initials = ctx.create_signature("Initials").await.unwrap();
    let uri = format!("/v1/documents/{}/placements", document.id);

    let (_, first) = ctx
        .send(Method::POST, &uri, Some(placement_body(primary.id, 1, "A1")))
        .await;
    ctx.send(Method::POST, &uri, Some(placement_body(initials.id, 1, "B1")))
        .await;
    ctx.send(Method::POST, &uri, Some(placement_body(primary.id, 2, "A1")))
        .await;

    let single = format!("/v1/placements/{}", first["id"].as_str().unwrap());
    let (_, body) = ctx.send(Method::DELETE, &single, None).await;
    assert_eq!(body["deleted"], true);
    let (_, body) = ctx.send(Method::DELETE, &single, None).await;
    assert_eq!(body["deleted"], false);

    let (_, body) = ctx
        .send(
            Method::DELETE,
            &format!("/v1/documents/{}/pages/1/placements", document.id),
            None,
        )
        .await;
    assert_eq!(body["removed"], 1);

    let (_, body) = ctx.send(Method::DELETE, &uri, None).await;
    assert_eq!(body["removed"], 1);
    assert!(ctx.storage.placements.is_empty().await);
}

#[tokio::test]
async fn test_deleting_parents_cascades() {
    let ctx = TestContext::new().await.unwrap();
    let contract = ctx.create_document(1).await.unwrap();
    let invoice = ctx.create_document(1).await.unwrap();
    let signature = ctx.create_signature("Primary").await.unwrap();

    for document in [&contract, &invoice] {
        ctx.send(
            Method::POST,
            &format!("/v1/documents/{}/placements", document.id),
            Some(placement_body(signature.id, 1, "A1")),
        )
        .await;
    }

    let (status, body) = ctx
        .send(Method::DELETE, &format!("/v1/documents/{}", contract.id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);
    assert_eq!(ctx.storage.placements.len().await, 1);

    let (status, _) = ctx
        .send(Method::GET, &format!("/v1/documents/{}", contract.id), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.send(Method::DELETE, &format!("/v1/signatures/{}", signature.id), None)
        .await;
    assert!(ctx.storage.placements.is_empty().await);
}

#[tokio::test]
async fn test_document_status_update() {
    let ctx = TestContext::new().await.unwrap();
    let document = ctx.create_document(0).await.unwrap();

    let (status, body) = ctx
        .send(
            Method::PUT,
            &format!("/v1/documents/{}/status", document.id),
            Some(json!({ "status": "completed", "pageCount": 4 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");
    assert_eq!(body["pageCount"], 4);

    let (status, _) = ctx
        .send(
            Method::PUT,
            &format!("/v1/documents/{}/status", Uuid::new_v4()),
            Some(json!({ "status": "failed" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_listings() {
    let ctx = TestContext::new().await.unwrap();
    ctx.create_document(1).await.unwrap();
    ctx.create_signature("Primary").await.unwrap();
    ctx.create_signature("Initials").await.unwrap();

    let (_, body) = ctx
        .send(Method::GET, &format!("/v1/users/{}/signatures", ctx.user.id), None)
        .await;
    let names: Vec<&str> = body["signatures"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Primary", "Initials"]);
    assert!(body["signatures"][0].get("privateKey").is_none());

    let (_, body) = ctx
        .send(Method::GET, &format!("/v1/users/{}/documents", ctx.user.id), None)
        .await;
    assert_eq!(body["documents"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_signature_requires_existing_user() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .send(
            Method::POST,
            "/v1/signatures",
            Some(json!({
                "userId": Uuid::new_v4(),
                "name": "Primary",
                "fullName": "Nobody",
                "companyName": "Acme",
                "location": "Berlin",
                "timeZone": "Europe/Berlin",
                "certificate": "cert",
                "privateKey": "key"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().starts_with("Referenced user"));
}

#[tokio::test]
async fn test_security_headers_present() {
    let ctx = TestContext::with_production(true).await.unwrap();

    let response = ctx.raw(Method::GET, "/health", None).await;
    let headers = response.headers();

    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert!(headers.get("strict-transport-security").is_some());
}
