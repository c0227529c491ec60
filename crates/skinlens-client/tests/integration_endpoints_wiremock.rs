//! Integration tests for the typed endpoint groups using wiremock

use skinlens_client::{ApiClient, ApiClientConfig, ClientError, ErrorKind};
use skinlens_core::{
    Session,
    types::{ConsultationRequest, Credentials, ProductDraft, Registration},
};
use skinlens_session::MemorySessionStore;
use std::sync::Arc;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, body_partial_json, header, method, path},
};

fn client(server: &MockServer, session: Session) -> ApiClient {
    ApiClient::new(ApiClientConfig::new(server.uri()), session).unwrap()
}

fn empty_session() -> Session {
    Session::new(Arc::new(MemorySessionStore::new()))
}

fn signed_in_session() -> Session {
    Session::new(Arc::new(MemorySessionStore::with_values([
        ("access_token", "user-access"),
        ("refresh_token", "user-refresh"),
    ])))
}

fn registration() -> Registration {
    Registration {
        email: "amira@example.com".to_string(),
        password: "correct-horse".to_string(),
        confirm_password: "correct-horse".to_string(),
        first_name: "Amira".to_string(),
        last_name: "Haddad".to_string(),
        age: Some(29),
        sex: Some(String::new()),
        skin_type: vec!["oily".to_string()],
        ..Default::default()
    }
}

fn draft() -> ProductDraft {
    ProductDraft {
        name: "Barrier Cream".to_string(),
        brand: "Dermalab".to_string(),
        category: "Moisturizer".to_string(),
        description: "Ceramide-rich night cream".to_string(),
        price: 24.0,
        stock: 10,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_register_stores_returned_tokens() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/"))
        .and(body_partial_json(serde_json::json!({
            "email": "amira@example.com",
            "username": "amira",
            "sex": null,
            "skin_type": ["oily"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 42,
            "email": "amira@example.com",
            "tokens": {"access": "new-access", "refresh": "new-refresh"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = empty_session();
    let api = client(&mock_server, session.clone());

    let created = api.auth().register(&registration()).await.unwrap();
    assert_eq!(created.id, Some(42));

    assert_eq!(session.access_token().await.unwrap().as_deref(), Some("new-access"));
    assert_eq!(
        session.refresh_token().await.unwrap().as_deref(),
        Some("new-refresh")
    );

    let requests = mock_server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(sent.get("confirm_password").is_none());
}

#[tokio::test]
async fn test_register_reports_field_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "username": ["A user with that username already exists."],
            "email": ["user with this email already exists."]
        })))
        .mount(&mock_server)
        .await;

    let session = empty_session();
    let api = client(&mock_server, session.clone());

    let err = api.auth().register(&registration()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert_eq!(err.user_message(), "user with this email already exists.");
    assert_eq!(session.access_token().await.unwrap(), None);
}

#[tokio::test]
async fn test_register_mismatched_passwords_sends_nothing() {
    let mock_server = MockServer::start().await;
    let api = client(&mock_server, empty_session());

    let mut form = registration();
    form.confirm_password = "different".to_string();

    let err = api.auth().register(&form).await.unwrap_err();
    assert_eq!(err.user_message(), "Passwords do not match");
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_login_stores_tokens() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token/"))
        .and(body_json(serde_json::json!({
            "email": "amira@example.com",
            "password": "correct-horse"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access": "login-access",
            "refresh": "login-refresh"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = empty_session();
    let api = client(&mock_server, session.clone());

    api.auth()
        .login(&Credentials::new("amira@example.com", "correct-horse"))
        .await
        .unwrap();

    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.access_token.as_deref(), Some("login-access"));
    assert_eq!(snapshot.refresh_token.as_deref(), Some("login-refresh"));
}

#[tokio::test]
async fn test_login_failure_does_not_refresh() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "detail": "No active account found with the given credentials"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/token/refresh/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let api = client(&mock_server, signed_in_session());

    let err = api
        .auth()
        .login(&Credentials::new("amira@example.com", "wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Authentication(_)));
    assert_eq!(
        err.user_message(),
        "No active account found with the given credentials"
    );

    let requests = mock_server.received_requests().await.unwrap();
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_logout_clears_tokens() {
    let mock_server = MockServer::start().await;
    let session = signed_in_session();
    let api = client(&mock_server, session.clone());

    api.auth().logout().await.unwrap();

    let snapshot = session.snapshot().await.unwrap();
    assert!(!snapshot.has_user_session());
    assert_eq!(snapshot.refresh_token, None);
}

#[tokio::test]
async fn test_create_product() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/products/"))
        .and(header("authorization", "Bearer user-access"))
        .and(body_partial_json(serde_json::json!({
            "name": "Barrier Cream",
            "price": 24.0,
            "stock": 10
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 8,
            "name": "Barrier Cream",
            "brand": "Dermalab",
            "price": 24.0,
            "stock": 10,
            "image": null
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = client(&mock_server, signed_in_session());
    let product = api.products().create(&draft()).await.unwrap();

    assert_eq!(product.id, 8);
    assert_eq!(product.image, None);
    assert!(product.in_stock());
}

#[tokio::test]
async fn test_invalid_product_is_rejected_locally() {
    let mock_server = MockServer::start().await;
    let api = client(&mock_server, signed_in_session());

    let mut form = draft();
    form.price = -1.0;
    let err = api.products().create(&form).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let mut form = draft();
    form.brand = "  ".to_string();
    let err = api.products().update(8, &form).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_forbidden_delete_reports_permission() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/products/8/"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "detail": "You do not have permission to perform this action."
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = client(&mock_server, signed_in_session());
    let err = api.products().delete(8).await.unwrap_err();

    assert_eq!(err.status_code(), Some(403));
    assert_eq!(
        err.user_message(),
        "You do not have permission to perform this action."
    );
}

#[tokio::test]
async fn test_toggle_user_active() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/users/42/"))
        .and(body_json(serde_json::json!({"is_active": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 42,
            "email": "amira@example.com",
            "is_active": false
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = client(&mock_server, signed_in_session());
    let user = api.users().set_active(42, false).await.unwrap();

    assert_eq!(user.id, 42);
    assert!(!user.is_active);
}

#[tokio::test]
async fn test_book_and_list_consultations() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/consultations/create/"))
        .and(body_json(serde_json::json!({
            "date": "2026-10-20",
            "message": "Persistent redness on both cheeks"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 3,
            "date": "2026-10-20",
            "message": "Persistent redness on both cheeks",
            "status": "pending"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/consultations/user/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 3, "date": "2026-10-20", "message": "Persistent redness on both cheeks", "status": "pending"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = client(&mock_server, signed_in_session());

    let booked = api
        .consultations()
        .create(&ConsultationRequest {
            date: "2026-10-20".to_string(),
            message: "Persistent redness on both cheeks".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(booked.status.as_deref(), Some("pending"));

    let mine = api.consultations().list_mine().await.unwrap();
    assert_eq!(mine, vec![booked]);
}

#[tokio::test]
async fn test_consultation_with_bad_date_is_rejected_locally() {
    let mock_server = MockServer::start().await;
    let api = client(&mock_server, signed_in_session());

    let err = api
        .consultations()
        .create(&ConsultationRequest {
            date: "20/10/2026".to_string(),
            message: "Rash".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}
