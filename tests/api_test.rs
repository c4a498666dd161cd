use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::{Value, json};
use toolroom::auth::create_jwt;
use toolroom::db;
use toolroom::models::{inventory_item, user};
use toolroom::server::build_router;
use tower::util::ServiceExt; // for `oneshot`

const DEPT: &str = "CIVIL ENGINEERING TOOLROOM";
const STUDENT: &str = "juan@ue.edu.ph";
const ADMIN: &str = "admin1@ue.edu.ph";

// Helper to create the full application over an in-memory database
async fn setup_test_app() -> (Router, DatabaseConnection) {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    (build_router(db.clone(), &[]), db)
}

// Helper to create an account; the hash is never checked by these tests
async fn create_account(db: &DatabaseConnection, username: &str, email: &str, role: &str) {
    let account = user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        password_hash: Set("hash".to_string()),
        role: Set(role.to_string()),
        name: Set("Juan Dela Cruz".to_string()),
        student_number: Set("20231234".to_string()),
        created_at: Set(chrono::Utc::now().to_rfc3339()),
        is_email_verified: Set(true),
        failed_login_attempts: Set(0),
        locked_until: Set(None),
        ..Default::default()
    };
    account.insert(db).await.expect("Failed to create account");
}

async fn create_item(db: &DatabaseConnection, name: &str, total: i32, max_per_student: i32) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    let item = inventory_item::ActiveModel {
        department: Set(DEPT.to_string()),
        item_name: Set(name.to_string()),
        description: Set(String::new()),
        total_quantity: Set(total),
        available_quantity: Set(total),
        max_per_student: Set(max_per_student),
        is_active: Set(true),
        created_at: Set(now.clone()),
        last_updated: Set(now),
        ..Default::default()
    };
    item.insert(db).await.expect("Failed to create item").id
}

fn token(email: &str, role: &str) -> String {
    create_jwt(email, email, role).expect("Failed to create token")
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

#[tokio::test]
async fn test_health_and_docs() {
    let (app, _db) = setup_test_app().await;

    let (status, body) = send(&app, request("GET", "/api/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");

    let (status, body) = send(&app, request("GET", "/api-docs/openapi.json", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/cart"].is_object());
    for path in [
        "/api/auth/me",
        "/api/inventory/availability",
        "/api/cart/{id}",
        "/api/cart/validate",
        "/api/borrow-forms/mine",
        "/api/borrow-forms/reference/{code}",
        "/api/borrow-forms/{id}/reject",
        "/api/borrow-forms/{id}/return",
    ] {
        assert!(body["paths"][path].is_object(), "{} missing from the API docs", path);
    }
    assert!(body["paths"]["/api/cart"]["delete"].is_object());
    assert!(body["paths"]["/api/cart/{id}"]["delete"].is_object());
}

#[tokio::test]
async fn test_public_inventory_routes() {
    let (app, db) = setup_test_app().await;
    create_item(&db, "Measuring Tape", 22, 2).await;

    let (status, body) = send(&app, request("GET", "/api/departments", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([DEPT]));

    let uri = "/api/inventory?department=CIVIL%20ENGINEERING%20TOOLROOM";
    let (status, body) = send(&app, request("GET", uri, None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["item_name"], "Measuring Tape");
    assert_eq!(body[0]["available_quantity"], 22);

    let uri = "/api/inventory/availability?department=CIVIL%20ENGINEERING%20TOOLROOM&item_name=Drill";
    let (status, body) = send(&app, request("GET", uri, None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available_quantity"], 0);

    // Missing query parameter
    let (status, _) = send(&app, request("GET", "/api/inventory", None, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cart_requires_authentication() {
    let (app, _db) = setup_test_app().await;

    let (status, body) = send(&app, request("GET", "/api/cart", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing Authorization header");

    let (status, _) = send(&app, request("GET", "/api/cart", Some("garbage"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cart_flow_over_http() {
    let (app, db) = setup_test_app().await;
    create_item(&db, "Measuring Tape", 22, 2).await;
    let student = token(STUDENT, "Student");

    let add = json!({ "department": DEPT, "item_name": "Measuring Tape", "quantity": 2 });
    let (status, body) = send(&app, request("POST", "/api/cart", Some(&student), Some(add))).await;
    assert_eq!(status, StatusCode::CREATED);
    let cart_id = body["id"].as_i64().unwrap();

    let more = json!({ "department": DEPT, "item_name": "Measuring Tape", "quantity": 1 });
    let (status, body) = send(&app, request("POST", "/api/cart", Some(&student), Some(more))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "You've already reached the maximum limit of 2 for this item."
    );

    let (status, body) = send(&app, request("GET", "/api/cart/summary", Some(&student), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "total_items": 2, "total_types": 1 }));

    let (status, body) = send(&app, request("GET", "/api/cart", Some(&student), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["limits"][0]["max_per_student"], 2);

    let (status, body) = send(&app, request("GET", "/api/cart/validate", Some(&student), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);

    let uri = format!("/api/cart/{}", cart_id);
    let (status, body) = send(
        &app,
        request("PUT", &uri, Some(&student), Some(json!({ "quantity": 0 }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], true);

    let (status, _) = send(&app, request("DELETE", &uri, Some(&student), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_borrow_workflow_over_http() {
    let (app, db) = setup_test_app().await;
    let tape = create_item(&db, "Measuring Tape", 22, 2).await;
    create_account(&db, "juan", STUDENT, "Student").await;
    let student = token(STUDENT, "Student");
    let admin = token(ADMIN, "Administrator");

    let add = json!({ "department": DEPT, "item_name": "Measuring Tape", "quantity": 2 });
    send(&app, request("POST", "/api/cart", Some(&student), Some(add))).await;

    let submit = json!({ "professor_email": "regie.david@ue.edu.ph", "subject_code": "CE201" });
    let (status, form) = send(
        &app,
        request("POST", "/api/borrow-forms", Some(&student), Some(submit)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(form["status"], "pending");
    assert_eq!(form["student_number"], "20231234");
    let form_id = form["id"].as_i64().unwrap();
    let code = form["reference_code"].as_str().unwrap().to_string();

    // Students cannot see the staff queue or decide forms
    let (status, _) = send(&app, request("GET", "/api/borrow-forms", Some(&student), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let approve_uri = format!("/api/borrow-forms/{}/approve", form_id);
    let (status, _) = send(&app, request("PUT", &approve_uri, Some(&student), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, queue) = send(&app, request("GET", "/api/borrow-forms", Some(&admin), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(queue.as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        request("GET", "/api/borrow-forms?status=lost", Some(&admin), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A professor can approve, but only the toolroom staff can issue
    let professor = token("regie.david@ue.edu.ph", "Professor");
    let (status, body) = send(&app, request("PUT", &approve_uri, Some(&professor), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "approved");

    let (status, body) = send(&app, request("PUT", &approve_uri, Some(&admin), None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Form already processed");

    let issue_uri = format!("/api/borrow-forms/{}/issue", form_id);
    let (status, _) = send(&app, request("PUT", &issue_uri, Some(&professor), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = send(&app, request("PUT", &issue_uri, Some(&admin), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "issued");

    let uri = "/api/inventory?department=CIVIL%20ENGINEERING%20TOOLROOM";
    let (_, items) = send(&app, request("GET", uri, None, None)).await;
    assert_eq!(items[0]["id"], tape);
    assert_eq!(items[0]["available_quantity"], 20);

    let return_uri = format!("/api/borrow-forms/{}/return", form_id);
    let (status, body) = send(&app, request("PUT", &return_uri, Some(&admin), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "returned");

    let (status, mine) = send(&app, request("GET", "/api/borrow-forms/mine", Some(&student), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine[0]["reference_code"], code.as_str());

    let lookup = format!("/api/borrow-forms/reference/{}", code);
    let (status, _) = send(&app, request("GET", &lookup, Some(&student), None)).await;
    assert_eq!(status, StatusCode::OK);
    let stranger = token("someone.else@ue.edu.ph", "Student");
    let (status, _) = send(&app, request("GET", &lookup, Some(&stranger), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reject_and_adjust_over_http() {
    let (app, db) = setup_test_app().await;
    let tape = create_item(&db, "Measuring Tape", 22, 2).await;
    create_account(&db, "juan", STUDENT, "Student").await;
    let student = token(STUDENT, "Student");
    let admin = token(ADMIN, "Administrator");

    let add = json!({ "department": DEPT, "item_name": "Measuring Tape", "quantity": 1 });
    send(&app, request("POST", "/api/cart", Some(&student), Some(add))).await;
    let submit = json!({ "professor_email": "regie.david@ue.edu.ph", "subject_code": "CE201" });
    let (_, form) = send(
        &app,
        request("POST", "/api/borrow-forms", Some(&student), Some(submit)),
    )
    .await;
    let form_id = form["id"].as_i64().unwrap();

    let reject_uri = format!("/api/borrow-forms/{}/reject", form_id);
    let (status, body) = send(
        &app,
        request("PUT", &reject_uri, Some(&admin), Some(json!({ "reason": "Lab cancelled" }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "rejected");
    assert_eq!(body["rejection_reason"], "Lab cancelled");

    let issue_uri = format!("/api/borrow-forms/{}/issue", form_id);
    let (status, _) = send(&app, request("PUT", &issue_uri, Some(&admin), None)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let adjust_uri = format!("/api/inventory/{}/adjust", tape);
    let (status, _) = send(
        &app,
        request("PUT", &adjust_uri, Some(&student), Some(json!({ "delta": -5 }))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        request("PUT", &adjust_uri, Some(&admin), Some(json!({ "delta": -5 }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available_quantity"], 17);

    let (status, _) = send(
        &app,
        request("PUT", "/api/inventory/999/adjust", Some(&admin), Some(json!({ "delta": 1 }))),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_and_login_over_http() {
    let (app, _db) = setup_test_app().await;

    let register = json!({
        "username": "maria",
        "email": "maria@ue.edu.ph",
        "password": "lab2025pass",
        "name": "Maria Santos",
        "student_number": "20230001"
    });
    let (status, body) = send(&app, request("POST", "/api/auth/register", None, Some(register))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "Student");
    assert!(body.get("password_hash").is_none());

    let login = json!({ "username": "maria", "password": "lab2025pass" });
    let (status, body) = send(&app, request("POST", "/api/auth/login", None, Some(login))).await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = send(&app, request("GET", "/api/auth/me", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "maria@ue.edu.ph");

    let bad = json!({ "username": "maria", "password": "nope" });
    let (status, body) = send(&app, request("POST", "/api/auth/login", None, Some(bad))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");
}
