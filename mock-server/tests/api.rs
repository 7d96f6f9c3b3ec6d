use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use student_server::{app, Student};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

const ADA: &str = r#"{"name":"Ada","email":"ada@x.com","course":"Maths"}"#;

// --- list ---

#[tokio::test]
async fn list_students_empty() {
    let resp = app().oneshot(empty_request("GET", "/students")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let students: Vec<Student> = body_json(resp).await;
    assert!(students.is_empty());
}

// --- create ---

#[tokio::test]
async fn create_student_returns_201_with_id() {
    let resp = app()
        .oneshot(json_request("POST", "/students", ADA))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let student: Student = body_json(resp).await;
    assert_eq!(student.id, 1);
    assert_eq!(student.name, "Ada");
    assert_eq!(student.course, "Maths");
}

#[tokio::test]
async fn create_student_missing_field_returns_400() {
    let resp = app()
        .oneshot(json_request("POST", "/students", r#"{"name":"Ada","email":"ada@x.com"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["error"], "All fields are required");
}

#[tokio::test]
async fn create_student_empty_field_returns_400() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/students",
            r#"{"name":"","email":"ada@x.com","course":"Maths"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- update ---

#[tokio::test]
async fn update_student_not_found() {
    let resp = app()
        .oneshot(json_request("PUT", "/students/99", ADA))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["message"], "Student not found");
}

#[tokio::test]
async fn update_student_bad_id_returns_400() {
    let resp = app()
        .oneshot(json_request("PUT", "/students/not-a-number", ADA))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- delete ---

#[tokio::test]
async fn delete_student_not_found() {
    let resp = app()
        .oneshot(empty_request("DELETE", "/students/99"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- cors ---

#[tokio::test]
async fn responses_allow_any_origin() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/students")
                .header(http::header::ORIGIN, "http://localhost:3000")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        resp.headers()[http::header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create two
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/students", ADA))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let ada: Student = body_json(resp).await;

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/students",
            r#"{"name":"Alan","email":"alan@x.com","course":"Logic"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let alan: Student = body_json(resp).await;
    assert_eq!(alan.id, ada.id + 1);

    // duplicate email is rejected
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/students",
            r#"{"name":"Other","email":"ada@x.com","course":"Art"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["error"], "Email already exists");

    // list in id order
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/students"))
        .await
        .unwrap();
    let students: Vec<Student> = body_json(resp).await;
    assert_eq!(students, vec![ada.clone(), alan.clone()]);

    // update: partial, only course
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/students/{}", ada.id),
            r#"{"course":"Computing"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Student = body_json(resp).await;
    assert_eq!(updated.name, "Ada"); // unchanged
    assert_eq!(updated.course, "Computing");

    // update: keeping own email is fine, taking another's is not
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PUT", &format!("/students/{}", ada.id), r#"{"email":"ada@x.com"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PUT", &format!("/students/{}", ada.id), r#"{"email":"alan@x.com"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("/students/{}", ada.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // delete again: 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("/students/{}", ada.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // list after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/students"))
        .await
        .unwrap();
    let students: Vec<Student> = body_json(resp).await;
    assert_eq!(students, vec![alan]);
}
