use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::debug;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub course: String,
}

/// Body of POST and PUT. Every field is optional so that a missing field
/// yields the backend's own 400 rather than an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct StudentPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub course: Option<String>,
}

/// Rows keyed by id; ids are handed out sequentially from 1.
#[derive(Debug, Default)]
pub struct Table {
    next_id: i64,
    rows: BTreeMap<i64, Student>,
}

impl Table {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|s| s.email == email && Some(s.id) != except)
    }
}

pub type Db = Arc<RwLock<Table>>;

#[derive(Debug)]
pub enum Rejection {
    MissingFields,
    DuplicateEmail,
    NotFound,
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        match self {
            Rejection::MissingFields => (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "All fields are required"})),
            ),
            Rejection::DuplicateEmail => (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Email already exists"})),
            ),
            Rejection::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({"message": "Student not found"})),
            ),
        }
        .into_response()
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Table::default()));
    Router::new()
        .route("/students", get(list_students).post(create_student))
        .route("/students/{id}", put(update_student).delete(delete_student))
        .with_state(db)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_students(State(db): State<Db>) -> Json<Vec<Student>> {
    let table = db.read().await;
    Json(table.rows.values().cloned().collect())
}

fn required(value: Option<String>) -> Result<String, Rejection> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(Rejection::MissingFields)
}

async fn create_student(
    State(db): State<Db>,
    Json(input): Json<StudentPayload>,
) -> Result<(StatusCode, Json<Student>), Rejection> {
    let name = required(input.name)?;
    let email = required(input.email)?;
    let course = required(input.course)?;

    let mut table = db.write().await;
    if table.email_taken(&email, None) {
        return Err(Rejection::DuplicateEmail);
    }
    table.next_id += 1;
    let student = Student {
        id: table.next_id,
        name,
        email,
        course,
    };
    table.rows.insert(student.id, student.clone());
    debug!(id = student.id, "created student");
    Ok((StatusCode::CREATED, Json(student)))
}

async fn update_student(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<StudentPayload>,
) -> Result<Json<Student>, Rejection> {
    let mut table = db.write().await;
    if !table.rows.contains_key(&id) {
        return Err(Rejection::NotFound);
    }
    if let Some(email) = &input.email {
        if table.email_taken(email, Some(id)) {
            return Err(Rejection::DuplicateEmail);
        }
    }
    let student = table.rows.get_mut(&id).ok_or(Rejection::NotFound)?;
    if let Some(name) = input.name {
        student.name = name;
    }
    if let Some(email) = input.email {
        student.email = email;
    }
    if let Some(course) = input.course {
        student.course = course;
    }
    Ok(Json(student.clone()))
}

async fn delete_student(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<StatusCode, Rejection> {
    let mut table = db.write().await;
    table
        .rows
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(Rejection::NotFound)
}
