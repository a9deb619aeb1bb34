#![allow(dead_code)]

//! Mock authentication API served by axum on an ephemeral port.
//! One account (`insp` / `secret`); login sets a `sessionid` cookie that `auth/me/` checks.

use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

pub const SESSION: &str = "sessionid=4f2c9a";

pub fn inspector_json(role: &str) -> Value {
    json!({
        "id": 42,
        "username": "insp",
        "first_name": "Dilnoza",
        "last_name": "Rahimova",
        "jshshir": 30101199012345u64,
        "birthday": "1990-01-01",
        "gender": "female",
        "phone": "+998901234567",
        "photo": "/media/inspectors/42.jpg",
        "position": "District inspector",
        "rank": "captain",
        "role": role,
        "village": {"id": "7", "name": "Yangiobod", "district": {"id": 2, "name": "Olmaliq"}},
        "work_addres": "Yangiobod MFY"
    })
}

#[derive(Deserialize)]
struct LoginBody {
    username: String,
    password: String,
}

async fn login(Json(body): Json<LoginBody>) -> Response {
    if body.username == "insp" && body.password == "secret" {
        let mut headers = HeaderMap::new();
        headers.insert(header::SET_COOKIE, HeaderValue::from_str(&format!("{}; Path=/; HttpOnly", SESSION)).unwrap());
        (StatusCode::OK, headers, Json(json!({"user": inspector_json("inspector")}))).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Invalid username or password"}))).into_response()
    }
}

async fn me(headers: HeaderMap) -> Response {
    let has_session = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|c| c.split(';').any(|kv| kv.trim() == SESSION));
    if has_session {
        (StatusCode::OK, Json(json!({"user": inspector_json("inspector")}))).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Authentication credentials were not provided."}))).into_response()
    }
}

pub fn auth_router() -> Router {
    Router::new()
        .route("/api/v1/auth/login/", post(login))
        .route("/api/v1/auth/me/", get(me))
}

/// Serve `app` on 127.0.0.1 and return the API base URL (`http://addr/api/v1/`).
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api/v1/", addr)
}

/// A base URL nobody listens on.
pub async fn dead_base() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api/v1/", addr)
}
