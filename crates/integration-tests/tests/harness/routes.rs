//! Application routes used to drive the pipeline from the outside

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use bulwark_core::{ApiError, ErrorKind};
use bulwark_server::{ApiRoutes, AppError, CurrentUser, ValidatedJson};
use serde::Deserialize;
use serde_json::{Value, json};
use strum::IntoEnumIterator;
use validator::Validate;

/// Counts how often the protected handler actually ran
#[derive(Clone, Default)]
pub struct Probe {
    hits: Arc<AtomicUsize>,
}

impl Probe {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Deserialize, Validate)]
struct SignUp {
    #[serde(default)]
    #[validate(length(min = 1, message = "Required"))]
    email: String,
    #[serde(default)]
    #[validate(range(min = 13, message = "Too young"))]
    age: Option<u32>,
}

pub fn api_routes(probe: &Probe) -> ApiRoutes {
    let public = Router::new()
        .route("/raise/{kind}", get(raise))
        .route("/raise/{kind}/{message}", get(raise_with_message))
        .route("/conflict-with-details", get(conflict_with_details))
        .route("/unrecognized", get(unrecognized))
        .route("/panic", get(panics))
        .route("/signup", post(sign_up));

    let protected = Router::new()
        .route("/secret", get(secret))
        .with_state(Arc::clone(&probe.hits));

    ApiRoutes::new().public(public).protected(protected)
}

fn kind_named(name: &str) -> Result<ErrorKind, AppError> {
    ErrorKind::iter()
        .find(|kind| kind.name() == name)
        .ok_or_else(|| ApiError::bad_request(format!("unknown kind {name}")).into())
}

async fn raise(Path(kind): Path<String>) -> Result<Json<Value>, AppError> {
    Err(kind_named(&kind)?.into())
}

async fn raise_with_message(Path((kind, message)): Path<(String, String)>) -> Result<Json<Value>, AppError> {
    Err(ApiError::with_message(kind_named(&kind)?, message).into())
}

async fn conflict_with_details() -> Result<Json<Value>, AppError> {
    Err(ApiError::conflict("Email already registered")
        .with_details(json!({ "field": "email" }))
        .into())
}

async fn unrecognized() -> Result<Json<Value>, AppError> {
    let cause = anyhow::anyhow!("duplicate key value violates unique constraint \"users_email_key\"");
    Err(cause.context("inserting user").into())
}

async fn panics() -> Json<Value> {
    panic!("invariant violated while rendering");
}

async fn sign_up(ValidatedJson(body): ValidatedJson<SignUp>) -> Json<Value> {
    Json(json!({ "success": true, "data": { "email": body.email } }))
}

async fn secret(State(hits): State<Arc<AtomicUsize>>, CurrentUser(user): CurrentUser) -> Json<Value> {
    hits.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "success": true, "data": { "owner": user.user_id } }))
}
