use astsim_core::{robust_similarity, Grammar};
use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Map, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;

const DEFAULT_LANG: &str = "Python";

pub fn router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/similarity", post(similarity))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn index() -> Json<Value> {
    Json(json!({ "message": "AST Similarity API is running." }))
}

async fn similarity(payload: Result<Json<Value>, JsonRejection>) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload?;
    let request = SimilarityRequest::from_json(body)?;

    let grammar = request.grammar;
    let similarity = tokio::task::spawn_blocking(move || {
        robust_similarity(&request.code1, &request.code2, grammar)
    })
    .await?;

    tracing::debug!(%grammar, similarity, "scored snippets");
    Ok(Json(json!({ "similarity": similarity })))
}

#[derive(Debug)]
struct SimilarityRequest {
    code1: String,
    code2: String,
    grammar: Grammar,
}

impl SimilarityRequest {
    fn from_json(body: Value) -> Result<Self, ApiError> {
        let Value::Object(fields) = body else {
            return Err(ApiError::NotAnObject);
        };

        let lang = match fields.get("lang") {
            None => DEFAULT_LANG,
            Some(Value::String(lang)) => lang.as_str(),
            Some(_) => return Err(ApiError::InvalidLang),
        };

        Ok(Self {
            code1: code_field(&fields, "code1"),
            code2: code_field(&fields, "code2"),
            grammar: Grammar::from_lang_tag(lang),
        })
    }
}

/// Missing code is an empty snippet. Non-string code cannot be parsed, so it
/// is analyzed as one too.
fn code_field(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(code)) => code.clone(),
        Some(other) => {
            tracing::debug!(field = key, value = %other, "non-string code, treating as empty");
            String::new()
        }
        None => String::new(),
    }
}
