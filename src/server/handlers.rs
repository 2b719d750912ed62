use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::compare::{ComparisonRequest, ComparisonResponse};
use crate::error::AppError;
use crate::report::{report_filename, RenderError};

use super::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareBody {
    pub company_a: Option<String>,
    pub company_b: Option<String>,
    pub model: Option<String>,
    pub use_web_search: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfBody {
    pub company_a: Option<String>,
    pub company_b: Option<String>,
    pub response_text: Option<String>,
    pub model: Option<String>,
}

// A body sent without a JSON content type reads as empty, so the handler
// reports the missing fields.
fn json_body<T: Default>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match body {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(rejection) => Err(AppError::Validation(rejection.body_text())),
    }
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "Server is running",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "uptime": state.started_at.elapsed().as_secs_f64(),
    }))
}

pub async fn compare(
    State(state): State<AppState>,
    body: Result<Json<CompareBody>, JsonRejection>,
) -> Result<Json<ComparisonResponse>, AppError> {
    let body = json_body(body)?;
    let (Some(company_a), Some(company_b)) = (body.company_a, body.company_b) else {
        return Err(AppError::Validation(
            "Both Company A and Company B are required".into(),
        ));
    };

    let response = state
        .comparator
        .compare(ComparisonRequest {
            company_a,
            company_b,
            model: body.model,
            use_web_search: body.use_web_search.unwrap_or(false),
        })
        .await?;

    Ok(Json(response))
}

pub async fn download_pdf(
    State(state): State<AppState>,
    body: Result<Json<PdfBody>, JsonRejection>,
) -> Result<Response, AppError> {
    let body = json_body(body)?;
    let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    let (Some(company_a), Some(company_b), Some(response_text), Some(model)) = (
        present(body.company_a),
        present(body.company_b),
        present(body.response_text),
        present(body.model),
    ) else {
        return Err(AppError::Validation(
            "companyA, companyB, responseText and model are required".into(),
        ));
    };

    let Some(renderer) = state.pdf.clone() else {
        return Err(RenderError::Fonts(state.config.pdf_font_dir.clone()).into());
    };

    let filename = report_filename(&company_a, &company_b);
    let bytes = tokio::task::spawn_blocking(move || {
        renderer.render(&company_a, &company_b, &response_text, &model, Utc::now())
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))??;

    tracing::info!(filename = %filename, bytes = bytes.len(), "PDF generated");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

pub async fn api_not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}
