//! API Handlers
use crate::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tempsafe_core::{EngineError, LocationFilter, Period, Reading, TEMPSAFE_VERSION};
use tempsafe_policy::{classify_detailed, Classification, ThresholdRegistry};
use tempsafe_quality::{generate_recommendations, ComplianceAggregator, ComplianceReport, Recommendation};

/// Engine errors surface as 422 with `{error, kind}`
#[derive(Debug)]
pub struct ApiError(pub EngineError);

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!(kind = self.0.kind(), error = %self.0, "rejecting request");
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": self.0.to_string(), "kind": self.0.kind() })),
        )
            .into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub readings: Vec<Reading>,
    pub period: Period,
    /// Location id, `"all"`, or absent for all locations
    #[serde(default)]
    pub location: Option<String>,
}

pub async fn health() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok", "version": TEMPSAFE_VERSION })))
}

pub async fn registry() -> Json<&'static ThresholdRegistry> {
    Json(ThresholdRegistry::canonical())
}

pub async fn classify(
    State(state): State<AppState>,
    Json(reading): Json<Reading>,
) -> Result<Json<Classification>, ApiError> {
    let classification = classify_detailed(&reading)?;
    state.metrics.record_verdict(classification.verdict);
    Ok(Json(classification))
}

pub async fn reports(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> Result<Json<ComplianceReport>, ApiError> {
    let filter = request.location.map(LocationFilter::from).unwrap_or_default();
    let report = ComplianceAggregator::new(state.profile.as_ref().clone()).aggregate(
        &request.readings,
        &request.period,
        &filter,
    )?;
    state.metrics.record_report(&report);
    tracing::info!(
        location = %report.location_filter,
        total = report.total_records,
        rate = report.compliance_rate,
        "generated compliance report"
    );
    Ok(Json(report))
}

pub async fn recommendations(Json(report): Json<ComplianceReport>) -> Json<Vec<Recommendation>> {
    Json(generate_recommendations(&report))
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
